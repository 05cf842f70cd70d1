//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum VhdlError {
    #[error("invalid character {0}")]
    InvalidChar(char),
    #[error("expecting closing delimiter {0}")]
    UnclosedLiteral(char),
    #[error("expecting identifier for entity name")]
    MissingEntityName,
    #[error("expecting \"is\" keyword after entity name")]
    MissingIsKeyword,
    #[error("incomplete entity declaration")]
    EntityIncomplete,
    #[error("missing closing parenthesis in interface list")]
    UnclosedInterfaceList,
}
