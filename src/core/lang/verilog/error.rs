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
pub enum VerilogError {
    #[error("an error has occurred.")]
    Unknown,
    #[error("missing closing sequence for block comment (*/)")]
    UnclosedBlockComment,
    #[error("missing closing sequence for attribute (*)")]
    UnclosedAttribute,
    #[error("invalid character {0}")]
    InvalidChar(char),
    #[error("expecting closing delimiter {0}")]
    UnclosedLiteral(char),
    #[error("expecting numeric value after base specifier")]
    EmptyBaseConstNumber,
    #[error("invalid base specifier {0}")]
    InvalidBaseSpecifier(char),
    #[error("expecting keyword or identifier immediately after compiler directive `")]
    EmptyCompilerDirective,
    #[error("expecting identifier for module name")]
    MissingModuleName,
    #[error("expecting \"endmodule\" keyword")]
    MissingEndmodule,
    #[error("incomplete module declaration")]
    ModDecIncomplete,
    #[error("expecting identifier for parameter name")]
    MissingParameterName,
    #[error("missing closing bracket for range")]
    UnclosedRange,
}
