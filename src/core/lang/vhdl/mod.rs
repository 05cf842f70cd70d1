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

pub mod entity;
pub mod error;
pub mod token;

use self::error::VhdlError;
use self::token::{Keyword, Operator, VhdlToken, VhdlTokenizer};
use super::HdlModule;

/// Extracts every entity declaration found in vhdl source code `s`.
///
/// The `entity` keyword also appears in `end entity` closings and in direct
/// instantiations (`u0: entity work.foo`), so a declaration is only entered
/// when the keyword is not preceded by `end`, `:`, or `.`.
pub fn parse_source(s: &str) -> Result<Vec<HdlModule>, VhdlError> {
    let mut tokens = VhdlTokenizer::from_source_code(s)
        .into_tokens()
        .into_iter()
        .peekable();
    let mut modules = Vec::new();
    let mut prev: Option<VhdlToken> = None;
    while let Some(t) = tokens.next() {
        let t = t.take();
        if t.check_keyword(&Keyword::Entity) == true {
            let declares = match &prev {
                Some(p) => {
                    p.check_keyword(&Keyword::End) == false
                        && p.check_operator(&Operator::Colon) == false
                        && p.check_operator(&Operator::Other('.')) == false
                }
                None => true,
            };
            if declares == true {
                modules.push(entity::parse_entity(&mut tokens)?);
            }
        }
        prev = Some(t);
    }
    Ok(modules)
}
