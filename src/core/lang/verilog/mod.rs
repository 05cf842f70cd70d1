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

pub mod error;
pub mod module;
pub mod token;
pub mod tokenizer;

use self::error::VerilogError;
use self::token::Keyword;
use self::tokenizer::VerilogTokenizer;
use super::HdlModule;

/// Extracts every module declaration found in verilog source code `s`.
pub fn parse_source(s: &str) -> Result<Vec<HdlModule>, VerilogError> {
    let mut tokens = VerilogTokenizer::from_source_code(s)
        .into_tokens()
        .into_iter()
        .peekable();
    let mut modules = Vec::new();
    while let Some(t) = tokens.next() {
        if t.as_type().check_keyword(&Keyword::Module) == true {
            modules.push(module::parse_module(&mut tokens)?);
        }
    }
    Ok(modules)
}
