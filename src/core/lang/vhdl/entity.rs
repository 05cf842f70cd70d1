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

use super::error::VhdlError;
use super::token::{tokens_to_text, Keyword, Operator, VhdlToken};
use crate::core::lang::lexer::Token;
use crate::core::lang::{expr, Bound, Direction, HdlModule, HdlParameter, HdlPort, Lang};
use std::collections::BTreeMap;
use std::iter::Peekable;

/// Parses an entity declaration from the token following the `entity` keyword
/// to its closing `end ... ;`.
pub fn parse_entity<I>(tokens: &mut Peekable<I>) -> Result<HdlModule, VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    let name = match tokens.next().map(|t| t.take()) {
        Some(VhdlToken::Identifier(id)) => id,
        _ => return Err(VhdlError::MissingEntityName),
    };
    match tokens.next().map(|t| t.take()) {
        Some(VhdlToken::Keyword(Keyword::Is)) => (),
        _ => return Err(VhdlError::MissingIsKeyword),
    }

    let mut generics: Vec<(Vec<String>, Vec<VhdlToken>, Vec<VhdlToken>)> = Vec::new();
    let mut ports: Vec<(Vec<String>, Vec<VhdlToken>, Vec<VhdlToken>)> = Vec::new();

    loop {
        let t = match tokens.next() {
            Some(t) => t.take(),
            None => return Err(VhdlError::EntityIncomplete),
        };
        match t {
            VhdlToken::Keyword(Keyword::Generic) => {
                expect_paren(tokens)?;
                generics = collect_interface_entries(tokens)?;
            }
            VhdlToken::Keyword(Keyword::Port) => {
                expect_paren(tokens)?;
                ports = collect_interface_entries(tokens)?;
            }
            VhdlToken::Keyword(Keyword::End) => {
                // consume trailing tokens up to the closing ';'
                while let Some(t) = tokens.next() {
                    match t.take() {
                        VhdlToken::Operator(Operator::Semicolon) => break,
                        VhdlToken::EOF => return Err(VhdlError::EntityIncomplete),
                        _ => (),
                    }
                }
                break;
            }
            VhdlToken::EOF => return Err(VhdlError::EntityIncomplete),
            _ => (),
        }
    }

    Ok(resolve(name, generics, ports))
}

fn expect_paren<I>(tokens: &mut Peekable<I>) -> Result<(), VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    match tokens.next().map(|t| t.take()) {
        Some(VhdlToken::Operator(Operator::ParenL)) => Ok(()),
        _ => Err(VhdlError::UnclosedInterfaceList),
    }
}

/// Collects `name1, name2 : [mode] subtype [:= default]` entries separated by
/// top-level semicolons, ending at the matching close paren. The trailing `;`
/// after the paren is consumed as well.
fn collect_interface_entries<I>(
    tokens: &mut Peekable<I>,
) -> Result<Vec<(Vec<String>, Vec<VhdlToken>, Vec<VhdlToken>)>, VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    let mut entries = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut subtype: Vec<VhdlToken> = Vec::new();
    let mut default: Vec<VhdlToken> = Vec::new();
    // 0 = names, 1 = subtype, 2 = default
    let mut phase = 0;
    let mut depth: i32 = 0;
    loop {
        let t = match tokens.next() {
            Some(t) => t.take(),
            None => return Err(VhdlError::UnclosedInterfaceList),
        };
        match &t {
            VhdlToken::EOF => return Err(VhdlError::UnclosedInterfaceList),
            VhdlToken::Operator(Operator::ParenL) => {
                depth += 1;
                if phase > 0 {
                    push_phase(&mut subtype, &mut default, phase, t);
                }
                continue;
            }
            VhdlToken::Operator(Operator::ParenR) => {
                if depth == 0 {
                    // final close; consume the ';' that follows the list
                    if let Some(nt) = tokens.peek() {
                        if nt.as_type().check_operator(&Operator::Semicolon) == true {
                            tokens.next();
                        }
                    }
                    break;
                }
                depth -= 1;
                if phase > 0 {
                    push_phase(&mut subtype, &mut default, phase, t);
                }
                continue;
            }
            VhdlToken::Operator(Operator::Semicolon) => {
                if depth == 0 {
                    commit_entry(&mut entries, &mut names, &mut subtype, &mut default);
                    phase = 0;
                    continue;
                }
            }
            VhdlToken::Operator(Operator::Colon) => {
                if depth == 0 && phase == 0 {
                    phase = 1;
                    continue;
                }
            }
            VhdlToken::Operator(Operator::VarAssign) => {
                if depth == 0 && phase == 1 {
                    phase = 2;
                    continue;
                }
            }
            VhdlToken::Operator(Operator::Comma) => {
                if depth == 0 && phase == 0 {
                    continue;
                }
            }
            VhdlToken::Identifier(id) => {
                if phase == 0 {
                    names.push(id.clone());
                    continue;
                }
            }
            _ => (),
        }
        if phase > 0 {
            push_phase(&mut subtype, &mut default, phase, t);
        }
    }
    commit_entry(&mut entries, &mut names, &mut subtype, &mut default);
    Ok(entries)
}

fn push_phase(
    subtype: &mut Vec<VhdlToken>,
    default: &mut Vec<VhdlToken>,
    phase: u8,
    t: VhdlToken,
) {
    match phase {
        1 => subtype.push(t),
        _ => default.push(t),
    }
}

fn commit_entry(
    entries: &mut Vec<(Vec<String>, Vec<VhdlToken>, Vec<VhdlToken>)>,
    names: &mut Vec<String>,
    subtype: &mut Vec<VhdlToken>,
    default: &mut Vec<VhdlToken>,
) {
    if names.is_empty() == false {
        entries.push((
            std::mem::take(names),
            std::mem::take(subtype),
            std::mem::take(default),
        ));
    } else {
        names.clear();
        subtype.clear();
        default.clear();
    }
}

/// Extracts the direction keyword leading a port subtype; vhdl defaults to
/// `in` when the mode is omitted.
fn take_direction(subtype: &[VhdlToken]) -> Direction {
    match subtype.first() {
        Some(VhdlToken::Keyword(kw)) => kw.as_direction().unwrap_or(Direction::Input),
        _ => Direction::Input,
    }
}

/// Finds a `(msb downto lsb)` or `(lo to hi)` constraint in the subtype.
fn take_range(subtype: &[VhdlToken]) -> Option<(String, String)> {
    // locate the constraint keyword at any nesting level
    let pivot = subtype.iter().position(|t| {
        t.check_keyword(&Keyword::Downto) || t.check_keyword(&Keyword::To)
    })?;
    // `integer range 0 to 7` constrains a scalar, not a vector
    if subtype
        .iter()
        .take(pivot)
        .any(|t| t.check_keyword(&Keyword::Range))
        == true
    {
        return None;
    }
    // the left bound extends back to the nearest unmatched open paren
    let mut depth = 0;
    let mut start = None;
    for i in (0..pivot).rev() {
        match &subtype[i] {
            VhdlToken::Operator(Operator::ParenR) => depth += 1,
            VhdlToken::Operator(Operator::ParenL) => {
                if depth == 0 {
                    start = Some(i + 1);
                    break;
                }
                depth -= 1;
            }
            _ => (),
        }
    }
    let start = start?;
    // the right bound extends to the matching close paren
    let mut depth = 0;
    let mut stop = subtype.len();
    for i in pivot + 1..subtype.len() {
        match &subtype[i] {
            VhdlToken::Operator(Operator::ParenL) => depth += 1,
            VhdlToken::Operator(Operator::ParenR) => {
                if depth == 0 {
                    stop = i;
                    break;
                }
                depth -= 1;
            }
            _ => (),
        }
    }
    Some((
        tokens_to_text(&subtype[start..pivot]),
        tokens_to_text(&subtype[pivot + 1..stop]),
    ))
}

fn resolve(
    name: String,
    generics: Vec<(Vec<String>, Vec<VhdlToken>, Vec<VhdlToken>)>,
    port_entries: Vec<(Vec<String>, Vec<VhdlToken>, Vec<VhdlToken>)>,
) -> HdlModule {
    let mut known: BTreeMap<String, i64> = BTreeMap::new();
    let mut parameters: Vec<HdlParameter> = Vec::new();
    for (names, _subtype, default) in generics {
        let text = match default.is_empty() {
            true => None,
            false => Some(tokens_to_text(&default)),
        };
        let value = text.as_ref().and_then(|t| expr::eval(t, &known));
        for n in names {
            if let Some(v) = value {
                known.insert(n.clone(), v);
            }
            parameters.push(HdlParameter {
                name: n,
                default_text: text.clone(),
                default_value: value,
            });
        }
    }

    let mut ports: Vec<HdlPort> = Vec::new();
    for (names, subtype, _default) in port_entries {
        let direction = take_direction(&subtype);
        let bounds = take_range(&subtype).map(|(msb, lsb)| {
            let to_bound = |text: String| match expr::eval(&text, &known) {
                Some(v) => Bound::Num(v),
                None => Bound::Expr(text),
            };
            (to_bound(msb), to_bound(lsb))
        });
        for n in names {
            ports.push(HdlPort {
                name: n,
                direction: direction,
                bounds: bounds.clone(),
            });
        }
    }

    HdlModule {
        name: name,
        parameters: parameters,
        ports: ports,
        language: Lang::Vhdl,
    }
}

#[cfg(test)]
mod test {
    use super::super::parse_source;
    use super::*;

    #[test]
    fn ut_basic_entity() {
        let s = r#"
library ieee;
use ieee.std_logic_1164.all;

entity counter is
    generic (
        WIDTH : natural := 8
    );
    port (
        clk   : in std_logic;
        rst   : in std_logic;
        count : out std_logic_vector(WIDTH-1 downto 0)
    );
end counter;

architecture rtl of counter is
begin
end rtl;
"#;
        let mods = parse_source(s).unwrap();
        assert_eq!(mods.len(), 1);
        let m = &mods[0];
        assert_eq!(m.name, "counter");
        assert_eq!(m.parameters.len(), 1);
        assert_eq!(m.parameters[0].default_value, Some(8));
        assert_eq!(m.ports.len(), 3);
        assert_eq!(m.ports[0].direction, Direction::Input);
        assert_eq!(m.ports[2].direction, Direction::Output);
        assert_eq!(m.ports[2].width(), Some(8));
    }

    #[test]
    fn ut_shared_subtype_names() {
        let s = r#"
entity mux is
    port (
        a, b : in std_logic_vector(3 downto 0);
        q    : out std_logic_vector(3 downto 0)
    );
end entity;
"#;
        let m = &parse_source(s).unwrap()[0];
        assert_eq!(m.ports.len(), 3);
        assert_eq!(m.ports[0].name, "a");
        assert_eq!(m.ports[1].name, "b");
        assert_eq!(m.ports[0].width(), Some(4));
    }

    #[test]
    fn ut_default_mode_is_in() {
        let s = "entity e is port ( x : std_logic ); end;";
        let m = &parse_source(s).unwrap()[0];
        assert_eq!(m.ports[0].direction, Direction::Input);
    }

    #[test]
    fn ut_scalar_range_is_not_a_vector() {
        let s = "entity e is generic ( G : integer range 0 to 7 := 3 ); port ( x : in std_logic ); end;";
        let m = &parse_source(s).unwrap()[0];
        assert_eq!(m.parameters[0].default_value, Some(3));
        assert_eq!(m.ports[0].width(), Some(1));
    }
}
