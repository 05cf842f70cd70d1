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

//! Tiny constant-expression evaluator for range bounds.
//!
//! Bounds such as `W-1` or `2*DEPTH` are resolved against a module's default
//! parameter values so the port width can be recorded in the ip-core
//! description. Anything outside integers, identifiers, parentheses, and the
//! four basic operators evaluates to `None` and the bound is kept verbatim.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::Chars;

/// Attempts to evaluate `text` down to a single integer using `params` for
/// identifier lookups.
pub fn eval(text: &str, params: &BTreeMap<String, i64>) -> Option<i64> {
    let mut chars = text.chars().peekable();
    let value = parse_sum(&mut chars, params)?;
    // any trailing non-whitespace means the expression was not understood
    match chars.find(|c| c.is_whitespace() == false) {
        Some(_) => None,
        None => Some(value),
    }
}

fn parse_sum(chars: &mut Peekable<Chars>, params: &BTreeMap<String, i64>) -> Option<i64> {
    let mut lhs = parse_product(chars, params)?;
    loop {
        skip_ws(chars);
        match chars.peek() {
            Some('+') => {
                chars.next();
                lhs += parse_product(chars, params)?;
            }
            Some('-') => {
                chars.next();
                lhs -= parse_product(chars, params)?;
            }
            _ => return Some(lhs),
        }
    }
}

fn parse_product(chars: &mut Peekable<Chars>, params: &BTreeMap<String, i64>) -> Option<i64> {
    let mut lhs = parse_atom(chars, params)?;
    loop {
        skip_ws(chars);
        match chars.peek() {
            Some('*') => {
                chars.next();
                lhs *= parse_atom(chars, params)?;
            }
            Some('/') => {
                chars.next();
                let rhs = parse_atom(chars, params)?;
                if rhs == 0 {
                    return None;
                }
                lhs /= rhs;
            }
            _ => return Some(lhs),
        }
    }
}

fn parse_atom(chars: &mut Peekable<Chars>, params: &BTreeMap<String, i64>) -> Option<i64> {
    skip_ws(chars);
    match chars.peek()? {
        '(' => {
            chars.next();
            let inner = parse_sum(chars, params)?;
            skip_ws(chars);
            match chars.next() {
                Some(')') => Some(inner),
                _ => None,
            }
        }
        '-' => {
            chars.next();
            Some(-parse_atom(chars, params)?)
        }
        '0'..='9' => {
            let mut text = String::new();
            while let Some(c) = chars.peek() {
                if c.is_ascii_digit() == true || c == &'_' {
                    text.push(*c);
                    chars.next();
                } else {
                    break;
                }
            }
            text.replace('_', "").parse().ok()
        }
        c if c.is_ascii_alphabetic() == true || c == &'_' => {
            let mut name = String::new();
            while let Some(c) = chars.peek() {
                if c.is_ascii_alphanumeric() == true || c == &'_' || c == &'$' {
                    name.push(*c);
                    chars.next();
                } else {
                    break;
                }
            }
            params.get(&name).copied()
        }
        _ => None,
    }
}

fn skip_ws(chars: &mut Peekable<Chars>) {
    while chars.peek().is_some_and(|c| c.is_whitespace() == true) {
        chars.next();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> BTreeMap<String, i64> {
        let mut map = BTreeMap::new();
        map.insert(String::from("W"), 8);
        map.insert(String::from("DEPTH"), 4);
        map
    }

    #[test]
    fn ut_literals() {
        assert_eq!(eval("0", &params()), Some(0));
        assert_eq!(eval("31", &params()), Some(31));
        assert_eq!(eval("1_000", &params()), Some(1000));
    }

    #[test]
    fn ut_parameter_arithmetic() {
        assert_eq!(eval("W-1", &params()), Some(7));
        assert_eq!(eval("2*DEPTH - 1", &params()), Some(7));
        assert_eq!(eval("(W/2)+1", &params()), Some(5));
        assert_eq!(eval("-W", &params()), Some(-8));
    }

    #[test]
    fn ut_unresolvable() {
        // unknown identifier
        assert_eq!(eval("N-1", &params()), None);
        // unsupported function call
        assert_eq!(eval("$clog2(W)", &params()), None);
        // trailing junk
        assert_eq!(eval("W-1:0", &params()), None);
        assert_eq!(eval("W/0", &params()), None);
    }
}
