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

use super::error::VerilogError;
use super::token::{tokens_to_text, Keyword, Operator, VerilogToken};
use crate::core::lang::lexer::Token;
use crate::core::lang::{expr, Bound, Direction, HdlModule, HdlParameter, HdlPort, Lang};
use std::collections::BTreeMap;
use std::iter::Peekable;

/// Parses a `Module` design element from the token following the `module`
/// keyword to the matching `endmodule`.
pub fn parse_module<I>(tokens: &mut Peekable<I>) -> Result<HdlModule, VerilogError>
where
    I: Iterator<Item = Token<VerilogToken>>,
{
    // take module name
    let name = match tokens.next().map(|t| t.take()) {
        Some(VerilogToken::Identifier(id)) => id,
        _ => return Err(VerilogError::MissingModuleName),
    };

    let mut params: Vec<RawParam> = Vec::new();
    let mut ports: Vec<RawPort> = Vec::new();

    // optional parameter port list: #( ... )
    if peek_operator(tokens, Operator::Pound) == true {
        tokens.next();
        if peek_operator(tokens, Operator::ParenL) == false {
            return Err(VerilogError::ModDecIncomplete);
        }
        tokens.next();
        for entry in collect_entries(tokens, ListEnd::Paren)? {
            if let Some(p) = interpret_param_entry(entry) {
                upsert_param(&mut params, p);
            }
        }
    }

    // optional port list: ( ... )
    if peek_operator(tokens, Operator::ParenL) == true {
        tokens.next();
        let mut inherited: Option<(Option<Direction>, Option<(String, String)>)> = None;
        for entry in collect_entries(tokens, ListEnd::Paren)? {
            if let Some((port, explicit)) = interpret_port_entry(entry, &inherited) {
                if explicit == true {
                    inherited = Some((port.direction, port.range.clone()));
                }
                ports.push(port);
            }
        }
    }

    // the declaration must close with ';'
    if peek_operator(tokens, Operator::Semicolon) == false {
        return Err(VerilogError::ModDecIncomplete);
    }
    tokens.next();

    // scan the body for non-ansi declarations until the matching endmodule
    let mut depth = 0;
    loop {
        let t = match tokens.next() {
            Some(t) => t.take(),
            None => return Err(VerilogError::MissingEndmodule),
        };
        match t {
            VerilogToken::Keyword(Keyword::Endmodule) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            VerilogToken::Keyword(Keyword::Module) => depth += 1,
            VerilogToken::Keyword(kw) if depth == 0 => {
                if let Some(dir) = kw.as_direction() {
                    // a direction declaration refines ports already listed in the header
                    let mut inherited = Some((Some(dir), None));
                    for entry in collect_entries(tokens, ListEnd::Semicolon)? {
                        if let Some((port, explicit)) = interpret_port_entry(entry, &inherited) {
                            if explicit == true || port.range.is_some() {
                                inherited = Some((Some(dir), port.range.clone()));
                            }
                            refine_port(&mut ports, port);
                        }
                    }
                } else if kw == Keyword::Parameter {
                    for entry in collect_entries(tokens, ListEnd::Semicolon)? {
                        if let Some(p) = interpret_param_entry(entry) {
                            upsert_param(&mut params, p);
                        }
                    }
                }
            }
            _ => (),
        }
    }

    Ok(resolve(name, params, ports))
}

/// How a declaration entry list terminates.
enum ListEnd {
    /// Closes at the matching `)` of an already-opened paren.
    Paren,
    /// Closes at the next top-level `;`.
    Semicolon,
}

#[derive(Debug)]
struct RawParam {
    name: String,
    default: Vec<VerilogToken>,
}

#[derive(Debug)]
struct RawPort {
    name: String,
    direction: Option<Direction>,
    range: Option<(String, String)>,
}

fn peek_operator<I>(tokens: &mut Peekable<I>, op: Operator) -> bool
where
    I: Iterator<Item = Token<VerilogToken>>,
{
    tokens
        .peek()
        .is_some_and(|t| t.as_type().check_operator(&op))
}

/// Splits the upcoming tokens into comma-separated entries, tracking bracket
/// and paren depth so commas inside defaults or concatenations do not split.
fn collect_entries<I>(
    tokens: &mut Peekable<I>,
    end: ListEnd,
) -> Result<Vec<Vec<VerilogToken>>, VerilogError>
where
    I: Iterator<Item = Token<VerilogToken>>,
{
    let mut entries = Vec::new();
    let mut current: Vec<VerilogToken> = Vec::new();
    let mut depth: i32 = 0;
    loop {
        let t = match tokens.next() {
            Some(t) => t.take(),
            None => return Err(VerilogError::ModDecIncomplete),
        };
        match &t {
            VerilogToken::EOF => return Err(VerilogError::ModDecIncomplete),
            VerilogToken::Operator(op) => match op {
                Operator::ParenL | Operator::BrackL | Operator::BraceL => depth += 1,
                Operator::ParenR => {
                    if depth == 0 {
                        // in semicolon mode a stray ')' closes a surrounding
                        // list we were not tracking (function/task headers)
                        break;
                    }
                    depth -= 1;
                }
                Operator::BrackR | Operator::BraceR => depth -= 1,
                Operator::Comma => {
                    if depth == 0 {
                        entries.push(std::mem::take(&mut current));
                        continue;
                    }
                }
                Operator::Semicolon => {
                    if depth == 0 {
                        match end {
                            ListEnd::Semicolon => break,
                            ListEnd::Paren => return Err(VerilogError::ModDecIncomplete),
                        }
                    }
                }
                _ => (),
            },
            _ => (),
        }
        current.push(t);
    }
    if current.is_empty() == false {
        entries.push(current);
    }
    Ok(entries)
}

/// Reads one parameter entry: `[parameter] [type] [range] NAME [= default]`.
fn interpret_param_entry(entry: Vec<VerilogToken>) -> Option<RawParam> {
    let mut name: Option<String> = None;
    let mut default: Vec<VerilogToken> = Vec::new();
    let mut in_default = false;
    let mut bracket_depth = 0;
    for t in entry {
        if in_default == true {
            default.push(t);
            continue;
        }
        match &t {
            VerilogToken::Operator(Operator::BrackL) => bracket_depth += 1,
            VerilogToken::Operator(Operator::BrackR) => bracket_depth -= 1,
            VerilogToken::Operator(Operator::Eq) => in_default = true,
            VerilogToken::Identifier(id) => {
                if bracket_depth == 0 {
                    name = Some(id.clone());
                }
            }
            _ => (),
        }
    }
    Some(RawParam {
        name: name?,
        default: default,
    })
}

/// Reads one port entry. Returns the port and whether the entry carried its
/// own direction keyword (which resets the inherited state for later entries).
fn interpret_port_entry(
    entry: Vec<VerilogToken>,
    inherited: &Option<(Option<Direction>, Option<(String, String)>)>,
) -> Option<(RawPort, bool)> {
    let mut name: Option<String> = None;
    let mut direction: Option<Direction> = None;
    let mut range: Option<(String, String)> = None;
    let mut explicit = false;
    let mut iter = entry.into_iter();
    while let Some(t) = iter.next() {
        match &t {
            VerilogToken::Keyword(kw) => {
                if let Some(dir) = kw.as_direction() {
                    direction = Some(dir);
                    explicit = true;
                } else if kw == &Keyword::Parameter || kw == &Keyword::Localparam {
                    // ansi headers may declare parameters inside the port list
                    return None;
                }
                // net types carry no width/direction information we track
            }
            VerilogToken::Operator(Operator::BrackL) => {
                let r = collect_range(&mut iter);
                // only the packed dimension (before the name) is relevant
                if name.is_none() == true && r.is_some() == true {
                    range = r;
                }
            }
            VerilogToken::Operator(Operator::Eq) => break,
            VerilogToken::Identifier(id) => name = Some(id.clone()),
            _ => (),
        }
    }
    let name = name?;
    if explicit == false {
        if let Some((dir, rng)) = inherited {
            direction = *dir;
            if range.is_none() == true {
                range = rng.clone();
            }
        }
    }
    Some((
        RawPort {
            name: name,
            direction: direction,
            range: range,
        },
        explicit,
    ))
}

/// Consumes a bracketed range already opened with `[`, splitting at the
/// top-level `:` into (msb, lsb) expression text.
fn collect_range<I>(iter: &mut I) -> Option<(String, String)>
where
    I: Iterator<Item = VerilogToken>,
{
    let mut msb: Vec<VerilogToken> = Vec::new();
    let mut lsb: Vec<VerilogToken> = Vec::new();
    let mut on_lsb = false;
    let mut depth = 0;
    while let Some(t) = iter.next() {
        match &t {
            VerilogToken::Operator(Operator::BrackL) => depth += 1,
            VerilogToken::Operator(Operator::BrackR) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            VerilogToken::Operator(Operator::Colon) => {
                if depth == 0 {
                    on_lsb = true;
                    continue;
                }
            }
            _ => (),
        }
        match on_lsb {
            false => msb.push(t),
            true => lsb.push(t),
        }
    }
    match on_lsb {
        true => Some((tokens_to_text(&msb), tokens_to_text(&lsb))),
        // a single index (unpacked/memory dimension) carries no port width
        false => None,
    }
}

fn upsert_param(params: &mut Vec<RawParam>, new: RawParam) {
    match params.iter_mut().find(|p| p.name == new.name) {
        Some(p) => {
            if p.default.is_empty() == true {
                p.default = new.default;
            }
        }
        None => params.push(new),
    }
}

/// Lets a header port inherit attributes found in a body declaration. Ports
/// not listed in the header are not added (task/function arguments).
fn refine_port(ports: &mut Vec<RawPort>, new: RawPort) {
    if let Some(p) = ports.iter_mut().find(|p| p.name == new.name) {
        if p.direction.is_none() == true {
            p.direction = new.direction;
        }
        if p.range.is_none() == true {
            p.range = new.range;
        }
    }
}

/// Parses a verilog integer literal: plain decimal or sized/based constants
/// such as `8'hFF`. Literals holding x/z states resolve to `None`.
pub fn parse_verilog_int(s: &str) -> Option<i64> {
    let text = s.replace('_', "");
    match text.split_once('\'') {
        Some((_, rest)) => {
            let rest = rest.strip_prefix(['s', 'S']).unwrap_or(rest);
            let (radix, digits) = match rest.chars().next()? {
                'b' | 'B' => (2, &rest[1..]),
                'o' | 'O' => (8, &rest[1..]),
                'd' | 'D' => (10, &rest[1..]),
                'h' | 'H' => (16, &rest[1..]),
                _ => return None,
            };
            i64::from_str_radix(digits, radix).ok()
        }
        None => text.parse().ok(),
    }
}

/// Finalizes the raw capture into an [HdlModule], resolving parameter defaults
/// and range bounds to constants where possible.
fn resolve(name: String, params: Vec<RawParam>, ports: Vec<RawPort>) -> HdlModule {
    let mut known: BTreeMap<String, i64> = BTreeMap::new();
    let mut parameters: Vec<HdlParameter> = Vec::new();
    for p in params {
        let text = match p.default.is_empty() {
            true => None,
            false => Some(tokens_to_text(&p.default)),
        };
        // single literal defaults bypass the expression evaluator
        let value = match (p.default.len(), p.default.first()) {
            (1, Some(VerilogToken::Number(n))) => parse_verilog_int(n),
            _ => text.as_ref().and_then(|t| expr::eval(t, &known)),
        };
        if let Some(v) = value {
            known.insert(p.name.clone(), v);
        }
        parameters.push(HdlParameter {
            name: p.name,
            default_text: text,
            default_value: value,
        });
    }

    let ports = ports
        .into_iter()
        .map(|p| {
            let bounds = p.range.map(|(msb, lsb)| {
                let to_bound = |text: String| match expr::eval(&text, &known) {
                    Some(v) => Bound::Num(v),
                    None => match parse_verilog_int(&text) {
                        Some(v) => Bound::Num(v),
                        None => Bound::Expr(text),
                    },
                };
                (to_bound(msb), to_bound(lsb))
            });
            HdlPort {
                name: p.name,
                // a port never given a direction is conservatively bidirectional
                direction: p.direction.unwrap_or(Direction::Inout),
                bounds: bounds,
            }
        })
        .collect();

    HdlModule {
        name: name,
        parameters: parameters,
        ports: ports,
        language: Lang::Verilog,
    }
}

#[cfg(test)]
mod test {
    use super::super::parse_source;
    use super::*;

    #[test]
    fn ut_ansi_module() {
        let s = r#"
module fifo #(
    parameter W = 8,
    parameter DEPTH = 4
)(
    input wire clk,
    input wire rst,
    input wire [W-1:0] din,
    output reg [W-1:0] dout,
    output wire full
);
    always @(posedge clk) begin
        if (rst) dout <= 0;
    end
endmodule
"#;
        let mods = parse_source(s).unwrap();
        assert_eq!(mods.len(), 1);
        let m = &mods[0];
        assert_eq!(m.name, "fifo");
        assert_eq!(m.parameters.len(), 2);
        assert_eq!(m.parameters[0].name, "W");
        assert_eq!(m.parameters[0].default_value, Some(8));
        assert_eq!(m.ports.len(), 5);
        assert_eq!(m.ports[0].name, "clk");
        assert_eq!(m.ports[0].direction, Direction::Input);
        assert_eq!(m.ports[0].width(), Some(1));
        assert_eq!(m.ports[2].name, "din");
        assert_eq!(m.ports[2].bounds, Some((Bound::Num(7), Bound::Num(0))));
        assert_eq!(m.ports[2].width(), Some(8));
        assert_eq!(m.ports[3].direction, Direction::Output);
    }

    #[test]
    fn ut_non_ansi_module() {
        let s = r#"
module shift(a, b, q);
    input a, b;
    output [3:0] q;
    reg [3:0] q;
endmodule
"#;
        let mods = parse_source(s).unwrap();
        let m = &mods[0];
        assert_eq!(m.ports.len(), 3);
        assert_eq!(m.ports[0].direction, Direction::Input);
        assert_eq!(m.ports[1].direction, Direction::Input);
        assert_eq!(m.ports[1].width(), Some(1));
        assert_eq!(m.ports[2].direction, Direction::Output);
        assert_eq!(m.ports[2].width(), Some(4));
    }

    #[test]
    fn ut_direction_inheritance_in_header() {
        let s = "module m(input a, b, output c); endmodule";
        let m = &parse_source(s).unwrap()[0];
        assert_eq!(m.ports[0].direction, Direction::Input);
        assert_eq!(m.ports[1].direction, Direction::Input);
        assert_eq!(m.ports[2].direction, Direction::Output);
    }

    #[test]
    fn ut_range_inheritance_resets() {
        let s = "module m(input [3:0] a, b, input c); endmodule";
        let m = &parse_source(s).unwrap()[0];
        assert_eq!(m.ports[0].width(), Some(4));
        assert_eq!(m.ports[1].width(), Some(4));
        assert_eq!(m.ports[2].width(), Some(1));
    }

    #[test]
    fn ut_unresolvable_bound_is_kept() {
        let s = "module m #(parameter W = 8)(output [$clog2(W)-1:0] q); endmodule";
        let m = &parse_source(s).unwrap()[0];
        assert_eq!(m.ports[0].width(), None);
        match &m.ports[0].bounds {
            Some((Bound::Expr(e), Bound::Num(0))) => {
                assert_eq!(e.contains("clog2"), true);
            }
            other => panic!("unexpected bounds {:?}", other),
        }
    }

    #[test]
    fn ut_multiple_modules_per_file() {
        let s = r#"
module a(input x); endmodule
// a comment between
module b(output y); endmodule
"#;
        let mods = parse_source(s).unwrap();
        assert_eq!(mods.len(), 2);
        assert_eq!(mods[0].name, "a");
        assert_eq!(mods[1].name, "b");
    }

    #[test]
    fn ut_body_parameter() {
        let s = r#"
module m(q);
    parameter SIZE = 16;
    output [SIZE-1:0] q;
endmodule
"#;
        let m = &parse_source(s).unwrap()[0];
        assert_eq!(m.parameters[0].default_value, Some(16));
        assert_eq!(m.ports[0].width(), Some(16));
    }

    #[test]
    fn ut_verilog_int() {
        assert_eq!(parse_verilog_int("42"), Some(42));
        assert_eq!(parse_verilog_int("1_000"), Some(1000));
        assert_eq!(parse_verilog_int("8'hFF"), Some(255));
        assert_eq!(parse_verilog_int("4'b1010"), Some(10));
        assert_eq!(parse_verilog_int("16'd12"), Some(12));
        assert_eq!(parse_verilog_int("8'sd6"), Some(6));
        assert_eq!(parse_verilog_int("8'hxz"), None);
    }
}
