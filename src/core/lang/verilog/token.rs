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
use crate::core::lang::lexer::TrainCar;
use std::fmt::Display;

pub mod char_set {
    pub const DOUBLE_QUOTE: char = '\"';
    pub const STAR: char = '*';
    pub const FWD_SLASH: char = '/';
    pub const SINGLE_QUOTE: char = '\'';
    pub const UNDER_SCORE: char = '_';
    pub const DOLLAR_SIGN: char = '$';
    pub const GRAVE_ACCENT: char = '`';
    pub const ESC: char = '\\';

    /// Checks if `c` is a letter.
    pub fn is_letter(c: &char) -> bool {
        c.is_ascii_alphabetic()
    }

    /// Checks if `c` is a digit.
    pub fn is_digit(c: &char) -> bool {
        c.is_ascii_digit()
    }

    /// The set of characters \[a-z]\[A-Z]\[0-9]\[_]\[$] are allowed in identifiers
    /// after the initial letter is captured.
    pub fn is_identifier_character(c: &char) -> bool {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '$' => true,
            _ => false,
        }
    }

    /// The characters allowed to continue a number once its first digit is
    /// captured (based literals, sizes, x/z states, reals, exponents).
    pub fn is_number_character(c: &char) -> bool {
        match c {
            '0'..='9' | 'a'..='f' | 'A'..='F' | 'x' | 'X' | 'z' | 'Z' | '?' | '_' | '.' | 's'
            | 'S' | 'o' | 'O' | 'h' | 'H' | 'b' | 'B' | 'd' | 'D' | 'e' | 'E' => true,
            _ => false,
        }
    }

    // pg. 8: White space shall contain the characters for spaces, tabs, newlines, and formfeeds.
    pub fn is_whitespace(c: &char) -> bool {
        c == &'\u{0020}' || c == &'\u{00A0}' ||
        // format-effectors: ht (\t), vt, cr (\r), lf (\n)
        c == &'\u{0009}' || c == &'\u{000B}' || c == &'\u{000D}' || c == &'\u{000A}'
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Keyword {
    Module,
    Endmodule,
    Input,
    Output,
    Inout,
    Parameter,
    Localparam,
    Wire,
    Reg,
    Logic,
    Signed,
    Unsigned,
    Integer,
    Real,
    Time,
    Tri,
    Supply0,
    Supply1,
    Genvar,
}

impl Keyword {
    /// Attempts to match the string `s` to a keyword of the supported subset.
    pub fn match_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "module" | "macromodule" => Self::Module,
            "endmodule" => Self::Endmodule,
            "input" => Self::Input,
            "output" => Self::Output,
            "inout" => Self::Inout,
            "parameter" => Self::Parameter,
            "localparam" => Self::Localparam,
            "wire" => Self::Wire,
            "reg" => Self::Reg,
            "logic" => Self::Logic,
            "signed" => Self::Signed,
            "unsigned" => Self::Unsigned,
            "integer" => Self::Integer,
            "real" => Self::Real,
            "time" => Self::Time,
            "tri" => Self::Tri,
            "supply0" => Self::Supply0,
            "supply1" => Self::Supply1,
            "genvar" => Self::Genvar,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Module => "module",
            Self::Endmodule => "endmodule",
            Self::Input => "input",
            Self::Output => "output",
            Self::Inout => "inout",
            Self::Parameter => "parameter",
            Self::Localparam => "localparam",
            Self::Wire => "wire",
            Self::Reg => "reg",
            Self::Logic => "logic",
            Self::Signed => "signed",
            Self::Unsigned => "unsigned",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Time => "time",
            Self::Tri => "tri",
            Self::Supply0 => "supply0",
            Self::Supply1 => "supply1",
            Self::Genvar => "genvar",
        }
    }

    /// Checks if the keyword selects a port direction.
    pub fn as_direction(&self) -> Option<crate::core::lang::Direction> {
        use crate::core::lang::Direction;
        match self {
            Self::Input => Some(Direction::Input),
            Self::Output => Some(Direction::Output),
            Self::Inout => Some(Direction::Inout),
            _ => None,
        }
    }

    /// Checks if the keyword is a net/variable type that may appear between a
    /// direction and a port name.
    pub fn is_net_type(&self) -> bool {
        match self {
            Self::Wire
            | Self::Reg
            | Self::Logic
            | Self::Tri
            | Self::Integer
            | Self::Real
            | Self::Time
            | Self::Supply0
            | Self::Supply1
            | Self::Signed
            | Self::Unsigned => true,
            _ => false,
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Operator {
    ParenL,
    ParenR,
    BrackL,
    BrackR,
    BraceL,
    BraceR,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Pound,
    At,
    Question,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Amp,
    Pipe,
    Tilde,
    Bang,
    Lt,
    Gt,
    Eq,
}

impl Operator {
    /// Matches a single character to its delimiter/operator.
    pub fn match_char(c: char) -> Option<Self> {
        Some(match c {
            '(' => Self::ParenL,
            ')' => Self::ParenR,
            '[' => Self::BrackL,
            ']' => Self::BrackR,
            '{' => Self::BraceL,
            '}' => Self::BraceR,
            ',' => Self::Comma,
            ':' => Self::Colon,
            ';' => Self::Semicolon,
            '.' => Self::Dot,
            '#' => Self::Pound,
            '@' => Self::At,
            '?' => Self::Question,
            '+' => Self::Plus,
            '-' => Self::Minus,
            '*' => Self::Star,
            '/' => Self::Slash,
            '%' => Self::Percent,
            '^' => Self::Caret,
            '&' => Self::Amp,
            '|' => Self::Pipe,
            '~' => Self::Tilde,
            '!' => Self::Bang,
            '<' => Self::Lt,
            '>' => Self::Gt,
            '=' => Self::Eq,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ParenL => "(",
            Self::ParenR => ")",
            Self::BrackL => "[",
            Self::BrackR => "]",
            Self::BraceL => "{",
            Self::BraceR => "}",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Dot => ".",
            Self::Pound => "#",
            Self::At => "@",
            Self::Question => "?",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Caret => "^",
            Self::Amp => "&",
            Self::Pipe => "|",
            Self::Tilde => "~",
            Self::Bang => "!",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Eq => "=",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum VerilogToken {
    Comment(String),
    Operator(Operator),
    Identifier(String),
    Keyword(Keyword),
    Number(String),
    StringLiteral(String),
    Directive(String),
    EOF,
}

impl VerilogToken {
    /// Checks if the token matches the keyword `kw`.
    pub fn check_keyword(&self, kw: &Keyword) -> bool {
        match self {
            Self::Keyword(k) => k == kw,
            _ => false,
        }
    }

    /// Checks if the token matches the delimiter `op`.
    pub fn check_operator(&self, op: &Operator) -> bool {
        match self {
            Self::Operator(o) => o == op,
            _ => false,
        }
    }

    pub fn is_eof(&self) -> bool {
        match self {
            Self::EOF => true,
            _ => false,
        }
    }

    /// Renders the token back to source text (comments/directives excluded).
    pub fn to_text(&self) -> String {
        match self {
            Self::Comment(_) => String::new(),
            Self::Operator(o) => o.to_string(),
            Self::Identifier(s) => s.to_string(),
            Self::Keyword(k) => k.to_string(),
            Self::Number(n) => n.to_string(),
            Self::StringLiteral(s) => format!("\"{}\"", s),
            Self::Directive(_) => String::new(),
            Self::EOF => String::new(),
        }
    }

    /// Collects a word and decides between keyword or identifier.
    pub fn consume_word<T>(train: &mut TrainCar<T>, c0: char) -> Result<Self, VerilogError>
    where
        T: Iterator<Item = char>,
    {
        let mut word = String::from(c0);
        while let Some(c) = train.peek() {
            if char_set::is_identifier_character(c) == true {
                word.push(train.consume().unwrap());
            } else {
                break;
            }
        }
        match Keyword::match_keyword(&word) {
            Some(kw) => Ok(Self::Keyword(kw)),
            None => Ok(Self::Identifier(word)),
        }
    }

    /// Collects an escaped identifier: `\` up to the next whitespace.
    pub fn consume_escaped_identifier<T>(train: &mut TrainCar<T>) -> Result<Self, VerilogError>
    where
        T: Iterator<Item = char>,
    {
        let mut word = String::new();
        while let Some(c) = train.peek() {
            if char_set::is_whitespace(c) == true {
                break;
            }
            word.push(train.consume().unwrap());
        }
        match word.is_empty() {
            true => Err(VerilogError::InvalidChar(char_set::ESC)),
            false => Ok(Self::Identifier(word)),
        }
    }

    /// Collects a number literal. The literal is kept as verbatim text; the
    /// character set is permissive enough for sized/based constants and reals.
    pub fn consume_number<T>(train: &mut TrainCar<T>, c0: char) -> Result<Self, VerilogError>
    where
        T: Iterator<Item = char>,
    {
        let mut num = String::from(c0);
        while let Some(c) = train.peek() {
            if char_set::is_number_character(c) == true {
                num.push(train.consume().unwrap());
            } else if c == &char_set::SINGLE_QUOTE {
                num.push(train.consume().unwrap());
                // a base specifier must follow the tick
                match train.peek() {
                    Some(b) => match b {
                        'b' | 'B' | 'o' | 'O' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' => {
                            num.push(train.consume().unwrap());
                        }
                        _ => return Err(VerilogError::InvalidBaseSpecifier(*b)),
                    },
                    None => return Err(VerilogError::EmptyBaseConstNumber),
                }
            } else {
                break;
            }
        }
        Ok(Self::Number(num))
    }

    /// Collects a based literal beginning at the tick, e.g. `'h837FF`.
    pub fn consume_tick_number<T>(train: &mut TrainCar<T>) -> Result<Self, VerilogError>
    where
        T: Iterator<Item = char>,
    {
        let mut num = String::from(char_set::SINGLE_QUOTE);
        match train.peek() {
            Some(b) => match b {
                'b' | 'B' | 'o' | 'O' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' => {
                    num.push(train.consume().unwrap());
                }
                _ => return Err(VerilogError::InvalidBaseSpecifier(*b)),
            },
            None => return Err(VerilogError::EmptyBaseConstNumber),
        }
        let mut got_value = false;
        while let Some(c) = train.peek() {
            if char_set::is_number_character(c) == true {
                got_value = true;
                num.push(train.consume().unwrap());
            } else {
                break;
            }
        }
        match got_value {
            true => Ok(Self::Number(num)),
            false => Err(VerilogError::EmptyBaseConstNumber),
        }
    }

    /// Collects a string literal (double quotes), handling `\"` escapes.
    pub fn consume_str_literal<T>(train: &mut TrainCar<T>) -> Result<Self, VerilogError>
    where
        T: Iterator<Item = char>,
    {
        let mut text = String::new();
        while let Some(c) = train.consume() {
            if c == char_set::ESC {
                if let Some(next) = train.consume() {
                    text.push(c);
                    text.push(next);
                    continue;
                }
            } else if c == char_set::DOUBLE_QUOTE {
                return Ok(Self::StringLiteral(text));
            } else {
                text.push(c);
            }
        }
        Err(VerilogError::UnclosedLiteral(char_set::DOUBLE_QUOTE))
    }

    /// Collects a single-line comment (`//` already seen up to first slash).
    pub fn consume_oneline_comment<T>(train: &mut TrainCar<T>) -> Result<Self, VerilogError>
    where
        T: Iterator<Item = char>,
    {
        // take the second slash
        train.consume();
        let mut text = String::new();
        while let Some(c) = train.peek() {
            if c == &'\n' {
                break;
            }
            text.push(train.consume().unwrap());
        }
        Ok(Self::Comment(text))
    }

    /// Collects a block comment (`/*` already seen up to the slash).
    pub fn consume_block_comment<T>(train: &mut TrainCar<T>) -> Result<Self, VerilogError>
    where
        T: Iterator<Item = char>,
    {
        // take the star
        train.consume();
        let mut text = String::new();
        while let Some(c) = train.consume() {
            if c == char_set::STAR && train.peek() == Some(&char_set::FWD_SLASH) {
                train.consume();
                return Ok(Self::Comment(text));
            }
            text.push(c);
        }
        Err(VerilogError::UnclosedBlockComment)
    }

    /// Collects an attribute instance `(* ... *)` (the open paren already
    /// seen). Attributes carry no meaning here and become comments.
    pub fn consume_attribute<T>(train: &mut TrainCar<T>) -> Result<Self, VerilogError>
    where
        T: Iterator<Item = char>,
    {
        // take the star
        train.consume();
        let mut text = String::new();
        while let Some(c) = train.consume() {
            if c == char_set::STAR && train.peek() == Some(&')') {
                train.consume();
                return Ok(Self::Comment(text));
            }
            text.push(c);
        }
        Err(VerilogError::UnclosedAttribute)
    }

    /// Collects a compiler directive up to the end of the line, honoring
    /// backslash line continuations (for multi-line `define bodies).
    pub fn consume_compiler_directive<T>(train: &mut TrainCar<T>) -> Result<Self, VerilogError>
    where
        T: Iterator<Item = char>,
    {
        let mut text = String::new();
        match train.peek() {
            Some(c) if char_set::is_letter(c) || c == &char_set::UNDER_SCORE => (),
            _ => return Err(VerilogError::EmptyCompilerDirective),
        }
        let mut continued = false;
        while let Some(c) = train.peek() {
            if c == &'\n' && continued == false {
                break;
            }
            let c = train.consume().unwrap();
            continued = c == char_set::ESC;
            if c != '\n' && continued == false {
                text.push(c);
            }
        }
        Ok(Self::Directive(text))
    }
}

impl Display for VerilogToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

/// Renders a statement's tokens back into compact source text.
///
/// A space is only inserted where two word-like tokens would otherwise fuse.
pub fn tokens_to_text(tokens: &[VerilogToken]) -> String {
    let mut result = String::new();
    for tk in tokens {
        let text = tk.to_text();
        if text.is_empty() == true {
            continue;
        }
        let fuse = result
            .chars()
            .last()
            .is_some_and(|l| char_set::is_identifier_character(&l))
            && text
                .chars()
                .next()
                .is_some_and(|r| char_set::is_identifier_character(&r));
        if fuse == true {
            result.push(' ');
        }
        result.push_str(&text);
    }
    result
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ut_keyword_match() {
        assert_eq!(Keyword::match_keyword("module"), Some(Keyword::Module));
        assert_eq!(Keyword::match_keyword("Module"), None);
        assert_eq!(Keyword::match_keyword("always"), None);
    }

    #[test]
    fn ut_statement_text() {
        let stmt = vec![
            VerilogToken::Identifier(String::from("W")),
            VerilogToken::Operator(Operator::Minus),
            VerilogToken::Number(String::from("1")),
        ];
        assert_eq!(tokens_to_text(&stmt), "W-1");

        let stmt = vec![
            VerilogToken::Number(String::from("2")),
            VerilogToken::Operator(Operator::Star),
            VerilogToken::Identifier(String::from("DEPTH")),
        ];
        assert_eq!(tokens_to_text(&stmt), "2*DEPTH");

        // adjacent word-like tokens stay separated
        let stmt = vec![
            VerilogToken::Keyword(Keyword::Signed),
            VerilogToken::Identifier(String::from("q")),
        ];
        assert_eq!(tokens_to_text(&stmt), "signed q");
    }
}
