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
use crate::core::lang::lexer::{Token, TokenError, Tokenize, TrainCar};
use std::fmt::Display;

/// The vhdl keyword subset needed to parse entity declarations.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Keyword {
    Entity,
    Is,
    Generic,
    Port,
    End,
    In,
    Out,
    Inout,
    Buffer,
    Downto,
    To,
    Signal,
    Constant,
    Range,
}

impl Keyword {
    /// Vhdl identifiers are case-insensitive, so keyword matching lowercases
    /// first.
    pub fn match_keyword(s: &str) -> Option<Self> {
        Some(match s.to_ascii_lowercase().as_str() {
            "entity" => Self::Entity,
            "is" => Self::Is,
            "generic" => Self::Generic,
            "port" => Self::Port,
            "end" => Self::End,
            "in" => Self::In,
            "out" => Self::Out,
            "inout" => Self::Inout,
            "buffer" => Self::Buffer,
            "downto" => Self::Downto,
            "to" => Self::To,
            "signal" => Self::Signal,
            "constant" => Self::Constant,
            "range" => Self::Range,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Entity => "entity",
            Self::Is => "is",
            Self::Generic => "generic",
            Self::Port => "port",
            Self::End => "end",
            Self::In => "in",
            Self::Out => "out",
            Self::Inout => "inout",
            Self::Buffer => "buffer",
            Self::Downto => "downto",
            Self::To => "to",
            Self::Signal => "signal",
            Self::Constant => "constant",
            Self::Range => "range",
        }
    }

    pub fn as_direction(&self) -> Option<crate::core::lang::Direction> {
        use crate::core::lang::Direction;
        match self {
            Self::In => Some(Direction::Input),
            Self::Out | Self::Buffer => Some(Direction::Output),
            Self::Inout => Some(Direction::Inout),
            _ => None,
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
    Comma,
    Colon,
    Semicolon,
    VarAssign,
    Tick,
    Other(char),
}

impl Operator {
    pub fn as_char(&self) -> char {
        match self {
            Self::ParenL => '(',
            Self::ParenR => ')',
            Self::Comma => ',',
            Self::Colon => ':',
            Self::Semicolon => ';',
            Self::VarAssign => '=',
            Self::Tick => '\'',
            Self::Other(c) => *c,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum VhdlToken {
    Comment(String),
    Identifier(String),
    Keyword(Keyword),
    Operator(Operator),
    Number(String),
    StringLiteral(String),
    CharLiteral(char),
    EOF,
}

impl VhdlToken {
    pub fn check_keyword(&self, kw: &Keyword) -> bool {
        match self {
            Self::Keyword(k) => k == kw,
            _ => false,
        }
    }

    pub fn check_operator(&self, op: &Operator) -> bool {
        match self {
            Self::Operator(o) => o == op,
            _ => false,
        }
    }

    /// Renders the token back to source text (comments excluded).
    pub fn to_text(&self) -> String {
        match self {
            Self::Comment(_) => String::new(),
            Self::Identifier(s) => s.to_string(),
            Self::Keyword(k) => k.to_string(),
            Self::Operator(Operator::VarAssign) => String::from(":="),
            Self::Operator(o) => o.as_char().to_string(),
            Self::Number(n) => n.to_string(),
            Self::StringLiteral(s) => format!("\"{}\"", s),
            Self::CharLiteral(c) => format!("'{}'", c),
            Self::EOF => String::new(),
        }
    }
}

/// Renders a clause's tokens into compact source text, separating word-like
/// neighbors with a space.
pub fn tokens_to_text(tokens: &[VhdlToken]) -> String {
    let mut result = String::new();
    for tk in tokens {
        let text = tk.to_text();
        if text.is_empty() == true {
            continue;
        }
        let word = |c: &char| c.is_ascii_alphanumeric() || c == &'_';
        let fuse = result.chars().last().is_some_and(|l| word(&l))
            && text.chars().next().is_some_and(|r| word(&r));
        if fuse == true {
            result.push(' ');
        }
        result.push_str(&text);
    }
    result
}

#[derive(Debug, PartialEq)]
pub struct VhdlTokenizer {
    tokens: Vec<Result<Token<VhdlToken>, TokenError<VhdlError>>>,
}

impl Tokenize for VhdlTokenizer {
    type TokenType = VhdlToken;
    type Err = VhdlError;

    fn tokenize(s: &str) -> Vec<Result<Token<Self::TokenType>, TokenError<Self::Err>>> {
        let mut train = TrainCar::new(s.chars());
        let mut tokens: Vec<Result<Token<Self::TokenType>, TokenError<Self::Err>>> = Vec::new();
        // remembers the last significant token to decide between attribute
        // ticks and character literals
        let mut last_was_value = false;
        while let Some(c) = train.consume() {
            if c.is_whitespace() == true {
                continue;
            }
            let tk_loc = train.locate().clone();
            let next = train.peek().copied();
            let token = if c.is_ascii_alphabetic() == true {
                let mut word = String::from(c);
                while let Some(n) = train.peek() {
                    if n.is_ascii_alphanumeric() == true || n == &'_' {
                        word.push(train.consume().unwrap());
                    } else {
                        break;
                    }
                }
                match Keyword::match_keyword(&word) {
                    Some(kw) => Ok(VhdlToken::Keyword(kw)),
                    None => Ok(VhdlToken::Identifier(word)),
                }
            } else if c.is_ascii_digit() == true {
                let mut num = String::from(c);
                while let Some(n) = train.peek() {
                    if n.is_ascii_alphanumeric() || n == &'_' || n == &'.' || n == &'#' {
                        num.push(train.consume().unwrap());
                    } else {
                        break;
                    }
                }
                Ok(VhdlToken::Number(num))
            } else if c == '-' && next == Some('-') {
                // single-line comment
                train.consume();
                let mut text = String::new();
                while let Some(n) = train.peek() {
                    if n == &'\n' {
                        break;
                    }
                    text.push(train.consume().unwrap());
                }
                Ok(VhdlToken::Comment(text))
            } else if c == '"' {
                let mut text = String::new();
                let mut closed = false;
                while let Some(n) = train.consume() {
                    if n == '"' {
                        closed = true;
                        break;
                    }
                    text.push(n);
                }
                match closed {
                    true => Ok(VhdlToken::StringLiteral(text)),
                    false => Err(VhdlError::UnclosedLiteral('"')),
                }
            } else if c == '\'' {
                // a tick after a value is an attribute; otherwise a char literal
                if last_was_value == true {
                    Ok(VhdlToken::Operator(Operator::Tick))
                } else {
                    let inner = train.consume();
                    match (inner, train.peek()) {
                        (Some(ch), Some('\'')) => {
                            train.consume();
                            Ok(VhdlToken::CharLiteral(ch))
                        }
                        _ => Err(VhdlError::UnclosedLiteral('\'')),
                    }
                }
            } else if c == ':' && next == Some('=') {
                train.consume();
                Ok(VhdlToken::Operator(Operator::VarAssign))
            } else {
                Ok(VhdlToken::Operator(match c {
                    '(' => Operator::ParenL,
                    ')' => Operator::ParenR,
                    ',' => Operator::Comma,
                    ':' => Operator::Colon,
                    ';' => Operator::Semicolon,
                    other if other.is_ascii_punctuation() => Operator::Other(other),
                    other => {
                        tokens.push(Err(TokenError::new(
                            VhdlError::InvalidChar(other),
                            train.locate().clone(),
                        )));
                        continue;
                    }
                }))
            };
            last_was_value = match &token {
                Ok(VhdlToken::Identifier(_))
                | Ok(VhdlToken::Number(_))
                | Ok(VhdlToken::StringLiteral(_))
                | Ok(VhdlToken::Operator(Operator::ParenR)) => true,
                _ => false,
            };
            tokens.push(token.map(|t| Token::new(t, tk_loc)).map_err(|e| {
                TokenError::new(e, train.locate().clone())
            }));
        }
        let mut tk_loc = train.locate().clone();
        tk_loc.next_col();
        tokens.push(Ok(Token::new(VhdlToken::EOF, tk_loc)));
        tokens
    }
}

impl VhdlTokenizer {
    pub fn from_source_code(s: &str) -> Self {
        Self {
            tokens: Self::tokenize(s),
        }
    }

    /// Transforms the list of results into a list of tokens, silently skipping
    /// over errors and comments.
    pub fn into_tokens(self) -> Vec<Token<VhdlToken>> {
        self.tokens
            .into_iter()
            .filter_map(|f| match f {
                Ok(t) => match t.as_type() {
                    VhdlToken::Comment(_) => None,
                    _ => Some(t),
                },
                Err(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn lex(s: &str) -> Vec<VhdlToken> {
        VhdlTokenizer::from_source_code(s)
            .into_tokens()
            .into_iter()
            .map(|t| t.take())
            .collect()
    }

    #[test]
    fn ut_keywords_case_insensitive() {
        let tokens = lex("ENTITY counter IS");
        assert_eq!(tokens[0], VhdlToken::Keyword(Keyword::Entity));
        assert_eq!(tokens[1], VhdlToken::Identifier(String::from("counter")));
        assert_eq!(tokens[2], VhdlToken::Keyword(Keyword::Is));
    }

    #[test]
    fn ut_comment_filtered() {
        let tokens = lex("-- a comment\nport");
        assert_eq!(tokens[0], VhdlToken::Keyword(Keyword::Port));
    }

    #[test]
    fn ut_char_literal_vs_attribute() {
        let tokens = lex("x := '0';");
        assert_eq!(
            tokens
                .iter()
                .find(|t| matches!(t, VhdlToken::CharLiteral('0')))
                .is_some(),
            true
        );
        // after an identifier the tick is an attribute selector
        let tokens = lex("clk'event");
        assert_eq!(tokens[1], VhdlToken::Operator(Operator::Tick));
    }

    #[test]
    fn ut_var_assign() {
        let tokens = lex("W : natural := 8");
        assert_eq!(
            tokens
                .iter()
                .find(|t| matches!(t, VhdlToken::Operator(Operator::VarAssign)))
                .is_some(),
            true
        );
    }
}
