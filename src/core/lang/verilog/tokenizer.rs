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
use super::token::{char_set, VerilogToken};
use crate::core::lang::lexer::{Token, TokenError, Tokenize, TrainCar};

#[derive(Debug, PartialEq)]
struct VerilogElement(Result<Token<VerilogToken>, TokenError<VerilogError>>);

#[derive(Debug, PartialEq)]
pub struct VerilogTokenizer {
    tokens: Vec<VerilogElement>,
}

impl Tokenize for VerilogTokenizer {
    type TokenType = VerilogToken;
    type Err = VerilogError;

    fn tokenize(s: &str) -> Vec<Result<Token<Self::TokenType>, TokenError<Self::Err>>> {
        let mut train = TrainCar::new(s.chars());
        // store results here as we consume the characters
        let mut tokens: Vec<Result<Token<Self::TokenType>, TokenError<Self::Err>>> = Vec::new();
        // consume every character (lexical analysis)
        while let Some(c) = train.consume() {
            // skip over whitespace
            if char_set::is_whitespace(&c) == true {
                continue;
            }
            let tk_loc = train.locate().clone();
            // peek at next character
            let next = train.peek().copied();
            // add a token to the list
            tokens.push(
                if char_set::is_letter(&c) == true || char_set::UNDER_SCORE == c {
                    // collect keyword or identifier
                    match Self::TokenType::consume_word(&mut train, c) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if char_set::ESC == c {
                    // collect identifier (escaped)
                    match Self::TokenType::consume_escaped_identifier(&mut train) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if char_set::DOUBLE_QUOTE == c {
                    // collect a string literal
                    match Self::TokenType::consume_str_literal(&mut train) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if char_set::is_digit(&c) == true {
                    // collect a number
                    match Self::TokenType::consume_number(&mut train, c) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if char_set::SINGLE_QUOTE == c {
                    // collect an unsized based literal
                    match Self::TokenType::consume_tick_number(&mut train) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if char_set::FWD_SLASH == c && next == Some(char_set::FWD_SLASH) {
                    // collect single-line comment
                    match Self::TokenType::consume_oneline_comment(&mut train) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if char_set::FWD_SLASH == c && next == Some(char_set::STAR) {
                    // collect block comment
                    match Self::TokenType::consume_block_comment(&mut train) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if '(' == c && next == Some(char_set::STAR) {
                    // collect attribute instance
                    match Self::TokenType::consume_attribute(&mut train) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if char_set::DOLLAR_SIGN == c {
                    // collect system task/function identifier
                    match Self::TokenType::consume_word(&mut train, c) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if char_set::GRAVE_ACCENT == c {
                    // collect compiler directive
                    match Self::TokenType::consume_compiler_directive(&mut train) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else {
                    // collect operator/delimiter
                    match super::token::Operator::match_char(c) {
                        Some(op) => Ok(Token::new(VerilogToken::Operator(op), tk_loc)),
                        None => Err(TokenError::new(
                            VerilogError::InvalidChar(c),
                            train.locate().clone(),
                        )),
                    }
                },
            );
        }
        // push final EOF token
        let mut tk_loc = train.locate().clone();
        tk_loc.next_col();
        tokens.push(Ok(Token::new(VerilogToken::EOF, tk_loc)));
        tokens
    }
}

impl VerilogTokenizer {
    /// Generates a `VerilogTokenizer` struct from source code `s`.
    pub fn from_source_code(s: &str) -> Self {
        Self {
            tokens: Self::tokenize(s)
                .into_iter()
                .map(|f| VerilogElement(f))
                .collect(),
        }
    }

    /// Transforms the list of results into a list of tokens, silently skipping
    /// over errors and comments.
    pub fn into_tokens(self) -> Vec<Token<VerilogToken>> {
        self.tokens
            .into_iter()
            .filter_map(|f| match f.0 {
                Ok(t) => match t.as_type() {
                    VerilogToken::Comment(_) | VerilogToken::Directive(_) => None,
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

    fn lex(s: &str) -> Vec<VerilogToken> {
        VerilogTokenizer::from_source_code(s)
            .into_tokens()
            .into_iter()
            .map(|t| t.take())
            .collect()
    }

    #[test]
    fn ut_module_source() {
        let s = r#"// top of file
module toplevel(clock, reset);
    input clock;
    /* block
       comment */
    input reset;
endmodule"#;
        let tokens = lex(s);
        // comments are filtered out
        assert_eq!(
            tokens
                .iter()
                .filter(|t| matches!(t, VerilogToken::Comment(_)))
                .count(),
            0
        );
        assert_eq!(tokens.first(), Some(&VerilogToken::Keyword(super::super::token::Keyword::Module)));
        assert_eq!(tokens.last(), Some(&VerilogToken::EOF));
    }

    #[test]
    fn ut_based_literals() {
        for s in ["'h837FF;", "16'hzz;", "8'd6;", "16'b0011_0101;"] {
            let tokens = lex(s);
            assert!(
                tokens
                    .iter()
                    .any(|t| matches!(t, VerilogToken::Number(_))),
                "no number found in {}",
                s
            );
        }
    }

    #[test]
    fn ut_escaped_identifier() {
        let tokens = lex("\\cpu3 ");
        assert_eq!(tokens[0], VerilogToken::Identifier(String::from("cpu3")));
    }

    #[test]
    fn ut_attribute_is_skipped() {
        let tokens = lex("(* keep = \"true\" *) wire x;");
        assert_eq!(
            tokens[0],
            VerilogToken::Keyword(super::super::token::Keyword::Wire)
        );
    }

    #[test]
    fn ut_directive_is_skipped() {
        let tokens = lex("`timescale 1ns/1ps\nmodule m; endmodule");
        assert_eq!(
            tokens[0],
            VerilogToken::Keyword(super::super::token::Keyword::Module)
        );
    }
}
