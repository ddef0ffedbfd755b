use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::diagnostics::Diagnostics;
use crate::token::{Token, TokenType};
use crate::value::Value;

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = {
        let mut m = HashMap::new();
        m.insert("and", TokenType::And);
        m.insert("class", TokenType::Class);
        m.insert("else", TokenType::Else);
        m.insert("false", TokenType::False);
        m.insert("for", TokenType::For);
        m.insert("fun", TokenType::Fun);
        m.insert("if", TokenType::If);
        m.insert("nil", TokenType::Nil);
        m.insert("or", TokenType::Or);
        m.insert("print", TokenType::Print);
        m.insert("return", TokenType::Return);
        m.insert("super", TokenType::Super);
        m.insert("this", TokenType::This);
        m.insert("true", TokenType::True);
        m.insert("var", TokenType::Var);
        m.insert("while", TokenType::While);
        m
    };
}

pub struct Scanner<'a> {
    chars: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: u32,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &str, diagnostics: &'a mut Diagnostics) -> Scanner<'a> {
        Scanner {
            chars: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            diagnostics,
        }
    }

    /// Never fails: bad input is reported and skipped, and the result always
    /// ends with an `Eof` token.
    pub fn scan_tokens(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            // We are at the beginning of the next lexeme.
            self.start = self.current;
            self.scan_token();
        }

        self.tokens
            .push(Token::new(TokenType::Eof, "", None, self.line));
        self.tokens
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            ',' => self.add_token(TokenType::Comma),
            '.' => self.add_token(TokenType::Dot),
            '-' => self.add_token(TokenType::Minus),
            '+' => self.add_token(TokenType::Plus),
            ';' => self.add_token(TokenType::Semicolon),
            '*' => self.add_token(TokenType::Star),
            '!' => {
                let r#type = if self.matches('=') { TokenType::BangEqual } else { TokenType::Bang };
                self.add_token(r#type);
            },
            '=' => {
                let r#type = if self.matches('=') { TokenType::EqualEqual } else { TokenType::Equal };
                self.add_token(r#type);
            },
            '<' => {
                let r#type = if self.matches('=') { TokenType::LessEqual } else { TokenType::Less };
                self.add_token(r#type);
            },
            '>' => {
                let r#type = if self.matches('=') { TokenType::GreaterEqual } else { TokenType::Greater };
                self.add_token(r#type);
            },
            '/' => {
                if self.matches('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenType::Slash);
                }
            }
            ' ' | '\r' | '\t' => (),
            '\n' => self.line += 1,
            '"' => self.string(),
            _ => {
                if c.is_ascii_digit() {
                    self.number();
                } else if c.is_ascii_alphabetic() || c == '_' {
                    self.identifier();
                } else {
                    self.diagnostics.error(self.line, "Unexpected character.");
                }
            }
        }
    }

    fn identifier(&mut self) {
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        // Only the whole run is looked up, so `orchid` is never `or` + `chid`.
        let text = self.text(self.start, self.current);
        let r#type = KEYWORDS.get(text.as_str()).copied().unwrap_or(TokenType::Identifier);
        self.add_token(r#type);
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            // Consume the ".".
            self.advance();

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        match self.text(self.start, self.current).parse::<f64>() {
            Ok(value) => self.add_token_with_literal(TokenType::Number, Value::Number(value)),
            Err(_) => self.diagnostics.error(self.line, "Invalid number."),
        }
    }

    fn string(&mut self) {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.diagnostics.error(self.line, "Unterminated string.");
            return;
        }

        // The closing ".
        self.advance();

        // Trim the surrounding quotes.
        let value = self.text(self.start + 1, self.current - 1);
        self.add_token_with_literal(TokenType::String, Value::String(value.into_boxed_str()));
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.peek() != expected || self.is_at_end() {
            return false;
        }

        self.current += 1;
        true
    }

    fn peek(&self) -> char {
        self.chars.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.chars.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.current += 1;
        c
    }

    fn add_token(&mut self, r#type: TokenType) {
        let text = self.text(self.start, self.current);
        self.tokens.push(Token::new(r#type, &text, None, self.line));
    }

    fn add_token_with_literal(&mut self, r#type: TokenType, literal: Value) {
        let text = self.text(self.start, self.current);
        self.tokens
            .push(Token::new(r#type, &text, Some(literal), self.line));
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    /// Source text between two char offsets.
    fn text(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }
}
