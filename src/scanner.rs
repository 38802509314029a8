use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::{Error, ScanError};
use crate::literal::Literal;
use crate::token::{Token, Type};

/// Converts source text into an ordered sequence of tokens ending with a
/// single `EOF`. Errors are non-fatal: an unexpected character or an
/// unterminated literal is reported through [`ScanError`] and scanning
/// continues, so that a single pass can surface every lexical problem in
/// the source at once.
pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    lexeme: String,
    line: usize,
    occurrence: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: Vec::new(),
            lexeme: String::new(),
            line: 1,
            occurrence: 0,
        }
    }

    /// Scans the entire source and returns the resulting tokens.
    pub fn scan_tokens(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.lexeme.clear();
            self.scan_token();
        }

        self.lexeme.clear();
        self.add_token(Type::EOF, None);
        self.tokens
    }

    fn is_at_end(&mut self) -> bool {
        self.source.peek().is_none()
    }

    fn advance(&mut self) -> char {
        let c = self.source.next().expect("advance past end of source");
        self.lexeme.push(c);
        c
    }

    fn peek(&mut self) -> char {
        self.source.peek().copied().unwrap_or('\0')
    }

    fn peek_next(&mut self) -> char {
        self.source.peek_next().copied().unwrap_or('\0')
    }

    /// Consumes the next character if it matches `expected`.
    fn matches(&mut self, expected: char) -> bool {
        if self.peek() != expected {
            return false;
        }
        self.advance();
        true
    }

    fn add_token(&mut self, r#type: Type, literal: Option<Literal>) {
        self.occurrence += 1;
        self.tokens.push(Token::new(
            r#type,
            self.lexeme.clone(),
            literal,
            self.line,
            self.occurrence,
        ));
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '(' => self.add_token(Type::LeftParen, None),
            ')' => self.add_token(Type::RightParen, None),
            '{' => self.add_token(Type::LeftBrace, None),
            '}' => self.add_token(Type::RightBrace, None),
            ',' => self.add_token(Type::Comma, None),
            '.' => self.add_token(Type::Dot, None),
            '-' => self.add_token(Type::Minus, None),
            '+' => self.add_token(Type::Plus, None),
            ';' => self.add_token(Type::Semicolon, None),
            '*' => self.add_token(Type::Star, None),
            '?' => self.add_token(Type::Question, None),
            ':' => self.add_token(Type::Colon, None),

            '!' => {
                let kind = if self.matches('=') { Type::BangEqual } else { Type::Bang };
                self.add_token(kind, None);
            },
            '=' => {
                let kind = if self.matches('=') { Type::EqualEqual } else { Type::Equal };
                self.add_token(kind, None);
            },
            '<' => {
                let kind = if self.matches('=') { Type::LessEqual } else { Type::Less };
                self.add_token(kind, None);
            },
            '>' => {
                let kind = if self.matches('=') { Type::GreaterEqual } else { Type::Greater };
                self.add_token(kind, None);
            },

            '/' => {
                if self.matches('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else if self.matches('*') {
                    self.block_comment();
                } else {
                    self.add_token(Type::Slash, None);
                }
            },

            ' ' | '\r' | '\t' => {},

            '\n' => {
                self.line += 1;
            },

            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(),

            c if c.is_alphabetic() || c == '_' => self.identifier(),

            c => {
                ScanError {
                    line: self.line,
                    message: format!("Unexpected character '{c}'."),
                }.throw();
            },
        }
    }

    /// Consumes a block comment opened by `/*`. Non-nesting: the comment
    /// ends at the first `*/`, even if `/*` appears again inside it.
    fn block_comment(&mut self) {
        while !(self.peek() == '*' && self.peek_next() == '/') && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            return;
        }

        self.advance();
        self.advance();
    }

    fn string(&mut self) {
        let start_line = self.line;

        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            ScanError {
                line: start_line,
                message: "Unterminated string.".to_string(),
            }.throw();
            return;
        }

        self.advance(); // closing quote

        // Trim the surrounding quotes; the lexeme keeps them, the literal does not.
        let value = self.lexeme[1..self.lexeme.len() - 1].to_string();
        self.add_token(Type::String, Some(Literal::String(value)));
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance(); // the '.'
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let value: f64 = self.lexeme.parse().expect("scanned digits to parse as a number");
        self.add_token(Type::Number, Some(Literal::Number(value)));
    }

    fn identifier(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let kind = match self.lexeme.as_str() {
            "and" => Type::And,
            "class" => Type::Class,
            "else" => Type::Else,
            "false" => Type::False,
            "for" => Type::For,
            "fun" => Type::Fun,
            "if" => Type::If,
            "nil" => Type::Nil,
            "or" => Type::Or,
            "print" => Type::Print,
            "return" => Type::Return,
            "super" => Type::Super,
            "this" => Type::This,
            "true" => Type::True,
            "var" => Type::Var,
            "while" => Type::While,
            "break" => Type::Break,
            _ => Type::Identifier,
        };

        self.add_token(kind, None);
    }
}
