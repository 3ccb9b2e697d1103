//! Character-level scanner for tokenizing frond source.

use super::token::{Span, Spanned, Token};
use crate::error::{LexError, Result};

/// The scanner for frond source code.
pub struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    source_len: usize,
    current_pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            source_len: source.len(),
            current_pos: 0,
        }
    }

    /// Tokenize the entire source.
    pub fn tokenize(mut self) -> Result<Vec<Spanned<Token>>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.value == Token::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    /// Get the next token from the source.
    pub fn next_token(&mut self) -> Result<Spanned<Token>> {
        self.skip_whitespace_and_comments();

        let start = self.current_pos;

        let Some((_, ch)) = self.peek() else {
            return Ok(Spanned::new(Token::Eof, Span::new(start, start)));
        };

        let token = match ch {
            '(' => {
                self.advance();
                Token::LParen
            }
            ')' => {
                self.advance();
                Token::RParen
            }
            '{' => {
                self.advance();
                Token::LBrace
            }
            '}' => {
                self.advance();
                Token::RBrace
            }
            '[' => {
                self.advance();
                Token::LBracket
            }
            ']' => {
                self.advance();
                Token::RBracket
            }
            ',' => {
                self.advance();
                Token::Comma
            }
            ':' => {
                self.advance();
                Token::Colon
            }
            '.' => {
                self.advance();
                Token::Dot
            }
            '\\' => {
                self.advance();
                Token::Backslash
            }
            '=' => {
                self.advance();
                Token::Equals
            }
            '*' => {
                self.advance();
                Token::Star
            }
            '^' => {
                self.advance();
                Token::Caret
            }
            '→' => {
                self.advance();
                Token::Arrow
            }
            '+' => {
                self.advance();
                if self.peek_is('+') {
                    self.advance();
                    Token::PlusPlus
                } else {
                    Token::Plus
                }
            }
            '-' => {
                self.advance();
                if self.peek_is('>') {
                    self.advance();
                    Token::Arrow
                } else {
                    return Err(LexError::UnexpectedCharacter {
                        ch: '-',
                        span: Span::new(start, self.current_pos),
                    }
                    .into());
                }
            }
            '&' => {
                self.advance();
                if self.peek_is('>') {
                    self.advance();
                    Token::AmpGt
                } else {
                    return Err(LexError::UnexpectedCharacter {
                        ch: '&',
                        span: Span::new(start, self.current_pos),
                    }
                    .into());
                }
            }
            '"' => self.scan_string(start)?,
            c if c.is_ascii_digit() => self.scan_number(start)?,
            c if c.is_alphabetic() || c == '_' => self.scan_name(),
            c => {
                self.advance();
                return Err(LexError::UnexpectedCharacter {
                    ch: c,
                    span: Span::new(start, self.current_pos),
                }
                .into());
            }
        };

        Ok(Spanned::new(token, Span::new(start, self.current_pos)))
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn peek_is(&mut self, expected: char) -> bool {
        matches!(self.peek(), Some((_, c)) if c == expected)
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, ch) = self.chars.next()?;
        self.current_pos = pos + ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some((_, c)) if c.is_whitespace() => {
                    self.advance();
                }
                // `--` starts a line comment. A lone `-` is left for
                // next_token, which scans it as part of `->` or rejects it.
                Some((_, '-')) => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    if matches!(lookahead.peek(), Some((_, '-'))) {
                        while let Some((_, c)) = self.peek() {
                            if c == '\n' {
                                break;
                            }
                            self.advance();
                        }
                    } else {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    fn scan_string(&mut self, start: usize) -> Result<Token> {
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.advance() {
                None => {
                    return Err(LexError::UnterminatedString {
                        span: Span::new(start, self.source_len),
                    }
                    .into());
                }
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('\\') => value.push('\\'),
                    Some('"') => value.push('"'),
                    _ => {
                        return Err(LexError::InvalidEscapeSequence {
                            span: Span::new(start, self.current_pos),
                        }
                        .into());
                    }
                },
                Some(c) => value.push(c),
            }
        }

        Ok(Token::String(value))
    }

    fn scan_number(&mut self, start: usize) -> Result<Token> {
        let mut text = String::new();

        while let Some((_, c)) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if self.peek_is('.') {
            // Only consume the dot when a digit follows, so `1.foo`
            // stays a field access.
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if matches!(lookahead.peek(), Some((_, c)) if c.is_ascii_digit()) {
                text.push('.');
                self.advance();
                while let Some((_, c)) = self.peek() {
                    if c.is_ascii_digit() {
                        text.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| {
                LexError::InvalidNumber {
                    span: Span::new(start, self.current_pos),
                }
                .into()
            })
    }

    fn scan_name(&mut self) -> Token {
        let mut name = String::new();

        while let Some((_, c)) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }

        match name.as_str() {
            "when" => Token::When,
            "is" => Token::Is,
            "else" => Token::Else,
            _ => {
                if name.chars().next().is_some_and(|c| c.is_uppercase()) {
                    Token::Tag(name)
                } else {
                    Token::Ident(name)
                }
            }
        }
    }
}
