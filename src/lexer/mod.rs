pub mod token;

use memchr::memchr;
use token::{Token, TokenKind, TokenValue};

use crate::span::Span;

/// Reentrant scanner handle over one source unit. Holds no global
/// state; independent parses each own their own `Lexer`.
pub struct Lexer<'src> {
    src: &'src str,
    input: &'src [u8],
    cursor: usize,
    line: u32,
    column: u32,
    pending_error: Option<&'static str>,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            input: src.as_bytes(),
            cursor: 0,
            line: 1,
            column: 1,
            pending_error: None,
        }
    }

    /// Message for the most recent `TokenKind::Error` token. The parser
    /// drains this into a `LexicalError` diagnostic.
    pub fn take_error_message(&mut self) -> Option<&'static str> {
        self.pending_error.take()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.cursor).copied()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.input.get(self.cursor + n).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.cursor..].chars().next()
    }

    /// Consume one character. The cursor moves by the character's UTF-8
    /// width so it always stays on a char boundary; columns count
    /// characters, not bytes.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.cursor += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => self.advance(),
                Some(b'#') => {
                    // Line comment: jump to the next newline.
                    let rest = &self.src[self.cursor..];
                    match memchr(b'\n', rest.as_bytes()) {
                        Some(off) => {
                            self.column += rest[..off].chars().count() as u32;
                            self.cursor += off;
                        }
                        None => {
                            self.column += rest.chars().count() as u32;
                            self.cursor = self.input.len();
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn read_identifier(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == b'_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Pull the next token. Never fails: lexical defects come back as a
    /// recoverable `TokenKind::Error` token with a precise span.
    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_trivia();

        let start = self.cursor;
        let first_line = self.line;
        let first_column = self.column;

        let Some(c) = self.peek() else {
            return Token {
                kind: TokenKind::Eof,
                value: TokenValue::None,
                span: Span::new(self.line, self.column, self.line, self.column, ""),
            };
        };

        let (kind, value) = match c {
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => {
                self.read_identifier();
                let text = &self.src[start..self.cursor];
                self.classify_word(text)
            }
            b'0'..=b'9' => self.read_number(start),
            b'"' => self.read_string(start),
            b'\'' => self.read_char(),
            b'<' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    (TokenKind::Leq, TokenValue::None)
                } else {
                    (TokenKind::Lt, TokenValue::None)
                }
            }
            b'>' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    (TokenKind::Beq, TokenValue::None)
                } else {
                    (TokenKind::Gt, TokenValue::None)
                }
            }
            b'=' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    (TokenKind::Eq, TokenValue::None)
                } else {
                    (TokenKind::Assign, TokenValue::None)
                }
            }
            b'!' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    (TokenKind::Neq, TokenValue::None)
                } else {
                    self.pending_error = Some("unrecognized character");
                    (TokenKind::Error, TokenValue::None)
                }
            }
            b'+' => {
                self.advance();
                (TokenKind::Plus, TokenValue::None)
            }
            b'-' => {
                self.advance();
                (TokenKind::Minus, TokenValue::None)
            }
            b'*' => {
                self.advance();
                (TokenKind::Star, TokenValue::None)
            }
            b'/' => {
                self.advance();
                (TokenKind::Slash, TokenValue::None)
            }
            b'(' => {
                self.advance();
                (TokenKind::OpenParen, TokenValue::None)
            }
            b')' => {
                self.advance();
                (TokenKind::CloseParen, TokenValue::None)
            }
            b'[' => {
                self.advance();
                (TokenKind::OpenBracket, TokenValue::None)
            }
            b']' => {
                self.advance();
                (TokenKind::CloseBracket, TokenValue::None)
            }
            b',' => {
                self.advance();
                (TokenKind::Comma, TokenValue::None)
            }
            b';' => {
                self.advance();
                (TokenKind::SemiColon, TokenValue::None)
            }
            b'.' => {
                self.advance();
                (TokenKind::Dot, TokenValue::None)
            }
            _ => {
                self.advance();
                self.pending_error = Some("unrecognized character");
                (TokenKind::Error, TokenValue::None)
            }
        };

        let text = &self.src[start..self.cursor];
        Token {
            kind,
            value,
            span: Span::new(first_line, first_column, self.line, self.column, text),
        }
    }

    fn classify_word(&self, text: &'src str) -> (TokenKind, TokenValue<'src>) {
        let kind = match text {
            "INT" => TokenKind::Int,
            "FLOAT" => TokenKind::Float,
            "CHAR" => TokenKind::Char,
            "STRING" => TokenKind::String,
            "BOOL" => TokenKind::Bool,
            "VOID" => TokenKind::Void,
            "TRUE" => TokenKind::True,
            "FALSE" => TokenKind::False,
            "NOT" => TokenKind::Not,
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            "IF" => TokenKind::If,
            "BEGINIF" => TokenKind::BeginIf,
            "ENDIF" => TokenKind::EndIf,
            "ELSE" => TokenKind::Else,
            "BEGINELSE" => TokenKind::BeginElse,
            "ENDELSE" => TokenKind::EndElse,
            "FOR" => TokenKind::For,
            "ENDFOR" => TokenKind::EndFor,
            "WHILE" => TokenKind::While,
            "ENDWHILE" => TokenKind::EndWhile,
            "CLASS" => TokenKind::Class,
            "ENDCLASS" => TokenKind::EndClass,
            "CONST" => TokenKind::Const,
            "BG" => TokenKind::Bg,
            "BGNP" => TokenKind::Bgnp,
            "BGNF" => TokenKind::Bgnf,
            "ENDF" => TokenKind::EndF,
            "RET" => TokenKind::Ret,
            "OF" => TokenKind::Of,
            "IN" => TokenKind::In,
            "WITH" => TokenKind::With,
            "CRAFT" => TokenKind::Craft,
            "BSTOW" => TokenKind::Bstow,
            "ENCH" => TokenKind::Ench,
            "SACRF" => TokenKind::Sacrf,
            "TIME" => TokenKind::Time,
            "CHNT" => TokenKind::Chnt,
            "EVAL" => TokenKind::Eval,
            _ => return (TokenKind::Id, TokenValue::Ident(text)),
        };
        (kind, TokenValue::None)
    }

    fn read_number(&mut self, start: usize) -> (TokenKind, TokenValue<'src>) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.advance();
        }

        let mut is_float = false;
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            is_float = true;
            self.advance();
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.advance();
            }
        }

        // A letter glued onto a number is a malformed literal, not two
        // tokens. Consume the whole run so recovery lands cleanly.
        if matches!(self.peek(), Some(c) if c.is_ascii_alphabetic() || c == b'_') {
            while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
                self.advance();
            }
            self.pending_error = Some("malformed numeric literal");
            return (TokenKind::Error, TokenValue::None);
        }

        let text = &self.src[start..self.cursor];
        if is_float {
            match text.parse::<f64>() {
                Ok(v) => (TokenKind::Nrf, TokenValue::Float(v)),
                Err(_) => {
                    self.pending_error = Some("malformed numeric literal");
                    (TokenKind::Error, TokenValue::None)
                }
            }
        } else {
            match text.parse::<i64>() {
                Ok(v) => (TokenKind::Nr, TokenValue::Int(v)),
                Err(_) => {
                    self.pending_error = Some("integer literal out of range");
                    (TokenKind::Error, TokenValue::None)
                }
            }
        }
    }

    fn read_string(&mut self, start: usize) -> (TokenKind, TokenValue<'src>) {
        self.advance(); // opening quote
        loop {
            match self.peek() {
                Some(b'"') => {
                    let inner = &self.src[start + 1..self.cursor];
                    self.advance();
                    return (TokenKind::Str, TokenValue::Str(inner));
                }
                Some(b'\\') => {
                    self.advance();
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                Some(_) => self.advance(),
                None => {
                    self.pending_error = Some("unterminated string literal");
                    return (TokenKind::Error, TokenValue::None);
                }
            }
        }
    }

    fn read_char(&mut self) -> (TokenKind, TokenValue<'src>) {
        self.advance(); // opening quote
        let value = match self.peek() {
            Some(b'\\') => {
                self.advance();
                let escaped = match self.peek() {
                    Some(b'n') => '\n',
                    Some(b't') => '\t',
                    Some(b'r') => '\r',
                    Some(b'0') => '\0',
                    Some(b'\\') => '\\',
                    Some(b'\'') => '\'',
                    Some(b'"') => '"',
                    _ => {
                        self.pending_error = Some("malformed character literal");
                        if self.peek().is_some() {
                            self.advance();
                        }
                        return (TokenKind::Error, TokenValue::None);
                    }
                };
                self.advance();
                escaped
            }
            Some(b'\'') | None => {
                self.pending_error = Some("malformed character literal");
                if self.peek().is_some() {
                    self.advance();
                }
                return (TokenKind::Error, TokenValue::None);
            }
            Some(_) => {
                let c = self.peek_char().unwrap_or('\0');
                self.advance();
                c
            }
        };
        if self.peek() == Some(b'\'') {
            self.advance();
            (TokenKind::Chr, TokenValue::Char(value))
        } else {
            self.pending_error = Some("malformed character literal");
            (TokenKind::Error, TokenValue::None)
        }
    }
}
