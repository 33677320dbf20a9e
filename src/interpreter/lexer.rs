use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::Chars;
use lazy_static::lazy_static;
use crate::util;


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(line: i32, column: i32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenType {
    None,

    ParenthesisLeft, ParenthesisRight,
    Colon, Comma,

    Assign, Equal,
    Greater, GreaterEqual,
    Less, LessEqual,

    // Operators are spelled as words: pase, regate, tiro, intercepcion
    Plus, Minus, Multiply, Divide,
    And, Or,

    Identifier,
    Number,
    String,
    True, False,

    // Keywords
    Function,
    Return,
    Nop,
    If, Elif, Else,
    For, In, Range,

    Newline,
    Eof,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("jugador", TokenType::Function),
        ("remate", TokenType::Return),
        ("nada", TokenType::Nop),
        ("tarjeta", TokenType::If),
        ("amonestacion", TokenType::Elif),
        ("expulsado", TokenType::Else),
        ("delantero", TokenType::For),
        ("en", TokenType::In),
        ("rango", TokenType::Range),
        ("pase", TokenType::Plus),
        ("regate", TokenType::Minus),
        ("tiro", TokenType::Multiply),
        ("intercepcion", TokenType::Divide),
        ("and", TokenType::And),
        ("y", TokenType::And),
        ("or", TokenType::Or),
        ("o", TokenType::Or),
        ("Verdadero", TokenType::True),
        ("Falso", TokenType::False),
    ]);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    start: TokenPos, end: TokenPos,
}

impl Token {
    pub fn new(token_type: TokenType, source: String, start: TokenPos, end: TokenPos) -> Token {
        Token {
            token_type, source,
            start, end
        }
    }

    pub fn empty() -> Token {
        Token {
            token_type: TokenType::None,
            source: String::from(""),
            start: TokenPos::begin(), end: TokenPos::begin(),
        }
    }

    /// A synthetic identifier token, used for calls the driver makes itself.
    pub fn identifier(name: &str) -> Token {
        Token::new(TokenType::Identifier, name.to_owned(), TokenPos::begin(), TokenPos::begin())
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn start(&self) -> &TokenPos { &self.start }
    pub fn end(&self) -> &TokenPos { &self.end }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::None => f.write_str("None"),
            TokenType::Eof => f.write_str("end of input"),
            TokenType::Newline => f.write_str("newline"),
            TokenType::String => write!(f, "`\"{}\"`", self.source),
            _ => write!(f, "`{}`", self.source),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    #[error("{pos} Illegal character '{character}'")]
    IllegalCharacter { pos: TokenPos, character: char },
    #[error("{pos} Unterminated string")]
    UnterminatedString { pos: TokenPos },
}

pub type LexerResult<T> = Result<T, LexerError>;

/// Turns source text into tokens, one `scan_token` call at a time.
///
/// Illegal characters are reported as errors but never stop the lexer: the
/// offending character has already been skipped, so the next call carries on
/// with the rest of the input.
#[derive(Clone)]
pub struct Lexer<'source> {
    input: &'source str,

    chars: Chars<'source>,
    peek_1: Option<char>,
    peek_2: Option<char>,

    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,

    finished: bool,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,

            chars: source.chars(),
            peek_1: None,
            peek_2: None,

            start_index: 0,
            current_index: 0,

            start_pos: TokenPos::begin(),
            current_pos: TokenPos::begin(),

            finished: false,
        }
    }

    /// Scans the whole input, keeping every token and every diagnostic.
    pub fn tokenize(source: &str) -> (Vec<Token>, Vec<LexerError>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        for result in Lexer::new(source) {
            match result {
                Ok(token) => tokens.push(token),
                Err(err) => errors.push(err),
            }
        }

        (tokens, errors)
    }

    pub fn scan_token(&mut self) -> LexerResult<Token> {
        loop {
            self.skip_whitespace();
            self.start_index = self.current_index;
            self.start_pos = self.current_pos;

            let c = match self.consume() {
                Some(c) => c,
                None => return Ok(self.make_token(TokenType::Eof)),
            };

            return match c {
                '\n' => {
                    self.skip_newlines();
                    Ok(self.make_token(TokenType::Newline))
                },
                '#' => {
                    self.skip_comment();
                    continue;
                },

                '(' => Ok(self.make_token(TokenType::ParenthesisLeft)),
                ')' => Ok(self.make_token(TokenType::ParenthesisRight)),
                ':' => Ok(self.make_token(TokenType::Colon)),
                ',' => Ok(self.make_token(TokenType::Comma)),

                '=' => Ok(if self.expect('=') { self.make_token(TokenType::Equal) } else {
                    self.make_token(TokenType::Assign)
                }),
                '>' => Ok(if self.expect('=') { self.make_token(TokenType::GreaterEqual) } else {
                    self.make_token(TokenType::Greater)
                }),
                '<' => Ok(if self.expect('=') { self.make_token(TokenType::LessEqual) } else {
                    self.make_token(TokenType::Less)
                }),

                '"' => self.scan_string(),
                c if util::is_numeric(c) => Ok(self.scan_number()),
                c if util::is_alphabetic(c) => Ok(self.scan_identifier()),

                _ => Err(LexerError::IllegalCharacter { pos: self.start_pos, character: c }),
            };
        }
    }

    fn scan_string(&mut self) -> LexerResult<Token> {
        loop {
            match self.peek() {
                None => return Err(LexerError::UnterminatedString { pos: self.start_pos }),
                Some('"') => break,
                Some('\\') => {
                    // Escapes stay in the literal as written
                    self.consume();
                    self.consume();
                },
                Some(_) => {
                    self.consume();
                },
            }
        }

        self.consume(); // the trailing '"'

        // Don't add leading and trailing '"' characters to token
        Ok(Token {
            token_type: TokenType::String,
            source: self.input[(self.start_index + 1)..(self.current_index - 1)].to_owned(),
            start: self.start_pos, end: self.current_pos,
        })
    }

    fn scan_number(&mut self) -> Token {
        while let Some('0'..='9') = self.peek() {
            self.consume();
        }

        if let Some('.') = self.peek() {
            if let Some('0'..='9') = self.peek_next() {
                self.consume();

                while let Some('0'..='9') = self.peek() {
                    self.consume();
                }
            }
        }

        self.make_token(TokenType::Number)
    }

    fn scan_identifier(&mut self) -> Token {
        loop {
            while let Some(c) = self.peek() {
                if !util::is_alphanumeric(c) {
                    break;
                }

                self.consume();
            }

            // `golazo.imprimir`: a dot only continues the name if another name follows
            match (self.peek(), self.peek_next()) {
                (Some('.'), Some(c)) if util::is_alphabetic(c) => {
                    self.consume();
                },
                _ => break,
            }
        }

        let name = &self.input[self.start_index..self.current_index];
        let token_type = KEYWORDS.get(name).copied().unwrap_or(TokenType::Identifier);

        Token { source: name.to_owned(), token_type, start: self.start_pos, end: self.current_pos }
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            source: self.input[self.start_index..self.current_index].to_owned(),

            start: self.start_pos, end: self.current_pos,
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = if let Some(c) = self.peek_1.take() {
            self.peek_1 = self.peek_2.take();
            Some(c)
        } else {
            self.chars.next()
        }?;

        self.current_index += c.len_utf8();

        if c == '\n' {
            self.current_pos.line += 1;
            self.current_pos.column = 1;
        } else {
            self.current_pos.column += 1;
        }

        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        if self.peek_1.is_none() {
            self.peek_1 = self.chars.next();
        }

        self.peek_1
    }

    fn peek_next(&mut self) -> Option<char> {
        self.peek()?;

        if self.peek_2.is_none() {
            self.peek_2 = self.chars.next();
        }

        self.peek_2
    }

    fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.consume();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r') = self.peek() {
            self.consume();
        }
    }

    /// Folds a run of line breaks, including blank or comment-only lines, into the current token.
    fn skip_newlines(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                '\n' | ' ' | '\t' | '\r' => {
                    self.consume();
                },
                '#' => self.skip_comment(),
                _ => return,
            }
        }
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                return;
            }

            self.consume();
        }
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = LexerResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.scan_token();

        if let Ok(token) = &result {
            if token.token_type() == TokenType::Eof {
                self.finished = true;
            }
        }

        Some(result)
    }
}
