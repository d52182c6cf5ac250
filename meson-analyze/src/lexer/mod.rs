use anyhow::{bail, Context, Result};

use crate::source::SourceFile;

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Token {
    fn new(
        kind: TokenKind,
        lexeme: String,
        (line, column): (usize, usize),
        (end_line, end_column): (usize, usize),
    ) -> Self {
        Self {
            kind,
            lexeme,
            line,
            column,
            end_line,
            end_column,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier,
    IntegerLiteral(i64),
    StringLiteral(String),
    FormatString(String),
    BooleanLiteral(bool),
    Keyword(Keyword),
    Newline,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Colon,
    Question,
    Equal,
    DoubleEqual,
    Bang,
    BangEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Plus,
    PlusEqual,
    Minus,
    MinusEqual,
    Star,
    StarEqual,
    Slash,
    SlashEqual,
    Percent,
    PercentEqual,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    If,
    Elif,
    Else,
    Endif,
    Foreach,
    Endforeach,
    Break,
    Continue,
    And,
    Or,
    Not,
    In,
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    nesting: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a SourceFile) -> Self {
        Self::from_str(&source.contents)
    }

    pub fn from_str(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            line: 0,
            column: 0,
            nesting: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek_char() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance_char();
                }
                '\n' => {
                    let start = self.here();
                    self.advance_char();
                    // Inside brackets a newline is plain whitespace.
                    if self.nesting == 0 {
                        tokens.push(Token::new(
                            TokenKind::Newline,
                            "\n".to_string(),
                            start,
                            (start.0, start.1 + 1),
                        ));
                    }
                }
                '\\' if self.peek_next_char() == Some('\n') => {
                    self.advance_char();
                    self.advance_char();
                }
                '#' => self.skip_comment(),
                '\'' => tokens.push(self.lex_string(false)?),
                'f' if self.peek_next_char() == Some('\'') => {
                    self.advance_char();
                    let mut token = self.lex_string(true)?;
                    token.column -= 1;
                    token.lexeme.insert(0, 'f');
                    tokens.push(token);
                }
                '0'..='9' => tokens.push(self.lex_number()?),
                'a'..='z' | 'A'..='Z' | '_' => tokens.push(self.lex_identifier_or_keyword()),
                '(' | '[' | '{' => {
                    self.nesting += 1;
                    let kind = match ch {
                        '(' => TokenKind::LParen,
                        '[' => TokenKind::LBracket,
                        _ => TokenKind::LBrace,
                    };
                    tokens.push(self.simple_token(kind));
                }
                ')' | ']' | '}' => {
                    self.nesting = self.nesting.saturating_sub(1);
                    let kind = match ch {
                        ')' => TokenKind::RParen,
                        ']' => TokenKind::RBracket,
                        _ => TokenKind::RBrace,
                    };
                    tokens.push(self.simple_token(kind));
                }
                ',' => tokens.push(self.simple_token(TokenKind::Comma)),
                '.' => tokens.push(self.simple_token(TokenKind::Dot)),
                ':' => tokens.push(self.simple_token(TokenKind::Colon)),
                '?' => tokens.push(self.simple_token(TokenKind::Question)),
                '=' => tokens.push(self.lex_with_equal(TokenKind::Equal, TokenKind::DoubleEqual)),
                '!' => tokens.push(self.lex_with_equal(TokenKind::Bang, TokenKind::BangEqual)),
                '>' => {
                    tokens.push(self.lex_with_equal(TokenKind::Greater, TokenKind::GreaterEqual))
                }
                '<' => tokens.push(self.lex_with_equal(TokenKind::Less, TokenKind::LessEqual)),
                '+' => tokens.push(self.lex_with_equal(TokenKind::Plus, TokenKind::PlusEqual)),
                '-' => tokens.push(self.lex_with_equal(TokenKind::Minus, TokenKind::MinusEqual)),
                '*' => tokens.push(self.lex_with_equal(TokenKind::Star, TokenKind::StarEqual)),
                '/' => tokens.push(self.lex_with_equal(TokenKind::Slash, TokenKind::SlashEqual)),
                '%' => {
                    tokens.push(self.lex_with_equal(TokenKind::Percent, TokenKind::PercentEqual))
                }
                other => {
                    bail!(
                        "Unexpected character '{}' at line {}, column {}",
                        other,
                        self.line,
                        self.column
                    );
                }
            }
        }

        let end = self.here();
        tokens.push(Token::new(TokenKind::Eof, String::new(), end, end));

        Ok(tokens)
    }

    fn here(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == '\n' {
                break;
            }
            self.advance_char();
        }
    }

    fn lex_string(&mut self, is_format: bool) -> Result<Token> {
        if self.input[self.position..].starts_with("'''") {
            return self.lex_multiline_string(is_format);
        }

        let start = self.position;
        let start_pos = self.here();
        self.advance_char(); // consume opening quote

        let mut value = String::new();
        while let Some(ch) = self.peek_char() {
            match ch {
                '\'' => {
                    self.advance_char();
                    let lexeme = self.slice(start, self.position).to_string();
                    let kind = if is_format {
                        TokenKind::FormatString(value)
                    } else {
                        TokenKind::StringLiteral(value)
                    };
                    return Ok(Token::new(kind, lexeme, start_pos, self.here()));
                }
                '\\' => {
                    self.advance_char();
                    let escaped = self
                        .peek_char()
                        .context("Unterminated escape sequence in string literal")?;
                    let escaped_char = match escaped {
                        '\'' => '\'',
                        '\\' => '\\',
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        other => {
                            value.push('\\');
                            other
                        }
                    };
                    value.push(escaped_char);
                    self.advance_char();
                }
                '\n' => {
                    bail!(
                        "Unterminated string literal starting at line {}, column {}",
                        start_pos.0,
                        start_pos.1
                    );
                }
                _ => {
                    value.push(ch);
                    self.advance_char();
                }
            }
        }

        bail!(
            "Unterminated string literal starting at line {}, column {}",
            start_pos.0,
            start_pos.1
        );
    }

    fn lex_multiline_string(&mut self, is_format: bool) -> Result<Token> {
        let start = self.position;
        let start_pos = self.here();
        for _ in 0..3 {
            self.advance_char();
        }

        let body_start = self.position;
        while self.peek_char().is_some() {
            if self.input[self.position..].starts_with("'''") {
                let value = self.slice(body_start, self.position).to_string();
                for _ in 0..3 {
                    self.advance_char();
                }
                let lexeme = self.slice(start, self.position).to_string();
                let kind = if is_format {
                    TokenKind::FormatString(value)
                } else {
                    TokenKind::StringLiteral(value)
                };
                return Ok(Token::new(kind, lexeme, start_pos, self.here()));
            }
            self.advance_char();
        }

        bail!(
            "Unterminated multi-line string starting at line {}, column {}",
            start_pos.0,
            start_pos.1
        );
    }

    fn lex_number(&mut self) -> Result<Token> {
        let start = self.position;
        let start_pos = self.here();

        let radix = match (self.peek_char(), self.peek_next_char()) {
            (Some('0'), Some('x' | 'X')) => 16,
            (Some('0'), Some('o' | 'O')) => 8,
            (Some('0'), Some('b' | 'B')) => 2,
            _ => 10,
        };
        if radix != 10 {
            self.advance_char();
            self.advance_char();
        }
        let digits_start = self.position;

        while let Some(ch) = self.peek_char() {
            if ch.is_digit(radix) {
                self.advance_char();
            } else {
                break;
            }
        }

        let digits = self.slice(digits_start, self.position);
        let value = i64::from_str_radix(digits, radix).with_context(|| {
            format!(
                "Failed to parse integer literal '{}' at line {}, column {}",
                self.slice(start, self.position),
                start_pos.0,
                start_pos.1
            )
        })?;
        Ok(Token::new(
            TokenKind::IntegerLiteral(value),
            self.slice(start, self.position).to_string(),
            start_pos,
            self.here(),
        ))
    }

    fn lex_identifier_or_keyword(&mut self) -> Token {
        let start = self.position;
        let start_pos = self.here();
        self.advance_char();

        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance_char();
            } else {
                break;
            }
        }

        let lexeme = self.slice(start, self.position).to_string();
        let kind = if let Some(keyword) = keyword_from_lexeme(&lexeme) {
            TokenKind::Keyword(keyword)
        } else if lexeme == "true" {
            TokenKind::BooleanLiteral(true)
        } else if lexeme == "false" {
            TokenKind::BooleanLiteral(false)
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, lexeme, start_pos, self.here())
    }

    fn lex_with_equal(&mut self, plain: TokenKind, with_equal: TokenKind) -> Token {
        let start = self.position;
        let start_pos = self.here();
        self.advance_char();

        let kind = if self.peek_char() == Some('=') {
            self.advance_char();
            with_equal
        } else {
            plain
        };
        Token::new(
            kind,
            self.slice(start, self.position).to_string(),
            start_pos,
            self.here(),
        )
    }

    fn simple_token(&mut self, kind: TokenKind) -> Token {
        let start = self.position;
        let start_pos = self.here();
        self.advance_char();
        Token::new(
            kind,
            self.slice(start, self.position).to_string(),
            start_pos,
            self.here(),
        )
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_next_char(&self) -> Option<char> {
        let mut iter = self.input[self.position..].chars();
        iter.next()?;
        iter.next()
    }

    fn advance_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn slice(&self, start: usize, end: usize) -> &str {
        &self.input[start..end]
    }
}

fn keyword_from_lexeme(lexeme: &str) -> Option<Keyword> {
    match lexeme {
        "if" => Some(Keyword::If),
        "elif" => Some(Keyword::Elif),
        "else" => Some(Keyword::Else),
        "endif" => Some(Keyword::Endif),
        "foreach" => Some(Keyword::Foreach),
        "endforeach" => Some(Keyword::Endforeach),
        "break" => Some(Keyword::Break),
        "continue" => Some(Keyword::Continue),
        "and" => Some(Keyword::And),
        "or" => Some(Keyword::Or),
        "not" => Some(Keyword::Not),
        "in" => Some(Keyword::In),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::from_str(input)
            .tokenize()
            .expect("tokenize")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn newlines_inside_brackets_are_skipped() {
        assert_eq!(
            kinds("x = [\n  1,\n]\n"),
            vec![
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::LBracket,
                TokenKind::IntegerLiteral(1),
                TokenKind::Comma,
                TokenKind::RBracket,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_string_flavours() {
        assert_eq!(
            kinds("'a\\'b' f'@x@' '''multi\nline'''"),
            vec![
                TokenKind::StringLiteral("a'b".to_string()),
                TokenKind::FormatString("@x@".to_string()),
                TokenKind::StringLiteral("multi\nline".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_integer_radixes() {
        assert_eq!(
            kinds("0x1F 0o17 0b101 42"),
            vec![
                TokenKind::IntegerLiteral(31),
                TokenKind::IntegerLiteral(15),
                TokenKind::IntegerLiteral(5),
                TokenKind::IntegerLiteral(42),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn positions_are_zero_based() {
        let tokens = Lexer::from_str("a\n  bcd += 1")
            .tokenize()
            .expect("tokenize");
        let bcd = &tokens[2];
        assert_eq!((bcd.line, bcd.column), (1, 2));
        assert_eq!((bcd.end_line, bcd.end_column), (1, 5));
        assert_eq!(tokens[3].kind, TokenKind::PlusEqual);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let error = Lexer::from_str("x = 'abc\n").tokenize().unwrap_err();
        assert!(error.to_string().contains("Unterminated string literal"));
    }
}
