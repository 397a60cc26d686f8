//! Scanner turning source text into tokens.

use crate::error::LexerError;
use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

/// The lexer transforms source code into a stream of tokens.
pub struct Scanner<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    line: usize,
    column: usize,
    start_pos: usize,
    start_line: usize,
    start_column: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            column: 1,
            start_pos: 0,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Scan all tokens from the source.
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.scan_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    /// Scan the next token.
    pub fn scan_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace_and_comments();
        self.mark_start();

        let Some((_, c)) = self.advance() else {
            return Ok(Token::eof(self.current_pos, self.line, self.column));
        };

        match c {
            '(' => Ok(self.make_token(TokenKind::LeftParen)),
            ')' => Ok(self.make_token(TokenKind::RightParen)),
            '{' => Ok(self.make_token(TokenKind::LeftBrace)),
            '}' => Ok(self.make_token(TokenKind::RightBrace)),
            ',' => Ok(self.make_token(TokenKind::Comma)),
            ';' => Ok(self.make_token(TokenKind::Semicolon)),
            '+' => Ok(self.make_token(TokenKind::Plus)),
            '-' => Ok(self.make_token(TokenKind::Minus)),
            '*' => Ok(self.make_token(TokenKind::Star)),
            '/' => Ok(self.make_token(TokenKind::Slash)),
            '%' => Ok(self.make_token(TokenKind::Percent)),
            '=' => Ok(self.make_token(TokenKind::Equal)),
            '"' | '\'' => self.scan_string(c),
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' || c == '$' => self.scan_identifier(),
            c => Err(LexerError::UnexpectedChar(c, self.current_span())),
        }
    }

    fn scan_string(&mut self, quote: char) -> Result<Token, LexerError> {
        let mut value = String::new();

        loop {
            let Some((_, c)) = self.advance() else {
                return Err(LexerError::UnterminatedString(self.current_span()));
            };

            match c {
                c if c == quote => break,
                '\n' => return Err(LexerError::UnterminatedString(self.current_span())),
                '\\' => {
                    let Some((_, escaped)) = self.advance() else {
                        return Err(LexerError::UnterminatedString(self.current_span()));
                    };
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '\\' => value.push('\\'),
                        '"' => value.push('"'),
                        '\'' => value.push('\''),
                        c => return Err(LexerError::InvalidEscape(c, self.current_span())),
                    }
                }
                c => value.push(c),
            }
        }

        Ok(self.make_token(TokenKind::StringLiteral(value)))
    }

    fn scan_number(&mut self) -> Result<Token, LexerError> {
        // Radix prefixes: 0x, 0o, 0b.
        let first = self.source.as_bytes()[self.start_pos];
        if first == b'0' {
            if let Some(radix) = match self.peek() {
                Some('x') | Some('X') => Some(16),
                Some('o') | Some('O') => Some(8),
                Some('b') | Some('B') => Some(2),
                _ => None,
            } {
                self.advance();
                while self.peek().is_some_and(|c| c.is_digit(radix)) {
                    self.advance();
                }
                let lexeme = self.lexeme().to_string();
                let digits = &lexeme[2..];
                let value = u64::from_str_radix(digits, radix)
                    .map_err(|_| LexerError::InvalidNumber(lexeme.clone(), self.current_span()))?;
                return Ok(self.make_token(TokenKind::NumberLiteral {
                    lexeme,
                    value: value as f64,
                }));
            }
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            let after = match self.peek_at(1) {
                Some('+') | Some('-') => self.peek_at(2),
                c => c,
            };
            if after.is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.advance();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let lexeme = self.lexeme().to_string();
        let value = lexeme
            .parse::<f64>()
            .map_err(|_| LexerError::InvalidNumber(lexeme.clone(), self.current_span()))?;
        Ok(self.make_token(TokenKind::NumberLiteral { lexeme, value }))
    }

    fn scan_identifier(&mut self) -> Result<Token, LexerError> {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.advance();
        }

        let name = self.lexeme();
        let kind = TokenKind::keyword(name)
            .unwrap_or_else(|| TokenKind::Identifier(name.to_string()));
        Ok(self.make_token(kind))
    }

    // ===== Character manipulation =====

    fn advance(&mut self) -> Option<(usize, char)> {
        let (pos, c) = self.chars.next()?;
        self.current_pos = pos + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some((pos, c))
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.source[self.current_pos..].chars().nth(n)
    }

    fn mark_start(&mut self) {
        self.start_pos = self.current_pos;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    fn lexeme(&self) -> &str {
        &self.source[self.start_pos..self.current_pos]
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.current_span())
    }

    fn current_span(&self) -> Span {
        Span::new(
            self.start_pos,
            self.current_pos,
            self.start_line,
            self.start_column,
        )
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            None => break,
                            Some('*') if self.peek_at(1) == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            _ => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::new(source)
            .scan_tokens()
            .expect("lexer error")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_operators_and_delimiters() {
        assert_eq!(
            kinds("+ - * / % = ( ) { } , ;"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Equal,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_number_keeps_lexeme() {
        assert_eq!(
            kinds("123"),
            vec![
                TokenKind::NumberLiteral {
                    lexeme: "123".to_string(),
                    value: 123.0
                },
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("1.25e2"),
            vec![
                TokenKind::NumberLiteral {
                    lexeme: "1.25e2".to_string(),
                    value: 125.0
                },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_radix_prefixes() {
        assert_eq!(
            kinds("0x10 0o17 0b101"),
            vec![
                TokenKind::NumberLiteral {
                    lexeme: "0x10".to_string(),
                    value: 16.0
                },
                TokenKind::NumberLiteral {
                    lexeme: "0o17".to_string(),
                    value: 15.0
                },
                TokenKind::NumberLiteral {
                    lexeme: "0b101".to_string(),
                    value: 5.0
                },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_and_literals() {
        assert_eq!(
            kinds("var null undefined true false"),
            vec![
                TokenKind::Var,
                TokenKind::Null,
                TokenKind::Undefined,
                TokenKind::BoolLiteral(true),
                TokenKind::BoolLiteral(false),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_nan_and_infinity_are_number_tokens() {
        let tokens = kinds("NaN Infinity");
        match &tokens[0] {
            TokenKind::NumberLiteral { lexeme, value } => {
                assert_eq!(lexeme, "NaN");
                assert!(value.is_nan());
            }
            other => panic!("expected number literal, got {:?}", other),
        }
        assert_eq!(
            tokens[1],
            TokenKind::NumberLiteral {
                lexeme: "Infinity".to_string(),
                value: f64::INFINITY
            }
        );
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(
            kinds(r#""hello" 'a\nb'"#),
            vec![
                TokenKind::StringLiteral("hello".to_string()),
                TokenKind::StringLiteral("a\nb".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = Scanner::new("\"abc").scan_tokens().unwrap_err();
        assert!(matches!(err, LexerError::UnterminatedString(_)));
    }

    #[test]
    fn test_unexpected_char() {
        let err = Scanner::new("@").scan_tokens().unwrap_err();
        assert!(matches!(err, LexerError::UnexpectedChar('@', _)));
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("1 // line\n/* block */ 2"),
            vec![
                TokenKind::NumberLiteral {
                    lexeme: "1".to_string(),
                    value: 1.0
                },
                TokenKind::NumberLiteral {
                    lexeme: "2".to_string(),
                    value: 2.0
                },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_spans_track_lines() {
        let tokens = Scanner::new("1\n  x").scan_tokens().unwrap();
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.column, 3);
    }
}
