//! Scanner for Lox
//!
//! Converts source text into a flat, EOF-terminated sequence of tokens.
//! Lexical errors are collected as the scanner goes; a scan always runs
//! to the end of input.

use log::{debug, trace};

use crate::frontend::token::{Literal, Token, TokenKind};
use crate::utils::{Error, Span};

/// Everything one scan produced
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanResult {
    /// Tokens in source order, always ending with a single EOF
    pub tokens: Vec<Token>,
    /// Lexical errors in the order they were found
    pub errors: Vec<Error>,
}

impl ScanResult {
    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Scan a whole source text with a fresh scanner
pub fn scan(source: &str) -> ScanResult {
    Scanner::new(source).scan_tokens()
}

/// The scanner state, owned by a single scan
pub struct Scanner<'a> {
    /// Original text, lexemes are sliced from it
    text: &'a str,
    /// Characters paired with their byte offsets
    source: Vec<(usize, char)>,
    /// Current position (character index)
    pos: usize,
    /// Start position of current token
    start: usize,
    line: usize,
    column: usize,
    start_line: usize,
    start_column: usize,
    tokens: Vec<Token>,
    errors: Vec<Error>,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given source code
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            source: text.char_indices().collect(),
            pos: 0,
            start: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Scan the entire source and return all tokens and errors
    pub fn scan_tokens(mut self) -> ScanResult {
        while !self.is_at_end() {
            self.start = self.pos;
            self.start_line = self.line;
            self.start_column = self.column;
            self.scan_token();
        }

        let end = self.text.len();
        self.tokens.push(Token::eof(Span::new(end, end, self.line, self.column)));

        debug!(
            "scanned {} tokens over {} lines, {} errors",
            self.tokens.len(),
            self.line,
            self.errors.len()
        );

        ScanResult { tokens: self.tokens, errors: self.errors }
    }

    /// Get the current character without advancing
    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).map(|&(_, c)| c)
    }

    /// Get the next character without advancing
    fn peek_next(&self) -> Option<char> {
        self.source.get(self.pos + 1).map(|&(_, c)| c)
    }

    /// Advance to the next character, keeping line and column current
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consume the next character only if it is `expected`
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Byte offset of a character index
    fn byte_offset(&self, pos: usize) -> usize {
        self.source.get(pos).map_or(self.text.len(), |&(offset, _)| offset)
    }

    /// Create a span from start to current position
    fn make_span(&self) -> Span {
        Span::new(
            self.byte_offset(self.start),
            self.byte_offset(self.pos),
            self.start_line,
            self.start_column,
        )
    }

    fn lexeme(&self) -> &'a str {
        let text = self.text;
        &text[self.byte_offset(self.start)..self.byte_offset(self.pos)]
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.add_literal_token(kind, None);
    }

    fn add_literal_token(&mut self, kind: TokenKind, literal: Option<Literal>) {
        let token = Token::new(kind, self.lexeme(), literal, self.make_span());
        trace!("token {}", token);
        self.tokens.push(token);
    }

    fn error(&mut self, error: Error) {
        debug!("{}", error.report());
        self.errors.push(error);
    }

    fn scan_token(&mut self) {
        let Some(c) = self.advance() else {
            return;
        };

        match c {
            // Line counting happens in advance()
            '\n' => {}
            c if c.is_whitespace() => {}
            '/' if self.peek() == Some('/') => self.skip_line_comment(),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.read_identifier(),
            '"' => self.read_string(),
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            ';' => self.add_token(TokenKind::Semicolon),
            '+' => self.add_token(TokenKind::Plus),
            '-' => self.add_token(TokenKind::Minus),
            '*' => self.add_token(TokenKind::Star),
            '/' => self.add_token(TokenKind::Slash),
            '=' => {
                let kind = if self.match_char('=') { TokenKind::EqualEqual } else { TokenKind::Equal };
                self.add_token(kind);
            }
            '!' => {
                let kind = if self.match_char('=') { TokenKind::BangEqual } else { TokenKind::Bang };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.match_char('=') { TokenKind::LessEqual } else { TokenKind::Less };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.match_char('=') { TokenKind::GreaterEqual } else { TokenKind::Greater };
                self.add_token(kind);
            }
            ch => {
                let span = self.make_span();
                self.error(Error::UnexpectedCharacter { ch, span });
            }
        }
    }

    /// Skip a `//` comment, leaving the newline for the main loop
    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let kind = TokenKind::keyword_from_str(self.lexeme()).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }

    fn consume_digits(&mut self) {
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Read a number literal
    fn read_number(&mut self) {
        self.consume_digits();

        // A trailing `.` is only part of the number when a digit follows it
        if self.peek() == Some('.') && self.peek_next().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
            self.consume_digits();
        }

        let literal = canonical_number(self.lexeme());
        self.add_literal_token(TokenKind::Number, Some(Literal::Number(literal)));
    }

    /// Read a string literal; the opening quote is already consumed
    fn read_string(&mut self) {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            self.advance();
        }

        if self.is_at_end() {
            let span = self.make_span();
            self.error(Error::UnterminatedString { span });
            return;
        }

        self.advance(); // closing quote

        let text = self.text;
        let value = text[self.byte_offset(self.start + 1)..self.byte_offset(self.pos - 1)].to_string();
        self.add_literal_token(TokenKind::String, Some(Literal::String(value)));
    }
}

/// Canonical decimal text for a number lexeme
///
/// Integers gain `.0`; fractional parts lose trailing zeros but keep at
/// least one digit (`45.670` -> `45.67`, `45.000` -> `45.0`).
pub fn canonical_number(lexeme: &str) -> String {
    match lexeme.split_once('.') {
        None => format!("{}.0", lexeme),
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{}.0", whole)
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::token::TokenKind::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source).tokens.into_iter().map(|t| t.kind).collect()
    }

    fn literal(token: &Token) -> Option<&str> {
        match &token.literal {
            Some(Literal::Number(s)) | Some(Literal::String(s)) => Some(s.as_str()),
            None => None,
        }
    }

    fn assert_eof(token: &Token) {
        assert_eq!(token.kind, Eof);
        assert_eq!(token.lexeme, "");
        assert_eq!(token.literal, None);
    }

    #[test]
    fn test_empty_and_whitespace_inputs_yield_only_eof() {
        for source in ["", "   ", "\n\n\t \r\n", "// only a comment"] {
            let result = scan(source);
            assert!(!result.had_error());
            assert_eq!(result.tokens.len(), 1, "source {:?}", source);
            assert_eof(&result.tokens[0]);
        }
    }

    #[test]
    fn test_single_char_tokens() {
        assert_eq!(
            kinds("(){},.;+-*/"),
            vec![
                LeftParen, RightParen, LeftBrace, RightBrace, Comma, Dot, Semicolon, Plus, Minus,
                Star, Slash, Eof
            ]
        );
    }

    #[test]
    fn test_two_char_tokens() {
        assert_eq!(
            kinds("! != = == < <= > >="),
            vec![Bang, BangEqual, Equal, EqualEqual, Less, LessEqual, Greater, GreaterEqual, Eof]
        );
        assert_eq!(kinds("1 == 2 != 3"), vec![Number, EqualEqual, Number, BangEqual, Number, Eof]);
        assert_eq!(kinds("1 = 2"), vec![Number, Equal, Number, Eof]);
        assert_eq!(kinds("==="), vec![EqualEqual, Equal, Eof]);
    }

    #[test]
    fn test_integer_number() {
        let result = scan("123");
        assert_eq!(result.tokens.len(), 2);
        assert_eq!(result.tokens[0].kind, Number);
        assert_eq!(result.tokens[0].lexeme, "123");
        assert_eq!(literal(&result.tokens[0]), Some("123.0"));
        assert_eof(&result.tokens[1]);
    }

    #[test]
    fn test_fractional_number_is_canonicalized() {
        let result = scan("45.670;");
        assert_eq!(result.tokens.len(), 3);
        assert_eq!(result.tokens[0].lexeme, "45.670");
        assert_eq!(literal(&result.tokens[0]), Some("45.67"));
        assert_eq!(result.tokens[1].kind, Semicolon);
        assert_eq!(result.tokens[1].lexeme, ";");
        assert_eof(&result.tokens[2]);
    }

    #[test]
    fn test_canonical_number() {
        assert_eq!(canonical_number("0"), "0.0");
        assert_eq!(canonical_number("45.000"), "45.0");
        assert_eq!(canonical_number("1.50"), "1.5");
        assert_eq!(canonical_number("3.14"), "3.14");
        assert_eq!(canonical_number("200"), "200.0");
    }

    #[test]
    fn test_dot_without_digit_is_not_part_of_number() {
        let result = scan("1.foo 2.");
        let lexemes: Vec<&str> = result.tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["1", ".", "foo", "2", ".", ""]);
        assert_eq!(kinds("1.foo 2."), vec![Number, Dot, Identifier, Number, Dot, Eof]);
    }

    #[test]
    fn test_var_declaration() {
        let result = scan("var x = 10;");
        assert!(!result.had_error());
        let rendered: Vec<_> = result.tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "VAR var null",
                "IDENTIFIER x null",
                "EQUAL = null",
                "NUMBER 10 10.0",
                "SEMICOLON ; null",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("and class else false for fun if nil or print return super this true var while"),
            vec![
                And, Class, Else, False, For, Fun, If, Nil, Or, Print, Return, Super, This, True,
                Var, While, Eof
            ]
        );
        assert_eq!(
            kinds("orchid _var Var var_1 x2"),
            vec![Identifier, Identifier, Identifier, Identifier, Identifier, Eof]
        );
    }

    #[test]
    fn test_string_literal() {
        let result = scan("\"hello world\"");
        assert_eq!(result.tokens[0].kind, String);
        assert_eq!(result.tokens[0].lexeme, "\"hello world\"");
        assert_eq!(literal(&result.tokens[0]), Some("hello world"));

        let result = scan(r#""a\nb""#);
        assert_eq!(literal(&result.tokens[0]), Some(r"a\nb"));

        let result = scan("\"\"");
        assert_eq!(result.tokens[0].lexeme, "\"\"");
        assert_eq!(literal(&result.tokens[0]), Some(""));
    }

    #[test]
    fn test_multiline_string_advances_line() {
        let result = scan("\"one\ntwo\"\nvar");
        assert_eq!(result.tokens[0].kind, String);
        assert_eq!(result.tokens[0].line(), 1);
        assert_eq!(result.tokens[1].kind, Var);
        assert_eq!(result.tokens[1].line(), 3);
    }

    #[test]
    fn test_unterminated_string() {
        let result = scan("\"unterminated");
        assert!(result.had_error());
        assert_eq!(result.tokens.len(), 1);
        assert_eof(&result.tokens[0]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].report(), "[line 1] Error: Unterminated string.");
    }

    #[test]
    fn test_unterminated_string_reports_opening_line() {
        let result = scan("var a;\n\"abc\ndef");
        assert_eq!(kinds("var a;\n\"abc\ndef"), vec![Var, Identifier, Semicolon, Eof]);
        assert_eq!(result.errors[0].line(), 2);
    }

    #[test]
    fn test_unexpected_characters_do_not_stop_scanning() {
        let result = scan(",.$(#\n@");
        assert_eq!(
            result.tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![Comma, Dot, LeftParen, Eof]
        );
        let reports: Vec<_> = result.errors.iter().map(|e| e.report()).collect();
        assert_eq!(
            reports,
            vec![
                "[line 1] Error: Unexpected character: $",
                "[line 1] Error: Unexpected character: #",
                "[line 2] Error: Unexpected character: @",
            ]
        );
    }

    #[test]
    fn test_non_ascii_character_is_unexpected() {
        let result = scan("é1");
        assert_eq!(result.errors, vec![Error::UnexpectedCharacter { ch: 'é', span: Span::new(0, 2, 1, 1) }]);
        assert_eq!(result.tokens[0].lexeme, "1");
        assert_eq!(result.tokens[0].span, Span::new(2, 3, 1, 2));
    }

    #[test]
    fn test_comment_only_advances_line_by_its_newline() {
        let result = scan("// comment\nvar");
        assert_eq!(result.tokens.len(), 2);
        assert_eq!(result.tokens[0].kind, Var);
        assert_eq!(result.tokens[0].line(), 2);
    }

    #[test]
    fn test_slash_followed_by_comment() {
        assert_eq!(kinds("a / b // c / d\n/"), vec![Identifier, Slash, Identifier, Slash, Eof]);
    }

    #[test]
    fn test_line_and_column_tracking() {
        let result = scan("var a\n  = 1;\n\nprint a;");
        let positions: Vec<(usize, usize)> =
            result.tokens.iter().map(|t| (t.span.line, t.span.column)).collect();
        assert_eq!(
            positions,
            vec![(1, 1), (1, 5), (2, 3), (2, 5), (2, 6), (4, 1), (4, 7), (4, 8), (4, 9)]
        );
    }

    #[test]
    fn test_lexemes_round_trip_through_spans() {
        let source = "  fun add(a, b) {\n  return a+b >= 10.50; // sum\n}\nprint \"ok ✓\";\n";
        let result = scan(source);
        assert!(!result.had_error());
        for token in &result.tokens {
            assert_eq!(&source[token.span.start..token.span.end], token.lexeme);
            if token.kind != Eof {
                assert!(!token.lexeme.is_empty());
            }
        }
        assert_eq!(result.tokens.last().map(|t| t.span.start), Some(source.len()));
    }

    #[test]
    fn test_scanning_is_idempotent() {
        let source = "var s = \"x\";\n$ 1.20 >= 3 // done\n\"open";
        assert_eq!(scan(source), scan(source));
    }
}
