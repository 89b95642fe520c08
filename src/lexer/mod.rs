//! Character-level scanner producing positioned tokens with one-token
//! lookahead.
//!
//! The scanner walks the raw bytes of the source buffer, tracking a
//! 1-based line/column pair. Carriage returns are ignored entirely, so
//! Windows line endings do not shift column counts.

pub mod token;

use crate::{
    common::{
        error::{CompileError, CompileResult, Diagnostic},
        Position,
    },
    fileio::input::SourceFile,
};
use token::{Keyword, Token, TokenKind, SYMBOLS};

pub struct Lexer<'s> {
    file: String,
    class_name: &'s str,
    src: &'s str,
    pos: usize,
    line: usize,
    column: usize,
    current: Token<'s>,
    peeked: Option<Token<'s>>,
}

impl<'s> Lexer<'s> {
    /// Build a lexer over a loaded source file and scan the first token.
    pub fn new(source: &'s SourceFile) -> CompileResult<Self> {
        let mut lexer = Self {
            file: source.display_path(),
            class_name: source.class_name(),
            src: source.content(),
            pos: 0,
            line: 1,
            column: 1,
            current: Token::new(TokenKind::EndOfFile, Position::new(1, 1)),
            peeked: None,
        };
        lexer.current = lexer.fetch_next()?;
        Ok(lexer)
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Base name of the source file; the declared class must match it.
    pub fn class_name(&self) -> &'s str {
        self.class_name
    }

    pub const fn current(&self) -> Token<'s> {
        self.current
    }

    pub fn has_more(&self) -> bool {
        self.current.kind != TokenKind::EndOfFile
    }

    /// One-token lookahead; `current` is not discarded.
    pub fn peek(&mut self) -> CompileResult<Token<'s>> {
        if let Some(token) = self.peeked {
            return Ok(token);
        }
        let token = self.fetch_next()?;
        self.peeked = Some(token);
        Ok(token)
    }

    /// Promote the lookahead when one is pending, otherwise scan the next
    /// token. Past end of file this is a no-op.
    pub fn advance(&mut self) -> CompileResult<()> {
        if let Some(token) = self.peeked.take() {
            self.current = token;
            return Ok(());
        }
        if !self.has_more() {
            return Ok(());
        }
        self.current = self.fetch_next()?;
        Ok(())
    }

    /// A syntax failure pinned to an explicit position; used by the parser.
    pub fn syntax_error_at(&self, position: Position, message: &str) -> CompileError {
        CompileError::Syntax(Diagnostic::new(&self.file, position, message))
    }

    fn lexical_error_at(&self, position: Position, message: impl Into<String>) -> CompileError {
        CompileError::Lexical(Diagnostic::new(&self.file, position, message))
    }

    fn lexical_error_here(&self, message: impl Into<String>) -> CompileError {
        self.lexical_error_at(Position::new(self.line, self.column), message)
    }

    fn fetch_next(&mut self) -> CompileResult<Token<'s>> {
        self.skip_whitespace_and_comments()?;
        self.next_token()
    }

    fn advance_char(&mut self) {
        if self.pos >= self.src.len() {
            return;
        }
        let c = self.src.as_bytes()[self.pos];
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
            self.column = 1;
        } else if c != b'\r' {
            self.column += 1;
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> CompileResult<()> {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() {
            let c = bytes[self.pos];

            if c.is_ascii_whitespace() {
                self.advance_char();
                continue;
            }

            // line comment: //
            if c == b'/' && bytes.get(self.pos + 1) == Some(&b'/') {
                self.advance_char();
                self.advance_char();
                while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
                    self.advance_char();
                }
                continue;
            }

            // block comment: /* ... */
            if c == b'/' && bytes.get(self.pos + 1) == Some(&b'*') {
                self.advance_char();
                self.advance_char();
                while self.pos + 1 < bytes.len()
                    && !(bytes[self.pos] == b'*' && bytes[self.pos + 1] == b'/')
                {
                    self.advance_char();
                }
                if self.pos + 1 >= bytes.len() {
                    return Err(self.lexical_error_here("Unterminated block comment"));
                }
                self.advance_char();
                self.advance_char();
                continue;
            }

            break;
        }
        Ok(())
    }

    fn next_token(&mut self) -> CompileResult<Token<'s>> {
        if self.pos >= self.src.len() {
            return Ok(Token::new(
                TokenKind::EndOfFile,
                Position::new(self.line, self.column),
            ));
        }

        let position = Position::new(self.line, self.column);
        let c = self.src.as_bytes()[self.pos];

        if c.is_ascii() && SYMBOLS.contains(c as char) {
            self.advance_char();
            return Ok(Token::new(TokenKind::Symbol(c as char), position));
        }

        if c == b'"' {
            return self.read_string(position);
        }

        if c.is_ascii_digit() {
            return self.read_number(position);
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            return Ok(self.read_identifier_or_keyword(position));
        }

        let unexpected = self.src[self.pos..].chars().next().unwrap_or('\0');
        Err(self.lexical_error_here(format!("Unexpected character: '{unexpected}'")))
    }

    fn read_string(&mut self, position: Position) -> CompileResult<Token<'s>> {
        self.advance_char(); // opening quote

        let start = self.pos;
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos] != b'"' {
            if bytes[self.pos] == b'\n' || bytes[self.pos] == b'\r' {
                return Err(self.lexical_error_at(position, "Newline in string"));
            }
            self.advance_char();
        }

        if self.pos >= bytes.len() {
            return Err(self.lexical_error_at(position, "Unterminated string constant"));
        }

        let text = &self.src[start..self.pos];
        self.advance_char(); // closing quote
        Ok(Token::new(TokenKind::StringConst(text), position))
    }

    fn read_number(&mut self, position: Position) -> CompileResult<Token<'s>> {
        let bytes = self.src.as_bytes();
        let mut value: u16 = 0;

        while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
            let digit = u16::from(bytes[self.pos] - b'0');
            // checked before the multiply-and-add: anything past 32767
            // fails at the offending digit
            if value > 3276 || (value == 3276 && digit > 7) {
                return Err(
                    self.lexical_error_at(position, "Integer constant too large (max 32767)")
                );
            }
            value = value * 10 + digit;
            self.advance_char();
        }

        Ok(Token::new(TokenKind::IntConst(value), position))
    }

    fn read_identifier_or_keyword(&mut self, position: Position) -> Token<'s> {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len()
            && (bytes[self.pos].is_ascii_alphanumeric() || bytes[self.pos] == b'_')
        {
            self.advance_char();
        }

        let text = &self.src[start..self.pos];
        match Keyword::lookup(text) {
            Some(keyword) => Token::new(TokenKind::Keyword(keyword), position),
            None => Token::new(TokenKind::Identifier(text), position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        token::{Keyword, TokenKind},
        Lexer,
    };
    use crate::{common::error::CompileError, fileio::input::SourceFile};

    fn lexer_over(source: &SourceFile) -> Lexer<'_> {
        Lexer::new(source).expect("first token should scan")
    }

    fn collect_kinds(source: &SourceFile) -> Vec<String> {
        let mut lexer = lexer_over(source);
        let mut kinds = Vec::new();
        while lexer.has_more() {
            kinds.push(format!("{:?}", lexer.current().kind));
            lexer.advance().expect("token should scan");
        }
        kinds
    }

    #[test]
    fn test_token_stream() {
        let source = SourceFile::from_content("Main.jack", "let x = x + 1;");

        assert_eq!(
            collect_kinds(&source),
            vec![
                "Keyword(Let)",
                "Identifier(\"x\")",
                "Symbol('=')",
                "Identifier(\"x\")",
                "Symbol('+')",
                "IntConst(1)",
                "Symbol(';')",
            ]
        );
    }

    #[test]
    fn test_positions_track_lines_and_columns() {
        let source = SourceFile::from_content("Main.jack", "class Main {\n  field int x;\n}");
        let mut lexer = lexer_over(&source);

        assert_eq!(lexer.current().kind, TokenKind::Keyword(Keyword::Class));
        assert_eq!((lexer.current().position.line, lexer.current().position.column), (1, 1));

        lexer.advance().expect("identifier");
        assert_eq!((lexer.current().position.line, lexer.current().position.column), (1, 7));

        lexer.advance().expect("brace");
        lexer.advance().expect("field");
        assert_eq!(lexer.current().kind, TokenKind::Keyword(Keyword::Field));
        assert_eq!((lexer.current().position.line, lexer.current().position.column), (2, 3));
    }

    #[test]
    fn test_comments_are_skipped() {
        let source = SourceFile::from_content(
            "Main.jack",
            "// leading\n/* block\n   spanning lines */ return; // trailing",
        );

        assert_eq!(
            collect_kinds(&source),
            vec!["Keyword(Return)", "Symbol(';')"]
        );
    }

    #[test]
    fn test_peek_then_advance_promotes() {
        let source = SourceFile::from_content("Main.jack", "a [ 3 ]");
        let mut lexer = lexer_over(&source);

        assert_eq!(lexer.current().kind, TokenKind::Identifier("a"));
        assert_eq!(lexer.peek().expect("peek").kind, TokenKind::Symbol('['));
        // current unchanged by peek
        assert_eq!(lexer.current().kind, TokenKind::Identifier("a"));

        lexer.advance().expect("advance");
        assert_eq!(lexer.current().kind, TokenKind::Symbol('['));
        lexer.advance().expect("advance");
        assert_eq!(lexer.current().kind, TokenKind::IntConst(3));
    }

    #[test]
    fn test_integer_boundaries() {
        let source = SourceFile::from_content("Main.jack", "0 32767");
        assert_eq!(collect_kinds(&source), vec!["IntConst(0)", "IntConst(32767)"]);

        let source = SourceFile::from_content("Main.jack", "let x = 32768;");
        let mut lexer = lexer_over(&source);
        let error = loop {
            match lexer.advance() {
                Ok(()) => {}
                Err(error) => break error,
            }
        };
        let CompileError::Lexical(diagnostic) = error else {
            panic!("expected a lexical error");
        };
        assert_eq!(diagnostic.message, "Integer constant too large (max 32767)");
        assert_eq!((diagnostic.position.line, diagnostic.position.column), (1, 9));
    }

    #[test]
    fn test_string_constants() {
        let source = SourceFile::from_content("Main.jack", "\"hello there\"");
        let lexer = lexer_over(&source);

        assert_eq!(lexer.current().kind, TokenKind::StringConst("hello there"));
    }

    #[test]
    fn test_newline_in_string_is_fatal() {
        let source = SourceFile::from_content("Main.jack", "\"broken\nstring\"");

        let Err(CompileError::Lexical(diagnostic)) = Lexer::new(&source) else {
            panic!("expected a lexical error");
        };
        assert_eq!(diagnostic.message, "Newline in string");
    }

    #[test]
    fn test_unterminated_string_is_fatal() {
        let source = SourceFile::from_content("Main.jack", "\"no closing quote");

        let Err(CompileError::Lexical(diagnostic)) = Lexer::new(&source) else {
            panic!("expected a lexical error");
        };
        assert_eq!(diagnostic.message, "Unterminated string constant");
    }

    #[test]
    fn test_unterminated_block_comment_is_fatal() {
        let source = SourceFile::from_content("Main.jack", "/* never closed");

        let Err(CompileError::Lexical(diagnostic)) = Lexer::new(&source) else {
            panic!("expected a lexical error");
        };
        assert_eq!(diagnostic.message, "Unterminated block comment");
    }

    #[test]
    fn test_unexpected_character_is_fatal() {
        let source = SourceFile::from_content("Main.jack", "let x = 1 ? 2;");
        let mut lexer = lexer_over(&source);
        let error = loop {
            match lexer.advance() {
                Ok(()) => {}
                Err(error) => break error,
            }
        };
        let CompileError::Lexical(diagnostic) = error else {
            panic!("expected a lexical error");
        };
        assert_eq!(diagnostic.message, "Unexpected character: '?'");
    }

    #[test]
    fn test_empty_file_starts_at_end_of_file() {
        let source = SourceFile::from_content("Main.jack", "  // nothing here\n");
        let lexer = lexer_over(&source);

        assert_eq!(lexer.current().kind, TokenKind::EndOfFile);
        assert!(!lexer.has_more());
    }
}
