//! Lexer for the Glint language.
//!
//! Converts source text into a stream of tokens with accurate line/column
//! positions. Comments are stripped before position tracking: a line
//! comment is absorbed up to (and including returning) its terminating
//! newline, and every character of a block comment is replaced by a space,
//! so columns stay aligned and line counts stay correct.
//!
//! # Features
//! - Single-line (`//`) and multi-line (`/* */`) comments
//! - Automatic semicolon insertion at newlines and end of source
//! - Bounded character and token lookahead for the parser
//!
//! # Example
//! ```
//! use glint_syntax::lexer::Lexer;
//! use glint_syntax::token::TokenKind;
//!
//! let mut lexer = Lexer::new("example.gt", "var x = 42");
//! let token = lexer.get_token().unwrap();
//! assert!(matches!(token.kind, TokenKind::Var));
//! ```

use std::collections::{HashMap, VecDeque};
use std::str::Chars;

use glint_common::{GlintError, GlintResult, SrcSpan};
use once_cell::sync::Lazy;

use crate::token::{Token, TokenKind};

/// Comment-filtered characters the lexer keeps buffered for lookahead.
/// The grammar needs at most three (`<<=` and `...`).
pub const CHAR_LOOKAHEAD: usize = 3;

/// Tokens the lexer keeps buffered for the parser's lookahead.
/// The receiver grammar needs two.
pub const TOKEN_LOOKAHEAD: usize = 2;

/// Keyword table, consulted once per identifier-shaped lexeme.
static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    HashMap::from([
        ("break", TokenKind::Break),
        ("case", TokenKind::Case),
        ("chan", TokenKind::Chan),
        ("const", TokenKind::Const),
        ("continue", TokenKind::Continue),
        ("default", TokenKind::Default),
        ("defer", TokenKind::Defer),
        ("else", TokenKind::Else),
        ("fallthrough", TokenKind::Fallthrough),
        ("for", TokenKind::For),
        ("func", TokenKind::Func),
        ("go", TokenKind::Go),
        ("goto", TokenKind::Goto),
        ("if", TokenKind::If),
        ("import", TokenKind::Import),
        ("interface", TokenKind::Interface),
        ("map", TokenKind::Map),
        ("package", TokenKind::Package),
        ("range", TokenKind::Range),
        ("return", TokenKind::Return),
        ("select", TokenKind::Select),
        ("struct", TokenKind::Struct),
        ("switch", TokenKind::Switch),
        ("type", TokenKind::Type),
        ("var", TokenKind::Var),
    ])
});

/// The Glint lexer.
pub struct Lexer<'a> {
    /// Name of the source file, for diagnostics.
    filename: String,
    /// The remaining raw character stream.
    chars: Chars<'a>,
    /// One-character raw pushback, filled when comment detection reads
    /// one character too far.
    pushback: Option<char>,
    /// True while inside a `/* ... */` comment.
    in_block_comment: bool,
    /// True in a block comment if the previous character was an asterisk.
    prev_star: bool,
    /// Comment-filtered characters waiting to be consumed.
    /// Stays within CHAR_LOOKAHEAD entries.
    lookahead: VecDeque<char>,
    /// Already-lexed tokens waiting to be consumed.
    /// Stays within TOKEN_LOOKAHEAD entries.
    tokens: VecDeque<Token>,
    /// Current span: `start` is where the token being lexed began, `end`
    /// is the position of the next unconsumed character.
    pos: SrcSpan,
    /// Kind of the most recently lexed token, for semicolon insertion.
    prev_kind: Option<TokenKind>,
    /// Whether the end-of-source semicolon has already been inserted.
    eof_semi: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source text.
    pub fn new(filename: impl Into<String>, source: &'a str) -> Self {
        Self {
            filename: filename.into(),
            chars: source.chars(),
            pushback: None,
            in_block_comment: false,
            prev_star: false,
            lookahead: VecDeque::with_capacity(CHAR_LOOKAHEAD),
            tokens: VecDeque::with_capacity(TOKEN_LOOKAHEAD),
            pos: SrcSpan::start_of_file(),
            prev_kind: None,
            eof_semi: false,
        }
    }

    /// The name of the file being lexed.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Character stream
    // ═══════════════════════════════════════════════════════════════════════

    /// Read the next raw character, honoring the pushback slot.
    fn raw_char(&mut self) -> Option<char> {
        self.pushback.take().or_else(|| self.chars.next())
    }

    /// Read the next character with comments removed.
    ///
    /// A line comment is absorbed up to its newline, which is returned so
    /// the caller still counts the line. Block comment characters become
    /// spaces, except newlines, which pass through unmodified.
    fn filtered_char(&mut self) -> Option<char> {
        let ch = self.raw_char()?;

        if self.in_block_comment {
            return Some(match ch {
                '\n' => {
                    self.prev_star = false;
                    '\n'
                }
                '*' => {
                    self.prev_star = true;
                    ' '
                }
                '/' => {
                    if self.prev_star {
                        self.in_block_comment = false;
                    }
                    ' '
                }
                _ => {
                    self.prev_star = false;
                    ' '
                }
            });
        }

        if ch == '/' {
            match self.raw_char() {
                // a slash at end of source is just a slash
                None => Some('/'),
                Some('/') => {
                    // comment until end of line; keep the newline
                    loop {
                        match self.raw_char() {
                            None => return None,
                            Some('\n') => return Some('\n'),
                            Some(_) => {}
                        }
                    }
                }
                Some('*') => {
                    // both opener characters become spaces so column
                    // counts stay aligned
                    self.pushback = Some(' ');
                    self.in_block_comment = true;
                    self.prev_star = false;
                    Some(' ')
                }
                Some(other) => {
                    // not a comment at all
                    self.pushback = Some(other);
                    Some('/')
                }
            }
        } else {
            Some(ch)
        }
    }

    /// Peek at the nth not-yet-consumed, comment-filtered character
    /// without advancing the position.
    fn peek_char(&mut self, ahead: usize) -> Option<char> {
        debug_assert!(ahead < CHAR_LOOKAHEAD, "no token needs deeper character lookahead");
        while self.lookahead.len() <= ahead {
            let ch = self.filtered_char()?;
            self.lookahead.push_back(ch);
        }
        Some(self.lookahead[ahead])
    }

    /// Consume one filtered character, advancing line/column counts.
    fn next_char(&mut self) -> Option<char> {
        let ch = match self.lookahead.pop_front() {
            Some(c) => c,
            None => self.filtered_char()?,
        };
        if ch == '\n' {
            self.pos.end.line += 1;
            self.pos.end.column = 1;
        } else {
            self.pos.end.column += 1;
        }
        Some(ch)
    }

    /// Throw away characters the operator table has already matched.
    fn toss_chars(&mut self, how_many: usize) {
        for _ in 0..how_many {
            self.next_char();
        }
    }

    /// Skip whitespace. Returns an inserted semicolon token when a newline
    /// terminates a token that ends a statement.
    fn skip_whitespace(&mut self) -> Option<Token> {
        loop {
            match self.peek_char(0) {
                None => return None,
                Some('\n') => {
                    if self.should_insert_semi() {
                        let semi = Token::new(TokenKind::Semi, SrcSpan::point(self.pos.end));
                        self.next_char();
                        self.prev_kind = Some(TokenKind::Semi);
                        return Some(semi);
                    }
                    self.next_char();
                }
                Some(' ' | '\t' | '\r') => {
                    self.next_char();
                }
                Some(_) => return None,
            }
        }
    }

    /// Whether the previous token should trigger automatic semicolon
    /// insertion: identifiers, literals, `break`/`continue`/`fallthrough`/
    /// `return`, `++`/`--`, and closing delimiters.
    fn should_insert_semi(&self) -> bool {
        match &self.prev_kind {
            Some(kind) => matches!(
                kind,
                TokenKind::Ident(_)
                    | TokenKind::Int(_)
                    | TokenKind::Float(_)
                    | TokenKind::String(_)
                    | TokenKind::Rune(_)
                    | TokenKind::Break
                    | TokenKind::Continue
                    | TokenKind::Fallthrough
                    | TokenKind::Return
                    | TokenKind::Inc
                    | TokenKind::Dec
                    | TokenKind::RParen
                    | TokenKind::RBracket
                    | TokenKind::RBrace
            ),
            None => false,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Token stream
    // ═══════════════════════════════════════════════════════════════════════

    /// Get the next token, consuming it.
    pub fn get_token(&mut self) -> GlintResult<Token> {
        if let Some(tok) = self.tokens.pop_front() {
            return Ok(tok);
        }
        self.lex_token()
    }

    /// Peek at the token `ahead` positions from the next one, without
    /// consuming anything.
    pub fn peek_token(&mut self, ahead: usize) -> GlintResult<&Token> {
        debug_assert!(ahead < TOKEN_LOOKAHEAD, "no production needs deeper token lookahead");
        while self.tokens.len() <= ahead {
            let tok = self.lex_token()?;
            self.tokens.push_back(tok);
        }
        Ok(&self.tokens[ahead])
    }

    /// Lex one token from the character stream.
    fn lex_token(&mut self) -> GlintResult<Token> {
        if let Some(semi) = self.skip_whitespace() {
            return Ok(semi);
        }

        self.pos.start = self.pos.end;

        let ch = match self.peek_char(0) {
            Some(c) => c,
            None => {
                // end of source; the last statement still gets its semicolon
                if !self.eof_semi && self.should_insert_semi() {
                    self.eof_semi = true;
                    self.prev_kind = Some(TokenKind::Semi);
                    return Ok(Token::new(TokenKind::Semi, SrcSpan::point(self.pos.end)));
                }
                self.prev_kind = Some(TokenKind::Eof);
                return Ok(Token::new(TokenKind::Eof, SrcSpan::point(self.pos.end)));
            }
        };

        // identifier or keyword?
        if ch.is_alphabetic() || ch == '_' {
            let word = self.get_word();
            let kind = match KEYWORDS.get(word.as_str()) {
                Some(keyword) => keyword.clone(),
                None => TokenKind::Ident(word),
            };
            return Ok(self.finish(kind));
        }

        // numeric literal? either a leading digit or '.' followed by one
        if ch.is_ascii_digit()
            || (ch == '.' && matches!(self.peek_char(1), Some(c) if c.is_ascii_digit()))
        {
            return self.get_numeric();
        }

        // operator or punctuation?
        if let Some((kind, count)) = self.get_operator(ch) {
            self.toss_chars(count);
            return Ok(self.finish(kind));
        }

        // string-like literal?
        match ch {
            '\'' => self.get_rune_literal(),
            '"' | '`' => self.get_string_literal(),
            _ => Err(self.error(format!("illegal character '{}' (0x{:02x})", ch, ch as u32))),
        }
    }

    /// Record the token's kind for semicolon insertion and stamp its span.
    fn finish(&mut self, kind: TokenKind) -> Token {
        self.prev_kind = Some(kind.clone());
        Token::new(kind, self.pos)
    }

    fn error(&self, message: impl Into<String>) -> GlintError {
        GlintError::new(self.filename.as_str(), self.pos, message)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Lexeme scanners
    // ═══════════════════════════════════════════════════════════════════════

    /// Scan a maximal identifier-shaped word.
    fn get_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(ch) = self.peek_char(0) {
            if !ch.is_alphanumeric() && ch != '_' {
                break;
            }
            word.push(ch);
            self.next_char();
        }
        word
    }

    /// Scan a numeric literal.
    ///
    /// The grammar is deliberately simple: a run of digits, `.` and `e`,
    /// classified as a float if it contains either of the latter. No
    /// exponent signs, hex/octal forms, or digit separators.
    fn get_numeric(&mut self) -> GlintResult<Token> {
        let mut word = String::new();
        let mut is_float = false;

        while let Some(ch) = self.peek_char(0) {
            if !ch.is_ascii_digit() && ch != '.' && ch != 'e' {
                break;
            }
            if ch == '.' || ch == 'e' {
                is_float = true;
            }
            word.push(ch);
            self.next_char();
        }

        if is_float {
            match word.parse::<f64>() {
                Ok(v) => Ok(self.finish(TokenKind::Float(v))),
                Err(e) => Err(self.error(format!("malformed numeric literal '{}': {}", word, e))),
            }
        } else {
            match word.parse::<u64>() {
                Ok(v) => Ok(self.finish(TokenKind::Int(v))),
                Err(e) => Err(self.error(format!("malformed numeric literal '{}': {}", word, e))),
            }
        }
    }

    /// Scan a single-character rune literal.
    fn get_rune_literal(&mut self) -> GlintResult<Token> {
        let text = self.get_quoted()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(self.finish(TokenKind::Rune(c as u64))),
            _ => Err(self.error("this rune should be a single character")),
        }
    }

    /// Scan a string literal.
    fn get_string_literal(&mut self) -> GlintResult<Token> {
        let text = self.get_quoted()?;
        Ok(self.finish(TokenKind::String(text)))
    }

    /// Scan a quote-delimited literal body, verbatim. The closing quote
    /// must match the opening one; no escape sequences are processed.
    fn get_quoted(&mut self) -> GlintResult<String> {
        // the caller has already peeked the opening quote
        let quote = match self.next_char() {
            Some(q) => q,
            None => return Err(self.error("no closing quote")),
        };

        let mut text = String::new();
        loop {
            match self.next_char() {
                None => return Err(self.error("no closing quote")),
                Some(c) if c == quote => return Ok(text),
                Some(c) => text.push(c),
            }
        }
    }

    /// Resolve an operator or punctuation token.
    ///
    /// Returns the matched kind and the exact number of characters to
    /// consume. Operator lexing is a hard-coded trie keyed on the first
    /// character, inspecting up to two further characters of lookahead.
    fn get_operator(&mut self, ch: char) -> Option<(TokenKind, usize)> {
        let op = match ch {
            '+' => match self.peek_char(1) {
                Some('=') => (TokenKind::PlusAssign, 2),
                Some('+') => (TokenKind::Inc, 2),
                _ => (TokenKind::Plus, 1),
            },

            '-' => match self.peek_char(1) {
                Some('=') => (TokenKind::MinusAssign, 2),
                Some('-') => (TokenKind::Dec, 2),
                _ => (TokenKind::Minus, 1),
            },

            '*' => match self.peek_char(1) {
                Some('=') => (TokenKind::StarAssign, 2),
                _ => (TokenKind::Star, 1),
            },

            '/' => match self.peek_char(1) {
                Some('=') => (TokenKind::SlashAssign, 2),
                _ => (TokenKind::Slash, 1),
            },

            '%' => match self.peek_char(1) {
                Some('=') => (TokenKind::PercentAssign, 2),
                _ => (TokenKind::Percent, 1),
            },

            '&' => match self.peek_char(1) {
                Some('=') => (TokenKind::AmpAssign, 2),
                Some('&') => (TokenKind::AmpAmp, 2),
                _ => (TokenKind::Amp, 1),
            },

            '|' => match self.peek_char(1) {
                Some('=') => (TokenKind::PipeAssign, 2),
                Some('|') => (TokenKind::PipePipe, 2),
                _ => (TokenKind::Pipe, 1),
            },

            '^' => match self.peek_char(1) {
                Some('=') => (TokenKind::CaretAssign, 2),
                _ => (TokenKind::Caret, 1),
            },

            '<' => match self.peek_char(1) {
                Some('<') => match self.peek_char(2) {
                    Some('=') => (TokenKind::ShlAssign, 3),
                    _ => (TokenKind::Shl, 2),
                },
                Some('=') => (TokenKind::LtEq, 2),
                Some('-') => (TokenKind::Arrow, 2),
                _ => (TokenKind::Lt, 1),
            },

            '>' => match self.peek_char(1) {
                Some('>') => match self.peek_char(2) {
                    Some('=') => (TokenKind::ShrAssign, 3),
                    _ => (TokenKind::Shr, 2),
                },
                Some('=') => (TokenKind::GtEq, 2),
                _ => (TokenKind::Gt, 1),
            },

            '=' => match self.peek_char(1) {
                Some('=') => (TokenKind::EqEq, 2),
                _ => (TokenKind::Assign, 1),
            },

            '!' => match self.peek_char(1) {
                Some('=') => (TokenKind::NotEq, 2),
                _ => (TokenKind::Not, 1),
            },

            ':' => match self.peek_char(1) {
                Some('=') => (TokenKind::ColonAssign, 2),
                _ => (TokenKind::Colon, 1),
            },

            '.' => {
                if self.peek_char(1) == Some('.') && self.peek_char(2) == Some('.') {
                    (TokenKind::Ellipsis, 3)
                } else {
                    (TokenKind::Dot, 1)
                }
            }

            ',' => (TokenKind::Comma, 1),
            '(' => (TokenKind::LParen, 1),
            ')' => (TokenKind::RParen, 1),
            '[' => (TokenKind::LBracket, 1),
            ']' => (TokenKind::RBracket, 1),
            '{' => (TokenKind::LBrace, 1),
            '}' => (TokenKind::RBrace, 1),
            ';' => (TokenKind::Semi, 1),

            _ => return None,
        };

        Some(op)
    }
}
