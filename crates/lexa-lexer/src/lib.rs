//! Lexa lexer: converts source text into classified tokens.
//!
//! Lexing never fails. Characters that no rule accepts, unterminated strings
//! and unterminated block comments all become [`TokenKind::Unknown`] tokens so
//! that later stages can report them.
use lexa_syntax::token::{classify_word, Token, TokenKind};
use log::debug;

/// Tokenize `input` in one call.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}

/// Character scanner that produces tokens with positions.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn slice_from(&self, start: usize) -> String {
        self.src[start..self.pos].iter().collect()
    }

    /// Skips whitespace and comments. Returns an `Unknown` token when a block
    /// comment runs off the end of the input.
    fn skip_trivia(&mut self) -> Option<Token> {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '/' && self.peek_next() == Some('/') {
                while let Some(c2) = self.peek() {
                    if c2 == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else if c == '/' && self.peek_next() == Some('*') {
                let (line, col, start) = (self.line, self.col, self.pos);
                self.advance();
                self.advance();
                let mut closed = false;
                while self.peek().is_some() {
                    if self.peek() == Some('*') && self.peek_next() == Some('/') {
                        self.advance();
                        self.advance();
                        closed = true;
                        break;
                    }
                    self.advance();
                }
                if !closed {
                    return Some(Token::new(TokenKind::Unknown, self.slice_from(start), line, col));
                }
            } else {
                break;
            }
        }
        None
    }

    fn read_number(&mut self) -> Token {
        let (line, col, start) = (self.line, self.col, self.pos);
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        let mut kind = TokenKind::IntLiteral;
        // `1.` stays an integer followed by a dot; only `digits.digits` is a float.
        if self.peek() == Some('.') && matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) {
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
            kind = TokenKind::FloatLiteral;
        }
        Token::new(kind, self.slice_from(start), line, col)
    }

    fn read_ident_or_keyword(&mut self) -> Token {
        let (line, col, start) = (self.line, self.col, self.pos);
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        let word = self.slice_from(start);
        Token::new(classify_word(&word), word, line, col)
    }

    /// Reads a quoted literal. Unterminated literals stop before the newline
    /// and come back as `Unknown`.
    fn read_quoted(&mut self, quote: char, kind: TokenKind) -> Token {
        let (line, col, start) = (self.line, self.col, self.pos);
        self.advance();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Token::new(TokenKind::Unknown, self.slice_from(start), line, col);
                }
                Some('\\') => {
                    self.advance();
                    if matches!(self.peek(), Some(c) if c != '\n') {
                        self.advance();
                    }
                }
                Some(c) if c == quote => {
                    self.advance();
                    return Token::new(kind, self.slice_from(start), line, col);
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Consume `len` characters as a token of `kind`.
    fn punct(&mut self, kind: TokenKind, len: usize) -> Token {
        let (line, col, start) = (self.line, self.col, self.pos);
        for _ in 0..len {
            self.advance();
        }
        Token::new(kind, self.slice_from(start), line, col)
    }

    /// Tokenize the entire input. There is no end-of-file token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            if let Some(unterminated) = self.skip_trivia() {
                tokens.push(unterminated);
                continue;
            }
            let Some(c) = self.peek() else { break };
            let next = self.peek_next();
            let tk = match (c, next) {
                ('{', _) => self.punct(TokenKind::BraceOpen, 1),
                ('}', _) => self.punct(TokenKind::BraceClose, 1),
                ('(', _) => self.punct(TokenKind::ParenOpen, 1),
                (')', _) => self.punct(TokenKind::ParenClose, 1),
                ('[', _) => self.punct(TokenKind::BracketOpen, 1),
                (']', _) => self.punct(TokenKind::BracketClose, 1),
                (';', _) => self.punct(TokenKind::Semicolon, 1),
                (',', _) => self.punct(TokenKind::Comma, 1),
                (':', _) => self.punct(TokenKind::Colon, 1),
                ('.', Some(d)) if d.is_ascii_digit() => self.read_number_with_leading_dot(),
                ('.', _) => self.punct(TokenKind::Dot, 1),
                ('=', Some('=')) => self.punct(TokenKind::Equal, 2),
                ('=', _) => self.punct(TokenKind::Assign, 1),
                ('!', Some('=')) => self.punct(TokenKind::NotEqual, 2),
                ('!', _) => self.punct(TokenKind::Not, 1),
                ('<', Some('=')) => self.punct(TokenKind::LessEqual, 2),
                ('<', _) => self.punct(TokenKind::Less, 1),
                ('>', Some('=')) => self.punct(TokenKind::GreaterEqual, 2),
                ('>', _) => self.punct(TokenKind::Greater, 1),
                ('+', Some('+')) => self.punct(TokenKind::Increment, 2),
                ('+', _) => self.punct(TokenKind::Plus, 1),
                ('-', Some('-')) => self.punct(TokenKind::Decrement, 2),
                ('-', _) => self.punct(TokenKind::Minus, 1),
                ('*', _) => self.punct(TokenKind::Star, 1),
                ('/', _) => self.punct(TokenKind::Slash, 1),
                ('%', _) => self.punct(TokenKind::Percent, 1),
                ('&', Some('&')) => self.punct(TokenKind::And, 2),
                ('|', Some('|')) => self.punct(TokenKind::Or, 2),
                ('"', _) => self.read_quoted('"', TokenKind::StringLiteral),
                ('\'', _) => self.read_quoted('\'', TokenKind::CharLiteral),
                (c, _) if c.is_ascii_digit() => self.read_number(),
                (c, _) if c.is_ascii_alphabetic() || c == '_' => self.read_ident_or_keyword(),
                _ => self.punct(TokenKind::Unknown, 1),
            };
            tokens.push(tk);
        }
        debug!("lexed {} tokens over {} lines", tokens.len(), self.line);
        tokens
    }

    /// `.5` lexes as a float literal.
    fn read_number_with_leading_dot(&mut self) -> Token {
        let (line, col, start) = (self.line, self.col, self.pos);
        self.advance();
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        Token::new(TokenKind::FloatLiteral, self.slice_from(start), line, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn lexemes(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.lexeme).collect()
    }

    #[test]
    fn test_minimal_program() {
        let toks = tokenize("int main() { return 0; }");
        assert_eq!(toks.len(), 9);
        assert_eq!(toks[0].kind, TokenKind::TypeInt);
        assert_eq!(toks[1].kind, TokenKind::ReservedWord);
        assert_eq!(toks[1].lexeme, "main");
        assert_eq!(toks[5].kind, TokenKind::ReservedWord);
        assert_eq!(toks[6].kind, TokenKind::IntLiteral);
        assert_eq!(toks[8].kind, TokenKind::BraceClose);
    }

    #[test]
    fn test_type_keywords() {
        assert_eq!(
            kinds("int float double string char bool void"),
            vec![
                TokenKind::TypeInt,
                TokenKind::TypeFloat,
                TokenKind::TypeDouble,
                TokenKind::TypeString,
                TokenKind::TypeChar,
                TokenKind::TypeBool,
                TokenKind::TypeVoid,
            ]
        );
    }

    #[test]
    fn test_longest_match_operators() {
        assert_eq!(
            kinds("== != <= >= && || ++ -- = < > ! + -"),
            vec![
                TokenKind::Equal,
                TokenKind::NotEqual,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Increment,
                TokenKind::Decrement,
                TokenKind::Assign,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::Not,
                TokenKind::Plus,
                TokenKind::Minus,
            ]
        );
        assert_eq!(kinds("a==b"), vec![TokenKind::Identifier, TokenKind::Equal, TokenKind::Identifier]);
        assert_eq!(lexemes("x+++y"), vec!["x", "++", "+", "y"]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("42 3.14 .5"), vec![
            TokenKind::IntLiteral,
            TokenKind::FloatLiteral,
            TokenKind::FloatLiteral,
        ]);
        // trailing dot is not part of the number
        assert_eq!(kinds("1."), vec![TokenKind::IntLiteral, TokenKind::Dot]);
        assert_eq!(lexemes("12ab"), vec!["12", "ab"]);
    }

    #[test]
    fn test_strings_and_chars() {
        let toks = tokenize(r#"string s = "he said \"hi\""; char c = 'x';"#);
        assert_eq!(toks[3].kind, TokenKind::StringLiteral);
        assert_eq!(toks[3].lexeme, r#""he said \"hi\"""#);
        assert_eq!(toks[8].kind, TokenKind::CharLiteral);
        assert_eq!(toks[8].lexeme, "'x'");
    }

    #[test]
    fn test_unterminated_string_spans_to_end_of_line() {
        let toks = tokenize("s = \"abc ;\nx;");
        assert_eq!(toks[2].kind, TokenKind::Unknown);
        assert_eq!(toks[2].lexeme, "\"abc ;");
        assert_eq!(toks[3].kind, TokenKind::Identifier);
        assert_eq!(toks[3].line, 2);
    }

    #[test]
    fn test_comments_are_skipped() {
        let toks = tokenize("// header\nint /* inline */ x; /* multi\nline */ y");
        assert_eq!(lexemes_of(&toks), vec!["int", "x", ";", "y"]);
        assert_eq!(toks[0].line, 2);
        assert_eq!(toks[3].line, 3);
    }

    #[test]
    fn test_unterminated_block_comment_is_unknown() {
        let toks = tokenize("x /* never\nends");
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[1].kind, TokenKind::Unknown);
        assert_eq!(toks[1].lexeme, "/* never\nends");
    }

    #[test]
    fn test_unknown_characters_are_kept() {
        let toks = tokenize("int x = 5 @ # & | $;");
        let unknown: Vec<_> = toks.iter().filter(|t| t.kind == TokenKind::Unknown).collect();
        assert_eq!(unknown.len(), 5);
        assert_eq!(unknown[0].lexeme, "@");
        assert_eq!(unknown[0].col, 11);
    }

    #[test]
    fn test_positions() {
        let toks = tokenize("int main() {\n  int x = 1;\n}");
        let x = toks.iter().find(|t| t.lexeme == "x").unwrap();
        assert_eq!((x.line, x.col), (2, 7));
        let close = toks.last().unwrap();
        assert_eq!((close.line, close.col), (3, 1));
    }

    #[test]
    fn test_every_character_is_accounted_for() {
        let src = "int main() { float f = 1.5; if (f >= 1) { f = f * 2; } return 0; } ~";
        let covered: usize = tokenize(src).iter().map(|t| t.lexeme.chars().count()).sum();
        let non_ws = src.chars().filter(|c| !c.is_whitespace()).count();
        assert_eq!(covered, non_ws);
    }

    #[test]
    fn test_relexing_lexemes_is_stable() {
        let src = "int main() {\n int a = 1; double d = .5 + 2.0; string s = \"x y\";\n while (a != 3) { a++; }\n 1. @ return a % 2; }";
        let first = tokenize(src);
        let joined = first.iter().map(|t| t.lexeme.as_str()).collect::<Vec<_>>().join(" ");
        let second = tokenize(&joined);
        let pairs = |v: &[Token]| v.iter().map(|t| (t.kind, t.lexeme.clone())).collect::<Vec<_>>();
        assert_eq!(pairs(&first), pairs(&second));
    }

    fn lexemes_of(toks: &[Token]) -> Vec<&str> {
        toks.iter().map(|t| t.lexeme.as_str()).collect()
    }
}
