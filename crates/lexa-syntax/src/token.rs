//! Token catalog and token values for the Lexa language.
//!
//! This module defines the closed set of token kinds the lexer can produce,
//! plus the classification tables it applies to words. Tokens are the smallest
//! meaningful units of source text and carry their exact lexeme together with
//! the position where they start.
//!
//! # Token Categories
//!
//! - **Type keywords**: `int`, `float`, `double`, `string`, `char`, `bool`, `void`
//! - **Reserved words**: `if`, `else`, `while`, `do`, `return`, `main`, `for`,
//!   `break`, `continue`
//! - **Identifiers**: every other name (`counter`, `_tmp1`)
//! - **Literals**: integers, floats, strings, chars and booleans
//! - **Delimiters**: braces, parentheses, brackets, `;`, `,`, `.`, `:`
//! - **Operators**: assignment, comparison, arithmetic, increment and logical
//! - **Unknown**: any character no rule accepts
//!
//! # Examples
//!
//! ```rust
//! use lexa_syntax::{classify_word, Token, TokenKind};
//!
//! assert_eq!(classify_word("int"), TokenKind::TypeInt);
//! assert_eq!(classify_word("while"), TokenKind::ReservedWord);
//! assert_eq!(classify_word("total"), TokenKind::Identifier);
//!
//! let tok = Token::new(TokenKind::IntLiteral, "42", 3, 9);
//! assert_eq!(tok.kind.name(), "INT_LITERAL");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every kind of token the lexer can emit.
///
/// The serialized form is the upper snake case name (`TYPE_INT`,
/// `RESERVED_WORD`, ...), which is also what [`TokenKind::name`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // === Type keywords ===
    TypeInt,
    TypeFloat,
    TypeDouble,
    TypeString,
    TypeChar,
    TypeBool,
    TypeVoid,

    // === Words ===
    /// Control and structural keywords that do not name a type.
    ReservedWord,
    Identifier,

    // === Literals ===
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,
    BoolLiteral,

    // === Delimiters ===
    BraceOpen,
    BraceClose,
    ParenOpen,
    ParenClose,
    BracketOpen,
    BracketClose,
    Semicolon,
    Comma,
    Dot,
    Colon,

    // === Operators ===
    /// `=`
    Assign,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    /// `++`
    Increment,
    /// `--`
    Decrement,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `!`
    Not,

    /// A character (or unterminated literal) that no lexical rule accepts.
    Unknown,
}

impl TokenKind {
    /// All kinds, in declaration order.
    pub const ALL: [TokenKind; 42] = [
        TokenKind::TypeInt,
        TokenKind::TypeFloat,
        TokenKind::TypeDouble,
        TokenKind::TypeString,
        TokenKind::TypeChar,
        TokenKind::TypeBool,
        TokenKind::TypeVoid,
        TokenKind::ReservedWord,
        TokenKind::Identifier,
        TokenKind::IntLiteral,
        TokenKind::FloatLiteral,
        TokenKind::StringLiteral,
        TokenKind::CharLiteral,
        TokenKind::BoolLiteral,
        TokenKind::BraceOpen,
        TokenKind::BraceClose,
        TokenKind::ParenOpen,
        TokenKind::ParenClose,
        TokenKind::BracketOpen,
        TokenKind::BracketClose,
        TokenKind::Semicolon,
        TokenKind::Comma,
        TokenKind::Dot,
        TokenKind::Colon,
        TokenKind::Assign,
        TokenKind::Equal,
        TokenKind::NotEqual,
        TokenKind::Less,
        TokenKind::Greater,
        TokenKind::LessEqual,
        TokenKind::GreaterEqual,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::Percent,
        TokenKind::Increment,
        TokenKind::Decrement,
        TokenKind::And,
        TokenKind::Or,
        TokenKind::Not,
        TokenKind::Unknown,
    ];

    /// The wire name of this kind, identical to its serialized form.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::TypeInt => "TYPE_INT",
            TokenKind::TypeFloat => "TYPE_FLOAT",
            TokenKind::TypeDouble => "TYPE_DOUBLE",
            TokenKind::TypeString => "TYPE_STRING",
            TokenKind::TypeChar => "TYPE_CHAR",
            TokenKind::TypeBool => "TYPE_BOOL",
            TokenKind::TypeVoid => "TYPE_VOID",
            TokenKind::ReservedWord => "RESERVED_WORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::IntLiteral => "INT_LITERAL",
            TokenKind::FloatLiteral => "FLOAT_LITERAL",
            TokenKind::StringLiteral => "STRING_LITERAL",
            TokenKind::CharLiteral => "CHAR_LITERAL",
            TokenKind::BoolLiteral => "BOOL_LITERAL",
            TokenKind::BraceOpen => "BRACE_OPEN",
            TokenKind::BraceClose => "BRACE_CLOSE",
            TokenKind::ParenOpen => "PAREN_OPEN",
            TokenKind::ParenClose => "PAREN_CLOSE",
            TokenKind::BracketOpen => "BRACKET_OPEN",
            TokenKind::BracketClose => "BRACKET_CLOSE",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Colon => "COLON",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Equal => "EQUAL",
            TokenKind::NotEqual => "NOT_EQUAL",
            TokenKind::Less => "LESS",
            TokenKind::Greater => "GREATER",
            TokenKind::LessEqual => "LESS_EQUAL",
            TokenKind::GreaterEqual => "GREATER_EQUAL",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Percent => "PERCENT",
            TokenKind::Increment => "INCREMENT",
            TokenKind::Decrement => "DECREMENT",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Unknown => "UNKNOWN",
        }
    }

    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::TypeInt
                | TokenKind::TypeFloat
                | TokenKind::TypeDouble
                | TokenKind::TypeString
                | TokenKind::TypeChar
                | TokenKind::TypeBool
                | TokenKind::TypeVoid
        )
    }

    /// For an opening delimiter, the kind that closes it.
    pub fn closing_delimiter(self) -> Option<TokenKind> {
        match self {
            TokenKind::BraceOpen => Some(TokenKind::BraceClose),
            TokenKind::ParenOpen => Some(TokenKind::ParenClose),
            TokenKind::BracketOpen => Some(TokenKind::BracketClose),
            _ => None,
        }
    }

    pub fn is_closing_delimiter(self) -> bool {
        matches!(
            self,
            TokenKind::BraceClose | TokenKind::ParenClose | TokenKind::BracketClose
        )
    }

    /// Canonical source text for kinds that have exactly one spelling.
    pub fn fixed_text(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::TypeInt => "int",
            TokenKind::TypeFloat => "float",
            TokenKind::TypeDouble => "double",
            TokenKind::TypeString => "string",
            TokenKind::TypeChar => "char",
            TokenKind::TypeBool => "bool",
            TokenKind::TypeVoid => "void",
            TokenKind::BraceOpen => "{",
            TokenKind::BraceClose => "}",
            TokenKind::ParenOpen => "(",
            TokenKind::ParenClose => ")",
            TokenKind::BracketOpen => "[",
            TokenKind::BracketClose => "]",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Colon => ":",
            TokenKind::Assign => "=",
            TokenKind::Equal => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::LessEqual => "<=",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Increment => "++",
            TokenKind::Decrement => "--",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Not => "!",
            TokenKind::ReservedWord
            | TokenKind::Identifier
            | TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::StringLiteral
            | TokenKind::CharLiteral
            | TokenKind::BoolLiteral
            | TokenKind::Unknown => return None,
        };
        Some(text)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Words that name a data type, with the kind each one lexes to.
pub const TYPE_KEYWORDS: [(&str, TokenKind); 7] = [
    ("int", TokenKind::TypeInt),
    ("float", TokenKind::TypeFloat),
    ("double", TokenKind::TypeDouble),
    ("string", TokenKind::TypeString),
    ("char", TokenKind::TypeChar),
    ("bool", TokenKind::TypeBool),
    ("void", TokenKind::TypeVoid),
];

/// Control and structural keywords, all lexed as [`TokenKind::ReservedWord`].
pub const RESERVED_WORDS: [&str; 9] = [
    "if", "else", "while", "do", "return", "main", "for", "break", "continue",
];

/// Classify a complete identifier-shaped word.
///
/// Type keywords win over reserved words, which win over boolean literals;
/// anything else is an identifier.
pub fn classify_word(word: &str) -> TokenKind {
    if let Some((_, kind)) = TYPE_KEYWORDS.iter().find(|(w, _)| *w == word) {
        return *kind;
    }
    if RESERVED_WORDS.contains(&word) {
        return TokenKind::ReservedWord;
    }
    match word {
        "true" | "false" => TokenKind::BoolLiteral,
        _ => TokenKind::Identifier,
    }
}

/// A classified slice of source text with its starting position.
///
/// Serializes as `{"type", "value", "line", "column"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The catalog kind of this token
    #[serde(rename = "type")]
    pub kind: TokenKind,

    /// Exact source text covered by the token
    #[serde(rename = "value")]
    pub lexeme: String,

    /// Line number in the source (1-based)
    pub line: usize,

    /// Column number of the first character (1-based)
    #[serde(rename = "column")]
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            col,
        }
    }

    /// True when this token is the reserved word `word`.
    pub fn is_reserved(&self, word: &str) -> bool {
        self.kind == TokenKind::ReservedWord && self.lexeme == word
    }
}
