//! Tokens and the keyword table
//!
//! A [`Token`] is produced once by the lexer and consumed by the parser's
//! single-token lookahead. It carries its kind, the raw source text it was
//! lexed from, the position of its first character and an optional payload
//! (identifier text or a typed literal value).

use super::ast::{Literal, SourceLocation};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::LazyLock;

/// Every kind of token the lexer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Type keywords
    Null,
    Void,
    Byte,
    Bool,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    SChar,
    Char,
    UChar,
    String,
    Arch,
    UArch,

    // User-defined type keywords
    Struct,
    Impl,
    Union,
    Enum,
    Typedef,

    // Storage qualifiers
    Const,
    Static,
    Extern,
    Volatile,
    Atomic,

    // Literals and names
    Identifier,
    Number,
    StringLiteral,
    CharLiteral,
    BoolLiteral,

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Comma,     // ,
    Semicolon, // ;
    Colon,     // :
    Dot,       // .
    Arrow,     // ->

    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Logical
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !

    // Bitwise
    Amp,   // &
    Pipe,  // |
    Caret, // ^
    Tilde, // ~
    Shl,   // <<
    Shr,   // >>

    // Increment/Decrement
    PlusPlus,   // ++
    MinusMinus, // --

    // Assignment
    Assign,    // =
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=
    AmpEq,     // &=
    PipeEq,    // |=
    CaretEq,   // ^=
    ShlEq,     // <<=
    ShrEq,     // >>=

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    Question,  // ?
    Backslash, // \

    // Control flow
    If,
    Else,
    While,
    Do,
    For,
    Switch,
    Case,
    Default,
    Continue,
    Break,
    Label,
    Jump,
    Try,
    Catch,
    Throw,
    Fun,
    Lambda,
    Return,

    Typeof,
    Sizeof,

    // Memory intrinsics
    Malloc,
    Calloc,
    Realloc,
    Free,
    Memcpy,
    Memset,
    Memmove,

    Eof,
}

impl TokenKind {
    /// Fixed spelling of this kind, or a description for kinds whose text
    /// varies (identifiers, literals, end of file).
    pub fn spelling(self) -> &'static str {
        match self {
            TokenKind::Null => "null",
            TokenKind::Void => "void",
            TokenKind::Byte => "byte",
            TokenKind::Bool => "bool",
            TokenKind::Short => "short",
            TokenKind::UShort => "ushort",
            TokenKind::Int => "int",
            TokenKind::UInt => "uint",
            TokenKind::Long => "long",
            TokenKind::ULong => "ulong",
            TokenKind::Float => "float",
            TokenKind::Double => "double",
            TokenKind::SChar => "schar",
            TokenKind::Char => "char",
            TokenKind::UChar => "uchar",
            TokenKind::String => "string",
            TokenKind::Arch => "arch",
            TokenKind::UArch => "uarch",
            TokenKind::Struct => "struct",
            TokenKind::Impl => "impl",
            TokenKind::Union => "union",
            TokenKind::Enum => "enum",
            TokenKind::Typedef => "typedef",
            TokenKind::Const => "const",
            TokenKind::Static => "static",
            TokenKind::Extern => "extern",
            TokenKind::Volatile => "volatile",
            TokenKind::Atomic => "atomic",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::StringLiteral => "string literal",
            TokenKind::CharLiteral => "char literal",
            TokenKind::BoolLiteral => "bool literal",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Arrow => "->",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Bang => "!",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Assign => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::AmpEq => "&=",
            TokenKind::PipeEq => "|=",
            TokenKind::CaretEq => "^=",
            TokenKind::ShlEq => "<<=",
            TokenKind::ShrEq => ">>=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::Question => "?",
            TokenKind::Backslash => "\\",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::For => "for",
            TokenKind::Switch => "switch",
            TokenKind::Case => "case",
            TokenKind::Default => "default",
            TokenKind::Continue => "continue",
            TokenKind::Break => "break",
            TokenKind::Label => "label",
            TokenKind::Jump => "jump",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Throw => "throw",
            TokenKind::Fun => "fun",
            TokenKind::Lambda => "lambda",
            TokenKind::Return => "return",
            TokenKind::Typeof => "typeof",
            TokenKind::Sizeof => "sizeof",
            TokenKind::Malloc => "malloc",
            TokenKind::Calloc => "calloc",
            TokenKind::Realloc => "realloc",
            TokenKind::Free => "free",
            TokenKind::Memcpy => "memcpy",
            TokenKind::Memset => "memset",
            TokenKind::Memmove => "memmove",
            TokenKind::Eof => "end of file",
        }
    }

    /// Whether the spelling varies per token rather than being fixed
    fn is_variable(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::StringLiteral
                | TokenKind::CharLiteral
                | TokenKind::BoolLiteral
                | TokenKind::Eof
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_variable() {
            f.write_str(self.spelling())
        } else {
            write!(f, "'{}'", self.spelling())
        }
    }
}

/// Every reserved word, spelled exactly as the language spells it.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("null", TokenKind::Null),
    ("void", TokenKind::Void),
    ("byte", TokenKind::Byte),
    ("bool", TokenKind::Bool),
    ("short", TokenKind::Short),
    ("ushort", TokenKind::UShort),
    ("int", TokenKind::Int),
    ("uint", TokenKind::UInt),
    ("long", TokenKind::Long),
    ("ulong", TokenKind::ULong),
    ("float", TokenKind::Float),
    ("double", TokenKind::Double),
    ("schar", TokenKind::SChar),
    ("char", TokenKind::Char),
    ("uchar", TokenKind::UChar),
    ("string", TokenKind::String),
    ("arch", TokenKind::Arch),
    ("uarch", TokenKind::UArch),
    ("struct", TokenKind::Struct),
    ("impl", TokenKind::Impl),
    ("union", TokenKind::Union),
    ("enum", TokenKind::Enum),
    ("typedef", TokenKind::Typedef),
    ("const", TokenKind::Const),
    ("static", TokenKind::Static),
    ("extern", TokenKind::Extern),
    ("volatile", TokenKind::Volatile),
    ("atomic", TokenKind::Atomic),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("do", TokenKind::Do),
    ("for", TokenKind::For),
    ("switch", TokenKind::Switch),
    ("case", TokenKind::Case),
    ("default", TokenKind::Default),
    ("continue", TokenKind::Continue),
    ("break", TokenKind::Break),
    ("label", TokenKind::Label),
    ("jump", TokenKind::Jump),
    ("try", TokenKind::Try),
    ("catch", TokenKind::Catch),
    ("throw", TokenKind::Throw),
    ("fun", TokenKind::Fun),
    ("lambda", TokenKind::Lambda),
    ("return", TokenKind::Return),
    ("typeof", TokenKind::Typeof),
    ("sizeof", TokenKind::Sizeof),
    ("malloc", TokenKind::Malloc),
    ("calloc", TokenKind::Calloc),
    ("realloc", TokenKind::Realloc),
    ("free", TokenKind::Free),
    ("memcpy", TokenKind::Memcpy),
    ("memset", TokenKind::Memset),
    ("memmove", TokenKind::Memmove),
];

static KEYWORD_TABLE: LazyLock<FxHashMap<&'static str, TokenKind>> =
    LazyLock::new(|| KEYWORDS.iter().copied().collect());

/// Look up an exact spelling in the keyword table.
pub fn keyword(text: &str) -> Option<TokenKind> {
    KEYWORD_TABLE.get(text).copied()
}

/// Payload carried by a token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    None,
    Identifier(String),
    Literal(Literal),
}

/// A single lexical unit
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text the token was lexed from
    pub lexeme: String,
    pub location: SourceLocation,
    pub value: TokenValue,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: String, location: SourceLocation, value: TokenValue) -> Self {
        Self {
            kind,
            lexeme,
            location,
            value,
        }
    }

    pub fn eof(location: SourceLocation) -> Self {
        Self::new(TokenKind::Eof, String::new(), location, TokenValue::None)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Identifier text, if this is an identifier token.
    pub fn identifier(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Literal payload, if this is a literal token.
    pub fn literal(&self) -> Option<&Literal> {
        match &self.value {
            TokenValue::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Take the literal payload out of the token.
    pub fn into_literal(self) -> Option<Literal> {
        match self.value {
            TokenValue::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.value) {
            (TokenKind::Identifier, TokenValue::Identifier(name)) => {
                write!(f, "identifier '{}'", name)
            }
            (TokenKind::Eof, _) => write!(f, "end of file"),
            (kind, _) if kind.is_variable() => write!(f, "{} {}", kind.spelling(), self.lexeme),
            (kind, _) => write!(f, "{}", kind),
        }
    }
}
