use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    String,
    Number,

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

impl TokenType {
    /// Operators that only ever appear between two operands.
    pub fn is_binary_only(self) -> bool {
        matches!(
            self,
            TokenType::Plus
                | TokenType::Star
                | TokenType::Slash
                | TokenType::BangEqual
                | TokenType::EqualEqual
                | TokenType::Greater
                | TokenType::GreaterEqual
                | TokenType::Less
                | TokenType::LessEqual
        )
    }

    /// Keywords that can only begin a new statement.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            TokenType::Class
                | TokenType::Fun
                | TokenType::Var
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub r#type: TokenType,
    pub lexeme: Box<str>,
    pub literal: Option<Value>,
    pub line: u32,
}

impl Token {
    pub fn new(r#type: TokenType, lexeme: &str, literal: Option<Value>, line: u32) -> Token {
        Token {
            r#type,
            lexeme: lexeme.into(),
            literal,
            line,
        }
    }
}
