use std::fmt;

use derive_more::Display;

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TokenKind {
    // single-character punctuation
    #[display(fmt = "LEFT_PAREN")]
    LeftParen,
    #[display(fmt = "RIGHT_PAREN")]
    RightParen,
    #[display(fmt = "LEFT_BRACE")]
    LeftBrace,
    #[display(fmt = "RIGHT_BRACE")]
    RightBrace,
    #[display(fmt = "COMMA")]
    Comma,
    #[display(fmt = "DOT")]
    Dot,
    #[display(fmt = "MINUS")]
    Minus,
    #[display(fmt = "PLUS")]
    Plus,
    #[display(fmt = "SEMICOLON")]
    Semicolon,
    #[display(fmt = "SLASH")]
    Slash,
    #[display(fmt = "STAR")]
    Star,

    // one or two character operators
    #[display(fmt = "BANG")]
    Bang,
    #[display(fmt = "BANG_EQUAL")]
    BangEqual,
    #[display(fmt = "EQUAL")]
    Equal,
    #[display(fmt = "EQUAL_EQUAL")]
    EqualEqual,
    #[display(fmt = "GREATER")]
    Greater,
    #[display(fmt = "GREATER_EQUAL")]
    GreaterEqual,
    #[display(fmt = "LESS")]
    Less,
    #[display(fmt = "LESS_EQUAL")]
    LessEqual,

    // literals
    #[display(fmt = "IDENTIFIER")]
    Identifier,
    #[display(fmt = "STRING")]
    String,
    #[display(fmt = "NUMBER")]
    Number,

    // keywords
    #[display(fmt = "AND")]
    And,
    #[display(fmt = "CLASS")]
    Class,
    #[display(fmt = "ELSE")]
    Else,
    #[display(fmt = "FALSE")]
    False,
    #[display(fmt = "FUN")]
    Fun,
    #[display(fmt = "FOR")]
    For,
    #[display(fmt = "IF")]
    If,
    #[display(fmt = "NIL")]
    Nil,
    #[display(fmt = "OR")]
    Or,
    #[display(fmt = "PRINT")]
    Print,
    #[display(fmt = "RETURN")]
    Return,
    #[display(fmt = "SUPER")]
    Super,
    #[display(fmt = "THIS")]
    This,
    #[display(fmt = "TRUE")]
    True,
    #[display(fmt = "VAR")]
    Var,
    #[display(fmt = "WHILE")]
    While,

    #[display(fmt = "EOF")]
    Eof,
}

impl TokenKind {
    pub fn from_keyword_str(name: &str) -> Option<TokenKind> {
        match name {
            "and" => Some(TokenKind::And),
            "class" => Some(TokenKind::Class),
            "else" => Some(TokenKind::Else),
            "false" => Some(TokenKind::False),
            "for" => Some(TokenKind::For),
            "fun" => Some(TokenKind::Fun),
            "if" => Some(TokenKind::If),
            "nil" => Some(TokenKind::Nil),
            "or" => Some(TokenKind::Or),
            "print" => Some(TokenKind::Print),
            "return" => Some(TokenKind::Return),
            "super" => Some(TokenKind::Super),
            "this" => Some(TokenKind::This),
            "true" => Some(TokenKind::True),
            "var" => Some(TokenKind::Var),
            "while" => Some(TokenKind::While),
            _ => None,
        }
    }

    /// Keywords the parser treats as the start of a new statement when
    /// recovering from an error.
    pub fn starts_statement(&self) -> bool {
        matches!(
            *self,
            Self::Class
                | Self::Fun
                | Self::Var
                | Self::For
                | Self::If
                | Self::While
                | Self::Print
                | Self::Return
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub literal: Option<Value>,
    pub line: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        literal: Option<Value>,
        line: usize,
    ) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            literal,
            line,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {} {} ", self.line, self.kind, self.lexeme)?;
        if let Some(literal) = &self.literal {
            write!(f, "{}", literal)?;
        }
        Ok(())
    }
}
