use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub value: TokenValue<'src>,
    pub span: Span<'src>,
}

impl<'src> Token<'src> {
    pub fn eof() -> Self {
        Token {
            kind: TokenKind::Eof,
            value: TokenValue::None,
            span: Span::default(),
        }
    }
}

/// Semantic value carried alongside a token kind. Literal tokens carry
/// their decoded value, `Id` carries the identifier text, everything
/// else carries `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenValue<'src> {
    None,
    Int(i64),
    Float(f64),
    Str(&'src str),
    Char(char),
    Ident(&'src str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Type keywords
    Int,
    Float,
    Char,
    String,
    Bool,
    Void,

    // Literals
    Nr,
    Nrf,
    Str,
    Chr,
    True,
    False,

    Id,

    // Operator keywords
    Not,
    And,
    Or,

    // Control
    If,
    BeginIf,
    EndIf,
    Else,
    BeginElse,
    EndElse,
    For,
    EndFor,
    While,
    EndWhile,

    // Declarations
    Class,
    EndClass,
    Const,
    Bg,
    Bgnp,
    Bgnf,
    EndF,
    Ret,
    Of,
    In,
    With,

    // Domain constructs
    Craft,
    Bstow,
    Ench,
    Sacrf,
    Time,
    Chnt,
    Eval,

    // Multi-char operators
    Leq, // <=
    Beq, // >=
    Eq,  // ==
    Neq, // !=

    // Single-char operators and punctuation
    Assign, // =
    Lt,
    Gt,
    Plus,
    Minus,
    Star,
    Slash,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comma,
    SemiColon,
    Dot,

    Eof,

    // Recoverable lexing failure
    Error,
}

impl TokenKind {
    /// Keywords that name a builtin type.
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::Float
                | TokenKind::Char
                | TokenKind::String
                | TokenKind::Bool
                | TokenKind::Void
        )
    }

    /// Tokens that can begin an expression.
    pub fn starts_expression(self) -> bool {
        matches!(
            self,
            TokenKind::Nr
                | TokenKind::Nrf
                | TokenKind::Str
                | TokenKind::Chr
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Id
                | TokenKind::Not
                | TokenKind::Minus
                | TokenKind::OpenParen
                | TokenKind::OpenBracket
        )
    }
}
