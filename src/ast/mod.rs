pub mod locator;
pub mod sexpr;
pub mod visitor;

use std::fmt;

use crate::span::Span;

pub type ExprId<'ast> = &'ast Expr<'ast>;
pub type StmtId<'ast> = &'ast Stmt<'ast>;

#[derive(Debug)]
pub struct Program<'ast> {
    pub items: &'ast [StmtId<'ast>],
    pub span: Span<'ast>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type<'ast> {
    Int,
    Float,
    Char,
    String,
    Bool,
    Void,
    ClassRef(&'ast str),
    ArrayOf(&'ast Type<'ast>),
}

impl fmt::Display for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Char => write!(f, "char"),
            Type::String => write!(f, "string"),
            Type::Bool => write!(f, "bool"),
            Type::Void => write!(f, "void"),
            Type::ClassRef(name) => write!(f, "{name}"),
            Type::ArrayOf(inner) => write!(f, "{inner}[]"),
        }
    }
}

/// A function or method definition. Methods (`BSTOW`) and constructors
/// (`CRAFT`) inside a class reuse this shape.
#[derive(Debug)]
pub struct FunctionDecl<'ast> {
    pub name: &'ast str,
    pub params: &'ast [Param<'ast>],
    pub return_type: Type<'ast>,
    pub body: &'ast [StmtId<'ast>],
    pub span: Span<'ast>,
}

#[derive(Debug, Clone, Copy)]
pub struct Param<'ast> {
    pub name: &'ast str,
    pub ty: Type<'ast>,
    pub span: Span<'ast>,
}

#[derive(Debug, Clone, Copy)]
pub struct Field<'ast> {
    pub name: &'ast str,
    pub ty: Type<'ast>,
    pub span: Span<'ast>,
}

#[derive(Debug)]
pub enum Stmt<'ast> {
    Class {
        name: &'ast str,
        superclass: Option<&'ast str>,
        fields: &'ast [Field<'ast>],
        methods: &'ast [&'ast FunctionDecl<'ast>],
        ctor: Option<&'ast FunctionDecl<'ast>>,
        dtor: Option<&'ast [StmtId<'ast>]>,
        span: Span<'ast>,
    },
    Function(&'ast FunctionDecl<'ast>),
    Var {
        name: &'ast str,
        ty: Type<'ast>,
        init: Option<ExprId<'ast>>,
        is_const: bool,
        span: Span<'ast>,
    },
    If {
        condition: ExprId<'ast>,
        then_block: &'ast [StmtId<'ast>],
        else_block: Option<&'ast [StmtId<'ast>]>,
        span: Span<'ast>,
    },
    While {
        condition: ExprId<'ast>,
        body: &'ast [StmtId<'ast>],
        span: Span<'ast>,
    },
    For {
        init: Option<StmtId<'ast>>,
        condition: Option<ExprId<'ast>>,
        step: Option<ExprId<'ast>>,
        body: &'ast [StmtId<'ast>],
        span: Span<'ast>,
    },
    Return {
        expr: Option<ExprId<'ast>>,
        span: Span<'ast>,
    },
    Block {
        statements: &'ast [StmtId<'ast>],
        span: Span<'ast>,
    },
    /// `TIME expr CHNT stmt`. The duration expression is attached
    /// without interpretation; its runtime meaning belongs to the
    /// interpreter.
    Timed {
        duration: ExprId<'ast>,
        body: StmtId<'ast>,
        span: Span<'ast>,
    },
    /// `EVAL expr`: evaluate for side effects, no binding.
    Eval {
        expr: ExprId<'ast>,
        span: Span<'ast>,
    },
    Expression {
        expr: ExprId<'ast>,
        span: Span<'ast>,
    },
    /// Placeholder produced by error recovery.
    Error {
        span: Span<'ast>,
    },
}

impl<'ast> Stmt<'ast> {
    pub fn span(&self) -> Span<'ast> {
        match self {
            Stmt::Class { span, .. } => *span,
            Stmt::Function(decl) => decl.span,
            Stmt::Var { span, .. } => *span,
            Stmt::If { span, .. } => *span,
            Stmt::While { span, .. } => *span,
            Stmt::For { span, .. } => *span,
            Stmt::Return { span, .. } => *span,
            Stmt::Block { span, .. } => *span,
            Stmt::Timed { span, .. } => *span,
            Stmt::Eval { span, .. } => *span,
            Stmt::Expression { span, .. } => *span,
            Stmt::Error { span } => *span,
        }
    }
}

#[derive(Debug)]
pub enum Expr<'ast> {
    Int {
        value: i64,
        span: Span<'ast>,
    },
    Float {
        value: f64,
        span: Span<'ast>,
    },
    Str {
        value: &'ast str,
        span: Span<'ast>,
    },
    Char {
        value: char,
        span: Span<'ast>,
    },
    Bool {
        value: bool,
        span: Span<'ast>,
    },
    Identifier {
        name: &'ast str,
        span: Span<'ast>,
    },
    Binary {
        op: BinaryOp,
        left: ExprId<'ast>,
        right: ExprId<'ast>,
        span: Span<'ast>,
    },
    Unary {
        op: UnaryOp,
        expr: ExprId<'ast>,
        span: Span<'ast>,
    },
    Call {
        callee: ExprId<'ast>,
        args: &'ast [ExprId<'ast>],
        span: Span<'ast>,
    },
    Member {
        object: ExprId<'ast>,
        member: &'ast str,
        span: Span<'ast>,
    },
    Assign {
        target: ExprId<'ast>,
        value: ExprId<'ast>,
        span: Span<'ast>,
    },
    Array {
        elements: &'ast [ExprId<'ast>],
        span: Span<'ast>,
    },
    Index {
        array: ExprId<'ast>,
        index: ExprId<'ast>,
        span: Span<'ast>,
    },
    /// Placeholder produced by error recovery.
    Error {
        span: Span<'ast>,
    },
}

impl<'ast> Expr<'ast> {
    pub fn span(&self) -> Span<'ast> {
        match self {
            Expr::Int { span, .. } => *span,
            Expr::Float { span, .. } => *span,
            Expr::Str { span, .. } => *span,
            Expr::Char { span, .. } => *span,
            Expr::Bool { span, .. } => *span,
            Expr::Identifier { span, .. } => *span,
            Expr::Binary { span, .. } => *span,
            Expr::Unary { span, .. } => *span,
            Expr::Call { span, .. } => *span,
            Expr::Member { span, .. } => *span,
            Expr::Assign { span, .. } => *span,
            Expr::Array { span, .. } => *span,
            Expr::Index { span, .. } => *span,
            Expr::Error { span } => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Neq,
    Lt,
    Gt,
    Leq,
    Beq,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Leq => "<=",
            BinaryOp::Beq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::Neg => "neg",
        }
    }
}
