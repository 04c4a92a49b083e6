use crate::ast::visitor::{walk_expr, walk_stmt, Visitor};
use crate::ast::{ExprId, Program, StmtId};
use crate::span::Span;

#[derive(Debug, Clone, Copy)]
pub enum AstNode<'ast> {
    Stmt(StmtId<'ast>),
    Expr(ExprId<'ast>),
}

impl<'ast> AstNode<'ast> {
    pub fn span(&self) -> Span<'ast> {
        match self {
            AstNode::Stmt(s) => s.span(),
            AstNode::Expr(e) => e.span(),
        }
    }
}

/// Finds the chain of nodes covering a source position, outermost
/// first. Tooling surface for editors: "what is under the cursor".
pub struct Locator<'ast> {
    line: u32,
    column: u32,
    path: Vec<AstNode<'ast>>,
}

impl<'ast> Locator<'ast> {
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column,
            path: Vec::new(),
        }
    }

    pub fn find(program: &'ast Program<'ast>, line: u32, column: u32) -> Vec<AstNode<'ast>> {
        let mut locator = Self::new(line, column);
        locator.visit_program(program);
        locator.path
    }
}

impl<'ast> Visitor<'ast> for Locator<'ast> {
    fn visit_stmt(&mut self, stmt: StmtId<'ast>) {
        if stmt.span().contains(self.line, self.column) {
            self.path.push(AstNode::Stmt(stmt));
            walk_stmt(self, stmt);
        }
    }

    fn visit_expr(&mut self, expr: ExprId<'ast>) {
        if expr.span().contains(self.line, self.column) {
            self.path.push(AstNode::Expr(expr));
            walk_expr(self, expr);
        }
    }
}
