use crate::ast::{Expr, ExprId, FunctionDecl, Program, Stmt, StmtId};

/// Read-only traversal over the AST. Implementors override the hooks
/// they care about and delegate the rest to the `walk_*` functions.
pub trait Visitor<'ast> {
    fn visit_program(&mut self, program: &'ast Program<'ast>) {
        for item in program.items {
            self.visit_stmt(item);
        }
    }

    fn visit_stmt(&mut self, stmt: StmtId<'ast>) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: ExprId<'ast>) {
        walk_expr(self, expr);
    }
}

pub fn walk_function<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    decl: &'ast FunctionDecl<'ast>,
) {
    for stmt in decl.body {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmt: StmtId<'ast>) {
    match stmt {
        Stmt::Class {
            methods, ctor, dtor, ..
        } => {
            if let Some(ctor) = ctor {
                walk_function(visitor, ctor);
            }
            for method in *methods {
                walk_function(visitor, method);
            }
            if let Some(dtor) = dtor {
                for stmt in *dtor {
                    visitor.visit_stmt(stmt);
                }
            }
        }
        Stmt::Function(decl) => walk_function(visitor, decl),
        Stmt::Var { init, .. } => {
            if let Some(init) = init {
                visitor.visit_expr(init);
            }
        }
        Stmt::If {
            condition,
            then_block,
            else_block,
            ..
        } => {
            visitor.visit_expr(condition);
            for stmt in *then_block {
                visitor.visit_stmt(stmt);
            }
            if let Some(else_block) = else_block {
                for stmt in *else_block {
                    visitor.visit_stmt(stmt);
                }
            }
        }
        Stmt::While { condition, body, .. } => {
            visitor.visit_expr(condition);
            for stmt in *body {
                visitor.visit_stmt(stmt);
            }
        }
        Stmt::For {
            init,
            condition,
            step,
            body,
            ..
        } => {
            if let Some(init) = init {
                visitor.visit_stmt(init);
            }
            if let Some(condition) = condition {
                visitor.visit_expr(condition);
            }
            if let Some(step) = step {
                visitor.visit_expr(step);
            }
            for stmt in *body {
                visitor.visit_stmt(stmt);
            }
        }
        Stmt::Return { expr, .. } => {
            if let Some(expr) = expr {
                visitor.visit_expr(expr);
            }
        }
        Stmt::Block { statements, .. } => {
            for stmt in *statements {
                visitor.visit_stmt(stmt);
            }
        }
        Stmt::Timed { duration, body, .. } => {
            visitor.visit_expr(duration);
            visitor.visit_stmt(body);
        }
        Stmt::Eval { expr, .. } | Stmt::Expression { expr, .. } => {
            visitor.visit_expr(expr);
        }
        Stmt::Error { .. } => {}
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: ExprId<'ast>) {
    match expr {
        Expr::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::Unary { expr, .. } => visitor.visit_expr(expr),
        Expr::Call { callee, args, .. } => {
            visitor.visit_expr(callee);
            for arg in *args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Member { object, .. } => visitor.visit_expr(object),
        Expr::Assign { target, value, .. } => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        Expr::Array { elements, .. } => {
            for element in *elements {
                visitor.visit_expr(element);
            }
        }
        Expr::Index { array, index, .. } => {
            visitor.visit_expr(array);
            visitor.visit_expr(index);
        }
        Expr::Int { .. }
        | Expr::Float { .. }
        | Expr::Str { .. }
        | Expr::Char { .. }
        | Expr::Bool { .. }
        | Expr::Identifier { .. }
        | Expr::Error { .. } => {}
    }
}
