use crate::ast::visitor::Visitor;
use crate::ast::{Expr, ExprId, FunctionDecl, Program, Stmt, StmtId};

/// Renders the AST as a compact s-expression, one top-level item per
/// line. The output is deterministic, which makes it the assertion
/// surface for parser tests.
pub struct SExprFormatter {
    output: String,
}

impl Default for SExprFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SExprFormatter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    pub fn format(program: &Program<'_>) -> String {
        let mut formatter = Self::new();
        formatter.visit_program(program);
        formatter.finish()
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_function(&mut self, head: &str, decl: &FunctionDecl<'_>) {
        self.write("(");
        self.write(head);
        if !decl.name.is_empty() {
            self.write(" ");
            self.write(decl.name);
        }
        self.write(" (params");
        for param in decl.params {
            self.write(&format!(" ({} {})", param.name, param.ty));
        }
        self.write(")");
        if head != "craft" {
            self.write(&format!(" {}", decl.return_type));
        }
        for stmt in decl.body {
            self.write(" ");
            self.write_stmt(stmt);
        }
        self.write(")");
    }

    fn write_stmt(&mut self, stmt: StmtId<'_>) {
        match stmt {
            Stmt::Class {
                name,
                superclass,
                fields,
                methods,
                ctor,
                dtor,
                ..
            } => {
                self.write("(class ");
                self.write(name);
                if let Some(superclass) = superclass {
                    self.write(&format!(" (with {superclass})"));
                }
                for field in *fields {
                    self.write(&format!(" (field {} {})", field.name, field.ty));
                }
                if let Some(ctor) = ctor {
                    self.write(" ");
                    self.write_function("craft", ctor);
                }
                for method in *methods {
                    self.write(" ");
                    self.write_function("method", method);
                }
                if let Some(dtor) = dtor {
                    self.write(" (sacrf");
                    for stmt in *dtor {
                        self.write(" ");
                        self.write_stmt(stmt);
                    }
                    self.write(")");
                }
                self.write(")");
            }
            Stmt::Function(decl) => self.write_function("fn", decl),
            Stmt::Var {
                name,
                ty,
                init,
                is_const,
                ..
            } => {
                let head = if *is_const { "const" } else { "var" };
                self.write(&format!("({head} {name} {ty}"));
                if let Some(init) = init {
                    self.write(" ");
                    self.write_expr(init);
                }
                self.write(")");
            }
            Stmt::If {
                condition,
                then_block,
                else_block,
                ..
            } => {
                self.write("(if ");
                self.write_expr(condition);
                self.write(" (then");
                for stmt in *then_block {
                    self.write(" ");
                    self.write_stmt(stmt);
                }
                self.write(")");
                if let Some(else_block) = else_block {
                    self.write(" (else");
                    for stmt in *else_block {
                        self.write(" ");
                        self.write_stmt(stmt);
                    }
                    self.write(")");
                }
                self.write(")");
            }
            Stmt::While { condition, body, .. } => {
                self.write("(while ");
                self.write_expr(condition);
                self.write(" (body");
                for stmt in *body {
                    self.write(" ");
                    self.write_stmt(stmt);
                }
                self.write("))");
            }
            Stmt::For {
                init,
                condition,
                step,
                body,
                ..
            } => {
                self.write("(for ");
                match init {
                    Some(init) => self.write_stmt(init),
                    None => self.write("_"),
                }
                self.write(" ");
                match condition {
                    Some(condition) => self.write_expr(condition),
                    None => self.write("_"),
                }
                self.write(" ");
                match step {
                    Some(step) => self.write_expr(step),
                    None => self.write("_"),
                }
                self.write(" (body");
                for stmt in *body {
                    self.write(" ");
                    self.write_stmt(stmt);
                }
                self.write("))");
            }
            Stmt::Return { expr, .. } => {
                self.write("(ret");
                if let Some(expr) = expr {
                    self.write(" ");
                    self.write_expr(expr);
                }
                self.write(")");
            }
            Stmt::Block { statements, .. } => {
                self.write("(block");
                for stmt in *statements {
                    self.write(" ");
                    self.write_stmt(stmt);
                }
                self.write(")");
            }
            Stmt::Timed { duration, body, .. } => {
                self.write("(time ");
                self.write_expr(duration);
                self.write(" ");
                self.write_stmt(body);
                self.write(")");
            }
            Stmt::Eval { expr, .. } => {
                self.write("(eval ");
                self.write_expr(expr);
                self.write(")");
            }
            Stmt::Expression { expr, .. } => {
                self.write("(expr ");
                self.write_expr(expr);
                self.write(")");
            }
            Stmt::Error { .. } => self.write("(error)"),
        }
    }

    fn write_expr(&mut self, expr: ExprId<'_>) {
        match expr {
            Expr::Int { value, .. } => self.write(&format!("(int {value})")),
            Expr::Float { value, .. } => self.write(&format!("(float {value})")),
            Expr::Str { value, .. } => self.write(&format!("(str \"{value}\")")),
            Expr::Char { value, .. } => self.write(&format!("(char '{value}')")),
            Expr::Bool { value, .. } => self.write(&format!("(bool {value})")),
            Expr::Identifier { name, .. } => self.write(&format!("(id {name})")),
            Expr::Binary { op, left, right, .. } => {
                self.write(&format!("({} ", op.symbol()));
                self.write_expr(left);
                self.write(" ");
                self.write_expr(right);
                self.write(")");
            }
            Expr::Unary { op, expr, .. } => {
                self.write(&format!("({} ", op.symbol()));
                self.write_expr(expr);
                self.write(")");
            }
            Expr::Call { callee, args, .. } => {
                self.write("(call ");
                self.write_expr(callee);
                for arg in *args {
                    self.write(" ");
                    self.write_expr(arg);
                }
                self.write(")");
            }
            Expr::Member { object, member, .. } => {
                self.write("(member ");
                self.write_expr(object);
                self.write(&format!(" {member})"));
            }
            Expr::Assign { target, value, .. } => {
                self.write("(assign ");
                self.write_expr(target);
                self.write(" ");
                self.write_expr(value);
                self.write(")");
            }
            Expr::Array { elements, .. } => {
                self.write("(array");
                for element in *elements {
                    self.write(" ");
                    self.write_expr(element);
                }
                self.write(")");
            }
            Expr::Index { array, index, .. } => {
                self.write("(index ");
                self.write_expr(array);
                self.write(" ");
                self.write_expr(index);
                self.write(")");
            }
            Expr::Error { .. } => self.write("(error)"),
        }
    }
}

impl<'ast> Visitor<'ast> for SExprFormatter {
    fn visit_program(&mut self, program: &'ast Program<'ast>) {
        self.write("(program");
        for item in program.items {
            self.write("\n  ");
            self.write_stmt(item);
        }
        self.write(")");
    }

    fn visit_stmt(&mut self, stmt: StmtId<'ast>) {
        self.write_stmt(stmt);
    }

    fn visit_expr(&mut self, expr: ExprId<'ast>) {
        self.write_expr(expr);
    }
}
