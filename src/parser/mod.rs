mod expr;

use bumpalo::Bump;

use crate::ast::{Field, FunctionDecl, Param, Program, Stmt, StmtId, Type};
use crate::context::{DeclKind, Diagnostic, DiagnosticKind, ParseContext};
use crate::lexer::token::{Token, TokenKind, TokenValue};
use crate::lexer::Lexer;
use crate::span::Span;

/// Consecutive failed statements tolerated inside one statement list
/// before the parser abandons the rest of that list.
const MAX_CONSECUTIVE_ERRORS: usize = 3;

/// Optional per-reduction instrumentation callback. Receives the
/// production name and the merged span; purely observational.
pub type TraceHook<'hook, 'ast> = &'hook mut dyn FnMut(&'static str, Span<'ast>);

pub struct Parser<'src, 'ast, 'ctx> {
    lexer: Lexer<'src>,
    arena: &'ast Bump,
    ctx: &'ctx mut ParseContext<'src>,
    current_token: Token<'src>,
    next_token: Token<'src>,
    /// Span of the last consumed token; anchors zero-width spans of
    /// empty productions.
    prev_span: Span<'src>,
    trace_hook: Option<TraceHook<'ctx, 'ast>>,
}

impl<'src: 'ast, 'ast, 'ctx> Parser<'src, 'ast, 'ctx> {
    pub fn new(lexer: Lexer<'src>, arena: &'ast Bump, ctx: &'ctx mut ParseContext<'src>) -> Self {
        let mut parser = Self {
            lexer,
            arena,
            ctx,
            current_token: Token::eof(),
            next_token: Token::eof(),
            prev_span: Span::default(),
            trace_hook: None,
        };
        parser.prime();
        parser
    }

    pub fn with_trace_hook(mut self, hook: TraceHook<'ctx, 'ast>) -> Self {
        self.trace_hook = Some(hook);
        self
    }

    fn prime(&mut self) {
        self.advance_lookahead();
        self.current_token = self.next_token;
        self.advance_lookahead();
    }

    fn advance_lookahead(&mut self) {
        loop {
            let token = self.lexer.next_token();
            if token.kind == TokenKind::Error {
                let message = self
                    .lexer
                    .take_error_message()
                    .unwrap_or("invalid token");
                self.ctx.report(Diagnostic {
                    kind: DiagnosticKind::LexicalError,
                    message: message.to_string(),
                    span: token.span,
                });
                continue;
            }
            self.next_token = token;
            break;
        }
    }

    fn bump(&mut self) {
        self.prev_span = self.current_token.span;
        self.current_token = self.next_token;
        self.advance_lookahead();
    }

    fn trace(&mut self, rule: &'static str, span: Span<'ast>) {
        if let Some(hook) = self.trace_hook.as_mut() {
            hook(rule, span);
        }
    }

    fn syntax_error(&mut self, message: String, span: Span<'src>) {
        self.ctx.report(Diagnostic {
            kind: DiagnosticKind::SyntaxError,
            message,
            span,
        });
    }

    fn declare(&mut self, name: &'src str, kind: DeclKind, span: Span<'src>) {
        if let Err(diagnostic) = self.ctx.declare(name, kind, span) {
            self.ctx.report(diagnostic);
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Option<Token<'src>> {
        if self.current_token.kind == kind {
            let token = self.current_token;
            self.bump();
            Some(token)
        } else {
            self.syntax_error(
                format!("expected {what} near '{}'", self.current_token.span.last_token),
                self.current_token.span,
            );
            None
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Option<(&'src str, Span<'src>)> {
        if self.current_token.kind == TokenKind::Id {
            if let TokenValue::Ident(name) = self.current_token.value {
                let span = self.current_token.span;
                self.bump();
                return Some((name, span));
            }
        }
        self.syntax_error(
            format!("expected {what} near '{}'", self.current_token.span.last_token),
            self.current_token.span,
        );
        None
    }

    /// Skip forward to the next plausible statement boundary. The
    /// offending token itself has already been consumed by the caller.
    fn sync_to_statement_boundary(&mut self) {
        loop {
            match self.current_token.kind {
                TokenKind::Eof => break,
                TokenKind::SemiColon => {
                    self.bump();
                    break;
                }
                kind if Self::is_statement_boundary(kind) => break,
                _ => self.bump(),
            }
        }
    }

    fn is_statement_boundary(kind: TokenKind) -> bool {
        kind.is_type_keyword()
            || matches!(
                kind,
                TokenKind::If
                    | TokenKind::For
                    | TokenKind::While
                    | TokenKind::Ret
                    | TokenKind::Eval
                    | TokenKind::Time
                    | TokenKind::Const
                    | TokenKind::Class
                    | TokenKind::Bg
                    | TokenKind::Bgnp
                    | TokenKind::Bgnf
                    | TokenKind::Ench
                    | TokenKind::Bstow
                    | TokenKind::Craft
                    | TokenKind::Sacrf
                    | TokenKind::EndIf
                    | TokenKind::EndElse
                    | TokenKind::BeginElse
                    | TokenKind::EndFor
                    | TokenKind::EndWhile
                    | TokenKind::EndF
                    | TokenKind::EndClass
            )
    }

    pub fn parse_program(&mut self) -> Program<'ast> {
        let items = self.parse_stmt_list(&[]);

        let span = if let (Some(first), Some(last)) = (items.first(), items.last()) {
            Span::merge(first.span(), last.span())
        } else {
            // Empty source unit: a zero-width span at the end of
            // whatever preceded it (the start of input).
            Span::empty_at(self.prev_span)
        };

        self.trace("program", span);
        Program { items, span }
    }

    /// Parse statements until one of `terminators` (or EOF). The
    /// terminator token is left for the caller to consume. Stray
    /// semicolons between statements are skipped.
    fn parse_stmt_list(&mut self, terminators: &[TokenKind]) -> &'ast [StmtId<'ast>] {
        let mut statements = Vec::new();
        let mut consecutive_errors = 0usize;

        loop {
            while self.current_token.kind == TokenKind::SemiColon {
                self.bump();
            }
            if self.current_token.kind == TokenKind::Eof
                || terminators.contains(&self.current_token.kind)
            {
                break;
            }

            let stmt = self.parse_stmt();
            if matches!(stmt, Stmt::Error { .. }) {
                consecutive_errors += 1;
                if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                    self.ctx.report(Diagnostic {
                        kind: DiagnosticKind::RecoveryExhausted,
                        message: "too many consecutive errors; skipping the rest of this block"
                            .to_string(),
                        span: self.current_token.span,
                    });
                    statements.push(stmt);
                    while self.current_token.kind != TokenKind::Eof
                        && !terminators.contains(&self.current_token.kind)
                    {
                        self.bump();
                    }
                    break;
                }
            } else {
                consecutive_errors = 0;
            }
            statements.push(stmt);
        }

        self.arena.alloc_slice_copy(&statements)
    }

    fn parse_stmt(&mut self) -> StmtId<'ast> {
        match self.current_token.kind {
            TokenKind::Class => self.parse_class(),
            TokenKind::Bg | TokenKind::Bgnp | TokenKind::Bgnf => self.parse_function(),
            TokenKind::Const => self.parse_var_decl(true),
            kind if kind.is_type_keyword() => self.parse_var_decl(false),
            TokenKind::Id if self.starts_class_typed_decl() => self.parse_var_decl(false),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Ret => self.parse_return(),
            TokenKind::Eval => self.parse_eval(),
            TokenKind::Time => self.parse_timed(),
            kind if kind.starts_expression() => self.parse_expr_stmt(),
            _ => {
                let span = self.current_token.span;
                self.syntax_error(
                    format!("unexpected '{}'", span.last_token),
                    span,
                );
                self.bump();
                self.sync_to_statement_boundary();
                self.arena.alloc(Stmt::Error { span })
            }
        }
    }

    /// `Wand w = ...`: an identifier opens a variable declaration only
    /// if the declaration scope knows it as a class name and another
    /// identifier follows. Everything else is an expression statement.
    fn starts_class_typed_decl(&self) -> bool {
        if self.next_token.kind != TokenKind::Id {
            return false;
        }
        match self.current_token.value {
            TokenValue::Ident(name) => self.ctx.lookup(name) == Some(DeclKind::Class),
            _ => false,
        }
    }

    fn parse_type(&mut self) -> Type<'ast> {
        let base = match self.current_token.kind {
            TokenKind::Int => Type::Int,
            TokenKind::Float => Type::Float,
            TokenKind::Char => Type::Char,
            TokenKind::String => Type::String,
            TokenKind::Bool => Type::Bool,
            TokenKind::Void => Type::Void,
            TokenKind::Id => {
                if let TokenValue::Ident(name) = self.current_token.value {
                    Type::ClassRef(name)
                } else {
                    Type::Void
                }
            }
            _ => {
                self.syntax_error(
                    format!("expected type near '{}'", self.current_token.span.last_token),
                    self.current_token.span,
                );
                return Type::Void;
            }
        };
        self.bump();

        let mut ty = base;
        while self.current_token.kind == TokenKind::OpenBracket
            && self.next_token.kind == TokenKind::CloseBracket
        {
            self.bump();
            self.bump();
            ty = Type::ArrayOf(self.arena.alloc(ty));
        }
        ty
    }

    fn parse_var_decl(&mut self, is_const: bool) -> StmtId<'ast> {
        let start = self.current_token.span;
        if is_const {
            self.bump(); // CONST
        }

        let ty = self.parse_type();
        let Some((name, name_span)) = self.expect_identifier("a variable name") else {
            self.sync_to_statement_boundary();
            return self.arena.alloc(Stmt::Error { span: start });
        };
        self.declare(name, if is_const { DeclKind::Constant } else { DeclKind::Variable }, name_span);

        let mut end = name_span;
        let init = if self.current_token.kind == TokenKind::Assign {
            self.bump();
            let init = self.parse_expr(0);
            end = init.span();
            Some(init)
        } else {
            if is_const {
                self.syntax_error(
                    format!("constant '{name}' requires an initializer"),
                    name_span,
                );
            }
            None
        };

        let span = Span::merge(start, end);
        self.trace(if is_const { "const_decl" } else { "var_decl" }, span);
        self.arena.alloc(Stmt::Var {
            name,
            ty,
            init,
            is_const,
            span,
        })
    }

    fn parse_if(&mut self) -> StmtId<'ast> {
        let start = self.current_token.span;
        self.bump(); // IF

        let condition = self.parse_expr(0);
        self.expect(TokenKind::BeginIf, "BEGINIF");

        self.ctx.push_scope();
        let then_block = self.parse_stmt_list(&[TokenKind::EndIf]);
        self.ctx.pop_scope();
        self.expect(TokenKind::EndIf, "ENDIF");

        // Shift-preferred: an else-clause right after ENDIF belongs to
        // this conditional, the innermost one still open.
        let else_block = if self.current_token.kind == TokenKind::Else
            || self.current_token.kind == TokenKind::BeginElse
        {
            if self.current_token.kind == TokenKind::Else {
                self.bump();
            }
            self.expect(TokenKind::BeginElse, "BEGINELSE");
            self.ctx.push_scope();
            let block = self.parse_stmt_list(&[TokenKind::EndElse]);
            self.ctx.pop_scope();
            self.expect(TokenKind::EndElse, "ENDELSE");
            Some(block)
        } else {
            None
        };

        let span = Span::merge(start, self.prev_span);
        self.trace("if_stmt", span);
        self.arena.alloc(Stmt::If {
            condition,
            then_block,
            else_block,
            span,
        })
    }

    fn parse_while(&mut self) -> StmtId<'ast> {
        let start = self.current_token.span;
        self.bump(); // WHILE

        self.expect(TokenKind::OpenParen, "'('");
        let condition = self.parse_expr(0);
        self.expect(TokenKind::CloseParen, "')'");

        self.ctx.push_scope();
        let body = self.parse_stmt_list(&[TokenKind::EndWhile]);
        self.ctx.pop_scope();
        self.expect(TokenKind::EndWhile, "ENDWHILE");

        let span = Span::merge(start, self.prev_span);
        self.trace("while_stmt", span);
        self.arena.alloc(Stmt::While {
            condition,
            body,
            span,
        })
    }

    fn parse_for(&mut self) -> StmtId<'ast> {
        let start = self.current_token.span;
        self.bump(); // FOR

        self.expect(TokenKind::OpenParen, "'('");
        self.ctx.push_scope();

        let init = if self.current_token.kind == TokenKind::SemiColon {
            None
        } else if self.current_token.kind.is_type_keyword() || self.starts_class_typed_decl() {
            Some(self.parse_var_decl(false))
        } else {
            let expr = self.parse_expr(0);
            let span = expr.span();
            let stmt: StmtId<'ast> = self.arena.alloc(Stmt::Expression { expr, span });
            Some(stmt)
        };
        self.expect(TokenKind::SemiColon, "';'");

        let condition = if self.current_token.kind == TokenKind::SemiColon {
            None
        } else {
            Some(self.parse_expr(0))
        };
        self.expect(TokenKind::SemiColon, "';'");

        let step = if self.current_token.kind == TokenKind::CloseParen {
            None
        } else {
            Some(self.parse_expr(0))
        };
        self.expect(TokenKind::CloseParen, "')'");

        let body = self.parse_stmt_list(&[TokenKind::EndFor]);
        self.ctx.pop_scope();
        self.expect(TokenKind::EndFor, "ENDFOR");

        let span = Span::merge(start, self.prev_span);
        self.trace("for_stmt", span);
        self.arena.alloc(Stmt::For {
            init,
            condition,
            step,
            body,
            span,
        })
    }

    fn parse_return(&mut self) -> StmtId<'ast> {
        let start = self.current_token.span;
        self.bump(); // RET

        let expr = if self.current_token.kind.starts_expression() {
            Some(self.parse_expr(0))
        } else {
            None
        };

        let span = match expr {
            Some(expr) => Span::merge(start, expr.span()),
            None => start,
        };
        self.trace("return_stmt", span);
        self.arena.alloc(Stmt::Return { expr, span })
    }

    fn parse_eval(&mut self) -> StmtId<'ast> {
        let start = self.current_token.span;
        self.bump(); // EVAL

        let expr = self.parse_expr(0);
        let span = Span::merge(start, expr.span());
        self.trace("eval_stmt", span);
        self.arena.alloc(Stmt::Eval { expr, span })
    }

    fn parse_timed(&mut self) -> StmtId<'ast> {
        let start = self.current_token.span;
        self.bump(); // TIME

        let duration = self.parse_expr(0);
        self.expect(TokenKind::Chnt, "CHNT");

        // The chanted body is a single statement, held as a block node;
        // its runtime meaning is the interpreter's business.
        let stmt = self.parse_stmt();
        let statements = self.arena.alloc_slice_copy(&[stmt]);
        let body: StmtId<'ast> = self.arena.alloc(Stmt::Block {
            statements,
            span: stmt.span(),
        });

        let span = Span::merge(start, body.span());
        self.trace("timed_stmt", span);
        self.arena.alloc(Stmt::Timed {
            duration,
            body,
            span,
        })
    }

    fn parse_expr_stmt(&mut self) -> StmtId<'ast> {
        let expr = self.parse_expr(0);
        let span = expr.span();
        self.trace("expr_stmt", span);
        self.arena.alloc(Stmt::Expression { expr, span })
    }

    fn parse_function(&mut self) -> StmtId<'ast> {
        let start = self.current_token.span;
        let header = self.current_token.kind;
        self.bump(); // BG | BGNP | BGNF

        let Some((name, name_span)) = self.expect_identifier("a function name") else {
            self.sync_to_statement_boundary();
            return self.arena.alloc(Stmt::Error { span: start });
        };
        self.declare(name, DeclKind::Function, name_span);

        self.ctx.push_scope();
        let params = if header == TokenKind::Bgnp {
            // BGNP declares a parameterless function; no parens at all.
            &[] as &'ast [Param<'ast>]
        } else {
            self.parse_params()
        };

        let return_type = if self.current_token.kind == TokenKind::Of {
            let of_span = self.current_token.span;
            self.bump();
            let ty = self.parse_type();
            if header == TokenKind::Bgnf {
                self.syntax_error(
                    "a BGNF function cannot declare a return type".to_string(),
                    of_span,
                );
            }
            ty
        } else {
            Type::Void
        };

        let body = self.parse_stmt_list(&[TokenKind::EndF]);
        self.ctx.pop_scope();
        self.expect(TokenKind::EndF, "ENDF");

        let span = Span::merge(start, self.prev_span);
        self.trace("function_decl", span);
        let decl = self.arena.alloc(FunctionDecl {
            name,
            params,
            return_type,
            body,
            span,
        });
        self.arena.alloc(Stmt::Function(decl))
    }

    /// `'(' [param (',' param)*] ')'` with `param := name IN type`.
    /// An empty list gets the zero-width span of the closing paren's
    /// predecessor, so synthesized nodes still locate precisely.
    fn parse_params(&mut self) -> &'ast [Param<'ast>] {
        self.expect(TokenKind::OpenParen, "'('");

        let mut params = Vec::new();
        while self.current_token.kind != TokenKind::CloseParen
            && self.current_token.kind != TokenKind::Eof
        {
            let Some((name, name_span)) = self.expect_identifier("a parameter name") else {
                break;
            };
            self.expect(TokenKind::In, "IN");
            let ty = self.parse_type();
            self.declare(name, DeclKind::Variable, name_span);

            params.push(Param {
                name,
                ty,
                span: Span::merge(name_span, self.prev_span),
            });

            if self.current_token.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(TokenKind::CloseParen, "')'");

        self.arena.alloc_slice_copy(&params)
    }

    fn parse_class(&mut self) -> StmtId<'ast> {
        let start = self.current_token.span;
        self.bump(); // CLASS

        let Some((name, name_span)) = self.expect_identifier("a class name") else {
            self.sync_to_statement_boundary();
            return self.arena.alloc(Stmt::Error { span: start });
        };
        self.declare(name, DeclKind::Class, name_span);

        let superclass = if self.current_token.kind == TokenKind::With {
            self.bump();
            self.expect_identifier("a superclass name")
                .map(|(name, _)| name)
        } else {
            None
        };

        self.ctx.push_scope();

        let mut fields = Vec::new();
        let mut methods: Vec<&'ast FunctionDecl<'ast>> = Vec::new();
        let mut ctor: Option<&'ast FunctionDecl<'ast>> = None;
        let mut dtor: Option<&'ast [StmtId<'ast>]> = None;

        loop {
            match self.current_token.kind {
                TokenKind::EndClass | TokenKind::Eof => break,
                TokenKind::Ench => {
                    if let Some(field) = self.parse_field() {
                        fields.push(field);
                    }
                }
                TokenKind::Bstow => {
                    if let Some(method) = self.parse_method() {
                        methods.push(method);
                    }
                }
                TokenKind::Craft => {
                    let second = ctor.is_some();
                    let craft_span = self.current_token.span;
                    let parsed = self.parse_ctor();
                    if second {
                        self.ctx.report(Diagnostic {
                            kind: DiagnosticKind::DuplicateDeclaration,
                            message: format!("class '{name}' already has a constructor"),
                            span: craft_span,
                        });
                    } else {
                        ctor = Some(parsed);
                    }
                }
                TokenKind::Sacrf => {
                    let second = dtor.is_some();
                    let sacrf_span = self.current_token.span;
                    let parsed = self.parse_dtor();
                    if second {
                        self.ctx.report(Diagnostic {
                            kind: DiagnosticKind::DuplicateDeclaration,
                            message: format!("class '{name}' already has a teardown block"),
                            span: sacrf_span,
                        });
                    } else {
                        dtor = Some(parsed);
                    }
                }
                _ => {
                    let span = self.current_token.span;
                    self.syntax_error(
                        format!("expected a class member near '{}'", span.last_token),
                        span,
                    );
                    self.bump();
                    self.sync_to_statement_boundary();
                }
            }
        }

        self.ctx.pop_scope();
        self.expect(TokenKind::EndClass, "ENDCLASS");

        let span = Span::merge(start, self.prev_span);
        self.trace("class_decl", span);
        self.arena.alloc(Stmt::Class {
            name,
            superclass,
            fields: self.arena.alloc_slice_copy(&fields),
            methods: self.arena.alloc_slice_copy(&methods),
            ctor,
            dtor,
            span,
        })
    }

    /// `ENCH type name`, a field declaration.
    fn parse_field(&mut self) -> Option<Field<'ast>> {
        let start = self.current_token.span;
        self.bump(); // ENCH

        let ty = self.parse_type();
        let (name, name_span) = self.expect_identifier("a field name")?;
        self.declare(name, DeclKind::Field, name_span);

        let span = Span::merge(start, name_span);
        self.trace("field_decl", span);
        Some(Field { name, ty, span })
    }

    /// `BSTOW name '(' params ')' [OF type] stmt* ENDF`, a method.
    fn parse_method(&mut self) -> Option<&'ast FunctionDecl<'ast>> {
        let start = self.current_token.span;
        self.bump(); // BSTOW

        let (name, name_span) = self.expect_identifier("a method name")?;
        self.declare(name, DeclKind::Method, name_span);

        self.ctx.push_scope();
        let params = self.parse_params();
        let return_type = if self.current_token.kind == TokenKind::Of {
            self.bump();
            self.parse_type()
        } else {
            Type::Void
        };

        let body = self.parse_member_body();
        self.ctx.pop_scope();

        let span = Span::merge(start, self.prev_span);
        self.trace("method_decl", span);
        Some(self.arena.alloc(FunctionDecl {
            name,
            params,
            return_type,
            body,
            span,
        }))
    }

    /// `CRAFT '(' params ')' stmt*`, the constructor. The body runs to
    /// ENDF or to the next class-member boundary; `CRAFT()` directly
    /// followed by ENDCLASS is the canonical empty constructor.
    fn parse_ctor(&mut self) -> &'ast FunctionDecl<'ast> {
        let start = self.current_token.span;
        self.bump(); // CRAFT

        self.ctx.push_scope();
        let params = self.parse_params();
        let body = self.parse_member_body();
        self.ctx.pop_scope();

        let span = Span::merge(start, self.prev_span);
        self.trace("ctor_decl", span);
        self.arena.alloc(FunctionDecl {
            name: "",
            params,
            return_type: Type::Void,
            body,
            span,
        })
    }

    /// `SACRF stmt*`, the teardown block, opaque to the parser.
    fn parse_dtor(&mut self) -> &'ast [StmtId<'ast>] {
        let start = self.current_token.span;
        self.bump(); // SACRF

        self.ctx.push_scope();
        let body = self.parse_member_body();
        self.ctx.pop_scope();

        self.trace("dtor_decl", Span::merge(start, self.prev_span));
        body
    }

    /// A constructor/method/teardown body: statements until ENDF
    /// (consumed) or until the next class-member boundary (left for the
    /// class loop).
    fn parse_member_body(&mut self) -> &'ast [StmtId<'ast>] {
        let body = self.parse_stmt_list(&[
            TokenKind::EndF,
            TokenKind::Ench,
            TokenKind::Bstow,
            TokenKind::Craft,
            TokenKind::Sacrf,
            TokenKind::EndClass,
        ]);
        if self.current_token.kind == TokenKind::EndF {
            self.bump();
        }
        body
    }
}
