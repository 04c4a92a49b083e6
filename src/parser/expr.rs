use crate::ast::{BinaryOp, Expr, ExprId, UnaryOp};
use crate::lexer::token::{TokenKind, TokenValue};
use crate::parser::Parser;
use crate::span::Span;

/// Binding power of the assignment operator; right-associative, lowest
/// of the table.
const ASSIGN_BP: u8 = 10;
/// Right binding power of prefix NOT and unary minus: tighter than any
/// binary operator, looser than call/member/index.
const UNARY_BP: u8 = 80;
/// Left binding power of the postfix forms (call, member, index).
const POSTFIX_BP: u8 = 90;

impl<'src: 'ast, 'ast, 'ctx> Parser<'src, 'ast, 'ctx> {
    pub(super) fn parse_expr(&mut self, min_bp: u8) -> ExprId<'ast> {
        let mut left = self.parse_nud();

        loop {
            let op = match self.current_token.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Eq => BinaryOp::Eq,
                TokenKind::Neq => BinaryOp::Neq,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Leq => BinaryOp::Leq,
                TokenKind::Beq => BinaryOp::Beq,
                TokenKind::And => BinaryOp::And,
                TokenKind::Or => BinaryOp::Or,
                TokenKind::Assign => {
                    if ASSIGN_BP < min_bp {
                        break;
                    }
                    self.bump();

                    // Right associative.
                    let value = self.parse_expr(ASSIGN_BP - 1);
                    let span = Span::merge(left.span(), value.span());
                    self.trace("assign", span);
                    left = self.arena.alloc(Expr::Assign {
                        target: left,
                        value,
                        span,
                    });
                    continue;
                }
                TokenKind::OpenParen => {
                    if POSTFIX_BP < min_bp {
                        break;
                    }
                    let (args, args_span) = self.parse_call_arguments();
                    let span = Span::merge(left.span(), args_span);
                    self.trace("call", span);
                    left = self.arena.alloc(Expr::Call {
                        callee: left,
                        args,
                        span,
                    });
                    continue;
                }
                TokenKind::Dot => {
                    if POSTFIX_BP < min_bp {
                        break;
                    }
                    self.bump();
                    let Some((member, member_span)) = self.expect_identifier("a member name")
                    else {
                        let span = Span::merge(left.span(), self.prev_span);
                        left = self.arena.alloc(Expr::Error { span });
                        continue;
                    };
                    let span = Span::merge(left.span(), member_span);
                    self.trace("member", span);
                    left = self.arena.alloc(Expr::Member {
                        object: left,
                        member,
                        span,
                    });
                    continue;
                }
                TokenKind::OpenBracket => {
                    if POSTFIX_BP < min_bp {
                        break;
                    }
                    self.bump();
                    let index = self.parse_expr(0);
                    self.expect(TokenKind::CloseBracket, "']'");
                    let span = Span::merge(left.span(), self.prev_span);
                    self.trace("index", span);
                    left = self.arena.alloc(Expr::Index {
                        array: left,
                        index,
                        span,
                    });
                    continue;
                }
                _ => break,
            };

            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }

            self.bump();
            let right = self.parse_expr(r_bp);

            let span = Span::merge(left.span(), right.span());
            self.trace("binary", span);
            left = self.arena.alloc(Expr::Binary {
                op,
                left,
                right,
                span,
            });
        }

        left
    }

    fn parse_nud(&mut self) -> ExprId<'ast> {
        let token = self.current_token;
        match token.kind {
            TokenKind::Nr => {
                self.bump();
                let value = match token.value {
                    TokenValue::Int(v) => v,
                    _ => 0,
                };
                self.arena.alloc(Expr::Int {
                    value,
                    span: token.span,
                })
            }
            TokenKind::Nrf => {
                self.bump();
                let value = match token.value {
                    TokenValue::Float(v) => v,
                    _ => 0.0,
                };
                self.arena.alloc(Expr::Float {
                    value,
                    span: token.span,
                })
            }
            TokenKind::Str => {
                self.bump();
                let raw = match token.value {
                    TokenValue::Str(raw) => raw,
                    _ => "",
                };
                self.arena.alloc(Expr::Str {
                    value: self.unescape(raw),
                    span: token.span,
                })
            }
            TokenKind::Chr => {
                self.bump();
                let value = match token.value {
                    TokenValue::Char(v) => v,
                    _ => '\0',
                };
                self.arena.alloc(Expr::Char {
                    value,
                    span: token.span,
                })
            }
            TokenKind::True | TokenKind::False => {
                self.bump();
                self.arena.alloc(Expr::Bool {
                    value: token.kind == TokenKind::True,
                    span: token.span,
                })
            }
            TokenKind::Id => {
                self.bump();
                let name = match token.value {
                    TokenValue::Ident(name) => name,
                    _ => "",
                };
                self.arena.alloc(Expr::Identifier {
                    name,
                    span: token.span,
                })
            }
            TokenKind::Minus | TokenKind::Not => {
                self.bump();
                let op = if token.kind == TokenKind::Not {
                    UnaryOp::Not
                } else {
                    UnaryOp::Neg
                };
                let expr = self.parse_expr(UNARY_BP);
                let span = Span::merge(token.span, expr.span());
                self.trace("unary", span);
                self.arena.alloc(Expr::Unary { op, expr, span })
            }
            TokenKind::OpenParen => {
                self.bump();
                let inner = self.parse_expr(0);
                self.expect(TokenKind::CloseParen, "')'");
                inner
            }
            TokenKind::OpenBracket => self.parse_array_literal(),
            _ => {
                self.syntax_error(
                    format!("expected an expression near '{}'", token.span.last_token),
                    token.span,
                );
                // Consume the offending token so recovery always makes
                // progress.
                self.bump();
                self.arena.alloc(Expr::Error { span: token.span })
            }
        }
    }

    fn parse_array_literal(&mut self) -> ExprId<'ast> {
        let start = self.current_token.span;
        self.bump(); // [

        let mut elements = Vec::new();
        while self.current_token.kind != TokenKind::CloseBracket
            && self.current_token.kind != TokenKind::Eof
        {
            elements.push(self.parse_expr(0));
            if self.current_token.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(TokenKind::CloseBracket, "']'");

        let span = Span::merge(start, self.prev_span);
        self.trace("array_literal", span);
        self.arena.alloc(Expr::Array {
            elements: self.arena.alloc_slice_copy(&elements),
            span,
        })
    }

    fn parse_call_arguments(&mut self) -> (&'ast [ExprId<'ast>], Span<'ast>) {
        let start = self.current_token.span;
        self.bump(); // (

        let mut args = Vec::new();
        while self.current_token.kind != TokenKind::CloseParen
            && self.current_token.kind != TokenKind::Eof
        {
            args.push(self.parse_expr(0));
            if self.current_token.kind == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(TokenKind::CloseParen, "')'");

        let span = Span::merge(start, self.prev_span);
        (self.arena.alloc_slice_copy(&args), span)
    }

    /// Decode string escapes. Escape-free literals borrow the source
    /// slice; anything else is decoded into the arena.
    fn unescape(&self, raw: &'src str) -> &'ast str {
        if !raw.contains('\\') {
            return raw;
        }
        let mut out = String::with_capacity(raw.len());
        let mut chars = raw.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('0') => out.push('\0'),
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some('\'') => out.push('\''),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        }
        self.arena.alloc_str(&out)
    }
}

fn infix_binding_power(op: BinaryOp) -> (u8, u8) {
    match op {
        BinaryOp::Or => (20, 21),
        BinaryOp::And => (30, 31),
        BinaryOp::Eq | BinaryOp::Neq => (40, 41),
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Leq | BinaryOp::Beq => (50, 51),
        BinaryOp::Add | BinaryOp::Sub => (60, 61),
        BinaryOp::Mul | BinaryOp::Div => (70, 71),
    }
}
