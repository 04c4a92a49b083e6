use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::span::Span;

/// What a name was declared as. Only the classifications the parser
/// itself needs for disambiguation are tracked; full semantic checking
/// belongs to later stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclKind {
    Class,
    Function,
    Method,
    Field,
    Variable,
    Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    LexicalError,
    SyntaxError,
    DuplicateDeclaration,
    RecoveryExhausted,
}

impl DiagnosticKind {
    /// Fatal diagnostics make the whole parse fail; a duplicate
    /// declaration still yields a usable AST for tooling.
    pub fn is_fatal(self) -> bool {
        !matches!(self, DiagnosticKind::DuplicateDeclaration)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic<'src> {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span<'src>,
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {:?}: {}",
            self.span.first_line, self.span.first_column, self.kind, self.message
        )
    }
}

/// Per-invocation parse state: the diagnostic list and the declaration
/// scope stack. Created fresh for every parse, never shared between
/// concurrent parses, discarded (or drained via `finish`) afterwards.
pub struct ParseContext<'src> {
    diagnostics: Vec<Diagnostic<'src>>,
    scopes: Vec<HashMap<&'src str, DeclKind>>,
}

impl Default for ParseContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'src> ParseContext<'src> {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            scopes: vec![HashMap::new()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        // The global scope stays.
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Record a declaration in the innermost scope. A name already
    /// declared in that same scope comes back as a
    /// `DuplicateDeclaration` diagnostic referencing the second
    /// occurrence; outer-scope shadowing is allowed.
    pub fn declare(
        &mut self,
        name: &'src str,
        kind: DeclKind,
        span: Span<'src>,
    ) -> Result<(), Diagnostic<'src>> {
        let scope = self.scopes.last_mut().unwrap();
        if scope.contains_key(name) {
            return Err(Diagnostic {
                kind: DiagnosticKind::DuplicateDeclaration,
                message: format!("'{name}' is already declared in this scope"),
                span,
            });
        }
        scope.insert(name, kind);
        Ok(())
    }

    /// Innermost declaration of `name`, if any scope holds one.
    pub fn lookup(&self, name: &str) -> Option<DeclKind> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    pub fn report(&mut self, diagnostic: Diagnostic<'src>) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_fatal(&self) -> bool {
        self.diagnostics.iter().any(|d| d.kind.is_fatal())
    }

    pub fn diagnostics(&self) -> &[Diagnostic<'src>] {
        &self.diagnostics
    }

    /// Drain the context, returning its diagnostics ordered by source
    /// position.
    pub fn finish(mut self) -> Vec<Diagnostic<'src>> {
        self.diagnostics.sort_by_key(|d| {
            (
                d.span.first_line,
                d.span.first_column,
                d.span.last_line,
                d.span.last_column,
            )
        });
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_in_same_scope_is_reported() {
        let mut ctx = ParseContext::new();
        assert!(ctx.declare("f", DeclKind::Function, Span::default()).is_ok());
        let err = ctx
            .declare("f", DeclKind::Function, Span::new(2, 1, 2, 2, "f"))
            .unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::DuplicateDeclaration);
        assert_eq!(err.span.first_line, 2);
    }

    #[test]
    fn shadowing_in_inner_scope_is_allowed() {
        let mut ctx = ParseContext::new();
        ctx.declare("x", DeclKind::Variable, Span::default()).unwrap();
        ctx.push_scope();
        assert!(ctx.declare("x", DeclKind::Variable, Span::default()).is_ok());
        assert_eq!(ctx.lookup("x"), Some(DeclKind::Variable));
        ctx.pop_scope();
        assert_eq!(ctx.lookup("x"), Some(DeclKind::Variable));
    }

    #[test]
    fn finish_orders_diagnostics_by_position() {
        let mut ctx = ParseContext::new();
        ctx.report(Diagnostic {
            kind: DiagnosticKind::SyntaxError,
            message: "second".into(),
            span: Span::new(5, 1, 5, 2, "x"),
        });
        ctx.report(Diagnostic {
            kind: DiagnosticKind::LexicalError,
            message: "first".into(),
            span: Span::new(2, 4, 2, 5, "y"),
        });
        let diags = ctx.finish();
        assert_eq!(diags[0].message, "first");
        assert_eq!(diags[1].message, "second");
    }

    #[test]
    fn duplicates_are_not_fatal() {
        assert!(!DiagnosticKind::DuplicateDeclaration.is_fatal());
        assert!(DiagnosticKind::SyntaxError.is_fatal());
        assert!(DiagnosticKind::LexicalError.is_fatal());
        assert!(DiagnosticKind::RecoveryExhausted.is_fatal());
    }
}
