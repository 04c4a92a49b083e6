pub mod ast;
pub mod context;
pub mod lexer;
pub mod parser;
pub mod span;

use std::fmt;

use bumpalo::Bump;

pub use context::{Diagnostic, DiagnosticKind, ParseContext};
pub use lexer::Lexer;
pub use parser::Parser;
pub use span::Span;

use ast::Program;

/// A completed parse with no fatal diagnostics. Non-fatal entries
/// (duplicate declarations) may still be present.
#[derive(Debug)]
pub struct ParseOutput<'ast> {
    pub program: Program<'ast>,
    pub diagnostics: Vec<Diagnostic<'ast>>,
}

/// A parse that recorded at least one fatal diagnostic. The best-effort
/// AST is kept so tooling callers can still inspect it.
#[derive(Debug)]
pub struct ParseError<'ast> {
    pub program: Program<'ast>,
    pub diagnostics: Vec<Diagnostic<'ast>>,
}

impl fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fatal = self
            .diagnostics
            .iter()
            .filter(|d| d.kind.is_fatal())
            .count();
        write!(f, "parsing failed with {fatal} fatal diagnostic(s)")?;
        if let Some(first) = self.diagnostics.iter().find(|d| d.kind.is_fatal()) {
            write!(f, "; first: {first}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError<'_> {}

/// Parse one SPEL source unit. The caller-supplied arena owns every AST
/// node; the context lives exactly as long as this call. `Err` iff the
/// diagnostic list holds at least one fatal entry.
pub fn parse<'src: 'ast, 'ast>(
    source: &'src str,
    arena: &'ast Bump,
) -> Result<ParseOutput<'ast>, ParseError<'ast>> {
    let mut ctx = ParseContext::new();
    let program = {
        let mut parser = Parser::new(Lexer::new(source), arena, &mut ctx);
        parser.parse_program()
    };
    let fatal = ctx.has_fatal();
    let diagnostics = ctx.finish();

    if fatal {
        Err(ParseError {
            program,
            diagnostics,
        })
    } else {
        Ok(ParseOutput {
            program,
            diagnostics,
        })
    }
}
