use bumpalo::Bump;
use spel_parser::ast::{Expr, Stmt};

#[test]
fn multi_line_production_merges_first_and_last_symbol() {
    let src = "EVAL 1\nIF x BEGINIF\nEVAL 2\nENDIF";
    let arena = Bump::new();
    let output = spel_parser::parse(src, &arena).expect("program should parse");

    let if_span = output.program.items[1].span();
    assert_eq!(if_span.first_line, 2);
    assert_eq!(if_span.first_column, 1);
    assert_eq!(if_span.last_line, 4);
    assert_eq!(if_span.last_column, 6);
    assert_eq!(if_span.last_token, "ENDIF");
}

#[test]
fn program_span_covers_first_through_last_item() {
    let src = "EVAL 1\nEVAL 2\nEVAL 3";
    let arena = Bump::new();
    let output = spel_parser::parse(src, &arena).expect("program should parse");

    let span = output.program.span;
    assert_eq!(span.first_line, 1);
    assert_eq!(span.first_column, 1);
    assert_eq!(span.last_line, 3);
}

#[test]
fn empty_source_yields_a_zero_width_span() {
    let arena = Bump::new();
    let output = spel_parser::parse("", &arena).expect("empty program should parse");
    let span = output.program.span;
    assert!(span.is_empty());
    assert_eq!(span.first_line, 1);
    assert_eq!(span.first_column, 1);
}

#[test]
fn expression_spans_cross_lines() {
    let arena = Bump::new();
    let output = spel_parser::parse("EVAL 1 +\n2", &arena).expect("program should parse");
    match output.program.items[0] {
        Stmt::Eval { expr, span, .. } => {
            let expr_span = expr.span();
            assert_eq!(expr_span.first_line, 1);
            assert_eq!(expr_span.first_column, 6);
            assert_eq!(expr_span.last_line, 2);
            // The statement span contains the expression span.
            assert_eq!(span.first_column, 1);
            assert_eq!(span.last_line, 2);
        }
        other => panic!("expected an eval statement, got {other:?}"),
    }
}

#[test]
fn every_node_span_contains_its_children() {
    let src = "BG f(a IN INT) OF INT\nIF a > 0 BEGINIF\nRET a * 2\nENDIF\nRET 0\nENDF";
    let arena = Bump::new();
    let output = spel_parser::parse(src, &arena).expect("program should parse");

    let Stmt::Function(decl) = output.program.items[0] else {
        panic!("expected a function");
    };
    let fn_span = decl.span;
    for stmt in decl.body {
        let s = stmt.span();
        assert!(fn_span.first_line <= s.first_line && s.last_line <= fn_span.last_line);
    }
    let Stmt::If {
        condition, span, ..
    } = decl.body[0]
    else {
        panic!("expected an if statement");
    };
    let cond = condition.span();
    assert!(span.first_line <= cond.first_line && cond.last_line <= span.last_line);
    assert_eq!(cond.first_line, 2);
    assert_eq!(cond.first_column, 4);
}

#[test]
fn literal_spans_are_token_exact() {
    let arena = Bump::new();
    let output = spel_parser::parse("EVAL 123 + 4", &arena).expect("program should parse");
    let Stmt::Eval { expr, .. } = output.program.items[0] else {
        panic!("expected eval");
    };
    let Expr::Binary { left, right, .. } = expr else {
        panic!("expected binary");
    };
    let left = left.span();
    assert_eq!((left.first_column, left.last_column), (6, 9));
    assert_eq!(left.last_token, "123");
    let right = right.span();
    assert_eq!((right.first_column, right.last_column), (12, 13));
}
