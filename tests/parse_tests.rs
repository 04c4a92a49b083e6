use bumpalo::Bump;
use spel_parser::ast::locator::{AstNode, Locator};
use spel_parser::ast::sexpr::SExprFormatter;
use spel_parser::ast::{Expr, Stmt, Type};
use spel_parser::{Lexer, ParseContext, Parser};

fn sexpr(src: &str) -> String {
    let arena = Bump::new();
    let output = spel_parser::parse(src, &arena).expect("program should parse");
    SExprFormatter::format(&output.program)
}

#[test]
fn class_with_superclass_field_and_empty_ctor() {
    let arena = Bump::new();
    let output = spel_parser::parse("CLASS Wand WITH Item ENCH INT charges CRAFT() ENDCLASS", &arena)
        .expect("program should parse");
    assert!(output.diagnostics.is_empty());

    match output.program.items[0] {
        Stmt::Class {
            name,
            superclass,
            fields,
            methods,
            ctor,
            dtor,
            ..
        } => {
            assert_eq!(*name, "Wand");
            assert_eq!(*superclass, Some("Item"));
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].name, "charges");
            assert_eq!(fields[0].ty, Type::Int);
            assert!(methods.is_empty());
            let ctor = ctor.expect("constructor present");
            assert!(ctor.params.is_empty());
            assert!(ctor.body.is_empty());
            assert!(dtor.is_none());
        }
        other => panic!("expected a class declaration, got {other:?}"),
    }

    assert_eq!(
        sexpr("CLASS Wand WITH Item ENCH INT charges CRAFT() ENDCLASS"),
        "(program\n  (class Wand (with Item) (field charges int) (craft (params))))"
    );
}

#[test]
fn else_attaches_to_innermost_open_conditional() {
    let src = "IF a BEGINIF IF b BEGINIF IF c BEGINIF EVAL 1 ENDIF BEGINELSE EVAL 2 ENDELSE ENDIF ENDIF";
    let arena = Bump::new();
    let output = spel_parser::parse(src, &arena).expect("program should parse");

    let Stmt::If {
        else_block: None,
        then_block: outer_then,
        ..
    } = output.program.items[0]
    else {
        panic!("expected outer if");
    };
    let Stmt::If {
        else_block: None,
        then_block: middle_then,
        ..
    } = outer_then[0]
    else {
        panic!("expected middle if without else");
    };
    let Stmt::If {
        else_block: Some(else_block),
        then_block,
        ..
    } = middle_then[0]
    else {
        panic!("expected innermost if to own the else");
    };
    assert_eq!(then_block.len(), 1);
    assert_eq!(else_block.len(), 1);
    assert!(matches!(else_block[0], Stmt::Eval { .. }));
}

#[test]
fn function_with_params_and_return_type() {
    assert_eq!(
        sexpr("BG add(a IN INT, b IN INT) OF INT RET a + b ENDF"),
        "(program\n  (fn add (params (a int) (b int)) int (ret (+ (id a) (id b)))))"
    );
}

#[test]
fn bgnp_declares_a_parameterless_function() {
    assert_eq!(
        sexpr("BGNP tick OF INT RET 1 ENDF"),
        "(program\n  (fn tick (params) int (ret (int 1))))"
    );
}

#[test]
fn bgnf_function_returns_void() {
    assert_eq!(
        sexpr("BGNF log(msg IN STRING) EVAL msg ENDF"),
        "(program\n  (fn log (params (msg string)) void (eval (id msg))))"
    );
}

#[test]
fn loops() {
    assert_eq!(
        sexpr("FOR (INT i = 0; i < 10; i = i + 1) EVAL i ENDFOR"),
        "(program\n  (for (var i int (int 0)) (< (id i) (int 10)) (assign (id i) (+ (id i) (int 1))) (body (eval (id i)))))"
    );
    assert_eq!(
        sexpr("WHILE (TRUE) EVAL 0 ENDWHILE"),
        "(program\n  (while (bool true) (body (eval (int 0)))))"
    );
}

#[test]
fn for_loop_headers_may_be_empty() {
    assert_eq!(
        sexpr("FOR (;;) EVAL 1 ENDFOR"),
        "(program\n  (for _ _ _ (body (eval (int 1)))))"
    );
}

#[test]
fn timed_block_keeps_duration_opaque() {
    let arena = Bump::new();
    let output =
        spel_parser::parse("TIME 3 + 2 CHNT EVAL go()", &arena).expect("program should parse");
    match output.program.items[0] {
        Stmt::Timed { duration, body, .. } => {
            assert!(matches!(duration, Expr::Binary { .. }));
            assert!(matches!(body, Stmt::Block { statements, .. } if statements.len() == 1));
        }
        other => panic!("expected a timed block, got {other:?}"),
    }
    assert_eq!(
        sexpr("TIME 3 + 2 CHNT EVAL go()"),
        "(program\n  (time (+ (int 3) (int 2)) (block (eval (call (id go))))))"
    );
}

#[test]
fn array_types_and_literals() {
    assert_eq!(
        sexpr("INT[] xs = [1, 2, 3] EVAL xs[0]"),
        "(program\n  (var xs int[] (array (int 1) (int 2) (int 3)))\n  (eval (index (id xs) (int 0))))"
    );
}

#[test]
fn const_declaration() {
    assert_eq!(
        sexpr("CONST FLOAT pi = 3.14"),
        "(program\n  (const pi float (float 3.14)))"
    );
}

#[test]
fn declared_class_name_opens_a_variable_declaration() {
    let arena = Bump::new();
    let output =
        spel_parser::parse("CLASS Item ENDCLASS Item it", &arena).expect("program should parse");
    match output.program.items[1] {
        Stmt::Var { name, ty, .. } => {
            assert_eq!(*name, "it");
            assert_eq!(*ty, Type::ClassRef("Item"));
        }
        other => panic!("expected a variable declaration, got {other:?}"),
    }
}

#[test]
fn undeclared_identifier_stays_an_expression_statement() {
    let arena = Bump::new();
    let output = spel_parser::parse("EVAL 0 Foo", &arena).expect("program should parse");
    assert!(matches!(output.program.items[1], Stmt::Expression { .. }));
}

#[test]
fn string_escapes_are_decoded() {
    let arena = Bump::new();
    let output = spel_parser::parse("EVAL \"a\\nb\"", &arena).expect("program should parse");
    match output.program.items[0] {
        Stmt::Eval { expr, .. } => match expr {
            Expr::Str { value, .. } => assert_eq!(*value, "a\nb"),
            other => panic!("expected a string literal, got {other:?}"),
        },
        other => panic!("expected an eval statement, got {other:?}"),
    }
}

#[test]
fn non_ascii_char_literal_parses() {
    let arena = Bump::new();
    let output = spel_parser::parse("EVAL 'é'", &arena).expect("program should parse");
    match output.program.items[0] {
        Stmt::Eval { expr, .. } => match expr {
            Expr::Char { value, span, .. } => {
                assert_eq!(*value, 'é');
                assert_eq!(span.last_column, 9);
            }
            other => panic!("expected a char literal, got {other:?}"),
        },
        other => panic!("expected an eval statement, got {other:?}"),
    }
}

#[test]
fn full_class_program() {
    let src = "\
CLASS Wand WITH Item
    ENCH INT charges
    CRAFT()
    BSTOW zap(target IN STRING) OF BOOL
        IF charges > 0 BEGINIF
            EVAL charges = charges - 1
            RET TRUE
        ENDIF BEGINELSE
            RET FALSE
        ENDELSE
    ENDF
    SACRF
        EVAL drain(charges)
    ENDF
ENDCLASS

BG main() OF INT
    Wand w
    EVAL w.zap(\"rat\")
    RET 0
ENDF
";
    let expected = concat!(
        "(program\n  ",
        "(class Wand (with Item) (field charges int) (craft (params)) ",
        "(method zap (params (target string)) bool ",
        "(if (> (id charges) (int 0)) ",
        "(then (eval (assign (id charges) (- (id charges) (int 1)))) (ret (bool true))) ",
        "(else (ret (bool false))))) ",
        "(sacrf (eval (call (id drain) (id charges)))))",
        "\n  ",
        "(fn main (params) int (var w Wand) (eval (call (member (id w) zap) (str \"rat\"))) (ret (int 0))))",
    );
    assert_eq!(sexpr(src), expected);
}

#[test]
fn trace_hook_observes_reductions() {
    let mut rules: Vec<&'static str> = Vec::new();
    let arena = Bump::new();
    let mut ctx = ParseContext::new();
    let mut hook = |rule, _span| rules.push(rule);
    let mut parser =
        Parser::new(Lexer::new("EVAL 1 + 2"), &arena, &mut ctx).with_trace_hook(&mut hook);
    let program = parser.parse_program();
    drop(parser);

    assert_eq!(program.items.len(), 1);
    assert!(rules.contains(&"binary"));
    assert!(rules.contains(&"eval_stmt"));
    assert_eq!(rules.last(), Some(&"program"));
}

#[test]
fn independent_parses_on_separate_threads() {
    std::thread::scope(|scope| {
        for i in 0..4 {
            scope.spawn(move || {
                let src = format!("EVAL {i} + {i}");
                let arena = Bump::new();
                let output = spel_parser::parse(&src, &arena).expect("program should parse");
                assert_eq!(output.program.items.len(), 1);
            });
        }
    });
}

#[test]
fn locator_finds_the_node_under_a_position() {
    let arena = Bump::new();
    let output = spel_parser::parse("EVAL 1 + 22", &arena).expect("program should parse");
    let path = Locator::find(&output.program, 1, 10);
    assert!(path.len() >= 3);
    match path.last().unwrap() {
        AstNode::Expr(Expr::Int { value, .. }) => assert_eq!(*value, 22),
        other => panic!("expected the integer literal, got {other:?}"),
    }
}
