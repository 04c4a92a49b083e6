use bumpalo::Bump;
use insta::assert_snapshot;
use spel_parser::ast::sexpr::SExprFormatter;
use spel_parser::ast::visitor::Visitor;

fn first_stmt(src: &str) -> String {
    let arena = Bump::new();
    let output = spel_parser::parse(src, &arena).expect("program should parse");
    let mut formatter = SExprFormatter::new();
    formatter.visit_stmt(output.program.items[0]);
    formatter.finish()
}

#[test]
fn not_binds_tighter_than_and_tighter_than_or() {
    assert_snapshot!(
        first_stmt("EVAL NOT a AND b OR c"),
        @"(eval (or (and (not (id a)) (id b)) (id c)))"
    );
}

#[test]
fn unary_minus_binds_tighter_than_multiplication() {
    assert_snapshot!(
        first_stmt("EVAL -a * b"),
        @"(eval (* (neg (id a)) (id b)))"
    );
}

#[test]
fn multiplicative_over_additive() {
    assert_snapshot!(
        first_stmt("EVAL 1 + 2 * 3 - 4"),
        @"(eval (- (+ (int 1) (* (int 2) (int 3))) (int 4)))"
    );
}

#[test]
fn assignment_is_right_associative() {
    assert_snapshot!(
        first_stmt("EVAL a = b = 2"),
        @"(eval (assign (id a) (assign (id b) (int 2))))"
    );
}

#[test]
fn relational_binds_tighter_than_equality() {
    assert_snapshot!(
        first_stmt("EVAL a < b == c > d"),
        @"(eval (== (< (id a) (id b)) (> (id c) (id d))))"
    );
}

#[test]
fn leq_and_beq_sit_with_the_relationals() {
    assert_snapshot!(
        first_stmt("EVAL a <= b OR a >= b"),
        @"(eval (or (<= (id a) (id b)) (>= (id a) (id b))))"
    );
}

#[test]
fn postfix_forms_bind_tightest() {
    assert_snapshot!(
        first_stmt("EVAL x.y(1)[2] = 3"),
        @"(eval (assign (index (call (member (id x) y) (int 1)) (int 2)) (int 3)))"
    );
}

#[test]
fn parentheses_override_precedence() {
    assert_snapshot!(
        first_stmt("EVAL (a OR b) AND c"),
        @"(eval (and (or (id a) (id b)) (id c)))"
    );
}

#[test]
fn comparison_of_negated_operand() {
    assert_snapshot!(
        first_stmt("EVAL -a + b < c"),
        @"(eval (< (+ (neg (id a)) (id b)) (id c)))"
    );
}
