use bumpalo::Bump;
use spel_parser::ast::sexpr::SExprFormatter;

fn main() {
    let source = r#"
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
ENDCLASS

BG main() OF INT
    Wand w
    EVAL w.zap("rat")
    RET 0
ENDF
"#;

    let arena = Bump::new();
    match spel_parser::parse(source, &arena) {
        Ok(output) => {
            println!("{}", SExprFormatter::format(&output.program));
            for diagnostic in &output.diagnostics {
                eprintln!("warning: {diagnostic}");
            }
        }
        Err(failure) => {
            for diagnostic in &failure.diagnostics {
                eprintln!("error: {diagnostic}");
            }
            std::process::exit(1);
        }
    }
}
