use rechenbuch::expr::Operator;
use rechenbuch::interpreter::{EvalErr, InterpretErr, Interpreter};
use rechenbuch::parser::{parse, ParseErr};
use rechenbuch::scanner::{scan, LexErr};
use rechenbuch::token::TokenType;

#[test]
fn division_by_zero() {
    let err = Interpreter::new().run("5/0").unwrap_err();
    assert_eq!(err, InterpretErr::Eval(EvalErr::DivisionByZero));
    assert_eq!(err.to_string(), "Division by zero.");
}

#[test]
fn lexical_error() {
    let mut scanner = scan("2+@");
    scanner.next_token().unwrap();
    scanner.next_token().unwrap();
    let err = scanner.next_token().unwrap_err();
    assert_eq!(err, LexErr::UnexpectedChar { ch: '@', pos: 2 });
    assert_eq!(err.to_string(), "[pos 2] Unexpected character '@'.");

    match Interpreter::new().run("2+@") {
        Err(InterpretErr::Lex(LexErr::UnexpectedChar { ch: '@', .. })) => {}
        x => panic!("{x:?} should not be reported here."),
    }
}

#[test]
fn missing_operand() {
    match parse(scan("2+")) {
        Err(ParseErr::UnexpectedToken { found: TokenType::Eof, .. }) => {}
        x => panic!("{x:?} should not be reported here."),
    }
}

#[test]
fn missing_right_paren() {
    let err = parse(scan("(2+3")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "[pos 4] Expected ')' but got end of input."
    );
}

#[test]
fn operator_without_left_operand() {
    assert!(matches!(
        parse(scan("*3")),
        Err(ParseErr::UnexpectedToken { found: TokenType::Star, pos: 0 })
    ));
    // No unary minus.
    assert!(matches!(
        parse(scan("-3")),
        Err(ParseErr::UnexpectedToken { found: TokenType::Minus, .. })
    ));
}

#[test]
fn floats_are_rejected() {
    assert!(matches!(
        Interpreter::new().run("1.5"),
        Err(InterpretErr::Lex(LexErr::UnexpectedChar { ch: '.', pos: 1 }))
    ));
}

#[test]
fn overflow() {
    assert_eq!(
        Interpreter::new().run("9223372036854775807+1"),
        Err(InterpretErr::Eval(EvalErr::Overflow {
            op: Operator::Add,
            lhs: i64::MAX,
            rhs: 1
        }))
    );
    assert_eq!(
        Interpreter::new().run("3037000500*3037000500").unwrap_err().to_string(),
        "Integer overflow in 3037000500 * 3037000500."
    );
    assert!(matches!(
        Interpreter::new().run("9223372036854775808"),
        Err(InterpretErr::Lex(LexErr::IntegerOverflow { .. }))
    ));
}

#[test]
fn division_by_zero_after_left_side() {
    // The left operand is evaluated first, so its own error wins.
    assert_eq!(
        Interpreter::new().run("(1/0)*(9223372036854775807*2)"),
        Err(InterpretErr::Eval(EvalErr::DivisionByZero))
    );
}

#[test]
fn deep_parentheses() {
    let code = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
    match Interpreter::new().run(&code) {
        Err(InterpretErr::Parse(ParseErr::TooDeep { .. })) => {}
        x => panic!("{x:?} should not be reported here."),
    }
}
