//! Jolt: a miniature JavaScript-like expression engine.
//!
//! Source is lowered through a type-directed bytecode compiler and
//! executed on a stack-based virtual machine. Six value representations
//! (undefined, null, boolean, int32, float64, string) are resolved at
//! compile time, with explicit coercion opcodes spliced in wherever an
//! arithmetic or concatenation site mixes them.

pub mod ast;
pub mod bytecode;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod span;

pub use bytecode::{Chunk, Compiler, Value, Vm};
pub use error::JoltError;

use ast::Program;
use bytecode::Op;
use lexer::Scanner;
use parser::Parser;

/// Parse source into a program.
pub fn parse(source: &str) -> Result<Program, JoltError> {
    let tokens = Scanner::new(source).scan_tokens()?;
    let program = Parser::new(tokens).parse()?;
    Ok(program)
}

/// Compile source into a bytecode chunk.
pub fn compile(source: &str) -> Result<Chunk, JoltError> {
    let program = parse(source)?;
    let chunk = Compiler::new().compile(&program)?;
    Ok(chunk)
}

/// Compile and execute source, discarding the result.
pub fn run(source: &str) -> Result<(), JoltError> {
    let chunk = compile(source)?;
    Vm::new().run(&chunk)?;
    Ok(())
}

/// Compile and execute source, returning the value of the final
/// statement (None for programs ending in a declaration-free statement
/// such as `;`). Statement lowering pops each statement's value; the
/// trailing pop is dropped here so the completion value survives.
pub fn eval(source: &str) -> Result<Option<Value>, JoltError> {
    let program = parse(source)?;
    let mut chunk = Compiler::new().compile(&program)?;

    if let Some((Op::Pop, offset)) = chunk.last_instruction() {
        chunk.code.truncate(offset);
    }

    let mut vm = Vm::new();
    vm.run(&chunk)?;
    Ok(vm.top())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::Kind;

    #[test]
    fn test_eval_int_addition() {
        assert_eq!(eval("1 + 2").unwrap(), Some(Value::Int32(3)));
    }

    #[test]
    fn test_eval_string_concatenation() {
        assert_eq!(
            eval("\"ab\" + \"c\"").unwrap(),
            Some(Value::String("abc".to_string()))
        );
    }

    #[test]
    fn test_eval_mixed_addition() {
        assert_eq!(
            eval("1 + \"2\"").unwrap(),
            Some(Value::String("12".to_string()))
        );
    }

    #[test]
    fn test_eval_division_is_float() {
        assert_eq!(eval("1 / 2").unwrap(), Some(Value::Float64(0.5)));
    }

    #[test]
    fn test_eval_negation() {
        assert_eq!(eval("-1234567890").unwrap(), Some(Value::Int32(-1234567890)));
        assert_eq!(
            eval("-3000000000").unwrap(),
            Some(Value::Float64(-3000000000.0))
        );
        assert_eq!(eval("-1.5").unwrap(), Some(Value::Float64(-1.5)));
    }

    #[test]
    fn test_eval_variables() {
        assert_eq!(eval("var a = 1; a + 1").unwrap(), Some(Value::Int32(2)));
        assert_eq!(
            eval("var a = 1, b = 2; a + b").unwrap(),
            Some(Value::Int32(3))
        );
        assert_eq!(eval("var x; x").unwrap(), Some(Value::Undefined));
    }

    #[test]
    fn test_eval_assignment_value() {
        assert_eq!(eval("a = 5").unwrap(), Some(Value::Int32(5)));
        assert_eq!(eval("a = b = 2; a + b").unwrap(), Some(Value::Int32(4)));
    }

    #[test]
    fn test_eval_coercion_chains() {
        assert_eq!(eval("null + 1").unwrap(), Some(Value::Float64(1.0)));
        assert_eq!(eval("true + 1").unwrap(), Some(Value::Float64(2.0)));
        assert_eq!(
            eval("true + \"!\"").unwrap(),
            Some(Value::String("true!".to_string()))
        );
        match eval("undefined + 1").unwrap() {
            Some(Value::Float64(n)) => assert!(n.is_nan()),
            other => panic!("expected NaN, got {:?}", other),
        }
    }

    #[test]
    fn test_eval_modulo_always_floats() {
        assert_eq!(eval("7 % 3").unwrap(), Some(Value::Float64(1.0)));
        assert_eq!(eval("5.5 % 2").unwrap(), Some(Value::Float64(1.5)));
    }

    #[test]
    fn test_eval_reserved_number_lexemes() {
        match eval("NaN").unwrap() {
            Some(Value::Float64(n)) => assert!(n.is_nan()),
            other => panic!("expected NaN, got {:?}", other),
        }
        assert_eq!(eval("Infinity").unwrap(), Some(Value::Float64(f64::INFINITY)));
        assert_eq!(
            eval("-Infinity").unwrap(),
            Some(Value::Float64(f64::NEG_INFINITY))
        );
    }

    #[test]
    fn test_eval_empty_program() {
        assert_eq!(eval("").unwrap(), None);
        assert_eq!(eval(";").unwrap(), None);
    }

    #[test]
    fn test_eval_errors_propagate() {
        assert!(matches!(eval("@"), Err(JoltError::Lexer(_))));
        assert!(matches!(eval("1 +"), Err(JoltError::Parser(_))));
        assert!(matches!(eval("missing + 1"), Err(JoltError::Compile(_))));
    }

    #[test]
    fn test_top_of_stack_kind_matches_inference() {
        let cases = [
            ("1 + 2", Kind::Int32),
            ("1 / 2", Kind::Float64),
            ("\"a\" + 1", Kind::String),
            ("true", Kind::Bool),
            ("null", Kind::Null),
            ("undefined", Kind::Undefined),
            ("-\"3\"", Kind::Float64),
            ("var a = 1; a", Kind::Int32),
        ];

        for (source, expected) in cases {
            let program = parse(source).unwrap();
            let mut compiler = Compiler::new();
            let mut chunk = compiler.compile(&program).unwrap();
            if let Some((Op::Pop, offset)) = chunk.last_instruction() {
                chunk.code.truncate(offset);
            }

            let mut vm = Vm::new();
            vm.run(&chunk).unwrap();
            let value = vm.top().unwrap_or(Value::Undefined);
            assert_eq!(value.kind(), expected, "source: {}", source);
        }
    }

    #[test]
    fn test_run_discards_result() {
        assert!(run("1 + 2; \"x\" + \"y\";").is_ok());
    }
}
