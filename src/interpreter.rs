use std::io::{self, Write};

use thiserror::Error;

use crate::environment::Environment;
use crate::expr::Expr;
use crate::stmt::Stmt;
use crate::token::{Token, TokenType};
use crate::value::Value;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Operand must be a number")]
    OperandNotNumber { operator: Token },
    #[error("Operands must be numbers")]
    OperandsNotNumbers { operator: Token },
    #[error("Operands must be numbers or strings")]
    OperandsNotNumbersOrStrings { operator: Token },
    #[error("Unsupported operator '{}'.", .operator.lexeme)]
    UnsupportedOperator { operator: Token },
    #[error("Undefined variable '{}'.", .name.lexeme)]
    UndefinedVariable { name: Token },
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl RuntimeError {
    /// The token the error is reported at; `None` for output failures, which
    /// are not caused by the program.
    pub fn token(&self) -> Option<&Token> {
        match self {
            RuntimeError::OperandNotNumber { operator }
            | RuntimeError::OperandsNotNumbers { operator }
            | RuntimeError::OperandsNotNumbersOrStrings { operator }
            | RuntimeError::UnsupportedOperator { operator } => Some(operator),
            RuntimeError::UndefinedVariable { name } => Some(name),
            RuntimeError::Output(_) => None,
        }
    }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Walks statements directly; `print` output goes to `out`.
pub struct Interpreter<W: Write = io::Stdout> {
    environment: Environment,
    out: W,
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Interpreter::new(io::stdout())
    }
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Interpreter {
            environment: Environment::new(),
            out,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs `statements` in order. The first runtime error stops the rest.
    pub fn interpret(&mut self, statements: &[Stmt]) -> RuntimeResult<()> {
        for statement in statements {
            self.execute(statement)?;
        }
        Ok(())
    }

    fn execute(&mut self, statement: &Stmt) -> RuntimeResult<()> {
        match statement {
            Stmt::Print(value) => {
                let value = self.evaluate(value)?;
                writeln!(self.out, "{}", value)?;
            }
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
            }
            Stmt::Var(name, initializer) => {
                let value = match initializer {
                    Some(init_expression) => self.evaluate(init_expression)?,
                    None => Value::Nil,
                };

                self.environment.define(&name.lexeme, value);
            }
            Stmt::Block(statements) => self.execute_block(statements)?,
        }
        Ok(())
    }

    fn execute_block(&mut self, statements: &[Stmt]) -> RuntimeResult<()> {
        self.environment.push_scope();
        let result = self.interpret(statements);
        self.environment.pop_scope();
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        match expr {
            Expr::Binary(left, operator, right) => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;

                match operator.r#type {
                    // Equality
                    TokenType::BangEqual => Ok(Value::Bool(!is_equal(&left, &right))),
                    TokenType::EqualEqual => Ok(Value::Bool(is_equal(&left, &right))),

                    // Comparison
                    TokenType::Greater => {
                        let (left, right) = check_number_operands(operator, left, right)?;
                        Ok(Value::Bool(left > right))
                    }
                    TokenType::GreaterEqual => {
                        let (left, right) = check_number_operands(operator, left, right)?;
                        Ok(Value::Bool(left >= right))
                    }
                    TokenType::Less => {
                        let (left, right) = check_number_operands(operator, left, right)?;
                        Ok(Value::Bool(left < right))
                    }
                    TokenType::LessEqual => {
                        let (left, right) = check_number_operands(operator, left, right)?;
                        Ok(Value::Bool(left <= right))
                    }

                    // Arithmetic
                    TokenType::Minus => {
                        let (left, right) = check_number_operands(operator, left, right)?;
                        Ok(Value::Number(left - right))
                    }
                    TokenType::Slash => {
                        let (left, right) = check_number_operands(operator, left, right)?;
                        Ok(Value::Number(left / right))
                    }
                    TokenType::Star => {
                        let (left, right) = check_number_operands(operator, left, right)?;
                        Ok(Value::Number(left * right))
                    }
                    TokenType::Plus => match (left, right) {
                        (Value::Number(left), Value::Number(right)) => {
                            Ok(Value::Number(left + right))
                        }
                        (Value::String(left), Value::String(right)) => {
                            Ok(Value::String(format!("{left}{right}").into()))
                        }
                        (_, _) => Err(RuntimeError::OperandsNotNumbersOrStrings {
                            operator: operator.clone(),
                        }),
                    },
                    _ => Err(RuntimeError::UnsupportedOperator {
                        operator: operator.clone(),
                    }),
                }
            }
            Expr::Grouping(expr) => self.evaluate(expr),
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Unary(operator, right) => {
                let right = self.evaluate(right)?;

                match operator.r#type {
                    TokenType::Minus => {
                        let right = check_number_operand(operator, right)?;
                        Ok(Value::Number(-right))
                    }
                    TokenType::Bang => Ok(Value::Bool(!right.is_truthy())),
                    _ => Err(RuntimeError::UnsupportedOperator {
                        operator: operator.clone(),
                    }),
                }
            }
            Expr::Variable(name) => self.environment.get(name),
            Expr::Assign(name, value) => {
                let value = self.evaluate(value)?;
                self.environment.assign(name, value.clone())?;
                Ok(value)
            }
        }
    }
}

fn check_number_operands(operator: &Token, left: Value, right: Value) -> RuntimeResult<(f64, f64)> {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => Ok((left, right)),
        (_, _) => Err(RuntimeError::OperandsNotNumbers {
            operator: operator.clone(),
        }),
    }
}

fn check_number_operand(operator: &Token, operand: Value) -> RuntimeResult<f64> {
    match operand {
        Value::Number(value) => Ok(value),
        _ => Err(RuntimeError::OperandNotNumber {
            operator: operator.clone(),
        }),
    }
}

/// `nil` only equals `nil`; values of different types are never equal.
fn is_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Nil, _) => false,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::parser::Parser;
    use crate::scanner::Scanner;
    use indoc::indoc;

    fn parse(source: &str) -> Vec<Stmt> {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new(source, &mut diagnostics).scan_tokens();
        let statements = Parser::new(tokens, &mut diagnostics).parse();
        assert!(!diagnostics.had_error(), "{:?}", diagnostics.reported());
        statements
    }

    fn run(source: &str) -> (String, RuntimeResult<()>) {
        let mut interpreter = Interpreter::new(Vec::new());
        let result = interpreter.interpret(&parse(source));
        let output = String::from_utf8(interpreter.into_output()).unwrap();
        (output, result)
    }

    fn output(source: &str) -> String {
        let (output, result) = run(source);
        if let Err(error) = result {
            panic!("unexpected runtime error: {error}");
        }
        output
    }

    fn error(source: &str) -> RuntimeError {
        match run(source).1 {
            Err(error) => error,
            Ok(()) => panic!("expected a runtime error for {source:?}"),
        }
    }

    #[test]
    fn arithmetic_and_rendering() {
        assert_eq!(output("print 1 + 1;"), "2\n");
        assert_eq!(output("print 7 / 2;"), "3.5\n");
        assert_eq!(output("print (1 + 2) * 3 - -1;"), "10\n");
        assert_eq!(output("print \"a\" + \"b\";"), "ab\n");
        assert_eq!(output("print nil;"), "nil\n");
        assert_eq!(output("print true;"), "true\n");
    }

    #[test]
    fn truthiness() {
        assert_eq!(output("print !nil;"), "true\n");
        assert_eq!(output("print !0;"), "false\n");
        assert_eq!(output("print !\"\";"), "false\n");
        assert_eq!(output("print !!false;"), "false\n");
    }

    #[test]
    fn comparison_and_equality() {
        assert_eq!(output("print 1 < 2;"), "true\n");
        assert_eq!(output("print 2 <= 1;"), "false\n");
        assert_eq!(output("print 3 >= 3;"), "true\n");
        assert_eq!(output("print nil == nil;"), "true\n");
        assert_eq!(output("print nil == false;"), "false\n");
        assert_eq!(output("print 1 == \"1\";"), "false\n");
        assert_eq!(output("print \"a\" != \"a\";"), "false\n");
        assert_eq!(output("print 1 != nil;"), "true\n");
    }

    #[test]
    fn division_follows_ieee() {
        assert_eq!(output("print 1 / 0;"), "inf\n");
        assert_eq!(output("print -1 / 0;"), "-inf\n");
    }

    #[test]
    fn mixed_plus_is_a_type_error() {
        let error = error("1 + \"x\";");
        assert_eq!(error.to_string(), "Operands must be numbers or strings");
        assert_eq!(error.token().map(|t| &*t.lexeme), Some("+"));
    }

    #[test]
    fn negating_a_string_is_a_type_error() {
        let error = error("-\"x\";");
        assert_eq!(error.to_string(), "Operand must be a number");
        assert_eq!(error.token().map(|t| &*t.lexeme), Some("-"));
    }

    #[test]
    fn hand_built_trees_with_odd_operators_are_errors() {
        let number = || Box::new(Expr::Literal(Value::Number(1.0)));
        let semicolon = Token::new(TokenType::Semicolon, ";", None, 4);
        let mut interpreter = Interpreter::new(Vec::new());

        let binary = Stmt::Expression(Expr::Binary(number(), semicolon.clone(), number()).into());
        let error = interpreter.interpret(&[binary]).unwrap_err();
        assert_eq!(error.to_string(), "Unsupported operator ';'.");
        assert_eq!(error.token().map(|t| t.line), Some(4));

        let unary = Stmt::Expression(Expr::Unary(semicolon, number()).into());
        let error = interpreter.interpret(&[unary]).unwrap_err();
        assert!(matches!(error, RuntimeError::UnsupportedOperator { .. }));
    }

    #[test]
    fn comparing_non_numbers_is_a_type_error() {
        let error = error("\"a\" < \"b\";");
        assert_eq!(error.to_string(), "Operands must be numbers");
        assert!(matches!(error, RuntimeError::OperandsNotNumbers { .. }));
    }

    #[test]
    fn errors_carry_the_operator_line() {
        let source = indoc! {"
            print 1;
            print 2 *
              nil;
        "};
        let error = error(source);
        assert_eq!(error.token().map(|t| t.line), Some(2));
    }

    #[test]
    fn runtime_error_stops_remaining_statements() {
        let (output, result) = run("print 1; -nil; print 2;");
        assert!(result.is_err());
        assert_eq!(output, "1\n");
    }

    #[test]
    fn left_operand_is_evaluated_first() {
        assert_eq!(output("var a = 1; var b = (a = 2) + a; print b;"), "4\n");

        let (output, result) = run("var a = 1; (a = 2) + (a = \"x\"); print a;");
        assert!(matches!(
            result,
            Err(RuntimeError::OperandsNotNumbersOrStrings { .. })
        ));
        assert_eq!(output, "");
    }

    #[test]
    fn variables_and_blocks() {
        let source = indoc! {r#"
            var a = "global";
            var b;
            {
                var a = "inner";
                b = a;
                print a;
            }
            print a;
            print b;
        "#};
        assert_eq!(output(source), "inner\nglobal\ninner\n");
    }

    #[test]
    fn assignment_yields_the_assigned_value() {
        assert_eq!(output("var a; print a = 3; print a;"), "3\n3\n");
    }

    #[test]
    fn undefined_variables_are_runtime_errors() {
        assert_eq!(error("print missing;").to_string(), "Undefined variable 'missing'.");
        assert_eq!(error("missing = 1;").to_string(), "Undefined variable 'missing'.");
    }

    #[test]
    fn scope_is_restored_after_an_error_in_a_block() {
        let mut interpreter = Interpreter::new(Vec::new());
        assert!(interpreter.interpret(&parse("var a = 1; { var a = 2; -nil; }")).is_err());
        assert!(interpreter.interpret(&parse("print a;")).is_ok());
        assert_eq!(interpreter.output().as_slice(), b"1\n");
    }
}
