//! Parenthesised, Lisp-style rendering of the syntax tree, used by
//! `--print-ast` and handy in tests for checking how things nested.

use crate::expr::Expr;
use crate::stmt::Stmt;

pub fn print_expr(expr: &Expr) -> String {
    match expr {
        Expr::Assign(name, value) => parenthesize("=", &[&*name.lexeme, print_expr(value).as_str()]),
        Expr::Binary(left, operator, right) => {
            parenthesize(&operator.lexeme, &[print_expr(left).as_str(), print_expr(right).as_str()])
        }
        Expr::Grouping(expr) => parenthesize("group", &[print_expr(expr).as_str()]),
        Expr::Literal(value) => value.to_string(),
        Expr::Unary(operator, right) => parenthesize(&operator.lexeme, &[print_expr(right).as_str()]),
        Expr::Variable(name) => name.lexeme.to_string(),
    }
}

pub fn print_stmt(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Block(statements) => {
            let parts: Vec<String> = statements.iter().map(print_stmt).collect();
            let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
            parenthesize("block", &parts)
        }
        Stmt::Expression(expr) => parenthesize(";", &[print_expr(expr).as_str()]),
        Stmt::Print(expr) => parenthesize("print", &[print_expr(expr).as_str()]),
        Stmt::Var(name, None) => parenthesize("var", &[&*name.lexeme]),
        Stmt::Var(name, Some(initializer)) => {
            parenthesize("var", &[&*name.lexeme, print_expr(initializer).as_str()])
        }
    }
}

fn parenthesize(name: &str, parts: &[&str]) -> String {
    let mut text = format!("({name}");
    for part in parts {
        text.push(' ');
        text.push_str(part);
    }
    text.push(')');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Token, TokenType};
    use crate::value::Value;

    #[test]
    fn renders_nested_expressions() {
        let expr = Expr::Binary(
            Expr::Unary(
                Token::new(TokenType::Minus, "-", None, 1),
                Expr::Literal(Value::Number(123.0)).into(),
            )
            .into(),
            Token::new(TokenType::Star, "*", None, 1),
            Expr::Grouping(Expr::Literal(Value::Number(45.67)).into()).into(),
        );

        assert_eq!(print_expr(&expr), "(* (- 123) (group 45.67))");
    }

    #[test]
    fn renders_empty_block() {
        assert_eq!(print_stmt(&Stmt::Block(Vec::new())), "(block)");
    }
}
