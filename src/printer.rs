//! Renders syntax trees in a parenthesized prefix form, mainly for
//! debugging the parser (`--ast`) and for tests.

use crate::ast::{Expr, Stmt};

pub fn print_expr(expr: &Expr) -> String {
    match expr {
        Expr::Literal(literal) => literal.value.to_string(),
        Expr::Grouping(grouping) => parenthesize("group", &[&*grouping.inner]),
        Expr::Unary(unary) => parenthesize(&unary.op.lexeme, &[&*unary.operand]),
        Expr::Binary(binary) => parenthesize(&binary.op.lexeme, &[&*binary.left, &*binary.right]),
        Expr::Variable(variable) => variable.name.lexeme.clone(),
        Expr::Assign(assign) => format!("(= {} {})", assign.name.lexeme, print_expr(&assign.value)),
    }
}

pub fn print_stmt(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Expr(expr_stmt) => parenthesize(";", &[&expr_stmt.expr]),
        Stmt::Print(print_stmt) => parenthesize("print", &[&print_stmt.expr]),
        Stmt::VarDecl(var_decl) => match &var_decl.init {
            Some(init) => format!("(var {} = {})", var_decl.name.lexeme, print_expr(init)),
            None => format!("(var {})", var_decl.name.lexeme),
        },
        Stmt::Block(block) => {
            let mut out = String::from("(block");
            for stmt in &block.stmts {
                out.push(' ');
                out.push_str(&print_stmt(stmt));
            }
            out.push(')');
            out
        }
        Stmt::If(if_stmt) => {
            let mut out = format!(
                "(if {} {}",
                print_expr(&if_stmt.condition),
                print_stmt(&if_stmt.then_branch)
            );
            if let Some(else_branch) = &if_stmt.else_branch {
                out.push(' ');
                out.push_str(&print_stmt(else_branch));
            }
            out.push(')');
            out
        }
        Stmt::While(while_stmt) => format!(
            "(while {} {})",
            print_expr(&while_stmt.condition),
            print_stmt(&while_stmt.body)
        ),
    }
}

fn parenthesize(name: &str, exprs: &[&Expr]) -> String {
    let mut out = format!("({}", name);
    for expr in exprs {
        out.push(' ');
        out.push_str(&print_expr(expr));
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast,
        token::{Token, TokenKind},
        value::Value,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn prints_nested_expression() {
        // -123 * (45.67)
        let expr = Expr::binary(
            Expr::unary(
                Token::new(TokenKind::Minus, "-", None, 1),
                Expr::literal(123.0),
            ),
            Token::new(TokenKind::Star, "*", None, 1),
            ast::Grouping {
                inner: Box::new(Expr::literal(45.67)),
            }
            .into(),
        );

        assert_eq!(print_expr(&expr), "(* (- 123) (group 45.67))");
    }

    #[test]
    fn prints_literals_in_display_form() {
        assert_eq!(print_expr(&Expr::literal(Value::Nil)), "nil");
        assert_eq!(print_expr(&Expr::literal("hi")), "hi");
        assert_eq!(print_expr(&Expr::literal(false)), "false");
    }

    #[test]
    fn prints_empty_block() {
        let block: Stmt = ast::Block { stmts: vec![] }.into();
        assert_eq!(print_stmt(&block), "(block)");
    }
}
