use std::io::Write;

use tracing::{debug, trace};

use crate::{
    ast::{self, Expr, Stmt},
    environment::Environment,
    error::RuntimeError,
    printer,
    token::{Token, TokenKind},
    value::Value,
};

/// Walks statement lists directly, writing `print` output to `out`.
///
/// The global scope lives as long as the interpreter, so successive calls to
/// [`Interpreter::interpret`] see each other's top-level variables.
#[derive(Debug)]
pub struct Interpreter<W> {
    environment: Environment,
    out: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Interpreter {
            environment: Environment::new(),
            out,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Executes `stmts` in order. The first runtime error stops execution;
    /// effects of the statements before it are kept.
    #[tracing::instrument(level = "debug", skip_all, fields(count = stmts.len()))]
    pub fn interpret(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in stmts {
            if let Err(err) = self.execute(stmt) {
                debug!(line = err.token.line, message = %err.message, "runtime error");
                return Err(err);
            }
        }

        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        trace!(stmt = %printer::print_stmt(stmt), "execute");

        match stmt {
            Stmt::Expr(expr_stmt) => {
                self.evaluate(&expr_stmt.expr)?;
            }
            Stmt::Print(print_stmt) => {
                let value = self.evaluate(&print_stmt.expr)?;
                writeln!(self.out, "{}", value).map_err(|err| {
                    RuntimeError::new(
                        &print_stmt.keyword,
                        format!("failed to write output: {}.", err),
                    )
                })?;
            }
            Stmt::VarDecl(var_decl) => {
                let value = match &var_decl.init {
                    Some(init) => self.evaluate(init)?,
                    None => Value::Nil,
                };
                self.environment.define(var_decl.name.lexeme.as_str(), value);
            }
            Stmt::Block(block) => self.execute_block(block)?,
            Stmt::If(if_stmt) => {
                if self.evaluate(&if_stmt.condition)?.is_truthy() {
                    self.execute(&if_stmt.then_branch)?;
                } else if let Some(else_branch) = &if_stmt.else_branch {
                    self.execute(else_branch)?;
                }
            }
            Stmt::While(while_stmt) => {
                while self.evaluate(&while_stmt.condition)?.is_truthy() {
                    self.execute(&while_stmt.body)?;
                }
            }
        }

        Ok(())
    }

    /// Runs a block in a fresh child scope. The scope is closed whether the
    /// block completes or fails.
    fn execute_block(&mut self, block: &ast::Block) -> Result<(), RuntimeError> {
        self.environment.nest();
        let result = block.stmts.iter().try_for_each(|stmt| self.execute(stmt));
        self.environment.unnest();
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(literal) => Ok(literal.value.clone()),
            Expr::Grouping(grouping) => self.evaluate(&grouping.inner),
            Expr::Variable(variable) => self.environment.get(&variable.name),
            Expr::Assign(assign) => {
                let value = self.evaluate(&assign.value)?;
                self.environment.assign(&assign.name, value.clone())?;
                Ok(value)
            }
            Expr::Unary(unary) => {
                let operand = self.evaluate(&unary.operand)?;
                match unary.op.kind {
                    TokenKind::Minus => match operand {
                        Value::Number(number) => Ok(Value::Number(-number)),
                        _ => Err(RuntimeError::new(&unary.op, "operand must be a number.")),
                    },
                    TokenKind::Bang => Ok(Value::Bool(!operand.is_truthy())),
                    _ => Err(unsupported(&unary.op)),
                }
            }
            Expr::Binary(binary) => {
                let left = self.evaluate(&binary.left)?;
                let right = self.evaluate(&binary.right)?;
                binary_op(&binary.op, left, right)
            }
        }
    }
}

fn binary_op(op: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match op.kind {
        TokenKind::Plus => match (left, right) {
            (Value::Number(left), Value::Number(right)) => Ok(Value::Number(left + right)),
            (Value::String(left), Value::String(right)) => Ok(Value::String(left + &right)),
            (left, right) => {
                trace!(left = left.type_name(), right = right.type_name(), "bad '+' operands");
                Err(RuntimeError::new(
                    op,
                    "operands must be two numbers or two strings.",
                ))
            }
        },
        TokenKind::Minus => number_operands(op, &left, &right).map(|(l, r)| Value::Number(l - r)),
        TokenKind::Star => number_operands(op, &left, &right).map(|(l, r)| Value::Number(l * r)),
        TokenKind::Slash => number_operands(op, &left, &right).map(|(l, r)| Value::Number(l / r)),
        TokenKind::Greater => number_operands(op, &left, &right).map(|(l, r)| Value::Bool(l > r)),
        TokenKind::GreaterEqual => {
            number_operands(op, &left, &right).map(|(l, r)| Value::Bool(l >= r))
        }
        TokenKind::Less => number_operands(op, &left, &right).map(|(l, r)| Value::Bool(l < r)),
        TokenKind::LessEqual => {
            number_operands(op, &left, &right).map(|(l, r)| Value::Bool(l <= r))
        }
        TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
        TokenKind::BangEqual => Ok(Value::Bool(left != right)),
        _ => Err(unsupported(op)),
    }
}

fn number_operands(op: &Token, left: &Value, right: &Value) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => Ok((*left, *right)),
        _ => {
            trace!(left = left.type_name(), right = right.type_name(), "non-number operands");
            Err(RuntimeError::new(op, "operands must be numbers."))
        }
    }
}

fn unsupported(op: &Token) -> RuntimeError {
    RuntimeError::new(op, format!("unsupported operator '{}'.", op.lexeme))
}
