use std::borrow::Cow;

use tracing::{debug, trace};

use crate::{
    ast::{self, Expr, Stmt},
    error::ParseError,
    token::{Token, TokenKind},
    value::Value,
};

/// Deepest nesting of groupings, unary operators, assignments and
/// statement bodies accepted before the parser gives up. Evaluation recurses
/// along the same paths, so this also bounds the interpreter's stack use.
const MAX_NESTING: usize = 128;

/// Output of a parse: every statement that parsed cleanly plus the errors
/// reported for the ones that did not. Statements that failed are dropped,
/// so `stmts` is only trustworthy when `errors` is empty.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub stmts: Vec<Stmt>,
    pub errors: Vec<ParseError>,
}

#[derive(Debug, Clone)]
struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    depth: usize,
    errors: Vec<ParseError>,
}

impl TokenKind {
    /// Binding power of a binary operator, higher binds tighter. All binary
    /// operators are left associative.
    fn binary_precedence(&self) -> Option<u8> {
        match self {
            Self::Star | Self::Slash => Some(4),
            Self::Plus | Self::Minus => Some(3),
            Self::Greater | Self::GreaterEqual | Self::Less | Self::LessEqual => Some(2),
            Self::EqualEqual | Self::BangEqual => Some(1),
            _ => None,
        }
    }
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            current: 0,
            depth: 0,
            errors: Vec::new(),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.at_end() {
            self.current += 1;
        }
        self.previous()
    }

    /// Consumes the next token if it is any of `kinds`.
    fn matches(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.iter().any(|kind| self.check(*kind)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error_at_current(&self, message: &str) -> ParseError {
        ParseError::new(self.peek(), message)
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(message))
        }
    }

    /// Runs `parse` one nesting level deeper, failing once the input nests
    /// past [`MAX_NESTING`].
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error_at_current("too much nesting."));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Skips tokens until just after a `;` or just before a keyword that
    /// starts a statement.
    fn synchronize(&mut self) {
        self.advance();

        while !self.at_end() {
            if self.previous().kind == TokenKind::Semicolon || self.peek().kind.starts_statement()
            {
                return;
            }
            self.advance();
        }
    }

    fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.matches(&[TokenKind::Var]) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                debug!(line = err.token.line, message = %err.message, "parse error, synchronizing");
                self.errors.push(err);
                self.synchronize();
                None
            }
        }
    }

    fn var_declaration(&mut self) -> Result<Stmt, ParseError> {
        let name = self
            .expect(TokenKind::Identifier, "expect variable name.")?
            .clone();

        let init = if self.matches(&[TokenKind::Equal]) {
            Some(self.parse_expr()?)
        } else {
            None
        };

        self.expect(TokenKind::Semicolon, "expect ';' after variable declaration.")?;
        Ok(ast::VarDecl { name, init }.into())
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek().kind {
            TokenKind::If => {
                self.advance();
                self.if_statement()
            }
            TokenKind::While => {
                self.advance();
                self.while_statement()
            }
            TokenKind::Print => {
                let keyword = self.advance().clone();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon, "expect ';' after value.")?;
                Ok(ast::PrintStmt { keyword, expr }.into())
            }
            TokenKind::LeftBrace => {
                self.advance();
                Ok(self.nested(Self::parse_block)?.into())
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon, "expect ';' after expression.")?;
                Ok(ast::ExprStmt { expr }.into())
            }
        }
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::LeftParen, "expect '(' after 'if'.")?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RightParen, "expect ')' after if condition.")?;

        let then_branch = Box::new(self.nested(Self::statement)?);
        // a dangling else belongs to the innermost if
        let else_branch = if self.matches(&[TokenKind::Else]) {
            Some(Box::new(self.nested(Self::statement)?))
        } else {
            None
        };

        Ok(ast::IfStmt {
            condition,
            then_branch,
            else_branch,
        }
        .into())
    }

    fn while_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::LeftParen, "expect '(' after 'while'.")?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RightParen, "expect ')' after condition.")?;
        let body = Box::new(self.nested(Self::statement)?);

        Ok(ast::WhileStmt { condition, body }.into())
    }

    /// Parses the statements of a block whose `{` was already consumed.
    fn parse_block(&mut self) -> Result<ast::Block, ParseError> {
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.at_end() {
            if let Some(stmt) = self.declaration() {
                stmts.push(stmt);
            }
        }

        self.expect(TokenKind::RightBrace, "expect '}' after block.")?;
        Ok(ast::Block { stmts })
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_prec_expr(0)?;

        if !self.matches(&[TokenKind::Equal]) {
            return Ok(expr);
        }

        let equals = self.previous().clone();
        let value = self.nested(Self::parse_assignment)?;

        match expr {
            Expr::Variable(variable) => Ok(ast::Assign {
                name: variable.name,
                value: Box::new(value),
            }
            .into()),
            expr => {
                // reported, but the parse goes on with what we already have
                self.errors
                    .push(ParseError::new(&equals, "invalid assignment target."));
                Ok(expr)
            }
        }
    }

    fn parse_prec_expr(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;

        while let Some(prec) = self.peek().kind.binary_precedence() {
            if prec < min_prec {
                break;
            }

            let op = self.advance().clone();
            let rhs = self.parse_prec_expr(prec + 1)?;
            lhs = Expr::binary(lhs, op, rhs);
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.matches(&[TokenKind::Bang, TokenKind::Minus]) {
            let op = self.previous().clone();
            let operand = self.nested(Self::parse_unary)?;
            return Ok(Expr::unary(op, operand));
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();

        let expr = match token.kind {
            TokenKind::False => Expr::literal(false),
            TokenKind::True => Expr::literal(true),
            TokenKind::Nil => Expr::literal(Value::Nil),
            TokenKind::Number | TokenKind::String => {
                Expr::literal(token.literal.clone().unwrap_or(Value::Nil))
            }
            TokenKind::Identifier => ast::Variable { name: token }.into(),
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.nested(Self::parse_expr)?;
                self.expect(TokenKind::RightParen, "expect ')' after expression.")?;
                return Ok(ast::Grouping {
                    inner: Box::new(inner),
                }
                .into());
            }
            _ => return Err(self.error_at_current("expect expression.")),
        };

        self.advance();
        Ok(expr)
    }
}

/// Parses a token stream into statements, recovering at statement
/// boundaries so that one pass reports every independent syntax error.
pub fn parse(tokens: &[Token]) -> Parsed {
    let tokens = match tokens.last() {
        Some(last) if last.kind == TokenKind::Eof => Cow::Borrowed(tokens),
        last => {
            let line = last.map_or(1, |token| token.line);
            let mut owned = tokens.to_vec();
            owned.push(Token::new(TokenKind::Eof, "", None, line));
            Cow::Owned(owned)
        }
    };

    let mut parser = Parser::new(&tokens);
    let mut stmts = Vec::new();
    while !parser.at_end() {
        if let Some(stmt) = parser.declaration() {
            trace!(?stmt, "parsed statement");
            stmts.push(stmt);
        }
    }

    debug!(
        stmts = stmts.len(),
        errors = parser.errors.len(),
        "parse complete"
    );

    Parsed {
        stmts,
        errors: parser.errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::scan, printer};
    use pretty_assertions::assert_eq;

    fn parse_source(source: &str) -> Parsed {
        parse(&scan(source).tokens)
    }

    fn printed(source: &str) -> Vec<String> {
        let parsed = parse_source(source);
        assert!(parsed.errors.is_empty(), "unexpected errors: {:?}", parsed.errors);
        parsed.stmts.iter().map(printer::print_stmt).collect()
    }

    fn token(kind: TokenKind, lexeme: &str, literal: Option<Value>) -> Token {
        Token::new(kind, lexeme, literal, 1)
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let parsed = parse_source("1 + 2 * 3;");
        assert!(parsed.errors.is_empty());

        let expected: Stmt = ast::ExprStmt {
            expr: Expr::binary(
                Expr::literal(1.0),
                token(TokenKind::Plus, "+", None),
                Expr::binary(
                    Expr::literal(2.0),
                    token(TokenKind::Star, "*", None),
                    Expr::literal(3.0),
                ),
            ),
        }
        .into();
        assert_eq!(parsed.stmts, vec![expected]);
    }

    #[test]
    fn binary_levels_are_left_associative() {
        assert_eq!(printed("1 - 2 - 3;"), vec!["(; (- (- 1 2) 3))"]);
        assert_eq!(printed("8 / 4 * 2;"), vec!["(; (* (/ 8 4) 2))"]);
        assert_eq!(
            printed("1 < 2 == 3 >= 4;"),
            vec!["(; (== (< 1 2) (>= 3 4)))"]
        );
    }

    #[test]
    fn unary_and_grouping() {
        assert_eq!(printed("-(1 + 2) * !x;"), vec!["(; (* (- (group (+ 1 2))) (! x)))"]);
        assert_eq!(printed("!!true;"), vec!["(; (! (! true)))"]);
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(printed("a = b = 1;"), vec!["(; (= a (= b 1)))"]);
    }

    #[test]
    fn parses_literals_from_hand_built_tokens() {
        for (kind, literal, expected) in [
            (TokenKind::True, None, Value::Bool(true)),
            (TokenKind::False, None, Value::Bool(false)),
            (TokenKind::Nil, None, Value::Nil),
            (TokenKind::Number, Some(Value::Number(123.5)), Value::Number(123.5)),
            (TokenKind::String, Some(Value::from("")), Value::from("")),
        ] {
            let tokens = vec![
                token(kind, "x", literal),
                token(TokenKind::Semicolon, ";", None),
                token(TokenKind::Eof, "", None),
            ];
            let parsed = parse(&tokens);
            assert_eq!(
                parsed.stmts,
                vec![Stmt::from(ast::ExprStmt {
                    expr: Expr::literal(expected)
                })]
            );
        }
    }

    #[test]
    fn missing_eof_is_tolerated() {
        let tokens = vec![
            token(TokenKind::Number, "1", Some(Value::Number(1.0))),
            token(TokenKind::Semicolon, ";", None),
        ];
        let parsed = parse(&tokens);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.stmts.len(), 1);
    }

    #[test]
    fn statements() {
        assert_eq!(
            printed("var a; var b = 1; print a; { a = 2; } while (a < 3) a = a + 1;"),
            vec![
                "(var a)",
                "(var b = 1)",
                "(print a)",
                "(block (; (= a 2)))",
                "(while (< a 3) (; (= a (+ a 1))))",
            ]
        );
    }

    #[test]
    fn else_binds_to_nearest_if() {
        assert_eq!(
            printed("if (a) if (b) print 1; else print 2;"),
            vec!["(if a (if b (print 1) (print 2)))"]
        );
    }

    #[test]
    fn missing_operand_reports_one_error() {
        let parsed = parse_source("1 + ;");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].message, "expect expression.");
        assert_eq!(parsed.errors[0].token.kind, TokenKind::Semicolon);
        assert!(parsed.stmts.is_empty());
    }

    #[test]
    fn recovers_and_reports_independent_errors() {
        let parsed = parse_source("var = 1;\nprint 2;\n(1 + 2;\nprint 3;");
        assert_eq!(
            parsed
                .errors
                .iter()
                .map(|err| err.to_string())
                .collect::<Vec<_>>(),
            vec![
                "[line 1] error at '=': expect variable name.",
                "[line 3] error at ';': expect ')' after expression.",
            ]
        );
        assert_eq!(
            parsed.stmts.iter().map(printer::print_stmt).collect::<Vec<_>>(),
            vec!["(print 2)", "(print 3)"]
        );
    }

    #[test]
    fn synchronizes_on_statement_keywords() {
        let parsed = parse_source("1 + + print 1;");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(
            parsed.stmts.iter().map(printer::print_stmt).collect::<Vec<_>>(),
            vec!["(print 1)"]
        );
    }

    #[test]
    fn invalid_assignment_target_keeps_parsing() {
        let parsed = parse_source("1 + 2 = 3; print 4;");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].message, "invalid assignment target.");
        assert_eq!(parsed.errors[0].token.kind, TokenKind::Equal);
        assert_eq!(
            parsed.stmts.iter().map(printer::print_stmt).collect::<Vec<_>>(),
            vec!["(; (+ 1 2))", "(print 4)"]
        );
    }

    #[test]
    fn unclosed_block_is_reported_at_end() {
        let parsed = parse_source("{ print 1;");
        assert_eq!(
            parsed.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            vec!["[line 1] error at end: expect '}' after block."]
        );
    }

    #[test]
    fn moderate_nesting_parses() {
        let source = format!("{}1{};", "(".repeat(100), ")".repeat(100));
        let parsed = parse_source(&source);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.stmts.len(), 1);

        let parsed = parse_source(&format!("{}x;", "-".repeat(100)));
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn runaway_grouping_is_a_parse_error() {
        let source = format!("print {}1{}; print 2;", "(".repeat(20_000), ")".repeat(20_000));
        let parsed = parse_source(&source);
        assert_eq!(
            parsed.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            vec!["[line 1] error at '(': too much nesting."]
        );
        assert_eq!(
            parsed.stmts.iter().map(printer::print_stmt).collect::<Vec<_>>(),
            vec!["(print 2)"]
        );
    }

    #[test]
    fn runaway_unary_assignment_and_blocks_are_parse_errors() {
        for source in [
            format!("{}1;", "!".repeat(20_000)),
            format!("{}1;", "a = ".repeat(20_000)),
            format!("{}{}", "{".repeat(20_000), "}".repeat(20_000)),
            format!("{}print 1;", "if (true) ".repeat(20_000)),
        ] {
            let parsed = parse_source(&source);
            assert!(
                parsed.errors.iter().any(|e| e.message == "too much nesting."),
                "no nesting error for {:?}",
                &source[..16]
            );
        }
    }

    #[test]
    fn empty_input_parses_to_nothing() {
        let parsed = parse_source("");
        assert!(parsed.stmts.is_empty());
        assert!(parsed.errors.is_empty());
        assert!(parse(&[]).stmts.is_empty());
    }
}
