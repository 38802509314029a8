use crate::error::{Error, ParseError};
use crate::expr::Expr;
use crate::object::Object;
use crate::stmt::Stmt;
use crate::token::{Token, Type};

type ParseResult<T> = Result<T, ParseError>;

const MAX_ARGS: usize = 255;

/// Returns true (and consumes the token) if the next token is any of the given types.
macro_rules! matches {
    ( $self:ident, $( $type:expr ),+ ) => {
        {
            if $( $self.check($type) )||* {
                $self.advance();
                true
            } else {
                false
            }
        }
    }
}

/// Recursive-descent parser with explicit precedence climbing:
///
/// - `program      -> declaration* EOF`
/// - `declaration  -> classDecl | funDecl | varDecl | statement`
/// - `classDecl    -> "class" IDENTIFIER "{" function* "}"`
/// - `funDecl      -> "fun" function`
/// - `function     -> IDENTIFIER "(" parameters? ")" block`
/// - `varDecl      -> "var" IDENTIFIER ( "=" expression )? ";"`
/// - `statement    -> exprStmt | forStmt | ifStmt | printStmt | returnStmt
///                    | whileStmt | breakStmt | block`
/// - `forStmt      -> "for" "(" ( varDecl | exprStmt | ";" ) expression? ";" expression? ")" statement`
/// - `ifStmt       -> "if" "(" expression ")" statement ( "else" statement )?`
/// - `printStmt    -> "print" expression ";"`
/// - `returnStmt   -> "return" expression? ";"`
/// - `breakStmt    -> "break" ";"`
/// - `whileStmt    -> "while" "(" expression ")" statement`
/// - `block        -> "{" declaration* "}"`
/// - `expression   -> assignment`
/// - `assignment   -> IDENTIFIER "=" assignment | logic_or`
/// - `logic_or     -> logic_and ( "or" logic_and )*`
/// - `logic_and    -> ternary ( "and" ternary )*`
/// - `ternary      -> equality ( "?" ternary ":" ternary )?`
/// - `equality     -> comparison ( ( "!=" | "==" ) comparison )*`
/// - `comparison   -> term ( ( ">" | ">=" | "<" | "<=" ) term )*`
/// - `term         -> factor ( ( "+" | "-" ) factor )*`
/// - `factor       -> unary ( ( "*" | "/" ) unary )*`
/// - `unary        -> ( "!" | "-" ) unary | call`
/// - `call         -> primary ( "(" arguments? ")" )*`
/// - `primary      -> NUMBER | STRING | "true" | "false" | "nil"
///                    | "fun" "(" parameters? ")" block | IDENTIFIER | "(" expression ")"`
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0 }
    }

    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        statements
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().r#type == Type::EOF
    }

    fn check(&self, r#type: Type) -> bool {
        !self.is_at_end() && self.peek().r#type == r#type
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn consume(&mut self, r#type: Type, message: &str) -> ParseResult<Token> {
        if self.check(r#type) {
            return Ok(self.advance().clone());
        }

        Err(ParseError { token: self.peek().clone(), message: message.to_string() })
    }

    fn declaration(&mut self) -> Option<Stmt> {
        let statement = if matches!(self, Type::Class) {
            self.class_declaration()
        } else if matches!(self, Type::Fun) {
            self.function_declaration("function")
        } else if matches!(self, Type::Var) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match statement {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                error.throw();
                self.synchronize();
                None
            },
        }
    }

    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect class name.")?;
        self.consume(Type::LeftBrace, "Expect '{' before class body.")?;

        let mut methods = Vec::new();
        while !self.check(Type::RightBrace) && !self.is_at_end() {
            methods.push(self.function_declaration("method")?);
        }

        self.consume(Type::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::Class { name, methods })
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect variable name.")?;

        let initializer = if matches!(self, Type::Equal) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(Type::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        if matches!(self, Type::For) {
            return self.for_statement();
        }
        if matches!(self, Type::If) {
            return self.if_statement();
        }
        if matches!(self, Type::Print) {
            return self.print_statement();
        }
        if matches!(self, Type::Return) {
            return self.return_statement();
        }
        if matches!(self, Type::Break) {
            return self.break_statement();
        }
        if matches!(self, Type::While) {
            return self.while_statement();
        }
        if matches!(self, Type::LeftBrace) {
            return Ok(Stmt::Block(self.block()?));
        }

        self.expression_statement()
    }

    /// Desugars into a `while` wrapped in the initializer's block, as there
    /// is no distinct `For` statement in the AST.
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if matches!(self, Type::Semicolon) {
            None
        } else if matches!(self, Type::Var) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(Type::Semicolon) { Some(self.expression()?) } else { None };
        self.consume(Type::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(Type::RightParen) { Some(self.expression()?) } else { None };
        self.consume(Type::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        body = Stmt::While {
            condition: condition.unwrap_or(Expr::Literal(Object::Bool(true))),
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if matches!(self, Type::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If { condition, then_branch, else_branch })
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Type::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(expr))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        let value = if !self.check(Type::Semicolon) { Some(self.expression()?) } else { None };

        self.consume(Type::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }

    fn break_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        self.consume(Type::Semicolon, "Expect ';' after 'break'.")?;
        Ok(Stmt::Break(keyword))
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Type::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }

    fn function_declaration(&mut self, kind: &str) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, &format!("Expect {kind} name."))?;
        let (params, body) = self.function_tail(kind)?;
        Ok(Stmt::Function { name, params, body })
    }

    /// Parses `"(" parameters? ")" block`, shared by named functions, methods, and lambdas.
    fn function_tail(&mut self, kind: &str) -> ParseResult<(Vec<Token>, Vec<Stmt>)> {
        self.consume(Type::LeftParen, &format!("Expect '(' after {kind} name."))?;

        let mut params = Vec::new();
        if !self.check(Type::RightParen) {
            loop {
                if params.len() >= MAX_ARGS {
                    ParseError {
                        token: self.peek().clone(),
                        message: "Can't have more than 255 arguments.".to_string(),
                    }.throw();
                }

                params.push(self.consume(Type::Identifier, "Expect parameter name.")?);

                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        self.consume(Type::RightParen, "Expect ')' after parameters.")?;
        self.consume(Type::LeftBrace, &format!("Expect '{{' before {kind} body."))?;

        let body = self.block()?;
        Ok((params, body))
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(Type::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(Type::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        if matches!(self, Type::Equal) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable { name } => Ok(Expr::Assign { name, value: Box::new(value) }),
                other => {
                    ParseError { token: equals, message: "Invalid assignment target.".to_string() }.throw();
                    Ok(other)
                },
            };
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while matches!(self, Type::Or) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.ternary()?;

        while matches!(self, Type::And) {
            let operator = self.previous().clone();
            let right = self.ternary()?;
            expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    /// Right-associative `cond ? then : else`, with `cond` (and each
    /// branch) parsed at equality precedence or above.
    fn ternary(&mut self) -> ParseResult<Expr> {
        let condition = self.equality()?;

        if matches!(self, Type::Question) {
            let question = self.previous().clone();
            let then_branch = self.ternary()?;
            self.consume(Type::Colon, "Expect ':' after then branch of ternary expression.")?;
            let else_branch = self.ternary()?;

            return Ok(Expr::Ternary {
                question,
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            });
        }

        Ok(condition)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while matches!(self, Type::BangEqual, Type::EqualEqual) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while matches!(self, Type::Greater, Type::GreaterEqual, Type::Less, Type::LessEqual) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while matches!(self, Type::Minus, Type::Plus) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while matches!(self, Type::Slash, Type::Star) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if matches!(self, Type::Bang, Type::Minus) {
            let operator = self.previous().clone();
            let operand = self.unary()?;
            return Ok(Expr::Unary { operator, operand: Box::new(operand) });
        }

        self.call()
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();

        if !self.check(Type::RightParen) {
            loop {
                if arguments.len() >= MAX_ARGS {
                    ParseError {
                        token: self.peek().clone(),
                        message: "Can't have more than 255 arguments.".to_string(),
                    }.throw();
                }

                arguments.push(self.expression()?);

                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(Type::RightParen, "Expect ')' after arguments.")?;

        Ok(Expr::Call { callee: Box::new(callee), paren, arguments })
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if matches!(self, Type::LeftParen) {
                expr = self.finish_call(expr)?;
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if matches!(self, Type::False) {
            return Ok(Expr::Literal(Object::Bool(false)));
        }
        if matches!(self, Type::True) {
            return Ok(Expr::Literal(Object::Bool(true)));
        }
        if matches!(self, Type::Nil) {
            return Ok(Expr::Literal(Object::Nil));
        }

        if matches!(self, Type::Number, Type::String) {
            let literal = self.previous().literal.clone()
                .expect("NUMBER or STRING token to carry a literal value");
            return Ok(Expr::Literal(literal.into()));
        }

        if matches!(self, Type::Fun) {
            let keyword = self.previous().clone();
            let (params, body) = self.function_tail("lambda")?;
            return Ok(Expr::Lambda { keyword, params, body });
        }

        if matches!(self, Type::Identifier) {
            return Ok(Expr::Variable { name: self.previous().clone() });
        }

        if matches!(self, Type::LeftParen) {
            let expr = self.expression()?;
            self.consume(Type::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping(Box::new(expr)));
        }

        // Diagnostic aid: a leading binary operator with no left operand.
        if matches!(
            self,
            Type::Plus, Type::Slash, Type::Star, Type::BangEqual, Type::EqualEqual,
            Type::Greater, Type::GreaterEqual, Type::Less, Type::LessEqual
        ) {
            let operator = self.previous().clone();
            let _ = self.unary();
            return Err(ParseError {
                token: operator.clone(),
                message: format!("Expected left-hand side of binary operator {}.", operator.lexeme),
            });
        }

        Err(ParseError { token: self.peek().clone(), message: "Expect expression.".to_string() })
    }

    /// Discards tokens until a statement boundary, so that one parse error
    /// doesn't cascade into spurious follow-on errors.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().r#type == Type::Semicolon {
                return;
            }

            match self.peek().r#type {
                Type::Class | Type::Fun | Type::Var | Type::For
                | Type::If | Type::While | Type::Print | Type::Return => return,
                _ => { self.advance(); },
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;

    fn parse(source: &str) -> Vec<Stmt> {
        let tokens = Scanner::new(source).scan_tokens();
        Parser::new(tokens).parse()
    }

    #[test]
    fn parses_var_declaration_without_initializer() {
        let stmts = parse("var a;");
        assert!(::std::matches!(stmts[0], Stmt::Var { initializer: None, .. }));
    }

    #[test]
    fn for_loop_desugars_to_while_in_a_block() {
        let stmts = parse("for (var i = 0; i < 1; i = i + 1) print i;");
        match &stmts[0] {
            Stmt::Block(inner) => {
                assert!(::std::matches!(inner[0], Stmt::Var { .. }));
                assert!(::std::matches!(inner[1], Stmt::While { .. }));
            },
            other => panic!("expected desugared block, got {other:?}"),
        }
    }

    #[test]
    fn ternary_is_right_associative() {
        let stmts = parse("1 ? 2 : 3 ? 4 : 5;");
        match &stmts[0] {
            Stmt::Expression(Expr::Ternary { else_branch, .. }) => {
                assert!(::std::matches!(**else_branch, Expr::Ternary { .. }));
            },
            other => panic!("expected a ternary expression statement, got {other:?}"),
        }
    }

    #[test]
    fn invalid_assignment_target_does_not_abort_parsing() {
        let stmts = parse("1 = 2;");
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn leading_binary_operator_is_reported() {
        let stmts = parse("+ 2;");
        assert!(stmts.is_empty());
    }

    #[test]
    fn class_methods_are_parsed_as_inert_functions() {
        let stmts = parse("class Foo { bar() { print 1; } }");
        match &stmts[0] {
            Stmt::Class { methods, .. } => {
                assert_eq!(methods.len(), 1);
                assert!(::std::matches!(methods[0], Stmt::Function { .. }));
            },
            other => panic!("expected a class declaration, got {other:?}"),
        }
    }
}
