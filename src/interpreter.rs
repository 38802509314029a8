use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use crate::class::Class;
use crate::environment::Environment;
use crate::error::{Error, RuntimeError};
use crate::expr::Expr;
use crate::function::{Function, Lambda, NativeFunction};
use crate::object::{add, div, mul, sub, Callable, Object};
use crate::stmt::Stmt;
use crate::token::{Token, Type};
use crate::Unwind;

/// Walks the resolved tree and evaluates it directly, holding one pointer
/// to the environment active "now" and a separate pointer to the globals
/// so that a block exit can always restore the caller's environment
/// without having to walk back up a chain.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<Token, usize>,
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for native in NativeFunction::globals() {
            let name = native.name.to_string();
            globals.borrow_mut().define(&name, Object::NativeFunction(Rc::new(native)));
        }

        Interpreter { environment: Rc::clone(&globals), globals, locals: HashMap::new() }
    }

    /// Runs a whole program. Stops at the first runtime error, matching
    /// the single-threaded, run-to-completion-or-error execution model.
    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            if let Err(unwind) = self.execute(statement) {
                match unwind {
                    Unwind::Error(err) => {
                        err.throw();
                        return;
                    },
                    Unwind::Break(token) => {
                        RuntimeError {
                            token,
                            message: "'break' statements are only allowed inside loops.".to_string(),
                        }.throw();
                        return;
                    },
                    // The resolver already rejects a top-level `return`; nothing to report here.
                    Unwind::Return(_) => return,
                }
            }
        }
    }

    /// Records that `name`, wherever it's read from, should resolve `depth`
    /// environments up from whatever scope is active at that read.
    pub fn resolve(&mut self, name: &Token, depth: usize) {
        self.locals.insert(name.clone(), depth);
    }

    pub fn locals_len(&self) -> usize {
        self.locals.len()
    }

    fn runtime_error(&self, token: &Token, message: &str) -> Unwind {
        Unwind::Error(RuntimeError { token: token.clone(), message: message.to_string() })
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            },
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                println!("{value}");
                Ok(())
            },
            Stmt::Var { name, initializer } => {
                match initializer {
                    Some(expr) => {
                        let value = self.evaluate(expr)?;
                        self.environment.borrow_mut().define(&name.lexeme, value);
                    },
                    None => self.environment.borrow_mut().declare(&name.lexeme),
                }
                Ok(())
            },
            Stmt::Block(statements) => {
                let scope = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
                self.execute_block(statements, scope)
            },
            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            },
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute(body) {
                        Ok(()) => {},
                        Err(Unwind::Break(_)) => break,
                        Err(other) => return Err(other),
                    }
                }
                Ok(())
            },
            Stmt::Break(token) => Err(Unwind::Break(token.clone())),
            Stmt::Function { name, params, body } => {
                let function = Function {
                    name: name.clone(),
                    params: params.clone(),
                    body: Rc::new(body.clone()),
                    closure: Rc::clone(&self.environment),
                };
                self.environment.borrow_mut().define(&name.lexeme, Object::Function(Rc::new(function)));
                Ok(())
            },
            Stmt::Return { keyword: _, value } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Object::Nil,
                };
                Err(Unwind::Return(value))
            },
            Stmt::Class { name, methods } => {
                let class = Class::new(name.lexeme.clone(), methods.clone());
                self.environment.borrow_mut().define(&name.lexeme, Object::Class(Rc::new(class)));
                Ok(())
            },
        }
    }

    /// Swaps in `environment`, runs `statements`, and restores whatever was
    /// active before — on every exit path, including an error or a
    /// break/return unwind, so a block can never leak its scope.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> Result<(), Unwind> {
        let previous = Rc::clone(&self.environment);
        self.environment = environment;

        let result = statements.iter().try_for_each(|statement| self.execute(statement));

        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, Unwind> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Unary { operator, operand } => {
                let right = self.evaluate(operand)?;
                match operator.r#type {
                    Type::Minus => match right {
                        Object::Number(n) => Ok(Object::Number(-n)),
                        _ => Err(self.runtime_error(operator, "Operand must be a number.")),
                    },
                    Type::Bang => Ok(Object::Bool(!right.is_truthy())),
                    _ => unreachable!("scanner/parser never emit a non-unary token here"),
                }
            },
            Expr::Binary { left, operator, right } => self.evaluate_binary(left, operator, right),
            Expr::Logical { left, operator, right } => {
                let left_value = self.evaluate(left)?;

                let short_circuits = if operator.r#type == Type::Or {
                    left_value.is_truthy()
                } else {
                    !left_value.is_truthy()
                };

                if short_circuits {
                    Ok(left_value)
                } else {
                    self.evaluate(right)
                }
            },
            Expr::Ternary { condition, then_branch, else_branch, .. } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.evaluate(then_branch)
                } else {
                    self.evaluate(else_branch)
                }
            },
            Expr::Variable { name } => self.look_up_variable(name),
            Expr::Assign { name, value } => {
                let evaluated = self.evaluate(value)?;

                match self.locals.get(name) {
                    Some(&distance) => self.environment.borrow_mut().assign_at(distance, name, evaluated.clone()),
                    None => self.globals.borrow_mut().assign(name, evaluated.clone()).map_err(Unwind::Error)?,
                }

                Ok(evaluated)
            },
            Expr::Call { callee, paren, arguments } => self.evaluate_call(callee, paren, arguments),
            Expr::Lambda { params, body, .. } => {
                let lambda = Lambda {
                    params: params.clone(),
                    body: Rc::new(body.clone()),
                    closure: Rc::clone(&self.environment),
                };
                Ok(Object::Lambda(Rc::new(lambda)))
            },
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Object, Unwind> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match operator.r#type {
            Type::Plus => add(left, right)
                .ok_or_else(|| self.runtime_error(operator, "Operands must be two numbers or two strings, or either of each.")),
            Type::Minus => sub(left, right)
                .ok_or_else(|| self.runtime_error(operator, "Operands must be numbers.")),
            Type::Star => mul(left, right)
                .ok_or_else(|| self.runtime_error(operator, "Operands must be numbers.")),
            Type::Slash => match div(left, right) {
                Ok(value) => Ok(value),
                Err(true) => Err(self.runtime_error(operator, "Attempting division by zero.")),
                Err(false) => Err(self.runtime_error(operator, "Operands must be numbers.")),
            },
            Type::Greater | Type::GreaterEqual | Type::Less | Type::LessEqual => {
                match left.partial_cmp(&right) {
                    Some(ordering) => Ok(Object::Bool(match operator.r#type {
                        Type::Greater => ordering == Ordering::Greater,
                        Type::GreaterEqual => ordering != Ordering::Less,
                        Type::Less => ordering == Ordering::Less,
                        Type::LessEqual => ordering != Ordering::Greater,
                        _ => unreachable!(),
                    })),
                    None => Err(self.runtime_error(operator, "Operands must be numbers.")),
                }
            },
            Type::EqualEqual => Ok(Object::Bool(left == right)),
            Type::BangEqual => Ok(Object::Bool(left != right)),
            _ => unreachable!("scanner/parser never emit a non-binary token here"),
        }
    }

    fn evaluate_call(&mut self, callee: &Expr, paren: &Token, arguments: &[Expr]) -> Result<Object, Unwind> {
        let callee = self.evaluate(callee)?;

        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(self.evaluate(argument)?);
        }

        let callable: &dyn Callable = match &callee {
            Object::Function(function) => function.as_ref(),
            Object::Lambda(lambda) => lambda.as_ref(),
            Object::NativeFunction(native) => native.as_ref(),
            Object::Class(class) => class.as_ref(),
            _ => return Err(self.runtime_error(paren, "Can only call functions and classes.")),
        };

        if args.len() != callable.arity() {
            return Err(self.runtime_error(
                paren,
                &format!("Expected {} arguments but got {}.", callable.arity(), args.len()),
            ));
        }

        callable.call(self, args).map_err(Unwind::Error)
    }

    fn look_up_variable(&self, name: &Token) -> Result<Object, Unwind> {
        match self.locals.get(name) {
            Some(&distance) => self.environment.borrow().get_at(distance, name).map_err(Unwind::Error),
            None => self.globals.borrow().get(name).map_err(Unwind::Error),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
