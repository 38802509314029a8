use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::interpreter::Interpreter;
use crate::object::{Callable, Object};
use crate::token::Token;
use crate::Unwind;

/// A user-declared function. Carries the environment active at the point
/// of declaration so that calls resolve free variables against the scope
/// the function was defined in, not the scope it happens to be called
/// from — this is what makes closures work.
#[derive(Clone)]
pub struct Function {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Rc<Vec<crate::stmt::Stmt>>,
    pub closure: Rc<RefCell<Environment>>,
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.closure)))));

        for (param, arg) in self.params.iter().zip(arguments.into_iter()) {
            environment.borrow_mut().define(&param.lexeme, arg);
        }

        match interpreter.execute_block(&self.body, environment) {
            Ok(()) => Ok(Object::Nil),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Error(err)) => Err(err),
            Err(Unwind::Break(token)) => Err(RuntimeError {
                token,
                message: "'break' statements are only allowed inside loops.".to_string(),
            }),
        }
    }

    fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name.lexeme)
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name.lexeme)
    }
}

/// An anonymous `fun (params) { body }` expression. Identical machinery to
/// [`Function`], just without a name to bind.
#[derive(Clone)]
pub struct Lambda {
    pub params: Vec<Token>,
    pub body: Rc<Vec<crate::stmt::Stmt>>,
    pub closure: Rc<RefCell<Environment>>,
}

impl Callable for Lambda {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.closure)))));

        for (param, arg) in self.params.iter().zip(arguments.into_iter()) {
            environment.borrow_mut().define(&param.lexeme, arg);
        }

        match interpreter.execute_block(&self.body, environment) {
            Ok(()) => Ok(Object::Nil),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Error(err)) => Err(err),
            Err(Unwind::Break(token)) => Err(RuntimeError {
                token,
                message: "'break' statements are only allowed inside loops.".to_string(),
            }),
        }
    }

    fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lambda(arity {})", self.params.len())
    }
}

impl Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn lambda>")
    }
}

/// A function implemented in the host rather than in Lox source, e.g.
/// `clock`. Takes no closure since it never sees user-defined scopes.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: fn(&mut Interpreter, Vec<Object>) -> Result<Object, RuntimeError>,
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl NativeFunction {
    /// The natives bound into the global scope at interpreter construction.
    pub fn globals() -> Vec<NativeFunction> {
        vec![
            NativeFunction {
                name: "clock",
                arity: 0,
                function: |_, _| {
                    let now = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .expect("system clock before the Unix epoch")
                        .as_secs_f64();
                    Ok(Object::Number(now))
                },
            },
        ]
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn>")
    }
}
