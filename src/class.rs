use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::interpreter::Interpreter;
use crate::object::{Callable, Object};
use crate::stmt::Stmt;

/// A class declaration. Method bodies are carried here purely as inert
/// syntax: nothing in the resolver or interpreter ever descends into them,
/// since the language has no method dispatch, field-access syntax, or
/// `this`/`super` semantics. Calling a class constructs an opaque
/// [`Instance`].
#[derive(Clone)]
pub struct Class {
    pub name: String,
    pub methods: Rc<Vec<Stmt>>,
}

impl Class {
    pub fn new(name: String, methods: Vec<Stmt>) -> Self {
        Class { name, methods: Rc::new(methods) }
    }
}

impl Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

impl Callable for Class {
    fn arity(&self) -> usize {
        0
    }

    fn call(&self, _interpreter: &mut Interpreter, _arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        Ok(Object::Instance(Rc::new(RefCell::new(Instance { class_name: self.name.clone() }))))
    }
}

/// The opaque value produced by calling a class. Classes carry no fields
/// or methods a Lox program can reach, so an instance is nothing but a
/// back-reference to the class it came from, kept for display purposes.
#[derive(Clone)]
pub struct Instance {
    class_name: String,
}

impl Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<instance {}>", self.class_name)
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<instance {}>", self.class_name)
    }
}
