use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// A lexical scope. `variables` maps a name to `None` when it was declared
/// without an initializer (`var x;`) and to `Some(value)` once assigned —
/// reading a `None` slot is the "uninitialized variable" runtime error,
/// distinct from a value that happens to be `nil`.
#[derive(Debug, Clone)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    variables: HashMap<String, Option<Object>>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment { enclosing, variables: HashMap::new() }
    }

    pub fn define(&mut self, name: &str, value: Object) {
        self.variables.insert(name.to_string(), Some(value));
    }

    /// Declares `name` without a value, e.g. `var x;`.
    pub fn declare(&mut self, name: &str) {
        self.variables.insert(name.to_string(), None);
    }

    fn ancestor(&self, distance: usize) -> Rc<RefCell<Environment>> {
        let parent = self.enclosing.clone()
            .unwrap_or_else(|| panic!("enclosing environment to exist at depth 1"));
        let mut environment = Rc::clone(&parent);

        for i in 1..distance {
            let parent = environment.borrow().enclosing.clone()
                .unwrap_or_else(|| panic!("enclosing environment to exist at depth {i}"));
            environment = Rc::clone(&parent);
        }

        environment
    }

    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.variables.contains_key(&name.lexeme) {
            self.variables.insert(name.lexeme.clone(), Some(value));
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Object) {
        if distance > 0 {
            self.ancestor(distance).borrow_mut().variables.insert(name.lexeme.clone(), Some(value));
        } else {
            self.variables.insert(name.lexeme.clone(), Some(value));
        }
    }

    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(slot) = self.variables.get(&name.lexeme) {
            return match slot {
                Some(value) => Ok(value.clone()),
                None => Err(RuntimeError {
                    token: name.clone(),
                    message: format!("Uninitialized variable '{}'.", name.lexeme),
                }),
            };
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    pub fn get_at(&self, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        let env = if distance > 0 { self.ancestor(distance) } else {
            return self.get_here(name);
        };
        let borrowed = env.borrow();
        borrowed.get_here(name)
    }

    fn get_here(&self, name: &Token) -> Result<Object, RuntimeError> {
        match self.variables.get(&name.lexeme) {
            Some(Some(value)) => Ok(value.clone()),
            Some(None) => Err(RuntimeError {
                token: name.clone(),
                message: format!("Uninitialized variable '{}'.", name.lexeme),
            }),
            None => Err(RuntimeError {
                token: name.clone(),
                message: format!("Undefined variable '{}'.", name.lexeme),
            }),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Type;

    fn token(name: &str) -> Token {
        Token::new(Type::Identifier, name.to_string(), None, 1, 1)
    }

    #[test]
    fn get_after_define() {
        let mut env = Environment::default();
        env.define("a", Object::Number(1.0));
        assert_eq!(env.get(&token("a")).unwrap(), Object::Number(1.0));
    }

    #[test]
    fn uninitialized_read_is_an_error() {
        let mut env = Environment::default();
        env.declare("a");
        assert!(env.get(&token("a")).is_err());
    }

    #[test]
    fn undefined_read_is_an_error() {
        let env = Environment::default();
        assert!(env.get(&token("missing")).is_err());
    }

    #[test]
    fn assign_falls_through_to_enclosing_scope() {
        let outer = Rc::new(RefCell::new(Environment::default()));
        outer.borrow_mut().define("a", Object::Number(1.0));

        let mut inner = Environment::new(Some(Rc::clone(&outer)));
        inner.assign(&token("a"), Object::Number(2.0)).unwrap();

        assert_eq!(outer.borrow().get(&token("a")).unwrap(), Object::Number(2.0));
    }

    #[test]
    fn get_at_distance_zero_reads_local_scope() {
        let mut env = Environment::default();
        env.define("a", Object::Number(3.0));
        assert_eq!(env.get_at(0, &token("a")).unwrap(), Object::Number(3.0));
    }
}
