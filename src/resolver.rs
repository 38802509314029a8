use std::collections::HashMap;
use std::mem;

use crate::error::{Error, ResolveError, ResolveWarning};
use crate::expr::Expr;
use crate::interpreter::Interpreter;
use crate::stmt::Stmt;
use crate::token::Token;

#[derive(PartialEq, Clone, Copy)]
enum FunctionKind {
    None,
    Function,
    Lambda,
}

/// Per-declaration usage frame: one entry per name declared in that scope,
/// `false` until a read is observed. Kept as an ordered `Vec` rather than a
/// `HashMap` so that the end-of-scope warning pass can walk it in reverse
/// declaration order.
type UsageFrame = Vec<(Token, bool)>;

/// Walks the parsed tree once, ahead of evaluation, to assign every local
/// variable reference a fixed scope distance and to flag unused locals.
/// `scopes` models only block/function nesting; globals are never entered
/// into it, which is what makes an unresolved name a global reference.
pub struct Resolver<'a> {
    interpreter: &'a mut Interpreter,
    scopes: Vec<HashMap<String, bool>>,
    usage: Vec<UsageFrame>,
    current_function: FunctionKind,
}

impl<'a> Resolver<'a> {
    pub fn new(interpreter: &'a mut Interpreter) -> Self {
        Resolver {
            interpreter,
            scopes: Vec::new(),
            usage: vec![Vec::new()],
            current_function: FunctionKind::None,
        }
    }

    pub fn resolve(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    /// Flushes the base usage frame's unused-variable warnings. Call once
    /// after the whole program has been resolved.
    pub fn finish(&mut self) {
        self.close_usage_frame();
        self.usage.push(Vec::new());
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(expr) => self.resolve_expr(expr),
            Stmt::Print(expr) => self.resolve_expr(expr),
            Stmt::Var { name, initializer } => {
                self.declare(name);
                if let Some(initializer) = initializer {
                    self.resolve_expr(initializer);
                }
                self.define(name);
            },
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve(statements);
                self.end_scope();
            },
            Stmt::If { condition, then_branch, else_branch } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            },
            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            },
            Stmt::Break(_) => {},
            Stmt::Function { name, params, body } => {
                self.declare(name);
                self.define(name);
                self.resolve_function(params, body, FunctionKind::Function);
            },
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionKind::None {
                    ResolveError {
                        token: keyword.clone(),
                        message: "Can't return from top-level code.".to_string(),
                    }.throw();
                }

                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            },
            Stmt::Class { name, methods: _ } => {
                // Method bodies are inert: not resolved, never executed (see class.rs).
                self.declare(name);
                self.define(name);
            },
        }
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {},
            Expr::Grouping(inner) => self.resolve_expr(inner),
            Expr::Unary { operand, .. } => self.resolve_expr(operand),
            Expr::Binary { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            },
            Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            },
            Expr::Ternary { condition, then_branch, else_branch, .. } => {
                self.resolve_expr(condition);
                self.resolve_expr(then_branch);
                self.resolve_expr(else_branch);
            },
            Expr::Variable { name } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.lexeme) == Some(&false) {
                        ResolveError {
                            token: name.clone(),
                            message: "Can't read local variable in its own initializer.".to_string(),
                        }.throw();
                    }
                }

                self.resolve_local(name);
            },
            Expr::Assign { name, value } => {
                self.resolve_expr(value);
                self.resolve_local(name);
            },
            Expr::Call { callee, arguments, .. } => {
                self.resolve_expr(callee);
                for argument in arguments {
                    self.resolve_expr(argument);
                }
            },
            Expr::Lambda { params, body, .. } => {
                self.resolve_function(params, body, FunctionKind::Lambda);
            },
        }
    }

    fn resolve_function(&mut self, params: &[Token], body: &[Stmt], kind: FunctionKind) {
        let enclosing_function = mem::replace(&mut self.current_function, kind);

        self.begin_scope();
        for param in params {
            self.declare(param);
            self.define(param);
        }
        self.resolve(body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
        self.usage.push(Vec::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
        self.close_usage_frame();
    }

    /// Emits "not used anywhere" for every entry still `false`, in reverse
    /// declaration order, then drops the frame.
    fn close_usage_frame(&mut self) {
        let frame = self.usage.pop().expect("usage stack to have a frame to close");
        for (token, used) in frame.iter().rev() {
            if !used {
                ResolveWarning {
                    token: token.clone(),
                    message: format!("{} is not used anywhere.", token.lexeme),
                }.throw();
            }
        }
    }

    fn declare(&mut self, name: &Token) {
        self.usage.last_mut().expect("usage stack never empty").push((name.clone(), false));

        if self.scopes.is_empty() {
            return;
        }

        let scope = self.scopes.last_mut().expect("scope stack not empty");
        if scope.contains_key(&name.lexeme) {
            ResolveError {
                token: name.clone(),
                message: "Already a variable with this name in this scope.".to_string(),
            }.throw();
        }
        scope.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        if self.scopes.is_empty() {
            return;
        }

        self.scopes.last_mut().expect("scope stack not empty").insert(name.lexeme.clone(), true);
    }

    /// Records the distance from the current scope to the one holding
    /// `name`, and marks that declaration as used. No match means the name
    /// is a global and is left unresolved for the interpreter to look up
    /// directly in `globals`.
    fn resolve_local(&mut self, name: &Token) {
        self.mark_used(name);

        for (i, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(name, i);
                return;
            }
        }
    }

    fn mark_used(&mut self, name: &Token) {
        for frame in self.usage.iter_mut().rev() {
            if let Some(entry) = frame.iter_mut().rev().find(|(token, _)| token.lexeme == name.lexeme) {
                entry.1 = true;
                return;
            }
        }
    }
}
