use crate::object::Object;
use crate::stmt::Stmt;
use crate::token::Token;

/// An expression node. A plain enum rather than a trait-object tree: the
/// interpreter and resolver both just match on the variant they need,
/// which keeps dispatch monomorphic and every node's shape visible at a
/// glance instead of hidden behind a visitor.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Object),
    Grouping(Box<Expr>),
    Unary { operator: Token, operand: Box<Expr> },
    Binary { left: Box<Expr>, operator: Token, right: Box<Expr> },
    Logical { left: Box<Expr>, operator: Token, right: Box<Expr> },
    Ternary { question: Token, condition: Box<Expr>, then_branch: Box<Expr>, else_branch: Box<Expr> },
    Variable { name: Token },
    Assign { name: Token, value: Box<Expr> },
    Call { callee: Box<Expr>, paren: Token, arguments: Vec<Expr> },
    Lambda { keyword: Token, params: Vec<Token>, body: Vec<Stmt> },
}
