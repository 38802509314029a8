use crate::token::{Token, Type};

static mut HAD_ERROR: bool = false;
static mut HAD_RUNTIME_ERROR: bool = false;

/// Checks if a static error occurred during scanning, parsing, or resolving.
pub fn did_error() -> bool {
    unsafe { HAD_ERROR }
}

/// Checks if an error occurred at runtime.
pub fn did_runtime_error() -> bool {
    unsafe { HAD_RUNTIME_ERROR }
}

/// Clears both error flags. Called between lines in the REPL so a mistake
/// on one line doesn't poison the rest of the session.
pub fn reset_error() {
    unsafe {
        HAD_ERROR = false;
        HAD_RUNTIME_ERROR = false;
    }
}

/// Every error type must implement this trait.
pub trait Error {
    /// Prints the error message and sets the appropriate error flag.
    fn throw(&self);
}

/// Represents an error that occurs during scanning.
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Error for ScanError {
    fn throw(&self) {
        eprintln!("[{line}] Error: {message}", line = self.line, message = self.message);

        unsafe {
            HAD_ERROR = true;
        }
    }
}

/// Represents an error that occurs during parsing.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Error for ParseError {
    fn throw(&self) {
        if self.token.r#type == Type::EOF {
            eprintln!(
                "[{line}] Error at end: {message}",
                line = self.token.line,
                message = self.message
            );
        } else {
            eprintln!(
                "[{line}] Error at '{lexeme}': {message}",
                line = self.token.line,
                lexeme = self.token.lexeme,
                message = self.message
            );
        }

        unsafe {
            HAD_ERROR = true;
        }
    }
}

/// Represents an error that occurs during static resolution.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Error for ResolveError {
    fn throw(&self) {
        eprintln!(
            "[{line}] Error at '{lexeme}': {message}",
            line = self.token.line,
            lexeme = self.token.lexeme,
            message = self.message
        );

        unsafe {
            HAD_ERROR = true;
        }
    }
}

/// An "unused variable" diagnostic. Reported like a static error but never
/// sets the error flag, so it never blocks a program from running.
#[derive(Debug)]
pub struct ResolveWarning {
    pub token: Token,
    pub message: String,
}

impl Error for ResolveWarning {
    fn throw(&self) {
        eprintln!("{message}", message = self.message);
    }
}

/// Represents an error that occurs during tree-walking evaluation.
#[derive(Debug)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Error for RuntimeError {
    fn throw(&self) {
        eprintln!("{message}\n[line {line}]", message = self.message, line = self.token.line);

        unsafe {
            HAD_RUNTIME_ERROR = true;
        }
    }
}
