use std::fmt;

use crate::token::{Token, TokenType};

pub fn report(line: u32, location: &str, message: &str) {
    eprintln!("[line {line}] Error{location}: {message}");
}

fn location(token: &Token) -> String {
    if token.r#type == TokenType::Eof {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    /// Empty for lexical errors, otherwise `" at end"` or `" at '<lexeme>'"`.
    pub location: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[line {}] Error{}: {}", self.line, self.location, self.message)
    }
}

/// Collects everything reported during one run of the pipeline.
///
/// Use a fresh collector, or `reset` this one, for every independent run so
/// that an error in one REPL line never taints the next one.
#[derive(Debug, Default)]
pub struct Diagnostics {
    reported: Vec<Diagnostic>,
    had_error: bool,
    had_runtime_error: bool,
    echo: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A collector that also writes every diagnostic to stderr as it arrives.
    pub fn echoing() -> Self {
        Diagnostics {
            echo: true,
            ..Default::default()
        }
    }

    /// Lexical error, reported without a location.
    pub fn error(&mut self, line: u32, message: &str) {
        self.push(line, String::new(), message);
        self.had_error = true;
    }

    /// Syntax error at `token`.
    pub fn error_at(&mut self, token: &Token, message: &str) {
        self.push(token.line, location(token), message);
        self.had_error = true;
    }

    pub fn runtime_error(&mut self, token: &Token, message: &str) {
        self.push(token.line, location(token), message);
        self.had_runtime_error = true;
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn reported(&self) -> &[Diagnostic] {
        &self.reported
    }

    pub fn len(&self) -> usize {
        self.reported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }

    /// Starts a new run; the REPL calls this before every line.
    pub fn reset(&mut self) {
        self.reported.clear();
        self.had_error = false;
        self.had_runtime_error = false;
    }

    fn push(&mut self, line: u32, location: String, message: &str) {
        if self.echo {
            report(line, &location, message);
        }
        self.reported.push(Diagnostic {
            line,
            location,
            message: message.to_string(),
        });
    }
}
