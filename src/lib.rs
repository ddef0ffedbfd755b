pub mod diagnostics;
pub mod environment;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod printer;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;

use std::fs;
use std::io::prelude::*;
use std::io::{self, BufReader};

use anyhow::{Context, Result};

use diagnostics::Diagnostics;
use interpreter::Interpreter;
use parser::Parser;
use scanner::Scanner;
use stmt::Stmt;
use token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpretResult {
    Ok,
    CompileError,
    RuntimeError,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Print the parsed tree instead of executing it.
    pub print_ast: bool,
}

pub fn scan(source: &str, diagnostics: &mut Diagnostics) -> Vec<Token> {
    Scanner::new(source, diagnostics).scan_tokens()
}

pub fn parse(tokens: Vec<Token>, diagnostics: &mut Diagnostics) -> Vec<Stmt> {
    Parser::new(tokens, diagnostics).parse()
}

/// One interpreter session. Globals live as long as the session does.
pub struct Lox<W: Write = io::Stdout> {
    interpreter: Interpreter<W>,
    options: Options,
}

impl Lox<io::Stdout> {
    pub fn new(options: Options) -> Self {
        Lox {
            interpreter: Interpreter::default(),
            options,
        }
    }
}

impl<W: Write> Lox<W> {
    pub fn with_output(out: W, options: Options) -> Self {
        Lox {
            interpreter: Interpreter::new(out),
            options,
        }
    }

    pub fn output(&self) -> &W {
        self.interpreter.output()
    }

    pub fn into_output(self) -> W {
        self.interpreter.into_output()
    }

    /// Runs `source` through the whole pipeline. Syntax errors stop it before
    /// anything executes; language errors end up in `diagnostics`, while a
    /// failure to write output is returned as an error.
    pub fn run(&mut self, source: &str, diagnostics: &mut Diagnostics) -> Result<InterpretResult> {
        let tokens = scan(source, diagnostics);
        let statements = parse(tokens, diagnostics);

        if diagnostics.had_error() {
            return Ok(InterpretResult::CompileError);
        }

        if self.options.print_ast {
            let out = self.interpreter.output_mut();
            for statement in &statements {
                writeln!(out, "{}", printer::print_stmt(statement))?;
            }
            return Ok(InterpretResult::Ok);
        }

        match self.interpreter.interpret(&statements) {
            Ok(()) => Ok(InterpretResult::Ok),
            Err(error) => match error.token() {
                Some(token) => {
                    diagnostics.runtime_error(token, &error.to_string());
                    Ok(InterpretResult::RuntimeError)
                }
                None => Err(error.into()),
            },
        }
    }
}

pub fn run_file(path: &str, options: Options) -> Result<InterpretResult> {
    let source = fs::read_to_string(path).with_context(|| format!("Reading {path}"))?;
    let mut lox = Lox::new(options);
    lox.run(&source, &mut Diagnostics::echoing())
}

pub fn run_prompt(options: Options) -> Result<()> {
    let input = io::stdin();
    let mut reader = BufReader::new(input);
    let mut lox = Lox::new(options);
    let mut diagnostics = Diagnostics::echoing();

    loop {
        print!("> ");
        io::stdout().flush().context("Flushing prompt")?;

        let mut line = String::new();
        if reader.read_line(&mut line).context("Reading stdin")? == 0 {
            // End of input.
            println!();
            return Ok(());
        }

        // One bad line must not poison the next.
        diagnostics.reset();
        lox.run(&line, &mut diagnostics)?;
    }
}
