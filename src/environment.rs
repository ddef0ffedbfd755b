use std::collections::hash_map::{Entry, HashMap};
use std::mem;

use crate::interpreter::{RuntimeError, RuntimeResult};
use crate::token::Token;
use crate::value::Value;

/// A chain of scopes. The innermost scope is `self`; `enclosing` points
/// outwards towards the globals.
#[derive(Default, Debug, Clone)]
pub struct Environment {
    enclosing: Option<Box<Environment>>,
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self) {
        let mut new = Environment {
            enclosing: Some(mem::take(self).into()),
            values: HashMap::new(),
        };
        mem::swap(self, &mut new);
    }

    /// Popping the global scope is a no-op.
    pub fn pop_scope(&mut self) {
        if let Some(enclosing) = self.enclosing.take() {
            *self = *enclosing;
        }
    }

    /// Defines `name` in the innermost scope, replacing any earlier definition
    /// in that same scope.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &Token) -> RuntimeResult<Value> {
        if let Some(value) = self.values.get(&*name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.get(name)
        } else {
            Err(RuntimeError::UndefinedVariable { name: name.clone() })
        }
    }

    /// Assigns to the nearest scope that defines `name`. Never declares.
    pub fn assign(&mut self, name: &Token, value: Value) -> RuntimeResult<()> {
        if let Entry::Occupied(mut e) = self.values.entry(name.lexeme.to_string()) {
            e.insert(value);
            return Ok(());
        }

        if let Some(enclosing) = &mut self.enclosing {
            return enclosing.assign(name, value);
        }

        Err(RuntimeError::UndefinedVariable { name: name.clone() })
    }
}
