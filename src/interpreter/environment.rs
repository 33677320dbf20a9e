use std::collections::HashMap;
use crate::interpreter::ast::{Function, Program};
use crate::interpreter::value::Value;

/// Variables visible to one function call or one loop iteration.
///
/// Scoping is dynamic and copy-based rather than lexical: a call starts from a
/// [`snapshot`](Environment::snapshot) of the *caller's* variables, and every
/// `delantero` iteration starts from a snapshot of the loop's enclosing
/// environment. Writes only ever land in the environment they were made in,
/// so neither a callee nor a loop body can change the scope it was copied from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Environment {
    variables: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment::default()
    }

    pub fn snapshot(&self) -> Environment {
        self.clone()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Binds or rebinds `name`.
    pub fn assign(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_owned(), value);
    }
}

/// The user-defined functions of a program, by name.
///
/// Built once from a [`Program`] and read-only afterwards.
#[derive(Debug, Default)]
pub struct FunctionRegistry<'p> {
    functions: HashMap<&'p str, &'p Function>,
}

impl<'p> FunctionRegistry<'p> {
    pub fn new(program: &'p Program) -> FunctionRegistry<'p> {
        let mut functions = HashMap::new();

        for function in &program.functions {
            // Redefinition replaces the earlier function
            functions.insert(function.name.source(), function);
        }

        FunctionRegistry { functions }
    }

    pub fn get(&self, name: &str) -> Option<&'p Function> {
        self.functions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}
