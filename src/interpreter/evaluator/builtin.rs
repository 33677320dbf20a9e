use std::io::{BufRead, Write};
use crate::interpreter::lexer::Token;
use crate::interpreter::value::Value;
use super::{Interpreter, RuntimeError, RuntimeResult};

const PRINT: &str = "golazo.imprimir";
const READ_LINE: &str = "entrenador.leer_texto";

/// Prefixes reserved for built-ins; no user function can be reached under them.
const BUILTIN_NAMESPACES: [&str; 2] = ["golazo.", "entrenador."];

impl<'p, R: BufRead, W: Write> Interpreter<'p, R, W> {
    /// Runs the built-in called `name`, or returns `None` when there is no such built-in.
    pub(super) fn call_builtin(&mut self, name: &Token, args: &[Value]) -> Option<RuntimeResult<Value>> {
        let result = match name.source() {
            PRINT => self.print(args),
            READ_LINE => self.read_line(name, args),
            "int" => check_arity(name, args, 1).and_then(|_| to_int(name, &args[0])),
            "float" => check_arity(name, args, 1).and_then(|_| to_float(name, &args[0])),
            "str" => check_arity(name, args, 1).map(|_| Value::String(args[0].to_string())),
            other if BUILTIN_NAMESPACES.iter().any(|namespace| other.starts_with(namespace)) =>
                Err(RuntimeError::UnsupportedConstruct {
                    pos: *name.start(),
                    construct: format!("unknown built-in '{}'", other),
                }),
            _ => return None,
        };

        Some(result)
    }

    fn print(&mut self, args: &[Value]) -> RuntimeResult<Value> {
        let line = args.iter().map(ToString::to_string).collect::<Vec<String>>().join(" ");
        writeln!(self.output, "{}", line)?;

        Ok(Value::Nada)
    }

    fn read_line(&mut self, name: &Token, args: &[Value]) -> RuntimeResult<Value> {
        if args.len() > 1 {
            return Err(RuntimeError::ArityMismatch {
                pos: *name.start(),
                name: name.source().to_owned(),
                expected: 1,
                found: args.len(),
            });
        }

        if let Some(prompt) = args.first() {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;
        }

        let mut line = String::new();
        self.input.read_line(&mut line)?;

        if line.ends_with('\n') {
            line.pop();

            if line.ends_with('\r') {
                line.pop();
            }
        }

        Ok(Value::String(line))
    }
}

fn check_arity(name: &Token, args: &[Value], expected: usize) -> RuntimeResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RuntimeError::ArityMismatch {
            pos: *name.start(),
            name: name.source().to_owned(),
            expected,
            found: args.len(),
        })
    }
}

fn invalid_conversion(name: &Token, value: &Value, target: &'static str) -> RuntimeError {
    RuntimeError::InvalidConversion {
        pos: *name.start(),
        value: value.to_string(),
        target,
    }
}

fn to_int(name: &Token, value: &Value) -> RuntimeResult<Value> {
    match value {
        Value::Int(value) => Ok(Value::Int(*value)),
        // `as` saturates, so check the range first
        Value::Float(float) if float.is_finite() && float.trunc() >= i64::MIN as f64 && float.trunc() < i64::MAX as f64 =>
            Ok(Value::Int(float.trunc() as i64)),
        Value::Boolean(value) => Ok(Value::Int(i64::from(*value))),
        Value::String(text) => text.trim().parse().map(Value::Int).map_err(|_| invalid_conversion(name, value, "int")),
        _ => Err(invalid_conversion(name, value, "int")),
    }
}

fn to_float(name: &Token, value: &Value) -> RuntimeResult<Value> {
    match value {
        Value::Int(value) => Ok(Value::Float(*value as f64)),
        Value::Float(value) => Ok(Value::Float(*value)),
        Value::Boolean(value) => Ok(Value::Float(if *value { 1.0 } else { 0.0 })),
        Value::String(text) => text.trim().parse().map(Value::Float).map_err(|_| invalid_conversion(name, value, "float")),
        Value::Nada => Err(invalid_conversion(name, value, "float")),
    }
}
