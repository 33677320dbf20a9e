use std::io::{BufRead, Write};
use std::rc::Rc;
use crate::{println_debug, verbose, Config};
use crate::interpreter::ast::{Branch, Expr, Program, Stmt};
use crate::interpreter::environment::{Environment, FunctionRegistry};
use crate::interpreter::lexer::{Token, TokenPos, TokenType};
use crate::interpreter::value::Value;

mod builtin;

pub const ENTRY_POINT: &str = "principal";

#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
    #[error("{pos} Undefined variable '{name}'")]
    UnboundVariable { pos: TokenPos, name: String },
    #[error("{pos} Division by zero")]
    DivisionByZero { pos: TokenPos },
    #[error("{pos} Undefined function '{name}'")]
    UndefinedFunction { pos: TokenPos, name: String },
    #[error("{pos} '{name}' expects {expected} argument(s), got {found}")]
    ArityMismatch { pos: TokenPos, name: String, expected: usize, found: usize },
    #[error("{pos} Unsupported construct: {construct}")]
    UnsupportedConstruct { pos: TokenPos, construct: String },
    #[error("{pos} Type mismatch: {message}")]
    TypeMismatch { pos: TokenPos, message: String },
    #[error("{pos} Cannot convert '{value}' to {target}")]
    InvalidConversion { pos: TokenPos, value: String, target: &'static str },
    #[error("{pos} Integer overflow")]
    IntegerOverflow { pos: TokenPos },
    #[error("{pos} Calls to '{name}' nested deeper than {limit}")]
    RecursionLimit { pos: TokenPos, name: String, limit: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// What executing a statement or block hands back to its caller.
///
/// `Return` is the `remate` signal: blocks stop at the first one and pass it up
/// unchanged until it reaches the function call that is running them.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    Continue(Value),
    Return(Value),
}

impl Flow {
    pub fn into_value(self) -> Value {
        match self {
            Flow::Continue(value) | Flow::Return(value) => value,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// `principal` ran and produced this value.
    Finished(Value),
    NoEntryPoint,
}

/// Stack reserved for the evaluator thread before any call is made.
const BASE_STACK_SIZE: usize = 4 * 1024 * 1024;
/// Stack reserved per nested function call.
const STACK_PER_CALL: usize = 64 * 1024;

/// Registers every function of `program` and runs `principal`, if there is one.
///
/// Evaluation runs on its own thread whose stack is sized from
/// `config.max_depth`, so running into the depth limit reports `RecursionLimit`
/// whatever thread the caller is on.
pub fn execute_program<R: BufRead + Send, W: Write + Send>(program: &Program, input: R, output: W, config: Rc<Config>) -> RuntimeResult<Outcome> {
    let config = Config::clone(&config);
    let stack_size = BASE_STACK_SIZE.saturating_add(config.max_depth.saturating_mul(STACK_PER_CALL));

    std::thread::scope(|scope| {
        let handle = std::thread::Builder::new()
            .name(String::from("futbolang-evaluator"))
            .stack_size(stack_size)
            .spawn_scoped(scope, move || {
                let functions = FunctionRegistry::new(program);
                println_debug!("Registered {} function(s)", program.functions.len());

                let mut interpreter = Interpreter::new(&functions, input, output, Rc::new(config));
                interpreter.run_principal()
            })?;

        handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    })
}

pub struct Interpreter<'p, R, W> {
    functions: &'p FunctionRegistry<'p>,

    input: R,
    output: W,

    depth: usize,
    config: Rc<Config>,
}

impl<'p, R: BufRead, W: Write> Interpreter<'p, R, W> {
    pub fn new(functions: &'p FunctionRegistry<'p>, input: R, output: W, config: Rc<Config>) -> Interpreter<'p, R, W> {
        Interpreter {
            functions,
            input, output,
            depth: 0,
            config,
        }
    }

    /// Calls `principal` with no arguments against an empty environment.
    pub fn run_principal(&mut self) -> RuntimeResult<Outcome> {
        if !self.functions.contains(ENTRY_POINT) {
            verbose!(self.config, "No '{}' function defined", ENTRY_POINT);
            return Ok(Outcome::NoEntryPoint);
        }

        let value = self.call_function(&Token::identifier(ENTRY_POINT), Vec::new(), &Environment::new())?;
        Ok(Outcome::Finished(value))
    }

    /// Calls a user-defined function.
    ///
    /// The callee's environment is a copy of `caller` with the parameters bound
    /// on top, so the callee can read (and shadow) any variable of its caller.
    pub fn call_function(&mut self, name: &Token, args: Vec<Value>, caller: &Environment) -> RuntimeResult<Value> {
        let function = self.functions.get(name.source()).ok_or_else(|| RuntimeError::UndefinedFunction {
            pos: *name.start(),
            name: name.source().to_owned(),
        })?;

        if function.params.len() != args.len() {
            return Err(RuntimeError::ArityMismatch {
                pos: *name.start(),
                name: name.source().to_owned(),
                expected: function.params.len(),
                found: args.len(),
            });
        }

        if self.depth >= self.config.max_depth {
            return Err(RuntimeError::RecursionLimit {
                pos: *name.start(),
                name: name.source().to_owned(),
                limit: self.config.max_depth,
            });
        }

        let mut environment = caller.snapshot();

        for (param, value) in function.params.iter().zip(args) {
            environment.assign(param.source(), value);
        }

        verbose!(self.config, "{} Calling '{}' at depth {}", name.start(), name.source(), self.depth);

        self.depth += 1;
        let result = self.execute_block(&function.body, &mut environment);
        self.depth -= 1;

        Ok(result?.into_value())
    }

    /// Runs `block` in order, stopping at the first `remate`.
    ///
    /// Without a `remate` the block yields the value of its last statement.
    pub fn execute_block(&mut self, block: &[Stmt], environment: &mut Environment) -> RuntimeResult<Flow> {
        let mut last = Value::Nada;

        for stmt in block {
            match self.execute_statement(stmt, environment)? {
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Continue(value) => last = value,
            }
        }

        Ok(Flow::Continue(last))
    }

    pub fn execute_statement(&mut self, stmt: &Stmt, environment: &mut Environment) -> RuntimeResult<Flow> {
        match stmt {
            Stmt::Assign { name, expr } => {
                let value = self.evaluate_expr(expr, environment)?;
                environment.assign(name.source(), value);

                Ok(Flow::Continue(Value::Nada))
            },
            Stmt::Return { expr, .. } => Ok(Flow::Return(self.evaluate_expr(expr, environment)?)),
            Stmt::If { condition, then, branches, .. } => {
                // Every branch runs in the enclosing environment itself
                if self.evaluate_expr(condition, environment)?.is_truthy() {
                    return self.execute_block(then, environment);
                }

                for branch in branches {
                    let matched = match branch {
                        Branch::Elif { condition, .. } => self.evaluate_expr(condition, environment)?.is_truthy(),
                        Branch::Else { .. } => true,
                    };

                    if matched {
                        return self.execute_block(branch.body(), environment);
                    }
                }

                Ok(Flow::Continue(Value::Nada))
            },
            Stmt::For { variable, count, body } => {
                let count = match self.evaluate_expr(count, environment)? {
                    Value::Int(count) => count,
                    Value::Float(count) => count.trunc() as i64,
                    other => return Err(RuntimeError::TypeMismatch {
                        pos: *variable.start(),
                        message: format!("loop count must be a number, got {}", other.type_name()),
                    }),
                };

                for i in 0..count {
                    // Each iteration gets its own copy; nothing it assigns survives the iteration
                    let mut iteration = environment.snapshot();
                    iteration.assign(variable.source(), Value::Int(i));

                    if let Flow::Return(value) = self.execute_block(body, &mut iteration)? {
                        return Ok(Flow::Return(value));
                    }
                }

                Ok(Flow::Continue(Value::Nada))
            },
            Stmt::Expr(expr) => Ok(Flow::Continue(self.evaluate_expr(expr, environment)?)),
            Stmt::Nop => Ok(Flow::Continue(Value::Nada)),
        }
    }

    pub fn evaluate_expr(&mut self, expr: &Expr, environment: &Environment) -> RuntimeResult<Value> {
        match expr {
            Expr::ConstantInt(value) => Ok(Value::Int(*value)),
            Expr::ConstantFloat(value) => Ok(Value::Float(*value)),
            Expr::ConstantString(value) => Ok(Value::String(value.clone())),
            Expr::ConstantBoolean(value) => Ok(Value::Boolean(*value)),
            Expr::Variable(name) => environment.get(name.source()).cloned().ok_or_else(|| RuntimeError::UnboundVariable {
                pos: *name.start(),
                name: name.source().to_owned(),
            }),
            Expr::BinaryOperator { left, operator, right } => {
                let left = self.evaluate_expr(left, environment)?;
                let right = self.evaluate_expr(right, environment)?;

                arithmetic(operator, left, right)
            },
            Expr::Comparison { left, operator, right } => {
                let left = self.evaluate_expr(left, environment)?;
                let right = self.evaluate_expr(right, environment)?;

                compare(operator, &left, &right)
            },
            // Both sides are always evaluated
            Expr::And { left, right } => {
                let left = self.evaluate_expr(left, environment)?;
                let right = self.evaluate_expr(right, environment)?;

                Ok(Value::Boolean(left.is_truthy() && right.is_truthy()))
            },
            Expr::Or { left, right } => {
                let left = self.evaluate_expr(left, environment)?;
                let right = self.evaluate_expr(right, environment)?;

                Ok(Value::Boolean(left.is_truthy() || right.is_truthy()))
            },
            Expr::FunctionCall { name, args } => {
                let args = args.iter()
                    .map(|arg| self.evaluate_expr(arg, environment))
                    .collect::<RuntimeResult<Vec<Value>>>()?;

                if let Some(result) = self.call_builtin(name, &args) {
                    return result;
                }

                self.call_function(name, args, environment)
            },
        }
    }
}

fn type_mismatch(operator: &Token, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        pos: *operator.start(),
        message: format!("cannot apply '{}' to {} and {}", operator.source(), left.type_name(), right.type_name()),
    }
}

fn arithmetic(operator: &Token, left: Value, right: Value) -> RuntimeResult<Value> {
    let pos = *operator.start();
    let token_type = operator.token_type();

    if token_type == TokenType::Divide {
        let (dividend, divisor) = left.as_float().zip(right.as_float())
            .ok_or_else(|| type_mismatch(operator, &left, &right))?;

        if right.is_zero() {
            return Err(RuntimeError::DivisionByZero { pos });
        }

        // Always true division, even for two ints
        return Ok(Value::Float(dividend / divisor));
    }

    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => {
            let result = match token_type {
                TokenType::Plus => a.checked_add(*b),
                TokenType::Minus => a.checked_sub(*b),
                TokenType::Multiply => a.checked_mul(*b),
                _ => return Err(unsupported_operator(operator)),
            };

            result.map(Value::Int).ok_or(RuntimeError::IntegerOverflow { pos })
        },
        (Value::String(a), Value::String(b)) if token_type == TokenType::Plus => Ok(Value::String(format!("{}{}", a, b))),
        _ => {
            let (a, b) = left.as_float().zip(right.as_float())
                .ok_or_else(|| type_mismatch(operator, &left, &right))?;

            match token_type {
                TokenType::Plus => Ok(Value::Float(a + b)),
                TokenType::Minus => Ok(Value::Float(a - b)),
                TokenType::Multiply => Ok(Value::Float(a * b)),
                _ => Err(unsupported_operator(operator)),
            }
        },
    }
}

fn compare(operator: &Token, left: &Value, right: &Value) -> RuntimeResult<Value> {
    if operator.token_type() == TokenType::Equal {
        return Ok(Value::Boolean(left.loose_eq(right)));
    }

    let ordering = left.try_cmp(right).ok_or_else(|| type_mismatch(operator, left, right))?;

    match operator.token_type() {
        TokenType::Greater => Ok(Value::Boolean(ordering.is_gt())),
        TokenType::GreaterEqual => Ok(Value::Boolean(ordering.is_ge())),
        TokenType::Less => Ok(Value::Boolean(ordering.is_lt())),
        TokenType::LessEqual => Ok(Value::Boolean(ordering.is_le())),
        _ => Err(unsupported_operator(operator)),
    }
}

fn unsupported_operator(operator: &Token) -> RuntimeError {
    RuntimeError::UnsupportedConstruct {
        pos: *operator.start(),
        construct: format!("operator {}", operator),
    }
}
