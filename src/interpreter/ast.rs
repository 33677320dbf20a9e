use std::fmt::{Debug, Formatter};
use crate::interpreter::lexer::Token;

#[derive(Clone, PartialEq)]
pub struct Program {
    pub functions: Vec<Function>,
}

impl Debug for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.functions.iter().map(|function| format!("{:?}", function))
            .collect::<Vec<String>>().join("\n"))
    }
}

#[derive(Clone, PartialEq)]
pub struct Function {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

impl Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "jugador {}({}): {}", self.name.source(),
               self.params.iter().map(|param| param.source().to_owned()).collect::<Vec<String>>().join(", "),
               format_block(&self.body))
    }
}

fn format_block(block: &[Stmt]) -> String {
    format!("{{ {} }}", block.iter().map(|stmt| format!("{:?}", stmt)).collect::<Vec<String>>().join("; "))
}

#[derive(Clone, PartialEq)]
pub enum Stmt {
    Assign {
        name: Token,
        expr: Expr,
    },
    Return {
        token: Token,
        expr: Expr,
    },
    If {
        token: Token,
        condition: Expr,
        then: Vec<Stmt>,
        branches: Vec<Branch>,
    },
    For {
        variable: Token,
        count: Expr,
        body: Vec<Stmt>,
    },
    Expr(Expr),
    Nop,
}

impl Debug for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Assign { name, expr } => write!(f, "{} = {:?}", name.source(), expr),
            Stmt::Return { expr, .. } => write!(f, "remate {:?}", expr),
            Stmt::If { condition, then, branches, .. } => {
                write!(f, "tarjeta ({:?}) {}", condition, format_block(then))?;

                for branch in branches {
                    write!(f, " {:?}", branch)?;
                }

                Ok(())
            },
            Stmt::For { variable, count, body } =>
                write!(f, "delantero {} en rango({:?}) {}", variable.source(), count, format_block(body)),
            Stmt::Expr(expr) => write!(f, "{:?}", expr),
            Stmt::Nop => write!(f, "nada"),
        }
    }
}

/// One entry of the chain that follows a `tarjeta` block.
#[derive(Clone, PartialEq)]
pub enum Branch {
    Elif {
        token: Token,
        condition: Expr,
        body: Vec<Stmt>,
    },
    Else {
        body: Vec<Stmt>,
    },
}

impl Branch {
    pub fn body(&self) -> &[Stmt] {
        match self {
            Branch::Elif { body, .. } | Branch::Else { body } => body,
        }
    }
}

impl Debug for Branch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Branch::Elif { condition, body, .. } => write!(f, "amonestacion ({:?}) {}", condition, format_block(body)),
            Branch::Else { body } => write!(f, "expulsado {}", format_block(body)),
        }
    }
}

#[derive(Clone, PartialEq)]
pub enum Expr {
    ConstantInt(i64),
    ConstantFloat(f64),
    ConstantString(String),
    ConstantBoolean(bool),

    Variable(Token),

    BinaryOperator {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Comparison {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    And {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Or {
        left: Box<Expr>,
        right: Box<Expr>,
    },

    FunctionCall {
        name: Token,
        args: Vec<Expr>,
    },
}

impl Debug for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::ConstantInt(value) => write!(f, "{}", value),
            Expr::ConstantFloat(value) => write!(f, "{:?}", value),
            Expr::ConstantString(value) => write!(f, "\"{}\"", value),
            Expr::ConstantBoolean(value) => write!(f, "{}", if *value { "Verdadero" } else { "Falso" }),
            Expr::Variable(name) => write!(f, "{}", name.source()),
            Expr::BinaryOperator { left, operator, right } |
            Expr::Comparison { left, operator, right } =>
                write!(f, "({:?} {} {:?})", left, operator.source(), right),
            Expr::And { left, right } => write!(f, "({:?} y {:?})", left, right),
            Expr::Or { left, right } => write!(f, "({:?} o {:?})", left, right),
            Expr::FunctionCall { name, args } => write!(f, "{}({})", name.source(),
                                                        args.iter().map(|arg| format!("{:?}", arg))
                                                            .collect::<Vec<String>>().join(", ")),
        }
    }
}
