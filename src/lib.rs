pub mod util;
pub mod interpreter;

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::rc::Rc;
use clap::Parser as ClapParser;
use crate::interpreter::ast::Program;
use crate::interpreter::evaluator::{self, Outcome, RuntimeError};
use crate::interpreter::lexer::{Lexer, LexerError};
use crate::interpreter::parser::{Parser, SyntaxError};

pub const DEFAULT_MAX_DEPTH: usize = 200;

#[derive(ClapParser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(default_value = "main.futbol", help = "Source file to run")]
    pub input: PathBuf,
    #[clap(long, help = "Refuse to run a file that contains illegal characters")]
    pub strict: bool,
    #[clap(long, default_value_t = DEFAULT_MAX_DEPTH, help = "Maximum depth of nested function calls")]
    pub max_depth: usize,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: PathBuf::from("main.futbol"),
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
            verbose: false,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{} lexer error(s)", .0.len())]
    Lex(Vec<LexerError>),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses `source` into a program.
///
/// Illegal characters are reported on stderr and skipped, unless `config.strict`
/// is set, in which case they fail the whole source before parsing starts.
pub fn parse_source(source: &str, config: &Config) -> Result<Program, Error> {
    if config.strict {
        let (_, errors) = Lexer::tokenize(source);

        if !errors.is_empty() {
            return Err(Error::Lex(errors));
        }
    }

    crate::verbose!(config, "{} token(s)", Lexer::new(source).filter(Result::is_ok).count());

    let mut parser = Parser::new(Lexer::new(source));
    let result = parser.parse();

    for error in parser.lexer_errors() {
        eprintln!("[{}] Warning: {}", config.input.to_string_lossy(), error);
    }

    let program = result?;
    crate::verbose!(config, "AST:\n{:?}", program);

    Ok(program)
}

/// Parses and runs `source`. `input` and `output` are handed to the evaluator thread.
pub fn run_source<R: BufRead + Send, W: Write + Send>(source: &str, config: Rc<Config>, input: R, output: W) -> Result<Outcome, Error> {
    let program = parse_source(source, &config)?;

    Ok(evaluator::execute_program(&program, input, output, config)?)
}

pub fn run(config: Config) -> Result<Outcome, Error> {
    let source = std::fs::read_to_string(&config.input)?;

    run_source(&source, Rc::new(config), BufReader::new(std::io::stdin()), std::io::stdout())
}
