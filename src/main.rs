use std::process::ExitCode;
use clap::Parser as ClapParser;
use futbolang::{Config, Error};
use futbolang::interpreter::evaluator::Outcome;

fn main() -> ExitCode {
    let config: Config = Config::parse();
    let path = config.input.to_string_lossy().into_owned();

    match futbolang::run(config) {
        Ok(Outcome::Finished(value)) => {
            println!("Resultado de 'principal': {}", value);
            ExitCode::SUCCESS
        },
        Ok(Outcome::NoEntryPoint) => {
            println!("No se definió la función 'principal'.");
            ExitCode::SUCCESS
        },
        Err(Error::Lex(errors)) => {
            for error in &errors {
                eprintln!("[{}] Error: {}", path, error);
            }

            ExitCode::FAILURE
        },
        Err(err) => {
            eprintln!("[{}] Error: {}", path, err);
            ExitCode::FAILURE
        },
    }
}
