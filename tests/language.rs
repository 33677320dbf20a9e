use std::fs;
use std::rc::Rc;

use futbolang::interpreter::evaluator::Outcome;
use futbolang::interpreter::value::Value;
use futbolang::{run_source, Config, Error};
use walkdir::WalkDir;

fn run(source: &str, input: &str) -> (Result<Outcome, Error>, String) {
    let mut output = Vec::new();
    let result = run_source(source, Rc::new(Config::default()), input.as_bytes(), &mut output);

    (result, String::from_utf8(output).unwrap())
}

#[test]
fn demos_run() {
    let mut count = 0;

    for entry in WalkDir::new("demos").into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "futbol"))
    {
        let path = entry.path();
        let source = fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        count += 1;
        match run(&source, "").0 {
            Ok(Outcome::Finished(_)) => {},
            other => panic!("Demo {:?} failed: {:?}", path, other),
        }
    }

    assert!(count > 0, "No demos found in demos/");
}

#[test]
fn doble_demo_output() {
    let source = fs::read_to_string("demos/doble.futbol").unwrap();
    let (result, output) = run(&source, "");

    assert_eq!(result.unwrap(), Outcome::Finished(Value::Float(2.5)));
    assert_eq!(output, "doble de 5: 10\n2 pase 3 tiro 4 = 14\n");
}

#[test]
fn marcador_demo_output() {
    let source = fs::read_to_string("demos/marcador.futbol").unwrap();
    let (_, output) = run(&source, "");

    assert_eq!(output, "gana el local\nempate\ngana el visitante\n");
}

#[test]
fn saludo_reads_input() {
    let source = fs::read_to_string("demos/saludo.futbol").unwrap();
    let (result, output) = run(&source, "Alexia\n");

    assert_eq!(result.unwrap(), Outcome::Finished(Value::Nada));
    assert_eq!(output, "Tu nombre: Hola Alexia\n");
}

#[test]
fn illegal_characters_are_skipped_by_default() {
    let (result, _) = run("jugador principal():\n    remate 1 pase $ 2\n", "");
    assert_eq!(result.unwrap(), Outcome::Finished(Value::Int(3)));
}

#[test]
fn strict_mode_rejects_illegal_characters() {
    let config = Config { strict: true, ..Config::default() };
    let result = run_source("jugador principal():\n    remate 1 pase $ 2 @\n", Rc::new(config), &b""[..], Vec::new());

    match result {
        Err(Error::Lex(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn syntax_errors_stop_before_running() {
    let (result, output) = run("jugador principal():\n    golazo.imprimir(1)\n    remate (1\n", "");

    assert!(matches!(result, Err(Error::Syntax(_))));
    assert_eq!(output, "");
}

#[test]
fn runtime_errors_surface() {
    let (result, output) = run("jugador principal():\n    golazo.imprimir(\"antes\")\n    remate 1 intercepcion 0\n", "");

    assert_eq!(output, "antes\n");
    assert_eq!(result.unwrap_err().to_string(), "[line 3 column 14] Division by zero");
}
