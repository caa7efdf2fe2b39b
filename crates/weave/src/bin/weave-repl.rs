use std::{
    io::{self, Write},
    process::ExitCode,
};

use weave::{Engine, NoopTracer};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let universe_path = match args.get(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: weave-repl <universe.json> [actions.jsonl]");
            return ExitCode::FAILURE;
        }
    };
    let universe_json = match std::fs::read_to_string(universe_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error reading {universe_path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut engine = match Engine::ingest(&universe_json, 0) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("error:\n{err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(script_path) = args.get(2) {
        let source = match std::fs::read_to_string(script_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error reading {script_path}: {e}");
                return ExitCode::FAILURE;
            }
        };
        for line in source.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Err(err) = execute_line(&mut engine, line) {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    loop {
        let Some(line) = read_line(">>> ") else {
            println!();
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        if let Err(err) = execute_line(&mut engine, &line) {
            eprintln!("{err}");
        }
    }

    ExitCode::SUCCESS
}

/// Parses one line as a JSON action term, dispatches it, and prints the
/// resulting `Program` section.
fn execute_line(engine: &mut Engine, line: &str) -> Result<(), String> {
    let action = engine
        .parse_action(line)
        .ok_or_else(|| format!("{line} is not a valid action term"))?;
    let mut tracer = NoopTracer;
    engine
        .dispatch(&action, &mut tracer)
        .map_err(|err| err.to_string())?;
    for term in engine.program() {
        println!("{term:?}");
    }
    Ok(())
}

/// Reads one line from stdin after printing a prompt. Returns `None` on EOF.
fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    if io::stdout().flush().is_err() {
        return None;
    }
    let mut input = String::new();
    let read = io::stdin().read_line(&mut input).ok()?;
    if read == 0 {
        return None;
    }
    Some(input.trim_end_matches(['\r', '\n']).to_owned())
}
