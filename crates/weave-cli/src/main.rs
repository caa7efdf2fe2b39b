use std::{env, fs, process::ExitCode, time::Instant};

use weave::{Engine, NoopTracer};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let file_path = match args.get(1) {
        Some(path) => path.as_str(),
        None => {
            eprintln!("usage: weave <universe.json> [action]");
            return ExitCode::FAILURE;
        }
    };

    let json = match read_file(file_path) {
        Ok(json) => json,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let mut engine = match Engine::ingest(&json, 0) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("error:\n{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut tracer = NoopTracer;
    let result = match args.get(2) {
        Some(action_json) => match engine.parse_action(action_json) {
            Some(action) => engine.dispatch(&action, &mut tracer),
            None => {
                eprintln!("error: {action_json} is not a valid action term");
                return ExitCode::FAILURE;
            }
        },
        None => engine.normalize_program(&mut tracer),
    };

    let elapsed = start.elapsed();
    match result {
        Ok(()) => {
            eprintln!("success after: {elapsed:?}");
            for term in engine.program() {
                println!("{term:?}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error after: {elapsed:?}\n{err}");
            ExitCode::FAILURE
        }
    }
}

fn read_file(file_path: &str) -> Result<String, String> {
    eprintln!("reading file: {file_path}");
    match fs::metadata(file_path) {
        Ok(metadata) => {
            if !metadata.is_file() {
                return Err(format!("{file_path} is not a file"));
            }
        }
        Err(err) => return Err(format!("reading {file_path}: {err}")),
    }
    fs::read_to_string(file_path).map_err(|err| format!("reading file: {err}"))
}
