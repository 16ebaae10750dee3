//! Loads a file given on the command line, prints any parse diagnostics to
//! stderr, and dumps the document back to stdout in canonical form.

use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: read_file FILENAME");
        return ExitCode::FAILURE;
    };

    let contents = match std::fs::read(&path) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Unable to read {path}: {error}");
            return ExitCode::FAILURE;
        }
    };

    let doc = sprig::parse_with(&contents, |error| {
        let severity = if error.kind.is_warning() {
            "warning"
        } else {
            "error"
        };
        eprintln!("{severity}: {error}");
    });

    let mut stdout = io::stdout().lock();
    if let Err(error) = sprig::to_writer(&mut stdout, &doc) {
        eprintln!("Unable to write output: {error}");
        return ExitCode::FAILURE;
    }
    let _ = stdout.flush();

    ExitCode::SUCCESS
}
