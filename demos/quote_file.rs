//! Quote an Elixir file and print the term with line and column metadata.
//!
//! ```text
//! cargo run --example quote_file -- lib/my_app.ex
//! ```

use std::process::ExitCode;

use elixir_syntax::{Metadata, Options, QuoteOptions, analyze};

fn main() -> ExitCode {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: quote_file <path>");
        return ExitCode::from(2);
    };
    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    let options = Options {
        quote: QuoteOptions {
            metadata: Metadata::LineColumn,
        },
        cancellation: None,
    };
    match analyze(&source, &options) {
        Ok(analysis) => {
            println!("{}", analysis.term);
            for error in &analysis.errors {
                eprintln!("{path}: {error}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{path}: {e}");
            ExitCode::FAILURE
        }
    }
}
