//! CLI tool to dump and validate template token streams.

use std::fs;
use std::process::ExitCode;

use tmplscan::{Delimiters, Position, ScanOptions, scan_with};

fn usage() -> ExitCode {
    eprintln!("Usage: tmplscan <command> [options] [files...]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  tokens    Print the token stream of each file");
    eprintln!("  check     Check that each file scans cleanly");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --left <DELIM>   Left action delimiter (default {{{{)");
    eprintln!("  --right <DELIM>  Right action delimiter (default }}}})");
    eprintln!("  --no-trim        Keep whitespace around trim markers");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  tmplscan tokens page.tmpl");
    eprintln!("  tmplscan check --left '<%' --right '%>' *.tmpl");
    ExitCode::from(2)
}

/// Install a tracing subscriber when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        return usage();
    }

    let command = args[1].as_str();
    if !matches!(command, "tokens" | "check") {
        eprintln!("Unknown command: {command}");
        return usage();
    }

    let mut left = String::new();
    let mut right = String::new();
    let mut trim = true;
    let mut files = Vec::new();

    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--left" | "--right" => {
                let Some(value) = rest.next() else {
                    eprintln!("Error: {arg} needs a value");
                    return ExitCode::from(2);
                };
                if arg == "--left" {
                    left.clone_from(value);
                } else {
                    right.clone_from(value);
                }
            }
            "--no-trim" => trim = false,
            _ => files.push(arg.as_str()),
        }
    }

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let options = ScanOptions::new(Delimiters::new(left, right)).with_trim(trim);
    let mut had_error = false;

    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        match scan_with(&content, &options) {
            Ok(tokens) if command == "tokens" => {
                for token in &tokens {
                    let pos = Position::locate(&content, token.start);
                    println!("{}:{} {} {token}", pos.line, pos.column, token.kind);
                }
            }
            Ok(tokens) => {
                eprintln!("{path}: valid ({} token(s))", tokens.len());
            }
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
