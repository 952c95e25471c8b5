mod cli;
mod config;

use std::{
    fs,
    io::{self, BufRead, Write},
    path::Path,
    process::ExitCode,
};

use clap::Parser;
use nlox::{lexer, parser, printer, Diagnostics, Error, Lox};
use tracing::debug;

use crate::config::{AppConfig, Mode};

const EX_DATAERR: u8 = 65;
const EX_SOFTWARE: u8 = 70;
const EX_IOERR: u8 = 74;

/// Only the binary installs a subscriber; the library just emits events.
/// `RUST_LOG` wins over the filter picked from the command line.
fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn dump(config: &AppConfig, source: &str) {
    if config.dump_tokens {
        for token in lexer::scan(source).tokens {
            println!("{}", token);
        }
    }

    if config.dump_ast {
        let lexed = lexer::scan(source);
        for stmt in parser::parse(&lexed.tokens).stmts {
            println!("{}", printer::print_stmt(&stmt));
        }
    }
}

fn report(diagnostics: &Diagnostics) {
    for error in diagnostics.iter() {
        eprintln!("{}", error);
    }
}

fn run_file(config: &AppConfig, path: &Path) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            let err = Error::Io {
                path: path.display().to_string(),
                source: err,
            };
            eprintln!("{}", err);
            return ExitCode::from(EX_IOERR);
        }
    };

    dump(config, &source);

    let stdout = io::stdout();
    let mut lox = Lox::new(stdout.lock());
    let diagnostics = lox.run(&source);
    report(&diagnostics);

    if diagnostics.had_error() {
        ExitCode::from(EX_DATAERR)
    } else if diagnostics.had_runtime_error() {
        ExitCode::from(EX_SOFTWARE)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_prompt(config: &AppConfig) -> ExitCode {
    let mut lox = Lox::new(io::stdout());
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            return ExitCode::from(EX_IOERR);
        }

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                eprintln!("could not read input: {}", err);
                return ExitCode::from(EX_IOERR);
            }
        }

        dump(config, &line);
        // errors only affect the line they came from
        report(&lox.run(&line));
    }

    debug!("prompt closed");
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let args = cli::Args::parse();
    let config = AppConfig::from_args(&args);
    init_tracing(&config.log_filter);

    match &config.mode {
        Mode::Script(path) => run_file(&config, path),
        Mode::Prompt => run_prompt(&config),
    }
}
