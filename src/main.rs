mod cli;

use std::process::ExitCode;

use clap::Parser;
use regram::{Diagnostic, Linearity};

use cli::Cli;

// Only log when RUST_LOG asks for it
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let grammar = match regram::parse_file(&cli.file, cli.parser_config(), |d: &Diagnostic| eprintln!("{}", d)) {
        Ok(grammar) => grammar,
        Err(error) => {
            eprintln!("{}", error);
            return ExitCode::FAILURE;
        }
    };

    if !cli.quiet {
        print!("{}", grammar);
    }

    match grammar.verify() {
        Ok(()) => println!("valid: yes"),
        Err(errors) => {
            println!("valid: no");
            errors.iter().for_each(|error| println!("  {}", error));
        }
    }

    let linearity = match grammar.linearity() {
        Linearity::Left => "yes (left-linear)",
        Linearity::Right => "yes (right-linear)",
        Linearity::Both => "yes (left- and right-linear)",
        Linearity::Neither => "no",
    };
    println!("regular: {}", linearity);
    println!("context free: {}", if grammar.is_context_free() { "yes" } else { "no" });

    ExitCode::SUCCESS
}
