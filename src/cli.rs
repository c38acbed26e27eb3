use std::path::PathBuf;

use clap::Parser;

use regram::error_handling::DEFAULT_MAX_ERRORS;
use regram::ParserConfig;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the grammar
    pub file: PathBuf,

    /// Errors tolerated before giving up on the file
    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_MAX_ERRORS)]
    pub max_errors: usize,

    /// Only print the verdicts, not the grammar itself
    #[arg(short, long)]
    pub quiet: bool
}

impl Cli {
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig { max_errors: self.max_errors }
    }
}
