use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "nlox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tree-walking interpreter for the Lox language", long_about = None)]
pub struct Args {
    /// Script to run. Starts an interactive prompt when omitted.
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Print every scanned token before running.
    #[arg(long = "tokens")]
    pub tokens: bool,

    /// Print the parsed syntax tree before running.
    #[arg(long = "ast")]
    pub ast: bool,

    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
