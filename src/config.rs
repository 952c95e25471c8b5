use std::path::PathBuf;

use crate::cli::Args;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Script(PathBuf),
    Prompt,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: Mode,
    pub dump_tokens: bool,
    pub dump_ast: bool,
    /// Fallback log filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let mode = match &args.script {
            Some(path) => Mode::Script(path.clone()),
            None => Mode::Prompt,
        };

        let log_filter = if args.verbose { "nlox=debug" } else { "warn" };

        AppConfig {
            mode,
            dump_tokens: args.tokens,
            dump_ast: args.ast,
            log_filter: log_filter.to_string(),
        }
    }
}
