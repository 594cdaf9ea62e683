use std::process::Termination;

use ariadne::{Label, Report, ReportKind, Source};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::compile::parser::SyntaxError;

pub struct ExitCode(u8);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAIL_PARSING: ExitCode = ExitCode(1);
    pub const FAIL_IO: ExitCode = ExitCode(2);

    pub fn code(&self) -> u8 {
        self.0
    }
}

impl Termination for ExitCode {
    fn report(self) -> std::process::ExitCode {
        std::process::ExitCode::from(self.0)
    }
}

impl From<RsemError> for ExitCode {
    fn from(value: RsemError) -> Self {
        match value {
            RsemError::LexerError(_) => ExitCode::FAIL_PARSING,
            RsemError::ParsingError(_) => ExitCode::FAIL_PARSING,
            RsemError::IOError(_) => ExitCode::FAIL_IO,
            RsemError::FmtError(_) => ExitCode::FAIL_IO,
        }
    }
}

#[derive(Error, Debug)]
pub enum RsemError {
    #[error("Lexical Analysis failed.")]
    LexerError(Vec<SyntaxError>),

    #[error("Syntactic Analysis failed.")]
    ParsingError(Vec<SyntaxError>),

    #[error("There was an I/O error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("There was an Formatting error: {0}")]
    FmtError(#[from] std::fmt::Error),
}

/// Installs the stderr subscriber. `RSEM_LOG` takes precedence over the
/// verbose switch.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("RSEM_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("rsem=trace")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(verbose, "tracing initialized");
}

/// Renders front-end errors against the source they were produced for.
pub fn report_syntax_errors(
    message: &str,
    name: &str,
    src: &str,
    errors: &[SyntaxError],
) -> std::io::Result<()> {
    for err in errors {
        Report::build(ReportKind::Error, (name, err.span.clone()))
            .with_message(message)
            .with_label(Label::new((name, err.span.clone())).with_message(&err.message))
            .finish()
            .eprint((name, Source::from(src)))?;
    }

    Ok(())
}
