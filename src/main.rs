use std::path::PathBuf;

use clap::Parser;

use rsem::compile::Compiler;
use rsem::infra::{self, ExitCode};

#[derive(Parser, Debug)]
#[command(about = "Semantic analysis for a small Rust-like language")]
struct Args {
    /// Source file; read from stdin when omitted.
    src: Option<PathBuf>,

    /// Dump the syntax tree and trace node allocation.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    infra::init_tracing(args.verbose);

    let mut compiler = Compiler::new();
    compiler.verbose(args.verbose);
    if let Some(src) = args.src {
        compiler.src(src);
    }

    let mut compilation = match compiler.compile() {
        Ok(compilation) => compilation,
        Err(err) => {
            tracing::error!(%err, "compilation failed");
            return err.into();
        }
    };

    let report = match compilation.render() {
        Ok(report) => report,
        Err(err) => return err.into(),
    };
    print!("{report}");

    compilation.teardown();

    ExitCode::SUCCESS
}
