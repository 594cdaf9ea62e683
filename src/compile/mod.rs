use std::{
    fmt::Write,
    fs,
    io::{self, Read},
    path::PathBuf,
};

use chumsky::{Parser, input::Input};
use parser::{
    SyntaxError, elaboration,
    feed::TokenFeed,
    lex::{Token, lexer},
    parse::program_parser,
};

use crate::{
    compile::{
        ast::{NodeArena, NodeId, parsed::Program},
        export::{ast_dump, pretty, symbol_table},
        semantic::Analysis,
    },
    infra::{self, RsemError},
};

pub mod ast;
pub mod export;
pub mod parser;
pub mod semantic;

const STDIN_NAME: &str = "<stdin>";

#[derive(Debug, Clone, Default)]
pub struct Compiler {
    src_path: Option<PathBuf>,
    source: Option<String>,
    verbose: bool,
}

impl Compiler {
    pub fn new() -> Compiler {
        Compiler::default()
    }

    pub fn src(&mut self, src: PathBuf) -> &mut Self {
        self.src_path = Some(src);

        self
    }

    /// Uses `text` as the program instead of reading a file or stdin.
    pub fn source(&mut self, text: impl Into<String>) -> &mut Self {
        self.source = Some(text.into());

        self
    }

    pub fn verbose(&mut self, verbose: bool) -> &mut Self {
        self.verbose = verbose;

        self
    }

    /// Runs the front end and the semantic analysis. Semantic errors end up
    /// in the returned analysis; only front-end and I/O failures are `Err`.
    pub fn compile(&mut self) -> Result<Compilation, RsemError> {
        let (name, src) = self.load()?;

        let program = match Self::parse(&src) {
            Ok(program) => program,
            Err(err) => {
                if let RsemError::LexerError(ref errors) | RsemError::ParsingError(ref errors) = err {
                    infra::report_syntax_errors(&err.to_string(), &name, &src, errors)?;
                }

                return Err(err);
            }
        };

        let mut arena = NodeArena::new();
        let root = elaboration::elab(program, &mut arena);
        tracing::debug!(nodes = arena.len(), "parse complete");

        let analysis = semantic::analyze(&arena, root);

        Ok(Compilation {
            verbose: self.verbose,
            arena,
            root,
            analysis,
        })
    }

    fn load(&self) -> Result<(String, String), RsemError> {
        if let Some(ref source) = self.source {
            return Ok((String::from("<source>"), source.clone()));
        }

        match self.src_path {
            Some(ref path) => {
                let src = fs::read_to_string(path)?;
                Ok((path.display().to_string(), src))
            }
            None => {
                let mut src = String::new();
                io::stdin().read_to_string(&mut src)?;
                Ok((String::from(STDIN_NAME), src))
            }
        }
    }

    fn parse(src: &str) -> Result<Program, RsemError> {
        let tokens = lexer().parse(src).into_result().map_err(|errs| {
            RsemError::LexerError(errs.iter().map(SyntaxError::from_rich).collect())
        })?;

        let tokens: Vec<(Token<'_>, _)> = TokenFeed::new(tokens).collect();
        let token_stream = tokens.map(src.len()..src.len(), |(t, s)| (t, s));

        program_parser()
            .parse(token_stream)
            .into_result()
            .map_err(|errs| {
                RsemError::ParsingError(errs.iter().map(SyntaxError::from_rich).collect())
            })
    }
}

/// Everything one run produced. The arena owns the tree the analysis was
/// run on.
#[derive(Debug)]
pub struct Compilation {
    verbose: bool,
    pub arena: NodeArena,
    pub root: NodeId,
    pub analysis: Analysis,
}

impl Compilation {
    pub fn error_count(&self) -> usize {
        self.analysis.diagnostics.len()
    }

    /// The report printed on stdout: the tree (verbose only), the symbol
    /// table, the error count and messages, and the pretty-printed program
    /// when there were no errors.
    pub fn render(&self) -> Result<String, RsemError> {
        let mut out = String::new();

        if self.verbose {
            out.push_str(&ast_dump::export(&self.arena, self.root)?);
        }

        out.push_str(&symbol_table::export(&self.analysis.table)?);

        writeln!(out, "No. of semantic errors : {}", self.error_count())?;
        for message in self.analysis.diagnostics.messages() {
            writeln!(out, "{message}")?;
        }

        if self.error_count() == 0 {
            out.push_str(&pretty::export(&self.arena, self.root)?);
        }

        Ok(out)
    }

    pub fn teardown(&mut self) {
        self.arena.teardown();
    }
}
