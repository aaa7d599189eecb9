//! Front-end driver: scans and parses a whole program and renders the results.

use atel_parser::ast::Stmt;
use atel_parser::{parse, scan, LexError, Token};
use atel_source::{ErrorReporter, SyntaxError};
use tracing::info;

/// What [`render`] prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Emit {
    /// The scanned tokens, one per line.
    Tokens,
    /// The syntax tree, one top-level statement per line.
    Ast,
    /// Tokens, then the syntax tree.
    All,
}

/// The output of the front end for one source file.
#[derive(Debug)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub statements: Vec<Stmt>,
    pub diagnostics: Vec<SyntaxError>,
}

impl Compilation {
    /// Returns `true` if parsing reported no diagnostics.
    pub fn has_no_errors(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Collects the diagnostics into an [`ErrorReporter`] for printing.
    pub fn reporter(&self) -> ErrorReporter {
        let mut reporter = ErrorReporter::new();
        for diagnostic in &self.diagnostics {
            reporter.add_error(diagnostic.clone());
        }
        reporter
    }
}

/// Scans and parses `source`.
///
/// Scanning errors are fatal and returned as `Err`. Parse errors are recovered from and collected
/// in [`Compilation::diagnostics`].
pub fn compile(source: &str) -> Result<Compilation, LexError> {
    let tokens = scan(source)?;
    let (statements, diagnostics) = parse(tokens.clone());
    info!(
        tokens = tokens.len(),
        statements = statements.len(),
        diagnostics = diagnostics.len(),
        "compiled"
    );

    Ok(Compilation {
        tokens,
        statements,
        diagnostics,
    })
}

/// Renders the parts of `compilation` selected by `emit`, one item per line.
pub fn render(compilation: &Compilation, emit: Emit) -> String {
    fn lines<T: ToString>(items: &[T]) -> String {
        items
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    match emit {
        Emit::Tokens => lines(&compilation.tokens),
        Emit::Ast => lines(&compilation.statements),
        Emit::All => format!(
            "{}\n\n{}",
            lines(&compilation.tokens),
            lines(&compilation.statements)
        ),
    }
}
