use crate::ast::{Expr, Stmt};
use crate::lexer::{Literal, Token, TokenKind};
use atel_source::{ErrorReporter, SyntaxError};
use thiserror::Error;
use tracing::{debug, trace};

mod expr;
mod stmt;

/// Maximum nesting of statements and expressions before the parser gives up with [`ParseError::TooDeep`].
///
/// Declarations, statements, assignments and unary operators each count as one level. An expression
/// statement starts four levels deep and every parenthesis adds two, so it holds at most 62 nested
/// parentheses. Every block adds two levels.
pub const MAX_NESTING_DEPTH: usize = 128;

/// A grammar rule could not be completed. Caught at the nearest declaration, which reports it and
/// synchronizes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{message} Found {found}.")]
    Expected {
        message: &'static str,
        found: String,
        line: usize,
    },
    #[error("Expected expression. Found {found}.")]
    ExpectedExpression { found: String, line: usize },
    #[error("Nesting exceeds {} levels.", MAX_NESTING_DEPTH)]
    TooDeep { line: usize },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::Expected { line, .. }
            | ParseError::ExpectedExpression { line, .. }
            | ParseError::TooDeep { line } => *line,
        }
    }
}

impl From<ParseError> for SyntaxError {
    fn from(error: ParseError) -> Self {
        SyntaxError::new(&error, error.line())
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser {
    /// Always ends with a [`TokenKind::Eof`] token.
    tokens: Vec<Token>,
    /// Index of the next unconsumed token. Never moves past the `Eof` token.
    current: usize,
    /// Current nesting depth, see [`MAX_NESTING_DEPTH`].
    depth: usize,
    errors: ErrorReporter,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map_or(1, |token| token.line);
            tokens.push(Token::eof(line));
        }
        Self {
            tokens,
            current: 0,
            depth: 0,
            errors: ErrorReporter::new(),
        }
    }
}

impl Parser {
    /// Parses every declaration up to the end of input.
    /// Declarations that fail to parse are reported and left out of the result.
    pub fn parse_program(mut self) -> (Vec<Stmt>, Vec<SyntaxError>) {
        let mut statements = Vec::new();
        while !self.at_end() {
            if let Some(stmt) = self.parse_declaration() {
                statements.push(stmt);
            }
        }

        let errors = self.errors.into_errors();
        debug!(
            statements = statements.len(),
            errors = errors.len(),
            "parse complete"
        );
        (statements, errors)
    }

    /// Errors reported so far. Only [`Self::parse_expr`] callers need this; [`Self::parse_program`]
    /// returns them.
    pub fn errors(&self) -> &ErrorReporter {
        &self.errors
    }
}

/// Parse utilities
impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consumes and returns the current token. At the end of input, returns `Eof` without consuming it.
    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.at_end() {
            self.current += 1;
        }
        token
    }

    /// Predicate that tests whether the current token is of `kind` and eats it if yes as a side effect.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Eats and returns the current token if it is any of `kinds`.
    fn eat_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        if kinds.contains(&self.peek().kind) {
            Some(self.next())
        } else {
            None
        }
    }

    /// Eats a token of `kind` or fails with `message`.
    fn expect(&mut self, kind: TokenKind, message: &'static str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.next())
        } else {
            Err(ParseError::Expected {
                message,
                found: self.found(),
                line: self.peek().line,
            })
        }
    }

    /// Describes the current token for error messages.
    fn found(&self) -> String {
        let token = self.peek();
        match token.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("`{}`", token.lexeme),
        }
    }

    /// Runs `parse` one nesting level deeper.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::TooDeep {
                line: self.peek().line,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Reports a diagnostic that does not abort the current rule.
    fn report(&mut self, error: SyntaxError) {
        self.errors.add_error(error);
    }

    /// Discards tokens until the previous one was a `;` or the current one starts a statement.
    /// Always discards at least one token unless at the end of input.
    fn synchronize(&mut self) {
        let mut previous = self.next().kind;
        let mut skipped = 1;

        while !self.at_end() {
            if previous == TokenKind::Semicolon || self.peek().kind.starts_statement() {
                break;
            }
            previous = self.next().kind;
            skipped += 1;
        }

        trace!(skipped, line = self.peek().line, "synchronized");
    }
}

/// Parses a scanned token sequence into top-level statements and the diagnostics reported on the way.
pub fn parse(tokens: Vec<Token>) -> (Vec<Stmt>, Vec<SyntaxError>) {
    Parser::new(tokens).parse_program()
}

/// `true` literal used by `for` loops without a condition.
fn literal_true() -> Expr {
    Expr::Literal(Literal::Bool(true))
}
