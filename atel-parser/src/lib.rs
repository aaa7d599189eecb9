//! Scanner and recursive descent parser for the language.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod visitor;

pub use lexer::{scan, LexError, Token, TokenKind};
pub use parser::{parse, Parser};
