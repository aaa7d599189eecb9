//! Lexical scanner: turns source text into a [`Token`] sequence terminated by [`TokenKind::Eof`].

use std::fmt;

use atel_source::Source;
use logos::{Lexer, Logos, Skip};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Logos, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // punctuation
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,

    // arithmetic operators
    #[token("-")]
    Minus, // NOTE: can also be unary
    #[token("+")]
    Plus,
    #[token("/")]
    Slash,
    #[token("*")]
    Star,
    #[token("%")]
    Percent,

    // unary operators
    #[token("!")]
    Not,

    // comparison operators
    #[token("!=")]
    NotEqual,
    /// Both assignment and equality, depending on which grammar rule reaches it.
    #[token("=")]
    Equal,
    #[token("==")]
    EqualEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,

    // literals
    /// Identifiers may contain fullwidth brackets, used by the language for name decoration.
    #[regex(r"\p{L}[\p{L}\p{Nd}_（）]*")]
    Identifier,
    #[regex("[0-9]+", fraction)]
    Integer,
    /// Never produced by logos directly: [`scan`] reclassifies `Integer` matches with a fraction.
    Float,

    // keywords
    #[token("and")]
    And,
    #[token("else")]
    Else,
    #[token("fun")]
    Fun,
    #[token("for")]
    For,
    #[token("if")]
    If,
    #[token("or")]
    Or,
    #[token("return")]
    Return,
    #[token("var")]
    Var,
    #[token("while")]
    While,

    // misc
    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)] // single line comments
    #[token("/*", block_comment)]
    #[error]
    Error,

    /// Only generated by [`scan`] once the lexer is exhausted.
    Eof,
}

/// Extends an integer match over a `.digits` fraction. A dot without a digit after it is left alone.
fn fraction(lex: &mut Lexer<TokenKind>) {
    if let Some(rest) = lex.remainder().strip_prefix('.') {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 {
            lex.bump(digits + 1);
        }
    }
}

/// Skips to the first `*/`. Block comments do not nest; an unterminated one swallows the rest of the input.
fn block_comment(lex: &mut Lexer<TokenKind>) -> Skip {
    let remainder = lex.remainder();
    let len = remainder.find("*/").map_or(remainder.len(), |end| end + 2);
    lex.bump(len);
    Skip
}

impl TokenKind {
    /// Returns `true` for keywords that start a statement or declaration.
    /// The parser resynchronizes on these after an error.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::If
                | TokenKind::Return
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Var
                | TokenKind::Fun
        )
    }
}

/// A decoded literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Nil,
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Nil => write!(f, "nil"),
            Literal::Bool(val) => write!(f, "{}", val),
            Literal::Int(val) => write!(f, "{}", val),
            Literal::Float(val) => write!(f, "{:?}", val),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source text of the token. Empty for [`TokenKind::Eof`].
    pub lexeme: String,
    /// Only ever [`Literal::Int`] or [`Literal::Float`], and only for `Integer` and `Float` tokens.
    pub literal: Option<Literal>,
    /// 1-based line of the token's first character.
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            literal: None,
            line,
        }
    }

    pub fn with_literal(kind: TokenKind, lexeme: impl Into<String>, literal: Literal, line: usize) -> Self {
        Self {
            literal: Some(literal),
            ..Self::new(kind, lexeme, line)
        }
    }

    pub fn eof(line: usize) -> Self {
        Self::new(TokenKind::Eof, "", line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.kind, self.lexeme)?;
        if let Some(literal) = &self.literal {
            write!(f, " {}", literal)?;
        }
        write!(f, " @{}", self.line)
    }
}

/// A fatal scanning error. Scanning stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unknown character {character:?} at line {line}")]
    UnknownCharacter { character: char, line: usize },
    #[error("Number literal `{lexeme}` does not fit in 32 bits at line {line}")]
    NumberOutOfRange { lexeme: String, line: usize },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::UnknownCharacter { line, .. } | LexError::NumberOutOfRange { line, .. } => *line,
        }
    }
}

/// Decodes a number lexeme. Lexemes with a fraction become `Float` tokens.
fn number(lexeme: &str, line: usize) -> Result<Token, LexError> {
    let out_of_range = || LexError::NumberOutOfRange {
        lexeme: lexeme.to_string(),
        line,
    };

    if lexeme.contains('.') {
        let val = lexeme.parse().map_err(|_| out_of_range())?;
        Ok(Token::with_literal(TokenKind::Float, lexeme, Literal::Float(val), line))
    } else {
        let val = lexeme.parse().map_err(|_| out_of_range())?;
        Ok(Token::with_literal(TokenKind::Integer, lexeme, Literal::Int(val), line))
    }
}

/// Scans `source` into tokens. The last token is always [`TokenKind::Eof`] and no other token has that kind.
pub fn scan(source: &str) -> Result<Vec<Token>, LexError> {
    let source = Source::new(source);
    let mut tokens = Vec::new();

    for (kind, span) in TokenKind::lexer(source.content).spanned() {
        let line = source.line_of(span.start);

        // An error span may end inside a multi-byte character, so only its start is trusted.
        if kind == TokenKind::Error {
            let character = source.content[span.start..]
                .chars()
                .next()
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            return Err(LexError::UnknownCharacter { character, line });
        }

        let lexeme = &source.content[span];
        let token = match kind {
            TokenKind::Integer => number(lexeme, line)?,
            kind => Token::new(kind, lexeme, line),
        };
        tokens.push(token);
    }

    tokens.push(Token::eof(source.line_of(source.content.len())));
    debug!(tokens = tokens.len(), lines = source.line_count(), "scan complete");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source).unwrap().into_iter().map(|token| token.kind).collect()
    }

    fn dump(source: &str) -> String {
        scan(source)
            .unwrap()
            .iter()
            .map(|token| token.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_empty() {
        assert_snapshot!(dump(""), @r###"Eof "" @1"###);
        assert_snapshot!(dump("  \n\t\r\n"), @r###"Eof "" @3"###);
    }

    #[test]
    fn test_numbers() {
        assert_snapshot!(dump("3"), @r###"
        Integer "3" 3 @1
        Eof "" @1
        "###);
        assert_snapshot!(dump("3."), @r###"
        Integer "3" 3 @1
        Dot "." @1
        Eof "" @1
        "###);
        assert_snapshot!(dump("3.5"), @r###"
        Float "3.5" 3.5 @1
        Eof "" @1
        "###);
        assert_snapshot!(dump("10.25.5"), @r###"
        Float "10.25" 10.25 @1
        Dot "." @1
        Integer "5" 5 @1
        Eof "" @1
        "###);
        assert_eq!(kinds("1.x"), vec![TokenKind::Integer, TokenKind::Dot, TokenKind::Identifier, TokenKind::Eof]);
        assert_eq!(kinds(".5"), vec![TokenKind::Dot, TokenKind::Integer, TokenKind::Eof]);
    }

    #[test]
    fn test_integer_range() {
        let tokens = scan("2147483647").unwrap();
        assert_eq!(tokens[0].literal, Some(Literal::Int(i32::MAX)));
        assert_eq!(
            scan("\n2147483648"),
            Err(LexError::NumberOutOfRange {
                lexeme: "2147483648".to_string(),
                line: 2
            })
        );
    }

    #[test]
    fn test_composite_operators() {
        assert_eq!(kinds("!="), vec![TokenKind::NotEqual, TokenKind::Eof]);
        assert_eq!(kinds("! ="), vec![TokenKind::Not, TokenKind::Equal, TokenKind::Eof]);
        assert_eq!(
            kinds("= == <= >= < > !"),
            vec![
                TokenKind::Equal,
                TokenKind::EqualEqual,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::Not,
                TokenKind::Eof,
            ]
        );
        // maximal munch: `===` is `==` then `=`
        assert_eq!(kinds("==="), vec![TokenKind::EqualEqual, TokenKind::Equal, TokenKind::Eof]);
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("(){},.-+;/ * %"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Minus,
                TokenKind::Plus,
                TokenKind::Semicolon,
                TokenKind::Slash,
                TokenKind::Star,
                TokenKind::Percent,
                TokenKind::Eof,
            ]
        );
        // without the spaces, `/*` opens a block comment
        assert_eq!(kinds("(;/*%"), vec![TokenKind::LeftParen, TokenKind::Semicolon, TokenKind::Eof]);
        assert_eq!(kinds("*/%"), vec![TokenKind::Star, TokenKind::Slash, TokenKind::Percent, TokenKind::Eof]);
    }

    #[test]
    fn test_comments() {
        assert_snapshot!(dump("// x\n1"), @r###"
        Integer "1" 1 @2
        Eof "" @2
        "###);
        assert_snapshot!(dump("a /* b\n c */ d"), @r###"
        Identifier "a" @1
        Identifier "d" @2
        Eof "" @2
        "###);
        // no nesting: the first `*/` ends the comment
        assert_eq!(kinds("/* /* */ x */"), vec![TokenKind::Identifier, TokenKind::Star, TokenKind::Slash, TokenKind::Eof]);
        // unterminated block comments run to the end of input
        assert_eq!(kinds("x /* y\nz"), vec![TokenKind::Identifier, TokenKind::Eof]);
        assert_eq!(kinds("a / b"), vec![TokenKind::Identifier, TokenKind::Slash, TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("if else while return var for fun and or"),
            vec![
                TokenKind::If,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::Return,
                TokenKind::Var,
                TokenKind::For,
                TokenKind::Fun,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("iff fun_ order var2 If"),
            vec![TokenKind::Identifier; 5].into_iter().chain(Some(TokenKind::Eof)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_unicode_identifiers() {
        assert_snapshot!(dump("ティーダ（仮） = x_1;"), @r###"
        Identifier "ティーダ（仮）" @1
        Equal "=" @1
        Identifier "x_1" @1
        Semicolon ";" @1
        Eof "" @1
        "###);
    }

    #[test]
    fn test_unknown_character() {
        assert_eq!(
            scan("var x = 1;\nx = @;"),
            Err(LexError::UnknownCharacter { character: '@', line: 2 })
        );
        // identifiers must start with a letter
        assert_eq!(
            scan("_x"),
            Err(LexError::UnknownCharacter { character: '_', line: 1 })
        );
        assert_eq!(
            scan("（x）"),
            Err(LexError::UnknownCharacter { character: '（', line: 1 })
        );
        let error = scan("\n\n\"str\"").unwrap_err();
        assert_eq!(error.line(), 3);
        assert_snapshot!(error.to_string(), @r###"Unknown character '"' at line 3"###);
    }

    #[test]
    fn test_lines() {
        let tokens = scan("var a = 1;\n\nfun f() {\r\n  return a;\n}").unwrap();
        let lines: Vec<usize> = tokens.iter().map(|token| token.line).collect();
        assert_eq!(lines, vec![1, 1, 1, 1, 1, 3, 3, 3, 3, 3, 4, 4, 4, 5, 5]);
    }

    #[test]
    fn test_single_eof() {
        let tokens = scan("fun main() { return 1; }").unwrap();
        assert_eq!(tokens.last().map(|token| token.kind), Some(TokenKind::Eof));
        assert_eq!(tokens.iter().filter(|token| token.kind == TokenKind::Eof).count(), 1);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn fragment_strategy() -> impl Strategy<Value = String> {
            prop_oneof![
                "[a-z][a-z0-9_]{0,6}",
                "[0-9]{1,5}",
                "[0-9]{1,4}\\.[0-9]{1,4}",
                Just("==".to_string()),
                Just("!=".to_string()),
                Just("<=".to_string()),
                Just(">=".to_string()),
                "[(){},.;+*%<>=!/-]",
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_lexemes_reproduce_input(fragments in prop::collection::vec(fragment_strategy(), 0..30)) {
                let source = fragments.join(" ");
                let tokens = scan(&source).unwrap();
                let rebuilt: String = tokens.iter().map(|token| token.lexeme.as_str()).collect();
                let expected: String = source.chars().filter(|c| !c.is_whitespace()).collect();
                prop_assert_eq!(rebuilt, expected);
            }
        }
    }
}
