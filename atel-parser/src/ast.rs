//! Syntax tree produced by the [`Parser`](crate::parser::Parser).
//!
//! Every node owns its children. Nodes keep the [`Token`]s they were built from so later passes can
//! point diagnostics at a source line.
//!
//! Both [`Expr`] and [`Stmt`] render as single-line s-expressions through [`Display`](fmt::Display):
//! ```
//! use atel_parser::{parse, scan};
//! let (ast, errors) = parse(scan("var x = 1 + 2 * y;").unwrap());
//! assert!(errors.is_empty());
//! assert_eq!(ast[0].to_string(), "(var x (+ 1 (* 2 y)))");
//! ```

use std::fmt;

use crate::lexer::{Literal, Token};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A binary expression (e.g. `1 + 1`).
    Binary {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    /// A short-circuiting `and` / `or` expression.
    Logical {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    /// A prefix `!` or `-` expression.
    Unary { op: Token, rhs: Box<Expr> },
    /// A parenthesized expression (e.g. `(a)`).
    Grouping(Box<Expr>),
    Literal(Literal),
    /// An identifier (e.g. `foo`).
    Variable(Token),
    /// An assignment to a variable (e.g. `x = 1`).
    Assign { name: Token, value: Box<Expr> },
    /// A call expression (e.g. `f(1, 2)`). `paren` is the closing parenthesis.
    Call {
        callee: Box<Expr>,
        paren: Token,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// An expression followed by `;`.
    ExprStmt(Expr),
    FnDeclaration {
        name: Token,
        params: Vec<Token>,
        body: Vec<Stmt>,
    },
    VarDeclaration {
        name: Token,
        initializer: Option<Expr>,
    },
    Block(Vec<Stmt>),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    /// `while` loop. `for` loops are desugared into this.
    While { cond: Expr, body: Box<Stmt> },
    Return {
        /// The `return` keyword.
        keyword: Token,
        value: Option<Expr>,
    },
}

/// Writes `items` separated by single spaces, each preceded by a space.
fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for item in items {
        write!(f, " {}", item)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary { lhs, op, rhs } | Expr::Logical { lhs, op, rhs } => {
                write!(f, "({} {} {})", op.lexeme, lhs, rhs)
            }
            Expr::Unary { op, rhs } => write!(f, "({} {})", op.lexeme, rhs),
            Expr::Grouping(inner) => write!(f, "(group {})", inner),
            Expr::Literal(val) => write!(f, "{}", val),
            Expr::Variable(name) => write!(f, "{}", name.lexeme),
            Expr::Assign { name, value } => write!(f, "(assign {} {})", name.lexeme, value),
            Expr::Call { callee, args, .. } => {
                write!(f, "(call {}", callee)?;
                write_list(f, args)?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::ExprStmt(expr) => write!(f, "(expr {})", expr),
            Stmt::FnDeclaration { name, params, body } => {
                let params: Vec<&str> = params.iter().map(|param| param.lexeme.as_str()).collect();
                write!(f, "(fun {} ({})", name.lexeme, params.join(" "))?;
                write_list(f, body)?;
                write!(f, ")")
            }
            Stmt::VarDeclaration {
                name,
                initializer: Some(initializer),
            } => write!(f, "(var {} {})", name.lexeme, initializer),
            Stmt::VarDeclaration {
                name,
                initializer: None,
            } => write!(f, "(var {})", name.lexeme),
            Stmt::Block(body) => {
                write!(f, "(block")?;
                write_list(f, body)?;
                write!(f, ")")
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                write!(f, "(if {} {}", cond, then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(f, " {}", else_branch)?;
                }
                write!(f, ")")
            }
            Stmt::While { cond, body } => write!(f, "(while {} {})", cond, body),
            Stmt::Return {
                value: Some(value), ..
            } => write!(f, "(return {})", value),
            Stmt::Return { value: None, .. } => write!(f, "(return)"),
        }
    }
}
