//! Visitor pattern for AST nodes.

use crate::ast::{Expr, Stmt};

pub trait Visitor<'ast>: Sized {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }
}

pub fn walk_expr<'ast>(visitor: &mut impl Visitor<'ast>, expr: &'ast Expr) {
    match expr {
        Expr::Literal(_) => {}
        Expr::Variable(_) => {}
        Expr::Grouping(inner) => visitor.visit_expr(inner),
        Expr::Assign { name: _, value } => visitor.visit_expr(value),
        Expr::Call {
            callee,
            paren: _,
            args,
        } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Binary { lhs, op: _, rhs } | Expr::Logical { lhs, op: _, rhs } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        Expr::Unary { op: _, rhs } => visitor.visit_expr(rhs),
    }
}

pub fn walk_stmt<'ast>(visitor: &mut impl Visitor<'ast>, stmt: &'ast Stmt) {
    /// Iteratively visit all statements in a `Vec<Stmt>`.
    macro_rules! visit_stmt_list {
        ($visitor: expr, $body: expr) => {
            for stmt in $body {
                Visitor::visit_stmt($visitor, stmt);
            }
        };
    }

    match stmt {
        Stmt::VarDeclaration {
            name: _,
            initializer,
        } => {
            if let Some(initializer) = initializer {
                visitor.visit_expr(initializer);
            }
        }
        Stmt::FnDeclaration {
            name: _,
            params: _,
            body,
        } => visit_stmt_list!(visitor, body),
        Stmt::Block(body) => visit_stmt_list!(visitor, body),
        Stmt::ExprStmt(expr) => visitor.visit_expr(expr),
        Stmt::If {
            cond,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(cond);
            visitor.visit_stmt(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_stmt(else_branch);
            }
        }
        Stmt::While { cond, body } => {
            visitor.visit_expr(cond);
            visitor.visit_stmt(body);
        }
        Stmt::Return { keyword: _, value } => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, scan};

    /// Collects the names of every variable read, in visiting order.
    #[derive(Default)]
    struct VariableReads<'ast> {
        names: Vec<&'ast str>,
    }

    impl<'ast> Visitor<'ast> for VariableReads<'ast> {
        fn visit_expr(&mut self, expr: &'ast Expr) {
            if let Expr::Variable(name) = expr {
                self.names.push(&name.lexeme);
            }
            walk_expr(self, expr);
        }
    }

    /// Counts statements without descending into function bodies.
    #[derive(Default)]
    struct TopLevelStmts {
        count: usize,
    }

    impl<'ast> Visitor<'ast> for TopLevelStmts {
        fn visit_stmt(&mut self, stmt: &'ast Stmt) {
            self.count += 1;
            if !matches!(stmt, Stmt::FnDeclaration { .. }) {
                walk_stmt(self, stmt);
            }
        }
    }

    #[test]
    fn test_walks_every_expression() {
        let source = "var a = b; fun f(p) { return p + c; } if (!d) e(g, (h)); else i = j or k; while (l) return;";
        let (ast, errors) = parse(scan(source).unwrap());
        assert!(errors.is_empty());

        let mut visitor = VariableReads::default();
        for stmt in &ast {
            visitor.visit_stmt(stmt);
        }
        assert_eq!(
            visitor.names,
            vec!["b", "p", "c", "d", "e", "g", "h", "j", "k", "l"]
        );
    }

    #[test]
    fn test_overridden_stmt_visit() {
        let source = "fun f() { a; b; } { c; { d; } } for (;;) x;";
        let (ast, errors) = parse(scan(source).unwrap());
        assert!(errors.is_empty());

        let mut visitor = TopLevelStmts::default();
        for stmt in &ast {
            visitor.visit_stmt(stmt);
        }
        // fun, block, c, block, d, while, x
        assert_eq!(visitor.count, 7);
    }
}
