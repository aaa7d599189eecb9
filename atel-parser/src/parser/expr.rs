use super::*;

impl Parser {
    /* Expressions */
    /// Parses any expression.
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_assignment_expr()
    }

    /// Parses an assignment. Right-associative: `a = b = c` is `a = (b = c)`.
    ///
    /// A left-hand side that is not a variable is reported but does not abort the rule: the
    /// right-hand side is parsed and dropped and the left-hand side is returned as is.
    fn parse_assignment_expr(&mut self) -> ParseResult<Expr> {
        self.nested(|this| {
            let expr = this.parse_or_expr()?;

            if let Some(equal) = this.eat_any(&[TokenKind::Equal]) {
                let value = this.parse_assignment_expr()?;

                return match expr {
                    Expr::Variable(name) => Ok(Expr::Assign {
                        name,
                        value: Box::new(value),
                    }),
                    expr => {
                        this.report(SyntaxError::new("Invalid assignment target.", equal.line));
                        Ok(expr)
                    }
                };
            }

            Ok(expr)
        })
    }

    fn parse_or_expr(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_and_expr()?;

        while let Some(op) = self.eat_any(&[TokenKind::Or]) {
            let rhs = self.parse_and_expr()?;
            lhs = Expr::Logical {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn parse_and_expr(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_equality_expr()?;

        while let Some(op) = self.eat_any(&[TokenKind::And]) {
            let rhs = self.parse_equality_expr()?;
            lhs = Expr::Logical {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    /// Parses `==` and single `=` comparisons.
    ///
    /// A `=` directly after a bare variable is left for [`Self::parse_assignment_expr`]; after any
    /// other operand it compares for equality.
    fn parse_equality_expr(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_comparison_expr()?;

        loop {
            let claims_equal = !matches!(lhs, Expr::Variable(_));
            let op = if claims_equal {
                self.eat_any(&[TokenKind::EqualEqual, TokenKind::Equal])
            } else {
                self.eat_any(&[TokenKind::EqualEqual])
            };
            let op = match op {
                Some(op) => op,
                None => break,
            };

            let rhs = self.parse_comparison_expr()?;
            lhs = Expr::Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn parse_comparison_expr(&mut self) -> ParseResult<Expr> {
        self.parse_binary_expr(
            &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
            ],
            Self::parse_term_expr,
        )
    }

    fn parse_term_expr(&mut self) -> ParseResult<Expr> {
        self.parse_binary_expr(&[TokenKind::Minus, TokenKind::Plus], Self::parse_factor_expr)
    }

    fn parse_factor_expr(&mut self) -> ParseResult<Expr> {
        self.parse_binary_expr(
            &[TokenKind::Slash, TokenKind::Star, TokenKind::Percent],
            Self::parse_unary_expr,
        )
    }

    /// Parses a left-associative chain of `operand (op operand)*` for any of `ops`.
    fn parse_binary_expr(
        &mut self,
        ops: &[TokenKind],
        operand: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let mut lhs = operand(self)?;

        while let Some(op) = self.eat_any(ops) {
            let rhs = operand(self)?;
            lhs = Expr::Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn parse_unary_expr(&mut self) -> ParseResult<Expr> {
        self.nested(|this| match this.eat_any(&[TokenKind::Not, TokenKind::Minus]) {
            Some(op) => Ok(Expr::Unary {
                op,
                rhs: Box::new(this.parse_unary_expr()?),
            }),
            None => this.parse_call_expr(),
        })
    }

    /* Expressions.Call */
    /// Parses a primary expression followed by any number of argument lists (e.g. `f(1)(2)`).
    fn parse_call_expr(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary_expr()?;

        while self.eat(TokenKind::LeftParen) {
            let mut args = Vec::new();
            if !self.check(TokenKind::RightParen) {
                loop {
                    args.push(self.parse_expr()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            let paren = self.expect(TokenKind::RightParen, "Expected ')' after arguments.")?;

            expr = Expr::Call {
                callee: Box::new(expr),
                paren,
                args,
            };
        }

        Ok(expr)
    }

    /// Parses a primary (atom) expression: a variable, a number literal or a parenthesized expression.
    fn parse_primary_expr(&mut self) -> ParseResult<Expr> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::Identifier => Ok(Expr::Variable(self.next())),
            TokenKind::Integer | TokenKind::Float => {
                let token = self.next();
                // `scan` always decodes number literals; hand-built tokens may not carry one
                Ok(Expr::Literal(token.literal.unwrap_or(Literal::Nil)))
            }
            TokenKind::LeftParen => {
                self.next();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RightParen, "Expected ')' after expression.")?;
                Ok(Expr::Grouping(Box::new(inner)))
            }
            _ => Err(ParseError::ExpectedExpression {
                found: self.found(),
                line: self.peek().line,
            }),
        }
    }
}
