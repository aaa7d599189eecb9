use super::*;

impl Parser {
    /// Parses a declaration (or statement).
    ///
    /// This is the error recovery point: a failed declaration is reported, the parser is
    /// synchronized to the next statement boundary and `None` is returned.
    pub fn parse_declaration(&mut self) -> Option<Stmt> {
        match self.nested(Self::parse_declaration_or_stmt) {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                self.recover(error);
                None
            }
        }
    }

    /// Parses a declaration inside a block. Recovers like [`Self::parse_declaration`], except from
    /// [`ParseError::TooDeep`] which abandons the enclosing top-level declaration as a whole.
    fn parse_block_declaration(&mut self) -> ParseResult<Option<Stmt>> {
        match self.nested(Self::parse_declaration_or_stmt) {
            Ok(stmt) => Ok(Some(stmt)),
            Err(error @ ParseError::TooDeep { .. }) => Err(error),
            Err(error) => {
                self.recover(error);
                Ok(None)
            }
        }
    }

    fn recover(&mut self, error: ParseError) {
        debug!(line = error.line(), %error, "recovering from parse error");
        self.errors.add_error(error);
        self.synchronize();
    }

    fn parse_declaration_or_stmt(&mut self) -> ParseResult<Stmt> {
        if self.eat(TokenKind::Fun) {
            self.parse_fn_declaration()
        } else if self.eat(TokenKind::Var) {
            self.parse_var_declaration()
        } else {
            self.parse_stmt()
        }
    }

    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        self.nested(|this| {
            let kind = this.peek().kind;
            match kind {
                TokenKind::For => {
                    this.next();
                    this.parse_for_stmt()
                }
                TokenKind::If => {
                    this.next();
                    this.parse_if_stmt()
                }
                TokenKind::Return => {
                    let keyword = this.next();
                    this.parse_return_stmt(keyword)
                }
                TokenKind::While => {
                    this.next();
                    this.parse_while_stmt()
                }
                TokenKind::LeftBrace => {
                    this.next();
                    Ok(Stmt::Block(this.parse_block()?))
                }
                _ => this.parse_expr_stmt(),
            }
        })
    }

    /// Parses the rest of a block after its `{`, up to and including the closing `}`.
    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut body = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.at_end() {
            if let Some(stmt) = self.parse_block_declaration()? {
                body.push(stmt);
            }
        }
        self.expect(TokenKind::RightBrace, "Expected '}' after block.")?;

        Ok(body)
    }

    fn parse_fn_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.expect(TokenKind::Identifier, "Expected function name.")?;
        self.expect(TokenKind::LeftParen, "Expected '(' after function name.")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.expect(TokenKind::Identifier, "Expected parameter name.")?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, "Expected ')' after parameters.")?;

        self.expect(TokenKind::LeftBrace, "Expected '{' before function body.")?;
        let body = self.parse_block()?;

        Ok(Stmt::FnDeclaration { name, params, body })
    }

    fn parse_var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.expect(TokenKind::Identifier, "Expected variable name.")?;
        let initializer = if self.eat(TokenKind::Equal) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "Expected ';' after variable declaration.")?;

        Ok(Stmt::VarDeclaration { name, initializer })
    }

    /// Parses a `for` loop and desugars it into a `while` loop:
    /// `for (init; cond; incr) body` becomes `{ init; while (cond) { body; incr; } }`.
    /// A missing condition is `true`; missing clauses add no wrapper.
    fn parse_for_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::LeftParen, "Expected '(' after 'for'.")?;

        let initializer = if self.eat(TokenKind::Semicolon) {
            None
        } else if self.eat(TokenKind::Var) {
            Some(self.parse_var_declaration()?)
        } else {
            Some(self.parse_expr_stmt()?)
        };

        let cond = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon, "Expected ';' after loop condition.")?;

        let increment = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::RightParen, "Expected ')' after for clauses.")?;

        let mut body = self.parse_stmt()?;
        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::ExprStmt(increment)]);
        }
        body = Stmt::While {
            cond: cond.unwrap_or_else(literal_true),
            body: Box::new(body),
        };
        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::LeftParen, "Expected '(' after 'if'.")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RightParen, "Expected ')' after if condition.")?;

        let then_branch = Box::new(self.parse_stmt()?);
        // a dangling `else` binds to the nearest `if`
        let else_branch = if self.eat(TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };

        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_while_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::LeftParen, "Expected '(' after 'while'.")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RightParen, "Expected ')' after condition.")?;
        let body = Box::new(self.parse_stmt()?);

        Ok(Stmt::While { cond, body })
    }

    fn parse_return_stmt(&mut self, keyword: Token) -> ParseResult<Stmt> {
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon, "Expected ';' after return value.")?;

        Ok(Stmt::Return { keyword, value })
    }

    fn parse_expr_stmt(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "Expected ';' after expression.")?;

        Ok(Stmt::ExprStmt(expr))
    }
}
