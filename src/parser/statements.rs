//! Statement parsing implementation
//!
//! This module handles parsing of all statement types:
//!
//! - Local declarations: `int x = 42;`, `Point p;`
//! - Control flow: `if`, `while`, `for`, `do-while`, `switch`
//! - Jump statements: `return`, `break`, `continue`, `label`, `jump`
//! - Exceptions: `try`/`catch`, `throw`
//! - Compound statements: `{ ... }`
//! - Expression statements: function calls, assignments
//!
//! # Grammar
//!
//! ```text
//! statement ::= block | return_stmt | if_stmt | while_stmt | do_while_stmt
//!             | for_stmt | switch_stmt | break_stmt | continue_stmt
//!             | label_stmt | jump_stmt | try_stmt | throw_stmt
//!             | typedef | declaration | expr ";" | ";"
//! ```
//!
//! `else` binds to the nearest `if`: the then-branch is parsed completely
//! before `else` is looked for.

use crate::parser::ast::*;
use crate::parser::error::{ParseError, ParseErrorKind};
use crate::parser::parse::Parser;
use crate::parser::token::TokenKind;

impl Parser<'_> {
    /// Parse block statements (inside braces, excluding the braces themselves)
    pub(crate) fn parse_block_statements(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse a statement
    pub fn parse_statement(&mut self) -> Result<AstNode, ParseError> {
        self.nested(|p| p.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        match self.current.kind {
            TokenKind::LBrace => {
                self.advance()?;
                let statements = self.parse_block_statements()?;
                self.expect_rbrace("after block")?;
                Ok(AstNode::block(statements, loc))
            }
            TokenKind::Semicolon => {
                self.advance()?;
                Ok(AstNode::block(Vec::new(), loc))
            }
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::Break => {
                self.advance()?;
                self.expect_semicolon("after 'break'")?;
                Ok(AstNode::break_stmt(loc))
            }
            TokenKind::Continue => {
                self.advance()?;
                self.expect_semicolon("after 'continue'")?;
                Ok(AstNode::continue_stmt(loc))
            }
            TokenKind::Label => {
                self.advance()?;
                let name = self.expect_identifier("after 'label'")?;
                self.expect_token(TokenKind::Colon, "Expected ':' after label name")?;
                Ok(AstNode::label(&name, loc))
            }
            TokenKind::Jump => {
                self.advance()?;
                let label = self.expect_identifier("after 'jump'")?;
                self.expect_semicolon("after 'jump'")?;
                Ok(AstNode::jump(&label, loc))
            }
            TokenKind::Throw => {
                self.advance()?;
                let value = self.parse_expression()?;
                self.expect_semicolon("after 'throw'")?;
                Ok(AstNode::throw(value, loc))
            }
            TokenKind::Typedef => self.parse_top_level(),
            _ if self.starts_declaration() => self.parse_declaration(false),
            _ => {
                let expr = self.parse_expression()?;
                self.expect_semicolon("after expression")?;
                Ok(expr)
            }
        }
    }

    /// Parse return statement
    fn parse_return_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.advance()?.location;

        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect_semicolon("after return")?;
        Ok(AstNode::return_stmt(value, loc))
    }

    /// Parse if statement
    fn parse_if_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.advance()?.location;

        self.expect_lparen("after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after if condition")?;

        let then_branch = self.parse_statement()?;
        let else_branch = if self.match_token(TokenKind::Else)? {
            Some(self.parse_statement()?)
        } else {
            None
        };

        Ok(AstNode::if_stmt(condition, then_branch, else_branch, loc))
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.advance()?.location;

        self.expect_lparen("after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after while condition")?;

        let body = self.parse_statement_or_block()?;
        Ok(AstNode::while_loop(condition, body, loc))
    }

    /// Parse do-while statement
    fn parse_do_while_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.advance()?.location;

        let body = self.parse_statement_or_block()?;

        self.expect_token(TokenKind::While, "Expected 'while' after do body")?;
        self.expect_lparen("after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after do-while condition")?;
        self.expect_semicolon("after do-while")?;

        Ok(AstNode::do_while(body, condition, loc))
    }

    /// Parse for statement
    fn parse_for_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.advance()?.location;

        self.expect_lparen("after 'for'")?;

        // Init (optional); a declaration consumes its own ';'
        let init = if self.match_token(TokenKind::Semicolon)? {
            None
        } else if self.starts_declaration() {
            Some(self.parse_declaration(false)?)
        } else {
            let expr = self.parse_expression()?;
            self.expect_semicolon("after for init")?;
            Some(expr)
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_semicolon("after for condition")?;

        let increment = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_rparen("after for clauses")?;

        let body = self.parse_statement_or_block()?;

        Ok(AstNode::for_loop(init, condition, increment, body, loc))
    }

    /// Parse switch statement
    fn parse_switch_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.advance()?.location;

        self.expect_lparen("after 'switch'")?;
        let scrutinee = self.parse_expression()?;
        self.expect_rparen("after switch expression")?;
        self.expect_lbrace("before switch body")?;

        let mut cases = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let case_loc = self.current_location();
            if self.match_token(TokenKind::Case)? {
                let value = self.parse_expression()?;
                self.expect_token(TokenKind::Colon, "Expected ':' after case value")?;
                let body = self.parse_case_body()?;
                cases.push(AstNode::case(value, body, case_loc));
            } else if self.match_token(TokenKind::Default)? {
                self.expect_token(TokenKind::Colon, "Expected ':' after 'default'")?;
                let body = self.parse_case_body()?;
                cases.push(AstNode::default_case(body, case_loc));
            } else {
                return Err(self.error(
                    ParseErrorKind::UnexpectedToken,
                    format!("Expected 'case' or 'default' in switch body, found {}", self.current),
                ));
            }
        }

        self.expect_rbrace("after switch body")?;
        Ok(AstNode::switch(scrutinee, cases, loc))
    }

    /// Statements up to the next `case`, `default` or closing brace
    fn parse_case_body(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut body = Vec::new();
        while !self.check(TokenKind::Case)
            && !self.check(TokenKind::Default)
            && !self.check(TokenKind::RBrace)
            && !self.is_at_end()
        {
            body.push(self.parse_statement()?);
        }
        Ok(body)
    }

    /// Parse `try { } catch [(T name) | (name)] { } ...`
    fn parse_try_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.advance()?.location;

        self.expect_lbrace("after 'try'")?;
        let body = self.parse_block_statements()?;
        self.expect_rbrace("after try block")?;

        let mut catches = Vec::new();
        while self.check(TokenKind::Catch) {
            let catch_loc = self.advance()?.location;

            let binding = if self.match_token(TokenKind::LParen)? {
                let binding = self.parse_catch_binding()?;
                self.expect_rparen("after catch binding")?;
                Some(binding)
            } else {
                None
            };

            self.expect_lbrace("before catch body")?;
            let catch_body = self.parse_block_statements()?;
            self.expect_rbrace("after catch body")?;
            catches.push(AstNode::catch(binding, catch_body, catch_loc));
        }

        if catches.is_empty() {
            return Err(self.error(
                ParseErrorKind::UnexpectedToken,
                format!("Expected 'catch' after try block, found {}", self.current),
            ));
        }

        Ok(AstNode::try_stmt(body, catches, loc))
    }

    /// `T name` binds a typed declaration; a lone `name` binds an identifier
    fn parse_catch_binding(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();
        if self.starts_type() {
            let ty = self.parse_type()?;
            let name = self.expect_identifier("in catch binding")?;
            return Ok(AstNode::declaration(ty, &name, None, StorageFlags::empty(), loc));
        }
        let name = self.expect_identifier("in catch binding")?;
        Ok(AstNode::identifier(&name, loc))
    }

    /// Parse statement or block (for loop bodies)
    pub(crate) fn parse_statement_or_block(&mut self) -> Result<Vec<AstNode>, ParseError> {
        if self.match_token(TokenKind::LBrace)? {
            let statements = self.parse_block_statements()?;
            self.expect_rbrace("after block")?;
            Ok(statements)
        } else {
            Ok(vec![self.parse_statement()?])
        }
    }
}
