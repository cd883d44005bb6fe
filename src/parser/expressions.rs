//! Expression parsing implementation
//!
//! This module handles expressions using precedence climbing for binary
//! operators and recursive descent for everything else.
//!
//! # Supported Expressions
//!
//! - Literals: integers, floats, characters, strings, booleans, `null`
//! - Identifiers
//! - Assignment: `=` and the compound forms, right-associative
//! - Ternary: `? :`, right-associative
//! - Binary operators: logical, bitwise, comparison, shift, arithmetic
//! - Unary prefix: `+ - ! ~ ++ -- * &`, `sizeof`, `typeof`
//! - Postfix: `()`, `[]`, `.`, `->`, `++`, `--`
//! - Casts `(type) expr` and compound expressions `({ ... })`
//! - `lambda (params) { body }`
//! - Memory intrinsics: `malloc calloc realloc free memcpy memset memmove`
//!
//! # Precedence
//!
//! | level | operators          |
//! |-------|--------------------|
//! | 1     | `\|\|`             |
//! | 2     | `&&`               |
//! | 3     | `\|`               |
//! | 4     | `^`                |
//! | 5     | `&`                |
//! | 6     | `== !=`            |
//! | 7     | `< <= > >=`        |
//! | 8     | `<< >>`            |
//! | 9     | `+ -`              |
//! | 10    | `* / %`            |
//!
//! All binary levels go through [`Parser::parse_binary`]; every level is
//! left-associative.

use crate::parser::ast::*;
use crate::parser::error::{ParseError, ParseErrorKind};
use crate::parser::parse::Parser;
use crate::parser::token::TokenKind;

/// Lowest binary precedence level
const MIN_PRECEDENCE: u8 = 1;

/// Binary operator and precedence for a token, if it is a binary operator
fn binary_op(kind: TokenKind) -> Option<(BinaryOp, u8)> {
    let entry = match kind {
        TokenKind::OrOr => (BinaryOp::Or, 1),
        TokenKind::AndAnd => (BinaryOp::And, 2),
        TokenKind::Pipe => (BinaryOp::BitOr, 3),
        TokenKind::Caret => (BinaryOp::BitXor, 4),
        TokenKind::Amp => (BinaryOp::BitAnd, 5),
        TokenKind::EqEq => (BinaryOp::Eq, 6),
        TokenKind::NotEq => (BinaryOp::Ne, 6),
        TokenKind::Lt => (BinaryOp::Lt, 7),
        TokenKind::Le => (BinaryOp::Le, 7),
        TokenKind::Gt => (BinaryOp::Gt, 7),
        TokenKind::Ge => (BinaryOp::Ge, 7),
        TokenKind::Shl => (BinaryOp::Shl, 8),
        TokenKind::Shr => (BinaryOp::Shr, 8),
        TokenKind::Plus => (BinaryOp::Add, 9),
        TokenKind::Minus => (BinaryOp::Sub, 9),
        TokenKind::Star => (BinaryOp::Mul, 10),
        TokenKind::Slash => (BinaryOp::Div, 10),
        TokenKind::Percent => (BinaryOp::Mod, 10),
        _ => return None,
    };
    Some(entry)
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Assign => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Mod,
        TokenKind::AmpEq => AssignOp::BitAnd,
        TokenKind::PipeEq => AssignOp::BitOr,
        TokenKind::CaretEq => AssignOp::BitXor,
        TokenKind::ShlEq => AssignOp::Shl,
        TokenKind::ShrEq => AssignOp::Shr,
        _ => return None,
    };
    Some(op)
}

fn prefix_op(kind: TokenKind) -> Option<UnaryOp> {
    let op = match kind {
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Minus => UnaryOp::Neg,
        TokenKind::Bang => UnaryOp::Not,
        TokenKind::Tilde => UnaryOp::BitNot,
        TokenKind::PlusPlus => UnaryOp::PreInc,
        TokenKind::MinusMinus => UnaryOp::PreDec,
        TokenKind::Star => UnaryOp::Deref,
        TokenKind::Amp => UnaryOp::AddrOf,
        _ => return None,
    };
    Some(op)
}

impl Parser<'_> {
    /// Parse expression (top-level entry point)
    pub fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        self.nested(|p| p.parse_assignment())
    }

    /// Parse assignment or ternary (right-associative)
    fn parse_assignment(&mut self) -> Result<AstNode, ParseError> {
        let target = self.parse_ternary()?;

        let Some(op) = assign_op(self.current.kind) else {
            return Ok(target);
        };
        let loc = self.advance()?.location;
        let value = self.nested(|p| p.parse_assignment())?;
        Ok(AstNode::assignment(op, target, value, loc))
    }

    /// Parse ternary: condition ? then_expr : else_expr
    fn parse_ternary(&mut self) -> Result<AstNode, ParseError> {
        let condition = self.parse_binary(MIN_PRECEDENCE)?;

        if !self.check(TokenKind::Question) {
            return Ok(condition);
        }
        let loc = self.advance()?.location;
        let then_expr = self.parse_expression()?;
        self.expect_token(TokenKind::Colon, "Expected ':' in ternary expression")?;
        let else_expr = self.parse_expression()?;

        Ok(AstNode::ternary(condition, then_expr, else_expr, loc))
    }

    /// Parse a binary expression whose operators all bind at least as
    /// tightly as `min_prec`.
    ///
    /// The right operand is parsed with `prec + 1`, so an operator of the
    /// same level ends the right operand and folds onto the left instead.
    pub(crate) fn parse_binary(&mut self, min_prec: u8) -> Result<AstNode, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some((op, prec)) = binary_op(self.current.kind) {
            if prec < min_prec {
                break;
            }
            let loc = self.advance()?.location;
            let right = self.parse_binary(prec + 1)?;
            left = AstNode::binary(op, left, right, loc);
        }

        Ok(left)
    }

    /// Parse unary prefix operators, casts and parenthesized forms
    fn parse_unary(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        if let Some(op) = prefix_op(self.current.kind) {
            self.advance()?;
            let operand = self.nested(|p| p.parse_unary())?;
            return Ok(AstNode::unary(op, operand, loc));
        }

        match self.current.kind {
            TokenKind::Sizeof => {
                self.advance()?;
                let operand = self.parse_type_or_operand()?;
                Ok(AstNode::size_of(operand, loc))
            }
            TokenKind::Typeof => {
                self.advance()?;
                let operand = self.parse_type_or_operand()?;
                Ok(AstNode::type_of(operand, loc))
            }
            TokenKind::LParen => {
                self.advance()?;
                self.parse_after_lparen(loc)
            }
            _ => self.parse_postfix(),
        }
    }

    /// Whatever follows an opening parenthesis in expression position: a
    /// cast, a compound expression or a grouped expression.
    fn parse_after_lparen(&mut self, loc: SourceLocation) -> Result<AstNode, ParseError> {
        if self.starts_type() {
            let target_type = self.parse_type()?;
            self.expect_rparen("after cast type")?;
            let value = self.nested(|p| p.parse_unary())?;
            return Ok(AstNode::cast(target_type, value, loc));
        }

        let expr = if self.match_token(TokenKind::LBrace)? {
            let statements = self.parse_block_statements()?;
            self.expect_rbrace("after compound expression")?;
            self.expect_rparen("after compound expression")?;
            AstNode::compound_expr(statements, loc)
        } else {
            let expr = self.parse_expression()?;
            self.expect_rparen("after expression")?;
            expr
        };
        self.parse_postfix_chain(expr)
    }

    /// Operand of `sizeof` / `typeof`: a parenthesized type, or an expression
    fn parse_type_or_operand(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();
        if !self.match_token(TokenKind::LParen)? {
            return self.nested(|p| p.parse_unary());
        }

        if self.starts_type() {
            let ty = self.parse_type()?;
            self.expect_rparen("after type")?;
            return Ok(ty);
        }
        self.parse_after_lparen(loc)
    }

    /// Parse postfix (() [] . -> ++ --)
    fn parse_postfix(&mut self) -> Result<AstNode, ParseError> {
        let expr = self.parse_primary()?;
        self.parse_postfix_chain(expr)
    }

    fn parse_postfix_chain(&mut self, mut expr: AstNode) -> Result<AstNode, ParseError> {
        loop {
            let loc = self.current_location();
            expr = match self.current.kind {
                TokenKind::LParen => {
                    self.advance()?;
                    let args = self.parse_argument_list()?;
                    self.expect_rparen("after function arguments")?;
                    AstNode::call(expr, args, loc)
                }
                TokenKind::LBracket => {
                    self.advance()?;
                    let index = self.parse_expression()?;
                    self.expect_token(TokenKind::RBracket, "Expected ']' after array index")?;
                    AstNode::array_access(expr, index, loc)
                }
                TokenKind::Dot | TokenKind::Arrow => {
                    let through_pointer = self.advance()?.kind == TokenKind::Arrow;
                    let field = self.expect_identifier("after member access")?;
                    AstNode::field_access(expr, &field, through_pointer, loc)
                }
                TokenKind::PlusPlus => {
                    self.advance()?;
                    AstNode::unary(UnaryOp::PostInc, expr, loc)
                }
                TokenKind::MinusMinus => {
                    self.advance()?;
                    AstNode::unary(UnaryOp::PostDec, expr, loc)
                }
                _ => return Ok(expr),
            };
        }
    }

    /// Parse argument list: expr, expr, ... (without the parentheses)
    fn parse_argument_list(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut args = Vec::new();

        if self.check(TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if !self.match_token(TokenKind::Comma)? {
                break;
            }
        }

        Ok(args)
    }

    /// Parse primary (literals, identifiers, null, lambdas, intrinsics)
    fn parse_primary(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        match self.current.kind {
            TokenKind::Identifier => {
                let name = self.expect_identifier("in expression")?;
                Ok(AstNode::identifier(&name, loc))
            }
            TokenKind::Number
            | TokenKind::StringLiteral
            | TokenKind::CharLiteral
            | TokenKind::BoolLiteral => {
                let token = self.advance()?;
                let kind = token.kind;
                let value = token.into_literal().ok_or_else(|| {
                    ParseError::new(
                        ParseErrorKind::UnexpectedToken,
                        format!("Literal token without a value: {}", kind),
                        loc,
                    )
                })?;
                Ok(AstNode::literal(value, loc))
            }
            TokenKind::Null => {
                self.advance()?;
                Ok(AstNode::null(None, loc))
            }
            TokenKind::Lambda => {
                self.advance()?;
                self.parse_lambda(loc)
            }
            TokenKind::Malloc
            | TokenKind::Calloc
            | TokenKind::Realloc
            | TokenKind::Free
            | TokenKind::Memcpy
            | TokenKind::Memset
            | TokenKind::Memmove => self.parse_intrinsic(),
            _ => Err(self.error(
                ParseErrorKind::UnexpectedToken,
                format!("Expected expression, found {}", self.current),
            )),
        }
    }

    /// Parse lambda: lambda (params) { body }
    fn parse_lambda(&mut self, loc: SourceLocation) -> Result<AstNode, ParseError> {
        self.expect_lparen("after 'lambda'")?;
        let params = self.parse_parameter_list()?;
        self.expect_rparen("after lambda parameters")?;
        self.expect_lbrace("before lambda body")?;
        let body = self.parse_block_statements()?;
        self.expect_rbrace("after lambda body")?;
        Ok(AstNode::lambda(params, body, loc))
    }

    /// Parse a memory intrinsic call with its fixed argument count
    fn parse_intrinsic(&mut self) -> Result<AstNode, ParseError> {
        let token = self.advance()?;
        let loc = token.location;
        let name = token.kind.spelling();

        self.expect_lparen(&format!("after '{name}'"))?;
        let args = self.parse_argument_list()?;
        self.expect_rparen(&format!("after '{name}' arguments"))?;

        let node = match token.kind {
            TokenKind::Malloc => {
                let [size] = take_args::<1>(name, args, loc)?;
                AstNode::malloc(size, loc)
            }
            TokenKind::Calloc => {
                let [count, size] = take_args::<2>(name, args, loc)?;
                AstNode::calloc(count, size, loc)
            }
            TokenKind::Realloc => {
                let [pointer, size] = take_args::<2>(name, args, loc)?;
                AstNode::realloc(pointer, size, loc)
            }
            TokenKind::Free => {
                let [pointer] = take_args::<1>(name, args, loc)?;
                AstNode::free(pointer, loc)
            }
            TokenKind::Memcpy => {
                let [dest, src, size] = take_args::<3>(name, args, loc)?;
                AstNode::memcpy(dest, src, size, loc)
            }
            TokenKind::Memset => {
                let [dest, value, size] = take_args::<3>(name, args, loc)?;
                AstNode::memset(dest, value, size, loc)
            }
            _ => {
                let [dest, src, size] = take_args::<3>(name, args, loc)?;
                AstNode::memmove(dest, src, size, loc)
            }
        };
        Ok(node)
    }
}

/// Split an argument list into exactly `N` arguments.
fn take_args<const N: usize>(
    name: &str,
    args: Vec<AstNode>,
    loc: SourceLocation,
) -> Result<[AstNode; N], ParseError> {
    let found = args.len();
    args.try_into().map_err(|_| {
        ParseError::new(
            ParseErrorKind::InvalidArity,
            format!("'{}' takes {} argument(s), found {}", name, N, found),
            loc,
        )
    })
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::error::ParseErrorKind;
    use crate::parser::lexer::Lexer;
    use crate::parser::parse::Parser;

    fn expr(source: &str) -> AstNode {
        let mut lexer = Lexer::new(source);
        let mut parser = Parser::new(&mut lexer).unwrap();
        parser.parse_expression().unwrap()
    }

    fn expr_err(source: &str) -> ParseErrorKind {
        let mut lexer = Lexer::new(source);
        let mut parser = Parser::new(&mut lexer).unwrap();
        parser.parse_expression().unwrap_err().kind
    }

    #[test]
    fn test_precedence() {
        assert_eq!(expr("1 + 2 * 3").to_string(), "(+ 1 (* 2 3))");
        assert_eq!(expr("2 * 3 + 1").to_string(), "(+ (* 2 3) 1)");
        assert_eq!(expr("a || b && c | d ^ e & f").to_string(), "(|| a (&& b (| c (^ d (& e f)))))");
        assert_eq!(expr("a == b < c << d").to_string(), "(== a (< b (<< c d)))");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(expr("8 - 3 - 2").to_string(), "(- (- 8 3) 2)");
        assert_eq!(expr("a / b % c").to_string(), "(% (/ a b) c)");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(expr("a = b += c").to_string(), "(= a (+= b c))");
    }

    #[test]
    fn test_unary_nesting() {
        assert_eq!(expr("!!x").to_string(), "(! (! x))");
        assert_eq!(expr("**p").to_string(), "(deref (deref p))");
        assert_eq!(expr("-a * b").to_string(), "(* (- a) b)");
        assert_eq!(expr("&x").to_string(), "(addr x)");
    }

    #[test]
    fn test_postfix_increment() {
        assert_eq!(expr("i++ + --j").to_string(), "(+ (post++ i) (-- j))");
    }

    #[test]
    fn test_cast_and_grouping() {
        assert_eq!(expr("(int) x").to_string(), "(cast int x)");
        assert_eq!(expr("(char*) p + 1").to_string(), "(+ (cast (ptr char) p) 1)");
        assert_eq!(expr("(a + b) * c").to_string(), "(* (+ a b) c)");
    }

    #[test]
    fn test_sizeof_and_typeof() {
        assert_eq!(expr("sizeof(int)").to_string(), "(sizeof int)");
        assert_eq!(expr("sizeof x").to_string(), "(sizeof x)");
        assert_eq!(expr("sizeof(a) + 1").to_string(), "(+ (sizeof a) 1)");
        assert_eq!(expr("typeof(struct Point)").to_string(), "(typeof (struct Point))");
    }

    #[test]
    fn test_compound_expression() {
        let node = expr("({ int t = 1; t + 1; })");
        match &node {
            AstNode::CompoundExpr { statements, .. } => assert_eq!(statements.len(), 2),
            _ => panic!("Expected compound expression"),
        }
    }

    #[test]
    fn test_intrinsics() {
        assert_eq!(expr("malloc(4)").to_string(), "(malloc 4)");
        assert_eq!(expr("memset(p, 0, n)").to_string(), "(memset p 0 n)");
        assert_eq!(expr_err("calloc(1)"), ParseErrorKind::InvalidArity);
        assert_eq!(expr_err("free()"), ParseErrorKind::InvalidArity);
    }

    #[test]
    fn test_lambda() {
        let node = expr("lambda (int a, int b) { return a + b; }");
        match &node {
            AstNode::Lambda { params, body, .. } => {
                assert_eq!(params.len(), 2);
                assert_eq!(body.len(), 1);
            }
            _ => panic!("Expected lambda"),
        }
    }

    #[test]
    fn test_missing_operand() {
        assert_eq!(expr_err("1 +"), ParseErrorKind::UnexpectedEof);
        assert_eq!(expr_err("(1 + 2"), ParseErrorKind::UnexpectedEof);
        assert_eq!(expr_err("1 + ;"), ParseErrorKind::UnexpectedToken);
    }
}
