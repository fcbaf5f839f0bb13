//! Recursive descent parser

use crate::common::{CompileError, CompileResult, Span};
use crate::frontend::ast::*;
use crate::frontend::lexer::{Lexer, Token, TokenKind};
use crate::types::{TypeContext, TypeId};

/// Recursive descent parser producing an unresolved [`Module`]
///
/// Every type name becomes a fresh `Unresolved` leaf in the module's
/// [`TypeContext`]; pointer and array wrappers around it are interned.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    types: TypeContext,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            types: TypeContext::new(),
        })
    }

    /// Parse a complete module
    pub fn parse(mut self) -> CompileResult<Module> {
        let mut decls = Vec::new();

        while !self.at_end() {
            decls.push(self.parse_declaration()?);
        }

        Ok(Module::new(decls, self.types))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> CompileResult<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(CompileError::parser(
                format!("expected {}, found {}", kind, self.current.kind),
                self.current.span,
            ))
        }
    }

    fn expect_ident(&mut self, what: &str) -> CompileResult<Ident> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let ident = Ident::new(name.clone(), self.current.span);
            self.advance()?;
            Ok(ident)
        } else {
            Err(CompileError::parser(
                format!("expected {}, found {}", what, self.current.kind),
                self.current.span,
            ))
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_declaration(&mut self) -> CompileResult<Decl> {
        match self.current.kind {
            TokenKind::Fn => self.parse_function(),
            TokenKind::Struct => self.parse_struct(),
            _ => Err(CompileError::parser(
                format!("expected 'fn' or 'struct', found {}", self.current.kind),
                self.current.span,
            )),
        }
    }

    fn parse_function(&mut self) -> CompileResult<Decl> {
        let start = self.expect(TokenKind::Fn)?.span;
        let name = self.expect_ident("function name")?;

        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                params.push(self.parse_param()?);
                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        let ret = if self.match_token(&TokenKind::Colon)? {
            self.parse_type()?.0
        } else {
            self.types.void_type()
        };

        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Ok(Decl::new(
            DeclKind::Function(FunctionDecl::new(name, params, ret, body)),
            span,
        ))
    }

    fn parse_param(&mut self) -> CompileResult<Param> {
        let name = self.expect_ident("parameter name")?;
        let ty = if self.match_token(&TokenKind::Colon)? {
            Some(self.parse_type()?.0)
        } else {
            None
        };
        Ok(Param::new(name, ty))
    }

    fn parse_struct(&mut self) -> CompileResult<Decl> {
        let start = self.expect(TokenKind::Struct)?.span;
        let name = self.expect_ident("struct name")?;

        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let field_name = self.expect_ident("field name")?;
            self.expect(TokenKind::Colon)?;
            let (ty, _) = self.parse_type()?;
            fields.push(FieldDecl::new(field_name, ty));
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        let end = self.expect(TokenKind::RBrace)?.span;

        Ok(Decl::new(
            DeclKind::Struct(StructDecl::new(name, fields)),
            start.merge(end),
        ))
    }

    /// type := IDENT | '*' type | '[' type ',' INT ']'
    fn parse_type(&mut self) -> CompileResult<(TypeId, Span)> {
        let start = self.current.span;
        match &self.current.kind {
            TokenKind::Identifier(name) => {
                let ty = self.types.create_unresolved(name.clone(), start);
                self.advance()?;
                Ok((ty, start))
            }
            TokenKind::Star => {
                self.advance()?;
                let (element, inner) = self.parse_type()?;
                Ok((self.types.intern_pointer(element), start.merge(inner)))
            }
            TokenKind::LBracket => {
                self.advance()?;
                let (element, _) = self.parse_type()?;
                self.expect(TokenKind::Comma)?;
                let size = self.parse_array_size()?;
                let end = self.expect(TokenKind::RBracket)?.span;
                Ok((self.types.intern_array(element, size), start.merge(end)))
            }
            _ => Err(CompileError::parser(
                format!("expected type, found {}", self.current.kind),
                start,
            )),
        }
    }

    fn parse_array_size(&mut self) -> CompileResult<u32> {
        let span = self.current.span;
        if let TokenKind::IntLiteral(s) = &self.current.kind {
            let size = s.parse::<u32>().map_err(|_| {
                CompileError::parser(format!("array size '{}' is out of range", s), span)
            })?;
            self.advance()?;
            Ok(size)
        } else {
            Err(CompileError::parser(
                format!("expected array size, found {}", self.current.kind),
                span,
            ))
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> CompileResult<Stmt> {
        match self.current.kind {
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                let span = block.span;
                Ok(Stmt::new(StmtKind::Compound(block), span))
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Let => self.parse_let_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_block(&mut self) -> CompileResult<Block> {
        let start = self.expect(TokenKind::LBrace)?.span;
        let mut stmts = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            stmts.push(self.parse_statement()?);
        }

        let end = self.expect(TokenKind::RBrace)?.span;
        Ok(Block::new(stmts, start.merge(end)))
    }

    fn parse_if_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.expect(TokenKind::If)?.span;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;

        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.match_token(&TokenKind::Else)? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        let end = else_branch.as_ref().map_or(then_branch.span, |s| s.span);
        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            start.merge(end),
        ))
    }

    fn parse_while_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.expect(TokenKind::While)?.span;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);
        let span = start.merge(body.span);
        Ok(Stmt::new(StmtKind::While { condition, body }, span))
    }

    fn parse_return_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.expect(TokenKind::Return)?.span;
        let value = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let end = self.expect(TokenKind::Semi)?.span;
        Ok(Stmt::new(StmtKind::Return(value), start.merge(end)))
    }

    fn parse_let_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.expect(TokenKind::Let)?.span;
        let name = self.expect_ident("variable name")?;

        let ty = if self.match_token(&TokenKind::Colon)? {
            Some(self.parse_type()?.0)
        } else {
            None
        };
        let value = if self.match_token(&TokenKind::Eq)? {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let end = self.expect(TokenKind::Semi)?.span;
        Ok(Stmt::new(
            StmtKind::Let(LetStmt::new(name, ty, value)),
            start.merge(end),
        ))
    }

    fn parse_expression_statement(&mut self) -> CompileResult<Stmt> {
        let expr = self.parse_expression()?;

        if self.match_token(&TokenKind::Eq)? {
            let value = self.parse_expression()?;
            let end = self.expect(TokenKind::Semi)?.span;
            let span = expr.span.merge(end);
            return Ok(Stmt::new(StmtKind::Assign { target: expr, value }, span));
        }

        let end = self.expect(TokenKind::Semi)?.span;
        let span = expr.span.merge(end);
        Ok(Stmt::new(StmtKind::Expr(expr), span))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> CompileResult<Expr> {
        self.parse_binary_expression(1)
    }

    fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
        let op = match kind {
            TokenKind::PipePipe => BinaryOp::LogOr,
            TokenKind::AmpAmp => BinaryOp::LogAnd,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::Ne,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::Ge,
            TokenKind::LtLt => BinaryOp::Shl,
            TokenKind::GtGt => BinaryOp::Shr,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            _ => return None,
        };
        Some(op)
    }

    /// Precedence climbing over left-associative binary operators
    fn parse_binary_expression(&mut self, min_prec: u8) -> CompileResult<Expr> {
        let mut left = self.parse_cast_expression()?;

        loop {
            let Some(prec) = self.current.kind.binary_precedence() else {
                break;
            };
            if prec < min_prec {
                break;
            }
            let Some(op) = Self::binary_op(&self.current.kind) else {
                break;
            };
            self.advance()?;

            let right = self.parse_binary_expression(prec + 1)?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_cast_expression(&mut self) -> CompileResult<Expr> {
        let mut expr = self.parse_unary_expression()?;

        while self.match_token(&TokenKind::As)? {
            let (target, type_span) = self.parse_type()?;
            let span = expr.span.merge(type_span);
            expr = Expr::new(
                ExprKind::Cast {
                    operand: Box::new(expr),
                    target,
                    resolved: None,
                },
                span,
            );
        }

        Ok(expr)
    }

    fn parse_unary_expression(&mut self) -> CompileResult<Expr> {
        let start = self.current.span;

        let op = match self.current.kind {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Star => UnaryOp::Deref,
            TokenKind::Amp => UnaryOp::AddrOf,
            _ => return self.parse_postfix_expression(),
        };
        self.advance()?;

        let operand = self.parse_unary_expression()?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_postfix_expression(&mut self) -> CompileResult<Expr> {
        let mut expr = self.parse_primary_expression()?;

        loop {
            let start_span = expr.span;
            match &self.current.kind {
                TokenKind::LBracket => {
                    self.advance()?;
                    let index = self.parse_expression()?;
                    let end = self.expect(TokenKind::RBracket)?.span;
                    expr = Expr::new(
                        ExprKind::Subscript {
                            base: Box::new(expr),
                            index: Box::new(index),
                        },
                        start_span.merge(end),
                    );
                }
                TokenKind::LParen => {
                    self.advance()?;
                    let args = self.parse_argument_list()?;
                    let end = self.expect(TokenKind::RParen)?.span;
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        start_span.merge(end),
                    );
                }
                TokenKind::Dot => {
                    self.advance()?;
                    let field = self.expect_ident("field name")?;
                    let span = start_span.merge(field.span);
                    expr = Expr::new(
                        ExprKind::Dot {
                            base: Box::new(expr),
                            field,
                        },
                        span,
                    );
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_argument_list(&mut self) -> CompileResult<Vec<Expr>> {
        let mut args = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(args)
    }

    fn parse_primary_expression(&mut self) -> CompileResult<Expr> {
        let span = self.current.span;

        match &self.current.kind {
            TokenKind::IntLiteral(s) => {
                let value = s.parse::<u64>().map_err(|_| {
                    CompileError::parser(format!("integer literal '{}' is out of range", s), span)
                })?;
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Int(value)), span))
            }
            TokenKind::FloatLiteral(s) => {
                let value = s.parse::<f64>().map_err(|_| {
                    CompileError::parser(format!("invalid float literal '{}'", s), span)
                })?;
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Float(value)), span))
            }
            TokenKind::True | TokenKind::False => {
                let value = matches!(self.current.kind, TokenKind::True);
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Bool(value)), span))
            }
            TokenKind::Identifier(name) => {
                let ident = Ident::new(name.clone(), span);
                self.advance()?;
                Ok(Expr::new(ExprKind::Named { ident, symbol: None }, span))
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                self.advance()?;
                if self.check(&TokenKind::RBracket) {
                    return Err(CompileError::parser(
                        "array literal needs at least one element",
                        span.merge(self.current.span),
                    ));
                }
                let mut elements = Vec::new();
                loop {
                    elements.push(self.parse_expression()?);
                    if !self.match_token(&TokenKind::Comma)? {
                        break;
                    }
                }
                let end = self.expect(TokenKind::RBracket)?.span;
                Ok(Expr::new(ExprKind::ArrayLiteral(elements), span.merge(end)))
            }
            _ => Err(CompileError::parser(
                format!("unexpected token in expression: {}", self.current.kind),
                span,
            )),
        }
    }
}
