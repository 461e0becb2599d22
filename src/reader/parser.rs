use std::convert;
use std::fmt;
use std::result;

use itertools::Itertools;

use super::lexer::{Error as LexerError, Lexer, Number, Token};

pub type Result<T> = result::Result<T, Error>;

const DEF_FORM: &str = "def";
const LIST_FORM: &str = "list";
const LENGTH_FORM: &str = "length";
const DUMP_FORM: &str = "dump";
const FN_FORM: &str = "fn";
const FUNCALL_FORM: &str = "funcall";

/// HostFn is the signature of a native routine registered by the hosting
/// application. It receives the already-evaluated argument values and has
/// no access to any interpreter environment; a failure message propagates
/// to the `run` caller.
pub type HostFn = fn(Vec<Expr>) -> result::Result<Expr, String>;

/// Expr is the AST of the language and, because evaluation rewrites
/// expressions into simpler ones, also its value representation: numbers,
/// strings, lists, function values (`Fn`, `Native`) and in-band `Error`
/// markers are all `Expr` nodes.
#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Number(Number),
    Str(String),
    Identifier(String),
    BinaryOp {
        op: char,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Define {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    List(Vec<Expr>),
    Length(Box<Expr>),
    Dump,
    Fn(FnDecl),
    FnCall {
        callee: Box<Expr>,
        args: Box<Expr>,
    },
    /// Native is a function value backed by a host routine rather than an
    /// interpreted body.
    Native(String, HostFn),
    /// Error is an ordinary value, not a propagated failure: evaluating a
    /// `BinaryOp` whose operator is outside the defined set produces one.
    Error(String),
}

/// FnDecl is a function value. `params` holds the parameter list as the
/// `(list ...)` expression it was written as; no bindings are captured at
/// definition time, functions see nothing but their own parameters.
#[derive(Debug, PartialEq, Clone)]
pub struct FnDecl {
    pub params: Box<Expr>,
    pub body: Box<Expr>,
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Expr::*;

        match self {
            Number(n) => write!(f, "{}", n),
            Str(s) => write!(f, "{}", s),
            Identifier(name) => write!(f, "{}", name),
            BinaryOp { op, left, right } => write!(f, "({} {} {})", op, left, right),
            Define { target, value } => write!(f, "({} {} {})", DEF_FORM, target, value),
            List(elements) => {
                if elements.is_empty() {
                    write!(f, "({})", LIST_FORM)
                } else {
                    write!(f, "({} {})", LIST_FORM, elements.iter().format(" "))
                }
            }
            Length(of) => write!(f, "({} {})", LENGTH_FORM, of),
            Dump => write!(f, "({})", DUMP_FORM),
            Fn(FnDecl { params, body }) => write!(f, "({} {} {})", FN_FORM, params, body),
            FnCall { callee, args } => write!(f, "({} {} {})", FUNCALL_FORM, callee, args),
            Native(name, _) => write!(f, "#<native {}>", name),
            Error(message) => write!(f, "{}", message),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    MalformedNumber(String),
    /// RightParenExpected carries the token found where a closing
    /// parenthesis was required.
    RightParenExpected(Token),
    /// ExpressionExpected indicates a fixed-arity form that ran out of
    /// sub-expressions before its arity was satisfied.
    ExpressionExpected,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MalformedNumber(text) => write!(f, "malformed number literal: {}", text),
            Error::RightParenExpected(token) => {
                write!(f, "right parenthesis expected but {:?} found", token)
            }
            Error::ExpressionExpected => write!(f, "expression expected but none found"),
        }
    }
}

impl convert::From<LexerError> for Error {
    fn from(lexer_error: LexerError) -> Self {
        match lexer_error {
            LexerError::MalformedNumber(text) => Error::MalformedNumber(text),
        }
    }
}

/// Parser materializes the full token sequence up front and then hands out
/// one top-level expression per call to `parse_next_expression`.
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let mut tokens = vec![];
        loop {
            let token = lexer.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }

        Ok(Self { tokens, cursor: 0 })
    }

    fn next_token(&mut self) -> Token {
        let token = self.tokens.get(self.cursor).cloned().unwrap_or(Token::Eof);
        self.cursor += 1;
        token
    }

    /// parse_next_expression returns the next expression in the program,
    /// or `None` once the token stream is exhausted. A closing parenthesis
    /// read where an expression was expected also yields `None`; `list`
    /// and the top-level driver rely on this as their terminator.
    pub fn parse_next_expression(&mut self) -> Result<Option<Expr>> {
        match self.next_token() {
            // The opening parenthesis is transparent: the token after it
            // decides the form.
            Token::LeftParen => self.parse_next_expression(),
            Token::RightParen => Ok(None),
            Token::Eof => Ok(None),
            Token::Number(value) => Ok(Some(Expr::Number(value))),
            Token::Str(value) => Ok(Some(Expr::Str(value))),
            Token::Plus => self.operator_form('+'),
            Token::Minus => self.operator_form('-'),
            Token::Star => self.operator_form('*'),
            Token::Slash => self.operator_form('/'),
            Token::Caret => self.operator_form('^'),
            Token::Identifier(name) => self.identifier_form(name),
        }
    }

    fn operator_form(&mut self, op: char) -> Result<Option<Expr>> {
        let left = self.expect_expr()?;
        let right = self.expect_expr()?;
        self.expect_right_paren()?;
        Ok(Some(Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    fn identifier_form(&mut self, name: String) -> Result<Option<Expr>> {
        let expr = match name.as_str() {
            DEF_FORM => {
                let target = self.expect_expr()?;
                let value = self.expect_expr()?;
                self.expect_right_paren()?;
                Expr::Define {
                    target: Box::new(target),
                    value: Box::new(value),
                }
            }
            LIST_FORM => {
                // Elements accumulate until the terminator; the closing
                // parenthesis is consumed by that terminating read.
                let mut elements = vec![];
                while let Some(element) = self.parse_next_expression()? {
                    elements.push(element);
                }
                Expr::List(elements)
            }
            LENGTH_FORM => {
                let of = self.expect_expr()?;
                self.expect_right_paren()?;
                Expr::Length(Box::new(of))
            }
            DUMP_FORM => {
                self.expect_right_paren()?;
                Expr::Dump
            }
            FN_FORM => {
                let params = self.expect_expr()?;
                let body = self.expect_expr()?;
                self.expect_right_paren()?;
                Expr::Fn(FnDecl {
                    params: Box::new(params),
                    body: Box::new(body),
                })
            }
            FUNCALL_FORM => {
                let callee = self.expect_expr()?;
                let args = self.expect_expr()?;
                self.expect_right_paren()?;
                Expr::FnCall {
                    callee: Box::new(callee),
                    args: Box::new(args),
                }
            }
            // Anything else is a plain variable reference.
            _ => Expr::Identifier(name),
        };
        Ok(Some(expr))
    }

    /// expect_expr is the single arity-validation point for fixed-arity
    /// forms: running out of sub-expressions is reported here.
    fn expect_expr(&mut self) -> Result<Expr> {
        self.parse_next_expression()?
            .ok_or(Error::ExpressionExpected)
    }

    fn expect_right_paren(&mut self) -> Result<()> {
        match self.next_token() {
            Token::RightParen => Ok(()),
            token => Err(Error::RightParenExpected(token)),
        }
    }
}
