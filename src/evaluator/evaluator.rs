use std::convert;
use std::convert::TryFrom;
use std::fmt;
use std::result;

use super::env::Env;
use crate::reader::{Error as ParserError, Expr, FnDecl, Number};

pub type Result<T> = result::Result<T, Error>;

/// Error is the propagated-failure channel: any of these unwinds to the
/// `run` caller. The in-band channel is `Expr::Error`, which evaluation
/// returns as an ordinary value.
#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    UnboundIdentifier(String),
    DivisionByZero,
    ExpectedNumber(Expr),
    ExpectedList(Expr),
    ExpectedIdentifier(Expr),
    NotCallable(String),
    /// MissingArgument indicates a call that supplied no value for the
    /// parameter at `position`.
    MissingArgument { param: String, position: usize },
    NativeFailure(String),
    Parser(ParserError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnboundIdentifier(name) => write!(f, "unbound identifier: {}", name),
            Error::DivisionByZero => write!(f, "division by zero"),
            Error::ExpectedNumber(expr) => write!(f, "expected a number but found {}", expr),
            Error::ExpectedList(expr) => write!(f, "expected a list but found {}", expr),
            Error::ExpectedIdentifier(expr) => {
                write!(f, "expected an identifier but found {}", expr)
            }
            Error::NotCallable(name) => write!(f, "{} is not a function", name),
            Error::MissingArgument { param, position } => {
                write!(f, "no argument for parameter {} at position {}", param, position)
            }
            Error::NativeFailure(message) => write!(f, "{}", message),
            Error::Parser(parser_error) => write!(f, "{}", parser_error),
        }
    }
}

impl convert::From<ParserError> for Error {
    fn from(parser_error: ParserError) -> Self {
        Error::Parser(parser_error)
    }
}

/// eval_expr produces the value of `expr` against `env`. Values are
/// themselves `Expr` nodes; function values evaluate to themselves.
pub fn eval_expr(expr: &Expr, env: &mut Env) -> Result<Expr> {
    use self::Expr::*;

    match expr {
        Number(n) => Ok(Number(*n)),
        Str(s) => Ok(Str(s.clone())),
        Identifier(name) => eval_identifier(name, env),
        BinaryOp { op, left, right } => eval_binary_op(*op, left, right, env),
        Define { target, value } => eval_define(target, value, env),
        List(elements) => {
            let values = elements
                .iter()
                .map(|element| eval_expr(element, env))
                .collect::<Result<Vec<_>>>()?;
            Ok(List(values))
        }
        Length(of) => eval_length(of, env),
        Dump => Ok(Str(env.to_string())),
        Fn(decl) => Ok(Fn(decl.clone())),
        FnCall { callee, args } => eval_call(callee, args, env),
        Native(name, host_fn) => Ok(Native(name.clone(), *host_fn)),
        Error(message) => Ok(Error(message.clone())),
    }
}

fn eval_identifier(name: &str, env: &mut Env) -> Result<Expr> {
    env.lookup(name)
        .cloned()
        .ok_or_else(|| Error::UnboundIdentifier(name.to_string()))
}

fn eval_binary_op(op: char, left: &Expr, right: &Expr, env: &mut Env) -> Result<Expr> {
    // An operator outside the defined set yields an `Error` *value*; the
    // operands are never evaluated.
    if !matches!(op, '+' | '-' | '*' | '/' | '^') {
        return Ok(Expr::Error(format!("Operator not defined yet: {}", op)));
    }

    let lhs = eval_number(left, env)?;
    let rhs = eval_number(right, env)?;
    apply_operator(op, lhs, rhs).map(Expr::Number)
}

fn eval_number(operand: &Expr, env: &mut Env) -> Result<Number> {
    match eval_expr(operand, env)? {
        Expr::Number(n) => Ok(n),
        other => Err(Error::ExpectedNumber(other)),
    }
}

/// apply_operator implements the arithmetic. Integer pairs stay integral
/// (wrapping, so no input can abort the host); mixed operands promote to
/// float. A zero divisor is a propagated failure for both representations.
fn apply_operator(op: char, lhs: Number, rhs: Number) -> Result<Number> {
    use self::Number::*;

    let value = match (op, lhs, rhs) {
        ('+', Int(a), Int(b)) => Int(a.wrapping_add(b)),
        ('-', Int(a), Int(b)) => Int(a.wrapping_sub(b)),
        ('*', Int(a), Int(b)) => Int(a.wrapping_mul(b)),
        ('/', Int(a), Int(b)) => {
            if b == 0 {
                return Err(Error::DivisionByZero);
            }
            Int(a.wrapping_div(b))
        }
        ('^', Int(a), Int(b)) => match u32::try_from(b) {
            Ok(exponent) => Int(a.wrapping_pow(exponent)),
            // A negative (or enormous) exponent leaves the integers.
            Err(_) => Float((a as f64).powf(b as f64)),
        },
        ('+', a, b) => Float(a.as_f64() + b.as_f64()),
        ('-', a, b) => Float(a.as_f64() - b.as_f64()),
        ('*', a, b) => Float(a.as_f64() * b.as_f64()),
        ('/', a, b) => {
            if b.is_zero() {
                return Err(Error::DivisionByZero);
            }
            Float(a.as_f64() / b.as_f64())
        }
        ('^', a, b) => Float(a.as_f64().powf(b.as_f64())),
        _ => unreachable!("operator {} is checked before dispatch", op),
    };
    Ok(value)
}

fn eval_define(target: &Expr, value: &Expr, env: &mut Env) -> Result<Expr> {
    let name = identifier_name(target)?.to_string();
    let value = eval_expr(value, env)?;
    env.define(name, value.clone());
    Ok(value)
}

fn eval_length(of: &Expr, env: &mut Env) -> Result<Expr> {
    let count = match eval_expr(of, env)? {
        Expr::List(elements) => elements.len(),
        Expr::Str(s) => s.chars().count(),
        other => return Err(Error::ExpectedList(other)),
    };
    Ok(Expr::Number(Number::Int(count as i64)))
}

fn eval_call(callee: &Expr, args: &Expr, env: &mut Env) -> Result<Expr> {
    let name = identifier_name(callee)?;
    let function = env
        .lookup(name)
        .cloned()
        .ok_or_else(|| Error::UnboundIdentifier(name.to_string()))?;
    let arg_exprs = list_elements(args)?;

    match function {
        Expr::Fn(decl) => apply_fn(&decl, arg_exprs),
        Expr::Native(_, host_fn) => {
            // Native routines receive the argument values evaluated
            // against the caller's environment; they see no environment
            // of their own.
            let values = arg_exprs
                .iter()
                .map(|arg| eval_expr(arg, env))
                .collect::<Result<Vec<_>>>()?;
            host_fn(values).map_err(Error::NativeFailure)
        }
        _ => Err(Error::NotCallable(name.to_string())),
    }
}

/// apply_fn evaluates an interpreted function call. The body runs against
/// a brand-new environment holding nothing but the parameters, which are
/// bound strictly left to right: each argument expression is evaluated
/// against the environment under construction, so a later argument may
/// reference an earlier parameter, and nothing outside the parameter list
/// is ever visible.
fn apply_fn(decl: &FnDecl, args: &[Expr]) -> Result<Expr> {
    let params = list_elements(&decl.params)?;
    let mut local = Env::new();

    for (position, param) in params.iter().enumerate() {
        let name = identifier_name(param)?.to_string();
        let arg = args.get(position).ok_or_else(|| Error::MissingArgument {
            param: name.clone(),
            position,
        })?;
        let value = eval_expr(arg, &mut local)?;
        local.define(name, value);
    }

    eval_expr(&decl.body, &mut local)
}

fn identifier_name(expr: &Expr) -> Result<&str> {
    match expr {
        Expr::Identifier(name) => Ok(name),
        other => Err(Error::ExpectedIdentifier(other.clone())),
    }
}

fn list_elements(expr: &Expr) -> Result<&[Expr]> {
    match expr {
        Expr::List(elements) => Ok(elements),
        other => Err(Error::ExpectedList(other.clone())),
    }
}
