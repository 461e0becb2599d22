use std::io;

use crate::evaluator::Result;
use crate::reader::Expr;

/// render turns the outcome of a `run` call into the single string the
/// hosting collaborator forwards to the user: the value of the last form,
/// nothing for an empty program, or the failure's message.
pub fn render(result: &Result<Option<Expr>>) -> String {
    match result {
        Ok(Some(expr)) => expr.to_string(),
        Ok(None) => String::new(),
        Err(e) => e.to_string(),
    }
}

pub fn println_to(mut out: impl io::Write, result: &Result<Option<Expr>>) -> io::Result<()> {
    writeln!(&mut out, "{}", render(result))
}
