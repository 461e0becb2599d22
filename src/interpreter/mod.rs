use crate::evaluator::{eval_expr, prelude, Env, Result};
use crate::reader::{Expr, HostFn, Parser};

/// Interpreter is the front-end the hosting application talks to. It owns
/// one environment that persists across calls to [`Interpreter::run`], so
/// top-level `def` bindings made by one program remain visible to the
/// next. A single instance assumes sequential use; callers running from
/// several threads must synchronize externally.
#[derive(Debug, Default)]
pub struct Interpreter {
    env: Env,
}

impl Interpreter {
    pub fn new() -> Self {
        Self { env: Env::new() }
    }

    /// with_prelude returns an interpreter with the native statistics
    /// routines (`sum`, `mean`, `median`, `quantile`, `sample`) already
    /// registered.
    pub fn with_prelude() -> Self {
        let mut interpreter = Self::new();
        prelude::install(&mut interpreter.env);
        interpreter
    }

    /// register_native installs a host routine under `name`, silently
    /// overwriting any existing binding. From the language it is invoked
    /// as `(funcall <name> (list ...))`.
    pub fn register_native(&mut self, name: &str, host_fn: HostFn) {
        self.env
            .define(name, Expr::Native(name.to_string(), host_fn));
    }

    /// run parses `source` and evaluates every top-level form against the
    /// persistent environment, returning the value of the last form, or
    /// `None` for an empty program. The first failure, whether from
    /// parsing or evaluation, unwinds to the caller; in-band
    /// `Expr::Error` values do not.
    pub fn run(&mut self, source: &str) -> Result<Option<Expr>> {
        let mut parser = Parser::new(source)?;

        let mut result = None;
        while let Some(expr) = parser.parse_next_expression()? {
            result = Some(eval_expr(&expr, &mut self.env)?);
        }
        Ok(result)
    }
}
