use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;

use crate::reader::Expr;

type Scope = HashMap<String, Expr>;

/// Env is a flat mapping from variable name to value. There is no parent
/// scope: a function call builds a brand-new empty `Env` holding only the
/// call's parameters, which is what makes functions closure-free.
#[derive(Debug, Default)]
pub struct Env {
    bindings: Scope,
}

impl Env {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// define stores `value` under `name`, silently overwriting any
    /// previous binding. This is the only mutation path into an
    /// environment.
    pub fn define(&mut self, name: impl Into<String>, value: Expr) {
        self.bindings.insert(name.into(), value);
    }

    pub fn lookup(&self, name: &str) -> Option<&Expr> {
        self.bindings.get(name)
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Keys are sorted so the rendering is stable.
        write!(
            f,
            "{{{}}}",
            self.bindings
                .iter()
                .sorted_by(|(a, _), (b, _)| a.cmp(b))
                .map(|(k, v)| format!("{}: {}", k, v))
                .format(", ")
        )
    }
}
