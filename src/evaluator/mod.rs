mod env;
mod evaluator;
pub mod prelude;

pub use self::env::Env;
pub use self::evaluator::{eval_expr, Error, Result};
