//! An embeddable expression language with a fully-parenthesized prefix
//! syntax: `(+ 1 2)`, `(def x 5)`, `(funcall f (list 1 2))`.
//!
//! The hosting application drives everything through [`Interpreter`]: it
//! submits program text to [`Interpreter::run`] and may expose native
//! routines to the language with [`Interpreter::register_native`]. The
//! environment owned by an `Interpreter` persists across calls to `run`,
//! so top-level `def` bindings accumulate for the lifetime of the
//! instance.

pub mod evaluator;
pub mod interpreter;
pub mod printer;
pub mod reader;
pub mod repl;

pub use crate::interpreter::Interpreter;
pub use crate::reader::{Expr, HostFn, Number};
