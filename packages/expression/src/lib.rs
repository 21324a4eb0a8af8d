//! # Formwork Expressions
//!
//! A small, closed expression language for form rules: conditional
//! visibility, computed fields and field-to-field assignments.
//!
//! ```text
//! source ──tokenize──▶ tokens ──parse──▶ Expression ──Interpreter + Scope──▶ Value
//! ```
//!
//! Expressions read like the snippets form authors already write
//! (`model.days > 3 && !locked`, `Math.ceil(x / 2)`,
//! `new Date(model.endDate) - new Date(model.startDate)`) but are evaluated by
//! a tree-walking interpreter over an explicit [`Scope`]; nothing outside the
//! scope and the builtin table is reachable.
//!
//! ## Usage
//!
//! ```rust
//! use formwork_expression::{evaluate, Scope, Value};
//! use serde_json::json;
//!
//! let scope = Scope::new().with("model", json!({"days": 4}));
//! let value = evaluate("model.days > 3 ? 'long' : 'short'", &scope).unwrap();
//! assert_eq!(value, Value::from("long"));
//! ```

pub mod ast;
pub mod builtins;
pub mod error;
pub mod evaluator;
pub mod interpreter;
pub mod parser;
pub mod tokenizer;
pub mod value;

pub use ast::{Expression, Span};
pub use error::{EvalError, EvalResult, ParseError, ParseResult};
pub use evaluator::{
    AssignmentExpression, ComputedValues, ComputedVariable, ExpressionEvaluator, Model,
};
pub use interpreter::{evaluate, Interpreter, Scope};
pub use parser::{parse, Parser};
pub use tokenizer::{tokenize, Token};
pub use value::Value;
