//! Tree-walking interpreter over a closed set of bindings.
//!
//! The only names an expression can see are the ones bound in its [`Scope`]
//! plus the builtin table in [`crate::builtins`]. There is no way to reach
//! process state, the filesystem or the network from an expression.

use crate::ast::*;
use crate::builtins;
use crate::error::{EvalError, EvalResult};
use crate::parser::parse;
use crate::value::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Named bindings visible to an expression
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    bindings: BTreeMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style binding
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bind(name, value);
        self
    }

    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.bindings.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }
}

/// Evaluates expression trees against a scope
pub struct Interpreter<'s> {
    scope: &'s Scope,
}

impl<'s> Interpreter<'s> {
    pub fn new(scope: &'s Scope) -> Self {
        Self { scope }
    }

    pub fn evaluate(&self, expr: &Expression) -> EvalResult<Value> {
        match expr {
            Expression::Literal { value, .. } => Ok(Value::String(value.clone())),

            Expression::Number { value, .. } => Ok(Value::Number(*value)),

            Expression::Boolean { value, .. } => Ok(Value::Boolean(*value)),

            Expression::Null { .. } => Ok(Value::Null),

            Expression::Undefined { .. } => Ok(Value::Undefined),

            Expression::Variable { name, span } => {
                self.scope
                    .get(name)
                    .cloned()
                    .ok_or_else(|| EvalError::VariableNotFound {
                        name: name.clone(),
                        span: *span,
                    })
            }

            Expression::Member {
                object,
                property,
                span,
            } => {
                let target = self.evaluate(object)?;
                self.read_property(&target, property, *span)
            }

            Expression::Index {
                object,
                index,
                span,
            } => {
                let target = self.evaluate(object)?;
                let key = self.evaluate(index)?.to_string();
                self.read_property(&target, &key, *span)
            }

            Expression::Unary {
                operator, operand, ..
            } => {
                let value = self.evaluate(operand)?;
                Ok(match operator {
                    UnaryOp::Not => Value::Boolean(!value.is_truthy()),
                    UnaryOp::Negate => Value::Number(-value.to_number()),
                    UnaryOp::Plus => Value::Number(value.to_number()),
                })
            }

            Expression::Binary {
                left,
                operator,
                right,
                ..
            } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                Ok(binary(*operator, &left_val, &right_val))
            }

            Expression::Logical {
                left,
                operator,
                right,
                ..
            } => {
                let left_val = self.evaluate(left)?;
                let short_circuit = match operator {
                    LogicalOp::And => !left_val.is_truthy(),
                    LogicalOp::Or => left_val.is_truthy(),
                    LogicalOp::Coalesce => !left_val.is_nullish(),
                };

                if short_circuit {
                    Ok(left_val)
                } else {
                    self.evaluate(right)
                }
            }

            Expression::Conditional {
                test,
                consequent,
                alternate,
                ..
            } => {
                if self.evaluate(test)?.is_truthy() {
                    self.evaluate(consequent)
                } else {
                    self.evaluate(alternate)
                }
            }

            Expression::Call {
                callee,
                arguments,
                span,
            } => self.call(callee, arguments, *span),

            Expression::New {
                constructor,
                arguments,
                span,
            } => {
                let args = self.evaluate_arguments(arguments)?;
                builtins::construct(constructor, &args).ok_or_else(|| {
                    EvalError::UnknownConstructor {
                        name: constructor.clone(),
                        span: *span,
                    }
                })
            }
        }
    }

    fn read_property(&self, target: &Value, property: &str, span: Span) -> EvalResult<Value> {
        if target.is_nullish() {
            return Err(EvalError::PropertyOfNothing {
                property: property.to_string(),
                target: target.type_name(),
                span,
            });
        }
        Ok(target.get_property(property))
    }

    fn call(&self, callee: &Expression, arguments: &[Expression], span: Span) -> EvalResult<Value> {
        // Builtins resolve by path unless the root name is shadowed by a binding
        if let Some(path) = callee.path() {
            let root = path.split('.').next().unwrap_or_default();
            if !self.scope.contains(root) {
                let args = self.evaluate_arguments(arguments)?;
                return builtins::call_function(&path, &args)
                    .ok_or(EvalError::UnknownFunction { name: path, span });
            }
        }

        match callee {
            Expression::Member {
                object, property, ..
            } => {
                let target = self.evaluate(object)?;
                if target.is_nullish() {
                    return Err(EvalError::PropertyOfNothing {
                        property: property.clone(),
                        target: target.type_name(),
                        span,
                    });
                }
                let args = self.evaluate_arguments(arguments)?;
                builtins::call_method(&target, property, &args).ok_or_else(|| {
                    EvalError::UnknownFunction {
                        name: format!("{}.{}", target.type_name(), property),
                        span,
                    }
                })
            }
            other => Err(EvalError::TypeError {
                message: "expression is not callable".to_string(),
                span: other.span(),
            }),
        }
    }

    fn evaluate_arguments(&self, arguments: &[Expression]) -> EvalResult<Vec<Value>> {
        arguments.iter().map(|arg| self.evaluate(arg)).collect()
    }
}

fn binary(operator: BinaryOp, left: &Value, right: &Value) -> Value {
    match operator {
        BinaryOp::Add => match (left, right) {
            (Value::String(_), _)
            | (_, Value::String(_))
            | (Value::Array(_), _)
            | (_, Value::Array(_))
            | (Value::Object(_), _)
            | (_, Value::Object(_)) => Value::String(format!("{}{}", left, right)),
            _ => Value::Number(left.to_number() + right.to_number()),
        },
        BinaryOp::Subtract => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Multiply => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Divide => Value::Number(left.to_number() / right.to_number()),
        BinaryOp::Remainder => Value::Number(left.to_number() % right.to_number()),
        BinaryOp::Equals => Value::Boolean(left.loose_equals(right)),
        BinaryOp::NotEquals => Value::Boolean(!left.loose_equals(right)),
        BinaryOp::StrictEquals => Value::Boolean(left.strict_equals(right)),
        BinaryOp::StrictNotEquals => Value::Boolean(!left.strict_equals(right)),
        BinaryOp::LessThan => compare(left, right, |o| o == Ordering::Less),
        BinaryOp::LessThanOrEqual => compare(left, right, |o| o != Ordering::Greater),
        BinaryOp::GreaterThan => compare(left, right, |o| o == Ordering::Greater),
        BinaryOp::GreaterThanOrEqual => compare(left, right, |o| o != Ordering::Less),
    }
}

/// Relational comparison: strings compare lexicographically, everything else
/// numerically. Any NaN makes the comparison false.
fn compare(left: &Value, right: &Value, accept: impl Fn(Ordering) -> bool) -> Value {
    let ordering = match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    };
    Value::Boolean(ordering.map(accept).unwrap_or(false))
}

/// Parse and evaluate an expression source in one step
pub fn evaluate(source: &str, scope: &Scope) -> EvalResult<Value> {
    let expr = parse(source)?;
    Interpreter::new(scope).evaluate(&expr)
}
