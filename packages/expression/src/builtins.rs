//! Closed table of functions, constructors and methods callable from
//! expressions. Anything not listed here is rejected by the interpreter.

use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Names of all builtin functions, for diagnostics
pub const FUNCTIONS: &[&str] = &[
    "Math.abs",
    "Math.ceil",
    "Math.floor",
    "Math.max",
    "Math.min",
    "Math.round",
    "Math.trunc",
    "Number",
    "String",
    "Boolean",
    "parseFloat",
    "parseInt",
    "isNaN",
    "Date.now",
    "Date.parse",
];

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

fn num_arg(args: &[Value], index: usize) -> f64 {
    args.get(index).map(Value::to_number).unwrap_or(f64::NAN)
}

/// Call a builtin function by its dotted path
pub fn call_function(path: &str, args: &[Value]) -> Option<Value> {
    let value = match path {
        "Math.abs" => Value::Number(num_arg(args, 0).abs()),
        "Math.ceil" => Value::Number(num_arg(args, 0).ceil()),
        "Math.floor" => Value::Number(num_arg(args, 0).floor()),
        "Math.trunc" => Value::Number(num_arg(args, 0).trunc()),
        // Halves round towards positive infinity
        "Math.round" => Value::Number((num_arg(args, 0) + 0.5).floor()),
        "Math.max" => Value::Number(fold_numbers(args, f64::NEG_INFINITY, f64::max)),
        "Math.min" => Value::Number(fold_numbers(args, f64::INFINITY, f64::min)),
        "Number" => Value::Number(if args.is_empty() { 0.0 } else { num_arg(args, 0) }),
        "String" => Value::String(if args.is_empty() {
            String::new()
        } else {
            arg(args, 0).to_string()
        }),
        "Boolean" => Value::Boolean(arg(args, 0).is_truthy()),
        "parseFloat" => Value::Number(parse_float_prefix(&arg(args, 0).to_string())),
        "parseInt" => Value::Number(parse_float_prefix(&arg(args, 0).to_string()).trunc()),
        "isNaN" => Value::Boolean(num_arg(args, 0).is_nan()),
        "Date.now" => Value::Number(Utc::now().timestamp_millis() as f64),
        "Date.parse" => Value::Number(parse_date(&arg(args, 0).to_string())),
        _ => return None,
    };
    Some(value)
}

/// Construct a builtin object. Dates are represented by their epoch
/// milliseconds so they can be subtracted and compared directly.
pub fn construct(name: &str, args: &[Value]) -> Option<Value> {
    match name {
        "Date" => Some(Value::Number(match args.first() {
            None => Utc::now().timestamp_millis() as f64,
            Some(Value::Number(ms)) => *ms,
            Some(other) => parse_date(&other.to_string()),
        })),
        _ => None,
    }
}

/// Call a method on a string, array or number value
pub fn call_method(target: &Value, method: &str, args: &[Value]) -> Option<Value> {
    let value = match (target, method) {
        (Value::String(s), "trim") => Value::String(s.trim().to_string()),
        (Value::String(s), "toUpperCase") => Value::String(s.to_uppercase()),
        (Value::String(s), "toLowerCase") => Value::String(s.to_lowercase()),
        (Value::String(s), "includes") => Value::Boolean(s.contains(&arg(args, 0).to_string())),
        (Value::String(s), "startsWith") => {
            Value::Boolean(s.starts_with(&arg(args, 0).to_string()))
        }
        (Value::String(s), "endsWith") => Value::Boolean(s.ends_with(&arg(args, 0).to_string())),
        (Value::Array(items), "includes") => {
            let needle = arg(args, 0);
            Value::Boolean(items.iter().any(|item| item.strict_equals(&needle)))
        }
        (Value::Array(items), "join") => {
            let separator = match args.first() {
                None | Some(Value::Undefined) => ",".to_string(),
                Some(sep) => sep.to_string(),
            };
            Value::String(
                items
                    .iter()
                    .map(|item| {
                        if item.is_nullish() {
                            String::new()
                        } else {
                            item.to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(&separator),
            )
        }
        (Value::Number(n), "toFixed") => {
            let digits = num_arg(args, 0);
            let digits = if digits.is_nan() { 0 } else { digits.clamp(0.0, 100.0) as usize };
            Value::String(format!("{:.*}", digits, n))
        }
        (_, "toString") => Value::String(target.to_string()),
        _ => return None,
    };
    Some(value)
}

fn fold_numbers(args: &[Value], init: f64, f: fn(f64, f64) -> f64) -> f64 {
    let mut acc = init;
    for value in args {
        let n = value.to_number();
        if n.is_nan() {
            return f64::NAN;
        }
        acc = f(acc, n);
    }
    acc
}

/// Parse the longest numeric prefix ("12px" -> 12)
fn parse_float_prefix(s: &str) -> f64 {
    let trimmed = s.trim_start();
    let mut end = 0;
    for (i, ch) in trimmed.char_indices() {
        let accepted = ch.is_ascii_digit()
            || (ch == '.' && !trimmed[..i].contains('.'))
            || ((ch == '-' || ch == '+') && i == 0);
        if !accepted {
            break;
        }
        end = i + ch.len_utf8();
    }
    trimmed[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse a date string to epoch milliseconds (UTC), NaN when unparseable
pub fn parse_date(s: &str) -> f64 {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.timestamp_millis() as f64;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return dt.and_utc().timestamp_millis() as f64;
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return dt.and_utc().timestamp_millis() as f64;
            }
        }
    }

    f64::NAN
}
