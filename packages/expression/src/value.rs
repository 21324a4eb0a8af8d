use serde_json::Number as JsonNumber;
use std::collections::BTreeMap;
use std::fmt;

/// Runtime value
///
/// Mirrors the value space of the form data model (JSON) plus `Undefined`,
/// which marks a missing property or a failed evaluation and is never written
/// back into a model.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Numeric conversion used by arithmetic and relational operators
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
            Value::Array(items) => match items.as_slice() {
                [] => 0.0,
                [single] => single.to_number(),
                _ => f64::NAN,
            },
            Value::Object(_) => f64::NAN,
        }
    }

    /// Strict equality (`===`); arrays and objects compare structurally
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            _ => self == other,
        }
    }

    /// Loose equality (`==`)
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
            (Value::Number(_), Value::String(_))
            | (Value::String(_), Value::Number(_))
            | (Value::Boolean(_), _)
            | (_, Value::Boolean(_)) => self.to_number() == other.to_number(),
            _ => self.strict_equals(other),
        }
    }

    /// Property lookup; missing properties read as `Undefined`
    pub fn get_property(&self, property: &str) -> Value {
        match self {
            Value::Object(map) => map.get(property).cloned().unwrap_or_default(),
            Value::Array(items) if property == "length" => Value::Number(items.len() as f64),
            Value::Array(items) => property
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i).cloned())
                .unwrap_or_default(),
            Value::String(s) if property == "length" => Value::Number(s.chars().count() as f64),
            _ => Value::Undefined,
        }
    }

    /// Convert to JSON; `Undefined` has no JSON form
    pub fn to_json(&self) -> Option<serde_json::Value> {
        Some(match self {
            Value::Undefined => return None,
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| item.to_json().unwrap_or(serde_json::Value::Null))
                    .collect(),
            ),
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .filter_map(|(k, v)| v.to_json().map(|json| (k.clone(), json)))
                    .collect(),
            ),
        })
    }
}

/// Largest integer an f64 holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serde_json::Value::Number(JsonNumber::from(n as i64))
    } else {
        JsonNumber::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        format!("{}", n as i64)
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    if !item.is_nullish() {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => write!(f, "[object Object]"),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from(&json)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::Array(vec![]).is_truthy());
        assert!(Value::Object(BTreeMap::new()).is_truthy());
    }

    #[test]
    fn test_number_conversion() {
        assert_eq!(Value::from(" 42 ").to_number(), 42.0);
        assert_eq!(Value::from("").to_number(), 0.0);
        assert!(Value::from("abc").to_number().is_nan());
        assert_eq!(Value::Boolean(true).to_number(), 1.0);
        assert_eq!(Value::Null.to_number(), 0.0);
        assert!(Value::Undefined.to_number().is_nan());
    }

    #[test]
    fn test_loose_equality() {
        assert!(Value::Null.loose_equals(&Value::Undefined));
        assert!(Value::Number(1.0).loose_equals(&Value::from("1")));
        assert!(Value::Boolean(true).loose_equals(&Value::Number(1.0)));
        assert!(!Value::Null.loose_equals(&Value::Number(0.0)));
        assert!(!Value::Number(f64::NAN).loose_equals(&Value::Number(f64::NAN)));
    }

    #[test]
    fn test_strict_equality() {
        assert!(!Value::Number(1.0).strict_equals(&Value::from("1")));
        assert!(!Value::Null.strict_equals(&Value::Undefined));
        assert!(Value::from("a").strict_equals(&Value::from("a")));
    }

    #[test]
    fn test_display_matches_form_conventions() {
        assert_eq!(Value::Number(5.0).to_string(), "5");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(
            Value::Array(vec![Value::Number(1.0), Value::Null, Value::from("x")]).to_string(),
            "1,,x"
        );
    }

    #[test]
    fn test_display_large_integers() {
        assert_eq!(Value::Number(1e20).to_string(), "100000000000000000000");
        assert_eq!(Value::Number(-1e19).to_string(), "-10000000000000000000");
        assert_eq!(
            Value::Number(9_007_199_254_740_991.0).to_string(),
            "9007199254740991"
        );
    }

    #[test]
    fn test_json_conversion() {
        let json = json!({"days": 5, "ratio": 0.5, "tags": ["a", null], "ok": true});
        let value = Value::from(&json);
        assert_eq!(value.get_property("days"), Value::Number(5.0));
        assert_eq!(value.to_json(), Some(json));
        assert_eq!(Value::Undefined.to_json(), None);
        assert_eq!(Value::Number(f64::NAN).to_json(), Some(serde_json::Value::Null));
    }

    #[test]
    fn test_property_lookup() {
        let items = Value::Array(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(items.get_property("length"), Value::Number(2.0));
        assert_eq!(items.get_property("1"), Value::from("b"));
        assert_eq!(items.get_property("7"), Value::Undefined);
        assert_eq!(Value::from("héllo").get_property("length"), Value::Number(5.0));
    }
}
