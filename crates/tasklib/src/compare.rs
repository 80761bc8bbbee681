use std::str::FromStr;
use taskcore::{TaskError, Value};

/// Comparison operators shared by `if-condition` and `filter`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    IsEmpty,
    IsNotEmpty,
}

impl Operator {
    pub const ALL: [(&'static str, &'static str); 9] = [
        ("Equals", "equals"),
        ("Not equals", "notEquals"),
        ("Greater than", "gt"),
        ("Greater or equal", "gte"),
        ("Less than", "lt"),
        ("Less or equal", "lte"),
        ("Contains", "contains"),
        ("Is empty", "isEmpty"),
        ("Is not empty", "isNotEmpty"),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Contains => "contains",
            Operator::IsEmpty => "isEmpty",
            Operator::IsNotEmpty => "isNotEmpty",
        }
    }

    /// Evaluate `field <op> compare`; a missing value is treated as null.
    ///
    /// Equality is loose: structurally equal values match, and so do values
    /// whose display strings match (`5` equals `"5"`). Ordering operators
    /// coerce both sides to numbers.
    pub fn evaluate(&self, field: Option<&Value>, compare: Option<&Value>) -> bool {
        let field = field.unwrap_or(&Value::Null);
        let compare = compare.unwrap_or(&Value::Null);

        match self {
            Operator::Equals => loose_eq(field, compare),
            Operator::NotEquals => !loose_eq(field, compare),
            Operator::Contains => field.to_string().contains(&compare.to_string()),
            Operator::IsEmpty => field.is_empty(),
            Operator::IsNotEmpty => !field.is_empty(),
            Operator::Gt => field.coerce_f64() > compare.coerce_f64(),
            Operator::Gte => field.coerce_f64() >= compare.coerce_f64(),
            Operator::Lt => field.coerce_f64() < compare.coerce_f64(),
            Operator::Lte => field.coerce_f64() <= compare.coerce_f64(),
        }
    }

    /// Like [`Operator::evaluate`], but equality is structural and
    /// `contains` only matches a string field against a string value.
    pub fn evaluate_strict(&self, field: Option<&Value>, compare: Option<&Value>) -> bool {
        let field = field.unwrap_or(&Value::Null);
        let compare = compare.unwrap_or(&Value::Null);

        match self {
            Operator::Equals => field == compare,
            Operator::NotEquals => field != compare,
            Operator::Contains => match (field, compare) {
                (Value::String(s), Value::String(sub)) => s.contains(sub.as_str()),
                _ => false,
            },
            _ => self.evaluate(Some(field), Some(compare)),
        }
    }
}

impl FromStr for Operator {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equals" => Ok(Operator::Equals),
            "notEquals" => Ok(Operator::NotEquals),
            "gt" => Ok(Operator::Gt),
            "gte" => Ok(Operator::Gte),
            "lt" => Ok(Operator::Lt),
            "lte" => Ok(Operator::Lte),
            "contains" => Ok(Operator::Contains),
            "isEmpty" => Ok(Operator::IsEmpty),
            "isNotEmpty" => Ok(Operator::IsNotEmpty),
            other => Err(TaskError::Configuration(format!(
                "unknown operator: {}",
                other
            ))),
        }
    }
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    a == b || a.to_string() == b.to_string()
}
