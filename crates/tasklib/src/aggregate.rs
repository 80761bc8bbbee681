use crate::compare::Operator;
use async_trait::async_trait;
use taskcore::{
    object, InputExt, ParamConfig, ParamType, Task, TaskConfig, TaskError, TaskInput, Value,
};

/// Keep the array items whose field matches a condition
pub struct FilterTask;

#[async_trait]
impl Task for FilterTask {
    fn task_type(&self) -> &str {
        "filter"
    }

    fn config(&self) -> TaskConfig {
        TaskConfig {
            id: "filter".to_string(),
            name: "Filter".to_string(),
            category: "transform".to_string(),
            description: "Filter array items by condition".to_string(),
            params: vec![
                ParamConfig::new("data", ParamType::Json, "Data")
                    .with_description("Array to filter; defaults to the previous step's output"),
                ParamConfig::new("field", ParamType::String, "Field")
                    .required()
                    .with_description("Item field to test, nested with dots"),
                ParamConfig::new("operator", ParamType::Select, "Operator")
                    .required()
                    .with_default("equals")
                    .with_labeled_options(&Operator::ALL),
                ParamConfig::new("value", ParamType::String, "Value"),
            ],
        }
    }

    async fn execute(&self, input: TaskInput) -> Result<Value, TaskError> {
        let items = require_array(&input)?;
        let field = input.str_or("field", "");
        let operator: Operator = input.str_or("operator", "equals").parse()?;
        let compare = input.get("value");

        let filtered: Vec<Value> = items
            .iter()
            .filter(|item| operator.evaluate_strict(field_of(item, field), compare))
            .cloned()
            .collect();

        Ok(object! {
            "count" => filtered.len(),
            "filtered" => filtered,
            "original" => items.len(),
        })
    }
}

/// Aggregate operations over an array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Aggregation {
    Count,
    Distinct,
    Numeric(Statistic),
}

/// Operations over the numeric values of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Statistic {
    Sum,
    Avg,
    Max,
    Min,
}

impl Aggregation {
    fn parse(s: &str) -> Result<Self, TaskError> {
        match s {
            "count" => Ok(Aggregation::Count),
            "distinct" => Ok(Aggregation::Distinct),
            "sum" => Ok(Aggregation::Numeric(Statistic::Sum)),
            "avg" => Ok(Aggregation::Numeric(Statistic::Avg)),
            "max" => Ok(Aggregation::Numeric(Statistic::Max)),
            "min" => Ok(Aggregation::Numeric(Statistic::Min)),
            other => Err(TaskError::Configuration(format!(
                "unknown aggregate operation: {}",
                other
            ))),
        }
    }
}

impl Statistic {
    fn as_str(&self) -> &'static str {
        match self {
            Statistic::Sum => "sum",
            Statistic::Avg => "avg",
            Statistic::Max => "max",
            Statistic::Min => "min",
        }
    }

    /// `numbers` must be non-empty.
    fn apply(&self, numbers: &[f64]) -> f64 {
        let values = numbers.iter().copied();
        match self {
            Statistic::Sum => values.sum(),
            Statistic::Avg => values.sum::<f64>() / numbers.len() as f64,
            Statistic::Max => values.fold(f64::NEG_INFINITY, f64::max),
            Statistic::Min => values.fold(f64::INFINITY, f64::min),
        }
    }
}

/// Count, sum, average, extremes or distinct values of an array field
pub struct AggregateTask;

#[async_trait]
impl Task for AggregateTask {
    fn task_type(&self) -> &str {
        "aggregate"
    }

    fn config(&self) -> TaskConfig {
        TaskConfig {
            id: "aggregate".to_string(),
            name: "Aggregate".to_string(),
            category: "transform".to_string(),
            description: "Compute statistics over an array".to_string(),
            params: vec![
                ParamConfig::new("data", ParamType::Json, "Data")
                    .with_description("Array to aggregate; defaults to the previous step's output"),
                ParamConfig::new("operation", ParamType::Select, "Operation")
                    .required()
                    .with_default("count")
                    .with_labeled_options(&[
                        ("Count", "count"),
                        ("Sum", "sum"),
                        ("Average", "avg"),
                        ("Maximum", "max"),
                        ("Minimum", "min"),
                        ("Distinct", "distinct"),
                    ]),
                ParamConfig::new("field", ParamType::String, "Field")
                    .with_description("Item field to aggregate (not needed for count)"),
            ],
        }
    }

    async fn execute(&self, input: TaskInput) -> Result<Value, TaskError> {
        let items = require_array(&input)?;
        let operation = Aggregation::parse(input.str_or("operation", "count"))?;

        match operation {
            Aggregation::Count => Ok(object! { "count" => items.len() }),
            Aggregation::Distinct => {
                let field = input.require_str("field", "field")?;
                let mut seen: Vec<Value> = Vec::new();
                for value in field_values(items, field) {
                    if !seen.contains(value) {
                        seen.push(value.clone());
                    }
                }
                Ok(object! { "count" => seen.len(), "distinct" => seen })
            }
            Aggregation::Numeric(statistic) => {
                let field = input.require_str("field", "field")?;
                let numbers = numbers(&field_values(items, field));
                if numbers.is_empty() {
                    return Err(TaskError::ExecutionFailed(
                        "no numeric values to aggregate".to_string(),
                    ));
                }

                Ok(object! {
                    statistic.as_str() => statistic.apply(&numbers),
                    "count" => numbers.len(),
                })
            }
        }
    }
}

/// `data` from the input or the previous step; must be an array.
fn require_array(input: &TaskInput) -> Result<&Vec<Value>, TaskError> {
    match input.value_or_previous("data") {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(TaskError::invalid_type("data", "array", other)),
        None => Err(TaskError::invalid_type("data", "array", &Value::Null)),
    }
}

/// An empty field name selects the item itself.
fn field_of<'a>(item: &'a Value, field: &str) -> Option<&'a Value> {
    if field.is_empty() {
        Some(item)
    } else {
        item.get_path(field)
    }
}

fn field_values<'a>(items: &'a [Value], field: &str) -> Vec<&'a Value> {
    items.iter().filter_map(|item| field_of(item, field)).collect()
}

/// Numbers and numeric strings; anything else is skipped.
fn numbers(values: &[&Value]) -> Vec<f64> {
    values
        .iter()
        .filter_map(|value| match value {
            Value::Number(n) => Some(*n),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskcore::PREVIOUS_KEY;

    fn orders() -> Value {
        Value::Array(vec![
            object! { "id" => 1.0, "status" => "paid", "total" => 10.0 },
            object! { "id" => 2.0, "status" => "open", "total" => "5.5" },
            object! { "id" => 3.0, "status" => "paid", "total" => 4.5 },
            object! { "id" => 4.0, "status" => "void" },
        ])
    }

    fn input(pairs: Vec<(&str, Value)>) -> TaskInput {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[tokio::test]
    async fn filters_matching_items() {
        let input = input(vec![
            ("data", orders()),
            ("field", Value::from("status")),
            ("value", Value::from("paid")),
        ]);

        let data = FilterTask.execute(input).await.unwrap();

        assert_eq!(data.get_path("count"), Some(&Value::Number(2.0)));
        assert_eq!(data.get_path("original"), Some(&Value::Number(4.0)));
    }

    #[tokio::test]
    async fn no_matches_gives_empty_array() {
        let input = input(vec![
            ("data", orders()),
            ("field", Value::from("total")),
            ("operator", Value::from("gt")),
            ("value", Value::from("100")),
        ]);

        let data = FilterTask.execute(input).await.unwrap();

        assert_eq!(data.get_path("filtered"), Some(&Value::Array(vec![])));
    }

    #[tokio::test]
    async fn filter_reads_previous_output() {
        let input = input(vec![
            ("field", Value::from("")),
            ("operator", Value::from("gte")),
            ("value", Value::Number(2.0)),
            (
                PREVIOUS_KEY,
                object! {
                    "src" => object! {
                        "error" => "",
                        "data" => Value::Array(vec![Value::Number(1.0), Value::Number(3.0)]),
                    }
                },
            ),
        ]);

        let data = FilterTask.execute(input).await.unwrap();

        assert_eq!(
            data.get_path("filtered"),
            Some(&Value::Array(vec![Value::Number(3.0)]))
        );
    }

    #[tokio::test]
    async fn filter_equality_is_type_strict() {
        let data = Value::Array(vec![
            object! { "code" => 5.0 },
            object! { "code" => "5" },
            object! { "code" => "05" },
        ]);
        let input = input(vec![
            ("data", data),
            ("field", Value::from("code")),
            ("value", Value::Number(5.0)),
        ]);

        let data = FilterTask.execute(input).await.unwrap();

        assert_eq!(
            data.get_path("filtered"),
            Some(&Value::Array(vec![object! { "code" => 5.0 }]))
        );
    }

    #[tokio::test]
    async fn filter_requires_an_array() {
        let input = input(vec![("data", Value::from("nope")), ("field", Value::from("x"))]);

        let err = FilterTask.execute(input).await.unwrap_err();

        assert!(matches!(err, TaskError::InvalidInputType { .. }));
    }

    #[tokio::test]
    async fn numeric_aggregates() {
        for (operation, expected) in [
            ("sum", 20.0),
            ("avg", 20.0 / 3.0),
            ("max", 10.0),
            ("min", 4.5),
        ] {
            let input = input(vec![
                ("data", orders()),
                ("operation", Value::from(operation)),
                ("field", Value::from("total")),
            ]);

            let data = AggregateTask.execute(input).await.unwrap();

            assert_eq!(
                data,
                object! { operation => expected, "count" => 3.0 },
                "{}",
                operation
            );
        }
    }

    #[tokio::test]
    async fn count_and_distinct() {
        let count = AggregateTask
            .execute(input(vec![("data", orders())]))
            .await
            .unwrap();
        assert_eq!(count, object! { "count" => 4.0 });

        let distinct = AggregateTask
            .execute(input(vec![
                ("data", orders()),
                ("operation", Value::from("distinct")),
                ("field", Value::from("status")),
            ]))
            .await
            .unwrap();
        assert_eq!(
            distinct.get_path("distinct"),
            Some(&Value::Array(vec![
                Value::from("paid"),
                Value::from("open"),
                Value::from("void"),
            ]))
        );
        assert_eq!(distinct.get_path("count"), Some(&Value::Number(3.0)));
    }

    #[tokio::test]
    async fn no_numeric_values_is_an_error() {
        for data in [
            Value::Array(vec![]),
            Value::Array(vec![object! { "total" => "n/a" }, object! { "id" => 1.0 }]),
        ] {
            let input = input(vec![
                ("data", data),
                ("operation", Value::from("max")),
                ("field", Value::from("total")),
            ]);

            let err = AggregateTask.execute(input).await.unwrap_err();

            assert_eq!(
                err,
                TaskError::ExecutionFailed("no numeric values to aggregate".into())
            );
        }
    }

    #[tokio::test]
    async fn unknown_operation_is_rejected() {
        let input = input(vec![("data", orders()), ("operation", Value::from("median"))]);

        let err = AggregateTask.execute(input).await.unwrap_err();

        assert!(matches!(err, TaskError::Configuration(_)));
    }

    #[tokio::test]
    async fn field_is_required_beyond_count() {
        let input = input(vec![("data", orders()), ("operation", Value::from("sum"))]);

        let err = AggregateTask.execute(input).await.unwrap_err();

        assert_eq!(err, TaskError::MissingField("field".into()));
    }
}
