use crate::compare::Operator;
use async_trait::async_trait;
use taskcore::{
    object, InputExt, ParamConfig, ParamType, Task, TaskConfig, TaskError, TaskInput, Value,
};

/// Gate a workflow on a field comparison.
///
/// An unmet condition is a failure, which stops the run at this node.
pub struct IfConditionTask;

#[async_trait]
impl Task for IfConditionTask {
    fn task_type(&self) -> &str {
        "if-condition"
    }

    fn config(&self) -> TaskConfig {
        TaskConfig {
            id: "if-condition".to_string(),
            name: "Condition".to_string(),
            category: "condition".to_string(),
            description: "Continue only when a condition holds".to_string(),
            params: vec![
                ParamConfig::new("field", ParamType::String, "Field")
                    .required()
                    .with_description("Field path to test, nested with dots (e.g. data.value)"),
                ParamConfig::new("operator", ParamType::Select, "Operator")
                    .required()
                    .with_default("equals")
                    .with_labeled_options(&Operator::ALL),
                ParamConfig::new("value", ParamType::String, "Value")
                    .with_description("Value to compare against"),
                ParamConfig::new("sourceData", ParamType::Json, "Source data")
                    .with_description("Data to test; defaults to the previous step's output"),
            ],
        }
    }

    async fn execute(&self, input: TaskInput) -> Result<Value, TaskError> {
        let field = input.require_str("field", "field")?;
        let operator: Operator = input.str_or("operator", "equals").parse()?;
        let compare = input.get("value").cloned().unwrap_or(Value::Null);

        let field_value = match input.value_or_previous("sourceData") {
            Some(source) => source.get_path(field).cloned(),
            None => Value::Object(input.clone()).get_path(field).cloned(),
        };

        let holds = operator.evaluate(field_value.as_ref(), Some(&compare));
        let field_value = field_value.unwrap_or(Value::Null);

        if !holds {
            return Err(TaskError::Rejected {
                message: format!("condition not met: {} {} {}", field, operator.as_str(), compare),
                data: object! {
                    "condition" => false,
                    "field" => field,
                    "operator" => operator.as_str(),
                    "value" => compare,
                    "fieldValue" => field_value,
                },
            });
        }

        Ok(object! {
            "condition" => true,
            "field" => field,
            "operator" => operator.as_str(),
            "value" => compare,
            "fieldValue" => field_value,
            "message" => "condition met, continuing",
        })
    }
}
