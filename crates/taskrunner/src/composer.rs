use std::collections::{BTreeMap, HashMap};
use taskcore::{TaskInput, TaskOutput, Value, WorkflowEdge, PREVIOUS_KEY};

/// Predecessor ids of `node_id`, in edge order, without repeats
pub fn predecessors<'a>(node_id: &str, edges: &'a [WorkflowEdge]) -> Vec<&'a str> {
    let mut result: Vec<&str> = Vec::new();
    for edge in edges.iter().filter(|edge| edge.target == node_id) {
        if !result.contains(&edge.source.as_str()) {
            result.push(edge.source.as_str());
        }
    }
    result
}

/// Build the concrete input for a node.
///
/// Static config has the lowest precedence. With any predecessor, the
/// reserved `$previous` key maps each recorded predecessor id to its
/// `{error, data}` record. With exactly one predecessor whose data is an
/// object, that object's fields are also merged into the top level where
/// config has not already set them. Neither `config` nor `prior_outputs`
/// is modified.
pub fn compose_input(
    node_id: &str,
    config: &TaskInput,
    edges: &[WorkflowEdge],
    prior_outputs: &HashMap<String, TaskOutput>,
) -> TaskInput {
    let mut input = config.clone();

    let preds = predecessors(node_id, edges);
    if preds.is_empty() {
        return input;
    }

    let previous: BTreeMap<String, Value> = preds
        .iter()
        .filter_map(|pred| {
            prior_outputs
                .get(*pred)
                .map(|output| (pred.to_string(), output.to_record()))
        })
        .collect();
    input.insert(PREVIOUS_KEY.to_string(), Value::Object(previous));

    if let [only] = preds.as_slice() {
        let data = prior_outputs.get(*only).and_then(|o| o.data.as_ref());
        if let Some(Value::Object(fields)) = data {
            for (key, value) in fields {
                input.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
    }

    input
}
