use crate::constants::limits::SUGGESTION_LIMIT;
use crate::errors::NodeError;
use crate::utils::suggest::suggest;

pub fn unknown_operation_error(operation: &str, known_operations: &[&str]) -> NodeError {
    let suggestions = suggest(operation, known_operations, SUGGESTION_LIMIT);

    let mut hint_parts = Vec::new();
    if !suggestions.is_empty() {
        hint_parts.push(format!("Did you mean: {}?", suggestions.join(", ")));
    }
    if !known_operations.is_empty() {
        hint_parts.push(format!("Use one of: {}.", known_operations.join(", ")));
    }

    let mut err = NodeError::unknown_operation(format!(
        "The operation \"{}\" is not known",
        operation
    ));
    if !hint_parts.is_empty() {
        err = err.with_hint(hint_parts.join(" "));
    }
    err.with_details(serde_json::json!({
        "operation": operation,
        "known_operations": known_operations,
        "did_you_mean": suggestions,
    }))
}
