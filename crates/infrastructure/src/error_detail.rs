use serde_json::Value;

/// Extracts a human-readable message from an ITSM error body.
///
/// Understands `{"detail": "..."}` and the validation shape
/// `{"detail": [{"loc": [...], "msg": "..."}]}`. Any other JSON object is
/// stringified; non-JSON bodies are returned trimmed. Returns `None` for an
/// empty body.
#[must_use]
pub fn extract_error_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(json) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.to_owned());
    };

    match json.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => Some(detail.clone()),
        Some(Value::Array(items)) => {
            let messages: Vec<String> = items.iter().filter_map(validation_item).collect();
            (!messages.is_empty()).then(|| messages.join(", "))
        }
        Some(Value::Null) | None => match &json {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Object(object) if !object.is_empty() => Some(json.to_string()),
            _ => None,
        },
        Some(other) => Some(other.to_string()),
    }
}

fn validation_item(item: &Value) -> Option<String> {
    let message = item.get("msg").and_then(Value::as_str)?;
    let location = item
        .get("loc")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .map(|part| match part {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(".")
        })
        .unwrap_or_default();

    if location.is_empty() {
        Some(message.to_owned())
    } else {
        Some(format!("{location}: {message}"))
    }
}
