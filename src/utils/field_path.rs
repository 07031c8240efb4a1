use serde_json::Value;

/// Dot-notation access into a serialized booking.
///
/// Segments address object keys; numeric segments index into arrays, so
/// `passengerDetails.0.firstName` reaches the first passenger's first name.
#[must_use]
pub fn get_field<'a>(data: &'a Value, field_path: &str) -> Option<&'a Value> {
    let mut current = data;

    for part in field_path.split('.') {
        current = match current {
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => current.get(part)?,
        };
    }

    Some(current)
}

/// Replace the value stored at an existing path.
///
/// Only leaf values (strings, numbers, booleans and arrays) can be replaced;
/// paths that do not exist or that point at an object are rejected.
///
/// # Errors
/// Returns an error if the path is empty, unknown, or addresses an object.
pub fn set_field(data: &mut Value, field_path: &str, value: Value) -> Result<(), FieldPathError> {
    if field_path.is_empty() {
        return Err(FieldPathError::Empty);
    }

    let mut current = data;
    for part in field_path.split('.') {
        current = match current {
            Value::Array(items) => part
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get_mut(index)),
            Value::Object(map) => map.get_mut(part),
            _ => None,
        }
        .ok_or_else(|| FieldPathError::NotFound(field_path.to_string()))?;
    }

    if current.is_object() {
        return Err(FieldPathError::NotALeaf(field_path.to_string()));
    }

    *current = value;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldPathError {
    #[error("Field path is empty")]
    Empty,

    #[error("Unknown field: {0}")]
    NotFound(String),

    #[error("Field is a group, not a value: {0}")]
    NotALeaf(String),
}
