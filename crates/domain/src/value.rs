use std::collections::BTreeMap;

use itsm_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::FieldSet;

/// Scalar value stored for a custom or type-indexed field.
///
/// An absent value is represented by a missing entry in [`FormValues`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean value written by checkbox controls.
    Boolean(bool),
    /// Numeric value.
    Number(f64),
    /// Text value written by text, date, select and cleared number controls.
    Text(String),
}

impl FieldValue {
    /// Converts a JSON scalar. `null` maps to an absent value.
    pub fn from_json(value: &Value) -> AppResult<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Bool(flag) => Ok(Some(Self::Boolean(*flag))),
            Value::Number(number) => number
                .as_f64()
                .map(|number| Some(Self::Number(number)))
                .ok_or_else(|| AppError::Validation(format!("unsupported number '{number}'"))),
            Value::String(text) => Ok(Some(Self::Text(text.clone()))),
            Value::Array(_) | Value::Object(_) => Err(AppError::Validation(
                "field values must be text, number or boolean".to_owned(),
            )),
        }
    }

    /// Returns the JSON representation.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Boolean(flag) => Value::Bool(*flag),
            Self::Number(number) => serde_json::Number::from_f64(*number)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Text(text) => Value::String(text.clone()),
        }
    }

    /// Returns the text shown inside a text-like control.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Boolean(true) => "true".to_owned(),
            Self::Boolean(false) => String::new(),
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text.clone(),
        }
    }

    /// Returns whether the value counts as "not filled in".
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

/// A single-field update produced by a control's change handler.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// Name of the changed field.
    pub field_name: String,
    /// New value.
    pub value: FieldValue,
}

/// Mapping from field name to value for one namespace of a form.
///
/// Every update returns a new mapping; the receiver is never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, FieldValue>);

impl FormValues {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping from a JSON object, skipping `null` entries.
    pub fn from_json_object(object: &Map<String, Value>) -> AppResult<Self> {
        let mut values = BTreeMap::new();
        for (name, value) in object {
            if let Some(value) = FieldValue::from_json(value)? {
                values.insert(name.clone(), value);
            }
        }

        Ok(Self(values))
    }

    /// Builds a mapping from an optional JSON value; anything but an object is an error.
    pub fn from_json(value: Option<&Value>) -> AppResult<Self> {
        match value {
            None | Some(Value::Null) => Ok(Self::new()),
            Some(Value::Object(object)) => Self::from_json_object(object),
            Some(_) => Err(AppError::Validation(
                "field values must be a JSON object".to_owned(),
            )),
        }
    }

    /// Returns the JSON object representation.
    #[must_use]
    pub fn to_json_object(&self) -> Map<String, Value> {
        self.0
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }

    /// Returns the value stored for a field.
    #[must_use]
    pub fn get(&self, field_name: &str) -> Option<&FieldValue> {
        self.0.get(field_name)
    }

    /// Returns a copy with exactly one entry set.
    #[must_use]
    pub fn with_value(&self, field_name: impl Into<String>, value: FieldValue) -> Self {
        let mut values = self.0.clone();
        values.insert(field_name.into(), value);
        Self(values)
    }

    /// Returns a copy without the given entry.
    #[must_use]
    pub fn without(&self, field_name: &str) -> Self {
        let mut values = self.0.clone();
        values.remove(field_name);
        Self(values)
    }

    /// Returns a copy with the change applied.
    #[must_use]
    pub fn apply(&self, change: FieldChange) -> Self {
        self.with_value(change.field_name, change.value)
    }

    /// Returns a copy keeping only entries described by the field set.
    #[must_use]
    pub fn retain_described(&self, field_set: &FieldSet) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(name, _)| field_set.find(name).is_some())
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        )
    }

    /// Iterates entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no entry is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::{FieldValue, FormValues};

    fn scalar() -> impl Strategy<Value = FieldValue> {
        prop_oneof![
            any::<bool>().prop_map(FieldValue::Boolean),
            (-1.0e9_f64..1.0e9_f64).prop_map(FieldValue::Number),
            "[a-zA-Z0-9 ]{0,12}".prop_map(FieldValue::Text),
        ]
    }

    proptest! {
        #[test]
        fn with_value_touches_exactly_one_entry(
            entries in prop::collection::btree_map("[a-z]{1,6}", scalar(), 0..8),
            field_name in "[a-z]{1,6}",
            new_value in scalar(),
        ) {
            let original = FormValues(entries.clone());
            let updated = original.with_value(field_name.clone(), new_value.clone());

            prop_assert_eq!(&original.0, &entries);
            prop_assert_eq!(updated.get(&field_name), Some(&new_value));
            for (name, value) in &entries {
                if name != &field_name {
                    prop_assert_eq!(updated.get(name), Some(value));
                }
            }
            let expected_len = entries.len() + usize::from(!entries.contains_key(&field_name));
            prop_assert_eq!(updated.len(), expected_len);
        }
    }

    #[test]
    fn from_json_skips_nulls_and_rejects_nested_values() {
        let values = FormValues::from_json(Some(&json!({
            "RAM": 16,
            "Notas": null,
            "Activo": true
        })))
        .unwrap_or_default();
        assert_eq!(values.len(), 2);
        assert_eq!(values.get("RAM"), Some(&FieldValue::Number(16.0)));

        assert!(FormValues::from_json(Some(&json!({ "x": [1] }))).is_err());
        assert!(FormValues::from_json(Some(&json!("x"))).is_err());
    }

    #[test]
    fn blank_text_is_not_a_filled_value() {
        assert!(FieldValue::Text("  ".to_owned()).is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
        assert!(!FieldValue::Boolean(false).is_blank());
    }
}
