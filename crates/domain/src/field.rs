use std::str::FromStr;

use chrono::NaiveDate;
use itsm_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::value::{FieldChange, FieldValue};

/// Notice shown when a select field is saved without options.
pub const SELECT_OPTIONS_REQUIRED_MESSAGE: &str = "Debes agregar opciones para el campo tipo Select";

/// Date format accepted by date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Supported custom field input kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Single-line text.
    #[serde(rename = "texto")]
    Text,
    /// Numeric input.
    #[serde(rename = "numero")]
    Number,
    /// Date-only input.
    #[serde(rename = "fecha")]
    Date,
    /// Single choice from an ordered option list.
    #[serde(rename = "select")]
    Select,
    /// Boolean toggle.
    #[serde(rename = "checkbox")]
    Checkbox,
}

impl FieldKind {
    /// Returns the stable wire value for the field kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "texto",
            Self::Number => "numero",
            Self::Date => "fecha",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
        }
    }

    /// Returns the label shown in the configuration screen.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Texto",
            Self::Number => "Número",
            Self::Date => "Fecha",
            Self::Select => "Selección (Select)",
            Self::Checkbox => "Casilla (Checkbox)",
        }
    }

    /// Returns every kind in configuration screen order.
    #[must_use]
    pub fn all() -> [Self; 5] {
        [
            Self::Text,
            Self::Number,
            Self::Date,
            Self::Select,
            Self::Checkbox,
        ]
    }
}

impl FromStr for FieldKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "texto" | "text" => Ok(Self::Text),
            "numero" | "number" => Ok(Self::Number),
            "fecha" | "date" => Ok(Self::Date),
            "select" => Ok(Self::Select),
            "checkbox" => Ok(Self::Checkbox),
            _ => Err(AppError::Validation(format!(
                "unknown field type '{value}'"
            ))),
        }
    }
}

/// Raw input for a field descriptor, as typed by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptorInput {
    /// Field name, unique within its field set.
    pub name: String,
    /// Declared input kind.
    pub kind: FieldKind,
    /// Required marker.
    pub required: bool,
    /// Options for select fields, in display order.
    pub options: Vec<String>,
    /// Optional help text.
    pub description: Option<String>,
}

/// Admin-defined extra attribute with a declared input kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldDescriptorWire", into = "FieldDescriptorWire")]
pub struct FieldDescriptor {
    name: NonEmptyString,
    kind: FieldKind,
    required: bool,
    options: Vec<String>,
    description: Option<String>,
}

impl FieldDescriptor {
    /// Creates a validated field descriptor.
    pub fn new(input: FieldDescriptorInput) -> AppResult<Self> {
        let name = NonEmptyString::new(input.name.trim())
            .map_err(|_| AppError::Validation("El nombre del campo es obligatorio".to_owned()))?;

        let options = if input.kind == FieldKind::Select {
            let options: Vec<String> = input
                .options
                .into_iter()
                .map(|option| option.trim().to_owned())
                .filter(|option| !option.is_empty())
                .collect();

            if options.is_empty() {
                return Err(AppError::Validation(
                    SELECT_OPTIONS_REQUIRED_MESSAGE.to_owned(),
                ));
            }

            options
        } else {
            Vec::new()
        };

        let description = input.description.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(Self {
            name,
            kind: input.kind,
            required: input.required,
            options,
            description,
        })
    }

    /// Splits the comma-separated option list typed in the configuration screen.
    #[must_use]
    pub fn parse_options(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|option| !option.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the declared input kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns whether the owning form must receive a value.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns select options in display order. Empty for other kinds.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Returns the help text.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Checks that a stored value fits the declared kind.
    pub fn validate_value(&self, value: &FieldValue) -> AppResult<()> {
        let is_valid = match (self.kind, value) {
            (FieldKind::Text, _) => true,
            (FieldKind::Number, FieldValue::Number(number)) => number.is_finite(),
            (FieldKind::Number, FieldValue::Text(text)) => text.trim().parse::<f64>().is_ok(),
            (FieldKind::Date, FieldValue::Text(text)) => is_date(text),
            (FieldKind::Select, FieldValue::Text(text)) => self.options.contains(text),
            (FieldKind::Checkbox, FieldValue::Boolean(_)) => true,
            _ => false,
        };

        if !is_valid {
            return Err(AppError::Validation(format!(
                "Valor inválido para el campo '{}' de tipo '{}'",
                self.name,
                self.kind.label()
            )));
        }

        Ok(())
    }

    /// Converts raw control input into a single-field change.
    pub fn change(&self, input: ControlInput) -> AppResult<FieldChange> {
        let value = match (self.kind, input) {
            (FieldKind::Text, ControlInput::Text(text)) => FieldValue::Text(text),
            (FieldKind::Number, ControlInput::Text(text)) => {
                if text.trim().is_empty() {
                    FieldValue::Text(String::new())
                } else {
                    let number = text.trim().parse::<f64>().map_err(|_| {
                        AppError::Validation(format!(
                            "El campo '{}' solo acepta números",
                            self.name
                        ))
                    })?;
                    FieldValue::Number(number)
                }
            }
            (FieldKind::Date, ControlInput::Text(text)) => {
                if !text.is_empty() && !is_date(text.as_str()) {
                    return Err(AppError::Validation(format!(
                        "El campo '{}' requiere una fecha con formato AAAA-MM-DD",
                        self.name
                    )));
                }
                FieldValue::Text(text)
            }
            (FieldKind::Select, ControlInput::Text(text)) => {
                if !text.is_empty() && !self.options.contains(&text) {
                    return Err(AppError::Validation(format!(
                        "'{text}' no es una opción válida para el campo '{}'",
                        self.name
                    )));
                }
                FieldValue::Text(text)
            }
            (FieldKind::Checkbox, ControlInput::Checked(checked)) => FieldValue::Boolean(checked),
            (kind, _) => {
                return Err(AppError::Validation(format!(
                    "control input does not match field type '{}'",
                    kind.as_str()
                )));
            }
        };

        Ok(FieldChange {
            field_name: self.name.as_str().to_owned(),
            value,
        })
    }
}

/// Raw value emitted by an interactive control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlInput {
    /// Text typed or chosen in a text, number, date or select control.
    Text(String),
    /// New state of a checkbox.
    Checked(bool),
}

fn is_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FieldDescriptorWire {
    #[serde(alias = "nombre")]
    name: String,
    #[serde(rename = "type", alias = "tipo")]
    kind: String,
    #[serde(default, alias = "requerido")]
    required: bool,
    #[serde(default, alias = "opciones", skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    #[serde(
        default,
        alias = "descripcion",
        skip_serializing_if = "Option::is_none"
    )]
    description: Option<String>,
}

impl TryFrom<FieldDescriptorWire> for FieldDescriptor {
    type Error = AppError;

    fn try_from(wire: FieldDescriptorWire) -> Result<Self, Self::Error> {
        Self::new(FieldDescriptorInput {
            name: wire.name,
            kind: FieldKind::from_str(wire.kind.as_str())?,
            required: wire.required,
            options: wire.options.unwrap_or_default(),
            description: wire.description,
        })
    }
}

impl From<FieldDescriptor> for FieldDescriptorWire {
    fn from(descriptor: FieldDescriptor) -> Self {
        let options = (descriptor.kind == FieldKind::Select).then_some(descriptor.options);

        Self {
            name: descriptor.name.into(),
            kind: descriptor.kind.as_str().to_owned(),
            required: descriptor.required,
            options,
            description: descriptor.description,
        }
    }
}
