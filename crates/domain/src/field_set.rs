use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use itsm_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::FieldDescriptor;

/// Prefix of the configuration key holding an entity type's field set.
pub const FIELDS_KEY_PREFIX: &str = "campos_";

/// Record categories that may carry custom fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    /// Client companies.
    #[serde(rename = "empresas")]
    Companies,
    /// Equipment and assets.
    #[serde(rename = "equipos")]
    Equipment,
    /// Maintenance logs.
    #[serde(rename = "bitacoras")]
    Logs,
    /// Contracted services.
    #[serde(rename = "servicios")]
    Services,
}

impl EntityType {
    /// Returns the stable wire key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Companies => "empresas",
            Self::Equipment => "equipos",
            Self::Logs => "bitacoras",
            Self::Services => "servicios",
        }
    }

    /// Returns the plural display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Companies => "Empresas",
            Self::Equipment => "Equipos",
            Self::Logs => "Bitácoras",
            Self::Services => "Servicios",
        }
    }

    /// Returns the singular display name used in notices.
    #[must_use]
    pub fn singular_name(&self) -> &'static str {
        match self {
            Self::Companies => "Empresa",
            Self::Equipment => "Equipo",
            Self::Logs => "Bitácora",
            Self::Services => "Servicio",
        }
    }

    /// Returns the configuration key holding this entity type's fields.
    #[must_use]
    pub fn fields_key(&self) -> String {
        format!("{FIELDS_KEY_PREFIX}{}", self.as_str())
    }

    /// Returns every entity type.
    #[must_use]
    pub fn all() -> [Self; 4] {
        [Self::Companies, Self::Equipment, Self::Logs, Self::Services]
    }
}

impl FromStr for EntityType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "empresas" | "companies" => Ok(Self::Companies),
            "equipos" | "equipment" => Ok(Self::Equipment),
            "bitacoras" | "logs" => Ok(Self::Logs),
            "servicios" | "services" => Ok(Self::Services),
            _ => Err(AppError::Validation(format!(
                "Tipo de entidad inválido '{value}'"
            ))),
        }
    }
}

impl Display for EntityType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Normalized (trimmed, lower-cased) equipment "tipo".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EquipmentType(NonEmptyString);

impl EquipmentType {
    /// Normalizes a raw equipment type.
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let normalized = raw.as_ref().trim().to_lowercase();
        NonEmptyString::new(normalized)
            .map(Self)
            .map_err(|_| AppError::Validation("El tipo de equipo es obligatorio".to_owned()))
    }

    /// Normalizes a raw equipment type, mapping blank input to `None`.
    #[must_use]
    pub fn parse_optional(raw: &str) -> Option<Self> {
        Self::new(raw).ok()
    }

    /// Returns the normalized key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for EquipmentType {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EquipmentType> for String {
    fn from(value: EquipmentType) -> Self {
        value.0.into()
    }
}

impl Display for EquipmentType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Owner of a field set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldSetKey {
    /// Custom fields of an entity type.
    Entity(EntityType),
    /// Type-indexed fields of an equipment type.
    EquipmentType(EquipmentType),
}

impl Display for FieldSetKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entity(entity_type) => write!(formatter, "entity:{entity_type}"),
            Self::EquipmentType(equipment_type) => {
                write!(formatter, "equipment_type:{equipment_type}")
            }
        }
    }
}

/// Ordered field descriptors with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldDescriptor>", into = "Vec<FieldDescriptor>")]
pub struct FieldSet {
    fields: Vec<FieldDescriptor>,
}

impl FieldSet {
    /// Creates a field set, rejecting duplicate names.
    pub fn new(fields: Vec<FieldDescriptor>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(duplicate_name_error(field.name()));
            }
        }

        Ok(Self { fields })
    }

    /// Returns a field set without descriptors.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns all descriptors in order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Iterates descriptors in order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    /// Returns the number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the set has no descriptors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a descriptor by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Returns a copy with the descriptor appended.
    pub fn with_added(&self, descriptor: FieldDescriptor) -> AppResult<Self> {
        if self.find(descriptor.name()).is_some() {
            return Err(duplicate_name_error(descriptor.name()));
        }

        let mut fields = self.fields.clone();
        fields.push(descriptor);
        Ok(Self { fields })
    }

    /// Returns a copy with the descriptor at `index` replaced.
    pub fn with_replaced(&self, index: usize, descriptor: FieldDescriptor) -> AppResult<Self> {
        if index >= self.fields.len() {
            return Err(missing_index_error(index));
        }

        let name_taken = self
            .fields
            .iter()
            .enumerate()
            .any(|(position, field)| position != index && field.name() == descriptor.name());
        if name_taken {
            return Err(duplicate_name_error(descriptor.name()));
        }

        let mut fields = self.fields.clone();
        fields[index] = descriptor;
        Ok(Self { fields })
    }

    /// Returns a copy without the descriptor at `index`.
    pub fn without(&self, index: usize) -> AppResult<Self> {
        if index >= self.fields.len() {
            return Err(missing_index_error(index));
        }

        let mut fields = self.fields.clone();
        fields.remove(index);
        Ok(Self { fields })
    }
}

impl TryFrom<Vec<FieldDescriptor>> for FieldSet {
    type Error = AppError;

    fn try_from(fields: Vec<FieldDescriptor>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<FieldSet> for Vec<FieldDescriptor> {
    fn from(value: FieldSet) -> Self {
        value.fields
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

fn duplicate_name_error(name: &str) -> AppError {
    AppError::Validation(format!("Ya existe un campo con ese nombre: '{name}'"))
}

fn missing_index_error(index: usize) -> AppError {
    AppError::NotFound(format!("no field at position {index}"))
}
