use itsm_core::AppError;
use itsm_domain::EntityType;

/// Shown after a field set was written.
pub const FIELDS_UPDATED_MESSAGE: &str = "Campos actualizados exitosamente";
/// Shown after a field was removed from a field set.
pub const FIELD_REMOVED_MESSAGE: &str = "Campo eliminado exitosamente";
/// Fallback when loading a field set failed without a usable message.
pub const FIELDS_LOAD_FAILED_MESSAGE: &str = "Error al cargar campos";
/// Fallback when saving a field failed without a usable message.
pub const FIELD_SAVE_FAILED_MESSAGE: &str = "Error al guardar campo";
/// Fallback when removing a field failed without a usable message.
pub const FIELD_REMOVE_FAILED_MESSAGE: &str = "Error al eliminar campo";

/// Severity of a user notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Operation completed.
    Success,
    /// Operation failed; the UI stays interactive.
    Error,
}

impl NoticeLevel {
    /// Returns the stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Non-blocking message surfaced to the console user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNotice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
}

impl UserNotice {
    /// Creates a success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Creates an error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Builds the error notice for a failed operation.
    ///
    /// Validation and upstream messages are shown as-is; anything else falls
    /// back to the operation's generic text.
    #[must_use]
    pub fn from_error(error: &AppError, fallback: &str) -> Self {
        let message = match error {
            AppError::Validation(message)
            | AppError::Conflict(message)
            | AppError::Unauthorized(message)
            | AppError::Forbidden(message)
            | AppError::Upstream(message)
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            _ => fallback.to_owned(),
        };

        Self::error(message)
    }

    /// Builds the success notice for a saved record.
    #[must_use]
    pub fn record_saved(entity_type: EntityType, created: bool) -> Self {
        let feminine = matches!(entity_type, EntityType::Companies | EntityType::Logs);
        let verb = match (created, feminine) {
            (true, false) => "creado",
            (true, true) => "creada",
            (false, false) => "actualizado",
            (false, true) => "actualizada",
        };

        Self::success(format!(
            "{} {verb} exitosamente",
            entity_type.singular_name()
        ))
    }

    /// Returns the fallback text for a failed record save.
    #[must_use]
    pub fn record_save_failed_message(entity_type: EntityType) -> String {
        format!(
            "Error al guardar {}",
            entity_type.singular_name().to_lowercase()
        )
    }
}
