use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidVersion,
    ConfigUnknownAgent,
    ConfigUnknownVariant,

    ValidationInvalidArgument,

    TemplateMissingScript,
    TemplateInvalidFrontmatter,

    ArchiveToolUnavailable,
    ArchiveWriteFailed,

    InternalIoError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidVersion => "config.invalid_version",
            ErrorCode::ConfigUnknownAgent => "config.unknown_agent",
            ErrorCode::ConfigUnknownVariant => "config.unknown_variant",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::TemplateMissingScript => "template.missing_script",
            ErrorCode::TemplateInvalidFrontmatter => "template.invalid_frontmatter",

            ErrorCode::ArchiveToolUnavailable => "archive.tool_unavailable",
            ErrorCode::ArchiveWriteFailed => "archive.write_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidVersionDetails {
    pub version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownFilterDetails {
    pub value: String,
    pub allowed: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingScriptDetails {
    pub template: String,
    pub variant: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidFrontmatterDetails {
    pub template: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveDetails {
    pub artifact: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn config_invalid_version(version: impl Into<String>) -> Self {
        let version = version.into();
        let details = serde_json::to_value(InvalidVersionDetails {
            version: version.clone(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ConfigInvalidVersion,
            format!("Invalid release version: {}", version),
            details,
        )
        .with_hint("Versions must match vMAJOR.MINOR.PATCH, e.g. v1.0.0")
    }

    pub fn config_unknown_agent(value: impl Into<String>, allowed: Vec<String>) -> Self {
        Self::unknown_filter(
            ErrorCode::ConfigUnknownAgent,
            "Unknown agent",
            value,
            allowed,
        )
    }

    pub fn config_unknown_variant(value: impl Into<String>, allowed: Vec<String>) -> Self {
        Self::unknown_filter(
            ErrorCode::ConfigUnknownVariant,
            "Unknown script variant",
            value,
            allowed,
        )
    }

    fn unknown_filter(
        code: ErrorCode,
        message: &str,
        value: impl Into<String>,
        allowed: Vec<String>,
    ) -> Self {
        let value = value.into();
        let hint = format!("Allowed values: {}", allowed.join(", "));
        let details = serde_json::to_value(UnknownFilterDetails {
            value: value.clone(),
            allowed,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(code, format!("{}: {}", message, value), details).with_hint(hint)
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = serde_json::to_value(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn template_missing_script(
        template: impl Into<String>,
        variant: impl Into<String>,
    ) -> Self {
        let template = template.into();
        let variant = variant.into();
        let details = serde_json::to_value(MissingScriptDetails {
            template: template.clone(),
            variant: variant.clone(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::TemplateMissingScript,
            format!(
                "Template '{}' declares no script command for variant '{}'",
                template, variant
            ),
            details,
        )
        .with_hint(format!(
            "Add a top-level '{}: <command>' entry to the template frontmatter",
            variant
        ))
    }

    pub fn template_invalid_frontmatter(
        template: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        let template = template.into();
        let details = serde_json::to_value(InvalidFrontmatterDetails {
            template: template.clone(),
            error: error.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::TemplateInvalidFrontmatter,
            format!("Template '{}' has malformed frontmatter", template),
            details,
        )
    }

    pub fn archive_tool_unavailable(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ArchiveToolUnavailable,
            "Archive tool is not available",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn archive_write_failed(artifact: impl Into<String>, error: impl Into<String>) -> Self {
        let artifact = artifact.into();
        let details = serde_json::to_value(ArchiveDetails {
            artifact: artifact.clone(),
            error: error.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ArchiveWriteFailed,
            format!("Failed to write archive: {}", artifact),
            details,
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = serde_json::to_value(InternalIoErrorDetails {
            error: error.into(),
            context,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}
