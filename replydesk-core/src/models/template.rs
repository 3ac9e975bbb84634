//! Reply template model and the transient values built around it

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque, server-assigned template identifier
///
/// The remote store decides the representation (UUID text or a numeric
/// primary key); both are kept as text on this side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    /// Wraps a raw identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TemplateId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TemplateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for TemplateId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// A titled block of reusable reply text, as persisted by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Server-assigned identifier, immutable after creation
    pub id: TemplateId,
    /// Operator-supplied title
    pub title: String,
    /// Reply body, typed by the operator or produced by the assistant
    pub text: String,
    /// Server-assigned creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Template {
    /// Returns the editable part of the template
    #[must_use]
    pub fn fields(&self) -> TemplateFields {
        TemplateFields {
            title: self.title.clone(),
            text: self.text.clone(),
        }
    }
}

/// Title/text payload sent on create and update
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplateFields {
    /// Template title
    pub title: String,
    /// Template body
    pub text: String,
}

impl TemplateFields {
    /// Creates a payload from a title and a body
    #[must_use]
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    /// Checks that neither field is blank
    ///
    /// # Errors
    ///
    /// Returns the name of the first blank field.
    pub fn validate(&self) -> Result<(), TemplateValidationError> {
        if self.title.trim().is_empty() {
            return Err(TemplateValidationError::BlankTitle);
        }
        if self.text.trim().is_empty() {
            return Err(TemplateValidationError::BlankText);
        }
        Ok(())
    }
}

/// Reasons a title/text pair is refused before reaching the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TemplateValidationError {
    /// Title is empty or whitespace-only
    #[error("Template title must not be empty")]
    BlankTitle,
    /// Text is empty or whitespace-only
    #[error("Template text must not be empty")]
    BlankText,
}

/// In-progress title/text shown in the edit form
///
/// When `editing_id` is set, saving the draft updates that template;
/// otherwise it creates a new one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    /// Title being edited
    pub title: String,
    /// Body being edited
    pub text: String,
    /// Template the draft is bound to, if any
    pub editing_id: Option<TemplateId>,
}

impl Draft {
    /// Creates an unbound draft
    #[must_use]
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            editing_id: None,
        }
    }

    /// Creates a draft bound to an existing template
    #[must_use]
    pub fn from_template(template: &Template) -> Self {
        Self {
            title: template.title.clone(),
            text: template.text.clone(),
            editing_id: Some(template.id.clone()),
        }
    }

    /// Returns true when saving would update an existing template
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Returns true when both title and text carry non-whitespace content
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        self.to_fields().validate().is_ok()
    }

    /// Returns the payload the store receives for this draft
    #[must_use]
    pub fn to_fields(&self) -> TemplateFields {
        TemplateFields {
            title: self.title.clone(),
            text: self.text.clone(),
        }
    }
}

/// Structured output of a template generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTemplate {
    /// Suggested title
    pub title: String,
    /// Suggested body
    pub text: String,
}

impl From<GeneratedTemplate> for TemplateFields {
    fn from(generated: GeneratedTemplate) -> Self {
        Self {
            title: generated.title,
            text: generated.text,
        }
    }
}

/// Image of a customer conversation attached to a suggest-reply request
#[derive(Clone, PartialEq, Eq)]
pub struct Screenshot {
    /// MIME type such as `image/png`
    pub mime_type: String,
    /// Raw image bytes
    pub data: Vec<u8>,
}

impl Screenshot {
    /// Creates a screenshot from raw bytes
    #[must_use]
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Guesses the MIME type from a file extension, defaulting to PNG
    #[must_use]
    pub fn mime_type_for_extension(extension: &str) -> &'static str {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "webp" => "image/webp",
            "gif" => "image/gif",
            _ => "image/png",
        }
    }
}

impl fmt::Debug for Screenshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screenshot")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}
