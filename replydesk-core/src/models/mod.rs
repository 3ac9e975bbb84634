//! Core data structures for `ReplyDesk`
//!
//! [`Template`] is the only persisted entity. Drafts, generated templates and
//! screenshots are session-only values.

mod template;

pub use template::{
    Draft, GeneratedTemplate, Screenshot, Template, TemplateFields, TemplateId,
    TemplateValidationError,
};
