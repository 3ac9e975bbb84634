//! Local template search
//!
//! Filtering is a pure function of the loaded list: it never reorders, never
//! mutates the list and never reaches the store. Matching is a
//! case-insensitive substring test.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Template;

/// Which fields a search term is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// Match titles only
    #[default]
    Title,
    /// Match titles and bodies
    Content,
}

impl SearchScope {
    /// Returns the configuration name of the scope
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "content" | "text" => Ok(Self::Content),
            other => Err(format!("unknown search scope '{other}'")),
        }
    }
}

/// Pre-lowercased search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
    scope: SearchScope,
}

impl SearchQuery {
    /// Creates a query for the given term and scope
    #[must_use]
    pub fn new(term: &str, scope: SearchScope) -> Self {
        Self {
            needle: term.trim().to_lowercase(),
            scope,
        }
    }

    /// Returns true if the query matches everything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Tests a single template against the query
    #[must_use]
    pub fn matches(&self, template: &Template) -> bool {
        if self.is_empty() {
            return true;
        }
        if template.title.to_lowercase().contains(&self.needle) {
            return true;
        }
        self.scope == SearchScope::Content && template.text.to_lowercase().contains(&self.needle)
    }
}

/// Returns the templates matching `term`, in their original order
///
/// A blank term matches every template.
#[must_use]
pub fn filter_templates<'a>(
    templates: &'a [Template],
    term: &str,
    scope: SearchScope,
) -> Vec<&'a Template> {
    let query = SearchQuery::new(term, scope);
    templates.iter().filter(|t| query.matches(t)).collect()
}
