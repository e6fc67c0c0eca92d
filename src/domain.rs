//! Domain values produced by the scraping pipeline
//!
//! All values are transient: created per call, never cached, and serialized
//! to JSON by whoever consumes them.

use crate::ValidationError;
use serde::{Deserialize, Serialize};

/// Identifies one scrapable item without fetching its full content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
}

/// A named metadata value such as author, artist or album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One structural unit of an item's body (a stanza)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub lines: Vec<String>,
}

/// A fully fetched and parsed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub tags: Vec<Tag>,
    pub body: Vec<Group>,
}

impl Item {
    /// Returns the value of the first tag with the given name.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.name == name)
            .map(|tag| tag.value.as_str())
    }

    /// Iterates over every line of the body, group by group.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.body
            .iter()
            .flat_map(|group| group.lines.iter().map(String::as_str))
    }
}

/// Pure validation predicate over an already constructed value
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for CatalogEntry {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::empty_value("id"));
        }
        if self.title.is_empty() {
            return Err(ValidationError::empty_value("title"));
        }
        Ok(())
    }
}

impl Validate for Item {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::empty_value("title"));
        }

        if self.body.is_empty() {
            return Err(ValidationError::empty_collection("body"));
        }

        for (i, group) in self.body.iter().enumerate() {
            if group.lines.is_empty() {
                return Err(ValidationError::empty_collection(format!(
                    "body[{}].lines",
                    i
                )));
            }

            if let Some(j) = group.lines.iter().position(|line| line.is_empty()) {
                return Err(ValidationError::empty_value(format!(
                    "body[{}].lines[{}]",
                    i, j
                )));
            }
        }

        Ok(())
    }
}

/// Anything that can be ordered by its title
pub trait Titled {
    fn title(&self) -> &str;
}

impl Titled for CatalogEntry {
    fn title(&self) -> &str {
        &self.title
    }
}

impl Titled for Item {
    fn title(&self) -> &str {
        &self.title
    }
}

/// Sorts by title ascending; equal titles keep their relative order.
pub fn sort_by_title<T: Titled>(values: &mut [T]) {
    values.sort_by(|a, b| a.title().cmp(b.title()));
}
