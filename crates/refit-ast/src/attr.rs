//! Element attributes and the flat attribute-list normalizer.
//!
//! Hosts hand attributes over as a flat list of key/value pairs where the
//! first two positions are reserved: position 0 carries the identifier and
//! position 1 the space-separated class string. [`Attr::from_pairs`] turns
//! that list into a typed [`Attr`]; [`AttrList::from`] goes the other way.

use serde::{Deserialize, Serialize};

/// Error produced when normalizing a flat attribute list.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttrError {
    /// The list lacks the reserved identifier and class positions.
    #[error("malformed attribute list: expected at least 2 entries (id, class), got {len}")]
    Malformed {
        /// Number of entries actually present.
        len: usize,
    },
}

/// Structured attributes of a document element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attr {
    /// Element identifier, empty when unset.
    pub identifier: String,
    /// Classes in source order.
    pub classes: Vec<String>,
    /// Remaining key/value pairs in source order.
    pub extras: Vec<(String, String)>,
}

impl Attr {
    /// Attributes carrying only an identifier.
    #[must_use]
    pub fn with_id(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    /// Attributes carrying only classes.
    #[must_use]
    pub fn with_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Normalize a flat attribute list.
    ///
    /// Position 0 is consumed as the identifier and position 1 as the class
    /// string regardless of their keys. The class string is split on runs of
    /// whitespace. Every later pair is kept verbatim as an extra.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, AttrError> {
        let [(_, identifier), (_, classes), extras @ ..] = pairs else {
            return Err(AttrError::Malformed { len: pairs.len() });
        };

        Ok(Self {
            identifier: identifier.clone(),
            classes: classes.split_whitespace().map(str::to_owned).collect(),
            extras: extras.to_vec(),
        })
    }

    /// Look up an extra attribute by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.extras
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an extra attribute, replacing an existing value for the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.extras.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.extras.push((key, value)),
        }
    }

    /// True when no identifier, class or extra is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifier.is_empty() && self.classes.is_empty() && self.extras.is_empty()
    }
}

/// Flat attribute list as passed to node handlers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttrList(pub Vec<(String, String)>);

impl From<&Attr> for AttrList {
    fn from(attr: &Attr) -> Self {
        let mut pairs = Vec::with_capacity(attr.extras.len() + 2);
        pairs.push(("id".to_owned(), attr.identifier.clone()));
        pairs.push(("class".to_owned(), attr.classes.join(" ")));
        pairs.extend(attr.extras.iter().cloned());
        Self(pairs)
    }
}

impl TryFrom<&AttrList> for Attr {
    type Error = AttrError;

    fn try_from(list: &AttrList) -> Result<Self, Self::Error> {
        Self::from_pairs(&list.0)
    }
}
