//! # Core

use serde::{Deserialize, Serialize};

/// `OneMany` allows serde to serialize/deserialize a single value or a set of
/// values.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum OneMany<T> {
    /// Single value
    One(T),

    /// Set of values
    Many(Vec<T>),
}

impl<T: Default> Default for OneMany<T> {
    fn default() -> Self {
        Self::One(T::default())
    }
}

impl<T> OneMany<T> {
    /// Returns the number of values held.
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(many) => many.len(),
        }
    }

    /// Returns `true` if the `OneMany` is an empty `Many`.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(_) => false,
            Self::Many(many) => many.is_empty(),
        }
    }

    /// Iterate over the values held.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Self::One(one) => std::slice::from_ref(one).iter(),
            Self::Many(many) => many.iter(),
        }
    }
}

impl<T> From<T> for OneMany<T> {
    fn from(value: T) -> Self {
        Self::One(value)
    }
}

impl<T> From<Vec<T>> for OneMany<T> {
    fn from(value: Vec<T>) -> Self {
        Self::Many(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_or_many() {
        let one: OneMany<String> = serde_json::from_str(r#""https://example.com""#).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one.iter().next().map(String::as_str), Some("https://example.com"));

        let many: OneMany<String> =
            serde_json::from_str(r#"["https://a.example.com", "https://b.example.com"]"#).unwrap();
        assert_eq!(many.len(), 2);

        let empty: OneMany<String> = serde_json::from_str("[]").unwrap();
        assert!(empty.is_empty());
    }
}
