use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Language-tag to text mapping as the API returns for titles and
/// descriptions. Backed by a `BTreeMap` so the "first available" fallback is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LocalizedText(pub BTreeMap<String, String>);

impl LocalizedText {
    /// Fallback order: `en`, then `ja`, then the first available language.
    pub fn preferred(&self) -> Option<&str> {
        self.0
            .get("en")
            .or_else(|| self.0.get("ja"))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        self.0.get(language).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for LocalizedText {
    fn from(entries: [(&str, &str); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
