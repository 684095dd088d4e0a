// ⭐ Priority Registry - venues always surfaced first
// Loaded once at startup, never mutated afterwards. Share it behind an Arc.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Built-in priority place ids
pub const DEFAULT_PRIORITY_IDS: [&str; 2] = [
    "ChIJN1t_tDeuEmsRUsoyG83frY4",
    "ChIJsZ3vcCyuEmsRKW5sQ2W-CRg",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriorityRegistry {
    ids: HashSet<String>,
}

impl PriorityRegistry {
    /// Empty registry: no venue gets boosted
    pub fn new() -> Self {
        PriorityRegistry {
            ids: HashSet::new(),
        }
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PriorityRegistry {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Registry with the built-in priority venues
    pub fn with_defaults() -> Self {
        PriorityRegistry::from_ids(DEFAULT_PRIORITY_IDS)
    }

    /// Load identities from a JSON array of strings
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read priority file: {:?}", path.as_ref()))?;

        let ids: Vec<String> = serde_json::from_str(&content)
            .context("Failed to parse priority JSON (expected an array of place ids)")?;

        let registry = PriorityRegistry::from_ids(
            ids.into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        );

        tracing::info!(count = registry.len(), path = ?path.as_ref(), "Loaded priority registry");

        Ok(registry)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.ids.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identities in sorted order (stable for logs/debugging)
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.ids.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("cafe_ranker_{}_{}", std::process::id(), name));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let registry = PriorityRegistry::with_defaults();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("ChIJN1t_tDeuEmsRUsoyG83frY4"));
        assert!(!registry.contains("somewhere-else"));
    }

    #[test]
    fn test_empty_registry() {
        let registry = PriorityRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains(""));
    }

    #[test]
    fn test_from_ids_dedups() {
        let registry = PriorityRegistry::from_ids(["P1", "P2", "P1"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids(), vec!["P1", "P2"]);
    }

    #[test]
    fn test_from_file() {
        let path = temp_file("priority_ok.json", r#"["P1", " P2 ", ""]"#);

        let registry = PriorityRegistry::from_file(&path).unwrap();
        assert_eq!(registry.ids(), vec!["P1", "P2"]);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_from_file_errors() {
        let missing = std::env::temp_dir().join("cafe_ranker_definitely_missing.json");
        let err = PriorityRegistry::from_file(&missing).unwrap_err();
        assert!(err.to_string().contains("Failed to read priority file"));

        let path = temp_file("priority_bad.json", r#"{"P1": true}"#);
        let err = PriorityRegistry::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse priority JSON"));
        fs::remove_file(path).ok();
    }
}
