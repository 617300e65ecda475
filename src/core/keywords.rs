//! Registry of fraud-indicator substrings.
//!
//! Keywords are stored lowercase in insertion order. Matching is a plain
//! case-insensitive substring scan over the transcript.

/// Substrings loaded into every new registry.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "otp",
    "bank account",
    "credit card",
    "fraud",
    "password",
    "verification",
];

/// Result of adding a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
}

/// Ordered set of lowercase keywords.
#[derive(Debug, Clone)]
pub struct KeywordRegistry {
    keywords: Vec<String>,
}

impl KeywordRegistry {
    /// Create a registry with the default keywords.
    pub fn new() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Create a registry with no keywords.
    pub fn empty() -> Self {
        Self {
            keywords: Vec::new(),
        }
    }

    /// Add a keyword. Adding one that is already present (in any case) is a no-op.
    pub fn add(&mut self, keyword: &str) -> Result<AddOutcome, KeywordError> {
        let normalized = keyword.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(KeywordError::Empty);
        }

        if self.contains(&normalized) {
            tracing::info!("Keyword \"{}\" already exists.", keyword.trim());
            return Ok(AddOutcome::AlreadyExists);
        }

        tracing::info!("New keyword added: {}", keyword.trim());
        self.keywords.push(normalized);
        Ok(AddOutcome::Added)
    }

    /// Check whether a keyword is present, ignoring case.
    pub fn contains(&self, keyword: &str) -> bool {
        let normalized = keyword.trim().to_lowercase();
        self.keywords.iter().any(|k| *k == normalized)
    }

    /// Keywords found in `transcript`, in registry order.
    pub fn matches(&self, transcript: &str) -> Vec<&str> {
        let haystack = transcript.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| haystack.contains(k.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for KeywordRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyword registry errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordError {
    Empty,
}

impl std::fmt::Display for KeywordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeywordError::Empty => write!(f, "Keyword must not be empty"),
        }
    }
}

impl std::error::Error for KeywordError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keywords() {
        let registry = KeywordRegistry::new();
        assert_eq!(registry.len(), DEFAULT_KEYWORDS.len());
        assert!(registry.contains("OTP"));
        assert!(registry.contains("credit card"));
    }

    #[test]
    fn test_add_new_keyword() {
        let mut registry = KeywordRegistry::new();
        let before = registry.len();

        assert_eq!(registry.add("Wire Transfer").unwrap(), AddOutcome::Added);
        assert_eq!(registry.len(), before + 1);
        assert_eq!(registry.iter().last(), Some("wire transfer"));
    }

    #[test]
    fn test_add_existing_keyword_any_case() {
        let mut registry = KeywordRegistry::new();
        let before = registry.len();

        assert_eq!(registry.add("FRAUD").unwrap(), AddOutcome::AlreadyExists);
        assert_eq!(registry.add("otp").unwrap(), AddOutcome::AlreadyExists);
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn test_add_empty_keyword() {
        let mut registry = KeywordRegistry::empty();
        assert_eq!(registry.add("   ").unwrap_err(), KeywordError::Empty);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_matches_in_registry_order() {
        let registry = KeywordRegistry::new();
        let found = registry.matches("Verify your PASSWORD and Credit Card, then your password again");
        assert_eq!(found, vec!["credit card", "password"]);
    }

    #[test]
    fn test_no_matches() {
        let registry = KeywordRegistry::new();
        assert!(registry.matches("hello there").is_empty());
    }
}
