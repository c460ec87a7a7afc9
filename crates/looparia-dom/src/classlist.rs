//! DOMTokenList
//!
//! Space-separated token sets such as `class` and `role`.

/// DOMTokenList for managing space-separated tokens (e.g., classList)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    /// Create empty token list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from space-separated string, dropping duplicates
    pub fn from_string(s: &str) -> Self {
        let mut list = Self::new();
        for token in s.split_ascii_whitespace() {
            if !list.contains(token) {
                list.tokens.push(token.to_string());
            }
        }
        list
    }

    /// Get number of tokens
    pub fn length(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the list has no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Get token at index
    pub fn item(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(|s| s.as_str())
    }

    /// Check if token exists
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Check if every given token exists
    pub fn contains_all(&self, tokens: &[&str]) -> bool {
        tokens.iter().all(|t| self.contains(t))
    }

    /// Check if any token satisfies the predicate
    pub fn any(&self, mut predicate: impl FnMut(&str) -> bool) -> bool {
        self.tokens.iter().any(|t| predicate(t))
    }

    /// Get value as string
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    /// Iterate over tokens
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|s| s.as_str())
    }
}

impl std::fmt::Display for DOMTokenList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}
