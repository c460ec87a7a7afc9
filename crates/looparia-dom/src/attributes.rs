//! Element Attributes
//!
//! Ordered attribute storage: get, set, remove, has.

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Named node map (attribute collection), insertion ordered
#[derive(Debug, Clone, Default)]
pub struct NamedNodeMap {
    attributes: Vec<Attr>,
}

impl NamedNodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of attributes
    pub fn length(&self) -> usize {
        self.attributes.len()
    }

    /// Get attribute by index
    pub fn item(&self, index: usize) -> Option<&Attr> {
        self.attributes.get(index)
    }

    /// Get attribute value
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set attribute, returning the previous value if there was one
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Option<String> {
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name == name) {
            return Some(std::mem::replace(&mut attr.value, value.to_string()));
        }
        self.attributes.push(Attr::new(name, value));
        None
    }

    /// Remove attribute by name, returning it if it existed
    pub fn remove_named_item(&mut self, name: &str) -> Option<Attr> {
        let index = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(index))
    }

    /// Check if attribute exists
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Get attribute names
    pub fn get_attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    /// Iterate over attributes
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }
}
