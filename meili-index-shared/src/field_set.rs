//! Ordered, duplicate-free collection of field names.

/// Field names in declaration order, each appearing at most once.
///
/// Index settings such as `searchableAttributes` are order sensitive, so a
/// hash set is not enough here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<String>,
}

impl FieldSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field unless it is already present.
    ///
    /// Returns `true` if the field was added.
    pub fn insert(&mut self, field: impl Into<String>) -> bool {
        let field = field.into();
        if self.contains(&field) {
            return false;
        }
        self.fields.push(field);
        true
    }

    /// Check whether the field is present.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Borrow the fields in declaration order.
    pub fn as_slice(&self) -> &[String] {
        &self.fields
    }

    /// Copy the fields out in declaration order.
    pub fn to_vec(&self) -> Vec<String> {
        self.fields.clone()
    }
}

impl<S: Into<String>> FromIterator<S> for FieldSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for field in iter {
            set.insert(field);
        }
        set
    }
}
