use std::collections::HashSet;

/// Case-insensitive set of table names to drop before any introspection is
/// attempted against them.
#[derive(Debug, Default, Clone)]
pub struct ExclusionFilter {
    names: HashSet<String>,
}

impl ExclusionFilter {
    /// Build a filter from configured names, normalizing case once up front.
    pub fn new<I, T>(names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        ExclusionFilter {
            names: names
                .into_iter()
                .map(|n| n.as_ref().to_uppercase())
                .collect(),
        }
    }

    /// An empty filter excludes nothing.
    pub fn excludes(&self, table_name: &str) -> bool {
        !self.names.is_empty() && self.names.contains(&table_name.to_uppercase())
    }
}
