//! Collection descriptors.
//!
//! A [`CollectionSpec`] is the static description of one queryable resource:
//! its table, the columns clients may filter/sort/select on, and the column
//! holding the internal version marker. Handlers pass the descriptor to the
//! feature builder instead of the builder knowing about concrete resources.

/// Column name used as the optimistic-locking version marker on every table.
/// It is excluded from default projections and never client-selectable.
pub const VERSION_COLUMN: &str = "lock_version";

/// Static description of a queryable collection
#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    /// Table name
    pub table: &'static str,
    /// Every column of the table, including `id` and the version marker
    pub columns: &'static [&'static str],
    /// Parent-reference column for nested listings (e.g. `tour_id` on
    /// reviews), when the resource can be scoped under another
    pub parent_column: Option<&'static str>,
}

impl CollectionSpec {
    pub const fn new(table: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            table,
            columns,
            parent_column: None,
        }
    }

    pub const fn with_parent(mut self, column: &'static str) -> Self {
        self.parent_column = Some(column);
        self
    }

    /// Whether clients may reference this column in filters and sorts
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(&name)
    }

    /// Columns returned when no `fields` parameter is given: everything
    /// except the version marker.
    pub fn default_columns(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .copied()
            .filter(|c| *c != VERSION_COLUMN)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOURS: CollectionSpec = CollectionSpec::new(
        "tours",
        &["id", "name", "price", "lock_version"],
    );

    #[test]
    fn test_has_column() {
        assert!(TOURS.has_column("price"));
        assert!(!TOURS.has_column("password"));
    }

    #[test]
    fn test_default_columns_exclude_version_marker() {
        let columns = TOURS.default_columns();
        assert_eq!(columns, vec!["id", "name", "price"]);
        assert!(!columns.contains(&VERSION_COLUMN));
    }

    #[test]
    fn test_with_parent() {
        const REVIEWS: CollectionSpec =
            CollectionSpec::new("reviews", &["id", "tour_id", "rating", "lock_version"])
                .with_parent("tour_id");
        assert_eq!(REVIEWS.parent_column, Some("tour_id"));
    }
}
