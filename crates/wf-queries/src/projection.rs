//! Field projection parsed from the `fields` query parameter.

use crate::collection::{CollectionSpec, VERSION_COLUMN};

/// Which columns a query returns
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Projection {
    /// All columns except the version marker
    #[default]
    Default,
    /// An explicit inclusion list (the `id` column is always added)
    Include(Vec<String>),
}

impl Projection {
    /// Parse a comma-separated inclusion list
    pub fn parse(fields: &str) -> Self {
        let names: Vec<String> = fields
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            Self::Default
        } else {
            Self::Include(names)
        }
    }

    /// Resolve against a collection: unknown fields are dropped, the
    /// version marker is never exposed, and `id` is always present.
    pub fn columns<'s>(&'s self, spec: &'s CollectionSpec) -> Vec<&'s str> {
        match self {
            Self::Default => spec.default_columns(),
            Self::Include(names) => {
                let mut columns: Vec<&str> = vec!["id"];
                for name in names {
                    if name == "id" || name == VERSION_COLUMN {
                        continue;
                    }
                    if spec.has_column(name) && !columns.contains(&name.as_str()) {
                        columns.push(name);
                    }
                }
                columns
            }
        }
    }
}
