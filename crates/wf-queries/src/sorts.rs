//! Sort criteria parsed from the `sort` query parameter.
//!
//! The parameter is a comma-separated field list; a leading `-` marks a
//! field as descending: `sort=-price,name`.

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A single sort criterion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortCriterion {
    pub field: String,
    pub direction: SortDirection,
}

impl SortCriterion {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Ordered list of sort criteria
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortOrder {
    criteria: Vec<SortCriterion>,
}

impl SortOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated sort string. Empty tokens are dropped;
    /// a lone `-` is unparseable and dropped too.
    pub fn parse(sort: &str) -> Self {
        let criteria = sort
            .split(',')
            .filter_map(|token| {
                let token = token.trim();
                let (field, direction) = match token.strip_prefix('-') {
                    Some(rest) => (rest, SortDirection::Desc),
                    None => (token, SortDirection::Asc),
                };
                if field.is_empty() {
                    return None;
                }
                Some(SortCriterion {
                    field: field.to_string(),
                    direction,
                })
            })
            .collect();
        Self { criteria }
    }

    pub fn then(mut self, criterion: SortCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn criteria(&self) -> &[SortCriterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_directions() {
        let order = SortOrder::parse("-price,name");
        assert_eq!(
            order.criteria(),
            &[SortCriterion::desc("price"), SortCriterion::asc("name")]
        );
    }

    #[test]
    fn test_parse_single_ascending() {
        let order = SortOrder::parse("created_at");
        assert_eq!(order.criteria(), &[SortCriterion::asc("created_at")]);
    }

    #[test]
    fn test_parse_drops_empty_tokens() {
        let order = SortOrder::parse("-price,,name,");
        assert_eq!(order.len(), 2);

        let order = SortOrder::parse("-");
        assert!(order.is_empty());
    }

    #[test]
    fn test_direction_helpers() {
        assert_eq!(SortDirection::Asc.as_sql(), "ASC");
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
    }
}
