//! Filter clauses parsed from query-string parameters.
//!
//! A key of the form `field[gte]=value` becomes a typed clause on `field`;
//! a bare `field=value` key is an equality clause. The four control keys
//! (`page`, `sort`, `limit`, `fields`) are never treated as filters.

use std::collections::HashMap;

/// Query-string keys that shape the query rather than filter it
pub const RESERVED_KEYS: [&str; 4] = ["page", "sort", "limit", "fields"];

/// Comparison operators supported in filter keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    /// Parse the bracket-suffix form (`gte`, `gt`, `lte`, `lt`)
    pub fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            _ => None,
        }
    }

    pub fn sql_operator(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

/// A typed scalar operand, inferred from the raw string
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl FilterValue {
    /// Sniff the tightest type the raw text fits: int, float, bool, text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::Int(n);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Self::Float(f);
        }
        match trimmed {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => Self::Text(trimmed.to_string()),
        }
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// A single filter condition on one field
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub field: String,
    pub comparison: Comparison,
    pub value: FilterValue,
}

impl FilterClause {
    pub fn new(
        field: impl Into<String>,
        comparison: Comparison,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            field: field.into(),
            comparison,
            value: value.into(),
        }
    }

    /// Equality clause shorthand
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, Comparison::Eq, value)
    }
}

/// Split a raw key into field name and comparison.
///
/// `price[gte]` -> ("price", Gte); anything without a recognized bracket
/// suffix is an equality on the literal key.
fn parse_key(key: &str) -> (String, Comparison) {
    if let Some(open) = key.find('[') {
        if let Some(stripped) = key[open..].strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            if let Some(comparison) = Comparison::from_suffix(stripped) {
                return (key[..open].to_string(), comparison);
            }
        }
    }
    (key.to_string(), Comparison::Eq)
}

/// An AND-combined set of filter clauses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    clauses: Vec<FilterClause>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a raw parameter map, dropping the reserved control keys.
    ///
    /// Clauses are ordered by field name so the rendered SQL is stable
    /// regardless of map iteration order.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let mut clauses: Vec<FilterClause> = params
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| {
                let (field, comparison) = parse_key(key);
                FilterClause {
                    field,
                    comparison,
                    value: FilterValue::parse(value),
                }
            })
            .collect();
        clauses.sort_by(|a, b| a.field.cmp(&b.field));
        Self { clauses }
    }

    pub fn add(&mut self, clause: FilterClause) -> &mut Self {
        self.clauses.push(clause);
        self
    }

    pub fn with(mut self, clause: FilterClause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn has_filter_for(&self, field: &str) -> bool {
        self.clauses.iter().any(|c| c.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_reserved_keys_never_become_filters() {
        let set = FilterSet::from_params(&params(&[
            ("page", "2"),
            ("sort", "-price"),
            ("limit", "10"),
            ("fields", "name,price"),
            ("difficulty", "easy"),
        ]));

        assert_eq!(set.len(), 1);
        for key in RESERVED_KEYS {
            assert!(!set.has_filter_for(key));
        }
        assert!(set.has_filter_for("difficulty"));
    }

    #[test]
    fn test_comparison_suffix_parsing() {
        let set = FilterSet::from_params(&params(&[
            ("duration[gte]", "5"),
            ("price[lt]", "1500"),
            ("ratings_average[gt]", "4.5"),
            ("max_group_size[lte]", "25"),
        ]));

        assert_eq!(set.len(), 4);
        let by_field = |f: &str| set.clauses().iter().find(|c| c.field == f).unwrap();

        assert_eq!(by_field("duration").comparison, Comparison::Gte);
        assert_eq!(by_field("duration").value, FilterValue::Int(5));
        assert_eq!(by_field("price").comparison, Comparison::Lt);
        assert_eq!(by_field("ratings_average").comparison, Comparison::Gt);
        assert_eq!(by_field("ratings_average").value, FilterValue::Float(4.5));
        assert_eq!(by_field("max_group_size").comparison, Comparison::Lte);
    }

    #[test]
    fn test_bare_key_is_equality() {
        let set = FilterSet::from_params(&params(&[("difficulty", "easy")]));
        let clause = &set.clauses()[0];
        assert_eq!(clause.field, "difficulty");
        assert_eq!(clause.comparison, Comparison::Eq);
        assert_eq!(clause.value, FilterValue::Text("easy".into()));
    }

    #[test]
    fn test_unrecognized_suffix_left_as_literal_key() {
        // `price[like]` is not a comparison we support; the whole key is
        // treated as an (unknown) field name and will match nothing later.
        let set = FilterSet::from_params(&params(&[("price[like]", "x")]));
        let clause = &set.clauses()[0];
        assert_eq!(clause.field, "price[like]");
        assert_eq!(clause.comparison, Comparison::Eq);
    }

    #[test]
    fn test_value_sniffing() {
        assert_eq!(FilterValue::parse("42"), FilterValue::Int(42));
        assert_eq!(FilterValue::parse("4.5"), FilterValue::Float(4.5));
        assert_eq!(FilterValue::parse("true"), FilterValue::Bool(true));
        assert_eq!(FilterValue::parse("easy"), FilterValue::Text("easy".into()));
    }

    #[test]
    fn test_sql_operators() {
        assert_eq!(Comparison::Eq.sql_operator(), "=");
        assert_eq!(Comparison::Gte.sql_operator(), ">=");
        assert_eq!(Comparison::Gt.sql_operator(), ">");
        assert_eq!(Comparison::Lte.sql_operator(), "<=");
        assert_eq!(Comparison::Lt.sql_operator(), "<");
    }
}
