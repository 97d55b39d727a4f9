//! The chainable query-feature builder.
//!
//! [`ApiFeatures`] captures a raw query-string map and refines it in four
//! steps — filter, sort, limit_fields, paginate — each parsing one part of
//! the map into its specification. Nothing touches the database here:
//! [`ApiFeatures::select`] renders the accumulated specifications into a
//! single parameterized statement, and the caller executes it exactly once.

use std::collections::HashMap;

use wf_core::pagination::PageWindow;

use crate::collection::CollectionSpec;
use crate::filters::{FilterClause, FilterSet, FilterValue};
use crate::projection::Projection;
use crate::sorts::SortOrder;

/// A rendered, not-yet-executed select statement
#[derive(Debug, Clone, PartialEq)]
pub struct SqlSelect {
    /// Statement text with `$1`-style placeholders
    pub sql: String,
    /// Operands in placeholder order
    pub binds: Vec<FilterValue>,
}

/// Builder translating query parameters into a refined collection query
#[derive(Debug, Clone)]
pub struct ApiFeatures {
    params: HashMap<String, String>,
    parent: Option<FilterClause>,
    filter: FilterSet,
    sort: SortOrder,
    projection: Projection,
    page: PageWindow,
}

impl ApiFeatures {
    /// Capture the raw parameter map. All specifications start at their
    /// defaults; call the refinement methods to populate them.
    pub fn new(params: &HashMap<String, String>) -> Self {
        Self {
            params: params.clone(),
            parent: None,
            filter: FilterSet::new(),
            sort: SortOrder::new(),
            projection: Projection::Default,
            page: PageWindow::default(),
        }
    }

    /// Narrow to records under a parent resource (e.g. reviews of one tour)
    /// before any client-supplied filter applies.
    pub fn with_parent(mut self, clause: FilterClause) -> Self {
        self.parent = Some(clause);
        self
    }

    /// Parse every non-reserved key into a filter clause.
    pub fn filter(&mut self) -> &mut Self {
        self.filter = FilterSet::from_params(&self.params);
        self
    }

    /// Parse the `sort` parameter; absent means natural order.
    pub fn sort(&mut self) -> &mut Self {
        if let Some(sort) = self.params.get("sort") {
            self.sort = SortOrder::parse(sort);
        }
        self
    }

    /// Parse the `fields` parameter; absent means all but the version marker.
    pub fn limit_fields(&mut self) -> &mut Self {
        if let Some(fields) = self.params.get("fields") {
            self.projection = Projection::parse(fields);
        }
        self
    }

    /// Parse `page` and `limit`, degrading to the (1, 100) defaults.
    pub fn paginate(&mut self) -> &mut Self {
        self.page = PageWindow::from_raw(
            self.params.get("page").map(String::as_str),
            self.params.get("limit").map(String::as_str),
        );
        if self.page.limit > 1000 {
            tracing::warn!(limit = self.page.limit, "very large page size requested");
        }
        self
    }

    pub fn filter_set(&self) -> &FilterSet {
        &self.filter
    }

    pub fn sort_order(&self) -> &SortOrder {
        &self.sort
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn page(&self) -> PageWindow {
        self.page
    }

    /// Render the refinements, in filter -> sort -> project -> paginate
    /// order, into one select over the given collection.
    ///
    /// Filter fields outside the collection's column list render as an
    /// empty-matching `FALSE` clause; unknown sort fields are skipped.
    pub fn select(&self, spec: &CollectionSpec) -> SqlSelect {
        let mut binds: Vec<FilterValue> = Vec::new();

        let columns = self.projection.columns(spec).join(", ");
        let mut sql = format!("SELECT {} FROM {}", columns, spec.table);

        let mut conditions: Vec<String> = Vec::new();
        let clauses = self.parent.iter().chain(self.filter.clauses());
        for clause in clauses {
            if spec.has_column(&clause.field) {
                binds.push(clause.value.clone());
                conditions.push(format!(
                    "{} {} ${}",
                    clause.field,
                    clause.comparison.sql_operator(),
                    binds.len()
                ));
            } else {
                tracing::debug!(field = %clause.field, table = spec.table, "filter on unknown field matches nothing");
                conditions.push("FALSE".to_string());
            }
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        let order: Vec<String> = self
            .sort
            .criteria()
            .iter()
            .filter(|c| spec.has_column(&c.field))
            .map(|c| format!("{} {}", c.field, c.direction.as_sql()))
            .collect();
        if !order.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.join(", "));
        }

        sql.push_str(&format!(
            " LIMIT {} OFFSET {}",
            self.page.limit,
            self.page.offset()
        ));

        SqlSelect { sql, binds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::Comparison;
    use crate::sorts::SortCriterion;

    const TOURS: CollectionSpec = CollectionSpec::new(
        "tours",
        &[
            "id",
            "name",
            "duration",
            "difficulty",
            "price",
            "ratings_average",
            "lock_version",
        ],
    );

    const REVIEWS: CollectionSpec = CollectionSpec::new(
        "reviews",
        &["id", "tour_id", "user_id", "rating", "body", "lock_version"],
    )
    .with_parent("tour_id");

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn build(pairs: &[(&str, &str)]) -> ApiFeatures {
        let mut features = ApiFeatures::new(&params(pairs));
        features.filter().sort().limit_fields().paginate();
        features
    }

    #[test]
    fn test_bare_select() {
        let select = build(&[]).select(&TOURS);
        assert_eq!(
            select.sql,
            "SELECT id, name, duration, difficulty, price, ratings_average FROM tours LIMIT 100 OFFSET 0"
        );
        assert!(select.binds.is_empty());
    }

    #[test]
    fn test_full_refinement_chain() {
        let select = build(&[
            ("price[lte]", "1500"),
            ("difficulty", "easy"),
            ("sort", "-price,name"),
            ("fields", "name,price"),
            ("page", "2"),
            ("limit", "10"),
        ])
        .select(&TOURS);

        assert_eq!(
            select.sql,
            "SELECT id, name, price FROM tours WHERE difficulty = $1 AND price <= $2 \
             ORDER BY price DESC, name ASC LIMIT 10 OFFSET 10"
        );
        assert_eq!(
            select.binds,
            vec![FilterValue::Text("easy".into()), FilterValue::Int(1500)]
        );
    }

    #[test]
    fn test_reserved_keys_absent_from_where_clause() {
        let select = build(&[("page", "3"), ("limit", "5"), ("sort", "name")]).select(&TOURS);
        assert!(!select.sql.contains("WHERE"));
        assert!(select.binds.is_empty());
    }

    #[test]
    fn test_unknown_filter_field_matches_nothing() {
        let select = build(&[("secret", "1")]).select(&TOURS);
        assert!(select.sql.contains("WHERE FALSE"));
        assert!(select.binds.is_empty());
    }

    #[test]
    fn test_unknown_sort_field_skipped() {
        let select = build(&[("sort", "-bogus,price")]).select(&TOURS);
        assert_eq!(
            select.sql,
            "SELECT id, name, duration, difficulty, price, ratings_average FROM tours \
             ORDER BY price ASC LIMIT 100 OFFSET 0"
        );
    }

    #[test]
    fn test_parent_scope_precedes_filters() {
        let mut features = ApiFeatures::new(&params(&[("rating[gte]", "4")]))
            .with_parent(FilterClause::eq("tour_id", 7));
        features.filter().sort().limit_fields().paginate();
        let select = features.select(&REVIEWS);

        assert_eq!(
            select.sql,
            "SELECT id, tour_id, user_id, rating, body FROM reviews \
             WHERE tour_id = $1 AND rating >= $2 LIMIT 100 OFFSET 0"
        );
        assert_eq!(
            select.binds,
            vec![FilterValue::Int(7), FilterValue::Int(4)]
        );
    }

    #[test]
    fn test_malformed_page_and_limit_degrade() {
        let select = build(&[("page", "two"), ("limit", "-5")]).select(&TOURS);
        assert!(select.sql.ends_with("LIMIT 100 OFFSET 0"));
    }

    #[test]
    fn test_chained_equals_manual_refinement() {
        let raw = params(&[
            ("duration[gte]", "5"),
            ("sort", "-ratings_average"),
            ("fields", "name,price,ratings_average"),
            ("page", "2"),
            ("limit", "10"),
        ]);

        let mut chained = ApiFeatures::new(&raw);
        chained.filter().sort().limit_fields().paginate();

        let mut manual = ApiFeatures::new(&raw);
        manual.filter = FilterSet::new().with(FilterClause::new(
            "duration",
            Comparison::Gte,
            FilterValue::Int(5),
        ));
        manual.sort = SortOrder::new().then(SortCriterion::desc("ratings_average"));
        manual.projection = Projection::parse("name,price,ratings_average");
        manual.page = PageWindow::new(2, 10);

        assert_eq!(chained.select(&TOURS), manual.select(&TOURS));
    }

    #[test]
    fn test_refinement_order_is_immaterial() {
        let raw = params(&[("price[lt]", "900"), ("sort", "price"), ("limit", "3")]);

        let mut forward = ApiFeatures::new(&raw);
        forward.filter().sort().limit_fields().paginate();

        let mut reversed = ApiFeatures::new(&raw);
        reversed.paginate().limit_fields().sort().filter();

        assert_eq!(forward.select(&TOURS), reversed.select(&TOURS));
    }
}
