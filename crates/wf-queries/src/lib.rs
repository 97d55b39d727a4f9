//! # wf-queries
//!
//! Translates a flat query-string map into filtered, sorted, projected, and
//! paginated SQL selects for Wayfarer collections.
//!
//! ## Structure
//!
//! - `filters` - Comparison operators and filter clauses
//! - `sorts` - Sort criteria parsed from `sort=-price,name`
//! - `projection` - Column inclusion parsed from `fields=name,price`
//! - `collection` - Per-resource collection descriptors
//! - `features` - The chainable [`ApiFeatures`] builder
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use wf_queries::{ApiFeatures, CollectionSpec};
//!
//! const SPEC: CollectionSpec = CollectionSpec::new(
//!     "tours",
//!     &["id", "name", "price", "lock_version"],
//! );
//!
//! let mut params = HashMap::new();
//! params.insert("price[lte]".to_string(), "1500".to_string());
//! params.insert("sort".to_string(), "-price".to_string());
//!
//! let mut features = ApiFeatures::new(&params);
//! let select = features
//!     .filter()
//!     .sort()
//!     .limit_fields()
//!     .paginate()
//!     .select(&SPEC);
//!
//! assert!(select.sql.contains("ORDER BY price DESC"));
//! ```

pub mod collection;
pub mod features;
pub mod filters;
pub mod projection;
pub mod sorts;

pub use collection::CollectionSpec;
pub use features::{ApiFeatures, SqlSelect};
pub use filters::{Comparison, FilterClause, FilterSet, FilterValue, RESERVED_KEYS};
pub use projection::Projection;
pub use sorts::{SortCriterion, SortDirection, SortOrder};
