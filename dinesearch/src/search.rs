//! # Filter Building
//!
//! Converts a [`ParsedIntent`] into a backend-agnostic [`FilterDescriptor`].
//!
//! Two kinds of filters come out of a query and they combine differently:
//!
//! - **Fuzzy text matches** (cuisine, location, leftover words) are OR'd together
//!   and rendered as one comma-joined condition string.
//! - **Structured filters** (feature flags, price level, rating) are AND'd and are
//!   passed through untouched for the query executor to apply.
//!
//! ## Clause Syntax Quick Reference
//!
//! | Condition                        | Rendered               |
//! |----------------------------------|------------------------|
//! | `text_contains("city", "leeds")` | `city.ilike.%leeds%`   |
//! | `bool_eq("halal", true)`         | `halal.eq.true`        |
//! | `numeric_eq("price_level", 2.0)` | `price_level.eq.2`     |
//! | `numeric_at_least("rating", 4.5)`| `rating.gte.4.5`       |
//! | `or([a, b])`                     | `or(a,b)`              |
//! | `and([a, b])`                    | `and(a,b)`             |
//!
//! ```
//! use dinesearch::{parser::parse, search::build};
//!
//! let descriptor = build(&parse("thai in leeds"));
//! assert_eq!(
//!     descriptor.conditions.as_deref(),
//!     Some("cuisine.ilike.%thai%,city.ilike.%leeds%,address.ilike.%leeds%")
//! );
//! ```

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{errors::SearchError, parser::ParsedIntent, vocab::FeatureKey};

const CLAUSE_SEPARATOR: &str = ",";

/// Column names the builder targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    pub cuisine: String,
    pub city: String,
    pub address: String,
    pub name: String,
    pub price_level: String,
    pub rating: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            cuisine: "cuisine".to_string(),
            city: "city".to_string(),
            address: "address".to_string(),
            name: "name".to_string(),
            price_level: "price_level".to_string(),
            rating: "rating".to_string(),
        }
    }
}

impl FieldMap {
    /// Reject blank column names, which would render unusable clauses.
    pub fn validate(&self) -> Result<(), SearchError> {
        let entries = [
            ("cuisine", &self.cuisine),
            ("city", &self.city),
            ("address", &self.address),
            ("name", &self.name),
            ("price_level", &self.price_level),
            ("rating", &self.rating),
        ];
        for (key, value) in entries {
            if value.trim().is_empty() {
                return Err(SearchError::InvalidConfig {
                    message: format!("field name for {key} must not be empty"),
                });
            }
        }
        Ok(())
    }
}

/// A composable filter condition.
///
/// Leaf conditions target a single column; `And` and `Or` nest them. Rendering
/// uses PostgREST's filter grammar so the output can be handed straight to a
/// hosted Postgres API, while [`crate::filters`] evaluates the same tree in memory.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    // Leaf conditions
    TextContains { field: String, value: String },
    BooleanEquals { field: String, value: bool },
    NumericEquals { field: String, value: f64 },
    NumericAtLeast { field: String, min: f64 },
    // Composite conditions
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
}

impl FilterCondition {
    /// Case-insensitive substring match.
    #[inline]
    pub fn text_contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::TextContains {
            field: field.into(),
            value: value.into(),
        }
    }

    #[inline]
    pub fn bool_eq(field: impl Into<String>, value: bool) -> Self {
        Self::BooleanEquals {
            field: field.into(),
            value,
        }
    }

    #[inline]
    pub fn numeric_eq(field: impl Into<String>, value: f64) -> Self {
        Self::NumericEquals {
            field: field.into(),
            value,
        }
    }

    /// Inclusive lower bound.
    #[inline]
    pub fn numeric_at_least(field: impl Into<String>, min: f64) -> Self {
        Self::NumericAtLeast {
            field: field.into(),
            min,
        }
    }

    #[inline]
    pub fn and(conditions: impl IntoIterator<Item = FilterCondition>) -> Self {
        Self::And(conditions.into_iter().collect())
    }

    #[inline]
    pub fn or(conditions: impl IntoIterator<Item = FilterCondition>) -> Self {
        Self::Or(conditions.into_iter().collect())
    }

    /// Render as a PostgREST filter clause. Empty composites render as `""`.
    pub fn to_query_clause(&self) -> String {
        match self {
            Self::TextContains { field, value } => format!("{field}.ilike.%{value}%"),
            Self::BooleanEquals { field, value } => format!("{field}.eq.{value}"),
            Self::NumericEquals { field, value } => format!("{field}.eq.{value}"),
            Self::NumericAtLeast { field, min } => format!("{field}.gte.{min}"),
            Self::And(conditions) => render_group("and", conditions),
            Self::Or(conditions) => render_group("or", conditions),
        }
    }
}

fn render_group(operator: &str, conditions: &[FilterCondition]) -> String {
    let clauses: Vec<String> = conditions
        .iter()
        .map(FilterCondition::to_query_clause)
        .filter(|clause| !clause.is_empty())
        .collect();
    match clauses.len() {
        0 => String::new(),
        1 => clauses.into_iter().next().unwrap_or_default(),
        _ => format!("{operator}({})", clauses.join(CLAUSE_SEPARATOR)),
    }
}

/// Joins clauses into the flat OR list, or `None` when there are none.
fn join_clauses(conditions: &[FilterCondition]) -> Option<String> {
    if conditions.is_empty() {
        return None;
    }
    let rendered: Vec<String> = conditions.iter().map(FilterCondition::to_query_clause).collect();
    Some(rendered.join(CLAUSE_SEPARATOR))
}

/// Backend-ready filters derived from a parsed query.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDescriptor {
    /// Comma-joined OR group of `field.ilike.%value%` clauses.
    pub conditions: Option<String>,
    pub features: BTreeMap<FeatureKey, bool>,
    pub price_level: Option<u8>,
    pub rating: Option<f64>,
    /// The clauses `conditions` was rendered from, in the same order.
    #[serde(skip)]
    pub or_group: Vec<FilterCondition>,
}

impl FilterDescriptor {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_none() && self.features.is_empty() && self.price_level.is_none() && self.rating.is_none()
    }

    /// The AND side: one equality per feature flag, price equality, minimum rating.
    pub fn structured_filters(&self, fields: &FieldMap) -> Vec<FilterCondition> {
        let mut filters: Vec<FilterCondition> = self
            .features
            .iter()
            .map(|(key, value)| FilterCondition::bool_eq(key.column(), *value))
            .collect();
        if let Some(level) = self.price_level {
            filters.push(FilterCondition::numeric_eq(fields.price_level.as_str(), f64::from(level)));
        }
        if let Some(rating) = self.rating {
            filters.push(FilterCondition::numeric_at_least(fields.rating.as_str(), rating));
        }
        filters
    }

    /// The whole descriptor as a single condition tree: `And([Or(text)?, structured...])`.
    pub fn to_condition(&self, fields: &FieldMap) -> FilterCondition {
        let mut parts = Vec::with_capacity(1 + self.features.len() + 2);
        if !self.or_group.is_empty() {
            parts.push(FilterCondition::or(self.or_group.iter().cloned()));
        }
        parts.extend(self.structured_filters(fields));
        FilterCondition::and(parts)
    }

    /// PostgREST query parameters: `or=(...)` plus one pair per structured filter.
    pub fn to_query_params(&self, fields: &FieldMap) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(conditions) = &self.conditions {
            params.push(("or".to_string(), format!("({conditions})")));
        }
        for filter in self.structured_filters(fields) {
            let clause = filter.to_query_clause();
            if let Some((field, rest)) = clause.split_once('.') {
                params.push((field.to_string(), rest.to_string()));
            }
        }
        params
    }
}

/// Builds [`FilterDescriptor`]s against a configurable [`FieldMap`].
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    fields: FieldMap,
}

impl QueryBuilder {
    pub fn with_fields(fields: FieldMap) -> Self {
        Self { fields }
    }

    #[inline]
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn build(&self, intent: &ParsedIntent) -> FilterDescriptor {
        let fields = &self.fields;
        let mut or_group = Vec::with_capacity(intent.cuisines.len() + 2 + intent.search_terms.len());

        for cuisine in &intent.cuisines {
            or_group.push(FilterCondition::text_contains(fields.cuisine.as_str(), cuisine.as_str()));
        }

        if let Some(location) = &intent.location {
            or_group.push(FilterCondition::text_contains(fields.city.as_str(), location.as_str()));
            or_group.push(FilterCondition::text_contains(fields.address.as_str(), location.as_str()));
        }

        for term in &intent.search_terms {
            or_group.push(FilterCondition::text_contains(fields.name.as_str(), term.as_str()));
        }

        let descriptor = FilterDescriptor {
            conditions: join_clauses(&or_group),
            features: intent.features.clone(),
            price_level: intent.price_level,
            rating: intent.rating,
            or_group,
        };
        debug!("built filter descriptor: {:?}", descriptor.conditions);
        descriptor
    }
}

/// Build with the default column names.
pub fn build(intent: &ParsedIntent) -> FilterDescriptor {
    QueryBuilder::default().build(intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thai_in_leeds() -> ParsedIntent {
        ParsedIntent {
            cuisines: vec!["thai".to_string()],
            location: Some("leeds".to_string()),
            search_terms: vec!["noodle".to_string()],
            ..ParsedIntent::default()
        }
    }

    #[test]
    fn clause_order_is_cuisine_location_terms() {
        let descriptor = build(&thai_in_leeds());
        assert_eq!(
            descriptor.conditions.as_deref(),
            Some("cuisine.ilike.%thai%,city.ilike.%leeds%,address.ilike.%leeds%,name.ilike.%noodle%")
        );
        assert_eq!(descriptor.or_group.len(), 4);
    }

    #[test]
    fn empty_intent_builds_empty_descriptor() {
        let descriptor = build(&ParsedIntent::default());
        assert_eq!(descriptor.conditions, None);
        assert!(descriptor.features.is_empty());
        assert!(descriptor.is_empty());
        assert_eq!(descriptor.to_condition(&FieldMap::default()).to_query_clause(), "");
    }

    #[test]
    fn structured_values_pass_through() {
        let mut intent = ParsedIntent {
            price_level: Some(2),
            rating: Some(4.5),
            ..ParsedIntent::default()
        };
        intent.features.insert(FeatureKey::DogFriendly, true);

        let descriptor = build(&intent);
        assert_eq!(descriptor.conditions, None);
        assert_eq!(descriptor.features, intent.features);
        assert_eq!(descriptor.price_level, Some(2));
        assert_eq!(descriptor.rating, Some(4.5));
        assert!(!descriptor.is_empty());
    }

    #[test]
    fn custom_field_names_are_used() {
        let fields = FieldMap {
            name: "title".to_string(),
            city: "town".to_string(),
            ..FieldMap::default()
        };
        let descriptor = QueryBuilder::with_fields(fields).build(&thai_in_leeds());
        assert_eq!(
            descriptor.conditions.as_deref(),
            Some("cuisine.ilike.%thai%,town.ilike.%leeds%,address.ilike.%leeds%,title.ilike.%noodle%")
        );
    }

    #[test]
    fn structured_filters_render_as_and_side() {
        let mut intent = thai_in_leeds();
        intent.features.insert(FeatureKey::KidsMenu, true);
        intent.price_level = Some(1);
        intent.rating = Some(4.0);

        let fields = FieldMap::default();
        let descriptor = build(&intent);
        let clauses: Vec<String> = descriptor
            .structured_filters(&fields)
            .iter()
            .map(FilterCondition::to_query_clause)
            .collect();
        assert_eq!(clauses, vec!["kids_menu.eq.true", "price_level.eq.1", "rating.gte.4"]);

        assert_eq!(
            descriptor.to_condition(&fields).to_query_clause(),
            "and(or(cuisine.ilike.%thai%,city.ilike.%leeds%,address.ilike.%leeds%,name.ilike.%noodle%),\
             kids_menu.eq.true,price_level.eq.1,rating.gte.4)"
        );
    }

    #[test]
    fn query_params_split_or_group_from_filters() {
        let mut intent = thai_in_leeds();
        intent.features.insert(FeatureKey::Halal, true);
        intent.rating = Some(4.5);

        let params = build(&intent).to_query_params(&FieldMap::default());
        assert_eq!(
            params,
            vec![
                (
                    "or".to_string(),
                    "(cuisine.ilike.%thai%,city.ilike.%leeds%,address.ilike.%leeds%,name.ilike.%noodle%)".to_string()
                ),
                ("halal".to_string(), "eq.true".to_string()),
                ("rating".to_string(), "gte.4.5".to_string()),
            ]
        );
    }

    #[test]
    fn single_member_groups_collapse() {
        let single = FilterCondition::or([FilterCondition::bool_eq("posh", true)]);
        assert_eq!(single.to_query_clause(), "posh.eq.true");
        let nested_empty = FilterCondition::and([FilterCondition::or([]), FilterCondition::numeric_eq("price_level", 3.0)]);
        assert_eq!(nested_empty.to_query_clause(), "price_level.eq.3");
    }

    #[test]
    fn large_numbers_render_without_truncation() {
        let intent = ParsedIntent {
            rating: Some(1e20),
            price_level: Some(2),
            ..ParsedIntent::default()
        };
        let params = build(&intent).to_query_params(&FieldMap::default());
        assert_eq!(
            params,
            vec![
                ("price_level".to_string(), "eq.2".to_string()),
                ("rating".to_string(), "gte.100000000000000000000".to_string()),
            ]
        );
        assert_eq!(FilterCondition::numeric_at_least("rating", 3.75).to_query_clause(), "rating.gte.3.75");
    }

    #[test]
    fn blank_field_names_fail_validation() {
        let fields = FieldMap {
            address: "  ".to_string(),
            ..FieldMap::default()
        };
        let err = fields.validate().expect_err("blank address should fail");
        assert!(matches!(err, SearchError::InvalidConfig { message } if message.contains("address")));
        assert!(FieldMap::default().validate().is_ok());
    }

    #[test]
    fn descriptor_serializes_without_or_group() {
        let json = serde_json::to_value(build(&thai_in_leeds())).expect("serialize descriptor");
        assert!(json.get("orGroup").is_none());
        assert!(json["conditions"].is_string());
        assert!(json["priceLevel"].is_null());
    }
}
