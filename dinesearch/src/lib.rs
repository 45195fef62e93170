//! dinesearch core library.
//!
//! Natural-language restaurant search in two pure steps:
//!
//! 1. [`parser::parse`] turns free text into a [`ParsedIntent`] (cuisines, feature
//!    flags, price level, minimum rating, location, leftover search terms).
//! 2. [`search::build`] turns that intent into a [`FilterDescriptor`]: an OR group
//!    of fuzzy text clauses plus structured filters for the backend to AND.
//!
//! [`filters`] executes a descriptor in memory; [`config`] loads `dinesearch.toml`.
//!
//! ```
//! use dinesearch::{build, parse};
//!
//! let descriptor = build(&parse("cheap italian food in london with kids menu"));
//! assert_eq!(descriptor.price_level, Some(1));
//! assert!(descriptor.conditions.unwrap().starts_with("cuisine.ilike.%italian%"));
//! ```

pub mod config;
pub mod errors;
pub mod filters;
pub mod parser;
pub mod search;
pub mod vocab;

pub use config::SearchConfig;
pub use errors::*;
pub use filters::{Filterable, Restaurant, apply, filter_restaurants, load_restaurants};
pub use parser::{MatchPolicy, ParsedIntent, QueryParser, parse};
pub use search::{FieldMap, FilterCondition, FilterDescriptor, QueryBuilder, build};
pub use vocab::FeatureKey;
