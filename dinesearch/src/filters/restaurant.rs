use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    errors::SearchError,
    search::{FieldMap, FilterDescriptor},
    vocab::FeatureKey,
};

use super::Filterable;

/// A restaurant listing as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub features: BTreeMap<FeatureKey, bool>,
}

impl Restaurant {
    #[inline]
    pub fn has_feature(&self, key: FeatureKey) -> bool {
        self.features.get(&key).copied().unwrap_or(false)
    }
}

impl Filterable for Restaurant {
    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "cuisine" => Some(&self.cuisine),
            "city" => Some(&self.city),
            "address" => Some(&self.address),
            _ => None,
        }
    }

    fn flag_field(&self, field: &str) -> Option<bool> {
        let key = field.parse::<FeatureKey>().ok()?;
        Some(self.has_feature(key))
    }

    fn numeric_field(&self, field: &str) -> Option<f64> {
        match field {
            "price_level" => self.price_level.map(f64::from),
            "rating" => self.rating,
            _ => None,
        }
    }
}

/// Restaurants exposed under custom column names, as configured in a [`FieldMap`].
pub struct MappedRestaurant<'a> {
    pub restaurant: &'a Restaurant,
    pub fields: &'a FieldMap,
}

impl Filterable for MappedRestaurant<'_> {
    fn text_field(&self, field: &str) -> Option<&str> {
        let r = self.restaurant;
        let f = self.fields;
        if field == f.name {
            Some(&r.name)
        } else if field == f.cuisine {
            Some(&r.cuisine)
        } else if field == f.city {
            Some(&r.city)
        } else if field == f.address {
            Some(&r.address)
        } else {
            None
        }
    }

    fn flag_field(&self, field: &str) -> Option<bool> {
        self.restaurant.flag_field(field)
    }

    fn numeric_field(&self, field: &str) -> Option<f64> {
        if field == self.fields.price_level {
            self.restaurant.price_level.map(f64::from)
        } else if field == self.fields.rating {
            self.restaurant.rating
        } else {
            None
        }
    }
}

/// Restaurants matching the descriptor under the given column names, in input order.
pub fn filter_restaurants<'a>(
    restaurants: &'a [Restaurant],
    descriptor: &FilterDescriptor,
    fields: &FieldMap,
) -> Vec<&'a Restaurant> {
    let condition = descriptor.to_condition(fields);
    restaurants
        .iter()
        .filter(|restaurant| {
            condition.matches(&MappedRestaurant {
                restaurant: *restaurant,
                fields,
            })
        })
        .collect()
}

/// Read a JSON array of restaurants.
pub fn load_restaurants(path: impl AsRef<Path>) -> Result<Vec<Restaurant>, SearchError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|err| SearchError::io(path, err))?;
    let restaurants: Vec<Restaurant> = serde_json::from_str(&content)?;
    Ok(restaurants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::FilterCondition;

    fn sample() -> Restaurant {
        Restaurant {
            id: "r1".to_string(),
            name: "Bella Napoli".to_string(),
            cuisine: "Italian".to_string(),
            city: "London".to_string(),
            address: "12 Upper Street".to_string(),
            price_level: Some(1),
            rating: Some(4.6),
            features: BTreeMap::from([(FeatureKey::KidsMenu, true), (FeatureKey::Parking, false)]),
        }
    }

    #[test]
    fn flags_resolve_by_column_or_key() {
        let restaurant = sample();
        assert_eq!(restaurant.flag_field("kids_menu"), Some(true));
        assert_eq!(restaurant.flag_field("kidsMenu"), Some(true));
        assert_eq!(restaurant.flag_field("parking"), Some(false));
        assert_eq!(restaurant.flag_field("halal"), Some(false));
        assert_eq!(restaurant.flag_field("sauna"), None);
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{"id":"r2","name":"Wok Inn","features":{"takeaway":true}}"#;
        let restaurant: Restaurant = serde_json::from_str(json).expect("parse restaurant");
        assert_eq!(restaurant.city, "");
        assert_eq!(restaurant.price_level, None);
        assert!(restaurant.has_feature(FeatureKey::Takeaway));
    }

    #[test]
    fn mapped_columns_follow_field_map() {
        let restaurant = sample();
        let fields = FieldMap {
            name: "title".to_string(),
            rating: "stars".to_string(),
            ..FieldMap::default()
        };
        let mapped = MappedRestaurant {
            restaurant: &restaurant,
            fields: &fields,
        };
        assert!(FilterCondition::text_contains("title", "napoli").matches(&mapped));
        assert!(!FilterCondition::text_contains("name", "napoli").matches(&mapped));
        assert!(FilterCondition::numeric_at_least("stars", 4.5).matches(&mapped));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_restaurants("does/not/exist.json").expect_err("missing file should fail");
        assert!(matches!(err, SearchError::Io { ref path, .. } if path.ends_with("exist.json")));
    }
}
