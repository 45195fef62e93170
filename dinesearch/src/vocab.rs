//! # Search Vocabularies
//!
//! Fixed keyword tables the query parser matches against. These tables are part
//! of the public contract: the cuisine list, feature keys and city list must stay
//! verbatim so parsed intents remain comparable across releases.
//!
//! | Table              | Entries | Matched by                          |
//! |--------------------|---------|-------------------------------------|
//! | [`CUISINES`]       | 33      | substring of the lower-cased query  |
//! | [`FeatureKey`]     | 31      | any trigger phrase as substring     |
//! | [`PRICE_TIERS`]    | 4       | any trigger phrase as substring     |
//! | [`CITIES`]         | 19      | whole whitespace token              |
//!
//! All phrases are stored lower-case.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::SearchError;

pub const CUISINES: &[&str] = &[
    "italian",
    "chinese",
    "japanese",
    "indian",
    "mexican",
    "thai",
    "french",
    "american",
    "british",
    "mediterranean",
    "spanish",
    "vietnamese",
    "korean",
    "greek",
    "turkish",
    "lebanese",
    "brazilian",
    "caribbean",
    "moroccan",
    "european",
    "asian",
    "african",
    "pizza",
    "burger",
    "sushi",
    "ramen",
    "curry",
    "tapas",
    "bbq",
    "seafood",
    "steak",
    "vegan",
    "vegetarian",
];

pub const CITIES: &[&str] = &[
    "london",
    "manchester",
    "birmingham",
    "leeds",
    "glasgow",
    "liverpool",
    "bristol",
    "sheffield",
    "edinburgh",
    "cardiff",
    "belfast",
    "nottingham",
    "newcastle",
    "brighton",
    "leicester",
    "oxford",
    "cambridge",
    "york",
    "bath",
];

/// A price band and the phrases that select it.
#[derive(Debug, Clone, Copy)]
pub struct PriceTier {
    pub level: u8,
    pub triggers: &'static [&'static str],
}

/// Price tiers in declaration order. Later tiers win under the default match policy.
pub const PRICE_TIERS: &[PriceTier] = &[
    PriceTier {
        level: 1,
        triggers: &["cheap", "budget", "inexpensive", "affordable", "$"],
    },
    PriceTier {
        level: 2,
        triggers: &["moderate", "mid-range", "mid range", "reasonable", "$$"],
    },
    PriceTier {
        level: 3,
        triggers: &["expensive", "upscale", "pricey", "$$$"],
    },
    PriceTier {
        level: 4,
        triggers: &["luxury", "fine dining", "high-end", "high end", "$$$$"],
    },
];

macro_rules! feature_keys {
    ($($variant:ident => $key:literal, $column:literal, [$($trigger:literal),+ $(,)?];)+) => {
        /// Boolean amenity flags a restaurant can advertise.
        ///
        /// Serialised as the camelCase key (`kidsMenu`); stored in the backend under
        /// the snake_case [`column`](FeatureKey::column) (`kids_menu`).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum FeatureKey {
            $($variant),+
        }

        impl FeatureKey {
            pub const ALL: &'static [FeatureKey] = &[$(FeatureKey::$variant),+];

            #[inline]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(FeatureKey::$variant => $key),+
                }
            }

            #[inline]
            pub const fn column(self) -> &'static str {
                match self {
                    $(FeatureKey::$variant => $column),+
                }
            }

            /// Lower-case phrases that switch this feature on when found in a query.
            #[inline]
            pub const fn triggers(self) -> &'static [&'static str] {
                match self {
                    $(FeatureKey::$variant => &[$($trigger),+]),+
                }
            }
        }
    };
}

feature_keys! {
    KidsMenu => "kidsMenu", "kids_menu", ["kids menu", "kid's menu", "children's menu", "childrens menu", "kids meals"];
    HighChairs => "highChairs", "high_chairs", ["high chair", "highchair"];
    ChangingTable => "changingTable", "changing_table", ["changing table", "baby changing", "changing facilities"];
    WheelchairAccess => "wheelchairAccess", "wheelchair_access", ["wheelchair", "accessible", "disabled access", "step-free", "step free"];
    OutdoorSeating => "outdoorSeating", "outdoor_seating", ["outdoor", "outside seating", "terrace", "garden", "patio", "al fresco"];
    VegetarianOptions => "vegetarianOptions", "vegetarian_options", ["vegetarian options", "veggie"];
    VeganOptions => "veganOptions", "vegan_options", ["vegan options", "plant based", "plant-based"];
    GlutenFree => "glutenFree", "gluten_free", ["gluten free", "gluten-free", "coeliac", "celiac"];
    Halal => "halal", "halal", ["halal"];
    Kosher => "kosher", "kosher", ["kosher"];
    Parking => "parking", "parking", ["parking", "car park"];
    PlaygroundNearby => "playgroundNearby", "playground_nearby", ["playground", "play park"];
    DogFriendly => "dogFriendly", "dog_friendly", ["dog friendly", "dog-friendly", "dogs allowed", "pet friendly"];
    Takeaway => "takeaway", "takeaway", ["takeaway", "take away", "takeout", "take out"];
    QuickService => "quickService", "quick_service", ["quick", "fast service"];
    GoodForGroups => "goodForGroups", "good_for_groups", ["groups", "large group", "big group", "party"];
    FreeKidsMeal => "freeKidsMeal", "free_kids_meal", ["free kids meal", "kids eat free", "kids eat for free"];
    AirConditioning => "airConditioning", "air_conditioning", ["air conditioning", "air-conditioned", "air con"];
    KidsPlaySpace => "kidsPlaySpace", "kids_play_space", ["play area", "play space", "soft play"];
    KidsColoring => "kidsColoring", "kids_coloring", ["colouring", "coloring", "crayons"];
    GamesAvailable => "gamesAvailable", "games_available", ["games", "board game"];
    HealthyOptions => "healthyOptions", "healthy_options", ["healthy", "salad"];
    SmallPlates => "smallPlates", "small_plates", ["small plates", "sharing plates"];
    Buzzy => "buzzy", "buzzy", ["buzzy", "lively", "busy"];
    Relaxed => "relaxed", "relaxed", ["relaxed", "chilled", "laid back", "quiet"];
    Posh => "posh", "posh", ["posh", "fancy", "elegant"];
    FunQuirky => "funQuirky", "fun_quirky", ["quirky", "fun", "unusual"];
    BabyChangeWomens => "babyChangeWomens", "baby_change_womens", ["womens baby change", "baby change in womens"];
    BabyChangeMens => "babyChangeMens", "baby_change_mens", ["mens baby change", "baby change in mens", "dad friendly"];
    BabyChangeUnisex => "babyChangeUnisex", "baby_change_unisex", ["unisex baby change", "family toilet"];
    PramStorage => "pramStorage", "pram_storage", ["pram", "buggy", "stroller"];
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKey {
    type Err = SearchError;

    /// Accepts either the camelCase key or the snake_case column name.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let trimmed = name.trim();
        FeatureKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str().eq_ignore_ascii_case(trimmed) || key.column().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SearchError::UnknownFeature {
                name: trimmed.to_string(),
            })
    }
}

/// Exact membership in the cuisine vocabulary.
#[inline]
pub fn is_cuisine(token: &str) -> bool {
    CUISINES.contains(&token)
}

/// Exact membership in the city list.
#[inline]
pub fn is_city(token: &str) -> bool {
    CITIES.contains(&token)
}

/// True when `token` occurs inside any feature trigger phrase.
pub fn in_feature_phrase(token: &str) -> bool {
    FeatureKey::ALL
        .iter()
        .flat_map(|key| key.triggers())
        .any(|phrase| phrase.contains(token))
}

/// True when `token` occurs inside any price trigger phrase.
pub fn in_price_phrase(token: &str) -> bool {
    PRICE_TIERS
        .iter()
        .flat_map(|tier| tier.triggers)
        .any(|phrase| phrase.contains(token))
}
