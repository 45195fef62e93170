//! # Natural-Language Query Parsing
//!
//! Turns free text such as `"cheap italian food in london with kids menu"` into a
//! [`ParsedIntent`]: matched cuisines, feature flags, price level, minimum rating,
//! a location hint and whatever words are left over.
//!
//! Matching is deliberately naive. Every vocabulary entry is tested as a substring
//! of the lower-cased query, so `"thailand"` yields the `thai` cuisine. Price and
//! rating are assigned on every match, so under [`MatchPolicy::LastWins`] the last
//! matching entry in table order decides the value.
//!
//! ```
//! use dinesearch::parser::parse;
//!
//! let intent = parse("cheap italian food in london");
//! assert_eq!(intent.cuisines, vec!["italian"]);
//! assert_eq!(intent.price_level, Some(1));
//! assert_eq!(intent.location.as_deref(), Some("london"));
//! ```

use std::collections::BTreeMap;

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::vocab::{self, CUISINES, FeatureKey, PRICE_TIERS};

/// Tokens this short or shorter never become search terms or city matches.
const MIN_TOKEN_CHARS: usize = 3;

static LOCATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:in|near|at|around)\s+(.+?)(?:\s+(?:with|that|has|and)\b|$)")
        .expect("location pattern is valid")
});

static RATING_RULES: Lazy<Vec<RatingRule>> = Lazy::new(|| {
    vec![
        RatingRule {
            pattern: Regex::new(r"highly[ -]rated|top[ -]rated|best|excellent")
                .expect("superlative rating pattern is valid"),
            value: RatingValue::Fixed(4.5),
        },
        RatingRule {
            pattern: Regex::new(r"good rating|well[ -]rated").expect("good rating pattern is valid"),
            value: RatingValue::Fixed(4.0),
        },
        RatingRule {
            pattern: Regex::new(r"(\d+(?:\.\d+)?)\s*(?:\+|stars?\b)").expect("numeric rating pattern is valid"),
            value: RatingValue::Captured,
        },
    ]
});

struct RatingRule {
    pattern: Regex,
    value: RatingValue,
}

enum RatingValue {
    Fixed(f64),
    Captured,
}

impl RatingRule {
    fn evaluate(&self, lowered: &str) -> Option<f64> {
        match self.value {
            RatingValue::Fixed(value) => self.pattern.is_match(lowered).then_some(value),
            RatingValue::Captured => self
                .pattern
                .captures(lowered)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok()),
        }
    }
}

/// How repeated price/rating matches are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Every match overwrites the previous one; the last entry in table order wins.
    #[default]
    LastWins,
    /// The first matching entry in table order is kept.
    FirstWins,
}

impl MatchPolicy {
    #[inline]
    fn assign<T>(self, slot: &mut Option<T>, value: T) {
        match self {
            MatchPolicy::LastWins => *slot = Some(value),
            MatchPolicy::FirstWins => {
                if slot.is_none() {
                    *slot = Some(value);
                }
            }
        }
    }
}

/// Structured filter intent extracted from a free-text query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedIntent {
    pub cuisines: Vec<String>,
    /// Only ever holds `true`; an absent key means "unspecified".
    pub features: BTreeMap<FeatureKey, bool>,
    pub price_level: Option<u8>,
    pub rating: Option<f64>,
    pub location: Option<String>,
    pub search_terms: Vec<String>,
}

impl ParsedIntent {
    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.cuisines.is_empty()
            && self.features.is_empty()
            && self.price_level.is_none()
            && self.rating.is_none()
            && self.location.is_none()
            && self.search_terms.is_empty()
    }
}

/// Rule-based query parser. Stateless apart from its match policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParser {
    policy: MatchPolicy,
}

impl QueryParser {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    #[inline]
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn parse(&self, query: &str) -> ParsedIntent {
        let lowered = query.to_lowercase();
        let mut intent = ParsedIntent {
            cuisines: extract_cuisines(&lowered),
            features: extract_features(&lowered),
            price_level: self.extract_price(&lowered),
            rating: self.extract_rating(&lowered),
            ..ParsedIntent::default()
        };

        let tokens: Vec<&str> = query.split_whitespace().collect();

        // Prepositional phrase first; the city scan only fills an empty slot.
        let mut consumed_city = None;
        let mut location_words: Vec<String> = Vec::new();
        if let Some(phrase) = extract_location_phrase(&lowered) {
            trace!("location from phrase: {phrase}");
            location_words = phrase.split_whitespace().map(str::to_string).collect();
            intent.location = Some(phrase);
        } else if let Some((index, city)) = find_city(&tokens) {
            trace!("location from city list: {city}");
            consumed_city = Some(index);
            intent.location = Some(city);
        }

        intent.search_terms = tokens
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != consumed_city)
            .map(|(_, token)| *token)
            .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
            .filter(|token| {
                let lower = token.to_lowercase();
                !location_words.contains(&lower) && is_residual(&lower)
            })
            .map(str::to_string)
            .collect();

        debug!(
            "parsed {:?}: cuisines={:?} features={} price={:?} rating={:?} location={:?} terms={:?}",
            query,
            intent.cuisines,
            intent.features.len(),
            intent.price_level,
            intent.rating,
            intent.location,
            intent.search_terms
        );

        intent
    }

    fn extract_price(&self, lowered: &str) -> Option<u8> {
        let mut level = None;
        for tier in PRICE_TIERS {
            for phrase in tier.triggers {
                if lowered.contains(phrase) {
                    trace!("price tier {} matched {phrase:?}", tier.level);
                    self.policy.assign(&mut level, tier.level);
                }
            }
        }
        level
    }

    fn extract_rating(&self, lowered: &str) -> Option<f64> {
        let mut rating = None;
        for rule in RATING_RULES.iter() {
            if let Some(value) = rule.evaluate(lowered) {
                trace!("rating rule matched: {value}");
                self.policy.assign(&mut rating, value);
            }
        }
        rating
    }
}

/// Parse with the default [`QueryParser`] (last match wins).
pub fn parse(query: &str) -> ParsedIntent {
    QueryParser::default().parse(query)
}

fn extract_cuisines(lowered: &str) -> Vec<String> {
    CUISINES
        .iter()
        .filter(|cuisine| lowered.contains(**cuisine))
        .map(|cuisine| cuisine.to_string())
        .collect()
}

fn extract_features(lowered: &str) -> BTreeMap<FeatureKey, bool> {
    let mut features = BTreeMap::new();
    for key in FeatureKey::ALL {
        if key.triggers().iter().any(|phrase| lowered.contains(phrase)) {
            features.insert(*key, true);
        }
    }
    features
}

fn extract_location_phrase(lowered: &str) -> Option<String> {
    let captured = LOCATION_PATTERN.captures(lowered)?.get(1)?.as_str().trim();
    if captured.is_empty() {
        None
    } else {
        Some(captured.to_string())
    }
}

fn find_city(tokens: &[&str]) -> Option<(usize, String)> {
    tokens.iter().enumerate().find_map(|(index, token)| {
        if token.chars().count() < MIN_TOKEN_CHARS {
            return None;
        }
        let lower = token.to_lowercase();
        vocab::is_city(&lower).then_some((index, lower))
    })
}

fn is_residual(lower: &str) -> bool {
    !vocab::is_cuisine(lower) && !vocab::in_feature_phrase(lower) && !vocab::in_price_phrase(lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_yields_empty_intent() {
        let intent = parse("");
        assert!(intent.is_empty());
        assert_eq!(intent, ParsedIntent::default());
    }

    #[test]
    fn extracts_everything_from_a_family_query() {
        let intent = parse("cheap italian food in london with kids menu");
        assert_eq!(intent.cuisines, vec!["italian"]);
        assert_eq!(intent.features.get(&FeatureKey::KidsMenu), Some(&true));
        assert_eq!(intent.features.len(), 1);
        assert_eq!(intent.price_level, Some(1));
        assert_eq!(intent.rating, None);
        assert_eq!(intent.location.as_deref(), Some("london"));
        assert_eq!(intent.search_terms, vec!["food", "with"]);
    }

    #[test]
    fn superlative_rating_and_near_location() {
        let intent = parse("highly rated vegan restaurant near brighton");
        assert_eq!(intent.cuisines, vec!["vegan"]);
        assert_eq!(intent.rating, Some(4.5));
        assert_eq!(intent.location.as_deref(), Some("brighton"));
        assert!(intent.features.is_empty());
        assert_eq!(intent.search_terms, vec!["highly", "rated", "restaurant", "near"]);
    }

    #[test]
    fn cuisine_matching_is_substring_based() {
        let intent = parse("thailand street food");
        assert_eq!(intent.cuisines, vec!["thai"]);
        // The token itself is not a vocabulary entry, so it is kept as a term.
        assert_eq!(intent.search_terms, vec!["thailand", "street", "food"]);
    }

    #[test]
    fn cuisines_follow_vocabulary_order() {
        let intent = parse("sushi or chinese");
        assert_eq!(intent.cuisines, vec!["chinese", "sushi"]);
    }

    #[test]
    fn later_price_tier_overwrites_earlier() {
        assert_eq!(parse("cheap but upscale").price_level, Some(3));
        assert_eq!(parse("affordable fine dining").price_level, Some(4));
        // "inexpensive" also contains "expensive" from tier 3.
        assert_eq!(parse("inexpensive lunch").price_level, Some(3));
    }

    #[test]
    fn dollar_signs_resolve_to_longest_run() {
        assert_eq!(parse("$ noodles").price_level, Some(1));
        assert_eq!(parse("$$ noodles").price_level, Some(2));
        assert_eq!(parse("$$$$ tasting").price_level, Some(4));
    }

    #[test]
    fn first_wins_policy_keeps_first_match() {
        let parser = QueryParser::new(MatchPolicy::FirstWins);
        assert_eq!(parser.parse("cheap but upscale").price_level, Some(1));
        assert_eq!(parser.parse("best spot 3 stars").rating, Some(4.5));
        assert_eq!(parser.policy(), MatchPolicy::FirstWins);
    }

    #[test]
    fn explicit_rating_overrides_superlative() {
        assert_eq!(parse("best curry 3.5 stars").rating, Some(3.5));
        assert_eq!(parse("well rated brunch").rating, Some(4.0));
        assert_eq!(parse("pizza 4+").rating, Some(4.0));
    }

    #[test]
    fn rating_phrases_match_inside_words() {
        assert_eq!(parse("bestseller burgers").rating, Some(4.5));
        assert_eq!(parse("top-rated ramen").rating, Some(4.5));
        assert_eq!(parse("very well-rated curry").rating, Some(4.0));
    }

    #[test]
    fn numeric_rating_is_not_clamped() {
        assert_eq!(parse("10 stars burger").rating, Some(10.0));
    }

    #[test]
    fn city_scan_runs_when_no_preposition() {
        let intent = parse("Leeds ramen bar");
        assert_eq!(intent.location.as_deref(), Some("leeds"));
        assert_eq!(intent.cuisines, vec!["ramen"]);
        assert_eq!(intent.search_terms, vec!["bar"]);
    }

    #[test]
    fn only_the_first_city_token_is_consumed() {
        let intent = parse("york york");
        assert_eq!(intent.location.as_deref(), Some("york"));
        assert_eq!(intent.search_terms, vec!["york"]);
    }

    #[test]
    fn location_phrase_stops_at_boundary_word() {
        let intent = parse("brunch around covent garden that has parking");
        assert_eq!(intent.location.as_deref(), Some("covent garden"));
        assert_eq!(intent.features.get(&FeatureKey::Parking), Some(&true));
        assert_eq!(intent.features.get(&FeatureKey::OutdoorSeating), Some(&true));
    }

    #[test]
    fn search_terms_keep_original_casing() {
        let intent = parse("Dishoom Shoreditch");
        assert_eq!(intent.search_terms, vec!["Dishoom", "Shoreditch"]);
        assert_eq!(intent.location, None);
    }

    #[test]
    fn short_tokens_are_dropped() {
        let intent = parse("a b cd efg");
        assert_eq!(intent.search_terms, vec!["efg"]);
    }

    #[test]
    fn punctuation_and_unicode_are_total() {
        let intent = parse("¡¿ café — crêpes!!! ,,, ");
        assert_eq!(intent.search_terms, vec!["café", "crêpes!!!", ",,,"]);
        assert!(intent.cuisines.is_empty());
    }

    #[test]
    fn parse_is_deterministic() {
        let query = "buzzy tapas near bristol with outdoor seating";
        assert_eq!(parse(query), parse(query));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let intent = parse("cheap pizza with kids menu");
        let json = serde_json::to_value(&intent).expect("serialize intent");
        assert_eq!(json["priceLevel"], 1);
        assert_eq!(json["features"]["kidsMenu"], true);
        assert!(json["searchTerms"].is_array());
    }
}
