pub mod build;
pub mod parse;
pub mod search;
pub mod vocab;

use comfy_table::{Cell, Table};
use dinesearch::ParsedIntent;

use crate::output::or_dash;

/// Rejoin positional query words into the original free-text query.
pub fn join_query(words: &[String]) -> String {
    words.join(" ")
}

/// Append one row per intent field.
pub fn add_intent_rows(table: &mut Table, intent: &ParsedIntent) {
    let features: Vec<&str> = intent.features.keys().map(|key| key.as_str()).collect();
    table.add_row(vec![Cell::new("Cuisines"), Cell::new(list_or_dash(&intent.cuisines))]);
    table.add_row(vec![Cell::new("Features"), Cell::new(list_or_dash(&features))]);
    table.add_row(vec![Cell::new("Price level"), Cell::new(or_dash(intent.price_level))]);
    table.add_row(vec![Cell::new("Min rating"), Cell::new(or_dash(intent.rating))]);
    table.add_row(vec![Cell::new("Location"), Cell::new(or_dash(intent.location.as_deref()))]);
    table.add_row(vec![Cell::new("Search terms"), Cell::new(list_or_dash(&intent.search_terms))]);
}

pub fn list_or_dash<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.iter().map(|item| item.as_ref()).collect::<Vec<&str>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_query_words() {
        let words = vec!["thai".to_string(), "in".to_string(), "leeds".to_string()];
        assert_eq!(join_query(&words), "thai in leeds");
    }

    #[test]
    fn lists_render_dash_when_empty() {
        assert_eq!(list_or_dash::<String>(&[]), "-");
        assert_eq!(list_or_dash(&["kidsMenu", "halal"]), "kidsMenu, halal");
    }
}
