use anyhow::Result;
use clap::Args;
use comfy_table::Table;
use dinesearch::{ParsedIntent, SearchConfig};
use serde::Serialize;

use super::{add_intent_rows, join_query, list_or_dash};
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, create_table};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Parse a Query",
        commands: &[
            "dinesearch parse cheap italian food in london with kids menu",
            "dinesearch parse \"highly rated vegan near brighton\"",
        ],
    },
    ExampleGroup {
        title: "Scripting",
        commands: &["dinesearch --output json parse dog friendly pub in york"],
    },
];

#[derive(Args)]
pub struct ParseArgs {
    /// Free-text search query
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

#[derive(Serialize)]
struct IntentView<'a> {
    query: &'a str,
    #[serde(flatten)]
    intent: &'a ParsedIntent,
}

impl TableDisplay for IntentView<'_> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(options, &mut table, &["Field", "Value"]);
        add_intent_rows(&mut table, self.intent);
        table
    }

    fn to_compact(&self) -> String {
        let features: Vec<&str> = self.intent.features.keys().map(|key| key.as_str()).collect();
        format!(
            "cuisines=[{}] features=[{}] price={} rating={} location={} terms=[{}]",
            self.intent.cuisines.join(","),
            features.join(","),
            self.intent.price_level.map(|p| p.to_string()).unwrap_or_default(),
            self.intent.rating.map(|r| r.to_string()).unwrap_or_default(),
            self.intent.location.as_deref().unwrap_or_default(),
            self.intent.search_terms.join(","),
        )
    }
}

pub fn handle_parse(args: ParseArgs, config: &SearchConfig, output: &OutputManager) -> Result<()> {
    let query = join_query(&args.query);
    let intent = config.parser().parse(&query);

    output.heading(&format!("Parsed \"{query}\""));
    output.display(&IntentView {
        query: &query,
        intent: &intent,
    })?;

    if intent.is_empty() {
        output.warning("Nothing recognised in this query");
    } else if !intent.search_terms.is_empty() {
        output.info("Unmatched words are searched against restaurant names:");
        for term in &intent.search_terms {
            output.bullet(term);
        }
    }
    output.verbose(&format!("search terms: {}", list_or_dash(&intent.search_terms)));

    Ok(())
}
