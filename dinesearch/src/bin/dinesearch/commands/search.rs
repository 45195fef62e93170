use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Table};
use dinesearch::{Restaurant, SearchConfig, filter_restaurants, load_restaurants};
use serde::Serialize;

use super::join_query;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, create_table, or_dash};
use crate::theme::ICONS;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Search a Dataset",
        commands: &[
            "dinesearch search --data restaurants.json sushi in manchester",
            "DINESEARCH_DATA=restaurants.json dinesearch search posh steak 4.5 stars",
        ],
    },
    ExampleGroup {
        title: "Limit Results",
        commands: &["dinesearch search --data restaurants.json --limit 5 cheap pizza"],
    },
];

#[derive(Args)]
pub struct SearchArgs {
    /// Free-text search query
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// JSON array of restaurants (defaults to [data].path in dinesearch.toml)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Maximum number of results to show
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Serialize)]
struct SearchResultsView<'a> {
    query: &'a str,
    total: usize,
    restaurants: Vec<&'a Restaurant>,
}

impl TableDisplay for SearchResultsView<'_> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(options, &mut table, &["Name", "Cuisine", "City", "Price", "Rating", "Features"]);

        for restaurant in &self.restaurants {
            let price = restaurant.price_level.map(|level| "£".repeat(usize::from(level)));
            let rating = restaurant.rating.map(|rating| format!("{rating} {}", ICONS.star));
            let features = restaurant.features.values().filter(|enabled| **enabled).count();
            table.add_row(vec![
                Cell::new(&restaurant.name),
                Cell::new(&restaurant.cuisine),
                Cell::new(&restaurant.city),
                Cell::new(or_dash(price)),
                Cell::new(or_dash(rating)),
                Cell::new(format!("{features} {}", ICONS.check)),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let names: Vec<&str> = self.restaurants.iter().map(|r| r.name.as_str()).collect();
        format!("{} match(es): {}", self.total, names.join(", "))
    }
}

pub fn handle_search(args: SearchArgs, config: &SearchConfig, output: &OutputManager) -> Result<()> {
    let data_path = match args.data {
        Some(path) => path,
        None => config
            .data
            .resolve_path()
            .context("No dataset given; pass --data or set [data].path")?,
    };
    output.verbose(&format!("dataset: {}", data_path.display()));

    let restaurants = load_restaurants(&data_path)?;
    output.info(&format!("Loaded {} restaurants from {}", restaurants.len(), data_path.display()));
    let query = join_query(&args.query);
    let intent = config.parser().parse(&query);
    let builder = config.builder();
    let descriptor = builder.build(&intent);
    output.verbose(&format!(
        "conditions: {}",
        descriptor.conditions.as_deref().unwrap_or("-")
    ));

    let mut matched = filter_restaurants(&restaurants, &descriptor, builder.fields());
    let total = matched.len();
    if let Some(limit) = args.limit {
        matched.truncate(limit);
    }

    output.heading(&format!("Results for \"{query}\""));
    output.display(&SearchResultsView {
        query: &query,
        total,
        restaurants: matched,
    })?;

    if total == 0 {
        output.warning("No restaurants matched");
    } else {
        output.success(&format!("{total} of {} restaurants matched", restaurants.len()));
    }

    Ok(())
}
