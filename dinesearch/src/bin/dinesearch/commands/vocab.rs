use anyhow::Result;
use clap::{Args, ValueEnum};
use comfy_table::{Cell, Table};
use dinesearch::SearchConfig;
use dinesearch::vocab::{CITIES, CUISINES, FeatureKey, PRICE_TIERS};
use serde::Serialize;

use super::list_or_dash;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, create_table};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Vocabularies",
    commands: &[
        "dinesearch vocab                  # Everything the parser recognises",
        "dinesearch vocab features         # Feature keys, columns and trigger phrases",
        "dinesearch --output json vocab cities",
    ],
}];

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum VocabTable {
    All,
    Cuisines,
    Features,
    Prices,
    Cities,
}

#[derive(Args)]
pub struct VocabArgs {
    /// Which vocabulary to list
    #[arg(value_enum, default_value_t = VocabTable::All)]
    pub table: VocabTable,
}

#[derive(Serialize)]
struct FeatureEntry {
    key: &'static str,
    column: &'static str,
    triggers: &'static [&'static str],
}

#[derive(Serialize)]
struct PriceEntry {
    level: u8,
    triggers: &'static [&'static str],
}

#[derive(Serialize)]
struct VocabView {
    #[serde(skip_serializing_if = "Option::is_none")]
    cuisines: Option<&'static [&'static str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<Vec<FeatureEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prices: Option<Vec<PriceEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cities: Option<&'static [&'static str]>,
}

impl VocabView {
    fn select(table: VocabTable) -> Self {
        let wants = |candidate: VocabTable| table == VocabTable::All || table == candidate;
        Self {
            cuisines: wants(VocabTable::Cuisines).then_some(CUISINES),
            features: wants(VocabTable::Features).then(|| {
                FeatureKey::ALL
                    .iter()
                    .map(|key| FeatureEntry {
                        key: key.as_str(),
                        column: key.column(),
                        triggers: key.triggers(),
                    })
                    .collect()
            }),
            prices: wants(VocabTable::Prices).then(|| {
                PRICE_TIERS
                    .iter()
                    .map(|tier| PriceEntry {
                        level: tier.level,
                        triggers: tier.triggers,
                    })
                    .collect()
            }),
            cities: wants(VocabTable::Cities).then_some(CITIES),
        }
    }
}

impl TableDisplay for VocabView {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(options, &mut table, &["Vocabulary", "Entry", "Matches"]);

        if let Some(cuisines) = self.cuisines {
            table.add_row(vec![Cell::new("cuisine"), Cell::new(cuisines.len()), Cell::new(list_or_dash(cuisines))]);
        }
        if let Some(features) = &self.features {
            for entry in features {
                table.add_row(vec![
                    Cell::new("feature"),
                    Cell::new(format!("{} ({})", entry.key, entry.column)),
                    Cell::new(list_or_dash(entry.triggers)),
                ]);
            }
        }
        if let Some(prices) = &self.prices {
            for entry in prices {
                table.add_row(vec![
                    Cell::new("price"),
                    Cell::new(entry.level),
                    Cell::new(list_or_dash(entry.triggers)),
                ]);
            }
        }
        if let Some(cities) = self.cities {
            table.add_row(vec![Cell::new("city"), Cell::new(cities.len()), Cell::new(list_or_dash(cities))]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let mut parts = Vec::new();
        if let Some(cuisines) = self.cuisines {
            parts.push(format!("cuisines={}", cuisines.len()));
        }
        if let Some(features) = &self.features {
            parts.push(format!("features={}", features.len()));
        }
        if let Some(prices) = &self.prices {
            parts.push(format!("prices={}", prices.len()));
        }
        if let Some(cities) = self.cities {
            parts.push(format!("cities={}", cities.len()));
        }
        parts.join(" ")
    }
}

pub fn handle_vocab(args: VocabArgs, config: &SearchConfig, output: &OutputManager) -> Result<()> {
    output.key_value("Match policy", &format!("{:?}", config.parser.match_policy));
    output.display(&VocabView::select(args.table))
}
