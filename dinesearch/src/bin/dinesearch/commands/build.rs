use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use dinesearch::{FilterDescriptor, SearchConfig};
use serde::Serialize;

use super::{join_query, list_or_dash};
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, create_table, or_dash};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Build Filters",
        commands: &[
            "dinesearch build thai noodle bar in leeds",
            "dinesearch build cheap pizza with high chair 4+",
        ],
    },
    ExampleGroup {
        title: "PostgREST Params",
        commands: &["dinesearch --output json build halal curry near bradford | jq .queryParams"],
    },
];

#[derive(Args)]
pub struct BuildArgs {
    /// Free-text search query
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

#[derive(Serialize)]
struct QueryParam {
    name: String,
    value: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DescriptorView<'a> {
    query: &'a str,
    #[serde(flatten)]
    descriptor: &'a FilterDescriptor,
    query_params: Vec<QueryParam>,
}

impl TableDisplay for DescriptorView<'_> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(options, &mut table, &["Filter", "Value"]);

        let features: Vec<&str> = self.descriptor.features.keys().map(|key| key.column()).collect();
        table.add_row(vec![
            Cell::new("OR conditions"),
            Cell::new(or_dash(self.descriptor.conditions.as_deref())),
        ]);
        table.add_row(vec![Cell::new("Features (AND)"), Cell::new(list_or_dash(&features))]);
        table.add_row(vec![Cell::new("Price level"), Cell::new(or_dash(self.descriptor.price_level))]);
        table.add_row(vec![Cell::new("Min rating"), Cell::new(or_dash(self.descriptor.rating))]);

        for param in &self.query_params {
            table.add_row(vec![Cell::new(format!("?{}", param.name)), Cell::new(&param.value)]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.query_params
            .iter()
            .map(|param| format!("{}={}", param.name, param.value))
            .collect::<Vec<String>>()
            .join("&")
    }
}

pub fn handle_build(args: BuildArgs, config: &SearchConfig, output: &OutputManager) -> Result<()> {
    let query = join_query(&args.query);
    let intent = config.parser().parse(&query);
    let builder = config.builder();
    let descriptor = builder.build(&intent);

    let query_params = descriptor
        .to_query_params(builder.fields())
        .into_iter()
        .map(|(name, value)| QueryParam { name, value })
        .collect();

    output.heading(&format!("Filters for \"{query}\""));
    output.display(&DescriptorView {
        query: &query,
        descriptor: &descriptor,
        query_params,
    })?;

    if descriptor.is_empty() {
        output.warning("No filters produced; the backend would return every restaurant");
    }

    Ok(())
}
