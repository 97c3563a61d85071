//! `megaverse plan`: print the delta `apply` would submit.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use megaverse_core::{CellKind, DeltaSummary, Operation};
use megaverse_sync::{pipeline, Config, HttpApi};

use super::{attribute_label, verb_label};

/// Arguments for `megaverse plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PlanJson<'a> {
    candidate_id: &'a str,
    rows: usize,
    columns: usize,
    summary: DeltaSummary,
    operations: &'a [Operation],
}

#[derive(Tabled)]
struct OperationRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "verb")]
    verb: String,
    #[tabled(rename = "kind")]
    kind: String,
    #[tabled(rename = "row")]
    row: usize,
    #[tabled(rename = "column")]
    column: usize,
    #[tabled(rename = "attribute")]
    attribute: String,
}

impl PlanArgs {
    pub fn run(self, config: &Config) -> Result<()> {
        let api = HttpApi::new(config);
        let plan = pipeline::plan(&api, config)
            .with_context(|| format!("plan failed for candidate '{}'", config.candidate_id))?;

        if self.json {
            let json = PlanJson {
                candidate_id: &config.candidate_id,
                rows: plan.goal.rows(),
                columns: plan.goal.columns(),
                summary: plan.summary(),
                operations: &plan.operations,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
            return Ok(());
        }

        println!(
            "Megaverse v{} | candidate {} | {}x{} map | {} operations",
            env!("CARGO_PKG_VERSION"),
            config.candidate_id,
            plan.goal.rows(),
            plan.goal.columns(),
            plan.operations.len(),
        );
        if plan.is_converged() {
            println!("Map already matches goal.");
            return Ok(());
        }

        let summary = plan.summary();
        for &kind in CellKind::all() {
            let counts = summary.for_kind(kind);
            if counts.creates + counts.deletes > 0 {
                println!("  {kind}: +{} -{}", counts.creates, counts.deletes);
            }
        }
        print_operations(&plan.operations);
        Ok(())
    }
}

pub(crate) fn print_operations(operations: &[Operation]) {
    let rows: Vec<OperationRow> = operations
        .iter()
        .enumerate()
        .map(|(index, op)| OperationRow {
            index: index + 1,
            verb: verb_label(op.verb).to_string(),
            kind: op.cell.kind.to_string(),
            row: op.cell.row,
            column: op.cell.column,
            attribute: attribute_label(op),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
