//! `megaverse show`: render one map as a glyph grid.

use anyhow::{Context, Result};
use clap::Args;

use megaverse_core::CellKind;
use megaverse_sync::{pipeline, Config, HttpApi, MapKind};

use super::glyph;

/// Arguments for `megaverse show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Render the goal map instead of the current one.
    #[arg(long)]
    pub goal: bool,
}

impl ShowArgs {
    pub fn run(self, config: &Config) -> Result<()> {
        let map = if self.goal {
            MapKind::Goal
        } else {
            MapKind::Current
        };
        let api = HttpApi::new(config);
        let snapshot = pipeline::fetch_snapshot(&api, &config.candidate_id, map)
            .with_context(|| format!("could not load {map} map"))?;

        println!(
            "{map} map {}x{} | {} polyanets, {} soloons, {} comeths",
            snapshot.rows(),
            snapshot.columns(),
            snapshot.count(CellKind::Polyanet),
            snapshot.count(CellKind::Soloon),
            snapshot.count(CellKind::Cometh),
        );
        for row in snapshot.row_slices() {
            let line: Vec<String> = row.iter().map(|cell| glyph(cell).to_string()).collect();
            println!("{}", line.join(" "));
        }
        Ok(())
    }
}
