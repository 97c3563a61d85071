//! `megaverse apply`: fetch, diff and submit.

use anyhow::{Context, Result};
use clap::Args;

use megaverse_sync::{pipeline, Config, HttpApi};

use super::plan::print_operations;

/// Arguments for `megaverse apply`.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Print the delta without submitting it.
    #[arg(long)]
    pub dry_run: bool,
}

impl ApplyArgs {
    pub fn run(self, config: &Config) -> Result<()> {
        let api = HttpApi::new(config);
        let outcome = pipeline::apply(&api, config, self.dry_run)
            .with_context(|| format!("apply failed for candidate '{}'", config.candidate_id))?;

        let plan = &outcome.plan;
        let prefix = if self.dry_run { "[dry-run] " } else { "" };

        if plan.is_converged() {
            println!("{prefix}✓ map already matches goal, nothing to do");
            return Ok(());
        }

        let summary = plan.summary();
        if outcome.submitted {
            println!(
                "✓ submitted {} operations ({} created, {} deleted)",
                summary.total(),
                summary.creates,
                summary.deletes
            );
        } else {
            println!(
                "{prefix}{} operations would be submitted ({} create, {} delete)",
                summary.total(),
                summary.creates,
                summary.deletes
            );
            print_operations(&plan.operations);
        }

        Ok(())
    }
}
