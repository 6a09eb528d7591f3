//! `snapsync plan` — print the commands that update the snapshot.

use std::io;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use snapsync_reconcile::{pipeline, Command, ScriptWriter, SyncReport};

use super::ConfigArgs;

/// Arguments for `snapsync plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Emit machine-readable JSON instead of a shell script.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PlannedCommand<'a> {
    #[serde(flatten)]
    command: &'a Command,
    line: String,
}

#[derive(Serialize)]
struct PlanJson<'a> {
    commands: Vec<PlannedCommand<'a>>,
    report: &'a SyncReport,
}

impl PlanArgs {
    pub fn run(self) -> Result<()> {
        let config = self.config.resolve()?;

        if self.json {
            let (commands, report) = pipeline::plan(&config).context("plan failed")?;
            let doc = PlanJson {
                commands: commands
                    .iter()
                    .map(|command| PlannedCommand {
                        command,
                        line: command.to_string(),
                    })
                    .collect(),
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&doc)?);
            return Ok(());
        }

        // Stream so every line decided before a failure is still printed.
        let mut script = ScriptWriter::new(io::stdout().lock());
        let report = pipeline::run(&config, &mut script).context("plan failed")?;
        print_summary(&report);
        Ok(())
    }
}

fn print_summary(report: &SyncReport) {
    if report.commands == 0 {
        eprintln!("{} snapshot is up to date", "✓".green().bold());
        return;
    }
    eprintln!(
        "{} {} commands ({} adds, {} deletes)",
        "✎".yellow().bold(),
        report.commands,
        report.adds.len(),
        report.deletes.len(),
    );
    if report.conflict {
        eprintln!(
            "{} file/directory type change: deletions are committed before adds",
            "!".red().bold()
        );
    }
}
