//! `snapsync status` — pending changes per source/destination pair.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use snapsync_core::PathPair;
use snapsync_reconcile::{Command, OsFileSystem, Reconciler, Session};

use super::ConfigArgs;

/// Arguments for `snapsync status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
struct PairStatus {
    source: String,
    destination: String,
    copies: usize,
    removes: usize,
    mkdirs: usize,
    adds: usize,
    deletes: usize,
    conflict: bool,
}

impl PairStatus {
    fn pending(&self) -> bool {
        self.copies + self.removes + self.mkdirs + self.adds + self.deletes > 0
    }
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "")]
    indicator: String,
    source: String,
    destination: String,
    copy: usize,
    rm: usize,
    mkdir: usize,
    #[tabled(rename = "svn add")]
    adds: usize,
    #[tabled(rename = "svn delete")]
    deletes: usize,
}

#[derive(Serialize)]
struct StatusReportJson {
    up_to_date: bool,
    conflict: bool,
    pairs: Vec<PairStatus>,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let config = self.config.resolve()?;
        let reconciler = Reconciler::from_config(&config);

        let mut rows = Vec::with_capacity(config.pairs.len());
        for pair in &config.pairs {
            let row = pair_status(&reconciler, pair)
                .with_context(|| format!("status failed for {pair}"))?;
            rows.push(row);
        }

        if self.json {
            let report = StatusReportJson {
                up_to_date: !rows.iter().any(PairStatus::pending),
                conflict: rows.iter().any(|r| r.conflict),
                pairs: rows,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        print_table(rows);
        Ok(())
    }
}

fn pair_status(
    reconciler: &Reconciler<OsFileSystem>,
    pair: &PathPair,
) -> Result<PairStatus> {
    let mut session = Session::new();
    let mut commands: Vec<Command> = Vec::new();
    reconciler.handle(pair, &mut session, &mut commands)?;

    let mut status = PairStatus {
        source: pair.source.display().to_string(),
        destination: pair.destination.display().to_string(),
        adds: session.pending_adds().len(),
        deletes: session.pending_deletes().len(),
        conflict: session.conflict(),
        ..PairStatus::default()
    };
    for command in &commands {
        match command {
            Command::Copy { .. } => status.copies += 1,
            Command::Remove { .. } => status.removes += 1,
            Command::Mkdir { .. } => status.mkdirs += 1,
            Command::VcsDelete { .. } | Command::VcsCommit { .. } | Command::VcsAdd { .. } => {}
        }
    }
    Ok(status)
}

fn print_table(rows: Vec<PairStatus>) {
    let pending = rows.iter().filter(|r| r.pending()).count();
    let conflict = rows.iter().any(|r| r.conflict);
    println!(
        "snapsync v{} | {} pairs | {} pending",
        env!("CARGO_PKG_VERSION"),
        rows.len(),
        pending,
    );

    let table_rows: Vec<StatusTableRow> = rows
        .into_iter()
        .map(|row| StatusTableRow {
            indicator: indicator(&row),
            copy: row.copies,
            rm: row.removes,
            mkdir: row.mkdirs,
            adds: row.adds,
            deletes: row.deletes,
            source: row.source,
            destination: row.destination,
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");

    if conflict {
        println!("Type conflicts found: deletions must be committed before adds.");
    }
    if pending > 0 {
        println!("Run 'snapsync plan' to print the commands.");
    }
}

fn indicator(row: &PairStatus) -> String {
    if row.conflict {
        "■".red().bold().to_string()
    } else if row.pending() {
        "■".yellow().bold().to_string()
    } else {
        "■".green().bold().to_string()
    }
}
