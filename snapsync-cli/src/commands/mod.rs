pub mod plan;
pub mod status;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;

use snapsync_core::{config, PathPair, SyncConfig};

// ---------------------------------------------------------------------------
// Shared config selection
// ---------------------------------------------------------------------------

/// Where the list of trees to reconcile comes from.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// YAML config listing source/destination pairs
    /// (default: ./snapsync.yaml, else the built-in release layout).
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Reconcile SRC into DST instead of the configured pairs. Repeatable.
    #[arg(long = "pair", value_name = "SRC=DST")]
    pub pairs: Vec<PairArg>,

    /// Message for the commit that isolates deletions after a type conflict.
    #[arg(long)]
    pub commit_message: Option<String>,
}

impl ConfigArgs {
    pub fn resolve(&self) -> Result<SyncConfig> {
        let mut resolved = match &self.config {
            Some(path) => config::load_at(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => {
                let cwd =
                    std::env::current_dir().context("could not determine working directory")?;
                config::load_or_default_at(&cwd).context("failed to load snapsync.yaml")?
            }
        };
        if !self.pairs.is_empty() {
            resolved.pairs = self.pairs.iter().map(|p| p.0.clone()).collect();
        }
        if let Some(message) = &self.commit_message {
            resolved.commit_message = message.clone();
        }
        Ok(resolved)
    }
}

/// Thin wrapper so clap can parse a [`PathPair`] from `SRC=DST`.
#[derive(Debug, Clone)]
pub struct PairArg(pub PathPair);

impl FromStr for PairArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((src, dst)) if !src.is_empty() && !dst.is_empty() => {
                Ok(Self(PathPair::new(src, dst)))
            }
            _ => Err(format!("expected SRC=DST, got '{s}'")),
        }
    }
}
