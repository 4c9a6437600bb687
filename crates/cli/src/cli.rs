// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use arbitration_config::{Config, LogFormat};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{
    level_filters::LevelFilter,
    subscriber::{set_global_default, SetGlobalDefaultError},
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(version, about = "Offline tooling for the arbitration subgraph read model")]
pub struct Cli {
    /// Path to the configuration file.
    /// Values can also be set with `ARBITRATION_` environment variables.
    #[arg(long, value_name = "FILE", verbatim_doc_comment, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check every fragment and query against the subgraph schema.
    Validate {
        /// SDL file, overrides `catalog.schema_path`.
        #[arg(long, value_name = "FILE")]
        schema: Option<PathBuf>,
    },
    /// Print the document of a query or fragment.
    Query {
        /// Query or fragment name, e.g. `DisputeWithVotesQuery` or `CourtFields`.
        /// Lists the catalog when omitted.
        name: Option<String>,
        /// Print the response shape instead of the document.
        #[arg(long)]
        tree: bool,
    },
    /// Decode a saved subgraph response and print it normalized.
    Decode {
        #[arg(value_enum)]
        kind: ResponseKind,
        /// JSON response body as returned by the subgraph.
        file: PathBuf,
    },
    /// Validate and print the court hierarchy of a saved `CourtsQuery` response.
    Courts { file: PathBuf },
    /// Summarize the lifecycle of a dispute from a saved `DisputeWithVotesQuery` response.
    Lifecycle {
        file: PathBuf,
        /// Unix timestamp to project the period at, defaults to now.
        #[arg(long)]
        now: Option<u64>,
    },
}

/// Query whose response a file holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResponseKind {
    Counter,
    Court,
    Courts,
    Dispute,
    DisputeWithVotes,
    DisputeVotes,
    Policy,
    Arbitrable,
    JurorStakes,
}

/// Sets up tracing, allows log level to be set from the environment variables
pub fn init_tracing(format: LogFormat) -> Result<(), SetGlobalDefaultError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let subscriber_builder: tracing_subscriber::fmt::SubscriberBuilder<
        tracing_subscriber::fmt::format::DefaultFields,
        tracing_subscriber::fmt::format::Format,
        EnvFilter,
    > = FmtSubscriber::builder().with_env_filter(filter);
    match format {
        LogFormat::Json => set_global_default(subscriber_builder.json().finish()),
        LogFormat::Full => set_global_default(subscriber_builder.finish()),
        LogFormat::Compact => set_global_default(subscriber_builder.compact().finish()),
        LogFormat::Pretty => {
            set_global_default(subscriber_builder.with_ansi(true).pretty().finish())
        }
    }
}

pub fn get_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let config = Config::parse(path).map_err(|e| {
        // the configured format is unknown, log with the default one
        let _ = init_tracing(LogFormat::default());
        tracing::error!(
            "Invalid configuration file `{}`: {}",
            path.cloned().unwrap_or_default().display(),
            e
        );
        anyhow::anyhow!(e)
    })?;

    init_tracing(config.log.format).map_err(|e| {
        anyhow::anyhow!(
            "Could not set up global default subscriber for logger, check \
            environmental variable `RUST_LOG`: {e}"
        )
    })?;

    Ok(config)
}
