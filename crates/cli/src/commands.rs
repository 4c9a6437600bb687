// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use std::{
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{anyhow, Context};
use arbitration_client::{decode_response, QueryError, SubgraphBackend, SubgraphReader};
use arbitration_config::Config;
use arbitration_query::{
    fragment, query_documents,
    queries::{
        ArbitrableResponse, CounterResponse, CourtResponse, CourtsResponse,
        DisputeResponse, DisputeVotesResponse, DisputeWithVotesResponse, JurorStakesResponse,
        PolicyResponse,
    },
    validate_catalog, ArbitrableQuery, CatalogQuery, CounterQuery, CourtQuery, CourtsQuery,
    DisputeQuery, DisputeVotesQuery, DisputeWithVotesQuery, JurorStakesQuery, PolicyQuery,
    BUNDLED_SCHEMA, CATALOG_VERSION, FRAGMENTS,
};
use arbitration_schema::{BigInt, CommitStatus, CourtTree, DisputeWithRounds};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::cli::{Command, ResponseKind};

pub async fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    match command {
        Command::Validate { schema } => {
            let path = schema.or_else(|| config.catalog.schema_path.clone());
            let sdl = match &path {
                Some(path) => read(path).await?,
                None => BUNDLED_SCHEMA.to_string(),
            };
            validate_catalog(&sdl)?;
            info!(
                version = CATALOG_VERSION,
                schema = %path.map(|p| p.display().to_string()).unwrap_or("bundled".to_string()),
                "Catalog matches the schema"
            );
            Ok(())
        }
        Command::Query { name, tree } => {
            println!("{}", describe(name.as_deref(), tree)?);
            Ok(())
        }
        Command::Decode { kind, file } => {
            let raw = read(&file).await?;
            let decoded = decode(kind, &raw, config.decode.check_invariants)?;
            println!("{}", serde_json::to_string_pretty(&decoded)?);
            Ok(())
        }
        Command::Courts { file } => {
            let reader = SubgraphReader::new(SavedResponse { path: file })
                .with_page_size(config.query.first);
            let tree = reader.court_tree().await?;
            if config.decode.check_invariants {
                for (_, court) in tree.iter() {
                    court.check_invariants()?;
                }
            }
            info!(courts = tree.len(), "Court tree is consistent");
            println!("{}", render_court_tree(&tree));
            Ok(())
        }
        Command::Lifecycle { file, now } => {
            let raw = read(&file).await?;
            let dispute = decode_as::<DisputeWithVotesQuery, DisputeWithVotesResponse>(&raw)?
                .dispute
                .ok_or_else(|| anyhow!("No dispute in `{}`", file.display()))?;
            let now = match now {
                Some(now) => now,
                None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs(),
            };
            println!("{}", lifecycle_summary(&dispute, &BigInt::from(now)));
            Ok(())
        }
    }
}

/// Answers every query with a response saved to disk.
struct SavedResponse {
    path: PathBuf,
}

#[async_trait]
impl SubgraphBackend for SavedResponse {
    async fn execute(&self, body: serde_json::Value) -> anyhow::Result<String> {
        debug!(
            operation = %body["operationName"],
            file = %self.path.display(),
            "Answering from saved response"
        );
        read(&self.path).await
    }
}

async fn read(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read `{}`", path.display()))
}

fn decode_as<Q: CatalogQuery, T: DeserializeOwned>(raw: &str) -> Result<T, QueryError> {
    decode_response(Q::OPERATION_NAME, raw)
}

/// Lists the catalog, or prints one query or fragment.
pub fn describe(name: Option<&str>, tree: bool) -> anyhow::Result<String> {
    let Some(name) = name else {
        let mut lines = vec![format!("catalog {CATALOG_VERSION}")];
        lines.extend(query_documents().into_iter().map(|(name, _)| format!("query {name}")));
        lines.extend(
            FRAGMENTS
                .iter()
                .map(|f| format!("fragment {} on {}", f.name, f.type_condition)),
        );
        return Ok(lines.join("\n"));
    };

    if let Some(fragment) = fragment(name) {
        return Ok(if tree {
            fragment.selection()?.to_string()
        } else {
            fragment.document()
        });
    }

    let (_, document) = query_documents()
        .into_iter()
        .find(|(query, _)| *query == name)
        .ok_or_else(|| anyhow!("No query or fragment named `{name}`"))?;
    if tree {
        return Err(anyhow!(
            "Response shapes are available for fragments, `{name}` is a query"
        ));
    }
    Ok(document.to_string())
}

/// Decodes a saved response and returns it re-encoded.
pub fn decode(
    kind: ResponseKind,
    raw: &str,
    check_invariants: bool,
) -> anyhow::Result<serde_json::Value> {
    let value = match kind {
        ResponseKind::Counter => {
            let data = decode_as::<CounterQuery, CounterResponse>(raw)?;
            if let Some(counter) = data.kleros_counter.as_ref().filter(|_| check_invariants) {
                counter.check_invariants()?;
            }
            serde_json::to_value(data)?
        }
        ResponseKind::Court => {
            let data = decode_as::<CourtQuery, CourtResponse>(raw)?;
            if let Some(court) = data.court.as_ref().filter(|_| check_invariants) {
                court.check_invariants()?;
            }
            serde_json::to_value(data)?
        }
        ResponseKind::Courts => {
            let data = decode_as::<CourtsQuery, CourtsResponse>(raw)?;
            if check_invariants {
                for court in &data.courts {
                    court.check_invariants()?;
                }
                CourtTree::new(data.courts.clone())?;
            }
            serde_json::to_value(data)?
        }
        ResponseKind::Dispute => {
            serde_json::to_value(decode_as::<DisputeQuery, DisputeResponse>(raw)?)?
        }
        ResponseKind::DisputeWithVotes => serde_json::to_value(decode_as::<
            DisputeWithVotesQuery,
            DisputeWithVotesResponse,
        >(raw)?)?,
        ResponseKind::DisputeVotes => {
            let data = decode_as::<DisputeVotesQuery, DisputeVotesResponse>(raw)?;
            if check_invariants {
                for vote in &data.votes {
                    if vote.verify_commit()? == CommitStatus::Mismatch {
                        return Err(anyhow!("Vote `{}` does not match its commit", vote.id));
                    }
                }
            }
            serde_json::to_value(data)?
        }
        ResponseKind::Policy => {
            serde_json::to_value(decode_as::<PolicyQuery, PolicyResponse>(raw)?)?
        }
        ResponseKind::Arbitrable => {
            let data = decode_as::<ArbitrableQuery, ArbitrableResponse>(raw)?;
            if let Some(arbitrable) = data.arbitrable.as_ref().filter(|_| check_invariants) {
                arbitrable.check_invariants()?;
            }
            serde_json::to_value(data)?
        }
        ResponseKind::JurorStakes => {
            serde_json::to_value(decode_as::<JurorStakesQuery, JurorStakesResponse>(raw)?)?
        }
    };
    if !check_invariants {
        warn!("Decoded without invariant checks");
    }
    Ok(value)
}

/// One line per court, indented by depth.
pub fn render_court_tree(tree: &CourtTree) -> String {
    tree.iter()
        .map(|(depth, court)| {
            format!(
                "{:indent$}{} (subcourt {}, {} ongoing / {} disputes, {} active jurors{})",
                "",
                court.id,
                court.subcourt_id,
                court.disputes_ongoing,
                court.disputes_num,
                court.active_jurors,
                if court.hidden_votes { ", hidden votes" } else { "" },
                indent = depth * 2,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn lifecycle_summary(dispute: &DisputeWithRounds, now: &BigInt) -> String {
    let mut lines = vec![
        format!("dispute {} in court {}", dispute.id, dispute.court.id),
        format!(
            "period {} since {}, can be passed at {}",
            dispute.period,
            dispute.last_period_change,
            dispute.period_deadline()
        ),
    ];

    match dispute.final_ruling() {
        Some(ruling) => lines.push(format!("ruled {ruling}")),
        None => {
            lines.push(format!("current ruling {}", dispute.current_ruling));
            let projected = dispute.projected_period(now);
            if projected.period != dispute.period {
                lines.push(format!(
                    "at {now} the dispute can be in {} (since {}, until {})",
                    projected.period, projected.started_at, projected.ends_at
                ));
            }
        }
    }

    lines.push(format!(
        "{} round(s), {} appeal(s)",
        dispute.rounds.len(),
        dispute.appeals()
    ));
    if let Some(round) = dispute.current_round() {
        let tally = round
            .tally()
            .iter()
            .map(|(choice, votes)| format!("{choice}: {votes}"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!(
            "round {}: {} vote(s), {} pending, tally [{}]",
            round.id,
            round.votes.len(),
            round.pending_votes(),
            tally
        ));
    }
    lines.join("\n")
}
