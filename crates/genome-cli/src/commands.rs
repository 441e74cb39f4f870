//! Subcommand implementations

use crate::{ApplyArgs, ComponentsArgs, HistoryArgs, InspectArgs};
use anyhow::{Context, Result};
use genome_core::{
    load_catalog, load_edits, load_genome, ComponentRequest, ComponentScope, GenomeConfig,
    GenomeService, HistoryRequest, SnapshotRequest, SnapshotResponse,
};
use genome_fragments::InMemoryCatalog;
use genome_log::AsOf;
use genome_model::{prune, NodeId};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

/// Configuration from `path`, or defaults
///
/// # Errors
/// Unreadable or invalid configuration
pub fn load_config(path: Option<&Path>) -> Result<GenomeConfig> {
    match path {
        Some(path) => GenomeConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(GenomeConfig::default()),
    }
}

fn service(genome: &Path, config: &GenomeConfig) -> Result<GenomeService> {
    let base = load_genome(genome, &config.schema)
        .with_context(|| format!("loading genome {}", genome.display()))?;
    Ok(GenomeService::from_config(base, Arc::new(InMemoryCatalog::new()), config)?)
}

fn apply_edits(service: &GenomeService, edits: &Path) -> Result<Vec<u64>> {
    let requests =
        load_edits(edits).with_context(|| format!("loading edits {}", edits.display()))?;
    let seqs = requests
        .iter()
        .enumerate()
        .map(|(index, request)| {
            service.edit(request).map(|r| r.seq).with_context(|| {
                format!(
                    "edit #{index} ({} on {}) rejected",
                    request.operation_kind, request.target_id
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;
    tracing::info!(edits = seqs.len(), path = %edits.display(), "edits applied");
    Ok(seqs)
}

/// `genome inspect`
///
/// # Errors
/// Load failure or an unknown `--scope`
pub fn inspect(args: &InspectArgs, config: &GenomeConfig) -> Result<Value> {
    let genome = load_genome(&args.genome, &config.schema)
        .with_context(|| format!("loading genome {}", args.genome.display()))?;
    match &args.scope {
        None => Ok(json!({
            "fingerprint": genome.fingerprint(),
            "nodes": genome.len(),
            "genome": genome,
        })),
        Some(id) => {
            let node = prune(&genome, id).with_context(|| format!("node not found: {id}"))?;
            Ok(json!({
                "scope": id,
                "nodes": node.subtree_len(),
                "tree": node,
            }))
        }
    }
}

/// `genome apply`
///
/// # Errors
/// Load failure or the first rejected edit
pub fn apply(args: &ApplyArgs, config: &GenomeConfig) -> Result<Value> {
    let service = service(&args.genome, config)?;
    let applied = apply_edits(&service, &args.edits)?;

    let snapshot = match &args.snapshot {
        Some(name) => match service.snapshots(&SnapshotRequest::Create { name: name.clone() })? {
            SnapshotResponse::Created(desc) => Some(desc),
            SnapshotResponse::Listed(_) => None,
        },
        None => None,
    };

    let tree = service.effective_tree(AsOf::Latest)?;
    let mut output = json!({
        "applied": applied,
        "head_seq": service.state().head_seq(),
        "fingerprint": tree.fingerprint(),
        "snapshot": snapshot,
    });
    if args.print_tree {
        output["tree"] = serde_json::to_value(&*tree)?;
    }
    Ok(output)
}

/// `genome history`
///
/// # Errors
/// Load failure or a rejected edit
pub fn history(args: &HistoryArgs, config: &GenomeConfig) -> Result<Value> {
    let service = service(&args.genome, config)?;
    apply_edits(&service, &args.edits)?;
    service.verify_integrity()?;

    let entries = service.history(&HistoryRequest {
        target_id: args.target.as_deref().map(NodeId::new),
    });
    Ok(serde_json::to_value(entries)?)
}

/// `genome components`
///
/// # Errors
/// Load failure, an unknown `--scope`, or a key missing from the catalog
pub fn components(args: &ComponentsArgs, config: &GenomeConfig) -> Result<Value> {
    let base = load_genome(&args.genome, &config.schema)
        .with_context(|| format!("loading genome {}", args.genome.display()))?;
    let catalog = load_catalog(&args.catalog)
        .with_context(|| format!("loading catalog {}", args.catalog.display()))?;
    let service = GenomeService::from_config(base, Arc::new(catalog), config)?;

    let request = ComponentRequest {
        scope: args
            .scope
            .as_deref()
            .map_or(ComponentScope::Root, |id| ComponentScope::Node(NodeId::new(id))),
    };
    Ok(serde_json::to_value(service.components(&request)?)?)
}
