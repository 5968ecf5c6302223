//! Manifest rendering for trains and the yard.
//!
//! Provides two surfaces:
//! - **Text manifests**: one line per train (locomotive, wagons in order,
//!   count, route) plus the free chains, for logs and the demo binary
//! - **Snapshot DTOs**: a `Serialize` tree of the whole yard for
//!   machine-readable export
//!
//! Both are built on demand from the resources; no per-frame systems.

use bevy::prelude::*;
use serde::Serialize;

use crate::train::{Train, TrainId, YardState, YardStats};
use crate::wagon::{RollingStock, WagonId, WagonType};

/// Empty plugin; manifests are generated on demand, no systems required.
pub struct ManifestPlugin;

impl Plugin for ManifestPlugin {
    fn build(&self, _app: &mut App) {}
}

// -----------------------------------------------------------------------
// Text manifests
// -----------------------------------------------------------------------

/// One-line report for a single train: locomotive number, every wagon in
/// head-to-tail order, wagon count, and the route labels.
pub fn train_manifest(stock: &RollingStock, train: &Train) -> String {
    let mut out = format!("[Loc-{}]", train.engine.number);
    let mut count = 0u32;
    if let Some(head) = train.head() {
        for id in stock.chain_iter(head) {
            out.push_str(&format!("[Wagon-{id}]"));
            count += 1;
        }
    }
    out.push_str(&format!(
        " with {} wagons from {} to {}",
        count, train.origin, train.destination
    ));
    out
}

/// Multi-line report over the whole yard: every train, then every free
/// chain. Ends with a newline when non-empty.
pub fn yard_manifest(stock: &RollingStock, yard: &YardState) -> String {
    let mut out = String::new();
    for train in &yard.trains {
        out.push_str(&train_manifest(stock, train));
        out.push('\n');
    }
    for head in free_chain_heads(stock, yard) {
        out.push_str("Free chain:");
        for id in stock.chain_iter(head) {
            out.push_str(&format!("[Wagon-{id}]"));
        }
        out.push('\n');
    }
    out
}

/// Heads of chains not pulled by any train, in id order.
///
/// A chain head is a wagon without a predecessor; it is free when no
/// train's head points at it.
pub fn free_chain_heads(stock: &RollingStock, yard: &YardState) -> Vec<WagonId> {
    stock
        .iter()
        .filter(|w| w.prev().is_none())
        .map(|w| w.id)
        .filter(|id| yard.trains.iter().all(|t| t.head() != Some(*id)))
        .collect()
}

// -----------------------------------------------------------------------
// Snapshot DTOs
// -----------------------------------------------------------------------

/// One wagon in a snapshot; the kind and capacity are flattened in.
#[derive(Debug, Serialize)]
pub struct WagonSnapshot {
    /// Registry id.
    pub id: WagonId,
    /// Kind and capacity payload.
    #[serde(flatten)]
    pub wagon_type: WagonType,
}

/// One train with its consist.
#[derive(Debug, Serialize)]
pub struct TrainSnapshot {
    /// Train id.
    pub id: TrainId,
    /// Departure label.
    pub origin: String,
    /// Destination label.
    pub destination: String,
    /// Engine number.
    pub locomotive: u32,
    /// Engine pulling capacity.
    pub max_wagons: u32,
    /// Attached wagons, head to tail.
    pub wagons: Vec<WagonSnapshot>,
}

/// The whole yard at one instant.
#[derive(Debug, Serialize)]
pub struct YardSnapshot {
    /// Every train with its consist.
    pub trains: Vec<TrainSnapshot>,
    /// Chains not pulled by any train, each head to tail.
    pub free_chains: Vec<Vec<WagonSnapshot>>,
    /// Aggregates as last recomputed by `update_yard_stats`.
    pub stats: YardStats,
}

/// Build a snapshot of the whole yard.
pub fn yard_snapshot(stock: &RollingStock, yard: &YardState) -> YardSnapshot {
    let trains = yard
        .trains
        .iter()
        .map(|t| TrainSnapshot {
            id: t.id,
            origin: t.origin.clone(),
            destination: t.destination.clone(),
            locomotive: t.engine.number,
            max_wagons: t.engine.max_wagons,
            wagons: t
                .head()
                .map(|head| wagon_snapshots(stock, head))
                .unwrap_or_default(),
        })
        .collect();

    let free_chains = free_chain_heads(stock, yard)
        .into_iter()
        .map(|head| wagon_snapshots(stock, head))
        .collect();

    YardSnapshot {
        trains,
        free_chains,
        stats: yard.stats,
    }
}

fn wagon_snapshots(stock: &RollingStock, head: WagonId) -> Vec<WagonSnapshot> {
    stock
        .chain_iter(head)
        .filter_map(|id| stock.get(id))
        .map(|w| WagonSnapshot {
            id: w.id,
            wagon_type: w.wagon_type,
        })
        .collect()
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
