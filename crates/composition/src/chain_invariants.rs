//! Runtime invariant validation for wagon chains and train heads.
//!
//! These systems run every fixed update and log warnings when structural
//! violations are detected. They also track violation counts so
//! integration tests can assert a clean yard after heavy shunting.
//!
//! Validated invariants:
//! 1. **Link reciprocity**: every coupling is two-sided; a wagon's `next`
//!    points at a wagon whose `prev` points straight back, and vice versa.
//! 2. **Head placement**: no train's head wagon hangs behind a
//!    predecessor, and every head id is registered.
//! 3. **Exclusive ownership**: no wagon is reachable from more than one
//!    train's head. Walks are hop-budgeted so a corrupted cyclic chain
//!    cannot hang the validator.
//!
//! The validators only detect and count; a broken chain carries no record
//! of which link was the intended one, so nothing is repaired here.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::train::YardState;
use crate::wagon::{RollingStock, WagonId};

// ---------------------------------------------------------------------------
// Violation counter
// ---------------------------------------------------------------------------

/// Number of invariant violations detected during the last validation
/// pass. Used by integration tests to assert zero violations.
#[derive(Resource, Default, Debug)]
pub struct ChainViolations {
    /// Couplings where one side does not point back at the other.
    pub one_sided_couplings: u32,
    /// Train heads that hang behind a predecessor or are unregistered.
    pub misplaced_heads: u32,
    /// Wagons reachable from more than one train's head.
    pub multiply_owned_wagons: u32,
    /// Train chains longer than the whole registry (a cycle).
    pub cyclic_chains: u32,
}

impl ChainViolations {
    /// Sum over all violation classes.
    pub fn total(&self) -> u32 {
        self.one_sided_couplings
            + self.misplaced_heads
            + self.multiply_owned_wagons
            + self.cyclic_chains
    }
}

// ---------------------------------------------------------------------------
// System: validate_link_reciprocity
// ---------------------------------------------------------------------------

/// Checks that every coupling is two-sided.
pub fn validate_link_reciprocity(
    stock: Res<RollingStock>,
    mut violations: ResMut<ChainViolations>,
) {
    violations.one_sided_couplings = 0;

    for w in stock.iter() {
        if let Some(next) = w.next() {
            let back = stock.get(next).and_then(|n| n.prev());
            if back != Some(w.id) {
                warn!(
                    "Invariant violation: wagon {} pulls wagon {} but the back link points at {:?}.",
                    w.id, next, back
                );
                violations.one_sided_couplings += 1;
            }
        }
        if let Some(prev) = w.prev() {
            let forward = stock.get(prev).and_then(|p| p.next());
            if forward != Some(w.id) {
                warn!(
                    "Invariant violation: wagon {} hangs behind wagon {} but the forward link points at {:?}.",
                    w.id, prev, forward
                );
                violations.one_sided_couplings += 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// System: validate_train_heads
// ---------------------------------------------------------------------------

/// Checks that every train head is a registered wagon without a
/// predecessor. A head behind a predecessor would mean the train pulls a
/// fragment starting mid-chain.
pub fn validate_train_heads(
    stock: Res<RollingStock>,
    yard: Res<YardState>,
    mut violations: ResMut<ChainViolations>,
) {
    violations.misplaced_heads = 0;

    for train in &yard.trains {
        let Some(head) = train.head() else {
            continue;
        };
        match stock.get(head) {
            Some(w) if w.has_prev() => {
                warn!(
                    "Invariant violation: train {} head wagon {} hangs behind wagon {:?}.",
                    train.id,
                    head,
                    w.prev()
                );
                violations.misplaced_heads += 1;
            }
            Some(_) => {}
            None => {
                warn!(
                    "Invariant violation: train {} head wagon {} is not registered.",
                    train.id, head
                );
                violations.misplaced_heads += 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// System: validate_chain_ownership
// ---------------------------------------------------------------------------

/// Checks that no wagon rides in two trains at once.
///
/// Walks every train's chain with a hop budget of the registry size, so a
/// corrupted cyclic chain is reported instead of looping forever.
pub fn validate_chain_ownership(
    stock: Res<RollingStock>,
    yard: Res<YardState>,
    mut violations: ResMut<ChainViolations>,
) {
    violations.multiply_owned_wagons = 0;
    violations.cyclic_chains = 0;

    let budget = stock.len();
    let mut owners: HashMap<WagonId, u32> = HashMap::new();

    for train in &yard.trains {
        let Some(head) = train.head() else {
            continue;
        };
        let mut cur = Some(head);
        let mut hops = 0usize;
        while let Some(id) = cur {
            if hops >= budget {
                warn!(
                    "Invariant violation: train {} chain exceeds the registry size {}; cycle suspected.",
                    train.id, budget
                );
                violations.cyclic_chains += 1;
                break;
            }
            *owners.entry(id).or_insert(0) += 1;
            cur = stock.get(id).and_then(|w| w.next());
            hops += 1;
        }
    }

    for (wagon, owner_count) in owners {
        if owner_count > 1 {
            warn!(
                "Invariant violation: wagon {} is reachable from {} train heads.",
                wagon, owner_count
            );
            violations.multiply_owned_wagons += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct ChainInvariantsPlugin;

impl Plugin for ChainInvariantsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ChainViolations>().add_systems(
            FixedUpdate,
            (
                validate_link_reciprocity,
                validate_train_heads,
                validate_chain_ownership,
            ),
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_violations_default() {
        let v = ChainViolations::default();
        assert_eq!(v.one_sided_couplings, 0);
        assert_eq!(v.misplaced_heads, 0);
        assert_eq!(v.multiply_owned_wagons, 0);
        assert_eq!(v.cyclic_chains, 0);
        assert_eq!(v.total(), 0);
    }
}
