//! Data types for wagons, the wagon registry, and the coupling error.

use std::fmt;

use bevy::prelude::*;
use serde::Serialize;

// =============================================================================
// Data Structures
// =============================================================================

/// Unique identifier for a wagon.
///
/// Equal to the wagon's index in the [`RollingStock`] arena. The arena is
/// grow-only, so an id stays valid for the registry's whole lifetime.
pub type WagonId = u32;

/// The wagon kinds with their capacity payloads.
///
/// Kind-dependent logic matches on this exhaustively, so adding a variant
/// surfaces every capacity computation and compatibility check at compile
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WagonType {
    /// Carries passengers.
    Passenger {
        /// Fixed number of seats.
        seats: u32,
    },
    /// Carries freight.
    Freight {
        /// Maximum load in kilograms.
        max_weight_kg: u32,
    },
}

impl WagonType {
    /// True for passenger wagons.
    pub fn is_passenger(&self) -> bool {
        matches!(self, WagonType::Passenger { .. })
    }

    /// True for freight wagons.
    pub fn is_freight(&self) -> bool {
        matches!(self, WagonType::Freight { .. })
    }

    /// True when both values are the same kind, whatever their capacities.
    pub fn same_kind(&self, other: &WagonType) -> bool {
        matches!(
            (self, other),
            (WagonType::Passenger { .. }, WagonType::Passenger { .. })
                | (WagonType::Freight { .. }, WagonType::Freight { .. })
        )
    }

    /// Short lowercase kind label.
    pub fn label(&self) -> &'static str {
        match self {
            WagonType::Passenger { .. } => "passenger",
            WagonType::Freight { .. } => "freight",
        }
    }
}

/// One wagon in the registry.
///
/// The link fields are crate-private: chains are rewired only through the
/// sequence operations on [`RollingStock`], which keep the prev/next
/// pairing reciprocal on every wagon they touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wagon {
    /// Registry id; also the wagon's arena index.
    pub id: WagonId,
    /// Kind and capacity payload.
    pub wagon_type: WagonType,
    /// Successor in the chain (toward the tail).
    pub(crate) next: Option<WagonId>,
    /// Predecessor in the chain (toward the head).
    pub(crate) prev: Option<WagonId>,
}

impl Wagon {
    /// Id of the successor, if one is coupled behind this wagon.
    pub fn next(&self) -> Option<WagonId> {
        self.next
    }

    /// Id of the predecessor, if this wagon is coupled behind one.
    pub fn prev(&self) -> Option<WagonId> {
        self.prev
    }

    /// True when a successor is coupled behind this wagon.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// True when this wagon is coupled behind a predecessor.
    pub fn has_prev(&self) -> bool {
        self.prev.is_some()
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Error returned by [`RollingStock::attach_tail`] when an endpoint of the
/// requested coupling is already connected on that side.
///
/// Coupling never overwrites an existing link; the caller must detach
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainConflict {
    /// The front wagon already pulls a successor.
    AlreadyPulling {
        /// The wagon that was asked to pull another.
        front: WagonId,
        /// The successor it already pulls.
        next: WagonId,
    },
    /// The incoming wagon already hangs behind a predecessor.
    AlreadyCoupled {
        /// The wagon that was asked to hang behind another.
        tail: WagonId,
        /// The predecessor it already hangs behind.
        prev: WagonId,
    },
}

impl fmt::Display for ChainConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainConflict::AlreadyPulling { front, next } => {
                write!(f, "wagon {front} is already pulling wagon {next}")
            }
            ChainConflict::AlreadyCoupled { tail, prev } => {
                write!(f, "wagon {tail} is already coupled behind wagon {prev}")
            }
        }
    }
}

impl std::error::Error for ChainConflict {}

// =============================================================================
// Resource
// =============================================================================

/// The wagon registry: source of truth for every wagon and chain link.
///
/// Wagons live in a grow-only arena indexed by [`WagonId`]. They are never
/// deleted, only re-linked, so ids held by trains and tests cannot dangle.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq)]
pub struct RollingStock {
    /// The wagon arena. Index == wagon id.
    pub(crate) wagons: Vec<Wagon>,
}
