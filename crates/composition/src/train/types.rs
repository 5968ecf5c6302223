//! Data types for locomotives, trains, and the yard resource.

use bevy::prelude::*;
use serde::Serialize;

use crate::wagon::WagonId;

// =============================================================================
// Data Structures
// =============================================================================

/// Unique identifier for a train in the yard.
pub type TrainId = u32;

/// Engine descriptor: identity and pulling capacity.
///
/// Immutable once built; there is no mutating API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locomotive {
    /// Engine number painted on the locomotive.
    pub number: u32,
    /// Maximum number of wagons this engine may pull.
    pub max_wagons: u32,
}

impl Locomotive {
    /// Build a locomotive descriptor.
    pub fn new(number: u32, max_wagons: u32) -> Self {
        Self { number, max_wagons }
    }
}

/// A locomotive with the chain of wagons it pulls.
///
/// `head` is crate-private: trains gain and lose wagons only through the
/// [`YardState`] protocol, which keeps the head free of predecessors and
/// every attached chain within the engine's capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Train {
    /// Unique train identifier.
    pub id: TrainId,
    /// Departure label. Opaque to the composition logic.
    pub origin: String,
    /// Destination label. Opaque to the composition logic.
    pub destination: String,
    /// The pulling engine.
    pub engine: Locomotive,
    /// Head wagon of the attached chain, if any.
    pub(crate) head: Option<WagonId>,
}

/// Aggregate statistics over the whole yard.
///
/// Recomputed every fixed update by [`update_yard_stats`]; nothing in the
/// protocol reads these back, they exist for observation.
///
/// [`update_yard_stats`]: super::update_yard_stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct YardStats {
    /// Number of trains in the yard.
    pub total_trains: u32,
    /// Trains currently pulling passenger wagons.
    pub passenger_trains: u32,
    /// Trains currently pulling freight wagons.
    pub freight_trains: u32,
    /// Trains pulling nothing.
    pub empty_trains: u32,
    /// Wagons attached to some train.
    pub coupled_wagons: u32,
    /// Registered wagons not attached to any train.
    pub free_wagons: u32,
    /// Seats over all passenger wagons in service.
    pub total_seats: u32,
    /// Freight capacity in kilograms over all freight wagons in service.
    pub total_freight_capacity_kg: u64,
}

// =============================================================================
// Resource
// =============================================================================

/// The yard: every train plus aggregate statistics.
///
/// The wagons themselves live in [`crate::wagon::RollingStock`]; this
/// resource holds the train side and the composition protocol.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct YardState {
    /// All trains, in creation order.
    pub trains: Vec<Train>,
    /// Aggregate statistics.
    pub stats: YardStats,
    /// Auto-incrementing train ID counter.
    pub(crate) next_train_id: TrainId,
}
