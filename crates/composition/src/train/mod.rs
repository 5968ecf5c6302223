//! Trains and the yard composition protocol.
//!
//! A train is a locomotive plus an optional reference to the head wagon of
//! a chain in the shared wagon registry. All composition moves (attach,
//! insert, move, split, reverse) go through [`YardState`], which validates
//! kind, capacity, and duplicate rules against the registry before the
//! first link is rewired, so a refused operation changes nothing.
//!
//! ## Data model
//! - `Locomotive`: engine number and pulling capacity
//! - `Train`: engine, route labels, and the head of its wagon chain
//! - `YardStats`: aggregates recomputed by `update_yard_stats`
//! - `YardState`: top-level resource storing all trains and stats
//!
//! ## Kind and capacity rules
//! - An empty train accepts either wagon kind; a composed train only its
//!   own kind (derived from its head wagon).
//! - A train never pulls more than `engine.max_wagons` wagons.
//! - No wagon rides in the same train twice; incoming chains are checked
//!   per id.

mod state;
mod systems;
mod types;


// Re-export all public items so external code sees the same API.
pub use systems::update_yard_stats;
pub use systems::YardPlugin;
pub use types::*;
