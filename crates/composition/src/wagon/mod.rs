//! Wagon registry and sequence operations.
//!
//! Wagons are the units a locomotive pulls. Every wagon lives in the
//! [`RollingStock`] arena and is addressed by its [`WagonId`]; chains are
//! formed by reciprocal prev/next links between ids, never by owned
//! pointers, so any wagon can be inspected or re-linked in O(1) given its
//! id.
//!
//! ## Data model
//! - `WagonType`: passenger (seat capacity) or freight (maximum load)
//! - `Wagon`: one registry entry with its chain links
//! - `RollingStock`: top-level resource owning the arena and every
//!   operation that rewires links
//! - `ChainConflict`: error for coupling attempts on occupied ends
//!
//! ## Link discipline
//! The coupling operations maintain one rule on every wagon they touch:
//! `next`/`prev` are either `None` or point at a wagon whose opposite link
//! points straight back. Train-level constraints (kind, capacity,
//! duplicates) are not this module's business; see `crate::train`.

mod state;
mod types;


// Re-export all public items so external code sees the same API.
pub use state::ChainIter;
pub use types::*;
