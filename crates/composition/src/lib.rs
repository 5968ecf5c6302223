use bevy::prelude::*;

pub mod chain_invariants;
pub mod manifest;
pub mod train;
pub mod wagon;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

use chain_invariants::ChainInvariantsPlugin;
use manifest::ManifestPlugin;
use train::YardPlugin;
use wagon::RollingStock;

/// Root plugin for the composition stack: the wagon registry, the yard
/// protocol with its stats system, the chain validators, and the manifest
/// surface.
pub struct CompositionPlugin;

impl Plugin for CompositionPlugin {
    fn build(&self, app: &mut App) {
        // The wagon registry is shared by every feature below.
        app.init_resource::<RollingStock>();

        app.add_plugins((YardPlugin, ChainInvariantsPlugin, ManifestPlugin));
    }
}
