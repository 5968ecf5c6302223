//! ECS systems and plugin for the yard.

use bevy::prelude::*;

use crate::wagon::RollingStock;

use super::types::*;

/// Recompute [`YardStats`] from the registry and the current trains.
///
/// Runs every fixed update; the protocol itself never touches stats, so
/// readers always see a value derived from one consistent yard state.
pub fn update_yard_stats(stock: Res<RollingStock>, mut yard: ResMut<YardState>) {
    let mut stats = YardStats::default();

    for train in &yard.trains {
        stats.total_trains += 1;
        if train.is_passenger_train(&stock) {
            stats.passenger_trains += 1;
        } else if train.is_freight_train(&stock) {
            stats.freight_trains += 1;
        } else {
            stats.empty_trains += 1;
        }
        stats.coupled_wagons += train.wagon_count(&stock);
        stats.total_seats += train.total_seats(&stock);
        stats.total_freight_capacity_kg += u64::from(train.total_max_weight(&stock));
    }
    stats.free_wagons = (stock.len() as u32).saturating_sub(stats.coupled_wagons);

    yard.stats = stats;
}

// =============================================================================
// Plugin
// =============================================================================

/// Registers the yard resource and its bookkeeping systems.
pub struct YardPlugin;

impl Plugin for YardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<YardState>()
            .add_systems(FixedUpdate, update_yard_stats);
    }
}
