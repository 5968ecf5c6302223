//! # TestYard — headless integration test harness for the rail yard
//!
//! Provides a fluent builder that wraps `bevy::app::App` + `CompositionPlugin`
//! for running integration tests without a window or renderer.
//!
//! Wagon and train ids are handed out sequentially from zero, so a test that
//! builds its fleet through the `with_*` methods knows every id up front.

use bevy::app::App;
use bevy::prelude::*;

use crate::chain_invariants::ChainViolations;
use crate::train::{Locomotive, TrainId, YardState, YardStats};
use crate::wagon::{RollingStock, WagonId};
use crate::CompositionPlugin;

/// A headless Bevy App wrapping `CompositionPlugin` for integration testing.
///
/// Use builder methods to set up rolling stock and trains, then call `tick()`
/// to run the fixed-update systems and query/assert on the resulting state.
pub struct TestYard {
    app: App,
}

impl TestYard {
    // -----------------------------------------------------------------------
    // Constructor
    // -----------------------------------------------------------------------

    /// Create a new empty yard: no trains, no rolling stock.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(CompositionPlugin);

        // Run one update so resources and schedules initialize.
        app.update();

        Self { app }
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    /// Add a train with the given engine number, pulling capacity, and route.
    pub fn with_train(
        mut self,
        number: u32,
        max_wagons: u32,
        origin: &str,
        destination: &str,
    ) -> Self {
        if let Some(mut yard) = self.app.world_mut().get_resource_mut::<YardState>() {
            yard.add_train(
                Locomotive::new(number, max_wagons),
                origin.to_string(),
                destination.to_string(),
            );
        }
        self
    }

    /// Register one passenger wagon per entry and couple them into a single
    /// chain, first entry at the head.
    pub fn with_passenger_chain(mut self, seats: &[u32]) -> Self {
        if let Some(mut stock) = self.app.world_mut().get_resource_mut::<RollingStock>() {
            let mut prev: Option<WagonId> = None;
            for &s in seats {
                let id = stock.add_passenger_wagon(s);
                if let Some(front) = prev {
                    stock.attach_tail(front, id).expect("new wagons are unlinked");
                }
                prev = Some(id);
            }
        }
        self
    }

    /// Register one freight wagon per entry and couple them into a single
    /// chain, first entry at the head.
    pub fn with_freight_chain(mut self, max_weights: &[u32]) -> Self {
        if let Some(mut stock) = self.app.world_mut().get_resource_mut::<RollingStock>() {
            let mut prev: Option<WagonId> = None;
            for &kg in max_weights {
                let id = stock.add_freight_wagon(kg);
                if let Some(front) = prev {
                    stock.attach_tail(front, id).expect("new wagons are unlinked");
                }
                prev = Some(id);
            }
        }
        self
    }

    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run N fixed-update ticks by directly executing the `FixedUpdate`
    /// schedule. This bypasses Bevy's time system entirely, which avoids
    /// issues with `MinimalPlugins` not advancing virtual time between
    /// updates when a headless test drives the app in a tight loop.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    /// Run shunting operations against the yard and rolling stock together.
    ///
    /// The closure's return value is passed through, so protocol verdicts can
    /// be asserted at the call site.
    pub fn with_yard<R>(&mut self, f: impl FnOnce(&mut YardState, &mut RollingStock) -> R) -> R {
        self.app
            .world_mut()
            .resource_scope(|world, mut yard: Mut<YardState>| {
                world.resource_scope(|_world, mut stock: Mut<RollingStock>| {
                    f(&mut yard, &mut stock)
                })
            })
    }

    /// Couple the chain headed by `wagon` to the rear of `train`.
    pub fn attach(&mut self, train: TrainId, wagon: WagonId) -> bool {
        self.with_yard(|yard, stock| yard.attach_to_rear(stock, train, wagon))
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Get the wagon registry.
    pub fn stock(&self) -> &RollingStock {
        self.app.world().resource::<RollingStock>()
    }

    /// Get the yard state.
    pub fn yard(&self) -> &YardState {
        self.app.world().resource::<YardState>()
    }

    /// Get the aggregates as last recomputed by `update_yard_stats`.
    pub fn stats(&self) -> YardStats {
        self.yard().stats
    }

    /// Get the chain validator counters.
    pub fn violations(&self) -> &ChainViolations {
        self.app.world().resource::<ChainViolations>()
    }

    /// Get a reference to any resource.
    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    /// The consist of a train, head to tail. Empty for an empty or unknown
    /// train.
    pub fn consist(&self, train: TrainId) -> Vec<WagonId> {
        let stock = self.stock();
        self.yard()
            .train(train)
            .and_then(|t| t.head())
            .map(|head| stock.chain_iter(head).collect())
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    /// Assert a train's consist matches `expected`, walking the chain in both
    /// directions so one-sided couplings fail here rather than downstream.
    pub fn assert_consist(&self, train: TrainId, expected: &[WagonId]) {
        let got = self.consist(train);
        assert_eq!(
            got, expected,
            "Expected train {train} consist {expected:?}, got {got:?}"
        );

        let stock = self.stock();
        let mut cur = expected.last().copied();
        for &id in expected.iter().rev() {
            assert_eq!(
                cur,
                Some(id),
                "Backward walk of train {train} broke at wagon {id}"
            );
            cur = stock.get(id).and_then(|w| w.prev());
        }
        assert!(
            cur.is_none(),
            "Head of train {train} still has a predecessor: {cur:?}"
        );
    }

    /// Assert the chain validators found nothing after the last tick.
    pub fn assert_no_violations(&self) {
        let v = self.violations();
        assert_eq!(v.total(), 0, "Expected a clean yard, found {v:?}");
    }

    /// Assert a resource has been initialized (exists in the world).
    pub fn assert_resource_exists<T: Resource>(&self) {
        assert!(
            self.app.world().get_resource::<T>().is_some(),
            "Expected resource {} to exist",
            std::any::type_name::<T>()
        );
    }
}
