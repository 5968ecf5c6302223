//! Headless shunting demo: seeds a small fleet, runs one scripted yard
//! session through the composition protocol, then reports the result.
//!
//! With `RAILYARD_JSON=1` in the environment, stdout carries a single JSON
//! snapshot of the final yard instead of the human-readable report.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use composition::chain_invariants::ChainViolations;
use composition::manifest::{yard_manifest, yard_snapshot};
use composition::train::{Locomotive, TrainId, YardState};
use composition::wagon::{RollingStock, WagonId};
use composition::CompositionPlugin;

fn main() {
    let json_only = std::env::var("RAILYARD_JSON").is_ok();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    if !json_only {
        // Log lines would pollute the machine-readable snapshot on stdout.
        app.add_plugins(LogPlugin::default());
    }
    app.add_plugins(CompositionPlugin);

    // Initial update so plugin resources initialize.
    app.update();

    let fleet = seed_yard(&mut app);
    run_shunting(&mut app, &fleet);

    // One fixed tick so the stats system and the chain validators sweep the
    // final yard before it is reported.
    app.world_mut().run_schedule(FixedUpdate);

    print_report(app.world(), json_only);
}

/// Run `f` with both yard resources checked out of the world, the same
/// double borrow the systems in the composition crate get from the
/// scheduler.
fn with_yard<R>(app: &mut App, f: impl FnOnce(&mut YardState, &mut RollingStock) -> R) -> R {
    app.world_mut()
        .resource_scope(|world, mut yard: Mut<YardState>| {
            world.resource_scope(|_, mut stock: Mut<RollingStock>| f(&mut yard, &mut stock))
        })
}

/// Ids handed out while seeding, so the shunting script can refer back to
/// specific trains and wagons.
struct Fleet {
    intercity: TrainId,
    regional: TrainId,
    cargo: TrainId,
    shuttle: TrainId,
    coaches: Vec<WagonId>,
    spares: Vec<WagonId>,
    hoppers: Vec<WagonId>,
}

fn seed_yard(app: &mut App) -> Fleet {
    let mut rng = ChaCha8Rng::seed_from_u64(0x2A11);

    with_yard(app, |yard, stock| {
        let intercity = yard.add_train(
            Locomotive::new(24531, 8),
            "Amsterdam".to_string(),
            "Paris".to_string(),
        );
        let regional = yard.add_train(
            Locomotive::new(29123, 5),
            "Rotterdam".to_string(),
            "Brussels".to_string(),
        );
        let cargo = yard.add_train(
            Locomotive::new(6401, 10),
            "Rotterdam".to_string(),
            "Duisburg".to_string(),
        );
        let shuttle = yard.add_train(
            Locomotive::new(6402, 6),
            "Duisburg".to_string(),
            "Rotterdam".to_string(),
        );

        // A coupled rake of four coaches.
        let coaches: Vec<WagonId> = (0..4)
            .map(|_| stock.add_passenger_wagon(rng.gen_range(40..=80)))
            .collect();
        couple_up(stock, &coaches);

        // Three loose coaches on the spare track.
        let spares: Vec<WagonId> = (0..3)
            .map(|_| stock.add_passenger_wagon(rng.gen_range(20..=60)))
            .collect();

        // A coupled cut of three hoppers.
        let hoppers: Vec<WagonId> = (0..3)
            .map(|_| stock.add_freight_wagon(rng.gen_range(20_000..=45_000)))
            .collect();
        couple_up(stock, &hoppers);

        info!(
            "seeded {} trains and {} wagons",
            yard.trains.len(),
            stock.len()
        );

        Fleet {
            intercity,
            regional,
            cargo,
            shuttle,
            coaches,
            spares,
            hoppers,
        }
    })
}

/// Couple freshly registered wagons into one chain, in slice order.
fn couple_up(stock: &mut RollingStock, wagons: &[WagonId]) {
    for pair in wagons.windows(2) {
        if let Err(conflict) = stock.attach_tail(pair[0], pair[1]) {
            warn!("coupling refused: {}", conflict);
        }
    }
}

fn run_shunting(app: &mut App, fleet: &Fleet) {
    with_yard(app, |yard, stock| {
        // The whole coach rake arrives in one attach.
        let ok = yard.attach_to_rear(stock, fleet.intercity, fleet.coaches[0]);
        info!("coach rake to the intercity: {}", verdict(ok));

        // Buffet car ahead of the rake, then one more coach mid-rake.
        let ok = yard.insert_at_front(stock, fleet.intercity, fleet.spares[0]);
        info!("buffet car to the intercity front: {}", verdict(ok));
        let ok = yard.insert_at_position(stock, fleet.intercity, 2, fleet.spares[1]);
        info!("extra coach into intercity slot 2: {}", verdict(ok));

        // Wrong kind: the hopper cut stays off the passenger run.
        let ok = yard.attach_to_rear(stock, fleet.intercity, fleet.hoppers[0]);
        info!("hopper cut to the intercity: {}", verdict(ok));

        // Dispatcher check first, then commit the hoppers to the cargo run.
        let fits = yard
            .train(fleet.cargo)
            .map_or(false, |t| t.can_attach(stock, fleet.hoppers[0]));
        info!("hopper cut fits the cargo run: {}", fits);
        let ok = yard.attach_to_rear(stock, fleet.cargo, fleet.hoppers[0]);
        info!("hopper cut to the cargo run: {}", verdict(ok));

        // A mid-rake coach is promoted out alone; its neighbors close up.
        let ok = yard.attach_to_rear(stock, fleet.regional, fleet.coaches[2]);
        info!("mid-rake coach across to the regional: {}", verdict(ok));

        // A second coach follows through the move protocol.
        let ok = yard.move_one_wagon(stock, fleet.intercity, fleet.coaches[1], fleet.regional);
        info!("second coach moved to the regional: {}", verdict(ok));

        // Lead wagons only change hands through move or split.
        let ok = yard.attach_to_rear(stock, fleet.regional, fleet.spares[0]);
        info!("stealing the intercity's lead coach: {}", verdict(ok));

        // The rear hoppers go to the shuttle, then the regional runs around.
        let ok = yard.split_at_position(stock, fleet.cargo, 1, fleet.shuttle);
        info!("rear hoppers split off to the shuttle: {}", verdict(ok));
        let ok = yard.reverse(stock, fleet.regional);
        info!("regional run-around: {}", verdict(ok));

        // Retiring the shuttle leaves its hoppers waiting as a free chain.
        let ok = yard.remove_train(fleet.shuttle);
        info!("shuttle retired: {}", verdict(ok));
    });
}

fn verdict(ok: bool) -> &'static str {
    if ok {
        "done"
    } else {
        "refused"
    }
}

fn print_report(world: &World, json_only: bool) {
    let stock = world.resource::<RollingStock>();
    let yard = world.resource::<YardState>();

    if json_only {
        println!(
            "{}",
            serde_json::to_string(&yard_snapshot(stock, yard)).unwrap()
        );
        return;
    }

    let stats = yard.stats;
    info!(
        "{} trains ({} passenger, {} freight, {} empty), {} coupled wagons, {} free",
        stats.total_trains,
        stats.passenger_trains,
        stats.freight_trains,
        stats.empty_trains,
        stats.coupled_wagons,
        stats.free_wagons
    );
    info!(
        "{} seats and {} kg of freight capacity on the move",
        stats.total_seats, stats.total_freight_capacity_kg
    );

    let violations = world.resource::<ChainViolations>();
    if violations.total() > 0 {
        warn!("chain validators flagged {} violations", violations.total());
    }

    print!("{}", yard_manifest(stock, yard));
}
