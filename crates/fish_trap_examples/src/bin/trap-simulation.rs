use std::time::Duration;

use fish_trap::prelude::*;
use fish_trap_examples::{init_tracing, named, print_trap, stock_catalog};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let catalog = stock_catalog();
    let config = TrapConfig::new()
        .with_production_rate(60.0)
        .with_chance_to_catch(0.75)
        .with_level_up_chance(0.3)
        .with_use_bait(true)
        .with_extra_drops(true)
        .with_extra_drop_chance(0.25);

    let mut system = TrapSystem::try_new(config)?;
    let report = system.rebuild_registry(&catalog);
    info!(
        "Registry has {} rules from {} fish.",
        report.rules, report.fish_scanned
    );

    // Traps sit just below the water line in three biomes.
    let water_level = 30.0;
    let biomes = [Biome::MEADOWS, Biome::SWAMP, Biome::MISTLANDS];
    let mut timers = TickTimers::new();
    let mut traps = Vec::new();
    for (i, biome) in biomes.into_iter().enumerate() {
        let env = StaticEnvironment::new(biome, water_level);
        let mut inventory = SlotInventory::new(8);
        inventory.add_item(ItemStack::new(named(&catalog, NECK_TAIL_BAIT)?, 3));
        inventory.add_item(ItemStack::new(named(&catalog, "$item_fishingbait_swamp")?, 3));
        inventory.add_item(ItemStack::new(named(&catalog, MISTLANDS_BAIT)?, 3));
        let position = Vec3::new(i as f32 * 10.0, water_level - 1.5, 0.0);
        let id = system.spawn(position, inventory, &env, &mut timers);
        traps.push((id, env));
    }

    let mut rng = StdRng::seed_from_u64(2025);
    let mut events = VecSink::only([TrapEventKind::TickEvaluated]);
    for round in 0..6 {
        let due = timers.advance(if round == 0 {
            Duration::ZERO
        } else {
            config.production_interval()
        });
        for id in due {
            let Some((_, env)) = traps.iter().find(|(t, _)| *t == id) else {
                continue;
            };
            system.tick_with_events(id, env, &mut rng, &mut events)?;
        }
    }

    for event in events.as_slice() {
        if let TrapEvent::TickEvaluated { trap, outcome } = event {
            println!("{trap}: {outcome:?}");
        }
    }

    for (id, env) in &traps {
        if let Some(trap) = system.trap(*id) {
            print_trap(trap);
        }
        if let Some(hover) = system.hover_text(*id, true, env) {
            println!("{hover}\n");
        }
    }

    Ok(())
}
