use std::time::Duration;

use fish_trap::prelude::*;
use fish_trap_examples::{init_tracing, named, stock_catalog};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let catalog = stock_catalog();
    let env = StaticEnvironment::default();
    let mut system = TrapSystem::try_new(TrapConfig::new().with_production_rate(1200.0))?;
    system.rebuild_registry(&catalog);

    let mut timers = TickTimers::new();
    let neck = named(&catalog, NECK_TAIL_BAIT)?;
    for i in 0..5 {
        let mut inventory = SlotInventory::new(6);
        inventory.add_item(ItemStack::new(neck.clone(), 10));
        system.spawn(Vec3::new(i as f32, 20.0, 0.0), inventory, &env, &mut timers);
    }

    let mut rng = StdRng::seed_from_u64(7);
    let due = timers.advance(Duration::ZERO);
    system.run_due(&due, &env, &mut rng);
    timers.advance(Duration::from_secs(300));
    println!("t={:?}: next ticks at", timers.now());
    for id in system.instances().iter() {
        println!("  {id} -> {:?}", timers.next_due(id));
    }

    // Drop the interval to 30 s; every live timer restarts from now.
    let mut events = VecSink::only([TrapEventKind::ProductionRateChanged]);
    let config = system.config().with_production_rate(30.0);
    system.set_config_with_events(config, &mut timers, &mut events)?;
    for event in events.as_slice() {
        println!("{event:?}");
    }
    for id in system.instances().iter() {
        println!("  {id} -> {:?}", timers.next_due(id));
    }

    let due = timers.advance(Duration::from_secs(30));
    println!("t={:?}: {} traps ticked", timers.now(), due.len());
    for (id, outcome) in system.run_due(&due, &env, &mut rng) {
        println!("  {id}: {outcome:?}");
    }

    Ok(())
}
