use fish_trap::prelude::*;
use fish_trap_examples::{init_tracing, stock_catalog};
use glam::Vec3;

const GOOD: &str = r#"(
    CheckBiome: false,
    MaxFish: 6,
    ProductionRate: 90.0,
    ChanceToCatch: 0.8,
)"#;

const BAD: &str = r#"(
    MaxFish: 6,
    ChanceToCatch: 1.5,
)"#;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let catalog = stock_catalog();
    let env = StaticEnvironment::default();
    let mut system = TrapSystem::<SlotInventory>::try_new(TrapConfig::new())?;
    system.rebuild_registry(&catalog);

    let mut timers = TickTimers::new();
    system.spawn(Vec3::ZERO, SlotInventory::new(4), &env, &mut timers);

    println!("defaults:\n{}\n", system.config().to_ron_string()?);

    let changed = system.reload_config_str(GOOD, &mut timers)?;
    println!("reloaded (rate changed: {changed}):\n{:?}\n", system.config());

    let mut warnings = VecSink::only([TrapEventKind::Warning]);
    if let Err(e) = system.reload_config_str_with_events(BAD, &mut timers, &mut warnings) {
        println!("rejected: {e}");
    }
    println!("still in effect: MaxFish={}", system.config().max_fish);
    for event in warnings.into_inner() {
        println!("{event:?}");
    }

    Ok(())
}
