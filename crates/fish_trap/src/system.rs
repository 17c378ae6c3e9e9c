//! Owner of all trap state for one host session.
//!
//! A [`TrapSystem`] is created when the item catalog loads and dropped when it unloads.
//! It owns the conversion registry, the set of live traps and the current config, and
//! forwards production-rate changes to every live timer.
use std::collections::BTreeMap;
use std::time::Duration;

use glam::Vec3;
use rand::Rng;
use tracing::debug;
#[cfg(feature = "ron")]
use tracing::error;

use crate::catalog::ItemCatalog;
use crate::config::TrapConfig;
use crate::conversion::registry::{ConversionRegistry, RebuildReport};
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::events::{EventSink, TrapEvent, TrapEventKind};
use crate::instances::InstanceRegistry;
use crate::inventory::Inventory;
use crate::schedule::{TickScheduler, TrapId};
use crate::trap::{HoverText, TickOutcome, Trap, DEFAULT_TRAP_NAME};

/// Registry, live traps and config for one session.
pub struct TrapSystem<I> {
    config: TrapConfig,
    registry: ConversionRegistry,
    instances: InstanceRegistry,
    traps: BTreeMap<TrapId, Trap<I>>,
    next_id: u64,
}

impl<I: Inventory> TrapSystem<I> {
    /// Creates an empty system. The config must validate.
    pub fn try_new(config: TrapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Creates an empty system without validating `config`. A rate outside the valid
    /// range is clamped when timers are started.
    pub fn new(config: TrapConfig) -> Self {
        Self {
            config,
            registry: ConversionRegistry::new(),
            instances: InstanceRegistry::new(),
            traps: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &TrapConfig {
        &self.config
    }

    pub fn registry(&self) -> &ConversionRegistry {
        &self.registry
    }

    pub fn instances(&self) -> &InstanceRegistry {
        &self.instances
    }

    pub fn trap(&self, id: TrapId) -> Option<&Trap<I>> {
        self.traps.get(&id)
    }

    pub fn trap_mut(&mut self, id: TrapId) -> Option<&mut Trap<I>> {
        self.traps.get_mut(&id)
    }

    pub fn traps(&self) -> impl Iterator<Item = &Trap<I>> {
        self.traps.values()
    }

    pub fn len(&self) -> usize {
        self.traps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traps.is_empty()
    }

    /// Rebuilds the conversion registry from the catalog, dropping every old rule.
    pub fn rebuild_registry(&mut self, catalog: &dyn ItemCatalog) -> RebuildReport {
        self.rebuild_registry_with_events(catalog, &mut ())
    }

    pub fn rebuild_registry_with_events(
        &mut self,
        catalog: &dyn ItemCatalog,
        sink: &mut dyn EventSink,
    ) -> RebuildReport {
        let report = self.registry.rebuild(catalog);
        if sink.wants(TrapEventKind::Warning) {
            for bait in &report.skipped_fixed {
                sink.send(TrapEvent::Warning {
                    context: "registry".into(),
                    message: format!("Fixed rule for '{bait}' skipped: fish template missing"),
                });
            }
        }
        if sink.wants(TrapEventKind::RegistryRebuilt) {
            sink.send(TrapEvent::RegistryRebuilt {
                report: report.clone(),
            });
        }
        report
    }

    /// Registers a placed trap and starts its timer with an immediate first tick.
    pub fn spawn(
        &mut self,
        position: impl Into<Vec3>,
        inventory: I,
        env: &dyn Environment,
        scheduler: &mut dyn TickScheduler,
    ) -> TrapId {
        self.spawn_named_with_events(
            DEFAULT_TRAP_NAME,
            position,
            inventory,
            env,
            scheduler,
            &mut (),
        )
    }

    pub fn spawn_with_events(
        &mut self,
        position: impl Into<Vec3>,
        inventory: I,
        env: &dyn Environment,
        scheduler: &mut dyn TickScheduler,
        sink: &mut dyn EventSink,
    ) -> TrapId {
        self.spawn_named_with_events(DEFAULT_TRAP_NAME, position, inventory, env, scheduler, sink)
    }

    /// Like [`TrapSystem::spawn`], with a display name shown in hover text.
    pub fn spawn_named(
        &mut self,
        name: impl Into<String>,
        position: impl Into<Vec3>,
        inventory: I,
        env: &dyn Environment,
        scheduler: &mut dyn TickScheduler,
    ) -> TrapId {
        self.spawn_named_with_events(name, position, inventory, env, scheduler, &mut ())
    }

    pub fn spawn_named_with_events(
        &mut self,
        name: impl Into<String>,
        position: impl Into<Vec3>,
        inventory: I,
        env: &dyn Environment,
        scheduler: &mut dyn TickScheduler,
        sink: &mut dyn EventSink,
    ) -> TrapId {
        let id = TrapId(self.next_id);
        self.next_id += 1;

        let interval = self.config.production_interval();
        let trap = Trap::new(id, position, inventory, env, interval).with_name(name);
        let biome = trap.biome();
        self.traps.insert(id, trap);
        self.instances.insert(id);
        scheduler.start(id, Duration::ZERO, interval);

        debug!("{} spawned in {:?}.", id, biome);
        if sink.wants(TrapEventKind::TrapSpawned) {
            sink.send(TrapEvent::TrapSpawned { trap: id, biome });
        }
        id
    }

    /// Removes a trap, cancels its timer and hands it back (with its inventory).
    pub fn despawn(&mut self, id: TrapId, scheduler: &mut dyn TickScheduler) -> Option<Trap<I>> {
        self.despawn_with_events(id, scheduler, &mut ())
    }

    pub fn despawn_with_events(
        &mut self,
        id: TrapId,
        scheduler: &mut dyn TickScheduler,
        sink: &mut dyn EventSink,
    ) -> Option<Trap<I>> {
        let mut trap = self.traps.remove(&id)?;
        self.instances.remove(id);
        scheduler.cancel(id);
        trap.destroy();

        debug!("{} despawned.", id);
        if sink.wants(TrapEventKind::TrapDespawned) {
            sink.send(TrapEvent::TrapDespawned { trap: id });
        }
        Some(trap)
    }

    /// Runs one tick of a trap against the current config.
    pub fn tick(
        &mut self,
        id: TrapId,
        env: &dyn Environment,
        rng: &mut impl Rng,
    ) -> Result<TickOutcome> {
        self.tick_with_events(id, env, rng, &mut ())
    }

    pub fn tick_with_events(
        &mut self,
        id: TrapId,
        env: &dyn Environment,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Result<TickOutcome> {
        let config = self.config;
        let trap = self
            .traps
            .get_mut(&id)
            .ok_or(Error::UnknownTrap { id: id.0 })?;
        let outcome = trap.tick(&self.registry, &config, env, rng);
        if sink.wants(TrapEventKind::TickEvaluated) {
            sink.send(TrapEvent::TickEvaluated {
                trap: id,
                outcome: outcome.clone(),
            });
        }
        Ok(outcome)
    }

    /// Ticks every trap in `due` (as returned by a scheduler), skipping ids that have
    /// been despawned since they fell due.
    pub fn run_due(
        &mut self,
        due: &[TrapId],
        env: &dyn Environment,
        rng: &mut impl Rng,
    ) -> Vec<(TrapId, TickOutcome)> {
        self.run_due_with_events(due, env, rng, &mut ())
    }

    pub fn run_due_with_events(
        &mut self,
        due: &[TrapId],
        env: &dyn Environment,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Vec<(TrapId, TickOutcome)> {
        let mut outcomes = Vec::with_capacity(due.len());
        for &id in due {
            match self.tick_with_events(id, env, rng, sink) {
                Ok(outcome) => outcomes.push((id, outcome)),
                Err(_) => debug!("{} fell due after despawn; skipping.", id),
            }
        }
        outcomes
    }

    /// Replaces the config. Returns `true` when the production rate changed, in which
    /// case every live timer was restarted with the new interval.
    pub fn set_config(
        &mut self,
        config: TrapConfig,
        scheduler: &mut dyn TickScheduler,
    ) -> Result<bool> {
        self.set_config_with_events(config, scheduler, &mut ())
    }

    pub fn set_config_with_events(
        &mut self,
        config: TrapConfig,
        scheduler: &mut dyn TickScheduler,
        sink: &mut dyn EventSink,
    ) -> Result<bool> {
        config.validate()?;
        let rate_changed = config.production_rate != self.config.production_rate;
        self.config = config;
        if rate_changed {
            self.production_rate_changed(scheduler, sink);
        }
        Ok(rate_changed)
    }

    /// Applies persisted RON config text. On failure the previous values stay in
    /// effect, the problem is logged, and the error is returned.
    #[cfg(feature = "ron")]
    pub fn reload_config_str(
        &mut self,
        text: &str,
        scheduler: &mut dyn TickScheduler,
    ) -> Result<bool> {
        self.reload_config_str_with_events(text, scheduler, &mut ())
    }

    #[cfg(feature = "ron")]
    pub fn reload_config_str_with_events(
        &mut self,
        text: &str,
        scheduler: &mut dyn TickScheduler,
        sink: &mut dyn EventSink,
    ) -> Result<bool> {
        match TrapConfig::from_ron_str(text) {
            Ok(config) => self.set_config_with_events(config, scheduler, sink),
            Err(e) => {
                error!("There was an issue loading the trap config: {}", e);
                error!("Please check your config entries for spelling and format!");
                if sink.wants(TrapEventKind::Warning) {
                    sink.send(TrapEvent::Warning {
                        context: "config".into(),
                        message: format!("Config reload rejected, keeping previous values: {e}"),
                    });
                }
                Err(e)
            }
        }
    }

    fn production_rate_changed(
        &mut self,
        scheduler: &mut dyn TickScheduler,
        sink: &mut dyn EventSink,
    ) {
        let interval = self.config.production_interval();
        for trap in self.traps.values_mut() {
            trap.set_interval(interval);
        }
        let traps = self.instances.broadcast_interval(interval, scheduler);
        if sink.wants(TrapEventKind::ProductionRateChanged) {
            sink.send(TrapEvent::ProductionRateChanged { interval, traps });
        }
    }

    /// Fish units held by a trap.
    pub fn fish_count(&self, id: TrapId) -> Option<u32> {
        self.traps.get(&id).map(|t| t.fish_count())
    }

    /// Hover content for a trap, using the current `MaxFish`.
    pub fn hover_text(
        &self,
        id: TrapId,
        has_access: bool,
        env: &dyn Environment,
    ) -> Option<HoverText> {
        self.traps
            .get(&id)
            .map(|t| t.hover_text(self.config.max_fish, has_access, env))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::biome::Biome;
    use crate::catalog::{ItemKind, ItemTemplate, MemoryCatalog};
    use crate::conversion::registry::{MISTLANDS_BAIT, NECK_TAIL_BAIT};
    use crate::environment::StaticEnvironment;
    use crate::events::VecSink;
    use crate::inventory::{ItemStack, SlotInventory};
    use crate::schedule::{TickTimers, MIN_INTERVAL};

    const WATER: f32 = 30.0;

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::from_templates([
            ItemTemplate::fish("Fish1", "$item_fish1").with_max_quality(4),
            ItemTemplate::fish("Fish9", "$item_fish9").with_max_quality(4),
            ItemTemplate::new("NeckTail", NECK_TAIL_BAIT, ItemKind::Consumable).with_max_stack(50),
        ])
    }

    fn stocked(catalog: &MemoryCatalog, necktails: u32) -> SlotInventory {
        let mut inventory = SlotInventory::new(8);
        let neck = catalog.by_name(NECK_TAIL_BAIT).unwrap();
        inventory.add_item(ItemStack::new(neck, necktails));
        inventory
    }

    fn env() -> StaticEnvironment {
        StaticEnvironment::new(Biome::MEADOWS, WATER)
    }

    fn underwater() -> Vec3 {
        Vec3::new(0.0, WATER - 2.0, 0.0)
    }

    fn system(config: TrapConfig) -> (MemoryCatalog, TrapSystem<SlotInventory>) {
        let catalog = catalog();
        let mut system = TrapSystem::try_new(config).unwrap();
        system.rebuild_registry(&catalog);
        (catalog, system)
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        let config = TrapConfig::new().with_chance_to_catch(3.0);
        let err = TrapSystem::<SlotInventory>::try_new(config);
        assert!(matches!(err, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn spawn_registers_and_ticks_immediately() {
        let (catalog, mut system) = system(TrapConfig::new().with_chance_to_catch(1.0));
        let mut timers = TickTimers::new();
        let id = system.spawn(underwater(), stocked(&catalog, 2), &env(), &mut timers);

        assert!(system.instances().contains(id));
        let due = timers.advance(Duration::ZERO);
        assert_eq!(due, vec![id]);

        let mut rng = StdRng::seed_from_u64(7);
        let outcomes = system.run_due(&due, &env(), &mut rng);
        assert!(outcomes[0].1.is_catch());
        assert_eq!(system.fish_count(id), Some(1));
    }

    #[test]
    fn despawn_cancels_timer_and_returns_inventory() {
        let (catalog, mut system) = system(TrapConfig::new());
        let mut timers = TickTimers::new();
        let id = system.spawn(underwater(), stocked(&catalog, 2), &env(), &mut timers);

        let trap = system.despawn(id, &mut timers).unwrap();
        assert_eq!(trap.phase(), crate::trap::TrapPhase::Destroyed);
        assert_eq!(trap.inventory().count_named(NECK_TAIL_BAIT), 2);
        assert!(system.is_empty());
        assert!(!system.instances().contains(id));
        assert!(timers.is_empty());

        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            system.tick(id, &env(), &mut rng),
            Err(Error::UnknownTrap { .. })
        ));
        assert!(system.run_due(&[id], &env(), &mut rng).is_empty());
    }

    #[test]
    fn rate_change_reschedules_all_live_traps() {
        let (catalog, mut system) = system(TrapConfig::new().with_production_rate(1200.0));
        let mut timers = TickTimers::new();
        let ids: Vec<_> = (0..3)
            .map(|_| system.spawn(underwater(), stocked(&catalog, 1), &env(), &mut timers))
            .collect();
        timers.advance(Duration::ZERO);
        timers.advance(Duration::from_secs(100));

        let mut sink = VecSink::new();
        let changed = system
            .set_config_with_events(
                system.config().with_production_rate(30.0),
                &mut timers,
                &mut sink,
            )
            .unwrap();
        assert!(changed);
        assert!(matches!(
            sink.as_slice(),
            [TrapEvent::ProductionRateChanged { traps: 3, .. }]
        ));

        assert!(timers.advance(Duration::from_secs(29)).is_empty());
        assert_eq!(timers.advance(Duration::from_secs(1)), ids);
        for id in ids {
            assert_eq!(system.trap(id).unwrap().interval(), Duration::from_secs(30));
        }
    }

    #[test]
    fn unchanged_rate_leaves_timers_alone() {
        let (catalog, mut system) = system(TrapConfig::new().with_production_rate(60.0));
        let mut timers = TickTimers::new();
        let id = system.spawn(underwater(), stocked(&catalog, 1), &env(), &mut timers);
        timers.advance(Duration::from_secs(10));

        let changed = system
            .set_config(system.config().with_max_fish(9), &mut timers)
            .unwrap();
        assert!(!changed);
        assert_eq!(timers.next_due(id), Some(Duration::from_secs(60)));
        assert_eq!(system.config().max_fish, 9);
    }

    #[cfg(feature = "ron")]
    #[test]
    fn bad_reload_keeps_previous_values() {
        let (_, mut system) = system(TrapConfig::new().with_max_fish(7));
        let mut timers = TickTimers::new();
        let mut sink = VecSink::new();

        let result = system.reload_config_str_with_events(
            "(MaxFish: oops",
            &mut timers,
            &mut sink,
        );
        assert!(result.is_err());
        assert_eq!(system.config().max_fish, 7);
        assert!(matches!(
            sink.as_slice(),
            [TrapEvent::Warning { context, .. }] if context == "config"
        ));
    }

    #[cfg(feature = "ron")]
    #[test]
    fn unrepresentable_rate_reload_keeps_timers() {
        let (catalog, mut system) = system(TrapConfig::new().with_production_rate(30.0));
        let mut timers = TickTimers::new();
        let id = system.spawn(underwater(), stocked(&catalog, 1), &env(), &mut timers);

        let result = system.reload_config_str("(ProductionRate: 1e20)", &mut timers);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
        assert_eq!(system.config().production_rate, 30.0);
        assert_eq!(timers.interval(id), Some(Duration::from_secs(30)));
    }

    #[cfg(feature = "ron")]
    #[test]
    fn reload_applies_new_rate() {
        let (catalog, mut system) = system(TrapConfig::new());
        let mut timers = TickTimers::new();
        let id = system.spawn(underwater(), stocked(&catalog, 1), &env(), &mut timers);

        let changed = system
            .reload_config_str("(ProductionRate: 5.0, MaxFish: 2)", &mut timers)
            .unwrap();
        assert!(changed);
        assert_eq!(system.config().max_fish, 2);
        assert_eq!(timers.interval(id), Some(Duration::from_secs(5)));
    }

    #[test]
    fn rebuild_reports_skipped_fixed_rules() {
        let mut system = TrapSystem::<SlotInventory>::new(TrapConfig::new());
        let catalog = MemoryCatalog::from_templates([ItemTemplate::fish("Fish1", "$item_fish1")]);
        let mut sink = VecSink::new();
        let report = system.rebuild_registry_with_events(&catalog, &mut sink);

        assert_eq!(report.skipped_fixed, vec![MISTLANDS_BAIT.to_string()]);
        assert_eq!(sink.len(), 2);
        assert!(matches!(sink.as_slice()[1], TrapEvent::RegistryRebuilt { .. }));
    }

    #[test]
    fn ticks_emit_events() {
        let (catalog, mut system) = system(TrapConfig::new().with_chance_to_catch(0.0));
        let id = system.spawn(underwater(), stocked(&catalog, 1), &env(), &mut ());
        let mut sink = VecSink::only([TrapEventKind::TickEvaluated]);
        let mut rng = StdRng::seed_from_u64(3);
        system.tick_with_events(id, &env(), &mut rng, &mut sink).unwrap();
        assert!(matches!(
            &sink.as_slice()[0],
            TrapEvent::TickEvaluated { outcome: TickOutcome::Missed { .. }, .. }
        ));
    }

    #[test]
    fn unvalidated_tiny_rate_spawns_with_clamped_interval() {
        let catalog = catalog();
        let mut system = TrapSystem::new(TrapConfig::new().with_production_rate(0.0001));
        system.rebuild_registry(&catalog);
        let mut timers = TickTimers::new();
        let id = system.spawn(underwater(), stocked(&catalog, 1), &env(), &mut timers);
        assert_eq!(timers.interval(id), Some(MIN_INTERVAL));
    }

    #[test]
    fn spawn_named_sets_hover_name() {
        let (catalog, mut system) = system(TrapConfig::new());
        let named = system.spawn_named(
            "Dock trap",
            underwater(),
            stocked(&catalog, 1),
            &env(),
            &mut (),
        );
        let plain = system.spawn(underwater(), stocked(&catalog, 1), &env(), &mut ());

        let hover = system.hover_text(named, true, &env()).unwrap();
        assert_eq!(hover.name, "Dock trap");
        assert!(hover.to_string().starts_with("Dock trap"));
        let plain_hover = system.hover_text(plain, true, &env()).unwrap();
        assert_eq!(plain_hover.name, DEFAULT_TRAP_NAME);
    }

    #[test]
    fn hover_uses_current_max_fish() {
        let (catalog, mut system) = system(TrapConfig::new().with_max_fish(6));
        let id = system.spawn(underwater(), stocked(&catalog, 1), &env(), &mut ());
        let hover = system.hover_text(id, true, &env()).unwrap();
        assert_eq!(hover.max_fish, 6);
        assert_eq!(hover.fish_count, 0);
    }
}
