//! A placed trap: the per-instance tick state machine.
//!
//! Each tick runs the gates in order and stops at the first one that fails:
//! 1. the trap must be submerged;
//! 2. the inventory needs a free slot and fewer fish than `MaxFish`;
//! 3. some stack must select an eligible rule;
//! 4. the catch roll must pass (a miss keeps the bait unless `ConsumeBaitOnMiss`);
//! 5. one bait unit is removed and a fish is added;
//! 6. with `ExtraDrops` on, a bonus roll may add one item from the rule's drop pool.
//!
//! The trap holds its inventory exclusively while ticking, so the capacity check and
//! the mutation that follows it cannot interleave with other writers.
use std::time::Duration;

use glam::Vec3;
use rand::Rng;
use tracing::debug;

use crate::biome::Biome;
use crate::catalog::TemplateId;
use crate::config::TrapConfig;
use crate::conversion::evaluation::{select_conversion, SelectionFilter};
use crate::conversion::registry::ConversionRegistry;
use crate::conversion::BaitName;
use crate::environment::Environment;
use crate::inventory::Inventory;
use crate::roll::chance;
use crate::schedule::TrapId;

pub mod hover;
pub mod visual;

pub use hover::{fish_count_label, HoverText};
pub use visual::{fish_visuals, visual_scale, FishVisual};

pub const DEFAULT_TRAP_NAME: &str = "$piece_fishtrap";

/// Lifecycle of a trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapPhase {
    /// Placed and validated by the host; ticking.
    Spawned,
    /// Removed by the host; ticks are ignored.
    Destroyed,
}

/// A successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Catch {
    pub bait: BaitName,
    pub fish: TemplateId,
    pub quality: u32,
    /// Bonus item that made it into the inventory, if any.
    pub extra_drop: Option<TemplateId>,
}

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The trap was destroyed.
    Inactive,
    NotSubmerged,
    NoFreeSlot,
    FishLimitReached { fish: u32, max: u32 },
    NoEligibleBait,
    /// The catch roll failed.
    Missed { bait: BaitName, bait_consumed: bool },
    /// The inventory refused to give up the bait; nothing changed.
    BaitNotRemoved { bait: BaitName },
    /// Bait was consumed but the fish did not fit into the inventory.
    Escaped { bait: BaitName, fish: TemplateId },
    Caught(Catch),
}

impl TickOutcome {
    pub fn is_catch(&self) -> bool {
        matches!(self, TickOutcome::Caught(_))
    }

    /// Whether the tick changed the inventory.
    pub fn changed_inventory(&self) -> bool {
        match self {
            TickOutcome::Caught(_) | TickOutcome::Escaped { .. } => true,
            TickOutcome::Missed { bait_consumed, .. } => *bait_consumed,
            _ => false,
        }
    }
}

/// A placed trap and the inventory it works on.
#[derive(Debug, Clone)]
pub struct Trap<I> {
    id: TrapId,
    name: String,
    position: Vec3,
    biome: Biome,
    inventory: I,
    interval: Duration,
    phase: TrapPhase,
}

impl<I: Inventory> Trap<I> {
    /// Creates a spawned trap. The biome is resolved here once and cached.
    pub fn new(
        id: TrapId,
        position: impl Into<Vec3>,
        inventory: I,
        env: &dyn Environment,
        interval: Duration,
    ) -> Self {
        let position = position.into();
        Self {
            id,
            name: DEFAULT_TRAP_NAME.to_owned(),
            position,
            biome: env.biome_at(position.into()),
            inventory,
            interval,
            phase: TrapPhase::Spawned,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn id(&self) -> TrapId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn biome(&self) -> Biome {
        self.biome
    }

    pub fn phase(&self) -> TrapPhase {
        self.phase
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub(crate) fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    /// Mutable access for players and other external actors.
    pub fn inventory_mut(&mut self) -> &mut I {
        &mut self.inventory
    }

    pub fn into_inventory(self) -> I {
        self.inventory
    }

    pub fn fish_count(&self) -> u32 {
        self.inventory.fish_count()
    }

    pub fn is_submerged(&self, env: &dyn Environment) -> bool {
        env.is_submerged(self.position.into())
    }

    pub fn destroy(&mut self) {
        self.phase = TrapPhase::Destroyed;
    }

    /// Runs one tick against a config snapshot.
    pub fn tick(
        &mut self,
        registry: &ConversionRegistry,
        config: &TrapConfig,
        env: &dyn Environment,
        rng: &mut dyn Rng,
    ) -> TickOutcome {
        let outcome = self.tick_inner(registry, config, env, rng);
        debug!("{} tick: {:?}", self.id, outcome);
        outcome
    }

    fn tick_inner(
        &mut self,
        registry: &ConversionRegistry,
        config: &TrapConfig,
        env: &dyn Environment,
        rng: &mut dyn Rng,
    ) -> TickOutcome {
        if self.phase == TrapPhase::Destroyed {
            return TickOutcome::Inactive;
        }
        if !self.is_submerged(env) {
            return TickOutcome::NotSubmerged;
        }
        if !self.inventory.has_empty_slot() {
            return TickOutcome::NoFreeSlot;
        }
        let fish = self.inventory.fish_count();
        if fish >= config.max_fish {
            return TickOutcome::FishLimitReached {
                fish,
                max: config.max_fish,
            };
        }

        let filter = SelectionFilter {
            require_biome_match: config.check_biome,
            use_bait: config.use_bait,
            biome: self.biome,
        };
        let Some(selection) = select_conversion(self.inventory.items(), registry, filter) else {
            return TickOutcome::NoEligibleBait;
        };
        let bait = self.inventory.items()[selection.index].name().to_owned();

        if !chance(rng, config.chance_to_catch) {
            let bait_consumed =
                config.consume_bait_on_miss && self.inventory.remove_one(selection.index);
            return TickOutcome::Missed {
                bait,
                bait_consumed,
            };
        }

        let fish = selection.rule.roll_fish(config.level_up_chance, rng);
        let fish_id = fish.template.id.clone();
        let quality = fish.quality;

        if !self.inventory.remove_one(selection.index) {
            return TickOutcome::BaitNotRemoved { bait };
        }
        if !self.inventory.add_item(fish) {
            return TickOutcome::Escaped {
                bait,
                fish: fish_id,
            };
        }

        let extra_drop = if config.extra_drops && chance(rng, config.extra_drop_chance) {
            selection.rule.roll_extra_drop(rng).and_then(|drop| {
                let drop_id = drop.template.id.clone();
                self.inventory.add_item(drop).then_some(drop_id)
            })
        } else {
            None
        };

        TickOutcome::Caught(Catch {
            bait,
            fish: fish_id,
            quality,
            extra_drop,
        })
    }

    /// Hover content for this trap.
    pub fn hover_text(&self, max_fish: u32, has_access: bool, env: &dyn Environment) -> HoverText {
        HoverText {
            name: self.name.clone(),
            fish_count: self.fish_count(),
            max_fish,
            has_access,
            submerged: self.is_submerged(env),
        }
    }

    /// Cosmetic fish for up to `slots` display positions.
    pub fn visuals(&self, slots: usize) -> Vec<FishVisual> {
        fish_visuals(self.inventory.items(), slots).collect()
    }
}
