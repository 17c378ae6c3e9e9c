//! Bait-to-fish conversion: rules, the registry that owns them, rule selection
//! against an inventory, and quality rolls for produced fish.
use std::sync::Arc;

use rand::Rng;

use crate::biome::Biome;
use crate::catalog::ItemTemplate;
use crate::inventory::ItemStack;
use crate::roll::{pick_index, pick_uniform};

pub mod evaluation;
pub mod quality;
pub mod registry;

/// Shared item name of a bait (e.g. `$item_fishingbait_forest`).
pub type BaitName = String;

/// What a single bait item can turn into.
///
/// `fish_pool` is never empty once a rule is reachable through a
/// [`registry::ConversionRegistry`].
#[derive(Debug, Clone)]
pub struct ConversionRule {
    /// Biomes the rule is valid in.
    pub biome: Biome,
    /// `true` for true bait items, `false` for generic consumables like neck tails.
    pub is_bait: bool,
    fish_pool: Vec<Arc<ItemTemplate>>,
    extra_drop_pool: Vec<Arc<ItemTemplate>>,
}

impl ConversionRule {
    pub fn new(fish: Arc<ItemTemplate>, biome: Biome, is_bait: bool) -> Self {
        Self {
            biome,
            is_bait,
            fish_pool: vec![fish],
            extra_drop_pool: Vec::new(),
        }
    }

    /// Appends a fish unless a template with the same id is already pooled.
    pub fn add_fish(&mut self, fish: Arc<ItemTemplate>) -> bool {
        if self.fish_pool.iter().any(|f| f.id == fish.id) {
            return false;
        }
        self.fish_pool.push(fish);
        true
    }

    /// Appends a bonus drop. Duplicates are kept and weight the pick.
    pub fn add_extra_drop(&mut self, drop: Arc<ItemTemplate>) {
        self.extra_drop_pool.push(drop);
    }

    pub fn fish_pool(&self) -> &[Arc<ItemTemplate>] {
        &self.fish_pool
    }

    pub fn extra_drop_pool(&self) -> &[Arc<ItemTemplate>] {
        &self.extra_drop_pool
    }

    /// Produces one fish chosen uniformly from the pool with a rolled quality.
    ///
    /// Rules are created with a fish and the pool only grows, so there is always one
    /// to pick.
    pub fn roll_fish(&self, level_up_chance: f32, rng: &mut dyn Rng) -> ItemStack {
        let fish = &self.fish_pool[pick_index(self.fish_pool.len(), rng)];
        let quality = quality::roll_quality(fish.max_quality, level_up_chance, rng);
        ItemStack::single(fish.clone(), quality)
    }

    /// Picks one bonus item uniformly, or `None` when the pool is empty.
    pub fn roll_extra_drop(&self, rng: &mut dyn Rng) -> Option<ItemStack> {
        pick_uniform(&self.extra_drop_pool, rng).map(|drop| ItemStack::single(drop.clone(), 1))
    }
}
