//! Registry mapping bait names to [`ConversionRule`]s, built from an item catalog.
//!
//! Construction scans every fish template once:
//! - each bait the fish is caught with gets a rule, created on first sight with the
//!   fish's biome from [`biome_for_fish`];
//! - later fish sharing that bait are merged in (fish pool deduplicated, bonus drops
//!   appended as-is, biome masks unioned).
//!
//! After the scan the [`FIXED_RULES`] are registered, replacing any scanned rule
//! under the same bait name.
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::biome::Biome;
use crate::catalog::{ItemCatalog, ItemTemplate};
use crate::conversion::{BaitName, ConversionRule};

pub const NECK_TAIL_BAIT: &str = "$item_necktail";
pub const MISTLANDS_BAIT: &str = "$item_fishingbait_mistlands";

/// Hand-authored rules registered after the scan: `(bait name, fish template id)`.
/// Both use the wildcard biome and are not flagged as true bait.
pub const FIXED_RULES: [(&str, &str); 2] = [(NECK_TAIL_BAIT, "Fish1"), (MISTLANDS_BAIT, "Fish9")];

/// Biome mask for a fish template. Unknown templates fall back to [`Biome::ALL`].
pub fn biome_for_fish(template_id: &str) -> Biome {
    match template_id {
        "Fish1" => Biome::MEADOWS | Biome::BLACK_FOREST,
        "Fish2" => Biome::MEADOWS | Biome::BLACK_FOREST | Biome::SWAMP,
        "Fish3" => Biome::OCEAN,
        "Fish4_cave" => Biome::MOUNTAIN,
        "Fish5" => Biome::BLACK_FOREST,
        "Fish6" => Biome::SWAMP,
        "Fish7" => Biome::PLAINS,
        "Fish8" => Biome::PLAINS | Biome::OCEAN,
        "Fish9" => Biome::MISTLANDS,
        "Fish10" => Biome::DEEP_NORTH,
        "Fish11" => Biome::ASH_LANDS,
        "Fish12" => Biome::MISTLANDS | Biome::ASH_LANDS | Biome::DEEP_NORTH | Biome::OCEAN,
        _ => Biome::ALL,
    }
}

/// Summary of a registry (re)build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RebuildReport {
    /// Rules registered after the build.
    pub rules: usize,
    /// Fish templates scanned.
    pub fish_scanned: usize,
    /// Fixed rules skipped because their fish template is missing from the catalog.
    pub skipped_fixed: Vec<BaitName>,
}

/// Owns every conversion rule, keyed by bait name.
#[derive(Debug, Clone, Default)]
pub struct ConversionRegistry {
    rules: BTreeMap<BaitName, ConversionRule>,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from scratch.
    pub fn build(catalog: &dyn ItemCatalog) -> Self {
        let mut registry = Self::new();
        registry.rebuild(catalog);
        registry
    }

    /// Clears all rules and rescans the catalog.
    pub fn rebuild(&mut self, catalog: &dyn ItemCatalog) -> RebuildReport {
        self.rules.clear();

        let fish_templates = catalog.fish_templates();
        for fish in &fish_templates {
            let drops = resolve_extra_drops(fish, catalog);
            for bait in &fish.baits {
                self.register_scanned(bait, fish, &drops);
            }
        }

        let mut skipped_fixed = Vec::new();
        for (bait, fish_id) in FIXED_RULES {
            match catalog.template(fish_id) {
                Some(fish) => self.register_fixed(bait, fish),
                None => {
                    warn!(
                        "Fixed rule for '{}' skipped: fish template '{}' not in catalog.",
                        bait, fish_id
                    );
                    skipped_fixed.push(bait.to_owned());
                }
            }
        }

        info!(
            "Conversion registry built: {} rules from {} fish templates.",
            self.rules.len(),
            fish_templates.len()
        );

        RebuildReport {
            rules: self.rules.len(),
            fish_scanned: fish_templates.len(),
            skipped_fixed,
        }
    }

    fn register_scanned(
        &mut self,
        bait: &str,
        fish: &Arc<ItemTemplate>,
        drops: &[Arc<ItemTemplate>],
    ) {
        let biome = biome_for_fish(&fish.id);
        let rule = match self.rules.entry(bait.to_owned()) {
            Entry::Occupied(entry) => {
                let rule = entry.into_mut();
                if rule.add_fish(fish.clone()) {
                    debug!("Bait '{}' merged fish '{}'.", bait, fish.id);
                }
                rule.biome |= biome;
                rule
            }
            Entry::Vacant(entry) => {
                debug!("Bait '{}' registered with fish '{}'.", bait, fish.id);
                entry.insert(ConversionRule::new(fish.clone(), biome, true))
            }
        };
        for drop in drops {
            rule.add_extra_drop(drop.clone());
        }
    }

    fn register_fixed(&mut self, bait: &str, fish: Arc<ItemTemplate>) {
        if self.rules.contains_key(bait) {
            debug!("Fixed rule replaces scanned rule for bait '{}'.", bait);
        }
        self.rules
            .insert(bait.to_owned(), ConversionRule::new(fish, Biome::ALL, false));
    }

    /// Rule for a bait name, if any.
    pub fn get(&self, bait: &str) -> Option<&ConversionRule> {
        self.rules.get(bait)
    }

    pub fn contains(&self, bait: &str) -> bool {
        self.rules.contains_key(bait)
    }

    /// Rules in bait-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConversionRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn resolve_extra_drops(fish: &ItemTemplate, catalog: &dyn ItemCatalog) -> Vec<Arc<ItemTemplate>> {
    fish.extra_drops
        .iter()
        .filter_map(|id| {
            let drop = catalog.template(id);
            if drop.is_none() {
                debug!("Fish '{}' lists unknown bonus drop '{}'; skipping.", fish.id, id);
            }
            drop
        })
        .collect()
}
