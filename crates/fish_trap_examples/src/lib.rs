#![forbid(unsafe_code)]

use std::sync::Arc;

use fish_trap::prelude::*;
use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber honouring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// (template id, bait item name) for the stock fish.
const STOCK_FISH: &[(&str, &str)] = &[
    ("Fish1", "$item_fishingbait_forest"),
    ("Fish2", "$item_fishingbait_forest"),
    ("Fish3", "$item_fishingbait_ocean"),
    ("Fish4_cave", "$item_fishingbait_cave"),
    ("Fish5", "$item_fishingbait_forest"),
    ("Fish6", "$item_fishingbait_swamp"),
    ("Fish7", "$item_fishingbait_plains"),
    ("Fish8", "$item_fishingbait_ocean"),
    ("Fish9", "$item_fishingbait_mistlands"),
    ("Fish10", "$item_fishingbait_deepnorth"),
    ("Fish11", "$item_fishingbait_ashlands"),
    ("Fish12", "$item_fishingbait_ocean"),
];

/// A catalog with the twelve stock fish, their baits, neck tails and coins.
pub fn stock_catalog() -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new();
    for (i, (id, bait)) in STOCK_FISH.iter().enumerate() {
        let mut fish = ItemTemplate::fish(*id, format!("$animal_{}", id.to_lowercase()))
            .with_max_quality(4)
            .with_bait(*bait);
        if i % 3 == 2 {
            fish = fish.with_extra_drop("Coins");
        }
        catalog.insert(fish);
    }
    for (_, bait) in STOCK_FISH {
        let id = bait.trim_start_matches("$item_").replace('_', "");
        catalog.insert(ItemTemplate::new(id, *bait, ItemKind::Bait).with_max_stack(100));
    }
    catalog.insert(
        ItemTemplate::new("NeckTail", NECK_TAIL_BAIT, ItemKind::Consumable).with_max_stack(20),
    );
    catalog.insert(ItemTemplate::new("Coins", "$item_coins", ItemKind::Misc).with_max_stack(999));
    catalog
}

/// Looks up a template by shared item name.
pub fn named(catalog: &MemoryCatalog, name: &str) -> Result<Arc<ItemTemplate>> {
    catalog.by_name(name).ok_or_else(|| Error::UnknownTemplate {
        id: name.to_owned(),
    })
}

/// Prints a trap's inventory and the fish it would display.
pub fn print_trap(trap: &Trap<SlotInventory>) {
    println!("{} [{:?}, {:?}]", trap.id(), trap.biome(), trap.phase());
    for item in trap.inventory().items() {
        println!("  {:>3} x {} (q{})", item.stack, item.name(), item.quality);
    }
    for visual in trap.visuals(4) {
        println!("  shows {} at scale {:.2}", visual.template, visual.scale);
    }
}
