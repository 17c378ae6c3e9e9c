//! Selection of the bait a trap will consume on a tick.
use crate::biome::Biome;
use crate::conversion::registry::ConversionRegistry;
use crate::conversion::ConversionRule;
use crate::inventory::ItemStack;

/// Filters applied while scanning for bait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionFilter {
    /// Reject rules whose biome mask misses the trap's biome.
    pub require_biome_match: bool,
    /// Accept rules flagged as true bait.
    pub use_bait: bool,
    /// Biome the trap sits in.
    pub biome: Biome,
}

impl SelectionFilter {
    fn accepts(&self, rule: &ConversionRule) -> bool {
        if !self.use_bait && rule.is_bait {
            return false;
        }
        if self.require_biome_match && !rule.biome.intersects(self.biome) {
            return false;
        }
        true
    }
}

/// A bait stack chosen for conversion.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    /// Index of the bait stack in the scanned items.
    pub index: usize,
    pub rule: &'a ConversionRule,
}

/// Returns the first stack, in inventory order, whose rule passes `filter`.
///
/// Stacks without a rule are skipped, as are stacks whose rule is filtered out; the
/// scan stops at the first accepted stack.
pub fn select_conversion<'a>(
    items: &[ItemStack],
    registry: &'a ConversionRegistry,
    filter: SelectionFilter,
) -> Option<Selection<'a>> {
    items.iter().enumerate().find_map(|(index, item)| {
        registry
            .get(item.name())
            .filter(|rule| filter.accepts(rule))
            .map(|rule| Selection { index, rule })
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{ItemCatalog, ItemKind, ItemTemplate, MemoryCatalog};
    use crate::conversion::registry::NECK_TAIL_BAIT;

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::from_templates([
            ItemTemplate::fish("Fish1", "$item_fish1"),
            ItemTemplate::fish("Fish6", "$item_fish6").with_bait("$item_fishingbait_swamp"),
            ItemTemplate::new("SwampBait", "$item_fishingbait_swamp", ItemKind::Bait),
            ItemTemplate::new("NeckTail", NECK_TAIL_BAIT, ItemKind::Consumable),
            ItemTemplate::new("Wood", "$item_wood", ItemKind::Material),
        ])
    }

    fn stack(catalog: &MemoryCatalog, id: &str) -> ItemStack {
        ItemStack::new(catalog.template(id).unwrap(), 5)
    }

    fn filter(require_biome_match: bool, use_bait: bool, biome: Biome) -> SelectionFilter {
        SelectionFilter {
            require_biome_match,
            use_bait,
            biome,
        }
    }

    #[test]
    fn unregistered_items_never_match() {
        let catalog = catalog();
        let registry = ConversionRegistry::build(&catalog);
        let items = vec![stack(&catalog, "Wood")];
        assert!(select_conversion(&items, &registry, filter(false, true, Biome::ALL)).is_none());
        assert!(select_conversion(&[], &registry, filter(false, true, Biome::ALL)).is_none());
    }

    #[test]
    fn first_eligible_stack_wins() {
        let catalog = catalog();
        let registry = ConversionRegistry::build(&catalog);
        let items = vec![
            stack(&catalog, "Wood"),
            stack(&catalog, "SwampBait"),
            stack(&catalog, "NeckTail"),
        ];
        let selected = select_conversion(&items, &registry, filter(false, true, Biome::MEADOWS));
        assert_eq!(selected.unwrap().index, 1);
    }

    #[test]
    fn bait_flagged_rules_need_use_bait() {
        let catalog = catalog();
        let registry = ConversionRegistry::build(&catalog);
        let items = vec![stack(&catalog, "SwampBait")];
        assert!(select_conversion(&items, &registry, filter(false, false, Biome::SWAMP)).is_none());

        let items = vec![stack(&catalog, "SwampBait"), stack(&catalog, "NeckTail")];
        let selected = select_conversion(&items, &registry, filter(false, false, Biome::SWAMP));
        assert_eq!(selected.unwrap().index, 1);
    }

    #[test]
    fn biome_filter_only_applies_when_required() {
        let catalog = catalog();
        let registry = ConversionRegistry::build(&catalog);
        let items = vec![stack(&catalog, "SwampBait")];

        assert!(select_conversion(&items, &registry, filter(true, true, Biome::MEADOWS)).is_none());
        assert!(select_conversion(&items, &registry, filter(true, true, Biome::SWAMP)).is_some());
        assert!(select_conversion(&items, &registry, filter(false, true, Biome::MEADOWS)).is_some());
    }

    #[test]
    fn wildcard_rules_pass_any_biome() {
        let catalog = catalog();
        let registry = ConversionRegistry::build(&catalog);
        let neck = Arc::new(ItemTemplate::new("NeckTail", NECK_TAIL_BAIT, ItemKind::Consumable));
        let items = vec![ItemStack::new(neck, 1)];
        let selected = select_conversion(&items, &registry, filter(true, false, Biome::MOUNTAIN));
        assert_eq!(selected.unwrap().rule.fish_pool()[0].id, "Fish1");
    }
}
