//! Bounded item containers a trap draws bait from and deposits fish into.
use std::sync::Arc;

use crate::catalog::ItemTemplate;

/// A stack of identical items (same template and quality).
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStack {
    pub template: Arc<ItemTemplate>,
    pub stack: u32,
    pub quality: u32,
}

impl ItemStack {
    pub fn new(template: Arc<ItemTemplate>, stack: u32) -> Self {
        Self {
            template,
            stack,
            quality: 1,
        }
    }

    /// A single item of the given quality.
    pub fn single(template: Arc<ItemTemplate>, quality: u32) -> Self {
        Self {
            template,
            stack: 1,
            quality,
        }
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn is_fish(&self) -> bool {
        self.template.is_fish()
    }

    fn stacks_with(&self, other: &ItemStack) -> bool {
        self.template.id == other.template.id && self.quality == other.quality
    }
}

/// Container abstraction owned by the host.
pub trait Inventory {
    /// Current stacks in inventory order.
    fn items(&self) -> &[ItemStack];

    fn has_empty_slot(&self) -> bool;

    /// Adds the whole stack or nothing. Returns `false` when it does not fit.
    fn add_item(&mut self, item: ItemStack) -> bool;

    /// Removes one unit from the stack at `index`. Returns `false` for a bad index.
    fn remove_one(&mut self, index: usize) -> bool;

    /// Fish units currently held, summed over stacks.
    fn fish_count(&self) -> u32 {
        self.items()
            .iter()
            .filter(|item| item.is_fish())
            .map(|item| item.stack)
            .sum()
    }
}

/// Slot-limited inventory that tops up matching stacks before opening new slots.
#[derive(Debug, Clone)]
pub struct SlotInventory {
    slots: usize,
    items: Vec<ItemStack>,
}

impl SlotInventory {
    pub fn new(slots: usize) -> Self {
        Self {
            slots,
            items: Vec::with_capacity(slots),
        }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn free_slots(&self) -> usize {
        self.slots.saturating_sub(self.items.len())
    }

    /// Units of the item named `name`, across all stacks and qualities.
    pub fn count_named(&self, name: &str) -> u32 {
        self.items
            .iter()
            .filter(|i| i.name() == name)
            .map(|i| i.stack)
            .sum()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn room_in_existing(&self, item: &ItemStack) -> u32 {
        self.items
            .iter()
            .filter(|i| i.stacks_with(item))
            .map(|i| i.template.max_stack.saturating_sub(i.stack))
            .sum()
    }
}

impl Inventory for SlotInventory {
    fn items(&self) -> &[ItemStack] {
        &self.items
    }

    fn has_empty_slot(&self) -> bool {
        self.items.len() < self.slots
    }

    fn add_item(&mut self, item: ItemStack) -> bool {
        if item.stack == 0 {
            return true;
        }
        let max_stack = item.template.max_stack.max(1);
        let overflow = item.stack.saturating_sub(self.room_in_existing(&item));
        let needed_slots = overflow.div_ceil(max_stack) as usize;
        if needed_slots > self.free_slots() {
            return false;
        }

        let mut remaining = item.stack;
        for existing in self.items.iter_mut().filter(|i| i.stacks_with(&item)) {
            let take = max_stack.saturating_sub(existing.stack).min(remaining);
            existing.stack += take;
            remaining -= take;
            if remaining == 0 {
                return true;
            }
        }
        while remaining > 0 {
            let take = remaining.min(max_stack);
            self.items.push(ItemStack {
                template: item.template.clone(),
                stack: take,
                quality: item.quality,
            });
            remaining -= take;
        }
        true
    }

    fn remove_one(&mut self, index: usize) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        item.stack = item.stack.saturating_sub(1);
        if item.stack == 0 {
            self.items.remove(index);
        }
        true
    }
}
