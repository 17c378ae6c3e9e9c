//! Cosmetic fish shown inside a trap.
//!
//! Display refresh is separate from ticking; nothing here can fail a tick.
use std::iter;

use crate::catalog::TemplateId;
use crate::inventory::ItemStack;

/// One fish to show in a display slot.
#[derive(Debug, Clone, PartialEq)]
pub struct FishVisual {
    pub template: TemplateId,
    pub quality: u32,
    /// Uniform scale; grows with quality.
    pub scale: f32,
}

/// Scale for a fish of `quality`: 1.0 at quality 1 up to 2.0 at quality 4 and above.
pub fn visual_scale(quality: u32) -> f32 {
    let t = ((quality as f32 - 1.0) / 3.0).clamp(0.0, 1.0);
    lerp(1.0, 2.0, t)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Lazily yields one visual per fish unit, in inventory order, for at most `slots`
/// display slots. Slots past the last fish are simply not yielded.
pub fn fish_visuals(items: &[ItemStack], slots: usize) -> impl Iterator<Item = FishVisual> + '_ {
    items
        .iter()
        .filter(|item| item.is_fish())
        .flat_map(|item| iter::repeat_n(item, item.stack as usize))
        .take(slots)
        .map(|item| FishVisual {
            template: item.template.id.clone(),
            quality: item.quality,
            scale: visual_scale(item.quality),
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{ItemKind, ItemTemplate};

    #[test]
    fn scale_grows_with_quality() {
        assert_eq!(visual_scale(0), 1.0);
        assert_eq!(visual_scale(1), 1.0);
        assert!((visual_scale(2) - 4.0 / 3.0).abs() < 1e-5);
        assert_eq!(visual_scale(4), 2.0);
        assert_eq!(visual_scale(9), 2.0);
    }

    #[test]
    fn visuals_expand_stacks_and_stop_at_slots() {
        let fish = Arc::new(ItemTemplate::fish("Fish1", "$item_fish1").with_max_stack(10));
        let bait = Arc::new(ItemTemplate::new("NeckTail", "$item_necktail", ItemKind::Consumable));
        let items = vec![
            ItemStack::new(bait, 3),
            ItemStack {
                template: fish,
                stack: 3,
                quality: 4,
            },
        ];

        let visuals: Vec<_> = fish_visuals(&items, 2).collect();
        assert_eq!(visuals.len(), 2);
        assert!(visuals.iter().all(|v| v.template == "Fish1" && v.scale == 2.0));

        assert_eq!(fish_visuals(&items, 8).count(), 3);
        assert_eq!(fish_visuals(&items[..1], 8).count(), 0);
    }
}
