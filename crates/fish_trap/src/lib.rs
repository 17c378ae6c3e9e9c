#![forbid(unsafe_code)]
//! fish_trap: Rule-driven bait-to-fish conversion for placeable fish traps.
//!
//! Modules:
//! - catalog, inventory, environment: host-facing traits with in-memory implementations
//! - conversion: bait rules derived from the item catalog, evaluation and quality rolls
//! - trap: per-trap state, the tick algorithm, hover text and fish visuals
//! - schedule, instances: repeating tick timers and production-rate broadcast
//! - system: session-scoped owner tying registry, traps and config together
//! - config, events, error: settings, observation hooks and error types
//!
//! For examples, see the `fish_trap_examples` crate.
pub mod biome;
pub mod catalog;
pub mod config;
pub mod conversion;
pub mod environment;
pub mod error;
pub mod events;
pub mod instances;
pub mod inventory;
mod roll;
pub mod schedule;
pub mod system;
pub mod trap;

/// Convenient re-exports for common types. Import with `use fish_trap::prelude::*;`.
pub mod prelude {
    pub use crate::biome::Biome;
    pub use crate::catalog::{ItemCatalog, ItemKind, ItemTemplate, MemoryCatalog, TemplateId};
    pub use crate::config::TrapConfig;
    pub use crate::conversion::evaluation::{select_conversion, Selection, SelectionFilter};
    pub use crate::conversion::quality::roll_quality;
    pub use crate::conversion::registry::{
        ConversionRegistry, RebuildReport, MISTLANDS_BAIT, NECK_TAIL_BAIT,
    };
    pub use crate::conversion::{BaitName, ConversionRule};
    pub use crate::environment::{Environment, StaticEnvironment};
    pub use crate::error::{Error, Result};
    pub use crate::events::{EventSink, FnSink, MultiSink, TrapEvent, TrapEventKind, VecSink};
    pub use crate::instances::InstanceRegistry;
    pub use crate::inventory::{Inventory, ItemStack, SlotInventory};
    pub use crate::schedule::{TickScheduler, TickTimers, TrapId};
    pub use crate::system::TrapSystem;
    pub use crate::trap::{
        fish_visuals, visual_scale, Catch, FishVisual, HoverText, TickOutcome, Trap, TrapPhase,
    };
}
