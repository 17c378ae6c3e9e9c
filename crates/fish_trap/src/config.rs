//! Trap production settings.
//!
//! [`TrapConfig`] mirrors the persisted key/value surface (`CheckBiome`, `MaxFish`,
//! `ProductionRate`, ...). Values are read once per tick, so a change made between
//! ticks is seen whole. Persisting and watching the config file is left to the host;
//! with the `ron` feature the host can hand the file text to
//! [`TrapConfig::from_ron_str`] or [`crate::system::TrapSystem::reload_config_str`].
use std::time::Duration;

use crate::error::{Error, Result};
use crate::schedule::MIN_INTERVAL;

/// Longest accepted `ProductionRate`, in seconds (about 31 years).
pub const MAX_PRODUCTION_RATE: f32 = 1.0e9;

/// Production settings shared by every trap.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase", default))]
pub struct TrapConfig {
    /// Only accept bait whose rule matches the trap's biome.
    pub check_biome: bool,
    /// Fish units a trap may hold before it stops producing.
    pub max_fish: u32,
    /// Roll for a bonus item after each catch.
    pub extra_drops: bool,
    /// Seconds between ticks.
    pub production_rate: f32,
    pub extra_drop_chance: f32,
    pub chance_to_catch: f32,
    /// Allow true bait items; when off only neck tails and mistlands bait work.
    pub use_bait: bool,
    /// Chance of each successive quality step.
    pub level_up_chance: f32,
    /// Consume the bait even when the catch roll fails.
    pub consume_bait_on_miss: bool,
}

impl Default for TrapConfig {
    fn default() -> Self {
        Self {
            check_biome: true,
            max_fish: 4,
            extra_drops: false,
            production_rate: 1200.0,
            extra_drop_chance: 0.1,
            chance_to_catch: 0.5,
            use_bait: false,
            level_up_chance: 0.1,
            consume_bait_on_miss: false,
        }
    }
}

impl TrapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_check_biome(mut self, check_biome: bool) -> Self {
        self.check_biome = check_biome;
        self
    }

    pub fn with_max_fish(mut self, max_fish: u32) -> Self {
        self.max_fish = max_fish;
        self
    }

    pub fn with_extra_drops(mut self, extra_drops: bool) -> Self {
        self.extra_drops = extra_drops;
        self
    }

    pub fn with_production_rate(mut self, seconds: f32) -> Self {
        self.production_rate = seconds;
        self
    }

    pub fn with_extra_drop_chance(mut self, chance: f32) -> Self {
        self.extra_drop_chance = chance;
        self
    }

    pub fn with_chance_to_catch(mut self, chance: f32) -> Self {
        self.chance_to_catch = chance;
        self
    }

    pub fn with_use_bait(mut self, use_bait: bool) -> Self {
        self.use_bait = use_bait;
        self
    }

    pub fn with_level_up_chance(mut self, chance: f32) -> Self {
        self.level_up_chance = chance;
        self
    }

    pub fn with_consume_bait_on_miss(mut self, consume: bool) -> Self {
        self.consume_bait_on_miss = consume;
        self
    }

    /// Tick interval as a [`Duration`].
    ///
    /// Rates outside what [`TrapConfig::validate`] accepts are clamped into range, and a
    /// NaN rate maps to [`MIN_INTERVAL`].
    pub fn production_interval(&self) -> Duration {
        let seconds = self
            .production_rate
            .clamp(MIN_INTERVAL.as_secs_f32(), MAX_PRODUCTION_RATE);
        Duration::try_from_secs_f32(seconds)
            .unwrap_or(MIN_INTERVAL)
            .max(MIN_INTERVAL)
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        let min_rate = MIN_INTERVAL.as_secs_f32();
        if !(min_rate..=MAX_PRODUCTION_RATE).contains(&self.production_rate) {
            return Err(Error::InvalidConfig(format!(
                "ProductionRate must be within [{min_rate}, {MAX_PRODUCTION_RATE}] seconds, \
                 got {}",
                self.production_rate
            )));
        }
        for (key, value) in [
            ("ExtraDropChance", self.extra_drop_chance),
            ("ChanceToCatch", self.chance_to_catch),
            ("LevelUpChance", self.level_up_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{key} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Parses persisted RON text and validates it. Missing keys take their defaults.
    #[cfg(feature = "ron")]
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: TrapConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to the persisted RON form.
    #[cfg(feature = "ron")]
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Parse(e.to_string()))
    }
}
