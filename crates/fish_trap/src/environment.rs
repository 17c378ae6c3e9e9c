//! World queries a trap needs from the host: biome at a position and the water level.
use glam::Vec3;
use mint::Vector3;

use crate::biome::Biome;

/// Host-provided view of the world around a trap.
pub trait Environment {
    fn biome_at(&self, position: Vector3<f32>) -> Biome;

    fn water_level(&self) -> f32;

    /// A position is submerged when it is at or below the water level.
    fn is_submerged(&self, position: Vector3<f32>) -> bool {
        Vec3::from(position).y <= self.water_level()
    }
}

/// An environment with a single biome everywhere and a flat water level.
#[derive(Debug, Clone, Copy)]
pub struct StaticEnvironment {
    pub biome: Biome,
    pub water_level: f32,
}

impl StaticEnvironment {
    pub fn new(biome: Biome, water_level: f32) -> Self {
        Self { biome, water_level }
    }
}

impl Default for StaticEnvironment {
    fn default() -> Self {
        Self {
            biome: Biome::MEADOWS,
            water_level: 30.0,
        }
    }
}

impl Environment for StaticEnvironment {
    fn biome_at(&self, _position: Vector3<f32>) -> Biome {
        self.biome
    }

    fn water_level(&self) -> f32 {
        self.water_level
    }
}
