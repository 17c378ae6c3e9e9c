//! Biome flags used to gate bait eligibility by region.
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A set of environment-region flags. A trap sits in exactly one biome, while a
/// conversion rule carries a mask of every biome it is valid in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Biome(u32);

impl Biome {
    pub const NONE: Biome = Biome(0);
    pub const MEADOWS: Biome = Biome(1);
    pub const SWAMP: Biome = Biome(2);
    pub const MOUNTAIN: Biome = Biome(4);
    pub const BLACK_FOREST: Biome = Biome(8);
    pub const PLAINS: Biome = Biome(16);
    pub const ASH_LANDS: Biome = Biome(32);
    pub const DEEP_NORTH: Biome = Biome(64);
    pub const OCEAN: Biome = Biome(256);
    pub const MISTLANDS: Biome = Biome(512);
    /// Wildcard matching any region.
    pub const ALL: Biome = Biome(895);

    const NAMED: [(Biome, &'static str); 9] = [
        (Biome::MEADOWS, "Meadows"),
        (Biome::SWAMP, "Swamp"),
        (Biome::MOUNTAIN, "Mountain"),
        (Biome::BLACK_FOREST, "BlackForest"),
        (Biome::PLAINS, "Plains"),
        (Biome::ASH_LANDS, "AshLands"),
        (Biome::DEEP_NORTH, "DeepNorth"),
        (Biome::OCEAN, "Ocean"),
        (Biome::MISTLANDS, "Mistlands"),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        Biome(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when the two sets share at least one flag.
    pub const fn intersects(self, other: Biome) -> bool {
        self.0 & other.0 != 0
    }

    /// True when every flag of `other` is also set in `self`.
    pub const fn contains(self, other: Biome) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Biome) -> Biome {
        Biome(self.0 | other.0)
    }

    /// Looks up a single biome by its display name.
    pub fn from_name(name: &str) -> Option<Biome> {
        if name == "All" {
            return Some(Biome::ALL);
        }
        Self::NAMED
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(b, _)| *b)
    }
}

impl BitOr for Biome {
    type Output = Biome;

    fn bitor(self, rhs: Biome) -> Biome {
        self.union(rhs)
    }
}

impl BitOrAssign for Biome {
    fn bitor_assign(&mut self, rhs: Biome) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Biome {
    type Output = Biome;

    fn bitand(self, rhs: Biome) -> Biome {
        Biome(self.0 & rhs.0)
    }
}

impl fmt::Debug for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Biome::ALL {
            return f.write_str("All");
        }
        if self.is_empty() {
            return f.write_str("None");
        }
        let mut first = true;
        for (flag, name) in Self::NAMED {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
