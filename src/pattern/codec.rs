//! Packing of spot layouts into 32-bit pattern identifiers
//!
//! A layout is eight coordinates, an (x, y) offset for each of the four spots.
//! Every coordinate occupies one nibble of the identifier, coordinate 0 in the
//! lowest four bits and coordinate 7 in the highest.

use crate::io::configuration::{MAX_COORDINATE, PARAMETER_COUNT, SPOT_COUNT};
use num_traits::clamp;
use rand::Rng;

const NIBBLE_MASK: u32 = 0xf;

/// Spot offsets of a single tile, each coordinate within `0..=15`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SpotParameters([u8; PARAMETER_COUNT]);

/// Identifier reserved for regions that are light everywhere
pub const ALL_LIGHT_ID: u32 = 0x393d_9888;
/// Identifier reserved for regions that are dark everywhere
pub const ALL_DARK_ID: u32 = 0xff20_0000;

/// Layout rendered for light regions without searching
pub const ALL_LIGHT: SpotParameters = SpotParameters([0x8, 0x8, 0x8, 0x9, 0xd, 0x3, 0x9, 0x3]);
/// Layout rendered for dark regions without searching, and the search seed
pub const ALL_DARK: SpotParameters = SpotParameters([0x0, 0x0, 0x0, 0x0, 0x0, 0x2, 0xf, 0xf]);

impl SpotParameters {
    /// Build a layout from raw coordinates, clamping each into range
    pub fn new(coordinates: [i64; PARAMETER_COUNT]) -> Self {
        Self(coordinates.map(|c| clamp(c, 0, i64::from(MAX_COORDINATE)) as u8))
    }

    /// Build a layout from a continuous solver point
    ///
    /// Each coordinate is clamped into range and then truncated toward zero,
    /// so `3.9` lands on spot offset 3. `NaN` is treated as 0.
    pub fn from_continuous(point: &[f64; PARAMETER_COUNT]) -> Self {
        Self(point.map(|c| {
            if c.is_nan() {
                0
            } else {
                clamp(c, 0.0, f64::from(MAX_COORDINATE)) as u8
            }
        }))
    }

    /// Unpack an identifier; every 32-bit value is a valid layout
    pub const fn decode(identifier: u32) -> Self {
        let mut coordinates = [0u8; PARAMETER_COUNT];
        let mut i = 0;
        while i < PARAMETER_COUNT {
            coordinates[i] = ((identifier >> (4 * i)) & NIBBLE_MASK) as u8;
            i += 1;
        }
        Self(coordinates)
    }

    /// Pack the layout into its identifier
    pub fn encode(&self) -> u32 {
        self.0
            .iter()
            .enumerate()
            .fold(0u32, |packed, (i, &c)| {
                packed | (u32::from(c.min(MAX_COORDINATE)) << (4 * i))
            })
    }

    /// Draw a uniformly random layout
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::decode(rng.random::<u32>())
    }

    /// Raw coordinates in identifier order
    pub const fn coordinates(&self) -> &[u8; PARAMETER_COUNT] {
        &self.0
    }

    /// Offset of spot `index` as (x, y)
    pub fn spot(&self, index: usize) -> Option<(u8, u8)> {
        if index >= SPOT_COUNT {
            return None;
        }
        let x = self.0.get(2 * index).copied()?;
        let y = self.0.get(2 * index + 1).copied()?;
        Some((x, y))
    }

    /// Coordinates as a solver point
    pub fn to_continuous(&self) -> [f64; PARAMETER_COUNT] {
        self.0.map(f64::from)
    }
}

impl From<u32> for SpotParameters {
    fn from(identifier: u32) -> Self {
        Self::decode(identifier)
    }
}

impl From<SpotParameters> for u32 {
    fn from(parameters: SpotParameters) -> Self {
        parameters.encode()
    }
}

impl std::fmt::Display for SpotParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x} {:?}", self.encode(), self.0)
    }
}
