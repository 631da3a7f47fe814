// SPDX-License-Identifier: MPL-2.0

//! Severity tiers for throughput and their display colors

use std::fmt;

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Lower bound (inclusive) of every tier above `Idle`, highest first.
const TIER_FLOORS: [(f64, SeverityTier); 4] = [
    (10.0 * MIB, SeverityTier::VeryHigh),
    (2.0 * MIB, SeverityTier::High),
    (100.0 * KIB, SeverityTier::Medium),
    (KIB, SeverityTier::Low),
];

/// Discrete throughput bucket, ordered from slowest to fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeverityTier {
    Idle,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl SeverityTier {
    pub const ALL: [SeverityTier; 5] = [
        SeverityTier::Idle,
        SeverityTier::Low,
        SeverityTier::Medium,
        SeverityTier::High,
        SeverityTier::VeryHigh,
    ];

    pub fn color(self) -> Rgb {
        match self {
            SeverityTier::Idle => Rgb::from_hex(0x9e9e9e),
            SeverityTier::Low => Rgb::from_hex(0xff4d4d),
            SeverityTier::Medium => Rgb::from_hex(0xffa500),
            SeverityTier::High => Rgb::from_hex(0x00e676),
            SeverityTier::VeryHigh => Rgb::from_hex(0x00b0ff),
        }
    }
}

/// Maps a rate in bytes per second to its tier.
///
/// A rate exactly on a boundary belongs to the higher tier. Negative and NaN
/// rates are `Idle`.
pub fn classify(bytes_per_sec: f64) -> SeverityTier {
    TIER_FLOORS
        .iter()
        .find(|(floor, _)| bytes_per_sec >= *floor)
        .map_or(SeverityTier::Idle, |&(_, tier)| tier)
}

/// 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: (hex >> 16) as u8,
            g: (hex >> 8) as u8,
            b: hex as u8,
        }
    }

    /// Channels scaled to `0.0..=1.0` for cairo.
    pub fn to_cairo(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
