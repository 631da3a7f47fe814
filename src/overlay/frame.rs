// SPDX-License-Identifier: MPL-2.0

//! What the overlay shows for one tick, independent of how it is drawn

use crate::speed::{FormattedSpeed, IntervalRate, Rgb, SeverityTier, classify, format_speed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

impl Direction {
    pub fn arrow(self) -> char {
        match self {
            Direction::Down => '↓',
            Direction::Up => '↑',
        }
    }
}

/// One colored speed label.
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    pub direction: Direction,
    pub speed: FormattedSpeed,
    pub tier: SeverityTier,
}

impl Indicator {
    pub fn new(direction: Direction, bytes_per_sec: f64) -> Self {
        Self {
            direction,
            speed: format_speed(bytes_per_sec),
            tier: classify(bytes_per_sec),
        }
    }

    /// Label text, e.g. `↓ 3.2 MB/s`.
    pub fn text(&self) -> String {
        format!("{} {}", self.direction.arrow(), self.speed)
    }

    pub fn color(&self) -> Rgb {
        self.tier.color()
    }
}

/// Both indicators, download first.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    pub down: Indicator,
    pub up: Indicator,
}

impl OverlayFrame {
    pub fn from_rate(rate: IntervalRate) -> Self {
        Self {
            down: Indicator::new(Direction::Down, rate.down_bytes_per_sec),
            up: Indicator::new(Direction::Up, rate.up_bytes_per_sec),
        }
    }

    pub fn indicators(&self) -> [&Indicator; 2] {
        [&self.down, &self.up]
    }
}

impl Default for OverlayFrame {
    fn default() -> Self {
        Self::from_rate(IntervalRate::ZERO)
    }
}
