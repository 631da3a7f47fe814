// SPDX-License-Identifier: MPL-2.0

//! Human-readable speed strings

use std::fmt;

/// Binary-prefixed speed unit; there is nothing above TB/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SpeedUnit {
    BytesPerSec,
    KilobytesPerSec,
    MegabytesPerSec,
    GigabytesPerSec,
    TerabytesPerSec,
}

impl SpeedUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            SpeedUnit::BytesPerSec => "B/s",
            SpeedUnit::KilobytesPerSec => "KB/s",
            SpeedUnit::MegabytesPerSec => "MB/s",
            SpeedUnit::GigabytesPerSec => "GB/s",
            SpeedUnit::TerabytesPerSec => "TB/s",
        }
    }

    fn larger(self) -> Option<Self> {
        match self {
            SpeedUnit::BytesPerSec => Some(SpeedUnit::KilobytesPerSec),
            SpeedUnit::KilobytesPerSec => Some(SpeedUnit::MegabytesPerSec),
            SpeedUnit::MegabytesPerSec => Some(SpeedUnit::GigabytesPerSec),
            SpeedUnit::GigabytesPerSec => Some(SpeedUnit::TerabytesPerSec),
            SpeedUnit::TerabytesPerSec => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedSpeed {
    pub magnitude: String,
    pub unit: SpeedUnit,
}

impl fmt::Display for FormattedSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit.suffix())
    }
}

/// Scales a byte rate by 1024 until it drops below 1024 or the unit tops out.
///
/// Values under 100 keep one decimal, larger ones none.
pub fn format_speed(bytes_per_sec: f64) -> FormattedSpeed {
    let mut value = if bytes_per_sec > 0.0 { bytes_per_sec } else { 0.0 };
    let mut unit = SpeedUnit::BytesPerSec;

    while value >= 1024.0 {
        match unit.larger() {
            Some(larger) => {
                value /= 1024.0;
                unit = larger;
            }
            None => break,
        }
    }

    let magnitude = if value < 100.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.0}")
    };

    FormattedSpeed { magnitude, unit }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIB: f64 = 1_099_511_627_776.0;

    fn text(bytes_per_sec: f64) -> String {
        format_speed(bytes_per_sec).to_string()
    }

    #[test]
    fn zero_is_one_decimal_bytes() {
        assert_eq!(text(0.0), "0.0 B/s");
    }

    #[test]
    fn scales_through_units() {
        assert_eq!(text(1536.0), "1.5 KB/s");
        assert_eq!(text(2000.0), "2.0 KB/s");
        assert_eq!(text(10_485_760.0), "10.0 MB/s");
        assert_eq!(text(3.2 * 1024.0 * 1024.0), "3.2 MB/s");
        assert_eq!(text(5.0 * 1024.0 * 1024.0 * 1024.0), "5.0 GB/s");
    }

    #[test]
    fn hundreds_drop_the_decimal() {
        assert_eq!(text(512.0), "512 B/s");
        assert_eq!(text(150_000.0), "146 KB/s");
        assert_eq!(text(128.0 * 1024.0 * 1024.0), "128 MB/s");
        assert_eq!(text(99.5), "99.5 B/s");
        assert_eq!(text(1023.0), "1023 B/s");
    }

    #[test]
    fn unit_clamps_at_terabytes() {
        assert_eq!(text(2.0 * TIB), "2.0 TB/s");
        assert_eq!(text(2048.0 * TIB), "2048 TB/s");
        assert_eq!(
            format_speed(5000.0 * TIB).unit,
            SpeedUnit::TerabytesPerSec
        );
    }

    #[test]
    fn negative_and_nan_render_as_zero() {
        assert_eq!(text(-42.0), "0.0 B/s");
        assert_eq!(text(f64::NAN), "0.0 B/s");
    }

    #[test]
    fn exposes_magnitude_and_unit_separately() {
        let speed = format_speed(1536.0);
        assert_eq!(speed.magnitude, "1.5");
        assert_eq!(speed.unit, SpeedUnit::KilobytesPerSec);
    }
}
