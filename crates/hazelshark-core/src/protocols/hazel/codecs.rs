use std::fmt;

use serde::Serialize;

use super::layout;

/// Client build version packed into a single integer.
///
/// # Examples
/// ```
/// use hazelshark_core::GameVersion;
///
/// let version = GameVersion::from_raw(50_537_300);
/// assert_eq!(version.to_string(), "2021.6.30.0");
/// assert_eq!(version.to_raw(), Some(50_537_300));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameVersion {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub revision: u32,
}

impl GameVersion {
    pub fn from_raw(raw: u32) -> Self {
        let year = raw / layout::VERSION_YEAR_DIVISOR;
        let rest = raw % layout::VERSION_YEAR_DIVISOR;
        let month = rest / layout::VERSION_MONTH_DIVISOR;
        let rest = rest % layout::VERSION_MONTH_DIVISOR;
        let day = rest / layout::VERSION_DAY_DIVISOR;
        let revision = rest % layout::VERSION_DAY_DIVISOR;
        Self {
            year,
            month,
            day,
            revision,
        }
    }

    /// Packs the version back into its wire integer, `None` on overflow.
    pub fn to_raw(&self) -> Option<u32> {
        self.year
            .checked_mul(layout::VERSION_YEAR_DIVISOR)?
            .checked_add(self.month.checked_mul(layout::VERSION_MONTH_DIVISOR)?)?
            .checked_add(self.day.checked_mul(layout::VERSION_DAY_DIVISOR)?)?
            .checked_add(self.revision)
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.year, self.month, self.day, self.revision
        )
    }
}

/// Indices of the last eight packets that the acknowledgement mask does not
/// confirm, in ascending order.
///
/// # Examples
/// ```
/// use hazelshark_core::missing_packets;
///
/// assert_eq!(missing_packets(0b1111_1110), vec![0]);
/// assert!(missing_packets(0xFF).is_empty());
/// ```
pub fn missing_packets(mask: u8) -> Vec<u8> {
    (0..layout::ACK_WINDOW)
        .filter(|bit| mask & (1 << bit) == 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{GameVersion, missing_packets};

    #[test]
    fn version_decomposition() {
        let raw = 2022 * 25_000 + 3 * 1_800 + 29 * 50 + 1;
        let version = GameVersion::from_raw(raw);
        assert_eq!(
            version,
            GameVersion {
                year: 2022,
                month: 3,
                day: 29,
                revision: 1,
            }
        );
        assert_eq!(version.to_string(), "2022.3.29.1");
    }

    #[test]
    fn version_of_zero_and_max() {
        assert_eq!(GameVersion::from_raw(0).to_string(), "0.0.0.0");
        let max = GameVersion::from_raw(u32::MAX);
        assert_eq!(max.to_raw(), Some(u32::MAX));
    }

    #[test]
    fn version_to_raw_overflow() {
        let version = GameVersion {
            year: u32::MAX,
            month: 0,
            day: 0,
            revision: 0,
        };
        assert_eq!(version.to_raw(), None);
    }

    #[test]
    fn missing_packets_extremes() {
        assert_eq!(missing_packets(0b1111_1111), Vec::<u8>::new());
        assert_eq!(missing_packets(0), vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(missing_packets(0b0000_0001), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn missing_packets_high_bit() {
        assert_eq!(missing_packets(0b0111_1111), vec![7]);
    }
}
