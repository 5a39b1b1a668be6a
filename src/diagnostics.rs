//! Magnet diagnostics for AS5600

use crate::register::{MAGNET_OK, Status};

/// Magnet placement as reported by the `STATUS` register (0x0B)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MagnetStatus {
    /// Magnet detected at a usable distance
    Detected,
    /// AGC maximum gain overflow
    ///
    /// The magnet is too far away or too weak
    TooWeak,
    /// AGC minimum gain overflow
    ///
    /// The magnet is too close or too strong
    TooStrong,
    /// No magnet detected
    NotDetected,
}

impl MagnetStatus {
    /// Only [`MagnetStatus::Detected`] allows angle measurements
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Detected)
    }
}

impl From<Status> for MagnetStatus {
    fn from(status: Status) -> Self {
        if status.masked() == MAGNET_OK {
            Self::Detected
        } else if status.ml() {
            Self::TooWeak
        } else if status.mh() {
            Self::TooStrong
        } else {
            Self::NotDetected
        }
    }
}

impl From<u8> for MagnetStatus {
    fn from(raw: u8) -> Self {
        Status(raw).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_status_bits() {
        assert_eq!(MagnetStatus::from(0x20), MagnetStatus::Detected);
        assert_eq!(MagnetStatus::from(0x10), MagnetStatus::TooWeak);
        assert_eq!(MagnetStatus::from(0x30), MagnetStatus::TooWeak);
        assert_eq!(MagnetStatus::from(0x08), MagnetStatus::TooStrong);
        assert_eq!(MagnetStatus::from(0x28), MagnetStatus::TooStrong);
        assert_eq!(MagnetStatus::from(0x00), MagnetStatus::NotDetected);
        assert_eq!(MagnetStatus::from(0xC7), MagnetStatus::NotDetected);
    }

    #[test]
    fn detection_matches_mask_for_every_status_byte() {
        for raw in 0..=u8::MAX {
            let expected = raw & 0b0011_1000 == 0x20;
            assert_eq!(MagnetStatus::from(raw).is_ok(), expected, "status = {raw:#04x}");
        }
    }
}
