//! Sector partitions of the compass circle.

use serde::{Deserialize, Serialize};

use crate::core::normalize_degrees;

/// How the compass circle is split for calibration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectorLayout {
    /// 8 sectors, 45° wide
    #[default]
    Octants,
    /// 12 sectors, 30° wide (refinement pass)
    Fine,
}

impl SectorLayout {
    /// Number of sectors
    #[inline]
    pub fn sector_count(self) -> usize {
        match self {
            SectorLayout::Octants => 8,
            SectorLayout::Fine => 12,
        }
    }

    /// Sector width in degrees
    #[inline]
    pub fn sector_width(self) -> f64 {
        360.0 / self.sector_count() as f64
    }

    /// Sector index for a heading: `floor(heading / width) mod count`.
    ///
    /// Negative and >360° headings wrap. Non-finite headings have no sector.
    pub fn sector_for(self, heading_deg: f64) -> Option<u8> {
        if !heading_deg.is_finite() {
            return None;
        }
        let heading = normalize_degrees(heading_deg);
        let index = (heading / self.sector_width()).floor() as usize % self.sector_count();
        Some(index as u8)
    }

    /// Center bearing of a sector in degrees
    #[inline]
    pub fn bearing(self, sector: u8) -> f64 {
        let width = self.sector_width();
        sector as f64 * width + width / 2.0
    }
}
