//! Direction calibration configuration section.

use serde::{Deserialize, Serialize};

use crate::direction::SectorLayout;

use super::defaults;

/// Rotation-based calibration settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Sector partition: "octants" (8 × 45°) or "fine" (12 × 30°)
    #[serde(default = "defaults::sector_layout")]
    pub layout: SectorLayout,

    /// Distinct sectors that must be visited before resolving
    #[serde(default = "defaults::min_sectors")]
    pub min_sectors: u8,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            layout: defaults::sector_layout(),
            min_sectors: defaults::min_sectors(),
        }
    }
}

impl CalibrationConfig {
    /// 12-sector refinement layout requiring 8 visited sectors
    pub fn fine() -> Self {
        Self {
            layout: SectorLayout::Fine,
            min_sectors: 8,
        }
    }
}
