use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::MaterialKind;
use crate::{generation, materials, packing, strings};

/// Engine constants, overridable from TOML. Missing keys take the defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    pub packing: PackingConfig,
    pub strings: StringConfig,
    pub materials: MaterialsConfig,
    pub generation: GenerationConfig,
    pub costs: CostConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackingConfig {
    /// Mid-clamp gap between adjacent panels, meters
    pub clamp_gap: f64,
    /// Clearance kept free on every side of an area, meters
    pub border_margin: f64,
    pub max_panels_per_row: u32,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            clamp_gap: packing::CLAMP_GAP,
            border_margin: packing::BORDER_MARGIN,
            max_panels_per_row: packing::MAX_PANELS_PER_ROW,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringConfig {
    pub voc_derating: f64,
}

impl Default for StringConfig {
    fn default() -> Self {
        Self {
            voc_derating: strings::VOC_DERATING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialRate {
    pub fob_price: f64,
    /// Kilograms per unit
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialsConfig {
    pub rail_stick_length: f64,
    pub mounting_rail: MaterialRate,
    pub end_clamp: MaterialRate,
    pub mid_clamp: MaterialRate,
    pub roof_clamp: MaterialRate,
    pub ground_lug: MaterialRate,
}

impl Default for MaterialsConfig {
    fn default() -> Self {
        Self {
            rail_stick_length: materials::RAIL_STICK_LENGTH,
            mounting_rail: MaterialRate { fob_price: 24.40, weight: 10.2 },
            end_clamp: MaterialRate { fob_price: 0.31, weight: 0.055 },
            mid_clamp: MaterialRate { fob_price: 0.32, weight: 0.055 },
            roof_clamp: MaterialRate { fob_price: 1.03, weight: 0.25 },
            ground_lug: MaterialRate { fob_price: 0.08, weight: 0.1 },
        }
    }
}

impl MaterialsConfig {
    pub fn rate(&self, kind: MaterialKind) -> MaterialRate {
        match kind {
            MaterialKind::MountingRail => self.mounting_rail,
            MaterialKind::EndClamp => self.end_clamp,
            MaterialKind::MidClamp => self.mid_clamp,
            MaterialKind::RoofClamp => self.roof_clamp,
            MaterialKind::GroundLug => self.ground_lug,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Peak sun hours for the availability table
    pub peak_sun_hours: f64,
    /// Peak sun hours for requirement and coverage sizing
    pub requirement_peak_sun_hours: f64,
    pub safety_margin: f64,
    pub backup_hours: f64,
    pub generation_margin: f64,
    pub default_billing_days: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            peak_sun_hours: generation::PEAK_SUN_HOURS,
            requirement_peak_sun_hours: generation::REQUIREMENT_PEAK_SUN_HOURS,
            safety_margin: 0.10,
            backup_hours: 4.0,
            generation_margin: 1.05,
            default_billing_days: generation::DEFAULT_BILLING_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    /// FOB-origin to FOB-local factor for panels, inverters and other equipment
    pub equipment_factor: f64,
    pub structure_factor: f64,
    pub margin: f64,
    pub civil_works_rate: f64,
    pub installation_rate: f64,
    pub miscellaneous_rate: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            equipment_factor: 1.22,
            structure_factor: 1.57,
            margin: 0.20,
            civil_works_rate: 0.03,
            installation_rate: 0.05,
            miscellaneous_rate: 0.02,
        }
    }
}

impl SizingConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SizingConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let p = &self.packing;
        if !(p.clamp_gap >= 0.0) {
            return Err(Error::Config(format!(
                "packing.clamp_gap must be >= 0, got {}",
                p.clamp_gap
            )));
        }
        if !(p.border_margin >= 0.0) {
            return Err(Error::Config(format!(
                "packing.border_margin must be >= 0, got {}",
                p.border_margin
            )));
        }
        if p.max_panels_per_row == 0 {
            return Err(Error::Config("packing.max_panels_per_row must be at least 1".into()));
        }
        if !(self.strings.voc_derating > 0.0) {
            return Err(Error::Config(format!(
                "strings.voc_derating must be > 0, got {}",
                self.strings.voc_derating
            )));
        }
        if !(self.materials.rail_stick_length > 0.0) {
            return Err(Error::Config(format!(
                "materials.rail_stick_length must be > 0, got {}",
                self.materials.rail_stick_length
            )));
        }
        for kind in MaterialKind::ALL {
            let rate = self.materials.rate(kind);
            if !(rate.fob_price >= 0.0 && rate.weight >= 0.0) {
                return Err(Error::Config(format!("negative rate for {}", kind.name())));
            }
        }

        let g = &self.generation;
        if !(g.peak_sun_hours > 0.0 && g.requirement_peak_sun_hours > 0.0 && g.backup_hours > 0.0) {
            return Err(Error::Config("generation hours must be > 0".into()));
        }
        if !(g.safety_margin >= 0.0 && g.generation_margin >= 0.0) {
            return Err(Error::Config("generation margins must be >= 0".into()));
        }

        let c = &self.costs;
        if !(0.0..1.0).contains(&c.margin) {
            return Err(Error::Config(format!("costs.margin must be in [0, 1), got {}", c.margin)));
        }
        let rates = [
            c.equipment_factor,
            c.structure_factor,
            c.civil_works_rate,
            c.installation_rate,
            c.miscellaneous_rate,
        ];
        if rates.iter().any(|r| !(*r >= 0.0)) {
            return Err(Error::Config("cost factors and rates must be >= 0".into()));
        }
        Ok(())
    }
}
