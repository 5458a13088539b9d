use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

pub const MAX_ARRAYS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelSpec {
    pub brand: String,
    pub model: String,
    /// Meters
    pub height: f64,
    pub width: f64,
    pub thickness: f64,
    /// Square meters
    pub area: f64,
    pub rated_power_w: f64,
    pub voc: f64,
    pub noct: f64,
    pub fob_price: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InverterSpec {
    pub brand: String,
    pub model: String,
    pub rated_kw: f64,
    pub max_dc_voltage: f64,
    pub mppt_channels: u32,
    pub max_strings: u32,
    pub fob_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrayArea {
    /// X dimension in meters
    pub width: f64,
    /// Y dimension in meters
    pub height: f64,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackingStatus {
    Valid,
    InvalidConfiguration,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackingResult {
    pub status: PackingStatus,
    pub panels_per_row: u32,
    pub rows_per_column: u32,
    pub columns: u32,
    pub total_rows: u32,
    pub total_panels: u32,
    pub row_length: f64,
    pub column_spacing: f64,
    pub row_spacing: f64,
}

impl PackingResult {
    pub const INVALID: PackingResult = PackingResult {
        status: PackingStatus::InvalidConfiguration,
        panels_per_row: 0,
        rows_per_column: 0,
        columns: 0,
        total_rows: 0,
        total_panels: 0,
        row_length: 0.0,
        column_spacing: 0.0,
        row_spacing: 0.0,
    };

    pub fn is_valid(&self) -> bool {
        self.status == PackingStatus::Valid
    }

    pub fn description(&self) -> String {
        match self.status {
            PackingStatus::Valid => format!(
                "Configuration: {} columns x {} rows",
                self.columns, self.rows_per_column
            ),
            PackingStatus::InvalidConfiguration => "Invalid configuration".to_string(),
        }
    }
}

/// Electrical topology for one panel model on one inverter model.
/// `None` marks a field that cannot be derived from the ratings given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StringPlan {
    pub adjusted_voc: f64,
    pub max_panels_per_string: Option<u32>,
    pub max_panels_per_inverter: Option<u32>,
    pub strings_per_mppt: Option<u32>,
    pub total_string_capacity: Option<u32>,
    pub inverters_by_power: Option<u32>,
    pub inverters_by_strings: Option<u32>,
    pub required_inverters: Option<u32>,
    pub total_voc: u32,
    pub strings_required: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringAssignment {
    pub inverter: u32,
    pub mppt: u32,
    pub input: u32,
    pub first_panel: u32,
    pub last_panel: u32,
}

impl StringAssignment {
    pub fn panel_count(&self) -> u32 {
        self.last_panel - self.first_panel + 1
    }
}

impl fmt::Display for StringAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{} - P{}", self.first_panel, self.last_panel)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StringLayout {
    pub assignments: Vec<StringAssignment>,
    pub unassigned: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    MountingRail,
    EndClamp,
    MidClamp,
    RoofClamp,
    GroundLug,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 5] = [
        MaterialKind::MountingRail,
        MaterialKind::EndClamp,
        MaterialKind::MidClamp,
        MaterialKind::RoofClamp,
        MaterialKind::GroundLug,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MaterialKind::MountingRail => "Mounting Rail",
            MaterialKind::EndClamp => "End Clamps",
            MaterialKind::MidClamp => "Mid Clamps",
            MaterialKind::RoofClamp => "Roof Clamps",
            MaterialKind::GroundLug => "Ground Lug",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            MaterialKind::MountingRail => "stick",
            _ => "piece",
        }
    }
}

/// Structural hardware for one array. Rail is in whole meters here; it is
/// only converted to sticks after aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArrayMaterials {
    pub mounting_rail_m: u32,
    pub end_clamps: u32,
    pub mid_clamps: u32,
    pub roof_clamps: u32,
    pub ground_lugs: u32,
}

impl ArrayMaterials {
    pub fn quantity(&self, kind: MaterialKind) -> u32 {
        match kind {
            MaterialKind::MountingRail => self.mounting_rail_m,
            MaterialKind::EndClamp => self.end_clamps,
            MaterialKind::MidClamp => self.mid_clamps,
            MaterialKind::RoofClamp => self.roof_clamps,
            MaterialKind::GroundLug => self.ground_lugs,
        }
    }
}

impl Add for ArrayMaterials {
    type Output = ArrayMaterials;

    fn add(self, rhs: ArrayMaterials) -> ArrayMaterials {
        ArrayMaterials {
            mounting_rail_m: self.mounting_rail_m.saturating_add(rhs.mounting_rail_m),
            end_clamps: self.end_clamps.saturating_add(rhs.end_clamps),
            mid_clamps: self.mid_clamps.saturating_add(rhs.mid_clamps),
            roof_clamps: self.roof_clamps.saturating_add(rhs.roof_clamps),
            ground_lugs: self.ground_lugs.saturating_add(rhs.ground_lugs),
        }
    }
}

impl std::iter::Sum for ArrayMaterials {
    fn sum<I: Iterator<Item = ArrayMaterials>>(iter: I) -> Self {
        iter.fold(ArrayMaterials::default(), Add::add)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub kind: MaterialKind,
    pub name: String,
    pub quantity: u32,
    pub unit: String,
    pub unit_weight: f64,
    pub unit_price: f64,
    pub extended_weight: f64,
    pub extended_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillOfMaterials {
    pub per_array: Vec<ArrayMaterials>,
    pub totals: ArrayMaterials,
    pub rail_sticks: u32,
    pub lines: Vec<MaterialLine>,
    pub total_weight: f64,
    pub total_cost: f64,
}

impl BillOfMaterials {
    pub fn line(&self, kind: MaterialKind) -> Option<&MaterialLine> {
        self.lines.iter().find(|l| l.kind == kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrayGeneration {
    pub panels: u32,
    pub kwh_per_hour: f64,
    pub kwh_per_day: f64,
    pub kwh_per_period: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationTable {
    pub noct_w: u32,
    pub billing_days: u32,
    pub peak_sun_hours: f64,
    pub arrays: Vec<ArrayGeneration>,
    pub total: ArrayGeneration,
}

impl GenerationTable {
    /// Aggregate energy over one billing period, in kWh.
    pub fn monthly_generation_kwh(&self) -> f64 {
        self.total.kwh_per_period
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TariffPeriod {
    A,
    B,
    C,
    D,
}

impl TariffPeriod {
    pub const ALL: [TariffPeriod; 4] =
        [TariffPeriod::A, TariffPeriod::B, TariffPeriod::C, TariffPeriod::D];

    pub fn schedule(self) -> &'static str {
        match self {
            TariffPeriod::A => "08h00-18h00",
            TariffPeriod::B => "18h00-22h00",
            TariffPeriod::C => "22h00-08h00",
            TariffPeriod::D => "S,D,F 18h00-22h00",
        }
    }

    fn index(self) -> usize {
        match self {
            TariffPeriod::A => 0,
            TariffPeriod::B => 1,
            TariffPeriod::C => 2,
            TariffPeriod::D => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodConsumption {
    pub kwh: f64,
    /// Billed amount in dollars
    pub amount: f64,
}

impl PeriodConsumption {
    pub fn cost_per_kwh(&self) -> f64 {
        if self.kwh > 0.0 {
            self.amount / self.kwh
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsumptionProfile {
    pub periods: [PeriodConsumption; 4],
    pub demand: PeriodConsumption,
}

impl ConsumptionProfile {
    pub fn period(&self, period: TariffPeriod) -> &PeriodConsumption {
        &self.periods[period.index()]
    }

    pub fn period_mut(&mut self, period: TariffPeriod) -> &mut PeriodConsumption {
        &mut self.periods[period.index()]
    }

    /// Energy of periods A-D; billable demand is not energy.
    pub fn total_kwh(&self) -> f64 {
        self.periods.iter().map(|p| p.kwh).sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.periods.iter().map(|p| p.amount).sum::<f64>() + self.demand.amount
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequirementKind {
    PeakDemand,
    FullDayDemand,
    FullDayBackup,
    FourHourBackup,
}

impl RequirementKind {
    pub fn label(self) -> &'static str {
        match self {
            RequirementKind::PeakDemand => "Demand (08h00-22h00)",
            RequirementKind::FullDayDemand => "Demand (24 hours)",
            RequirementKind::FullDayBackup => "Backup (24 hours)",
            RequirementKind::FourHourBackup => "Backup (4 hours)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequirementRow {
    pub kind: RequirementKind,
    pub consumption: f64,
    pub required: f64,
    pub ideal: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageRow {
    pub period: TariffPeriod,
    pub daily_consumption: f64,
    pub required_generation: u64,
    pub generation_over_peak: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub rows: Vec<CoverageRow>,
    pub total_daily_consumption: f64,
    pub available_kwh: f64,
    pub available_panels: u32,
    pub peak_kwh: u64,
    pub peak_panels: u64,
    pub net_metering_kwh: u64,
    pub net_metering_panels: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostCategory {
    SolarPanels,
    Inverters,
    Batteries,
    DcConverters,
    ChargeControllers,
    Structure,
    ElectricalMaterials,
    CivilWorks,
    Installation,
    Miscellaneous,
}

impl CostCategory {
    pub fn label(self) -> &'static str {
        match self {
            CostCategory::SolarPanels => "Solar panels",
            CostCategory::Inverters => "Inverters",
            CostCategory::Batteries => "Storage batteries",
            CostCategory::DcConverters => "High-voltage DC converters",
            CostCategory::ChargeControllers => "MPPT charge controllers",
            CostCategory::Structure => "Solar structure",
            CostCategory::ElectricalMaterials => "Electrical materials",
            CostCategory::CivilWorks => "Civil works",
            CostCategory::Installation => "Installation",
            CostCategory::Miscellaneous => "Miscellaneous",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub category: CostCategory,
    pub quantity: f64,
    pub fob_origin: f64,
    pub fob_local: f64,
    pub pvp: f64,
    pub total_local: f64,
    pub total_pvp: f64,
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSheet {
    pub lines: Vec<CostLine>,
    pub base_subtotal: f64,
    pub total_local: f64,
    pub total_pvp: f64,
    pub total_margin: f64,
}

impl CostSheet {
    pub fn line(&self, category: CostCategory) -> Option<&CostLine> {
        self.lines.iter().find(|l| l.category == category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PricedItem {
    pub quantity: u32,
    pub fob_price: f64,
}

/// Cost inputs that do not come from the panel/inverter catalog.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EquipmentPricing {
    pub batteries: PricedItem,
    pub dc_converters: PricedItem,
    pub charge_controllers: PricedItem,
    pub electrical_materials_fob: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payback {
    pub months: u32,
}

impl Payback {
    pub fn years(&self) -> u32 {
        self.months / 12
    }

    pub fn remaining_months(&self) -> u32 {
        self.months % 12
    }
}

impl fmt::Display for Payback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Años y {} Meses", self.years(), self.remaining_months())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicsSummary {
    pub total_investment: f64,
    pub monthly_generation_kwh: f64,
    pub reference_cost_per_kwh: f64,
    pub monthly_consumption_cost: f64,
    pub monthly_savings: f64,
    pub net_monthly_bill: f64,
    pub payback: Option<Payback>,
}

impl EconomicsSummary {
    pub fn payback_label(&self) -> String {
        match self.payback {
            Some(p) => p.to_string(),
            None => "No calculable".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub panel_name: String,
    pub panels: u32,
    pub capacity_kwp: f64,
    pub inverter_name: String,
    pub inverters: u32,
    pub capacity_kw: f64,
}
