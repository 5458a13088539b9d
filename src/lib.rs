pub mod catalog;
pub mod config;
pub mod costs;
pub mod economics;
pub mod error;
pub mod generation;
pub mod materials;
pub mod packing;
pub mod parsing;
pub mod project;
pub mod strings;
pub mod types;

pub use catalog::{Catalog, RawRecord};

pub use config::{
    CostConfig, GenerationConfig, MaterialRate, MaterialsConfig, PackingConfig, SizingConfig,
    StringConfig,
};

pub use costs::{cost_line, cost_sheet, sale_price, CostInputs};

pub use economics::{
    economics, monthly_savings, payback, recommendation, total_investment, REFERENCE_PERIOD,
};

pub use error::{Error, Result};

pub use generation::{
    array_generation, coverage, generation_table, noct_watts, requirements, DEFAULT_BILLING_DAYS,
    PEAK_SUN_HOURS, REQUIREMENT_PEAK_SUN_HOURS,
};

pub use materials::{
    array_materials, bill_of_materials, material_line, rail_sticks, RAIL_STICK_LENGTH,
};

pub use packing::{
    column_spacing, oriented_dimensions, pack, pack_area, panels_across, row_length, row_spacing,
    total_panels, BORDER_MARGIN, CLAMP_GAP, MAX_PANELS_PER_ROW,
};

pub use parsing::{
    billing_days_between, parse_billing_days, parse_count, parse_date, parse_decimal,
    parse_orientation, round_special, round_to,
};

pub use project::{ProjectReport, ProjectState, Recomputed};

pub use strings::{
    adjusted_voc, assign_strings, inverters_by_power, inverters_by_strings, max_panels_per_string,
    size_strings, strings_per_mppt, VOC_DERATING,
};

pub use types::{
    ArrayArea, ArrayGeneration, ArrayMaterials, BillOfMaterials, ConsumptionProfile, CostCategory,
    CostLine, CostSheet, CoverageRow, CoverageSummary, EconomicsSummary, EquipmentPricing,
    GenerationTable, InverterSpec, MaterialKind, MaterialLine, Orientation, PackingResult,
    PackingStatus, PanelSpec, Payback, PeriodConsumption, PricedItem, Recommendation,
    RequirementKind, RequirementRow, StringAssignment, StringLayout, StringPlan, TariffPeriod,
    MAX_ARRAYS,
};
