use crate::config::GenerationConfig;
use crate::parsing::round_special;
use crate::types::{
    ArrayGeneration, ConsumptionProfile, CoverageRow, CoverageSummary, GenerationTable,
    PackingResult, RequirementKind, RequirementRow, TariffPeriod,
};

/// Sun hours for the availability table.
pub const PEAK_SUN_HOURS: f64 = 5.5;
/// Sun hours for the demand and backup tables.
pub const REQUIREMENT_PEAK_SUN_HOURS: f64 = 5.0;
pub const DEFAULT_BILLING_DAYS: u32 = 30;

/// Per-panel NOCT output in whole watts, rounded up.
pub fn noct_watts(noct: f64) -> u32 {
    if noct > 0.0 {
        noct.ceil() as u32
    } else {
        0
    }
}

pub fn array_generation(
    panels: u32,
    noct_w: u32,
    peak_sun_hours: f64,
    billing_days: u32,
) -> ArrayGeneration {
    let watts = panels as f64 * noct_w as f64;
    ArrayGeneration {
        panels,
        kwh_per_hour: watts / 1000.0,
        kwh_per_day: watts * peak_sun_hours / 1000.0,
        kwh_per_period: watts * peak_sun_hours * billing_days as f64 / 1000.0,
    }
}

pub fn generation_table(
    packings: &[PackingResult],
    noct: f64,
    billing_days: u32,
    config: &GenerationConfig,
) -> GenerationTable {
    let noct_w = noct_watts(noct);
    let arrays: Vec<ArrayGeneration> = packings
        .iter()
        .map(|p| array_generation(p.total_panels, noct_w, config.peak_sun_hours, billing_days))
        .collect();
    let total = arrays.iter().fold(ArrayGeneration::default(), |acc, a| ArrayGeneration {
        panels: acc.panels.saturating_add(a.panels),
        kwh_per_hour: acc.kwh_per_hour + a.kwh_per_hour,
        kwh_per_day: acc.kwh_per_day + a.kwh_per_day,
        kwh_per_period: acc.kwh_per_period + a.kwh_per_period,
    });
    log::debug!(
        "generation: {} panels at {} W over {} days -> {:.2} kWh",
        total.panels,
        noct_w,
        billing_days,
        total.kwh_per_period
    );
    GenerationTable {
        noct_w,
        billing_days,
        peak_sun_hours: config.peak_sun_hours,
        arrays,
        total,
    }
}

fn daily(kwh: f64, billing_days: u32) -> f64 {
    kwh / billing_days.max(1) as f64
}

pub fn requirements(
    consumption: &ConsumptionProfile,
    billing_days: u32,
    config: &GenerationConfig,
) -> Vec<RequirementRow> {
    let peak = daily(consumption.period(TariffPeriod::A).kwh, billing_days)
        + daily(consumption.period(TariffPeriod::B).kwh, billing_days);
    let full_day: f64 = TariffPeriod::ALL
        .iter()
        .map(|&p| daily(consumption.period(p).kwh, billing_days))
        .sum();
    let hours = config.requirement_peak_sun_hours;
    let margin = 1.0 + config.safety_margin;

    let row = |kind, consumption: f64, required: f64| RequirementRow {
        kind,
        consumption,
        required,
        ideal: round_special(required * margin),
    };
    vec![
        row(RequirementKind::PeakDemand, peak, peak / hours),
        row(RequirementKind::FullDayDemand, full_day, full_day / hours),
        row(RequirementKind::FullDayBackup, peak, peak),
        row(RequirementKind::FourHourBackup, full_day, full_day / config.backup_hours),
    ]
}

fn panels_for(kwh: u64, noct_w: u32) -> u64 {
    if noct_w == 0 {
        0
    } else {
        (kwh * 1000).div_ceil(noct_w as u64)
    }
}

/// How many panels the consumption calls for, against what the arrays hold.
/// Periods with no consumption are left out of the rows.
pub fn coverage(
    consumption: &ConsumptionProfile,
    billing_days: u32,
    total_panels: u32,
    noct: f64,
    config: &GenerationConfig,
) -> CoverageSummary {
    let noct_w = noct_watts(noct);
    let hours = config.requirement_peak_sun_hours;
    let rows: Vec<CoverageRow> = TariffPeriod::ALL
        .iter()
        .filter(|&&p| consumption.period(p).kwh != 0.0)
        .map(|&period| {
            let daily_consumption = daily(consumption.period(period).kwh, billing_days);
            let required = (daily_consumption * config.generation_margin).floor().max(0.0) as u64;
            CoverageRow {
                period,
                daily_consumption,
                required_generation: required,
                generation_over_peak: (required as f64 / hours).floor() as u64,
            }
        })
        .collect();

    let peak_kwh = rows
        .iter()
        .filter(|r| matches!(r.period, TariffPeriod::A | TariffPeriod::B))
        .map(|r| r.generation_over_peak)
        .sum();
    let net_metering_kwh = rows.iter().map(|r| r.generation_over_peak).sum();

    CoverageSummary {
        total_daily_consumption: rows.iter().map(|r| r.daily_consumption).sum(),
        available_kwh: total_panels as f64 * noct_w as f64 / 1000.0,
        available_panels: total_panels,
        peak_kwh,
        peak_panels: panels_for(peak_kwh, noct_w),
        net_metering_kwh,
        net_metering_panels: panels_for(net_metering_kwh, noct_w),
        rows,
    }
}
