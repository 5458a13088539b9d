use crate::config::StringConfig;
use crate::types::{InverterSpec, PanelSpec, StringAssignment, StringLayout, StringPlan};

/// Cold-weather margin applied to a panel's open-circuit voltage.
pub const VOC_DERATING: f64 = 1.028;

pub fn adjusted_voc(voc: f64, derating: f64) -> f64 {
    voc * derating
}

pub fn max_panels_per_string(max_dc_voltage: f64, adjusted_voc: f64) -> Option<u32> {
    if adjusted_voc > 0.0 && max_dc_voltage > 0.0 {
        Some((max_dc_voltage / adjusted_voc).floor() as u32)
    } else {
        None
    }
}

/// Inverters needed to carry the array's NOCT power.
pub fn inverters_by_power(total_panels: u32, noct_w: f64, rated_kw: f64) -> Option<u32> {
    if !(rated_kw > 0.0) {
        return None;
    }
    let array_kw = total_panels as f64 * noct_w / 1000.0;
    Some((array_kw / rated_kw).ceil().max(0.0) as u32)
}

/// Inverters needed so that every panel sits on some string input.
pub fn inverters_by_strings(
    total_panels: u32,
    max_panels_per_string: u32,
    max_strings: u32,
) -> Option<u32> {
    let per_inverter = max_panels_per_string.checked_mul(max_strings)?;
    if per_inverter == 0 {
        return None;
    }
    Some(total_panels.div_ceil(per_inverter))
}

pub fn strings_per_mppt(max_strings: u32, mppt_channels: u32) -> Option<u32> {
    max_strings.checked_div(mppt_channels)
}

pub fn size_strings(
    panel: &PanelSpec,
    inverter: &InverterSpec,
    total_panels: u32,
    config: &StringConfig,
) -> StringPlan {
    let adjusted = adjusted_voc(panel.voc, config.voc_derating);
    let per_string = max_panels_per_string(inverter.max_dc_voltage, adjusted);
    let by_power = inverters_by_power(total_panels, panel.noct, inverter.rated_kw);
    let by_strings =
        per_string.and_then(|n| inverters_by_strings(total_panels, n, inverter.max_strings));
    let required = match (by_power, by_strings) {
        (Some(p), Some(s)) => Some(p.max(s)),
        _ => None,
    };
    let per_mppt = strings_per_mppt(inverter.max_strings, inverter.mppt_channels);

    let total_voc = if adjusted > 0.0 {
        (total_panels as f64 * adjusted).floor() as u32
    } else {
        0
    };
    let strings_required = if inverter.max_dc_voltage > 0.0 && adjusted > 0.0 {
        Some((total_voc as f64 / inverter.max_dc_voltage).ceil() as u32)
    } else {
        None
    };

    let plan = StringPlan {
        adjusted_voc: adjusted,
        max_panels_per_string: per_string,
        max_panels_per_inverter: per_string.and_then(|n| n.checked_mul(inverter.max_strings)),
        strings_per_mppt: per_mppt,
        total_string_capacity: per_mppt.map(|n| n * inverter.mppt_channels),
        inverters_by_power: by_power,
        inverters_by_strings: by_strings,
        required_inverters: required,
        total_voc,
        strings_required,
    };
    if plan.required_inverters.is_none() {
        log::warn!(
            "inverter count not computable for {} on {} (voc {}, max dc {} V, {} kW, {} strings)",
            panel.display_name(),
            inverter.display_name(),
            panel.voc,
            inverter.max_dc_voltage,
            inverter.rated_kw,
            inverter.max_strings
        );
    }
    plan
}

/// Assigns panels P1..Pn to string inputs in order: inverter by inverter,
/// MPPT by MPPT, input by input.
pub fn assign_strings(plan: &StringPlan, mppt_channels: u32, total_panels: u32) -> StringLayout {
    let (Some(per_string), Some(inverters), Some(per_mppt)) =
        (plan.max_panels_per_string, plan.required_inverters, plan.strings_per_mppt)
    else {
        return StringLayout {
            assignments: Vec::new(),
            unassigned: total_panels,
        };
    };
    if per_string == 0 {
        return StringLayout {
            assignments: Vec::new(),
            unassigned: total_panels,
        };
    }

    let mut assignments = Vec::new();
    let mut next_panel = 1u32;
    'fleet: for inverter in 1..=inverters {
        for mppt in 1..=mppt_channels {
            for input in 1..=per_mppt {
                if next_panel > total_panels {
                    break 'fleet;
                }
                let last_panel = next_panel.saturating_add(per_string - 1).min(total_panels);
                assignments.push(StringAssignment {
                    inverter,
                    mppt,
                    input,
                    first_panel: next_panel,
                    last_panel,
                });
                next_panel = last_panel + 1;
            }
        }
    }

    StringLayout {
        assignments,
        unassigned: total_panels - (next_panel - 1),
    }
}
