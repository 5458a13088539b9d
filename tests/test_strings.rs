use proptest::prelude::*;

use solar_sizing::config::StringConfig;
use solar_sizing::strings::*;
use solar_sizing::types::{InverterSpec, PanelSpec, StringPlan};

macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "assert_approx failed: left={}, right={}, diff={}, tol={}",
            l, r, (l - r).abs(), $tol
        );
    };
}

fn panel() -> PanelSpec {
    PanelSpec {
        brand: "Jinko".into(),
        model: "Tiger 550".into(),
        height: 1.134,
        width: 0.556,
        voc: 49.6,
        noct: 410.0,
        rated_power_w: 550.0,
        fob_price: 100.0,
        ..Default::default()
    }
}

fn inverter() -> InverterSpec {
    InverterSpec {
        brand: "Huawei".into(),
        model: "SUN2000-50KTL".into(),
        rated_kw: 50.0,
        max_dc_voltage: 1100.0,
        mppt_channels: 4,
        max_strings: 8,
        fob_price: 3000.0,
    }
}

fn plan_for(panel: &PanelSpec, inverter: &InverterSpec, total: u32) -> StringPlan {
    size_strings(panel, inverter, total, &StringConfig::default())
}

// ── Sizing ──

#[test]
fn test_reference_plan() {
    let plan = plan_for(&panel(), &inverter(), 126);
    assert_approx!(plan.adjusted_voc, 50.9888, 1e-9);
    assert_eq!(plan.max_panels_per_string, Some(21));
    assert_eq!(plan.max_panels_per_inverter, Some(168));
    assert_eq!(plan.strings_per_mppt, Some(2));
    assert_eq!(plan.total_string_capacity, Some(8));
    assert_eq!(plan.inverters_by_power, Some(2));
    assert_eq!(plan.inverters_by_strings, Some(1));
    assert_eq!(plan.required_inverters, Some(2));
    assert_eq!(plan.total_voc, 6424);
    assert_eq!(plan.strings_required, Some(6));
}

#[test]
fn test_string_bound_can_dominate() {
    // low-voltage input: 4 panels per string, 2 strings -> 8 panels per inverter
    let inv = InverterSpec {
        max_dc_voltage: 220.0,
        max_strings: 2,
        ..inverter()
    };
    let plan = plan_for(&panel(), &inv, 30);
    assert_eq!(plan.max_panels_per_string, Some(4));
    assert_eq!(plan.inverters_by_power, Some(1));
    assert_eq!(plan.inverters_by_strings, Some(4));
    assert_eq!(plan.required_inverters, Some(4));
}

#[test]
fn test_no_panels_needs_no_inverters() {
    let plan = plan_for(&panel(), &inverter(), 0);
    assert_eq!(plan.required_inverters, Some(0));
    assert_eq!(plan.total_voc, 0);
    assert_eq!(plan.strings_required, Some(0));
}

#[test]
fn test_custom_derating() {
    let config = StringConfig { voc_derating: 1.0 };
    let plan = size_strings(&panel(), &inverter(), 10, &config);
    assert_approx!(plan.adjusted_voc, 49.6, 1e-12);
    assert_eq!(plan.max_panels_per_string, Some(22));
}

// ── Not computable ──

#[test]
fn test_zero_voc_is_not_computable() {
    let p = PanelSpec { voc: 0.0, ..panel() };
    let plan = plan_for(&p, &inverter(), 126);
    assert_eq!(plan.max_panels_per_string, None);
    assert_eq!(plan.max_panels_per_inverter, None);
    assert_eq!(plan.inverters_by_strings, None);
    assert_eq!(plan.required_inverters, None);
    assert_eq!(plan.strings_required, None);
}

#[test]
fn test_zero_mppt_channels_is_not_computable() {
    let inv = InverterSpec {
        mppt_channels: 0,
        ..inverter()
    };
    let plan = plan_for(&panel(), &inv, 126);
    assert_eq!(plan.strings_per_mppt, None);
    assert_eq!(plan.total_string_capacity, None);
    assert_eq!(plan.required_inverters, Some(2));
}

#[test]
fn test_zero_rating_is_not_computable() {
    let inv = InverterSpec {
        rated_kw: 0.0,
        ..inverter()
    };
    let plan = plan_for(&panel(), &inv, 126);
    assert_eq!(plan.inverters_by_power, None);
    assert_eq!(plan.required_inverters, None);
}

#[test]
fn test_zero_strings_is_not_computable() {
    let inv = InverterSpec {
        max_strings: 0,
        ..inverter()
    };
    let plan = plan_for(&panel(), &inv, 126);
    assert_eq!(plan.inverters_by_strings, None);
    assert_eq!(plan.required_inverters, None);
}

#[test]
fn test_voltage_below_one_panel_is_not_computable() {
    let inv = InverterSpec {
        max_dc_voltage: 40.0,
        ..inverter()
    };
    let plan = plan_for(&panel(), &inv, 126);
    assert_eq!(plan.max_panels_per_string, Some(0));
    assert_eq!(plan.inverters_by_strings, None);
    assert_eq!(plan.required_inverters, None);
}

// ── Helpers ──

#[test]
fn test_inverters_by_power_rounds_up() {
    // 132 * 410 W = 54.12 kW
    assert_eq!(inverters_by_power(132, 410.0, 50.0), Some(2));
    assert_eq!(inverters_by_power(100, 500.0, 50.0), Some(1));
}

#[test]
fn test_strings_per_mppt_integer_division() {
    assert_eq!(strings_per_mppt(9, 4), Some(2));
    assert_eq!(strings_per_mppt(9, 0), None);
}

// ── Assignment ──

#[test]
fn test_assignment_fills_inputs_in_order() {
    let plan = plan_for(&panel(), &inverter(), 126);
    let layout = assign_strings(&plan, 4, 126);
    assert_eq!(layout.assignments.len(), 6);
    assert_eq!(layout.unassigned, 0);

    let first = layout.assignments[0];
    assert_eq!((first.inverter, first.mppt, first.input), (1, 1, 1));
    assert_eq!(first.to_string(), "P1 - P21");

    let second = layout.assignments[1];
    assert_eq!((second.inverter, second.mppt, second.input), (1, 1, 2));
    assert_eq!(second.to_string(), "P22 - P42");

    let last = layout.assignments[5];
    assert_eq!((last.inverter, last.mppt, last.input), (1, 3, 2));
    assert_eq!(last.to_string(), "P106 - P126");
}

#[test]
fn test_assignment_short_last_string() {
    let plan = plan_for(&panel(), &inverter(), 50);
    let layout = assign_strings(&plan, 4, 50);
    let ranges: Vec<String> = layout.assignments.iter().map(|a| a.to_string()).collect();
    assert_eq!(ranges, vec!["P1 - P21", "P22 - P42", "P43 - P50"]);
    assert_eq!(layout.assignments[2].panel_count(), 8);
    assert_eq!(layout.unassigned, 0);
}

#[test]
fn test_assignment_reports_overflow() {
    let plan = StringPlan {
        adjusted_voc: 50.0,
        max_panels_per_string: Some(10),
        max_panels_per_inverter: Some(10),
        strings_per_mppt: Some(1),
        total_string_capacity: Some(1),
        inverters_by_power: Some(1),
        inverters_by_strings: Some(1),
        required_inverters: Some(1),
        total_voc: 1250,
        strings_required: Some(2),
    };
    let layout = assign_strings(&plan, 1, 25);
    assert_eq!(layout.assignments.len(), 1);
    assert_eq!(layout.assignments[0].to_string(), "P1 - P10");
    assert_eq!(layout.unassigned, 15);
}

#[test]
fn test_assignment_not_computable_is_empty() {
    let p = PanelSpec { voc: 0.0, ..panel() };
    let plan = plan_for(&p, &inverter(), 40);
    let layout = assign_strings(&plan, 4, 40);
    assert!(layout.assignments.is_empty());
    assert_eq!(layout.unassigned, 40);
}

// ── Properties ──

proptest! {
    #[test]
    fn prop_required_covers_both_bounds(
        total in 0u32..2000,
        voc in 10.0..80.0f64,
        noct in 100.0..700.0f64,
        rated_kw in 1.0..200.0f64,
        max_dc in 100.0..1500.0f64,
        max_strings in 1u32..24,
    ) {
        let p = PanelSpec { voc, noct, ..panel() };
        let inv = InverterSpec { rated_kw, max_dc_voltage: max_dc, max_strings, ..inverter() };
        let plan = plan_for(&p, &inv, total);
        if let Some(required) = plan.required_inverters {
            prop_assert!(required >= plan.inverters_by_power.unwrap_or(0));
            prop_assert!(required >= plan.inverters_by_strings.unwrap_or(0));
        }
        let expected = (max_dc / (voc * VOC_DERATING)).floor() as u32;
        prop_assert_eq!(plan.max_panels_per_string, Some(expected));
    }

    #[test]
    fn prop_assignment_covers_every_panel(total in 0u32..600) {
        let plan = plan_for(&panel(), &inverter(), total);
        let layout = assign_strings(&plan, 4, total);
        let assigned: u32 = layout.assignments.iter().map(|a| a.panel_count()).sum();
        prop_assert_eq!(assigned + layout.unassigned, total);
        prop_assert_eq!(layout.unassigned, 0);
        for pair in layout.assignments.windows(2) {
            prop_assert_eq!(pair[1].first_panel, pair[0].last_panel + 1);
        }
    }
}
