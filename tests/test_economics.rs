use approx::assert_relative_eq;

use solar_sizing::config::CostConfig;
use solar_sizing::costs::*;
use solar_sizing::economics::*;
use solar_sizing::types::{
    ConsumptionProfile, CostCategory, EquipmentPricing, InverterSpec, PanelSpec, Payback,
    PeriodConsumption, PricedItem, TariffPeriod,
};

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

fn reference_inputs() -> CostInputs {
    CostInputs {
        panels: PricedItem { quantity: 126, fob_price: 100.0 },
        inverters: PricedItem { quantity: 2, fob_price: 3000.0 },
        structure_fob: 1040.4,
        pricing: EquipmentPricing::default(),
    }
}

fn reference_consumption() -> ConsumptionProfile {
    let mut c = ConsumptionProfile::default();
    for (period, kwh, amount) in [
        (TariffPeriod::A, 3000.0, 450.0),
        (TariffPeriod::B, 1500.0, 300.0),
        (TariffPeriod::C, 900.0, 90.0),
        (TariffPeriod::D, 600.0, 60.0),
    ] {
        *c.period_mut(period) = PeriodConsumption { kwh, amount };
    }
    c.demand = PeriodConsumption { kwh: 100.0, amount: 50.0 };
    c
}

// ── Cost sheet ──

#[test]
fn test_sale_price() {
    assert_approx!(sale_price(122.0, 0.20), 152.5, 1e-9);
    assert_eq!(sale_price(0.0, 0.20), 0.0);
}

#[test]
fn test_equipment_lines() {
    let sheet = cost_sheet(&reference_inputs(), &CostConfig::default());

    let panels = sheet.line(CostCategory::SolarPanels).unwrap();
    assert_approx!(panels.quantity, 126.0, 0.0);
    assert_approx!(panels.fob_local, 122.0, 1e-9);
    assert_approx!(panels.pvp, 152.5, 1e-9);
    assert_approx!(panels.total_local, 15372.0, 1e-6);
    assert_approx!(panels.total_pvp, 19215.0, 1e-6);
    assert_approx!(panels.margin, 3843.0, 1e-6);

    let inverters = sheet.line(CostCategory::Inverters).unwrap();
    assert_approx!(inverters.total_local, 7320.0, 1e-6);
    assert_approx!(inverters.total_pvp, 9150.0, 1e-6);

    let structure = sheet.line(CostCategory::Structure).unwrap();
    assert_approx!(structure.fob_origin, 1040.4, 1e-12);
    assert_approx!(structure.total_local, 1633.428, 1e-6);
    assert_approx!(structure.total_pvp, 2041.785, 1e-6);
}

#[test]
fn test_unpriced_equipment_costs_nothing() {
    let sheet = cost_sheet(&reference_inputs(), &CostConfig::default());
    for category in [
        CostCategory::Batteries,
        CostCategory::DcConverters,
        CostCategory::ChargeControllers,
        CostCategory::ElectricalMaterials,
    ] {
        let line = sheet.line(category).unwrap();
        assert_eq!(line.pvp, 0.0, "{}", category.label());
        assert_eq!(line.total_pvp, 0.0, "{}", category.label());
    }
}

#[test]
fn test_percentage_lines_use_base_subtotal() {
    let sheet = cost_sheet(&reference_inputs(), &CostConfig::default());
    assert_approx!(sheet.base_subtotal, 24325.428, 1e-6);
    assert_approx!(sheet.line(CostCategory::CivilWorks).unwrap().total_local, 729.76284, 1e-6);
    assert_approx!(sheet.line(CostCategory::Installation).unwrap().total_local, 1216.2714, 1e-6);
    assert_approx!(sheet.line(CostCategory::Miscellaneous).unwrap().total_local, 486.50856, 1e-6);
}

#[test]
fn test_sheet_totals() {
    let sheet = cost_sheet(&reference_inputs(), &CostConfig::default());
    assert_eq!(sheet.lines.len(), 10);
    assert_relative_eq!(sheet.total_local, 26757.9708, epsilon = 1e-6);
    assert_relative_eq!(sheet.total_pvp, 33447.4635, epsilon = 1e-6);
    assert_relative_eq!(sheet.total_margin, 6689.4927, epsilon = 1e-6);
    assert_relative_eq!(total_investment(&sheet.lines), sheet.total_pvp, epsilon = 1e-9);
}

#[test]
fn test_electrical_materials_outside_base() {
    let mut inputs = reference_inputs();
    inputs.pricing.electrical_materials_fob = 500.0;
    let with = cost_sheet(&inputs, &CostConfig::default());
    let without = cost_sheet(&reference_inputs(), &CostConfig::default());
    assert_eq!(with.base_subtotal, without.base_subtotal);
    assert_approx!(with.line(CostCategory::ElectricalMaterials).unwrap().total_local, 610.0, 1e-9);
}

#[test]
fn test_batteries_inside_base() {
    let mut inputs = reference_inputs();
    inputs.pricing.batteries = PricedItem { quantity: 4, fob_price: 1000.0 };
    let sheet = cost_sheet(&inputs, &CostConfig::default());
    assert_approx!(sheet.base_subtotal, 24325.428 + 4880.0, 1e-6);
}

// ── Payback ──

#[test]
fn test_payback_two_years() {
    let p = payback(12000.0, 500.0).unwrap();
    assert_eq!(p, Payback { months: 24 });
    assert_eq!(p.to_string(), "2 Años y 0 Meses");
}

#[test]
fn test_payback_months_floor() {
    let p = payback(12000.0, 700.0).unwrap();
    // 17.14 months
    assert_eq!(p.years(), 1);
    assert_eq!(p.remaining_months(), 5);
}

#[test]
fn test_payback_not_computable() {
    assert_eq!(payback(12000.0, 0.0), None);
    assert_eq!(payback(12000.0, -10.0), None);
    assert_eq!(payback(12000.0, f64::NAN), None);
}

// ── Summary ──

#[test]
fn test_monthly_savings_rounds_to_cents() {
    assert_eq!(monthly_savings(1353.0, 0.15), 202.95);
    assert_eq!(monthly_savings(100.0, 0.123456), 12.35);
}

#[test]
fn test_economics_summary() {
    let sheet = cost_sheet(&reference_inputs(), &CostConfig::default());
    let summary = economics(&sheet.lines, 1353.0, &reference_consumption());
    assert_approx!(summary.reference_cost_per_kwh, 0.15, 1e-12);
    assert_approx!(summary.monthly_consumption_cost, 950.0, 1e-9);
    assert_approx!(summary.monthly_savings, 202.95, 1e-9);
    assert_approx!(summary.net_monthly_bill, 747.05, 1e-9);
    assert_eq!(summary.payback, Some(Payback { months: 164 }));
    assert_eq!(summary.payback_label(), "13 Años y 8 Meses");
}

#[test]
fn test_economics_without_tariff() {
    let sheet = cost_sheet(&reference_inputs(), &CostConfig::default());
    let summary = economics(&sheet.lines, 1353.0, &ConsumptionProfile::default());
    assert_eq!(summary.monthly_savings, 0.0);
    assert_eq!(summary.payback, None);
    assert_eq!(summary.payback_label(), "No calculable");
}

#[test]
fn test_recommendation() {
    let panel = PanelSpec {
        brand: "Jinko".into(),
        model: "Tiger 550".into(),
        rated_power_w: 550.0,
        ..Default::default()
    };
    let inverter = InverterSpec {
        brand: "Huawei".into(),
        model: "SUN2000-50KTL".into(),
        rated_kw: 50.0,
        ..Default::default()
    };
    let r = recommendation(&panel, 126, &inverter, 2);
    assert_eq!(r.panel_name, "Jinko Tiger 550");
    assert_eq!(r.inverter_name, "Huawei SUN2000-50KTL");
    assert_eq!(r.capacity_kwp, 69.3);
    assert_eq!(r.capacity_kw, 100.0);
}
