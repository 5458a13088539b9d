use crate::parsing::round_to;
use crate::types::{
    ConsumptionProfile, CostLine, EconomicsSummary, InverterSpec, PanelSpec, Payback,
    Recommendation, TariffPeriod,
};

/// Tariff period whose per-kWh price values the solar production.
pub const REFERENCE_PERIOD: TariffPeriod = TariffPeriod::A;

pub fn total_investment(lines: &[CostLine]) -> f64 {
    lines.iter().map(|l| l.total_pvp).sum()
}

pub fn monthly_savings(generation_kwh: f64, cost_per_kwh: f64) -> f64 {
    round_to(generation_kwh * cost_per_kwh, 2)
}

pub fn payback(investment: f64, monthly_savings: f64) -> Option<Payback> {
    if !(monthly_savings > 0.0) || !investment.is_finite() {
        return None;
    }
    let months = (investment / monthly_savings).floor().max(0.0);
    Some(Payback {
        months: months.min(u32::MAX as f64) as u32,
    })
}

pub fn economics(
    lines: &[CostLine],
    monthly_generation_kwh: f64,
    consumption: &ConsumptionProfile,
) -> EconomicsSummary {
    let investment = total_investment(lines);
    let reference_cost = consumption.period(REFERENCE_PERIOD).cost_per_kwh();
    let consumption_cost = consumption.total_cost();
    let savings = monthly_savings(round_to(monthly_generation_kwh, 2), reference_cost);
    let summary = EconomicsSummary {
        total_investment: investment,
        monthly_generation_kwh,
        reference_cost_per_kwh: reference_cost,
        monthly_consumption_cost: consumption_cost,
        monthly_savings: savings,
        net_monthly_bill: round_to(consumption_cost - savings, 2),
        payback: payback(investment, savings),
    };
    log::debug!(
        "economics: investment ${:.2}, savings ${:.2}/month, payback {}",
        summary.total_investment,
        summary.monthly_savings,
        summary.payback_label()
    );
    summary
}

pub fn recommendation(
    panel: &PanelSpec,
    panels: u32,
    inverter: &InverterSpec,
    inverters: u32,
) -> Recommendation {
    Recommendation {
        panel_name: panel.display_name(),
        panels,
        capacity_kwp: round_to(panels as f64 * panel.rated_power_w / 1000.0, 2),
        inverter_name: inverter.display_name(),
        inverters,
        capacity_kw: round_to(inverters as f64 * inverter.rated_kw, 2),
    }
}
