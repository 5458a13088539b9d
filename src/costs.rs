use crate::config::CostConfig;
use crate::types::{CostCategory, CostLine, CostSheet, EquipmentPricing, PricedItem};

/// Quantities and FOB-origin prices the sheet is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostInputs {
    pub panels: PricedItem,
    pub inverters: PricedItem,
    /// Materials rollup total, FOB-origin
    pub structure_fob: f64,
    pub pricing: EquipmentPricing,
}

pub fn sale_price(fob_local: f64, margin: f64) -> f64 {
    if fob_local != 0.0 {
        fob_local / (1.0 - margin)
    } else {
        0.0
    }
}

pub fn cost_line(
    category: CostCategory,
    quantity: f64,
    fob_origin: f64,
    fob_local: f64,
    margin: f64,
) -> CostLine {
    let pvp = sale_price(fob_local, margin);
    let total_local = quantity * fob_local;
    let total_pvp = quantity * pvp;
    CostLine {
        category,
        quantity,
        fob_origin,
        fob_local,
        pvp,
        total_local,
        total_pvp,
        margin: total_pvp - total_local,
    }
}

fn included_in_base(category: CostCategory) -> bool {
    matches!(
        category,
        CostCategory::SolarPanels
            | CostCategory::Inverters
            | CostCategory::Batteries
            | CostCategory::ChargeControllers
            | CostCategory::Structure
    )
}

pub fn cost_sheet(inputs: &CostInputs, config: &CostConfig) -> CostSheet {
    let equipment = |category, item: PricedItem| {
        cost_line(
            category,
            item.quantity as f64,
            item.fob_price,
            item.fob_price * config.equipment_factor,
            config.margin,
        )
    };

    let mut lines = vec![
        equipment(CostCategory::SolarPanels, inputs.panels),
        equipment(CostCategory::Inverters, inputs.inverters),
        equipment(CostCategory::Batteries, inputs.pricing.batteries),
        equipment(CostCategory::DcConverters, inputs.pricing.dc_converters),
        equipment(CostCategory::ChargeControllers, inputs.pricing.charge_controllers),
        cost_line(
            CostCategory::Structure,
            1.0,
            inputs.structure_fob,
            inputs.structure_fob * config.structure_factor,
            config.margin,
        ),
        equipment(
            CostCategory::ElectricalMaterials,
            PricedItem {
                quantity: 1,
                fob_price: inputs.pricing.electrical_materials_fob,
            },
        ),
    ];

    let base_subtotal: f64 = lines
        .iter()
        .filter(|l| included_in_base(l.category))
        .map(|l| l.total_local)
        .sum();

    for (category, rate) in [
        (CostCategory::CivilWorks, config.civil_works_rate),
        (CostCategory::Installation, config.installation_rate),
        (CostCategory::Miscellaneous, config.miscellaneous_rate),
    ] {
        lines.push(cost_line(category, 1.0, 0.0, base_subtotal * rate, config.margin));
    }

    let total_local = lines.iter().map(|l| l.total_local).sum();
    let total_pvp = lines.iter().map(|l| l.total_pvp).sum();
    let total_margin = lines.iter().map(|l| l.margin).sum();
    CostSheet {
        lines,
        base_subtotal,
        total_local,
        total_pvp,
        total_margin,
    }
}
