use crate::config::MaterialsConfig;
use crate::types::{ArrayMaterials, BillOfMaterials, MaterialKind, MaterialLine, PackingResult};

/// Meters of rail per purchasable stick.
pub const RAIL_STICK_LENGTH: f64 = 4.65;

pub fn array_materials(packing: &PackingResult) -> ArrayMaterials {
    if !packing.is_valid() {
        return ArrayMaterials::default();
    }
    let rail = packing.row_length * 2.0 * packing.rows_per_column as f64 * packing.columns as f64;
    let per_row = packing.panels_per_row.saturating_mul(packing.total_rows);
    ArrayMaterials {
        mounting_rail_m: rail.ceil().max(0.0) as u32,
        end_clamps: packing.total_rows.saturating_mul(4),
        mid_clamps: packing
            .panels_per_row
            .saturating_sub(1)
            .saturating_mul(2)
            .saturating_mul(packing.total_rows),
        roof_clamps: per_row,
        ground_lugs: per_row,
    }
}

pub fn rail_sticks(rail_meters: u32, stick_length: f64) -> u32 {
    if stick_length > 0.0 {
        (rail_meters as f64 / stick_length).ceil() as u32
    } else {
        0
    }
}

pub fn material_line(kind: MaterialKind, quantity: u32, config: &MaterialsConfig) -> MaterialLine {
    let rate = config.rate(kind);
    MaterialLine {
        kind,
        name: kind.name().to_string(),
        quantity,
        unit: kind.unit().to_string(),
        unit_weight: rate.weight,
        unit_price: rate.fob_price,
        extended_weight: rate.weight * quantity as f64,
        extended_price: rate.fob_price * quantity as f64,
    }
}

pub fn bill_of_materials(packings: &[PackingResult], config: &MaterialsConfig) -> BillOfMaterials {
    let per_array: Vec<ArrayMaterials> = packings.iter().map(array_materials).collect();
    let totals: ArrayMaterials = per_array.iter().copied().sum();
    let sticks = rail_sticks(totals.mounting_rail_m, config.rail_stick_length);

    let lines: Vec<MaterialLine> = MaterialKind::ALL
        .iter()
        .map(|&kind| {
            let quantity = match kind {
                MaterialKind::MountingRail => sticks,
                other => totals.quantity(other),
            };
            material_line(kind, quantity, config)
        })
        .collect();

    let total_weight = lines.iter().map(|l| l.extended_weight).sum();
    let total_cost = lines.iter().map(|l| l.extended_price).sum();
    log::debug!(
        "bill of materials: {} m rail in {} sticks, {:.2} kg, ${:.2}",
        totals.mounting_rail_m,
        sticks,
        total_weight,
        total_cost
    );

    BillOfMaterials {
        per_array,
        totals,
        rail_sticks: sticks,
        lines,
        total_weight,
        total_cost,
    }
}
