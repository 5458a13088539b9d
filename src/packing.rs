use crate::config::PackingConfig;
use crate::types::{ArrayArea, Orientation, PackingResult, PackingStatus, PanelSpec};

pub const CLAMP_GAP: f64 = 0.021;
pub const BORDER_MARGIN: f64 = 1.0;
pub const MAX_PANELS_PER_ROW: u32 = 30;

/// Panel footprint as laid on the area: (along Y, along X).
pub fn oriented_dimensions(
    panel_height: f64,
    panel_width: f64,
    orientation: Orientation,
) -> (f64, f64) {
    match orientation {
        Orientation::Portrait => (panel_height, panel_width),
        Orientation::Landscape => (panel_width, panel_height),
    }
}

pub fn panels_across(usable: f64, panel_width: f64, gap: f64) -> u32 {
    ((usable + gap) / (panel_width + gap)).floor().max(0.0) as u32
}

pub fn row_length(panels_per_row: u32, panel_width: f64, gap: f64) -> f64 {
    if panels_per_row == 0 {
        return 0.0;
    }
    panels_per_row as f64 * panel_width + (panels_per_row - 1) as f64 * gap
}

/// Free width between columns; negative when the area is overpacked.
pub fn column_spacing(area_width: f64, row_length: f64, columns: u32, border: f64) -> f64 {
    area_width - row_length * columns as f64 - 2.0 * border
}

pub fn row_spacing(usable_height: f64, panel_height: f64, rows_per_column: u32) -> f64 {
    if rows_per_column > 1 {
        (usable_height - panel_height * rows_per_column as f64) / (rows_per_column - 1) as f64
    } else {
        0.0
    }
}

pub fn pack_area(area: &ArrayArea, panel: &PanelSpec, config: &PackingConfig) -> PackingResult {
    pack(
        area.width,
        area.height,
        panel.height,
        panel.width,
        area.orientation,
        config,
    )
}

pub fn pack(
    area_width: f64,
    area_height: f64,
    panel_height: f64,
    panel_width: f64,
    orientation: Orientation,
    config: &PackingConfig,
) -> PackingResult {
    let gap = config.clamp_gap;
    let border = config.border_margin;
    let row_cap = config.max_panels_per_row.max(1);

    if !(panel_height > 0.0 && panel_width > 0.0)
        || !area_width.is_finite()
        || !area_height.is_finite()
    {
        log::warn!(
            "panel {}x{} m cannot be packed: non-positive dimensions",
            panel_height,
            panel_width
        );
        return PackingResult::INVALID;
    }

    let (panel_h, panel_w) = oriented_dimensions(panel_height, panel_width, orientation);
    let usable_x = area_width - 2.0 * border;
    let usable_y = area_height - 2.0 * border;
    if usable_x <= 0.0 || usable_y <= 0.0 {
        log::warn!(
            "area {}x{} m leaves no usable space inside a {} m border",
            area_width,
            area_height,
            border
        );
        return PackingResult::INVALID;
    }

    let raw_across = panels_across(usable_x, panel_w, gap);
    if raw_across == 0 {
        log::warn!("no {} m wide panel fits across {} m", panel_w, usable_x);
        return PackingResult::INVALID;
    }

    let columns = raw_across.div_ceil(row_cap);
    let panels_per_row = panels_across(usable_x / columns as f64, panel_w, gap).clamp(1, row_cap);
    let rows_per_column = ((usable_y / panel_h).floor().max(0.0) as u32).max(1);

    let Some(total_panels) = rows_per_column
        .checked_mul(columns)
        .and_then(|rows| rows.checked_mul(panels_per_row))
    else {
        log::warn!(
            "area {}x{} m holds more panels than can be counted",
            area_width,
            area_height
        );
        return PackingResult::INVALID;
    };
    // panels_per_row >= 1, so this fits whenever total_panels does
    let total_rows = rows_per_column * columns;

    let length = row_length(panels_per_row, panel_w, gap);
    let result = PackingResult {
        status: PackingStatus::Valid,
        panels_per_row,
        rows_per_column,
        columns,
        total_rows,
        total_panels,
        row_length: length,
        column_spacing: column_spacing(area_width, length, columns, border),
        row_spacing: row_spacing(usable_y, panel_h, rows_per_column),
    };
    log::trace!("packed {}x{} m: {}", area_width, area_height, result.description());
    result
}

pub fn total_panels(results: &[PackingResult]) -> u32 {
    results
        .iter()
        .fold(0u32, |acc, r| acc.saturating_add(r.total_panels))
}
