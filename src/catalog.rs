use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::parsing::{parse_count, parse_decimal};
use crate::types::{InverterSpec, PanelSpec};

/// One untyped catalog sheet row, column header to cell text.
pub type RawRecord = HashMap<String, String>;

const BRAND: &str = "Marca";
const MODEL: &str = "Modelo";
const FOB_ORIGIN: &str = "FOB CH";

fn required(record: &RawRecord, kind: &'static str, field: &'static str) -> Result<String> {
    match record.get(field).map(|v| v.trim()) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::MissingField { record: kind, field }),
    }
}

fn number(record: &RawRecord, field: &str) -> f64 {
    record.get(field).map(|v| parse_decimal(v)).unwrap_or(0.0)
}

fn count(record: &RawRecord, field: &str) -> u32 {
    record.get(field).map(|v| parse_count(v)).unwrap_or(0)
}

fn display_name(brand: &str, model: &str) -> String {
    format!("{} {}", brand, model).trim().to_string()
}

fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl PanelSpec {
    pub fn from_record(record: &RawRecord) -> Result<Self> {
        let brand = required(record, "panel", BRAND)?;
        let model = required(record, "panel", MODEL)?;
        let rated_power_w = match record.get("Watts") {
            Some(v) if !v.trim().is_empty() => parse_decimal(v),
            _ => number(record, "Capacidad"),
        };
        Ok(PanelSpec {
            brand,
            model,
            height: number(record, "Alto"),
            width: number(record, "Ancho"),
            thickness: number(record, "Espesor"),
            area: number(record, "Metros²"),
            rated_power_w,
            voc: number(record, "VOC"),
            noct: number(record, "NOCT"),
            fob_price: number(record, FOB_ORIGIN),
        })
    }

    pub fn display_name(&self) -> String {
        display_name(&self.brand, &self.model)
    }

    pub fn has_valid_dimensions(&self) -> bool {
        self.height > 0.0 && self.width > 0.0
    }
}

impl InverterSpec {
    pub fn from_record(record: &RawRecord) -> Result<Self> {
        Ok(InverterSpec {
            brand: required(record, "inverter", BRAND)?,
            model: required(record, "inverter", MODEL)?,
            rated_kw: number(record, "Capacidad"),
            max_dc_voltage: number(record, "Max PV Input Voltage"),
            mppt_channels: count(record, "MPPT"),
            max_strings: count(record, "Strings"),
            fob_price: number(record, FOB_ORIGIN),
        })
    }

    pub fn display_name(&self) -> String {
        display_name(&self.brand, &self.model)
    }
}

/// Panel and inverter lists keyed by display name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub panels: Vec<PanelSpec>,
    pub inverters: Vec<InverterSpec>,
}

impl Catalog {
    pub fn from_records(panels: &[RawRecord], inverters: &[RawRecord]) -> Result<Self> {
        let panels = panels.iter().map(PanelSpec::from_record).collect::<Result<Vec<_>>>()?;
        let inverters = inverters
            .iter()
            .map(InverterSpec::from_record)
            .collect::<Result<Vec<_>>>()?;
        log::debug!("catalog loaded: {} panels, {} inverters", panels.len(), inverters.len());
        Ok(Self { panels, inverters })
    }

    pub fn panel(&self, name: &str) -> Result<&PanelSpec> {
        let wanted = normalize(name);
        self.panels
            .iter()
            .find(|p| normalize(&p.display_name()) == wanted)
            .ok_or_else(|| Error::UnknownEquipment(name.to_string()))
    }

    pub fn inverter(&self, name: &str) -> Result<&InverterSpec> {
        let wanted = normalize(name);
        self.inverters
            .iter()
            .find(|i| normalize(&i.display_name()) == wanted)
            .ok_or_else(|| Error::UnknownEquipment(name.to_string()))
    }
}
