use serde::{Deserialize, Serialize};

use crate::config::SizingConfig;
use crate::costs::{cost_sheet, CostInputs};
use crate::economics::{economics, recommendation};
use crate::error::{Error, Result};
use crate::generation::{coverage, generation_table, requirements};
use crate::materials::bill_of_materials;
use crate::packing::{pack_area, total_panels};
use crate::parsing::{billing_days_between, parse_billing_days, parse_decimal, parse_orientation};
use crate::strings::{assign_strings, size_strings};
use crate::types::{
    ArrayArea, BillOfMaterials, ConsumptionProfile, CostSheet, CoverageSummary, EconomicsSummary,
    EquipmentPricing, GenerationTable, InverterSpec, PackingResult, PanelSpec, PeriodConsumption,
    PricedItem, Recommendation, RequirementRow, StringLayout, StringPlan, TariffPeriod, MAX_ARRAYS,
};

#[derive(Debug, Clone, PartialEq)]
enum Unavailable {
    NotConfigured(&'static str),
    NotComputable(&'static str),
}

impl From<Unavailable> for Error {
    fn from(u: Unavailable) -> Self {
        match u {
            Unavailable::NotConfigured(what) => Error::NotConfigured(what.to_string()),
            Unavailable::NotComputable(what) => Error::NotComputable(what.to_string()),
        }
    }
}

type Slot<T> = std::result::Result<T, Unavailable>;

#[derive(Debug, Clone)]
struct Node<T> {
    value: Option<Slot<T>>,
    stale: bool,
}

impl<T: PartialEq> Node<T> {
    fn new() -> Self {
        Self {
            value: None,
            stale: true,
        }
    }

    fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Stores a recomputed value. Returns whether it differs from the last one.
    fn store(&mut self, value: Slot<T>) -> bool {
        self.stale = false;
        let changed = self.value.as_ref() != Some(&value);
        self.value = Some(value);
        changed
    }

    fn slot(&self) -> Slot<&T> {
        match &self.value {
            Some(Ok(v)) => Ok(v),
            Some(Err(u)) => Err(u.clone()),
            None => Err(Unavailable::NotComputable("value has not been computed")),
        }
    }

    fn get(&self) -> Result<&T> {
        self.slot().map_err(Error::from)
    }
}

#[derive(Debug, Clone)]
struct Derived {
    packing: Vec<Node<PackingResult>>,
    string_plan: Node<StringPlan>,
    materials: Node<BillOfMaterials>,
    generation: Node<GenerationTable>,
    requirements: Node<Vec<RequirementRow>>,
    coverage: Node<CoverageSummary>,
    costs: Node<CostSheet>,
    recommendation: Node<Recommendation>,
    economics: Node<EconomicsSummary>,
}

impl Default for Derived {
    fn default() -> Self {
        Self {
            packing: Vec::new(),
            string_plan: Node::new(),
            materials: Node::new(),
            generation: Node::new(),
            requirements: Node::new(),
            coverage: Node::new(),
            costs: Node::new(),
            recommendation: Node::new(),
            economics: Node::new(),
        }
    }
}

/// Which derived values one `refresh` recomputed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recomputed {
    pub packing: Vec<usize>,
    pub string_plan: bool,
    pub materials: bool,
    pub generation: bool,
    pub requirements: bool,
    pub coverage: bool,
    pub costs: bool,
    pub recommendation: bool,
    pub economics: bool,
}

impl Recomputed {
    pub fn is_empty(&self) -> bool {
        *self == Recomputed::default()
    }
}

/// Everything derived for a project, for display or persistence.
/// `None` marks a value that is not configured or not computable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectReport {
    pub packing: Vec<Option<PackingResult>>,
    pub total_panels: Option<u32>,
    pub string_plan: Option<StringPlan>,
    pub string_layout: Option<StringLayout>,
    pub materials: Option<BillOfMaterials>,
    pub generation: Option<GenerationTable>,
    pub requirements: Vec<RequirementRow>,
    pub coverage: Option<CoverageSummary>,
    pub costs: Option<CostSheet>,
    pub recommendation: Option<Recommendation>,
    pub economics: Option<EconomicsSummary>,
}

/// User-editable inputs of one sizing project, with every derived value cached
/// in a node that goes stale only when one of its inputs changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectState {
    #[serde(default)]
    config: SizingConfig,
    panel: Option<PanelSpec>,
    inverter: Option<InverterSpec>,
    areas: Vec<ArrayArea>,
    billing_days: u32,
    #[serde(default)]
    consumption: ConsumptionProfile,
    #[serde(default)]
    pricing: EquipmentPricing,
    #[serde(skip)]
    derived: Derived,
}

impl Default for ProjectState {
    fn default() -> Self {
        Self::new(SizingConfig::default())
    }
}

impl ProjectState {
    pub fn new(config: SizingConfig) -> Self {
        Self {
            billing_days: config.generation.default_billing_days,
            config,
            panel: None,
            inverter: None,
            areas: Vec::new(),
            consumption: ConsumptionProfile::default(),
            pricing: EquipmentPricing::default(),
            derived: Derived::default(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restores the inputs of a saved project. Derived values are recomputed
    /// on first access.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut state: ProjectState = serde_json::from_str(json)?;
        state.config.validate()?;
        if state.areas.len() > MAX_ARRAYS {
            return Err(Error::TooManyArrays(state.areas.len()));
        }
        state.billing_days = state.billing_days.max(1);
        Ok(state)
    }

    // ── Inputs ──

    pub fn config(&self) -> &SizingConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SizingConfig) -> Result<()> {
        config.validate()?;
        if config != self.config {
            self.config = config;
            self.derived = Derived::default();
        }
        Ok(())
    }

    pub fn panel(&self) -> Option<&PanelSpec> {
        self.panel.as_ref()
    }

    pub fn set_panel(&mut self, panel: Option<PanelSpec>) {
        if panel == self.panel {
            return;
        }
        self.panel = panel;
        let d = &mut self.derived;
        d.packing.iter_mut().for_each(Node::invalidate);
        d.string_plan.invalidate();
        d.generation.invalidate();
        d.coverage.invalidate();
        d.costs.invalidate();
        d.recommendation.invalidate();
    }

    pub fn inverter(&self) -> Option<&InverterSpec> {
        self.inverter.as_ref()
    }

    pub fn set_inverter(&mut self, inverter: Option<InverterSpec>) {
        if inverter == self.inverter {
            return;
        }
        self.inverter = inverter;
        let d = &mut self.derived;
        d.string_plan.invalidate();
        d.costs.invalidate();
        d.recommendation.invalidate();
    }

    pub fn areas(&self) -> &[ArrayArea] {
        &self.areas
    }

    pub fn add_area(&mut self, area: ArrayArea) -> Result<usize> {
        if self.areas.len() >= MAX_ARRAYS {
            return Err(Error::TooManyArrays(self.areas.len() + 1));
        }
        self.areas.push(area);
        self.derived.packing.push(Node::new());
        Ok(self.areas.len() - 1)
    }

    /// Grows or shrinks the area list; new areas start at 0 x 0 m.
    pub fn set_area_count(&mut self, count: usize) -> Result<()> {
        if count > MAX_ARRAYS {
            return Err(Error::TooManyArrays(count));
        }
        if count < self.areas.len() {
            self.areas.truncate(count);
            self.derived.packing.truncate(count);
            self.invalidate_area_dependents();
        }
        while self.areas.len() < count {
            self.areas.push(ArrayArea::default());
            self.derived.packing.push(Node::new());
        }
        Ok(())
    }

    pub fn remove_area(&mut self, index: usize) -> Result<ArrayArea> {
        if index >= self.areas.len() {
            return Err(Error::ArrayIndex(index));
        }
        let area = self.areas.remove(index);
        if index < self.derived.packing.len() {
            self.derived.packing.remove(index);
        }
        self.invalidate_area_dependents();
        Ok(area)
    }

    pub fn set_area(&mut self, index: usize, area: ArrayArea) -> Result<()> {
        let current = self.areas.get_mut(index).ok_or(Error::ArrayIndex(index))?;
        if *current != area {
            *current = area;
            if let Some(node) = self.derived.packing.get_mut(index) {
                node.invalidate();
            }
        }
        Ok(())
    }

    /// Sets an area from user-typed width, height and orientation strings.
    pub fn edit_area(
        &mut self,
        index: usize,
        width: &str,
        height: &str,
        orientation: &str,
    ) -> Result<()> {
        self.set_area(
            index,
            ArrayArea {
                width: parse_decimal(width),
                height: parse_decimal(height),
                orientation: parse_orientation(orientation),
            },
        )
    }

    pub fn billing_days(&self) -> u32 {
        self.billing_days
    }

    pub fn set_billing_days(&mut self, days: u32) {
        let days = days.max(1);
        if days == self.billing_days {
            return;
        }
        self.billing_days = days;
        let d = &mut self.derived;
        d.generation.invalidate();
        d.requirements.invalidate();
        d.coverage.invalidate();
    }

    pub fn edit_billing_days(&mut self, raw: &str) {
        let days = parse_billing_days(raw, self.config.generation.default_billing_days);
        self.set_billing_days(days);
    }

    pub fn set_billing_period(&mut self, start: &str, end: &str) {
        let days = billing_days_between(start, end, self.config.generation.default_billing_days);
        self.set_billing_days(days);
    }

    pub fn consumption(&self) -> &ConsumptionProfile {
        &self.consumption
    }

    pub fn set_consumption(&mut self, consumption: ConsumptionProfile) {
        if consumption == self.consumption {
            return;
        }
        self.consumption = consumption;
        let d = &mut self.derived;
        d.requirements.invalidate();
        d.coverage.invalidate();
        d.economics.invalidate();
    }

    pub fn edit_period(&mut self, period: TariffPeriod, kwh: &str, amount: &str) {
        let mut consumption = self.consumption;
        *consumption.period_mut(period) = PeriodConsumption {
            kwh: parse_decimal(kwh),
            amount: parse_decimal(amount),
        };
        self.set_consumption(consumption);
    }

    pub fn edit_demand(&mut self, kwh: &str, amount: &str) {
        let mut consumption = self.consumption;
        consumption.demand = PeriodConsumption {
            kwh: parse_decimal(kwh),
            amount: parse_decimal(amount),
        };
        self.set_consumption(consumption);
    }

    pub fn pricing(&self) -> &EquipmentPricing {
        &self.pricing
    }

    pub fn set_pricing(&mut self, pricing: EquipmentPricing) {
        if pricing != self.pricing {
            self.pricing = pricing;
            self.derived.costs.invalidate();
        }
    }

    fn invalidate_area_dependents(&mut self) {
        let d = &mut self.derived;
        d.string_plan.invalidate();
        d.materials.invalidate();
        d.generation.invalidate();
        d.coverage.invalidate();
        d.costs.invalidate();
        d.recommendation.invalidate();
    }

    // ── Recomputation ──

    /// Recomputes every stale derived value, upstream first.
    pub fn refresh(&mut self) -> Recomputed {
        let mut ran = Recomputed::default();

        while self.derived.packing.len() < self.areas.len() {
            self.derived.packing.push(Node::new());
        }

        let mut packing_changed = false;
        for (i, area) in self.areas.iter().enumerate() {
            let node = &mut self.derived.packing[i];
            if !node.stale {
                continue;
            }
            let value = match &self.panel {
                Some(panel) => Ok(pack_area(area, panel, &self.config.packing)),
                None => Err(Unavailable::NotConfigured("solar panel")),
            };
            packing_changed |= node.store(value);
            ran.packing.push(i);
        }
        if packing_changed {
            self.invalidate_area_dependents();
        }

        let packings = self.packings();
        let total = packings.as_ref().map(|p| total_panels(p)).map_err(|u| u.clone());

        if self.derived.string_plan.stale {
            let value = match (&self.panel, &self.inverter, &total) {
                (None, _, _) => Err(Unavailable::NotConfigured("solar panel")),
                (_, None, _) => Err(Unavailable::NotConfigured("inverter")),
                (_, _, Err(u)) => Err(u.clone()),
                (Some(panel), Some(inverter), Ok(n)) => {
                    Ok(size_strings(panel, inverter, *n, &self.config.strings))
                }
            };
            if self.derived.string_plan.store(value) {
                self.derived.costs.invalidate();
                self.derived.recommendation.invalidate();
            }
            ran.string_plan = true;
        }

        if self.derived.materials.stale {
            let value = packings
                .as_ref()
                .map(|p| bill_of_materials(p, &self.config.materials))
                .map_err(|u| u.clone());
            if self.derived.materials.store(value) {
                self.derived.costs.invalidate();
            }
            ran.materials = true;
        }

        if self.derived.generation.stale {
            let value = match (&self.panel, &packings) {
                (None, _) => Err(Unavailable::NotConfigured("solar panel")),
                (_, Err(u)) => Err(u.clone()),
                (Some(panel), Ok(p)) => Ok(generation_table(
                    p,
                    panel.noct,
                    self.billing_days,
                    &self.config.generation,
                )),
            };
            if self.derived.generation.store(value) {
                self.derived.economics.invalidate();
            }
            ran.generation = true;
        }

        if self.derived.requirements.stale {
            let rows = requirements(&self.consumption, self.billing_days, &self.config.generation);
            self.derived.requirements.store(Ok(rows));
            ran.requirements = true;
        }

        if self.derived.coverage.stale {
            let value = match (&self.panel, &total) {
                (None, _) => Err(Unavailable::NotConfigured("solar panel")),
                (_, Err(u)) => Err(u.clone()),
                (Some(panel), Ok(n)) => Ok(coverage(
                    &self.consumption,
                    self.billing_days,
                    *n,
                    panel.noct,
                    &self.config.generation,
                )),
            };
            self.derived.coverage.store(value);
            ran.coverage = true;
        }

        if self.derived.costs.stale {
            let value = self.build_cost_sheet(&total);
            if self.derived.costs.store(value) {
                self.derived.economics.invalidate();
            }
            ran.costs = true;
        }

        if self.derived.recommendation.stale {
            let value = self.required_inverters().and_then(|inverters| {
                match (&self.panel, &self.inverter, &total) {
                    (Some(panel), Some(inverter), Ok(n)) => {
                        Ok(recommendation(panel, *n, inverter, inverters))
                    }
                    (_, _, Err(u)) => Err(u.clone()),
                    _ => Err(Unavailable::NotConfigured("solar panel and inverter")),
                }
            });
            self.derived.recommendation.store(value);
            ran.recommendation = true;
        }

        if self.derived.economics.stale {
            let value = match (self.derived.costs.slot(), self.derived.generation.slot()) {
                (Ok(sheet), Ok(table)) => Ok(economics(
                    &sheet.lines,
                    table.monthly_generation_kwh(),
                    &self.consumption,
                )),
                (Err(u), _) | (_, Err(u)) => Err(u),
            };
            self.derived.economics.store(value);
            ran.economics = true;
        }

        if !ran.is_empty() {
            log::debug!("project refresh recomputed {:?}", ran);
        }
        ran
    }

    fn packings(&self) -> Slot<Vec<PackingResult>> {
        self.derived
            .packing
            .iter()
            .take(self.areas.len())
            .map(|n| n.slot().map(|p| *p))
            .collect()
    }

    fn required_inverters(&self) -> Slot<u32> {
        let plan = self.derived.string_plan.slot()?;
        plan.required_inverters
            .ok_or(Unavailable::NotComputable("inverter count"))
    }

    fn build_cost_sheet(&self, total: &Slot<u32>) -> Slot<CostSheet> {
        let inverters = self.required_inverters()?;
        let materials = self.derived.materials.slot()?;
        let panels = total.clone()?;
        let (Some(panel), Some(inverter)) = (&self.panel, &self.inverter) else {
            return Err(Unavailable::NotConfigured("solar panel and inverter"));
        };
        let inputs = CostInputs {
            panels: PricedItem {
                quantity: panels,
                fob_price: panel.fob_price,
            },
            inverters: PricedItem {
                quantity: inverters,
                fob_price: inverter.fob_price,
            },
            structure_fob: materials.total_cost,
            pricing: self.pricing,
        };
        Ok(cost_sheet(&inputs, &self.config.costs))
    }

    // ── Derived values ──

    pub fn packing(&mut self, index: usize) -> Result<&PackingResult> {
        if index >= self.areas.len() {
            return Err(Error::ArrayIndex(index));
        }
        self.refresh();
        self.derived.packing[index].get()
    }

    pub fn total_panels(&mut self) -> Result<u32> {
        self.refresh();
        Ok(total_panels(&self.packings()?))
    }

    pub fn string_plan(&mut self) -> Result<&StringPlan> {
        self.refresh();
        self.derived.string_plan.get()
    }

    pub fn string_layout(&mut self) -> Result<StringLayout> {
        self.refresh();
        let plan = self.derived.string_plan.get()?;
        let inverter = self
            .inverter
            .as_ref()
            .ok_or_else(|| Error::NotConfigured("inverter".into()))?;
        let total = total_panels(&self.packings()?);
        Ok(assign_strings(plan, inverter.mppt_channels, total))
    }

    pub fn materials(&mut self) -> Result<&BillOfMaterials> {
        self.refresh();
        self.derived.materials.get()
    }

    pub fn generation(&mut self) -> Result<&GenerationTable> {
        self.refresh();
        self.derived.generation.get()
    }

    pub fn requirements(&mut self) -> Result<&[RequirementRow]> {
        self.refresh();
        self.derived.requirements.get().map(Vec::as_slice)
    }

    pub fn coverage(&mut self) -> Result<&CoverageSummary> {
        self.refresh();
        self.derived.coverage.get()
    }

    pub fn costs(&mut self) -> Result<&CostSheet> {
        self.refresh();
        self.derived.costs.get()
    }

    pub fn recommendation(&mut self) -> Result<&Recommendation> {
        self.refresh();
        self.derived.recommendation.get()
    }

    pub fn economics(&mut self) -> Result<&EconomicsSummary> {
        self.refresh();
        self.derived.economics.get()
    }

    pub fn report(&mut self) -> ProjectReport {
        let string_layout = self.string_layout().ok();
        let d = &self.derived;
        ProjectReport {
            packing: d
                .packing
                .iter()
                .take(self.areas.len())
                .map(|n| n.get().ok().copied())
                .collect(),
            total_panels: self.packings().ok().map(|p| total_panels(&p)),
            string_plan: d.string_plan.get().ok().copied(),
            string_layout,
            materials: d.materials.get().ok().cloned(),
            generation: d.generation.get().ok().cloned(),
            requirements: d.requirements.get().ok().cloned().unwrap_or_default(),
            coverage: d.coverage.get().ok().cloned(),
            costs: d.costs.get().ok().cloned(),
            recommendation: d.recommendation.get().ok().cloned(),
            economics: d.economics.get().ok().copied(),
        }
    }
}
