use std::env;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use solar_sizing::catalog::{Catalog, RawRecord};
use solar_sizing::config::SizingConfig;
use solar_sizing::project::ProjectState;
use solar_sizing::types::TariffPeriod;

fn record(pairs: &[(&str, &str)]) -> RawRecord {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(false)
        .init();

    // Optional TOML overrides: `cargo run --example sizing -- sizing.toml`
    let config = match env::args().nth(1) {
        Some(path) => {
            info!("loading configuration from {}", path);
            SizingConfig::from_file(path)?
        }
        None => SizingConfig::default(),
    };

    let catalog = Catalog::from_records(
        &[record(&[
            ("Marca", "Jinko"),
            ("Modelo", "Tiger Neo 550"),
            ("Alto", "2,278"),
            ("Ancho", "1,134"),
            ("Espesor", "0,030"),
            ("Metros²", "2,58"),
            ("Watts", "550"),
            ("VOC", "49,6"),
            ("NOCT", "409,2"),
            ("FOB CH", "$ 98,50"),
        ])],
        &[record(&[
            ("Marca", "Huawei"),
            ("Modelo", "SUN2000-50KTL-M3"),
            ("Capacidad", "50"),
            ("Max PV Input Voltage", "1100"),
            ("MPPT", "4"),
            ("Strings", "8"),
            ("FOB CH", "3.150,00"),
        ])],
    )?;

    let mut project = ProjectState::new(config);
    project.set_panel(Some(catalog.panel("Jinko Tiger Neo 550")?.clone()));
    project.set_inverter(Some(catalog.inverter("Huawei SUN2000-50KTL-M3")?.clone()));

    let roof = project.add_area(Default::default())?;
    project.edit_area(roof, "24,5", "12", "portrait")?;
    let carport = project.add_area(Default::default())?;
    project.edit_area(carport, "18", "7,5", "landscape")?;

    project.set_billing_period("01/03/2026", "31/03/2026");
    project.edit_period(TariffPeriod::A, "4200", "630,00");
    project.edit_period(TariffPeriod::B, "1800", "306,00");
    project.edit_period(TariffPeriod::C, "2100", "231,00");
    project.edit_period(TariffPeriod::D, "600", "66,00");
    project.edit_demand("120", "540,00");

    println!("=== Solar PV Sizing Example ===");
    println!();
    println!("--- Arrays ---");
    for i in 0..project.areas().len() {
        let area = project.areas()[i];
        let packing = *project.packing(i)?;
        println!(
            "Array {}: {:.2} x {:.2} m {:?} -> {} ({} panels, row {:.3} m, \
             column gap {:.3} m, row gap {:.3} m)",
            i + 1,
            area.width,
            area.height,
            area.orientation,
            packing.description(),
            packing.total_panels,
            packing.row_length,
            packing.column_spacing,
            packing.row_spacing
        );
    }
    println!("Total panels: {}", project.total_panels()?);
    println!();

    println!("--- Strings ---");
    let plan = *project.string_plan()?;
    println!("Adjusted VOC: {:.4} V", plan.adjusted_voc);
    println!("Max panels per string: {:?}", plan.max_panels_per_string);
    println!(
        "Inverters (by power / by strings): {:?} / {:?}",
        plan.inverters_by_power, plan.inverters_by_strings
    );
    println!("Required inverters: {:?}", plan.required_inverters);
    for s in project.string_layout()?.assignments {
        println!("  Inverter {} MPPT {} input {}: {}", s.inverter, s.mppt, s.input, s);
    }
    println!();

    println!("--- Bill of Materials ---");
    for line in &project.materials()?.lines {
        println!(
            "{:<14} {:>5} {:<6} {:>9.2} kg  ${:>10.2}",
            line.name, line.quantity, line.unit, line.extended_weight, line.extended_price
        );
    }
    println!();

    println!("--- Generation ---");
    let generation = project.generation()?;
    println!(
        "{} panels at {} W, {} h sun, {} days: {:.2} kWh",
        generation.total.panels,
        generation.noct_w,
        generation.peak_sun_hours,
        generation.billing_days,
        generation.monthly_generation_kwh()
    );
    for row in project.requirements()? {
        println!("{:<22} {:>8.2} kWh -> ideal {}", row.kind.label(), row.consumption, row.ideal);
    }
    println!();

    println!("--- Costs ---");
    let costs = project.costs()?.clone();
    for line in &costs.lines {
        println!(
            "{:<28} {:>8.2} x ${:>10.2} = ${:>12.2}",
            line.category.label(),
            line.quantity,
            line.pvp,
            line.total_pvp
        );
    }
    println!("Total PVP: ${:.2} (margin ${:.2})", costs.total_pvp, costs.total_margin);
    println!();

    println!("--- Economics ---");
    let summary = *project.economics()?;
    println!("Monthly savings: ${:.2}", summary.monthly_savings);
    println!("Net monthly bill: ${:.2}", summary.net_monthly_bill);
    println!("Payback: {}", summary.payback_label());

    let rec = project.recommendation()?;
    println!(
        "Recommended: {} x {} ({:.2} kWp) with {} x {} ({:.2} kW)",
        rec.panels,
        rec.panel_name,
        rec.capacity_kwp,
        rec.inverters,
        rec.inverter_name,
        rec.capacity_kw
    );

    info!("project saved as {} bytes of JSON", project.to_json()?.len());
    Ok(())
}
