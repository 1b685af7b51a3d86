//! Drives the valve controller over a simulated temperature/flow series
//!
//! ```sh
//! RUST_LOG=info cargo run --example valve_simulation [config.toml]
//! ```

use std::env;

use fuzzy_valve::{Error, SystemConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const STEPS: usize = 100;
const DURATION_SECS: f64 = 10.;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match env::args().nth(1) {
        Some(path) => SystemConfig::from_path(path)?,
        None => SystemConfig::from_toml_str(include_str!("valve.toml"))?,
    };
    let engine = config.build()?;

    for step in 0..STEPS {
        let t = DURATION_SECS * step as f64 / (STEPS - 1) as f64;
        let temperatura = 30. + 10. * (0.5 * t).sin();
        let fluxo = 10. + 5. * (0.3 * t).cos();

        let outputs = engine.compute_named([("temperatura", temperatura), ("fluxo", fluxo)])?;

        match outputs.by_name("abertura") {
            Ok(abertura) => info!(t, temperatura, fluxo, abertura, "step"),
            Err(err) => warn!(t, temperatura, fluxo, %err, "step"),
        }
    }

    // Membership curves, as a plotting sink would read them
    for var in engine.variables().iter() {
        for term in var.term_names() {
            let peak = var
                .discretize(term)?
                .fold((f64::NAN, 0.), |best, (p, d)| if d > best.1 { (p, d) } else { best });

            info!(variable = var.name(), term, peak_at = peak.0, "membership");
        }
    }

    Ok(())
}
