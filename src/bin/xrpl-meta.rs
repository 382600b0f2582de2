use std::fs::File;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xrpl_meta::bin_utils::Service;

fn main() -> Result<()> {
    // logs go to stderr, the interpreted result owns stdout
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(fmt_layer)
        .init();

    let mut compute_fees = false;
    let mut filename = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--fees" => compute_fees = true,
            _ => filename = Some(arg),
        }
    }
    let filename = filename.context("Expected a transaction JSON file as the first argument")?;
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        compute_fees,
    };
    service.run()
}
