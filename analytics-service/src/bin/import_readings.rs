use std::{env, fs::File};

use anyhow::{bail, Context, Result};
use analytics_service::{
    config::{AppConfig, StoreKind},
    import, observability, store,
};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        bail!("usage: import_readings <owner_id> <csv_file_path>");
    }
    let owner = import::parse_owner(&args[1])?;
    let file_path = &args[2];

    // Load configuration (can point ANALYTICS_CONFIG to an import-specific file).
    let cfg = AppConfig::load()?;
    if cfg.store.kind == StoreKind::Memory {
        bail!("import_readings needs a persistent store; set [store] kind = \"postgres\"");
    }
    let store = store::from_config(&cfg).await?;

    let file = File::open(file_path).with_context(|| format!("failed to open {file_path}"))?;
    let parsed = import::parse_csv(file)?;

    let mut imported: u64 = 0;
    for reading in parsed.readings {
        store.create(&owner, reading).await?;
        imported += 1;
    }
    metrics::counter!("readings_imported_total").increment(imported);

    tracing::info!(
        owner = %owner,
        imported,
        rejected = parsed.rejected,
        "reading import finished"
    );

    Ok(())
}
