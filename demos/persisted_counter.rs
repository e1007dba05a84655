//! Counter persisted to a JSON file across runs
//!
//! Run it a few times; set `RUST_LOG=pantry=debug` to see the store lifecycle.

use pantry::{JsonFilePersistence, PersistenceConfig, Store};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let dir = std::env::temp_dir().join("pantry-demo");
    let store = Store::builder()
        .id("counter")
        .plugin(JsonFilePersistence::factory(PersistenceConfig::new(&dir)))
        .build()?;

    let runs = store.set_default("runs", json!(0))?;
    let previous = runs.get_as::<u64>()?.unwrap_or(0);
    runs.set(json!(previous + 1))?;

    println!("This demo has run {} time(s)", previous + 1);
    println!("State file: {}", dir.join("counter.json").display());

    if std::env::args().any(|arg| arg == "--clear") {
        store.clear()?;
        println!("Counter cleared");
    }
    Ok(())
}
