use std::sync::Arc;

use anyhow::Result;

use skytrade::config::Config;
use skytrade::feed::DseFeed;
use skytrade::logging::{json_log, obj, v_str};
use skytrade::server;
use skytrade::storage::IndexStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Declare the history schema up front; nothing in the scrape flow
    // writes to it.
    let mut store = IndexStore::new(&cfg.sqlite_path)?;
    store.init()?;

    json_log(
        "system",
        obj(&[
            ("event", v_str("startup")),
            ("feed", v_str(&cfg.dse_base)),
            ("db", v_str(&cfg.sqlite_path)),
        ]),
    );

    let feed = Arc::new(DseFeed::new(&cfg));
    server::serve(cfg, feed).await
}
