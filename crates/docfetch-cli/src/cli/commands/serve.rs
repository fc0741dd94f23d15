//! `docfetch serve` – run the HTTP endpoint until Ctrl+C / SIGTERM.

use anyhow::Result;
use docfetch_core::config::DocfetchConfig;
use docfetch_core::resolver::Resolver;
use docfetch_core::server;

pub async fn run_serve(cfg: &DocfetchConfig, bind: Option<&str>) -> Result<()> {
    let bind_address = bind.unwrap_or(cfg.bind_address.as_str());
    let resolver = Resolver::from_config(cfg);
    server::serve(bind_address, resolver).await
}
