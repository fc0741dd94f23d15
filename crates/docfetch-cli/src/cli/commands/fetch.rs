//! `docfetch fetch <url>` – resolve a document and save it locally.

use anyhow::{Context, Result};
use docfetch_core::checksum::sha256_hex;
use docfetch_core::config::DocfetchConfig;
use docfetch_core::filename::local_name;
use docfetch_core::resolver::Resolver;
use std::fs;
use std::path::{Path, PathBuf};

pub async fn run_fetch(cfg: &DocfetchConfig, url: &str, output_dir: &Path) -> Result<()> {
    let resolver = Resolver::from_config(cfg);
    let owned_url = url.to_string();
    let doc = tokio::task::spawn_blocking(move || resolver.resolve(&owned_url))
        .await
        .context("resolver task")??;

    let name = local_name(url, Some(&doc.content_disposition));
    let path = write_document(output_dir, &name, &doc.body)?;
    tracing::info!(
        candidate = %doc.candidate,
        bytes = doc.body.len(),
        "saved {}",
        path.display()
    );
    println!("{}", path.display());
    println!("sha256: {}", sha256_hex(&doc.body));
    Ok(())
}

/// Writes `body` to `dir/name` via a `.part` file renamed into place, so a
/// failed write never leaves a truncated document under the final name.
/// The temp name is fixed and short; `name` may already be NAME_MAX long.
fn write_document(dir: &Path, name: &str, body: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let final_path = dir.join(name);
    let temp_path = dir.join(format!(".docfetch-{}.part", std::process::id()));
    fs::write(&temp_path, body).with_context(|| format!("write {}", temp_path.display()))?;
    fs::rename(&temp_path, &final_path)
        .with_context(|| format!("rename to {}", final_path.display()))?;
    Ok(final_path)
}
