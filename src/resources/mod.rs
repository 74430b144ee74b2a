//! Asset loading.
//!
//! Every loader takes the asset directory explicitly so the demo binary,
//! tests and downstream code can point at different trees. Paths passed to
//! the loaders are relative to that directory.

use std::path::Path;

use anyhow::Context as _;

pub mod mesh;
pub mod texture;

pub async fn load_string(asset_dir: &Path, file_name: &str) -> anyhow::Result<String> {
    let path = asset_dir.join(file_name);
    tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

pub async fn load_binary(asset_dir: &Path, file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_dir.join(file_name);
    tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}
