//! Model asset management: local lookup and `HuggingFace` download.

use std::path::{Path, PathBuf};

use dphon_settings::ModelSettings;
use tracing::{debug, info, warn};

use crate::errors::{PhonemizeError, Result};

/// Required asset file names, model first.
pub fn asset_files(settings: &ModelSettings) -> [&str; 2] {
    [settings.model_file.as_str(), settings.tokenizer_file.as_str()]
}

/// Whether every required asset exists in the model directory.
pub fn is_cached(settings: &ModelSettings) -> bool {
    let dir = settings.resolved_dir();
    asset_files(settings).iter().all(|f| dir.join(f).exists())
}

/// Make sure the model and tokenizer exist locally, downloading missing
/// files from the configured `HuggingFace` repo.
pub async fn ensure_assets(settings: &ModelSettings) -> Result<()> {
    let dir = settings.resolved_dir();
    if is_cached(settings) {
        debug!("model assets already cached at {}", dir.display());
        return Ok(());
    }

    let Some(repo) = settings.hf_repo.clone() else {
        return Err(PhonemizeError::AssetUnavailable(format!(
            "model assets missing in {} and no hfRepo configured",
            dir.display()
        )));
    };

    info!(repo = %repo, "downloading model assets from HuggingFace");
    std::fs::create_dir_all(&dir)?;

    let files: Vec<String> = asset_files(settings).iter().map(ToString::to_string).collect();
    tokio::task::spawn_blocking(move || download_files(&repo, &dir, &files))
        .await
        .map_err(|e| PhonemizeError::AssetUnavailable(format!("task join error: {e}")))?
}

fn download_files(repo_id: &str, dir: &Path, files: &[String]) -> Result<()> {
    let api = hf_hub::api::sync::ApiBuilder::new()
        .with_cache_dir(hf_cache_dir(dir))
        .build()
        .map_err(|e| PhonemizeError::AssetUnavailable(format!("HF API init: {e}")))?;
    let repo = api.model(repo_id.to_string());

    for filename in files {
        let target = dir.join(filename);
        if target.exists() {
            debug!("skipping {filename} (already exists)");
            continue;
        }

        info!("downloading {filename}...");
        match repo.get(filename) {
            Ok(cached_path) => {
                if cached_path != target {
                    let _ = std::fs::copy(&cached_path, &target).map_err(|e| {
                        PhonemizeError::AssetUnavailable(format!("failed to copy {filename}: {e}"))
                    })?;
                }
                debug!("downloaded {filename}");
            }
            Err(e) => {
                warn!("failed to download {filename}: {e}");
                return Err(PhonemizeError::AssetUnavailable(format!(
                    "download failed for {filename}: {e}"
                )));
            }
        }
    }

    info!("model assets ready at {}", dir.display());
    Ok(())
}

fn hf_cache_dir(model_dir: &Path) -> PathBuf {
    model_dir.join(".hf-cache")
}
