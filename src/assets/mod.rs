//! Fetch-once cache for the OPSIN jar and model archives.

use std::fs::File;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::config::ServiceConfig;

/// Downloads `url` to `destination` unless it already exists. The body is
/// streamed to a `.part` file which is renamed once complete. Returns whether
/// a download happened.
pub async fn ensure_file(url: &str, destination: &Path) -> eyre::Result<bool> {
    if destination.exists() {
        log::debug!("{} already present", destination.display());
        return Ok(false);
    }

    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let partial = partial_path(destination);
    log::info!("downloading {} to {}", url, destination.display());

    let mut response = reqwest::get(url).await?;
    if !response.status().is_success() {
        return Err(eyre::eyre!(
            "download of {} failed with status {}",
            url,
            response.status()
        ));
    }

    let mut output_file = tokio::fs::File::create(&partial).await?;
    let mut written = 0usize;
    while let Some(chunk) = response.chunk().await? {
        output_file.write_all(&chunk).await?;
        written += chunk.len();
    }
    output_file.flush().await?;
    drop(output_file);

    tokio::fs::rename(&partial, destination).await?;
    log::info!("downloaded {} bytes to {}", written, destination.display());

    Ok(true)
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}

/// Unpacks a zip archive below `destination`, skipping entries whose names
/// would escape it. Returns the number of files written.
pub fn extract_archive(archive: &Path, destination: &Path) -> eyre::Result<usize> {
    let mut archive = zip::ZipArchive::new(File::open(archive)?)?;
    let mut extracted = 0;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let relative = match entry.enclosed_name() {
            Some(relative) => relative.to_path_buf(),
            None => {
                log::warn!("skipping archive entry {:?}", entry.name());
                continue;
            }
        };
        let target = destination.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut output = File::create(&target)?;
        std::io::copy(&mut entry, &mut output)?;
        extracted += 1;
    }

    Ok(extracted)
}

/// Makes sure everything the service loads at startup is on disk.
pub async fn ensure_assets(config: &ServiceConfig) -> eyre::Result<()> {
    std::fs::create_dir_all(&config.asset_root)?;

    if config.opsin.is_none() {
        ensure_file(&config.opsin_jar_url, &config.opsin_jar_path()).await?;
    }

    let missing_models = [&config.forward, &config.reverse, &config.vision]
        .into_iter()
        .filter(|manifest| !config.asset_root.join(&manifest.model_file).exists())
        .map(|manifest| manifest.name.as_str())
        .collect::<Vec<_>>();

    if missing_models.is_empty() {
        return Ok(());
    }

    match &config.models_archive_url {
        Some(url) => {
            let archive = config.asset_root.join("models.zip");
            ensure_file(url, &archive).await?;
            let extracted = extract_archive(&archive, &config.asset_root)?;
            log::info!(
                "extracted {} files from {} into {}",
                extracted,
                archive.display(),
                config.asset_root.display()
            );
        }
        None => log::warn!(
            "models {:?} are missing from {} and no archive url is configured",
            missing_models,
            config.asset_root.display()
        ),
    }

    Ok(())
}
