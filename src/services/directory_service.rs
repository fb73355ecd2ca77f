use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::models::CompanyDirectory;
use crate::services::history_service::HistoryClient;
use crate::utils::errors::AppError;

/// Where the company list is cached between runs.
pub const CACHE_PATH: &str = "data/companies.txt";

/// Load the IBEX35 company directory, scraping and caching it on first use.
///
/// The cache has no expiry: once written it is trusted until the file is
/// deleted by hand, so a change in index membership needs a manual refresh.
pub async fn load(client: &HistoryClient) -> Result<CompanyDirectory, AppError> {
    load_from(client, Path::new(CACHE_PATH)).await
}

/// Same as [`load`] but against an explicit cache path.
pub async fn load_from(
    client: &HistoryClient,
    path: &Path,
) -> Result<CompanyDirectory, AppError> {
    if path.is_file() {
        let content = fs::read_to_string(path)?;
        let names = parse_cache(&content);
        if !names.is_empty() {
            info!("Using cached company list at {}", path.display());
            return Ok(CompanyDirectory::new(names));
        }
        warn!("Cache at {} is empty, refetching the listing", path.display());
    } else {
        info!("Company list cache not found, fetching the IBEX35 listing");
    }

    let names = client.fetch_companies().await?;
    fs::write(path, serialize_cache(&names))?;
    info!("Cached {} companies at {}", names.len(), path.display());
    Ok(CompanyDirectory::new(names))
}

/// Cache format: a comma-separated plain list, one line.
fn serialize_cache(names: &[String]) -> String {
    names.join(",")
}

/// Whitespace around names is tolerated so a hand-edited file still loads.
fn parse_cache(content: &str) -> Vec<String> {
    content
        .split(',')
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Lower-cased, trimmed, underscore-joined token for the per-company
/// history URL.
pub fn to_url_slug(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_round_trips_without_reordering() {
        let names: Vec<String> = ["Acciona", "Banco Santander", "Telefónica", "Repsol"]
            .iter()
            .map(|n| n.to_string())
            .collect();

        let reloaded = parse_cache(&serialize_cache(&names));
        assert_eq!(reloaded, names);
    }

    #[test]
    fn cache_survives_a_write_to_disk() {
        let names: Vec<String> = ["Iberdrola", "Inditex"].iter().map(|n| n.to_string()).collect();
        let path = std::env::temp_dir().join(format!("ibexplot-cache-{}.txt", std::process::id()));

        fs::write(&path, serialize_cache(&names)).expect("cache write failed");
        let content = fs::read_to_string(&path).expect("cache read failed");
        let _ = fs::remove_file(&path);

        assert_eq!(parse_cache(&content), names);
    }

    #[test]
    fn cache_read_tolerates_padding_and_blanks() {
        let parsed = parse_cache(" Acciona , Repsol ,,Telefónica,\n");
        assert_eq!(parsed, vec!["Acciona", "Repsol", "Telefónica"]);
    }

    #[test]
    fn slug_is_lowercased_and_underscored() {
        assert_eq!(to_url_slug("Banco Santander"), "banco_santander");
        assert_eq!(to_url_slug("  Repsol  "), "repsol");
        assert_eq!(to_url_slug("ACS Actividades"), "acs_actividades");
    }
}
