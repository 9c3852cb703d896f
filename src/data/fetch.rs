use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TomoError};
use crate::transfer::{OpacityProfile, TransferFunction};

// ---------------------------------------------------------------------------
// Dataset registry
// ---------------------------------------------------------------------------

/// All built-in datasets share the same fixed scalar range.
pub const SCALAR_MIN: f64 = 0.0;
pub const SCALAR_MAX: f64 = 255.0;

/// Environment variable overriding the local dataset cache directory.
pub const DATA_DIR_ENV: &str = "TOMOVIEW_DATA_DIR";

/// Optional manifest file (inside the data directory) with extra datasets.
pub const MANIFEST_FILE: &str = "datasets.json";

const STAR_NANOPARTICLE_ID: &str = "star_nanoparticle";
const NANOTUBE_ID: &str = "nanotube";

/// Everything needed to fetch and display one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub id: String,
    /// File name inside the local data directory.
    pub file_name: String,
    /// Remote location to download from when the file is absent.
    pub source_url: String,
    /// Lower slider bound for the isosurface threshold.
    pub threshold_min: f64,
    /// Startup isovalue.
    pub threshold_default: f64,
    /// Volume-rendering style.
    #[serde(default)]
    pub transfer: TransferFunction,
}

/// Maps dataset identifiers to their specs.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    specs: BTreeMap<String, DatasetSpec>,
}

impl DatasetRegistry {
    /// The two tomography datasets the demos ship with.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        registry.insert(DatasetSpec {
            id: STAR_NANOPARTICLE_ID.to_string(),
            file_name: "Recon_NanoParticle_doi_10.1021-nl103400a.tiff".to_string(),
            source_url: drive_url("1S821zdERFfJ-TlnMeyE0aTdBdV642OL4"),
            threshold_min: 1.0,
            threshold_default: 10.0,
            transfer: TransferFunction {
                color_map: "plasma".to_string(),
                opacity: OpacityProfile::Sigmoid(5),
            },
        });
        registry.insert(DatasetSpec {
            id: NANOTUBE_ID.to_string(),
            file_name: "reconstructed_tiltser_180_subsampled_10.6084-m9.figshare.c.2185342.v2.tiff"
                .to_string(),
            source_url: drive_url("1bJi4yYis8yCh2A7yIpAzYjGUrqSV1us2"),
            threshold_min: 80.0,
            threshold_default: 127.0,
            transfer: TransferFunction {
                color_map: "plasma".to_string(),
                opacity: OpacityProfile::Points(vec![0.0, 0.06, 0.3, 0.5, 1.0]),
            },
        });
        registry
    }

    pub fn insert(&mut self, spec: DatasetSpec) {
        self.specs.insert(spec.id.clone(), spec);
    }

    pub fn get(&self, id: &str) -> Result<&DatasetSpec> {
        self.specs
            .get(id)
            .ok_or_else(|| TomoError::UnknownDataset(id.to_string()))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.specs.keys().map(|k| k.as_str()).collect()
    }

    /// Merge extra datasets from a JSON manifest (an array of specs).
    /// Returns the number of entries merged.
    pub fn load_manifest(&mut self, path: &Path) -> Result<usize> {
        let text = fs::read_to_string(path)?;
        let specs: Vec<DatasetSpec> = serde_json::from_str(&text)?;
        let count = specs.len();
        for spec in specs {
            log::debug!("manifest dataset '{}' -> {}", spec.id, spec.file_name);
            self.insert(spec);
        }
        Ok(count)
    }

    /// Builtins plus, if present, the `datasets.json` manifest in `data_dir`.
    pub fn discover(data_dir: &Path) -> Result<Self> {
        let mut registry = Self::builtin();
        let manifest = data_dir.join(MANIFEST_FILE);
        if manifest.exists() {
            let merged = registry.load_manifest(&manifest)?;
            log::info!("merged {merged} dataset(s) from {}", manifest.display());
        }
        Ok(registry)
    }
}

fn drive_url(file_id: &str) -> String {
    format!("https://drive.google.com/uc?export=download&id={file_id}")
}

// ---------------------------------------------------------------------------
// Download-if-missing cache
// ---------------------------------------------------------------------------

/// The local dataset cache directory: `./data`, or `TOMOVIEW_DATA_DIR`.
pub fn data_dir() -> PathBuf {
    env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Resolve a dataset to a local file path, downloading it first if absent.
///
/// A download failure is fatal to startup; there is no retry beyond this one
/// attempt. Downloads go to a `.part` file and are renamed only on success, so
/// an interrupted transfer never shadows the cache.
pub fn fetch_dataset(spec: &DatasetSpec, data_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(data_dir)?;

    let path = data_dir.join(&spec.file_name);
    if path.exists() {
        log::debug!("dataset '{}' already cached at {}", spec.id, path.display());
        return Ok(path);
    }

    log::info!("downloading dataset '{}' from {}", spec.id, spec.source_url);
    let mut response = reqwest::blocking::get(&spec.source_url)?;
    if !response.status().is_success() {
        return Err(TomoError::DownloadFailed {
            id: spec.id.clone(),
            status: response.status().as_u16(),
        });
    }

    let partial = path.with_extension("part");
    let mut file = fs::File::create(&partial)?;
    response.copy_to(&mut file)?;
    fs::rename(&partial, &path)?;

    log::info!("stored dataset '{}' at {}", spec.id, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        env::temp_dir().join(format!("tomoview_{tag}_{suffix}"))
    }

    #[test]
    fn builtin_defaults_match_the_datasets() {
        let registry = DatasetRegistry::builtin();

        let star = registry.get(STAR_NANOPARTICLE_ID).unwrap();
        assert_eq!(star.threshold_default, 10.0);
        assert_eq!(star.threshold_min, 1.0);
        assert!(star.threshold_default >= star.threshold_min);
        assert!(star.threshold_default <= SCALAR_MAX);
        assert_eq!(star.transfer.opacity, OpacityProfile::Sigmoid(5));

        let nanotube = registry.get(NANOTUBE_ID).unwrap();
        assert_eq!(nanotube.threshold_default, 127.0);
        assert_eq!(nanotube.threshold_min, 80.0);
        assert_eq!(
            nanotube.transfer.opacity,
            OpacityProfile::Points(vec![0.0, 0.06, 0.3, 0.5, 1.0])
        );
    }

    #[test]
    fn unknown_id_is_an_error() {
        let registry = DatasetRegistry::builtin();
        assert!(matches!(
            registry.get("no_such_dataset"),
            Err(TomoError::UnknownDataset(_))
        ));
    }

    #[test]
    fn cached_file_short_circuits_the_download() {
        let dir = temp_dir("cache");
        fs::create_dir_all(&dir).expect("create temp dir");

        let spec = DatasetSpec {
            id: "local".to_string(),
            file_name: "local.tiff".to_string(),
            // Unroutable on purpose: must never be contacted.
            source_url: "http://127.0.0.1:1/never".to_string(),
            threshold_min: 1.0,
            threshold_default: 10.0,
            transfer: TransferFunction::default(),
        };
        fs::write(dir.join(&spec.file_name), b"not really a tiff").expect("seed cache");

        let path = fetch_dataset(&spec, &dir).expect("cached fetch");
        assert_eq!(path, dir.join("local.tiff"));

        fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn manifest_entries_become_resolvable() {
        let dir = temp_dir("manifest");
        fs::create_dir_all(&dir).expect("create temp dir");

        let manifest = r#"[
            {
                "id": "synthetic",
                "file_name": "synthetic.tiff",
                "source_url": "http://example.invalid/synthetic.tiff",
                "threshold_min": 1.0,
                "threshold_default": 64.0
            }
        ]"#;
        fs::write(dir.join(MANIFEST_FILE), manifest).expect("write manifest");

        let registry = DatasetRegistry::discover(&dir).expect("discover");
        let spec = registry.get("synthetic").unwrap();
        assert_eq!(spec.threshold_default, 64.0);
        // Omitted transfer falls back to the default style.
        assert_eq!(spec.transfer, TransferFunction::default());
        // Builtins survive the merge.
        assert!(registry.get(STAR_NANOPARTICLE_ID).is_ok());

        fs::remove_dir_all(&dir).expect("cleanup");
    }
}
