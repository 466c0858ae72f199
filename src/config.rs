use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// What to do with a `BldA` that carries more than one `gml:posList`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PosListPolicy {
    /// The last list wins, the previous ones are discarded and counted.
    #[default]
    Last,
    /// The whole file is skipped.
    Reject,
}

/// Every path and pattern the pipeline needs. Nothing is read from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root whose sub-directories contain the zip archives.
    pub zip_dir: PathBuf,
    /// Where the archives are expanded, mirrored per sub-directory.
    pub extract_dir: PathBuf,
    /// Where the merged files are written, mirrored per sub-directory.
    pub output_dir: PathBuf,
    /// Region of interest. When `None` the whole merged table is exported.
    pub boundary: Option<PathBuf>,
    /// File name of the shapefile, the GeoJSON uses the same stem.
    pub output_name: String,
    /// Substring an XML file name must contain to be merged.
    pub file_pattern: String,
    pub pos_list_policy: PosListPolicy,
    /// Display progress bars while iterating over archives and files.
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zip_dir: PathBuf::from("/workspace/data/zips"),
            extract_dir: PathBuf::from("/workspace/data/extract"),
            output_dir: PathBuf::from("/workspace/data/output"),
            boundary: Some(PathBuf::from(
                "/workspace/data/filter/fukushima_shp.geojson",
            )),
            output_name: String::from("fukushima_merged.shp"),
            file_pattern: String::from("BldA"),
            pos_list_policy: PosListPolicy::default(),
            progress: true,
        }
    }
}

impl Config {
    /// Read a JSON configuration. Missing fields take their default value.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| Error::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })
    }
}
