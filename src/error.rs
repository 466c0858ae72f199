use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // User errors
    #[error("Boundary file `{0}` has an unsupported extension, only `.geojson`, `.json` and `.shp` are supported")]
    UnsupportedBoundaryFormat(PathBuf),
    #[error(
        "Boundary file `{path}` declares the coordinate system `{declared}` but only EPSG:4326 is supported"
    )]
    UnsupportedCrs { path: PathBuf, declared: String },
    #[error("Boundary file `{0}` does not contain any polygon")]
    EmptyBoundary(PathBuf),
    #[error("Cannot read configuration `{path}`: {source}")]
    InvalidConfig {
        path: PathBuf,
        source: serde_json::Error,
    },

    // External errors, sometimes it's a user error and sometimes it's not
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    InvalidGeoJson(#[from] Box<geojson::Error>),
    #[error(transparent)]
    Shapefile(#[from] shapefile::Error),

    // Internal errors
    #[error("invalid dbf field name `{0}` at `{1}`")]
    InternalFieldName(&'static str, String),
}

impl From<geojson::Error> for Error {
    fn from(error: geojson::Error) -> Self {
        Error::InvalidGeoJson(Box::new(error))
    }
}

/// Why a single XML file contributed no rows. The run carries on without it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error("cannot read file: {0}")]
    Unreadable(String),
    #[error("malformed XML: {0}")]
    MalformedXml(String),
    #[error("feature #{feature} has no `gml:posList`")]
    MissingPosList { feature: usize },
    #[error("feature #{feature} has {count} `gml:posList`, only one is accepted")]
    MultiplePosLists { feature: usize, count: usize },
    #[error("feature #{feature} has a non numeric coordinate `{token}`")]
    InvalidCoordinate { feature: usize, token: String },
    #[error("feature #{feature} has an odd number of coordinate values ({count})")]
    OddCoordinateCount { feature: usize, count: usize },
    #[error("feature #{feature} has {count} positions but less than 3 distinct ones")]
    DegenerateRing { feature: usize, count: usize },
}

#[macro_export]
macro_rules! pos {
    () => {
        format!("{}:{}:{}", file!(), line!(), column!())
    };
}
