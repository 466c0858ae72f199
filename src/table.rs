use std::fmt;

use geo::{BoundingRect, Rect};
use geo_types::Polygon;
use roaring::RoaringBitmap;

/// Identity of a row, assigned when a table is built or concatenated and kept by [`FeatureTable::select`].
pub type RowId = u32;

/// Name of the single attribute written next to the geometry.
pub const TYPE_FIELD: &str = "type";

/// One building footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingRecord {
    /// The `fgd:type` label, ie. `普通建物` or `堅ろう建物`.
    pub kind: Option<String>,
    pub geometry: Polygon,
}

impl BuildingRecord {
    pub fn bounding_rect(&self) -> Option<Rect> {
        self.geometry.bounding_rect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// WGS 84 in decimal degrees, longitude first.
    Wgs84,
}

impl Crs {
    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
        }
    }

    /// The ESRI flavoured WKT written in `.prj` files.
    pub fn wkt(&self) -> &'static str {
        match self {
            Crs::Wgs84 => {
                r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#
            }
        }
    }

    /// Returns true if a name found in a GeoJSON `crs` member or a `.prj` refers to this system.
    /// A projected system is never accepted, even when it is built on the WGS 84 datum.
    pub fn is_known_as(&self, declared: &str) -> bool {
        let declared = declared.trim().to_ascii_uppercase();
        if declared.starts_with("PROJCS")
            || declared.starts_with("PROJCRS")
            || declared.starts_with("PROJECTEDCRS")
            || declared.contains("PROJECTION")
        {
            return false;
        }
        match self {
            Crs::Wgs84 => {
                declared.contains("CRS84")
                    || declared.contains("EPSG::4326")
                    || declared.contains("EPSG:4326")
                    || declared.contains("WGS_1984")
                    || declared.contains("WGS 84")
                    || declared.contains("WGS84")
            }
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

/// An ordered list of building records with a row identity and an optional coordinate system.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    records: Vec<BuildingRecord>,
    index: Vec<RowId>,
    crs: Option<Crs>,
}

impl FeatureTable {
    pub fn new(records: Vec<BuildingRecord>) -> Self {
        let index = (0..records.len() as RowId).collect();
        Self {
            records,
            index,
            crs: None,
        }
    }

    /// Concatenate the tables in order. The index is reset and the coordinate system is left unset.
    pub fn concat(tables: impl IntoIterator<Item = FeatureTable>) -> Self {
        let records = tables.into_iter().flat_map(|table| table.records).collect();
        Self::new(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn crs(&self) -> Option<Crs> {
        self.crs
    }

    /// Tag the table with `crs` unless it already carries a coordinate system.
    /// [`Crs`] has a single variant, there is nothing to reconcile yet.
    pub fn ensure_crs(&mut self, crs: Crs) {
        self.crs.get_or_insert(crs);
    }

    pub fn records(&self) -> &[BuildingRecord] {
        &self.records
    }

    pub fn index(&self) -> &[RowId] {
        &self.index
    }

    /// Iterate over the rows along with their identity.
    pub fn rows(&self) -> impl Iterator<Item = (RowId, &BuildingRecord)> {
        self.index.iter().copied().zip(self.records.iter())
    }

    /// Keep only the rows whose id is in `rows`. Order, ids and coordinate system are preserved.
    pub fn select(&self, rows: &RoaringBitmap) -> FeatureTable {
        let (index, records) = self
            .rows()
            .filter(|(id, _)| rows.contains(*id))
            .map(|(id, record)| (id, record.clone()))
            .unzip();
        FeatureTable {
            records,
            index,
            crs: self.crs,
        }
    }
}
