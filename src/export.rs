use std::fs;
use std::path::{Path, PathBuf};

use geo::orient::{Direction, Orient};
use geo_types::{LineString, Polygon};
use geojson::{Feature, FeatureCollection, JsonObject, JsonValue};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, PolygonRing};

use crate::table::{Crs, FeatureTable, TYPE_FIELD};
use crate::{Error, Result, pos};

/// Longest `type` label stored in the dbf, in bytes.
const TYPE_FIELD_LENGTH: u8 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub shapefile: PathBuf,
    pub geojson: PathBuf,
    pub features: usize,
}

/// Write the table as an ESRI shapefile at `path` and as GeoJSON next to it.
///
/// Nothing is written atomically, a failure leaves whatever was already written behind.
pub fn export(table: &FeatureTable, path: impl AsRef<Path>) -> Result<ExportedFiles> {
    let shapefile = path.as_ref().to_path_buf();
    if let Some(parent) = shapefile.parent() {
        fs::create_dir_all(parent)?;
    }
    if table.is_empty() {
        log::warn!("exporting an empty table to {}", shapefile.display());
    }
    let crs = table.crs().unwrap_or(Crs::Wgs84);

    write_shapefile(table, &shapefile)?;
    fs::write(shapefile.with_extension("prj"), crs.wkt())?;
    fs::write(shapefile.with_extension("cpg"), "UTF-8")?;

    let geojson = shapefile.with_extension("geojson");
    fs::write(&geojson, to_feature_collection(table).to_string())?;

    log::info!(
        "wrote {} features to {} and {}",
        table.len(),
        shapefile.display(),
        geojson.display()
    );
    Ok(ExportedFiles {
        shapefile,
        geojson,
        features: table.len(),
    })
}

fn write_shapefile(table: &FeatureTable, path: &Path) -> Result<()> {
    let type_field = FieldName::try_from(TYPE_FIELD)
        .map_err(|_| Error::InternalFieldName(TYPE_FIELD, pos!()))?;
    let table_builder = TableWriterBuilder::new().add_character_field(type_field, TYPE_FIELD_LENGTH);
    let mut writer = shapefile::Writer::from_path(path, table_builder)?;

    for record in table.records() {
        let shape = to_shapefile_polygon(&record.geometry);
        let mut attributes = Record::default();
        attributes.insert(
            TYPE_FIELD.to_string(),
            FieldValue::Character(record.kind.as_deref().map(fit_type_field)),
        );
        writer.write_shape_and_record(&shape, &attributes)?;
    }
    // the headers are written when the writer is dropped
    drop(writer);
    Ok(())
}

/// Cut `kind` to the dbf field length without splitting a character. The GeoJSON keeps the full label.
fn fit_type_field(kind: &str) -> String {
    let max = TYPE_FIELD_LENGTH as usize;
    if kind.len() <= max {
        return kind.to_string();
    }
    let end = (0..=max).rev().find(|&i| kind.is_char_boundary(i)).unwrap_or(0);
    log::warn!("`{kind}` is longer than {max} bytes, the shapefile stores `{}`", &kind[..end]);
    kind[..end].to_string()
}

/// Shapefiles want the outer rings clockwise and the holes counter-clockwise.
fn to_shapefile_polygon(polygon: &Polygon) -> shapefile::Polygon {
    let polygon = polygon.orient(Direction::Reversed);
    let points = |ring: &LineString| -> Vec<Point> {
        ring.coords()
            .map(|coord| Point::new(coord.x, coord.y))
            .collect()
    };
    let mut rings = vec![PolygonRing::Outer(points(polygon.exterior()))];
    rings.extend(
        polygon
            .interiors()
            .iter()
            .map(|interior| PolygonRing::Inner(points(interior))),
    );
    shapefile::Polygon::with_rings(rings)
}

fn to_feature_collection(table: &FeatureTable) -> FeatureCollection {
    let features = table
        .records()
        .iter()
        .map(|record| {
            let mut properties = JsonObject::new();
            let kind = match &record.kind {
                Some(kind) => JsonValue::String(kind.clone()),
                None => JsonValue::Null,
            };
            properties.insert(TYPE_FIELD.to_string(), kind);
            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(
                    &record.geometry,
                ))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
