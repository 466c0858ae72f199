use std::path::Path;

use geo::{BooleanOps, BoundingRect, Geometry, MultiPolygon, Polygon, Rect};
use geo_types::{Coord, LineString};
use geojson::GeoJson;

use crate::table::Crs;
use crate::walker::has_extension;
use crate::{Error, Result};

/// The region of interest: every polygon of the boundary file merged into a single shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    shape: MultiPolygon,
    bounds: Rect,
}

impl Boundary {
    /// Union the polygons. Returns `None` when nothing is left.
    pub fn from_polygons(polygons: impl IntoIterator<Item = Polygon>) -> Option<Self> {
        let shape = polygons
            .into_iter()
            .fold(MultiPolygon::new(Vec::new()), |union, polygon| {
                union.union(&MultiPolygon::new(vec![polygon]))
            });
        let bounds = shape.bounding_rect()?;
        Some(Self { shape, bounds })
    }

    /// Load a GeoJSON (`.geojson`, `.json`) or an ESRI shapefile (`.shp`) boundary.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let polygons = if has_extension(path, "geojson") || has_extension(path, "json") {
            read_geojson_polygons(path)?
        } else if has_extension(path, "shp") {
            read_shapefile_polygons(path)?
        } else {
            return Err(Error::UnsupportedBoundaryFormat(path.to_path_buf()));
        };
        log::debug!("{} polygons in {}", polygons.len(), path.display());
        Self::from_polygons(polygons).ok_or_else(|| Error::EmptyBoundary(path.to_path_buf()))
    }

    pub fn shape(&self) -> &MultiPolygon {
        &self.shape
    }

    pub fn bounding_rect(&self) -> Rect {
        self.bounds
    }
}

fn read_geojson_polygons(path: &Path) -> Result<Vec<Polygon>> {
    let content = std::fs::read_to_string(path)?;
    let geojson: GeoJson = content.parse()?;
    if let Some(declared) = declared_crs(&geojson) {
        if !Crs::Wgs84.is_known_as(&declared) {
            return Err(Error::UnsupportedCrs {
                path: path.to_path_buf(),
                declared,
            });
        }
    }

    let collection = geojson::quick_collection(&geojson)?;
    let mut polygons = Vec::new();
    for geometry in collection {
        collect_polygons(geometry, &mut polygons);
    }
    Ok(polygons)
}

/// The legacy `crs` member some tools still write, ie. `{"type": "name", "properties": {"name": "EPSG:6668"}}`.
fn declared_crs(geojson: &GeoJson) -> Option<String> {
    let members = match geojson {
        GeoJson::FeatureCollection(collection) => collection.foreign_members.as_ref(),
        GeoJson::Feature(feature) => feature.foreign_members.as_ref(),
        GeoJson::Geometry(geometry) => geometry.foreign_members.as_ref(),
    }?;
    let name = members.get("crs")?.get("properties")?.get("name")?.as_str()?;
    Some(name.to_string())
}

fn collect_polygons(geometry: Geometry, polygons: &mut Vec<Polygon>) {
    match geometry {
        Geometry::Polygon(polygon) => polygons.push(polygon),
        Geometry::MultiPolygon(multi_polygon) => polygons.extend(multi_polygon),
        Geometry::Rect(rect) => polygons.push(rect.to_polygon()),
        Geometry::Triangle(triangle) => polygons.push(triangle.to_polygon()),
        Geometry::GeometryCollection(collection) => {
            for geometry in collection {
                collect_polygons(geometry, polygons);
            }
        }
        Geometry::Point(_)
        | Geometry::MultiPoint(_)
        | Geometry::Line(_)
        | Geometry::LineString(_)
        | Geometry::MultiLineString(_) => (),
    }
}

fn read_shapefile_polygons(path: &Path) -> Result<Vec<Polygon>> {
    let prj = path.with_extension("prj");
    if prj.is_file() {
        let declared = std::fs::read_to_string(&prj)?;
        if !Crs::Wgs84.is_known_as(&declared) {
            return Err(Error::UnsupportedCrs {
                path: path.to_path_buf(),
                declared: declared.trim().to_string(),
            });
        }
    }

    let shapes = shapefile::read_shapes_as::<_, shapefile::Polygon>(path)?;
    let mut polygons = Vec::new();
    for shape in shapes {
        // An outer ring opens a new polygon, the inner rings following it are its holes.
        let mut current: Option<(LineString, Vec<LineString>)> = None;
        for ring in shape.rings() {
            let (points, outer) = match ring {
                shapefile::PolygonRing::Outer(points) => (points, true),
                shapefile::PolygonRing::Inner(points) => (points, false),
            };
            let line: LineString = points
                .iter()
                .map(|point| Coord {
                    x: point.x,
                    y: point.y,
                })
                .collect();
            if outer {
                if let Some((exterior, interiors)) = current.replace((line, Vec::new())) {
                    polygons.push(Polygon::new(exterior, interiors));
                }
            } else {
                match current.as_mut() {
                    Some((_, interiors)) => interiors.push(line),
                    None => log::warn!("ignoring a hole without outer ring in {}", path.display()),
                }
            }
        }
        if let Some((exterior, interiors)) = current {
            polygons.push(Polygon::new(exterior, interiors));
        }
    }
    Ok(polygons)
}
