//! Extraction of the `fgd:BldA` building footprints from an FGD GML document.

use std::path::Path;

use geo_types::{Coord, LineString, Polygon};
use roxmltree::{Document, Node};

use crate::config::PosListPolicy;
use crate::error::SkipReason;
use crate::table::{BuildingRecord, FeatureTable};

pub const GML_NAMESPACE: &str = "http://www.opengis.net/gml/3.2";
pub const FGD_NAMESPACE: &str = "http://fgd.gsi.go.jp/spec/2008/FGD_GMLSchema";

/// The rows extracted from one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub table: FeatureTable,
    /// How many `gml:posList` were dropped because a later one in the same feature replaced them.
    pub discarded_pos_lists: usize,
}

pub fn extract_file(path: impl AsRef<Path>, policy: PosListPolicy) -> Result<Extraction, SkipReason> {
    let content = std::fs::read_to_string(path.as_ref())
        .map_err(|err| SkipReason::Unreadable(err.to_string()))?;
    extract_polygons(&content, policy)
}

/// One row is produced for every `fgd:BldA` element, in document order.
pub fn extract_polygons(xml: &str, policy: PosListPolicy) -> Result<Extraction, SkipReason> {
    let document = Document::parse(xml).map_err(|err| SkipReason::MalformedXml(err.to_string()))?;

    let mut records = Vec::new();
    let mut discarded_pos_lists = 0;
    for (feature, building) in document
        .descendants()
        .filter(|node| is_element(node, FGD_NAMESPACE, "BldA"))
        .enumerate()
    {
        let kind = building
            .descendants()
            .find(|node| is_element(node, FGD_NAMESPACE, "type"))
            .and_then(|node| node.text())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(String::from);

        let pos_lists: Vec<Node> = building
            .descendants()
            .filter(|node| is_element(node, GML_NAMESPACE, "posList"))
            .collect();
        let Some(pos_list) = pos_lists.last() else {
            return Err(SkipReason::MissingPosList { feature });
        };
        if pos_lists.len() > 1 {
            match policy {
                PosListPolicy::Last => {
                    log::debug!(
                        "feature #{feature} has {} posList, keeping the last one",
                        pos_lists.len()
                    );
                    discarded_pos_lists += pos_lists.len() - 1;
                }
                PosListPolicy::Reject => {
                    return Err(SkipReason::MultiplePosLists {
                        feature,
                        count: pos_lists.len(),
                    });
                }
            }
        }

        let ring = parse_pos_list(pos_list.text().unwrap_or_default(), feature)?;
        records.push(BuildingRecord {
            kind,
            geometry: Polygon::new(ring, Vec::new()),
        });
    }

    Ok(Extraction {
        table: FeatureTable::new(records),
        discarded_pos_lists,
    })
}

fn is_element(node: &Node, namespace: &str, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(namespace)
}

/// The values come as `lat lon lat lon ...`, the ring is built as `(lon, lat)`.
fn parse_pos_list(text: &str, feature: usize) -> Result<LineString, SkipReason> {
    let values = text
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| SkipReason::InvalidCoordinate {
                    feature,
                    token: token.to_string(),
                })
        })
        .collect::<Result<Vec<f64>, _>>()?;
    if values.len() % 2 != 0 {
        return Err(SkipReason::OddCoordinateCount {
            feature,
            count: values.len(),
        });
    }
    let coords: Vec<Coord> = values
        .chunks_exact(2)
        .map(|pair| Coord {
            x: pair[1],
            y: pair[0],
        })
        .collect();

    // a polygon needs 3 distinct vertices, anything less can't be written as a shapefile ring
    let mut distinct: Vec<Coord> = Vec::with_capacity(3);
    for coord in &coords {
        if !distinct.contains(coord) {
            distinct.push(*coord);
            if distinct.len() == 3 {
                return Ok(LineString::new(coords));
            }
        }
    }
    Err(SkipReason::DegenerateRing {
        feature,
        count: coords.len(),
    })
}
