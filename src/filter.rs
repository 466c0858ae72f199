use geo::{Intersects, Rect};
use roaring::RoaringBitmap;
use rstar::{AABB, RTree, RTreeObject};

use crate::boundary::Boundary;
use crate::table::{Crs, FeatureTable, RowId};

struct FootprintEnvelope {
    row: RowId,
    /// Position of the row in the indexed table.
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for FootprintEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn to_aabb(rect: Rect) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

/// R-tree over the bounding box of every row of a table.
pub struct FootprintIndex {
    tree: RTree<FootprintEnvelope>,
}

impl FootprintIndex {
    pub fn build(table: &FeatureTable) -> Self {
        let envelopes = table
            .rows()
            .enumerate()
            .filter_map(|(position, (row, record))| {
                Some(FootprintEnvelope {
                    row,
                    position,
                    envelope: to_aabb(record.bounding_rect()?),
                })
            })
            .collect();
        Self {
            tree: RTree::bulk_load(envelopes),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows whose bounding box intersects `rect`. This never misses a row that truly intersects.
    pub fn candidates(&self, rect: Rect) -> RoaringBitmap {
        self.locate(rect).map(|(row, _)| row).collect()
    }

    /// Same as [`Self::candidates`] but also yields the position of each row in the indexed table.
    fn locate(&self, rect: Rect) -> impl Iterator<Item = (RowId, usize)> + '_ {
        self.tree
            .locate_in_envelope_intersecting(&to_aabb(rect))
            .map(|footprint| (footprint.row, footprint.position))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filtered {
    /// The rows intersecting the boundary with their original ids.
    pub table: FeatureTable,
    /// Rows kept by the bounding box step.
    pub candidates: RoaringBitmap,
    /// Candidates whose geometry intersects the boundary, always a subset of `candidates`.
    pub matches: RoaringBitmap,
}

/// Keep the rows intersecting the boundary.
///
/// The filtering is in 2 steps:
/// 1. We retrieve from the R-tree every row whose bounding box intersects the bounding box of the boundary
/// 2. We only run the exact intersection on these candidates
pub fn filter_with_boundary(mut table: FeatureTable, boundary: &Boundary) -> Filtered {
    table.ensure_crs(Crs::Wgs84);
    let index = FootprintIndex::build(&table);

    // 1.
    let mut candidates = RoaringBitmap::new();
    let mut matches = RoaringBitmap::new();
    for (row, position) in index.locate(boundary.bounding_rect()) {
        candidates.insert(row);
        // 2.
        if table.records()[position].geometry.intersects(boundary.shape()) {
            matches.insert(row);
        }
    }

    log::info!(
        "{} rows, {} candidates, {} intersect the boundary",
        table.len(),
        candidates.len(),
        matches.len()
    );
    Filtered {
        table: table.select(&matches),
        candidates,
        matches,
    }
}
