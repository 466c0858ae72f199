use std::path::PathBuf;

use crate::config::PosListPolicy;
use crate::error::SkipReason;
use crate::gml::extract_file;
use crate::progress::Progress;
use crate::table::FeatureTable;

#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    Extracted {
        rows: usize,
        discarded_pos_lists: usize,
    },
    Skipped {
        reason: SkipReason,
    },
}

/// What happened to one XML file during the merge.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, FileStatus::Skipped { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub table: FeatureTable,
    pub files: Vec<FileOutcome>,
}

/// Extract every file in order and concatenate the rows. Files that cannot be extracted are
/// logged, recorded in the outcome and contribute nothing.
pub fn merge_xml_files(
    files: impl IntoIterator<Item = PathBuf>,
    policy: PosListPolicy,
    progress: Progress,
) -> MergeOutcome {
    let files: Vec<PathBuf> = files.into_iter().collect();
    let bar = progress.bar(files.len(), "extracting");

    let mut tables = Vec::with_capacity(files.len());
    let mut outcomes = Vec::with_capacity(files.len());
    for path in files {
        let status = match extract_file(&path, policy) {
            Ok(extraction) => {
                let status = FileStatus::Extracted {
                    rows: extraction.table.len(),
                    discarded_pos_lists: extraction.discarded_pos_lists,
                };
                tables.push(extraction.table);
                status
            }
            Err(reason) => {
                log::warn!("skipping {}: {reason}", path.display());
                FileStatus::Skipped { reason }
            }
        };
        outcomes.push(FileOutcome { path, status });
        bar.inc(1);
    }
    bar.finish_and_clear();

    let table = FeatureTable::concat(tables);
    log::info!(
        "merged {} rows from {} files ({} skipped)",
        table.len(),
        outcomes.len(),
        outcomes.iter().filter(|outcome| outcome.is_skipped()).count()
    );
    MergeOutcome {
        table,
        files: outcomes,
    }
}
