use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::archive::unzip_all;
use crate::boundary::Boundary;
use crate::config::Config;
use crate::export::{ExportedFiles, export};
use crate::filter::filter_with_boundary;
use crate::merge::{FileOutcome, FileStatus, merge_xml_files};
use crate::progress::Progress;
use crate::walker::{find_xml_files, is_hidden};
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryReport {
    pub name: String,
    pub archives: Vec<PathBuf>,
    pub files: Vec<FileOutcome>,
    /// Rows after the merge.
    pub merged: usize,
    /// Rows kept by the bounding box step, `None` when no boundary is configured.
    pub candidates: Option<u64>,
    pub exported: ExportedFiles,
}

impl DirectoryReport {
    pub fn skipped(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|outcome| outcome.is_skipped())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub directories: Vec<DirectoryReport>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for directory in &self.directories {
            write!(
                f,
                "{}: {} archives, {} files, {} rows merged",
                directory.name,
                directory.archives.len(),
                directory.files.len(),
                directory.merged
            )?;
            if let Some(candidates) = directory.candidates {
                write!(f, ", {candidates} candidates")?;
            }
            writeln!(
                f,
                ", {} rows written to {}",
                directory.exported.features,
                directory.exported.shapefile.display()
            )?;
            for outcome in directory.skipped() {
                if let FileStatus::Skipped { reason } = &outcome.status {
                    writeln!(f, "  skipped {}: {reason}", outcome.path.display())?;
                }
            }
        }
        Ok(())
    }
}

/// Process every sub-directory of `config.zip_dir`, one after the other:
/// unzip, merge the matching xml files, clip them to the boundary if any, and export.
pub fn run(config: &Config) -> Result<RunReport> {
    let progress = Progress::new(config.progress);
    let boundary = match &config.boundary {
        Some(path) => {
            log::info!("loading the boundary {}", path.display());
            Some(Boundary::from_path(path)?)
        }
        None => None,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(&config.zip_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() && !is_hidden(&entry.path()) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    let mut report = RunReport::default();
    for name in names {
        log::info!("processing `{name}`");
        let extract_dir = config.extract_dir.join(&name);
        let archives = unzip_all(config.zip_dir.join(&name), &extract_dir, progress)?;

        let files = find_xml_files(&extract_dir, &config.file_pattern)?;
        let merged = merge_xml_files(files, config.pos_list_policy, progress);
        let merged_rows = merged.table.len();

        let (table, candidates) = match &boundary {
            Some(boundary) => {
                let filtered = filter_with_boundary(merged.table, boundary);
                (filtered.table, Some(filtered.candidates.len()))
            }
            None => (merged.table, None),
        };

        let output = config.output_dir.join(&name).join(&config.output_name);
        let exported = export(&table, output)?;

        report.directories.push(DirectoryReport {
            name,
            archives,
            files: merged.files,
            merged: merged_rows,
            candidates,
            exported,
        });
    }
    Ok(report)
}
