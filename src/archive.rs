use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::Result;
use crate::progress::Progress;
use crate::walker::{has_extension, is_hidden};

/// Expand every `.zip` found directly in `zip_dir` into `output_dir`, in file name order.
///
/// Files sharing a relative path across archives are overwritten by the later archive.
/// A corrupt archive stops everything.
pub fn unzip_all(
    zip_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    progress: Progress,
) -> Result<Vec<PathBuf>> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let mut archives = Vec::new();
    for entry in fs::read_dir(zip_dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && !is_hidden(&path) && has_extension(&path, "zip") {
            archives.push(path);
        }
    }
    archives.sort();

    let bar = progress.bar(archives.len(), "unzipping");
    for path in &archives {
        log::debug!("extracting {} into {}", path.display(), output_dir.display());
        let file = BufReader::new(File::open(path)?);
        let mut archive = ZipArchive::new(file)?;
        archive.extract(output_dir)?;
        bar.inc(1);
    }
    bar.finish_and_clear();

    log::info!(
        "extracted {} archives into {}",
        archives.len(),
        output_dir.display()
    );
    Ok(archives)
}
