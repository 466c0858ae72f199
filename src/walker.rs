use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::Result;

/// Entries like `.DS_Store` or `._BldA.xml` produced by the OS or by archivers.
pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Recursively list the regular `.xml` files under `root` whose name contains `pattern`.
/// Entries are sorted by file name in every directory so the discovery order is stable.
/// The extension is matched case-sensitively, `BldA.XML` is not picked up.
pub fn find_xml_files(root: impl AsRef<Path>, pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let is_xml = path.extension().is_some_and(|ext| ext == "xml");
        if !entry.file_type().is_file() || is_hidden(path) || !is_xml {
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.contains(pattern));
        if matches {
            files.push(entry.into_path());
        }
    }
    log::debug!("found {} `{pattern}` xml files", files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn walk_filters_names_and_hidden_entries() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b/nested")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        for name in [
            "a/FG-GML-5640-BldA-20240101-0001.xml",
            "a/FG-GML-5640-RdEdg-20240101-0001.xml",
            "a/._FG-GML-5640-BldA-20240101-0002.xml",
            "b/nested/FG-GML-5641-BldA-20240101-0001.XML",
            "b/nested/FG-GML-5641-BldA-20240101-0002.xml",
            "b/FG-GML-5641-BldA-20240101-0001.xml.bak",
        ] {
            fs::write(root.join(name), "<x/>").unwrap();
        }
        // a directory that looks like a match must be skipped
        fs::create_dir_all(root.join("b/BldA.xml")).unwrap();

        let files: Vec<_> = find_xml_files(root, "BldA")
            .unwrap()
            .into_iter()
            .map(|path| path.strip_prefix(root).unwrap().display().to_string())
            .collect();
        assert_eq!(
            files,
            [
                "a/FG-GML-5640-BldA-20240101-0001.xml",
                "b/nested/FG-GML-5641-BldA-20240101-0002.xml",
            ]
        );
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_xml_files(dir.path().join("nope"), "BldA").is_err());
    }
}
