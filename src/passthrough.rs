//! Passthrough copy.
//!
//! Directories listed in `passthrough` (relative to the input root) are copied
//! byte for byte to the same relative location under the output root:
//! `site/images/a/b.png` → `dist/images/a/b.png`. A listed directory that
//! does not exist is skipped.

use crate::paths;
use crate::project::Project;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PassthroughError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

#[derive(Debug, Default)]
pub struct CopyReport {
    /// Files copied, as output paths.
    pub copied: Vec<PathBuf>,
    /// Configured directories that were not found.
    pub missing: Vec<PathBuf>,
}

pub fn copy_passthrough(project: &Project) -> Result<CopyReport, PassthroughError> {
    let input = project.input_dir();
    let output = project.output_dir();
    let mut report = CopyReport::default();

    for dir in project.passthrough_dirs() {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "passthrough directory missing, skipped");
            report.missing.push(dir);
            continue;
        }
        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(dest) = paths::rebase(entry.path(), &input, &output) else {
                continue;
            };
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            report.copied.push(dest);
        }
    }
    debug!(files = report.copied.len(), "passthrough copy finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_bytes(root: &Path, rel: &str, bytes: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn copies_to_rebased_paths_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let png = [0x89, b'P', b'N', b'G', 0, 1, 2, 255];
        write_bytes(root, "site/images/a/b.png", &png);
        write_bytes(root, "site/fonts/x.woff2", b"wOF2");
        let project = Project::new(root, SiteConfig::default());

        let report = copy_passthrough(&project).unwrap();
        assert_eq!(report.copied.len(), 2);
        assert_eq!(fs::read(root.join("dist/images/a/b.png")).unwrap(), png);
        assert_eq!(fs::read(root.join("dist/fonts/x.woff2")).unwrap(), b"wOF2");
    }

    #[test]
    fn missing_directories_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_bytes(root, "site/images/logo.svg", b"<svg/>");
        let project = Project::new(root, SiteConfig::default());

        let report = copy_passthrough(&project).unwrap();
        assert_eq!(report.copied, vec![root.join("dist/images/logo.svg")]);
        assert_eq!(report.missing, vec![root.join("site/fonts")]);
    }

    #[test]
    fn copy_overwrites_previous_output() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_bytes(root, "site/images/a.txt", b"new");
        write_bytes(root, "dist/images/a.txt", b"old contents");
        let project = Project::new(root, SiteConfig::default());

        copy_passthrough(&project).unwrap();
        assert_eq!(fs::read(root.join("dist/images/a.txt")).unwrap(), b"new");
    }
}
