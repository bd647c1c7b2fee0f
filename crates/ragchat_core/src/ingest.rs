use std::collections::HashSet;
use std::path::PathBuf;

/// A local file the user asked to ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Name the backend will see and list.
    pub name: String,
    pub path: PathBuf,
}

impl UploadFile {
    /// Builds an upload from a path, naming it after the final component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { name, path }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestDiff {
    /// Files the backend does not have yet, in request order.
    pub upload: Vec<UploadFile>,
    /// Names already present on the backend.
    pub skipped: Vec<String>,
}

/// Compares requested files against what a backend already lists.
/// Names repeated within the request are uploaded once.
pub fn diff_new_files(requested: &[UploadFile], existing: &[String]) -> IngestDiff {
    let existing: HashSet<&str> = existing.iter().map(String::as_str).collect();
    let mut queued = HashSet::new();
    let mut diff = IngestDiff::default();
    for file in requested {
        if existing.contains(file.name.as_str()) {
            diff.skipped.push(file.name.clone());
        } else if queued.insert(file.name.as_str()) {
            diff.upload.push(file.clone());
        }
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<UploadFile> {
        names
            .iter()
            .map(|name| UploadFile::from_path(format!("/tmp/docs/{name}")))
            .collect()
    }

    #[test]
    fn only_missing_files_are_uploaded() {
        let diff = diff_new_files(&files(&["a.txt", "b.txt"]), &["a.txt".to_string()]);
        assert_eq!(diff.upload, files(&["b.txt"]));
        assert_eq!(diff.skipped, vec!["a.txt".to_string()]);
    }

    #[test]
    fn repeated_request_names_upload_once() {
        let diff = diff_new_files(&files(&["c.md", "c.md"]), &[]);
        assert_eq!(diff.upload.len(), 1);
        assert!(diff.skipped.is_empty());
    }

    #[test]
    fn name_comes_from_last_path_component() {
        assert_eq!(UploadFile::from_path("/var/data/report.pdf").name, "report.pdf");
    }
}
