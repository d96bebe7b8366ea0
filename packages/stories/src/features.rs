//! Feature file discovery.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, StoryError};

/// `features/` at the workspace root.
pub fn default_features_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .parent() // packages/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.join("features"))
        .unwrap_or_else(|| PathBuf::from("features"))
}

/// All `.feature` files under `dir`, sorted by path.
///
/// The sorted list is the base order every shuffled run starts from.
pub fn discover_features(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(StoryError::FeatureDirMissing(dir.to_path_buf()));
    }

    let mut features = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "feature") {
            features.push(path.to_path_buf());
        }
    }

    if features.is_empty() {
        return Err(StoryError::NoFeatures(dir.to_path_buf()));
    }

    features.sort();
    tracing::debug!(count = features.len(), dir = %dir.display(), "Discovered features");
    Ok(features)
}

/// Name shown in run orders: the file stem.
pub fn feature_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("todos.feature"), "Feature: Todos\n").unwrap();
        fs::write(dir.path().join("api.feature"), "Feature: API\n").unwrap();
        fs::write(dir.path().join("notes.md"), "# notes\n").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/projects.feature"), "Feature: P\n").unwrap();

        let features = discover_features(dir.path()).unwrap();
        let names: Vec<String> = features.iter().map(|p| feature_name(p)).collect();
        assert_eq!(names, vec!["api", "projects", "todos"]);
    }

    #[test]
    fn test_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let err = discover_features(&missing).unwrap_err();
        assert!(matches!(err, StoryError::FeatureDirMissing(_)));
    }

    #[test]
    fn test_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_features(dir.path()).unwrap_err();
        assert!(matches!(err, StoryError::NoFeatures(_)));
    }

    #[test]
    fn test_feature_name() {
        assert_eq!(feature_name(Path::new("features/projects.feature")), "projects");
    }

    #[test]
    fn test_default_dir_points_at_workspace_features() {
        assert!(default_features_dir().ends_with("features"));
    }
}
