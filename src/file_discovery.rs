use crate::config::ScanConfig;
use crate::error::AnalysisError;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A source file found under the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub absolute_path: PathBuf,
    /// Relative to the scan root, always `/`-separated.
    pub relative_path: String,
}

pub struct FileDiscovery {
    config: ScanConfig,
}

impl FileDiscovery {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Walk `root` and return every source file, sorted by relative path.
    ///
    /// Any error from the walk itself is fatal: a partial listing would yield a
    /// graph with silently missing nodes.
    pub fn discover_files(&self, root: &Path) -> Result<Vec<DiscoveredFile>, AnalysisError> {
        if !root.is_dir() {
            return Err(AnalysisError::DirectoryList {
                path: root.to_path_buf(),
                message: "not a directory".to_string(),
            });
        }

        let exclude = self.config.exclude_patterns.clone();
        let mut walker_builder = WalkBuilder::new(root);
        walker_builder
            .standard_filters(false) // exclusion is name-based only, .gitignore is not consulted
            .hidden(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if !is_dir || entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                !exclude.iter().any(|pattern| name.contains(pattern.as_str()))
            });

        let mut files = Vec::new();
        for result in walker_builder.build() {
            let entry = result.map_err(|e| AnalysisError::DirectoryList {
                path: root.to_path_buf(),
                message: e.to_string(),
            })?;

            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file || !self.is_source_file(entry.path()) {
                continue;
            }

            let relative_path = relative_slash_path(root, entry.path());
            debug!("discovered {}", relative_path);
            files.push(DiscoveredFile {
                absolute_path: entry.path().to_path_buf(),
                relative_path,
            });
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }

    fn is_source_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy();
        self.config
            .source_extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
    }
}

fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn filters_extensions_and_excluded_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/components/Button.tsx");
        touch(dir.path(), "src/lib/db.ts");
        touch(dir.path(), "README.md");
        touch(dir.path(), "logo.png");
        touch(dir.path(), "node_modules/react/index.js");
        touch(dir.path(), ".next/server/page.js");
        touch(dir.path(), "packages/dist-utils/a.ts");
        touch(dir.path(), "scripts/build.js");

        let discovery = FileDiscovery::new(ScanConfig::default());
        let files: Vec<String> = discovery
            .discover_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|f| f.relative_path)
            .collect();

        assert_eq!(
            files,
            vec![
                "README.md".to_string(),
                "scripts/build.js".to_string(),
                "src/components/Button.tsx".to_string(),
                "src/lib/db.ts".to_string(),
            ]
        );
    }

    #[test]
    fn missing_root_is_a_directory_list_failure() {
        let dir = tempfile::tempdir().unwrap();
        let discovery = FileDiscovery::new(ScanConfig::default());
        let err = discovery.discover_files(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, AnalysisError::DirectoryList { .. }));
    }
}
