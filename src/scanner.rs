use crate::config::ScanConfig;
use crate::dependency_graph::GraphBuilder;
use crate::error::AnalysisError;
use crate::file_discovery::{DiscoveredFile, FileDiscovery};
use crate::resolver::{HeuristicResolver, ImportResolver};
use crate::simple_parser::{SimpleParser, SourceFile};
use crate::types::{FileRecord, ScanResult, ScanWarning};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Scanner {
    discovery: FileDiscovery,
    parser: SimpleParser,
    resolver: Arc<dyn ImportResolver>,
}

enum FileOutcome {
    Parsed(FileRecord),
    Skipped(ScanWarning),
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Result<Self, AnalysisError> {
        Self::with_resolver(config, Arc::new(HeuristicResolver::new()))
    }

    pub fn with_resolver(
        config: ScanConfig,
        resolver: Arc<dyn ImportResolver>,
    ) -> Result<Self, AnalysisError> {
        Ok(Self {
            discovery: FileDiscovery::new(config),
            parser: SimpleParser::new()?,
            resolver,
        })
    }

    /// Scan `root` into records plus the forward/reverse dependency map.
    ///
    /// Files are read and parsed in parallel. The dependency map is only built
    /// once every record exists. A file that cannot be read is skipped and
    /// leaves a warning; a failing directory walk aborts the scan.
    pub fn scan(&self, root: &Path) -> Result<ScanResult, AnalysisError> {
        let discovered = self.discovery.discover_files(root)?;
        info!("Discovered {} source files", discovered.len());
        Ok(self.scan_discovered(&discovered))
    }

    fn scan_discovered(&self, discovered: &[DiscoveredFile]) -> ScanResult {
        let outcomes: Vec<FileOutcome> = discovered
            .par_iter()
            .map(|file| self.scan_file(file))
            .collect();

        let mut files = Vec::with_capacity(outcomes.len());
        let mut warnings = Vec::new();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Parsed(record) => files.push(record),
                FileOutcome::Skipped(warning) => warnings.push(warning),
            }
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let dependencies =
            GraphBuilder::with_resolver(Arc::clone(&self.resolver)).build_dependency_map(&files);

        ScanResult {
            total_files: files.len(),
            total_lines_of_code: files.iter().map(|f| f.lines_of_code).sum(),
            files,
            dependencies,
            warnings,
            scanned_at: chrono::Utc::now(),
        }
    }

    fn scan_file(&self, file: &DiscoveredFile) -> FileOutcome {
        match self.read_file(file) {
            Ok((size, content)) => {
                debug!("parsed {}", file.relative_path);
                FileOutcome::Parsed(self.parser.parse(&SourceFile {
                    relative_path: &file.relative_path,
                    size,
                    content: &content,
                }))
            }
            Err(err) => {
                warn!("Skipping {}: {}", file.relative_path, err);
                FileOutcome::Skipped(ScanWarning {
                    path: file.relative_path.clone(),
                    message: err.to_string(),
                })
            }
        }
    }

    fn read_file(&self, file: &DiscoveredFile) -> Result<(u64, String), AnalysisError> {
        let to_error = |source| AnalysisError::FileRead {
            path: file.absolute_path.clone(),
            source,
        };
        let size = fs::metadata(&file.absolute_path).map_err(to_error)?.len();
        let bytes = fs::read(&file.absolute_path).map_err(to_error)?;
        Ok((size, String::from_utf8_lossy(&bytes).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileKind;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn scans_records_and_dependents() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "src/components/Header.tsx",
            "import React from 'react';\nimport { cn } from '../lib/cn';\n\nexport default function Header() {\n  return <header className={cn('h')} />;\n}\n",
        );
        write(
            dir.path(),
            "src/lib/cn.ts",
            "// join class names\nexport function cn(...xs: string[]) {\n  return xs.join(' ');\n}\n",
        );

        let scanner = Scanner::new(ScanConfig::default()).unwrap();
        let result = scanner.scan(dir.path()).unwrap();

        assert_eq!(result.total_files, 2);
        assert!(result.warnings.is_empty());
        assert_eq!(result.files[0].path, "src/components/Header.tsx");
        assert_eq!(result.files[0].kind, FileKind::Component);
        assert_eq!(result.files[0].dependencies, vec!["react", "../lib/cn"]);
        assert_eq!(result.files[1].lines_of_code, 3);
        assert_eq!(
            result.total_lines_of_code,
            result.files.iter().map(|f| f.lines_of_code).sum::<usize>()
        );
        assert_eq!(
            result.dependencies["src/lib/cn.ts"].dependents,
            vec!["src/components/Header.tsx"]
        );
        assert!(result.get("src/lib/cn.ts").is_some());
    }

    #[test]
    fn unreadable_file_becomes_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = Scanner::new(ScanConfig::default()).unwrap();
        let vanished = DiscoveredFile {
            absolute_path: dir.path().join("src/gone.ts"),
            relative_path: "src/gone.ts".to_string(),
        };

        match scanner.scan_file(&vanished) {
            FileOutcome::Skipped(warning) => {
                assert_eq!(warning.path, "src/gone.ts");
                assert!(!warning.message.is_empty());
            }
            FileOutcome::Parsed(_) => panic!("a missing file must not produce a record"),
        }
    }

    #[test]
    fn scan_keeps_other_records_next_to_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/lib/a.ts", "export const a = 1;\n");
        write(dir.path(), "src/lib/b.ts", "import { a } from './a';\nexport const b = a;\n");

        let scanner = Scanner::new(ScanConfig::default()).unwrap();
        let mut discovered = scanner.discovery.discover_files(dir.path()).unwrap();
        discovered.push(DiscoveredFile {
            absolute_path: dir.path().join("src/lib/gone.ts"),
            relative_path: "src/lib/gone.ts".to_string(),
        });

        let result = scanner.scan_discovered(&discovered);
        assert_eq!(result.total_files, 2);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].path, "src/lib/gone.ts");
        assert!(result.get("src/lib/gone.ts").is_none());
        assert!(!result.dependencies.contains_key("src/lib/gone.ts"));
        assert_eq!(
            result.dependencies["src/lib/a.ts"].dependents,
            vec!["src/lib/b.ts"]
        );
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("src/lib/bytes.ts");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"export const a = 1;\n\xff\xfe\n").unwrap();

        let result = Scanner::new(ScanConfig::default())
            .unwrap()
            .scan(dir.path())
            .unwrap();
        assert_eq!(result.total_files, 1);
        assert_eq!(result.files[0].exports, vec!["a"]);
    }

    #[test]
    fn missing_root_fails_the_scan() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = Scanner::new(ScanConfig::default()).unwrap();
        let err = scanner.scan(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, AnalysisError::DirectoryList { .. }));
    }
}
