use crate::types::{
    Classification, ClassificationMap, ClassificationResult, DependencyEntry, FileKind,
    FileRecord, ScanResult,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    Classification,
    LinesOfCode,
    Recommendation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Filter and sort state of the file table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableQuery {
    pub classification: Option<Classification>,
    pub kind: Option<FileKind>,
    /// Case-insensitive substring of the file name or path.
    pub search: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl TableQuery {
    /// Same field flips direction; a new field starts ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = match self.sort_direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileRow<'a> {
    pub file: &'a FileRecord,
    pub result: &'a ClassificationResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileDetail<'a> {
    pub file: &'a FileRecord,
    pub result: &'a ClassificationResult,
    pub dependencies: Option<&'a DependencyEntry>,
}

/// Read-only table over one analysis run. Files without a classification are
/// left out.
pub struct FileTable<'a> {
    rows: Vec<FileRow<'a>>,
    scan: &'a ScanResult,
}

impl<'a> FileTable<'a> {
    pub fn new(scan: &'a ScanResult, classifications: &'a ClassificationMap) -> Self {
        let rows = scan
            .files
            .iter()
            .filter_map(|file| {
                classifications
                    .get(&file.path)
                    .map(|result| FileRow { file, result })
            })
            .collect();
        Self { rows, scan }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct kinds present, in name order.
    pub fn kinds(&self) -> Vec<FileKind> {
        let kinds: BTreeSet<&str> = self.rows.iter().map(|r| r.file.kind.as_str()).collect();
        kinds
            .into_iter()
            .filter_map(|name| FileKind::ALL.into_iter().find(|k| k.as_str() == name))
            .collect()
    }

    pub fn query(&self, query: &TableQuery) -> Vec<FileRow<'a>> {
        let needle = query.search.to_lowercase();
        let mut rows: Vec<FileRow<'a>> = self
            .rows
            .iter()
            .filter(|row| {
                query
                    .classification
                    .map_or(true, |c| row.result.classification == c)
            })
            .filter(|row| query.kind.map_or(true, |k| row.file.kind == k))
            .filter(|row| {
                needle.is_empty()
                    || row.file.name.to_lowercase().contains(&needle)
                    || row.file.path.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            let ordering = compare_rows(a, b, query.sort_field);
            match query.sort_direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        rows
    }

    pub fn detail(&self, path: &str) -> Option<FileDetail<'a>> {
        let row = self.rows.iter().find(|r| r.file.path == path)?;
        Some(FileDetail {
            file: row.file,
            result: row.result,
            dependencies: self.scan.dependencies.get(path),
        })
    }
}

fn compare_rows(a: &FileRow<'_>, b: &FileRow<'_>, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.file.name.to_lowercase().cmp(&b.file.name.to_lowercase()),
        SortField::Classification => a
            .result
            .classification
            .as_str()
            .cmp(b.result.classification.as_str()),
        SortField::LinesOfCode => a.file.lines_of_code.cmp(&b.file.lines_of_code),
        SortField::Recommendation => a
            .result
            .recommendation
            .as_str()
            .cmp(b.result.recommendation.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::dependency_graph::tests::file;
    use crate::dependency_graph::GraphBuilder;

    fn scan() -> ScanResult {
        let mut files = vec![
            file("src/components/SearchBar.tsx", FileKind::Component, &["../lib/analytics"]),
            file("src/lib/analytics.ts", FileKind::Utility, &[]),
            file("docs/guide.md", FileKind::Documentation, &[]),
        ];
        files[0].lines_of_code = 120;
        files[2].lines_of_code = 5;
        files.sort_by(|a, b| a.path.cmp(&b.path));
        let dependencies = GraphBuilder::new().build_dependency_map(&files);
        ScanResult {
            total_files: files.len(),
            total_lines_of_code: files.iter().map(|f| f.lines_of_code).sum(),
            files,
            dependencies,
            warnings: vec![],
            scanned_at: chrono::Utc::now(),
        }
    }

    fn paths(rows: &[FileRow<'_>]) -> Vec<String> {
        rows.iter().map(|r| r.file.path.clone()).collect()
    }

    #[test]
    fn filters_by_classification_kind_and_search() {
        let scan = scan();
        let classifications = Classifier::default().classify_files(&scan.files);
        let table = FileTable::new(&scan, &classifications);
        assert_eq!(table.len(), 3);

        let query = TableQuery {
            classification: Some(Classification::Bloat),
            ..TableQuery::default()
        };
        assert_eq!(
            paths(&table.query(&query)),
            vec!["src/lib/analytics.ts", "docs/guide.md"]
        );

        let query = TableQuery {
            search: "SEARCH".to_string(),
            ..TableQuery::default()
        };
        assert_eq!(paths(&table.query(&query)), vec!["src/components/SearchBar.tsx"]);

        let query = TableQuery {
            kind: Some(FileKind::Documentation),
            ..TableQuery::default()
        };
        assert_eq!(paths(&table.query(&query)), vec!["docs/guide.md"]);

        assert_eq!(
            table.kinds(),
            vec![FileKind::Component, FileKind::Documentation, FileKind::Utility]
        );
    }

    #[test]
    fn sorts_and_toggles_direction() {
        let scan = scan();
        let classifications = Classifier::default().classify_files(&scan.files);
        let table = FileTable::new(&scan, &classifications);

        let mut query = TableQuery::default();
        query.toggle_sort(SortField::LinesOfCode);
        assert_eq!(query.sort_direction, SortDirection::Asc);
        assert_eq!(
            paths(&table.query(&query)),
            vec!["docs/guide.md", "src/lib/analytics.ts", "src/components/SearchBar.tsx"]
        );

        query.toggle_sort(SortField::LinesOfCode);
        assert_eq!(query.sort_direction, SortDirection::Desc);
        assert_eq!(table.query(&query)[0].file.path, "src/components/SearchBar.tsx");
    }

    #[test]
    fn detail_includes_dependency_entry() {
        let scan = scan();
        let classifications = Classifier::default().classify_files(&scan.files);
        let table = FileTable::new(&scan, &classifications);

        let detail = table.detail("src/lib/analytics.ts").unwrap();
        assert_eq!(
            detail.dependencies.unwrap().dependents,
            vec!["src/components/SearchBar.tsx"]
        );
        assert!(table.detail("missing.ts").is_none());
    }
}
