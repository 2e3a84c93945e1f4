//! Mapping raw import specifiers onto scanned files.

use crate::types::FileRecord;

/// Strategy for turning an import specifier into the scanned files it refers to.
///
/// Implementations must never return `importer` itself. A specifier that maps to
/// nothing is treated as an external package and simply contributes no edge.
pub trait ImportResolver: Send + Sync {
    fn resolve(&self, specifier: &str, importer: &str, files: &[FileRecord]) -> Vec<String>;
}

/// Substring/suffix matching against the known file set.
///
/// A file matches when its path contains the specifier, when its file name
/// equals the specifier, or, for `./` and `../` specifiers, when its path (with
/// or without extension) ends with the specifier minus its leading relative
/// markers. This over-matches similarly named files and misses imports that
/// need real module resolution (aliases, index files); both are accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicResolver;

impl HeuristicResolver {
    pub fn new() -> Self {
        Self
    }

    fn matches(&self, specifier: &str, file: &FileRecord) -> bool {
        if file.path.contains(specifier) || file.name == specifier {
            return true;
        }

        if is_relative(specifier) {
            let stripped = strip_relative_markers(specifier);
            if stripped.is_empty() {
                return false;
            }
            return file.path.ends_with(stripped) || strip_extension(&file.path).ends_with(stripped);
        }

        false
    }
}

impl ImportResolver for HeuristicResolver {
    fn resolve(&self, specifier: &str, importer: &str, files: &[FileRecord]) -> Vec<String> {
        if specifier.is_empty() {
            return Vec::new();
        }

        files
            .iter()
            .filter(|file| file.path != importer && self.matches(specifier, file))
            .map(|file| file.path.clone())
            .collect()
    }
}

pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

fn strip_relative_markers(specifier: &str) -> &str {
    let mut rest = specifier;
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
        } else {
            return rest;
        }
    }
}

fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..name_start + dot],
        _ => path,
    }
}
