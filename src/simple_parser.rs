//! Pattern-based extraction of per-file metadata.
//!
//! Not a real parser: imports, exports, markup detection and the complexity
//! proxy are all regex matches over the raw text.

use crate::error::AnalysisError;
use crate::types::{
    ApiInfo, ComponentInfo, ExecutionFrequency, FileDetails, FileKind, FileRecord, ScriptCategory,
    ScriptInfo,
};
use regex::Regex;
use std::collections::HashSet;

const CONFIG_FILES: &[&str] = &[
    "package.json",
    "tsconfig.json",
    "next.config.js",
    "tailwind.config.js",
    "jest.config.js",
    "eslint.config.js",
    ".eslintrc.json",
    ".prettierrc",
    "docker-compose.yml",
    "vercel.json",
    "playwright.config.ts",
];

const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH"];

#[derive(Clone)]
struct SourcePatterns {
    import_from: Regex,
    require_call: Regex,
    export_declaration: Regex,
    export_list: Regex,
    default_function_markup: Regex,
    arrow_component_markup: Regex,
    default_export_name: Regex,
    hook: Regex,
    props_interface: Regex,
    prop_field: Regex,
    api_route: Regex,
    async_handler: Regex,
    complexity: Vec<Regex>,
}

/// Input to [`SimpleParser::parse`] for one file.
pub struct SourceFile<'a> {
    pub relative_path: &'a str,
    pub size: u64,
    pub content: &'a str,
}

#[derive(Clone)]
pub struct SimpleParser {
    patterns: SourcePatterns,
}

impl SimpleParser {
    pub fn new() -> Result<Self, AnalysisError> {
        let patterns = SourcePatterns {
            import_from: Regex::new(r#"import\s+.*?\s+from\s+['"`]([^'"`]+)['"`]"#)?,
            require_call: Regex::new(r#"require\(['"`]([^'"`]+)['"`]\)"#)?,
            export_declaration: Regex::new(
                r"export\s+(?:default\s+)?(?:const|let|var|function|class|interface|type)\s+(\w+)",
            )?,
            export_list: Regex::new(r"export\s*\{\s*([^}]+)\s*\}")?,
            default_function_markup: Regex::new(
                r"export\s+(?:default\s+)?function\s+\w+.*\{[\s\S]*return\s*\([\s\S]*<",
            )?,
            arrow_component_markup: Regex::new(
                r"const\s+\w+\s*=\s*\([^)]*\)\s*=>\s*\{[\s\S]*return\s*\([\s\S]*<",
            )?,
            default_export_name: Regex::new(r"export\s+default\s+(?:function\s+)?(\w+)")?,
            hook: Regex::new(r"use[A-Z]\w*")?,
            props_interface: Regex::new(r"interface\s+\w*Props\s*\{([^}]+)\}")?,
            prop_field: Regex::new(r"(\w+)\??:")?,
            api_route: Regex::new(r"/api/(.+)\.(?:ts|js)$")?,
            async_handler: Regex::new(r"export\s+async\s+function\s+(\w+)")?,
            complexity: vec![
                Regex::new(r"if\s*\(")?,
                Regex::new(r"\?\s*:")?,
                Regex::new(r"switch\s*\(")?,
                Regex::new(r"for\s*\(")?,
                Regex::new(r"while\s*\(")?,
                Regex::new(r"\.map\s*\(")?,
                Regex::new(r"\.filter\s*\(")?,
                Regex::new(r"function\s+\w+")?,
                Regex::new(r"=>\s*\{")?,
            ],
        };

        Ok(Self { patterns })
    }

    /// Build the complete record for one file.
    pub fn parse(&self, source: &SourceFile<'_>) -> FileRecord {
        let path = source.relative_path;
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        let extension = extension_of(&name);
        let kind = self.determine_file_kind(path, source.content);

        let details = match kind {
            FileKind::Component => FileDetails::Component(self.analyze_component(&name, source.content)),
            FileKind::Api => FileDetails::Api(self.analyze_api(path, source.content)),
            FileKind::Script => FileDetails::Script(analyze_script(path)),
            _ => FileDetails::General,
        };

        FileRecord {
            path: path.to_string(),
            name,
            extension,
            kind,
            size: source.size,
            lines_of_code: count_lines_of_code(source.content),
            dependencies: self.extract_dependencies(source.content),
            exports: self.extract_exports(source.content),
            is_test_file: is_test_file(path),
            details,
        }
    }

    pub fn extract_dependencies(&self, content: &str) -> Vec<String> {
        let from_imports = self
            .patterns
            .import_from
            .captures_iter(content)
            .filter_map(|c| c.get(1));
        let from_requires = self
            .patterns
            .require_call
            .captures_iter(content)
            .filter_map(|c| c.get(1));

        dedup_preserving_order(from_imports.chain(from_requires).map(|m| m.as_str().to_string()))
    }

    /// Declared export names; for `export { a as b }` the local name `a` is kept.
    pub fn extract_exports(&self, content: &str) -> Vec<String> {
        let mut exports: Vec<String> = self
            .patterns
            .export_declaration
            .captures_iter(content)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect();

        for captures in self.patterns.export_list.captures_iter(content) {
            if let Some(list) = captures.get(1) {
                exports.extend(
                    list.as_str()
                        .split(',')
                        .map(|item| item.trim().split(" as ").next().unwrap_or("").trim().to_string())
                        .filter(|item| !item.is_empty()),
                );
            }
        }

        dedup_preserving_order(exports)
    }

    /// First matching rule wins.
    pub fn determine_file_kind(&self, path: &str, content: &str) -> FileKind {
        if is_test_file(path) {
            return FileKind::Test;
        }
        if path.contains("/api/") {
            return FileKind::Api;
        }
        if path.contains("/app/") || path.contains("/pages/") {
            return FileKind::Page;
        }
        if path.contains("/components/") && (path.ends_with(".tsx") || path.ends_with(".jsx")) {
            return FileKind::Component;
        }
        if path.contains("/scripts/") || (path.ends_with(".js") && !path.contains("/src/")) {
            return FileKind::Script;
        }
        if is_config_file(path) {
            return FileKind::Config;
        }
        if path.ends_with(".md") || path.contains("/docs/") {
            return FileKind::Documentation;
        }
        if path.ends_with(".css") || path.ends_with(".scss") || path.ends_with(".sass") {
            return FileKind::Style;
        }
        if self.looks_like_component(content) {
            return FileKind::Component;
        }
        if path.contains("/utils/") || path.contains("/lib/") {
            return FileKind::Utility;
        }
        FileKind::Unknown
    }

    /// Either a framework import or a function returning markup is enough.
    pub fn is_ui_component(&self, content: &str) -> bool {
        imports_react(content) || self.returns_markup(content)
    }

    /// Kind fallback for files outside `/components/`: needs both signals, so
    /// hooks and helpers that only import React stay out.
    pub fn looks_like_component(&self, content: &str) -> bool {
        imports_react(content) && self.returns_markup(content)
    }

    fn returns_markup(&self, content: &str) -> bool {
        self.patterns.default_function_markup.is_match(content)
            || self.patterns.arrow_component_markup.is_match(content)
    }

    fn analyze_component(&self, file_name: &str, content: &str) -> ComponentInfo {
        let component_name = self
            .patterns
            .default_export_name
            .captures(content)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| stem_of(file_name).to_string());

        ComponentInfo {
            component_name,
            is_ui_component: self.is_ui_component(content),
            hooks: dedup_preserving_order(
                self.patterns.hook.find_iter(content).map(|m| m.as_str().to_string()),
            ),
            props: self.extract_props(content),
            complexity: self.calculate_complexity(content),
        }
    }

    fn extract_props(&self, content: &str) -> Vec<String> {
        let Some(body) = self
            .patterns
            .props_interface
            .captures(content)
            .and_then(|c| c.get(1))
        else {
            return Vec::new();
        };

        self.patterns
            .prop_field
            .captures_iter(body.as_str())
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Additive count of branching and function constructs.
    pub fn calculate_complexity(&self, content: &str) -> usize {
        self.patterns
            .complexity
            .iter()
            .map(|pattern| pattern.find_iter(content).count())
            .sum()
    }

    fn analyze_api(&self, path: &str, content: &str) -> ApiInfo {
        let route = self
            .patterns
            .api_route
            .captures(path)
            .and_then(|c| c.get(1))
            .map(|m| format!("/{}", m.as_str()))
            .unwrap_or_default();

        let method = HTTP_METHODS
            .iter()
            .find(|method| content.contains(&format!("export async function {}", method)))
            .map(|method| method.to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string());

        let handlers = self
            .patterns
            .async_handler
            .captures_iter(content)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect();

        ApiInfo { route, method, handlers }
    }
}

fn analyze_script(path: &str) -> ScriptInfo {
    ScriptInfo {
        category: script_category(path),
        execution_frequency: execution_frequency(path),
    }
}

fn script_category(path: &str) -> ScriptCategory {
    if path.contains("build") || path.contains("deploy") {
        ScriptCategory::Build
    } else if path.contains("test") {
        ScriptCategory::Test
    } else if path.contains("dev") || path.contains("watch") {
        ScriptCategory::Dev
    } else if path.contains("populate") || path.contains("migrate") || path.contains("setup") {
        ScriptCategory::Automation
    } else {
        ScriptCategory::Utility
    }
}

fn execution_frequency(path: &str) -> ExecutionFrequency {
    if path.contains("build") || path.contains("dev") {
        ExecutionFrequency::High
    } else if path.contains("test") || path.contains("setup") {
        ExecutionFrequency::Medium
    } else if path.contains("populate") || path.contains("migrate") {
        ExecutionFrequency::Low
    } else {
        ExecutionFrequency::Unknown
    }
}

/// Non-blank lines that do not open with `//`, `/*` or `*`.
pub fn count_lines_of_code(content: &str) -> usize {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| {
            !line.is_empty() && !line.starts_with("//") && !line.starts_with("/*") && !line.starts_with('*')
        })
        .count()
}

fn imports_react(content: &str) -> bool {
    content.contains("import React")
        || content.contains("from \"react\"")
        || content.contains("from 'react'")
}

pub fn is_test_file(path: &str) -> bool {
    path.contains(".test.") || path.contains(".spec.") || path.contains("/__tests__/")
}

fn is_config_file(path: &str) -> bool {
    CONFIG_FILES.iter().any(|config| path.ends_with(config))
}

fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[idx..].to_string(),
        _ => String::new(),
    }
}

fn stem_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

fn dedup_preserving_order<I: IntoIterator<Item = String>>(items: I) -> Vec<String> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> SimpleParser {
        SimpleParser::new().unwrap()
    }

    fn parse(path: &str, content: &str) -> FileRecord {
        parser().parse(&SourceFile {
            relative_path: path,
            size: content.len() as u64,
            content,
        })
    }

    #[test]
    fn counts_code_lines_only() {
        let content = "// header\n\nconst a = 1;\n/* block\n * body\n */\n  let b = 2;\n";
        assert_eq!(count_lines_of_code(content), 2);
        assert!(count_lines_of_code(content) <= content.split('\n').count());
        assert_eq!(count_lines_of_code(""), 0);
    }

    #[test]
    fn extracts_imports_and_requires_once_each() {
        let content = r#"
import React from 'react';
import { useState } from "react";
import Button from './Button';
const fs = require('fs');
const again = require("fs");
"#;
        assert_eq!(
            parser().extract_dependencies(content),
            vec!["react".to_string(), "./Button".to_string(), "fs".to_string()]
        );
    }

    #[test]
    fn extracts_declared_and_listed_exports() {
        let content = r#"
export default function LoginForm() {}
export const helper = 1;
export interface LoginProps {}
export { alpha, beta as gamma, };
export { alpha };
"#;
        assert_eq!(
            parser().extract_exports(content),
            vec![
                "LoginForm".to_string(),
                "helper".to_string(),
                "LoginProps".to_string(),
                "alpha".to_string(),
                "beta".to_string(),
            ]
        );
    }

    #[test]
    fn kind_priority_chain() {
        let p = parser();
        assert_eq!(p.determine_file_kind("src/api/__tests__/x.ts", ""), FileKind::Test);
        assert_eq!(p.determine_file_kind("src/app/api/users/route.ts", ""), FileKind::Api);
        assert_eq!(p.determine_file_kind("src/app/page.tsx", ""), FileKind::Page);
        assert_eq!(p.determine_file_kind("src/components/Card.tsx", ""), FileKind::Component);
        assert_eq!(p.determine_file_kind("src/components/card.ts", ""), FileKind::Unknown);
        assert_eq!(p.determine_file_kind("tools/scripts/seed.ts", ""), FileKind::Script);
        assert_eq!(p.determine_file_kind("next.config.js", ""), FileKind::Script);
        assert_eq!(p.determine_file_kind("tsconfig.json", ""), FileKind::Config);
        assert_eq!(p.determine_file_kind("README.md", ""), FileKind::Documentation);
        assert_eq!(p.determine_file_kind("src/lib/db.ts", ""), FileKind::Utility);
        assert_eq!(
            p.determine_file_kind(
                "src/lib/widget.ts",
                "import React from 'react';\nexport function Widget() {\n  return (\n    <div />\n  );\n}\n",
            ),
            FileKind::Component
        );
    }

    #[test]
    fn react_hook_file_is_not_a_component() {
        let p = parser();
        let content = "import { useState } from 'react';\n\nexport function useToggle() {\n  const [v, s] = useState(false);\n  return [v, s];\n}\n";
        assert!(p.is_ui_component(content));
        assert!(!p.looks_like_component(content));
        assert_eq!(p.determine_file_kind("src/hooks/useToggle.ts", content), FileKind::Unknown);
        assert_eq!(p.determine_file_kind("src/lib/useToggle.ts", content), FileKind::Utility);
    }

    #[test]
    fn component_details() {
        let content = r#"import React, { useState, useEffect } from 'react';

interface CardProps {
  title: string;
  subtitle?: string;
}

export default function CompanyCard({ title }: CardProps) {
  const [open, setOpen] = useState(false);
  useEffect(() => { if (open) { setOpen(false); } }, [open]);
  return (<div>{title}</div>);
}
"#;
        let record = parse("src/components/CompanyCard.tsx", content);
        let info = record.component().unwrap();
        assert_eq!(info.component_name, "CompanyCard");
        assert!(info.is_ui_component);
        assert_eq!(info.hooks, vec!["useState".to_string(), "useEffect".to_string()]);
        assert_eq!(info.props, vec!["title".to_string(), "subtitle".to_string()]);
        // if(, the `?:` of `subtitle?:`, `function CompanyCard`, `=> {`
        assert_eq!(info.complexity, 4);
    }

    #[test]
    fn component_name_falls_back_to_file_stem() {
        let record = parse("src/components/Badge.tsx", "const x = 1;");
        assert_eq!(record.component().unwrap().component_name, "Badge");
    }

    #[test]
    fn api_details() {
        let content = "export async function GET(req) {}\nexport async function POST(req) {}\n";
        let record = parse("src/pages/api/reviews/index.ts", content);
        assert_eq!(record.kind, FileKind::Api);
        let api = record.api().unwrap();
        assert_eq!(api.route, "/reviews/index");
        assert_eq!(api.method, "GET");
        assert_eq!(api.handlers, vec!["GET".to_string(), "POST".to_string()]);

        let unknown = parse("src/api/thing.tsx", "export default 1");
        assert_eq!(unknown.api().unwrap().method, "UNKNOWN");
        assert_eq!(unknown.api().unwrap().route, "");
    }

    #[test]
    fn script_details() {
        let build = parse("scripts/deploy.js", "");
        assert_eq!(build.script().unwrap().category, ScriptCategory::Build);
        let populate = parse("scripts/populate-companies.js", "");
        let info = populate.script().unwrap();
        assert_eq!(info.category, ScriptCategory::Automation);
        assert_eq!(info.execution_frequency, ExecutionFrequency::Low);
        let other = parse("tools/scripts/cleanup.ts", "");
        assert_eq!(other.script().unwrap().category, ScriptCategory::Utility);
        assert_eq!(other.script().unwrap().execution_frequency, ExecutionFrequency::Unknown);
    }

    #[test]
    fn record_basics() {
        let record = parse("src/components/LoginForm.test.tsx", "it('works', () => {});");
        assert_eq!(record.name, "LoginForm.test.tsx");
        assert_eq!(record.extension, ".tsx");
        assert!(record.is_test_file);
        assert_eq!(record.kind, FileKind::Test);
        assert_eq!(record.details, FileDetails::General);
    }
}
