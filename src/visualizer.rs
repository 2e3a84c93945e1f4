//! Text and layout renderings of the import graph: Mermaid, an indented
//! dependents tree, aggregate statistics and a positioned graph view.

use crate::config::VisualizationConfig;
use crate::dependency_graph::{DependencyGraph, DependencyGraphNode};
use crate::types::{Classification, ClassificationMap};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::f64::consts::PI;
use std::fmt::Write;

pub const MAX_TREE_DEPTH: usize = 10;
const BASE_NODE_SIZE: f64 = 8.0;
const MAX_CONNECTIVITY_BONUS: f64 = 12.0;

pub struct DependencyVisualizer<'a> {
    graph: &'a DependencyGraph,
    classifications: &'a ClassificationMap,
}

impl<'a> DependencyVisualizer<'a> {
    pub fn new(graph: &'a DependencyGraph, classifications: &'a ClassificationMap) -> Self {
        Self {
            graph,
            classifications,
        }
    }

    fn classification_of(&self, path: &str) -> Option<Classification> {
        self.classifications.get(path).map(|r| r.classification)
    }

    /// Mermaid `graph TD` of the `max_nodes` most important files.
    pub fn mermaid_diagram(&self, max_nodes: usize) -> String {
        let selected = self.select_important_nodes(max_nodes);
        let selected_paths: HashSet<&str> = selected.iter().map(|n| n.path.as_str()).collect();

        let mut mermaid = String::from("graph TD\n");
        for node in &selected {
            let style = match self.classification_of(&node.path) {
                Some(Classification::Essential) => ":::essential",
                Some(Classification::NiceToHave) => ":::niceToHave",
                Some(Classification::Bloat) => ":::bloat",
                None => "",
            };
            let _ = writeln!(
                mermaid,
                "    {}[{}]{}",
                sanitize_id(&node.path),
                sanitize_label(file_name(&node.path)),
                style
            );
        }

        for node in self.graph.nodes() {
            if !selected_paths.contains(node.path.as_str()) {
                continue;
            }
            for dep in &node.dependencies {
                if selected_paths.contains(dep.as_str()) {
                    let _ = writeln!(mermaid, "    {} --> {}", sanitize_id(&node.path), sanitize_id(dep));
                }
            }
        }

        mermaid.push_str("\n    classDef essential fill:#d4edda,stroke:#155724,stroke-width:2px\n");
        mermaid.push_str("    classDef niceToHave fill:#fff3cd,stroke:#856404,stroke-width:2px\n");
        mermaid.push_str("    classDef bloat fill:#f8d7da,stroke:#721c24,stroke-width:2px\n");
        mermaid
    }

    /// Ranks by connectivity times classification weight. Ties keep path order.
    fn select_important_nodes(&self, max_nodes: usize) -> Vec<&'a DependencyGraphNode> {
        let mut nodes: Vec<&DependencyGraphNode> = self.graph.nodes().collect();
        nodes.sort_by_key(|node| std::cmp::Reverse(self.importance(node)));
        nodes.truncate(max_nodes);
        nodes
    }

    fn importance(&self, node: &DependencyGraphNode) -> usize {
        let weight = match self.classification_of(&node.path) {
            Some(Classification::Essential) => 3,
            Some(Classification::NiceToHave) => 2,
            _ => 1,
        };
        (node.dependencies.len() + node.dependents.len()) * weight
    }

    /// Indented tree of who depends on `root`, two spaces per level.
    ///
    /// Without a root the first file that imports nothing is used. A file
    /// already on the current branch, or one deeper than [`MAX_TREE_DEPTH`], is
    /// printed once with a marker and not expanded.
    pub fn dependency_tree(&self, root: Option<&str>) -> String {
        let root = match root {
            Some(path) => self.graph.node(path),
            None => self.graph.nodes().find(|n| n.dependencies.is_empty()),
        };
        let Some(root) = root else {
            return "No root node found for dependency tree".to_string();
        };

        let mut out = String::new();
        self.write_tree(root, &HashSet::new(), 0, &mut out);
        out
    }

    fn write_tree(
        &self,
        node: &DependencyGraphNode,
        branch: &HashSet<String>,
        depth: usize,
        out: &mut String,
    ) {
        let indent = "  ".repeat(depth);
        let name = file_name(&node.path);

        if branch.contains(&node.path) || depth > MAX_TREE_DEPTH {
            let _ = writeln!(out, "{indent}{name} (circular/max depth)");
            return;
        }

        let label = self
            .classification_of(&node.path)
            .map(|c| c.as_str())
            .unwrap_or("Unknown");
        let _ = writeln!(out, "{indent}{name} [{label}]");

        let mut branch = branch.clone();
        branch.insert(node.path.clone());
        for dependent in &node.dependents {
            if let Some(child) = self.graph.node(dependent) {
                self.write_tree(child, &branch, depth + 1, out);
            }
        }
    }

    pub fn statistics(&self) -> DependencyStatistics {
        let nodes: Vec<&DependencyGraphNode> = self.graph.nodes().collect();
        let count = nodes.len();
        let average = |total: usize| if count == 0 { 0.0 } else { total as f64 / count as f64 };

        let mut level_distribution = BTreeMap::new();
        for node in &nodes {
            *level_distribution.entry(node.depth).or_insert(0) += 1;
        }

        DependencyStatistics {
            total_nodes: count,
            total_edges: self.graph.edge_count(),
            average_dependencies: average(nodes.iter().map(|n| n.dependencies.len()).sum()),
            average_dependents: average(nodes.iter().map(|n| n.dependents.len()).sum()),
            max_dependencies: nodes.iter().map(|n| n.dependencies.len()).max().unwrap_or(0),
            max_dependents: nodes.iter().map(|n| n.dependents.len()).max().unwrap_or(0),
            circular_dependency_count: self.graph.cycles().len(),
            orphaned_node_count: nodes
                .iter()
                .filter(|n| n.dependencies.is_empty() && n.dependents.is_empty())
                .count(),
            level_distribution,
        }
    }

    /// Positions the filtered node set on a circle around the canvas centre.
    pub fn graph_view(&self, options: &GraphViewOptions) -> GraphView {
        let mut nodes: Vec<&DependencyGraphNode> = self
            .graph
            .nodes()
            .filter(|n| {
                options
                    .classification
                    .map_or(true, |c| self.classification_of(&n.path) == Some(c))
            })
            .filter(|n| {
                !options.show_only_connected || !n.dependencies.is_empty() || !n.dependents.is_empty()
            })
            .collect();
        nodes.truncate(options.max_nodes);

        let selected = options.selected.as_deref();
        let center_x = options.width / 2.0;
        let center_y = options.height / 2.0;
        let total = nodes.len().max(1) as f64;

        let view_nodes: Vec<ViewNode> = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let radius = (200.0 + node.depth as f64 * 50.0).min(250.0);
                let angle = index as f64 / total * 2.0 * PI;
                let connections = (node.dependencies.len() + node.dependents.len()) as f64;
                ViewNode {
                    id: node.path.clone(),
                    label: file_name(&node.path).to_string(),
                    classification: self.classification_of(&node.path),
                    x: center_x + angle.cos() * radius,
                    y: center_y + angle.sin() * radius,
                    size: BASE_NODE_SIZE + (connections * 2.0).min(MAX_CONNECTIVITY_BONUS),
                    selected: selected == Some(node.path.as_str()),
                    highlighted: selected.is_some_and(|s| {
                        node.path == s
                            || node.dependencies.iter().any(|d| d == s)
                            || node.dependents.iter().any(|d| d == s)
                    }),
                }
            })
            .collect();

        let shown: HashSet<&str> = nodes.iter().map(|n| n.path.as_str()).collect();
        let shown = &shown;
        let edges = nodes
            .iter()
            .flat_map(move |node| {
                node.dependencies
                    .iter()
                    .filter(move |dep| shown.contains(dep.as_str()))
                    .map(move |dep| ViewEdge {
                        from: node.path.clone(),
                        to: dep.clone(),
                        highlighted: selected.is_some_and(|s| node.path == s || dep == s),
                    })
            })
            .collect();

        GraphView {
            nodes: view_nodes,
            edges,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub average_dependencies: f64,
    pub average_dependents: f64,
    pub max_dependencies: usize,
    pub max_dependents: usize,
    pub circular_dependency_count: usize,
    pub orphaned_node_count: usize,
    /// Depth → number of files at that depth.
    pub level_distribution: BTreeMap<usize, usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphViewOptions {
    /// Only files with this classification, or all when `None`.
    pub classification: Option<Classification>,
    pub show_only_connected: bool,
    pub max_nodes: usize,
    pub selected: Option<String>,
    pub width: f64,
    pub height: f64,
}

impl From<&VisualizationConfig> for GraphViewOptions {
    fn from(config: &VisualizationConfig) -> Self {
        Self {
            classification: None,
            show_only_connected: config.show_only_connected,
            max_nodes: config.max_nodes,
            selected: None,
            width: config.width,
            height: config.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewNode {
    pub id: String,
    pub label: String,
    pub classification: Option<Classification>,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub selected: bool,
    /// The selected node itself or one of its direct neighbours.
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewEdge {
    pub from: String,
    pub to: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
}

pub fn sanitize_id(path: &str) -> String {
    path.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn sanitize_label(name: &str) -> String {
    name.chars().filter(|c| *c != '[' && *c != ']').collect()
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
