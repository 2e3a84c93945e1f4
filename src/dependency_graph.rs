use crate::impact::assess_removal_risk;
use crate::resolver::{HeuristicResolver, ImportResolver};
use crate::types::{
    CircularDependency, DependencyEntry, DependencyMap, FileKind, FileRecord, RiskLevel,
};
use petgraph::{graph::NodeIndex, Directed, Direction, Graph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Longest cycle still rated `High`.
pub const HIGH_SEVERITY_MAX_CYCLE_LEN: usize = 2;
/// Longest cycle still rated `Medium`; anything longer is `Low`.
pub const MEDIUM_SEVERITY_MAX_CYCLE_LEN: usize = 4;
/// Files above this criticality count as critical in the summary.
pub const CRITICAL_FILE_THRESHOLD: usize = 5;
pub const TOP_CRITICAL_PATHS: usize = 20;
const DEEP_CHAIN_DEPTH: usize = 3;
const MANY_DEPENDENTS: usize = 5;

/// Import graph: an edge `a -> b` means `a` imports `b`.
pub type ImportGraph = Graph<FileNode, ImportEdge, Directed>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNode {
    pub path: String,
    pub kind: FileKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportEdge {
    /// First specifier that produced this edge.
    pub specifier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraphNode {
    pub path: String,
    pub kind: FileKind,
    /// Resolved paths this file imports.
    pub dependencies: Vec<String>,
    /// Resolved paths importing this file.
    pub dependents: Vec<String>,
    /// Longest import chain down to a leaf. Cycle members are pinned to 0.
    pub depth: usize,
    pub is_circular: bool,
    pub circular_path: Option<Vec<String>>,
}

pub struct GraphBuilder {
    resolver: Arc<dyn ImportResolver>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(HeuristicResolver::new()))
    }

    pub fn with_resolver(resolver: Arc<dyn ImportResolver>) -> Self {
        Self { resolver }
    }

    pub fn build_graph(&self, files: &[FileRecord]) -> DependencyGraph {
        let mut graph = ImportGraph::new();
        let mut index = HashMap::new();

        for file in files {
            let node = graph.add_node(FileNode {
                path: file.path.clone(),
                kind: file.kind,
            });
            index.insert(file.path.clone(), node);
        }

        for file in files {
            let from = index[&file.path];
            for specifier in &file.dependencies {
                for target in self.resolver.resolve(specifier, &file.path, files) {
                    let Some(&to) = index.get(&target) else {
                        continue;
                    };
                    if from != to && graph.find_edge(from, to).is_none() {
                        graph.add_edge(
                            from,
                            to,
                            ImportEdge {
                                specifier: specifier.clone(),
                            },
                        );
                    }
                }
            }
        }

        DependencyGraph::from_import_graph(graph, index)
    }

    /// Forward imports plus the derived reverse `dependents` lists.
    pub fn build_dependency_map(&self, files: &[FileRecord]) -> DependencyMap {
        self.build_graph(files).dependency_map(files)
    }
}

#[derive(Debug)]
pub struct DependencyGraph {
    graph: ImportGraph,
    index: HashMap<String, NodeIndex>,
    nodes: BTreeMap<String, DependencyGraphNode>,
    cycles: Vec<CircularDependency>,
}

impl DependencyGraph {
    fn from_import_graph(graph: ImportGraph, index: HashMap<String, NodeIndex>) -> Self {
        let mut dependency_graph = Self {
            graph,
            index,
            nodes: BTreeMap::new(),
            cycles: Vec::new(),
        };

        let cycles = dependency_graph.detect_circular_dependencies();
        let mut circular_paths: HashMap<NodeIndex, Vec<String>> = HashMap::new();
        for cycle in &cycles {
            for member in &cycle.cycle {
                if let Some(&idx) = dependency_graph.index.get(member) {
                    circular_paths.insert(idx, cycle.cycle.clone());
                }
            }
        }

        let depths = dependency_graph.compute_depths(&circular_paths);

        let mut nodes = BTreeMap::new();
        for idx in dependency_graph.sorted_indices() {
            let file = &dependency_graph.graph[idx];
            let circular_path = circular_paths.get(&idx).cloned();
            nodes.insert(
                file.path.clone(),
                DependencyGraphNode {
                    path: file.path.clone(),
                    kind: file.kind,
                    dependencies: dependency_graph.neighbor_paths(idx, Direction::Outgoing),
                    dependents: dependency_graph.neighbor_paths(idx, Direction::Incoming),
                    depth: depths.get(&idx).copied().unwrap_or(0),
                    is_circular: circular_path.is_some(),
                    circular_path,
                },
            );
        }

        dependency_graph.nodes = nodes;
        dependency_graph.cycles = cycles;
        dependency_graph
    }

    pub fn graph(&self) -> &ImportGraph {
        &self.graph
    }

    pub fn node(&self, path: &str) -> Option<&DependencyGraphNode> {
        self.nodes.get(path)
    }

    /// All nodes, ordered by path.
    pub fn nodes(&self) -> impl Iterator<Item = &DependencyGraphNode> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Cycles found when the graph was built.
    pub fn cycles(&self) -> &[CircularDependency] {
        &self.cycles
    }

    pub fn is_acyclic(&self) -> bool {
        !petgraph::algo::is_cyclic_directed(&self.graph)
    }

    pub fn dependency_map(&self, files: &[FileRecord]) -> DependencyMap {
        files
            .iter()
            .map(|file| {
                let dependents = self
                    .nodes
                    .get(&file.path)
                    .map(|n| n.dependents.clone())
                    .unwrap_or_default();
                (
                    file.path.clone(),
                    DependencyEntry {
                        imports: file.dependencies.clone(),
                        exports: file.exports.clone(),
                        dependents,
                    },
                )
            })
            .collect()
    }

    /// Colored DFS over the import edges.
    ///
    /// A back edge to a node still on the recursion stack records the stack
    /// slice from that node to the current one. Only one cycle is captured per
    /// re-entry point, so overlapping cycles through a shared node can be
    /// undercounted. Traversal order is by path, which makes the result stable.
    pub fn detect_circular_dependencies(&self) -> Vec<CircularDependency> {
        let mut state = CycleSearch::default();
        for idx in self.sorted_indices() {
            if !state.visited.contains(&idx) {
                self.cycle_dfs(idx, &mut state);
            }
        }

        state
            .cycles
            .into_iter()
            .map(|members| {
                let cycle: Vec<String> = members.iter().map(|idx| self.graph[*idx].path.clone()).collect();
                let kinds: Vec<FileKind> = members.iter().map(|idx| self.graph[*idx].kind).collect();
                CircularDependency {
                    severity: assess_circular_severity(cycle.len()),
                    impact: describe_circular_impact(&kinds),
                    cycle,
                }
            })
            .collect()
    }

    fn cycle_dfs(&self, idx: NodeIndex, state: &mut CycleSearch) {
        state.visited.insert(idx);
        state.on_stack.insert(idx);
        state.path.push(idx);

        for dep in self.sorted_neighbors(idx, Direction::Outgoing) {
            if state.on_stack.contains(&dep) {
                if let Some(start) = state.path.iter().position(|n| *n == dep) {
                    state.cycles.push(state.path[start..].to_vec());
                }
            } else if !state.visited.contains(&dep) {
                self.cycle_dfs(dep, state);
            }
        }

        state.path.pop();
        state.on_stack.remove(&idx);
    }

    fn compute_depths(&self, circular: &HashMap<NodeIndex, Vec<String>>) -> HashMap<NodeIndex, usize> {
        let mut memo = HashMap::new();
        let mut visiting = HashSet::new();
        for idx in self.sorted_indices() {
            self.depth_of(idx, circular, &mut memo, &mut visiting);
        }
        memo
    }

    fn depth_of(
        &self,
        idx: NodeIndex,
        circular: &HashMap<NodeIndex, Vec<String>>,
        memo: &mut HashMap<NodeIndex, usize>,
        visiting: &mut HashSet<NodeIndex>,
    ) -> usize {
        if circular.contains_key(&idx) {
            memo.insert(idx, 0);
            return 0;
        }
        if let Some(&depth) = memo.get(&idx) {
            return depth;
        }
        if !visiting.insert(idx) {
            return 0;
        }

        let depth = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect::<Vec<_>>()
            .into_iter()
            .map(|dep| self.depth_of(dep, circular, memo, visiting))
            .max()
            .map(|deepest| deepest + 1)
            .unwrap_or(0);

        visiting.remove(&idx);
        memo.insert(idx, depth);
        depth
    }

    /// Files with at least one dependent, ranked by `2 × dependents + depth`.
    pub fn critical_paths(&self) -> Vec<CriticalPath> {
        let mut paths: Vec<CriticalPath> = self
            .nodes
            .values()
            .filter(|node| !node.dependents.is_empty())
            .map(|node| CriticalPath {
                file: node.path.clone(),
                dependent_count: node.dependents.len(),
                depth: node.depth,
                criticality: node.dependents.len() * 2 + node.depth,
            })
            .collect();

        paths.sort_by(|a, b| b.criticality.cmp(&a.criticality).then_with(|| a.file.cmp(&b.file)));
        paths
    }

    /// Removal risk of every file that is not `Low`, with the reasons.
    pub fn risk_analysis(&self) -> Vec<RiskEntry> {
        self.nodes
            .values()
            .map(|node| RiskEntry {
                file: node.path.clone(),
                risk: assess_removal_risk(node.dependents.len(), node.is_circular),
                reason: risk_reason(node),
            })
            .filter(|entry| entry.risk != RiskLevel::Low)
            .collect()
    }

    pub fn export_analysis(&self, unused_dependencies: usize) -> DependencyAnalysis {
        let critical_paths = self.critical_paths();
        let critical_files = critical_paths
            .iter()
            .filter(|p| p.criticality > CRITICAL_FILE_THRESHOLD)
            .count();

        DependencyAnalysis {
            summary: DependencyAnalysisSummary {
                total_files: self.nodes.len(),
                circular_dependencies: self.cycles.len(),
                critical_files,
                unused_dependencies,
            },
            circular_dependencies: self.cycles.clone(),
            critical_paths: critical_paths.into_iter().take(TOP_CRITICAL_PATHS).collect(),
            risk_analysis: self.risk_analysis(),
        }
    }

    /// Node and edge lists for graph renderers.
    pub fn visualization_data(&self) -> VisualizationData {
        let nodes = self
            .nodes
            .values()
            .map(|node| VisualizationNode {
                id: node.path.clone(),
                label: node.path.rsplit('/').next().unwrap_or(&node.path).to_string(),
                kind: node.kind,
                circular: node.is_circular,
            })
            .collect();

        let edges = self
            .nodes
            .values()
            .flat_map(|node| {
                node.dependencies.iter().map(move |dep| VisualizationEdge {
                    from: node.path.clone(),
                    to: dep.clone(),
                })
            })
            .collect();

        VisualizationData { nodes, edges }
    }

    fn sorted_indices(&self) -> Vec<NodeIndex> {
        let mut indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        indices.sort_by(|a, b| self.graph[*a].path.cmp(&self.graph[*b].path));
        indices
    }

    fn sorted_neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        neighbors.sort_by(|a, b| self.graph[*a].path.cmp(&self.graph[*b].path));
        neighbors
    }

    fn neighbor_paths(&self, idx: NodeIndex, direction: Direction) -> Vec<String> {
        self.sorted_neighbors(idx, direction)
            .into_iter()
            .map(|n| self.graph[n].path.clone())
            .collect()
    }
}

#[derive(Default)]
struct CycleSearch {
    visited: HashSet<NodeIndex>,
    on_stack: HashSet<NodeIndex>,
    path: Vec<NodeIndex>,
    cycles: Vec<Vec<NodeIndex>>,
}

/// Shorter cycles are rated more urgent.
pub fn assess_circular_severity(cycle_len: usize) -> RiskLevel {
    if cycle_len <= HIGH_SEVERITY_MAX_CYCLE_LEN {
        RiskLevel::High
    } else if cycle_len <= MEDIUM_SEVERITY_MAX_CYCLE_LEN {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn describe_circular_impact(kinds: &[FileKind]) -> String {
    let has_components = kinds.contains(&FileKind::Component);
    let has_apis = kinds.contains(&FileKind::Api);

    if has_components && has_apis {
        "Circular dependency between UI and API layers may cause initialization issues".to_string()
    } else if has_components {
        "Circular dependency between components may cause rendering issues".to_string()
    } else {
        "Circular dependency may cause module loading issues".to_string()
    }
}

fn risk_reason(node: &DependencyGraphNode) -> String {
    let mut reasons = Vec::new();
    if node.dependents.len() > MANY_DEPENDENTS {
        reasons.push(format!("High dependency count ({} dependents)", node.dependents.len()));
    }
    if node.is_circular {
        reasons.push("Part of circular dependency".to_string());
    }
    if node.depth > DEEP_CHAIN_DEPTH {
        reasons.push(format!("Deep dependency chain (depth {})", node.depth));
    }

    if reasons.is_empty() {
        "Low risk".to_string()
    } else {
        reasons.join("; ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalPath {
    pub file: String,
    pub dependent_count: usize,
    pub depth: usize,
    pub criticality: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEntry {
    pub file: String,
    pub risk: RiskLevel,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyAnalysisSummary {
    pub total_files: usize,
    pub circular_dependencies: usize,
    pub critical_files: usize,
    pub unused_dependencies: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyAnalysis {
    pub summary: DependencyAnalysisSummary,
    pub circular_dependencies: Vec<CircularDependency>,
    pub critical_paths: Vec<CriticalPath>,
    pub risk_analysis: Vec<RiskEntry>,
}

impl DependencyAnalysis {
    pub fn print_summary(&self) {
        println!("Dependency Graph Analysis:");
        println!("  Files in graph: {}", self.summary.total_files);
        println!("  Circular dependencies: {}", self.summary.circular_dependencies);
        println!("  Critical files: {}", self.summary.critical_files);
        println!("  Unused packages: {}", self.summary.unused_dependencies);

        if !self.critical_paths.is_empty() {
            println!("  Most depended upon:");
            for path in self.critical_paths.iter().take(5) {
                println!(
                    "    {} ({} dependents, depth {})",
                    path.file, path.dependent_count, path.depth
                );
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationNode {
    pub id: String,
    pub label: String,
    pub kind: FileKind,
    pub circular: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationData {
    pub nodes: Vec<VisualizationNode>,
    pub edges: Vec<VisualizationEdge>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::FileDetails;

    pub(crate) fn file(path: &str, kind: FileKind, imports: &[&str]) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            name: path.rsplit('/').next().unwrap().to_string(),
            extension: ".ts".to_string(),
            kind,
            size: 10,
            lines_of_code: 10,
            dependencies: imports.iter().map(|s| s.to_string()).collect(),
            exports: vec![],
            is_test_file: false,
            details: FileDetails::General,
        }
    }

    fn build(files: &[FileRecord]) -> DependencyGraph {
        GraphBuilder::new().build_graph(files)
    }

    #[test]
    fn three_node_cycle_is_medium_and_marks_members() {
        let files = vec![
            file("src/a.ts", FileKind::Utility, &["./b"]),
            file("src/b.ts", FileKind::Utility, &["./c"]),
            file("src/c.ts", FileKind::Utility, &["./a"]),
        ];
        let graph = build(&files);

        assert_eq!(graph.cycles().len(), 1);
        let cycle = &graph.cycles()[0];
        assert_eq!(cycle.cycle, vec!["src/a.ts", "src/b.ts", "src/c.ts"]);
        assert_eq!(cycle.severity, RiskLevel::Medium);
        assert_eq!(cycle.impact, "Circular dependency may cause module loading issues");

        for path in ["src/a.ts", "src/b.ts", "src/c.ts"] {
            let node = graph.node(path).unwrap();
            assert!(node.is_circular);
            assert_eq!(node.depth, 0);
            assert_eq!(node.circular_path.as_ref().unwrap(), &cycle.cycle);
        }
        assert!(!graph.is_acyclic());
    }

    #[test]
    fn two_node_cycle_is_high() {
        let files = vec![
            file("src/components/x.tsx", FileKind::Component, &["./y"]),
            file("src/components/y.tsx", FileKind::Component, &["./x"]),
        ];
        let graph = build(&files);
        assert_eq!(graph.cycles()[0].severity, RiskLevel::High);
        assert_eq!(
            graph.cycles()[0].impact,
            "Circular dependency between components may cause rendering issues"
        );
    }

    #[test]
    fn cycle_detection_is_idempotent() {
        let files = vec![
            file("src/a.ts", FileKind::Utility, &["./b", "./d"]),
            file("src/b.ts", FileKind::Utility, &["./a"]),
            file("src/d.ts", FileKind::Utility, &["./e"]),
            file("src/e.ts", FileKind::Utility, &["./d"]),
        ];
        let graph = build(&files);
        let first = graph.detect_circular_dependencies();
        let second = graph.detect_circular_dependencies();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first, graph.cycles());
    }

    #[test]
    fn depth_is_longest_chain_to_a_leaf() {
        let files = vec![
            file("src/app.ts", FileKind::Page, &["./service", "./util"]),
            file("src/service.ts", FileKind::Utility, &["./util"]),
            file("src/util.ts", FileKind::Utility, &[]),
        ];
        let graph = build(&files);
        assert_eq!(graph.node("src/util.ts").unwrap().depth, 0);
        assert_eq!(graph.node("src/service.ts").unwrap().depth, 1);
        assert_eq!(graph.node("src/app.ts").unwrap().depth, 2);
        assert!(graph.is_acyclic());
        assert!(graph.cycles().is_empty());
    }

    #[test]
    fn dependents_are_the_inverse_of_dependencies() {
        let files = vec![
            file("src/a.ts", FileKind::Utility, &["./b", "./c", "react"]),
            file("src/b.ts", FileKind::Utility, &["./c"]),
            file("src/c.ts", FileKind::Utility, &["./a"]),
            file("src/d.ts", FileKind::Utility, &["./c", "./c"]),
        ];
        let graph = build(&files);
        for node in graph.nodes() {
            for dependent in &node.dependents {
                assert!(graph.node(dependent).unwrap().dependencies.contains(&node.path));
            }
            for dependency in &node.dependencies {
                assert!(graph.node(dependency).unwrap().dependents.contains(&node.path));
            }
        }
        assert_eq!(
            graph.node("src/c.ts").unwrap().dependents,
            vec!["src/a.ts", "src/b.ts", "src/d.ts"]
        );
        assert_eq!(graph.edge_count(), 5);

        let map = graph.dependency_map(&files);
        assert_eq!(map["src/d.ts"].imports, vec!["./c", "./c"]);
        assert_eq!(map["src/c.ts"].dependents.len(), 3);
    }

    #[test]
    fn critical_paths_rank_by_dependents_and_depth() {
        let files = vec![
            file("src/a.ts", FileKind::Page, &["./core"]),
            file("src/b.ts", FileKind::Page, &["./core"]),
            file("src/c.ts", FileKind::Page, &["./helper"]),
            file("src/core.ts", FileKind::Utility, &["./helper"]),
            file("src/helper.ts", FileKind::Utility, &[]),
        ];
        let graph = build(&files);
        let paths = graph.critical_paths();
        assert_eq!(paths[0].file, "src/core.ts");
        assert_eq!(paths[0].criticality, 2 * 2 + 1);
        assert_eq!(paths[1].file, "src/helper.ts");
        assert_eq!(paths[1].criticality, 2 * 2);
        assert_eq!(paths.len(), 2);

        let analysis = graph.export_analysis(0);
        assert_eq!(analysis.summary.critical_files, 0);
        assert_eq!(analysis.summary.total_files, 5);
    }

    #[test]
    fn risk_table_lists_circular_files() {
        let files = vec![
            file("src/a.ts", FileKind::Utility, &["./b"]),
            file("src/b.ts", FileKind::Utility, &["./a"]),
            file("src/c.ts", FileKind::Utility, &[]),
        ];
        let risks = build(&files).risk_analysis();
        assert_eq!(risks.len(), 2);
        assert!(risks.iter().all(|r| r.risk == RiskLevel::High));
        assert_eq!(risks[0].reason, "Part of circular dependency");
    }

    #[test]
    fn visualization_data_uses_resolved_edges() {
        let files = vec![
            file("src/a.ts", FileKind::Utility, &["./b", "lodash"]),
            file("src/b.ts", FileKind::Utility, &[]),
        ];
        let data = build(&files).visualization_data();
        assert_eq!(data.nodes.len(), 2);
        assert_eq!(data.nodes[0].label, "a.ts");
        assert_eq!(
            data.edges,
            vec![VisualizationEdge {
                from: "src/a.ts".into(),
                to: "src/b.ts".into()
            }]
        );
    }
}
