use petgraph::algo::tarjan_scc;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use std::collections::HashMap;
use treebank_protocol::{Sentence, TokenHandle, TokenRecord};

/// A labelled head -> dependent arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arc<'s> {
    pub head: &'s TokenRecord,
    pub dependent: &'s TokenRecord,
    pub deprel: Option<&'s str>,
}

/// Dependency tree view over a parsed sentence.
///
/// Nodes are the sentence's syntactic words; multiword spans are left out.
/// Edges run from head to dependent and carry the dependent's DEPREL.
pub struct DependencyTree<'s> {
    sentence: &'s Sentence,
    graph: Graph<(TokenHandle, &'s TokenRecord), Option<&'s str>, Directed>,
    index_map: HashMap<TokenHandle, NodeIndex>,
}

impl<'s> DependencyTree<'s> {
    pub fn from_sentence(sentence: &'s Sentence) -> Self {
        let mut graph = Graph::new();
        let mut index_map = HashMap::new();

        for (handle, token) in sentence.handles() {
            if !token.is_multiword() {
                index_map.insert(handle, graph.add_node((handle, token)));
            }
        }

        for (handle, token) in sentence.handles() {
            let (Some(head), Some(&dependent)) = (token.head(), index_map.get(&handle)) else {
                continue;
            };
            if let Some(&head) = index_map.get(&head) {
                graph.add_edge(head, dependent, token.deprel.as_deref());
            }
        }

        Self {
            sentence,
            graph,
            index_map,
        }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    fn token(&self, node: NodeIndex) -> &'s TokenRecord {
        self.graph[node].1
    }

    fn node(&self, id: &str) -> Option<NodeIndex> {
        let handle = self.sentence.handle(id)?;
        self.index_map.get(&handle).copied()
    }

    fn in_order(&self, mut nodes: Vec<NodeIndex>) -> Vec<&'s TokenRecord> {
        nodes.sort_by_key(|node| self.graph[*node].0);
        nodes.into_iter().map(|node| self.token(node)).collect()
    }

    /// Words without a governing token, in sentence order.
    pub fn roots(&self) -> Vec<&'s TokenRecord> {
        let roots = self
            .graph
            .node_indices()
            .filter(|node| {
                self.graph
                    .neighbors_directed(*node, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect();
        self.in_order(roots)
    }

    /// Direct dependents of `id`, in sentence order.
    pub fn children(&self, id: &str) -> Vec<&'s TokenRecord> {
        match self.node(id) {
            Some(node) => self.in_order(self.graph.neighbors_directed(node, Direction::Outgoing).collect()),
            None => Vec::new(),
        }
    }

    pub fn head_of(&self, id: &str) -> Option<&'s TokenRecord> {
        let node = self.node(id)?;
        let head = self.graph.neighbors_directed(node, Direction::Incoming).next()?;
        Some(self.token(head))
    }

    /// Number of arcs between `id` and its root; `None` when the head chain cycles.
    pub fn depth(&self, id: &str) -> Option<usize> {
        let mut node = self.node(id)?;
        let mut depth = 0;
        while let Some(head) = self.graph.neighbors_directed(node, Direction::Incoming).next() {
            depth += 1;
            if depth > self.graph.node_count() {
                return None;
            }
            node = head;
        }
        Some(depth)
    }

    /// Every arc, ordered by dependent.
    pub fn arcs(&self) -> Vec<Arc<'s>> {
        let mut arcs: Vec<_> = self
            .graph
            .edge_references()
            .map(|edge| (self.graph[edge.target()].0, edge))
            .collect();
        arcs.sort_by_key(|(dependent, _)| *dependent);
        arcs.into_iter()
            .map(|(_, edge)| Arc {
                head: self.token(edge.source()),
                dependent: self.token(edge.target()),
                deprel: *edge.weight(),
            })
            .collect()
    }

    /// Groups of words whose head links form a cycle (including self-heads).
    pub fn cycles(&self) -> Vec<Vec<&'s TokenRecord>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1 || self.graph.contains_edge(component[0], component[0])
            })
            .map(|component| self.in_order(component))
            .collect()
    }
}
