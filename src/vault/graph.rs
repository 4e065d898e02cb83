use std::collections::HashMap;
use std::path::PathBuf;

/// One note in the vault. `links` keeps the extraction order and may contain
/// ids that resolve to nothing (dangling) or to the note itself; consumers
/// resolve them through [`VaultGraph::lookup`] every frame instead of holding
/// direct references, so a reload can never leave a stale edge behind.
#[derive(Clone, Debug)]
pub struct NoteRecord {
    pub id: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub links: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct VaultGraph {
    pub root: PathBuf,
    pub nodes: HashMap<String, NoteRecord>,
    pub link_count: usize,
}

impl VaultGraph {
    pub fn empty(root: PathBuf) -> Self {
        Self {
            root,
            nodes: HashMap::new(),
            link_count: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn lookup(&self, id: &str) -> Option<&NoteRecord> {
        self.nodes.get(id)
    }

    /// Count of links whose target currently resolves to another note.
    /// Dangling and self links are no-op edges and excluded.
    pub fn resolved_link_count(&self) -> usize {
        self.nodes
            .values()
            .map(|node| {
                node.links
                    .iter()
                    .filter(|target| *target != &node.id && self.nodes.contains_key(*target))
                    .count()
            })
            .sum()
    }
}
