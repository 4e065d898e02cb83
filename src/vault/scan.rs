use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::graph::{NoteRecord, VaultGraph};
use super::links::extract_links;

/// Builds a complete [`VaultGraph`] from the Markdown files under `root`.
///
/// The whole scan either succeeds or fails; callers keep their previous graph
/// on failure. Individual unreadable or non-UTF-8 files are skipped with a
/// warning rather than aborting the scan. An empty vault is a valid result.
pub fn load_vault_graph(root: &Path) -> Result<VaultGraph> {
    let mut nodes = HashMap::new();
    collect_notes(root, &mut nodes)
        .with_context(|| format!("failed to scan vault at {}", root.display()))?;

    let mut graph = VaultGraph::empty(root.to_path_buf());
    graph.nodes = nodes;
    graph.link_count = graph.resolved_link_count();
    Ok(graph)
}

fn collect_notes(dir: &Path, nodes: &mut HashMap<String, NoteRecord>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("cannot read directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("cannot read entry in {}", dir.display()))?;
        let path = entry.path();

        if path.is_dir() {
            collect_notes(&path, nodes)?;
            continue;
        }

        if path.extension().and_then(|extension| extension.to_str()) != Some("md") {
            continue;
        }

        let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
            log::warn!("skipping note with non-UTF-8 name: {}", path.display());
            continue;
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(error) => {
                log::warn!("skipping unreadable note {}: {error}", path.display());
                continue;
            }
        };

        let size_bytes = entry.metadata().map(|metadata| metadata.len()).unwrap_or(0);
        let links = extract_links(&content);

        // File stems are the node key; a stem duplicated across
        // subdirectories keeps the last scanned file.
        nodes.insert(
            id.to_owned(),
            NoteRecord {
                id: id.to_owned(),
                path: path.clone(),
                size_bytes,
                links,
            },
        );
    }

    Ok(())
}
