mod graph;
mod links;
mod opener;
mod scan;

pub use graph::{NoteRecord, VaultGraph};
pub use opener::open_note;
pub use scan::load_vault_graph;
