mod navigator;
mod node;
mod sample;
mod store;

pub use navigator::{Edge, VisibleNode, resolve_root, visible_edges, visible_nodes};
pub use node::{
    MindmapNode, NodeUpdate, append_child, collect_ids, collect_internal_ids, find_node,
    update_node,
};
pub use sample::default_tree;
pub use store::{StoreError, TreeStore, export_tree};
