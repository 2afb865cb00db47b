use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::node::MindmapNode;
use super::default_tree;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read mindmap document {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write mindmap document {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize mindmap document")]
    Serialize(#[from] serde_json::Error),
}

pub fn parse_tree(raw: &str) -> Result<MindmapNode, serde_json::Error> {
    serde_json::from_str(raw)
}

/// JSON file holding the whole tree document.
#[derive(Clone, Debug)]
pub struct TreeStore {
    data_file: PathBuf,
}

impl TreeStore {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Reads the saved document. A missing or malformed document yields the
    /// built-in default tree; only I/O failures are reported.
    pub fn load(&self) -> Result<MindmapNode, StoreError> {
        let raw = match fs::read_to_string(&self.data_file) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!(path = %self.data_file.display(), "no saved mindmap, using default tree");
                return Ok(default_tree());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.data_file.clone(),
                    source,
                });
            }
        };

        match parse_tree(&raw) {
            Ok(tree) => {
                info!(
                    path = %self.data_file.display(),
                    nodes = tree.node_count(),
                    "loaded mindmap"
                );
                Ok(tree)
            }
            Err(error) => {
                warn!(
                    path = %self.data_file.display(),
                    %error,
                    "saved mindmap is malformed, using default tree"
                );
                Ok(default_tree())
            }
        }
    }

    pub fn save(&self, tree: &MindmapNode) -> Result<(), StoreError> {
        let raw = serde_json::to_string(tree)?;
        write_atomically(&self.data_file, raw.as_bytes())?;
        debug!(path = %self.data_file.display(), bytes = raw.len(), "saved mindmap");
        Ok(())
    }
}

/// Writes the tree as two-space indented JSON to `dir/filename`.
pub fn export_tree(tree: &MindmapNode, dir: &Path, filename: &str) -> Result<PathBuf, StoreError> {
    let raw = serde_json::to_string_pretty(tree)?;
    let path = dir.join(filename);
    write_atomically(&path, raw.as_bytes())?;
    info!(path = %path.display(), "exported mindmap");
    Ok(path)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, bytes)
        .and_then(|()| fs::rename(&staging, path))
        .map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    fn tree_with_metadata() -> MindmapNode {
        let mut leaf = MindmapNode::new("leaf", "Leaf");
        leaf.summary = Some("summary".to_string());
        leaf.metadata = Some(BTreeMap::from([
            ("source".to_string(), json!("handbook")),
            ("weight".to_string(), json!(3)),
            ("reviewed".to_string(), json!(true)),
        ]));
        let mut empty_parent = MindmapNode::new("empty", "Empty");
        empty_parent.children = Some(Vec::new());

        let mut root = MindmapNode::new("root", "Root").with_children(vec![leaf, empty_parent]);
        root.category = Some("vitamins".to_string());
        root
    }

    #[test]
    fn export_then_parse_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tree = tree_with_metadata();

        let path = export_tree(&tree, dir.path(), "export.json").expect("export succeeds");
        let raw = fs::read_to_string(&path).expect("export readable");

        assert!(raw.contains("\n  \"id\": \"root\""));
        assert_eq!(parse_tree(&raw).expect("valid json"), tree);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TreeStore::new(dir.path().join("nested").join("mindmap.json"));
        let tree = tree_with_metadata();

        store.save(&tree).expect("save succeeds");
        assert_eq!(store.load().expect("load succeeds"), tree);
    }

    #[test]
    fn missing_document_loads_default_tree() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TreeStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load().expect("load succeeds"), default_tree());
    }

    #[test]
    fn malformed_document_loads_default_tree() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mindmap.json");
        fs::write(&path, "{ not json").expect("write fixture");

        let store = TreeStore::new(&path);
        assert_eq!(store.load().expect("load succeeds"), default_tree());
    }

    #[test]
    fn unreadable_document_is_a_load_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TreeStore::new(dir.path());

        let error = store.load().expect_err("directory is not a document");
        assert!(matches!(error, StoreError::Read { .. }));
    }

    #[test]
    fn absent_optional_fields_are_not_written() {
        let raw = serde_json::to_string(&MindmapNode::new("a", "A")).expect("serializes");
        assert_eq!(raw, r#"{"id":"a","title":"A"}"#);
    }
}
