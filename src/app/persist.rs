use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use tracing::warn;

use crate::mindmap::{MindmapNode, TreeStore};

/// Background writer for the tree document.
///
/// Trees queued while a write is in flight collapse into the newest one, so a
/// burst of edits ends in a single write of the latest state.
pub(in crate::app) struct SaveWorker {
    tx: Option<Sender<Arc<MindmapNode>>>,
    handle: Option<JoinHandle<()>>,
}

impl SaveWorker {
    pub(in crate::app) fn spawn(store: TreeStore) -> Self {
        let (tx, rx) = mpsc::channel::<Arc<MindmapNode>>();

        let handle = thread::spawn(move || {
            while let Ok(mut tree) = rx.recv() {
                while let Ok(newer) = rx.try_recv() {
                    tree = newer;
                }

                if let Err(error) = store.save(&tree) {
                    warn!(?error, "failed to save mindmap, edit kept in memory");
                }
            }
        });

        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    pub(in crate::app) fn submit(&self, tree: Arc<MindmapNode>) {
        let Some(tx) = &self.tx else {
            return;
        };

        if tx.send(tree).is_err() {
            warn!("save worker stopped, edit kept in memory only");
        }
    }

    /// Flushes queued trees and waits for the worker to exit.
    pub(in crate::app) fn shutdown(&mut self) {
        self.tx = None;
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("save worker panicked");
        }
    }
}

impl Drop for SaveWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_submission_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TreeStore::new(dir.path().join("mindmap.json"));
        let mut worker = SaveWorker::spawn(store.clone());

        for title in ["first", "second", "third"] {
            worker.submit(Arc::new(MindmapNode::new("root", title)));
        }
        worker.shutdown();

        let saved = store.load().expect("saved document loads");
        assert_eq!(saved.title, "third");
    }

    #[test]
    fn worker_keeps_saving_after_a_failed_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").expect("write fixture");
        let store = TreeStore::new(blocker.join("mindmap.json"));
        assert!(store.save(&MindmapNode::new("root", "direct")).is_err());

        let mut worker = SaveWorker::spawn(store.clone());
        worker.submit(Arc::new(MindmapNode::new("root", "lost")));

        std::fs::remove_file(&blocker).expect("remove fixture");
        std::fs::create_dir_all(&blocker).expect("create directory");
        worker.submit(Arc::new(MindmapNode::new("root", "recovered")));
        worker.shutdown();

        let saved = store.load().expect("saved document loads");
        assert_eq!(saved.title, "recovered");

        worker.submit(Arc::new(MindmapNode::new("root", "after shutdown")));
        assert_eq!(store.load().expect("document still readable").title, "recovered");
    }
}
