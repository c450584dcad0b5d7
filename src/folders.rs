//! Folder hierarchy path resolution.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::types::FolderRecord;

/// Resolve every folder id to its slash-delimited path from the root.
///
/// Walks `parent_id` links upward, prepending each ancestor's
/// `developer_name`. Root folders resolve to just their own name. A walk that
/// revisits an id, or reaches a parent id absent from the input set, resolves
/// that folder to an empty path; callers treat an empty path as "no folder
/// prefix". The returned map is total over the input: every folder id is
/// present.
pub fn resolve_folder_paths(folders: &[FolderRecord]) -> HashMap<String, String> {
    let by_id: HashMap<&str, &FolderRecord> =
        folders.iter().map(|f| (f.id.as_str(), f)).collect();

    let mut paths = HashMap::with_capacity(folders.len());
    for folder in folders {
        paths.insert(folder.id.clone(), resolve_path(folder, &by_id));
    }
    paths
}

fn resolve_path(folder: &FolderRecord, by_id: &HashMap<&str, &FolderRecord>) -> String {
    let mut segments = vec![folder.developer_name.as_str()];
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(folder.id.as_str());

    let mut parent = folder.parent_id.as_deref();
    while let Some(parent_id) = parent {
        if !visited.insert(parent_id) {
            warn!(folder_id = %folder.id, "cycle in folder parent chain");
            return String::new();
        }
        let record = match by_id.get(parent_id) {
            Some(record) => record,
            // Parent chain leaves the known folder set; the path cannot be
            // completed.
            None => return String::new(),
        };
        segments.push(record.developer_name.as_str());
        parent = record.parent_id.as_deref();
    }

    segments.reverse();
    segments.join("/")
}
