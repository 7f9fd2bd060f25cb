//! Static route enumeration.
//!
//! A route is the slug segments of one document below its category, e.g.
//! `["tools", "vim"]` for `frontend/tools/vim.md`. Two independent
//! strategies exist and must agree: a glob over the storage and a walk of
//! the navigation tree.

use omn_storage::{Storage, StorageError, is_hidden};

use crate::navigation::NavTree;
use crate::walker::walk;

/// Visible directories directly under the docs root, in listing order.
pub fn categories(storage: &dyn Storage) -> Result<Vec<String>, StorageError> {
    Ok(storage
        .list("")?
        .into_iter()
        .filter(|entry| entry.is_dir() && !is_hidden(&entry.name))
        .map(|entry| entry.name)
        .collect())
}

/// Routes found by globbing `**/*{suffix}` under the category. Sorted.
pub fn routes_by_glob(
    storage: &dyn Storage,
    category: &str,
    suffix: &str,
) -> Result<Vec<Vec<String>>, StorageError> {
    let mut routes: Vec<Vec<String>> = storage
        .glob(category, &format!("**/*{suffix}"))?
        .into_iter()
        .filter_map(|path| {
            let stem = path.strip_suffix(suffix)?;
            let segments: Vec<String> = stem.split('/').map(str::to_owned).collect();
            let visible = segments
                .iter()
                .all(|s| !s.is_empty() && !is_hidden(s));
            visible.then_some(segments)
        })
        .collect();
    routes.sort();
    Ok(routes)
}

/// Routes of every leaf in an already walked tree. Sorted.
#[must_use]
pub fn routes_from_tree(tree: &NavTree, category: &str) -> Vec<Vec<String>> {
    let prefix = format!("{category}/");
    let mut routes: Vec<Vec<String>> = tree
        .leaves()
        .into_iter()
        .filter_map(|leaf| leaf.key().strip_prefix(&prefix))
        .map(|rest| rest.split('/').map(str::to_owned).collect())
        .collect();
    routes.sort();
    routes
}

/// Routes found by walking the category directory. Sorted.
pub fn routes_by_walk(
    storage: &dyn Storage,
    category: &str,
    suffix: &str,
) -> Result<Vec<Vec<String>>, StorageError> {
    Ok(routes_from_tree(&walk(storage, category, suffix)?, category))
}
