//! Directory walker that builds a category's [`NavTree`].

use omn_renderer::extract_headings;
use omn_storage::{Storage, StorageError, is_hidden};

use crate::navigation::{NavNode, NavTree};

/// Join a slash-separated directory and a child name.
pub(crate) fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}

/// Label of a document: its first non-empty level 1 heading, else `stem`.
///
/// Unreadable files keep the stem; the walk goes on.
pub(crate) fn document_label(storage: &dyn Storage, path: &str, stem: &str) -> String {
    match storage.read(path) {
        Ok(content) => extract_headings(&content, &[1])
            .into_iter()
            .map(|h| h.text)
            .find(|text| !text.is_empty())
            .unwrap_or_else(|| stem.to_owned()),
        Err(e) => {
            tracing::warn!(path, error = %e, "Failed to read document, using file name as label");
            stem.to_owned()
        }
    }
}

/// Walk `category` (a directory directly under the storage root).
///
/// Every visible entry becomes one node: directories become branches
/// labelled with their name, files ending in `suffix` become leaves. Hidden
/// entries and other files are skipped. Siblings keep the storage's listing
/// order.
///
/// Fails only when the category directory itself cannot be listed. A
/// subdirectory that cannot be listed is logged and left empty.
pub fn walk(storage: &dyn Storage, category: &str, suffix: &str) -> Result<NavTree, StorageError> {
    let mut nodes: Vec<NavNode> = Vec::new();
    let mut roots = Vec::new();
    // (directory to list, arena index of its branch; None for the category)
    let mut pending: Vec<(String, Option<usize>)> = vec![(category.to_owned(), None)];

    while let Some((dir, parent)) = pending.pop() {
        let entries = match storage.list(&dir) {
            Ok(entries) => entries,
            Err(e) if parent.is_none() => return Err(e),
            Err(e) => {
                tracing::warn!(dir, error = %e, "Failed to list directory");
                Vec::new()
            }
        };

        let mut children = Vec::with_capacity(entries.len());
        for entry in entries {
            if is_hidden(&entry.name) {
                continue;
            }
            let path = join(&dir, &entry.name);

            if entry.is_dir() {
                let index = nodes.len();
                nodes.push(NavNode::Branch {
                    label: entry.name,
                    key: format!("{path}/"),
                    children: Vec::new(),
                });
                pending.push((path, Some(index)));
                children.push(index);
            } else if let Some(stem) = entry.name.strip_suffix(suffix)
                && !stem.is_empty()
            {
                let label = document_label(storage, &path, stem);
                children.push(nodes.len());
                nodes.push(NavNode::Leaf {
                    label,
                    key: join(&dir, stem),
                });
            }
        }

        match parent {
            None => roots = children,
            Some(index) => {
                if let Some(NavNode::Branch {
                    children: slot, ..
                }) = nodes.get_mut(index)
                {
                    *slot = children;
                }
            }
        }
    }

    Ok(NavTree::new(nodes, roots))
}

#[cfg(test)]
mod tests {
    use omn_storage::{MockStorage, StorageErrorKind};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::navigation::NavItem;

    fn item(label: &str, key: &str) -> NavItem {
        NavItem {
            label: label.to_owned(),
            key: key.to_owned(),
            children: None,
        }
    }

    fn branch(label: &str, key: &str, children: Vec<NavItem>) -> NavItem {
        NavItem {
            label: label.to_owned(),
            key: key.to_owned(),
            children: Some(children),
        }
    }

    #[test]
    fn test_labels_and_nesting() {
        let storage = MockStorage::new()
            .with_file("frontend/git.md", "# Git Basics\n\n## Setup\n")
            .with_file("frontend/tools/vim.md", "no heading here")
            .with_file("frontend/tools/zsh.md", "## Only h2\n")
            .with_file("frontend/vue.md", "#   \n\n# Vue Guide\n");

        let tree = walk(&storage, "frontend", ".md").unwrap();

        assert_eq!(
            tree.to_items(),
            vec![
                item("Git Basics", "frontend/git"),
                branch(
                    "tools",
                    "frontend/tools/",
                    vec![item("vim", "frontend/tools/vim"), item("zsh", "frontend/tools/zsh")]
                ),
                item("Vue Guide", "frontend/vue"),
            ]
        );
    }

    #[test]
    fn test_hidden_and_foreign_files_skipped() {
        let storage = MockStorage::new()
            .with_file("frontend/.DS_Store", "")
            .with_file("frontend/.draft.md", "# Draft")
            .with_file("frontend/.hidden/page.md", "# Hidden")
            .with_file("frontend/logo.png", "")
            .with_file("frontend/notes.markdown", "")
            .with_file("frontend/git.md", "# Git");

        let tree = walk(&storage, "frontend", ".md").unwrap();

        assert_eq!(tree.to_items(), vec![item("Git", "frontend/git")]);
    }

    #[test]
    fn test_empty_directory_is_empty_branch() {
        let storage = MockStorage::new()
            .with_dir("frontend/empty")
            .with_file("frontend/only-hidden/.keep", "")
            .with_file("frontend/a.md", "");

        let tree = walk(&storage, "frontend", ".md").unwrap();

        assert_eq!(
            tree.to_items(),
            vec![
                item("a", "frontend/a"),
                branch("empty", "frontend/empty/", vec![]),
                branch("only-hidden", "frontend/only-hidden/", vec![]),
            ]
        );
    }

    #[test]
    fn test_missing_category_is_not_found() {
        let storage = MockStorage::new().with_file("frontend/git.md", "");

        let err = walk(&storage, "backend", ".md").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
    }

    #[test]
    fn test_leaf_count_matches_recursive_file_count() {
        let mut storage = MockStorage::new();
        let mut expected = 0;
        for dir in ["c", "c/a", "c/a/b", "c/z"] {
            for name in ["one.md", "two.md", ".x.md", "img.png"] {
                storage = storage.with_file(format!("{dir}/{name}"), "text");
                if name.ends_with(".md") && !name.starts_with('.') {
                    expected += 1;
                }
            }
        }

        let tree = walk(&storage, "c", ".md").unwrap();

        assert_eq!(tree.leaf_count(), expected);
        assert_eq!(tree.len(), expected + 3);
    }

    #[test]
    fn test_custom_suffix() {
        let storage = MockStorage::new()
            .with_file("notes/a.mdx", "# A")
            .with_file("notes/b.md", "# B");

        let tree = walk(&storage, "notes", ".mdx").unwrap();

        assert_eq!(tree.to_items(), vec![item("A", "notes/a")]);
    }
}
