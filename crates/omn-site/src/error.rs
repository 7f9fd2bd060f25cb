use omn_storage::{StorageError, StorageErrorKind};

/// Error returned by [`Site`](crate::Site) operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// No category directory with this name.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    /// No document at this route.
    #[error("Page not found: {0}")]
    PageNotFound(String),
    /// Storage failed for a reason other than a missing entry.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SiteError {
    /// Whether the error should be reported as a missing page.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CategoryNotFound(_) | Self::PageNotFound(_))
    }

    /// Storage errors that mean "there is no readable document here".
    pub(crate) fn from_read(err: StorageError, route: &str) -> Self {
        match err.kind {
            StorageErrorKind::NotFound
            | StorageErrorKind::InvalidPath
            | StorageErrorKind::WrongKind
            | StorageErrorKind::InvalidData => Self::PageNotFound(route.to_owned()),
            _ => Self::Storage(err),
        }
    }
}
