use std::path::PathBuf;

/// Errors from editing a package tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackageError {
    /// The entry name cannot be used inside a package.
    #[error("invalid entry name {name:?}: {reason}")]
    InvalidEntryName { name: String, reason: String },

    /// An entry with this name already exists.
    #[error("entry already exists: {0}")]
    EntryExists(String),

    /// The operation needs a directory but the package is a regular file.
    #[error("package is not a directory")]
    NotADirectory,
}

/// Result alias for package tree operations.
pub type PackageResult<T> = Result<T, PackageError>;

/// Errors from package storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Nothing exists at the location.
    #[error("no package at {0}")]
    NotFound(PathBuf),

    /// The backend can only persist directory packages.
    #[error("cannot save a flat file as a package at {0}")]
    NotADirectory(PathBuf),

    /// The location has no usable file name.
    #[error("invalid package location: {0}")]
    InvalidLocation(PathBuf),

    /// The loaded tree could not be assembled.
    #[error("package error: {0}")]
    Package(#[from] PackageError),

    /// I/O error from the underlying storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
