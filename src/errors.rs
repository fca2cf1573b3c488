//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`AvatarError`] covers the failure modes of asset
//! acquisition and configuration:
//! - File I/O errors
//! - glTF parsing and buffer resolution errors
//! - Missing animation data in animation-only files
//! - Configuration parsing errors
//!
//! Once an [`Avatar`](crate::avatar::Avatar) is mounted, nothing it does
//! can fail: missing bones and unknown animation names are silent no-ops.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, AvatarError>`.
//!
//! ```rust,ignore
//! use myth_avatar::errors::Result;
//!
//! fn load_config() -> Result<()> {
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for the avatar crate.
#[derive(Error, Debug)]
pub enum AvatarError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found by the active loader.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// An animation-only asset carried no animation clip.
    #[error("No animation clip found in {}", path.display())]
    MissingAnimation {
        /// Path of the offending asset
        path: PathBuf,
    },

    /// A glTF buffer could not be resolved.
    #[error("Missing glTF buffer: {0}")]
    MissingBuffer(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    Gltf(String),

    /// Data URI parsing error.
    #[error("Data URI error: {0}")]
    DataUri(String),

    /// JSON parsing error (configuration files).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl From<gltf::Error> for AvatarError {
    fn from(err: gltf::Error) -> Self {
        AvatarError::Gltf(err.to_string())
    }
}

/// Alias for `Result<T, AvatarError>`.
pub type Result<T> = std::result::Result<T, AvatarError>;
