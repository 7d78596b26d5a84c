//! Error types for asset-bundle loading and manifest validation

use std::io;
use thiserror::Error;

/// Result type for file loading operations
pub type Result<T> = std::result::Result<T, Error>;

/// Asset category a size ceiling applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    Thumbnail,
    Wearable,
    SmartWearable,
    Skin,
    Emote,
}

impl AssetType {
    /// Tag used in error payloads and messages
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Thumbnail => "thumbnail",
            AssetType::Wearable => "wearable",
            AssetType::SmartWearable => "smart_wearable",
            AssetType::Skin => "skin",
            AssetType::Emote => "emote",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while loading an asset file or bundle
#[derive(Error, Debug)]
pub enum Error {
    /// The uploaded file has an extension the loader does not accept
    #[error("File {file} has a wrong extension")]
    WrongExtension { file: String },

    /// The bytes are not a readable zip structure
    #[error("Corrupt archive: {reason}")]
    CorruptArchive { reason: String },

    /// A named entry is missing from an opened archive
    #[error("Entry {path} was not found in the archive")]
    EntryNotFound { path: String },

    /// A file referenced by a manifest is missing from the bundle
    #[error("File {path} was not found in the bundle")]
    FileNotFound { path: String },

    /// A representation's main file is not part of its declared contents
    #[error("The model file {main_file} is not part of the representation contents")]
    ModelInRepresentationNotFound { main_file: String },

    /// No recognized model or image file exists in the bundle
    #[error("The bundle does not contain a model file")]
    ModelFileNotFound,

    /// A file or bundle exceeds the ceiling of its asset category
    #[error("{file} is {size} bytes which exceeds the {limit} byte limit for {asset_type} assets")]
    FileTooBig {
        file: String,
        size: u64,
        limit: u64,
        asset_type: AssetType,
    },

    /// Required top-level manifest properties are missing
    #[error("The config file is missing the required properties: {}", .properties.join(", "))]
    MissingRequiredProperties { properties: Vec<String> },

    /// The manifest declares permissions outside the known set
    #[error("The config file contains unknown required permissions: {}", .permissions.join(", "))]
    UnknownRequiredPermissions { permissions: Vec<String> },

    /// The manifest declares the same permission more than once
    #[error("The config file contains duplicated required permissions: {}", .permissions.join(", "))]
    DuplicatedRequiredPermissions { permissions: Vec<String> },

    /// `allowedMediaHostnames` is absent, not an array, or empty
    #[error("The allowedMediaHostnames property is empty or invalid")]
    AllowedMediaHostnamesInvalid,

    /// Schema validation failed for a reason with no specific translation
    #[error("Invalid config file:\n  - {}", .violations.join("\n  - "))]
    InvalidConfigFile { violations: Vec<String> },

    /// A schema failed to compile
    #[error("Failed to compile schema: {0}")]
    Schema(String),

    /// Manifest JSON could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading archive entries
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a wrong extension error
    pub fn wrong_extension<S: Into<String>>(file: S) -> Self {
        Error::WrongExtension { file: file.into() }
    }

    /// Create a corrupt archive error
    pub fn corrupt_archive<S: Into<String>>(reason: S) -> Self {
        Error::CorruptArchive {
            reason: reason.into(),
        }
    }

    /// Create an entry not found error
    pub fn entry_not_found<S: Into<String>>(path: S) -> Self {
        Error::EntryNotFound { path: path.into() }
    }

    /// Create a file not found error
    pub fn file_not_found<S: Into<String>>(path: S) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    /// Create a file too big error
    pub fn file_too_big<S: Into<String>>(
        file: S,
        size: u64,
        limit: u64,
        asset_type: AssetType,
    ) -> Self {
        Error::FileTooBig {
            file: file.into(),
            size,
            limit,
            asset_type,
        }
    }
}
