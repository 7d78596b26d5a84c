//! Collaborator boundary for the remote builder API
//!
//! The core never talks to the network itself; it produces
//! `(LocalItem, new content)` pairs shaped for an implementation of
//! [`BuilderApi`]. Transport, signing and retry policy live behind that
//! trait, outside this crate's scope.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::{HashedContent, RawContent};
use crate::item::types::{ItemType, LocalItem, ModelMetrics, Rarity, WearableData};

/// Result type for remote API calls
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by a [`BuilderApi`] implementation
#[derive(Error, Debug)]
pub enum Error {
    /// The server rejected the request
    #[error("The server responded with a {status} error: {message}")]
    ClientError { status: u16, message: String },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),
}

/// An item as the remote API reports it after an upsert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub thumbnail: String,
    pub owner: String,
    pub collection_id: Option<String>,
    pub urn: Option<String>,
    pub rarity: Option<Rarity>,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub data: WearableData,
    pub metrics: ModelMetrics,
    pub contents: HashedContent,
    pub content_hash: Option<String>,
    pub total_supply: Option<u64>,
    pub is_published: bool,
    pub is_approved: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// The remote asset-management API, as the core consumes it
pub trait BuilderApi {
    /// Insert or update an item together with its new content blobs
    fn upsert_item(&self, item: &LocalItem, new_content: &RawContent) -> Result<RemoteItem>;

    /// Probe the stored byte size of a content address
    fn content_size(&self, content_hash: &str) -> Result<u64>;
}
