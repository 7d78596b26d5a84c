//! Manifest config types and the loader output

use serde::{Deserialize, Serialize};

use crate::content::RawContent;
use crate::item::types::{EmoteCategory, EmotePlayMode, Rarity, Representation, WearableCategory};

/// Wearable manifest (`wearable.json` at the bundle root)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WearableConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,

    pub data: WearableConfigData,

    /// Opaque external mapping reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<serde_json::Value>,
}

/// The `data` block of a wearable manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WearableConfigData {
    pub category: Option<WearableCategory>,
    pub replaces: Vec<WearableCategory>,
    pub hides: Vec<WearableCategory>,
    pub tags: Vec<String>,
    pub representations: Vec<Representation>,

    #[serde(
        rename = "removesDefaultHiding",
        skip_serializing_if = "Option::is_none"
    )]
    pub removes_default_hiding: Option<Vec<WearableCategory>>,
}

/// Scene manifest (`scene.json` at the bundle root)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Entry-point file of the scene
    pub main: String,

    pub scene: SceneParcels,

    #[serde(
        rename = "requiredPermissions",
        skip_serializing_if = "Option::is_none"
    )]
    pub required_permissions: Option<Vec<String>>,

    #[serde(
        rename = "allowedMediaHostnames",
        skip_serializing_if = "Option::is_none"
    )]
    pub allowed_media_hostnames: Option<Vec<String>>,
}

/// Parcel layout declared by a scene manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneParcels {
    pub base: String,
    pub parcels: Vec<String>,
}

/// Builder manifest (`builder.json` at the bundle root); id hints only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "collectionId", skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
}

/// Emote manifest (`emote.json` at the bundle root); parsed leniently
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmoteConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EmoteCategory>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_mode: Option<EmotePlayMode>,
}

/// Output of [`crate::files::load_file`]
///
/// Holds the bundle's content map plus whichever manifests were found, or
/// the detected main model path when no manifest drives the bundle.
#[derive(Debug, Clone, Default)]
pub struct LoadedFile {
    pub content: RawContent,
    pub wearable: Option<WearableConfig>,
    pub scene: Option<SceneConfig>,
    pub builder: Option<BuilderConfig>,
    pub emote: Option<EmoteConfig>,
    pub main_model: Option<String>,
}
