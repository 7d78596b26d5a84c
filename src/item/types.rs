//! Item data model: the canonical local item aggregate and its parts

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::content::{HashedContent, RawContent};
use crate::item::error::Error;

/// Body shape variant a wearable representation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyShape {
    Male,
    Female,
    /// Both concrete shapes at once; mutually exclusive with either one
    Both,
}

impl BodyShape {
    /// String form used for content-path prefixes
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyShape::Male => "male",
            BodyShape::Female => "female",
            BodyShape::Both => "both",
        }
    }
}

impl FromStr for BodyShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "male" => Ok(BodyShape::Male),
            "female" => Ok(BodyShape::Female),
            "both" => Ok(BodyShape::Both),
            _ => Err(Error::UnknownBodyShape(s.to_string())),
        }
    }
}

/// Item rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Unique,
    Mythic,
    Exotic,
    Legendary,
    Epic,
    Rare,
    Uncommon,
    Common,
}

/// Wearable slot categories, including the hideable-only slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WearableCategory {
    BodyShape,
    Earring,
    Eyebrows,
    Eyes,
    Eyewear,
    FacialHair,
    Feet,
    Hair,
    Hands,
    HandsWear,
    Hat,
    Head,
    Helmet,
    LowerBody,
    Mask,
    Mouth,
    Skin,
    Tiara,
    TopHead,
    UpperBody,
}

/// Emote animation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmoteCategory {
    Dance,
    Stylish,
    Fun,
    Poses,
    Greetings,
    Horror,
    Miscellaneous,
    Reactions,
}

/// How an emote animation plays back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotePlayMode {
    Simple,
    Loop,
}

/// Kind tag for locally built items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Wearable,
}

/// One body-shape-specific packaging of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Representation {
    /// Concrete shapes this representation applies to
    pub body_shapes: Vec<BodyShape>,

    /// Entry-point file; always one of `contents`
    pub main_file: String,

    /// Every content path composing this representation
    pub contents: Vec<String>,

    /// Categories hidden only while this representation is worn
    pub override_hides: Vec<WearableCategory>,

    /// Categories replaced only while this representation is worn
    pub override_replaces: Vec<WearableCategory>,
}

/// Mesh/texture counts reported for an item's model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub triangles: u32,
    pub materials: u32,
    pub meshes: u32,
    pub bodies: u32,
    pub entities: u32,
    pub textures: u32,
}

/// The wearable-specific data block of an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WearableData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<WearableCategory>,

    pub representations: Vec<Representation>,

    /// Categories this item replaces when worn
    pub replaces: Vec<WearableCategory>,

    /// Categories this item hides when worn
    pub hides: Vec<WearableCategory>,

    pub tags: Vec<String>,

    /// Default hidings the item opts back out of
    #[serde(
        rename = "removesDefaultHiding",
        skip_serializing_if = "Option::is_none"
    )]
    pub removes_default_hiding: Option<Vec<WearableCategory>>,

    /// Set when the item bundles a scene alongside its model
    #[serde(rename = "isSmart", skip_serializing_if = "Option::is_none")]
    pub is_smart: Option<bool>,
}

/// The canonical item aggregate the builder produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalItem {
    /// Item id; generated when the caller does not supply one
    pub id: String,

    pub name: String,

    pub description: String,

    /// Fixed thumbnail content path
    pub thumbnail: String,

    /// Optional externally-namespaced identifier
    pub urn: Option<String>,

    #[serde(rename = "type")]
    pub item_type: ItemType,

    pub collection_id: Option<String>,

    pub rarity: Option<Rarity>,

    pub data: WearableData,

    pub metrics: ModelMetrics,

    /// Content address per path; every path referenced by any
    /// representation appears here once the item is built
    pub contents: HashedContent,

    pub content_hash: Option<String>,
}

/// The set of properties that, without a representation, defines an item
#[derive(Debug, Clone, Default)]
pub struct BasicItem {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub rarity: Option<Rarity>,
    pub category: Option<WearableCategory>,
    pub collection_id: Option<String>,
    pub urn: Option<String>,
}

/// A finalized item snapshot paired with the blobs that are new or
/// changed since the item's last known state
#[derive(Debug, Clone)]
pub struct BuiltItem {
    pub item: LocalItem,
    pub new_content: RawContent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_shape_round_trip() {
        for shape in [BodyShape::Male, BodyShape::Female, BodyShape::Both] {
            assert_eq!(shape.as_str().parse::<BodyShape>().unwrap(), shape);
        }
        assert!("centaur".parse::<BodyShape>().is_err());
    }

    #[test]
    fn test_representation_serde_uses_camel_case() {
        let representation = Representation {
            body_shapes: vec![BodyShape::Male],
            main_file: "male/model.glb".to_string(),
            contents: vec!["male/model.glb".to_string()],
            override_hides: vec![],
            override_replaces: vec![WearableCategory::Hat],
        };

        let json = serde_json::to_value(&representation).unwrap();
        assert_eq!(json["mainFile"], "male/model.glb");
        assert_eq!(json["bodyShapes"][0], "male");
        assert_eq!(json["overrideReplaces"][0], "hat");
    }

    #[test]
    fn test_wearable_category_serde_uses_snake_case() {
        let json = serde_json::to_value(WearableCategory::UpperBody).unwrap();
        assert_eq!(json, "upper_body");
        let parsed: WearableCategory = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, WearableCategory::UpperBody);
    }

    #[test]
    fn test_model_metrics_default_is_zeroed() {
        let metrics = ModelMetrics::default();
        assert_eq!(metrics.triangles, 0);
        assert_eq!(metrics.textures, 0);
    }
}
