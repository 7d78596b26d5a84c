//! JSON Schemas for the bundle manifests
//!
//! Schemas are built inline and compiled per validation call; the
//! wearable and scene schemas carry the structure the loader relies on
//! (representation shape, permission enums), the builder schema is hints
//! only.

use serde_json::{json, Value};

const BODY_SHAPES: [&str; 3] = ["male", "female", "both"];

const RARITIES: [&str; 8] = [
    "unique",
    "mythic",
    "exotic",
    "legendary",
    "epic",
    "rare",
    "uncommon",
    "common",
];

const WEARABLE_CATEGORIES: [&str; 20] = [
    "body_shape",
    "earring",
    "eyebrows",
    "eyes",
    "eyewear",
    "facial_hair",
    "feet",
    "hair",
    "hands",
    "hands_wear",
    "hat",
    "head",
    "helmet",
    "lower_body",
    "mask",
    "mouth",
    "skin",
    "tiara",
    "top_head",
    "upper_body",
];

/// Permissions a scene may request
pub const REQUIRED_PERMISSIONS: [&str; 7] = [
    "ALLOW_MEDIA_HOSTNAMES",
    "ALLOW_TO_MOVE_PLAYER_INSIDE_SCENE",
    "ALLOW_TO_TRIGGER_AVATAR_EMOTE",
    "OPEN_EXTERNAL_LINK",
    "USE_FETCH",
    "USE_WEBSOCKET",
    "USE_WEB3_API",
];

/// Get the wearable manifest JSON Schema
pub fn wearable_config_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "data"],
        "additionalProperties": false,
        "properties": {
            "id": {
                "type": "string"
            },
            "name": {
                "type": "string"
            },
            "description": {
                "type": "string",
                "maxLength": 64
            },
            "rarity": {
                "enum": RARITIES
            },
            "mapping": {
                "type": "object"
            },
            "data": {
                "type": "object",
                "required": ["replaces", "hides", "tags", "representations", "category"],
                "properties": {
                    "category": {
                        "enum": WEARABLE_CATEGORIES
                    },
                    "replaces": {
                        "type": "array",
                        "items": { "enum": WEARABLE_CATEGORIES }
                    },
                    "hides": {
                        "type": "array",
                        "items": { "enum": WEARABLE_CATEGORIES }
                    },
                    "tags": {
                        "type": "array",
                        "items": {
                            "type": "string",
                            "minLength": 1
                        }
                    },
                    "removesDefaultHiding": {
                        "type": "array",
                        "items": { "enum": WEARABLE_CATEGORIES }
                    },
                    "representations": {
                        "type": "array",
                        "minItems": 1,
                        "items": { "$ref": "#/$defs/representation" }
                    }
                }
            }
        },
        "$defs": {
            "representation": {
                "type": "object",
                "required": [
                    "bodyShapes",
                    "mainFile",
                    "contents",
                    "overrideHides",
                    "overrideReplaces"
                ],
                "properties": {
                    "bodyShapes": {
                        "type": "array",
                        "minItems": 1,
                        "items": { "enum": BODY_SHAPES }
                    },
                    "mainFile": {
                        "type": "string",
                        "minLength": 1
                    },
                    "contents": {
                        "type": "array",
                        "minItems": 1,
                        "items": {
                            "type": "string",
                            "minLength": 1
                        }
                    },
                    "overrideHides": {
                        "type": "array",
                        "items": { "enum": WEARABLE_CATEGORIES }
                    },
                    "overrideReplaces": {
                        "type": "array",
                        "items": { "enum": WEARABLE_CATEGORIES }
                    }
                }
            }
        }
    })
}

/// Get the scene manifest JSON Schema
pub fn scene_config_schema() -> Value {
    json!({
        "type": "object",
        "required": ["main", "scene"],
        "properties": {
            "id": {
                "type": "string"
            },
            "main": {
                "type": "string",
                "minLength": 1
            },
            "scene": {
                "type": "object",
                "required": ["base", "parcels"],
                "properties": {
                    "base": {
                        "type": "string",
                        "minLength": 1
                    },
                    "parcels": {
                        "type": "array",
                        "minItems": 1,
                        "items": {
                            "type": "string",
                            "minLength": 1
                        }
                    }
                }
            },
            "requiredPermissions": {
                "type": "array",
                "uniqueItems": true,
                "items": { "enum": REQUIRED_PERMISSIONS }
            },
            "allowedMediaHostnames": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "string",
                    "minLength": 1
                }
            }
        }
    })
}

/// Get the builder manifest JSON Schema; no required fields
pub fn builder_config_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": [],
        "properties": {
            "id": {
                "type": "string"
            },
            "collectionId": {
                "type": "string"
            }
        }
    })
}
