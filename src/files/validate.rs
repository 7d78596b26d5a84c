//! Manifest validation and schema-violation translation
//!
//! Manifests validate against the schemas in [`crate::files::schemas`].
//! On failure the raw violation list is folded into the single most
//! specific domain error that matches, in a fixed precedence order:
//! missing required root properties, unknown `requiredPermissions`
//! values, duplicated `requiredPermissions` values, an invalid
//! `allowedMediaHostnames` array, and finally the generic invalid-config
//! error carrying the formatted violations.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde_json::Value;

use crate::files::error::{Error, Result};
use crate::files::schemas;
use crate::files::types::{BuilderConfig, EmoteConfig, SceneConfig, WearableConfig};

/// Validate and deserialize a wearable manifest
pub fn parse_wearable_config(value: &Value) -> Result<WearableConfig> {
    check(&schemas::wearable_config_schema(), value)?;
    Ok(serde_json::from_value(value.clone())?)
}

/// Validate and deserialize a scene manifest
pub fn parse_scene_config(value: &Value) -> Result<SceneConfig> {
    check(&schemas::scene_config_schema(), value)?;
    Ok(serde_json::from_value(value.clone())?)
}

/// Validate and deserialize a builder manifest
pub fn parse_builder_config(value: &Value) -> Result<BuilderConfig> {
    check(&schemas::builder_config_schema(), value)?;
    Ok(serde_json::from_value(value.clone())?)
}

/// Leniently parse an emote manifest
///
/// Never fails: unknown keys are ignored and known properties that do
/// not validate are dropped individually instead of rejecting the whole
/// manifest.
pub fn parse_emote_config(value: &Value) -> EmoteConfig {
    let mut config = EmoteConfig::default();
    let Some(object) = value.as_object() else {
        return config;
    };

    if let Some(name) = object.get("name").and_then(Value::as_str) {
        config.name = Some(name.to_string());
    }
    if let Some(description) = object.get("description").and_then(Value::as_str) {
        if description.len() <= 64 {
            config.description = Some(description.to_string());
        }
    }
    if let Some(tags) = object.get("tags") {
        if let Ok(tags) = serde_json::from_value::<Vec<String>>(tags.clone()) {
            if tags.iter().all(|tag| !tag.is_empty()) {
                config.tags = Some(tags);
            }
        }
    }
    if let Some(rarity) = object.get("rarity") {
        config.rarity = serde_json::from_value(rarity.clone()).ok();
    }
    if let Some(category) = object.get("category") {
        config.category = serde_json::from_value(category.clone()).ok();
    }
    if let Some(play_mode) = object.get("play_mode") {
        config.play_mode = serde_json::from_value(play_mode.clone()).ok();
    }

    config
}

/// Validate an instance against a schema, translating failures
fn check(schema: &Value, instance: &Value) -> Result<()> {
    let compiled = Validator::new(schema).map_err(|e| Error::Schema(e.to_string()))?;

    if let Err(errors) = compiled.validate(instance) {
        let errors: Vec<ValidationError> = errors.collect();
        return Err(translate_errors(instance, &errors));
    }

    Ok(())
}

/// Fold raw schema violations into the most specific matching error
fn translate_errors(instance: &Value, errors: &[ValidationError]) -> Error {
    let missing: Vec<String> = errors
        .iter()
        .filter(|error| error.instance_path.to_string().is_empty())
        .filter_map(|error| match &error.kind {
            ValidationErrorKind::Required { property } => {
                property.as_str().map(String::from)
            }
            _ => None,
        })
        .collect();
    if !missing.is_empty() {
        return Error::MissingRequiredProperties {
            properties: missing,
        };
    }

    let permissions = instance
        .get("requiredPermissions")
        .and_then(Value::as_array);

    let unknown: Vec<String> = errors
        .iter()
        .filter(|error| is_permissions_error(error))
        .filter(|error| matches!(error.kind, ValidationErrorKind::Enum { .. }))
        .filter_map(instance_index)
        .filter_map(|index| {
            permissions
                .and_then(|values| values.get(index))
                .and_then(Value::as_str)
                .map(String::from)
        })
        .collect();
    if !unknown.is_empty() {
        return Error::UnknownRequiredPermissions {
            permissions: unknown,
        };
    }

    let has_duplicates = errors.iter().any(|error| {
        is_permissions_error(error) && matches!(error.kind, ValidationErrorKind::UniqueItems)
    });
    if has_duplicates {
        return Error::DuplicatedRequiredPermissions {
            permissions: duplicated_values(permissions),
        };
    }

    let hostnames_invalid = errors.iter().any(|error| {
        instance_property(error).as_deref() == Some("allowedMediaHostnames")
            && matches!(
                error.kind,
                ValidationErrorKind::Type { .. } | ValidationErrorKind::MinItems { .. }
            )
    });
    if hostnames_invalid {
        return Error::AllowedMediaHostnamesInvalid;
    }

    Error::InvalidConfigFile {
        violations: errors.iter().map(format_violation).collect(),
    }
}

/// Format a violation into a readable string for diagnostics
fn format_violation(error: &ValidationError) -> String {
    format!("{}: {}", error.instance_path, error)
}

fn is_permissions_error(error: &ValidationError) -> bool {
    instance_property(error).as_deref() == Some("requiredPermissions")
}

/// First segment of the violation's instance path
fn instance_property(error: &ValidationError) -> Option<String> {
    let path = error.instance_path.to_string();
    path.strip_prefix('/')
        .and_then(|rest| rest.split('/').next().map(String::from))
}

/// Last segment of the violation's instance path, as an array index
fn instance_index(error: &ValidationError) -> Option<usize> {
    let path = error.instance_path.to_string();
    path.rsplit('/').next()?.parse().ok()
}

/// Values appearing more than once, in first-seen order, deduplicated
fn duplicated_values(values: Option<&Vec<Value>>) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    let mut duplicated = Vec::new();
    for value in values.into_iter().flatten() {
        if let Some(text) = value.as_str() {
            if !seen.insert(text) && !duplicated.iter().any(|d| d == text) {
                duplicated.push(text.to_string());
            }
        }
    }
    duplicated
}
