/*!
 * Asset file loading
 *
 * [`load_file`] turns an uploaded file into a [`LoadedFile`]: a plain
 * model file is wrapped as-is, while a zip bundle is opened, its entries
 * extracted in the caller's binary representation, its manifests
 * validated and cross-checked against the archive contents, and its size
 * measured against the ceiling of the resolved asset category.
 */

pub mod archive;
pub mod error;
pub mod schemas;
pub mod types;
pub mod validate;

use serde_json::Value;
use tracing::debug;

use crate::content::{total_content_size, Blob, RawContent};
use crate::item::types::WearableCategory;
use crate::item::THUMBNAIL_PATH;

use archive::ZipReader;
pub use error::{AssetType, Error, Result};
pub use types::{
    BuilderConfig, EmoteConfig, LoadedFile, SceneConfig, SceneParcels, WearableConfig,
    WearableConfigData,
};
pub use validate::{
    parse_builder_config, parse_emote_config, parse_scene_config, parse_wearable_config,
};

/// Wearable manifest file name, expected at the bundle root
pub const WEARABLE_MANIFEST: &str = "wearable.json";
/// Scene manifest file name, expected at the bundle root
pub const SCENE_MANIFEST: &str = "scene.json";
/// Builder manifest file name, expected at the bundle root
pub const BUILDER_MANIFEST: &str = "builder.json";
/// Emote manifest file name, expected at the bundle root
pub const EMOTE_MANIFEST: &str = "emote.json";

/// Size ceiling for the thumbnail entry
pub const MAX_THUMBNAIL_FILE_SIZE: u64 = 1024 * 1024; // 1MiB
/// Size ceiling for a plain wearable bundle, thumbnail excluded
pub const MAX_WEARABLE_FILE_SIZE: u64 = 3 * 1024 * 1024; // 3MiB
/// Size ceiling for a skin bundle, thumbnail excluded
pub const MAX_SKIN_FILE_SIZE: u64 = 8 * 1024 * 1024; // 8MiB
/// Size ceiling for an emote bundle, thumbnail excluded
pub const MAX_EMOTE_FILE_SIZE: u64 = 3 * 1024 * 1024; // 3MiB
/// Size ceiling for a smart wearable bundle, thumbnail excluded
pub const MAX_SMART_WEARABLE_FILE_SIZE: u64 = 3 * 1024 * 1024; // 3MiB

const MANIFEST_FILE_NAMES: [&str; 4] = [
    WEARABLE_MANIFEST,
    SCENE_MANIFEST,
    BUILDER_MANIFEST,
    EMOTE_MANIFEST,
];

/// Load an uploaded file into its normalized in-memory form
///
/// `.zip` files take the bundle path; files with a recognized model or
/// image extension are wrapped directly as the main model; everything
/// else fails with [`Error::WrongExtension`].
pub fn load_file(file_name: &str, file: Blob) -> Result<LoadedFile> {
    if extension(file_name).as_deref() == Some(".zip") {
        debug!(file = file_name, "loading asset bundle");
        load_bundle(file_name, &file)
    } else if is_model_path(file_name) {
        debug!(file = file_name, "loading single model file");
        let mut content = RawContent::new();
        content.insert(file_name.to_string(), file);
        Ok(LoadedFile {
            content,
            main_model: Some(file_name.to_string()),
            ..LoadedFile::default()
        })
    } else {
        Err(Error::wrong_extension(file_name))
    }
}

fn extension(file_name: &str) -> Option<String> {
    file_name
        .rfind('.')
        .map(|index| file_name[index..].to_lowercase())
        .filter(|ext| ext.len() > 1 && ext[1..].chars().all(|c| c.is_ascii_alphanumeric()))
}

fn is_image_file(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with(".png")
}

fn is_model_file(file_name: &str) -> bool {
    let file_name = file_name.to_lowercase();
    file_name.ends_with(".gltf") || file_name.ends_with(".glb")
}

/// Whether a file can act as a main model
///
/// Masks (`*_mask*`) and the thumbnail are auxiliary images, never main
/// models.
fn is_model_path(file_name: &str) -> bool {
    let file_name = file_name.to_lowercase();
    let is_mask = file_name.contains("_mask");
    is_model_file(&file_name)
        || (!file_name.contains(THUMBNAIL_PATH) && !is_mask && is_image_file(&file_name))
}

fn load_bundle(file_name: &str, file: &Blob) -> Result<LoadedFile> {
    let mut reader = ZipReader::open(file)?;

    let entry_names = reader.entries(&MANIFEST_FILE_NAMES);
    let mut content = RawContent::new();
    for name in &entry_names {
        content.insert(name.clone(), reader.extract(name)?);
    }

    let has_wearable = reader.contains(WEARABLE_MANIFEST);
    let has_scene = reader.contains(SCENE_MANIFEST);

    // A scene is only valid as part of a smart wearable.
    if has_scene && !has_wearable {
        return Err(Error::file_not_found(WEARABLE_MANIFEST));
    }

    let mut loaded = LoadedFile {
        content,
        ..LoadedFile::default()
    };

    if has_wearable {
        debug!(file = file_name, "bundle carries a wearable manifest");
        let manifest = read_manifest(&mut reader, WEARABLE_MANIFEST)?;
        let wearable = parse_wearable_config(&manifest)?;

        for representation in &wearable.data.representations {
            if !representation.contents.contains(&representation.main_file) {
                return Err(Error::ModelInRepresentationNotFound {
                    main_file: representation.main_file.clone(),
                });
            }
            for path in &representation.contents {
                if !reader.contains(path) {
                    return Err(Error::file_not_found(path));
                }
            }
        }

        if has_scene {
            debug!(file = file_name, "bundle is a smart wearable");
            let manifest = read_manifest(&mut reader, SCENE_MANIFEST)?;
            let scene = parse_scene_config(&manifest)?;
            if !reader.contains(&scene.main) {
                return Err(Error::file_not_found(&scene.main));
            }
            loaded.scene = Some(scene);
        }

        let (limit, asset_type) = if wearable.data.category == Some(WearableCategory::Skin) {
            (MAX_SKIN_FILE_SIZE, AssetType::Skin)
        } else if loaded.scene.is_some() {
            (MAX_SMART_WEARABLE_FILE_SIZE, AssetType::SmartWearable)
        } else {
            (MAX_WEARABLE_FILE_SIZE, AssetType::Wearable)
        };
        check_content_size(file_name, &loaded.content, limit, asset_type)?;

        loaded.wearable = Some(wearable);
    }

    if reader.contains(BUILDER_MANIFEST) {
        let manifest = read_manifest(&mut reader, BUILDER_MANIFEST)?;
        loaded.builder = Some(parse_builder_config(&manifest)?);
    }

    if reader.contains(EMOTE_MANIFEST) {
        debug!(file = file_name, "bundle carries an emote manifest");
        let manifest = read_manifest(&mut reader, EMOTE_MANIFEST)?;
        let emote = parse_emote_config(&manifest);
        check_content_size(file_name, &loaded.content, MAX_EMOTE_FILE_SIZE, AssetType::Emote)?;
        loaded.emote = Some(emote);
    }

    if loaded.wearable.is_none() && loaded.builder.is_none() && loaded.emote.is_none() {
        let main_model = entry_names
            .iter()
            .find(|name| is_model_path(name))
            .cloned()
            .ok_or(Error::ModelFileNotFound)?;
        loaded.main_model = Some(main_model);
    }

    Ok(loaded)
}

/// Extract and parse a manifest entry as JSON
fn read_manifest(reader: &mut ZipReader, name: &str) -> Result<Value> {
    let blob = reader.extract(name)?;
    Ok(serde_json::from_slice(blob.as_bytes())?)
}

/// Enforce the category ceiling over the bundle's content sum and the
/// thumbnail's own ceiling over the thumbnail entry
///
/// The content sum excludes the thumbnail; size checks run only after the
/// relevant manifest validated structurally.
fn check_content_size(
    file_name: &str,
    content: &RawContent,
    limit: u64,
    asset_type: AssetType,
) -> Result<()> {
    if let Some(thumbnail) = content.get(THUMBNAIL_PATH) {
        if thumbnail.len() > MAX_THUMBNAIL_FILE_SIZE {
            return Err(Error::file_too_big(
                THUMBNAIL_PATH,
                thumbnail.len(),
                MAX_THUMBNAIL_FILE_SIZE,
                AssetType::Thumbnail,
            ));
        }
    }

    let total = total_content_size(content, &[THUMBNAIL_PATH]);
    if total > limit {
        return Err(Error::file_too_big(file_name, total, limit, asset_type));
    }

    Ok(())
}
