/*!
 * Item construction
 *
 * [`ItemFactory`] assembles the canonical item aggregate either from
 * primitive calls or from a validated wearable manifest. The factory is
 * state-tagged: it holds no item until [`ItemFactory::new_item`] or
 * [`ItemFactory::from_config`] runs, and every other mutating call fails
 * with [`Error::ItemNotInitialized`] until then. The terminal
 * [`ItemFactory::build`] computes content addresses for everything staged
 * since initialization and returns the finalized snapshot.
 */

pub mod error;
pub mod types;

use uuid::Uuid;

use crate::content::{
    compute_hashes, prefix_content_name, sort_content, RawContent, SortedContent,
};
use crate::files::types::{BuilderConfig, WearableConfig};

pub use error::{Error, Result};
pub use types::{
    BasicItem, BodyShape, BuiltItem, EmoteCategory, EmotePlayMode, ItemType, LocalItem,
    ModelMetrics, Rarity, Representation, WearableCategory, WearableData,
};

use crate::content::Blob;

/// Content path of the item thumbnail
pub const THUMBNAIL_PATH: &str = "thumbnail.png";

/// Content path of the item's catalog image
pub const IMAGE_PATH: &str = "image.png";

/// Characters that would corrupt the item metadata when embedded in it
const RESERVED_METADATA_CHARACTERS: &[char] = &[':'];

/// Stateful builder for a single [`LocalItem`]
///
/// Mutating operations chain through `Result<&mut Self>`; `build` may be
/// called repeatedly and recomputes from the current state each time.
#[derive(Debug, Default)]
pub struct ItemFactory {
    item: Option<LocalItem>,
    new_content: RawContent,
}

impl ItemFactory {
    /// Create an uninitialized factory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory seeded with an already-known item, for editing
    pub fn from_item(item: LocalItem) -> Self {
        Self {
            item: Some(item),
            new_content: RawContent::new(),
        }
    }

    /// Initialize a new item with the base properties
    ///
    /// Generates a v4 UUID when no id is supplied. Rejects names and
    /// descriptions containing reserved metadata characters.
    pub fn new_item(&mut self, basic: BasicItem) -> Result<&mut Self> {
        check_metadata_text(&basic.name)?;
        if let Some(description) = &basic.description {
            check_metadata_text(description)?;
        }

        self.item = Some(LocalItem {
            id: basic.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: basic.name,
            description: basic.description.unwrap_or_default(),
            thumbnail: THUMBNAIL_PATH.to_string(),
            urn: basic.urn,
            item_type: ItemType::Wearable,
            collection_id: basic.collection_id,
            rarity: basic.rarity,
            data: WearableData {
                category: basic.category,
                ..WearableData::default()
            },
            metrics: ModelMetrics::default(),
            contents: Default::default(),
            content_hash: None,
        });
        Ok(self)
    }

    /// Initialize an item from a validated wearable manifest
    ///
    /// Equivalent to [`ItemFactory::new_item`] followed by one
    /// [`ItemFactory::with_representation`] per manifest representation,
    /// restricted to the content paths that representation declares.
    /// Builder-manifest hints, when present, win the id and collection
    /// resolution.
    pub fn from_config(
        &mut self,
        config: &WearableConfig,
        content: RawContent,
        builder: Option<&BuilderConfig>,
    ) -> Result<&mut Self> {
        self.new_item(BasicItem {
            id: builder
                .and_then(|hints| hints.id.clone())
                .or_else(|| config.id.clone()),
            name: config.name.clone(),
            description: config.description.clone(),
            rarity: config.rarity,
            category: config.data.category,
            collection_id: builder.and_then(|hints| hints.collection_id.clone()),
            urn: None,
        })?;

        if let Some(thumbnail) = content.get(THUMBNAIL_PATH) {
            let thumbnail = thumbnail.clone();
            self.with_thumbnail(thumbnail)?;
        }

        self.with_replaces(config.data.replaces.clone())?;
        self.with_hides(config.data.hides.clone())?;
        self.with_tags(config.data.tags.clone())?;

        for representation in &config.data.representations {
            let shape = resolve_body_shape(&representation.body_shapes);
            let subset: RawContent = representation
                .contents
                .iter()
                .filter_map(|path| content.get(path).map(|blob| (path.clone(), blob.clone())))
                .collect();

            self.with_representation(
                shape,
                &representation.main_file,
                subset,
                representation.override_hides.clone(),
                representation.override_replaces.clone(),
            )?;
        }

        Ok(self)
    }

    /// Add a representation and its contents for a body shape
    ///
    /// [`BodyShape::Both`] adds a male and a female representation at
    /// once. The contents are re-keyed with the shape prefix and staged
    /// for hashing. The first representation also contributes the
    /// thumbnail when its content map carries one; later representations
    /// never replace an already staged thumbnail.
    pub fn with_representation(
        &mut self,
        body_shape: BodyShape,
        model: &str,
        contents: RawContent,
        override_hides: Vec<WearableCategory>,
        override_replaces: Vec<WearableCategory>,
    ) -> Result<&mut Self> {
        let item = self.item.as_mut().ok_or(Error::ItemNotInitialized)?;

        let already_exists = item
            .data
            .representations
            .iter()
            .any(|representation| represents_body_shape(body_shape, representation));
        if already_exists {
            return Err(Error::duplicate_representation(body_shape.as_str()));
        }

        let sorted = sort_content(body_shape, &contents);
        let is_first_representation = item.data.representations.is_empty();

        let bucket = match body_shape {
            BodyShape::Male => &sorted.male,
            BodyShape::Female => &sorted.female,
            BodyShape::Both => &sorted.all,
        };
        for (path, blob) in bucket {
            if path != THUMBNAIL_PATH {
                self.new_content.insert(path.clone(), blob.clone());
            }
        }
        if is_first_representation {
            if let Some(thumbnail) = sorted.all.get(THUMBNAIL_PATH) {
                self.new_content
                    .insert(THUMBNAIL_PATH.to_string(), thumbnail.clone());
            }
        }

        item.data.representations.extend(build_representations(
            body_shape,
            model,
            &sorted,
            &override_hides,
            &override_replaces,
        ));

        Ok(self)
    }

    /// Remove the representation for a body shape together with its
    /// staged and already-hashed contents
    ///
    /// [`BodyShape::Both`] removes every representation. An item left
    /// with zero representations also loses its thumbnail entries.
    pub fn without_representation(&mut self, body_shape: BodyShape) -> Result<&mut Self> {
        let item = self.item.as_mut().ok_or(Error::ItemNotInitialized)?;

        remove_shape_entries(body_shape, &mut self.new_content);
        remove_shape_entries(body_shape, &mut item.contents);
        item.data
            .representations
            .retain(|representation| !represents_body_shape(body_shape, representation));

        if item.data.representations.is_empty() {
            item.contents.remove(THUMBNAIL_PATH);
            self.new_content.remove(THUMBNAIL_PATH);
        }

        Ok(self)
    }

    /// Stage a new thumbnail, superseding any previously hashed one
    pub fn with_thumbnail(&mut self, thumbnail: Blob) -> Result<&mut Self> {
        self.stage_content(THUMBNAIL_PATH, thumbnail)
    }

    /// Stage a new catalog image, superseding any previously hashed one
    pub fn with_image(&mut self, image: Blob) -> Result<&mut Self> {
        self.stage_content(IMAGE_PATH, image)
    }

    /// Stage arbitrary content entries, superseding previously hashed
    /// entries at the same paths
    pub fn with_content(&mut self, contents: RawContent) -> Result<&mut Self> {
        let item = self.item.as_mut().ok_or(Error::ItemNotInitialized)?;
        for (path, blob) in contents {
            item.contents.remove(&path);
            self.new_content.insert(path, blob);
        }
        Ok(self)
    }

    /// Set or update the item's id
    pub fn with_id<S: Into<String>>(&mut self, id: S) -> Result<&mut Self> {
        self.item_mut()?.id = id.into();
        Ok(self)
    }

    /// Set or update the item's name
    pub fn with_name<S: Into<String>>(&mut self, name: S) -> Result<&mut Self> {
        self.item_mut()?.name = name.into();
        Ok(self)
    }

    /// Set or update the item's description
    pub fn with_description<S: Into<String>>(&mut self, description: S) -> Result<&mut Self> {
        self.item_mut()?.description = description.into();
        Ok(self)
    }

    /// Set or update the item's rarity
    pub fn with_rarity(&mut self, rarity: Rarity) -> Result<&mut Self> {
        self.item_mut()?.rarity = Some(rarity);
        Ok(self)
    }

    /// Set or update the collection the item belongs to
    pub fn with_collection_id<S: Into<String>>(&mut self, collection_id: S) -> Result<&mut Self> {
        self.item_mut()?.collection_id = Some(collection_id.into());
        Ok(self)
    }

    /// Set or update the item's urn
    pub fn with_urn<S: Into<String>>(&mut self, urn: S) -> Result<&mut Self> {
        self.item_mut()?.urn = Some(urn.into());
        Ok(self)
    }

    /// Set or update the item's wearable category
    pub fn with_category(&mut self, category: WearableCategory) -> Result<&mut Self> {
        self.item_mut()?.data.category = Some(category);
        Ok(self)
    }

    /// Set or update the categories the item hides
    pub fn with_hides(&mut self, hides: Vec<WearableCategory>) -> Result<&mut Self> {
        self.item_mut()?.data.hides = hides;
        Ok(self)
    }

    /// Set or update the categories the item replaces
    pub fn with_replaces(&mut self, replaces: Vec<WearableCategory>) -> Result<&mut Self> {
        self.item_mut()?.data.replaces = replaces;
        Ok(self)
    }

    /// Set or update the item's tags
    pub fn with_tags(&mut self, tags: Vec<String>) -> Result<&mut Self> {
        self.item_mut()?.data.tags = tags;
        Ok(self)
    }

    /// Set or update the item's model metrics
    pub fn with_metrics(&mut self, metrics: ModelMetrics) -> Result<&mut Self> {
        self.item_mut()?.metrics = metrics;
        Ok(self)
    }

    /// Finalize the current state into a [`BuiltItem`]
    ///
    /// Hashes the staged content in parallel, merges the addresses into
    /// the item's content map (new entries win), and returns the snapshot
    /// together with the staged blobs. The factory state is untouched, so
    /// repeated builds over unchanged state produce equal results.
    pub fn build(&self) -> Result<BuiltItem> {
        let item = self.item.as_ref().ok_or(Error::ItemNotInitialized)?;

        let mut item = item.clone();
        item.contents.extend(compute_hashes(&self.new_content));

        Ok(BuiltItem {
            item,
            new_content: self.new_content.clone(),
        })
    }

    fn item_mut(&mut self) -> Result<&mut LocalItem> {
        self.item.as_mut().ok_or(Error::ItemNotInitialized)
    }

    fn stage_content(&mut self, path: &str, blob: Blob) -> Result<&mut Self> {
        let item = self.item.as_mut().ok_or(Error::ItemNotInitialized)?;
        item.contents.remove(path);
        self.new_content.insert(path.to_string(), blob);
        Ok(self)
    }
}

/// Whether a representation would overlap the given body shape
fn represents_body_shape(body_shape: BodyShape, representation: &Representation) -> bool {
    match body_shape {
        BodyShape::Both => true,
        BodyShape::Male => representation.body_shapes.contains(&BodyShape::Male),
        BodyShape::Female => representation.body_shapes.contains(&BodyShape::Female),
    }
}

/// Build the one or two representation records for a body shape
fn build_representations(
    body_shape: BodyShape,
    model: &str,
    sorted: &SortedContent,
    override_hides: &[WearableCategory],
    override_replaces: &[WearableCategory],
) -> Vec<Representation> {
    let mut representations = Vec::new();

    if matches!(body_shape, BodyShape::Male | BodyShape::Both) {
        representations.push(Representation {
            body_shapes: vec![BodyShape::Male],
            main_file: prefix_content_name(BodyShape::Male, model),
            contents: sorted.male.keys().cloned().collect(),
            override_hides: override_hides.to_vec(),
            override_replaces: override_replaces.to_vec(),
        });
    }

    if matches!(body_shape, BodyShape::Female | BodyShape::Both) {
        representations.push(Representation {
            body_shapes: vec![BodyShape::Female],
            main_file: prefix_content_name(BodyShape::Female, model),
            contents: sorted.female.keys().cloned().collect(),
            override_hides: override_hides.to_vec(),
            override_replaces: override_replaces.to_vec(),
        });
    }

    representations
}

/// Drop every entry belonging to the given shape's prefix; `Both` clears
/// the whole map
fn remove_shape_entries<V>(
    body_shape: BodyShape,
    entries: &mut std::collections::BTreeMap<String, V>,
) {
    match body_shape {
        BodyShape::Both => entries.clear(),
        shape => {
            let prefix = format!("{}/", shape.as_str());
            entries.retain(|path, _| !path.starts_with(&prefix));
        }
    }
}

/// Collapse a manifest representation's shape list to one [`BodyShape`]
fn resolve_body_shape(body_shapes: &[BodyShape]) -> BodyShape {
    let male = body_shapes.contains(&BodyShape::Male);
    let female = body_shapes.contains(&BodyShape::Female);
    if body_shapes.contains(&BodyShape::Both) || (male && female) {
        BodyShape::Both
    } else if female {
        BodyShape::Female
    } else {
        BodyShape::Male
    }
}

fn check_metadata_text(text: &str) -> Result<()> {
    if text.contains(RESERVED_METADATA_CHARACTERS) {
        return Err(Error::invalid_metadata_text(text));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::compute_hash;

    fn basic_item() -> BasicItem {
        BasicItem {
            name: "hat of tests".to_string(),
            rarity: Some(Rarity::Rare),
            category: Some(WearableCategory::Hat),
            ..BasicItem::default()
        }
    }

    fn raw(entries: &[(&str, &[u8])]) -> RawContent {
        entries
            .iter()
            .map(|(path, bytes)| (path.to_string(), Blob::from(*bytes)))
            .collect()
    }

    #[test]
    fn test_mutations_fail_before_initialization() {
        let mut factory = ItemFactory::new();
        assert_eq!(
            factory.with_name("anything").unwrap_err(),
            Error::ItemNotInitialized
        );
        assert_eq!(
            factory
                .with_representation(BodyShape::Male, "m.glb", RawContent::new(), vec![], vec![])
                .unwrap_err(),
            Error::ItemNotInitialized
        );
        assert_eq!(factory.build().unwrap_err(), Error::ItemNotInitialized);
    }

    #[test]
    fn test_new_item_defaults() {
        let mut factory = ItemFactory::new();
        factory.new_item(basic_item()).unwrap();
        let built = factory.build().unwrap();

        assert!(!built.item.id.is_empty());
        assert_eq!(built.item.thumbnail, THUMBNAIL_PATH);
        assert_eq!(built.item.item_type, ItemType::Wearable);
        assert_eq!(built.item.metrics, ModelMetrics::default());
        assert!(built.item.data.representations.is_empty());
        assert!(built.item.contents.is_empty());
        assert!(built.item.content_hash.is_none());
    }

    #[test]
    fn test_new_item_keeps_supplied_id() {
        let mut factory = ItemFactory::new();
        factory
            .new_item(BasicItem {
                id: Some("fixed-id".to_string()),
                ..basic_item()
            })
            .unwrap();
        assert_eq!(factory.build().unwrap().item.id, "fixed-id");
    }

    #[test]
    fn test_new_item_rejects_reserved_characters() {
        let mut factory = ItemFactory::new();
        let err = factory
            .new_item(BasicItem {
                name: "bad:name".to_string(),
                ..basic_item()
            })
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMetadataText { .. }));

        let err = factory
            .new_item(BasicItem {
                description: Some("a:b".to_string()),
                ..basic_item()
            })
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMetadataText { .. }));
    }

    #[test]
    fn test_representation_round_trip() {
        let contents = raw(&[("model.glb", b"model bytes"), ("tex.png", b"texture")]);
        let mut factory = ItemFactory::new();
        factory
            .new_item(basic_item())
            .unwrap()
            .with_representation(BodyShape::Male, "model.glb", contents.clone(), vec![], vec![])
            .unwrap();

        let built = factory.build().unwrap();
        let representation = &built.item.data.representations[0];

        assert_eq!(representation.body_shapes, vec![BodyShape::Male]);
        assert_eq!(representation.main_file, "male/model.glb");
        assert!(representation
            .contents
            .contains(&"male/model.glb".to_string()));

        // Every representation path is hashed, and the hash matches the
        // address of the original blob.
        for path in &representation.contents {
            let original = path.strip_prefix("male/").unwrap();
            assert_eq!(
                built.item.contents[path],
                compute_hash(&contents[original])
            );
        }
        let keys: Vec<&String> = built.new_content.keys().collect();
        assert_eq!(keys, representation.contents.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_duplicate_representation_is_rejected() {
        let mut factory = ItemFactory::new();
        factory
            .new_item(basic_item())
            .unwrap()
            .with_representation(BodyShape::Male, "m.glb", raw(&[("m.glb", b"m")]), vec![], vec![])
            .unwrap();

        let err = factory
            .with_representation(BodyShape::Male, "m.glb", raw(&[("m.glb", b"m")]), vec![], vec![])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateRepresentation(_)));

        // BOTH overlaps the existing male representation.
        let err = factory
            .with_representation(BodyShape::Both, "m.glb", raw(&[("m.glb", b"m")]), vec![], vec![])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateRepresentation(_)));
    }

    #[test]
    fn test_both_adds_two_representations() {
        let mut factory = ItemFactory::new();
        factory
            .new_item(basic_item())
            .unwrap()
            .with_representation(
                BodyShape::Both,
                "model.glb",
                raw(&[("model.glb", b"m"), ("thumbnail.png", b"t")]),
                vec![],
                vec![],
            )
            .unwrap();

        let built = factory.build().unwrap();
        assert_eq!(built.item.data.representations.len(), 2);
        assert!(built.item.contents.contains_key("male/model.glb"));
        assert!(built.item.contents.contains_key("female/model.glb"));
        assert!(built.item.contents.contains_key(THUMBNAIL_PATH));
    }

    #[test]
    fn test_thumbnail_survives_second_representation() {
        let mut factory = ItemFactory::new();
        factory
            .new_item(basic_item())
            .unwrap()
            .with_representation(
                BodyShape::Male,
                "m.glb",
                raw(&[("m.glb", b"m"), ("thumbnail.png", b"the thumbnail")]),
                vec![],
                vec![],
            )
            .unwrap()
            .with_representation(BodyShape::Female, "f.glb", raw(&[("f.glb", b"f")]), vec![], vec![])
            .unwrap();

        let built = factory.build().unwrap();
        assert_eq!(
            built.new_content[THUMBNAIL_PATH].as_bytes(),
            b"the thumbnail"
        );
        assert!(built.item.contents.contains_key(THUMBNAIL_PATH));
    }

    #[test]
    fn test_second_representation_does_not_replace_thumbnail() {
        let mut factory = ItemFactory::new();
        factory
            .new_item(basic_item())
            .unwrap()
            .with_representation(
                BodyShape::Male,
                "m.glb",
                raw(&[("m.glb", b"m"), ("thumbnail.png", b"first")]),
                vec![],
                vec![],
            )
            .unwrap()
            .with_representation(
                BodyShape::Female,
                "f.glb",
                raw(&[("f.glb", b"f"), ("thumbnail.png", b"second")]),
                vec![],
                vec![],
            )
            .unwrap();

        let built = factory.build().unwrap();
        assert_eq!(built.new_content[THUMBNAIL_PATH].as_bytes(), b"first");
    }

    #[test]
    fn test_removing_both_clears_everything() {
        let mut factory = ItemFactory::new();
        factory
            .new_item(basic_item())
            .unwrap()
            .with_representation(
                BodyShape::Both,
                "model.glb",
                raw(&[("model.glb", b"m"), ("thumbnail.png", b"t")]),
                vec![],
                vec![],
            )
            .unwrap()
            .without_representation(BodyShape::Both)
            .unwrap();

        let built = factory.build().unwrap();
        assert!(built.item.data.representations.is_empty());
        assert!(built.item.contents.is_empty());
        assert!(built.new_content.is_empty());
    }

    #[test]
    fn test_removing_one_shape_keeps_the_other() {
        let mut factory = ItemFactory::new();
        factory
            .new_item(basic_item())
            .unwrap()
            .with_representation(
                BodyShape::Male,
                "m.glb",
                raw(&[("m.glb", b"m"), ("thumbnail.png", b"t")]),
                vec![],
                vec![],
            )
            .unwrap()
            .with_representation(BodyShape::Female, "f.glb", raw(&[("f.glb", b"f")]), vec![], vec![])
            .unwrap()
            .without_representation(BodyShape::Male)
            .unwrap();

        let built = factory.build().unwrap();
        assert_eq!(built.item.data.representations.len(), 1);
        assert_eq!(
            built.item.data.representations[0].body_shapes,
            vec![BodyShape::Female]
        );
        assert!(!built.new_content.contains_key("male/m.glb"));
        assert!(built.new_content.contains_key("female/f.glb"));
        // A representation remains, so the thumbnail stays.
        assert!(built.new_content.contains_key(THUMBNAIL_PATH));
    }

    #[test]
    fn test_staged_content_supersedes_hashed_content() {
        let mut factory = ItemFactory::from_item(LocalItem {
            id: "existing".to_string(),
            name: "existing".to_string(),
            description: String::new(),
            thumbnail: THUMBNAIL_PATH.to_string(),
            urn: None,
            item_type: ItemType::Wearable,
            collection_id: None,
            rarity: None,
            data: WearableData::default(),
            metrics: ModelMetrics::default(),
            contents: [(THUMBNAIL_PATH.to_string(), "stale-hash".to_string())]
                .into_iter()
                .collect(),
            content_hash: None,
        });

        factory.with_thumbnail(Blob::from(&b"fresh"[..])).unwrap();
        let built = factory.build().unwrap();

        assert_eq!(
            built.item.contents[THUMBNAIL_PATH],
            compute_hash(&Blob::from(&b"fresh"[..]))
        );
    }

    #[test]
    fn test_build_is_repeatable() {
        let mut factory = ItemFactory::new();
        factory
            .new_item(basic_item())
            .unwrap()
            .with_representation(BodyShape::Male, "m.glb", raw(&[("m.glb", b"m")]), vec![], vec![])
            .unwrap();

        let first = factory.build().unwrap();
        let second = factory.build().unwrap();
        assert_eq!(first.item, second.item);
        assert_eq!(first.new_content, second.new_content);
    }

    #[test]
    fn test_scalar_setters() {
        let mut factory = ItemFactory::new();
        factory
            .new_item(basic_item())
            .unwrap()
            .with_name("renamed")
            .unwrap()
            .with_description("described")
            .unwrap()
            .with_rarity(Rarity::Unique)
            .unwrap()
            .with_collection_id("collection-1")
            .unwrap()
            .with_urn("urn:atelier:items:1")
            .unwrap()
            .with_category(WearableCategory::Eyewear)
            .unwrap()
            .with_hides(vec![WearableCategory::Eyes])
            .unwrap()
            .with_tags(vec!["tagged".to_string()])
            .unwrap();

        let item = factory.build().unwrap().item;
        assert_eq!(item.name, "renamed");
        assert_eq!(item.description, "described");
        assert_eq!(item.rarity, Some(Rarity::Unique));
        assert_eq!(item.collection_id.as_deref(), Some("collection-1"));
        assert_eq!(item.urn.as_deref(), Some("urn:atelier:items:1"));
        assert_eq!(item.data.category, Some(WearableCategory::Eyewear));
        assert_eq!(item.data.hides, vec![WearableCategory::Eyes]);
        assert_eq!(item.data.tags, vec!["tagged".to_string()]);
    }

    #[test]
    fn test_with_image_stages_under_fixed_path() {
        let mut factory = ItemFactory::new();
        factory
            .new_item(basic_item())
            .unwrap()
            .with_image(Blob::from(&b"img"[..]))
            .unwrap();

        let built = factory.build().unwrap();
        assert!(built.new_content.contains_key(IMAGE_PATH));
        assert!(built.item.contents.contains_key(IMAGE_PATH));
    }
}
