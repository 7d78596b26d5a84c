/*!
 * Content blobs, content addressing, and body-shape content sorting
 *
 * Every file that travels through the SDK is an opaque [`Blob`]. The three
 * variants mirror the binary representations callers hand us (a fixed byte
 * array, a growable buffer, or a shared reference-counted payload) and are
 * interchangeable for hashing: identical bytes always produce the same
 * content address no matter which variant carries them.
 */

use std::collections::BTreeMap;

use bytes::Bytes;
use rayon::prelude::*;

use crate::item::types::BodyShape;
use crate::item::THUMBNAIL_PATH;

/// A relative path keyed map of raw content blobs
pub type RawContent = BTreeMap<String, Blob>;

/// A relative path keyed map of content addresses
pub type HashedContent = BTreeMap<String, String>;

/// An immutable byte payload in one of the supported representations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blob {
    /// Fixed-size byte array
    Array(Box<[u8]>),
    /// Growable buffer
    Buffer(Vec<u8>),
    /// Shared reference-counted payload
    Shared(Bytes),
}

/// Representation tag for a [`Blob`], used to rebuild extracted archive
/// entries in the same flavor as the archive itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    Array,
    Buffer,
    Shared,
}

impl Blob {
    /// View the payload as a byte slice
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Blob::Array(bytes) => bytes,
            Blob::Buffer(bytes) => bytes,
            Blob::Shared(bytes) => bytes,
        }
    }

    /// Payload size in bytes
    pub fn len(&self) -> u64 {
        self.as_bytes().len() as u64
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// The representation this blob uses
    pub fn kind(&self) -> BlobKind {
        match self {
            Blob::Array(_) => BlobKind::Array,
            Blob::Buffer(_) => BlobKind::Buffer,
            Blob::Shared(_) => BlobKind::Shared,
        }
    }

    /// Build a blob with the given representation from an owned buffer
    pub fn from_parts(kind: BlobKind, bytes: Vec<u8>) -> Self {
        match kind {
            BlobKind::Array => Blob::Array(bytes.into_boxed_slice()),
            BlobKind::Buffer => Blob::Buffer(bytes),
            BlobKind::Shared => Blob::Shared(Bytes::from(bytes)),
        }
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Blob::Buffer(bytes)
    }
}

impl From<Box<[u8]>> for Blob {
    fn from(bytes: Box<[u8]>) -> Self {
        Blob::Array(bytes)
    }
}

impl From<Bytes> for Blob {
    fn from(bytes: Bytes) -> Self {
        Blob::Shared(bytes)
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Self {
        Blob::Buffer(bytes.to_vec())
    }
}

/// Content sorted into per-body-shape buckets
///
/// `all` holds the shared thumbnail unprefixed plus every path in `male`
/// and `female`; the per-shape buckets hold only shape-prefixed paths and
/// never the thumbnail.
#[derive(Debug, Clone, Default)]
pub struct SortedContent {
    pub male: RawContent,
    pub female: RawContent,
    pub all: RawContent,
}

/// Compute the content address of a blob
///
/// BLAKE3 hex digest over the raw bytes. Pure: equal bytes yield equal
/// addresses regardless of the blob representation.
pub fn compute_hash(blob: &Blob) -> String {
    blake3::hash(blob.as_bytes()).to_hex().to_string()
}

/// Compute one content address per path
///
/// Hashes run in parallel; every path in the input appears in the output
/// and the call only returns once all digests are complete.
pub fn compute_hashes(contents: &RawContent) -> HashedContent {
    contents
        .par_iter()
        .map(|(path, blob)| (path.clone(), compute_hash(blob)))
        .collect()
}

/// Sum the sizes of all blobs, skipping the paths in `exclude`
pub fn total_content_size(contents: &RawContent, exclude: &[&str]) -> u64 {
    contents
        .iter()
        .filter(|(path, _)| !exclude.contains(&path.as_str()))
        .map(|(_, blob)| blob.len())
        .sum()
}

/// Prefix a content key with a body shape, e.g. `male/model.glb`
pub fn prefix_content_name(body_shape: BodyShape, content_key: &str) -> String {
    format!("{}/{}", body_shape.as_str(), content_key)
}

/// Sort content into "male", "female" and "all" buckets for a body shape
///
/// The shape buckets get every non-thumbnail path prefixed with the shape
/// name; the opposite shape's bucket stays empty unless the shape is
/// [`BodyShape::Both`]. The thumbnail, when present, lands only in `all`
/// under its original name.
pub fn sort_content(body_shape: BodyShape, contents: &RawContent) -> SortedContent {
    let male = if matches!(body_shape, BodyShape::Male | BodyShape::Both) {
        prefix_contents(BodyShape::Male, contents)
    } else {
        RawContent::new()
    };
    let female = if matches!(body_shape, BodyShape::Female | BodyShape::Both) {
        prefix_contents(BodyShape::Female, contents)
    } else {
        RawContent::new()
    };

    let mut all = RawContent::new();
    if let Some(thumbnail) = contents.get(THUMBNAIL_PATH) {
        all.insert(THUMBNAIL_PATH.to_string(), thumbnail.clone());
    }
    all.extend(male.clone());
    all.extend(female.clone());

    SortedContent { male, female, all }
}

/// Re-key a content map with shape-prefixed names, dropping the thumbnail
///
/// Prefixing keeps representation files from colliding with the other
/// shape's files once they share one content map.
pub fn prefix_contents(body_shape: BodyShape, contents: &RawContent) -> RawContent {
    contents
        .iter()
        .filter(|(key, _)| key.as_str() != THUMBNAIL_PATH)
        .map(|(key, blob)| (prefix_content_name(body_shape, key), blob.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entries: &[(&str, &[u8])]) -> RawContent {
        entries
            .iter()
            .map(|(path, bytes)| (path.to_string(), Blob::from(*bytes)))
            .collect()
    }

    #[test]
    fn test_hash_is_deterministic_across_representations() {
        let data = b"the same bytes".to_vec();
        let array = Blob::Array(data.clone().into_boxed_slice());
        let buffer = Blob::Buffer(data.clone());
        let shared = Blob::Shared(Bytes::from(data));

        let hash = compute_hash(&array);
        assert_eq!(hash, compute_hash(&buffer));
        assert_eq!(hash, compute_hash(&shared));
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_hash_differs_for_different_bytes() {
        let a = compute_hash(&Blob::from(&b"aaa"[..]));
        let b = compute_hash(&Blob::from(&b"aab"[..]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_compute_hashes_keeps_every_path() {
        let contents = raw(&[("a.png", b"a"), ("b.glb", b"b"), ("c/d.png", b"cd")]);
        let hashes = compute_hashes(&contents);

        assert_eq!(hashes.len(), 3);
        for (path, blob) in &contents {
            assert_eq!(hashes[path], compute_hash(blob));
        }
    }

    #[test]
    fn test_total_content_size_excludes_requested_paths() {
        let contents = raw(&[("a.png", b"12345"), ("thumbnail.png", b"123")]);
        assert_eq!(total_content_size(&contents, &[]), 8);
        assert_eq!(total_content_size(&contents, &["thumbnail.png"]), 5);
    }

    #[test]
    fn test_sort_content_male_only() {
        let contents = raw(&[("model.glb", b"m"), ("thumbnail.png", b"t")]);
        let sorted = sort_content(BodyShape::Male, &contents);

        assert!(sorted.male.contains_key("male/model.glb"));
        assert!(!sorted.male.contains_key("male/thumbnail.png"));
        assert!(sorted.female.is_empty());
        assert!(sorted.all.contains_key("thumbnail.png"));
        assert!(sorted.all.contains_key("male/model.glb"));
    }

    #[test]
    fn test_sort_content_both_is_union_of_shapes_and_thumbnail() {
        let contents = raw(&[("model.glb", b"m"), ("tex.png", b"x"), ("thumbnail.png", b"t")]);
        let sorted = sort_content(BodyShape::Both, &contents);

        let mut expected: Vec<String> = sorted
            .male
            .keys()
            .chain(sorted.female.keys())
            .cloned()
            .collect();
        expected.push("thumbnail.png".to_string());
        expected.sort();

        let mut all: Vec<String> = sorted.all.keys().cloned().collect();
        all.sort();
        assert_eq!(all, expected);

        // No path belongs to both shape buckets.
        assert!(sorted.male.keys().all(|key| !sorted.female.contains_key(key)));
    }

    #[test]
    fn test_sort_content_without_thumbnail() {
        let contents = raw(&[("model.glb", b"m")]);
        let sorted = sort_content(BodyShape::Female, &contents);

        assert!(!sorted.all.contains_key("thumbnail.png"));
        assert_eq!(sorted.all.len(), 1);
        assert!(sorted.all.contains_key("female/model.glb"));
    }

    #[test]
    fn test_blob_round_trips_its_kind() {
        let blob = Blob::from_parts(BlobKind::Shared, b"abc".to_vec());
        assert_eq!(blob.kind(), BlobKind::Shared);
        assert_eq!(blob.as_bytes(), b"abc");
        assert_eq!(blob.len(), 3);
    }
}
