/*!
 * Atelier SDK - asset-bundle ingestion and item construction
 *
 * A library for turning user-supplied asset bundles (zip archives with
 * 3D models, textures and JSON manifests) into a normalized, content-
 * addressed item aggregate ready for upload:
 * - Format sniffing for plain models vs. zip bundles
 * - Schema-driven manifest validation with domain-specific errors
 * - Per-category size budgets
 * - Body-shape content sorting and re-keying
 * - A state-tagged item builder with BLAKE3 content addressing
 *
 * # Example
 *
 * ```no_run
 * use atelier_sdk::content::Blob;
 * use atelier_sdk::files::load_file;
 * use atelier_sdk::item::ItemFactory;
 *
 * # fn main() -> Result<(), Box<dyn std::error::Error>> {
 * let bytes: Vec<u8> = std::fs::read("bundle.zip")?;
 * let loaded = load_file("bundle.zip", Blob::from(bytes))?;
 *
 * if let Some(wearable) = &loaded.wearable {
 *     let mut factory = ItemFactory::new();
 *     factory.from_config(wearable, loaded.content.clone(), loaded.builder.as_ref())?;
 *     let built = factory.build()?;
 *     println!("{} content entries", built.item.contents.len());
 * }
 * # Ok(())
 * # }
 * ```
 */

pub mod client;
pub mod content;
pub mod files;
pub mod item;

// Re-export commonly used types
pub use content::{compute_hash, compute_hashes, Blob, HashedContent, RawContent};
pub use files::{load_file, LoadedFile};
pub use item::{BodyShape, BuiltItem, ItemFactory, LocalItem};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
