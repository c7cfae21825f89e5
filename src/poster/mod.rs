/// Poster image module
///
/// This module handles:
/// - Downloading poster images from the catalog's image CDN
/// - Downscaling them to card size
/// - Caching them to disk so cards and the trending strip can render them

pub mod cache;
pub mod index;

pub use cache::PosterCache;
pub use index::PosterIndex;
