/// Hosted file service clients
///
/// This module handles:
/// - Paginated file listing and CDN image downloads (listing.rs)
/// - Multipart uploads (upload.rs)
/// - Shrinking oversized photos before they are sent (shrink.rs)

pub mod listing;
pub mod shrink;
pub mod upload;

pub use listing::ListingClient;
pub use upload::UploadClient;
