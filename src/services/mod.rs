pub mod dashboard;
pub mod image_store;
pub mod message_listing;
pub mod message_stats;

pub use dashboard::DashboardStats;
pub use image_store::{ImageStore, ImageStoreError, LocalImageStore, StoredImage};
pub use message_listing::{MessageListQuery, MessageListing, Page};
pub use message_stats::{ListingStats, MessageStats, StatsWindows};
