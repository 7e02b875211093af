pub mod admin_user;
pub mod message;
pub mod project;

pub use admin_user::AdminUser;
pub use message::{ContactMessage, MessageSource, MessageStatus, MessageUpdate, NewContactMessage};
pub use project::{Project, ProjectFields};
