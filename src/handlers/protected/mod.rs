// handlers/protected/mod.rs - endpoints behind `require_admin`

pub mod dashboard;
pub mod messages;
pub mod projects;
pub mod upload;

pub use dashboard::stats as dashboard_stats;
pub use messages::delete as message_delete;
pub use messages::list as messages_list;
pub use messages::show as message_show;
pub use messages::stats_summary as messages_stats_summary;
pub use messages::unread_count as messages_unread_count;
pub use messages::update as message_update;
pub use projects::create as project_create;
pub use projects::delete as project_delete;
pub use projects::update as project_update;
pub use upload::upload;
