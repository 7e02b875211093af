// handlers/public/mod.rs - endpoints reachable without a token

pub mod contact;
pub mod health;
pub mod login;
pub mod projects;

pub use contact::submit as contact_submit;
pub use health::{health, not_found};
pub use login::login;
pub use projects::by_category as projects_by_category;
pub use projects::featured as projects_featured;
pub use projects::list as projects_list;
pub use projects::record_view as project_record_view;
pub use projects::show as project_show;
