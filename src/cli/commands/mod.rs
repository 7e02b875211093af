pub mod seed_admin;
pub mod serve;
