pub mod authentication;
pub mod plan;
pub mod user;
