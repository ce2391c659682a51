pub mod asset_store;
pub mod sqlx_repo;
pub mod video;
