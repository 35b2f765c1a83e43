pub mod dimensions;
pub mod memory;
pub mod short_link;
pub mod sqlx_repo;
