pub mod asset;
pub mod dimensions;
pub mod short_link;
pub mod upload;
