pub mod extractors;
pub mod render;
pub mod shorten;
pub mod upload;
