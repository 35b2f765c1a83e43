pub mod json_error;
pub mod links;
pub mod system;
pub mod upload;
pub mod view;
