pub mod crawler;
pub mod html;
pub mod template;
