pub mod image;
pub mod rendition;
pub mod upload;
pub mod video;
