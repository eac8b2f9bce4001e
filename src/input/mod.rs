pub mod color;
pub mod upload;
