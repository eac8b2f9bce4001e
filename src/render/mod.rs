pub mod blend;
pub mod composite;
pub mod raster;
pub mod texture;
