pub mod headless;
pub mod presentation;
