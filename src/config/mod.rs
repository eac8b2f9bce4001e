//! Static tables: UV geometry profiles, intake limits, and the colour palette.

pub mod geometry;
pub mod limits;
pub mod palette;
