//! Data structures for galaxy configuration.
//!
//! Pure data types deserialized from RON. The standard planet table is
//! embedded in the crate; other tables are read from disk by the caller.

mod planet_data;

pub use planet_data::{GalaxyData, PlanetData};
