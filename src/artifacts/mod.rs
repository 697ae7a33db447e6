//! Model and dictionary artifacts

pub mod class_map;
pub mod store;

pub use class_map::ClassMap;
pub use store::{ArtifactStore, LoadedArtifacts};
