//! Node graph model of the editor and its on-disk format

pub mod comps;
pub mod graph;
pub mod ser;

pub use comps::*;
pub use graph::{EditorGraph, View};
pub use ser::{load_document, save_document, GraphDocument};
