//! JSON import and export

pub mod json;

pub use json::{read_tracks, write_json};
