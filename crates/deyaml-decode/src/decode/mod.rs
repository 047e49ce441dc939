//! Manifest decoding

mod yaml;

pub use yaml::{DecodeOptions, Decoder};
