//! Manifest decoding into normalized card specs.

pub mod model;
pub mod parse;
