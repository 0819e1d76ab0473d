//! Public blob storage for rendered cards.

pub mod local;
pub mod object;
pub mod s3;
