//! Serialization of validated bundles to disk.

pub mod writer;

pub use writer::{write_bundle, WriteSummary};
