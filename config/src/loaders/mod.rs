//! Loaders for reading a [`Config`](crate::Config) from an external source.

pub mod toml;
