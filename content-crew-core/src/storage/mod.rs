//! Object storage for generated artifacts.

pub mod minio;
pub mod sigv4;

pub use minio::MinioStore;
