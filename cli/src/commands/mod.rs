pub mod aggregate;
pub mod merge;
pub mod summary;

#[cfg(feature = "download")]
pub mod fetch;
