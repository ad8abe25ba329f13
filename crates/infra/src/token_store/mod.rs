//! Token persistence backends

mod file;

pub use file::FileTokenStore;
