//! Request extractors.

pub mod store;

pub use store::StoreContext;
