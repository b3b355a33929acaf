pub mod store;

pub use store::{JsonCollection, JsonStore};
