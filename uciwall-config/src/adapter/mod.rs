//! Document adapters

mod json;

pub use json::JsonAdapter;
