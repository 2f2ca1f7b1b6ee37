#![forbid(unsafe_code)]

pub mod grammar;
pub mod model;
pub mod narration;

pub use grammar::{counted_noun, phrase};
