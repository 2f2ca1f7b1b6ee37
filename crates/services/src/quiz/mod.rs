mod generator;

pub use generator::{TaskGenerator, TaskSource, remap_decoy_count};
