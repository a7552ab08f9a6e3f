//! Data module - CSV loading and column derivation

mod loader;
mod processor;

pub use loader::DataLoader;
pub use processor::{DataProcessor, MONTH_COLUMN};
