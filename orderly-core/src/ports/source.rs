// orderly-core/src/ports/source.rs

// What the pipeline needs from an order extract, without knowing where it lives
// or how it is encoded.

use crate::domain::dataset::Dataset;
use crate::error::OrderlyError;

pub trait DatasetSource: Send + Sync {
    /// Loads every selected extract into one dataset with sequential positions.
    fn load(&self) -> Result<Dataset, OrderlyError>;

    /// Human-readable description of what `load` reads (paths, URLs...).
    fn describe(&self) -> String;
}
