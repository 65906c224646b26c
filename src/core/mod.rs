pub mod classifier;
pub mod engine;
pub mod etl;
pub mod filter;
pub mod formatter;
pub mod normalizer;
pub mod reconciler;
pub mod reference;
pub mod report;

pub use crate::domain::model::{ClassifiedSequence, ReconOutcome};
pub use crate::domain::ports::{ConfigProvider, FamilyResolver, Pipeline, Storage};
pub use crate::domain::table::RawInputs;
pub use crate::utils::error::Result;
