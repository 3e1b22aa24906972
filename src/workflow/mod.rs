pub mod class_processor;

pub use class_processor::{ClassOutcome, ClassProcessor, ClassState, ProcessSummary};
