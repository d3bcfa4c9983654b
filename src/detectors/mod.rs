pub mod base;
pub mod rules;

pub use base::{Detector, Rule, RuleSpec, ScanError};
pub use rules::default_detectors;
