//! Typed data model: settings, test specs, metrics, and results.
mod result;
mod settings;
mod spec;


pub use result::{
    FailureKind, LatencyStats, RawRunOutput, SuiteResult, TestOutcome, TestResult, WrkMetrics,
};
pub use settings::{EffectiveSettings, GlobalSettings, TestOverrides};
pub use spec::{ServerSpec, TestSpec};
