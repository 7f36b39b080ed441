//! Build orchestration and domain logic for llmsgen.
//!
//! This crate ties together discovery, extraction, grouping, rendering, and
//! publication into the end-to-end `build` pipeline.

pub mod clock;
pub mod grouping;
pub mod pipeline;
pub mod publish;

pub use clock::{Clock, FixedClock, SystemClock};
pub use grouping::{Grouping, group_documents, order_documents, order_sections};
pub use pipeline::{
    Assembly, BuildResult, ProgressReporter, SilentProgress, UnlistedSection, assemble, build,
};
pub use publish::{PublishReport, publish};
