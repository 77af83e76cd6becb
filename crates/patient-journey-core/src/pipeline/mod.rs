//! Stage orchestration over a [`PipelineStore`](crate::traits::PipelineStore).
//!
//! Each stage reads its whole input, computes in memory, validates and then
//! issues exactly one replace. Every structural error is raised before that
//! replace, so a failed stage leaves the previous output in place.

mod report;
mod retry;
mod runner;

pub use report::RunReport;
pub use retry::with_retry;
pub use runner::Pipeline;
