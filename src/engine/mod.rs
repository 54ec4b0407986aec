//! Grading engine module.
//!
//! Provides submission invocation, output verification, check
//! orchestration and result aggregation.

pub mod invoker;
pub mod orchestrator;
pub mod result;
pub mod verifier;
