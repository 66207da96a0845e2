//! Markdown display for models and operation results.
//!
//! Domain models implement `Display` directly; collections and operation
//! outcomes get newtype wrappers so each context can choose its framing.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │    Wrappers     │    │    Markdown     │
//! │ (Instruction,   │───▶│ (CreateResult,  │───▶│ (terminal, MCP  │
//! │  TreeReport)    │    │  StepOutcome)   │    │  text content)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: list wrappers (InstructionSummaries, Commits)
//! - [`results`]: operation outcomes (CreateResult, StepOutcome)
//! - [`status`]: one-line confirmations (OperationStatus)
//! - [`datetime`]: epoch second formatting
//! - [`models`]: Display implementations for domain models
//!
//! ```rust
//! use waymark_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Generated final report");
//! assert_eq!(status.to_string(), "Success: Generated final report\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Commits, InstructionSummaries};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, StepOutcome};
pub use status::OperationStatus;
