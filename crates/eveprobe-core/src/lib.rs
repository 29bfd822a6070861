//! Core types, errors, and shared functionality for eveprobe.
//!
//! This crate provides the foundational types used throughout the probe:
//!
//! - **Error types**: the probe-wide error taxonomy with [`ProbeError`] and [`Result`]
//! - **Lab types**: normalized lab identifiers ([`LabId`]) with set semantics
//! - **Node types**: per-lab device state ([`Node`]) for up/down classification
//! - **Status types**: platform subsystem counters ([`SubsystemStatus`], [`Subsystem`])
//!
//! # Overview
//!
//! eveprobe-core is the foundation every other eveprobe crate depends on. It
//! defines the domain model and error taxonomy without implementing any
//! network or policy logic.
//!
//! # Examples
//!
//! ## Normalizing a lab path
//!
//! ```rust
//! use eveprobe_core::LabId;
//!
//! let lab = LabId::from_remote_path("/datacenter/core.unl");
//! assert_eq!(lab.as_str(), "datacenter/core");
//! assert_eq!(lab.unl_file(), "datacenter/core.unl");
//! ```
//!
//! ## Error handling
//!
//! ```rust
//! use eveprobe_core::{ProbeError, Result};
//!
//! fn example_operation() -> Result<String> {
//!     Err(ProbeError::invalid_config("hostname", "must not be empty"))
//! }
//!
//! match example_operation() {
//!     Ok(val) => println!("ok: {}", val),
//!     Err(e) => println!("error: {}", e),
//! }
//! ```

pub mod error;
pub mod lab;
pub mod node;
pub mod status;

// Re-export commonly used types for convenience
pub use error::{ProbeError, Result};
pub use lab::LabId;
pub use node::Node;
pub use status::{Subsystem, SubsystemStatus};
