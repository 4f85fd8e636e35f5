//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     Periodic timer
//!     → Probe each pool member
//!     → Feed state.rs
//!     → On transition: HttpBackend::set_alive
//!
//! State machine (state.rs):
//!     Alive ←→ Down
//!     With thresholds to prevent flapping
//! ```
//!
//! The pool only ever reads liveness; this subsystem is the only writer.

pub mod active;
pub mod state;

pub use active::HealthMonitor;
pub use state::HealthState;
