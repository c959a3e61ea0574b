//! # Ports Layer
//!
//! - `inbound` - API offered to the host (driving port)
//! - `outbound` - Dependencies the host provides (driven ports)

pub mod inbound;
pub mod outbound;
