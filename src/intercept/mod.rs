//! Transparent HTTP interception
//!
//! This module contains the recorder hook that every outbound request passes
//! through, the transport seam it delegates to, and the correlator that turns
//! one (request, completion) pair into one traffic record.

mod correlator;
mod recorder;
mod transport;

pub use recorder::Recorder;
pub use transport::{
    ReqwestTransport, RequestBody, RequestParts, Transport, TransportError, TransportResponse,
};
