// Echo Handler

//! # Echo Handler
//!
//! Backs `GET /api/randomNumber/:param`. The router has already percent-decoded
//! the segment by the time it gets here; the handler wraps it as-is.

use serde::{Deserialize, Serialize};

/// Single-field record wrapping the captured path parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoParam {
    pub param: String,
}

/// Returns the parameter unchanged. No validation: any string, including empty, is accepted.
pub fn echo(param: impl Into<String>) -> EchoParam {
    EchoParam { param: param.into() }
}
