use serde::{Deserialize, Serialize};

use billflow_core::{BillingError, ErrorKind};

/// User-visible rendering of a billing error.
///
/// The router queues these instead of displaying them; UI rendering belongs
/// to the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfacedMessage {
    kind: ErrorKind,
    response_code: i32,
    text: String,
}

impl SurfacedMessage {
    pub fn from_error(error: &BillingError) -> Self {
        Self {
            kind: error.kind,
            response_code: error.response_code,
            text: format!("{}: {}", error.kind.user_message(), error.debug_message),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn response_code(&self) -> i32 {
        self.response_code
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
