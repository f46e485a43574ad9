//! Backend commands queued from UI to backend worker.

use client_core::RequestToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendCommand {
    /// Fetch the full partner document; the reply carries the same token.
    FetchPartners { token: RequestToken },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchPartners { .. } => "fetch_partners",
        }
    }
}
