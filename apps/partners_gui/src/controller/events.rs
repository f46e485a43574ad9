//! Backend-to-UI events and error modeling for the partners window.

use client_core::RequestToken;
use shared::{
    domain::PartnerRecord,
    error::{ErrorCode, FetchError},
};

pub enum UiEvent {
    Info(String),
    PartnersFetched {
        token: RequestToken,
        result: Result<Vec<PartnerRecord>, FetchError>,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

impl UiErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            UiErrorCategory::Transport => "Network",
            UiErrorCategory::Validation => "Data",
            UiErrorCategory::Unknown => "Unexpected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    FetchPartners,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_fetch_error(err: &FetchError) -> Self {
        let category = match err.code() {
            ErrorCode::Transport | ErrorCode::HttpStatus => UiErrorCategory::Transport,
            ErrorCode::Malformed => UiErrorCategory::Validation,
        };
        Self {
            category,
            context: UiErrorContext::FetchPartners,
            message: err.to_string(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line text for the status banner.
    pub fn banner_text(&self) -> String {
        match self.context {
            UiErrorContext::BackendStartup => {
                format!("Backend worker startup failure: {}", self.message)
            }
            UiErrorContext::FetchPartners => {
                format!("{} error: {}", self.category.label(), self.message)
            }
        }
    }
}
