//! Error types for the binding pipeline.

use std::time::Duration;
use thiserror::Error;

/// Errors produced while loading dependencies, awaiting readiness, or binding.
#[derive(Debug, Error)]
pub enum BindError {
    /// The readiness gate exhausted its timeout before masking became callable.
    #[error("masking not ready after {attempts} probes over {elapsed:?}")]
    ReadinessTimeout { attempts: u32, elapsed: Duration },

    /// A mask template contained no digit slots.
    #[error("mask template has no digit slots: {0:?}")]
    EmptyTemplate(String),

    /// The page surface rejected an operation (unknown handle, detached node).
    #[error("page operation failed: {0}")]
    Page(String),

    /// A script evaluated in the page returned a value the caller could not use.
    #[error("unexpected script result for {op}: {value}")]
    ScriptResult { op: &'static str, value: String },

    /// CDP transport or protocol failure.
    #[error("browser error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    /// The browser process could not be configured or launched.
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
