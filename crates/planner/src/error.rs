//! Errors surfaced by the service operations.

use crate::layout::LayoutError;
use crate::types::Control;
use crate::upstream::UpstreamError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlannerError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Another request for the same control is still running
    #[error("A {control} request is already in progress")]
    OperationInProgress { control: Control },

    /// The schedule was rebuilt while this page was being fetched
    #[error("The schedule changed while the next option was being fetched")]
    Superseded,

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}
