/// Rejected window action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("Window is already minimized")]
    AlreadyMinimized,

    #[error("Window is not minimized")]
    NotMinimized,

    #[error("Window is minimized")]
    Minimized,

    #[error("Window is maximized")]
    Maximized,

    #[error("No window is mounted")]
    NotMounted,
}

/// Failure reported by the page's persistence call.
///
/// Carries a human-readable message for the form's error display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SubmitError {
    pub message: String,
}

impl SubmitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
