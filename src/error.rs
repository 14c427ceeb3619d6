use std::fmt;

/// Errors raised while configuring or activating the backdrop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackdropError {
    /// No 2D drawing context could be acquired for the surface element.
    SurfaceUnavailable,
    /// Options were malformed or out of range.
    InvalidConfig(String),
    /// The host refused to schedule an animation frame.
    Scheduler(String),
}

impl fmt::Display for BackdropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceUnavailable => write!(f, "2D drawing context unavailable"),
            Self::InvalidConfig(msg) => write!(f, "invalid backdrop config: {msg}"),
            Self::Scheduler(msg) => write!(f, "frame scheduling failed: {msg}"),
        }
    }
}

impl std::error::Error for BackdropError {}
