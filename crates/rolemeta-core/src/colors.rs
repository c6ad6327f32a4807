//! ANSI styling for the handler report.

/// Escape codes per report element. Every field is empty in [`Colors::OFF`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colors {
    /// Owner types and role names.
    pub name: &'static str,
    /// Value types.
    pub ty: &'static str,
    /// Accessor kinds and separators.
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Colors {
    pub const ON: Self = Self {
        name: "\x1b[34m",
        ty: "\x1b[32m",
        muted: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        name: "",
        ty: "",
        muted: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }
}
