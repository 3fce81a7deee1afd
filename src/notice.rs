//! Transient user notifications

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

impl Notice {
    pub fn new(message: String, level: NoticeLevel) -> Self {
        Self { message, level }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message.into(), NoticeLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), NoticeLevel::Error)
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
