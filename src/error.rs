pub type ThumbsmithResult<T> = Result<T, ThumbsmithError>;

#[derive(thiserror::Error, Debug)]
pub enum ThumbsmithError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ThumbsmithError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ThumbsmithError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            ThumbsmithError::render("x")
                .to_string()
                .contains("render error:")
        );
    }

    #[test]
    fn io_preserves_source() {
        let base = std::io::Error::other("disk gone");
        let err = ThumbsmithError::from(base);
        assert!(err.to_string().contains("disk gone"));
    }
}
