pub type FlipbookResult<T> = Result<T, FlipbookError>;

#[derive(thiserror::Error, Debug)]
pub enum FlipbookError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no input frames: {0}")]
    EmptyInput(String),

    #[error("unreadable image: {0}")]
    Decode(String),

    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlipbookError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            FlipbookError::config("x")
                .to_string()
                .contains("invalid configuration:")
        );
        assert!(
            FlipbookError::empty_input("x")
                .to_string()
                .contains("no input frames:")
        );
        assert!(
            FlipbookError::decode("x")
                .to_string()
                .contains("unreadable image:")
        );
        assert!(
            FlipbookError::geometry("x")
                .to_string()
                .contains("geometry error:")
        );
        assert!(
            FlipbookError::encode("x")
                .to_string()
                .contains("encode error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = FlipbookError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
