use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NetError>;

#[derive(Debug, Error)]
pub enum NetError {
    /// Malformed network or training configuration (e.g. fewer than two layer widths).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("shape mismatch in {context}: expected {expected_rows}x{expected_cols}, got {found_rows}x{found_cols}")]
    ShapeMismatch {
        context: &'static str,
        expected_rows: usize,
        expected_cols: usize,
        found_rows: usize,
        found_cols: usize,
    },

    #[error("layer index {index} out of range for a network with {layers} layers")]
    LayerIndex { index: usize, layers: usize },

    #[error("input batch is empty")]
    EmptyBatch,

    #[error("data error: {0}")]
    Data(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetError {
    pub(crate) fn shape(
        context: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    ) -> NetError {
        NetError::ShapeMismatch {
            context,
            expected_rows: expected.0,
            expected_cols: expected.1,
            found_rows: found.0,
            found_cols: found.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_message_names_both_shapes() {
        let err = NetError::shape("forward input", (4, 3), (4, 2));
        assert_eq!(
            err.to_string(),
            "shape mismatch in forward input: expected 4x3, got 4x2"
        );
    }
}
