//! Structured error types for vgrid.
//!
//! Most grid failures are local no-ops (unknown row ids, missing plugins) and
//! never surface here. These variants cover the operations that can fail
//! outright, such as bad configuration or a refused clipboard.

/// All errors that can occur while configuring or driving a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Grid options or row payloads could not be deserialized.
    #[error("Invalid options: {0}")]
    Options(#[from] serde_json::Error),

    /// A column-targeted operation named a field that does not exist.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// An action was dispatched to a store without a reducer for its kind.
    #[error("No reducer registered for action {0}")]
    UnhandledAction(String),

    /// Reading from or writing to the clipboard failed.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// JavaScript interop failure (wasm bindings only).
    #[error("JS interop error: {0}")]
    Js(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn options_error_wraps_serde() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = GridError::from(err);
        assert!(err.to_string().starts_with("Invalid options:"));
    }

    #[test]
    fn display_names_the_field() {
        let err = GridError::UnknownColumn("price".into());
        assert_eq!(err.to_string(), "Unknown column: price");
    }
}
