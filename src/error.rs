use thiserror::Error;

/// Failures that stop one part of the scene without taking the page down.
///
/// ┌────────────────┬──────────────────────────────┬────────────────────────┐
/// │ Variant        │ Raised by                    │ Effect                 │
/// ├────────────────┼──────────────────────────────┼────────────────────────┤
/// │ AssetLoad      │ sprite sheet / image fetch   │ scene is never built   │
/// │ InvalidState   │ Character::set_state         │ state swap rejected    │
/// │ BindingRange   │ ScrollBinding::bind          │ binding never created  │
/// └────────────────┴──────────────────────────────┴────────────────────────┘
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("could not load asset '{path}': {message}")]
    AssetLoad { path: String, message: String },

    #[error("unknown animation state '{0}'")]
    InvalidState(String),

    #[error("scroll range end ({end}) must be greater than start ({start})")]
    BindingRange { start: f64, end: f64 },
}

impl SceneError {
    pub fn asset_load(path: &str, err: impl std::fmt::Display) -> Self {
        SceneError::AssetLoad {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = SceneError::InvalidState("run9".into());
        assert_eq!(err.to_string(), "unknown animation state 'run9'");

        let err = SceneError::BindingRange {
            start: 10.0,
            end: 10.0,
        };
        assert!(err.to_string().contains("(10)"));

        let err = SceneError::asset_load("/a.json", "404");
        assert_eq!(err.to_string(), "could not load asset '/a.json': 404");
    }
}
