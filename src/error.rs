//! Construction-time error types.
//!
//! The per-frame simulation never fails. Everything that can go wrong is
//! caught while building the sprite bank, the tuning, or the round, and is
//! handed back to the bootstrap layer.

use std::fmt;

/// Top-level error enum for the simulation core.
#[derive(Debug)]
pub enum SimError {
    /// A required sprite sequence has no frames, so the core can neither
    /// draw nor collide with it.
    EmptyFrames {
        /// Which sequence (e.g. "net", "fish").
        sequence: &'static str,
    },

    /// A sprite's pixel buffer does not match its declared dimensions.
    BadSpriteSize {
        width: u32,
        height: u32,
        /// Number of alpha values actually supplied.
        len: usize,
    },

    /// A tuning value is outside its usable range.
    InvalidTuning {
        /// Field name (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// Tuning overrides could not be parsed.
    Config(serde_json::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::EmptyFrames { sequence } => {
                write!(f, "sprite sequence '{}' has no frames", sequence)
            }
            SimError::BadSpriteSize { width, height, len } => write!(
                f,
                "sprite is {}x{} but has {} alpha values (need {})",
                width,
                height,
                len,
                *width as usize * *height as usize
            ),
            SimError::InvalidTuning {
                name,
                value,
                expected,
            } => write!(
                f,
                "tuning '{}' = {} is outside accepted range {}",
                name, value, expected
            ),
            SimError::Config(e) => write!(f, "invalid tuning overrides: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Config(e)
    }
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_sequence() {
        let e = SimError::EmptyFrames { sequence: "net" };
        assert!(e.to_string().contains("'net'"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<u32, _> = serde_json::from_str("not json");
        let e: SimError = parse.unwrap_err().into();
        assert!(matches!(e, SimError::Config(_)));
        assert!(std::error::Error::source(&e).is_some());
    }
}
