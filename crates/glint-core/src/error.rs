use std::fmt;
use std::path::PathBuf;

/// Sketch-level errors used across glint crates.
///
/// Contract rule: this type lives in `glint-core` and is re-exported by the
/// glow runtime so callers only deal with one error surface.
#[derive(Debug)]
pub enum SketchError {
    // ---- Config / IO ----
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    InvalidConfig {
        path: PathBuf,
        msg: String,
    },

    // ---- Runtime-facing (backend) ----
    VertexCompile(String),
    FragmentCompile(String),
    Link(String),
    GlCreate(String),

    /// A listed attribute/uniform name the program does not expose, or a
    /// name outside the `a…`/`u…` prefix convention.
    BindingNotFound {
        name: String,
    },

    /// A float-vector uniform value whose length is not 1..=4.
    InvalidArity {
        len: usize,
    },

    /// Vertex data that cannot drive the requested draw (wrong count/stride).
    BadGeometry(String),

    // ---- Fallback ----
    Other(String),
}

impl SketchError {
    pub fn other<T: Into<String>>(s: T) -> Self {
        SketchError::Other(s.into())
    }

    /// Errors a render loop can skip past (log, drop the draw, keep running).
    ///
    /// Everything else means the sketch cannot make progress (no context,
    /// no program) and should abort.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SketchError::BindingNotFound { .. }
                | SketchError::InvalidArity { .. }
                | SketchError::BadGeometry(_)
        )
    }
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchError::Io { path, source } => {
                write!(f, "io error at {}: {}", path.display(), source)
            }
            SketchError::Json { path, source } => {
                write!(f, "json parse error at {}: {}", path.display(), source)
            }
            SketchError::InvalidConfig { path, msg } => {
                write!(f, "invalid config at {}: {}", path.display(), msg)
            }

            SketchError::VertexCompile(msg) => write!(f, "vertex shader compile error: {msg}"),
            SketchError::FragmentCompile(msg) => write!(f, "fragment shader compile error: {msg}"),
            SketchError::Link(msg) => write!(f, "program link error: {msg}"),
            SketchError::GlCreate(msg) => write!(f, "backend object creation failed: {msg}"),

            SketchError::BindingNotFound { name } => {
                write!(f, "no attribute/uniform binding named '{name}'")
            }
            SketchError::InvalidArity { len } => {
                write!(f, "uniform value has {len} components (supported: 1..=4)")
            }
            SketchError::BadGeometry(msg) => write!(f, "bad geometry: {msg}"),

            SketchError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SketchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SketchError::Io { source, .. } => Some(source),
            SketchError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_frame_errors_are_recoverable() {
        assert!(SketchError::BindingNotFound {
            name: "uNope".into()
        }
        .is_recoverable());
        assert!(SketchError::InvalidArity { len: 7 }.is_recoverable());
        assert!(SketchError::BadGeometry("5 floats".into()).is_recoverable());
    }

    #[test]
    fn build_errors_are_fatal() {
        assert!(!SketchError::Link("log".into()).is_recoverable());
        assert!(!SketchError::GlCreate("no context".into()).is_recoverable());
        assert!(!SketchError::VertexCompile("syntax".into()).is_recoverable());
    }
}
