//! BASIC V2 source to PRG generation.
//!
//! Tokenizing is not done here. A [`BasicCompiler`] implementation is injected by the caller;
//! [`ExternalTokenizer`] drives an external program such as VICE's `petcat`.

mod external;

pub use external::ExternalTokenizer;

use async_trait::async_trait;
use thiserror::Error;

/// Load address of a BASIC program on the C64.
pub const PRG_LOAD_ADDRESS: u16 = 0x0801;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BasicError {
    /// The source was rejected (empty, malformed, or produced no program).
    #[error("{0}")]
    Syntax(String),

    /// Anything else went wrong while generating the program.
    #[error("{0}")]
    Generation(String),
}

impl BasicError {
    /// Stable name of the error category, as reported to tool callers.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Syntax(_) => "SyntaxError",
            Self::Generation(_) => "GenerationError",
        }
    }
}

pub type Result<T> = std::result::Result<T, BasicError>;

/// Turns BASIC source text into a PRG image (two-byte load address followed by tokens).
#[async_trait]
pub trait BasicCompiler: Send + Sync {
    async fn compile(&self, source: &str) -> Result<Vec<u8>>;
}

/// Validate `source`, compile it and check the result is non-empty.
///
/// # Errors
///
/// Returns [`BasicError::Syntax`] for blank input or an empty result, and whatever the
/// compiler reports otherwise.
pub async fn generate_prg(compiler: &dyn BasicCompiler, source: &str) -> Result<Vec<u8>> {
    if source.trim().is_empty() {
        return Err(BasicError::Syntax(
            "BASIC source cannot be empty".to_string(),
        ));
    }

    let prg = compiler.compile(source).await?;
    if prg.is_empty() {
        return Err(BasicError::Syntax(
            "Failed to generate PRG from BASIC source".to_string(),
        ));
    }

    tracing::debug!(size = prg.len(), "generated PRG");
    Ok(prg)
}
