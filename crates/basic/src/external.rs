use crate::{BasicCompiler, BasicError, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use tokio::process::Command;

/// Compiles by running an external tokenizer.
///
/// The program is invoked as `<program> <args...> -o <out.prg> -- <in.bas>` inside a scratch
/// directory, which matches `petcat`'s command line. Source text is lowercased before it is
/// written because petcat reads unshifted PETSCII as lowercase ASCII.
#[derive(Debug, Clone)]
pub struct ExternalTokenizer {
    program: OsString,
    args: Vec<OsString>,
}

impl ExternalTokenizer {
    /// A petcat-compatible `program` (name on `PATH` or a full path) in BASIC V2 mode (`-w2`).
    #[must_use]
    pub fn petcat_compatible(program: impl Into<OsString>) -> Self {
        Self::new(program, ["-w2"])
    }

    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl BasicCompiler for ExternalTokenizer {
    async fn compile(&self, source: &str) -> Result<Vec<u8>> {
        let dir = tempfile::tempdir()
            .map_err(|e| BasicError::Generation(format!("Failed to create work directory: {e}")))?;
        let input = dir.path().join("program.bas");
        let output = dir.path().join("program.prg");

        let mut text = source.replace("\r\n", "\n").to_ascii_lowercase();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        tokio::fs::write(&input, text)
            .await
            .map_err(|e| BasicError::Generation(format!("Failed to write BASIC source: {e}")))?;

        let result = Command::new(&self.program)
            .args(&self.args)
            .arg("-o")
            .arg(&output)
            .arg("--")
            .arg(&input)
            .output()
            .await
            .map_err(|e| {
                BasicError::Generation(format!(
                    "Failed to run BASIC tokenizer '{}': {e}",
                    self.program.to_string_lossy()
                ))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            tracing::warn!(status = %result.status, stderr = %stderr, "BASIC tokenizer failed");
            let detail = if stderr.is_empty() {
                format!("tokenizer exited with {}", result.status)
            } else {
                stderr
            };
            let message = format!("Invalid BASIC source: {detail}");
            return Err(BasicError::Syntax(message));
        }

        match tokio::fs::read(&output).await {
            Ok(prg) => Ok(prg),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(BasicError::Generation(format!(
                "Failed to read PRG output: {e}"
            ))),
        }
    }
}
