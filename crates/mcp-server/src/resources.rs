//! Static C64 documentation served as MCP resources.
//!
//! Each `c64://` URI maps to one file under the documentation root. Reads of catalogued URIs
//! always produce content: a missing or unreadable file yields a plain-text explanation instead
//! of a protocol error.

use rmcp::model::{Annotated, RawResource, ReadResourceResult, Resource, ResourceContents};
use std::path::{Path, PathBuf};

/// One catalogued document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocEntry {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Path relative to the documentation root.
    pub path: &'static str,
}

impl DocEntry {
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        mime_for_path(Path::new(self.path))
    }
}

const fn doc(
    uri: &'static str,
    name: &'static str,
    description: &'static str,
    path: &'static str,
) -> DocEntry {
    DocEntry {
        uri,
        name,
        description,
        path,
    }
}

pub const CATALOG: &[DocEntry] = &[
    doc(
        "c64://basic/spec",
        "BASIC V2 Specification",
        "Commodore BASIC V2 commands, functions, operators and limits",
        "basic/basic-spec.md",
    ),
    doc(
        "c64://basic/pitfalls",
        "BASIC Pitfalls and Gotchas",
        "Common mistakes when writing C64 BASIC",
        "basic/basic-pitfalls.md",
    ),
    doc(
        "c64://basic/examples/hello-world",
        "BASIC Hello World Example",
        "Minimal screen output program",
        "basic/examples/video/hello-world.bas",
    ),
    doc(
        "c64://basic/examples/joystick",
        "BASIC Joystick Input Example",
        "Reading joystick port 2 from BASIC",
        "basic/examples/io/joystick.bas",
    ),
    doc(
        "c64://basic/examples/bounce",
        "BASIC Bounce Animation",
        "Bouncing character animation",
        "basic/examples/video/bounce.bas",
    ),
    doc(
        "c64://basic/examples/wave",
        "BASIC Wave Animation",
        "Sine wave drawn with PETSCII characters",
        "basic/examples/video/wave.bas",
    ),
    doc(
        "c64://assembly/spec",
        "6510 Assembly Specification",
        "6510 instruction set, addressing modes and timing",
        "assembly/assembly-spec.md",
    ),
    doc(
        "c64://memory/map",
        "C64 Memory Map",
        "Complete 64K memory layout",
        "memory/memory-map.md",
    ),
    doc(
        "c64://memory/kernal",
        "Kernal Memory Map",
        "Kernal ROM routines and vectors",
        "memory/kernal-memory-map.md",
    ),
    doc(
        "c64://memory/low",
        "Low Memory Map",
        "Zero page and system area ($0000-$03FF)",
        "memory/low-memory-map.md",
    ),
    doc(
        "c64://graphics/vic-spec",
        "VIC-II Graphics Specification",
        "VIC-II registers, modes, sprites and raster timing",
        "graphics/vic-spec.md",
    ),
    doc(
        "c64://graphics/charset",
        "Character Set Reference",
        "Screen codes and PETSCII codes for every character",
        "graphics/character-set.csv",
    ),
    doc(
        "c64://graphics/petscii",
        "PETSCII Style Guide",
        "Guidelines for PETSCII art and text screens",
        "graphics/petscii-style-guide.md",
    ),
    doc(
        "c64://sound/sid-spec",
        "SID Chip Specification",
        "SID registers, voices, envelopes and filters",
        "sound/sid-spec.md",
    ),
    doc(
        "c64://sound/sid-programming",
        "SID Programming Best Practices",
        "Techniques for music and sound effects",
        "sound/sid-programming-best-practices.md",
    ),
    doc(
        "c64://sound/sid-file-structure",
        "SID File Structure",
        "PSID/RSID file header layout",
        "sound/sid-file-structure.md",
    ),
    doc(
        "c64://io/cia-spec",
        "CIA Chip Specification",
        "CIA 6526 timers, ports and interrupts",
        "io/cia-spec.md",
    ),
    doc(
        "c64://io/io-spec",
        "I/O Port Specification",
        "I/O area registers ($D000-$DFFF)",
        "io/io-spec.md",
    ),
    doc(
        "c64://io/joystick",
        "Joystick Control Reference",
        "Joystick ports and bit layout",
        "io/joystick.md",
    ),
    doc(
        "c64://drive/spec",
        "1541 Drive Specification",
        "1541 disk drive commands and disk format",
        "drive/drive-spec.md",
    ),
    doc(
        "c64://printer/commodore-spec",
        "Commodore Printer Specification",
        "MPS-series printer control codes",
        "printer/printer-commodore.md",
    ),
    doc(
        "c64://printer/epson-spec",
        "Epson Printer Specification",
        "Epson ESC/P control codes",
        "printer/printer-epson.md",
    ),
    doc(
        "c64://api/basic-api",
        "BASIC API Specification",
        "BASIC ROM entry points callable from machine code",
        "api/basic-api-spec.md",
    ),
    doc(
        "c64://api/kernal-api",
        "Kernal API Specification",
        "Kernal jump table routines, inputs and outputs",
        "api/kernal-api-spec.md",
    ),
];

/// MIME type by file extension.
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("md") => "text/markdown",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        _ => "text/plain",
    }
}

/// Text and MIME type of a read document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocContent {
    pub text: String,
    pub mime_type: &'static str,
}

/// The documentation catalog rooted at a directory.
#[derive(Debug, Clone)]
pub struct DocumentationLibrary {
    root: PathBuf,
}

impl DocumentationLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn find(uri: &str) -> Option<&'static DocEntry> {
        CATALOG.iter().find(|e| e.uri == uri)
    }

    /// Catalog entries as MCP resources.
    #[must_use]
    pub fn list(&self) -> Vec<Resource> {
        CATALOG
            .iter()
            .map(|entry| Annotated {
                raw: RawResource {
                    uri: entry.uri.to_string(),
                    name: entry.name.to_string(),
                    title: Some(entry.name.to_string()),
                    description: Some(entry.description.to_string()),
                    mime_type: Some(entry.mime_type().to_string()),
                    size: None,
                    icons: None,
                    meta: None,
                },
                annotations: None,
            })
            .collect()
    }

    /// Read a catalogued document. Never fails; problems are reported as text.
    pub async fn load(&self, entry: &DocEntry) -> DocContent {
        let path = self.root.join(entry.path);
        tracing::info!(uri = entry.uri, path = %path.display(), "reading resource");

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => DocContent {
                text,
                mime_type: mime_for_path(&path),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "resource file missing");
                DocContent {
                    text: format!("Resource not found: {}", path.display()),
                    mime_type: "text/plain",
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "resource read failed");
                DocContent {
                    text: format!("Error reading resource: {e}"),
                    mime_type: "text/plain",
                }
            }
        }
    }

    /// Read a resource by URI. `None` if the URI is not catalogued.
    pub async fn read(&self, uri: &str) -> Option<ReadResourceResult> {
        let entry = Self::find(uri)?;
        let content = self.load(entry).await;
        Some(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: entry.uri.to_string(),
                mime_type: Some(content.mime_type.to_string()),
                text: content.text,
                meta: None,
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CATALOG, DocumentationLibrary, mime_for_path};
    use rmcp::model::ResourceContents;
    use std::collections::HashSet;
    use std::path::Path;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for_path(Path::new("a/b.md")), "text/markdown");
        assert_eq!(mime_for_path(Path::new("x.BAS")), "text/plain");
        assert_eq!(mime_for_path(Path::new("x.txt")), "text/plain");
        assert_eq!(mime_for_path(Path::new("x.csv")), "text/csv");
        assert_eq!(mime_for_path(Path::new("x.json")), "application/json");
        assert_eq!(mime_for_path(Path::new("x.bin")), "text/plain");
        assert_eq!(mime_for_path(Path::new("noext")), "text/plain");
    }

    #[test]
    fn catalog_uris_are_unique() {
        let uris: HashSet<_> = CATALOG.iter().map(|e| e.uri).collect();
        assert_eq!(uris.len(), CATALOG.len());
        assert_eq!(CATALOG.len(), 24);
        assert!(CATALOG.iter().all(|e| e.uri.starts_with("c64://")));
    }

    #[test]
    fn listing_declares_mime_types() {
        let lib = DocumentationLibrary::new("/nonexistent");
        let listed = lib.list();
        let charset = listed
            .iter()
            .find(|r| r.raw.uri == "c64://graphics/charset")
            .expect("charset listed");
        assert_eq!(charset.raw.mime_type.as_deref(), Some("text/csv"));
        let example = listed
            .iter()
            .find(|r| r.raw.uri == "c64://basic/examples/wave")
            .expect("example listed");
        assert_eq!(example.raw.mime_type.as_deref(), Some("text/plain"));
    }

    #[tokio::test]
    async fn missing_file_is_reported_as_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let lib = DocumentationLibrary::new(dir.path());
        let result = lib.read("c64://sound/sid-spec").await.expect("catalogued");
        match &result.contents[0] {
            ResourceContents::TextResourceContents {
                text, mime_type, ..
            } => {
                assert!(text.starts_with("Resource not found: "), "{text}");
                assert!(text.ends_with("sid-spec.md"));
                assert_eq!(mime_type.as_deref(), Some("text/plain"));
            }
            other => panic!("unexpected contents {other:?}"),
        }
    }

    #[tokio::test]
    async fn present_file_is_served_with_its_mime() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("graphics")).expect("mkdir");
        std::fs::write(
            dir.path().join("graphics/character-set.csv"),
            "code,char\n65,A\n",
        )
        .expect("write");

        let lib = DocumentationLibrary::new(dir.path());
        let result = lib
            .read("c64://graphics/charset")
            .await
            .expect("catalogued");
        match &result.contents[0] {
            ResourceContents::TextResourceContents {
                uri,
                text,
                mime_type,
                ..
            } => {
                assert_eq!(uri, "c64://graphics/charset");
                assert_eq!(text, "code,char\n65,A\n");
                assert_eq!(mime_type.as_deref(), Some("text/csv"));
            }
            other => panic!("unexpected contents {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreadable_file_is_reported_as_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("io")).expect("mkdir");
        std::fs::write(dir.path().join("io/joystick.md"), [0xff, 0xfe, 0x00]).expect("write");

        let lib = DocumentationLibrary::new(dir.path());
        let result = lib.read("c64://io/joystick").await.expect("catalogued");
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => {
                assert!(text.starts_with("Error reading resource: "), "{text}");
            }
            other => panic!("unexpected contents {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_uri_is_not_catalogued() {
        let lib = DocumentationLibrary::new("/nonexistent");
        assert!(lib.read("c64://nope").await.is_none());
    }
}
