use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Extensions rendered with the built-in text viewer
const TEXT_EXTENSIONS: [&str; 7] = ["txt", "md", "json", "xml", "html", "java", "kt"];

/// Extensions rendered with the built-in image viewer
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// What the viewer screen should render for a file
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// Full text content; JSON arrives pretty-printed
    Text(String),
    /// Image dimensions from the header; the shell decodes the pixels itself
    Image { width: u32, height: u32 },
    /// Not viewable in-app; `mime` feeds the external "open with" chooser
    External { mime: &'static str },
}

/// Failures while building a preview.
///
/// Unlike listings these are surfaced: the caller asked about one specific
/// file and needs something to show for it.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not probe image: {0}")]
    Image(#[from] image::ImageError),

    #[error("background task failed: {0}")]
    TaskJoin(String),
}

/// Build a preview for `path` based on its extension.
pub fn load_preview(path: &Path) -> Result<Preview, PreviewError> {
    let ext = extension(path);

    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        let (width, height) = image::image_dimensions(path)?;
        return Ok(Preview::Image { width, height });
    }

    if TEXT_EXTENSIONS.contains(&ext.as_str()) {
        let text = std::fs::read_to_string(path)?;
        return Ok(Preview::Text(render_text(&ext, text)));
    }

    debug!("no built-in viewer for {}", path.display());
    Ok(Preview::External {
        mime: mime_type(path),
    })
}

/// `load_preview` on the blocking pool.
pub async fn load_preview_async(path: PathBuf) -> Result<Preview, PreviewError> {
    tokio::task::spawn_blocking(move || load_preview(&path))
        .await
        .map_err(|err| PreviewError::TaskJoin(err.to_string()))?
}

/// Pretty-print JSON when it parses; anything else, including JSON that
/// doesn't parse, is shown as-is.
fn render_text(ext: &str, text: String) -> String {
    if ext != "json" {
        return text;
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or(text),
        Err(_) => text,
    }
}

/// Guess a mime type from the extension; `*/*` when nothing matches, which
/// lets the external chooser offer everything.
pub fn mime_type(path: &Path) -> &'static str {
    match extension(path).as_str() {
        "txt" | "md" => "text/plain",
        "json" => "application/json",
        "xml" => "application/xml",
        "html" => "text/html",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        _ => "*/*",
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn plain_text_is_returned_verbatim() {
        let root = tempdir().expect("tempdir");
        let file = root.path().join("note.txt");
        fs::write(&file, "line one\nline two").expect("write note");

        let preview = load_preview(&file).expect("preview");
        assert_eq!(preview, Preview::Text("line one\nline two".to_string()));
    }

    #[test]
    fn json_is_pretty_printed() {
        let root = tempdir().expect("tempdir");
        let file = root.path().join("data.json");
        fs::write(&file, r#"{"a":1,"b":[2,3]}"#).expect("write json");

        let Preview::Text(content) = load_preview(&file).expect("preview") else {
            panic!("expected a text preview");
        };
        assert!(content.contains("\"a\": 1"));
        assert!(content.lines().count() > 1);
    }

    #[test]
    fn malformed_json_falls_back_to_the_raw_text() {
        let root = tempdir().expect("tempdir");
        let file = root.path().join("broken.json");
        fs::write(&file, "{not json at all").expect("write broken");

        let preview = load_preview(&file).expect("preview");
        assert_eq!(preview, Preview::Text("{not json at all".to_string()));
    }

    #[test]
    fn png_previews_report_dimensions() {
        let root = tempdir().expect("tempdir");
        let file = root.path().join("tiny.png");
        image::RgbaImage::new(3, 2).save(&file).expect("write png");

        let preview = load_preview(&file).expect("preview");
        assert_eq!(
            preview,
            Preview::Image {
                width: 3,
                height: 2
            }
        );
    }

    #[test]
    fn other_extensions_go_external_with_a_mime_type() {
        let report = load_preview(Path::new("/anywhere/report.pdf")).expect("preview");
        assert_eq!(
            report,
            Preview::External {
                mime: "application/pdf"
            }
        );

        let blob = load_preview(Path::new("/anywhere/data.bin")).expect("preview");
        assert_eq!(blob, Preview::External { mime: "*/*" });
    }

    #[test]
    fn missing_text_files_surface_the_io_error() {
        let root = tempdir().expect("tempdir");
        let result = load_preview(&root.path().join("gone.txt"));
        assert!(matches!(result, Err(PreviewError::Io(_))));
    }

    #[test]
    fn mime_lookup_ignores_extension_case() {
        assert_eq!(mime_type(Path::new("PHOTO.JPG")), "image/jpeg");
        assert_eq!(mime_type(Path::new("no_extension")), "*/*");
    }

    #[tokio::test]
    async fn async_preview_matches_the_blocking_one() {
        let root = tempdir().expect("tempdir");
        let file = root.path().join("note.md");
        fs::write(&file, "# heading").expect("write note");

        let blocking = load_preview(&file).expect("blocking preview");
        let background = load_preview_async(file).await.expect("async preview");
        assert_eq!(blocking, background);
    }
}
