use std::path::{Path, PathBuf};

use tracing::debug;
use unicode_normalization::UnicodeNormalization;

/// Reduces a client-supplied file name to something safe to use as a file
/// name inside the upload directory.
///
/// The name is NFKD-normalized so accented letters keep their ASCII base
/// (`ż` becomes `z`), then what is still non-ASCII is dropped. Path
/// separators become spaces, runs of
/// whitespace are joined with `_`, anything outside `[A-Za-z0-9_.-]` is
/// removed and leading/trailing dots and underscores are stripped. The
/// result may be empty.
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Lowercase extension of `filename`, falling back to the declared content type.
pub fn file_type(filename: &str, content_type: Option<&str>) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .or_else(|| content_type.map(str::to_string))
        .unwrap_or_default()
}

/// Writes `bytes` to `dir/filename`, replacing any file of the same name.
pub async fn store_file(dir: &Path, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(filename);
    debug!(path = %path.display(), size = bytes.len(), "Writing uploaded file");
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_filename_plain_names() {
        assert_eq!(secure_filename("invoice.pdf"), "invoice.pdf");
        assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
        assert_eq!(secure_filename("scan-01_final.PNG"), "scan-01_final.PNG");
    }

    #[test]
    fn test_secure_filename_strips_paths() {
        assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("C:\\Windows\\system32\\evil.exe"), "C_Windows_system32_evil.exe");
        assert_eq!(secure_filename("/absolute/path.txt"), "absolute_path.txt");
    }

    #[test]
    fn test_secure_filename_drops_unsafe_characters() {
        assert_eq!(secure_filename("faktura zażółć.pdf"), "faktura_zazoc.pdf");
        assert_eq!(secure_filename("a<b>c|d?.txt"), "abcd.txt");
        assert_eq!(secure_filename(".hidden"), "hidden");
    }

    #[test]
    fn test_secure_filename_transliterates_accents() {
        assert_eq!(secure_filename("żółć.pdf"), "zoc.pdf");
        assert_eq!(secure_filename("Faktura źródłowa.pdf"), "Faktura_zrodowa.pdf");
        assert_eq!(secure_filename("Ångström ﬁle.txt"), "Angstrom_file.txt");
        assert_eq!(file_type(&secure_filename("żółć.pdf"), Some("application/pdf")), "pdf");
    }

    #[test]
    fn test_secure_filename_can_be_empty() {
        assert_eq!(secure_filename(""), "");
        assert_eq!(secure_filename("../.."), "");
        assert_eq!(secure_filename("łłł"), "");
    }

    #[test]
    fn test_file_type() {
        assert_eq!(file_type("scan.PDF", Some("application/pdf")), "pdf");
        assert_eq!(file_type("README", Some("text/plain")), "text/plain");
        assert_eq!(file_type("README", None), "");
    }

    #[tokio::test]
    async fn test_store_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("uploads");

        let path = store_file(&nested, "a.txt", b"first").await.unwrap();
        assert_eq!(path, nested.join("a.txt"));

        store_file(&nested, "a.txt", b"second").await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"second");
    }
}
