//! Shader source loading.
//!
//! Shader text either comes straight from the caller or is read whole from a file.
//! No preprocessing, include resolution or line-ending normalization happens here.

use std::borrow::Cow;
use std::path::Path;

use crate::error::ShaderError;

/// Where the text of one shader stage comes from.
#[derive(Debug, Clone, Copy)]
pub enum ShaderSource<'a> {
    /// Literal source text. Loading it performs no I/O.
    Text(&'a str),
    /// A file read in full on [`load`](ShaderSource::load).
    File(&'a Path),
}

impl<'a> ShaderSource<'a> {
    /// Produces the source text, reading the file if needed.
    pub fn load(&self) -> Result<Cow<'a, str>, ShaderError> {
        match *self {
            ShaderSource::Text(text) => Ok(Cow::Borrowed(text)),
            ShaderSource::File(path) => read_to_string(path).map(Cow::Owned),
        }
    }
}

impl<'a> From<&'a str> for ShaderSource<'a> {
    fn from(text: &'a str) -> Self {
        ShaderSource::Text(text)
    }
}

impl<'a> From<&'a Path> for ShaderSource<'a> {
    fn from(path: &'a Path) -> Self {
        ShaderSource::File(path)
    }
}

/// Reads the whole file at `path` as text.
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String, ShaderError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ShaderError::FileNotReadable {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Read {} ({} bytes)", path.display(), text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_source_is_borrowed() {
        let source = ShaderSource::from("#version 330 core\nvoid main() {}\n");
        let text = source.load().unwrap();
        assert!(matches!(text, Cow::Borrowed(_)));
        assert_eq!(text, "#version 330 core\nvoid main() {}\n");
    }

    #[test]
    fn test_file_contents_pass_through_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crlf.frag");
        std::fs::write(&path, "line one\r\nline two\r\n").unwrap();

        let text = read_to_string(&path).unwrap();
        assert_eq!(text, "line one\r\nline two\r\n");
    }

    #[test]
    fn test_missing_file_is_not_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.vert");

        let err = ShaderSource::File(&path).load().unwrap_err();
        match err {
            ShaderError::FileNotReadable { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_not_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.frag");
        std::fs::write(&path, b"// caf\xe9\n#version 330 core\n").unwrap();

        match read_to_string(&path).unwrap_err() {
            ShaderError::FileNotReadable { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_directory_is_not_readable() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_to_string(dir.path()).unwrap_err();
        assert!(matches!(err, ShaderError::FileNotReadable { .. }));
    }
}
