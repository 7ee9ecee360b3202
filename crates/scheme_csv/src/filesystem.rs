//! Sources of text lines for inference.
use std::collections::HashMap;
use std::fmt::Debug;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::{Component, Path};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use scheme_error::{Result, SchemeError};

/// Opens files for line-by-line reading.
///
/// Opening the same path again restarts reading from the beginning.
pub trait FileProvider: Debug + Sync + Send {
    /// Open a file for buffered reading.
    ///
    /// A missing file must be reported with `io::ErrorKind::NotFound`.
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + Send>>;
}

/// Standard file system access, nothing special.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileProvider for LocalFileSystem {
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Memory-backed file provider.
///
/// This provides a flat structure where every "file" exists at the root of the
/// filesystem. Cloning shares the underlying files.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    /// A simple file name -> file bytes mapping.
    files: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl MemoryFileSystem {
    pub fn register_file(&self, path: impl AsRef<Path>, content: impl Into<Bytes>) -> Result<()> {
        let name = get_normalized_file_name(path.as_ref())?;
        self.files.lock().insert(name.to_string(), content.into());
        Ok(())
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) -> Result<Option<Bytes>> {
        let name = get_normalized_file_name(path.as_ref())?;
        Ok(self.files.lock().remove(name))
    }

    pub fn list_files(&self) -> Vec<String> {
        self.files.lock().keys().cloned().collect()
    }
}

impl FileProvider for MemoryFileSystem {
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
        let name = get_normalized_file_name(path)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

        let content = self.files.lock().get(name).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("Missing file for '{name}'"))
        })?;

        Ok(Box::new(Cursor::new(content)))
    }
}

/// Gets a normalized file name that works with the in-memory file system.
///
/// - No directories permitted other than root or curr dir.
/// - Assume that current directory is the root directory.
pub fn get_normalized_file_name(path: &Path) -> Result<&str> {
    let mut components = path.components();
    match components.next() {
        Some(Component::RootDir) | Some(Component::CurDir) => (),
        Some(Component::Normal(s)) => {
            if components.next().is_some() {
                return Err(SchemeError::new(
                    "Directories not supported in memory file system",
                ));
            }

            return s
                .to_str()
                .ok_or_else(|| SchemeError::new("Unable to convert os string to string"));
        }
        Some(_) => return Err(SchemeError::new("Invalid component in path")),
        None => return Err(SchemeError::new("Path is empty")),
    }

    // We're either in '/' or './' (same thing)
    match components.next() {
        Some(Component::Normal(s)) => {
            if components.next().is_some() {
                return Err(SchemeError::new(
                    "Directories not supported in memory file system",
                ));
            }

            s.to_str()
                .ok_or_else(|| SchemeError::new("Unable to convert os string to string"))
        }
        _ => Err(SchemeError::new("Invalid path component")),
    }
}

/// Count the lines in a file by counting `\n` bytes.
///
/// An empty file has 0 lines. Any other file has at least 1 line, even
/// without a line terminator.
pub fn count_lines(provider: &dyn FileProvider, path: &Path) -> io::Result<usize> {
    const CHUNK_SIZE: usize = 4 * 1024;

    let mut reader = provider.open(path)?;
    let mut buf = [0; CHUNK_SIZE];

    let mut bytes_seen = 0;
    let mut count = 0;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        bytes_seen += n;
        count += buf[..n].iter().filter(|b| **b == b'\n').count();
    }

    if bytes_seen == 0 {
        return Ok(0);
    }

    Ok(count.max(1))
}

/// Read the next line without its line terminator (`\n` or `\r\n`).
///
/// Returns `None` at end of file. Invalid UTF-8 is replaced rather than
/// failing the read.
pub fn read_line(reader: &mut dyn BufRead, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn valid_file_names() {
        assert_eq!(
            "test.csv",
            get_normalized_file_name(&PathBuf::from("test.csv")).unwrap()
        );
        assert_eq!(
            "test.csv",
            get_normalized_file_name(&PathBuf::from("/test.csv")).unwrap()
        );
        assert_eq!(
            "test.csv",
            get_normalized_file_name(&PathBuf::from("./test.csv")).unwrap()
        );
    }

    #[test]
    fn invalid_file_names() {
        get_normalized_file_name(&PathBuf::from("../test.csv")).unwrap_err();
        get_normalized_file_name(&PathBuf::from("dir/test.csv")).unwrap_err();
        get_normalized_file_name(&PathBuf::from("./dir/test.csv")).unwrap_err();
        get_normalized_file_name(&PathBuf::from("/dir/test.csv")).unwrap_err();
        get_normalized_file_name(&PathBuf::from("")).unwrap_err();
    }

    #[test]
    fn memory_open_missing() {
        let fs = MemoryFileSystem::default();
        let err = fs.open(Path::new("nope.csv")).err().unwrap();
        assert_eq!(io::ErrorKind::NotFound, err.kind());
    }

    #[test]
    fn memory_open_restarts() {
        let fs = MemoryFileSystem::default();
        fs.register_file("a.csv", "x\ny\n").unwrap();
        assert_eq!(vec!["a.csv".to_string()], fs.list_files());

        for _ in 0..2 {
            let mut reader = fs.open(Path::new("/a.csv")).unwrap();
            let mut buf = Vec::new();
            assert_eq!(Some("x".to_string()), read_line(&mut reader, &mut buf).unwrap());
        }

        assert!(fs.remove_file("a.csv").unwrap().is_some());
        assert!(fs.open(Path::new("a.csv")).is_err());
    }

    #[test]
    fn line_counts() {
        let fs = MemoryFileSystem::default();
        let cases: [(&str, Bytes, usize); 5] = [
            ("empty.csv", Bytes::new(), 0),
            ("one.csv", Bytes::from_static(b"abc"), 1),
            ("one_nl.csv", Bytes::from_static(b"abc\n"), 1),
            ("three.csv", Bytes::from_static(b"a\nb\nc"), 2),
            ("large.csv", Bytes::from("row\n".repeat(5000)), 5000),
        ];

        for (name, content, expected) in cases {
            fs.register_file(name, content).unwrap();
            assert_eq!(expected, count_lines(&fs, Path::new(name)).unwrap(), "{name}");
        }
    }

    #[test]
    fn read_lines_strips_terminators() {
        let mut reader: &[u8] = b"a,b\r\nc\n\nd";
        let mut buf = Vec::new();

        let mut lines = Vec::new();
        while let Some(line) = read_line(&mut reader, &mut buf).unwrap() {
            lines.push(line);
        }

        assert_eq!(vec!["a,b", "c", "", "d"], lines);
    }
}
