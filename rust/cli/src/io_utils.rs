//! File and stream helpers shared by the commands.
//!
//! - Reading one trimmed line of interactive input
//! - Reading text files with a leading UTF-8 BOM removed
//! - Collecting `.jsonl` files below a directory

use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Reads a line of input from a buffered reader, blocking until available.
///
/// Returns the trimmed line (possibly empty), or `None` on EOF or a read
/// error.
///
/// # Example
///
/// ```rust,no_run
/// use std::io::{self, BufRead};
/// # use lastturn_cli::io_utils::read_stdin_line;
///
/// let stdin = io::stdin();
/// let mut handle = stdin.lock();
/// if let Some(line) = read_stdin_line(&mut handle) {
///     println!("You entered: {}", line);
/// }
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

/// Reads a whole text file, dropping a UTF-8 BOM if present.
pub fn read_text(path: &Path) -> std::io::Result<String> {
    let mut content = std::fs::read_to_string(path)?;
    strip_utf8_bom(&mut content);
    Ok(content)
}

/// All `.jsonl` files below `dir`, in sorted order. Unreadable
/// subdirectories are skipped.
pub fn jsonl_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(d) = stack.pop() {
        let rd = match std::fs::read_dir(&d) {
            Ok(v) => v,
            Err(_) => continue,
        };
        for e in rd.filter_map(Result::ok) {
            let p = e.path();
            if p.is_dir() {
                stack.push(p);
            } else if p.extension().is_some_and(|ext| ext == "jsonl") {
                files.push(p);
            }
        }
    }
    files.sort();
    files
}

fn strip_utf8_bom(s: &mut String) {
    const UTF8_BOM: &str = "\u{feff}";
    if s.starts_with(UTF8_BOM) {
        s.drain(..UTF8_BOM.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_stdin_line_trims() {
        let mut cursor = Cursor::new(b"  place 2  \n".to_vec());
        assert_eq!(read_stdin_line(&mut cursor), Some("place 2".to_string()));
    }

    #[test]
    fn test_read_stdin_line_eof() {
        let mut cursor = Cursor::new(Vec::new());
        assert_eq!(read_stdin_line(&mut cursor), None);
    }

    #[test]
    fn test_strip_utf8_bom() {
        let mut s = "\u{feff}hello".to_string();
        strip_utf8_bom(&mut s);
        assert_eq!(s, "hello");
    }

    #[test]
    fn test_jsonl_files_recurses_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("day1");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("a.jsonl"), "").unwrap();
        std::fs::write(nested.join("b.jsonl"), "").unwrap();
        std::fs::write(nested.join("notes.txt"), "").unwrap();

        let files = jsonl_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().unwrap() == "jsonl"));
    }
}
