//! Output module for writing scrape results
//!
//! Results are serialized as pretty-printed JSON, either into a file
//! (parent directories are created on demand) or onto stdout.

use crate::ScrapeError;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where serialized results go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// Interprets `-` as stdout and anything else as a file path
    pub fn parse(value: &str) -> Self {
        if value == "-" {
            Destination::Stdout
        } else {
            Destination::File(PathBuf::from(value))
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Stdout => write!(f, "<stdout>"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Writes `value` as JSON to the given destination
pub fn write_output<T: Serialize + ?Sized>(
    destination: &Destination,
    value: &T,
) -> Result<(), ScrapeError> {
    match destination {
        Destination::Stdout => {
            let stdout = io::stdout();
            write_json_to(stdout.lock(), value)
        }
        Destination::File(path) => write_json(path, value),
    }
}

/// Writes `value` as JSON into a file, replacing any previous content
///
/// # Arguments
///
/// * `path` - Target file; missing parent directories are created
/// * `value` - Anything serializable, usually a list of items
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ScrapeError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    write_json_to(BufWriter::new(file), value)
}

/// Writes `value` as pretty JSON followed by a newline
pub fn write_json_to<W: Write, T: Serialize + ?Sized>(
    mut writer: W,
    value: &T,
) -> Result<(), ScrapeError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Group, Item, Tag};
    use tempfile::TempDir;

    fn sample_item() -> Item {
        Item {
            id: "42".to_string(),
            title: "Всё идёт по плану".to_string(),
            tags: vec![Tag::new("author", "Е. Летов")],
            body: vec![Group {
                lines: vec!["Границы ключ переломлен пополам".to_string()],
            }],
        }
    }

    #[test]
    fn test_destination_parse() {
        assert_eq!(Destination::parse("-"), Destination::Stdout);
        assert_eq!(
            Destination::parse("out/songs.json"),
            Destination::File(PathBuf::from("out/songs.json"))
        );
    }

    #[test]
    fn test_write_json_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("songs.json");

        write_json(&path, &vec![sample_item()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let items: Vec<Item> = serde_json::from_str(&content).unwrap();
        assert_eq!(items, vec![sample_item()]);
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_write_json_keeps_cyrillic_readable() {
        let mut buffer = Vec::new();
        write_json_to(&mut buffer, &sample_item()).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Всё идёт по плану"));
        assert!(text.contains("\"author\""));
    }

    #[test]
    fn test_write_json_fails_when_parent_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let result = write_json(&blocker.join("songs.json"), &Vec::<Item>::new());
        assert!(matches!(result, Err(ScrapeError::Io(_))));
    }
}
