//! JSONL (JSON Lines) storage.
//!
//! Each line is a valid JSON object representing one entity.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::StorageError;

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
        }

        writer.flush()?;
        debug!("Wrote {} entities to {:?}", entities.len(), self.path);

        Ok(entities.len())
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Read all entities from the file. A missing file reads as empty; a
    /// malformed line is an error.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let entity = serde_json::from_str(&line).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                line: i + 1,
                source,
            })?;
            entities.push(entity);
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Row {
        id: String,
        value: u32,
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("rows.jsonl");
        let rows = vec![
            Row { id: "a".into(), value: 1 },
            Row { id: "b".into(), value: 2 },
        ];

        let written = JsonlWriter::new(path.clone()).write_all(&rows).unwrap();
        assert_eq!(written, 2);

        let read: Vec<Row> = JsonlReader::new(path).read_all().unwrap();
        assert_eq!(read, rows);
    }

    #[test]
    fn test_write_all_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.jsonl");
        let writer = JsonlWriter::new(path.clone());
        writer
            .write_all(&[Row { id: "a".into(), value: 1 }, Row { id: "b".into(), value: 2 }])
            .unwrap();
        writer.write_all(&[Row { id: "c".into(), value: 3 }]).unwrap();

        let read: Vec<Row> = JsonlReader::new(path).read_all().unwrap();
        assert_eq!(read, vec![Row { id: "c".into(), value: 3 }]);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let read: Vec<Row> = JsonlReader::new(dir.path().join("none.jsonl"))
            .read_all()
            .unwrap();
        assert!(read.is_empty());
    }

    #[test]
    fn test_malformed_line_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.jsonl");
        fs::write(&path, "{\"id\":\"a\",\"value\":1}\n\nnot json\n").unwrap();

        let err = JsonlReader::<Row>::new(path).read_all().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { line: 3, .. }));
    }
}
