//! File records and the ordered collection mirrored from the service.

use log::warn;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Server-assigned file identifier.
///
/// The service may hand out integers or strings; both are kept verbatim and
/// compared by value. Parsing from text yields the integer form only when the
/// text is exactly how that integer displays, so `7` matches JSON `7` while
/// `007` and `+7` stay text and still reach string ids spelled that way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileId {
    Int(i64),
    Text(String),
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileId::Int(n) => write!(f, "{}", n),
            FileId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for FileId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => FileId::Int(n),
            _ => FileId::Text(s.to_string()),
        })
    }
}

impl From<i64> for FileId {
    fn from(n: i64) -> Self {
        FileId::Int(n)
    }
}

impl From<&str> for FileId {
    fn from(s: &str) -> Self {
        FileId::Text(s.to_string())
    }
}

impl From<i32> for FileId {
    fn from(n: i32) -> Self {
        FileId::Int(n.into())
    }
}

/// One stored file as the client sees it.
///
/// Any extra keys the service sends alongside `id` and `name` are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    pub name: String,
}

impl FileRecord {
    pub fn new(id: impl Into<FileId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Ordered list of records, unique by id.
///
/// Order after `replace_all` is the service's response order; `append` adds
/// at the end. Nothing here talks to the network: callers apply a change
/// only once the service has confirmed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCollection {
    records: Vec<FileRecord>,
}

impl FileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from a service listing.
    pub fn from_records(records: Vec<FileRecord>) -> Self {
        let mut collection = Self::new();
        collection.replace_all(records);
        collection
    }

    /// Replace every record with a fresh listing.
    ///
    /// If the listing repeats an id, the first occurrence wins.
    pub fn replace_all(&mut self, records: Vec<FileRecord>) {
        self.records.clear();
        self.records.reserve(records.len());
        for record in records {
            if self.contains(&record.id) {
                warn!("listing repeats id {}; keeping the first entry", record.id);
                continue;
            }
            self.records.push(record);
        }
    }

    /// Append a newly created record.
    ///
    /// An id that is already present replaces the existing record in place
    /// instead of appearing twice.
    pub fn append(&mut self, record: FileRecord) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.id == record.id) {
            warn!("created record reuses id {}; replacing in place", record.id);
            *existing = record;
            return;
        }
        self.records.push(record);
    }

    /// Set the name of the record with `id`. Returns false if it is absent.
    pub fn rename(&mut self, id: &FileId, name: impl Into<String>) -> bool {
        match self.records.iter_mut().find(|r| &r.id == id) {
            Some(record) => {
                record.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Remove and return the record with `id`.
    pub fn remove(&mut self, id: &FileId) -> Option<FileRecord> {
        let index = self.records.iter().position(|r| &r.id == id)?;
        Some(self.records.remove(index))
    }

    pub fn get(&self, id: &FileId) -> Option<&FileRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &FileId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_slice(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a FileCollection {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileCollection {
        FileCollection::from_records(vec![
            FileRecord::new(1, "a.txt"),
            FileRecord::new(2, "b.txt"),
            FileRecord::new(3, "c.txt"),
        ])
    }

    #[test]
    fn file_id_accepts_numbers_and_strings() {
        let records: Vec<FileRecord> = serde_json::from_str(
            r#"[{"id": 4, "name": "x", "url": "https://bucket/x"}, {"id": "k9", "name": "y"}]"#,
        )
        .unwrap();
        assert_eq!(records[0].id, FileId::Int(4));
        assert_eq!(records[1].id, FileId::Text("k9".to_string()));
    }

    #[test]
    fn file_id_parse_prefers_integer() {
        assert_eq!("7".parse::<FileId>().unwrap(), FileId::Int(7));
        assert_eq!(" 7 ".parse::<FileId>().unwrap(), FileId::Int(7));
        assert_eq!(
            "7a".parse::<FileId>().unwrap(),
            FileId::Text("7a".to_string())
        );
        assert_eq!(FileId::Int(12).to_string(), "12");
    }

    #[test]
    fn padded_numbers_stay_text() {
        for raw in ["007", "+7", "-0"] {
            let id: FileId = raw.parse().unwrap();
            assert_eq!(id, FileId::Text(raw.to_string()));
            assert_eq!(id.to_string(), raw);
        }
        assert_eq!("-3".parse::<FileId>().unwrap(), FileId::Int(-3));

        let files = FileCollection::from_records(vec![
            FileRecord::new(7, "seven"),
            FileRecord::new("007", "bond"),
        ]);
        assert_eq!(files.get(&"007".parse().unwrap()).unwrap().name, "bond");
        assert_eq!(files.get(&"7".parse().unwrap()).unwrap().name, "seven");
    }

    #[test]
    fn rename_keeps_order_and_id() {
        let mut files = FileCollection::from_records(vec![
            FileRecord::new(1, "x"),
            FileRecord::new(2, "y"),
        ]);
        assert!(files.rename(&FileId::Int(2), "z"));
        assert_eq!(
            files.as_slice(),
            &[FileRecord::new(1, "x"), FileRecord::new(2, "z")]
        );
    }

    #[test]
    fn rename_missing_id_is_noop() {
        let mut files = sample();
        let before = files.clone();
        assert!(!files.rename(&FileId::Int(9), "nope"));
        assert_eq!(files, before);
    }

    #[test]
    fn remove_takes_only_target() {
        let mut files = sample();
        let removed = files.remove(&FileId::Int(2)).unwrap();
        assert_eq!(removed.name, "b.txt");
        let ids: Vec<_> = files.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![FileId::Int(1), FileId::Int(3)]);
        assert!(files.remove(&FileId::Int(2)).is_none());
    }

    #[test]
    fn append_goes_last() {
        let mut files = sample();
        files.append(FileRecord::new(7, "a.txt"));
        assert_eq!(files.len(), 4);
        assert_eq!(files.as_slice().last(), Some(&FileRecord::new(7, "a.txt")));
    }

    #[test]
    fn append_with_existing_id_replaces() {
        let mut files = sample();
        files.append(FileRecord::new(2, "fresh.txt"));
        assert_eq!(files.len(), 3);
        assert_eq!(files.get(&FileId::Int(2)).unwrap().name, "fresh.txt");
    }

    #[test]
    fn replace_all_drops_duplicate_ids() {
        let files = FileCollection::from_records(vec![
            FileRecord::new(1, "first"),
            FileRecord::new(1, "second"),
            FileRecord::new(2, "other"),
        ]);
        assert_eq!(files.len(), 2);
        assert_eq!(files.get(&FileId::Int(1)).unwrap().name, "first");
    }
}
