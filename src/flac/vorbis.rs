// VORBIS_COMMENT implementation for FLAC

use std::collections::{BTreeMap, HashMap};
use std::ops::Deref;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::utils::io::ByteCursor;

/// A single `KEY=VALUE` comment
///
/// The key keeps the case it was written with; lookups ignore case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub key: String,
    pub value: String,
    // false for entries read without '=', so they are written back the same way
    separator: bool,
}

impl TagEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        TagEntry {
            key: key.into(),
            value: value.into(),
            separator: true,
        }
    }

    /// Split a raw comment on its first '='
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('=') {
            Some((key, value)) => TagEntry::new(key, value),
            None => {
                tracing::debug!(entry = raw, "Vorbis comment without '=', keeping as key with empty value");
                TagEntry {
                    key: raw.to_string(),
                    value: String::new(),
                    separator: false,
                }
            }
        }
    }

    /// The comment as it appears on disk
    pub fn to_raw(&self) -> String {
        if self.separator || !self.value.is_empty() {
            format!("{}={}", self.key, self.value)
        } else {
            self.key.clone()
        }
    }
}

/// All values stored under one key, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagValues(Vec<String>);

impl TagValues {
    /// First value, or "" when the key is absent
    pub fn first(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or("")
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for TagValues {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

/// Vorbis comment structure
///
/// Payload layout, lengths little-endian:
/// `[u32 vendor_len][vendor][u32 count]{[u32 len][KEY=VALUE]}*count`
#[derive(Debug, Clone, Default)]
pub struct VorbisComment {
    vendor_string: String,
    entries: Vec<TagEntry>,
    // normalized key -> positions in `entries`
    index: HashMap<String, Vec<usize>>,
    // payload as read, while it cannot be rebuilt from the fields; dropped on edit
    source: Option<Vec<u8>>,
}

impl PartialEq for VorbisComment {
    fn eq(&self, other: &Self) -> bool {
        self.vendor_string == other.vendor_string && self.entries == other.entries
    }
}

impl Eq for VorbisComment {}

fn normalize(key: &str) -> String {
    key.to_uppercase()
}

fn decode_utf8(bytes: &[u8], what: &'static str) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            tracing::warn!(field = what, "Invalid UTF-8 in Vorbis comment, decoding lossily");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

fn length_prefix(len: usize, name: &'static str) -> Result<[u8; 4]> {
    let len = u32::try_from(len).map_err(|_| Error::InvalidArgument {
        name,
        value: len as u64,
        reason: "must fit in 32 bits",
    })?;
    Ok(len.to_le_bytes())
}

impl VorbisComment {
    pub fn new(vendor_string: impl Into<String>) -> Self {
        VorbisComment {
            vendor_string: vendor_string.into(),
            ..Default::default()
        }
    }

    /// Decode a VORBIS_COMMENT payload
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);

        let vendor_string = decode_utf8(cursor.le_prefixed()?, "vendor");

        let comment_count = cursor.le_u32()? as usize;
        // every entry needs at least its length prefix
        let mut entries = Vec::with_capacity(comment_count.min(cursor.remaining() / 4));
        for _ in 0..comment_count {
            let raw = decode_utf8(cursor.le_prefixed()?, "comment");
            entries.push(TagEntry::parse(&raw));
        }

        if cursor.remaining() > 0 {
            tracing::warn!(
                trailing = cursor.remaining(),
                "Ignoring bytes after the last Vorbis comment"
            );
        }

        let mut comment = VorbisComment {
            vendor_string,
            entries,
            index: HashMap::new(),
            source: None,
        };
        comment.rebuild_index();
        if comment.encode()? != data {
            tracing::warn!("Vorbis comment does not re-encode exactly, keeping raw payload until edited");
            comment.source = Some(data.to_vec());
        }
        Ok(comment)
    }

    /// Encode to payload bytes, deriving every length from the content
    ///
    /// An unedited block decoded from a payload with trailing bytes or
    /// invalid UTF-8 encodes to the payload it was read from.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if let Some(source) = &self.source {
            return Ok(source.clone());
        }

        let mut result = Vec::new();

        result.extend_from_slice(&length_prefix(self.vendor_string.len(), "vendor_length")?);
        result.extend_from_slice(self.vendor_string.as_bytes());

        result.extend_from_slice(&length_prefix(self.entries.len(), "comment_count")?);
        for entry in &self.entries {
            let raw = entry.to_raw();
            result.extend_from_slice(&length_prefix(raw.len(), "comment_length")?);
            result.extend_from_slice(raw.as_bytes());
        }

        Ok(result)
    }

    pub fn vendor(&self) -> &str {
        &self.vendor_string
    }

    pub fn set_vendor(&mut self, vendor: impl Into<String>) {
        self.vendor_string = vendor.into();
        self.source = None;
    }

    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All values under `key`, case-insensitively; empty when absent
    pub fn get(&self, key: &str) -> TagValues {
        let values = self
            .index
            .get(&normalize(key))
            .map(|positions| positions.iter().map(|&i| self.entries[i].value.clone()).collect())
            .unwrap_or_default();
        TagValues(values)
    }

    /// First value under `key`, or "" when absent
    pub fn first(&self, key: &str) -> &str {
        self.index
            .get(&normalize(key))
            .and_then(|positions| positions.first())
            .map(|&i| self.entries[i].value.as_str())
            .unwrap_or("")
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(&normalize(key))
    }

    /// Append a value, keeping any existing values for the key
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let entry = TagEntry::new(key, value);
        self.source = None;
        self.index
            .entry(normalize(&entry.key))
            .or_default()
            .push(self.entries.len());
        self.entries.push(entry);
    }

    /// Replace every value under `key` with a single one
    ///
    /// The new entry takes the position of the first old one, or goes to the
    /// end when the key was absent.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let entry = TagEntry::new(key, value);
        let normalized = normalize(&entry.key);
        self.source = None;
        match self.index.get(&normalized).and_then(|p| p.first()).copied() {
            Some(first) => {
                self.entries[first] = entry;
                let mut position = 0;
                self.entries.retain(|e| {
                    let keep = position == first || normalize(&e.key) != normalized;
                    position += 1;
                    keep
                });
                self.rebuild_index();
            }
            None => self.add(entry.key, entry.value),
        }
    }

    /// Remove every value under `key`, returning how many were dropped
    pub fn remove(&mut self, key: &str) -> usize {
        let normalized = normalize(key);
        let before = self.entries.len();
        self.entries.retain(|e| normalize(&e.key) != normalized);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.source = None;
            self.rebuild_index();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.source = None;
    }

    /// Keys in the order they first appear, with their original case
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<(usize, &str)> = self
            .index
            .values()
            .map(|positions| (positions[0], self.entries[positions[0]].key.as_str()))
            .collect();
        keys.sort_unstable_by_key(|&(position, _)| position);
        keys.into_iter().map(|(_, key)| key).collect()
    }

    /// Values grouped under upper-cased keys
    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entry in &self.entries {
            map.entry(normalize(&entry.key)).or_default().push(entry.value.clone());
        }
        map
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (position, entry) in self.entries.iter().enumerate() {
            self.index.entry(normalize(&entry.key)).or_default().push(position);
        }
    }
}

/// Common Vorbis comment field names
pub struct VorbisFields;
impl VorbisFields {
    pub const TITLE: &str = "TITLE";
    pub const ARTIST: &str = "ARTIST";
    pub const ALBUM: &str = "ALBUM";
    pub const DATE: &str = "DATE";
    pub const TRACKNUMBER: &str = "TRACKNUMBER";
    pub const GENRE: &str = "GENRE";
    pub const COMMENT: &str = "COMMENT";
    pub const LYRICS: &str = "LYRICS";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(vendor: &str, comments: &[&str]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
        data.extend_from_slice(vendor.as_bytes());
        data.extend_from_slice(&(comments.len() as u32).to_le_bytes());
        for comment in comments {
            data.extend_from_slice(&(comment.len() as u32).to_le_bytes());
            data.extend_from_slice(comment.as_bytes());
        }
        data
    }

    #[test]
    fn multi_value_lookup_ignores_case() {
        let data = payload("reference libFLAC 1.4.3", &["ARTIST=A", "ARTIST=B", "TITLE=T"]);
        let comment = VorbisComment::decode(&data).unwrap();

        assert_eq!(comment.vendor(), "reference libFLAC 1.4.3");
        assert_eq!(comment.get("artist").as_slice(), ["A", "B"]);
        assert_eq!(comment.get("ArTiSt").as_slice(), ["A", "B"]);
        assert_eq!(comment.get("TITLE").first(), "T");
        assert!(comment.get("GENRE").is_empty());
        assert_eq!(comment.get("GENRE").first(), "");
        assert_eq!(comment.first("genre"), "");
    }

    #[test]
    fn encode_reproduces_payload() {
        let data = payload("vendor", &["artist=Mixed Case", "TITLE=a=b", "NOVALUE", "EMPTY="]);
        let comment = VorbisComment::decode(&data).unwrap();
        assert_eq!(comment.encode().unwrap(), data);
    }

    #[test]
    fn entry_without_separator_is_tolerated() {
        let comment = VorbisComment::decode(&payload("", &["LONELY"])).unwrap();
        assert_eq!(comment.entries()[0].key, "LONELY");
        assert_eq!(comment.get("lonely").as_slice(), [""]);
    }

    #[test]
    fn value_keeps_everything_after_first_separator() {
        let comment = VorbisComment::decode(&payload("", &["URL=http://x/?a=1"])).unwrap();
        assert_eq!(comment.first("url"), "http://x/?a=1");
    }

    #[test]
    fn truncated_payload_is_out_of_range() {
        let mut data = payload("v", &["A=1", "B=2"]);
        data.truncate(data.len() - 2);
        assert!(matches!(VorbisComment::decode(&data), Err(Error::OutOfRange { .. })));

        // count claims more entries than exist
        let mut data = payload("v", &["A=1"]);
        data[5] = 2;
        assert!(matches!(VorbisComment::decode(&data), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let mut data = payload("", &[]);
        data[4] = 1;
        data.extend_from_slice(&[3, 0, 0, 0, b'A', b'=', 0xFF]);
        let comment = VorbisComment::decode(&data).unwrap();
        assert_eq!(comment.first("a"), "\u{FFFD}");
    }

    #[test]
    fn unedited_irregular_payload_encodes_as_read() {
        let mut trailing = payload("v", &["A=1"]);
        trailing.extend_from_slice(&[0, 0, 0, 0]);
        let comment = VorbisComment::decode(&trailing).unwrap();
        assert_eq!(comment.first("a"), "1");
        assert_eq!(comment.encode().unwrap(), trailing);

        let mut invalid = payload("", &[]);
        invalid[4] = 1;
        invalid.extend_from_slice(&[3, 0, 0, 0, b'A', b'=', 0xFF]);
        let comment = VorbisComment::decode(&invalid).unwrap();
        assert_eq!(comment.encode().unwrap(), invalid);
    }

    #[test]
    fn edit_rebuilds_irregular_payload() {
        let mut data = payload("v", &["A=1"]);
        data.extend_from_slice(&[0, 0, 0, 0]);
        let mut comment = VorbisComment::decode(&data).unwrap();
        comment.add("B", "2");
        assert_eq!(comment.encode().unwrap(), payload("v", &["A=1", "B=2"]));
    }

    #[test]
    fn set_replaces_in_place() {
        let data = payload("", &["ARTIST=A", "TITLE=T", "artist=B"]);
        let mut comment = VorbisComment::decode(&data).unwrap();
        comment.set("Artist", "C");

        let raw: Vec<String> = comment.entries().iter().map(TagEntry::to_raw).collect();
        assert_eq!(raw, ["Artist=C", "TITLE=T"]);
        assert_eq!(comment.get("artist").as_slice(), ["C"]);

        comment.set("GENRE", "Jazz");
        assert_eq!(comment.len(), 3);
        assert_eq!(comment.first("genre"), "Jazz");
    }

    #[test]
    fn add_and_remove_keep_index_in_sync() {
        let mut comment = VorbisComment::new("me");
        comment.add("ARTIST", "A");
        comment.add("TITLE", "T");
        comment.add("artist", "B");
        assert_eq!(comment.keys(), ["ARTIST", "TITLE"]);
        assert_eq!(comment.get("ARTIST").as_slice(), ["A", "B"]);

        assert_eq!(comment.remove("Artist"), 2);
        assert_eq!(comment.remove("Artist"), 0);
        assert!(!comment.contains("artist"));
        assert_eq!(comment.first("title"), "T");

        comment.clear();
        assert!(comment.is_empty());
        assert!(!comment.contains("title"));
    }

    #[test]
    fn grouped_map_uses_normalized_keys() {
        let comment = VorbisComment::decode(&payload("", &["artist=A", "ARTIST=B", "Title=T"])).unwrap();
        let map = comment.to_map();
        assert_eq!(map["ARTIST"], ["A", "B"]);
        assert_eq!(map["TITLE"], ["T"]);
    }
}
