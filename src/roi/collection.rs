//! Ordered collection of ROIs decoded from a list of named byte streams.
//!
//! The entry list normally comes from an archive (see [`crate::archive`]),
//! but any ordered `(name, bytes)` sequence works. Decoding is strict: the
//! first entry that fails aborts the whole read.

use indexmap::map::Entry;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use super::decode::{decode_with, DecodeOptions};
use super::model::RoiRecord;
use crate::error::{CollectionError, DecodeError};

/// A named byte stream handed to the collection reader.
pub trait RoiSource {
    /// Member or file name the bytes came from.
    fn entry_name(&self) -> &str;
    fn entry_bytes(&self) -> &[u8];
}

impl<N: AsRef<str>, B: AsRef<[u8]>> RoiSource for (N, B) {
    fn entry_name(&self) -> &str {
        self.0.as_ref()
    }

    fn entry_bytes(&self) -> &[u8] {
        self.1.as_ref()
    }
}

impl<T: RoiSource + ?Sized> RoiSource for &T {
    fn entry_name(&self) -> &str {
        (**self).entry_name()
    }

    fn entry_bytes(&self) -> &[u8] {
        (**self).entry_bytes()
    }
}

/// What to do when two entries map to the same key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the key's first position, replace its record with the later one.
    #[default]
    LastWins,
    /// Keep the first record, ignore later ones.
    FirstWins,
    /// Fail with [`CollectionError::DuplicateKey`].
    Error,
}

/// Options for [`read_collection_with`].
#[derive(Clone, Debug)]
pub struct CollectionOptions {
    /// Key records by their derived name; otherwise by `<type>.<ordinal>`.
    pub use_names: bool,
    pub duplicates: DuplicatePolicy,
    /// Decode entries on the rayon thread pool.
    pub parallel: bool,
    pub decode: DecodeOptions,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            use_names: true,
            duplicates: DuplicatePolicy::default(),
            parallel: false,
            decode: DecodeOptions::default(),
        }
    }
}

/// ROIs keyed by name (or synthesized label) in archive order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RoiCollection {
    entries: IndexMap<String, RoiRecord>,
}

impl RoiCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&RoiRecord> {
        self.entries.get(key)
    }

    pub fn get_index(&self, index: usize) -> Option<(&str, &RoiRecord)> {
        self.entries
            .get_index(index)
            .map(|(key, roi)| (key.as_str(), roi))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoiRecord)> {
        self.entries.iter().map(|(key, roi)| (key.as_str(), roi))
    }

    fn insert(
        &mut self,
        key: String,
        roi: RoiRecord,
        policy: DuplicatePolicy,
    ) -> Result<(), CollectionError> {
        match self.entries.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(roi);
            }
            Entry::Occupied(mut slot) => {
                warn!(key = slot.key().as_str(), policy = ?policy, "duplicate ROI key");
                match policy {
                    DuplicatePolicy::LastWins => {
                        slot.insert(roi);
                    }
                    DuplicatePolicy::FirstWins => {}
                    DuplicatePolicy::Error => {
                        return Err(CollectionError::DuplicateKey {
                            key: slot.key().clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a RoiCollection {
    type Item = (&'a String, &'a RoiRecord);
    type IntoIter = indexmap::map::Iter<'a, String, RoiRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Decodes every entry into a collection.
///
/// With `use_names`, keys are the records' derived names (falling back to
/// the entry name). Otherwise keys are `<type>.<ordinal>` with a 1-based
/// ordinal over all entries. Duplicate keys follow
/// [`DuplicatePolicy::LastWins`].
///
/// # Example
/// ```no_run
/// use ijroi::archive::read_zip_entries;
/// use ijroi::roi::read_collection;
///
/// let entries = read_zip_entries(std::path::Path::new("RoiSet.zip"))?;
/// let rois = read_collection(&entries, true)?;
/// for (key, roi) in rois.iter() {
///     println!("{key}: {}", roi.roi_type);
/// }
/// # Ok::<(), ijroi::RoiError>(())
/// ```
pub fn read_collection<I>(entries: I, use_names: bool) -> Result<RoiCollection, CollectionError>
where
    I: IntoIterator,
    I::Item: RoiSource + Sync,
{
    let opts = CollectionOptions {
        use_names,
        ..Default::default()
    };
    read_collection_with(entries, &opts)
}

/// Decodes every entry into a collection with explicit options.
pub fn read_collection_with<I>(
    entries: I,
    opts: &CollectionOptions,
) -> Result<RoiCollection, CollectionError>
where
    I: IntoIterator,
    I::Item: RoiSource + Sync,
{
    let entries: Vec<I::Item> = entries.into_iter().collect();

    let decode_one =
        |entry: &I::Item| decode_with(entry.entry_bytes(), Some(entry.entry_name()), &opts.decode);

    // Results stay indexed by input position so the reduction below sees
    // failures and keys in encounter order.
    let decoded: Vec<Result<RoiRecord, DecodeError>> = if opts.parallel {
        entries.par_iter().map(decode_one).collect()
    } else {
        entries.iter().map(decode_one).collect()
    };

    let mut collection = RoiCollection::new();
    for (index, (entry, result)) in entries.iter().zip(decoded).enumerate() {
        let name = entry.entry_name();
        let roi = result.map_err(|source| CollectionError::EntryFailed {
            name: name.to_string(),
            source,
        })?;

        let key = if opts.use_names {
            roi.name.clone().unwrap_or_else(|| name.to_string())
        } else {
            format!("{}.{}", roi.roi_type.name(), index + 1)
        };

        debug!(entry = name, key = key.as_str(), "collected ROI");
        collection.insert(key, roi, opts.duplicates)?;
    }

    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roi::RoiType;

    fn roi_bytes(roi_type: RoiType) -> Vec<u8> {
        let mut bytes = vec![0u8; 64];
        bytes[..4].copy_from_slice(b"Iout");
        bytes[6] = roi_type.code();
        bytes
    }

    #[test]
    fn keys_follow_entry_names_in_order() {
        let entries = vec![
            ("b.roi", roi_bytes(RoiType::Rect)),
            ("a.roi", roi_bytes(RoiType::Oval)),
            ("c.roi", roi_bytes(RoiType::Line)),
        ];
        let rois = read_collection(&entries, true).expect("read collection");
        let keys: Vec<&str> = rois.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(rois.get("a").map(|r| r.roi_type), Some(RoiType::Oval));
    }

    #[test]
    fn synthesized_keys_use_running_ordinal() {
        let entries = vec![
            ("x.roi", roi_bytes(RoiType::Rect)),
            ("y.roi", roi_bytes(RoiType::Oval)),
            ("z.roi", roi_bytes(RoiType::Rect)),
        ];
        let rois = read_collection(&entries, false).expect("read collection");
        let keys: Vec<&str> = rois.keys().collect();
        assert_eq!(keys, vec!["rect.1", "oval.2", "rect.3"]);
    }

    #[test]
    fn first_failure_aborts_with_entry_name() {
        let mut bad = roi_bytes(RoiType::Rect);
        bad[0] = b'X';
        let entries = vec![
            ("ok.roi".to_string(), roi_bytes(RoiType::Rect)),
            ("bad.roi".to_string(), bad),
            ("short.roi".to_string(), vec![b'I', b'o']),
        ];
        let err = read_collection(&entries, true).unwrap_err();
        match err {
            CollectionError::EntryFailed { name, source } => {
                assert_eq!(name, "bad.roi");
                assert!(matches!(source, DecodeError::InvalidSignature { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_keys_last_wins_by_default() {
        let entries = vec![
            ("dir1/cell.roi", roi_bytes(RoiType::Rect)),
            ("other.roi", roi_bytes(RoiType::Line)),
            ("dir2/cell.roi", roi_bytes(RoiType::Oval)),
        ];
        let rois = read_collection(&entries, true).expect("read collection");
        assert_eq!(rois.len(), 2);
        let (key, roi) = rois.get_index(0).expect("first entry");
        assert_eq!(key, "cell");
        assert_eq!(roi.roi_type, RoiType::Oval);
    }

    #[test]
    fn duplicate_policies() {
        let entries = vec![
            ("cell.roi", roi_bytes(RoiType::Rect)),
            ("cell.roi", roi_bytes(RoiType::Oval)),
        ];

        let first = read_collection_with(
            &entries,
            &CollectionOptions {
                duplicates: DuplicatePolicy::FirstWins,
                ..Default::default()
            },
        )
        .expect("first wins");
        assert_eq!(first.get("cell").map(|r| r.roi_type), Some(RoiType::Rect));

        let err = read_collection_with(
            &entries,
            &CollectionOptions {
                duplicates: DuplicatePolicy::Error,
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            CollectionError::DuplicateKey {
                key: "cell".to_string()
            }
        );
    }

    #[test]
    fn parallel_decode_matches_sequential() {
        let mut entries: Vec<(String, Vec<u8>)> = (0..32)
            .map(|i| {
                let ty = RoiType::ALL[i % RoiType::ALL.len()];
                (format!("roi-{i:03}.roi"), roi_bytes(ty))
            })
            .collect();

        let opts = CollectionOptions {
            use_names: false,
            parallel: true,
            ..Default::default()
        };
        let parallel = read_collection_with(&entries, &opts).expect("parallel");
        let sequential = read_collection(&entries, false).expect("sequential");
        assert_eq!(parallel, sequential);

        entries[20].1[1] = 0;
        entries[25].1[0] = 0;
        let err = read_collection_with(&entries, &opts).unwrap_err();
        assert!(matches!(
            err,
            CollectionError::EntryFailed { ref name, .. } if name == "roi-020.roi"
        ));
    }

    #[test]
    fn empty_input_gives_empty_collection() {
        let entries: Vec<(&str, Vec<u8>)> = Vec::new();
        let rois = read_collection(entries, true).expect("read collection");
        assert!(rois.is_empty());
    }
}
