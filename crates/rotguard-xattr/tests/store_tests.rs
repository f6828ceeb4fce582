use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io;

use rotguard_xattr::{
    Algorithm, AttributeIo, AttributeRecord, Mtime, StoreError, XattrStore,
};

/// In-memory attribute table standing in for a file.
#[derive(Default)]
struct MemoryAttributes {
    attrs: RefCell<HashMap<String, Vec<u8>>>,
    read_only: bool,
}

impl MemoryAttributes {
    fn with(pairs: &[(&str, &str)]) -> Self {
        let table = Self::default();
        for (name, value) in pairs {
            table
                .attrs
                .borrow_mut()
                .insert(name.to_string(), value.as_bytes().to_vec());
        }
        table
    }

    fn get(&self, name: &str) -> Option<String> {
        self.attrs
            .borrow()
            .get(name)
            .map(|v| String::from_utf8(v.clone()).unwrap())
    }
}

impl AttributeIo for MemoryAttributes {
    fn get_attr(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.attrs.borrow().get(name).cloned())
    }

    fn set_attr(&self, name: &str, value: &[u8]) -> io::Result<()> {
        if self.read_only {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.attrs
            .borrow_mut()
            .insert(name.to_string(), value.to_vec());
        Ok(())
    }

    fn remove_attr(&self, name: &str) -> io::Result<bool> {
        Ok(self.attrs.borrow_mut().remove(name).is_some())
    }
}

fn sha256_digest(c: char) -> String {
    c.to_string().repeat(64)
}

#[test]
fn test_read_missing_digest_leaves_record_cleared() {
    let store = XattrStore::default();
    let attrs = MemoryAttributes::default();

    let mut record = AttributeRecord::with_values(
        Algorithm::Sha256,
        sha256_digest('a'),
        Mtime { secs: 1, nanos: 1 },
    );
    store.read(&attrs, &mut record).unwrap();

    assert!(record.is_unset());
    assert!(record.has_zero_digest());
    assert_eq!(record.algorithm, Algorithm::Sha256);
}

#[test]
fn test_read_digest_without_timestamp_is_discarded() {
    let store = XattrStore::default();
    let attrs = MemoryAttributes::with(&[("user.shatag.sha256", sha256_digest('a').as_str())]);

    let record = store.load(&attrs, Algorithm::Sha256).unwrap();
    assert!(record.is_unset());
    assert!(record.has_zero_digest());
}

#[test]
fn test_read_legacy_timestamp() {
    let store = XattrStore::default();
    let attrs = MemoryAttributes::with(&[
        ("user.shatag.sha256", sha256_digest('a').as_str()),
        ("user.shatag.ts", "1335974989.123456"),
    ]);

    let record = store.load(&attrs, Algorithm::Sha256).unwrap();
    assert_eq!(record.digest_hex, sha256_digest('a'));
    assert_eq!(record.mtime, Mtime { secs: 1335974989, nanos: 123456000 });
}

#[test]
fn test_read_rejects_bad_timestamps() {
    let store = XattrStore::default();

    let attrs = MemoryAttributes::with(&[
        ("user.shatag.sha256", sha256_digest('a').as_str()),
        ("user.shatag.ts", "1000.1234567890"),
    ]);
    assert!(matches!(
        store.load(&attrs, Algorithm::Sha256),
        Err(StoreError::NanosOutOfRange { .. })
    ));

    let attrs = MemoryAttributes::with(&[
        ("user.shatag.sha256", sha256_digest('a').as_str()),
        ("user.shatag.ts", "yesterday"),
    ]);
    assert!(matches!(
        store.load(&attrs, Algorithm::Sha256),
        Err(StoreError::MalformedTimestamp { .. })
    ));
}

#[test]
fn test_read_rejects_oversized_values() {
    let store = XattrStore::default();

    let attrs = MemoryAttributes::with(&[("user.shatag.sha256", "a".repeat(129).as_str())]);
    assert!(matches!(
        store.load(&attrs, Algorithm::Sha256),
        Err(StoreError::ValueTooLong { max: 128, .. })
    ));

    let long_ts = format!("{}.1", "1".repeat(40));
    let attrs = MemoryAttributes::with(&[
        ("user.shatag.sha256", sha256_digest('a').as_str()),
        ("user.shatag.ts", long_ts.as_str()),
    ]);
    assert!(matches!(
        store.load(&attrs, Algorithm::Sha256),
        Err(StoreError::ValueTooLong { .. })
    ));
}

#[test]
fn test_write_uses_canonical_encoding() {
    let store = XattrStore::default();
    let attrs = MemoryAttributes::default();
    let record = AttributeRecord::with_values(
        Algorithm::Sha256,
        sha256_digest('c'),
        Mtime { secs: 2000, nanos: 500 },
    );

    store.write(&attrs, &record).unwrap();

    assert_eq!(attrs.get("user.shatag.sha256").unwrap(), sha256_digest('c'));
    assert_eq!(attrs.get("user.shatag.ts").unwrap(), "2000.000000500");
}

#[test]
fn test_write_then_read_reproduces_record() {
    let store = XattrStore::new("user.rotguard");
    let attrs = MemoryAttributes::default();

    for alg in Algorithm::all() {
        let record = AttributeRecord::with_values(
            alg,
            "e".repeat(alg.hex_len()),
            Mtime { secs: 1_700_000_000, nanos: 42 },
        );
        store.write(&attrs, &record).unwrap();
        assert_eq!(store.load(&attrs, alg).unwrap(), record);
    }
}

#[test]
fn test_write_failure_is_recoverable() {
    let store = XattrStore::default();
    let attrs = MemoryAttributes {
        read_only: true,
        ..Default::default()
    };

    let err = store
        .write(&attrs, &AttributeRecord::new(Algorithm::Sha256))
        .unwrap_err();
    assert!(matches!(err, StoreError::Write { ref name, .. } if name == "user.shatag.sha256"));
    assert!(err.is_recoverable());
}

#[test]
fn test_remove() {
    let store = XattrStore::default();
    let attrs = MemoryAttributes::with(&[
        ("user.shatag.sha256", sha256_digest('a').as_str()),
        ("user.shatag.ts", "1.000000000"),
        ("user.other", "kept"),
    ]);

    assert!(store.remove(&attrs, Algorithm::Sha256).unwrap());
    assert!(!store.remove(&attrs, Algorithm::Sha256).unwrap());
    assert_eq!(attrs.get("user.other").unwrap(), "kept");
    assert!(store.load(&attrs, Algorithm::Sha256).unwrap().is_unset());
}

/// Returns a temp file that accepts user xattrs, or `None` when the
/// filesystem backing the temp dir does not support them.
fn xattr_capable_file() -> Option<(tempfile::NamedTempFile, File)> {
    let temp = tempfile::NamedTempFile::new().ok()?;
    let file = File::open(temp.path()).ok()?;
    file.set_attr("user.rotguard.check", b"1").ok()?;
    file.remove_attr("user.rotguard.check").ok()?;
    Some((temp, file))
}

#[test]
fn test_real_file_round_trip() {
    let Some((_temp, file)) = xattr_capable_file() else {
        eprintln!("skipping: user xattrs unsupported here");
        return;
    };
    let store = XattrStore::default();

    assert!(store.load(&file, Algorithm::Sha256).unwrap().is_unset());

    let record = AttributeRecord::with_values(
        Algorithm::Sha256,
        sha256_digest('b'),
        Mtime { secs: 1000, nanos: 0 },
    );
    store.write(&file, &record).unwrap();
    assert_eq!(store.load(&file, Algorithm::Sha256).unwrap(), record);

    // Another algorithm shares the timestamp but has no digest of its own.
    assert!(store.load(&file, Algorithm::Sha512).unwrap().is_unset());

    assert!(store.remove(&file, Algorithm::Sha256).unwrap());
    assert!(store.load(&file, Algorithm::Sha256).unwrap().is_unset());
}
