//! Raw attribute access.

use std::fs::File;
use std::io;

use xattr::FileExt;

/// Named key/value storage attached to a file.
///
/// Implemented for [`File`] on top of the platform's extended attribute
/// calls. Absence of an attribute is reported as `Ok(None)` (or `Ok(false)`
/// for removal), never as an error.
pub trait AttributeIo {
    /// Fetch an attribute value.
    fn get_attr(&self, name: &str) -> io::Result<Option<Vec<u8>>>;

    /// Create or replace an attribute value.
    fn set_attr(&self, name: &str, value: &[u8]) -> io::Result<()>;

    /// Delete an attribute. Returns `false` if it did not exist.
    fn remove_attr(&self, name: &str) -> io::Result<bool>;
}

impl AttributeIo for File {
    fn get_attr(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        self.get_xattr(name)
    }

    fn set_attr(&self, name: &str, value: &[u8]) -> io::Result<()> {
        self.set_xattr(name, value)
    }

    fn remove_attr(&self, name: &str) -> io::Result<bool> {
        match self.remove_xattr(name) {
            Ok(()) => Ok(true),
            Err(e) if is_absent(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Whether `err` is the platform's "no such attribute" error.
fn is_absent(err: &io::Error) -> bool {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    let code = libc::ENODATA;
    #[cfg(all(unix, not(any(target_os = "linux", target_os = "android"))))]
    let code = libc::ENOATTR;
    #[cfg(not(unix))]
    let code = -1;

    err.raw_os_error() == Some(code)
}
