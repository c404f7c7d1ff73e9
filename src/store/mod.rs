pub mod keystore;

use std::path::Path;

use crate::certificate;
use crate::error::Result;
use crate::report::Reporter;

/// Narrow interface to the persistent trust store. The driver only ever sees
/// this trait, so the on-disk format stays an implementation detail of the
/// backend.
pub trait TrustStore {
    fn contains(&self, alias: &str) -> bool;

    /// Insert `certificate` under `alias`, deleting any existing entry with
    /// the same alias first. Emits an "Adding" or "Replacing" notice.
    fn add_or_replace(&mut self, alias: &str, certificate: Vec<u8>, reporter: &mut dyn Reporter);

    /// Remove the entry at `alias` if present, emitting a "Removing" notice.
    /// Deleting an absent alias is a no-op.
    fn delete(&mut self, alias: &str, reporter: &mut dyn Reporter);

    /// Persist the current in-memory contents to the backing file.
    fn save(&self) -> Result<()>;

    /// Load the certificate file at `path` and insert it under `alias`.
    /// A file that cannot be read or decoded is skipped with a warning; no
    /// entry is created and no error propagates.
    fn add_from_path(&mut self, alias: &str, path: &str, reporter: &mut dyn Reporter) {
        match certificate::load(Path::new(path)) {
            Ok(der) => self.add_or_replace(alias, der, reporter),
            Err(e) => reporter.warn(&format!(
                "Warning: there was a problem reading the certificate file {}. Message:\n  {}",
                path, e
            )),
        }
    }
}
