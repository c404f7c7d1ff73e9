use std::io::BufRead;

use crate::directive::{self, Directive};
use crate::error::Result;
use crate::report::Reporter;
use crate::store::TrustStore;

/// Applies a stream of add/remove directives to a trust store, then persists
/// the result with a single save. Stateless across runs; per-line failures
/// never abort the stream.
pub struct Synchronizer<'a, S: TrustStore> {
    store: &'a mut S,
    reporter: &'a mut dyn Reporter,
}

impl<'a, S: TrustStore> Synchronizer<'a, S> {
    pub fn new(store: &'a mut S, reporter: &'a mut dyn Reporter) -> Self {
        Self { store, reporter }
    }

    /// Consume `reader` to end-of-stream, applying each line in order.
    /// Only an I/O error on the line source itself is fatal here.
    pub fn process_changes(&mut self, reader: impl BufRead) -> Result<()> {
        for line in reader.lines() {
            self.apply_line(&line?);
        }
        Ok(())
    }

    pub fn apply_line(&mut self, line: &str) {
        match Directive::parse(line) {
            Directive::Blank => {}
            Directive::Malformed(raw) => {
                self.reporter.warn(&format!("Unknown input: {}", raw));
            }
            Directive::Add(path) => {
                let alias = directive::alias(&path);
                self.store.add_from_path(&alias, &path, &mut *self.reporter);
            }
            Directive::Remove(path) => {
                // Also delete the bare basename: early versions keyed
                // entries without the "debian:" prefix, and those legacy
                // aliases must still be cleaned up.
                self.store
                    .delete(&directive::alias(&path), &mut *self.reporter);
                self.store
                    .delete(directive::basename(&path), &mut *self.reporter);
            }
        }
    }

    /// Write the accumulated changes to disk. Called exactly once, after the
    /// line source is exhausted; a failure here is fatal to the run.
    pub fn finish(self) -> Result<()> {
        self.store.save()
    }
}
