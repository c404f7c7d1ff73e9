/// Sink for operator-visible output. Injected into the store and driver so
/// tests can capture exactly what a run reported.
pub trait Reporter {
    /// Informational notice about a store mutation (adding/replacing/removing).
    fn notice(&mut self, msg: &str);

    /// Warning about a skipped line or unreadable certificate.
    fn warn(&mut self, msg: &str);
}

/// Notices to stdout, warnings to stderr.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn notice(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn warn(&mut self, msg: &str) {
        eprintln!("{}", msg);
    }
}

/// Captures all output in memory. Used by tests to assert on emitted notices.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryReporter {
    pub notices: Vec<String>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
impl Reporter for MemoryReporter {
    fn notice(&mut self, msg: &str) {
        self.notices.push(msg.to_string());
    }

    fn warn(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }
}
