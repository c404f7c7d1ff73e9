/// One parsed line of the synchronization input.
#[derive(Debug, PartialEq, Eq)]
pub enum Directive {
    /// `+<path>`: add or replace the certificate at `path`.
    Add(String),
    /// `-<path>`: remove the certificate previously added from `path`.
    Remove(String),
    /// Empty or whitespace-only line, silently skipped.
    Blank,
    /// Anything else, reported but never fatal.
    Malformed(String),
}

impl Directive {
    /// The path after the sigil is used verbatim: no trimming, embedded
    /// whitespace preserved, since it must match the filesystem exactly.
    pub fn parse(line: &str) -> Directive {
        if line.trim().is_empty() {
            return Directive::Blank;
        }
        if let Some(path) = line.strip_prefix('+') {
            Directive::Add(path.to_string())
        } else if let Some(path) = line.strip_prefix('-') {
            Directive::Remove(path.to_string())
        } else {
            Directive::Malformed(line.to_string())
        }
    }
}

/// Final segment of a `/`-separated path. String-level on purpose: input
/// lines always use `/` regardless of host platform conventions.
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Canonical store alias for a certificate path. Only the basename
/// participates, so the same file moved between directories keeps one alias.
pub fn alias(path: &str) -> String {
    format!("debian:{}", basename(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        assert_eq!(
            Directive::parse("+/usr/share/ca-certificates/mozilla/foo.crt"),
            Directive::Add("/usr/share/ca-certificates/mozilla/foo.crt".to_string())
        );
    }

    #[test]
    fn test_parse_remove() {
        assert_eq!(
            Directive::parse("-/usr/share/ca-certificates/mozilla/foo.crt"),
            Directive::Remove("/usr/share/ca-certificates/mozilla/foo.crt".to_string())
        );
    }

    #[test]
    fn test_parse_blank_variants() {
        assert_eq!(Directive::parse(""), Directive::Blank);
        assert_eq!(Directive::parse("   "), Directive::Blank);
        assert_eq!(Directive::parse("\t"), Directive::Blank);
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(
            Directive::parse("x/some/path.crt"),
            Directive::Malformed("x/some/path.crt".to_string())
        );
        assert_eq!(
            Directive::parse("add /some/path.crt"),
            Directive::Malformed("add /some/path.crt".to_string())
        );
    }

    #[test]
    fn test_parse_preserves_embedded_whitespace() {
        assert_eq!(
            Directive::parse("+/etc/ssl/my certs/foo bar.crt"),
            Directive::Add("/etc/ssl/my certs/foo bar.crt".to_string())
        );
    }

    #[test]
    fn test_parse_bare_sigil_yields_empty_path() {
        assert_eq!(Directive::parse("+"), Directive::Add(String::new()));
        assert_eq!(Directive::parse("-"), Directive::Remove(String::new()));
    }

    #[test]
    fn test_parse_leading_whitespace_is_malformed() {
        assert_eq!(
            Directive::parse("  +/etc/ssl/foo.crt"),
            Directive::Malformed("  +/etc/ssl/foo.crt".to_string())
        );
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("/usr/share/ca-certificates/foo.crt"), "foo.crt");
        assert_eq!(basename("foo.crt"), "foo.crt");
        assert_eq!(basename("/trailing/"), "");
    }

    #[test]
    fn test_alias_discards_directory() {
        assert_eq!(alias("/a/b/spi-cacert-2008.crt"), "debian:spi-cacert-2008.crt");
        assert_eq!(alias("/x/y/spi-cacert-2008.crt"), "debian:spi-cacert-2008.crt");
        assert_eq!(alias("spi-cacert-2008.crt"), "debian:spi-cacert-2008.crt");
    }
}
