use std::path::Path;

use x509_parser::prelude::*;

use crate::error::CertificateError;

const PEM_MARKER: &[u8] = b"-----BEGIN";

/// Read the file at `path` and decode exactly one X.509 certificate,
/// returning its DER bytes.
pub fn load(path: &Path) -> Result<Vec<u8>, CertificateError> {
    let data = std::fs::read(path)?;
    decode(&data)
}

/// Decode one certificate from raw bytes. Accepts DER, PEM, and PEM with
/// arbitrary text before the BEGIN marker (certificate files shipped by
/// distributions sometimes carry a human-readable comment header).
pub fn decode(data: &[u8]) -> Result<Vec<u8>, CertificateError> {
    match find_pem_marker(data) {
        Some(start) => {
            let (_, pem) = parse_x509_pem(&data[start..])
                .map_err(|e| CertificateError::Decode(e.to_string()))?;
            parse_x509_certificate(&pem.contents)
                .map_err(|e| CertificateError::Decode(e.to_string()))?;
            Ok(pem.contents)
        }
        None => {
            parse_x509_certificate(data)
                .map_err(|e| CertificateError::Decode(e.to_string()))?;
            Ok(data.to_vec())
        }
    }
}

fn find_pem_marker(data: &[u8]) -> Option<usize> {
    if data.len() < PEM_MARKER.len() {
        return None;
    }
    data.windows(PEM_MARKER.len()).position(|w| w == PEM_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn self_signed() -> (String, Vec<u8>) {
        let cert = rcgen::generate_simple_self_signed(vec!["trustsync.test".to_string()])
            .expect("certificate generation");
        (cert.cert.pem(), cert.cert.der().to_vec())
    }

    #[test]
    fn test_decode_pem() {
        let (pem, der) = self_signed();
        assert_eq!(decode(pem.as_bytes()).unwrap(), der);
    }

    #[test]
    fn test_decode_der() {
        let (_, der) = self_signed();
        assert_eq!(decode(&der).unwrap(), der);
    }

    #[test]
    fn test_decode_pem_with_leading_comment() {
        let (pem, der) = self_signed();
        let commented = format!(
            "This root certificate was added manually.\nSee ticket #539283.\n\n{}",
            pem
        );
        assert_eq!(decode(commented.as_bytes()).unwrap(), der);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode(b"not a certificate at all").is_err());
    }

    #[test]
    fn test_decode_empty_fails() {
        assert!(decode(b"").is_err());
    }

    #[test]
    fn test_decode_truncated_pem_fails() {
        let (pem, _) = self_signed();
        let truncated = &pem[..pem.len() / 2];
        assert!(decode(truncated.as_bytes()).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let (pem, der) = self_signed();
        let path = dir.path().join("ca.crt");
        std::fs::write(&path, pem).unwrap();
        assert_eq!(load(&path).unwrap(), der);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("absent.crt")).unwrap_err();
        assert!(matches!(err, CertificateError::Io(_)));
    }
}
