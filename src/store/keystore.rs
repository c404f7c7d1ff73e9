use std::io::Write;
use std::path::{Path, PathBuf};

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{KeystoreError, Result};
use crate::report::Reporter;
use crate::store::TrustStore;

/// Magic bytes identifying a trust store file; the trailing byte is the
/// format version.
const MAGIC: &[u8; 8] = b"TRUSTKS\x01";
const SALT_LEN: usize = 32;
const VERIFIER_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
const DERIVED_LEN: usize = KEY_LEN + VERIFIER_LEN;
/// magic || m_cost || t_cost || p_cost || salt || verifier || nonce
const HEADER_LEN: usize = MAGIC.len() + 12 + SALT_LEN + VERIFIER_LEN + NONCE_LEN;

#[derive(Clone, Debug)]
pub struct KdfParams {
    pub m_cost: u32,
    pub t_cost: u32,
    pub p_cost: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            m_cost: 65536, // 64 MB
            t_cost: 3,
            p_cost: 4,
        }
    }
}

/// One alias → certificate pair. The DER bytes are opaque to the store.
#[derive(Debug, Serialize, Deserialize)]
struct StoreEntry {
    alias: String,
    #[serde(with = "b64")]
    certificate: Vec<u8>,
}

/// AES-256-GCM + Argon2id password-protected trust store, one file on disk.
///
/// Entries keep insertion order; an alias replaced via `add_or_replace`
/// moves to the end, matching keystore semantics where re-adding an entry
/// re-inserts it.
#[derive(Debug)]
pub struct PasswordKeystore {
    path: PathBuf,
    password: SecretString,
    kdf_params: KdfParams,
    /// Salt for Argon2id. Generated when the store is first created, then
    /// carried in the file header.
    salt: Vec<u8>,
    entries: Vec<StoreEntry>,
}

impl PasswordKeystore {
    /// Open the store at `path`, or start a fresh empty one if no readable
    /// file exists there. A file that exists but does not open with
    /// `password` fails with `InvalidPassword`.
    pub fn open(path: impl Into<PathBuf>, password: SecretString) -> Result<Self> {
        Self::open_with_params(path, password, KdfParams::default())
    }

    pub fn open_with_params(
        path: impl Into<PathBuf>,
        password: SecretString,
        kdf_params: KdfParams,
    ) -> Result<Self> {
        let mut store = Self {
            path: path.into(),
            password,
            kdf_params,
            salt: Vec::new(),
            entries: Vec::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// Re-read the backing file, discarding in-memory changes. Also the
    /// initial load path for `open`.
    pub fn reload(&mut self) -> Result<()> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            // A missing or unreadable file means "start from an empty
            // store", not an error.
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
                ) =>
            {
                let mut salt = vec![0u8; SALT_LEN];
                rand::thread_rng().fill_bytes(&mut salt);
                self.salt = salt;
                self.entries = Vec::new();
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if raw.len() < HEADER_LEN || &raw[..MAGIC.len()] != MAGIC {
            return Err(KeystoreError::CorruptStore(
                "unrecognized store header".into(),
            ));
        }

        let mut off = MAGIC.len();
        let params = KdfParams {
            m_cost: read_u32(&raw[off..]),
            t_cost: read_u32(&raw[off + 4..]),
            p_cost: read_u32(&raw[off + 8..]),
        };
        off += 12;
        let salt = &raw[off..off + SALT_LEN];
        off += SALT_LEN;
        let verifier = &raw[off..off + VERIFIER_LEN];
        off += VERIFIER_LEN;
        let nonce = &raw[off..off + NONCE_LEN];
        off += NONCE_LEN;
        let ciphertext = &raw[off..];

        let mut derived = derive_material(
            self.password.expose_secret().as_bytes(),
            salt,
            &params,
        )?;

        let plaintext_result = {
            let (key, check) = derived.split_at(KEY_LEN);
            if !bool::from(check.ct_eq(verifier)) {
                Err(KeystoreError::InvalidPassword)
            } else {
                let cipher = Aes256Gcm::new_from_slice(key)
                    .map_err(|_| KeystoreError::CorruptStore("Invalid key length.".into()))?;
                cipher
                    .decrypt(Nonce::from_slice(nonce), ciphertext)
                    .map_err(|_| {
                        KeystoreError::CorruptStore("store payload failed authentication".into())
                    })
            }
        };

        derived.zeroize();

        let plaintext = plaintext_result?;
        let entries: Vec<StoreEntry> = serde_json::from_slice(&plaintext)
            .map_err(|e| KeystoreError::CorruptStore(e.to_string()))?;

        self.kdf_params = params;
        self.salt = salt.to_vec();
        self.entries = entries;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aliases in insertion order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.alias.as_str())
    }

    fn position(&self, alias: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.alias == alias)
    }
}

impl TrustStore for PasswordKeystore {
    fn contains(&self, alias: &str) -> bool {
        self.position(alias).is_some()
    }

    fn add_or_replace(&mut self, alias: &str, certificate: Vec<u8>, reporter: &mut dyn Reporter) {
        if let Some(idx) = self.position(alias) {
            reporter.notice(&format!("Replacing {}", alias));
            self.entries.remove(idx);
        } else {
            reporter.notice(&format!("Adding {}", alias));
        }
        self.entries.push(StoreEntry {
            alias: alias.to_string(),
            certificate,
        });
    }

    fn delete(&mut self, alias: &str, reporter: &mut dyn Reporter) {
        if let Some(idx) = self.position(alias) {
            reporter.notice(&format!("Removing {}", alias));
            self.entries.remove(idx);
        }
    }

    /// Encrypt the in-memory entries and write them atomically to disk:
    /// temp file in the destination directory, fsync, rename. A failed save
    /// leaves the previous file untouched.
    fn save(&self) -> Result<()> {
        let payload = serde_json::to_vec(&self.entries)
            .map_err(|e| KeystoreError::Serialization(e.to_string()))?;

        let mut derived = derive_material(
            self.password.expose_secret().as_bytes(),
            &self.salt,
            &self.kdf_params,
        )?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let out_result = {
            let (key, verifier) = derived.split_at(KEY_LEN);
            Aes256Gcm::new_from_slice(key)
                .map_err(|_| KeystoreError::CorruptStore("Invalid key length.".into()))
                .and_then(|cipher| {
                    cipher
                        .encrypt(Nonce::from_slice(&nonce_bytes), payload.as_ref())
                        .map_err(|_| KeystoreError::CorruptStore("Encryption failed.".into()))
                })
                .map(|ciphertext| {
                    let mut out = Vec::with_capacity(HEADER_LEN + ciphertext.len());
                    out.extend_from_slice(MAGIC);
                    out.extend_from_slice(&self.kdf_params.m_cost.to_le_bytes());
                    out.extend_from_slice(&self.kdf_params.t_cost.to_le_bytes());
                    out.extend_from_slice(&self.kdf_params.p_cost.to_le_bytes());
                    out.extend_from_slice(&self.salt);
                    out.extend_from_slice(verifier);
                    out.extend_from_slice(&nonce_bytes);
                    out.extend_from_slice(&ciphertext);
                    out
                })
        };

        derived.zeroize();
        let out = out_result?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let tmp_path = parent.join(format!(".truststore.tmp.{}", rand::random::<u64>()));

        let write_result = (|| {
            let mut tmp = std::fs::File::create(&tmp_path)?;
            tmp.write_all(&out)?;
            tmp.sync_all()?;
            std::fs::rename(&tmp_path, &self.path)
        })();

        if let Err(e) = write_result {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(KeystoreError::UnableToSave(e));
        }
        Ok(())
    }
}

/// Derive 64 bytes from the password with Argon2id: the first 32 become the
/// AES key, the last 32 the password verifier stored in the header. The
/// caller zeroizes the returned array.
fn derive_material(
    password: &[u8],
    salt: &[u8],
    params: &KdfParams,
) -> Result<[u8; DERIVED_LEN]> {
    let argon2_params = Params::new(params.m_cost, params.t_cost, params.p_cost, Some(DERIVED_LEN))
        .map_err(|e| KeystoreError::Kdf(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut material = [0u8; DERIVED_LEN];
    argon2
        .hash_password_into(password, salt, &mut material)
        .map_err(|e| KeystoreError::Kdf(e.to_string()))?;

    Ok(material)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}

mod b64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(de)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}
