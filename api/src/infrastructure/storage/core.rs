use std::fmt::Write;
use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid storage key `{0}`")]
pub struct InvalidKey(pub String);

/// Lowercase hex SHA-256 of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(64);
    for byte in digest {
        let _ = write!(&mut out, "{:02x}", byte);
    }
    out
}

/// Validates a `/`-separated key and returns it as a relative path.
/// Absolute keys and `..` segments are rejected.
pub fn key_path(key: &str) -> Result<PathBuf, InvalidKey> {
    let mut relative = PathBuf::new();
    for component in Path::new(&key.replace('\\', "/")).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => continue,
            _ => return Err(InvalidKey(key.to_string())),
        }
    }
    if relative.as_os_str().is_empty() {
        return Err(InvalidKey(key.to_string()));
    }
    Ok(relative)
}

/// Key prefix derived from the storage root, e.g. `./storage/` -> `storage`.
pub fn normalize_prefix(root: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    for comp in Path::new(root).components() {
        if let Component::Normal(os) = comp {
            let s = os.to_string_lossy();
            if !s.is_empty() {
                parts.push(s.replace('\\', "/"));
            }
        }
    }
    parts.join("/")
}
