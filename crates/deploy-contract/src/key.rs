//! Loading of the private key that signs the deployment.
//!
//! Loading happens in two steps so that reading the key material and turning
//! it into a signer fail at different points of the deployment: a missing key
//! file is reported before the artifact is read, a malformed key only once
//! the signer is constructed.

use {
    crate::error::{Error, KeyError},
    alloy::signers::local::{LocalSignerError, PrivateKeySigner},
    std::{fmt, path::PathBuf},
};

/// Where the private key comes from.
#[derive(Clone)]
pub enum KeySource {
    /// A hex encoded key given directly, e.g. on the command line.
    Literal(String),
    /// A file whose trimmed contents are the hex encoding of the raw key
    /// bytes.
    File(PathBuf),
}

impl KeySource {
    pub fn read(&self) -> Result<RawKey, Error> {
        match self {
            Self::Literal(key) => Ok(RawKey::Literal(key.clone())),
            Self::File(path) => {
                let contents = std::fs::read_to_string(path).map_err(|source| Error::File {
                    path: path.clone(),
                    source,
                })?;
                Ok(RawKey::Bytes(contents.trim().to_owned()))
            }
        }
    }
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(_) => f.write_str("Literal(SECRET)"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// Key material that has been read but not validated yet.
pub enum RawKey {
    Literal(String),
    Bytes(String),
}

impl RawKey {
    /// Constructs the signing identity. This is the first point where a
    /// malformed key is detected.
    pub fn signer(&self) -> Result<PrivateKeySigner, KeyError> {
        match self {
            Self::Literal(key) => Ok(key.trim().parse::<PrivateKeySigner>()?),
            Self::Bytes(hex) => {
                let bytes = const_hex::decode(hex)?;
                let signer =
                    PrivateKeySigner::from_slice(&bytes).map_err(LocalSignerError::from)?;
                Ok(signer)
            }
        }
    }
}

impl fmt::Debug for RawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawKey(SECRET)")
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::{primitives::address, signers::Signer},
        std::io::Write,
    };

    // First default account of anvil and hardhat.
    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn literal_key_with_and_without_prefix() {
        for key in [KEY.to_owned(), format!("0x{KEY}")] {
            let signer = KeySource::Literal(key).read().unwrap().signer().unwrap();
            assert_eq!(
                signer.address(),
                address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
            );
        }
    }

    #[test]
    fn literal_key_is_not_validated_when_read() {
        let raw = KeySource::Literal("0x403d...23d5".to_owned()).read().unwrap();
        assert!(matches!(raw.signer(), Err(KeyError::Signer(_))));
    }

    #[test]
    fn file_key_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  {KEY}  ").unwrap();

        let signer = KeySource::File(file.path().to_owned())
            .read()
            .unwrap()
            .signer()
            .unwrap();
        assert_eq!(
            signer.address(),
            address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[test]
    fn file_key_must_be_hex() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not a key").unwrap();

        let raw = KeySource::File(file.path().to_owned()).read().unwrap();
        assert!(matches!(raw.signer(), Err(KeyError::Hex(_))));
    }

    #[test]
    fn file_key_must_be_a_valid_scalar() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // Hex, but too short for a secp256k1 key.
        write!(file, "deadbeef").unwrap();

        let raw = KeySource::File(file.path().to_owned()).read().unwrap();
        assert!(matches!(raw.signer(), Err(KeyError::Signer(_))));
    }

    #[test]
    fn missing_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".secret");

        let err = KeySource::File(path.clone()).read().unwrap_err();
        assert!(matches!(err, Error::File { path: p, .. } if p == path));
    }

    #[test]
    fn debug_output_hides_key() {
        let source = KeySource::Literal(KEY.to_owned());
        assert!(!format!("{source:?}").contains(KEY));
        let raw = source.read().unwrap();
        assert!(!format!("{raw:?}").contains(KEY));
    }
}
