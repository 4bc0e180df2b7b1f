//! Message digests rendered as lowercase hex.

use std::collections::BTreeMap;
use std::str::FromStr;

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

use crate::error::{Result, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [Self; 6] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    fn digest(self, data: &[u8]) -> String {
        match self {
            Self::Md5 => hex::encode(Md5::digest(data)),
            Self::Sha1 => hex::encode(Sha1::digest(data)),
            Self::Sha224 => hex::encode(Sha224::digest(data)),
            Self::Sha256 => hex::encode(Sha256::digest(data)),
            Self::Sha384 => hex::encode(Sha384::digest(data)),
            Self::Sha512 => hex::encode(Sha512::digest(data)),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "");
        Self::ALL
            .into_iter()
            .find(|algo| algo.name() == wanted)
            .ok_or_else(|| ToolError::format(format!("unsupported hash algorithm {s}")))
    }
}

pub fn hash_text(text: &str, algorithm: HashAlgorithm) -> String {
    algorithm.digest(text.as_bytes())
}

/// Every supported digest keyed by algorithm name.
pub fn hash_all(text: &str) -> BTreeMap<&'static str, String> {
    HashAlgorithm::ALL
        .into_iter()
        .map(|algo| (algo.name(), algo.digest(text.as_bytes())))
        .collect()
}
