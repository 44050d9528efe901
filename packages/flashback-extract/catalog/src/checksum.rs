use derive_more::Display;
use sha1::{Digest, Sha1};

/// SHA-1 of a whole ROM image, as lowercase hex
///
/// The catalog is keyed by this checksum, so the algorithm cannot
/// change without regenerating the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct RomChecksum(String);

impl RomChecksum {
    /// Compute the checksum of the ROM bytes
    pub fn of(rom: &[u8]) -> Self {
        Self(format!("{:x}", Sha1::digest(rom)))
    }

    /// Parse a checksum from the catalog. Case is ignored.
    ///
    /// Returns `None` if the input is not 40 hex digits
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.len() != 40 || !input.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(input.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
