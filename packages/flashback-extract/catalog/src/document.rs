//! Serde model of `roms.xml`
//!
//! ```xml
//! <roms>
//!   <rom>
//!     <hash sha1="..."/>
//!     <files>
//!       <file name="LEVEL1.LEV" offset="1A2B0" size="4096"/>
//!     </files>
//!   </rom>
//! </roms>
//! ```

use error_stack::Report;
use serde::Deserialize;

use crate::{AssetDescriptor, AssetTable, Error, RomCatalogEntry, RomChecksum};

#[derive(Debug, Deserialize)]
pub struct CatalogDocument {
    #[serde(rename = "rom", default)]
    pub roms: Vec<RomNode>,
}

/// A `<rom>` element. Its files are only validated when it is matched
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RomNode {
    hash: HashNode,
    #[serde(default)]
    files: FilesNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct HashNode {
    #[serde(rename = "@sha1")]
    sha1: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct FilesNode {
    #[serde(rename = "file", default)]
    files: Vec<FileNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct FileNode {
    #[serde(rename = "@name")]
    name: String,
    /// hex, `0x` prefix optional
    #[serde(rename = "@offset")]
    offset: String,
    /// decimal
    #[serde(rename = "@size")]
    size: String,
}

impl CatalogDocument {
    pub fn from_xml(text: &str) -> Result<Self, Report<Error>> {
        quick_xml::de::from_str(text)
            .map_err(|e| Report::new(Error::CatalogParse).attach_printable(e.to_string()))
    }
}

impl RomNode {
    /// Checksum of the release, `None` if the `sha1` attribute is not a SHA-1
    pub fn checksum(&self) -> Option<RomChecksum> {
        RomChecksum::parse(&self.hash.sha1)
    }

    /// Build the entry, validating every `<file>`
    pub fn into_entry(self, checksum: RomChecksum) -> Result<RomCatalogEntry, Report<Error>> {
        let mut assets = AssetTable::new();
        for file in self.files.files {
            assets.insert(file.into_descriptor()?)?;
        }
        Ok(RomCatalogEntry { checksum, assets })
    }
}

impl FileNode {
    fn into_descriptor(self) -> Result<AssetDescriptor, Report<Error>> {
        let Some(offset) = parse_hex(&self.offset) else {
            return Err(Report::new(Error::CatalogParse).attach_printable(format!(
                "invalid offset for {}: {:?}",
                self.name, self.offset
            )));
        };
        let Ok(size) = self.size.trim().parse::<u64>() else {
            return Err(Report::new(Error::CatalogParse).attach_printable(format!(
                "invalid size for {}: {:?}",
                self.name, self.size
            )));
        };
        Ok(AssetDescriptor::new(self.name, offset, size))
    }
}

fn parse_hex(input: &str) -> Option<u64> {
    let input = input.trim();
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}
