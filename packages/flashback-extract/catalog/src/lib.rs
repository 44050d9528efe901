use std::path::Path;

use error_stack::{Report, ResultExt};

mod checksum;
pub use checksum::RomChecksum;
mod document;
use document::{CatalogDocument, RomNode};
mod error;
pub use error::Error;
mod table;
pub use table::{AssetDescriptor, AssetTable};

/// One known ROM release and its assets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomCatalogEntry {
    pub checksum: RomChecksum,
    pub assets: AssetTable,
}

/// The known ROM releases, in catalog document order
///
/// Only the structure of the document is checked when parsing. The files
/// of a release are validated when that release is matched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    roms: Vec<RomNode>,
}

impl Catalog {
    /// Read and parse the catalog document at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Report<Error>> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .change_context(Error::ReadCatalog)
            .attach_printable_lazy(|| format!("catalog: {}", path.display()))?;
        let catalog =
            Self::parse(&text).attach_printable_lazy(|| format!("catalog: {}", path.display()))?;
        tracing::debug!(
            "loaded {} ROM entries from {}",
            catalog.roms.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse a catalog document
    pub fn parse(text: &str) -> Result<Self, Report<Error>> {
        let roms = CatalogDocument::from_xml(text)?.roms;
        Ok(Self { roms })
    }

    /// Take the first entry with the checksum, or fail with
    /// [`Error::NoMatchingRom`]
    ///
    /// Entries whose `sha1` is not a valid SHA-1 never match
    pub fn into_matching(self, checksum: &RomChecksum) -> Result<RomCatalogEntry, Report<Error>> {
        for (i, rom) in self.roms.into_iter().enumerate() {
            match rom.checksum() {
                Some(c) if &c == checksum => {
                    return rom
                        .into_entry(c)
                        .attach_printable_lazy(|| format!("in <rom> #{i}"));
                }
                Some(_) => {}
                None => tracing::warn!("ignoring <rom> #{i} with an invalid sha1"),
            }
        }
        Err(Report::new(Error::NoMatchingRom(checksum.clone())))
    }
}

/// Look up the asset table of a ROM image in the catalog at `catalog_path`
///
/// The ROM is identified by its SHA-1. Extraction must not be attempted
/// without a match, since the offsets are only valid for one release
pub fn resolve(catalog_path: impl AsRef<Path>, rom: &[u8]) -> Result<AssetTable, Report<Error>> {
    let checksum = RomChecksum::of(rom);
    tracing::debug!("ROM checksum: {checksum}");
    let catalog = Catalog::load(catalog_path)?;
    let entry = catalog.into_matching(&checksum)?;
    Ok(entry.assets)
}
