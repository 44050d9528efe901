use crate::RomChecksum;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read the ROM catalog")]
    ReadCatalog,
    #[error("the ROM catalog is malformed")]
    CatalogParse,
    #[error("no known ROM matches checksum {0}")]
    NoMatchingRom(RomChecksum),
}
