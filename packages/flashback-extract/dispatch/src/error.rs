#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("asset {name} (offset {offset:#x}, size {size}) is outside of the ROM ({rom_len} bytes)")]
    AssetOutOfBounds {
        name: String,
        offset: u64,
        size: u64,
        rom_len: usize,
    },
    #[error("{sibling} is required to decode {asset} but is not in the catalog")]
    MissingSiblingAsset { asset: String, sibling: String },
    #[error("failed to dump asset {0}")]
    DumpFailure(String),
    #[error("failed to decode asset {0}")]
    DecoderFailure(String),
}
