use std::path::PathBuf;

use error_stack::{Report, ResultExt};

use flashback_extract_catalog::{AssetDescriptor, AssetTable};

use crate::{AssetKind, DecodeTarget, Decoder, Error};

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Write the raw bytes of every asset to `output_dir/<name>` before decoding
    pub dump: bool,
    /// Directory for dumped and decoded files
    pub output_dir: PathBuf,
}

/// Get the bytes of an asset, or fail if it is not inside the ROM
pub fn read_asset<'r>(rom: &'r [u8], asset: &AssetDescriptor) -> Result<&'r [u8], Report<Error>> {
    match asset.range_in(rom.len()) {
        Some(range) => Ok(&rom[range]),
        None => Err(Report::new(Error::AssetOutOfBounds {
            name: asset.name.clone(),
            offset: asset.offset,
            size: asset.size,
            rom_len: rom.len(),
        })),
    }
}

/// Extract every asset of the table from the ROM in catalog order,
/// dumping and decoding each one
///
/// The first failure stops the extraction. Files dumped before that
/// are left in place
pub fn extract<D: Decoder + ?Sized>(
    rom: &[u8],
    table: &AssetTable,
    decoder: &mut D,
    options: &ExtractOptions,
) -> Result<(), Report<Error>> {
    let extractor = Extractor {
        rom,
        table,
        options,
    };
    for asset in table {
        let data = read_asset(rom, asset)?;
        if options.dump {
            extractor.dump(asset, data)?;
        }
        extractor.decode(asset, data, decoder)?;
    }
    Ok(())
}

struct Extractor<'a> {
    rom: &'a [u8],
    table: &'a AssetTable,
    options: &'a ExtractOptions,
}

impl<'a> Extractor<'a> {
    fn dump(&self, asset: &AssetDescriptor, data: &[u8]) -> Result<(), Report<Error>> {
        let path = self.options.output_dir.join(&asset.name);
        tracing::debug!("dumping {} ({} bytes)", asset.name, data.len());
        std::fs::write(&path, data)
            .change_context_lazy(|| Error::DumpFailure(asset.name.clone()))
            .attach_printable_lazy(|| format!("path: {}", path.display()))
    }

    /// Bytes of an asset that `asset` needs to be decoded
    fn sibling(&self, asset: &str, sibling: &str) -> Result<&'a [u8], Report<Error>> {
        let Some(descriptor) = self.table.get(sibling) else {
            return Err(Report::new(Error::MissingSiblingAsset {
                asset: asset.to_string(),
                sibling: sibling.to_string(),
            }));
        };
        read_asset(self.rom, descriptor)
    }

    fn decode<D: Decoder + ?Sized>(
        &self,
        asset: &AssetDescriptor,
        data: &[u8],
        decoder: &mut D,
    ) -> Result<(), Report<Error>> {
        let name = asset.name.as_str();
        let target = DecodeTarget {
            name,
            output_dir: &self.options.output_dir,
        };
        let kind = AssetKind::classify(name);
        tracing::debug!("decoding {name} as {kind}");
        let result = match kind {
            AssetKind::LevWithSgd { base } => {
                let mbk = self.sibling(name, &format!("{base}.MBK"))?;
                let pal = self.sibling(name, &format!("{base}.PAL"))?;
                let sgd = self.sibling(name, &format!("{base}.SGD"))?;
                decoder.decode_lev(&target, data, mbk, pal, Some(sgd))
            }
            AssetKind::LevPlain { base } => {
                let mbk = self.sibling(name, &format!("{base}.MBK"))?;
                let pal = self.sibling(name, &format!("{base}.PAL"))?;
                decoder.decode_lev(&target, data, mbk, pal, None)
            }
            AssetKind::Rp => {
                let spc = self.sibling(name, "GLOBAL.SPC")?;
                let mbk = self.sibling(name, "SPC.MBK")?;
                decoder.decode_rp(&target, data, spc, mbk)
            }
            AssetKind::GlobalSpc => {
                let mbk = self.sibling(name, "SPC.MBK")?;
                decoder.decode_spc(&target, data, mbk)
            }
            AssetKind::GlobalSpr => {
                let tab = self.sibling(name, "GLOBAL.TAB")?;
                decoder.decode_spr(&target, data, tab)
            }
            AssetKind::Generic => decoder.decode(&target, data),
        };
        result.change_context_lazy(|| Error::DecoderFailure(name.to_string()))
    }
}
