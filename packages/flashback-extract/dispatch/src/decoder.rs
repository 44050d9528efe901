use std::path::Path;

use error_stack::Report;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to load the decoder library")]
    LoadLibrary,
    #[error("the decoder library has no entry point `{0}`")]
    MissingEntryPoint(&'static str),
    #[error("the decoder cannot accept the asset")]
    InvalidArgument,
    #[error("failed to enter the output directory")]
    OutputDir,
    #[error("the decoder failed")]
    Failed,
}

/// The asset being decoded and where decoded files go
#[derive(Debug, Clone, Copy)]
pub struct DecodeTarget<'a> {
    pub name: &'a str,
    pub output_dir: &'a Path,
}

/// Format-specific asset decoders
///
/// Each method gets the raw bytes of the asset and of the sibling assets
/// its format refers to. The decoder decides the names of the files it
/// writes, which must be inside the target's output directory
pub trait Decoder {
    /// Decode a level. `sgd` is only given for the first level
    fn decode_lev(
        &mut self,
        target: &DecodeTarget<'_>,
        lev: &[u8],
        mbk: &[u8],
        pal: &[u8],
        sgd: Option<&[u8]>,
    ) -> Result<(), Report<DecodeError>>;

    /// Decode an animation with the global sprites
    fn decode_rp(
        &mut self,
        target: &DecodeTarget<'_>,
        rp: &[u8],
        spc: &[u8],
        mbk: &[u8],
    ) -> Result<(), Report<DecodeError>>;

    /// Decode `GLOBAL.SPC`
    fn decode_spc(
        &mut self,
        target: &DecodeTarget<'_>,
        spc: &[u8],
        mbk: &[u8],
    ) -> Result<(), Report<DecodeError>>;

    /// Decode `GLOBAL.SPR`
    fn decode_spr(
        &mut self,
        target: &DecodeTarget<'_>,
        spr: &[u8],
        tab: &[u8],
    ) -> Result<(), Report<DecodeError>>;

    /// Decode any other asset
    fn decode(&mut self, target: &DecodeTarget<'_>, data: &[u8])
        -> Result<(), Report<DecodeError>>;
}

/// Decoder that does nothing, for extracting without decoding
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDecoder;

impl Decoder for NullDecoder {
    fn decode_lev(
        &mut self,
        target: &DecodeTarget<'_>,
        _lev: &[u8],
        _mbk: &[u8],
        _pal: &[u8],
        _sgd: Option<&[u8]>,
    ) -> Result<(), Report<DecodeError>> {
        tracing::trace!("skip decoding {}", target.name);
        Ok(())
    }

    fn decode_rp(
        &mut self,
        target: &DecodeTarget<'_>,
        _rp: &[u8],
        _spc: &[u8],
        _mbk: &[u8],
    ) -> Result<(), Report<DecodeError>> {
        tracing::trace!("skip decoding {}", target.name);
        Ok(())
    }

    fn decode_spc(
        &mut self,
        target: &DecodeTarget<'_>,
        _spc: &[u8],
        _mbk: &[u8],
    ) -> Result<(), Report<DecodeError>> {
        tracing::trace!("skip decoding {}", target.name);
        Ok(())
    }

    fn decode_spr(
        &mut self,
        target: &DecodeTarget<'_>,
        _spr: &[u8],
        _tab: &[u8],
    ) -> Result<(), Report<DecodeError>> {
        tracing::trace!("skip decoding {}", target.name);
        Ok(())
    }

    fn decode(
        &mut self,
        target: &DecodeTarget<'_>,
        _data: &[u8],
    ) -> Result<(), Report<DecodeError>> {
        tracing::trace!("skip decoding {}", target.name);
        Ok(())
    }
}
