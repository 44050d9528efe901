use std::path::PathBuf;

/// Flashback (Genesis) extraction tool
///
/// Identifies the ROM by its SHA-1 in the ROM catalog, then extracts
/// its assets and passes them to the decoders
#[derive(Debug, Clone, clap::Parser)]
pub struct CLI {
    /// Path to the ROM image
    pub rom: PathBuf,
    /// Also write the raw bytes of every asset to a file named after the asset
    #[clap(long)]
    pub dump: bool,
    /// Directory for dumped and decoded files
    ///
    /// It is created if it doesn't exist. If not specified, the current
    /// directory is used
    #[clap(long = "output_dir", visible_alias = "output-dir")]
    pub output_dir: Option<PathBuf>,
    /// Path to the ROM catalog
    #[clap(long, default_value = "roms.xml")]
    pub catalog: PathBuf,
    /// Path to the decoder library
    #[clap(long, default_value = "./fb_decode.so")]
    pub decoder: PathBuf,
    /// Extract (and dump) the assets without decoding them
    #[clap(long)]
    pub no_decode: bool,
    /// Print debug logs
    #[clap(short, long)]
    pub verbose: bool,
}

pub struct Options {
    pub rom: PathBuf,
    pub catalog: PathBuf,
    /// `None` if decoding is disabled
    pub decoder: Option<PathBuf>,
    pub dump: bool,
    /// `None` for the current directory. Only created once the ROM is matched
    pub output_dir: Option<PathBuf>,
}

impl From<CLI> for Options {
    fn from(value: CLI) -> Self {
        let decoder = if value.no_decode {
            None
        } else {
            Some(value.decoder)
        };
        Options {
            rom: value.rom,
            catalog: value.catalog,
            decoder,
            dump: value.dump,
            output_dir: value.output_dir,
        }
    }
}
