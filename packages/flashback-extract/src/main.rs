use std::process::ExitCode;

use clap::Parser;
use error_stack::{Report, ResultExt};

use flashback_extract_catalog as catalog;
use flashback_extract_common as common;
use flashback_extract_dispatch::{
    self as dispatch, Decoder, ExtractOptions, NativeDecoder, NullDecoder,
};

mod cli;
use cli::{Options, CLI};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read the ROM")]
    ReadRom,
    #[error("failed to prepare the output directory")]
    OutputDir,
    #[error("failed to find the ROM in the catalog")]
    Catalog,
    #[error("failed to load the decoder")]
    Decoder,
    #[error("failed to extract the assets")]
    Extract,
}

fn main() -> ExitCode {
    let cli = CLI::parse();
    common::init_tracing(cli.verbose);
    common::run(|| {
        let options = Options::from(cli);
        run(&options)
    })
}

fn run(options: &Options) -> Result<(), Report<Error>> {
    let rom_path = options.rom.display();
    let rom = std::fs::read(&options.rom)
        .change_context(Error::ReadRom)
        .attach_printable_lazy(|| format!("rom: {rom_path}"))?;

    let table = catalog::resolve(&options.catalog, &rom)
        .change_context(Error::Catalog)
        .attach_printable_lazy(|| format!("rom: {rom_path}"))?;
    println!("Found matching ROM");
    println!("Found {} files", table.len());

    let mut decoder: Box<dyn Decoder> = match &options.decoder {
        Some(path) => Box::new(NativeDecoder::load(path).change_context(Error::Decoder)?),
        None => {
            println!("-- decoding is disabled");
            Box::new(NullDecoder)
        }
    };

    let output_dir = common::resolve_output_dir(options.output_dir.as_deref())
        .change_context(Error::OutputDir)
        .attach_printable_lazy(|| match &options.output_dir {
            Some(dir) => format!("output directory: {}", dir.display()),
            None => "output directory: <current directory>".to_string(),
        })?;
    println!("-- extracting to {}", output_dir.display());
    let extract = ExtractOptions {
        dump: options.dump,
        output_dir,
    };
    dispatch::extract(&rom, &table, decoder.as_mut(), &extract)
        .change_context(Error::Extract)?;

    println!("done!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn write_fixture(dir: &Path, rom: &[u8], checksum: &str) {
        std::fs::write(dir.join("rom.bin"), rom).unwrap();
        let catalog = format!(
            r#"<roms>
  <rom>
    <hash sha1="{checksum}"/>
    <files>
      <file name="LEVEL1.LEV" offset="10" size="4"/>
      <file name="LEVEL1.MBK" offset="20" size="2"/>
      <file name="LEVEL1.PAL" offset="30" size="2"/>
      <file name="LEVEL1.SGD" offset="40" size="1"/>
    </files>
  </rom>
</roms>"#
        );
        std::fs::write(dir.join("roms.xml"), catalog).unwrap();
    }

    fn parse_options(dir: &Path, extra: &[&str]) -> Options {
        let rom = dir.join("rom.bin");
        let catalog = dir.join("roms.xml");
        let output = dir.join("out");
        let mut args = vec![
            "fb-extract".to_string(),
            "--catalog".to_string(),
            catalog.display().to_string(),
            "--output_dir".to_string(),
            output.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        args.push(rom.display().to_string());
        let cli = CLI::try_parse_from(args).unwrap();
        Options::from(cli)
    }

    #[test]
    fn cli_defaults() {
        let cli = CLI::try_parse_from(["fb-extract", "flashback.bin"]).unwrap();
        assert_eq!(cli.rom, Path::new("flashback.bin"));
        assert_eq!(cli.catalog, Path::new("roms.xml"));
        assert_eq!(cli.decoder, Path::new("./fb_decode.so"));
        assert!(cli.output_dir.is_none());
        assert!(!cli.dump);
        assert!(!cli.no_decode);
    }

    #[test]
    fn cli_requires_rom() {
        assert!(CLI::try_parse_from(["fb-extract", "--dump"]).is_err());
    }

    #[test]
    fn cli_output_dir_spellings() {
        for flag in ["--output_dir", "--output-dir"] {
            let cli = CLI::try_parse_from(["fb-extract", flag, "out", "rom.bin"]).unwrap();
            assert_eq!(cli.output_dir.as_deref(), Some(Path::new("out")));
        }
    }

    #[test]
    fn no_decode_disables_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let options = parse_options(dir.path(), &["--no-decode"]);
        assert!(options.decoder.is_none());
        assert!(!options.dump);
        assert_eq!(options.output_dir, Some(dir.path().join("out")));
        // nothing is created before the ROM is matched
        assert!(!dir.path().join("out").exists());
        let options = parse_options(dir.path(), &[]);
        assert_eq!(options.decoder.as_deref(), Some(Path::new("./fb_decode.so")));
    }

    #[test]
    fn dump_matching_rom() {
        let dir = tempfile::tempdir().unwrap();
        let rom: Vec<u8> = (0..=0xff).collect();
        let checksum = catalog::RomChecksum::of(&rom);
        write_fixture(dir.path(), &rom, checksum.as_str());

        let options = parse_options(dir.path(), &["--dump", "--no-decode"]);
        run(&options).unwrap();
        let out = dir.path().join("out");
        assert_eq!(std::fs::read(out.join("LEVEL1.LEV")).unwrap(), [0x10, 0x11, 0x12, 0x13]);
        assert_eq!(std::fs::read(out.join("LEVEL1.SGD")).unwrap(), [0x40]);

        // running again gives the same files
        run(&options).unwrap();
        assert_eq!(std::fs::read(out.join("LEVEL1.MBK")).unwrap(), [0x20, 0x21]);
    }

    #[test]
    fn unknown_rom_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let rom: Vec<u8> = (0..=0xff).collect();
        let other = catalog::RomChecksum::of(b"another release");
        write_fixture(dir.path(), &rom, other.as_str());

        let options = parse_options(dir.path(), &["--dump", "--no-decode"]);
        let report = run(&options).unwrap_err();
        assert!(matches!(report.current_context(), Error::Catalog));
        let inner = report.downcast_ref::<catalog::Error>().unwrap();
        assert!(matches!(inner, catalog::Error::NoMatchingRom(_)));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn missing_decoder_library() {
        let dir = tempfile::tempdir().unwrap();
        let rom: Vec<u8> = (0..=0xff).collect();
        let checksum = catalog::RomChecksum::of(&rom);
        write_fixture(dir.path(), &rom, checksum.as_str());
        let library = dir.path().join("fb_decode.so");

        let options = parse_options(dir.path(), &["--decoder", &library.display().to_string()]);
        let report = run(&options).unwrap_err();
        assert!(matches!(report.current_context(), Error::Decoder));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn missing_rom_file() {
        let dir = tempfile::tempdir().unwrap();
        let options = parse_options(dir.path(), &["--no-decode"]);
        let report = run(&options).unwrap_err();
        assert!(matches!(report.current_context(), Error::ReadRom));
        assert!(!dir.path().join("out").exists());
    }
}
