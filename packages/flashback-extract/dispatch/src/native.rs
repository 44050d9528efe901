use std::ffi::{c_char, CString};
use std::path::{Path, PathBuf};

use error_stack::{Report, ResultExt};
use libloading::{Library, Symbol};

use crate::{DecodeError, DecodeTarget, Decoder};

// entry points of fb_decode.so
type DecodeLevFn =
    unsafe extern "C" fn(*const c_char, *const u8, *const u8, *const u8, *const u8);
type DecodeRpFn = unsafe extern "C" fn(*const c_char, *const u8, *const u8, *const u8);
type DecodeSpcFn = unsafe extern "C" fn(*const c_char, *const u8, *const u8);
type DecodeSprFn = unsafe extern "C" fn(*const c_char, *const u8, *const u8);
type DecodeFn = unsafe extern "C" fn(*const c_char, *const u8, u32);

const DECODE_LEV: &str = "decodeLEV";
const DECODE_RP: &str = "decodeRP";
const DECODE_SPC: &str = "decodeSPC";
const DECODE_SPR: &str = "decodeSPR";
const DECODE: &str = "decode";

/// Decoder backed by the native decoder library (`fb_decode.so`)
///
/// The library writes its output files relative to the working directory,
/// so every call temporarily switches to the target's output directory
pub struct NativeDecoder {
    entry_points: EntryPoints,
    // keeps the entry points mapped
    _library: Option<Library>,
}

#[derive(Clone, Copy)]
struct EntryPoints {
    lev: DecodeLevFn,
    rp: DecodeRpFn,
    spc: DecodeSpcFn,
    spr: DecodeSprFn,
    generic: DecodeFn,
}

impl NativeDecoder {
    /// Load the library and resolve all entry points
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Report<DecodeError>> {
        let path = path.as_ref();
        // SAFETY: loading runs the library's initializers. The decoder
        // library has none with preconditions
        let library = unsafe { Library::new(path) }
            .change_context(DecodeError::LoadLibrary)
            .attach_printable_lazy(|| format!("library: {}", path.display()))?;
        let entry_points = EntryPoints::resolve(&library)
            .attach_printable_lazy(|| format!("library: {}", path.display()))?;
        tracing::debug!("loaded decoder library {}", path.display());
        Ok(Self {
            entry_points,
            _library: Some(library),
        })
    }

    #[cfg(test)]
    fn with_entry_points(entry_points: EntryPoints) -> Self {
        Self {
            entry_points,
            _library: None,
        }
    }
}

impl EntryPoints {
    fn resolve(library: &Library) -> Result<Self, Report<DecodeError>> {
        Ok(Self {
            lev: symbol(library, DECODE_LEV)?,
            rp: symbol(library, DECODE_RP)?,
            spc: symbol(library, DECODE_SPC)?,
            spr: symbol(library, DECODE_SPR)?,
            generic: symbol(library, DECODE)?,
        })
    }
}

/// Copy an entry point out of the library. The pointer is only valid while
/// the library stays loaded
fn symbol<T: Copy>(library: &Library, name: &'static str) -> Result<T, Report<DecodeError>> {
    // SAFETY: T is one of the fn types above, matching the C declarations
    let symbol: Symbol<'_, T> = unsafe { library.get::<T>(name.as_bytes()) }
        .change_context(DecodeError::MissingEntryPoint(name))?;
    Ok(*symbol)
}

fn c_name(name: &str) -> Result<CString, Report<DecodeError>> {
    CString::new(name)
        .change_context(DecodeError::InvalidArgument)
        .attach_printable_lazy(|| format!("asset name contains NUL: {name:?}"))
}

impl Decoder for NativeDecoder {
    fn decode_lev(
        &mut self,
        target: &DecodeTarget<'_>,
        lev: &[u8],
        mbk: &[u8],
        pal: &[u8],
        sgd: Option<&[u8]>,
    ) -> Result<(), Report<DecodeError>> {
        let decode_lev = self.entry_points.lev;
        let name = c_name(target.name)?;
        let sgd = sgd.map_or(std::ptr::null(), <[u8]>::as_ptr);
        let _dir = WorkingDir::enter(target.output_dir)?;
        // SAFETY: the name and all buffers outlive the call and are only read
        unsafe { decode_lev(name.as_ptr(), lev.as_ptr(), mbk.as_ptr(), pal.as_ptr(), sgd) };
        Ok(())
    }

    fn decode_rp(
        &mut self,
        target: &DecodeTarget<'_>,
        rp: &[u8],
        spc: &[u8],
        mbk: &[u8],
    ) -> Result<(), Report<DecodeError>> {
        let decode_rp = self.entry_points.rp;
        let name = c_name(target.name)?;
        let _dir = WorkingDir::enter(target.output_dir)?;
        // SAFETY: see decode_lev
        unsafe { decode_rp(name.as_ptr(), rp.as_ptr(), spc.as_ptr(), mbk.as_ptr()) };
        Ok(())
    }

    fn decode_spc(
        &mut self,
        target: &DecodeTarget<'_>,
        spc: &[u8],
        mbk: &[u8],
    ) -> Result<(), Report<DecodeError>> {
        let decode_spc = self.entry_points.spc;
        let name = c_name(target.name)?;
        let _dir = WorkingDir::enter(target.output_dir)?;
        // SAFETY: see decode_lev
        unsafe { decode_spc(name.as_ptr(), spc.as_ptr(), mbk.as_ptr()) };
        Ok(())
    }

    fn decode_spr(
        &mut self,
        target: &DecodeTarget<'_>,
        spr: &[u8],
        tab: &[u8],
    ) -> Result<(), Report<DecodeError>> {
        let decode_spr = self.entry_points.spr;
        let name = c_name(target.name)?;
        let _dir = WorkingDir::enter(target.output_dir)?;
        // SAFETY: see decode_lev
        unsafe { decode_spr(name.as_ptr(), spr.as_ptr(), tab.as_ptr()) };
        Ok(())
    }

    fn decode(
        &mut self,
        target: &DecodeTarget<'_>,
        data: &[u8],
    ) -> Result<(), Report<DecodeError>> {
        let decode = self.entry_points.generic;
        let name = c_name(target.name)?;
        let size = u32::try_from(data.len())
            .change_context(DecodeError::InvalidArgument)
            .attach_printable_lazy(|| format!("asset too large: {} bytes", data.len()))?;
        let _dir = WorkingDir::enter(target.output_dir)?;
        // SAFETY: see decode_lev
        unsafe { decode(name.as_ptr(), data.as_ptr(), size) };
        Ok(())
    }
}

/// Switches the process working directory, and switches back when dropped
struct WorkingDir {
    previous: PathBuf,
}

impl WorkingDir {
    fn enter(dir: &Path) -> Result<Self, Report<DecodeError>> {
        let previous = std::env::current_dir().change_context(DecodeError::OutputDir)?;
        std::env::set_current_dir(dir)
            .change_context(DecodeError::OutputDir)
            .attach_printable_lazy(|| format!("output directory: {}", dir.display()))?;
        Ok(Self { previous })
    }
}

impl Drop for WorkingDir {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            tracing::warn!(
                "failed to restore working directory {}: {e}",
                self.previous.display()
            );
        }
    }
}
