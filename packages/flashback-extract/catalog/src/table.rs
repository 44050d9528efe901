use std::collections::HashMap;
use std::ops::Range;

use error_stack::Report;

use crate::Error;

/// One named byte range in the ROM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    /// Name of the asset, conventionally `BASENAME.EXT`.
    ///
    /// This is also the file name used when dumping the asset
    pub name: String,
    /// Byte offset of the asset in the ROM
    pub offset: u64,
    /// Size of the asset in bytes
    pub size: u64,
}

impl AssetDescriptor {
    pub fn new(name: impl Into<String>, offset: u64, size: u64) -> Self {
        Self {
            name: name.into(),
            offset,
            size,
        }
    }

    /// Get the byte range of the asset inside a ROM of `rom_len` bytes.
    ///
    /// Returns `None` if the asset does not fit in the ROM
    pub fn range_in(&self, rom_len: usize) -> Option<Range<usize>> {
        let end = self.offset.checked_add(self.size)?;
        if end > rom_len as u64 {
            return None;
        }
        Some(self.offset as usize..end as usize)
    }
}

/// Assets of one ROM, looked up by name and iterated in catalog order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetTable {
    assets: Vec<AssetDescriptor>,
    by_name: HashMap<String, usize>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from descriptors, keeping their order
    pub fn try_from_assets(
        assets: impl IntoIterator<Item = AssetDescriptor>,
    ) -> Result<Self, Report<Error>> {
        let mut table = Self::new();
        for asset in assets {
            table.insert(asset)?;
        }
        Ok(table)
    }

    /// Append an asset to the table.
    ///
    /// The name must be a plain file name and must not already be in the table
    pub fn insert(&mut self, asset: AssetDescriptor) -> Result<(), Report<Error>> {
        if !is_plain_file_name(&asset.name) {
            return Err(Report::new(Error::CatalogParse)
                .attach_printable(format!("invalid asset name: {:?}", asset.name)));
        }
        if self.by_name.contains_key(&asset.name) {
            return Err(Report::new(Error::CatalogParse)
                .attach_printable(format!("duplicate asset name: {}", asset.name)));
        }
        self.by_name.insert(asset.name.clone(), self.assets.len());
        self.assets.push(asset);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&AssetDescriptor> {
        self.by_name.get(name).map(|i| &self.assets[*i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssetDescriptor> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl<'a> IntoIterator for &'a AssetTable {
    type Item = &'a AssetDescriptor;
    type IntoIter = std::slice::Iter<'a, AssetDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// assets are dumped under their name, so it cannot escape the output directory
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}
