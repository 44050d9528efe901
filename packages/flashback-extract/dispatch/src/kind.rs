use derive_more::Display;

/// Base name of the first level, the only level decoded with its `.SGD`
pub const FIRST_LEVEL: &str = "LEVEL1";

/// How an asset is decoded, derived from its name only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AssetKind<'a> {
    /// `<base>.LEV` of the first level, needs `.MBK`, `.PAL` and `.SGD`
    #[display("LEV+SGD")]
    LevWithSgd { base: &'a str },
    /// `<base>.LEV`, needs `.MBK` and `.PAL`
    #[display("LEV")]
    LevPlain { base: &'a str },
    /// `*.RP`, needs `GLOBAL.SPC` and `SPC.MBK`
    #[display("RP")]
    Rp,
    /// `GLOBAL.SPC`, needs `SPC.MBK`
    #[display("SPC")]
    GlobalSpc,
    /// `GLOBAL.SPR`, needs `GLOBAL.TAB`
    #[display("SPR")]
    GlobalSpr,
    #[display("generic")]
    Generic,
}

impl<'a> AssetKind<'a> {
    pub fn classify(name: &'a str) -> Self {
        if let Some(base) = name.strip_suffix(".LEV") {
            if base == FIRST_LEVEL {
                return Self::LevWithSgd { base };
            }
            return Self::LevPlain { base };
        }
        if name.ends_with(".RP") {
            return Self::Rp;
        }
        match name {
            "GLOBAL.SPC" => Self::GlobalSpc,
            "GLOBAL.SPR" => Self::GlobalSpr,
            _ => Self::Generic,
        }
    }
}
