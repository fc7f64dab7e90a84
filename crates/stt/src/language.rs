use serde::Serialize;
use strum::{EnumString, IntoStaticStr, VariantArray};

/// Language hints accepted by the ASR model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumString, IntoStaticStr, VariantArray)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    /// Mandarin Chinese
    Zh,
    /// Cantonese
    Yue,
    /// English
    En,
    /// Japanese
    Ja,
    /// German
    De,
    /// Korean
    Ko,
    /// Russian
    Ru,
    /// French
    Fr,
    /// Portuguese
    Pt,
    /// Arabic
    Ar,
    /// Italian
    It,
    /// Spanish
    Es,
    /// Hindi
    Hi,
    /// Indonesian
    Id,
    /// Thai
    Th,
    /// Turkish
    Tr,
    /// Ukrainian
    Uk,
    /// Vietnamese
    Vi,
}

impl Language {
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Every accepted code, in the order they are advertised to clients
    pub fn supported_codes() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|language| language.code()).collect()
    }
}
