use unicode_normalization::UnicodeNormalization;

/// Unicode normalization form requested through the `-N` CLI flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationForm {
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

impl NormalizationForm {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "NFC" => Some(NormalizationForm::Nfc),
            "NFD" => Some(NormalizationForm::Nfd),
            "NFKC" => Some(NormalizationForm::Nfkc),
            "NFKD" => Some(NormalizationForm::Nfkd),
            _ => None,
        }
    }
}

pub fn normalize(text: &str, form: NormalizationForm) -> String {
    match form {
        NormalizationForm::Nfc => text.nfc().collect(),
        NormalizationForm::Nfd => text.nfd().collect(),
        NormalizationForm::Nfkc => text.nfkc().collect(),
        NormalizationForm::Nfkd => text.nfkd().collect(),
    }
}
