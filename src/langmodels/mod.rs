//! Language models for the statistical probers
//!
//! ```text
//!   data/<language>.txt ──train()──▶ LanguageModel ──bind──▶ CharsetModel
//!   (embedded corpora)               char order +           byte → ByteClass
//!                                    bigram classes         table per charset
//! ```
//!
//! Both registries are built once per process on first use and are never
//! mutated afterwards, so probers hold plain `&'static` references.

mod charsets;
mod cjk;
mod training;

pub use charsets::SingleByteCharset;
pub use cjk::CjkLanguage;
pub use training::{SequenceClass, SequenceCounts, SAMPLE_SIZE};

use rustc_hash::FxHashMap;
use std::sync::OnceLock;
use tracing::debug;

use SingleByteCharset::*;

/// Families of single-byte charsets; each becomes one group prober
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Cyrillic,
    Greek,
    Hebrew,
    Thai,
    Arabic,
    Western,
    CentralEuropean,
}

impl Family {
    pub const ALL: [Family; 7] = [
        Family::Cyrillic,
        Family::Greek,
        Family::Hebrew,
        Family::Thai,
        Family::Arabic,
        Family::Western,
        Family::CentralEuropean,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Family::Cyrillic => "cyrillic",
            Family::Greek => "greek",
            Family::Hebrew => "hebrew",
            Family::Thai => "thai",
            Family::Arabic => "arabic",
            Family::Western => "western",
            Family::CentralEuropean => "central-european",
        }
    }
}

struct LanguageSpec {
    name: &'static str,
    family: Family,
    corpus: &'static str,
    /// Registration order doubles as the tie-break order inside a group
    charsets: &'static [SingleByteCharset],
}

const LANGUAGES: &[LanguageSpec] = &[
    LanguageSpec {
        name: "Russian",
        family: Family::Cyrillic,
        corpus: include_str!("../../data/russian.txt"),
        charsets: &[Koi8R, Windows1251, Iso8859_5, Ibm866, MacCyrillic],
    },
    LanguageSpec {
        name: "Bulgarian",
        family: Family::Cyrillic,
        corpus: include_str!("../../data/bulgarian.txt"),
        charsets: &[Windows1251, Iso8859_5],
    },
    LanguageSpec {
        name: "Greek",
        family: Family::Greek,
        corpus: include_str!("../../data/greek.txt"),
        charsets: &[Iso8859_7, Windows1253],
    },
    LanguageSpec {
        name: "Hebrew",
        family: Family::Hebrew,
        corpus: include_str!("../../data/hebrew.txt"),
        charsets: &[Windows1255, Iso8859_8],
    },
    LanguageSpec {
        name: "Thai",
        family: Family::Thai,
        corpus: include_str!("../../data/thai.txt"),
        charsets: &[Tis620],
    },
    LanguageSpec {
        name: "Arabic",
        family: Family::Arabic,
        corpus: include_str!("../../data/arabic.txt"),
        charsets: &[Windows1256, Iso8859_6],
    },
    LanguageSpec {
        name: "French",
        family: Family::Western,
        corpus: include_str!("../../data/french.txt"),
        charsets: &[Iso8859_1, Windows1252],
    },
    LanguageSpec {
        name: "German",
        family: Family::Western,
        corpus: include_str!("../../data/german.txt"),
        charsets: &[Iso8859_1, Windows1252],
    },
    LanguageSpec {
        name: "Spanish",
        family: Family::Western,
        corpus: include_str!("../../data/spanish.txt"),
        charsets: &[Iso8859_1, Windows1252],
    },
    LanguageSpec {
        name: "Turkish",
        family: Family::Western,
        corpus: include_str!("../../data/turkish.txt"),
        charsets: &[Iso8859_9],
    },
    LanguageSpec {
        name: "Czech",
        family: Family::CentralEuropean,
        corpus: include_str!("../../data/czech.txt"),
        charsets: &[Iso8859_2, Windows1250],
    },
    LanguageSpec {
        name: "Polish",
        family: Family::CentralEuropean,
        corpus: include_str!("../../data/polish.txt"),
        charsets: &[Iso8859_2, Windows1250],
    },
    LanguageSpec {
        name: "Hungarian",
        family: Family::CentralEuropean,
        corpus: include_str!("../../data/hungarian.txt"),
        charsets: &[Iso8859_2, Windows1250],
    },
];

/// Immutable per-language frequency table
pub struct LanguageModel {
    pub name: &'static str,
    pub family: Family,
    pub charsets: &'static [SingleByteCharset],
    alphabet: FxHashMap<char, u8>,
    classes: Vec<SequenceClass>,
    typical_ratio: f32,
}

impl LanguageModel {
    /// Frequency rank of an already case-folded character, if sampled
    pub fn order(&self, c: char) -> Option<u8> {
        self.alphabet.get(&c).copied()
    }

    pub fn class(&self, first: u8, second: u8) -> SequenceClass {
        self.classes[usize::from(first) * SAMPLE_SIZE + usize::from(second)]
    }

    /// Score ratio the model assigns to its own training text
    pub fn typical_ratio(&self) -> f32 {
        self.typical_ratio
    }
}

/// What one byte means to a single-byte prober
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    /// Letter in the language's sample, with its frequency order
    Letter(u8),
    /// Letter outside the sample
    RareLetter,
    /// Digits, punctuation, whitespace, symbols
    Other,
    /// Undefined in the charset
    Illegal,
}

/// A language model bound to one charset's byte table
pub struct CharsetModel {
    pub charset: SingleByteCharset,
    pub language: &'static LanguageModel,
    table: [ByteClass; 256],
}

impl CharsetModel {
    #[inline]
    pub fn classify(&self, byte: u8) -> ByteClass {
        self.table[usize::from(byte)]
    }

    fn bind(charset: SingleByteCharset, language: &'static LanguageModel) -> Self {
        let mut table = [ByteClass::Illegal; 256];
        for (byte, slot) in table.iter_mut().enumerate() {
            *slot = match charset.decode_byte(byte as u8) {
                None => ByteClass::Illegal,
                Some(c) => {
                    let c = training::fold(c);
                    if !training::is_letter(c) {
                        ByteClass::Other
                    } else {
                        language
                            .order(c)
                            .map_or(ByteClass::RareLetter, ByteClass::Letter)
                    }
                }
            };
        }
        Self {
            charset,
            language,
            table,
        }
    }
}

static MODELS: OnceLock<Vec<LanguageModel>> = OnceLock::new();
static BOUND: OnceLock<Vec<CharsetModel>> = OnceLock::new();

/// All language models, trained on first access
pub fn language_models() -> &'static [LanguageModel] {
    MODELS.get_or_init(|| {
        let models: Vec<LanguageModel> = LANGUAGES
            .iter()
            .map(|spec| {
                let trained = training::train(spec.corpus);
                LanguageModel {
                    name: spec.name,
                    family: spec.family,
                    charsets: spec.charsets,
                    alphabet: trained.alphabet,
                    classes: trained.classes,
                    typical_ratio: trained.typical_ratio,
                }
            })
            .collect();
        debug!("Trained {} language models", models.len());
        models
    })
}

/// Every (charset, language) pairing in registration order
pub fn charset_models() -> &'static [CharsetModel] {
    BOUND.get_or_init(|| {
        language_models()
            .iter()
            .flat_map(|language| {
                language
                    .charsets
                    .iter()
                    .map(move |&charset| CharsetModel::bind(charset, language))
            })
            .collect()
    })
}

/// Names of the single-byte languages, without training anything
pub fn language_names() -> Vec<&'static str> {
    LANGUAGES.iter().map(|spec| spec.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_built_once() {
        let first = language_models().as_ptr();
        let second = language_models().as_ptr();
        assert_eq!(first, second);
        assert_eq!(language_models().len(), LANGUAGES.len());
    }

    #[test]
    fn test_every_model_is_usable() {
        for model in language_models() {
            assert!(model.alphabet.len() >= 20, "{} alphabet too small", model.name);
            assert!(model.alphabet.len() <= SAMPLE_SIZE);
            assert!(
                model.typical_ratio() > 0.8,
                "{} typical ratio {}",
                model.name,
                model.typical_ratio()
            );
        }
    }

    #[test]
    fn test_bound_tables() {
        let koi8 = charset_models()
            .iter()
            .find(|m| m.charset == Koi8R && m.language.name == "Russian")
            .unwrap();
        // 0xCF is 'о' in KOI8-R, the most common Russian letter
        assert_eq!(koi8.classify(0xCF), ByteClass::Letter(0));
        assert_eq!(koi8.classify(b' '), ByteClass::Other);
        assert_eq!(koi8.classify(b'q'), ByteClass::RareLetter);

        let latin1 = charset_models()
            .iter()
            .find(|m| m.charset == Iso8859_1)
            .unwrap();
        assert_eq!(latin1.classify(0x85), ByteClass::Illegal);
    }

    #[test]
    fn test_registration_order() {
        let names: Vec<&str> = charset_models()
            .iter()
            .filter(|m| m.language.name == "Russian")
            .map(|m| m.charset.name())
            .collect();
        assert_eq!(
            names,
            ["KOI8-R", "WINDOWS-1251", "ISO-8859-5", "IBM866", "MAC-CYRILLIC"]
        );
    }
}
