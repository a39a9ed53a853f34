//! Legacy CJK multi-byte probers

use encoding_rs::Encoding;

use super::base::CharsetProber;
use super::coding::{CodingMachine, CodingScheme, Step};
use super::distribution::DistributionAnalyser;
use crate::langmodels::CjkLanguage;
use crate::models::ProbingState;

/// Characters needed before a prober speaks with full weight
const SURE_CHARS: f32 = 8.0;

/// Ceiling for encodings scored on structure alone
const STRUCTURE_ONLY_CONFIDENCE: f32 = 0.35;

/// Multi-byte characters per byte at which density stops mattering
const FULL_DENSITY: f32 = 0.1;

/// Density weight of a long stream carrying a single stray character
const SPARSE_WEIGHT: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultiByteCharset {
    ShiftJis,
    EucJp,
    Gb18030,
    EucKr,
    Big5,
    EucTw,
}

impl MultiByteCharset {
    /// Roster order; earlier entries win confidence ties
    pub const ALL: [MultiByteCharset; 6] = [
        MultiByteCharset::ShiftJis,
        MultiByteCharset::EucJp,
        MultiByteCharset::Gb18030,
        MultiByteCharset::EucKr,
        MultiByteCharset::Big5,
        MultiByteCharset::EucTw,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MultiByteCharset::ShiftJis => "SHIFT_JIS",
            MultiByteCharset::EucJp => "EUC-JP",
            MultiByteCharset::Gb18030 => "GB18030",
            MultiByteCharset::EucKr => "EUC-KR",
            MultiByteCharset::Big5 => "BIG5",
            MultiByteCharset::EucTw => "EUC-TW",
        }
    }

    pub fn language(self) -> &'static str {
        match self {
            MultiByteCharset::ShiftJis | MultiByteCharset::EucJp => "Japanese",
            MultiByteCharset::EucKr => "Korean",
            MultiByteCharset::Gb18030 | MultiByteCharset::Big5 | MultiByteCharset::EucTw => {
                "Chinese"
            }
        }
    }

    fn scheme(self) -> CodingScheme {
        match self {
            MultiByteCharset::ShiftJis => CodingScheme::ShiftJis,
            MultiByteCharset::EucJp => CodingScheme::EucJp,
            MultiByteCharset::Gb18030 => CodingScheme::Gb18030,
            MultiByteCharset::EucKr => CodingScheme::EucKr,
            MultiByteCharset::Big5 => CodingScheme::Big5,
            MultiByteCharset::EucTw => CodingScheme::EucTw,
        }
    }

    /// Decoder and frequency table, when the encoding has both
    fn distribution(self) -> Option<(&'static Encoding, CjkLanguage)> {
        match self {
            MultiByteCharset::ShiftJis => Some((encoding_rs::SHIFT_JIS, CjkLanguage::Japanese)),
            MultiByteCharset::EucJp => Some((encoding_rs::EUC_JP, CjkLanguage::Japanese)),
            MultiByteCharset::Gb18030 => {
                Some((encoding_rs::GB18030, CjkLanguage::ChineseSimplified))
            }
            MultiByteCharset::EucKr => Some((encoding_rs::EUC_KR, CjkLanguage::Korean)),
            MultiByteCharset::Big5 => Some((encoding_rs::BIG5, CjkLanguage::ChineseTraditional)),
            MultiByteCharset::EucTw => None,
        }
    }
}

pub struct MultiByteProber {
    charset: MultiByteCharset,
    machine: CodingMachine,
    analyser: Option<DistributionAnalyser>,
    state: ProbingState,
    chars: u32,
    bytes: u64,
}

impl MultiByteProber {
    pub fn new(charset: MultiByteCharset) -> Self {
        Self {
            charset,
            machine: CodingMachine::new(charset.scheme()),
            analyser: charset
                .distribution()
                .map(|(encoding, language)| DistributionAnalyser::new(encoding, language)),
            state: ProbingState::Detecting,
            chars: 0,
            bytes: 0,
        }
    }

    /// Grows from [`SPARSE_WEIGHT`] to 1.0 as multi-byte characters make up
    /// more of the stream
    fn density_weight(&self) -> f32 {
        if self.bytes == 0 {
            return 0.0;
        }
        let density = self.chars as f32 / self.bytes as f32;
        SPARSE_WEIGHT + (1.0 - SPARSE_WEIGHT) * (density / FULL_DENSITY).min(1.0)
    }
}

impl CharsetProber for MultiByteProber {
    fn charset(&self) -> Option<&'static str> {
        Some(self.charset.name())
    }

    fn language(&self) -> Option<&'static str> {
        Some(self.charset.language())
    }

    fn consume(&mut self, bytes: &[u8]) -> ProbingState {
        if self.state.is_eliminated() {
            return self.state;
        }
        for &byte in bytes {
            self.bytes += 1;
            match self.machine.next(byte) {
                Step::Single | Step::Pending => {}
                Step::Char(len) => {
                    self.chars += 1;
                    if let Some(analyser) = self.analyser.as_mut() {
                        analyser.feed(self.machine.last_char(len));
                    }
                }
                Step::Error => {
                    self.state = ProbingState::Eliminated;
                    break;
                }
            }
        }
        self.state
    }

    fn state(&self) -> ProbingState {
        self.state
    }

    fn confidence(&self) -> f32 {
        if self.state.is_eliminated() || self.chars == 0 {
            return 0.0;
        }
        let damping = (self.chars as f32 / SURE_CHARS).min(1.0);
        let base = match &self.analyser {
            Some(analyser) => analyser.confidence(),
            None => STRUCTURE_ONLY_CONFIDENCE,
        };
        base * damping * self.density_weight()
    }

    fn reset(&mut self) {
        *self = Self::new(self.charset);
    }
}
