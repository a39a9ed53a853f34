//! Character distribution analysis for CJK multi-byte probers
//!
//! A structurally valid byte stream is not enough to tell GB18030 from
//! BIG5 or EUC-KR: most of their byte ranges overlap. What differs is
//! which characters come out when the stream is decoded. Real text in the
//! right encoding keeps hitting a small set of very frequent characters;
//! the same bytes decoded as the wrong encoding scatter across rare ones.

use encoding_rs::{DecoderResult, Encoding};

use crate::langmodels::CjkLanguage;

pub struct DistributionAnalyser {
    encoding: &'static Encoding,
    language: CjkLanguage,
    decoded: u32,
    frequent: u32,
}

impl DistributionAnalyser {
    pub fn new(encoding: &'static Encoding, language: CjkLanguage) -> Self {
        Self {
            encoding,
            language,
            decoded: 0,
            frequent: 0,
        }
    }

    /// Record one complete multi-byte character
    pub fn feed(&mut self, bytes: &[u8]) {
        let Some(c) = decode_char(self.encoding, bytes) else {
            return;
        };
        self.decoded += 1;
        if self.language.is_frequent(c) {
            self.frequent += 1;
        }
    }

    pub fn frequent_ratio(&self) -> f32 {
        if self.decoded == 0 {
            0.0
        } else {
            self.frequent as f32 / self.decoded as f32
        }
    }

    /// Frequent ratio normalized against ordinary text, capped at 0.99
    pub fn confidence(&self) -> f32 {
        let typical = self.language.typical_ratio();
        (self.frequent_ratio() / typical).min(1.0) * 0.99
    }
}

fn decode_char(encoding: &'static Encoding, bytes: &[u8]) -> Option<char> {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut out = [0u16; 4];
    let (result, _, written) = decoder.decode_to_utf16_without_replacement(bytes, &mut out, true);
    if result != DecoderResult::InputEmpty || written == 0 {
        return None;
    }
    char::decode_utf16(out[..written].iter().copied())
        .next()
        .and_then(Result::ok)
}
