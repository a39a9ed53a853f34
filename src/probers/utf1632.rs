//! UTF-16 and UTF-32 probers for input without a byte-order mark
//!
//! Text in these encodings is full of zero bytes in fixed positions: every
//! ASCII character in UTF-16LE is `xx 00`, every BMP character in UTF-32LE
//! is `xx xx 00 00`. Legacy 8-bit text essentially never contains NUL, so
//! the position and density of zeros separate the two worlds.

use super::base::CharsetProber;
use crate::models::ProbingState;

/// Fewer units than this are too little evidence for either form
const MIN_UNITS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnicodeForm {
    Utf32Le,
    Utf32Be,
    Utf16Le,
    Utf16Be,
}

impl UnicodeForm {
    pub const ALL: [UnicodeForm; 4] = [
        UnicodeForm::Utf32Le,
        UnicodeForm::Utf32Be,
        UnicodeForm::Utf16Le,
        UnicodeForm::Utf16Be,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UnicodeForm::Utf32Le => "UTF-32LE",
            UnicodeForm::Utf32Be => "UTF-32BE",
            UnicodeForm::Utf16Le => "UTF-16LE",
            UnicodeForm::Utf16Be => "UTF-16BE",
        }
    }

    fn unit_len(self) -> usize {
        match self {
            UnicodeForm::Utf32Le | UnicodeForm::Utf32Be => 4,
            UnicodeForm::Utf16Le | UnicodeForm::Utf16Be => 2,
        }
    }

    fn little_endian(self) -> bool {
        matches!(self, UnicodeForm::Utf32Le | UnicodeForm::Utf16Le)
    }
}

#[derive(Debug, Default, Clone)]
struct Utf16Stats {
    /// High byte zero, low byte not: ASCII-shaped in this byte order
    ascii_shaped: u32,
    /// Low byte zero, high byte not: ASCII-shaped in the other byte order
    swapped: u32,
    /// Units whose high byte matches the previous unit's, or either is zero
    stable: u32,
    prev_high: Option<u8>,
    pending_high_surrogate: bool,
}

#[derive(Debug)]
pub struct Utf1632Prober {
    form: UnicodeForm,
    state: ProbingState,
    partial: Vec<u8>,
    units: u32,
    nul_units: u32,
    utf16: Utf16Stats,
}

impl Utf1632Prober {
    pub fn new(form: UnicodeForm) -> Self {
        Self {
            form,
            state: ProbingState::Detecting,
            partial: Vec::with_capacity(4),
            units: 0,
            nul_units: 0,
            utf16: Utf16Stats::default(),
        }
    }

    fn value(&self, unit: &[u8]) -> u32 {
        let fold = |acc: u32, &b: &u8| (acc << 8) | u32::from(b);
        if self.form.little_endian() {
            unit.iter().rev().fold(0, fold)
        } else {
            unit.iter().fold(0, fold)
        }
    }

    /// Returns false when the unit cannot occur in this form
    fn unit(&mut self, unit: &[u8]) -> bool {
        let value = self.value(unit);
        self.units += 1;
        if value == 0 {
            self.nul_units += 1;
        }
        match self.form {
            UnicodeForm::Utf32Le | UnicodeForm::Utf32Be => {
                value <= 0x10FFFF && !(0xD800..=0xDFFF).contains(&value)
            }
            UnicodeForm::Utf16Le | UnicodeForm::Utf16Be => self.utf16_unit(value),
        }
    }

    fn utf16_unit(&mut self, value: u32) -> bool {
        let stats = &mut self.utf16;
        let high = (value >> 8) as u8;
        let low = value as u8;

        let is_high_surrogate = (0xD800..=0xDBFF).contains(&value);
        let is_low_surrogate = (0xDC00..=0xDFFF).contains(&value);
        if stats.pending_high_surrogate != is_low_surrogate {
            return false;
        }
        stats.pending_high_surrogate = is_high_surrogate;

        match (high, low) {
            (0, 0) => {}
            (0, _) => stats.ascii_shaped += 1,
            (_, 0) => stats.swapped += 1,
            _ => {}
        }
        if let Some(prev) = stats.prev_high {
            if prev == high || prev == 0 || high == 0 {
                stats.stable += 1;
            }
        }
        stats.prev_high = Some(high);
        true
    }

    fn utf16_confidence(&self) -> f32 {
        let stats = &self.utf16;
        if self.units < MIN_UNITS
            || stats.ascii_shaped == 0
            || stats.ascii_shaped <= stats.swapped
        {
            return 0.0;
        }
        let stability = stats.stable as f32 / (self.units - 1) as f32;
        0.99 * stability * self.non_nul_share()
    }

    fn utf32_confidence(&self) -> f32 {
        if self.units < MIN_UNITS || self.nul_units == self.units {
            return 0.0;
        }
        0.99 * (1.0 - 0.5f32.powi(self.units.min(32) as i32)) * self.non_nul_share()
    }

    fn non_nul_share(&self) -> f32 {
        1.0 - self.nul_units as f32 / self.units as f32
    }
}

impl CharsetProber for Utf1632Prober {
    fn charset(&self) -> Option<&'static str> {
        Some(self.form.name())
    }

    fn consume(&mut self, bytes: &[u8]) -> ProbingState {
        if self.state.is_eliminated() {
            return self.state;
        }

        let width = self.form.unit_len();
        let mut rest = bytes;

        if !self.partial.is_empty() {
            let need = width - self.partial.len();
            let take = need.min(rest.len());
            self.partial.extend_from_slice(&rest[..take]);
            rest = &rest[take..];
            if self.partial.len() < width {
                return self.state;
            }
            let unit = std::mem::take(&mut self.partial);
            if !self.unit(&unit) {
                self.state = ProbingState::Eliminated;
                return self.state;
            }
        }

        let mut chunks = rest.chunks_exact(width);
        for unit in &mut chunks {
            if !self.unit(unit) {
                self.state = ProbingState::Eliminated;
                return self.state;
            }
        }
        self.partial.extend_from_slice(chunks.remainder());
        self.state
    }

    fn state(&self) -> ProbingState {
        self.state
    }

    fn confidence(&self) -> f32 {
        if self.state.is_eliminated() || self.units == 0 {
            return 0.0;
        }
        match self.form {
            UnicodeForm::Utf32Le | UnicodeForm::Utf32Be => self.utf32_confidence(),
            UnicodeForm::Utf16Le | UnicodeForm::Utf16Be => self.utf16_confidence(),
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.form);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_utf16(text: &str, little: bool) -> Vec<u8> {
        text.encode_utf16()
            .flat_map(|u| if little { u.to_le_bytes() } else { u.to_be_bytes() })
            .collect()
    }

    fn encode_utf32(text: &str, little: bool) -> Vec<u8> {
        text.chars()
            .flat_map(|c| {
                let v = c as u32;
                if little {
                    v.to_le_bytes()
                } else {
                    v.to_be_bytes()
                }
            })
            .collect()
    }

    fn probe(form: UnicodeForm, bytes: &[u8]) -> Utf1632Prober {
        let mut prober = Utf1632Prober::new(form);
        prober.consume(bytes);
        prober
    }

    #[test]
    fn test_utf16le_english() {
        let bytes = encode_utf16("The quick brown fox jumps over the lazy dog", true);
        assert!(probe(UnicodeForm::Utf16Le, &bytes).confidence() > 0.95);
        assert_eq!(probe(UnicodeForm::Utf16Be, &bytes).confidence(), 0.0);
    }

    #[test]
    fn test_utf16be_cyrillic() {
        let bytes = encode_utf16("Съешь же ещё этих мягких французских булок", false);
        assert!(probe(UnicodeForm::Utf16Be, &bytes).confidence() > 0.9);
        assert_eq!(probe(UnicodeForm::Utf16Le, &bytes).confidence(), 0.0);
    }

    #[test]
    fn test_utf32_validates_code_points() {
        let bytes = encode_utf32("hello wörld", true);
        let prober = probe(UnicodeForm::Utf32Le, &bytes);
        assert_eq!(prober.state(), ProbingState::Detecting);
        assert!(prober.confidence() > 0.98);

        // read with the wrong byte order every unit is out of range
        assert_eq!(
            probe(UnicodeForm::Utf32Be, &bytes).state(),
            ProbingState::Eliminated
        );
    }

    #[test]
    fn test_utf32_needs_enough_units() {
        assert_eq!(probe(UnicodeForm::Utf32Le, b"hi\0\0").confidence(), 0.0);
        assert_eq!(probe(UnicodeForm::Utf32Le, b"A\0\0\0").confidence(), 0.0);
        assert_eq!(probe(UnicodeForm::Utf32Le, b"ok\0\0ab\0\0").confidence(), 0.0);
    }

    #[test]
    fn test_utf32_nul_units_discount() {
        assert_eq!(probe(UnicodeForm::Utf32Le, &[0u8; 64]).confidence(), 0.0);

        let text = encode_utf32("abcd", true);
        let mut padded = text.clone();
        padded.extend_from_slice(&[0u8; 16]);
        let clean = probe(UnicodeForm::Utf32Le, &text).confidence();
        let diluted = probe(UnicodeForm::Utf32Le, &padded).confidence();
        assert!(diluted < clean * 0.6, "{} vs {}", diluted, clean);
    }

    #[test]
    fn test_utf32_text_is_weak_utf16() {
        let bytes = encode_utf32("hello world", true);
        let utf16 = probe(UnicodeForm::Utf16Le, &bytes).confidence();
        let utf32 = probe(UnicodeForm::Utf32Le, &bytes).confidence();
        assert!(utf16 < utf32, "{} vs {}", utf16, utf32);
    }

    #[test]
    fn test_lone_surrogate_eliminates() {
        let prober = probe(UnicodeForm::Utf16Le, b"a\x00\x00\xDCb\x00");
        assert_eq!(prober.state(), ProbingState::Eliminated);

        let pair = encode_utf16("a😀b", true);
        assert_eq!(
            probe(UnicodeForm::Utf16Le, &pair).state(),
            ProbingState::Detecting
        );
    }

    #[test]
    fn test_units_split_across_chunks() {
        let bytes = encode_utf16("split units", true);
        let mut prober = Utf1632Prober::new(UnicodeForm::Utf16Le);
        for byte in &bytes {
            prober.consume(std::slice::from_ref(byte));
        }
        let whole = probe(UnicodeForm::Utf16Le, &bytes);
        assert_eq!(prober.confidence(), whole.confidence());
    }

    #[test]
    fn test_eight_bit_text_scores_zero() {
        let prober = probe(UnicodeForm::Utf16Le, "Привет, мир".as_bytes());
        assert_eq!(prober.confidence(), 0.0);
    }
}
