//! Single-byte statistical prober
//!
//! Binds one language model to one charset. Every byte is mapped through
//! the charset's table; consecutive sample letters form a bigram whose
//! class (Positive .. Negative) is looked up in the language model.
//! Confidence compares the live bigram score to what the model scores on
//! its own training text, then discounts letters the model does not know.
//!
//! A high-bit byte that decodes to a symbol glued to a letter scores as a
//! `Negative` pair on each glued side. Sibling code pages (windows-1251 and
//! mac-cyrillic) mostly differ in where capitals live, and the wrong one
//! turns them into punctuation stuck to words.

use super::base::CharsetProber;
use crate::langmodels::{ByteClass, CharsetModel, SequenceClass, SequenceCounts};
use crate::models::ProbingState;

/// Reported while too few bigrams have been scored to judge
const FLOOR_CONFIDENCE: f32 = 0.01;

/// Weight of a high-bit non-letter against a high-bit letter
const SYMBOL_WEIGHT: f32 = 0.5;

const MAX_CONFIDENCE: f32 = 0.99;

pub struct SingleByteProber {
    model: &'static CharsetModel,
    min_scored: u32,
    state: ProbingState,
    last_order: Option<u8>,
    after_letter: bool,
    after_high_symbol: bool,
    counts: SequenceCounts,
    letters: u32,
    sample_letters: u32,
    high_letters: u32,
    high_sample: u32,
    high_symbols: u32,
}

impl SingleByteProber {
    pub fn new(model: &'static CharsetModel, min_scored: u32) -> Self {
        Self {
            model,
            min_scored,
            state: ProbingState::Detecting,
            last_order: None,
            after_letter: false,
            after_high_symbol: false,
            counts: SequenceCounts::default(),
            letters: 0,
            sample_letters: 0,
            high_letters: 0,
            high_sample: 0,
            high_symbols: 0,
        }
    }

    pub fn language_name(&self) -> &'static str {
        self.model.language.name
    }

    pub fn charset_name(&self) -> &'static str {
        self.model.charset.name()
    }
}

impl CharsetProber for SingleByteProber {
    fn charset(&self) -> Option<&'static str> {
        Some(self.charset_name())
    }

    fn language(&self) -> Option<&'static str> {
        Some(self.language_name())
    }

    fn consume(&mut self, bytes: &[u8]) -> ProbingState {
        if self.state.is_eliminated() {
            return self.state;
        }
        let language = self.model.language;

        for &byte in bytes {
            let high = byte >= 0x80;
            let class = self.model.classify(byte);
            if class == ByteClass::Illegal {
                self.state = ProbingState::Eliminated;
                break;
            }

            let is_letter = matches!(class, ByteClass::Letter(_) | ByteClass::RareLetter);
            let high_symbol = high && class == ByteClass::Other;
            if (high_symbol && self.after_letter) || (is_letter && self.after_high_symbol) {
                self.counts.add(SequenceClass::Negative);
            }
            self.after_letter = is_letter;
            self.after_high_symbol = high_symbol;

            match class {
                ByteClass::Letter(order) => {
                    self.letters += 1;
                    self.sample_letters += 1;
                    if high {
                        self.high_letters += 1;
                        self.high_sample += 1;
                    }
                    if let Some(prev) = self.last_order {
                        self.counts.add(language.class(prev, order));
                    }
                    self.last_order = Some(order);
                }
                ByteClass::RareLetter => {
                    self.letters += 1;
                    if high {
                        self.high_letters += 1;
                    }
                    self.last_order = None;
                }
                ByteClass::Other | ByteClass::Illegal => {
                    if high_symbol {
                        self.high_symbols += 1;
                    }
                    self.last_order = None;
                }
            }
        }
        self.state
    }

    fn state(&self) -> ProbingState {
        self.state
    }

    fn confidence(&self) -> f32 {
        if self.state.is_eliminated() {
            return 0.0;
        }
        if self.counts.total() < self.min_scored || self.letters == 0 {
            return FLOOR_CONFIDENCE;
        }

        let mut r = self.counts.ratio() / self.model.language.typical_ratio();
        r *= self.sample_letters as f32 / self.letters as f32;

        let high_weight = self.high_letters as f32 + SYMBOL_WEIGHT * self.high_symbols as f32;
        if high_weight > 0.0 {
            let known = self.high_sample as f32 / high_weight;
            r *= known * known;
        }
        r.clamp(0.0, MAX_CONFIDENCE)
    }

    fn reset(&mut self) {
        *self = Self::new(self.model, self.min_scored);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::langmodels::{charset_models, SingleByteCharset};

    fn prober_for(charset: SingleByteCharset, language: &str) -> SingleByteProber {
        let model = charset_models()
            .iter()
            .find(|m| m.charset == charset && m.language.name == language)
            .unwrap();
        SingleByteProber::new(model, 16)
    }

    fn encode(charset: &str, text: &str) -> Vec<u8> {
        let encoding = encoding_rs::Encoding::for_label(charset.as_bytes()).unwrap();
        let (bytes, _, had_errors) = encoding.encode(text);
        assert!(!had_errors);
        bytes.into_owned()
    }

    const RUSSIAN: &str = "В начале было слово, и слово было у Бога, и слово было Бог. \
        Оно было в начале у Бога. Все чрез Него начало быть, и без Него ничто не начало быть, \
        что начало быть. В Нем была жизнь, и жизнь была свет человеков.";

    #[test]
    fn test_russian_koi8() {
        let mut prober = prober_for(SingleByteCharset::Koi8R, "Russian");
        prober.consume(&encode("koi8-r", RUSSIAN));
        assert_eq!(prober.state(), ProbingState::Detecting);
        assert!(prober.confidence() > 0.6, "{}", prober.confidence());
    }

    #[test]
    fn test_wrong_charset_scores_low() {
        let bytes = encode("koi8-r", RUSSIAN);
        let mut right = prober_for(SingleByteCharset::Koi8R, "Russian");
        let mut wrong = prober_for(SingleByteCharset::Windows1251, "Russian");
        right.consume(&bytes);
        wrong.consume(&bytes);
        assert!(wrong.confidence() < right.confidence() / 2.0);
    }

    #[test]
    fn test_sibling_code_pages_separate() {
        let text = "Съешь же ещё этих мягких французских булок, да выпей чаю.\n".repeat(10);
        let cases = [
            ("windows-1251", SingleByteCharset::Windows1251, SingleByteCharset::MacCyrillic),
            ("x-mac-cyrillic", SingleByteCharset::MacCyrillic, SingleByteCharset::Windows1251),
        ];
        for (label, charset, sibling) in cases {
            let bytes = encode(label, &text);
            let mut right = prober_for(charset, "Russian");
            let mut wrong = prober_for(sibling, "Russian");
            right.consume(&bytes);
            wrong.consume(&bytes);
            assert!(
                right.confidence() > wrong.confidence(),
                "{}: {} vs {}",
                label,
                right.confidence(),
                wrong.confidence()
            );
        }
    }

    #[test]
    fn test_symbol_glued_to_letter_is_negative() {
        let mut prober = prober_for(SingleByteCharset::Windows1251, "Russian");
        // "а" 0xE0, "…" 0x85, "б" 0xE1
        prober.consume(b"\xE0\x85\xE1");
        assert_eq!(prober.counts.negative, 2);

        let mut spaced = prober_for(SingleByteCharset::Windows1251, "Russian");
        spaced.consume(b"\xE0 \x85 \xE1");
        assert_eq!(spaced.counts.negative, 0);
    }

    #[test]
    fn test_floor_before_enough_bigrams() {
        let mut prober = prober_for(SingleByteCharset::Windows1251, "Russian");
        prober.consume(&encode("windows-1251", "да"));
        assert_eq!(prober.confidence(), FLOOR_CONFIDENCE);
    }

    #[test]
    fn test_illegal_byte_eliminates() {
        let mut prober = prober_for(SingleByteCharset::Iso8859_1, "French");
        prober.consume(b"caf\xE9 \x85");
        assert_eq!(prober.state(), ProbingState::Eliminated);
        assert_eq!(prober.confidence(), 0.0);
    }

    #[test]
    fn test_chunking_does_not_matter() {
        let bytes = encode("koi8-r", RUSSIAN);
        let mut whole = prober_for(SingleByteCharset::Koi8R, "Russian");
        whole.consume(&bytes);
        let mut split = prober_for(SingleByteCharset::Koi8R, "Russian");
        for chunk in bytes.chunks(7) {
            split.consume(chunk);
        }
        assert_eq!(whole.confidence(), split.confidence());
    }
}
