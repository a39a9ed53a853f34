//! UTF-8 bit-pattern prober
//!
//! Strict validation: overlong forms, UTF-16 surrogates and anything past
//! U+10FFFF are illegal. Confidence grows with every multi-byte character
//! because random 8-bit text almost never survives more than a few.

use super::base::CharsetProber;
use crate::models::ProbingState;

/// After this many multi-byte characters confidence stops growing
const CERTAIN_AFTER: u32 = 6;

#[derive(Debug, Default)]
pub struct Utf8Prober {
    state: ProbingState,
    /// Continuation bytes still expected for the current character
    remaining: u8,
    /// Allowed range for the next continuation byte
    lower: u8,
    upper: u8,
    multibyte_chars: u32,
}

impl Utf8Prober {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&mut self, lead: u8) -> bool {
        let (remaining, lower, upper) = match lead {
            0xC2..=0xDF => (1, 0x80, 0xBF),
            0xE0 => (2, 0xA0, 0xBF),
            0xE1..=0xEC | 0xEE..=0xEF => (2, 0x80, 0xBF),
            0xED => (2, 0x80, 0x9F),
            0xF0 => (3, 0x90, 0xBF),
            0xF1..=0xF3 => (3, 0x80, 0xBF),
            0xF4 => (3, 0x80, 0x8F),
            _ => return false,
        };
        self.remaining = remaining;
        self.lower = lower;
        self.upper = upper;
        true
    }

    fn step(&mut self, byte: u8) -> bool {
        if self.remaining == 0 {
            return byte < 0x80 || self.begin(byte);
        }
        if !(self.lower..=self.upper).contains(&byte) {
            return false;
        }
        // Only the first continuation byte carries the special range
        self.lower = 0x80;
        self.upper = 0xBF;
        self.remaining -= 1;
        if self.remaining == 0 {
            self.multibyte_chars += 1;
        }
        true
    }
}

impl CharsetProber for Utf8Prober {
    fn charset(&self) -> Option<&'static str> {
        Some("UTF-8")
    }

    fn consume(&mut self, bytes: &[u8]) -> ProbingState {
        if self.state.is_eliminated() {
            return self.state;
        }
        for &byte in bytes {
            if !self.step(byte) {
                self.state = ProbingState::Eliminated;
                break;
            }
        }
        self.state
    }

    fn state(&self) -> ProbingState {
        self.state
    }

    fn confidence(&self) -> f32 {
        if self.state.is_eliminated() || self.multibyte_chars == 0 {
            0.0
        } else if self.multibyte_chars < CERTAIN_AFTER {
            1.0 - 0.99 * 0.5f32.powi(self.multibyte_chars as i32)
        } else {
            0.99
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
