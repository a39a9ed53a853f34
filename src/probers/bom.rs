//! Byte-order-mark sniffer

use super::base::CharsetProber;
use crate::models::ProbingState;

/// Signatures, longest first so `FF FE 00 00` wins over `FF FE`
const SIGNATURES: &[(&[u8], &str)] = &[
    (&[0xFF, 0xFE, 0x00, 0x00], "UTF-32LE"),
    (&[0x00, 0x00, 0xFE, 0xFF], "UTF-32BE"),
    (&[0xEF, 0xBB, 0xBF], "UTF-8-SIG"),
    (&[0xFF, 0xFE], "UTF-16LE"),
    (&[0xFE, 0xFF], "UTF-16BE"),
];

const MAX_SIGNATURE: usize = 4;

/// Looks at the first bytes of the stream, accumulated across feed calls
#[derive(Debug, Default)]
pub struct BomProber {
    head: Vec<u8>,
    state: ProbingState,
    matched: Option<&'static str>,
}

impl BomProber {
    pub fn new() -> Self {
        Self::default()
    }

    fn evaluate(&mut self) {
        if let Some((_, name)) = SIGNATURES
            .iter()
            .find(|(sig, _)| self.head.len() >= sig.len() && self.head.starts_with(sig))
        {
            // A 2-byte match may still grow into a 4-byte one
            let longer_possible = self.head.len() < MAX_SIGNATURE
                && SIGNATURES
                    .iter()
                    .any(|(sig, _)| sig.len() > self.head.len() && sig.starts_with(&self.head));
            if !longer_possible {
                self.matched = Some(name);
                self.state = ProbingState::Confirmed;
            }
            return;
        }

        let still_possible = SIGNATURES
            .iter()
            .any(|(sig, _)| sig.starts_with(&self.head));
        if !still_possible {
            self.state = ProbingState::Eliminated;
        }
    }

    /// Called at end of input: a pending short signature becomes final
    pub fn settle(&mut self) {
        if self.state != ProbingState::Detecting {
            return;
        }
        match SIGNATURES
            .iter()
            .find(|(sig, _)| self.head.starts_with(sig))
        {
            Some((_, name)) => {
                self.matched = Some(name);
                self.state = ProbingState::Confirmed;
            }
            None => self.state = ProbingState::Eliminated,
        }
    }
}

impl CharsetProber for BomProber {
    fn charset(&self) -> Option<&'static str> {
        self.matched
    }

    fn consume(&mut self, bytes: &[u8]) -> ProbingState {
        if self.state != ProbingState::Detecting {
            return self.state;
        }
        for &byte in bytes {
            self.head.push(byte);
            self.evaluate();
            if self.state != ProbingState::Detecting {
                break;
            }
        }
        self.state
    }

    fn state(&self) -> ProbingState {
        self.state
    }

    fn confidence(&self) -> f32 {
        if self.matched.is_some() {
            1.0
        } else {
            0.0
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
