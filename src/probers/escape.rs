//! Escape-sequence prober for the 7-bit stateful encodings
//!
//! ISO-2022 variants announce themselves with designator escapes
//! (`ESC $ B` and friends); HZ-GB-2312 brackets GB2312 runs in `~{ ... ~}`.
//! Seeing one full marker is conclusive, so a match confirms the scheme and
//! short-circuits the whole session. All schemes are 7-bit: the first byte
//! at or above 0x80 rules every one of them out.
//!
//! ISO-2022-JP-2 is a superset of ISO-2022-JP and reuses its designators.
//! Those only make ISO-2022-JP pending; a JP-2-only designator later in the
//! stream still wins, and [`EscapeProber::settle`] confirms the pending
//! scheme once input ends.

use memchr::memchr2;

use super::base::CharsetProber;
use crate::models::ProbingState;

const ESC: u8 = 0x1B;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscapeScheme {
    Iso2022Jp,
    Iso2022Jp2,
    Iso2022Kr,
    Iso2022Cn,
    HzGb2312,
}

impl EscapeScheme {
    pub fn name(self) -> &'static str {
        match self {
            EscapeScheme::Iso2022Jp => "ISO-2022-JP",
            EscapeScheme::Iso2022Jp2 => "ISO-2022-JP-2",
            EscapeScheme::Iso2022Kr => "ISO-2022-KR",
            EscapeScheme::Iso2022Cn => "ISO-2022-CN",
            EscapeScheme::HzGb2312 => "HZ-GB-2312",
        }
    }

    pub fn language(self) -> &'static str {
        match self {
            EscapeScheme::Iso2022Jp | EscapeScheme::Iso2022Jp2 => "Japanese",
            EscapeScheme::Iso2022Kr => "Korean",
            EscapeScheme::Iso2022Cn | EscapeScheme::HzGb2312 => "Chinese",
        }
    }
}

/// Designators ISO-2022-JP shares with ISO-2022-JP-2
const SHARED_JP: &[&[u8]] = &[b"\x1b$B", b"\x1b$@", b"\x1b(J"];

/// Designator escapes that identify exactly one scheme
const DESIGNATORS: &[(&[u8], EscapeScheme)] = &[
    (b"\x1b(I", EscapeScheme::Iso2022Jp),
    (b"\x1b$A", EscapeScheme::Iso2022Jp2),
    (b"\x1b$(C", EscapeScheme::Iso2022Jp2),
    (b"\x1b$(D", EscapeScheme::Iso2022Jp2),
    (b"\x1b.A", EscapeScheme::Iso2022Jp2),
    (b"\x1b.F", EscapeScheme::Iso2022Jp2),
    (b"\x1b$)C", EscapeScheme::Iso2022Kr),
    (b"\x1b$)A", EscapeScheme::Iso2022Cn),
    (b"\x1b$)G", EscapeScheme::Iso2022Cn),
    (b"\x1b$)E", EscapeScheme::Iso2022Cn),
    (b"\x1b$*H", EscapeScheme::Iso2022Cn),
    (b"\x1b$+I", EscapeScheme::Iso2022Cn),
    (b"\x1b$+J", EscapeScheme::Iso2022Cn),
    (b"\x1b$+K", EscapeScheme::Iso2022Cn),
    (b"\x1b$+L", EscapeScheme::Iso2022Cn),
    (b"\x1b$+M", EscapeScheme::Iso2022Cn),
];

const MAX_DESIGNATOR: usize = 4;

/// HZ bracket tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum HzState {
    #[default]
    Ascii,
    Tilde,
    Gb {
        pairs: u32,
        half: bool,
    },
    GbTilde {
        pairs: u32,
    },
}

impl HzState {
    /// Advance one byte; returns true when a complete `~{ pair ~}` was seen
    fn step(self, byte: u8) -> (HzState, bool) {
        match self {
            HzState::Ascii if byte == b'~' => (HzState::Tilde, false),
            HzState::Ascii => (HzState::Ascii, false),
            HzState::Tilde if byte == b'{' => (HzState::Gb { pairs: 0, half: false }, false),
            HzState::Tilde => (HzState::Ascii, false),
            HzState::Gb { pairs, half: false } if byte == b'~' => {
                (HzState::GbTilde { pairs }, false)
            }
            HzState::Gb { pairs, half } if (0x21..=0x7E).contains(&byte) => {
                if half {
                    (HzState::Gb { pairs: pairs + 1, half: false }, false)
                } else {
                    (HzState::Gb { pairs, half: true }, false)
                }
            }
            HzState::Gb { .. } => (HzState::Ascii, false),
            HzState::GbTilde { pairs } if byte == b'}' => (HzState::Ascii, pairs > 0),
            HzState::GbTilde { .. } => (HzState::Ascii, false),
        }
    }
}

#[derive(Debug, Default)]
pub struct EscapeProber {
    sequence: Vec<u8>,
    hz: HzState,
    state: ProbingState,
    detected: Option<EscapeScheme>,
    pending: Option<EscapeScheme>,
}

impl EscapeProber {
    pub fn new() -> Self {
        Self {
            sequence: Vec::with_capacity(MAX_DESIGNATOR),
            ..Default::default()
        }
    }

    pub fn scheme(&self) -> Option<EscapeScheme> {
        self.detected
    }

    fn idle(&self) -> bool {
        self.sequence.is_empty() && self.hz == HzState::Ascii
    }

    fn confirm(&mut self, scheme: EscapeScheme) {
        self.detected = Some(scheme);
        self.state = ProbingState::Confirmed;
    }

    /// Input is over: a pending scheme becomes the answer
    pub fn settle(&mut self) {
        if self.state != ProbingState::Detecting {
            return;
        }
        if let Some(scheme) = self.pending {
            self.confirm(scheme);
        }
    }

    fn step_escape(&mut self, byte: u8) {
        if self.sequence.is_empty() {
            if byte == ESC {
                self.sequence.push(byte);
            }
            return;
        }

        self.sequence.push(byte);
        if SHARED_JP.contains(&self.sequence.as_slice()) {
            self.pending = Some(EscapeScheme::Iso2022Jp);
            self.sequence.clear();
            return;
        }
        if let Some((_, scheme)) = DESIGNATORS.iter().find(|(d, _)| *d == self.sequence.as_slice()) {
            self.confirm(*scheme);
            return;
        }
        let is_prefix = SHARED_JP
            .iter()
            .chain(DESIGNATORS.iter().map(|(d, _)| d))
            .any(|d| d.len() > self.sequence.len() && d.starts_with(&self.sequence));
        if !is_prefix {
            // Unknown sequence; an ESC here starts a fresh one
            self.sequence.clear();
            if byte == ESC {
                self.sequence.push(byte);
            }
        }
    }

    fn scan(&mut self, bytes: &[u8]) {
        let mut pos = 0;
        while pos < bytes.len() {
            if self.idle() {
                match memchr2(ESC, b'~', &bytes[pos..]) {
                    Some(offset) => pos += offset,
                    None => return,
                }
            }

            let byte = bytes[pos];
            self.step_escape(byte);
            if self.state == ProbingState::Confirmed {
                return;
            }

            let (next, complete) = self.hz.step(byte);
            self.hz = next;
            if complete {
                self.confirm(EscapeScheme::HzGb2312);
                return;
            }
            pos += 1;
        }
    }
}

impl CharsetProber for EscapeProber {
    fn charset(&self) -> Option<&'static str> {
        self.detected.map(EscapeScheme::name)
    }

    fn language(&self) -> Option<&'static str> {
        self.detected.map(EscapeScheme::language)
    }

    fn consume(&mut self, bytes: &[u8]) -> ProbingState {
        if self.state != ProbingState::Detecting {
            return self.state;
        }

        let seven_bit = bytes.iter().position(|&b| b >= 0x80).unwrap_or(bytes.len());
        self.scan(&bytes[..seven_bit]);
        if self.state == ProbingState::Detecting && seven_bit < bytes.len() {
            self.state = ProbingState::Eliminated;
            self.pending = None;
        }
        self.state
    }

    fn state(&self) -> ProbingState {
        self.state
    }

    fn confidence(&self) -> f32 {
        if self.detected.is_some() {
            0.99
        } else {
            0.0
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(chunks: &[&[u8]]) -> (ProbingState, Option<&'static str>) {
        let mut prober = EscapeProber::new();
        for chunk in chunks {
            prober.consume(chunk);
        }
        (prober.state(), prober.charset())
    }

    fn settled(chunks: &[&[u8]]) -> (ProbingState, Option<&'static str>) {
        let mut prober = EscapeProber::new();
        for chunk in chunks {
            prober.consume(chunk);
        }
        prober.settle();
        (prober.state(), prober.charset())
    }

    #[test]
    fn test_iso2022_jp() {
        let text: &[u8] = b"abc \x1b$B$3$s\x1b(B def";
        assert_eq!(probe(&[text]), (ProbingState::Detecting, None));
        assert_eq!(
            settled(&[text]),
            (ProbingState::Confirmed, Some("ISO-2022-JP"))
        );
    }

    #[test]
    fn test_katakana_designator_confirms_jp() {
        assert_eq!(
            probe(&[b"\x1b(I123"]),
            (ProbingState::Confirmed, Some("ISO-2022-JP"))
        );
    }

    #[test]
    fn test_jp2_after_shared_designator() {
        assert_eq!(
            probe(&[b"\x1b$B$3$s\x1b(B and ", b"\x1b$AGc\x1b(B"]),
            (ProbingState::Confirmed, Some("ISO-2022-JP-2"))
        );
        assert_eq!(
            settled(&[b"\x1b$@$3\x1b(J x \x1b.A\x1bNi"]),
            (ProbingState::Confirmed, Some("ISO-2022-JP-2"))
        );
    }

    #[test]
    fn test_high_byte_drops_pending_jp() {
        assert_eq!(settled(&[b"\x1b$B$3", b"\xA4"]), (ProbingState::Eliminated, None));
    }

    #[test]
    fn test_settle_without_marker_stays_detecting() {
        assert_eq!(settled(&[b"plain \x1b[0m text"]), (ProbingState::Detecting, None));
    }

    #[test]
    fn test_iso2022_jp2_exclusive_designator() {
        assert_eq!(
            probe(&[b"x\x1b$(Cabc"]),
            (ProbingState::Confirmed, Some("ISO-2022-JP-2"))
        );
    }

    #[test]
    fn test_iso2022_kr_split_marker() {
        assert_eq!(
            probe(&[b"\x1b$", b")", b"C\x0e!!\x0f"]),
            (ProbingState::Confirmed, Some("ISO-2022-KR"))
        );
    }

    #[test]
    fn test_iso2022_cn_variants() {
        assert_eq!(probe(&[b"\x1b$)A"]).1, Some("ISO-2022-CN"));
        assert_eq!(probe(&[b"\x1b$*H"]).1, Some("ISO-2022-CN"));
        assert_eq!(probe(&[b"\x1b$+M"]).1, Some("ISO-2022-CN"));
    }

    #[test]
    fn test_hz() {
        assert_eq!(
            probe(&[b"hello ~{<:Ky", b"2;S{~}world"]),
            (ProbingState::Confirmed, Some("HZ-GB-2312"))
        );
        // an empty bracket proves nothing
        assert_eq!(probe(&[b"~{~} plain"]), (ProbingState::Detecting, None));
    }

    #[test]
    fn test_unknown_escape_resets() {
        // ANSI colour codes are not ISO-2022 designators
        assert_eq!(
            settled(&[b"\x1b[31mred\x1b[0m \x1b$B"]),
            (ProbingState::Confirmed, Some("ISO-2022-JP"))
        );
        assert_eq!(probe(&[b"\x1b[31mred"]), (ProbingState::Detecting, None));
    }

    #[test]
    fn test_high_byte_eliminates() {
        assert_eq!(probe(&[b"abc\x80\x1b$B"]), (ProbingState::Eliminated, None));
        assert_eq!(probe(&[b"plain", b"\xC3\xA9"]), (ProbingState::Eliminated, None));
    }

    #[test]
    fn test_eliminated_is_terminal() {
        let mut prober = EscapeProber::new();
        prober.consume(b"\xFF");
        prober.consume(b"\x1b$B");
        assert_eq!(prober.state(), ProbingState::Eliminated);
        assert_eq!(prober.confidence(), 0.0);
    }
}
