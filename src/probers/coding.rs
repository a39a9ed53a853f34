//! Coding automata for the legacy CJK multi-byte encodings
//!
//! Each automaton only knows which byte may follow which; it accepts or
//! rejects structure and hands every completed multi-byte character to the
//! caller for distribution analysis.

/// Outcome of feeding one byte to a [`CodingMachine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A complete single-byte character (ASCII, half-width katakana)
    Single,
    /// Inside a multi-byte character
    Pending,
    /// A multi-byte character of this many bytes just completed
    Char(usize),
    /// The byte cannot occur here
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodingScheme {
    ShiftJis,
    EucJp,
    EucKr,
    EucTw,
    Gb18030,
    Big5,
}

enum Lead {
    Single,
    Multi,
    Illegal,
}

enum Continue {
    More,
    Done,
    Illegal,
}

#[inline]
fn euc_byte(b: u8) -> bool {
    (0xA1..=0xFE).contains(&b)
}

impl CodingScheme {
    fn lead(self, b: u8) -> Lead {
        if b < 0x80 {
            return Lead::Single;
        }
        match self {
            CodingScheme::ShiftJis => match b {
                0xA1..=0xDF => Lead::Single,
                0x81..=0x9F | 0xE0..=0xFC => Lead::Multi,
                _ => Lead::Illegal,
            },
            CodingScheme::EucJp | CodingScheme::EucTw => match b {
                0x8E | 0xA1..=0xFE => Lead::Multi,
                0x8F if self == CodingScheme::EucJp => Lead::Multi,
                _ => Lead::Illegal,
            },
            CodingScheme::EucKr => {
                if euc_byte(b) {
                    Lead::Multi
                } else {
                    Lead::Illegal
                }
            }
            CodingScheme::Gb18030 | CodingScheme::Big5 => match b {
                0x81..=0xFE => Lead::Multi,
                _ => Lead::Illegal,
            },
        }
    }

    /// Judge a partial character; `seq` holds the lead plus all trails so far
    fn next(self, seq: &[u8]) -> Continue {
        let last = seq[seq.len() - 1];
        match (self, seq.len(), seq[0]) {
            (CodingScheme::ShiftJis, 2, _) => match last {
                0x40..=0x7E | 0x80..=0xFC => Continue::Done,
                _ => Continue::Illegal,
            },

            (CodingScheme::EucJp, 2, 0x8E) => match last {
                0xA1..=0xDF => Continue::Done,
                _ => Continue::Illegal,
            },
            (CodingScheme::EucJp, 2, 0x8F) => more_if(euc_byte(last)),
            (CodingScheme::EucJp, 3, 0x8F) => done_if(euc_byte(last)),
            (CodingScheme::EucJp, 2, _) | (CodingScheme::EucKr, 2, _) => done_if(euc_byte(last)),

            (CodingScheme::EucTw, 2, 0x8E) => more_if((0xA1..=0xB0).contains(&last)),
            (CodingScheme::EucTw, 3, 0x8E) => more_if(euc_byte(last)),
            (CodingScheme::EucTw, 4, 0x8E) => done_if(euc_byte(last)),
            (CodingScheme::EucTw, 2, _) => done_if(euc_byte(last)),

            (CodingScheme::Gb18030, 2, _) => match last {
                0x40..=0x7E | 0x80..=0xFE => Continue::Done,
                0x30..=0x39 => Continue::More,
                _ => Continue::Illegal,
            },
            (CodingScheme::Gb18030, 3, _) => more_if((0x81..=0xFE).contains(&last)),
            (CodingScheme::Gb18030, 4, _) => done_if((0x30..=0x39).contains(&last)),

            (CodingScheme::Big5, 2, _) => match last {
                0x40..=0x7E | 0xA1..=0xFE => Continue::Done,
                _ => Continue::Illegal,
            },

            _ => Continue::Illegal,
        }
    }
}

fn more_if(ok: bool) -> Continue {
    if ok {
        Continue::More
    } else {
        Continue::Illegal
    }
}

fn done_if(ok: bool) -> Continue {
    if ok {
        Continue::Done
    } else {
        Continue::Illegal
    }
}

/// Byte-at-a-time automaton; partial characters survive across chunks
#[derive(Debug, Clone)]
pub struct CodingMachine {
    scheme: CodingScheme,
    buf: [u8; 4],
    len: usize,
    last_char: [u8; 4],
}

impl CodingMachine {
    pub fn new(scheme: CodingScheme) -> Self {
        Self {
            scheme,
            buf: [0; 4],
            len: 0,
            last_char: [0; 4],
        }
    }

    pub fn next(&mut self, byte: u8) -> Step {
        if self.len == 0 {
            return match self.scheme.lead(byte) {
                Lead::Single => Step::Single,
                Lead::Multi => {
                    self.buf[0] = byte;
                    self.len = 1;
                    Step::Pending
                }
                Lead::Illegal => Step::Error,
            };
        }

        self.buf[self.len] = byte;
        self.len += 1;
        match self.scheme.next(&self.buf[..self.len]) {
            Continue::More if self.len < self.buf.len() => Step::Pending,
            Continue::Done => {
                let n = self.len;
                self.last_char = self.buf;
                self.len = 0;
                Step::Char(n)
            }
            _ => {
                self.len = 0;
                Step::Error
            }
        }
    }

    /// Bytes of the character most recently reported by [`Step::Char`]
    pub fn last_char(&self, len: usize) -> &[u8] {
        &self.last_char[..len]
    }
}
