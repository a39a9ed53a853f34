//! Single-byte charsets known to the statistical probers
//!
//! Byte-to-character tables come from `encoding_rs`. Three charsets have no
//! WHATWG decoder of their own and borrow the table of their Windows
//! superset with the C1 range (0x80..=0x9F) left undefined.

use encoding_rs::{DecoderResult, Encoding};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingleByteCharset {
    Koi8R,
    Windows1251,
    Iso8859_5,
    Ibm866,
    MacCyrillic,
    Iso8859_7,
    Windows1253,
    Windows1255,
    Iso8859_8,
    Tis620,
    Iso8859_9,
    Iso8859_1,
    Windows1252,
    Iso8859_2,
    Windows1250,
    Windows1256,
    Iso8859_6,
}

impl SingleByteCharset {
    /// Canonical upper-case name reported to callers
    pub fn name(self) -> &'static str {
        match self {
            SingleByteCharset::Koi8R => "KOI8-R",
            SingleByteCharset::Windows1251 => "WINDOWS-1251",
            SingleByteCharset::Iso8859_5 => "ISO-8859-5",
            SingleByteCharset::Ibm866 => "IBM866",
            SingleByteCharset::MacCyrillic => "MAC-CYRILLIC",
            SingleByteCharset::Iso8859_7 => "ISO-8859-7",
            SingleByteCharset::Windows1253 => "WINDOWS-1253",
            SingleByteCharset::Windows1255 => "WINDOWS-1255",
            SingleByteCharset::Iso8859_8 => "ISO-8859-8",
            SingleByteCharset::Tis620 => "TIS-620",
            SingleByteCharset::Iso8859_9 => "ISO-8859-9",
            SingleByteCharset::Iso8859_1 => "ISO-8859-1",
            SingleByteCharset::Windows1252 => "WINDOWS-1252",
            SingleByteCharset::Iso8859_2 => "ISO-8859-2",
            SingleByteCharset::Windows1250 => "WINDOWS-1250",
            SingleByteCharset::Windows1256 => "WINDOWS-1256",
            SingleByteCharset::Iso8859_6 => "ISO-8859-6",
        }
    }

    fn encoding(self) -> &'static Encoding {
        match self {
            SingleByteCharset::Koi8R => encoding_rs::KOI8_R,
            SingleByteCharset::Windows1251 => encoding_rs::WINDOWS_1251,
            SingleByteCharset::Iso8859_5 => encoding_rs::ISO_8859_5,
            SingleByteCharset::Ibm866 => encoding_rs::IBM866,
            SingleByteCharset::MacCyrillic => encoding_rs::X_MAC_CYRILLIC,
            SingleByteCharset::Iso8859_7 => encoding_rs::ISO_8859_7,
            SingleByteCharset::Windows1253 => encoding_rs::WINDOWS_1253,
            SingleByteCharset::Windows1255 => encoding_rs::WINDOWS_1255,
            SingleByteCharset::Iso8859_8 => encoding_rs::ISO_8859_8,
            SingleByteCharset::Tis620 => encoding_rs::WINDOWS_874,
            SingleByteCharset::Iso8859_9 => encoding_rs::WINDOWS_1254,
            SingleByteCharset::Iso8859_1 | SingleByteCharset::Windows1252 => {
                encoding_rs::WINDOWS_1252
            }
            SingleByteCharset::Iso8859_2 => encoding_rs::ISO_8859_2,
            SingleByteCharset::Windows1250 => encoding_rs::WINDOWS_1250,
            SingleByteCharset::Windows1256 => encoding_rs::WINDOWS_1256,
            SingleByteCharset::Iso8859_6 => encoding_rs::ISO_8859_6,
        }
    }

    fn c1_undefined(self) -> bool {
        matches!(
            self,
            SingleByteCharset::Iso8859_1 | SingleByteCharset::Iso8859_9 | SingleByteCharset::Tis620
        )
    }

    /// Character for `byte`, or `None` when the byte is undefined here
    ///
    /// C1 control characters count as undefined: no text in these charsets
    /// legitimately carries them, and the WHATWG tables use them to fill
    /// holes in the Windows code pages.
    pub fn decode_byte(self, byte: u8) -> Option<char> {
        if byte < 0x80 {
            return Some(byte as char);
        }
        if self.c1_undefined() && byte <= 0x9F {
            return None;
        }

        let mut decoder = self.encoding().new_decoder_without_bom_handling();
        let mut out = [0u16; 2];
        let (result, _, written) =
            decoder.decode_to_utf16_without_replacement(&[byte], &mut out, true);
        if result != DecoderResult::InputEmpty || written != 1 {
            return None;
        }

        char::from_u32(u32::from(out[0])).filter(|c| !('\u{80}'..='\u{9F}').contains(c))
    }
}

impl std::fmt::Display for SingleByteCharset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
