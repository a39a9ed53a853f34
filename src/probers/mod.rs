//! Encoding probers
//!
//! Architecture:
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        Prober (enum)                           │
//! ├──────────────┬──────────────┬──────────────────┬───────────────┤
//! │ Bom          │ Escape       │ Utf8 / Utf1632   │ Group         │
//! │ first bytes  │ ISO-2022, HZ │ bit patterns     │ SingleByte ×N │
//! │              │              │ MultiByte (CJK)  │  └ CharsetModel│
//! └──────────────┴──────────────┴──────────────────┴───────────────┘
//! ```
//!
//! BOM and escape probers are exclusive: a confirmation from either ends
//! the session. Everything else competes on confidence.

mod base;
mod bom;
mod coding;
mod distribution;
mod escape;
mod group;
mod multibyte;
mod single_byte;
mod utf1632;
mod utf8;

pub use base::CharsetProber;
pub use bom::BomProber;
pub use escape::{EscapeProber, EscapeScheme};
pub use group::GroupProber;
pub use multibyte::{MultiByteCharset, MultiByteProber};
pub use single_byte::SingleByteProber;
pub use utf1632::{UnicodeForm, Utf1632Prober};
pub use utf8::Utf8Prober;

use crate::config::DetectorConfig;
use crate::langmodels::{charset_models, Family};
use crate::models::ProbingState;

/// How much a prober's verdict weighs when confidences tie
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProberKind {
    /// Single-byte statistics
    Statistical,
    /// Byte-structure validation
    Structural,
    /// BOM and escape markers; a match is final
    Exclusive,
}

/// Closed set of prober variants
pub enum Prober {
    Bom(BomProber),
    Escape(EscapeProber),
    Utf8(Utf8Prober),
    Utf1632(Utf1632Prober),
    MultiByte(MultiByteProber),
    Group(GroupProber),
}

macro_rules! each_prober {
    ($self:expr, $p:ident => $body:expr) => {
        match $self {
            Prober::Bom($p) => $body,
            Prober::Escape($p) => $body,
            Prober::Utf8($p) => $body,
            Prober::Utf1632($p) => $body,
            Prober::MultiByte($p) => $body,
            Prober::Group($p) => $body,
        }
    };
}

impl Prober {
    pub fn kind(&self) -> ProberKind {
        match self {
            Prober::Bom(_) | Prober::Escape(_) => ProberKind::Exclusive,
            Prober::Utf8(_) | Prober::Utf1632(_) | Prober::MultiByte(_) => ProberKind::Structural,
            Prober::Group(_) => ProberKind::Statistical,
        }
    }

    pub fn is_exclusive(&self) -> bool {
        self.kind() == ProberKind::Exclusive
    }

    /// UTF-16/32 probers are the only ones that can outvote pure ASCII
    pub fn is_wide_unicode(&self) -> bool {
        matches!(self, Prober::Utf1632(_))
    }

    /// Short label for logs
    pub fn label(&self) -> String {
        match self {
            Prober::Bom(_) => "bom".to_string(),
            Prober::Escape(_) => "escape".to_string(),
            Prober::Group(group) => format!("group:{}", group.family().name()),
            other => other.charset().unwrap_or("?").to_string(),
        }
    }
}

impl CharsetProber for Prober {
    fn charset(&self) -> Option<&'static str> {
        each_prober!(self, p => p.charset())
    }

    fn language(&self) -> Option<&'static str> {
        each_prober!(self, p => p.language())
    }

    fn consume(&mut self, bytes: &[u8]) -> ProbingState {
        each_prober!(self, p => p.consume(bytes))
    }

    fn state(&self) -> ProbingState {
        each_prober!(self, p => p.state())
    }

    fn confidence(&self) -> f32 {
        each_prober!(self, p => p.confidence())
    }

    fn reset(&mut self) {
        each_prober!(self, p => p.reset())
    }
}

/// Build a fresh roster for one session
///
/// Order matters: it is the tie-break order among equal confidences, so
/// exclusive probers come first, then structural ones, then the groups.
pub fn build_roster(config: &DetectorConfig) -> Vec<Prober> {
    let mut roster = vec![
        Prober::Bom(BomProber::new()),
        Prober::Escape(EscapeProber::new()),
        Prober::Utf8(Utf8Prober::new()),
    ];
    roster.extend(
        UnicodeForm::ALL
            .iter()
            .map(|&form| Prober::Utf1632(Utf1632Prober::new(form))),
    );
    roster.extend(
        MultiByteCharset::ALL
            .iter()
            .map(|&charset| Prober::MultiByte(MultiByteProber::new(charset))),
    );

    for family in Family::ALL {
        let members: Vec<SingleByteProber> = charset_models()
            .iter()
            .filter(|m| m.language.family == family && config.allows_language(m.language.name))
            .map(|m| SingleByteProber::new(m, config.min_scored_bigrams))
            .collect();
        if !members.is_empty() {
            roster.push(Prober::Group(GroupProber::new(family, members)));
        }
    }
    roster
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_order() {
        let roster = build_roster(&DetectorConfig::default());
        let kinds: Vec<ProberKind> = roster.iter().map(Prober::kind).collect();
        let mut sorted = kinds.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(kinds, sorted);
        assert_eq!(roster[0].label(), "bom");
        assert_eq!(roster[2].label(), "UTF-8");
    }

    #[test]
    fn test_one_prober_per_encoding() {
        let roster = build_roster(&DetectorConfig::default());
        let mut names: Vec<&str> = roster
            .iter()
            .filter(|p| p.kind() == ProberKind::Structural)
            .filter_map(|p| p.charset())
            .collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), before);

        let mut pairs: Vec<(&str, &str)> = roster
            .iter()
            .filter_map(|p| match p {
                Prober::Group(g) => Some(g),
                _ => None,
            })
            .flat_map(|g| g.members().iter().map(|m| (m.charset_name(), m.language_name())))
            .collect();
        let before = pairs.len();
        pairs.sort_unstable();
        pairs.dedup();
        assert_eq!(pairs.len(), before);
    }

    #[test]
    fn test_language_allow_list() {
        let config = DetectorConfig {
            languages: Some(vec!["greek".to_string()]),
            ..Default::default()
        };
        let groups: Vec<String> = build_roster(&config)
            .iter()
            .filter(|p| p.kind() == ProberKind::Statistical)
            .map(Prober::label)
            .collect();
        assert_eq!(groups, vec!["group:greek".to_string()]);
    }
}
