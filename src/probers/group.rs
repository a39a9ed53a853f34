//! Charset group prober: one family of single-byte probers

use super::base::CharsetProber;
use super::single_byte::SingleByteProber;
use crate::langmodels::Family;
use crate::models::ProbingState;

pub struct GroupProber {
    family: Family,
    members: Vec<SingleByteProber>,
    state: ProbingState,
}

impl GroupProber {
    pub fn new(family: Family, members: Vec<SingleByteProber>) -> Self {
        let state = if members.is_empty() {
            ProbingState::Eliminated
        } else {
            ProbingState::Detecting
        };
        Self {
            family,
            members,
            state,
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn members(&self) -> &[SingleByteProber] {
        &self.members
    }

    /// Best live member; ties go to the member registered first
    fn best(&self) -> Option<&SingleByteProber> {
        let mut best: Option<(&SingleByteProber, f32)> = None;
        for member in self.members.iter().filter(|m| !m.state().is_eliminated()) {
            let confidence = member.confidence();
            match best {
                Some((_, top)) if confidence <= top => {}
                _ => best = Some((member, confidence)),
            }
        }
        best.map(|(member, _)| member)
    }
}

impl CharsetProber for GroupProber {
    fn charset(&self) -> Option<&'static str> {
        self.best().map(SingleByteProber::charset_name)
    }

    fn language(&self) -> Option<&'static str> {
        self.best().map(SingleByteProber::language_name)
    }

    fn consume(&mut self, bytes: &[u8]) -> ProbingState {
        if self.state.is_eliminated() {
            return self.state;
        }
        let mut alive = false;
        for member in &mut self.members {
            if !member.state().is_eliminated() {
                alive |= !member.consume(bytes).is_eliminated();
            }
        }
        if !alive {
            self.state = ProbingState::Eliminated;
        }
        self.state
    }

    fn state(&self) -> ProbingState {
        self.state
    }

    fn confidence(&self) -> f32 {
        self.best().map_or(0.0, |m| m.confidence())
    }

    fn reset(&mut self) {
        for member in &mut self.members {
            member.reset();
        }
        self.state = if self.members.is_empty() {
            ProbingState::Eliminated
        } else {
            ProbingState::Detecting
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::langmodels::charset_models;

    fn group(family: Family) -> GroupProber {
        let members = charset_models()
            .iter()
            .filter(|m| m.language.family == family)
            .map(|m| SingleByteProber::new(m, 16))
            .collect();
        GroupProber::new(family, members)
    }

    #[test]
    fn test_reports_best_member() {
        let text = "Η Ελλάδα είναι χώρα της νοτιοανατολικής Ευρώπης, στο νότιο άκρο της \
            Βαλκανικής χερσονήσου. Η πρωτεύουσα και μεγαλύτερη πόλη της χώρας είναι η Αθήνα.";
        let (bytes, _, _) = encoding_rs::ISO_8859_7.encode(text);

        let mut prober = group(Family::Greek);
        prober.consume(&bytes);
        assert_eq!(prober.charset(), Some("ISO-8859-7"));
        assert_eq!(prober.language(), Some("Greek"));
        assert!(prober.confidence() > 0.5);
    }

    #[test]
    fn test_all_members_eliminated() {
        let mut prober = group(Family::Thai);
        // 0xFF is undefined in TIS-620
        prober.consume(b"\xFF");
        assert_eq!(prober.state(), ProbingState::Eliminated);
        assert_eq!(prober.charset(), None);
        assert_eq!(prober.confidence(), 0.0);
    }

    #[test]
    fn test_empty_group_is_eliminated() {
        let prober = GroupProber::new(Family::Hebrew, Vec::new());
        assert_eq!(prober.state(), ProbingState::Eliminated);
    }
}
