//! Builds a language model from a training text
//!
//! The procedure is deterministic so every process derives the same
//! tables from the embedded corpora:
//!
//! 1. Fold every character to lower case.
//! 2. Rank letters by frequency (ties by code point); the top
//!    [`SAMPLE_SIZE`] form the sample alphabet.
//! 3. Count bigrams of consecutive sample letters.
//! 4. Walk bigrams from most to least frequent. Those needed to cover
//!    [`POSITIVE_COVERAGE`] of all occurrences are `Positive`, the rest
//!    `Likely` (seen twice or more) or `Unlikely` (seen once). Pairs never
//!    seen are `Negative`.
//! 5. Score the training text against its own table to get the typical
//!    ratio used to normalize prober confidence.

use rustc_hash::FxHashMap;

/// Number of most frequent letters tracked per language
pub const SAMPLE_SIZE: usize = 64;

/// Share of bigram occurrences covered by the `Positive` class
const POSITIVE_COVERAGE: f64 = 0.85;

pub const LIKELY_WEIGHT: f32 = 0.5;
pub const NEGATIVE_WEIGHT: f32 = 1.0;

/// How plausible one ordered pair of sample letters is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SequenceClass {
    Negative,
    Unlikely,
    Likely,
    Positive,
}

/// Raw tables produced by [`train`]
pub struct TrainedModel {
    pub alphabet: FxHashMap<char, u8>,
    pub classes: Vec<SequenceClass>,
    pub typical_ratio: f32,
}

impl TrainedModel {
    pub fn class(&self, first: u8, second: u8) -> SequenceClass {
        self.classes[usize::from(first) * SAMPLE_SIZE + usize::from(second)]
    }
}

/// Single-character lower-case mapping; characters whose lower case expands
/// (Turkish `İ`) are kept as they are.
pub fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Letters, plus the Thai vowel and tone marks that behave like letters
pub fn is_letter(c: char) -> bool {
    c.is_alphabetic() || ('\u{0E31}'..='\u{0E4E}').contains(&c)
}

/// Bigram counters shared by training and live scoring
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SequenceCounts {
    pub positive: u32,
    pub likely: u32,
    pub unlikely: u32,
    pub negative: u32,
}

impl SequenceCounts {
    pub fn add(&mut self, class: SequenceClass) {
        match class {
            SequenceClass::Positive => self.positive += 1,
            SequenceClass::Likely => self.likely += 1,
            SequenceClass::Unlikely => self.unlikely += 1,
            SequenceClass::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.positive + self.likely + self.unlikely + self.negative
    }

    /// Weighted score per scored bigram
    pub fn ratio(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let score = self.positive as f32 + LIKELY_WEIGHT * self.likely as f32
            - NEGATIVE_WEIGHT * self.negative as f32;
        score / total as f32
    }
}

pub fn train(text: &str) -> TrainedModel {
    let folded: Vec<char> = text.chars().map(fold).collect();

    let mut frequency: FxHashMap<char, u32> = FxHashMap::default();
    for &c in folded.iter().filter(|c| is_letter(**c)) {
        *frequency.entry(c).or_insert(0) += 1;
    }
    let mut ranked: Vec<(char, u32)> = frequency.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let alphabet: FxHashMap<char, u8> = ranked
        .iter()
        .take(SAMPLE_SIZE)
        .enumerate()
        .map(|(order, (c, _))| (*c, order as u8))
        .collect();

    let mut bigrams: FxHashMap<(u8, u8), u32> = FxHashMap::default();
    let mut prev: Option<u8> = None;
    for c in &folded {
        let order = alphabet.get(c).copied();
        if let (Some(p), Some(o)) = (prev, order) {
            *bigrams.entry((p, o)).or_insert(0) += 1;
        }
        prev = order;
    }

    let total: u32 = bigrams.values().sum();
    let mut ordered: Vec<((u8, u8), u32)> = bigrams.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut classes = vec![SequenceClass::Negative; SAMPLE_SIZE * SAMPLE_SIZE];
    let mut covered: u32 = 0;
    for ((first, second), count) in ordered {
        let class = if f64::from(covered) < f64::from(total) * POSITIVE_COVERAGE {
            SequenceClass::Positive
        } else if count >= 2 {
            SequenceClass::Likely
        } else {
            SequenceClass::Unlikely
        };
        classes[usize::from(first) * SAMPLE_SIZE + usize::from(second)] = class;
        covered += count;
    }

    let mut model = TrainedModel {
        alphabet,
        classes,
        typical_ratio: 0.0,
    };
    model.typical_ratio = self_score(&model, &folded);
    model
}

fn self_score(model: &TrainedModel, folded: &[char]) -> f32 {
    let mut counts = SequenceCounts::default();
    let mut prev: Option<u8> = None;
    for c in folded {
        let order = model.alphabet.get(c).copied();
        if let (Some(p), Some(o)) = (prev, order) {
            counts.add(model.class(p, o));
        }
        prev = order;
    }
    counts.ratio()
}
