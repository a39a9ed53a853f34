//! Detection coordinator
//!
//! Owns the prober roster for one session, fans bytes out to it and turns
//! the probers' cumulative statistics into one answer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Coordinator                        │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Split chunks at early-stop checkpoints              │
//! │  2. BOM + escape probers; a confirmation short-circuits │
//! │  3. Fan out to live structural and group probers        │
//! │  4. At each checkpoint, stop if one leader dominates    │
//! │  5. finalize(): BOM / ASCII / best live candidate       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Checkpoints sit at fixed byte offsets, so where scanning stops never
//! depends on how the caller chunked the input.

use tracing::{debug, trace};

use crate::config::DetectorConfig;
use crate::models::{DetectionResult, ProbingState};
use crate::probers::{build_roster, CharsetProber, Prober};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Scanning,
    ShortCircuited,
    Finalized,
}

pub struct Coordinator {
    config: DetectorConfig,
    roster: Vec<Prober>,
    state: CoordinatorState,
    total_bytes: usize,
    pure_ascii: bool,
    checkpoint_interval: usize,
    next_checkpoint: usize,
    verdict: Option<DetectionResult>,
}

impl Coordinator {
    pub fn new(config: DetectorConfig) -> Self {
        let checkpoint_interval = config.early_stop_min_bytes.max(1);
        Self {
            roster: build_roster(&config),
            config,
            state: CoordinatorState::Scanning,
            total_bytes: 0,
            pure_ascii: true,
            checkpoint_interval,
            next_checkpoint: checkpoint_interval,
            verdict: None,
        }
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// True once no further input can change the answer
    pub fn is_settled(&self) -> bool {
        self.state != CoordinatorState::Scanning
    }

    pub fn consume(&mut self, chunk: &[u8]) {
        if self.state != CoordinatorState::Scanning || chunk.is_empty() {
            return;
        }

        let mut rest = chunk;
        while !rest.is_empty() && self.state == CoordinatorState::Scanning {
            let mut take = rest.len().min(self.next_checkpoint - self.total_bytes);
            if let Some(max) = self.config.max_bytes {
                take = take.min(max.saturating_sub(self.total_bytes));
            }

            let (head, tail) = rest.split_at(take);
            self.scan(head);
            self.total_bytes += take;
            rest = tail;

            if self.state != CoordinatorState::Scanning {
                break;
            }
            if self
                .config
                .max_bytes
                .is_some_and(|max| self.total_bytes >= max)
            {
                debug!("Byte cap reached after {} bytes", self.total_bytes);
                self.settle();
                break;
            }
            if self.total_bytes == self.next_checkpoint {
                self.next_checkpoint += self.checkpoint_interval;
                self.try_early_stop();
            }
        }
    }

    fn scan(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        if self.pure_ascii && !bytes.is_ascii() {
            self.pure_ascii = false;
        }
        trace!("Scanning {} bytes at offset {}", bytes.len(), self.total_bytes);

        for idx in 0..self.roster.len() {
            let prober = &mut self.roster[idx];
            if !prober.is_exclusive() || prober.state() != ProbingState::Detecting {
                continue;
            }
            if prober.consume(bytes).is_confirmed() {
                self.short_circuit(idx);
                return;
            }
        }

        let offset = self.total_bytes;
        for prober in self.roster.iter_mut().filter(|p| !p.is_exclusive()) {
            if prober.state().is_eliminated() {
                continue;
            }
            if prober.consume(bytes).is_eliminated() {
                debug!(
                    "{} eliminated within bytes {}..{}",
                    prober.label(),
                    offset,
                    offset + bytes.len()
                );
            }
        }
    }

    fn short_circuit(&mut self, idx: usize) {
        let prober = &self.roster[idx];
        if let Some(charset) = prober.charset() {
            debug!("Short-circuit: {} confirmed {}", prober.label(), charset);
            self.verdict = Some(DetectionResult::new(
                charset,
                prober.confidence(),
                prober.language(),
            ));
            self.state = CoordinatorState::ShortCircuited;
        }
    }

    /// Live candidates in roster order; while all input is 7-bit only the
    /// UTF-16/32 probers are allowed to compete with plain ASCII
    fn contenders(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.roster
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_exclusive() && !p.state().is_eliminated())
            .filter(|(_, p)| !self.pure_ascii || p.is_wide_unicode())
            .map(|(idx, p)| (idx, p.confidence()))
    }

    /// First candidate with the highest confidence
    fn leader(&self) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (idx, confidence) in self.contenders() {
            match best {
                Some((_, top)) if confidence <= top => {}
                _ => best = Some((idx, confidence)),
            }
        }
        best
    }

    fn try_early_stop(&mut self) {
        let Some((leader, top)) = self.leader() else {
            return;
        };
        if top < self.config.early_stop_threshold {
            return;
        }
        let margin = self.config.early_stop_margin;
        let dominant = self
            .contenders()
            .all(|(idx, confidence)| idx == leader || confidence < top - margin);
        if dominant {
            debug!("Early stop after {} bytes", self.total_bytes);
            self.settle();
        }
    }

    fn result_of(&self, idx: usize, confidence: f32) -> DetectionResult {
        let prober = &self.roster[idx];
        match prober.charset() {
            Some(charset) => DetectionResult::new(charset, confidence, prober.language()),
            None => DetectionResult::undetermined(),
        }
    }

    fn decide(&self) -> DetectionResult {
        if self.total_bytes == 0 {
            return DetectionResult::undetermined();
        }
        let threshold = self.config.minimum_threshold;
        match self.leader() {
            Some((idx, confidence)) if confidence >= threshold => self.result_of(idx, confidence),
            _ if self.pure_ascii => DetectionResult::new("ASCII", 1.0, None),
            _ => DetectionResult::undetermined(),
        }
    }

    /// Resolve a pending short BOM or ISO-2022-JP designator, then decide
    fn settle(&mut self) {
        for prober in &mut self.roster {
            match prober {
                Prober::Bom(bom) => bom.settle(),
                Prober::Escape(escape) => escape.settle(),
                _ => {}
            }
        }
        let exclusive = self
            .roster
            .iter()
            .position(|p| p.is_exclusive() && p.state().is_confirmed());
        match exclusive {
            Some(idx) => self.short_circuit(idx),
            None => {
                self.verdict = Some(self.decide());
                self.state = CoordinatorState::Finalized;
            }
        }
    }

    /// Produce the final answer; later calls return the same result
    pub fn finalize(&mut self) -> DetectionResult {
        if self.state == CoordinatorState::Scanning {
            self.settle();
        }
        self.verdict
            .clone()
            .unwrap_or_else(DetectionResult::undetermined)
    }

    /// Forget all input and start over with the same configuration
    pub fn reset(&mut self) {
        for prober in &mut self.roster {
            prober.reset();
        }
        self.state = CoordinatorState::Scanning;
        self.total_bytes = 0;
        self.pure_ascii = true;
        self.next_checkpoint = self.checkpoint_interval;
        self.verdict = None;
    }
}
