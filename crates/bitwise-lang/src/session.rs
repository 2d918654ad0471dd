//! Editing session: the document text, its settings, and the latest published pass.
//!
//! Every change that affects results bumps a generation counter. A pass captures the
//! generation it started at in its [PassToken]; publishing a token older than the
//! current generation is refused, so a stale pass never overwrites newer results.

use crate::angle::AngleMode;
use crate::document::{evaluate_document, DocumentEvaluation, EvaluationResult};
use crate::format::{clamp_precision, format_value, DEFAULT_PRECISION};
use tracing::{debug, warn};

/// Snapshot of everything one evaluation pass needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassToken {
    generation: u64,
    text: String,
    mode: AngleMode,
    precision: u8,
}

impl PassToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the pass over the captured snapshot.
    pub fn run(&self) -> DocumentEvaluation {
        evaluate_document(&self.text, self.mode, self.precision)
    }
}

#[derive(Debug)]
pub struct Session {
    text: String,
    mode: AngleMode,
    precision: u8,
    generation: u64,
    published: Option<u64>,
    outcome: DocumentEvaluation,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AngleMode::default(), DEFAULT_PRECISION)
    }
}

impl Session {
    pub fn new(mode: AngleMode, precision: u8) -> Self {
        Self {
            text: String::new(),
            mode,
            precision: clamp_precision(precision.into()),
            generation: 0,
            published: None,
            outcome: DocumentEvaluation::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.mode
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the document text.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.generation += 1;
    }

    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        self.mode = mode;
        self.generation += 1;
    }

    /// Set the display precision (clamped to 0..=10).
    pub fn set_precision(&mut self, precision: i64) {
        self.precision = clamp_precision(precision);
        self.generation += 1;
    }

    pub fn begin_pass(&self) -> PassToken {
        PassToken {
            generation: self.generation,
            text: self.text.clone(),
            mode: self.mode,
            precision: self.precision,
        }
    }

    /// Publish a finished pass. Returns false (and keeps the current results) when the
    /// session changed after the pass began.
    pub fn publish(&mut self, token: &PassToken, outcome: DocumentEvaluation) -> bool {
        if token.generation != self.generation {
            warn!(
                pass = token.generation,
                current = self.generation,
                "discarding stale evaluation pass"
            );
            return false;
        }
        debug!(generation = token.generation, "published evaluation pass");
        self.published = Some(token.generation);
        self.outcome = outcome;
        true
    }

    /// Evaluate the current text and publish the result.
    pub fn refresh(&mut self) -> &DocumentEvaluation {
        let token = self.begin_pass();
        let outcome = token.run();
        self.publish(&token, outcome);
        &self.outcome
    }

    /// Whether the published results belong to the current text and settings.
    pub fn is_current(&self) -> bool {
        self.published == Some(self.generation)
    }

    /// Empty the document, its results and its variables.
    pub fn clear(&mut self) {
        self.text.clear();
        self.outcome = DocumentEvaluation::default();
        self.generation += 1;
        self.published = Some(self.generation);
    }

    pub fn outcome(&self) -> &DocumentEvaluation {
        &self.outcome
    }

    pub fn results(&self) -> &[EvaluationResult] {
        &self.outcome.results
    }

    pub fn variable_count(&self) -> usize {
        self.outcome.variable_count
    }

    /// Variables of the latest pass with formatted values, in name order.
    pub fn variables(&self) -> Vec<(String, String)> {
        self.outcome
            .environment
            .iter()
            .map(|(name, value)| (name.to_string(), format_value(value, self.precision)))
            .collect()
    }
}
