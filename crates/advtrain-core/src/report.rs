use serde::Serialize;

/// Summary of one training pass.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct TrainingReport {
    pub original_samples: usize,
    pub augmented_samples: usize,
    pub attacks: Vec<AttackOutcome>,
}

/// What a single attack contributed to the augmented dataset.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AttackOutcome {
    pub name: String,
    pub generated: usize,
    /// Samples that fooled the attack's classifier and were kept.
    pub kept: usize,
    /// Whether the attack's classifier had to be fitted first.
    pub fitted_classifier: bool,
    pub duration_ms: u64,
}

impl AttackOutcome {
    /// Fraction of generated samples that were kept. Zero when nothing was
    /// generated.
    pub fn success_rate(&self) -> f64 {
        if self.generated == 0 {
            0.0
        } else {
            self.kept as f64 / self.generated as f64
        }
    }
}

impl TrainingReport {
    pub fn new(original_samples: usize) -> Self {
        Self {
            original_samples,
            augmented_samples: original_samples,
            attacks: Vec::new(),
        }
    }

    pub fn add_attack(&mut self, outcome: AttackOutcome) {
        self.augmented_samples += outcome.kept;
        self.attacks.push(outcome);
    }

    pub fn total_adversarial(&self) -> usize {
        self.attacks.iter().map(|a| a.kept).sum()
    }
}
