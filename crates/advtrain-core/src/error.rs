//! Error types for adversarial training.

use std::fmt;
use std::path::PathBuf;

/// Step of the per-attack pipeline that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackStage {
    /// Fitting the attack's own classifier.
    FitClassifier,
    /// Generating adversarial inputs.
    Generate,
    /// Relabelling adversarial inputs with the attack's classifier.
    Predict,
}

impl fmt::Display for AttackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackStage::FitClassifier => write!(f, "fit_classifier"),
            AttackStage::Generate => write!(f, "generate"),
            AttackStage::Predict => write!(f, "predict"),
        }
    }
}

/// Trainer errors.
#[derive(Debug, thiserror::Error)]
pub enum TrainerError {
    /// `predict` was called before a successful `fit`.
    #[error("trainer is not fitted: call fit before predict")]
    NotFitted,

    /// An attack collaborator failed. Aborts the whole training pass.
    #[error("attack '{attack}' failed during {stage}: {source}")]
    Attack {
        attack: String,
        stage: AttackStage,
        #[source]
        source: anyhow::Error,
    },

    /// The target classifier failed to fit or predict.
    #[error("target classifier failed: {source}")]
    Classifier {
        #[source]
        source: anyhow::Error,
    },

    /// Array shapes disagree where they must line up sample-for-sample.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    /// A class index does not fit the label width.
    #[error("class index {index} out of range for {n_classes} classes")]
    InvalidLabel { index: usize, n_classes: usize },

    /// A shared classifier was already borrowed when the trainer needed it.
    #[error("classifier is busy: {context}")]
    ClassifierBusy { context: String },

    /// Configuration names an attack the resolver does not know.
    #[error("unknown attack: {name}")]
    UnknownAttack { name: String },

    /// Configuration could not be parsed.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Configuration file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrainerError {
    pub(crate) fn shape(
        context: impl Into<String>,
        expected: impl fmt::Debug,
        actual: impl fmt::Debug,
    ) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }

    /// Like [`shape`](Self::shape), with a plain-text description of what
    /// was expected.
    pub(crate) fn shape_described(
        context: impl Into<String>,
        expected: impl fmt::Display,
        actual: impl fmt::Debug,
    ) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            expected: expected.to_string(),
            actual: format!("{:?}", actual),
        }
    }

    /// Whether the error came from inside an attack collaborator.
    pub fn is_attack_failure(&self) -> bool {
        matches!(self, Self::Attack { .. })
    }
}

impl From<serde_yaml::Error> for TrainerError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}

/// Result type for trainer operations.
pub type TrainerResult<T> = Result<T, TrainerError>;
