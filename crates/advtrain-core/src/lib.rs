//! Adversarial training for classifiers.
//!
//! An [`AdversarialTrainer`] owns a target classifier and an ordered set of
//! attacks. [`AdversarialTrainer::fit`] runs each attack over the training
//! set, keeps only the samples that fool the attack's classifier, appends
//! them (with the predicted labels) to the original data and fits the target
//! classifier once on the augmented dataset.
//!
//! Classifiers and attacks are supplied by the caller through the
//! [`Classifier`] and [`Attack`] traits.
//!
//! # Quick Start
//!
//! ```no_run
//! use advtrain_core::{shared, AdversarialTrainer, AttackRef, Classifier, Params};
//! use ndarray::{Array2, ArrayD};
//!
//! # fn example(model: impl Classifier + 'static, fgsm: AttackRef,
//! #            x: ArrayD<f32>, y: Array2<f32>) -> anyhow::Result<()> {
//! let classifier = shared(model);
//! let mut trainer = AdversarialTrainer::new(
//!     classifier,
//!     vec![(fgsm, Params::new().with("eps", 0.1))],
//! );
//! let report = trainer.fit(x.view(), y.view(), &Params::new().with("epochs", 5))?;
//! println!("added {} adversarial samples", report.total_adversarial());
//! let predictions = trainer.predict(x.view(), &Params::new())?;
//! # let _ = predictions;
//! # Ok(())
//! # }
//! ```

pub mod attacks;
pub mod config;
pub mod dataset;
pub mod error;
pub mod labels;
pub mod model;
pub mod params;
pub mod report;
pub mod trainer;

pub use attacks::{AttackSet, AttackSpec};
pub use config::{AttackEntry, TrainerConfig};
pub use dataset::{AugmentedDataset, Dataset};
pub use error::{AttackStage, TrainerError, TrainerResult};
pub use labels::{argmax_rows, is_one_hot, one_hot_from_indices, to_one_hot};
pub use model::{shared, Attack, AttackRef, Classifier, FitState, SharedClassifier};
pub use params::Params;
pub use report::{AttackOutcome, TrainingReport};
pub use trainer::{AdversarialTrainer, TrainerState};
