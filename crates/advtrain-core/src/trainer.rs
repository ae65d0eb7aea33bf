//! Adversarial training loop.
//!
//! Every configured attack is run over the whole training set. Samples that
//! fool the attack's own classifier are relabelled with that classifier's
//! prediction and appended to the original data; the target classifier is
//! then fitted once on the result.

use crate::attacks::{AttackSet, AttackSpec};
use crate::config::TrainerConfig;
use crate::dataset::{Accumulator, AugmentedDataset, Dataset};
use crate::error::{AttackStage, TrainerError, TrainerResult};
use crate::labels::{argmax_rows, to_one_hot};
use crate::model::{AttackRef, SharedClassifier};
use crate::params::Params;
use crate::report::{AttackOutcome, TrainingReport};
use ndarray::{Array2, ArrayD, ArrayView2, ArrayViewD, Axis};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Whether the trainer has completed a training pass.
#[derive(Debug, Clone, Default)]
pub enum TrainerState {
    #[default]
    Unfitted,
    Fitted {
        data: AugmentedDataset,
        report: TrainingReport,
    },
}

pub struct AdversarialTrainer {
    classifier: SharedClassifier,
    attacks: AttackSet,
    fit_options: Params,
    state: TrainerState,
}

impl AdversarialTrainer {
    /// `attacks` may be a single attack, a `Vec` of attacks, or a `Vec` of
    /// `(attack, params)` pairs.
    pub fn new(classifier: SharedClassifier, attacks: impl Into<AttackSet>) -> Self {
        Self {
            classifier,
            attacks: attacks.into(),
            fit_options: Params::new(),
            state: TrainerState::Unfitted,
        }
    }

    /// Build from a configuration file's contents. Attack names go through
    /// `resolve`; the config's `fit` section becomes the default training
    /// options.
    pub fn from_config<F>(
        classifier: SharedClassifier,
        config: &TrainerConfig,
        resolve: F,
    ) -> TrainerResult<Self>
    where
        F: FnMut(&str) -> Option<AttackRef>,
    {
        let attacks = config.resolve_attacks(resolve)?;
        Ok(Self::new(classifier, attacks).with_fit_options(config.fit.clone()))
    }

    /// Default training options. Options passed to [`fit`](Self::fit) win on
    /// conflicting keys.
    pub fn with_fit_options(mut self, options: Params) -> Self {
        self.fit_options = options;
        self
    }

    pub fn classifier(&self) -> &SharedClassifier {
        &self.classifier
    }

    pub fn attacks(&self) -> &AttackSet {
        &self.attacks
    }

    pub fn state(&self) -> &TrainerState {
        &self.state
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self.state, TrainerState::Fitted { .. })
    }

    /// The dataset used by the last successful `fit`.
    pub fn augmented(&self) -> Option<&AugmentedDataset> {
        match &self.state {
            TrainerState::Fitted { data, .. } => Some(data),
            TrainerState::Unfitted => None,
        }
    }

    pub fn last_report(&self) -> Option<&TrainingReport> {
        match &self.state {
            TrainerState::Fitted { report, .. } => Some(report),
            TrainerState::Unfitted => None,
        }
    }

    /// Augment `(inputs, labels)` with successful adversarial samples from
    /// every attack and fit the target classifier on the result.
    ///
    /// Any collaborator failure aborts the pass. The previous fitted state,
    /// if any, is kept in that case; classifier mutations already made are
    /// not undone.
    pub fn fit(
        &mut self,
        inputs: ArrayViewD<'_, f32>,
        labels: ArrayView2<'_, f32>,
        options: &Params,
    ) -> TrainerResult<TrainingReport> {
        let original = Dataset::from_views(inputs.view(), labels)?;
        let options = self.fit_options.merged(options);
        let truth = argmax_rows(labels);

        info!(
            samples = original.len(),
            classes = original.n_classes(),
            attacks = self.attacks.len(),
            "starting adversarial training pass"
        );

        let mut report = TrainingReport::new(original.len());
        let mut acc = Accumulator::new(original);

        for spec in &self.attacks {
            let start = Instant::now();
            let (x_adv, y_adv, fitted_classifier, generated) =
                run_attack(spec, inputs.view(), labels, &truth, &options)?;
            let kept = y_adv.nrows();
            acc.push(x_adv, y_adv)?;

            if kept == 0 {
                warn!(attack = spec.name(), generated, "attack produced no successful samples");
            }
            report.add_attack(AttackOutcome {
                name: spec.name().to_string(),
                generated,
                kept,
                fitted_classifier,
                duration_ms: millis(start.elapsed()),
            });
        }

        let data = acc.finish()?;
        {
            let mut classifier =
                self.classifier
                    .try_borrow_mut()
                    .map_err(|_| TrainerError::ClassifierBusy {
                        context: "fitting target classifier".into(),
                    })?;
            classifier
                .fit(data.inputs(), data.labels(), &options)
                .map_err(|source| TrainerError::Classifier { source })?;
        }

        info!(
            original = data.original_len(),
            adversarial = data.adversarial_len(),
            total = data.len(),
            "adversarial training pass complete"
        );

        self.state = TrainerState::Fitted {
            data,
            report: report.clone(),
        };
        Ok(report)
    }

    pub fn fit_dataset(&mut self, data: &Dataset, options: &Params) -> TrainerResult<TrainingReport> {
        self.fit(data.inputs(), data.labels(), options)
    }

    /// Predict with the adversarially trained classifier.
    pub fn predict(&self, inputs: ArrayViewD<'_, f32>, options: &Params) -> TrainerResult<Array2<f32>> {
        if !self.is_fitted() {
            return Err(TrainerError::NotFitted);
        }
        let classifier = self
            .classifier
            .try_borrow()
            .map_err(|_| TrainerError::ClassifierBusy {
                context: "predicting with target classifier".into(),
            })?;
        classifier
            .predict(inputs, options)
            .map_err(|source| TrainerError::Classifier { source })
    }
}

/// Run one attack. Returns the kept inputs, their predicted labels, whether
/// the attack classifier was fitted here, and how many samples were generated.
fn run_attack(
    spec: &AttackSpec,
    inputs: ArrayViewD<'_, f32>,
    labels: ArrayView2<'_, f32>,
    truth: &[usize],
    options: &Params,
) -> TrainerResult<(ArrayD<f32>, Array2<f32>, bool, usize)> {
    let name = spec.name();
    let fail = |stage: AttackStage| {
        move |source: anyhow::Error| TrainerError::Attack {
            attack: name.to_string(),
            stage,
            source,
        }
    };
    let busy = |what: &str| TrainerError::ClassifierBusy {
        context: format!("{what} classifier of attack '{name}'"),
    };

    let classifier = spec.attack.classifier();
    let already_fitted = classifier
        .try_borrow()
        .map_err(|_| busy("inspecting"))?
        .fit_state()
        .is_fitted();
    if !already_fitted {
        debug!(attack = name, "fitting attack classifier");
        classifier
            .try_borrow_mut()
            .map_err(|_| busy("fitting"))?
            .fit(inputs.view(), labels, options)
            .map_err(fail(AttackStage::FitClassifier))?;
    }

    let x_adv = spec
        .attack
        .generate(inputs.view(), &spec.params)
        .map_err(fail(AttackStage::Generate))?;
    check_generated(name, inputs, x_adv.view())?;
    let generated = x_adv.len_of(Axis(0));

    let raw = classifier
        .try_borrow()
        .map_err(|_| busy("predicting with"))?
        .predict(x_adv.view(), &Params::new())
        .map_err(fail(AttackStage::Predict))?;
    if raw.nrows() != generated || raw.ncols() != labels.ncols() {
        return Err(TrainerError::shape(
            format!("predictions of attack '{name}'"),
            (generated, labels.ncols()),
            raw.dim(),
        ));
    }
    let y_pred = to_one_hot(raw.view());

    let successful: Vec<usize> = argmax_rows(y_pred.view())
        .iter()
        .zip(truth)
        .enumerate()
        .filter_map(|(i, (pred, actual))| (pred != actual).then_some(i))
        .collect();

    debug!(
        attack = name,
        generated,
        kept = successful.len(),
        "attack samples filtered"
    );

    Ok((
        x_adv.select(Axis(0), &successful),
        y_pred.select(Axis(0), &successful),
        !already_fitted,
        generated,
    ))
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Adversarial output must line up sample-for-sample with the input batch.
fn check_generated(
    name: &str,
    inputs: ArrayViewD<'_, f32>,
    generated: ArrayViewD<'_, f32>,
) -> TrainerResult<()> {
    if generated.shape() != inputs.shape() {
        return Err(TrainerError::shape(
            format!("adversarial batch of attack '{name}'"),
            inputs.shape(),
            generated.shape(),
        ));
    }
    Ok(())
}
