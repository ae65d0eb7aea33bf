//! Stub collaborators that record how the trainer calls them.

#![allow(dead_code)]

use advtrain_core::{one_hot_from_indices, Attack, Classifier, FitState, Params, SharedClassifier};
use anyhow::bail;
use ndarray::{Array2, ArrayD, ArrayView2, ArrayViewD, IxDyn};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct FitCall {
    pub inputs: ArrayD<f32>,
    pub labels: Array2<f32>,
    pub options: Params,
}

#[derive(Debug, Clone)]
pub struct PredictCall {
    pub inputs: ArrayD<f32>,
    pub options: Params,
}

/// Shared view of everything a stub classifier saw.
#[derive(Debug, Default)]
pub struct CallLog {
    pub fits: Vec<FitCall>,
    pub predicts: Vec<PredictCall>,
}

pub type Log = Rc<RefCell<CallLog>>;

pub fn log() -> Log {
    Rc::new(RefCell::new(CallLog::default()))
}

/// Predicts a fixed class per row position, whatever the input.
pub struct ScriptedClassifier {
    pub classes: Vec<usize>,
    pub n_classes: usize,
    pub state: FitState,
    pub log: Log,
}

impl ScriptedClassifier {
    pub fn new(classes: Vec<usize>, n_classes: usize, log: Log) -> Self {
        Self {
            classes,
            n_classes,
            state: FitState::NotFitted,
            log,
        }
    }

    pub fn fitted(mut self) -> Self {
        self.state = FitState::Fitted;
        self
    }

    pub fn with_state(mut self, state: FitState) -> Self {
        self.state = state;
        self
    }
}

impl Classifier for ScriptedClassifier {
    fn fit(
        &mut self,
        inputs: ArrayViewD<'_, f32>,
        labels: ArrayView2<'_, f32>,
        options: &Params,
    ) -> anyhow::Result<()> {
        self.log.borrow_mut().fits.push(FitCall {
            inputs: inputs.to_owned(),
            labels: labels.to_owned(),
            options: options.clone(),
        });
        if self.state != FitState::Unknown {
            self.state = FitState::Fitted;
        }
        Ok(())
    }

    fn predict(&self, inputs: ArrayViewD<'_, f32>, options: &Params) -> anyhow::Result<Array2<f32>> {
        self.log.borrow_mut().predicts.push(PredictCall {
            inputs: inputs.to_owned(),
            options: options.clone(),
        });
        let n = inputs.shape()[0];
        if n > self.classes.len() {
            bail!("scripted classifier has {} rows, asked for {}", self.classes.len(), n);
        }
        Ok(one_hot_from_indices(&self.classes[..n], self.n_classes)?)
    }

    fn fit_state(&self) -> FitState {
        self.state
    }
}

/// Classifier whose `fit` always fails.
pub struct BrokenClassifier;

impl Classifier for BrokenClassifier {
    fn fit(&mut self, _: ArrayViewD<'_, f32>, _: ArrayView2<'_, f32>, _: &Params) -> anyhow::Result<()> {
        bail!("out of memory")
    }

    fn predict(&self, _: ArrayViewD<'_, f32>, _: &Params) -> anyhow::Result<Array2<f32>> {
        bail!("not trained")
    }

    fn fit_state(&self) -> FitState {
        FitState::NotFitted
    }
}

/// Shifts every input by `offset`, so adversarial samples are easy to spot.
pub struct ShiftAttack {
    pub name: String,
    pub offset: f32,
    pub classifier: SharedClassifier,
    pub seen_params: RefCell<Vec<Params>>,
}

impl ShiftAttack {
    pub fn new(name: &str, offset: f32, classifier: SharedClassifier) -> Self {
        Self {
            name: name.to_string(),
            offset,
            classifier,
            seen_params: RefCell::new(Vec::new()),
        }
    }
}

impl Attack for ShiftAttack {
    fn name(&self) -> &str {
        &self.name
    }

    fn classifier(&self) -> SharedClassifier {
        self.classifier.clone()
    }

    fn generate(&self, inputs: ArrayViewD<'_, f32>, params: &Params) -> anyhow::Result<ArrayD<f32>> {
        self.seen_params.borrow_mut().push(params.clone());
        Ok(inputs.mapv(|v| v + self.offset))
    }
}

/// Attack whose generation step always fails.
pub struct FailingAttack {
    pub classifier: SharedClassifier,
}

impl Attack for FailingAttack {
    fn name(&self) -> &str {
        "failing"
    }

    fn classifier(&self) -> SharedClassifier {
        self.classifier.clone()
    }

    fn generate(&self, _: ArrayViewD<'_, f32>, params: &Params) -> anyhow::Result<ArrayD<f32>> {
        match params.get_f64("eps") {
            Some(eps) if eps > 1.0 => bail!("eps {} exceeds input range", eps),
            _ => bail!("gradient unavailable"),
        }
    }
}

/// Fitted classifier that answers with one row fewer than it was given.
pub struct DroppingClassifier;

impl Classifier for DroppingClassifier {
    fn fit(&mut self, _: ArrayViewD<'_, f32>, _: ArrayView2<'_, f32>, _: &Params) -> anyhow::Result<()> {
        Ok(())
    }

    fn predict(&self, inputs: ArrayViewD<'_, f32>, _: &Params) -> anyhow::Result<Array2<f32>> {
        let n = inputs.shape()[0].saturating_sub(1);
        Ok(one_hot_from_indices(&vec![0; n], 2)?)
    }

    fn fit_state(&self) -> FitState {
        FitState::Fitted
    }
}

/// Keeps the sample count but appends `extra` zero features to every sample.
pub struct WideningAttack {
    pub extra: usize,
    pub classifier: SharedClassifier,
}

impl Attack for WideningAttack {
    fn name(&self) -> &str {
        "widening"
    }

    fn classifier(&self) -> SharedClassifier {
        self.classifier.clone()
    }

    fn generate(&self, inputs: ArrayViewD<'_, f32>, _: &Params) -> anyhow::Result<ArrayD<f32>> {
        let mut shape = inputs.shape().to_vec();
        if let Some(last) = shape.last_mut() {
            *last += self.extra;
        }
        Ok(ArrayD::zeros(IxDyn(&shape)))
    }
}

/// `n` samples of shape `[3]`; sample `i` holds `i` in every position.
pub fn inputs(n: usize) -> ArrayD<f32> {
    ArrayD::from_shape_fn(IxDyn(&[n, 3]), |idx| idx[0] as f32)
}

pub fn labels(classes: &[usize], n_classes: usize) -> Array2<f32> {
    one_hot_from_indices(classes, n_classes).expect("valid class indices")
}
