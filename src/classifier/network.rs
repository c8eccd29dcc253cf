// KrishiRakshak - Edge inference core
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Built-in feed-forward condition classifier
//!
//! A small dense network, 4 → 64 → 32 → 16 → 3, with ReLU hidden layers
//! and a softmax output. Trained with Adam on sparse categorical
//! cross-entropy, with dropout after the first hidden layer during
//! training only.
//!
//! Models are saved and loaded as JSON:
//!
//! ```rust,no_run
//! use krishi::classifier::{FeedForwardNetwork, TrainingConfig};
//!
//! let network = FeedForwardNetwork::new(TrainingConfig::default());
//! network.save("model.json").unwrap();
//! let restored = FeedForwardNetwork::load("model.json").unwrap();
//! ```

use super::{Classifier, ModelInfo, TrainingSummary};
use crate::error::ClassifierError;
use crate::preprocess::FeatureVector;
use crate::sample::{ConditionClass, NUM_CLASSES, NUM_FEATURES};
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Hidden layer widths
pub const HIDDEN_LAYERS: [usize; 3] = [64, 32, 16];

/// Floor applied to the target probability before taking its log
const MIN_PROBABILITY: f64 = 1e-12;

/// Training hyper-parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Passes over the training set (default: 10)
    pub epochs: usize,
    /// Samples per gradient step (default: 32)
    pub batch_size: usize,
    /// Adam step size (default: 0.001)
    pub learning_rate: f64,
    /// Drop probability after the first hidden layer (default: 0.2)
    pub dropout: f64,
    /// Seed for weight initialisation, shuffling and dropout
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            batch_size: 32,
            learning_rate: 0.001,
            dropout: 0.2,
            seed: 42,
        }
    }
}

impl TrainingConfig {
    /// Set the number of epochs
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the learning rate
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Layer activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Relu,
    Softmax,
}

impl Activation {
    fn apply(self, z: &DVector<f64>) -> DVector<f64> {
        match self {
            Activation::Relu => z.map(|v| v.max(0.0)),
            Activation::Softmax => {
                let max = z.max();
                let exp = z.map(|v| (v - max).exp());
                let sum = exp.sum();
                exp / sum
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DenseLayer {
    /// outputs x inputs
    weights: DMatrix<f64>,
    bias: DVector<f64>,
    activation: Activation,
}

impl DenseLayer {
    /// Glorot-uniform weights, zero bias
    fn glorot<R: Rng + ?Sized>(
        inputs: usize,
        outputs: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let limit = (6.0 / (inputs + outputs) as f64).sqrt();
        Self {
            weights: DMatrix::from_fn(outputs, inputs, |_, _| rng.gen_range(-limit..limit)),
            bias: DVector::zeros(outputs),
            activation,
        }
    }

    fn forward(&self, input: &DVector<f64>) -> DVector<f64> {
        self.activation.apply(&(&self.weights * input + &self.bias))
    }
}

/// Per-layer gradient (or Adam moment) buffers
struct Gradients {
    weights: Vec<DMatrix<f64>>,
    bias: Vec<DVector<f64>>,
}

impl Gradients {
    fn zeros_like(layers: &[DenseLayer]) -> Self {
        Self {
            weights: layers
                .iter()
                .map(|l| DMatrix::zeros(l.weights.nrows(), l.weights.ncols()))
                .collect(),
            bias: layers.iter().map(|l| DVector::zeros(l.bias.len())).collect(),
        }
    }

    fn scale(&mut self, factor: f64) {
        for w in &mut self.weights {
            *w *= factor;
        }
        for b in &mut self.bias {
            *b *= factor;
        }
    }
}

/// Adam optimiser state
struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    step: i32,
    m: Gradients,
    v: Gradients,
}

impl Adam {
    fn new(layers: &[DenseLayer], learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            step: 0,
            m: Gradients::zeros_like(layers),
            v: Gradients::zeros_like(layers),
        }
    }

    fn apply(&mut self, layers: &mut [DenseLayer], grads: &Gradients) {
        self.step += 1;
        let lr_t = self.learning_rate * (1.0 - self.beta2.powi(self.step)).sqrt()
            / (1.0 - self.beta1.powi(self.step));

        for (l, layer) in layers.iter_mut().enumerate() {
            self.update(
                layer.weights.as_mut_slice(),
                grads.weights[l].as_slice(),
                l,
                false,
                lr_t,
            );
            self.update(
                layer.bias.as_mut_slice(),
                grads.bias[l].as_slice(),
                l,
                true,
                lr_t,
            );
        }
    }

    fn update(&mut self, params: &mut [f64], grads: &[f64], layer: usize, bias: bool, lr_t: f64) {
        let (m, v) = if bias {
            (
                self.m.bias[layer].as_mut_slice(),
                self.v.bias[layer].as_mut_slice(),
            )
        } else {
            (
                self.m.weights[layer].as_mut_slice(),
                self.v.weights[layer].as_mut_slice(),
            )
        };

        for i in 0..params.len() {
            let g = grads[i];
            m[i] = self.beta1 * m[i] + (1.0 - self.beta1) * g;
            v[i] = self.beta2 * v[i] + (1.0 - self.beta2) * g * g;
            params[i] -= lr_t * m[i] / (v[i].sqrt() + self.epsilon);
        }
    }
}

/// Dense feed-forward classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedForwardNetwork {
    layers: Vec<DenseLayer>,
    training: TrainingConfig,
}

impl FeedForwardNetwork {
    /// Create an untrained network with seeded Glorot initialisation
    pub fn new(training: TrainingConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(training.seed);

        let mut widths = vec![NUM_FEATURES];
        widths.extend(HIDDEN_LAYERS);
        widths.push(NUM_CLASSES);

        let last = widths.len() - 2;
        let layers = widths
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                let activation = if i == last {
                    Activation::Softmax
                } else {
                    Activation::Relu
                };
                DenseLayer::glorot(w[0], w[1], activation, &mut rng)
            })
            .collect();

        Self { layers, training }
    }

    /// Training hyper-parameters
    pub fn training_config(&self) -> &TrainingConfig {
        &self.training
    }

    /// Width of every layer, input included
    pub fn layer_widths(&self) -> Vec<usize> {
        let mut widths = Vec::with_capacity(self.layers.len() + 1);
        if let Some(first) = self.layers.first() {
            widths.push(first.weights.ncols());
        }
        widths.extend(self.layers.iter().map(|l| l.weights.nrows()));
        widths
    }

    /// Number of trainable parameters
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.bias.len())
            .sum()
    }

    /// Save the network as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ClassifierError> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        info!("Model saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Load a network saved with [`FeedForwardNetwork::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let file = File::open(path.as_ref())?;
        let network: Self = serde_json::from_reader(BufReader::new(file))?;
        network.validate()?;
        info!(
            "Model loaded from {} ({} parameters)",
            path.as_ref().display(),
            network.parameter_count()
        );
        Ok(network)
    }

    fn validate(&self) -> Result<(), ClassifierError> {
        let (first, last) = match (self.layers.first(), self.layers.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ClassifierError::InvalidModel("no layers".to_string())),
        };

        if first.weights.ncols() != NUM_FEATURES {
            return Err(ClassifierError::InvalidModel(format!(
                "input width {} (expected {})",
                first.weights.ncols(),
                NUM_FEATURES
            )));
        }
        if last.weights.nrows() != NUM_CLASSES || last.activation != Activation::Softmax {
            return Err(ClassifierError::InvalidModel(format!(
                "output layer must be a {}-way softmax",
                NUM_CLASSES
            )));
        }

        for (i, layer) in self.layers.iter().enumerate() {
            if layer.bias.len() != layer.weights.nrows() {
                return Err(ClassifierError::InvalidModel(format!(
                    "layer {} bias length {} does not match {} outputs",
                    i,
                    layer.bias.len(),
                    layer.weights.nrows()
                )));
            }
            if i + 1 < self.layers.len() {
                if layer.activation != Activation::Relu {
                    return Err(ClassifierError::InvalidModel(format!(
                        "hidden layer {} must use ReLU",
                        i
                    )));
                }
                if self.layers[i + 1].weights.ncols() != layer.weights.nrows() {
                    return Err(ClassifierError::InvalidModel(format!(
                        "layer {} outputs {} values but layer {} expects {}",
                        i,
                        layer.weights.nrows(),
                        i + 1,
                        self.layers[i + 1].weights.ncols()
                    )));
                }
            }
        }

        Ok(())
    }

    fn forward(&self, input: &DVector<f64>) -> DVector<f64> {
        self.layers
            .iter()
            .fold(input.clone(), |activation, layer| layer.forward(&activation))
    }

    /// Forward and backward pass for one sample; adds into `grads`.
    ///
    /// Returns the sample's cross-entropy and whether it was classified
    /// correctly.
    fn backpropagate<R: Rng + ?Sized>(
        &self,
        input: &DVector<f64>,
        target: usize,
        dropout: f64,
        rng: &mut R,
        grads: &mut Gradients,
    ) -> (f64, bool) {
        let mut activations: Vec<DVector<f64>> = Vec::with_capacity(self.layers.len() + 1);
        let mut masks: Vec<Option<DVector<f64>>> = Vec::with_capacity(self.layers.len());
        activations.push(input.clone());

        for (i, layer) in self.layers.iter().enumerate() {
            let mut a = layer.forward(&activations[i]);
            let mask = if i == 0 && dropout > 0.0 {
                let keep = 1.0 - dropout;
                let m = DVector::from_fn(a.len(), |_, _| {
                    if rng.gen::<f64>() < dropout {
                        0.0
                    } else {
                        1.0 / keep
                    }
                });
                a.component_mul_assign(&m);
                Some(m)
            } else {
                None
            };
            masks.push(mask);
            activations.push(a);
        }

        let output = &activations[self.layers.len()];
        let loss = -output[target].max(MIN_PROBABILITY).ln();
        let hit = output.argmax().0 == target;

        // softmax + cross-entropy
        let mut delta = output.clone();
        delta[target] -= 1.0;

        for l in (0..self.layers.len()).rev() {
            grads.weights[l] += &delta * activations[l].transpose();
            grads.bias[l] += &delta;

            if l > 0 {
                let upstream = self.layers[l].weights.transpose() * &delta;
                let previous = &activations[l];
                let mask = masks[l - 1].as_ref();
                delta = DVector::from_fn(upstream.len(), |i, _| {
                    if previous[i] > 0.0 {
                        upstream[i] * mask.map_or(1.0, |m| m[i])
                    } else {
                        0.0
                    }
                });
            }
        }

        (loss, hit)
    }
}

impl Default for FeedForwardNetwork {
    fn default() -> Self {
        Self::new(TrainingConfig::default())
    }
}

impl Classifier for FeedForwardNetwork {
    fn train(
        &mut self,
        features: &[FeatureVector],
        labels: &[ConditionClass],
    ) -> Result<TrainingSummary, ClassifierError> {
        if features.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        if features.len() != labels.len() {
            return Err(ClassifierError::ShapeMismatch {
                expected: features.len(),
                actual: labels.len(),
            });
        }

        let config = self.training.clone();
        let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
        let inputs: Vec<DVector<f64>> = features
            .iter()
            .map(|f| DVector::from_row_slice(f))
            .collect();
        let n = inputs.len() as f64;

        let mut optimizer = Adam::new(&self.layers, config.learning_rate);
        let mut order: Vec<usize> = (0..inputs.len()).collect();
        let mut summary = TrainingSummary {
            epochs: config.epochs,
            samples: inputs.len(),
            final_loss: 0.0,
            final_accuracy: 0.0,
        };

        for epoch in 0..config.epochs {
            order.shuffle(&mut rng);
            let mut epoch_loss = 0.0;
            let mut correct = 0usize;

            for batch in order.chunks(config.batch_size.max(1)) {
                let mut grads = Gradients::zeros_like(&self.layers);
                for &idx in batch {
                    let (loss, hit) = self.backpropagate(
                        &inputs[idx],
                        labels[idx].index(),
                        config.dropout,
                        &mut rng,
                        &mut grads,
                    );
                    epoch_loss += loss;
                    if hit {
                        correct += 1;
                    }
                }
                grads.scale(1.0 / batch.len() as f64);
                optimizer.apply(&mut self.layers, &grads);
            }

            summary.final_loss = epoch_loss / n;
            summary.final_accuracy = correct as f64 / n;
            debug!(
                "Epoch {}/{}: loss={:.4} accuracy={:.3}",
                epoch + 1,
                config.epochs,
                summary.final_loss,
                summary.final_accuracy
            );
        }

        info!(
            "Trained on {} samples for {} epochs (loss {:.4}, accuracy {:.1}%)",
            summary.samples,
            summary.epochs,
            summary.final_loss,
            summary.final_accuracy * 100.0
        );

        Ok(summary)
    }

    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>, ClassifierError> {
        let output = self.forward(&DVector::from_row_slice(features));
        Ok(output.iter().copied().collect())
    }

    fn info(&self) -> Option<ModelInfo> {
        Some(ModelInfo {
            input_size: NUM_FEATURES,
            output_size: NUM_CLASSES,
            layer_widths: self.layer_widths(),
            parameter_count: self.parameter_count(),
        })
    }
}
