//! Dense feed-forward net with a scalar output head: forward inference plus
//! a one-epoch Adam training pass on mean absolute error.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::spec::{Activation, NetSpec};

// Adam moment decay and stability constants.
const ADAM_BETA1: f32 = 0.9;
const ADAM_BETA2: f32 = 0.999;
const ADAM_EPS: f32 = 1e-7;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("invalid net spec: {msg}")]
    InvalidSpec { msg: &'static str },
    #[error("bad input: expected {expected} features, got {got}")]
    BadInput { expected: usize, got: usize },
    #[error("invalid training options: {msg}")]
    InvalidOptions { msg: &'static str },
    #[error("training diverged to a non-finite loss")]
    NonFinite,
}

/// Options for one `fit` call.
#[derive(Debug, Clone, Copy)]
pub struct TrainOptions {
    /// Minibatch size within an epoch.
    pub batch_size: usize,
    /// Adam learning rate.
    pub learning_rate: f32,
    /// Passes over the batch per `fit` call.
    pub epochs: u32,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            batch_size: 32,
            learning_rate: 1e-3,
            epochs: 1,
        }
    }
}

pub(crate) struct Dense {
    pub(crate) inputs: usize,
    pub(crate) outputs: usize,
    pub(crate) activation: Activation,
    // Row-major [outputs, inputs].
    pub(crate) w: Vec<f32>,
    pub(crate) b: Vec<f32>,
    // Adam first/second moment estimates, same shapes as w/b.
    m_w: Vec<f32>,
    v_w: Vec<f32>,
    m_b: Vec<f32>,
    v_b: Vec<f32>,
}

impl Dense {
    fn new(inputs: usize, outputs: usize, activation: Activation, rng: &mut ChaCha8Rng) -> Self {
        // Glorot-uniform weights, zero biases.
        let limit = (6.0 / (inputs + outputs) as f32).sqrt();
        let w = (0..outputs * inputs)
            .map(|_| rng.gen_range(-limit..limit))
            .collect();
        Self {
            inputs,
            outputs,
            activation,
            w,
            b: vec![0.0; outputs],
            m_w: vec![0.0; outputs * inputs],
            v_w: vec![0.0; outputs * inputs],
            m_b: vec![0.0; outputs],
            v_b: vec![0.0; outputs],
        }
    }

    fn forward(&self, input: &[f32], out: &mut Vec<f32>) {
        out.clear();
        out.reserve(self.outputs);
        for o in 0..self.outputs {
            let row = &self.w[o * self.inputs..(o + 1) * self.inputs];
            let mut sum = self.b[o];
            for (wi, xi) in row.iter().zip(input.iter()) {
                sum += wi * xi;
            }
            out.push(match self.activation {
                Activation::Relu => {
                    if sum > 0.0 {
                        sum
                    } else {
                        0.0
                    }
                }
                Activation::Linear => sum,
            });
        }
    }

    pub(crate) fn reset_optimizer(&mut self) {
        self.m_w.iter_mut().for_each(|x| *x = 0.0);
        self.v_w.iter_mut().for_each(|x| *x = 0.0);
        self.m_b.iter_mut().for_each(|x| *x = 0.0);
        self.v_b.iter_mut().for_each(|x| *x = 0.0);
    }
}

/// A trainable dense net. Construction fixes the architecture; only the
/// parameters change afterwards, via `fit` or a persistence load.
pub struct Net {
    pub(crate) spec: NetSpec,
    pub(crate) layers: Vec<Dense>,
    seed: u64,
    // Adam timestep, shared across layers.
    pub(crate) step: u64,
    epochs_run: u64,
}

impl Net {
    pub fn new(spec: NetSpec, seed: u64) -> Result<Self, NetError> {
        validate_spec(&spec)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let layers = spec
            .layers
            .iter()
            .map(|l| Dense::new(l.inputs, l.outputs, l.activation, &mut rng))
            .collect();
        Ok(Self {
            spec,
            layers,
            seed,
            step: 0,
            epochs_run: 0,
        })
    }

    pub fn spec(&self) -> &NetSpec {
        &self.spec
    }

    pub fn num_inputs(&self) -> usize {
        self.spec.num_inputs()
    }

    /// One forward pass. Deterministic for fixed parameters, no side effects.
    pub fn predict(&self, input: &[f32]) -> Result<f32, NetError> {
        if input.len() != self.num_inputs() {
            return Err(NetError::BadInput {
                expected: self.num_inputs(),
                got: input.len(),
            });
        }
        let mut cur = input.to_vec();
        let mut next = Vec::new();
        for layer in &self.layers {
            layer.forward(&cur, &mut next);
            std::mem::swap(&mut cur, &mut next);
        }
        Ok(cur[0])
    }

    /// Run `opts.epochs` optimization passes over the batch, shuffled per
    /// epoch and split into minibatches, minimizing mean absolute error with
    /// Adam. Returns the last epoch's mean absolute error.
    ///
    /// A non-finite loss aborts immediately with `NetError::NonFinite`;
    /// there is no retry and no rollback of updates already applied.
    pub fn fit<S: AsRef<[f32]>>(
        &mut self,
        inputs: &[S],
        targets: &[f32],
        opts: &TrainOptions,
    ) -> Result<f32, NetError> {
        if inputs.len() != targets.len() {
            return Err(NetError::InvalidOptions {
                msg: "inputs and targets must have equal length",
            });
        }
        if inputs.is_empty() {
            return Err(NetError::InvalidOptions {
                msg: "training batch must not be empty",
            });
        }
        if opts.batch_size == 0 {
            return Err(NetError::InvalidOptions {
                msg: "batch_size must be > 0",
            });
        }
        if opts.epochs == 0 {
            return Err(NetError::InvalidOptions {
                msg: "epochs must be > 0",
            });
        }
        let expected = self.num_inputs();
        for input in inputs {
            let got = input.as_ref().len();
            if got != expected {
                return Err(NetError::BadInput { expected, got });
            }
        }

        let n = inputs.len();
        let mut epoch_err = 0.0f32;
        for _ in 0..opts.epochs {
            let mut order: Vec<usize> = (0..n).collect();
            let mut rng = ChaCha8Rng::seed_from_u64(
                self.seed ^ self.epochs_run.wrapping_mul(0x9E37_79B9_7F4A_7C15),
            );
            order.shuffle(&mut rng);

            let mut abs_err_sum = 0.0f64;
            for chunk in order.chunks(opts.batch_size) {
                let batch_err = self.fit_minibatch(inputs, targets, chunk, opts.learning_rate)?;
                abs_err_sum += f64::from(batch_err) * chunk.len() as f64;
            }
            epoch_err = (abs_err_sum / n as f64) as f32;
            self.epochs_run += 1;
        }
        Ok(epoch_err)
    }

    /// Forward, caching each layer's post-activation output in `acts`.
    fn forward_cached(&self, input: &[f32], acts: &mut Vec<Vec<f32>>) {
        acts.clear();
        for (i, layer) in self.layers.iter().enumerate() {
            let mut out = Vec::new();
            {
                let cur: &[f32] = if i == 0 { input } else { &acts[i - 1] };
                layer.forward(cur, &mut out);
            }
            acts.push(out);
        }
    }

    fn fit_minibatch<S: AsRef<[f32]>>(
        &mut self,
        inputs: &[S],
        targets: &[f32],
        chunk: &[usize],
        learning_rate: f32,
    ) -> Result<f32, NetError> {
        let num_layers = self.layers.len();
        let mut grad_w: Vec<Vec<f32>> = self.layers.iter().map(|l| vec![0.0; l.w.len()]).collect();
        let mut grad_b: Vec<Vec<f32>> = self.layers.iter().map(|l| vec![0.0; l.b.len()]).collect();

        let mut acts: Vec<Vec<f32>> = Vec::with_capacity(num_layers);
        let mut loss_sum = 0.0f32;
        let scale = 1.0 / chunk.len() as f32;

        for &idx in chunk {
            let input = inputs[idx].as_ref();
            self.forward_cached(input, &mut acts);
            let y = acts[num_layers - 1][0];
            let err = y - targets[idx];
            loss_sum += err.abs();

            // MAE subgradient at the scalar output, averaged over the batch.
            let dl = if err > 0.0 {
                scale
            } else if err < 0.0 {
                -scale
            } else {
                0.0
            };

            let mut da = vec![dl];
            for l in (0..num_layers).rev() {
                let layer = &self.layers[l];
                // dz folds the activation derivative into da.
                let mut dz = da;
                if layer.activation == Activation::Relu {
                    for (g, &a) in dz.iter_mut().zip(acts[l].iter()) {
                        if a <= 0.0 {
                            *g = 0.0;
                        }
                    }
                }
                let prev: &[f32] = if l == 0 { input } else { &acts[l - 1] };
                for o in 0..layer.outputs {
                    let g = dz[o];
                    if g != 0.0 {
                        let row = o * layer.inputs;
                        for (slot, &p) in grad_w[l][row..row + layer.inputs].iter_mut().zip(prev) {
                            *slot += g * p;
                        }
                    }
                    grad_b[l][o] += g;
                }
                if l == 0 {
                    break;
                }
                let mut da_prev = vec![0.0f32; layer.inputs];
                for o in 0..layer.outputs {
                    let g = dz[o];
                    if g != 0.0 {
                        let row = &layer.w[o * layer.inputs..(o + 1) * layer.inputs];
                        for (slot, &w) in da_prev.iter_mut().zip(row) {
                            *slot += g * w;
                        }
                    }
                }
                da = da_prev;
            }
        }

        let batch_err = loss_sum / chunk.len() as f32;
        if !batch_err.is_finite() {
            return Err(NetError::NonFinite);
        }

        self.adam_step(learning_rate, &grad_w, &grad_b);
        Ok(batch_err)
    }

    fn adam_step(&mut self, learning_rate: f32, grad_w: &[Vec<f32>], grad_b: &[Vec<f32>]) {
        self.step += 1;
        let t = self.step.min(i32::MAX as u64) as i32;
        let bc1 = 1.0 - ADAM_BETA1.powi(t);
        let bc2 = 1.0 - ADAM_BETA2.powi(t);

        for (l, layer) in self.layers.iter_mut().enumerate() {
            adam_update(
                &mut layer.w,
                &mut layer.m_w,
                &mut layer.v_w,
                &grad_w[l],
                learning_rate,
                bc1,
                bc2,
            );
            adam_update(
                &mut layer.b,
                &mut layer.m_b,
                &mut layer.v_b,
                &grad_b[l],
                learning_rate,
                bc1,
                bc2,
            );
        }
    }

    /// Forget optimizer state, e.g. after parameters were replaced by a load.
    pub(crate) fn reset_optimizer(&mut self) {
        self.step = 0;
        for layer in &mut self.layers {
            layer.reset_optimizer();
        }
    }
}

fn adam_update(
    params: &mut [f32],
    m: &mut [f32],
    v: &mut [f32],
    grad: &[f32],
    learning_rate: f32,
    bc1: f32,
    bc2: f32,
) {
    for i in 0..params.len() {
        let g = grad[i];
        m[i] = ADAM_BETA1 * m[i] + (1.0 - ADAM_BETA1) * g;
        v[i] = ADAM_BETA2 * v[i] + (1.0 - ADAM_BETA2) * g * g;
        let m_hat = m[i] / bc1;
        let v_hat = v[i] / bc2;
        params[i] -= learning_rate * m_hat / (v_hat.sqrt() + ADAM_EPS);
    }
}

fn validate_spec(spec: &NetSpec) -> Result<(), NetError> {
    if spec.layers.is_empty() {
        return Err(NetError::InvalidSpec {
            msg: "spec must have at least one layer",
        });
    }
    for layer in &spec.layers {
        if layer.inputs == 0 || layer.outputs == 0 {
            return Err(NetError::InvalidSpec {
                msg: "layer widths must be > 0",
            });
        }
    }
    for pair in spec.layers.windows(2) {
        if pair[0].outputs != pair[1].inputs {
            return Err(NetError::InvalidSpec {
                msg: "consecutive layer widths must chain",
            });
        }
    }
    if spec.num_outputs() != 1 {
        return Err(NetError::InvalidSpec {
            msg: "output head must be scalar",
        });
    }
    Ok(())
}
