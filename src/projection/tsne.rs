use std::ops::ControlFlow;

use ndarray::{Array2, ArrayView2, Axis};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use super::{Progress, Project, OUTPUT_DIMS};
use crate::error::{Error, Result};

const EXAGGERATION: f32 = 4.0;
const EXAGGERATION_ITERS: usize = 100;
const INITIAL_MOMENTUM: f32 = 0.5;
const FINAL_MOMENTUM: f32 = 0.8;
const MOMENTUM_SWITCH_ITER: usize = 250;
const MIN_GAIN: f32 = 0.01;
const MIN_PROB: f32 = 1e-12;
const PERPLEXITY_TOLERANCE: f32 = 1e-5;
const PERPLEXITY_SEARCH_STEPS: usize = 50;
const INIT_SCALE: f32 = 1e-4;

/// Exact t-distributed stochastic neighbor embedding.
///
/// Time and memory are quadratic in the number of rows, so the input
/// should be limited to a few thousand embeddings.
#[derive(Clone, Debug)]
pub struct Tsne {
    perplexity: f32,
    learning_rate: f32,
    iterations: usize,
    seed: u64,
}

impl Tsne {
    /// Construct a t-SNE projection.
    ///
    /// `perplexity` is the effective number of neighbors of each point,
    /// typical values are in *[5, 50]*. Fails when `perplexity` or
    /// `learning_rate` is not positive.
    pub fn new(perplexity: f32, learning_rate: f32, iterations: usize) -> Result<Self> {
        if !(perplexity > 0.) {
            return Err(Error::Config(format!(
                "perplexity should be positive, was {}",
                perplexity
            )));
        }

        if !(learning_rate > 0.) {
            return Err(Error::Config(format!(
                "learning rate should be positive, was {}",
                learning_rate
            )));
        }

        Ok(Tsne {
            perplexity,
            learning_rate,
            iterations,
            seed: 0,
        })
    }

    /// Set the seed of the random number generator used for initialization.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Get the number of gradient descent iterations.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Get the gradient descent learning rate.
    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Get the perplexity of the input neighborhoods.
    pub fn perplexity(&self) -> f32 {
        self.perplexity
    }

    /// Joint probabilities of the input space.
    fn joint_probabilities(&self, data: ArrayView2<f32>) -> Array2<f32> {
        let n = data.nrows();
        let distances = squared_distances(data);
        let mut conditional = Array2::zeros((n, n));

        let target_entropy = self.perplexity.ln();
        for i in 0..n {
            // Shifting by the smallest distance does not change the
            // normalized probabilities, but avoids underflow.
            let min_dist = (0..n)
                .filter(|&j| j != i)
                .map(|j| distances[(i, j)])
                .fold(f32::INFINITY, f32::min);

            let mut beta = 1.0f32;
            let mut beta_min = f32::NEG_INFINITY;
            let mut beta_max = f32::INFINITY;

            for _ in 0..PERPLEXITY_SEARCH_STEPS {
                let mut sum = 0.;
                for j in 0..n {
                    let p = if i == j {
                        0.
                    } else {
                        (-beta * (distances[(i, j)] - min_dist)).exp()
                    };
                    conditional[(i, j)] = p;
                    sum += p;
                }

                let mut entropy = 0.;
                if sum > 0. {
                    for j in 0..n {
                        let p = conditional[(i, j)] / sum;
                        conditional[(i, j)] = p;
                        if p > MIN_PROB {
                            entropy -= p * p.ln();
                        }
                    }
                }

                let diff = entropy - target_entropy;
                if diff.abs() < PERPLEXITY_TOLERANCE {
                    break;
                }

                if diff > 0. {
                    beta_min = beta;
                    beta = if beta_max.is_infinite() {
                        beta * 2.
                    } else {
                        (beta + beta_max) / 2.
                    };
                } else {
                    beta_max = beta;
                    beta = if beta_min.is_infinite() {
                        beta / 2.
                    } else {
                        (beta + beta_min) / 2.
                    };
                }
            }
        }

        let mut joint = &conditional + &conditional.t();
        let normalizer = 2. * n as f32;
        joint.mapv_inplace(|p| (p / normalizer).max(MIN_PROB));
        joint
    }
}

impl Project for Tsne {
    fn project<F>(&self, data: ArrayView2<f32>, mut progress: F) -> Result<Array2<f32>>
    where
        F: FnMut(Progress) -> ControlFlow<()>,
    {
        let n = data.nrows();
        if n < 2 {
            return Ok(Array2::zeros((n, OUTPUT_DIMS)));
        }

        let p = self.joint_probabilities(data);

        let mut rng = XorShiftRng::seed_from_u64(self.seed);
        let mut y = Array2::from_shape_fn((n, OUTPUT_DIMS), |_| {
            rng.gen_range(-INIT_SCALE..INIT_SCALE)
        });
        let mut update = Array2::<f32>::zeros((n, OUTPUT_DIMS));
        let mut gains = Array2::<f32>::ones((n, OUTPUT_DIMS));
        let mut num = Array2::<f32>::zeros((n, n));
        let mut grad = Array2::<f32>::zeros((n, OUTPUT_DIMS));

        for iteration in 0..self.iterations {
            let exaggeration = if iteration < EXAGGERATION_ITERS {
                EXAGGERATION
            } else {
                1.
            };
            let momentum = if iteration < MOMENTUM_SWITCH_ITER {
                INITIAL_MOMENTUM
            } else {
                FINAL_MOMENTUM
            };

            // Student-t kernel in the output space.
            let mut num_sum = 0.;
            for i in 0..n {
                num[(i, i)] = 0.;
                for j in (i + 1)..n {
                    let dist = (0..OUTPUT_DIMS)
                        .map(|k| (y[(i, k)] - y[(j, k)]).powi(2))
                        .sum::<f32>();
                    let v = 1. / (1. + dist);
                    num[(i, j)] = v;
                    num[(j, i)] = v;
                    num_sum += 2. * v;
                }
            }

            grad.fill(0.);
            let mut divergence = 0.;
            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        continue;
                    }

                    let q = (num[(i, j)] / num_sum).max(MIN_PROB);
                    divergence += p[(i, j)] * (p[(i, j)] / q).ln();

                    let factor = 4. * (exaggeration * p[(i, j)] - q) * num[(i, j)];
                    for k in 0..OUTPUT_DIMS {
                        grad[(i, k)] += factor * (y[(i, k)] - y[(j, k)]);
                    }
                }
            }

            for ((g, u), gain) in grad.iter().zip(update.iter_mut()).zip(gains.iter_mut()) {
                *gain = if (*g > 0.) != (*u > 0.) {
                    *gain + 0.2
                } else {
                    *gain * 0.8
                }
                .max(MIN_GAIN);
                *u = momentum * *u - self.learning_rate * *gain * *g;
            }
            y += &update;

            if let Some(mean) = y.mean_axis(Axis(0)) {
                y -= &mean;
            }

            let flow = progress(Progress {
                iteration,
                divergence,
                embedding: y.view(),
            });
            if flow.is_break() {
                break;
            }
        }

        Ok(y)
    }
}

fn squared_distances(data: ArrayView2<f32>) -> Array2<f32> {
    let n = data.nrows();
    let mut distances = Array2::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n {
            let diff = &data.row(i) - &data.row(j);
            let dist = diff.dot(&diff);
            distances[(i, j)] = dist;
            distances[(j, i)] = dist;
        }
    }

    distances
}
