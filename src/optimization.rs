use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{EnrichError, Result};

/// link family for the regression - tagged variant, no string dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// linear link, least squares loss
    Gaussian,
    /// logistic link, binomial deviance loss
    Binomial,
}

/// configuration for the elastic net solver
#[derive(Debug, Clone)]
pub struct ElasticNetConfig {
    pub family: Family,
    pub alpha: f64, // mixing: 1 -> pure lasso, 0 -> pure ridge
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for ElasticNetConfig {
    fn default() -> Self {
        Self {
            family: Family::Gaussian,
            alpha: 0.5,
            max_iterations: 1000,
            tolerance: 1e-7,
        }
    }
}

/// fitted coefficients along a lambda grid
#[derive(Debug, Clone)]
pub struct ElasticNetPath {
    pub lambdas: Array1<f64>,
    pub intercepts: Array1<f64>,
    pub coefficients: Array2<f64>, // n_lambda x n_features
}

// keep coefficients bounded when the logistic fit wants to run off to
// infinity on separable data
const COEF_BOUND: f64 = 30.0;
const PROB_CLIP: f64 = 1e-5;

/// log-spaced decreasing lambda grid, from the smallest lambda that zeroes
/// every coefficient down to `lambda_max * min_ratio`
pub fn lambda_path(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    alpha: f64,
    n_lambda: usize,
    min_ratio: f64,
) -> Result<Array1<f64>> {
    if n_lambda < 2 {
        return Err(EnrichError::invalid_parameter("n_lambda", n_lambda.to_string()));
    }
    if x.nrows() != y.len() {
        return Err(EnrichError::invalid_dimensions(
            format!("x rows ({}) != y len ({})", x.nrows(), y.len()),
        ));
    }

    let n = x.nrows() as f64;
    let y_mean = y.sum() / n;

    // max absolute gradient at beta = 0, alpha-scaled like glmnet; the
    // alpha floor keeps pure ridge finite
    let mut max_grad = 0.0_f64;
    for j in 0..x.ncols() {
        let g: f64 = x
            .column(j)
            .iter()
            .zip(y.iter())
            .map(|(&xij, &yi)| xij * (yi - y_mean))
            .sum();
        max_grad = max_grad.max((g / n).abs());
    }

    // nudge above the exact threshold so the largest lambda zeroes every
    // coefficient even under float rounding
    let lambda_max = (max_grad / alpha.max(1e-3)).max(1e-3) * 1.000001;
    let log_max = lambda_max.ln();
    let log_min = (lambda_max * min_ratio).ln();
    let step = (log_min - log_max) / (n_lambda - 1) as f64;

    Ok(Array1::from_iter(
        (0..n_lambda).map(|i| (log_max + step * i as f64).exp()),
    ))
}

/// elastic net solver - cyclic coordinate descent w/ soft thresholding,
/// IRLS wrapped around it for the binomial family
pub struct ElasticNetSolver {
    config: ElasticNetConfig,
}

impl ElasticNetSolver {
    pub fn new(config: ElasticNetConfig) -> Self {
        Self { config }
    }

    /// fit the whole lambda grid with warm starts, largest lambda first
    pub fn fit_path(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        lambdas: ArrayView1<f64>,
    ) -> Result<ElasticNetPath> {
        if x.nrows() != y.len() {
            return Err(EnrichError::invalid_dimensions(
                format!("x rows ({}) != y len ({})", x.nrows(), y.len()),
            ));
        }
        if x.nrows() == 0 {
            return Err(EnrichError::invalid_dimensions("no samples to fit"));
        }

        let n_lambda = lambdas.len();
        let n_features = x.ncols();

        let mut intercepts = Array1::zeros(n_lambda);
        let mut coefficients = Array2::zeros((n_lambda, n_features));

        // cold start at the null model so the top of the path stays sparse
        let mut beta = Array1::zeros(n_features);
        let y_mean = y.sum() / y.len() as f64;
        let mut b0 = match self.config.family {
            Family::Gaussian => y_mean,
            Family::Binomial => {
                let p = y_mean.clamp(PROB_CLIP, 1.0 - PROB_CLIP);
                (p / (1.0 - p)).ln()
            }
        };

        for (l, &lambda) in lambdas.iter().enumerate() {
            match self.config.family {
                Family::Gaussian => self.fit_gaussian(x, y, lambda, &mut beta, &mut b0)?,
                Family::Binomial => self.fit_binomial(x, y, lambda, &mut beta, &mut b0)?,
            }
            intercepts[l] = b0;
            coefficients.row_mut(l).assign(&beta);
        }

        Ok(ElasticNetPath {
            lambdas: lambdas.to_owned(),
            intercepts,
            coefficients,
        })
    }

    /// fit a single lambda, warm-starting from the supplied coefficients
    pub fn fit_single(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        lambda: f64,
        beta: &mut Array1<f64>,
        intercept: &mut f64,
    ) -> Result<()> {
        match self.config.family {
            Family::Gaussian => self.fit_gaussian(x, y, lambda, beta, intercept),
            Family::Binomial => self.fit_binomial(x, y, lambda, beta, intercept),
        }
    }

    fn fit_gaussian(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        lambda: f64,
        beta: &mut Array1<f64>,
        b0: &mut f64,
    ) -> Result<()> {
        let n = x.nrows() as f64;
        let n_features = x.ncols();
        let l1 = lambda * self.config.alpha;
        let l2 = lambda * (1.0 - self.config.alpha);

        // (1/n) sum x_ij^2 per column; zero-variance columns never move
        let col_sq: Vec<f64> = (0..n_features)
            .map(|j| x.column(j).iter().map(|&v| v * v).sum::<f64>() / n)
            .collect();

        // residual r = y - b0 - x.beta, maintained incrementally
        let mut residual = &y.to_owned() - &x.dot(beta);
        residual -= *b0;

        for _iteration in 0..self.config.max_iterations {
            let mut max_change = 0.0_f64;

            for j in 0..n_features {
                if col_sq[j] == 0.0 {
                    continue;
                }

                let old = beta[j];
                // gradient on the partial residual (add the j-th term back)
                let g: f64 = x
                    .column(j)
                    .iter()
                    .zip(residual.iter())
                    .map(|(&xij, &ri)| xij * ri)
                    .sum::<f64>()
                    / n
                    + col_sq[j] * old;

                let new = soft_threshold(g, l1) / (col_sq[j] + l2);
                if new != old {
                    let delta = new - old;
                    residual.scaled_add(-delta, &x.column(j));
                    beta[j] = new;
                    max_change = max_change.max(delta.abs());
                }
            }

            // intercept is unpenalized - plain mean of the residual
            let delta_b0 = residual.sum() / n;
            if delta_b0 != 0.0 {
                *b0 += delta_b0;
                residual -= delta_b0;
                max_change = max_change.max(delta_b0.abs());
            }

            if beta.iter().any(|&b| !b.is_finite()) || !b0.is_finite() {
                return Err(EnrichError::numerical_error(
                    "coefficients became non-finite during coordinate descent",
                ));
            }

            if max_change < self.config.tolerance {
                return Ok(());
            }
        }

        Err(EnrichError::optimization_failed(
            format!("coordinate descent did not converge at lambda = {lambda:.6}"),
        ))
    }

    fn fit_binomial(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        lambda: f64,
        beta: &mut Array1<f64>,
        b0: &mut f64,
    ) -> Result<()> {
        let n = x.nrows() as f64;
        let n_features = x.ncols();
        let l1 = lambda * self.config.alpha;
        let l2 = lambda * (1.0 - self.config.alpha);
        let max_outer = 100;

        for _outer in 0..max_outer {
            let beta_prev = beta.clone();
            let b0_prev = *b0;

            // IRLS weights and working residual at the current estimate
            let eta = &x.dot(beta) + *b0;
            let prob = eta.mapv(|e| sigmoid(e).clamp(PROB_CLIP, 1.0 - PROB_CLIP));
            let weights = prob.mapv(|p| (p * (1.0 - p)).max(PROB_CLIP));
            // working response z = eta + (y - p)/w, so z - eta is the residual
            let mut residual = Array1::from_iter(
                y.iter()
                    .zip(prob.iter())
                    .zip(weights.iter())
                    .map(|((&yi, &pi), &wi)| (yi - pi) / wi),
            );

            let wx2: Vec<f64> = (0..n_features)
                .map(|j| {
                    x.column(j)
                        .iter()
                        .zip(weights.iter())
                        .map(|(&xij, &wi)| wi * xij * xij)
                        .sum::<f64>()
                        / n
                })
                .collect();
            let weight_sum: f64 = weights.sum();

            // weighted coordinate descent on the working response
            let mut inner_converged = false;
            for _inner in 0..self.config.max_iterations {
                let mut max_change = 0.0_f64;

                for j in 0..n_features {
                    if wx2[j] == 0.0 {
                        continue;
                    }

                    let old = beta[j];
                    let g: f64 = x
                        .column(j)
                        .iter()
                        .zip(residual.iter())
                        .zip(weights.iter())
                        .map(|((&xij, &ri), &wi)| wi * xij * ri)
                        .sum::<f64>()
                        / n
                        + wx2[j] * old;

                    let new = (soft_threshold(g, l1) / (wx2[j] + l2)).clamp(-COEF_BOUND, COEF_BOUND);
                    if new != old {
                        let delta = new - old;
                        residual.scaled_add(-delta, &x.column(j));
                        beta[j] = new;
                        max_change = max_change.max(delta.abs());
                    }
                }

                let delta_b0: f64 = residual
                    .iter()
                    .zip(weights.iter())
                    .map(|(&ri, &wi)| wi * ri)
                    .sum::<f64>()
                    / weight_sum;
                let clamped_b0 = (*b0 + delta_b0).clamp(-COEF_BOUND, COEF_BOUND);
                let applied = clamped_b0 - *b0;
                if applied != 0.0 {
                    *b0 = clamped_b0;
                    residual -= applied;
                    max_change = max_change.max(applied.abs());
                }

                if max_change < self.config.tolerance {
                    inner_converged = true;
                    break;
                }
            }

            if !inner_converged {
                return Err(EnrichError::optimization_failed(
                    format!("weighted coordinate descent did not converge at lambda = {lambda:.6}"),
                ));
            }

            if beta.iter().any(|&b| !b.is_finite()) || !b0.is_finite() {
                return Err(EnrichError::numerical_error(
                    "coefficients became non-finite during IRLS",
                ));
            }

            let outer_change = beta
                .iter()
                .zip(beta_prev.iter())
                .map(|(&a, &b)| (a - b).abs())
                .fold((*b0 - b0_prev).abs(), f64::max);

            if outer_change < self.config.tolerance.max(1e-6) {
                return Ok(());
            }
        }

        Err(EnrichError::optimization_failed(
            format!("IRLS did not converge at lambda = {lambda:.6}"),
        ))
    }
}

/// soft thresholding operator for the L1 penalty
fn soft_threshold(x: f64, lambda: f64) -> f64 {
    if x > lambda {
        x - lambda
    } else if x < -lambda {
        x + lambda
    } else {
        0.0
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
