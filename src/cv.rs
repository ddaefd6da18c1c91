use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::{
    data::EnrichmentData,
    error::{EnrichError, Result},
    optimization::{ElasticNetConfig, ElasticNetSolver, Family},
};

/// which error to minimize when picking lambda
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvMetric {
    /// mean squared error on the predicted score
    Mse,
    /// model deviance (MSE for gaussian, binomial deviance for logistic)
    Deviance,
    /// misclassification rate at a 0.5 cutoff
    Class,
}

/// cross-validation error curve over the lambda grid
#[derive(Debug, Clone)]
pub struct CvCurve {
    pub lambdas: Array1<f64>,
    pub mean_error: Array1<f64>,
    pub std_error: Array1<f64>, // standard error of the fold mean
    pub min_index: usize,
}

impl CvCurve {
    /// lambda at the minimum of the mean CV error
    pub fn lambda_min(&self) -> f64 {
        self.lambdas[self.min_index]
    }
}

/// deal each sample a fold id in [0, k) after a seeded shuffle
pub fn assign_folds(n_samples: usize, k: usize, seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let mut folds = vec![0; n_samples];
    for (position, &sample) in order.iter().enumerate() {
        folds[sample] = position % k;
    }
    folds
}

/// k-fold cross-validation of the elastic net path. the lambda grid is shared
/// across folds; each fold refits the path on its training rows and scores
/// the held-out rows at every lambda
pub fn cross_validate(
    config: &ElasticNetConfig,
    data: &EnrichmentData,
    lambdas: ArrayView1<f64>,
    n_folds: usize,
    metric: CvMetric,
    seed: u64,
) -> Result<CvCurve> {
    if n_folds < 2 {
        return Err(EnrichError::invalid_parameter("n_folds", n_folds.to_string()));
    }
    if data.n_genes() < n_folds {
        return Err(EnrichError::invalid_parameter(
            "n_folds",
            format!("{} folds for {} genes", n_folds, data.n_genes()),
        ));
    }

    let n_lambda = lambdas.len();
    let fold_of = assign_folds(data.n_genes(), n_folds, seed);
    let solver = ElasticNetSolver::new(config.clone());

    let mut fold_errors = Array2::zeros((n_folds, n_lambda));

    for fold in 0..n_folds {
        let train_indices: Vec<usize> = (0..data.n_genes()).filter(|&i| fold_of[i] != fold).collect();
        let test_indices: Vec<usize> = (0..data.n_genes()).filter(|&i| fold_of[i] == fold).collect();

        let train = data.subset(&train_indices)?;
        let test = data.subset(&test_indices)?;

        let path = solver.fit_path(train.membership(), train.response(), lambdas)?;

        for l in 0..n_lambda {
            let eta = &test.membership().dot(&path.coefficients.row(l)) + path.intercepts[l];
            fold_errors[[fold, l]] =
                prediction_error(metric, config.family, eta.view(), test.response());
        }
    }

    let mut mean_error = Array1::zeros(n_lambda);
    let mut std_error = Array1::zeros(n_lambda);
    let k = n_folds as f64;

    for l in 0..n_lambda {
        let mean = fold_errors.column(l).sum() / k;
        let variance = fold_errors
            .column(l)
            .iter()
            .map(|&e| (e - mean).powi(2))
            .sum::<f64>()
            / k;
        mean_error[l] = mean;
        std_error[l] = (variance / k).sqrt();
    }

    // argmin, ties go to the larger lambda (smaller index)
    let mut min_index = 0;
    for l in 1..n_lambda {
        if mean_error[l] < mean_error[min_index] {
            min_index = l;
        }
    }

    Ok(CvCurve {
        lambdas: lambdas.to_owned(),
        mean_error,
        std_error,
        min_index,
    })
}

/// held-out error for one lambda. `eta` is the linear predictor
pub fn prediction_error(
    metric: CvMetric,
    family: Family,
    eta: ArrayView1<f64>,
    y: ArrayView1<f64>,
) -> f64 {
    let n = y.len() as f64;

    // score on the response scale: identity for gaussian, probability for binomial
    let score = |e: f64| match family {
        Family::Gaussian => e,
        Family::Binomial => 1.0 / (1.0 + (-e).exp()),
    };

    match (metric, family) {
        (CvMetric::Mse, _) | (CvMetric::Deviance, Family::Gaussian) => {
            eta.iter()
                .zip(y.iter())
                .map(|(&e, &yi)| (yi - score(e)).powi(2))
                .sum::<f64>()
                / n
        }
        (CvMetric::Deviance, Family::Binomial) => {
            -2.0 * eta
                .iter()
                .zip(y.iter())
                .map(|(&e, &yi)| {
                    let p = score(e).clamp(1e-10, 1.0 - 1e-10);
                    yi * p.ln() + (1.0 - yi) * (1.0 - p).ln()
                })
                .sum::<f64>()
                / n
        }
        (CvMetric::Class, _) => {
            eta.iter()
                .zip(y.iter())
                .filter(|&(&e, &yi)| (score(e) > 0.5) != (yi > 0.5))
                .count() as f64
                / n
        }
    }
}
