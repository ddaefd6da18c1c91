use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::{
    cv::{cross_validate, CvCurve, CvMetric},
    data::EnrichmentData,
    error::{EnrichError, Result},
    optimization::{lambda_path, ElasticNetConfig, ElasticNetPath, ElasticNetSolver, Family},
};

/// everything fit() learned, kept immutable afterwards
#[derive(Debug, Clone)]
struct FitState {
    intercept: f64,
    coefficients: Array1<f64>, // at lambda_min
    path: ElasticNetPath,
    cv: CvCurve,
    set_names: Vec<String>,
}

/// gene-set selector - elastic net regression of GOI membership on the
/// gene-set membership matrix, lambda picked by cross-validation
#[derive(Debug, Clone)]
pub struct EnrichModel {
    family: Family,
    alpha: f64,           // elastic net mixing
    n_folds: usize,       // CV folds
    n_lambda: usize,      // grid size
    metric: Option<CvMetric>, // None -> family default
    seed: u64,            // explicit, threaded into fold assignment
    max_iterations: usize,
    tolerance: f64,
    fit_state: Option<FitState>,
}

impl Default for EnrichModel {
    fn default() -> Self {
        Self {
            family: Family::Gaussian,
            alpha: 0.5,
            n_folds: 10,
            n_lambda: 100,
            metric: None,
            seed: 42,
            max_iterations: 1000,
            tolerance: 1e-7,
            fit_state: None,
        }
    }
}

impl EnrichModel {
    /// new selector w/ defaults: gaussian, alpha 0.5, 10-fold CV
    pub fn new() -> Self {
        Self::default()
    }

    /// linear or logistic link
    pub fn with_family(mut self, family: Family) -> Self {
        self.family = family;
        self
    }

    /// elastic net mixing: 1 -> pure lasso, 0 -> pure ridge (validated at fit)
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// how many CV folds for the lambda search
    pub fn with_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }

    /// size of the lambda grid
    pub fn with_n_lambda(mut self, n_lambda: usize) -> Self {
        self.n_lambda = n_lambda;
        self
    }

    /// which CV error to minimize (defaults to MSE / deviance per family)
    pub fn with_metric(mut self, metric: CvMetric) -> Self {
        self.metric = Some(metric);
        self
    }

    /// seed for the CV fold shuffle - same seed, same folds
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// max coordinate descent sweeps before giving up
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// how close is close enough for convergence
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// fit the cross-validated elastic net path - this does the actual work
    pub fn fit(&mut self, data: &EnrichmentData) -> Result<&mut Self> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(EnrichError::invalid_parameter("alpha", self.alpha.to_string()));
        }
        if data.n_sets() == 0 {
            return Err(EnrichError::invalid_gene_set_data("no gene sets to select from"));
        }

        let config = ElasticNetConfig {
            family: self.family,
            alpha: self.alpha,
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        };

        // the logistic path stops earlier - small lambdas invite separation
        let min_ratio = match self.family {
            Family::Gaussian => 1e-3,
            Family::Binomial => 1e-2,
        };

        let lambdas = lambda_path(
            data.membership(),
            data.response(),
            self.alpha,
            self.n_lambda,
            min_ratio,
        )?;

        let metric = self.metric.unwrap_or(match self.family {
            Family::Gaussian => CvMetric::Mse,
            Family::Binomial => CvMetric::Deviance,
        });

        let cv = cross_validate(&config, data, lambdas.view(), self.n_folds, metric, self.seed)?;

        let solver = ElasticNetSolver::new(config);
        let path = solver.fit_path(data.membership(), data.response(), lambdas.view())?;

        let coefficients = path.coefficients.row(cv.min_index).to_owned();
        let intercept = path.intercepts[cv.min_index];

        self.fit_state = Some(FitState {
            intercept,
            coefficients,
            path,
            cv,
            set_names: data.set_names().to_vec(),
        });

        Ok(self)
    }

    fn state(&self) -> Result<&FitState> {
        self.fit_state.as_ref().ok_or(EnrichError::ModelNotFitted)
    }

    /// has this model been fit to data yet?
    pub fn is_fitted(&self) -> bool {
        self.fit_state.is_some()
    }

    /// coefficients at the selected lambda
    pub fn coefficients(&self) -> Result<ArrayView1<'_, f64>> {
        Ok(self.state()?.coefficients.view())
    }

    pub fn intercept(&self) -> Result<f64> {
        Ok(self.state()?.intercept)
    }

    /// the whole coefficient path over the lambda grid
    pub fn path(&self) -> Result<&ElasticNetPath> {
        Ok(&self.state()?.path)
    }

    /// cross-validation error curve
    pub fn cv_curve(&self) -> Result<&CvCurve> {
        Ok(&self.state()?.cv)
    }

    /// lambda at the CV error minimum
    pub fn lambda_min(&self) -> Result<f64> {
        Ok(self.state()?.cv.lambda_min())
    }

    /// names of gene sets with a non-zero coefficient at lambda_min -
    /// always a subset of the collection's names
    pub fn selected_pathways(&self) -> Result<Vec<String>> {
        let state = self.state()?;
        Ok(state
            .coefficients
            .iter()
            .zip(state.set_names.iter())
            .filter(|&(&coef, _)| coef != 0.0)
            .map(|(_, name)| name.clone())
            .collect())
    }

    /// predicted score per gene: linear for gaussian, probability for binomial
    pub fn predict(&self, membership: ArrayView2<f64>) -> Result<Array1<f64>> {
        let state = self.state()?;

        if membership.ncols() != state.coefficients.len() {
            return Err(EnrichError::invalid_dimensions(format!(
                "gene set count mismatch: expected {}, got {}",
                state.coefficients.len(),
                membership.ncols()
            )));
        }

        let eta = &membership.dot(&state.coefficients) + state.intercept;
        Ok(match self.family {
            Family::Gaussian => eta,
            Family::Binomial => eta.mapv(|e| 1.0 / (1.0 + (-e).exp())),
        })
    }

    /// get a nice summary of the fitted model
    pub fn summary(&self) -> Result<EnrichSummary> {
        let state = self.state()?;

        let selected = state
            .coefficients
            .iter()
            .zip(state.set_names.iter())
            .filter(|&(&coef, _)| coef != 0.0)
            .map(|(&coef, name)| (name.clone(), coef))
            .collect();

        Ok(EnrichSummary {
            family: self.family,
            alpha: self.alpha,
            lambda_min: state.cv.lambda_min(),
            intercept: state.intercept,
            n_sets: state.set_names.len(),
            selected,
        })
    }
}

/// what the selector landed on
#[derive(Debug, Clone)]
pub struct EnrichSummary {
    pub family: Family,
    pub alpha: f64,
    pub lambda_min: f64,
    pub intercept: f64,
    pub n_sets: usize,
    pub selected: Vec<(String, f64)>, // (set name, coefficient)
}

impl EnrichSummary {
    /// print out what we learned
    pub fn print(&self) {
        println!("elastic net gene-set selector");
        println!("=============================");
        println!("family:      {:?}", self.family);
        println!("alpha:       {:.3}", self.alpha);
        println!("lambda_min:  {:.6}", self.lambda_min);
        println!("intercept:   {:.6}", self.intercept);
        println!("selected {} of {} gene sets", self.selected.len(), self.n_sets);
        println!();

        println!("{:<30} {:>12}", "gene set", "coefficient");
        println!("{:-<43}", "");
        for (name, coef) in &self.selected {
            println!("{:<30} {:>12.6}", name, coef);
        }
    }
}
