use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use statrs::distribution::{DiscreteCDF, Hypergeometric};

use crate::{
    data::EnrichmentData,
    error::{EnrichError, Result},
};

/// fisher's exact test output for one gene set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineResult {
    pub gene_set: String,
    pub overlap: usize,  // GOI genes inside the set
    pub set_size: usize, // set size within the universe
    pub p_value: f64,    // one-sided hypergeometric upper tail
    pub p_adjusted: f64, // benjamini-hochberg across the whole collection
}

/// one-sided fisher's exact test of GOI over-representation for every gene
/// set, BH-corrected across the collection. results stay in enumeration order
pub fn fisher_enrichment(data: &EnrichmentData) -> Result<Vec<BaselineResult>> {
    let universe = data.n_genes() as u64;
    let draws = data.goi_size() as u64;

    let set_sizes = data.set_sizes();
    let overlaps = data.overlap_counts();

    let mut results = Vec::with_capacity(data.n_sets());
    for (j, name) in data.set_names().iter().enumerate() {
        let successes = set_sizes[j] as u64;
        let k = overlaps[j] as u64;

        // P(X >= k) with X ~ Hypergeometric(N, K, n); sf(k-1) = P(X > k-1)
        let p_value = if k == 0 {
            1.0
        } else {
            let dist = Hypergeometric::new(universe, successes, draws)
                .map_err(|e| EnrichError::numerical_error(format!("hypergeometric: {e}")))?;
            dist.sf(k - 1).clamp(0.0, 1.0)
        };

        results.push(BaselineResult {
            gene_set: name.clone(),
            overlap: overlaps[j],
            set_size: set_sizes[j],
            p_value,
            p_adjusted: 1.0, // filled in below
        });
    }

    let raw: Vec<f64> = results.iter().map(|r| r.p_value).collect();
    let adjusted = benjamini_hochberg(&raw)?;
    for (result, p_adj) in results.iter_mut().zip(adjusted) {
        result.p_adjusted = p_adj;
    }

    Ok(results)
}

/// benjamini-hochberg FDR adjustment. returns adjusted p-values in the input
/// order: sort, scale by n/rank, enforce monotonicity right to left, clamp
pub fn benjamini_hochberg(p_values: &[f64]) -> Result<Vec<f64>> {
    for (i, &p) in p_values.iter().enumerate() {
        if !(0.0..=1.0).contains(&p) {
            return Err(EnrichError::invalid_parameter(
                format!("p_values[{i}]"),
                p.to_string(),
            ));
        }
    }

    let n = p_values.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let n_f = n as f64;
    let mut adjusted = vec![0.0; n];
    let mut running_min = f64::INFINITY;

    for rank in (0..n).rev() {
        let raw = p_values[order[rank]];
        let scaled = (raw * n_f / (rank + 1) as f64).min(1.0);
        running_min = running_min.min(scaled);
        adjusted[order[rank]] = running_min;
    }

    Ok(adjusted)
}

/// write-once cache of the baseline's outputs, for reproducible comparison
/// against the regression selector. read-only at consumption time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineSnapshot {
    pub universe_size: usize,
    pub goi_size: usize,
    pub results: Vec<BaselineResult>,
}

impl BaselineSnapshot {
    /// run the baseline and bundle it up for persistence
    pub fn compute(data: &EnrichmentData) -> Result<Self> {
        Ok(Self {
            universe_size: data.n_genes(),
            goi_size: data.goi_size(),
            results: fisher_enrichment(data)?,
        })
    }

    /// serialize to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| EnrichError::snapshot_io(format!("serialize: {e}")))?;
        fs::write(path.as_ref(), json)
            .map_err(|e| EnrichError::snapshot_io(format!("write: {e}")))
    }

    /// read a snapshot back from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())
            .map_err(|e| EnrichError::snapshot_io(format!("read: {e}")))?;
        serde_json::from_str(&json)
            .map_err(|e| EnrichError::snapshot_io(format!("deserialize: {e}")))
    }
}
