use ndarray::ArrayView1;

use crate::{
    data::EnrichmentData,
    error::{EnrichError, Result},
};

/// genes driving the selection: predicted above threshold, split by whether
/// the model was right about them
#[derive(Debug, Clone)]
pub struct LeadingEdge {
    pub true_positives: Vec<String>,  // score above threshold, in the GOI
    pub false_positives: Vec<String>, // score above threshold, not in the GOI
    pub threshold: f64,
}

impl LeadingEdge {
    /// print out who made the cut
    pub fn print(&self) {
        println!("leading edge at threshold {:.4}", self.threshold);
        println!("==============================");
        println!("true positives ({}):", self.true_positives.len());
        for gene in &self.true_positives {
            println!("  {gene}");
        }
        println!("false positives ({}):", self.false_positives.len());
        for gene in &self.false_positives {
            println!("  {gene}");
        }
    }
}

/// partition genes scoring above `threshold` into true/false positives
/// against the observed GOI indicator. the threshold is yours to pick -
/// nothing here infers one from the data
pub fn leading_edge(
    predictions: ArrayView1<f64>,
    data: &EnrichmentData,
    threshold: f64,
) -> Result<LeadingEdge> {
    if !threshold.is_finite() {
        return Err(EnrichError::invalid_parameter("threshold", threshold.to_string()));
    }
    if predictions.len() != data.n_genes() {
        return Err(EnrichError::invalid_dimensions(format!(
            "predictions len ({}) != n_genes ({})",
            predictions.len(),
            data.n_genes()
        )));
    }

    let mut true_positives = Vec::new();
    let mut false_positives = Vec::new();

    for (i, (&score, &observed)) in predictions.iter().zip(data.response().iter()).enumerate() {
        if score > threshold {
            if observed > 0.5 {
                true_positives.push(data.gene_names()[i].clone());
            } else {
                false_positives.push(data.gene_names()[i].clone());
            }
        }
    }

    Ok(LeadingEdge {
        true_positives,
        false_positives,
        threshold,
    })
}

/// confusion table at a score threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionCounts {
    /// fraction of called genes that are really in the GOI
    pub fn precision(&self) -> Option<f64> {
        let called = self.true_positives + self.false_positives;
        (called > 0).then(|| self.true_positives as f64 / called as f64)
    }

    /// fraction of GOI genes the model called
    pub fn recall(&self) -> Option<f64> {
        let actual = self.true_positives + self.false_negatives;
        (actual > 0).then(|| self.true_positives as f64 / actual as f64)
    }
}

/// count up the confusion table for predictions against the observed response
pub fn confusion_counts(
    predictions: ArrayView1<f64>,
    response: ArrayView1<f64>,
    threshold: f64,
) -> Result<ConfusionCounts> {
    if !threshold.is_finite() {
        return Err(EnrichError::invalid_parameter("threshold", threshold.to_string()));
    }
    if predictions.len() != response.len() {
        return Err(EnrichError::invalid_dimensions(
            "predictions and response must have same length",
        ));
    }

    let mut counts = ConfusionCounts {
        true_positives: 0,
        false_positives: 0,
        true_negatives: 0,
        false_negatives: 0,
    };

    for (&score, &observed) in predictions.iter().zip(response.iter()) {
        match (score > threshold, observed > 0.5) {
            (true, true) => counts.true_positives += 1,
            (true, false) => counts.false_positives += 1,
            (false, false) => counts.true_negatives += 1,
            (false, true) => counts.false_negatives += 1,
        }
    }

    Ok(counts)
}
