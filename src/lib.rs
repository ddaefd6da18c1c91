//! # gene-set enrichment via elastic net
//!
//! pathway selection for a gene list of interest - regularized regression
//! instead of one-test-per-set
//!
//! ## what you get
//!
//! - elastic net (ridge + lasso) regression of GOI membership on a binary
//!   gene-set membership matrix, gaussian or binomial link
//! - cross-validated lambda selection w/ an explicit seed
//! - the classical fisher's exact test + benjamini-hochberg baseline to
//!   compare against, plus a JSON snapshot for reproducible comparisons
//! - leading-edge extraction at a threshold you pick
//!
//! ## quick start
//!
//! ```rust
//! use enrichnet::{EnrichModel, EnrichmentData, GeneSet, GeneSetCollection};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let collection = GeneSetCollection::new(vec![
//!     GeneSet::new("pathway_a", vec!["g1".into(), "g2".into(), "g3".into()]),
//!     GeneSet::new("pathway_b", vec!["g4".into(), "g5".into(), "g6".into()]),
//! ])?;
//!
//! let goi = vec!["g1".to_string(), "g2".to_string()];
//! let data = EnrichmentData::new(&goi, &collection)?;
//!
//! // fit w/ 3-fold CV (the universe here is tiny)
//! let mut model = EnrichModel::new().with_folds(3).with_seed(42);
//! model.fit(&data)?;
//!
//! let selected = model.selected_pathways()?;
//! # Ok(())
//! # }
//! ```

pub mod baseline;
pub mod cv;
pub mod data;
pub mod error;
pub mod evaluate;
pub mod model;
pub mod optimization;

pub use baseline::{benjamini_hochberg, fisher_enrichment, BaselineResult, BaselineSnapshot};
pub use cv::{CvCurve, CvMetric};
pub use data::{EnrichmentData, GeneSet, GeneSetCollection};
pub use error::{EnrichError, Result};
pub use evaluate::{confusion_counts, leading_edge, ConfusionCounts, LeadingEdge};
pub use model::{EnrichModel, EnrichSummary};
pub use optimization::Family;
