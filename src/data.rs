use std::collections::{BTreeSet, HashSet};

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{EnrichError, Result};

/// a named set of genes - one pathway / annotation category
#[derive(Debug, Clone)]
pub struct GeneSet {
    pub name: String,
    pub genes: Vec<String>,
}

impl GeneSet {
    pub fn new(name: impl Into<String>, genes: Vec<String>) -> Self {
        Self { name: name.into(), genes }
    }
}

/// ordered collection of named gene sets - the pathway universe we test against
#[derive(Debug, Clone)]
pub struct GeneSetCollection {
    sets: Vec<GeneSet>,
}

impl GeneSetCollection {
    /// make a collection from named sets - names must be unique, sets non-empty
    pub fn new(sets: Vec<GeneSet>) -> Result<Self> {
        if sets.is_empty() {
            return Err(EnrichError::invalid_gene_set_data(
                "collection needs at least one gene set",
            ));
        }

        let mut seen = HashSet::new();
        for set in &sets {
            if set.genes.is_empty() {
                return Err(EnrichError::invalid_gene_set_data(
                    format!("gene set '{}' is empty", set.name),
                ));
            }
            if !seen.insert(set.name.as_str()) {
                return Err(EnrichError::invalid_gene_set_data(
                    format!("duplicate gene set name '{}'", set.name),
                ));
            }
        }

        Ok(Self { sets })
    }

    /// how many gene sets
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// the sets, in enumeration order
    pub fn sets(&self) -> &[GeneSet] {
        &self.sets
    }

    /// set names in enumeration order
    pub fn names(&self) -> Vec<String> {
        self.sets.iter().map(|s| s.name.clone()).collect()
    }

    /// sorted union of all member genes - row order of the membership matrix
    pub fn universe(&self) -> Vec<String> {
        let genes: BTreeSet<&str> = self
            .sets
            .iter()
            .flat_map(|s| s.genes.iter().map(|g| g.as_str()))
            .collect();
        genes.into_iter().map(String::from).collect()
    }
}

/// binary membership matrix (genes x sets) + GOI indicator vector,
/// built once per analysis and immutable after that
#[derive(Debug, Clone)]
pub struct EnrichmentData {
    membership: Array2<f64>, // 1.0 if gene i belongs to set j
    response: Array1<f64>,   // 1.0 if gene i is in the GOI list
    gene_names: Vec<String>,
    set_names: Vec<String>,
}

impl EnrichmentData {
    /// build the design matrix from a gene list of interest and a set collection.
    /// rows are the universe genes (sorted union over all sets); GOI genes that
    /// hit no set are dropped, so a fully disjoint GOI gives an all-zero response
    pub fn new(goi: &[String], collection: &GeneSetCollection) -> Result<Self> {
        if goi.is_empty() {
            return Err(EnrichError::invalid_gene_set_data(
                "gene list of interest is empty",
            ));
        }

        let gene_names = collection.universe();
        let n_genes = gene_names.len();
        let n_sets = collection.len();

        let mut membership = Array2::zeros((n_genes, n_sets));
        for (j, set) in collection.sets().iter().enumerate() {
            let members: HashSet<&str> = set.genes.iter().map(|g| g.as_str()).collect();
            for (i, gene) in gene_names.iter().enumerate() {
                if members.contains(gene.as_str()) {
                    membership[[i, j]] = 1.0;
                }
            }
        }

        let goi_set: HashSet<&str> = goi.iter().map(|g| g.as_str()).collect();
        let response = Array1::from_iter(gene_names.iter().map(|gene| {
            if goi_set.contains(gene.as_str()) { 1.0 } else { 0.0 }
        }));

        Ok(Self {
            membership,
            response,
            gene_names,
            set_names: collection.names(),
        })
    }

    /// how many genes in the universe
    pub fn n_genes(&self) -> usize {
        self.gene_names.len()
    }

    /// how many gene sets (columns)
    pub fn n_sets(&self) -> usize {
        self.set_names.len()
    }

    /// the membership matrix (genes x sets)
    pub fn membership(&self) -> ArrayView2<'_, f64> {
        self.membership.view()
    }

    /// GOI indicator vector
    pub fn response(&self) -> ArrayView1<'_, f64> {
        self.response.view()
    }

    pub fn gene_names(&self) -> &[String] {
        &self.gene_names
    }

    pub fn set_names(&self) -> &[String] {
        &self.set_names
    }

    /// how many universe genes are in the GOI
    pub fn goi_size(&self) -> usize {
        self.response.iter().filter(|&&y| y > 0.5).count()
    }

    /// per-set member count within the universe
    pub fn set_sizes(&self) -> Vec<usize> {
        (0..self.n_sets())
            .map(|j| self.membership.column(j).iter().filter(|&&x| x > 0.5).count())
            .collect()
    }

    /// per-set overlap with the GOI
    pub fn overlap_counts(&self) -> Vec<usize> {
        (0..self.n_sets())
            .map(|j| {
                self.membership
                    .column(j)
                    .iter()
                    .zip(self.response.iter())
                    .filter(|&(&x, &y)| x > 0.5 && y > 0.5)
                    .count()
            })
            .collect()
    }

    /// grab a subset of gene rows by indices - used for CV splits
    pub fn subset(&self, indices: &[usize]) -> Result<Self> {
        if indices.iter().any(|&i| i >= self.n_genes()) {
            return Err(EnrichError::invalid_dimensions("subset index out of bounds"));
        }

        let membership = self.membership.select(Axis(0), indices);
        let response = Array1::from_iter(indices.iter().map(|&i| self.response[i]));
        let gene_names = indices.iter().map(|&i| self.gene_names[i].clone()).collect();

        Ok(Self {
            membership,
            response,
            gene_names,
            set_names: self.set_names.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn create_test_collection() -> GeneSetCollection {
        GeneSetCollection::new(vec![
            GeneSet::new("pathway_a", strings(&["g1", "g2", "g3"])),
            GeneSet::new("pathway_b", strings(&["g3", "g4"])),
            GeneSet::new("pathway_c", strings(&["g5"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_collection_universe_sorted() {
        let collection = create_test_collection();
        assert_eq!(collection.universe(), strings(&["g1", "g2", "g3", "g4", "g5"]));
        assert_eq!(collection.names(), strings(&["pathway_a", "pathway_b", "pathway_c"]));
    }

    #[test]
    fn test_collection_rejects_bad_input() {
        assert!(GeneSetCollection::new(vec![]).is_err());
        assert!(GeneSetCollection::new(vec![GeneSet::new("empty", vec![])]).is_err());
        assert!(GeneSetCollection::new(vec![
            GeneSet::new("dup", strings(&["g1"])),
            GeneSet::new("dup", strings(&["g2"])),
        ])
        .is_err());
    }

    #[test]
    fn test_membership_matrix() {
        let collection = create_test_collection();
        let data = EnrichmentData::new(&strings(&["g1", "g3"]), &collection).unwrap();

        assert_eq!(data.n_genes(), 5);
        assert_eq!(data.n_sets(), 3);

        // g3 (row 2) is in pathway_a and pathway_b
        assert_eq!(data.membership()[[2, 0]], 1.0);
        assert_eq!(data.membership()[[2, 1]], 1.0);
        assert_eq!(data.membership()[[2, 2]], 0.0);

        // response follows sorted universe order: g1, g2, g3, g4, g5
        assert_eq!(data.response().to_vec(), vec![1.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(data.goi_size(), 2);
    }

    #[test]
    fn test_overlap_and_sizes() {
        let collection = create_test_collection();
        let data = EnrichmentData::new(&strings(&["g1", "g3"]), &collection).unwrap();

        assert_eq!(data.set_sizes(), vec![3, 2, 1]);
        assert_eq!(data.overlap_counts(), vec![2, 1, 0]);
    }

    #[test]
    fn test_disjoint_goi_gives_zero_response() {
        let collection = create_test_collection();
        let data = EnrichmentData::new(&strings(&["nope", "nada"]), &collection).unwrap();

        assert_eq!(data.goi_size(), 0);
        assert!(data.response().iter().all(|&y| y == 0.0));
    }

    #[test]
    fn test_subset() {
        let collection = create_test_collection();
        let data = EnrichmentData::new(&strings(&["g1", "g3"]), &collection).unwrap();

        let sub = data.subset(&[0, 2, 4]).unwrap();
        assert_eq!(sub.n_genes(), 3);
        assert_eq!(sub.gene_names(), &strings(&["g1", "g3", "g5"]));
        assert_eq!(sub.response().to_vec(), vec![1.0, 1.0, 0.0]);
        assert_eq!(sub.n_sets(), 3);

        assert!(data.subset(&[99]).is_err());
    }
}
