use enrichnet::{
    fisher_enrichment, leading_edge, BaselineSnapshot, EnrichModel, EnrichmentData, Family,
    GeneSet, GeneSetCollection,
};

/// the 19-gene NF-kB-related list used as the running example
fn nfkb_gene_list() -> Vec<String> {
    [
        "RELA", "RELB", "REL", "NFKB1", "NFKB2", "NFKBIA", "NFKBIB", "NFKBIE", "IKBKB", "IKBKG",
        "CHUK", "TRAF2", "TRAF3", "TRAF6", "TNFAIP3", "TAB1", "TAB2", "MAP3K7", "RIPK1",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// reference collection: one pathway carrying most of the GOI, one partially
/// overlapping (collinear columns on purpose), and unrelated background sets
fn reference_collection() -> GeneSetCollection {
    let strings = |v: &[&str]| -> Vec<String> { v.iter().map(|s| s.to_string()).collect() };

    let nfkb_signaling = strings(&[
        "RELA", "RELB", "REL", "NFKB1", "NFKB2", "NFKBIA", "NFKBIB", "NFKBIE", "IKBKB", "IKBKG",
        "CHUK", "TRAF2", "TRAF6", "TNFAIP3", "LTB", "CD40", "TNF", "IL1B", "BCL3", "TLR4",
    ]);
    let innate_immunity = strings(&[
        "TRAF3", "TRAF6", "TAB1", "TAB2", "MAP3K7", "RIPK1", "IKBKB", "CHUK", "MYD88", "IRAK1",
        "IRAK4", "TICAM1", "TLR2", "TLR4", "NOD2", "CASP1", "IL18", "DDX58",
    ]);
    let apoptosis = strings(&[
        "TRAF2", "RIPK1", "CASP3", "CASP8", "CASP9", "BAX", "BAK1", "BCL2", "BID", "FAS", "FADD",
        "APAF1", "CYCS", "XIAP", "BIRC2", "TNFRSF10A",
    ]);
    let cell_cycle = strings(&[
        "CDK1", "CDK2", "CDK4", "CDK6", "CCNA2", "CCNB1", "CCND1", "CCNE1", "RB1", "E2F1", "TP53",
        "CDKN1A", "CDKN1B", "CDC20", "PLK1", "AURKA", "AURKB", "BUB1",
    ]);
    let dna_repair = strings(&[
        "BRCA1", "BRCA2", "RAD51", "ATM", "ATR", "CHEK1", "CHEK2", "XRCC1", "XRCC4", "LIG4",
        "PARP1", "MLH1", "MSH2", "MSH6", "ERCC1", "XPA",
    ]);
    let metabolism = strings(&[
        "HK1", "HK2", "PFKM", "ALDOA", "GAPDH", "PGK1", "PKM", "LDHA", "CS", "IDH1", "IDH2",
        "OGDH", "SDHA", "FH", "MDH2", "ACO2", "G6PD", "TALDO1", "TKT", "PGD",
    ]);

    GeneSetCollection::new(vec![
        GeneSet::new("nfkb_signaling", nfkb_signaling),
        GeneSet::new("innate_immunity", innate_immunity),
        GeneSet::new("apoptosis", apoptosis),
        GeneSet::new("cell_cycle", cell_cycle),
        GeneSet::new("dna_repair", dna_repair),
        GeneSet::new("metabolism", metabolism),
    ])
    .unwrap()
}

fn nfkb_data() -> EnrichmentData {
    EnrichmentData::new(&nfkb_gene_list(), &reference_collection()).unwrap()
}

#[test]
fn test_gaussian_selection_nonempty_and_reproducible() {
    let data = nfkb_data();

    let mut first = EnrichModel::new().with_alpha(0.5).with_seed(42);
    let mut second = EnrichModel::new().with_alpha(0.5).with_seed(42);
    first.fit(&data).unwrap();
    second.fit(&data).unwrap();

    let selected_first = first.selected_pathways().unwrap();
    let selected_second = second.selected_pathways().unwrap();

    assert!(!selected_first.is_empty());
    assert_eq!(selected_first, selected_second);

    // the pathway carrying most of the GOI has to be in there
    assert!(selected_first.contains(&"nfkb_signaling".to_string()));
}

#[test]
fn test_selection_is_subset_of_universe_names() {
    let data = nfkb_data();
    let names = reference_collection().names();

    let mut model = EnrichModel::new().with_seed(9);
    model.fit(&data).unwrap();

    for name in model.selected_pathways().unwrap() {
        assert!(names.contains(&name));
    }
}

#[test]
fn test_binomial_runs_across_seeds() {
    let data = nfkb_data();
    let names = reference_collection().names();

    // different seeds may pick differently sized selections - that is
    // expected behavior for the logistic fit, not a bug
    for seed in [1u64, 2, 3] {
        let mut model = EnrichModel::new()
            .with_family(Family::Binomial)
            .with_alpha(0.5)
            .with_seed(seed);
        model.fit(&data).unwrap();

        for name in model.selected_pathways().unwrap() {
            assert!(names.contains(&name));
        }
    }
}

#[test]
fn test_disjoint_goi_selects_nothing() {
    let collection = reference_collection();
    let goi = vec!["NOT_A_GENE_1".to_string(), "NOT_A_GENE_2".to_string()];
    let data = EnrichmentData::new(&goi, &collection).unwrap();

    let mut model = EnrichModel::new().with_seed(42);
    model.fit(&data).unwrap();

    assert!(model.selected_pathways().unwrap().is_empty());
}

#[test]
fn test_baseline_agrees_with_selector_on_top_hit() {
    let data = nfkb_data();

    let results = fisher_enrichment(&data).unwrap();
    let top = results
        .iter()
        .min_by(|a, b| a.p_adjusted.total_cmp(&b.p_adjusted))
        .unwrap();
    assert_eq!(top.gene_set, "nfkb_signaling");

    for result in &results {
        assert!((0.0..=1.0).contains(&result.p_value));
        assert!(result.p_adjusted >= result.p_value - 1e-12);
    }

    let mut model = EnrichModel::new().with_seed(42);
    model.fit(&data).unwrap();
    assert!(model
        .selected_pathways()
        .unwrap()
        .contains(&top.gene_set));
}

#[test]
fn test_leading_edge_end_to_end() {
    let data = nfkb_data();

    let mut model = EnrichModel::new().with_alpha(0.5).with_seed(42);
    model.fit(&data).unwrap();

    let predictions = model.predict(data.membership()).unwrap();
    let edge = leading_edge(predictions.view(), &data, 0.5).unwrap();

    // the enriched pathway's GOI members score high
    assert!(!edge.true_positives.is_empty());
    let goi = nfkb_gene_list();
    for gene in &edge.true_positives {
        assert!(goi.contains(gene));
    }
    for gene in &edge.false_positives {
        assert!(!goi.contains(gene));
    }
}

#[test]
fn test_snapshot_roundtrip_end_to_end() {
    let data = nfkb_data();
    let snapshot = BaselineSnapshot::compute(&data).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nfkb_baseline.json");
    snapshot.save(&path).unwrap();
    let loaded = BaselineSnapshot::load(&path).unwrap();

    assert_eq!(loaded.goi_size, data.goi_size());
    assert_eq!(loaded.universe_size, data.n_genes());
    assert_eq!(loaded.results.len(), data.n_sets());
    for (a, b) in loaded.results.iter().zip(snapshot.results.iter()) {
        assert_eq!(a.gene_set, b.gene_set);
        assert_eq!(a.overlap, b.overlap);
        assert!((a.p_value - b.p_value).abs() < 1e-12);
        assert!((a.p_adjusted - b.p_adjusted).abs() < 1e-12);
    }
}

#[test]
fn test_cv_curve_shape() {
    let data = nfkb_data();

    let mut model = EnrichModel::new().with_n_lambda(40).with_seed(5);
    model.fit(&data).unwrap();

    let curve = model.cv_curve().unwrap();
    assert_eq!(curve.lambdas.len(), 40);
    assert_eq!(curve.mean_error.len(), 40);
    assert!(curve.min_index < 40);
    assert!(curve.mean_error.iter().all(|&e| e.is_finite()));

    // the chosen lambda really is the argmin
    let min = curve
        .mean_error
        .iter()
        .cloned()
        .fold(f64::INFINITY, f64::min);
    assert!((curve.mean_error[curve.min_index] - min).abs() < 1e-15);
}
