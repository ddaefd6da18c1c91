use enrichnet::{
    fisher_enrichment, BaselineSnapshot, EnrichModel, EnrichmentData, Family, GeneSet,
    GeneSetCollection,
};

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn build_collection() -> Result<GeneSetCollection, Box<dyn std::error::Error>> {
    Ok(GeneSetCollection::new(vec![
        GeneSet::new(
            "nfkb_signaling",
            strings(&[
                "RELA", "RELB", "REL", "NFKB1", "NFKB2", "NFKBIA", "NFKBIB", "IKBKB", "IKBKG",
                "CHUK", "TRAF2", "TRAF6", "TNFAIP3", "TNF", "CD40", "LTB",
            ]),
        ),
        GeneSet::new(
            "innate_immunity",
            strings(&[
                "TRAF3", "TRAF6", "TAB1", "TAB2", "MAP3K7", "RIPK1", "MYD88", "IRAK1", "IRAK4",
                "TLR2", "TLR4", "NOD2",
            ]),
        ),
        GeneSet::new(
            "apoptosis",
            strings(&["TRAF2", "RIPK1", "CASP3", "CASP8", "BAX", "BCL2", "FAS", "FADD", "XIAP"]),
        ),
        GeneSet::new(
            "cell_cycle",
            strings(&["CDK1", "CDK2", "CDK4", "CCNB1", "CCND1", "RB1", "E2F1", "TP53", "PLK1"]),
        ),
        GeneSet::new(
            "dna_repair",
            strings(&["BRCA1", "BRCA2", "RAD51", "ATM", "ATR", "CHEK1", "PARP1", "MLH1"]),
        ),
    ])?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Selector vs. Fisher's Exact Baseline");
    println!("====================================\n");

    let collection = build_collection()?;
    let goi = strings(&[
        "RELA", "NFKB1", "NFKB2", "NFKBIA", "IKBKB", "CHUK", "TRAF2", "TRAF3", "TRAF6", "TNFAIP3",
        "TAB1", "MAP3K7", "RIPK1",
    ]);
    let data = EnrichmentData::new(&goi, &collection)?;

    // regression selector, both families
    for (label, family) in [("gaussian", Family::Gaussian), ("binomial", Family::Binomial)] {
        let mut model = EnrichModel::new()
            .with_family(family)
            .with_alpha(0.5)
            .with_folds(5)
            .with_seed(42);
        model.fit(&data)?;
        println!("{label} selector picked: {:?}", model.selected_pathways()?);
    }
    println!();

    // classical baseline
    let results = fisher_enrichment(&data)?;
    println!("{:<20} {:>8} {:>8} {:>12} {:>12}", "gene set", "overlap", "size", "p", "p_adj");
    println!("{:-<64}", "");
    for r in &results {
        println!(
            "{:<20} {:>8} {:>8} {:>12.3e} {:>12.3e}",
            r.gene_set, r.overlap, r.set_size, r.p_value, r.p_adjusted
        );
    }
    println!();

    // cache the baseline for reproducible comparison plots elsewhere
    let snapshot = BaselineSnapshot::compute(&data)?;
    let path = std::env::temp_dir().join("enrichnet_baseline.json");
    snapshot.save(&path)?;
    let reloaded = BaselineSnapshot::load(&path)?;
    println!(
        "snapshot cached at {} ({} sets, universe {})",
        path.display(),
        reloaded.results.len(),
        reloaded.universe_size
    );

    Ok(())
}
