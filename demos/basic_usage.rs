use enrichnet::{leading_edge, EnrichModel, EnrichmentData, GeneSet, GeneSetCollection};

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Gene-Set Enrichment via Elastic Net - Basic Usage");
    println!("=================================================\n");

    // a small reference collection: two immune pathways and two unrelated ones
    let collection = GeneSetCollection::new(vec![
        GeneSet::new(
            "tnf_signaling",
            strings(&["TNF", "TNFAIP3", "NFKBIA", "RELA", "NFKB1", "TRAF2", "RIPK1", "CD40"]),
        ),
        GeneSet::new(
            "toll_like_receptor",
            strings(&["TLR2", "TLR4", "MYD88", "IRAK1", "IRAK4", "TRAF6", "NFKB1", "RELA"]),
        ),
        GeneSet::new(
            "cell_cycle",
            strings(&["CDK1", "CDK2", "CCNB1", "CCND1", "RB1", "E2F1", "TP53", "CDC20"]),
        ),
        GeneSet::new(
            "glycolysis",
            strings(&["HK1", "PFKM", "ALDOA", "GAPDH", "PGK1", "PKM", "LDHA", "ENO1"]),
        ),
    ])?;

    // the gene list of interest - NF-kB flavored
    let goi = strings(&["TNF", "TNFAIP3", "NFKBIA", "RELA", "NFKB1", "TRAF2", "TRAF6"]);

    let data = EnrichmentData::new(&goi, &collection)?;
    println!("Universe: {} genes, {} gene sets", data.n_genes(), data.n_sets());
    println!("GOI genes in universe: {}\n", data.goi_size());

    // gaussian fit, alpha = 0.5, seeded so reruns agree
    let mut model = EnrichModel::new()
        .with_alpha(0.5)
        .with_folds(5)
        .with_seed(42);
    model.fit(&data)?;

    let summary = model.summary()?;
    summary.print();
    println!();

    println!("lambda_min: {:.6}", model.lambda_min()?);
    println!("selected pathways: {:?}\n", model.selected_pathways()?);

    // leading-edge genes at a hand-picked threshold
    let predictions = model.predict(data.membership())?;
    let edge = leading_edge(predictions.view(), &data, 0.5)?;
    edge.print();

    Ok(())
}
