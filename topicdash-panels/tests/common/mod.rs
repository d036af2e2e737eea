//! Shared fixtures: a small dataset built from inline tables.
//!
//! Genes `g0..g11`. Global `k1` has 7 positive and 5 negative scores, global
//! `k2` has 12 positive scores. Tissue scores cover `liver` and `lung` for
//! `k1` and `k3`; `k3` is absent from the global table.

#![allow(dead_code)]

use std::sync::Arc;

use topicdash_core::{Dataset, ExpressionLookup, ScoreScope, ScoreStore, TopicTimecourse};
use topicdash_panels::{GeneTablePanel, GlobalScope, TableOptions, TissueScope};

pub const GENES: usize = 12;

pub fn expression() -> Arc<ExpressionLookup> {
    let mut gct = format!(
        "#1.2\n{GENES}\t3\nName\tDescription\tliver_d1_m1\tliver_d2_m1\tlung_d1_m1\n"
    );
    for i in 0..GENES {
        gct.push_str(&format!("g{i}\tna\t{}\t{}\t{}\n", i, i + 1, i * 2));
    }
    Arc::new(ExpressionLookup::from_gct(gct.as_bytes(), "cpm").unwrap())
}

pub fn global_csv() -> String {
    let mut csv = String::from("gene,k1,k2\n");
    for i in 0..GENES {
        let k1 = if i < 7 {
            (7 - i) as f64 * 0.5
        } else {
            -((i - 6) as f64)
        };
        let k2 = 1.0 + i as f64 * 0.1;
        csv.push_str(&format!("g{i},{k1},{k2}\n"));
    }
    csv
}

pub fn tissue_csv() -> String {
    let mut csv = String::from("tissue,gene,k1,k3\n");
    for i in 0..6 {
        csv.push_str(&format!("liver,g{i},{},{}\n", i + 1, -((i + 1) as f64)));
    }
    for i in 6..9 {
        csv.push_str(&format!("lung,g{i},1.0,2.0\n"));
    }
    csv
}

pub fn global_store() -> Arc<ScoreStore> {
    Arc::new(ScoreStore::from_reader(global_csv().as_bytes(), "global", ScoreScope::Global).unwrap())
}

pub fn tissue_store() -> Arc<ScoreStore> {
    Arc::new(
        ScoreStore::from_reader(tissue_csv().as_bytes(), "tissue", ScoreScope::TissueScoped)
            .unwrap(),
    )
}

pub fn timecourse() -> TopicTimecourse {
    let csv = ",k1,k2,k3\n\
liver_d1_m1,0.5,0.3,0.2\n\
liver_d2_m1,0.1,0.1,0.8\n\
lung_d1_m1,0.3,0.3,0.4\n";
    TopicTimecourse::from_reader(csv.as_bytes(), "topics").unwrap()
}

pub fn options(page_size: usize) -> TableOptions {
    TableOptions {
        page_size,
        ..TableOptions::default()
    }
}

pub fn global_panel(page_size: usize) -> GeneTablePanel {
    let scope = GlobalScope::new(global_store()).unwrap();
    GeneTablePanel::new(Box::new(scope), expression(), &options(page_size)).unwrap()
}

pub fn tissue_panel(page_size: usize) -> GeneTablePanel {
    let scope = TissueScope::new(tissue_store()).unwrap();
    GeneTablePanel::new(Box::new(scope), expression(), &options(page_size)).unwrap()
}

pub fn dataset() -> Dataset {
    Dataset {
        timecourse: timecourse(),
        expression: expression(),
        global_scores: global_store(),
        tissue_scores: Some(tissue_store()),
        fingerprints: Vec::new(),
    }
}
