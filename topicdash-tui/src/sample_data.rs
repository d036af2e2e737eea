//! Built-in demo dataset for `--demo` and for tests.
//!
//! Deterministic: two tissues, five timepoints, four topics, fifteen genes,
//! two replicates per (tissue, timepoint). Generated as text and parsed by
//! the regular loaders.

use std::sync::Arc;

use topicdash_core::{
    DataError, Dataset, ExpressionLookup, ScoreScope, ScoreStore, TopicTimecourse,
};

pub const TISSUES: [&str; 2] = ["liver", "lung"];
pub const TIMEPOINTS: [&str; 5] = ["d0", "d1", "d3", "d7", "d14"];
pub const TOPICS: usize = 4;
pub const REPLICATES: usize = 2;
pub const GENES: [&str; 15] = [
    "Saa3", "Lcn2", "Il6", "Cxcl1", "Alb", "Apoa1", "Sftpc", "Ager", "Cd74", "H2-Ab1", "Mki67",
    "Top2a", "Col1a1", "Acta2", "Actb",
];

fn samples() -> Vec<(usize, usize, usize, String)> {
    let mut out = Vec::new();
    for (t, tissue) in TISSUES.iter().enumerate() {
        for (p, tp) in TIMEPOINTS.iter().enumerate() {
            for r in 0..REPLICATES {
                out.push((t, p, r, format!("{tissue}_{tp}_m{}", r + 1)));
            }
        }
    }
    out
}

pub fn topics_csv() -> String {
    let mut csv = String::from("sample");
    for k in 1..=TOPICS {
        csv.push_str(&format!(",k{k}"));
    }
    csv.push('\n');
    for (t, p, r, id) in samples() {
        let raw: Vec<f64> = (0..TOPICS)
            .map(|k| 1.0 + (((t + 1) * (k + 1) * (p + 2) + r) % 7) as f64)
            .collect();
        let sum: f64 = raw.iter().sum();
        csv.push_str(&id);
        for w in raw {
            csv.push_str(&format!(",{:.4}", w / sum));
        }
        csv.push('\n');
    }
    csv
}

pub fn cpm_gct() -> String {
    let samples = samples();
    let mut gct = format!("#1.3\n{}\t{}\t0\t2\nid", GENES.len(), samples.len());
    for (_, _, _, id) in &samples {
        gct.push('\t');
        gct.push_str(id);
    }
    gct.push_str("\norgan");
    for (t, _, _, _) in &samples {
        gct.push('\t');
        gct.push_str(TISSUES[*t]);
    }
    gct.push_str("\ntimepoint");
    for (_, p, _, _) in &samples {
        gct.push('\t');
        gct.push_str(TIMEPOINTS[*p]);
    }
    gct.push('\n');
    for (g, gene) in GENES.iter().enumerate() {
        gct.push_str(gene);
        for (t, p, r, _) in &samples {
            let v = 10 + (g * 31 + t * 7 + p * 11 + r * 3) % 97;
            gct.push_str(&format!("\t{v}"));
        }
        gct.push('\n');
    }
    gct
}

pub fn global_scores_csv() -> String {
    let mut csv = String::from("gene");
    for k in 1..=TOPICS {
        csv.push_str(&format!(",k{k}"));
    }
    csv.push('\n');
    for (g, gene) in GENES.iter().enumerate() {
        csv.push_str(gene);
        for k in 0..TOPICS {
            let z = ((g * 7 + k * 13) % 11) as f64 - 5.0;
            csv.push_str(&format!(",{}", z / 2.0));
        }
        csv.push('\n');
    }
    csv
}

pub fn tissue_scores_csv() -> String {
    let mut csv = String::from("organ,gene");
    for k in 1..=TOPICS {
        csv.push_str(&format!(",k{k}"));
    }
    csv.push('\n');
    for (t, tissue) in TISSUES.iter().enumerate() {
        for (g, gene) in GENES.iter().enumerate() {
            csv.push_str(&format!("{tissue},{gene}"));
            for k in 0..TOPICS {
                let z = ((g * 5 + k * 3 + t * 17) % 13) as f64 - 6.0;
                csv.push_str(&format!(",{}", z / 2.0));
            }
            csv.push('\n');
        }
    }
    csv
}

pub fn sample_dataset() -> Result<Dataset, DataError> {
    let timecourse = TopicTimecourse::from_reader(topics_csv().as_bytes(), "demo topics")?;
    let expression = ExpressionLookup::from_gct(cpm_gct().as_bytes(), "demo cpm")?;
    let global = ScoreStore::from_reader(
        global_scores_csv().as_bytes(),
        "demo global scores",
        ScoreScope::Global,
    )?;
    let tissue = ScoreStore::from_reader(
        tissue_scores_csv().as_bytes(),
        "demo tissue scores",
        ScoreScope::TissueScoped,
    )?;
    Ok(Dataset {
        timecourse,
        expression: Arc::new(expression),
        global_scores: Arc::new(global),
        tissue_scores: Some(Arc::new(tissue)),
        fingerprints: Vec::new(),
    })
}
