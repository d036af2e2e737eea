//! topicdash CLI: inspect, page and timecourse commands.
//!
//! Commands:
//! - `inspect`: axes, gene counts and input fingerprints of a dataset
//! - `page`: render one page of the global or tissue-scoped gene table
//! - `timecourse`: aggregated mean topic weights as CSV

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use topicdash_core::{Dataset, ScoreKey, Sign};
use topicdash_panels::{
    DashboardConfig, GeneTablePanel, GlobalScope, MiniPlot, ScopeStrategy, TableOptions,
    TableView, TissueScope,
};

const FILTER_ENV: &str = "TOPICDASH_LOG";

#[derive(Parser)]
#[command(name = "topicdash", version, about = "topicdash CLI: topic timecourse and gene score tables")]
struct Cli {
    #[command(flatten)]
    inputs: InputArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Input and table flags shared by every command. Each overrides the
/// matching config entry.
#[derive(Debug, Clone, Default, clap::Args)]
struct InputArgs {
    /// TOML config file (default: <config_dir>/topicdash/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Per-sample topic weights (CSV)
    #[arg(long, global = true)]
    topics: Option<PathBuf>,

    /// Expression matrix (GCT)
    #[arg(long, global = true)]
    cpm: Option<PathBuf>,

    /// Global gene/topic scores (CSV)
    #[arg(long = "global-z", global = true)]
    global_scores: Option<PathBuf>,

    /// Tissue-scoped gene/topic scores (CSV)
    #[arg(long = "tissue-z", global = true)]
    tissue_scores: Option<PathBuf>,

    /// Genes per table page
    #[arg(long, global = true)]
    page_size: Option<usize>,

    /// Score column header
    #[arg(long, global = true)]
    score_name: Option<String>,
}

impl InputArgs {
    fn apply(&self, mut config: DashboardConfig) -> DashboardConfig {
        let inputs = &mut config.inputs;
        if let Some(p) = &self.topics {
            inputs.topics = Some(p.clone());
        }
        if let Some(p) = &self.cpm {
            inputs.cpm = Some(p.clone());
        }
        if let Some(p) = &self.global_scores {
            inputs.global_scores = Some(p.clone());
        }
        if let Some(p) = &self.tissue_scores {
            inputs.tissue_scores = Some(p.clone());
        }
        if let Some(n) = self.page_size {
            config.table.page_size = n;
        }
        if let Some(name) = &self.score_name {
            config.table.score_name = name.clone();
        }
        config
    }

    fn load(&self) -> Result<(Dataset, TableOptions)> {
        let config = DashboardConfig::discover(self.config.as_deref()).context("loading config")?;
        let config = self.apply(config);
        config.validate().context("invalid configuration")?;
        let paths = config.dataset_paths()?;
        let dataset = Dataset::load(&paths).context("loading dataset")?;
        Ok((dataset, config.table))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print axes, gene counts and input fingerprints.
    Inspect {
        /// Emit JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Render one page of a gene table.
    Page {
        /// Which score table to page through.
        #[arg(long, value_enum, default_value_t = TableKind::Global)]
        table: TableKind,

        /// Topic to rank by (default: the configured default topic).
        #[arg(long)]
        topic: Option<String>,

        /// Tissue to rank within (tissue table only).
        #[arg(long)]
        tissue: Option<String>,

        /// Correlation direction.
        #[arg(long, value_enum, default_value_t = SignArg::Positive)]
        sign: SignArg,

        /// Number of forward page steps from the first page.
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Emit the table view as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print mean topic weights per (tissue, timepoint, topic) as CSV.
    Timecourse {
        /// Pool all tissues per timepoint.
        #[arg(long, default_value_t = false)]
        pooled: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TableKind {
    Global,
    Tissue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SignArg {
    Positive,
    Negative,
}

impl From<SignArg> for Sign {
    fn from(s: SignArg) -> Sign {
        match s {
            SignArg::Positive => Sign::Positive,
            SignArg::Negative => Sign::Negative,
        }
    }
}

/// What `page` was asked to show.
#[derive(Debug, Clone)]
struct PageRequest {
    table: TableKind,
    topic: Option<String>,
    tissue: Option<String>,
    sign: Sign,
    steps: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let (dataset, options) = cli.inputs.load()?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Inspect { json } => run_inspect(&dataset, json, &mut out),
        Commands::Page {
            table,
            topic,
            tissue,
            sign,
            page,
            json,
        } => {
            let request = PageRequest {
                table,
                topic,
                tissue,
                sign: sign.into(),
                steps: page,
            };
            let view = render_page(&dataset, &options, &request)?;
            if json {
                serde_json::to_writer_pretty(&mut out, &view)?;
                writeln!(out)?;
                Ok(())
            } else {
                print_table(&view, &mut out)
            }
        }
        Commands::Timecourse { pooled } => write_timecourse(&dataset, pooled, &mut out),
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing tracing subscriber: {e}"))
}

fn run_inspect(dataset: &Dataset, json: bool, out: &mut impl Write) -> Result<()> {
    let tc = &dataset.timecourse;
    let labels = |v: &[topicdash_core::OrdinalLabel]| -> Vec<String> {
        v.iter().map(|l| l.as_str().to_string()).collect()
    };
    let missing = dataset.genes_missing_expression();

    if json {
        let summary = serde_json::json!({
            "samples": tc.sample_count(),
            "tissues": tc.tissues(),
            "timepoints": labels(tc.timepoints()),
            "topics": labels(tc.topics()),
            "expression_genes": dataset.expression.gene_count(),
            "global_score_genes": dataset.global_scores.gene_count(),
            "tissue_score_genes": dataset.tissue_scores.as_ref().map(|s| s.gene_count()),
            "genes_missing_expression": missing,
            "fingerprints": dataset.fingerprints,
        });
        serde_json::to_writer_pretty(&mut *out, &summary)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "=== Dataset ===")?;
    writeln!(out, "Samples:        {}", tc.sample_count())?;
    writeln!(out, "Tissues:        {}", tc.tissues().join(", "))?;
    writeln!(out, "Timepoints:     {}", labels(tc.timepoints()).join(", "))?;
    writeln!(out, "Topics:         {}", labels(tc.topics()).join(", "))?;
    writeln!(out, "Expression:     {} genes", dataset.expression.gene_count())?;
    writeln!(
        out,
        "Global scores:  {} genes x {} topics",
        dataset.global_scores.gene_count(),
        dataset.global_scores.topics().len()
    )?;
    match &dataset.tissue_scores {
        Some(s) => writeln!(
            out,
            "Tissue scores:  {} genes x {} topics in {} tissues",
            s.gene_count(),
            s.topics().len(),
            s.tissues().len()
        )?,
        None => writeln!(out, "Tissue scores:  (none)")?,
    }
    if !missing.is_empty() {
        writeln!(out, "WARNING: {} ranked genes lack expression data", missing.len())?;
    }
    writeln!(out)?;
    writeln!(out, "--- Inputs ---")?;
    writeln!(out, "{:<14} {:<14} {:>10}  Path", "Role", "BLAKE3", "Bytes")?;
    for fp in &dataset.fingerprints {
        writeln!(
            out,
            "{:<14} {:<14} {:>10}  {}",
            fp.role,
            fp.short(),
            fp.bytes,
            fp.path.display()
        )?;
    }
    Ok(())
}

fn build_panel(
    dataset: &Dataset,
    options: &TableOptions,
    request: &PageRequest,
) -> Result<GeneTablePanel> {
    let mut options = options.clone();
    if request.topic.is_some() {
        options.default_topic = request.topic.clone();
    }

    let scope: Box<dyn ScopeStrategy> = match request.table {
        TableKind::Global => Box::new(GlobalScope::new(Arc::clone(&dataset.global_scores))?),
        TableKind::Tissue => {
            let store = dataset
                .tissue_scores
                .as_ref()
                .context("no tissue-scoped scores configured (--tissue-z)")?;
            Box::new(TissueScope::new(Arc::clone(store))?)
        }
    };
    let mut panel = GeneTablePanel::new(scope, Arc::clone(&dataset.expression), &options)?;

    let default = panel.default_key().clone();
    let key = match (request.table, &request.tissue) {
        (TableKind::Global, Some(_)) => bail!("--tissue only applies to --table tissue"),
        (TableKind::Global, None) => {
            ScoreKey::global(request.topic.clone().unwrap_or(default.topic))
        }
        (TableKind::Tissue, Some(tissue)) => ScoreKey::tissue(
            tissue.clone(),
            request.topic.clone().unwrap_or(default.topic),
        ),
        (TableKind::Tissue, None) => match &request.topic {
            Some(topic) if default.topic != *topic => {
                bail!("no tissue has scores for topic '{topic}'")
            }
            _ => default,
        },
    };
    panel
        .initialize(key)
        .context("selecting score table")?;
    Ok(panel)
}

fn render_page(dataset: &Dataset, options: &TableOptions, request: &PageRequest) -> Result<TableView> {
    let mut panel = build_panel(dataset, options, request)?;
    panel.on_sign_changed(request.sign);
    for step in 0..request.steps {
        if !panel.on_page_forward() {
            debug!(step, "last page reached");
            break;
        }
    }
    let view = panel.render_page().context("rendering page")?;
    info!(key = %view.key, sign = %view.sign, page_start = view.page_start, "page rendered");
    Ok(view)
}

/// Highest expression value across all lines of a mini-plot.
fn peak(plot: &MiniPlot) -> Option<f64> {
    plot.lines
        .iter()
        .flat_map(|l| l.points.iter().map(|p| p.value))
        .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
}

fn print_table(view: &TableView, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", view.title)?;
    let end = (view.page_start + view.rows.len()).min(view.total);
    writeln!(
        out,
        "[{}]  {}-{} of {}",
        view.sign.label(),
        view.page_start,
        end.saturating_sub(1),
        view.total
    )?;
    writeln!(out)?;

    let [rank, gene, score, cpm] = view.header();
    writeln!(out, "{rank:>5} {gene:<16} {score:>8} {cpm:>10}")?;
    writeln!(out, "{}", "-".repeat(42))?;
    for row in &view.rows {
        let cpm = row
            .charts
            .first()
            .and_then(peak)
            .map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));
        writeln!(
            out,
            "{:>5} {:<16} {:>8} {:>10}",
            row.rank, row.gene, row.score_label, cpm
        )?;
    }
    if view.rows.is_empty() {
        writeln!(out, "(no genes)")?;
    }

    let mut controls = Vec::new();
    if view.can_page_back {
        controls.push("< Previous Genes");
    }
    if view.can_page_forward {
        controls.push("Next Genes >");
    }
    if !controls.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", controls.join("  "))?;
    }
    Ok(())
}

fn write_timecourse(dataset: &Dataset, pooled: bool, out: impl Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["tissue", "timepoint", "topic", "weight"])?;
    for w in dataset.timecourse.weights(pooled) {
        let weight = w.weight.to_string();
        writer.write_record([
            w.tissue.as_deref().unwrap_or("all"),
            w.timepoint.as_str(),
            w.topic.as_str(),
            weight.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use topicdash_core::{ExpressionLookup, ScoreScope, ScoreStore, TopicTimecourse};

    const TOPICS: &str = "sample,k1,k2\n\
liver_d1_m1,0.7,0.3\n\
liver_d7_m1,0.2,0.8\n\
lung_d1_m1,0.5,0.5\n";

    const CPM: &str = "#1.2\n3\t3\n\
Name\tDescription\tliver_d1_m1\tliver_d7_m1\tlung_d1_m1\n\
a\ta\t1\t2\t3\n\
b\tb\t4\t5\t6\n\
c\tc\t7\t8\t9\n";

    const GLOBAL: &str = "gene,k1,k2\na,3.0,-1.0\nb,2.0,1.0\nc,1.0,2.0\n";

    const TISSUE: &str = "tissue,gene,k1,k2\n\
liver,a,1.0,0.5\n\
liver,b,2.0,-0.5\n\
lung,c,1.5,1.0\n";

    fn dataset() -> Dataset {
        Dataset {
            timecourse: TopicTimecourse::from_reader(TOPICS.as_bytes(), "topics").unwrap(),
            expression: Arc::new(ExpressionLookup::from_gct(CPM.as_bytes(), "cpm").unwrap()),
            global_scores: Arc::new(
                ScoreStore::from_reader(GLOBAL.as_bytes(), "global", ScoreScope::Global).unwrap(),
            ),
            tissue_scores: Some(Arc::new(
                ScoreStore::from_reader(TISSUE.as_bytes(), "tissue", ScoreScope::TissueScoped)
                    .unwrap(),
            )),
            fingerprints: Vec::new(),
        }
    }

    fn options(page_size: usize) -> TableOptions {
        TableOptions {
            page_size,
            ..TableOptions::default()
        }
    }

    fn request(table: TableKind) -> PageRequest {
        PageRequest {
            table,
            topic: None,
            tissue: None,
            sign: Sign::Positive,
            steps: 0,
        }
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "topicdash",
            "page",
            "--table",
            "tissue",
            "--sign",
            "negative",
            "--cpm",
            "x.gct",
        ])
        .unwrap();
        assert_eq!(cli.inputs.cpm, Some(PathBuf::from("x.gct")));
        match cli.command {
            Commands::Page { table, sign, .. } => {
                assert_eq!(table, TableKind::Tissue);
                assert_eq!(Sign::from(sign), Sign::Negative);
            }
            _ => panic!("expected page"),
        }
    }

    #[test]
    fn page_steps_clamp_to_last_page() {
        let ds = dataset();
        let mut req = request(TableKind::Global);
        req.steps = 10;
        let view = render_page(&ds, &options(2), &req).unwrap();
        assert_eq!(view.total, 3);
        assert_eq!(view.page_start, 1);
        let genes: Vec<&str> = view.rows.iter().map(|r| r.gene.as_str()).collect();
        assert_eq!(genes, vec!["b", "c"]);
    }

    #[test]
    fn page_respects_topic_and_sign() {
        let ds = dataset();
        let mut req = request(TableKind::Global);
        req.topic = Some("k2".into());
        req.sign = Sign::Negative;
        let view = render_page(&ds, &options(5), &req).unwrap();
        assert_eq!(view.key, ScoreKey::global("k2"));
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].gene, "a");
    }

    #[test]
    fn tissue_page_uses_requested_tissue() {
        let ds = dataset();
        let mut req = request(TableKind::Tissue);
        req.tissue = Some("lung".into());
        let view = render_page(&ds, &options(5), &req).unwrap();
        assert_eq!(view.key, ScoreKey::tissue("lung", "k1"));
        assert_eq!(view.title, "Genes Correlated with k1 in lung");
        assert_eq!(view.rows[0].charts.len(), 2);
    }

    #[test]
    fn unknown_tissue_is_an_error() {
        let ds = dataset();
        let mut req = request(TableKind::Tissue);
        req.tissue = Some("brain".into());
        assert!(render_page(&ds, &options(5), &req).is_err());
    }

    #[test]
    fn tissue_flag_rejected_for_global_table() {
        let ds = dataset();
        let mut req = request(TableKind::Global);
        req.tissue = Some("liver".into());
        assert!(render_page(&ds, &options(5), &req).is_err());
    }

    #[test]
    fn text_table_lists_rows_and_controls() {
        let ds = dataset();
        let view = render_page(&ds, &options(2), &request(TableKind::Global)).unwrap();
        let mut out = Vec::new();
        print_table(&view, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Genes Correlated with k1\n"));
        assert!(text.contains("[positive score]  0-1 of 3"));
        assert!(text.contains("Next Genes >"));
        assert!(!text.contains("< Previous Genes"));
    }

    #[test]
    fn timecourse_csv_pooled_and_faceted() {
        let ds = dataset();
        let mut out = Vec::new();
        write_timecourse(&ds, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("tissue,timepoint,topic,weight\n"));
        assert!(text.contains("liver,d7,k2,0.8"));

        let mut out = Vec::new();
        write_timecourse(&ds, true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("all,d1,k1,"));
        assert!(!text.contains("liver,"));
    }

    #[test]
    fn inspect_json_reports_axes() {
        let ds = dataset();
        let mut out = Vec::new();
        run_inspect(&ds, true, &mut out).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["tissues"], serde_json::json!(["liver", "lung"]));
        assert_eq!(v["timepoints"], serde_json::json!(["d1", "d7"]));
        assert_eq!(v["expression_genes"], 3);
    }
}
