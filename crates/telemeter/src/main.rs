mod output;

use std::collections::BTreeMap;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use telemeter_agg::pipeline::{aggregate, AggregateOptions};
use telemeter_core::config::{Config, ResetPolicy};
use telemeter_core::model::aggregate::MetricReport;
use telemeter_core::registry::{MetricKind, Registry};
use telemeter_ingest::adapter::ChannelAdapter;
use telemeter_ingest::record::parse_feed;
use tracing_subscriber::EnvFilter;

use crate::output::{print_chart_human, print_metrics_human, print_report_human};

#[derive(Parser, Debug)]
#[command(name = "telemeter")]
#[command(about = "Sensor channel aggregation utility")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Aggregate a feed document into windows and buckets")]
    Aggregate {
        #[arg(long, help = "Feed JSON file, or - for stdin")]
        input: PathBuf,
        #[arg(long, help = "Metric kind; omit for every mapped metric")]
        metric: Option<String>,
        #[arg(long, help = "Counter reset policy: clamp or passthrough")]
        reset: Option<String>,
        #[arg(long)]
        hourly_limit: Option<usize>,
        #[arg(long)]
        daily_limit: Option<usize>,
        #[arg(long)]
        monthly_limit: Option<usize>,
    },
    #[command(about = "Emit the chart-ready series for one metric")]
    Chart {
        #[arg(long, help = "Feed JSON file, or - for stdin")]
        input: PathBuf,
        #[arg(long)]
        metric: String,
        #[arg(long, help = "Counter reset policy: clamp or passthrough")]
        reset: Option<String>,
    },
    #[command(about = "List supported metrics and their field mapping")]
    Metrics,
}

fn main() -> anyhow::Result<()> {
    init_cli_tracing();
    let cli = Cli::parse();
    let cfg = Config::load().context("load configuration")?;
    let registry = Registry::builtin();

    match cli.command {
        Commands::Aggregate {
            input,
            metric,
            reset,
            hourly_limit,
            daily_limit,
            monthly_limit,
        } => {
            let mut opts = AggregateOptions::from_config(&cfg);
            if let Some(reset) = reset {
                opts.reset_policy = ResetPolicy::from_str(&reset)?;
            }
            if let Some(v) = hourly_limit {
                opts.hourly_limit = v;
            }
            if let Some(v) = daily_limit {
                opts.daily_limit = v;
            }
            if let Some(v) = monthly_limit {
                opts.monthly_limit = v;
            }

            let records = parse_feed(&read_input(&input)?)?;
            let adapter = ChannelAdapter::new(&cfg.field_map)?;

            let kinds: Vec<MetricKind> = match metric {
                Some(name) => vec![MetricKind::from_str(&name)?],
                None => cfg.field_map.iter().map(|(kind, _)| *kind).collect(),
            };

            let mut reports: BTreeMap<String, MetricReport> = BTreeMap::new();
            for kind in kinds {
                let descriptor = registry
                    .get(kind)
                    .with_context(|| format!("no descriptor for metric {kind}"))?;
                let raw = adapter.extract(&records, kind)?;
                reports.insert(kind.to_string(), aggregate(descriptor, &raw, &opts));
            }

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for (name, report) in &reports {
                    let kind = MetricKind::from_str(name)?;
                    let descriptor = registry
                        .get(kind)
                        .with_context(|| format!("no descriptor for metric {kind}"))?;
                    print_report_human(descriptor, report);
                }
            }
            Ok(())
        }
        Commands::Chart {
            input,
            metric,
            reset,
        } => {
            let mut opts = AggregateOptions::from_config(&cfg);
            if let Some(reset) = reset {
                opts.reset_policy = ResetPolicy::from_str(&reset)?;
            }

            let kind = MetricKind::from_str(&metric)?;
            let descriptor = registry
                .get(kind)
                .with_context(|| format!("no descriptor for metric {kind}"))?;
            let records = parse_feed(&read_input(&input)?)?;
            let adapter = ChannelAdapter::new(&cfg.field_map)?;
            let raw = adapter.extract(&records, kind)?;
            let report = aggregate(descriptor, &raw, &opts);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report.chart_series)?);
            } else {
                print_chart_human(descriptor, &report.chart_series);
            }
            Ok(())
        }
        Commands::Metrics => {
            if cli.json {
                let listing: Vec<_> = registry
                    .iter()
                    .map(|d| {
                        serde_json::json!({
                            "kind": d.kind,
                            "unit": d.unit,
                            "precision": d.precision,
                            "cumulative": d.cumulative,
                            "field": field_for(&cfg, d.kind),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                print_metrics_human(&registry, &cfg);
            }
            Ok(())
        }
    }
}

fn field_for(cfg: &Config, kind: MetricKind) -> Option<u8> {
    cfg.field_map
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, index)| *index)
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read feed from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("read feed {}", path.display()))
}

fn init_cli_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .compact()
        .try_init();
}
