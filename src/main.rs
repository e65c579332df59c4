use admissions_engine::config::{parse_workers, EngineConfig};
use admissions_engine::error::AppError;
use admissions_engine::export::{write_records, OutputFormat};
use admissions_engine::ingest::read_records_from_path;
use admissions_engine::resolution::{GraduateResolution, UndergradResolution};
use admissions_engine::scores::{standardize_scores, ScoreStandardization};
use admissions_engine::{telemetry, BatchSummary, FieldValue, RecordNormalizer, ReferenceData};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "admissions-normalizer",
    about = "Normalize extracted admissions records into canonical features",
    version
)]
struct Cli {
    #[command(flatten)]
    overrides: OverrideArgs,
    #[command(subcommand)]
    command: Command,
}

/// Flags that take precedence over the environment configuration.
#[derive(Args, Debug, Default)]
struct OverrideArgs {
    /// Replacement undergraduate alias table (CSV with alias,tier)
    #[arg(long, global = true)]
    undergrad_aliases: Option<PathBuf>,
    /// Replacement graduate alias table (CSV with alias,tier)
    #[arg(long, global = true)]
    graduate_aliases: Option<PathBuf>,
    /// Replacement rank phrase rules (JSON)
    #[arg(long, global = true)]
    rank_phrases: Option<PathBuf>,
    /// Worker threads used for batch normalization
    #[arg(long, global = true, value_parser = parse_workers_arg)]
    workers: Option<NonZeroUsize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a file of extractor output (JSON array or JSON Lines)
    Normalize(NormalizeArgs),
    /// Resolve institution tiers
    Rank {
        #[command(subcommand)]
        command: RankCommand,
    },
    /// Classify and convert raw test sub-scores
    Score(ScoreArgs),
}

#[derive(Args, Debug)]
struct NormalizeArgs {
    /// Extractor output to read
    #[arg(long)]
    input: PathBuf,
    /// Destination for canonical records (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
    format: FormatArg,
    /// Write the batch summary as JSON here instead of stderr
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Csv,
    Jsonl,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Jsonl => OutputFormat::Jsonl,
        }
    }
}

#[derive(Subcommand, Debug)]
enum RankCommand {
    /// Tier of a self-reported undergraduate institution (1-5)
    Undergrad { name: String },
    /// Best tier among graduate placements (1-4), or null
    Graduate {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct ScoreArgs {
    #[arg(long)]
    quant: Option<f64>,
    #[arg(long)]
    verbal: Option<f64>,
    #[arg(long)]
    writing: Option<f64>,
}

#[derive(Debug, Serialize)]
struct UndergradRankResponse {
    institution: String,
    tier: Option<u8>,
    resolution: Option<UndergradResolution>,
}

#[derive(Debug, Serialize)]
struct GraduateRankResponse {
    institutions: Vec<String>,
    #[serde(flatten)]
    resolution: GraduateResolution,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = EngineConfig::load()?;
    apply_overrides(&mut config, cli.overrides);

    telemetry::init(&config.telemetry)?;

    if let Some(workers) = config.batch.workers {
        rayon::ThreadPoolBuilder::new()
            .num_threads(workers.get())
            .build_global()?;
    }

    let reference = ReferenceData::load(&config.reference)?;
    let normalizer = RecordNormalizer::from_reference(reference);
    info!(environment = ?config.environment, "reference data ready");

    let stdout = io::stdout();
    match cli.command {
        Command::Normalize(args) => run_normalize(&normalizer, &args),
        Command::Rank { command } => run_rank(&normalizer, command, stdout.lock()),
        Command::Score(args) => run_score(&args, stdout.lock()),
    }
}

fn apply_overrides(config: &mut EngineConfig, overrides: OverrideArgs) {
    if let Some(path) = overrides.undergrad_aliases {
        config.reference.undergraduate_aliases = Some(path);
    }
    if let Some(path) = overrides.graduate_aliases {
        config.reference.graduate_aliases = Some(path);
    }
    if let Some(path) = overrides.rank_phrases {
        config.reference.rank_phrases = Some(path);
    }
    if let Some(workers) = overrides.workers {
        config.batch.workers = Some(workers);
    }
}

fn parse_workers_arg(raw: &str) -> Result<NonZeroUsize, String> {
    parse_workers(raw).map_err(|err| err.to_string())
}

fn run_normalize(normalizer: &RecordNormalizer, args: &NormalizeArgs) -> Result<(), AppError> {
    let ingested = read_records_from_path(&args.input)?;
    let output = normalizer.normalize_batch(&ingested.records);
    let summary = output.summary.clone().with_skipped_payloads(ingested.skipped);
    let format = OutputFormat::from(args.format);

    match &args.output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            write_records(format, output.canonical_records(), writer)?;
        }
        None => {
            let stdout = io::stdout();
            write_records(format, output.canonical_records(), stdout.lock())?;
        }
    }

    write_summary(&summary, args.summary.as_deref())
}

fn write_summary(summary: &BatchSummary, path: Option<&Path>) -> Result<(), AppError> {
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, summary)?;
        }
        None => {
            let rendered = serde_json::to_string_pretty(summary)?;
            eprintln!("{rendered}");
        }
    }
    Ok(())
}

fn run_rank<W: Write>(
    normalizer: &RecordNormalizer,
    command: RankCommand,
    mut out: W,
) -> Result<(), AppError> {
    let ranks = normalizer.ranks();
    let rendered = match command {
        RankCommand::Undergrad { name } => {
            let resolution = ranks.resolve_undergrad(Some(name.as_str()));
            serde_json::to_string_pretty(&UndergradRankResponse {
                tier: resolution.as_ref().map(UndergradResolution::tier),
                institution: name,
                resolution,
            })?
        }
        RankCommand::Graduate { names } => {
            let resolution = ranks.resolve_graduate_outcome(&FieldValue::list(names.clone()));
            serde_json::to_string_pretty(&GraduateRankResponse {
                institutions: names,
                resolution,
            })?
        }
    };

    writeln!(out, "{rendered}")?;
    Ok(())
}

fn run_score<W: Write>(args: &ScoreArgs, mut out: W) -> Result<(), AppError> {
    let standardized: ScoreStandardization = standardize_scores(args.quant, args.verbal, args.writing);
    writeln!(out, "{}", serde_json::to_string_pretty(&standardized)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;

    fn normalizer() -> RecordNormalizer {
        RecordNormalizer::bundled().expect("bundled reference data loads")
    }

    #[test]
    fn parses_normalize_command_with_global_overrides() {
        let cli = Cli::try_parse_from([
            "admissions-normalizer",
            "normalize",
            "--input",
            "posts.jsonl",
            "--format",
            "jsonl",
            "--workers",
            "2",
        ])
        .expect("cli parses");

        assert_eq!(cli.overrides.workers.map(NonZeroUsize::get), Some(2));
        match cli.command {
            Command::Normalize(args) => {
                assert_eq!(args.input, PathBuf::from("posts.jsonl"));
                assert_eq!(args.format, FormatArg::Jsonl);
                assert!(args.output.is_none());
            }
            other => panic!("expected normalize command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_workers() {
        let result = Cli::try_parse_from([
            "admissions-normalizer",
            "score",
            "--quant",
            "165",
            "--workers",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn overrides_replace_config_paths() {
        let mut config = EngineConfig {
            environment: admissions_engine::config::EngineEnvironment::Test,
            reference: Default::default(),
            batch: Default::default(),
            telemetry: admissions_engine::config::TelemetryConfig {
                log_level: "info".to_string(),
            },
        };
        apply_overrides(
            &mut config,
            OverrideArgs {
                graduate_aliases: Some(PathBuf::from("graduate.csv")),
                ..OverrideArgs::default()
            },
        );
        assert_eq!(
            config.reference.graduate_aliases,
            Some(PathBuf::from("graduate.csv"))
        );
        assert_eq!(config.reference.undergraduate_aliases, None);
    }

    #[test]
    fn normalize_writes_records_and_summary_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("posts.jsonl");
        let output = dir.path().join("canonical.jsonl");
        let summary = dir.path().join("summary.json");
        fs::write(
            &input,
            "{\"original_post_id\": \"a\", \"undergrad_institution\": \"MIT\", \"schools_accepted\": [\"Harvard\"]}\nnot json\n{\"original_post_id\": \"b\"}\n",
        )
        .expect("write input");

        run_normalize(
            &normalizer(),
            &NormalizeArgs {
                input,
                output: Some(output.clone()),
                format: FormatArg::Jsonl,
                summary: Some(summary.clone()),
            },
        )
        .expect("normalize succeeds");

        let written = fs::read_to_string(&output).expect("read output");
        let rows: Vec<Value> = written
            .lines()
            .map(|line| serde_json::from_str(line).expect("row parses"))
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["undergrad_rank"], Value::from(1));
        assert_eq!(rows[0]["phd_outcome"], Value::from("offer"));
        assert_eq!(rows[1]["phd_outcome"], Value::from("unknown"));

        let summary: Value =
            serde_json::from_str(&fs::read_to_string(&summary).expect("read summary"))
                .expect("summary parses");
        assert_eq!(summary["total_records"], Value::from(2));
        assert_eq!(summary["skipped_payloads"], Value::from(1));
    }

    #[test]
    fn rank_commands_print_tiers() {
        let mut buffer = Vec::new();
        run_rank(
            &normalizer(),
            RankCommand::Undergrad {
                name: "top 15 public school, can't name it".to_string(),
            },
            &mut buffer,
        )
        .expect("rank undergrad");
        let value: Value = serde_json::from_slice(&buffer).expect("json output");
        assert_eq!(value["tier"], Value::from(3));
        assert_eq!(value["resolution"]["source"], Value::from("inferred"));

        let mut buffer = Vec::new();
        run_rank(
            &normalizer(),
            RankCommand::Graduate {
                names: vec!["Boston University".to_string(), "MIT".to_string()],
            },
            &mut buffer,
        )
        .expect("rank graduate");
        let value: Value = serde_json::from_slice(&buffer).expect("json output");
        assert_eq!(value["tier"], Value::from(1));
    }

    #[test]
    fn score_command_reports_conversion() {
        let mut buffer = Vec::new();
        run_score(
            &ScoreArgs {
                quant: Some(720.0),
                verbal: Some(160.0),
                writing: None,
            },
            &mut buffer,
        )
        .expect("score runs");
        let value: Value = serde_json::from_slice(&buffer).expect("json output");
        assert_eq!(value["scores"]["gre_quant"], Value::from(167));
        assert_eq!(value["scores"]["gre_verbal"], Value::from(160));
    }
}
