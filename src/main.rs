use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use arbor_io::{ExperimentName, ReportContents, ResultWriter, RunParameters, SampleReader};
use arbor_rf::dataset::loan_applicants;
use arbor_rf::{
    ClassLabel, DecisionGrid, GridConfig, Node, Point, RandomForest, RandomForestConfig, Sample,
    SurrogateConfig, extract_rules, fidelity, tidy_rule,
};

#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "Random forest voting and surrogate-tree rules for loan applicants")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Seed for the Park-Miller stream shared by all trees
    #[arg(long, default_value_t = 42, global = true, allow_negative_numbers = true)]
    seed: i64,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 50, global = true)]
    n_trees: usize,

    /// Depth limit of each forest tree (root is depth 0)
    #[arg(long, default_value_t = 2, global = true)]
    max_depth: usize,

    /// Depth limit of the surrogate tree
    #[arg(long, default_value_t = 3, global = true)]
    surrogate_depth: usize,

    /// Applicant CSV (income,score,label); the built-in 18 applicants if omitted
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel inference (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// The applicant to classify.
#[derive(Args, Debug, Clone, Copy)]
struct ApplicantArgs {
    /// Annual income, in thousands
    #[arg(long, allow_negative_numbers = true)]
    income: f64,

    /// Credit score
    #[arg(long, allow_negative_numbers = true)]
    score: f64,
}

impl ApplicantArgs {
    fn point(self) -> Point {
        Point::new(self.income, self.score)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Poll every tree for one applicant and print the vote tally
    Vote {
        #[command(flatten)]
        applicant: ApplicantArgs,
    },

    /// Fit the surrogate tree and print its rules with fidelity to the forest
    Rules,

    /// Classify a lattice over the applicants' bounding box
    Grid {
        /// Lattice rows (score axis)
        #[arg(long, default_value_t = 80)]
        rows: usize,

        /// Lattice columns (income axis)
        #[arg(long, default_value_t = 80)]
        cols: usize,
    },

    /// Write report and grid artifacts for one applicant
    Report {
        #[command(flatten)]
        applicant: ApplicantArgs,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct VoteOutput {
    income: f64,
    score: f64,
    class: ClassLabel,
    class_name: Option<&'static str>,
    votes: BTreeMap<ClassLabel, usize>,
    confidence: f64,
    n_trees: usize,
}

#[derive(Serialize)]
struct RulesOutput {
    surrogate_depth: usize,
    n_leaves: usize,
    rules: Vec<String>,
    fidelity: f64,
}

#[derive(Serialize)]
struct GridOutput {
    rows: usize,
    cols: usize,
    class_shares: BTreeMap<ClassLabel, f64>,
}

#[derive(Serialize)]
struct ReportOutput {
    experiment: String,
    class: ClassLabel,
    rule: String,
    surrogate_agrees: bool,
    fidelity: f64,
    training_accuracy: f64,
    report_path: PathBuf,
    grid_path: PathBuf,
}

fn load_samples(data: Option<&Path>) -> Result<Vec<Sample>> {
    match data {
        Some(path) => {
            let samples = SampleReader::new(path)
                .read()
                .context("failed to read applicant CSV")?;
            info!(n_samples = samples.len(), path = %path.display(), "dataset loaded");
            Ok(samples)
        }
        None => {
            let samples = loan_applicants();
            info!(n_samples = samples.len(), "using built-in applicants");
            Ok(samples)
        }
    }
}

fn train(cli: &Cli, data: &[Sample]) -> Result<RandomForest> {
    RandomForestConfig::new(cli.n_trees)?
        .with_max_depth(cli.max_depth)
        .with_seed(cli.seed)
        .fit(data)
        .context("forest training failed")
}

fn fit_surrogate(cli: &Cli, data: &[Sample], forest: &RandomForest) -> Result<Node> {
    SurrogateConfig::new(cli.surrogate_depth)?
        .fit(data, forest)
        .context("surrogate fitting failed")
}

fn tidied_rules(surrogate: &Node) -> Vec<String> {
    extract_rules(surrogate).map(|r| tidy_rule(&r)).collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    let data = load_samples(cli.data.as_deref())?;
    let forest = train(&cli, &data)?;

    match &cli.command {
        Command::Vote { applicant } => {
            let result = forest.vote(&applicant.point())?;
            let output = VoteOutput {
                income: applicant.income,
                score: applicant.score,
                class: result.class,
                class_name: result.class.name(),
                confidence: result.confidence(),
                n_trees: forest.n_trees(),
                votes: result.votes,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Rules => {
            let surrogate = fit_surrogate(&cli, &data, &forest)?;
            let agreement = fidelity(&surrogate, &forest, &data)?;
            let output = RulesOutput {
                surrogate_depth: cli.surrogate_depth,
                n_leaves: surrogate.n_leaves(),
                rules: tidied_rules(&surrogate),
                fidelity: agreement.accuracy(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Grid { rows, cols } => {
            let config = GridConfig::new(*rows, *cols)?;
            let grid = DecisionGrid::compute(&config, &data, &forest)
                .context("grid classification failed")?;
            let output = GridOutput {
                rows: grid.rows(),
                cols: grid.cols(),
                class_shares: grid.class_shares(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Report {
            applicant,
            experiment,
            output_dir,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;

            let surrogate = fit_surrogate(&cli, &data, &forest)?;
            let explanation = forest.explain(&surrogate, &applicant.point())?;
            let rules = tidied_rules(&surrogate);
            let agreement = fidelity(&surrogate, &forest, &data)?;
            let training = forest.evaluate(&data)?;
            let grid = DecisionGrid::compute(&GridConfig::default(), &data, &forest)
                .context("grid classification failed")?;

            let parameters = RunParameters {
                seed: cli.seed,
                n_trees: cli.n_trees,
                max_depth: cli.max_depth,
                surrogate_depth: cli.surrogate_depth,
                n_samples: data.len(),
            };

            let writer = ResultWriter::new(output_dir, experiment_name)?;
            let report_path = writer.write_report(&ReportContents {
                parameters: &parameters,
                explanation: &explanation,
                rules: &rules,
                fidelity: &agreement,
                training: &training,
            })?;
            let grid_path = writer.write_grid(&grid)?;

            let output = ReportOutput {
                experiment: experiment.clone(),
                class: explanation.vote.class,
                surrogate_agrees: explanation.agrees(),
                rule: explanation.rule,
                fidelity: agreement.accuracy(),
                training_accuracy: training.accuracy(),
                report_path,
                grid_path,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
