use std::{fs, io, path::PathBuf, sync::Arc};

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use complaint_triage::{
    complaint::{ClassificationOutcome, Complaint, ProcessedComplaint, ProcessingResult},
    config::TriageConfig,
    lexicon::Lexicons,
    nlp::{LexiconSentiment, RuleTagger},
    pipeline::ComplaintPipeline,
    report::AnalysisReport,
    validation::validate_complaint_text,
};
use dotenvy::dotenv;

#[derive(Parser, Debug)]
#[command(
    name = "complaint-triage",
    version,
    about = "Assign a department and priority to citizen complaints"
)]
struct Cli {
    /// Complaint text; read from stdin when neither this nor --batch is given
    #[arg(long, conflicts_with = "batch")]
    text: Option<String>,

    /// File with one complaint per line
    #[arg(long, value_name = "FILE")]
    batch: Option<PathBuf>,

    /// JSON lexicon file overriding the built-in keyword tables
    #[arg(long, value_name = "FILE")]
    lexicon: Option<PathBuf>,

    /// Print machine-readable JSON instead of the human summary
    #[arg(long)]
    json: bool,

    /// Print the JSON schema of lexicon files and exit
    #[arg(long)]
    print_lexicon_schema: bool,

    /// Print the active lexicons as JSON and exit
    #[arg(long)]
    print_lexicon: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    if cli.print_lexicon_schema {
        println!("{}", Lexicons::json_schema()?);
        return Ok(());
    }

    let config = TriageConfig::from_env()?.with_lexicon_path(cli.lexicon.clone());
    let lexicons = config.load_lexicons()?;

    if cli.print_lexicon {
        println!("{}", serde_json::to_string_pretty(&lexicons)?);
        return Ok(());
    }

    let pipeline = ComplaintPipeline::standard(
        Arc::new(lexicons),
        Arc::new(RuleTagger::new()),
        Arc::new(LexiconSentiment::new()),
    );

    if let Some(path) = &cli.batch {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Cannot read batch file {}", path.display()))?;
        let texts: Vec<&str> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let outcomes = pipeline.classify_batch(&texts).await;
        print_batch(&texts, &outcomes, cli.json)?;
        return Ok(());
    }

    let complaint_content = match cli.text {
        Some(text) => text,
        None => {
            println!("Please enter the complaint description:");
            let mut input = String::new();
            io::stdin()
                .read_line(&mut input)
                .context("Error reading from stdin")?;
            input.trim().to_string()
        }
    };

    if cli.json {
        let report = pipeline
            .analyze_report(&complaint_content, config.bounds)
            .await;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Err(err) = validate_complaint_text(&complaint_content, config.bounds) {
        eprintln!("{}", err);
        let report = AnalysisReport::rejected(&err);
        println!(
            "Defaults assigned: department {} / priority {}",
            report.department_id, report.priority_score
        );
        return Ok(());
    }

    let complaint = Complaint::new("c1".to_string(), complaint_content, Utc::now());
    let analysis = pipeline.analyze(complaint).await;
    match &analysis.processed {
        Some(processed) => print_summary(processed),
        None => print_fallback(&analysis.outcome),
    }
    Ok(())
}

fn print_batch(
    texts: &[&str],
    outcomes: &[ClassificationOutcome],
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let reports: Vec<AnalysisReport> =
            outcomes.iter().map(AnalysisReport::from_outcome).collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for (text, outcome) in texts.iter().zip(outcomes) {
        let classification = outcome.classification();
        let marker = if outcome.cause().is_some() { " *" } else { "" };
        println!(
            "{} | {:<14} | {:<6} | {}{}",
            classification.department_id(),
            classification.department,
            classification.priority,
            text.chars().take(60).collect::<String>(),
            marker
        );
    }
    Ok(())
}

fn describe<T: std::fmt::Debug>(result: &ProcessingResult<T>) -> String {
    match result {
        ProcessingResult::Success(value) => format!("{:?}", value),
        ProcessingResult::Degraded(value, err) => format!("{:?} (degraded: {})", value, err),
        ProcessingResult::Processing => "Processing...".to_string(),
        ProcessingResult::Error(err) => format!("Error - {}", err),
    }
}

fn print_summary(processed: &ProcessedComplaint) {
    let outcome = ClassificationOutcome::from(processed);
    let classification = outcome.classification();

    println!("\n{}", "=".repeat(60));
    println!("COMPLAINT ANALYSIS RESULTS");
    println!("{}", "=".repeat(60));
    println!("Content: {}", processed.complaint.content);
    println!(
        "Submitted: {}",
        processed.complaint.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("Language: {}", describe(&processed.language));
    println!("Keywords: {}", describe(&processed.keywords));
    println!("Entity density: {}", describe(&processed.entities));
    println!("Sentiment: {}", describe(&processed.sentiment));
    println!("Urgency: {}", describe(&processed.urgency));
    println!(
        "Department: {} (id {})",
        classification.department,
        classification.department_id()
    );
    println!(
        "Priority: {} (score {})",
        classification.priority,
        classification.priority_score()
    );
    if let Some(cause) = outcome.cause() {
        println!("Note: classified with fallbacks - {}", cause);
    }
    println!("{}", "=".repeat(60));
}

fn print_fallback(outcome: &ClassificationOutcome) {
    let classification = outcome.classification();
    if let Some(cause) = outcome.cause() {
        eprintln!("Complaint analysis failed: {}", cause);
    }
    println!(
        "Defaults assigned: department {} / priority {}",
        classification.department_id(),
        classification.priority_score()
    );
}
