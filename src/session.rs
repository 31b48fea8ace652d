//! Interactive session loop.
//!
//! The session is the only stateful component: it holds the current
//! dataset and the active filtered subset, and dispatches operator
//! commands through the pipeline stages in order. Every fault is
//! surfaced as a message and the loop returns to the menu; nothing here
//! is fatal.

use crate::analysis::{analyze, filter_by_age};
use crate::config::Config;
use crate::error::InvalidNumberError;
use crate::ingest::{normalize, RecordFetcher};
use crate::models::{AnalysisResult, PatientTable};
use crate::report::{render_charts, write_summary, ChartOptions, View};
use anyhow::{Context, Result};
use chrono::Local;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

/// A numbered menu command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Fetch,
    Filter,
    Report,
    Exit,
}

impl Command {
    /// Parse operator menu input; anything but 1-4 is invalid.
    pub fn parse(input: &str) -> Option<Command> {
        match input.trim() {
            "1" => Some(Command::Fetch),
            "2" => Some(Command::Filter),
            "3" => Some(Command::Report),
            "4" => Some(Command::Exit),
            _ => None,
        }
    }
}

/// The interactive analysis session.
pub struct Session {
    fetcher: RecordFetcher,
    chart_options: ChartOptions,
    output_dir: PathBuf,
    current: PatientTable,
    filtered: PatientTable,
}

impl Session {
    /// Create a session from the merged configuration.
    pub fn new(config: &Config, show_progress: bool) -> Self {
        let output_dir = PathBuf::from(&config.report.output_dir);

        Self {
            fetcher: RecordFetcher::new(
                config.ingest.endpoint.clone(),
                config.ingest.timeout_seconds,
                show_progress,
            ),
            chart_options: ChartOptions {
                output_dir: output_dir.clone(),
                width: config.report.chart_width,
                height: config.report.chart_height,
            },
            output_dir,
            current: PatientTable::empty(),
            filtered: PatientTable::empty(),
        }
    }

    /// The current (unfiltered) dataset.
    pub fn current_table(&self) -> &PatientTable {
        &self.current
    }

    /// The active filtered subset (empty when no filter is in effect).
    pub fn filtered_table(&self) -> &PatientTable {
        &self.filtered
    }

    /// Run the menu loop until the operator exits (or input ends).
    pub async fn run<R: BufRead>(&mut self, input: &mut R) -> Result<()> {
        println!("\nWelcome to the EMR Analysis Console");

        loop {
            print_menu();

            let mut line = String::new();
            let bytes = input
                .read_line(&mut line)
                .context("Failed to read menu input")?;
            if bytes == 0 {
                debug!("End of input; exiting");
                break;
            }

            match Command::parse(&line) {
                Some(Command::Fetch) => self.handle_fetch().await,
                Some(Command::Filter) => self.handle_filter(input)?,
                Some(Command::Report) => self.handle_report(),
                Some(Command::Exit) => {
                    println!("Exiting the EMR console. Goodbye!");
                    break;
                }
                None => println!("Invalid choice. Please try again."),
            }
        }

        Ok(())
    }

    /// Fetch and normalize a fresh dataset.
    ///
    /// Always drops the filtered subset, even on failure: the old subset
    /// belonged to a superseded dataset. An ingestion fault leaves the
    /// session with an empty table and a surfaced message.
    pub async fn handle_fetch(&mut self) {
        self.filtered = PatientTable::empty();

        match self.fetcher.fetch().await {
            Ok(raw) => {
                self.current = normalize(&raw);
                if self.current.is_empty() {
                    println!("Failed to fetch patient data.");
                } else {
                    println!("Patient data fetched and cleaned successfully.");
                }
            }
            Err(e) => {
                self.current = PatientTable::empty();
                warn!("Ingestion failed: {}", e);
                println!("Error: {}", e);
                println!("Failed to fetch patient data.");
            }
        }
    }

    /// Prompt for an age range and set the filtered subset.
    ///
    /// Non-numeric input aborts the command with no state change. An empty
    /// filter result is reported but still becomes the active subset.
    pub fn handle_filter<R: BufRead>(&mut self, input: &mut R) -> Result<()> {
        if self.current.is_empty() {
            println!("No data available. Please fetch data first.");
            return Ok(());
        }

        let min_age = match parse_age(&prompt_line(input, "Enter minimum age: ")?) {
            Ok(age) => age,
            Err(e) => {
                debug!("Rejected filter input: {}", e);
                println!("Please enter valid numeric ages.");
                return Ok(());
            }
        };
        let max_age = match parse_age(&prompt_line(input, "Enter maximum age: ")?) {
            Ok(age) => age,
            Err(e) => {
                debug!("Rejected filter input: {}", e);
                println!("Please enter valid numeric ages.");
                return Ok(());
            }
        };

        match filter_by_age(&self.current, min_age, max_age) {
            Ok(table) => {
                if table.is_empty() {
                    println!("No patients found in this age range.");
                } else {
                    println!("\nFiltered Patients (Ages {}-{}):", min_age, max_age);
                    print_patients(&table);
                }
                self.filtered = table;
            }
            Err(e) => {
                warn!("Filter failed: {}", e);
                println!("Error: {}", e);
                self.filtered = PatientTable::empty();
            }
        }

        Ok(())
    }

    /// Analyze the active view and generate the report artifacts.
    ///
    /// Operates on the filtered subset when one is in effect, otherwise on
    /// the full table. Schema faults and artifact write failures are
    /// surfaced and the remaining steps still run.
    pub fn handle_report(&mut self) {
        if self.current.is_empty() {
            println!("No data available. Please fetch data first.");
            return;
        }

        let (view, table) = if self.filtered.is_empty() {
            (View::Full, &self.current)
        } else {
            (View::Filtered, &self.filtered)
        };

        let analysis = match analyze(table) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Analysis failed: {}", e);
                println!("Error: {}", e);
                AnalysisResult::baseline()
            }
        };

        let artifacts = render_charts(&analysis, table, view, &self.chart_options);

        let summary_path = self.output_dir.join(view.summary_file());
        match write_summary(&analysis, &summary_path) {
            Ok(()) => debug!("Summary written to {}", summary_path.display()),
            Err(e) => {
                warn!("{:#}", e);
                println!("Error saving analysis: {}", e);
            }
        }

        println!("\nAnalysis Results ({}):", Local::now().format("%Y-%m-%d %H:%M:%S"));
        println!("Total Patients: {}", analysis.total_patients);
        println!("Unique Email Domains: {}", analysis.unique_email_domains);
        println!("Mean Age: {}", analysis.mean_age);
        println!("Condition Frequencies:");
        for (condition, count) in &analysis.condition_counts {
            println!("- {}: {}", condition, count);
        }

        if let Some((condition, count)) = analysis.recommendation() {
            println!(
                "Recommendation: Focus on {} as it affects {} patients.",
                condition, count
            );
        }

        if !artifacts.is_empty() {
            println!("Visualizations Generated:");
            for path in &artifacts {
                println!("- {}", path.display());
            }
        }
    }
}

fn print_menu() {
    println!("\nOptions:");
    println!("1. Fetch new patient data");
    println!("2. Filter patients by age range");
    println!("3. View analysis and visualizations");
    println!("4. Exit");
    print!("Enter your choice (1-4): ");
    let _ = std::io::stdout().flush();
}

fn print_patients(table: &PatientTable) {
    println!("{:<25} {:<32} {:>4}", "Name", "Email", "Age");
    for row in table.iter() {
        let age = row.age.map_or_else(|| "-".to_string(), |a| a.to_string());
        println!("{:<25} {:<32} {:>4}", row.name, row.email, age);
    }
}

fn prompt_line<R: BufRead>(input: &mut R, prompt: &str) -> Result<String> {
    print!("{}", prompt);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read input")?;
    Ok(line)
}

fn parse_age(input: &str) -> Result<i64, InvalidNumberError> {
    let trimmed = input.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| InvalidNumberError(trimmed.to_string()))
}
