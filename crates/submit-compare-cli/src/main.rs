//! submit-compare CLI: drive a submit-and-compare block from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "submit-compare",
    version,
    about = "Workbench for the submit-and-compare question block"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and question
    Init,

    /// Check a question XML file
    Validate {
        /// Path to the question XML
        #[arg(long)]
        question: PathBuf,
    },

    /// Render the learner view (or the editor with --studio) as HTML
    View {
        /// Render the author-facing editor
        #[arg(long)]
        studio: bool,

        /// Write the page here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Submit or save an answer
    Submit {
        /// Answer text
        #[arg(long)]
        answer: String,

        /// "submit" uses an attempt; anything else saves a draft
        #[arg(long, default_value = "submit")]
        action: String,
    },

    /// Print the decorated hints
    Hints,

    /// Edit the block settings; unspecified fields keep their values
    Author {
        #[arg(long)]
        display_name: Option<String>,

        /// Points possible
        #[arg(long)]
        weight: Option<String>,

        /// Submission limit, 0 for unlimited
        #[arg(long)]
        max_attempts: Option<String>,

        #[arg(long)]
        your_answer_label: Option<String>,

        #[arg(long)]
        our_answer_label: Option<String>,

        #[arg(long)]
        submit_button_label: Option<String>,

        /// Replace the question with this XML file
        #[arg(long)]
        question: Option<PathBuf>,
    },

    /// Publish a client event
    Event {
        /// JSON object with an "event_type" key
        #[arg(long)]
        json: String,
    },

    /// Show the learner state and block settings
    State,
}

fn main() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "submit_compare=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { question } => commands::validate::execute(question),
        Commands::View { studio, output } => commands::view::execute(config, studio, output),
        Commands::Submit { answer, action } => commands::submit::execute(config, answer, action),
        Commands::Hints => commands::hints::execute(config),
        Commands::Author {
            display_name,
            weight,
            max_attempts,
            your_answer_label,
            our_answer_label,
            submit_button_label,
            question,
        } => commands::author::execute(
            config,
            commands::author::AuthorArgs {
                display_name,
                weight,
                max_attempts,
                your_answer_label,
                our_answer_label,
                submit_button_label,
                question,
            },
        ),
        Commands::Event { json } => commands::event::execute(config, json),
        Commands::State => commands::state::execute(config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
