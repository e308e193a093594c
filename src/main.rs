use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use turtle_shell::config::Settings;
use turtle_shell::interpreter::{Interpreter, with_image_extension};
use turtle_shell::surface::canvas::Canvas;
use turtle_shell::surface::{ConsoleHost, DrawingSurface};
use turtle_shell::tui::{App, TuiHost, run_tui};
use turtle_shell::{logging, parser, validator};

#[derive(Parser)]
#[command(
    name = "turtle-shell",
    version,
    about = "Text-driven turtle graphics with undo/redo"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Settings file (`key: value` lines)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Append log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive drawing shell
    Shell,
    /// Run a command file headlessly and print the resulting command log
    Run {
        /// Command file path
        script: PathBuf,
        /// Also save the finished canvas as a `.scene.json` image
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Parse and validate a command file without drawing
    Check {
        /// Command file path
        script: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The shell owns the terminal, so it only logs when given a file.
    let is_shell = matches!(cli.command, Commands::Shell);
    if !is_shell || cli.log_file.is_some() {
        logging::init(
            logging::level_from_verbosity(cli.verbose),
            cli.log_file.as_deref(),
        )?;
    }

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    tracing::debug!(?settings, "settings");

    match cli.command {
        Commands::Check { script } => {
            let content = std::fs::read_to_string(&script)?;
            let lines = parser::parse_script(&content);
            let errors = validator::check_script(&lines);
            if !errors.is_empty() {
                for error in &errors {
                    eprintln!("{error}");
                }
                anyhow::bail!(
                    "{} invalid statement(s) in '{}'",
                    errors.len(),
                    script.display()
                );
            }
            let statements: usize = lines.iter().map(|l| l.statements.len()).sum();
            println!(
                "Script '{}' is valid: {} lines, {} statements",
                script.display(),
                lines.len(),
                statements
            );
            Ok(())
        }
        Commands::Run { script, image } => {
            let content = std::fs::read_to_string(&script)?;
            let canvas = Canvas::new(settings.canvas_width, settings.canvas_height);
            let mut interpreter =
                Interpreter::with_defaults(canvas, ConsoleHost::stdio(), settings.pen);

            let errors = interpreter.run_script(&content);
            for primitive in interpreter.log().entries() {
                println!("{primitive}");
            }
            if let Some(path) = image {
                let path = with_image_extension(path);
                interpreter.surface().save_image(&path)?;
                eprintln!("Image saved as {}", path.display());
            }
            if !errors.is_empty() {
                anyhow::bail!(
                    "{} statement(s) in '{}' failed",
                    errors.len(),
                    script.display()
                );
            }
            Ok(())
        }
        Commands::Shell => {
            let canvas = Canvas::new(settings.canvas_width, settings.canvas_height);
            let interpreter = Interpreter::with_defaults(canvas, TuiHost::new()?, settings.pen);
            let mut app = App::new(interpreter);
            run_tui(&mut app)
        }
    }
}
