use clap::{Parser, Subcommand};
use crack_detect::analysis::BatchRunner;
use crack_detect::config::{load_config_or_default, Config, ConfigFormat};
use crack_detect::logging::init_logging;
use crack_detect::pipeline::{ClassificationWorker, CrackPipeline};
use crack_detect::visualization::{print_batch_table, print_result};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crack-detect")]
#[command(about = "Detect cracks in grayscale images of concrete surfaces")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one image and write its binarized version next to it
    Classify {
        /// Path to the image
        image: PathBuf,

        /// Write the result as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Classify every supported image in a directory
    Batch {
        /// Directory containing the images
        dir: PathBuf,

        /// Write the batch report as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Print the Otsu threshold of the filtered image without writing anything
    Threshold {
        /// Path to the image
        image: PathBuf,
    },

    /// Write the default configuration (JSON for .json paths, TOML otherwise)
    InitConfig {
        /// Destination file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config_or_default(cli.config.as_deref());
    if cli.verbose > 0 {
        let level = match cli.verbose {
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        config.logging.global_level = level.to_string();
        config.logging.pipeline_level = level.to_string();
        config.logging.algorithm_level = level.to_string();
    }
    let _log_guard = init_logging(&config.logging)?;

    match cli.command {
        Commands::Classify { image, json } => handle_classify(&config, image, json).await?,
        Commands::Batch { dir, json } => handle_batch(&config, dir, json)?,
        Commands::Threshold { image } => handle_threshold(&config, image)?,
        Commands::InitConfig { path } => handle_init_config(path)?,
    }

    Ok(())
}

async fn handle_classify(
    config: &Config,
    image: PathBuf,
    json: Option<PathBuf>,
) -> anyhow::Result<()> {
    let worker = ClassificationWorker::new(CrackPipeline::from_config(config));

    println!("Processing...");
    let result = worker.classify(image).await?;
    print_result(&result);

    if let Some(output_path) = json {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(&output_path, json)?;
        println!("Result saved to {}", output_path.display());
    }

    Ok(())
}

fn handle_batch(config: &Config, dir: PathBuf, json: Option<PathBuf>) -> anyhow::Result<()> {
    println!("Classifying images in {}...", dir.display());
    let report = BatchRunner::from_config(config).run(&dir)?;
    print_batch_table(&report);

    if let Some(output_path) = json {
        report.save_json(&output_path)?;
        println!("Report saved to {}", output_path.display());
    }

    Ok(())
}

fn handle_threshold(config: &Config, image: PathBuf) -> anyhow::Result<()> {
    let threshold = CrackPipeline::from_config(config).threshold_for(&image)?;
    println!("{threshold}");
    Ok(())
}

fn handle_init_config(path: PathBuf) -> anyhow::Result<()> {
    let format = ConfigFormat::from_path(&path);
    Config::default().save_to_file(&path, format)?;
    println!("Default configuration written to {}", path.display());
    Ok(())
}
