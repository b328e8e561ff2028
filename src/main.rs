use clap::Parser;
use vsac_fetch::config::input::{load_descriptor_file, load_mapping_file};
use vsac_fetch::utils::error::ErrorSeverity;
use vsac_fetch::utils::logger::{self, LogFormat};
use vsac_fetch::utils::validation::Validate;
use vsac_fetch::{BatchOutcome, CliConfig, ValueSetIndex, VsacDownloader, VsacError};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(format, cli.verbose);

    tracing::info!("Starting vsac-fetch");

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Download failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: &CliConfig) -> Result<(), VsacError> {
    let config = cli.load_config()?;
    config.validate()?;

    let downloader = VsacDownloader::from_config(&config)?;

    let mut index = if cli.reuse_index && downloader.index_path().exists() {
        let index = ValueSetIndex::load(downloader.index_path())?;
        tracing::info!(
            "📂 Loaded {} value sets from {}",
            index.len(),
            downloader.index_path().display()
        );
        index
    } else {
        ValueSetIndex::new()
    };

    let outcome = match (&cli.input, &cli.descriptors) {
        (_, Some(path)) => {
            let descriptors = load_descriptor_file(path)?;
            downloader.download_descriptors(&descriptors, &mut index).await?
        }
        (Some(path), None) => {
            let mapping = load_mapping_file(path)?;
            downloader.download_mapping(&mapping, &mut index).await?
        }
        (None, None) => {
            return Err(VsacError::MissingConfigError {
                field: "--input or --descriptors".to_string(),
            })
        }
    };

    match outcome {
        BatchOutcome::NothingToFetch => {
            println!("✅ All value sets are already in the index");
        }
        BatchOutcome::Completed {
            index_path,
            downloaded,
        } => {
            println!("✅ Downloaded {} value sets", downloaded.len());
            match index_path {
                Some(path) => println!("📁 Index saved to: {}", path.display()),
                None => println!("📁 Caching disabled, nothing written"),
            }
        }
    }

    Ok(())
}
