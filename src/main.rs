use anyhow::Context;
use clap::Parser;
use hgdb_circt_pack::utils::error::PackError;
use hgdb_circt_pack::utils::logger;
use hgdb_circt_pack::{
    CliConfig, LocalStorage, LogFormat, PackEngine, PackageManifest, PackagePipeline,
};

fn fail(e: PackError) -> ! {
    tracing::error!(
        "❌ Packaging failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }

    tracing::info!("Loading manifest from: {}", config.config.display());
    tracing::debug!("CLI config: {:?}", config);

    let mut manifest = match PackageManifest::from_file(&config.config) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("❌ Failed to load manifest '{}'", config.config.display());
            fail(e)
        }
    };

    if let Some(output_dir) = &config.output_dir {
        if let Err(e) = manifest.set_output_dir(output_dir) {
            fail(e);
        }
        tracing::info!("🔧 Output directory overridden to: {}", output_dir.display());
    }
    if config.dist {
        manifest.enable_dist();
    }

    let resolved = match manifest.resolve() {
        Ok(resolved) => resolved,
        Err(e) => fail(e),
    };

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be copied");
        let plan = serde_json::to_string_pretty(&resolved.plan)
            .context("failed to serialize staging plan")?;
        println!("{}", plan);
        return Ok(());
    }

    let pipeline = PackagePipeline::new(LocalStorage::new(), resolved);
    let engine = PackEngine::new(pipeline);

    match engine.run().await {
        Ok(outcome) => {
            tracing::info!("✅ Packaging completed");
            println!(
                "✅ Staged {} binaries and {} scripts into {}",
                outcome.report.binaries.len(),
                outcome.report.scripts.len(),
                outcome.output_dir.display()
            );
            if let Some(archive) = outcome.archive_path {
                println!("📦 {}", archive.display());
            }
        }
        Err(e) => fail(e),
    }

    Ok(())
}
