use crate::cli::ExtractArgs;
use anyhow::{Context, Result};
use repograph_extractor::{extract_source, ParserConfig, SourceParser};

pub async fn run_extract(args: ExtractArgs) -> Result<()> {
    let source = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let rel_path = args.file.to_string_lossy().replace('\\', "/");

    let mut parser = SourceParser::new(ParserConfig {
        tolerate_syntax_errors: args.tolerate_syntax_errors,
    });
    let facts = extract_source(&mut parser, &source, &rel_path)?;
    log::info!("{rel_path}: {}", facts.counts());

    println!("{}", serde_json::to_string_pretty(&facts)?);
    Ok(())
}
