use anyhow::{Context, Result, bail};
use nadircare_service::Config;
use report_triage::{
    ClinicalRecord, ReportInterpreter, TextReportInterpreter, VisionTranscriber, classify,
};
use std::env;
use std::path::Path;

/// Runs one report through the live pipeline and prints the record and recommendation.
///
/// Usage: interpret_report <report file> [--transcribe]
///
/// `.txt` files take the text path. Images take the ANC path, or with
/// `--transcribe` are transcribed by the vision model and structured as text.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("Usage: {} <report file> [--transcribe]", args[0]);
        eprintln!("Example: {} /path/to/cbc_report.png", args[0]);
        std::process::exit(1);
    };
    let transcribe = args.iter().skip(2).any(|arg| arg == "--transcribe");

    let config = Config::from_env();
    let models = config.build_models()?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Could not read {}", path))?;

    println!("Processing report: {}", path);

    let is_text = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));

    let record: ClinicalRecord = if is_text {
        println!("Mode: text structuring");
        TextReportInterpreter::new(models.text)
            .interpret_text_report(&String::from_utf8_lossy(&bytes))
            .await
    } else if transcribe {
        println!("Mode: vision transcription + text structuring");
        let Some(vision) = models.vision.clone() else {
            bail!("--transcribe needs OPENROUTER_API_KEY");
        };
        TextReportInterpreter::new(models.text)
            .with_extractor(std::sync::Arc::new(VisionTranscriber::new(vision)))
            .interpret_document(&bytes)
            .await?
    } else {
        println!("Mode: ANC extraction");
        ReportInterpreter::new(models.vision, config.template_source())
            .interpret_image_report(&bytes)
            .await?
    };

    println!();
    println!("Clinical record:");
    println!("{}", serde_json::to_string_pretty(&record)?);

    let recommendation = classify(&record);
    println!();
    println!("Recommendation: {:?}", recommendation.recommendation);
    println!("Confidence: {}", recommendation.confidence);
    println!("Reasoning: {}", recommendation.reasoning);
    for (i, action) in recommendation.suggested_actions.iter().enumerate() {
        println!("   {}. {}", i + 1, action);
    }

    Ok(())
}
