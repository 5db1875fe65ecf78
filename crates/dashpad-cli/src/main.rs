#![forbid(unsafe_code)]

//! One-shot report generator: asks a language-model API for a long-form
//! research report, then delivers it to the dashboard. Delivery goes
//! through the ingest webhook when `DASHPAD_WEBHOOK_URL` is set, otherwise
//! straight into the local research file.

use anyhow::{bail, Context, Result};
use clap::Parser;
use dashpad_model::{Category, ResearchReport};
use serde::Deserialize;
use serde_json::json;
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 8000;

const REPORT_TITLE: &str = "The Gaming Industry: A Comprehensive Deep Dive";
const REPORT_TAGS: [&str; 5] = [
    "gaming",
    "technology",
    "culture",
    "industry-analysis",
    "deep-dive",
];

const SYSTEM_PROMPT: &str = "You are a senior research analyst specializing in the gaming \
industry. Generate a comprehensive, educational research report on the given topic.\n\n\
Format requirements:\n\
- Use clear markdown headings (##, ###)\n\
- Create logical sections with subheadings\n\
- Include bullet points for key findings\n\
- Add historical timeline elements where relevant\n\
- Cite trends with context\n\
- Make it information-dense but readable\n\
- Include executive summary at the start\n\
- End with future outlook and conclusions\n\n\
Write in an educational, authoritative tone suitable for someone wanting to deeply \
understand the gaming industry.";

const REPORT_TOPIC: &str = "Comprehensive deep dive into the gaming industry. The report \
should educate on:\n\
- History of gaming from origins to present day\n\
- Technological trends and breakthroughs (hardware, software, engines)\n\
- Philosophical and cultural contexts\n\
- Science fiction influences on gaming\n\
- Metaverse, VR, and AR in gaming\n\
- Industry trends, market dynamics, and business models\n\
- Future aspirations and predictions\n\n\
Format as an educational report that is information-dense, well-structured, and easy to read.";

#[derive(Parser)]
#[command(name = "dashpad-report")]
#[command(about = "Generate a research report and deliver it to the dashboard")]
struct Cli {
    /// Data directory for local delivery.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

#[derive(Deserialize)]
struct MessageBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<MessageBlock>,
}

async fn generate_report(client: &reqwest::Client) -> Result<String> {
    let api_key =
        env::var("ANTHROPIC_API_KEY").context("ANTHROPIC_API_KEY is not set")?;
    let base = env::var("ANTHROPIC_BASE_URL")
        .unwrap_or_else(|_| "https://api.anthropic.com".to_string());
    let model = env::var("DASHPAD_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let max_tokens = env::var("DASHPAD_MAX_TOKENS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(DEFAULT_MAX_TOKENS);

    let body = json!({
        "model": model,
        "max_tokens": max_tokens,
        "system": SYSTEM_PROMPT,
        "messages": [{ "role": "user", "content": REPORT_TOPIC }],
    });
    let response = client
        .post(format!("{}/v1/messages", base.trim_end_matches('/')))
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&body)
        .send()
        .await
        .context("model request failed")?;
    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        bail!("model request failed: status {status}: {detail}");
    }
    let message: MessagesResponse = response
        .json()
        .await
        .context("model response parse failed")?;
    let text = message
        .content
        .iter()
        .find(|block| block.kind == "text")
        .map(|block| block.text.clone())
        .context("model response contained no text block")?;
    Ok(text)
}

async fn deliver_webhook(client: &reqwest::Client, url: &str, report: &str) -> Result<()> {
    let secret = env::var("DASHPAD_WEBHOOK_SECRET")
        .context("DASHPAD_WEBHOOK_SECRET is not set for webhook delivery")?;
    let body = json!({
        "title": REPORT_TITLE,
        "content": report,
        "tags": REPORT_TAGS,
        "secret": secret,
    });
    let response = client
        .post(url)
        .json(&body)
        .send()
        .await
        .context("webhook delivery failed")?;
    let status = response.status();
    let detail: serde_json::Value = response
        .json()
        .await
        .unwrap_or_else(|_| json!({ "error": "unreadable webhook response" }));
    if !status.is_success() {
        bail!("webhook delivery failed: status {status}: {detail}");
    }
    println!("Report sent to dashboard: {detail}");
    Ok(())
}

fn deliver_local(data_dir: &Path, report: String) -> Result<PathBuf> {
    let path = data_dir.join(Category::Research.file_name());
    let bytes = std::fs::read(&path)
        .with_context(|| format!("read {} failed", path.display()))?;
    let mut reports: Vec<ResearchReport> =
        serde_json::from_slice(&bytes).context("research file parse failed")?;
    let tags = REPORT_TAGS.iter().map(|t| (*t).to_string()).collect();
    reports.insert(0, ResearchReport::new(REPORT_TITLE.to_string(), report, tags));
    let out = serde_json::to_vec_pretty(&reports).context("research file serialize failed")?;
    std::fs::write(&path, out).with_context(|| format!("write {} failed", path.display()))?;
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    println!("Generating research report...");
    let client = reqwest::Client::new();
    let report = generate_report(&client).await?;
    println!("Report generated ({} chars)", report.len());
    println!("{}...\n", report.chars().take(500).collect::<String>());

    match env::var("DASHPAD_WEBHOOK_URL") {
        Ok(url) if !url.is_empty() => {
            println!("Sending to dashboard webhook...");
            deliver_webhook(&client, &url, &report).await?;
        }
        _ => {
            let path = deliver_local(&cli.data_dir, report)?;
            println!("Report saved to {}", path.display());
        }
    }
    println!("Done.");
    Ok(())
}
