//! Command implementations

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use runway_core::{
    import::parse_transactions, ForecastEngine, GoalRequest, HttpAugmentor, NoopAugmentor,
};
use runway_server::{AppState, ServerConfig};

fn engine_from_env() -> ForecastEngine {
    match HttpAugmentor::from_env() {
        Some(augmentor) => {
            info!("Suggestion augmentation enabled");
            ForecastEngine::new(Box::new(augmentor))
        }
        None => ForecastEngine::new(Box::new(NoopAugmentor)),
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn cmd_analyze(
    file: &Path,
    goal_text: Option<String>,
    target: Option<f64>,
    months: Option<u32>,
    savings: Option<f64>,
    buffer: Option<f64>,
    protected: Vec<String>,
) -> Result<()> {
    if goal_text.is_none() && target.is_none() {
        bail!("provide either --goal or --target/--months");
    }

    let reader =
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let transactions = parse_transactions(reader)?;
    info!(count = transactions.len(), "Imported transactions");

    let goal = GoalRequest {
        target_amount: target,
        months_to_deadline: months,
        current_savings: savings,
        buffer,
        protected_categories: (!protected.is_empty()).then_some(protected),
        goal_text,
    };

    let result = engine_from_env().analyze(&transactions, &goal).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn cmd_serve(host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}")
        .parse()
        .context("Invalid bind address")?;
    let state = AppState::from_env();
    runway_server::serve(addr, state, ServerConfig::default()).await
}
