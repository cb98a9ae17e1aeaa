use andromeda_core::{QueryEngine, SystemKey};
use serde_json::Value;

use super::utils::{print_json, print_success, CliError, CliResult};

pub async fn resolve(engine: &QueryEngine, chain: &str, key: &str) -> CliResult<()> {
    let key: SystemKey = key.parse()?;
    let address = engine.resolve_system_address(chain, key).await?;
    print_success(&format!("{key} on {chain}: {address}"));
    Ok(())
}

pub async fn code_id(engine: &QueryEngine, chain: &str, component: &str) -> CliResult<()> {
    let code_id = engine.get_code_id(chain, component).await?;
    print_success(&format!("{component} on {chain}: code id {code_id}"));
    Ok(())
}

/// Runs a builder query (`--kind`) or, without one, sends `params` verbatim.
pub async fn query(
    engine: &QueryEngine,
    chain: &str,
    contract: &str,
    kind: Option<&str>,
    params: &str,
) -> CliResult<()> {
    let params = parse_params(params)?;

    let reply = match kind {
        Some(kind) => engine.query(chain, contract, kind, &params).await?,
        None => engine.query_raw(chain, contract, &params).await?,
    };

    print_json(&reply)
}

fn parse_params(params: &str) -> CliResult<Value> {
    if params.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(params).map_err(|e| CliError::General(format!("--params is not valid JSON: {e}")))
}
