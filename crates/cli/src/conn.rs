use crate::{
    commands::ConnArgs,
    env::{
        CLICKHOUSE_DATABASE, CLICKHOUSE_HOST, CLICKHOUSE_JWT, CLICKHOUSE_PASSWORD,
        CLICKHOUSE_PORT, CLICKHOUSE_PROTOCOL, CLICKHOUSE_USER, EnvManager,
    },
};
use connectors::warehouse::{
    clickhouse::ClickHouseAdapter,
    config::{ConnectionConfig, Credentials, Protocol},
    error::DbError,
};
use std::str::FromStr;
use tracing::debug;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_DATABASE: &str = "default";

/// Merges command-line flags with the environment. Flags win.
pub fn resolve_config(args: &ConnArgs, env: &EnvManager) -> Result<ConnectionConfig, DbError> {
    let pick = |flag: &Option<String>, key: &str| {
        flag.clone()
            .filter(|v| !v.is_empty())
            .or_else(|| env.get(key).map(str::to_string))
    };

    let protocol = match pick(&args.protocol, CLICKHOUSE_PROTOCOL) {
        Some(raw) => Protocol::from_str(&raw)?,
        None => Protocol::default(),
    };

    let port = match (args.port, env.get(CLICKHOUSE_PORT)) {
        (Some(port), _) => Some(port),
        (None, Some(raw)) => Some(raw.trim().parse::<u16>().map_err(|_| {
            DbError::InvalidConfig(format!("{CLICKHOUSE_PORT} '{raw}' is not a valid port"))
        })?),
        (None, None) => None,
    };

    let credentials = Credentials::resolve(
        pick(&args.user, CLICKHOUSE_USER),
        pick(&args.password, CLICKHOUSE_PASSWORD),
        pick(&args.jwt, CLICKHOUSE_JWT),
    );

    let config = ConnectionConfig::new(
        pick(&args.host, CLICKHOUSE_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port,
        protocol,
        pick(&args.database, CLICKHOUSE_DATABASE).unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        credentials,
    );
    debug!(?config, "Resolved connection settings");
    Ok(config)
}

pub fn connect(args: &ConnArgs, env: &EnvManager) -> Result<ClickHouseAdapter, DbError> {
    ClickHouseAdapter::connect(resolve_config(args, env)?)
}
