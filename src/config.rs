use crate::client::DEFAULT_ENDPOINT;
use crate::sparql::SyntaxCheck;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

const DEFAULT_PORT: &str = ":8080";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Release,
    Debug,
}

impl RunMode {
    pub fn is_debug(&self) -> bool {
        matches!(self, RunMode::Debug)
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Release => write!(f, "release"),
            RunMode::Debug => write!(f, "debug"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_address: SocketAddr,
    pub endpoint: Url,
    pub mode: RunMode,
    pub syntax_check: SyntaxCheck,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080),
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint valid"),
            mode: RunMode::default(),
            syntax_check: SyntaxCheck::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            config,
            port: cli_port,
            endpoint: cli_endpoint,
            mode: cli_mode,
            syntax_check: cli_syntax_check,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let PartialConfig {
            port: file_port,
            endpoint: file_endpoint,
            mode: file_mode,
            syntax_check: file_syntax_check,
        } = file_config;

        let port = non_empty(cli_port)
            .or(non_empty(file_port))
            .unwrap_or_else(|| DEFAULT_PORT.to_string());
        let listen_address = parse_listen_address(&port)?;

        let endpoint = non_empty(cli_endpoint)
            .or(non_empty(file_endpoint))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(endpoint.trim())
            .with_context(|| format!("invalid SPARQL endpoint URL {endpoint:?}"))?;

        Ok(Self {
            listen_address,
            endpoint,
            mode: cli_mode
                .or(file_mode)
                .or_else(gin_mode)
                .unwrap_or_default(),
            syntax_check: cli_syntax_check.or(file_syntax_check).unwrap_or_default(),
        })
    }

    /// Fail-fast checks run before the server binds.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            matches!(self.endpoint.scheme(), "http" | "https"),
            "SPARQL endpoint {} must use http or https",
            self.endpoint
        );
        anyhow::ensure!(
            self.endpoint.host_str().is_some_and(|host| !host.is_empty()),
            "SPARQL endpoint {} has no host",
            self.endpoint
        );
        Ok(())
    }
}

/// Parses `:8080`, `8080`, `127.0.0.1:8080` or `localhost:8080`.
///
/// A missing host binds every interface.
pub fn parse_listen_address(raw: &str) -> Result<SocketAddr> {
    let raw = raw.trim();
    let port_only = raw.strip_prefix(':').unwrap_or(raw);
    if let Ok(port) = port_only.parse::<u16>() {
        return Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port));
    }
    if let Ok(addr) = raw.parse::<SocketAddr>() {
        return Ok(addr);
    }
    raw.to_socket_addrs()
        .with_context(|| format!("invalid listen address {raw:?}"))?
        .next()
        .with_context(|| format!("listen address {raw:?} did not resolve"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Legacy `GIN_MODE`: `release` is release, any other value is debug.
fn gin_mode() -> Option<RunMode> {
    non_empty(std::env::var("GIN_MODE").ok()).map(|mode| {
        if mode.trim() == "release" {
            RunMode::Release
        } else {
            RunMode::Debug
        }
    })
}

#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "dbpedia-sparql-proxy",
    about = "HTTP gateway that validates SPARQL queries and forwards them to DBpedia",
    version
)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "SERVER_PORT",
        value_name = "ADDR",
        help = "Listen address, e.g. :8080 or 127.0.0.1:8080"
    )]
    pub port: Option<String>,

    #[arg(
        long,
        env = "DBPEDIA_ENDPOINT",
        value_name = "URL",
        help = "SPARQL endpoint queries are forwarded to"
    )]
    pub endpoint: Option<String>,

    #[arg(
        long,
        env = "SERVER_MODE",
        value_enum,
        value_name = "MODE",
        help = "Run mode (release or debug); GIN_MODE is honoured when unset"
    )]
    pub mode: Option<RunMode>,

    #[arg(
        long,
        env = "SPARQL_SYNTAX_CHECK",
        value_enum,
        value_name = "LEVEL",
        help = "Query validation depth (keywords or full)"
    )]
    pub syntax_check: Option<SyntaxCheck>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    port: Option<String>,
    endpoint: Option<String>,
    mode: Option<RunMode>,
    syntax_check: Option<SyntaxCheck>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
