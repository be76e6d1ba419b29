//! Command-line and environment configuration.

use std::ffi::OsStr;
use std::net::SocketAddr;
use std::time::Duration;

use clap::builder::TypedValueParser;
use clap::error::ErrorKind;
use clap::{Arg, Command, Parser, ValueEnum};

use nexus_client::{ConfigError, Target, UpstreamClient, UpstreamCredential};

// Not `Debug`: it holds the admin password.
/// Export Prometheus metrics for Sonatype Nexus > 3.6.
#[derive(Parser, Clone)]
#[command(name = "nexus-exporter", version, about)]
pub struct ExporterArgs {
    /// Address with port where Nexus is available.
    #[arg(long, env = "NEXUS_HOST", default_value = "http://localhost:8081", value_parser = TargetParser)]
    pub host: Target,

    /// Nexus user name.
    #[arg(short = 'u', long, env = "NEXUS_USERNAME", default_value = "admin")]
    pub user: String,

    /// Admin password.
    #[arg(
        short = 'p',
        long,
        env = "NEXUS_ADMIN_PASSWORD",
        default_value = "admin123",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub password: String,

    /// Address to serve /metrics on.
    #[arg(long, env = "NEXUS_EXPORTER_LISTEN", default_value = "0.0.0.0:9184")]
    pub listen: SocketAddr,

    /// Timeout in seconds for each upstream request.
    #[arg(
        long,
        env = "NEXUS_UPSTREAM_TIMEOUT",
        default_value = "10",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub upstream_timeout: u64,

    /// Log output format.
    #[arg(long, env = "NEXUS_EXPORTER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Parses `--host` without echoing the raw value, which may carry userinfo.
#[derive(Clone)]
struct TargetParser;

impl TypedValueParser for TargetParser {
    type Value = Target;

    fn parse_ref(
        &self,
        cmd: &Command,
        arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Target, clap::Error> {
        let raw = value
            .to_str()
            .ok_or_else(|| clap::Error::new(ErrorKind::InvalidUtf8).with_cmd(cmd))?;
        Target::parse(raw).map_err(|e| {
            let arg = arg.map_or_else(|| "--host".to_string(), ToString::to_string);
            clap::Error::raw(ErrorKind::ValueValidation, format!("invalid value for '{arg}': {e}\n"))
                .with_cmd(cmd)
        })
    }
}

impl ExporterArgs {
    pub fn credential(&self) -> UpstreamCredential {
        UpstreamCredential::new(&self.user, &self.password)
    }

    /// Build the upstream client this configuration describes.
    pub fn build_client(&self) -> Result<UpstreamClient, ConfigError> {
        Ok(UpstreamClient::new(self.host.clone(), &self.credential())?
            .with_timeout(Duration::from_secs(self.upstream_timeout)))
    }
}
