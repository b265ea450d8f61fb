// ABOUTME: CommandChannel backed by the cf command-line client.
// ABOUTME: Spawns cf with tokio, reads the targeted space from the CLI config.

use super::error::{
    ChannelError, NoHomeDirectorySnafu, ParseConfigSnafu, ReadConfigSnafu, SpawnSnafu,
    UnexpectedOutputSnafu,
};
use super::CommandChannel;
use crate::types::{AppGuid, Route, SpaceGuid};
use async_trait::async_trait;
use serde::Deserialize;
use snafu::{OptionExt, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// Runs platform commands through a local `cf` binary.
#[derive(Debug, Clone)]
pub struct CfCli {
    binary: String,
    cf_home: Option<PathBuf>,
}

impl CfCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            cf_home: None,
        }
    }

    /// Use a specific CF_HOME instead of inheriting it.
    pub fn cf_home(mut self, path: impl Into<PathBuf>) -> Self {
        self.cf_home = Some(path.into());
        self
    }

    async fn execute(&self, args: &[String], echo: bool) -> Result<Vec<String>, ChannelError> {
        let command_line = format!("cf {}", args.join(" "));
        tracing::debug!(command = %command_line, echo, "running platform command");

        let mut command = Command::new(&self.binary);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(home) = &self.cf_home {
            command.env("CF_HOME", home);
        }

        let mut child = command.spawn().context(SpawnSnafu {
            program: self.binary.clone(),
        })?;

        // Both pipes are drained together so a chatty stderr cannot stall stdout.
        let stdout = child.stdout.take().map(|out| collect_lines(out, echo, false));
        let stderr = child.stderr.take().map(|err| collect_lines(err, echo, true));
        let (stdout, stderr) = match (stdout, stderr) {
            (Some(out), Some(err)) => tokio::try_join!(out, err),
            _ => Ok((Vec::new(), Vec::new())),
        }
        .context(SpawnSnafu {
            program: self.binary.clone(),
        })?;

        let status = child.wait().await.context(SpawnSnafu {
            program: self.binary.clone(),
        })?;

        if status.success() {
            return Ok(stdout);
        }

        let message = last_meaningful_line(&stderr)
            .or_else(|| last_meaningful_line(&stdout))
            .unwrap_or("no output")
            .to_string();
        tracing::debug!(command = %command_line, ?status, %message, "platform command failed");

        Err(ChannelError::CommandFailed {
            command: command_line,
            code: status.code().unwrap_or(-1),
            message,
        })
    }

    async fn curl<T: for<'de> Deserialize<'de>>(&self, path: String) -> Result<T, ChannelError> {
        let args = vec!["curl".to_string(), path];
        let lines = self.execute(&args, false).await?;
        serde_json::from_str(&lines.join("\n")).context(UnexpectedOutputSnafu {
            command: args.join(" "),
        })
    }

    async fn app_guid(&self, name: &str) -> Result<AppGuid, ChannelError> {
        let scope = self.current_scope().await?;
        let apps: V3List<V3App> = self
            .curl(format!(
                "/v3/apps?names={}&space_guids={}",
                urlencoding::encode(name),
                scope
            ))
            .await?;

        apps.resources
            .into_iter()
            .find(|app| app.name == name)
            .map(|app| AppGuid::new(app.guid))
            .ok_or_else(|| ChannelError::AppNotFound {
                name: name.to_string(),
            })
    }
}

#[async_trait]
impl CommandChannel for CfCli {
    async fn run_command(&self, args: &[String]) -> Result<Vec<String>, ChannelError> {
        self.execute(args, true).await
    }

    async fn run_command_quietly(&self, args: &[String]) -> Result<Vec<String>, ChannelError> {
        self.execute(args, false).await
    }

    async fn current_scope(&self) -> Result<SpaceGuid, ChannelError> {
        let path = cli_config_path(self.cf_home.as_deref()).context(NoHomeDirectorySnafu)?;
        let content = tokio::fs::read_to_string(&path)
            .await
            .context(ReadConfigSnafu { path: path.clone() })?;
        let config: CliConfig =
            serde_json::from_str(&content).context(ParseConfigSnafu { path })?;

        if config.space_fields.guid.is_empty() {
            return Err(ChannelError::NoTargetedSpace);
        }
        Ok(SpaceGuid::new(config.space_fields.guid))
    }

    async fn get_application_details(&self, name: &str) -> Result<Vec<Route>, ChannelError> {
        let guid = self.app_guid(name).await?;
        let routes: V3List<V3Route> = self.curl(format!("/v3/apps/{guid}/routes")).await?;

        Ok(routes
            .resources
            .into_iter()
            .map(|route| route_from_v3(&route.host, &route.url))
            .collect())
    }
}

/// Location of the cf CLI config: `$CF_HOME/.cf/config.json`, where CF_HOME
/// falls back to HOME. An explicit `cf_home` wins over both.
pub fn cli_config_path(cf_home: Option<&Path>) -> Option<PathBuf> {
    let home = match cf_home {
        Some(home) => home.to_path_buf(),
        None => std::env::var_os("CF_HOME")
            .or_else(|| std::env::var_os("HOME"))
            .map(PathBuf::from)?,
    };
    Some(home.join(".cf").join("config.json"))
}

/// Split a v3 route into host and domain.
///
/// The v3 API reports `url` as `host.domain/path`; the domain is what remains
/// after removing the host label and any path.
pub fn route_from_v3(host: &str, url: &str) -> Route {
    let without_path = url.split('/').next().unwrap_or(url);
    let domain = if host.is_empty() {
        without_path
    } else {
        without_path
            .strip_prefix(host)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(without_path)
    };
    Route::new(host, domain)
}

async fn collect_lines<R: AsyncRead + Unpin>(
    reader: R,
    echo: bool,
    to_stderr: bool,
) -> std::io::Result<Vec<String>> {
    let mut lines = BufReader::new(reader).lines();
    let mut collected = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if echo {
            if to_stderr {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        }
        collected.push(line);
    }
    Ok(collected)
}

fn last_meaningful_line(lines: &[String]) -> Option<&str> {
    lines
        .iter()
        .rev()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
}

#[derive(Debug, Deserialize)]
struct CliConfig {
    #[serde(rename = "SpaceFields", default)]
    space_fields: SpaceFields,
}

#[derive(Debug, Default, Deserialize)]
struct SpaceFields {
    #[serde(rename = "GUID", default)]
    guid: String,
}

#[derive(Debug, Deserialize)]
struct V3List<T> {
    resources: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct V3App {
    guid: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct V3Route {
    #[serde(default)]
    host: String,
    url: String,
}
