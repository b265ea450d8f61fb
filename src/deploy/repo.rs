// ABOUTME: Application operations expressed as platform commands.
// ABOUTME: Existence checks, push, rename, route mapping, delete, and generation listing.

use nonempty::NonEmpty;
use serde::Deserialize;
use serde_json::Value;

use crate::channel::CommandChannel;
use crate::types::{AppName, Generation, Route};

use super::error::{DeployError, MalformedResponse};

/// Page size requested when listing applications in a space.
const PAGE_SIZE: u32 = 100;

/// Application operations on top of a command channel.
///
/// Each method issues one or more platform commands in order and stops at the
/// first failure. Nothing is retried.
pub struct ApplicationRepo<C> {
    channel: C,
}

impl<C: CommandChannel> ApplicationRepo<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    /// The underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Whether an application with exactly this name exists in the current space.
    ///
    /// # Errors
    ///
    /// Channel failures are returned unchanged. A response without a numeric
    /// `total_results` is a `MalformedResponse`.
    pub async fn does_app_exist(&self, name: &str) -> Result<bool, DeployError> {
        let scope = self.channel.current_scope().await?;
        let query = format!("v2/apps?q=name:{}&q=space_guid:{}", escape_query(name), scope);

        let response: Value = self.curl(&query).await?;
        let total = response
            .get("total_results")
            .ok_or(MalformedResponse::MissingField("total_results"))?;
        let total = total.as_u64().ok_or_else(|| MalformedResponse::NotANumber {
            field: "total_results",
            value: match total {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        })?;

        tracing::debug!(app = name, total, "queried application existence");
        Ok(total > 0)
    }

    /// Push an application. `-p` is only passed when `path` is non-empty.
    pub async fn push_application(
        &self,
        name: &str,
        manifest: &str,
        path: &str,
    ) -> Result<(), DeployError> {
        let mut args = vec![
            "push".to_string(),
            name.to_string(),
            "-f".to_string(),
            manifest.to_string(),
        ];
        if !path.is_empty() {
            args.push("-p".to_string());
            args.push(path.to_string());
        }

        self.run(args).await
    }

    pub async fn rename_application(&self, old_name: &str, new_name: &str) -> Result<(), DeployError> {
        self.run(vec![
            "rename".to_string(),
            old_name.to_string(),
            new_name.to_string(),
        ])
        .await
    }

    /// Re-map the routes of `name` that use `host` onto `name` itself.
    pub async fn map_route_application(
        &self,
        name: &str,
        host: &str,
    ) -> Result<NonEmpty<Route>, DeployError> {
        self.map_route_from(name, name, host).await
    }

    /// Map every route of `source` that uses `host` onto `target`.
    ///
    /// The domain is discovered from `source`, so the caller only needs to
    /// know the host name. Mapping is additive: `source` keeps its routes.
    ///
    /// # Errors
    ///
    /// Returns `RouteNotFound` if `source` has no route with that host.
    pub async fn map_route_from(
        &self,
        source: &str,
        target: &str,
        host: &str,
    ) -> Result<NonEmpty<Route>, DeployError> {
        let routes = self.channel.get_application_details(source).await?;
        let matching = NonEmpty::from_vec(
            routes
                .into_iter()
                .filter(|route| route.host == host)
                .collect(),
        )
        .ok_or_else(|| DeployError::RouteNotFound {
            app: source.to_string(),
            host: host.to_string(),
        })?;

        for route in matching.iter() {
            tracing::info!(app = target, route = %route, "mapping route");
            self.run(vec![
                "map-route".to_string(),
                target.to_string(),
                route.domain.clone(),
                "-n".to_string(),
                route.host.clone(),
            ])
            .await?;
        }

        Ok(matching)
    }

    /// Unbind a route from an application. The route itself is kept.
    pub async fn unmap_route(&self, name: &str, route: &Route) -> Result<(), DeployError> {
        tracing::info!(app = name, route = %route, "unmapping route");
        self.run(vec![
            "unmap-route".to_string(),
            name.to_string(),
            route.domain.clone(),
            "-n".to_string(),
            route.host.clone(),
        ])
        .await
    }

    /// Delete an application and its route mappings without prompting.
    pub async fn delete_application(&self, name: &str) -> Result<(), DeployError> {
        self.run(vec!["delete".to_string(), name.to_string(), "-f".to_string()])
            .await
    }

    pub async fn start_application(&self, name: &str) -> Result<(), DeployError> {
        self.run(vec!["start".to_string(), name.to_string()]).await
    }

    pub async fn list_applications(&self) -> Result<(), DeployError> {
        self.run(vec!["apps".to_string()]).await
    }

    /// Archived generations of `app` in the current space, oldest first.
    pub async fn list_generations(&self, app: &AppName) -> Result<Vec<Generation>, DeployError> {
        let archives = self.list_archives(app).await?;
        Ok(archives.into_iter().map(|archive| archive.generation).collect())
    }

    /// Archives of `app` with their run state, oldest first.
    pub async fn list_archives(&self, app: &AppName) -> Result<Vec<Archive>, DeployError> {
        let scope = self.channel.current_scope().await?;
        let mut next = Some(format!(
            "v2/apps?q=space_guid:{scope}&results-per-page={PAGE_SIZE}"
        ));
        let mut archives = Vec::new();

        while let Some(query) = next.take() {
            let page: AppPage = self.curl(&query).await?;
            archives.extend(page.resources.iter().filter_map(|resource| {
                let generation = app.generation_of(&resource.entity.name)?;
                Some(Archive {
                    generation,
                    running: resource.entity.state.as_deref() == Some("STARTED"),
                })
            }));
            next = page
                .next_url
                .map(|url| url.trim_start_matches('/').to_string());
        }

        archives.sort_by_key(|archive| archive.generation);
        archives.dedup_by_key(|archive| archive.generation);
        tracing::debug!(app = %app, count = archives.len(), "listed archives");
        Ok(archives)
    }

    async fn run(&self, args: Vec<String>) -> Result<(), DeployError> {
        self.channel.run_command(&args).await?;
        Ok(())
    }

    async fn curl<T: for<'de> Deserialize<'de>>(&self, query: &str) -> Result<T, DeployError> {
        let lines = self
            .channel
            .run_command_quietly(&["curl".to_string(), query.to_string()])
            .await?;
        let parsed = serde_json::from_str(&lines.join("\n")).map_err(MalformedResponse::from)?;
        Ok(parsed)
    }
}

/// An archived generation as the platform reports it.
///
/// A stopped archive is usually the leftover of a push that failed before
/// cutover and never served production traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Archive {
    pub generation: Generation,
    pub running: bool,
}

/// Form-encode a value for a query string: reserved characters are
/// percent-encoded and spaces become `+`.
pub fn escape_query(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}

#[derive(Debug, Deserialize)]
struct AppPage {
    #[serde(default)]
    next_url: Option<String>,
    resources: Vec<AppResource>,
}

#[derive(Debug, Deserialize)]
struct AppResource {
    entity: AppEntity,
}

#[derive(Debug, Deserialize)]
struct AppEntity {
    name: String,
    #[serde(default)]
    state: Option<String>,
}
