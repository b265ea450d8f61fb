// ABOUTME: Argument resolver for the push and rollback command forms.
// ABOUTME: Turns a flat token list into typed fields without touching the platform.

use crate::types::{AppName, AppNameError, Generation, GenerationError};
use thiserror::Error;

/// Errors from resolving command arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("a manifest is required, e.g. use '-f manifest.yml'")]
    MissingManifest,

    #[error("an application name is required")]
    MissingAppName,

    #[error("a version tag is required, e.g. g1")]
    MissingVersion,

    #[error("flag {0} needs a value")]
    MissingFlagValue(String),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("invalid application name: {0}")]
    InvalidAppName(#[from] AppNameError),

    #[error("invalid version tag: {0}")]
    InvalidVersion(#[from] GenerationError),
}

/// Resolved `push <app> -f <manifest> [-p <path>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushArgs {
    pub app: AppName,
    pub manifest: String,
    /// Empty when `-p` was not given.
    pub path: String,
}

/// Resolved `rollback <app> <version-tag>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackArgs {
    pub app: AppName,
    pub version: Generation,
}

/// Resolve the push command form.
///
/// `argv[0]` is the command name and is skipped. Flags may come before or
/// after the application name, in any order. Paths are not checked here.
pub fn parse_args<S: AsRef<str>>(argv: &[S]) -> Result<PushArgs, ArgumentError> {
    let mut app = None;
    let mut manifest = None;
    let mut path = None;

    let mut tokens = argv.iter().skip(1).map(AsRef::as_ref);
    while let Some(token) = tokens.next() {
        match token {
            "-f" | "-p" => {
                let value = tokens
                    .next()
                    .ok_or_else(|| ArgumentError::MissingFlagValue(token.to_string()))?;
                if token == "-f" {
                    manifest = Some(value.to_string());
                } else {
                    path = Some(value.to_string());
                }
            }
            flag if flag.starts_with('-') => {
                return Err(ArgumentError::UnexpectedArgument(flag.to_string()));
            }
            positional if app.is_none() => app = Some(positional),
            extra => return Err(ArgumentError::UnexpectedArgument(extra.to_string())),
        }
    }

    let app = AppName::new(app.ok_or(ArgumentError::MissingAppName)?)?;
    let manifest = manifest
        .filter(|m| !m.is_empty())
        .ok_or(ArgumentError::MissingManifest)?;

    Ok(PushArgs {
        app,
        manifest,
        path: path.unwrap_or_default(),
    })
}

/// Resolve the rollback command form: exactly `<cmd> <app> <tag>`.
pub fn parse_rollback_args<S: AsRef<str>>(argv: &[S]) -> Result<RollbackArgs, ArgumentError> {
    let mut tokens = argv.iter().skip(1).map(AsRef::as_ref);

    let app = tokens.next().ok_or(ArgumentError::MissingAppName)?;
    let version = tokens.next().ok_or(ArgumentError::MissingVersion)?;
    if let Some(extra) = tokens.next() {
        return Err(ArgumentError::UnexpectedArgument(extra.to_string()));
    }

    Ok(RollbackArgs {
        app: AppName::new(app)?,
        version: version.parse()?,
    })
}

/// Resolve `<cmd> <app>`, used by read-only commands.
pub fn parse_app_arg<S: AsRef<str>>(argv: &[S]) -> Result<AppName, ArgumentError> {
    let mut tokens = argv.iter().skip(1).map(AsRef::as_ref);

    let app = tokens.next().ok_or(ArgumentError::MissingAppName)?;
    if let Some(extra) = tokens.next() {
        return Err(ArgumentError::UnexpectedArgument(extra.to_string()));
    }

    Ok(AppName::new(app)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_set_of_args() {
        let args = parse_args(&[
            "blue-green-push",
            "appname",
            "-f",
            "manifest-path",
            "-p",
            "app-path",
        ])
        .unwrap();

        assert_eq!(args.app.as_str(), "appname");
        assert_eq!(args.manifest, "manifest-path");
        assert_eq!(args.path, "app-path");
    }

    #[test]
    fn requires_a_manifest() {
        let err = parse_args(&["blue-green-push", "appname", "-p", "app-path"]).unwrap_err();
        assert_eq!(err, ArgumentError::MissingManifest);
    }

    #[test]
    fn empty_manifest_counts_as_missing() {
        let err = parse_args(&["blue-green-push", "appname", "-f", ""]).unwrap_err();
        assert_eq!(err, ArgumentError::MissingManifest);
    }

    #[test]
    fn path_is_optional() {
        let args = parse_args(&["blue-green-push", "appname", "-f", "m.yml"]).unwrap();
        assert!(args.path.is_empty());
    }

    #[test]
    fn dangling_flag_is_reported() {
        let err = parse_args(&["blue-green-push", "appname", "-f"]).unwrap_err();
        assert_eq!(err, ArgumentError::MissingFlagValue("-f".to_string()));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = parse_args(&["blue-green-push", "appname", "-x", "y"]).unwrap_err();
        assert_eq!(err, ArgumentError::UnexpectedArgument("-x".to_string()));
    }

    #[test]
    fn parses_rollback_args() {
        let args = parse_rollback_args(&["blue-green-rollback", "appname", "g1"]).unwrap();
        assert_eq!(args.app.as_str(), "appname");
        assert_eq!(args.version.to_string(), "g1");
    }

    #[test]
    fn rollback_requires_a_version() {
        let err = parse_rollback_args(&["blue-green-rollback", "appname"]).unwrap_err();
        assert_eq!(err, ArgumentError::MissingVersion);

        let err = parse_rollback_args(&["blue-green-rollback"]).unwrap_err();
        assert_eq!(err, ArgumentError::MissingAppName);
    }

    #[test]
    fn rollback_rejects_malformed_tags() {
        let err = parse_rollback_args(&["blue-green-rollback", "appname", "v1"]).unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidVersion(_)));
    }
}
