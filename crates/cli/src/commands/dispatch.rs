use std::fs;
use std::path::Path;

use anyhow::Context;
use frontdesk_core::audit::{AuditContext, AuditEvent, AuditSink};
use frontdesk_core::config::LoadOptions;
use frontdesk_core::dispatch::{DispatchEngine, UnreachableExtensions};
use frontdesk_core::domain::call::CallState;
use frontdesk_core::domain::staff::Extension;
use frontdesk_core::errors::ApplicationError;
use serde_json::json;
use tracing::info;

use crate::commands::{load_runtime, parse_at, to_value, CommandResult};

const COMMAND: &str = "dispatch";

/// Forwards audit events to the structured log.
struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, event: AuditEvent) {
        info!(
            event_name = %event.event_type,
            event_id = %event.event_id,
            correlation_id = %event.correlation_id,
            call_id = event.call_id.as_deref().unwrap_or_default(),
            actor = %event.actor,
            outcome = ?event.outcome,
            metadata = ?event.metadata,
            "audit event"
        );
    }
}

pub fn run(
    options: &LoadOptions,
    call_path: &Path,
    at: Option<&str>,
    unreachable: &[String],
) -> CommandResult {
    match evaluate(options, call_path, at, unreachable) {
        Ok(result) => result,
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

fn evaluate(
    options: &LoadOptions,
    call_path: &Path,
    at: Option<&str>,
    unreachable: &[String],
) -> Result<CommandResult, ApplicationError> {
    let now = parse_at(at)?;
    let call =
        read_call(call_path).map_err(|error| ApplicationError::Input(format!("{error:#}")))?;
    let unreachable = unreachable
        .iter()
        .map(|raw| Extension::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let (_, loaded) = load_runtime(options)?;
    let directory = loaded.directory;

    let engine = DispatchEngine::new(UnreachableExtensions::new(unreachable));
    let context = AuditContext::new(None, uuid::Uuid::new_v4().to_string(), "frontdesk-cli");
    let decision = engine.decide_with_audit(&call, &directory, now, &context, &TracingAuditSink);

    let hours = directory.hours();
    let message = match decision.target() {
        Some(target) => format!("{}: {target}", decision.kind()),
        None => decision.kind().to_string(),
    };

    Ok(CommandResult::success_with_data(
        COMMAND,
        message,
        json!({
            "decision": to_value(&decision),
            "office_open": hours.is_open(now),
            "local_time": hours.local_time(now),
            "timezone": hours.timezone().name(),
            "correlation_id": context.correlation_id,
        }),
    ))
}

fn read_call(path: &Path) -> anyhow::Result<CallState> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read call state `{}`", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("call state `{}` is not valid JSON", path.display()))
}
