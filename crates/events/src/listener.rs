//! Postgres `LISTEN` bridge.
//!
//! The `projects` table trigger sends a JSON payload on [`CHANGE_CHANNEL`]
//! for every insert, update and delete. [`ChangeListener`] turns each payload
//! into a [`ProjectEvent`] on the local [`EventBus`].

use std::sync::Arc;

use roombrief_core::types::ProjectId;
use serde::Deserialize;
use sqlx::postgres::PgListener;
use sqlx::PgPool;

use crate::bus::{ChangeKind, EventBus, ProjectEvent};

/// Notification channel used by the `projects` change trigger.
pub const CHANGE_CHANNEL: &str = "project_changes";

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("Malformed change payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Unknown change operation '{0}'")]
    Operation(String),
}

#[derive(Debug, Deserialize)]
struct ChangePayload {
    op: String,
    id: String,
}

/// Parse a trigger payload such as `{"op":"UPDATE","id":"..."}`.
pub fn parse_payload(payload: &str) -> Result<ProjectEvent, ListenerError> {
    let parsed: ChangePayload = serde_json::from_str(payload)?;
    let kind =
        ChangeKind::from_operation(&parsed.op).ok_or(ListenerError::Operation(parsed.op))?;
    Ok(ProjectEvent::new(kind, ProjectId::new(parsed.id)))
}

/// Background service forwarding database notifications to the bus.
pub struct ChangeListener;

impl ChangeListener {
    /// Connect a dedicated listener connection and start listening.
    ///
    /// Connection failures surface here so the caller can fail fast at
    /// startup; once running, [`run`](Self::run) only logs.
    pub async fn connect(pool: &PgPool) -> Result<PgListener, sqlx::Error> {
        let mut listener = PgListener::connect_with(pool).await?;
        listener.listen(CHANGE_CHANNEL).await?;
        tracing::info!(channel = CHANGE_CHANNEL, "Listening for project changes");
        Ok(listener)
    }

    /// Run the forwarding loop until the connection fails permanently.
    pub async fn run(mut listener: PgListener, bus: Arc<EventBus>) {
        loop {
            match listener.recv().await {
                Ok(notification) => match parse_payload(notification.payload()) {
                    Ok(event) => bus.publish(event),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            payload = notification.payload(),
                            "Ignoring malformed project change notification"
                        );
                    }
                },
                Err(e) => {
                    tracing::error!(error = %e, "Project change listener stopped");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trigger_payload() {
        let event = parse_payload(r#"{"op":"INSERT","id":"0191a2b3-0000-7000-8000-000000000001"}"#)
            .unwrap();
        assert_eq!(event.kind, ChangeKind::Created);
        assert_eq!(
            event.project_id.as_str(),
            "0191a2b3-0000-7000-8000-000000000001"
        );
    }

    #[test]
    fn rejects_unknown_operation() {
        let err = parse_payload(r#"{"op":"TRUNCATE","id":"x"}"#).unwrap_err();
        assert!(matches!(err, ListenerError::Operation(op) if op == "TRUNCATE"));
    }

    #[test]
    fn rejects_non_json_payload() {
        assert!(matches!(
            parse_payload("not json"),
            Err(ListenerError::Payload(_))
        ));
    }
}
