//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] fans [`ProjectEvent`]s out to every live subscription. It is
//! meant to be shared via `Arc<EventBus>` between the store and its viewers.

use chrono::{DateTime, Utc};
use roombrief_core::types::ProjectId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// ProjectEvent
// ---------------------------------------------------------------------------

/// What happened to a project document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

impl ChangeKind {
    /// Map a trigger operation name (`INSERT`, `UPDATE`, `DELETE`).
    pub fn from_operation(op: &str) -> Option<Self> {
        match op.to_ascii_uppercase().as_str() {
            "INSERT" => Some(Self::Created),
            "UPDATE" => Some(Self::Updated),
            "DELETE" => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// A change notice for one project document.
///
/// Notices carry no document content; subscribers refetch the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEvent {
    pub kind: ChangeKind,
    pub project_id: ProjectId,
    /// When the notice was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ProjectEvent {
    pub fn new(kind: ChangeKind, project_id: ProjectId) -> Self {
        Self {
            kind,
            project_id,
            timestamp: Utc::now(),
        }
    }

    pub fn created(project_id: ProjectId) -> Self {
        Self::new(ChangeKind::Created, project_id)
    }

    pub fn updated(project_id: ProjectId) -> Self {
        Self::new(ChangeKind::Updated, project_id)
    }

    pub fn deleted(project_id: ProjectId) -> Self {
        Self::new(ChangeKind::Deleted, project_id)
    }

    /// Dot-separated event name, e.g. `"project.created"`.
    pub fn event_type(&self) -> &'static str {
        match self.kind {
            ChangeKind::Created => "project.created",
            ChangeKind::Updated => "project.updated",
            ChangeKind::Deleted => "project.deleted",
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use roombrief_core::types::ProjectId;
/// use roombrief_events::bus::{EventBus, ProjectEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ProjectEvent::created(ProjectId::new("p-1")));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ProjectEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed notices are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a notice to all current subscribers.
    ///
    /// With no subscribers the notice is dropped.
    pub fn publish(&self, event: ProjectEvent) {
        tracing::debug!(
            event_type = event.event_type(),
            project_id = %event.project_id,
            "Publishing project change"
        );
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProjectEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(ProjectEvent::updated(ProjectId::new("abc")));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.kind, ChangeKind::Updated);
        assert_eq!(received.project_id.as_str(), "abc");
        assert_eq!(received.event_type(), "project.updated");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(ProjectEvent::deleted(ProjectId::new("gone")));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");
        assert_eq!(e1, e2);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(ProjectEvent::created(ProjectId::new("orphan")));
    }

    #[test]
    fn slow_subscriber_observes_lag() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for i in 0..5 {
            bus.publish(ProjectEvent::updated(ProjectId::new(format!("p{i}"))));
        }
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Lagged(3))
        ));
    }

    #[test]
    fn trigger_operations_map_to_kinds() {
        assert_eq!(ChangeKind::from_operation("INSERT"), Some(ChangeKind::Created));
        assert_eq!(ChangeKind::from_operation("update"), Some(ChangeKind::Updated));
        assert_eq!(ChangeKind::from_operation("DELETE"), Some(ChangeKind::Deleted));
        assert_eq!(ChangeKind::from_operation("TRUNCATE"), None);
    }
}
