//! Practice automation: trigger-action workflows and their scheduled events.
//!
//! Everything here is in-memory. Event execution is simulated; no message
//! is sent and failures are recorded on the event and logged, never retried.

mod webhook;

pub use webhook::{simulate_test_connection, ConnectionTest, WebhookConfig};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{EventStatus, TriggerType};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AutomationError {
    #[error("Unknown workflow: {0}")]
    UnknownWorkflow(Uuid),
    #[error("Unknown event: {0}")]
    UnknownEvent(Uuid),
    #[error("Cannot move event from {from} to {to}")]
    InvalidTransition { from: EventStatus, to: EventStatus },
    #[error("Workflow is disabled: {0}")]
    DisabledWorkflow(Uuid),
    #[error("Invalid webhook configuration: {0}")]
    InvalidWebhook(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowAction {
    SendEmail { subject: String, body: String },
    SendSms { message: String },
    Notify { message: String },
}

impl WorkflowAction {
    pub fn describe(&self) -> String {
        match self {
            Self::SendEmail { subject, .. } => format!("Email \"{subject}\""),
            Self::SendSms { message } => format!("SMS \"{message}\""),
            Self::Notify { message } => format!("Notify \"{message}\""),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: Uuid,
    pub name: String,
    pub trigger: TriggerType,
    pub actions: Vec<WorkflowAction>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationEvent {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub patient_id: Option<Uuid>,
    pub scheduled_for: DateTime<Utc>,
    pub status: EventStatus,
    pub attempts: u32,
    pub last_error: Option<String>,
}

impl AutomationEvent {
    pub fn new(workflow_id: Uuid, patient_id: Option<Uuid>, scheduled_for: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            workflow_id,
            patient_id,
            scheduled_for,
            status: EventStatus::Pending,
            attempts: 0,
            last_error: None,
        }
    }

    fn transition(&mut self, from: EventStatus, to: EventStatus) -> Result<(), AutomationError> {
        if self.status != from {
            return Err(AutomationError::InvalidTransition { from: self.status, to });
        }
        self.status = to;
        Ok(())
    }

    /// pending -> executing. Counts an attempt.
    pub fn start(&mut self) -> Result<(), AutomationError> {
        self.transition(EventStatus::Pending, EventStatus::Executing)?;
        self.attempts += 1;
        Ok(())
    }

    /// executing -> completed.
    pub fn complete(&mut self) -> Result<(), AutomationError> {
        self.transition(EventStatus::Executing, EventStatus::Completed)?;
        self.last_error = None;
        Ok(())
    }

    /// executing -> failed. Terminal; there is no retry.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), AutomationError> {
        self.transition(EventStatus::Executing, EventStatus::Failed)?;
        self.last_error = Some(reason.into());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_workflows: usize,
    pub active_workflows: usize,
    pub total_events: usize,
    pub pending: usize,
    pub executing: usize,
    pub completed: usize,
    pub failed: usize,
    /// Completed share of finished events, 0.0 when nothing has finished.
    pub success_rate: f32,
}

/// Workflows and events shown on the automation screen.
#[derive(Debug, Default)]
pub struct AutomationDashboard {
    workflows: Vec<Workflow>,
    events: Vec<AutomationEvent>,
}

impl AutomationDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dashboard seeded with the standard reminder and follow-up workflows.
    pub fn with_defaults() -> Self {
        let mut dashboard = Self::new();
        dashboard.add_workflow(
            "Appointment reminder",
            TriggerType::AppointmentReminder,
            vec![WorkflowAction::SendSms {
                message: "Reminder: you have an appointment tomorrow.".into(),
            }],
        );
        dashboard.add_workflow(
            "Post-session follow-up",
            TriggerType::SessionCompleted,
            vec![WorkflowAction::SendEmail {
                subject: "Thank you for your visit".into(),
                body: "Your session summary is available from the practice.".into(),
            }],
        );
        dashboard.add_workflow(
            "Follow-up due",
            TriggerType::FollowUpDue,
            vec![WorkflowAction::Notify {
                message: "Patient follow-up is due.".into(),
            }],
        );
        dashboard
    }

    pub fn workflows(&self) -> &[Workflow] {
        &self.workflows
    }

    pub fn workflow(&self, id: Uuid) -> Result<&Workflow, AutomationError> {
        self.workflows
            .iter()
            .find(|w| w.id == id)
            .ok_or(AutomationError::UnknownWorkflow(id))
    }

    fn workflow_mut(&mut self, id: Uuid) -> Result<&mut Workflow, AutomationError> {
        self.workflows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(AutomationError::UnknownWorkflow(id))
    }

    /// New workflows start enabled.
    pub fn add_workflow(
        &mut self,
        name: impl Into<String>,
        trigger: TriggerType,
        actions: Vec<WorkflowAction>,
    ) -> &Workflow {
        let workflow = Workflow {
            id: Uuid::new_v4(),
            name: name.into(),
            trigger,
            actions,
            enabled: true,
            created_at: Utc::now(),
        };
        tracing::info!(workflow_id = %workflow.id, trigger = %trigger, "Workflow added");
        self.workflows.push(workflow);
        &self.workflows[self.workflows.len() - 1]
    }

    /// Flips `enabled`. Returns the new value.
    pub fn toggle_workflow(&mut self, id: Uuid) -> Result<bool, AutomationError> {
        let workflow = self.workflow_mut(id)?;
        workflow.enabled = !workflow.enabled;
        tracing::info!(workflow_id = %id, enabled = workflow.enabled, "Workflow toggled");
        Ok(workflow.enabled)
    }

    /// Removes the workflow. Its events stay for history.
    pub fn remove_workflow(&mut self, id: Uuid) -> Result<Workflow, AutomationError> {
        let idx = self
            .workflows
            .iter()
            .position(|w| w.id == id)
            .ok_or(AutomationError::UnknownWorkflow(id))?;
        Ok(self.workflows.remove(idx))
    }

    /// Schedules a pending event. Only enabled workflows accept events.
    pub fn schedule_event(
        &mut self,
        workflow_id: Uuid,
        patient_id: Option<Uuid>,
        scheduled_for: DateTime<Utc>,
    ) -> Result<&AutomationEvent, AutomationError> {
        if !self.workflow(workflow_id)?.enabled {
            return Err(AutomationError::DisabledWorkflow(workflow_id));
        }
        let event = AutomationEvent::new(workflow_id, patient_id, scheduled_for);
        tracing::debug!(event_id = %event.id, workflow_id = %workflow_id, "Event scheduled");
        self.events.push(event);
        Ok(&self.events[self.events.len() - 1])
    }

    pub fn event(&self, id: Uuid) -> Result<&AutomationEvent, AutomationError> {
        self.events
            .iter()
            .find(|e| e.id == id)
            .ok_or(AutomationError::UnknownEvent(id))
    }

    fn event_mut(&mut self, id: Uuid) -> Result<&mut AutomationEvent, AutomationError> {
        self.events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(AutomationError::UnknownEvent(id))
    }

    pub fn start_event(&mut self, id: Uuid) -> Result<(), AutomationError> {
        self.event_mut(id)?.start()
    }

    pub fn complete_event(&mut self, id: Uuid) -> Result<(), AutomationError> {
        self.event_mut(id)?.complete()
    }

    pub fn fail_event(&mut self, id: Uuid, reason: impl Into<String>) -> Result<(), AutomationError> {
        self.event_mut(id)?.fail(reason)
    }

    /// Events ordered by scheduled time, optionally filtered by status.
    pub fn events(&self, status: Option<EventStatus>) -> Vec<&AutomationEvent> {
        let mut out: Vec<&AutomationEvent> = self
            .events
            .iter()
            .filter(|e| status.map_or(true, |s| e.status == s))
            .collect();
        out.sort_by_key(|e| e.scheduled_for);
        out
    }

    pub fn stats(&self) -> DashboardStats {
        let count = |s: EventStatus| self.events.iter().filter(|e| e.status == s).count();
        let completed = count(EventStatus::Completed);
        let failed = count(EventStatus::Failed);
        let finished = completed + failed;
        DashboardStats {
            total_workflows: self.workflows.len(),
            active_workflows: self.workflows.iter().filter(|w| w.enabled).count(),
            total_events: self.events.len(),
            pending: count(EventStatus::Pending),
            executing: count(EventStatus::Executing),
            completed,
            failed,
            success_rate: if finished == 0 {
                0.0
            } else {
                completed as f32 / finished as f32
            },
        }
    }

    /// Runs a pending event to completion. The event fails when its workflow
    /// has been disabled or removed since scheduling. Failures are recorded
    /// on the event and logged; the returned status is the final one.
    pub fn simulate_execution(&mut self, event_id: Uuid) -> Result<EventStatus, AutomationError> {
        let workflow_id = self.event(event_id)?.workflow_id;
        let blocker = match self.workflow(workflow_id) {
            Ok(w) if w.enabled => None,
            Ok(_) => Some(AutomationError::DisabledWorkflow(workflow_id)),
            Err(e) => Some(e),
        };
        let actions: Vec<String> = self
            .workflow(workflow_id)
            .map(|w| w.actions.iter().map(WorkflowAction::describe).collect())
            .unwrap_or_default();

        let event = self.event_mut(event_id)?;
        event.start()?;
        match blocker {
            None => {
                event.complete()?;
                tracing::info!(event_id = %event_id, actions = ?actions, "Automation event completed");
            }
            Some(err) => {
                let reason = err.to_string();
                event.fail(reason.as_str())?;
                tracing::warn!(event_id = %event_id, error = %reason, "Automation event failed");
            }
        }
        Ok(event.status)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn dashboard_with_workflow() -> (AutomationDashboard, Uuid) {
        let mut d = AutomationDashboard::new();
        let id = d
            .add_workflow(
                "Birthday greeting",
                TriggerType::PatientBirthday,
                vec![WorkflowAction::SendSms { message: "Happy birthday!".into() }],
            )
            .id;
        (d, id)
    }

    #[test]
    fn start_increments_attempts() {
        let mut event = AutomationEvent::new(Uuid::new_v4(), None, Utc::now());
        assert_eq!(event.attempts, 0);
        event.start().unwrap();
        assert_eq!(event.status, EventStatus::Executing);
        assert_eq!(event.attempts, 1);
    }

    #[test]
    fn completing_pending_event_is_rejected() {
        let mut event = AutomationEvent::new(Uuid::new_v4(), None, Utc::now());
        let err = event.complete().unwrap_err();
        assert_eq!(
            err,
            AutomationError::InvalidTransition {
                from: EventStatus::Pending,
                to: EventStatus::Completed
            }
        );
        assert!(event.fail("boom").is_err());
        assert_eq!(event.status, EventStatus::Pending);
    }

    #[test]
    fn failed_event_is_terminal() {
        let mut event = AutomationEvent::new(Uuid::new_v4(), None, Utc::now());
        event.start().unwrap();
        event.fail("SMS gateway unavailable").unwrap();
        assert_eq!(event.last_error.as_deref(), Some("SMS gateway unavailable"));
        assert!(event.start().is_err());
        assert!(event.complete().is_err());
        assert_eq!(event.attempts, 1);
    }

    #[test]
    fn toggle_and_remove_workflow() {
        let (mut d, id) = dashboard_with_workflow();
        assert!(!d.toggle_workflow(id).unwrap());
        assert!(d.toggle_workflow(id).unwrap());
        let removed = d.remove_workflow(id).unwrap();
        assert_eq!(removed.name, "Birthday greeting");
        assert_eq!(d.toggle_workflow(id), Err(AutomationError::UnknownWorkflow(id)));
    }

    #[test]
    fn disabled_workflow_rejects_scheduling() {
        let (mut d, id) = dashboard_with_workflow();
        d.toggle_workflow(id).unwrap();
        let err = d.schedule_event(id, None, Utc::now()).unwrap_err();
        assert_eq!(err, AutomationError::DisabledWorkflow(id));
    }

    #[test]
    fn simulate_execution_completes() {
        let (mut d, id) = dashboard_with_workflow();
        let event_id = d.schedule_event(id, Some(Uuid::new_v4()), Utc::now()).unwrap().id;
        assert_eq!(d.simulate_execution(event_id).unwrap(), EventStatus::Completed);
        assert_eq!(d.event(event_id).unwrap().attempts, 1);
        assert!(d.simulate_execution(event_id).is_err());
    }

    #[test]
    fn simulate_execution_fails_when_workflow_disabled() {
        let (mut d, id) = dashboard_with_workflow();
        let event_id = d.schedule_event(id, None, Utc::now()).unwrap().id;
        d.toggle_workflow(id).unwrap();
        assert_eq!(d.simulate_execution(event_id).unwrap(), EventStatus::Failed);
        let event = d.event(event_id).unwrap();
        assert!(event.last_error.as_deref().unwrap().contains("disabled"));
    }

    #[test]
    fn simulate_execution_fails_when_workflow_removed() {
        let (mut d, id) = dashboard_with_workflow();
        let event_id = d.schedule_event(id, None, Utc::now()).unwrap().id;
        d.remove_workflow(id).unwrap();
        assert_eq!(d.simulate_execution(event_id).unwrap(), EventStatus::Failed);
    }

    #[test]
    fn events_filter_and_order() {
        let (mut d, id) = dashboard_with_workflow();
        let now = Utc::now();
        let later = d.schedule_event(id, None, now + Duration::hours(2)).unwrap().id;
        let sooner = d.schedule_event(id, None, now + Duration::hours(1)).unwrap().id;
        let all: Vec<Uuid> = d.events(None).iter().map(|e| e.id).collect();
        assert_eq!(all, vec![sooner, later]);

        d.simulate_execution(later).unwrap();
        let pending = d.events(Some(EventStatus::Pending));
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, sooner);
    }

    #[test]
    fn stats_count_statuses() {
        let (mut d, id) = dashboard_with_workflow();
        let empty = d.stats();
        assert_eq!(empty.success_rate, 0.0);
        assert_eq!(empty.active_workflows, 1);

        let a = d.schedule_event(id, None, Utc::now()).unwrap().id;
        let b = d.schedule_event(id, None, Utc::now()).unwrap().id;
        d.schedule_event(id, None, Utc::now()).unwrap();
        d.simulate_execution(a).unwrap();
        d.start_event(b).unwrap();
        d.fail_event(b, "No phone number on file").unwrap();

        let stats = d.stats();
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.success_rate, 0.5);
    }

    #[test]
    fn defaults_are_enabled() {
        let d = AutomationDashboard::with_defaults();
        assert_eq!(d.workflows().len(), 3);
        assert!(d.workflows().iter().all(|w| w.enabled));
    }

    #[test]
    fn action_serializes_tagged() {
        let json = serde_json::to_value(WorkflowAction::Notify { message: "Hi".into() }).unwrap();
        assert_eq!(json["type"], "notify");
        assert_eq!(json["message"], "Hi");
    }
}
