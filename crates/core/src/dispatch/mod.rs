pub mod presence;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::directory::{Directory, IntentRoute, RingGroup};
use crate::domain::call::CallState;
use crate::domain::decision::{DispatchDecision, FallbackReason};
use crate::domain::staff::StaffEntry;
use crate::routing::names::{match_restricted_name, match_staff_name, NameMatch};
use crate::routing::transfer::is_restricted_entry;

pub use presence::{AssumeReachable, StaffPresence, UnreachableExtensions};

pub trait DispatchRuntime: Send + Sync {
    fn decide(
        &self,
        call: &CallState,
        directory: &Directory,
        now: DateTime<Utc>,
    ) -> DispatchDecision;
}

/// Deterministic resolver over a directory snapshot and an explicit timestamp.
#[derive(Clone, Debug, Default)]
pub struct DispatchEngine<P = AssumeReachable> {
    presence: P,
}

impl<P> DispatchEngine<P> {
    pub fn new(presence: P) -> Self {
        Self { presence }
    }

    pub fn presence(&self) -> &P {
        &self.presence
    }
}

impl<P: StaffPresence> DispatchEngine<P> {
    pub fn decide_with_audit(
        &self,
        call: &CallState,
        directory: &Directory,
        now: DateTime<Utc>,
        context: &AuditContext,
        sink: &dyn AuditSink,
    ) -> DispatchDecision {
        let decision = self.decide(call, directory, now);

        let outcome = match &decision {
            DispatchDecision::Transfer { .. } | DispatchDecision::RingGroupTransfer { .. } => {
                AuditOutcome::Routed
            }
            DispatchDecision::Restricted { .. } => AuditOutcome::Restricted,
            DispatchDecision::Fallback { .. } => AuditOutcome::Fallback,
        };
        let mut event =
            AuditEvent::new(context, "dispatch.decided", AuditCategory::Dispatch, outcome, now)
                .with_metadata("kind", decision.kind())
                .with_metadata("office_open", directory.hours().is_open(now).to_string());
        if let Some(target) = decision.target() {
            event = event.with_metadata("target", target);
        }
        if let Some(reason) = decision.fallback_reason() {
            event = event.with_metadata("reason", reason.as_str());
        }
        if let Some(intent) = call.intent {
            event = event.with_metadata("intent", intent.as_str());
        }
        sink.emit(event);

        decision
    }

    fn is_staff_reachable(
        &self,
        directory: &Directory,
        entry: &StaffEntry,
        now: DateTime<Utc>,
    ) -> bool {
        directory.hours().is_staff_available(entry, now)
            && self.presence.is_reachable(&entry.extension)
    }

    fn is_ring_group_reachable(
        &self,
        directory: &Directory,
        group: &RingGroup,
        now: DateTime<Utc>,
    ) -> bool {
        let hours = directory.hours();
        hours.is_open(now)
            && group.members.iter().any(|extension| {
                self.presence.is_reachable(extension)
                    && directory
                        .staff_by_extension(extension)
                        .map_or(true, |entry| {
                            !is_restricted_entry(directory, entry)
                                && hours.is_staff_available(entry, now)
                        })
            })
    }

    fn resolve_requested(
        &self,
        requested: &str,
        directory: &Directory,
        now: DateTime<Utc>,
        office_open: bool,
    ) -> DispatchDecision {
        if let Some(name) = directory.restricted_name(requested) {
            return DispatchDecision::Restricted { staff_name: name.to_string() };
        }

        match match_staff_name(directory, requested) {
            NameMatch::Unique(entry) if is_restricted_entry(directory, entry) => {
                DispatchDecision::Restricted { staff_name: entry.name.clone() }
            }
            NameMatch::Unique(entry) if !self.is_staff_reachable(directory, entry, now) => {
                DispatchDecision::fallback(FallbackReason::StaffUnavailable, office_open)
            }
            NameMatch::Unique(entry) => DispatchDecision::Transfer { staff: entry.clone() },
            NameMatch::Ambiguous(_) => {
                DispatchDecision::fallback(FallbackReason::AmbiguousStaff, office_open)
            }
            NameMatch::NotFound => match match_restricted_name(directory, requested) {
                Some(name) => DispatchDecision::Restricted { staff_name: name.to_string() },
                None => DispatchDecision::fallback(FallbackReason::UnknownStaff, office_open),
            },
        }
    }

    fn resolve_role(
        &self,
        call: &CallState,
        route: &IntentRoute,
        role: &str,
        directory: &Directory,
        now: DateTime<Utc>,
    ) -> Option<DispatchDecision> {
        let department = match (&route.department, call.insurance_type) {
            (Some(department), _) => department,
            (None, Some(insurance_type)) => directory.department_for(insurance_type),
            (None, None) => return None,
        };

        directory
            .staff_with_role(department, role)
            .find(|entry| {
                !is_restricted_entry(directory, entry)
                    && self.is_staff_reachable(directory, entry, now)
            })
            .map(|entry| DispatchDecision::Transfer { staff: entry.clone() })
    }

    fn resolve_alpha_split(
        &self,
        call: &CallState,
        route: Option<&IntentRoute>,
        directory: &Directory,
        now: DateTime<Utc>,
        office_open: bool,
    ) -> DispatchDecision {
        let Some((insurance_type, identifier)) = call.routing_identifier() else {
            return DispatchDecision::fallback(FallbackReason::InsufficientInfo, office_open);
        };

        let department = route
            .and_then(|route| route.department.as_ref())
            .unwrap_or_else(|| directory.department_for(insurance_type));
        let is_new_business = route.is_some_and(|route| route.new_business);
        let letter = directory.route_letter(identifier);

        debug!(
            event_name = "dispatch.alpha_split",
            department = %department,
            letter = %letter,
            is_new_business,
            "resolving alpha split"
        );

        match directory.find_staff(letter, department, is_new_business) {
            None => DispatchDecision::fallback(FallbackReason::NoMatch, office_open),
            Some(entry)
                if is_restricted_entry(directory, entry)
                    || !self.is_staff_reachable(directory, entry, now) =>
            {
                DispatchDecision::fallback(FallbackReason::NoAgentAvailable, office_open)
            }
            Some(entry) => DispatchDecision::Transfer { staff: entry.clone() },
        }
    }
}

impl<P: StaffPresence> DispatchRuntime for DispatchEngine<P> {
    fn decide(
        &self,
        call: &CallState,
        directory: &Directory,
        now: DateTime<Utc>,
    ) -> DispatchDecision {
        let office_open = directory.hours().is_open(now);

        let decision = 'decided: {
            if let Some(requested) = call.requested_staff() {
                break 'decided self.resolve_requested(requested, directory, now, office_open);
            }

            let route = call.intent.and_then(|intent| directory.intent_route(intent));
            if let Some(route) = route {
                let group =
                    route.ring_group.as_deref().and_then(|name| directory.ring_group(name));
                if let Some(group) = group {
                    if self.is_ring_group_reachable(directory, group, now) {
                        break 'decided DispatchDecision::RingGroupTransfer { group: group.clone() };
                    }
                    debug!(
                        event_name = "dispatch.ring_group.unreachable",
                        ring_group = %group.name,
                        "no reachable ring group member, falling back to alpha split"
                    );
                }
                if let Some(role) = route.role.as_deref() {
                    if let Some(decision) = self.resolve_role(call, route, role, directory, now) {
                        break 'decided decision;
                    }
                }
            }

            self.resolve_alpha_split(call, route, directory, now, office_open)
        };

        debug!(
            event_name = "dispatch.decided",
            kind = decision.kind(),
            target = decision.target().unwrap_or_default(),
            reason = decision.fallback_reason().map(|reason| reason.as_str()).unwrap_or_default(),
            office_open,
            "dispatch decision"
        );
        decision
    }
}

/// Decides with every extension assumed reachable.
pub fn decide(call: &CallState, directory: &Directory, now: DateTime<Utc>) -> DispatchDecision {
    DispatchEngine::<AssumeReachable>::default().decide(call, directory, now)
}
