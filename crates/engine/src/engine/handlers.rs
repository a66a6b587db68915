// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bridge command handlers
//!
//! Each handler returns the text written to the command's response file.
//! Failures become responses too; nothing here aborts the bridge loop.

use super::{Engine, EngineState};
use crate::error::{EngineError, RegistryError};
use crate::launch::{render_launch_command, LaunchRequest};
use crate::reconcile::alive_sessions;
use crate::record::RecordOrigin;
use crate::registry::SessionRegistry;
use mw_adapters::{NotifyAdapter, PresentationAdapter, SessionAdapter, SessionError};
use mw_core::{
    next_phonetic_token, resolve, AgentKind, BridgeCommand, Clock, Identity, LifecycleState,
    ModelTier, ResolvedIdentity, SessionId, UnknownName,
};

/// Parse an optional tier name; empty or absent means the default.
fn parse_model(model: Option<&str>) -> Result<Option<ModelTier>, UnknownName> {
    model
        .filter(|m| !m.is_empty())
        .map(str::parse::<ModelTier>)
        .transpose()
}

/// Explicit identity for a registered session. Without a task id, the
/// remainder of the session name stands in.
fn explicit_identity(
    id: &SessionId,
    kind: AgentKind,
    task_id: Option<String>,
    model: Option<ModelTier>,
) -> Identity {
    let task = task_id.filter(|t| !t.is_empty()).or_else(|| {
        resolve(id.as_str())
            .agent()
            .and_then(|r| r.suffix_source())
            .map(str::to_string)
    });
    Identity::Agent(ResolvedIdentity::explicit(kind, task, model))
}

/// Response for a failed registration.
fn registration_failure(prefix: &str, error: EngineError) -> String {
    match error {
        EngineError::Registry(RegistryError::AlreadyAttached(id)) => {
            format!("Terminal already registered as agent: {id}")
        }
        e => format!("{prefix}: {e}"),
    }
}

impl<S, P, N, C> Engine<S, P, N, C>
where
    S: SessionAdapter,
    P: PresentationAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    pub(super) async fn execute(
        &self,
        state: &mut EngineState<P, N>,
        command: BridgeCommand,
    ) -> String {
        match command {
            BridgeCommand::Spawn {
                agent_type,
                task_id,
                model,
            } => self
                .spawn_agent(state, &agent_type, task_id, model.as_deref())
                .await
                .unwrap_or_else(|e| format!("Failed to spawn agent: {e}")),
            BridgeCommand::Kill { identifier } => self
                .kill_agent(state, &identifier)
                .await
                .unwrap_or_else(|e| format!("Failed to kill agent: {e}")),
            BridgeCommand::RegisterCurrentTerminal {
                session_name,
                agent_type,
                model,
                task_id,
            } => self
                .register_terminal(state, &session_name, &agent_type, task_id, model.as_deref())
                .await
                .unwrap_or_else(|e| registration_failure("Failed to register current terminal", e)),
            BridgeCommand::CreateTerminal {
                session_name,
                agent_type,
                model,
                task_id,
            } => self
                .create_terminal(
                    state,
                    &session_name,
                    agent_type.as_deref(),
                    task_id,
                    model.as_deref(),
                )
                .await
                .unwrap_or_else(|e| registration_failure("Failed to create terminal", e)),
            BridgeCommand::UpdateState {
                identifier,
                state: next,
            } => self
                .update_state(state, &identifier, &next)
                .await
                .unwrap_or_else(|e| format!("Failed to update state: {e}")),
            BridgeCommand::Refresh {} => match self.reconcile_locked(state, self.config.discovery).await {
                Ok(report) => format!(
                    "Refreshed: {} kept, {} discovered, {} dropped",
                    report.kept, report.created, report.dropped
                ),
                Err(e) => format!("Failed to refresh: {e}"),
            },
        }
    }

    async fn spawn_agent(
        &self,
        state: &mut EngineState<P, N>,
        agent_type: &str,
        task_id: Option<String>,
        model: Option<&str>,
    ) -> Result<String, EngineError> {
        let kind: AgentKind = agent_type.parse()?;
        let model = parse_model(model)?.unwrap_or_default();
        let task_id = task_id.filter(|t| !t.is_empty());
        let suffix = match &task_id {
            Some(task) => task.clone(),
            None => self.free_phonetic_token(&state.registry, kind).await,
        };
        let id = SessionId::parse(format!("{kind}-{suffix}"))?;

        let workspace = &self.config.workspace_root;
        let command = render_launch_command(
            &self.config.launch_command,
            &LaunchRequest {
                kind,
                task_id: task_id.as_deref(),
                model,
                session_id: &id,
                workspace,
            },
        );
        self.sessions.spawn(&id, workspace, &command).await?;
        tracing::info!(session_id = %id, %kind, %model, "agent spawned");

        let identity = Identity::Agent(ResolvedIdentity::explicit(kind, Some(suffix), Some(model)));
        let display = state
            .registry
            .register_local(
                id.clone(),
                identity,
                RecordOrigin::Spawned,
                Some(workspace.clone()),
                self.clock.now(),
            )
            .await?;
        Ok(format!("Agent spawned: {display} ({id})"))
    }

    /// First phonetic token not used by a tracked or live `<kind>-` session.
    async fn free_phonetic_token(&self, registry: &SessionRegistry<P, N>, kind: AgentKind) -> String {
        let mut names: Vec<String> = registry.ids().into_iter().map(String::from).collect();
        match alive_sessions(&self.sessions, self.config.ground_truth_timeout).await {
            Ok(alive) => names.extend(alive),
            Err(e) => tracing::debug!(error = %e, "phonetic allocation without live sessions"),
        }
        let prefix = format!("{kind}-");
        next_phonetic_token(names.iter().filter_map(|n| n.strip_prefix(prefix.as_str())))
    }

    async fn kill_agent(
        &self,
        state: &mut EngineState<P, N>,
        identifier: &str,
    ) -> Result<String, EngineError> {
        let Some(id) = state.registry.find_by_identifier(identifier).cloned() else {
            return Ok(format!("Agent {identifier} not found"));
        };
        self.sessions.kill(&id).await?;
        if let Err(e) = state.registry.transition(id.as_str(), LifecycleState::Stopped).await {
            tracing::debug!(session_id = %id, error = %e, "stop transition skipped");
        }
        state.registry.remove(id.as_str()).await;
        tracing::info!(session_id = %id, "agent killed");
        Ok(format!("Agent {identifier} terminated successfully"))
    }

    async fn register_terminal(
        &self,
        state: &mut EngineState<P, N>,
        session_name: &str,
        agent_type: &str,
        task_id: Option<String>,
        model: Option<&str>,
    ) -> Result<String, EngineError> {
        let id = SessionId::parse(session_name)?;
        let kind: AgentKind = agent_type.parse()?;
        let identity = explicit_identity(&id, kind, task_id, parse_model(model)?);
        let display = state
            .registry
            .register_local(id.clone(), identity, RecordOrigin::Registered, None, self.clock.now())
            .await?;
        Ok(format!("Registered current terminal as agent: {id} ({display})"))
    }

    async fn create_terminal(
        &self,
        state: &mut EngineState<P, N>,
        session_name: &str,
        agent_type: Option<&str>,
        task_id: Option<String>,
        model: Option<&str>,
    ) -> Result<String, EngineError> {
        let id = SessionId::parse(session_name)?;
        let model = parse_model(model)?;
        let identity = match agent_type.filter(|t| !t.is_empty()) {
            Some(kind) => explicit_identity(&id, kind.parse()?, task_id, model),
            None => resolve(id.as_str()).with_model_hint(model),
        };
        if !self.sessions.is_alive(&id).await? {
            return Err(SessionError::NotFound(id.to_string()).into());
        }
        let cwd = match self.sessions.pane_cwd(&id).await {
            Ok(cwd) => cwd,
            Err(e) => {
                tracing::debug!(session_id = %id, error = %e, "pane directory unavailable");
                None
            }
        };
        let display = state
            .registry
            .register_local(id.clone(), identity, RecordOrigin::Attached, cwd, self.clock.now())
            .await?;
        Ok(format!("Terminal created and attached: {display} ({id})"))
    }

    async fn update_state(
        &self,
        state: &mut EngineState<P, N>,
        identifier: &str,
        next: &str,
    ) -> Result<String, EngineError> {
        let Some(id) = state.registry.find_by_identifier(identifier).cloned() else {
            return Ok(format!("Agent {identifier} not found"));
        };
        let next = LifecycleState::parse_strict(next).ok_or_else(|| UnknownName {
            what: "state",
            value: next.to_string(),
        })?;
        let effective = state.registry.transition(id.as_str(), next).await?;
        Ok(format!("Agent {id} is now {effective}"))
    }
}
