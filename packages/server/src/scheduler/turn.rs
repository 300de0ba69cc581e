//! The per-room turn loop.
//!
//! One task per active room drives every agent through
//! idle → thinking → speaking → idle, one agent at a time.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering},
    },
    time::Duration,
};

use rand::seq::IndexedRandom;

use roundtable_shared::time::Clock;

use crate::domain::{
    Agent, AgentId, AgentStatus, Message, MessageGenerator, MessageId, RepositoryError, Room,
    RoomEvent, RoomEventPublisher, RoomId, RoomRepository, SessionId, TypingSpeed,
};

use super::config::{DelayRange, SchedulerConfig, typing_delay};

/// Collaborators shared by every room loop.
pub(crate) struct TurnDeps {
    pub(crate) repository: Arc<dyn RoomRepository>,
    pub(crate) publisher: Arc<dyn RoomEventPublisher>,
    pub(crate) generator: Arc<dyn MessageGenerator>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: SchedulerConfig,
    pub(crate) session_id: SessionId,
    /// chars per second, never zero
    pub(crate) typing_speed: AtomicU32,
}

impl TurnDeps {
    pub(crate) fn typing_speed(&self) -> TypingSpeed {
        TypingSpeed::new(self.typing_speed.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// Why a room loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Paused,
    RoomMissing,
    NotEnoughAgents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    /// A full turn finished; wait the inter-turn pause
    TurnCompleted,
    /// Nothing could be done right now; poll again
    Retry,
    Stop(StopReason),
}

pub(crate) struct RoomTurnLoop {
    room_id: RoomId,
    deps: Arc<TurnDeps>,
    active: Arc<AtomicBool>,
    turn_counter: Arc<AtomicU64>,
}

impl RoomTurnLoop {
    pub(crate) fn new(
        room_id: RoomId,
        deps: Arc<TurnDeps>,
        active: Arc<AtomicBool>,
        turn_counter: Arc<AtomicU64>,
    ) -> Self {
        Self {
            room_id,
            deps,
            active,
            turn_counter,
        }
    }

    pub(crate) async fn run(self) {
        tokio::time::sleep(self.deps.config.initial_delay).await;

        loop {
            let wait = match self.tick().await {
                TickOutcome::TurnCompleted => sample_delay(&self.deps.config.pause_delay),
                TickOutcome::Retry => self.deps.config.poll_interval,
                TickOutcome::Stop(reason) => {
                    self.deactivate(reason);
                    return;
                }
            };
            tokio::time::sleep(wait).await;
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    async fn tick(&self) -> TickOutcome {
        if !self.is_active() {
            return TickOutcome::Stop(StopReason::Paused);
        }

        let room = match self.deps.repository.get_room_by_id(&self.room_id).await {
            Ok(room) => room,
            Err(_) => return TickOutcome::Stop(StopReason::RoomMissing),
        };
        if !room.has_enough_agents() {
            return TickOutcome::Stop(StopReason::NotEnoughAgents);
        }
        if let Some(busy) = room.busy_agent() {
            tracing::debug!(
                "Room {}: '{}' is still {}, checking again later",
                self.room_id,
                busy.name,
                busy.status
            );
            return TickOutcome::Retry;
        }
        let Some(speaker) = choose_idle_agent(&room) else {
            return TickOutcome::Retry;
        };

        let counter = self.turn_counter.load(Ordering::SeqCst);
        let content = self.deps.generator.generate(&speaker, &room, counter);

        // idle -> thinking
        let speaker = match self
            .deps
            .repository
            .begin_thinking(&self.room_id, &speaker.id)
            .await
        {
            Ok(agent) => agent,
            Err(RepositoryError::RoomNotFound(_)) => {
                return TickOutcome::Stop(StopReason::RoomMissing);
            }
            Err(e) => {
                tracing::debug!("Room {}: could not start a turn: {}", self.room_id, e);
                return TickOutcome::Retry;
            }
        };
        tracing::debug!("Room {}: '{}' is thinking", self.room_id, speaker.name);
        self.publish_status(&speaker.id, AgentStatus::Thinking);

        tokio::time::sleep(sample_delay(&self.deps.config.thinking_delay)).await;
        if !self.is_active() {
            return TickOutcome::Stop(StopReason::Paused);
        }

        // thinking -> speaking
        let message = Message::new(
            MessageId::generate(),
            &speaker,
            content,
            self.deps.clock.now(),
            self.deps.session_id.clone(),
        );
        let speaker = match self
            .deps
            .repository
            .begin_speaking(&self.room_id, &speaker.id, message.clone())
            .await
        {
            Ok(agent) => agent,
            Err(RepositoryError::RoomNotFound(_)) => {
                return TickOutcome::Stop(StopReason::RoomMissing);
            }
            Err(e) => {
                tracing::info!(
                    "Room {}: turn of '{}' aborted: {}",
                    self.room_id,
                    speaker.name,
                    e
                );
                return TickOutcome::Retry;
            }
        };
        tracing::debug!("Room {}: '{}' is speaking", self.room_id, speaker.name);
        self.deps.publisher.publish(RoomEvent::MessagePosted {
            room_id: self.room_id.clone(),
            message: message.clone(),
        });
        self.publish_status(&speaker.id, AgentStatus::Speaking);

        let typing = typing_delay(
            &message.content,
            self.deps.typing_speed(),
            self.deps.config.min_typing_delay,
        );
        tokio::time::sleep(typing).await;
        if !self.is_active() {
            return TickOutcome::Stop(StopReason::Paused);
        }

        // speaking -> idle
        match self
            .deps
            .repository
            .finish_speaking(&self.room_id, &speaker.id)
            .await
        {
            Ok(agent) => self.publish_status(&agent.id, AgentStatus::Idle),
            Err(RepositoryError::RoomNotFound(_)) => {
                return TickOutcome::Stop(StopReason::RoomMissing);
            }
            Err(e) => tracing::debug!(
                "Room {}: '{}' left while speaking: {}",
                self.room_id,
                speaker.name,
                e
            ),
        }
        self.turn_counter.fetch_add(1, Ordering::SeqCst);

        TickOutcome::TurnCompleted
    }

    fn publish_status(&self, agent_id: &AgentId, status: AgentStatus) {
        self.deps.publisher.publish(RoomEvent::AgentStatusChanged {
            room_id: self.room_id.clone(),
            agent_id: agent_id.clone(),
            status,
        });
    }

    fn deactivate(&self, reason: StopReason) {
        self.active.store(false, Ordering::SeqCst);
        match reason {
            StopReason::Paused => {
                tracing::debug!("Room {}: loop exited after pause", self.room_id);
                return;
            }
            StopReason::RoomMissing => {
                tracing::info!("Room {}: room is gone, simulation stopped", self.room_id);
            }
            StopReason::NotEnoughAgents => {
                tracing::info!(
                    "Room {}: fewer than two agents, simulation stopped",
                    self.room_id
                );
            }
        }
        self.deps.publisher.publish(RoomEvent::SimulationStateChanged {
            room_id: self.room_id.clone(),
            active: false,
        });
    }
}

/// Uniform choice among idle agents
fn choose_idle_agent(room: &Room) -> Option<Agent> {
    let idle = room.idle_agents();
    idle.choose(&mut rand::rng()).map(|agent| (*agent).clone())
}

fn sample_delay(range: &DelayRange) -> Duration {
    range.sample(&mut rand::rng())
}
