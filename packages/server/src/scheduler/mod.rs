//! 会話スケジューラ
//!
//! Room ごとに 1 つの tokio タスクを起動し、エージェントに順番に発言させます。
//!
//! - `start` / `pause` は Room 単位で何度呼んでも安全（冪等）
//! - 同じ Room で 2 つのタスクが同時に動くことはない
//! - `pause` はエージェントのステータスを変更しない（次回 `start` 時に idle に戻す）
//! - タイピング速度は全 Room 共通で、実行中でも変更できる

mod config;
mod run_state;
mod turn;

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
};

use tokio::sync::Mutex;

use roundtable_shared::time::Clock;

use crate::domain::{
    MessageGenerator, RepositoryError, RoomEvent, RoomEventPublisher, RoomId, RoomRepository,
    SessionId, TypingSpeed,
};

pub use config::{DelayRange, SchedulerConfig, typing_delay};

use run_state::RoomRunState;
use turn::{RoomTurnLoop, TurnDeps};

/// `start` が受け付けられなかった理由
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StartError {
    #[error("Room not found: {0}")]
    RoomNotFound(String),
    #[error("Room {room_id} has {count} agent(s), at least 2 are required")]
    NotEnoughAgents { room_id: String, count: usize },
}

/// 全 Room の会話ループを管理するスケジューラ
pub struct TurnScheduler {
    deps: Arc<TurnDeps>,
    /// Room ごとの実行状態
    runs: Mutex<HashMap<RoomId, RoomRunState>>,
    /// 実行中の start（同時に 1 つ）
    starting: Mutex<()>,
}

impl TurnScheduler {
    /// 新しい TurnScheduler を作成
    ///
    /// プロセスごとに新しいセッション ID が払い出され、このスケジューラが生成する
    /// すべてのメッセージに付与されます。
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        publisher: Arc<dyn RoomEventPublisher>,
        generator: Arc<dyn MessageGenerator>,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
        typing_speed: TypingSpeed,
    ) -> Self {
        let deps = TurnDeps {
            repository,
            publisher,
            generator,
            clock,
            config,
            session_id: SessionId::generate(),
            typing_speed: AtomicU32::new(typing_speed.chars_per_second()),
        };
        Self {
            deps: Arc::new(deps),
            runs: Mutex::new(HashMap::new()),
            starting: Mutex::new(()),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.deps.session_id
    }

    pub fn typing_speed(&self) -> TypingSpeed {
        self.deps.typing_speed()
    }

    /// 全 Room 共通のタイピング速度を変更する（次の発言から反映）
    pub fn set_typing_speed(&self, speed: TypingSpeed) {
        self.deps
            .typing_speed
            .store(speed.chars_per_second(), Ordering::SeqCst);
        tracing::info!("Typing speed set to {} chars/s", speed.chars_per_second());
    }

    /// Room の会話を開始する
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 新しく開始した
    /// * `Ok(false)` - すでに実行中だった（何もしない）
    /// * `Err(StartError)` - Room が存在しない、またはエージェントが 2 人未満
    pub async fn start(&self, room_id: &RoomId) -> Result<bool, StartError> {
        // start 同士だけを直列化する。runs のロックは永続化の間は保持しない
        let _starting = self.starting.lock().await;
        if self.is_active(room_id).await {
            tracing::debug!("Room {}: simulation already running", room_id);
            return Ok(false);
        }

        let room = self
            .deps
            .repository
            .get_room_by_id(room_id)
            .await
            .map_err(|_| StartError::RoomNotFound(room_id.as_str().to_string()))?;
        if !room.has_enough_agents() {
            return Err(StartError::NotEnoughAgents {
                room_id: room_id.as_str().to_string(),
                count: room.agents.len(),
            });
        }

        // 前回の中断で thinking / speaking のまま残ったエージェントを idle に戻す
        let room = match self
            .deps
            .repository
            .start_session(room_id, &self.deps.session_id)
            .await
        {
            Ok(room) => room,
            Err(RepositoryError::RoomNotFound(id)) => return Err(StartError::RoomNotFound(id)),
            Err(e) => {
                tracing::warn!("Room {}: failed to reset agents: {}", room_id, e);
                room
            }
        };

        let mut runs = self.runs.lock().await;
        let run = runs.entry(room_id.clone()).or_insert_with(RoomRunState::new);
        if run.is_running() {
            return Ok(false);
        }
        self.deps.publisher.publish(RoomEvent::AgentsChanged {
            room_id: room_id.clone(),
            agents: room.agents,
        });

        let active = run.arm();
        let turn_loop = RoomTurnLoop::new(
            room_id.clone(),
            Arc::clone(&self.deps),
            active,
            run.turn_counter(),
        );
        run.attach(tokio::spawn(turn_loop.run()));

        tracing::info!("Room {}: simulation started", room_id);
        self.deps.publisher.publish(RoomEvent::SimulationStateChanged {
            room_id: room_id.clone(),
            active: true,
        });

        Ok(true)
    }

    /// Room の会話を一時停止する
    ///
    /// 実行中だった場合は true を返す。エージェントのステータスには触れない。
    pub async fn pause(&self, room_id: &RoomId) -> bool {
        let mut runs = self.runs.lock().await;
        let Some(run) = runs.get_mut(room_id) else {
            return false;
        };
        let was_running = run.stop();
        if was_running {
            tracing::info!("Room {}: simulation paused", room_id);
            self.deps.publisher.publish(RoomEvent::SimulationStateChanged {
                room_id: room_id.clone(),
                active: false,
            });
        }
        was_running
    }

    pub async fn is_active(&self, room_id: &RoomId) -> bool {
        let runs = self.runs.lock().await;
        runs.get(room_id).is_some_and(RoomRunState::is_running)
    }

    /// 実行中の Room ID 一覧
    pub async fn active_rooms(&self) -> Vec<RoomId> {
        let runs = self.runs.lock().await;
        runs.iter()
            .filter(|(_, run)| run.is_running())
            .map(|(room_id, _)| room_id.clone())
            .collect()
    }

    /// Room 削除時に実行状態ごと破棄する
    pub async fn discard(&self, room_id: &RoomId) {
        let mut runs = self.runs.lock().await;
        if let Some(mut run) = runs.remove(room_id)
            && run.stop()
        {
            tracing::info!("Room {}: simulation stopped (room deleted)", room_id);
        }
    }

    /// すべての Room を停止する（シャットダウン時）
    pub async fn pause_all(&self) -> usize {
        let mut runs = self.runs.lock().await;
        let stopped = runs
            .values_mut()
            .map(RoomRunState::stop)
            .filter(|was_running| *was_running)
            .count();
        if stopped > 0 {
            tracing::info!("Paused {} running simulation(s)", stopped);
        }
        stopped
    }
}

impl Drop for TurnScheduler {
    fn drop(&mut self) {
        for run in self.runs.get_mut().values_mut() {
            run.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use roundtable_shared::time::FixedClock;
    use tokio::sync::watch;

    use crate::{
        domain::{AgentStatus, AgentType, KeyValueStorage, NewRoom, StorageError},
        infrastructure::{
            event_publisher::BroadcastRoomEventPublisher, repository::InMemoryRoomRepository,
            storage::InMemoryStorage,
        },
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - start / pause の冪等性と、Room ごとのタスクが 1 つに保たれること
    // - 1 ターンの状態遷移（idle → thinking → speaking → idle）とメッセージ追加
    // - エージェント不足・Room 削除・発言中のエージェント削除での停止/中断
    //
    // 【どのように】
    // - `start_paused = true` で tokio の時計を止め、固定の遅延で時間を進める
    // ========================================

    const THINKING: Duration = Duration::from_millis(1000);
    const TYPING: Duration = Duration::from_millis(1500);
    const PAUSE: Duration = Duration::from_millis(1000);
    const INITIAL: Duration = Duration::from_millis(500);

    fn fixed_config() -> SchedulerConfig {
        SchedulerConfig {
            initial_delay: INITIAL,
            poll_interval: Duration::from_millis(200),
            thinking_delay: DelayRange::fixed(THINKING),
            pause_delay: DelayRange::fixed(PAUSE),
            min_typing_delay: TYPING,
        }
    }

    struct Fixture {
        repository: Arc<InMemoryRoomRepository>,
        publisher: Arc<BroadcastRoomEventPublisher>,
        scheduler: TurnScheduler,
    }

    /// 短いメッセージ（タイピング時間 = 下限）を返す生成器
    struct ShortMessageGenerator;

    impl MessageGenerator for ShortMessageGenerator {
        fn generate(
            &self,
            agent: &crate::domain::Agent,
            _room: &crate::domain::Room,
            counter: u64,
        ) -> String {
            format!("{} #{}", agent.name, counter)
        }
    }

    /// 開くまで set_item を待たせるストレージ
    struct GatedStorage {
        inner: InMemoryStorage,
        open: watch::Sender<bool>,
    }

    impl GatedStorage {
        fn new() -> Self {
            Self {
                inner: InMemoryStorage::new(),
                open: watch::Sender::new(true),
            }
        }

        fn set_open(&self, open: bool) {
            self.open.send_replace(open);
        }
    }

    #[async_trait]
    impl KeyValueStorage for GatedStorage {
        async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
            let mut open = self.open.subscribe();
            let _ = open.wait_for(|open| *open).await;
            self.inner.set_item(key, value).await
        }
    }

    fn create_fixture() -> Fixture {
        create_fixture_with_storage(Arc::new(InMemoryStorage::new()))
    }

    fn create_fixture_with_storage(storage: Arc<dyn KeyValueStorage>) -> Fixture {
        let repository = Arc::new(InMemoryRoomRepository::new(
            storage,
            Arc::new(FixedClock::new(1_700_000_000_000)),
        ));
        let publisher = Arc::new(BroadcastRoomEventPublisher::default());
        let scheduler = TurnScheduler::new(
            repository.clone(),
            publisher.clone(),
            Arc::new(ShortMessageGenerator),
            Arc::new(FixedClock::new(1_700_000_000_000)),
            fixed_config(),
            TypingSpeed::default(),
        );
        Fixture {
            repository,
            publisher,
            scheduler,
        }
    }

    async fn create_room_with(fixture: &Fixture, agent_types: &[AgentType]) -> RoomId {
        let room_id = fixture.repository.add_room(NewRoom::default()).await;
        for agent_type in agent_types {
            fixture
                .repository
                .add_agent(&room_id, *agent_type)
                .await
                .unwrap();
        }
        room_id
    }

    async fn advance(duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_with_single_agent_is_rejected() {
        // テスト項目: エージェントが 1 人の Room は開始できず、メッセージも生成されない
        // given (前提条件):
        let fixture = create_fixture();
        let room_id = create_room_with(&fixture, &[AgentType::Economist]).await;

        // when (操作):
        let result = fixture.scheduler.start(&room_id).await;
        advance(Duration::from_secs(10)).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(StartError::NotEnoughAgents {
                room_id: room_id.as_str().to_string(),
                count: 1,
            })
        );
        assert!(!fixture.scheduler.is_active(&room_id).await);
        let room = fixture.repository.get_room_by_id(&room_id).await.unwrap();
        assert!(room.conversation.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_missing_room_is_rejected() {
        // テスト項目: 存在しない Room の開始は RoomNotFound になる
        // given (前提条件):
        let fixture = create_fixture();
        let missing = RoomId::generate();

        // when (操作):
        let result = fixture.scheduler.start(&missing).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(StartError::RoomNotFound(missing.as_str().to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_start_leaves_no_run_state() {
        // テスト項目: 開始できなかった Room の実行状態は残らない
        // given (前提条件):
        let fixture = create_fixture();
        let single = create_room_with(&fixture, &[AgentType::Economist]).await;

        // when (操作):
        for _ in 0..100 {
            let result = fixture.scheduler.start(&RoomId::generate()).await;
            assert!(matches!(result, Err(StartError::RoomNotFound(_))));
        }
        let result = fixture.scheduler.start(&single).await;

        // then (期待する結果):
        assert!(matches!(result, Err(StartError::NotEnoughAgents { .. })));
        assert!(fixture.scheduler.runs.lock().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_is_active_does_not_wait_for_start_persistence() {
        // テスト項目: start が保存を待っている間も他の問い合わせはブロックされない
        // given (前提条件):
        let storage = Arc::new(GatedStorage::new());
        let fixture = create_fixture_with_storage(storage.clone());
        let room_id =
            create_room_with(&fixture, &[AgentType::Economist, AgentType::Trader]).await;
        let other = RoomId::generate();
        let scheduler = Arc::new(fixture.scheduler);
        storage.set_open(false);

        // when (操作):
        let starting = tokio::spawn({
            let scheduler = Arc::clone(&scheduler);
            let room_id = room_id.clone();
            async move { scheduler.start(&room_id).await }
        });
        advance(Duration::from_millis(1)).await;
        let during_start =
            tokio::time::timeout(Duration::from_millis(10), scheduler.is_active(&other)).await;
        storage.set_open(true);
        let started = starting.await.unwrap();

        // then (期待する結果):
        assert!(matches!(during_start, Ok(false)));
        assert_eq!(started, Ok(true));
        assert!(scheduler.is_active(&room_id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_full_turn_posts_one_message() {
        // テスト項目: 1 ターンでメッセージが 1 件追加され、発言者は idle に戻る
        // given (前提条件):
        let fixture = create_fixture();
        let room_id =
            create_room_with(&fixture, &[AgentType::Economist, AgentType::Trader]).await;

        // when (操作): 1 ターン分（初期遅延 + 思考 + タイピング）と少しだけ進める
        assert_eq!(fixture.scheduler.start(&room_id).await, Ok(true));
        advance(INITIAL + THINKING + TYPING + Duration::from_millis(100)).await;

        // then (期待する結果):
        let room = fixture.repository.get_room_by_id(&room_id).await.unwrap();
        assert_eq!(room.conversation.len(), 1);
        let message = &room.conversation[0];
        assert!(message.is_new);
        assert_eq!(&message.session_id, fixture.scheduler.session_id());
        assert!(message.content.ends_with("#0"));
        assert!(room.agents.iter().all(|agent| agent.status == AgentStatus::Idle));
        let speaker = room.find_agent(&message.agent_id).unwrap();
        assert!(speaker.last_active.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_at_most_one_agent_is_busy() {
        // テスト項目: どの時点でも thinking / speaking のエージェントは高々 1 人
        // given (前提条件):
        let fixture = create_fixture();
        let room_id = create_room_with(
            &fixture,
            &[AgentType::Economist, AgentType::Trader, AgentType::RiskManager],
        )
        .await;
        fixture.scheduler.start(&room_id).await.unwrap();

        // when (操作) / then (期待する結果):
        for _ in 0..100 {
            advance(Duration::from_millis(150)).await;
            let room = fixture.repository.get_room_by_id(&room_id).await.unwrap();
            let busy = room.agents.iter().filter(|a| a.status.is_busy()).count();
            assert!(busy <= 1, "{busy} agents busy");
        }
        let room = fixture.repository.get_room_by_id(&room_id).await.unwrap();
        assert!(room.conversation.len() >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent() {
        // テスト項目: 実行中に start を呼んでも 2 つ目のタスクは起動しない
        // given (前提条件):
        let fixture = create_fixture();
        let room_id =
            create_room_with(&fixture, &[AgentType::Economist, AgentType::Trader]).await;

        // when (操作):
        let first = fixture.scheduler.start(&room_id).await;
        let second = fixture.scheduler.start(&room_id).await;
        advance(INITIAL + THINKING + TYPING + Duration::from_millis(100)).await;

        // then (期待する結果): 2 タスクならメッセージが 2 件になる
        assert_eq!(first, Ok(true));
        assert_eq!(second, Ok(false));
        let room = fixture.repository.get_room_by_id(&room_id).await.unwrap();
        assert_eq!(room.conversation.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_then_start_resumes_without_duplicates() {
        // テスト項目: 思考中に pause → start しても、タスクは 1 つだけで会話が続く
        // given (前提条件):
        let fixture = create_fixture();
        let room_id =
            create_room_with(&fixture, &[AgentType::Economist, AgentType::Trader]).await;
        fixture.scheduler.start(&room_id).await.unwrap();
        advance(INITIAL + Duration::from_millis(100)).await;

        // when (操作):
        let paused = fixture.scheduler.pause(&room_id).await;
        let room_after_pause = fixture.repository.get_room_by_id(&room_id).await.unwrap();
        let restarted = fixture.scheduler.start(&room_id).await;
        advance(INITIAL + THINKING + TYPING + Duration::from_millis(100)).await;

        // then (期待する結果):
        assert!(paused);
        // pause はステータスを変更しない
        assert_eq!(
            room_after_pause
                .agents
                .iter()
                .filter(|a| a.status == AgentStatus::Thinking)
                .count(),
            1
        );
        assert_eq!(restarted, Ok(true));
        let room = fixture.repository.get_room_by_id(&room_id).await.unwrap();
        assert_eq!(room.conversation.len(), 1);
        assert!(room.agents.iter().all(|agent| agent.status == AgentStatus::Idle));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_when_not_running_returns_false() {
        // テスト項目: 実行していない Room の pause は false を返し、何も起きない
        // given (前提条件):
        let fixture = create_fixture();
        let room_id = create_room_with(&fixture, &[AgentType::Economist]).await;

        // when (操作):
        let paused = fixture.scheduler.pause(&room_id).await;

        // then (期待する結果):
        assert!(!paused);
    }

    #[tokio::test(start_paused = true)]
    async fn test_removing_thinking_agent_aborts_turn() {
        // テスト項目: 思考中のエージェントが削除されると、そのターンのメッセージは投稿されない
        // given (前提条件):
        let fixture = create_fixture();
        let room_id = create_room_with(
            &fixture,
            &[AgentType::Economist, AgentType::Trader, AgentType::RiskManager],
        )
        .await;
        fixture.scheduler.start(&room_id).await.unwrap();
        advance(INITIAL + Duration::from_millis(100)).await;
        let room = fixture.repository.get_room_by_id(&room_id).await.unwrap();
        let thinking = room.busy_agent().unwrap().id.clone();

        // when (操作):
        fixture
            .repository
            .remove_agent(&room_id, &thinking)
            .await
            .unwrap();
        advance(THINKING).await;

        // then (期待する結果):
        let room = fixture.repository.get_room_by_id(&room_id).await.unwrap();
        assert!(room.conversation.is_empty());
        assert!(fixture.scheduler.is_active(&room_id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_stops_when_agents_drop_below_two() {
        // テスト項目: 実行中にエージェントが 1 人になるとループが停止し、通知される
        // given (前提条件):
        let fixture = create_fixture();
        let room_id =
            create_room_with(&fixture, &[AgentType::Economist, AgentType::Trader]).await;
        let mut events = fixture.publisher.subscribe();
        fixture.scheduler.start(&room_id).await.unwrap();
        let room = fixture.repository.get_room_by_id(&room_id).await.unwrap();

        // when (操作): 最初の tick より前に 1 人削除する
        fixture
            .repository
            .remove_agent(&room_id, &room.agents[0].id)
            .await
            .unwrap();
        advance(INITIAL + Duration::from_millis(100)).await;

        // then (期待する結果):
        assert!(!fixture.scheduler.is_active(&room_id).await);
        let mut states = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let RoomEvent::SimulationStateChanged { active, .. } = event {
                states.push(active);
            }
        }
        assert_eq!(states, vec![true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deleted_room_deactivates_run() {
        // テスト項目: 実行中に Room が削除されるとループが終了する
        // given (前提条件):
        let fixture = create_fixture();
        let room_id =
            create_room_with(&fixture, &[AgentType::Economist, AgentType::Trader]).await;
        fixture.scheduler.start(&room_id).await.unwrap();

        // when (操作):
        fixture.repository.delete_room(&room_id).await;
        advance(INITIAL + THINKING + TYPING).await;

        // then (期待する結果):
        assert!(!fixture.scheduler.is_active(&room_id).await);
        assert!(fixture.repository.get_rooms().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_discard_and_pause_all() {
        // テスト項目: discard は対象 Room だけを止め、pause_all は残りすべてを止める
        // given (前提条件):
        let fixture = create_fixture();
        let first = create_room_with(&fixture, &[AgentType::Economist, AgentType::Trader]).await;
        let second = create_room_with(&fixture, &[AgentType::Economist, AgentType::Trader]).await;
        fixture.scheduler.start(&first).await.unwrap();
        fixture.scheduler.start(&second).await.unwrap();

        // when (操作):
        fixture.scheduler.discard(&first).await;
        let active_after_discard = fixture.scheduler.active_rooms().await;
        let stopped = fixture.scheduler.pause_all().await;

        // then (期待する結果):
        assert_eq!(active_after_discard, vec![second.clone()]);
        assert_eq!(stopped, 1);
        assert!(fixture.scheduler.active_rooms().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_counter_rotates_templates_across_restart() {
        // テスト項目: ターンカウンタは pause / start をまたいで引き継がれる
        // given (前提条件):
        let fixture = create_fixture();
        let room_id =
            create_room_with(&fixture, &[AgentType::Economist, AgentType::Trader]).await;
        fixture.scheduler.start(&room_id).await.unwrap();
        advance(INITIAL + THINKING + TYPING + Duration::from_millis(100)).await;

        // when (操作):
        fixture.scheduler.pause(&room_id).await;
        fixture.scheduler.start(&room_id).await.unwrap();
        advance(INITIAL + THINKING + TYPING + Duration::from_millis(100)).await;

        // then (期待する結果):
        let room = fixture.repository.get_room_by_id(&room_id).await.unwrap();
        assert_eq!(room.conversation.len(), 2);
        assert!(room.conversation[0].content.ends_with("#0"));
        assert!(room.conversation[1].content.ends_with("#1"));
    }

    #[tokio::test]
    async fn test_typing_speed_can_be_changed() {
        // テスト項目: タイピング速度の変更が読み出しに反映される
        // given (前提条件):
        let fixture = create_fixture();

        // when (操作):
        fixture
            .scheduler
            .set_typing_speed(TypingSpeed::new(120).unwrap());

        // then (期待する結果):
        assert_eq!(fixture.scheduler.typing_speed().chars_per_second(), 120);
    }
}
