//! The battle engine: owns the ECS world and all simulation state.
//!
//! One `step(dt)` call advances the world by one tick in a fixed phase
//! order: queued commands, spatial grid rebuild, AI, unit updates,
//! projectiles, effect aging, win condition. Single-threaded by design;
//! callers funnel all command submission through this one writer.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use volley_ai::AiState;
use volley_core::commands::PlayerCommand;
use volley_core::components::{Position, Vitals};
use volley_core::constants::{MAX_STEP_SECS, NEARBY_SELECT_RADIUS};
use volley_core::enums::{AiPhase, BattleOutcome, FormationType, Side, UnitKind};
use volley_core::events::{AudioEvent, EffectFact};
use volley_core::state::{SideCounts, WorldSnapshot};
use volley_core::types::{SimTime, Vec2};
use volley_terrain::TerrainMap;

use crate::spatial::SpatialGrid;
use crate::systems;
use crate::systems::unit_update::UpdateCtx;
use crate::world_setup;

/// Shape of one side's army. Both sides field the same composition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArmyComposition {
    pub line_ranks: usize,
    pub line_rank_width: usize,
    pub reserve_ranks: usize,
    pub reserve_rank_width: usize,
    pub artillery: usize,
    pub cavalry_per_wing: usize,
}

impl Default for ArmyComposition {
    fn default() -> Self {
        Self {
            line_ranks: 4,
            line_rank_width: 40,
            reserve_ranks: 3,
            reserve_rank_width: 30,
            artillery: 8,
            cavalry_per_wing: 20,
        }
    }
}

impl ArmyComposition {
    pub fn total(&self) -> usize {
        self.line_ranks * self.line_rank_width
            + self.reserve_ranks * self.reserve_rank_width
            + self.artillery
            + 2 * self.cavalry_per_wing
    }
}

/// Configuration for starting a new battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleConfig {
    /// RNG seed. Same seed + same command stream = same battle.
    pub seed: u64,
    pub width: f64,
    pub height: f64,
    /// Both sides externally controlled; disables the AI controller.
    pub multiplayer: bool,
    pub local_side: Side,
    pub army: ArmyComposition,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            width: 1600.0,
            height: 1000.0,
            multiplayer: false,
            local_side: Side::Player,
            army: ArmyComposition::default(),
        }
    }
}

/// Smallest battlefield the deployment layout fits on.
const MIN_FIELD_EXTENT: f64 = 400.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("battlefield too small: {width}x{height} (minimum 400 per axis)")]
    FieldTooSmall { width: f64, height: f64 },
    #[error("army composition places no units")]
    EmptyArmy,
}

/// The battle engine. Owns the ECS world and all sim state.
pub struct BattleEngine {
    world: World,
    time: SimTime,
    config: BattleConfig,
    rng: ChaCha8Rng,
    terrain: TerrainMap,
    grid: SpatialGrid,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    audio_events: Vec<AudioEvent>,
    effects: Vec<EffectFact>,
    selected: Vec<Entity>,
    ai: AiState,
    outcome: BattleOutcome,
}

impl BattleEngine {
    /// Validate the config, generate terrain, and deploy both armies.
    pub fn new(config: BattleConfig) -> Result<Self, ConfigError> {
        if config.width < MIN_FIELD_EXTENT || config.height < MIN_FIELD_EXTENT {
            return Err(ConfigError::FieldTooSmall {
                width: config.width,
                height: config.height,
            });
        }
        if config.army.total() == 0 {
            return Err(ConfigError::EmptyArmy);
        }

        let mut engine = Self::bare(config);
        world_setup::deploy_armies(
            &mut engine.world,
            engine.config.width,
            engine.config.height,
            &engine.config.army,
        );
        Ok(engine)
    }

    fn bare(config: BattleConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let terrain = volley_terrain::generate(config.width, config.height, &mut rng);

        let ai_side = config.local_side.opponent();
        let ai_base_y = match ai_side {
            Side::Enemy => 150.0,
            Side::Player => config.height - 150.0,
        };
        let ai = AiState::new(ai_base_y + ai_side.advance_sign() * 100.0);

        Self {
            world: World::new(),
            time: SimTime::default(),
            rng,
            terrain,
            grid: SpatialGrid::new(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            audio_events: Vec::new(),
            effects: Vec::new(),
            selected: Vec::new(),
            ai,
            outcome: BattleOutcome::Ongoing,
            config,
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting
    /// snapshot. `dt` is clamped so pauses cannot teleport the battle.
    pub fn step(&mut self, dt: f64) -> WorldSnapshot {
        let dt = dt.clamp(0.0, MAX_STEP_SECS);

        self.process_commands();
        self.rebuild_grid();

        if !self.config.multiplayer {
            systems::ai_control::run(
                &mut self.world,
                &mut self.ai,
                self.config.local_side.opponent(),
                self.config.width,
                self.config.height,
                dt,
            );
        }

        systems::unit_update::run(
            &mut self.world,
            &mut UpdateCtx {
                dt,
                width: self.config.width,
                height: self.config.height,
                terrain: &self.terrain,
                grid: &self.grid,
                rng: &mut self.rng,
                effects: &mut self.effects,
                audio: &mut self.audio_events,
            },
        );

        systems::projectiles::run(
            &mut self.world,
            &self.terrain,
            &self.grid,
            self.config.width,
            self.config.height,
            dt,
            &mut self.despawn_buffer,
            &mut self.effects,
            &mut self.audio_events,
        );

        // Age and drop expired visual-effect facts.
        for effect in &mut self.effects {
            effect.remaining_secs -= dt;
        }
        self.effects.retain(|e| e.remaining_secs > 0.0);

        let counts = systems::victory::count_sides(&self.world);
        let outcome = systems::victory::evaluate(&counts, self.outcome);
        if outcome != self.outcome {
            info!(?outcome, tick = self.time.tick, "battle resolved");
            self.outcome = outcome;
        }

        self.time.advance(dt);

        let audio_events = std::mem::take(&mut self.audio_events);
        systems::snapshot::build_snapshot(
            &self.world,
            self.time,
            self.outcome,
            self.ai.phase,
            &self.selected,
            &self.effects,
            audio_events,
            self.config.width,
            self.config.height,
        )
    }

    // --- Direct command API (same semantics as the queued commands) ---

    pub fn select_units_in_rect(&mut self, side: Side, a: Vec2, b: Vec2) {
        self.selected = systems::command::select_rect(&self.world, side, a, b);
    }

    pub fn select_units_by_type(&mut self, side: Side, kind: UnitKind) {
        self.selected = systems::command::select_kind(&self.world, side, kind);
    }

    pub fn select_all_units(&mut self, side: Side) {
        self.selected = systems::command::select_all(&self.world, side);
    }

    pub fn select_nearby_units_of_same_type(&mut self, side: Side, at: Vec2, radius: f64) {
        self.selected = systems::command::select_nearby(&self.world, side, at, radius);
    }

    /// Interpret a pointer drag as an order for the current selection
    /// (see `PlayerCommand::Order` for the drag semantics).
    pub fn issue_command(
        &mut self,
        side: Side,
        drag_start: Vec2,
        drag_end: Vec2,
        formation: FormationType,
    ) {
        systems::command::issue_order(
            &mut self.world,
            &mut self.rng,
            &self.selected,
            side,
            drag_start,
            drag_end,
            formation,
        );
    }

    // --- Read-only accessors ---

    pub fn terrain(&self) -> &TerrainMap {
        &self.terrain
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn outcome(&self) -> BattleOutcome {
        self.outcome
    }

    pub fn ai_phase(&self) -> AiPhase {
        self.ai.phase
    }

    pub fn side_counts(&self) -> SideCounts {
        systems::victory::count_sides(&self.world)
    }

    pub fn selected(&self) -> &[Entity] {
        &self.selected
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::SelectRect {
                side,
                x1,
                y1,
                x2,
                y2,
            } => self.select_units_in_rect(side, Vec2::new(x1, y1), Vec2::new(x2, y2)),
            PlayerCommand::SelectKind { side, kind } => self.select_units_by_type(side, kind),
            PlayerCommand::SelectAll { side } => self.select_all_units(side),
            PlayerCommand::SelectNearby { side, x, y, radius } => {
                let radius = if radius > 0.0 {
                    radius
                } else {
                    NEARBY_SELECT_RADIUS
                };
                self.select_nearby_units_of_same_type(side, Vec2::new(x, y), radius);
            }
            PlayerCommand::ClearSelection => self.selected.clear(),
            PlayerCommand::Order {
                side,
                start_x,
                start_y,
                end_x,
                end_y,
                formation,
            } => self.issue_command(
                side,
                Vec2::new(start_x, start_y),
                Vec2::new(end_x, end_y),
                formation,
            ),
        }
    }

    /// Rebuild the spatial index from live units' current positions.
    fn rebuild_grid(&mut self) {
        self.grid.clear();
        for (entity, (pos, vitals)) in self.world.query::<(&Position, &Vitals)>().iter() {
            if vitals.hp > 0.0 {
                self.grid.insert(pos.0, entity);
            }
        }
    }

    // --- Test support ---

    /// Engine with terrain but no armies; tests place units by hand.
    #[cfg(test)]
    pub(crate) fn new_empty(config: BattleConfig) -> Self {
        Self::bare(config)
    }

    #[cfg(test)]
    pub(crate) fn spawn_test_unit(&mut self, side: Side, kind: UnitKind, at: Vec2) -> Entity {
        world_setup::spawn_unit(&mut self.world, side, kind, at)
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub(crate) fn set_terrain(&mut self, terrain: TerrainMap) {
        self.terrain = terrain;
    }

    #[cfg(test)]
    pub(crate) fn select_entities(&mut self, entities: Vec<Entity>) {
        self.selected = entities;
    }
}
