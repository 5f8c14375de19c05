//! Simulation engine: the fixed-step core of the intercept sandbox.
//!
//! `SimulationEngine` owns the hecs ECS world, the spatial grid and the
//! environment, processes control commands, runs every system in order and
//! produces `SimSnapshot`s. Completely headless, enabling deterministic
//! testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use pronav_core::commands::PlayerCommand;
use pronav_core::components::{Platform, RigidBody, Target};
use pronav_core::constants::*;
use pronav_core::enums::{GuidanceKind, MissileKind, TargetProfile};
use pronav_core::events::SimEvent;
use pronav_core::state::SimSnapshot;
use pronav_core::types::{SimTime, Vec2, WorldSize};

use crate::environment::Environment;
use crate::grid::SpatialGrid;
use crate::missile::FlightContext;
use crate::systems;
use crate::systems::snapshot::SnapshotContext;
use crate::world_setup::{self, LaunchSpec};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Outer frame length in seconds.
    pub dt: f64,
    /// Physics substeps per frame.
    pub physics_steps: u32,
    pub world_size: WorldSize,
    pub grid_cell_side: f64,
    /// Guidance law for newly fired missiles.
    pub guidance: GuidanceKind,
    pub missile_kind: MissileKind,
    pub target_profile: TargetProfile,
    pub use_control_surfaces: bool,
    pub use_thrust_vectoring: bool,
    pub enable_wind: bool,
    pub enable_turbulence: bool,
    pub expire_missiles_on_miss: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            dt: DEFAULT_DT,
            physics_steps: DEFAULT_PHYSICS_STEPS,
            world_size: WorldSize::default(),
            grid_cell_side: DEFAULT_GRID_CELL_SIDE,
            guidance: GuidanceKind::default(),
            missile_kind: MissileKind::default(),
            target_profile: TargetProfile::default(),
            use_control_surfaces: false,
            use_thrust_vectoring: false,
            enable_wind: false,
            enable_turbulence: false,
            expire_missiles_on_miss: false,
        }
    }
}

impl SimConfig {
    /// Clamp the timing and grid parameters into their supported ranges.
    pub fn sanitized(mut self) -> Self {
        self.dt = if self.dt.is_finite() {
            self.dt.clamp(MIN_DT, MAX_DT)
        } else {
            DEFAULT_DT
        };
        self.physics_steps = self.physics_steps.max(1);
        self.grid_cell_side = if self.grid_cell_side.is_finite() && self.grid_cell_side > 0.0 {
            self.grid_cell_side.max(MIN_GRID_CELL_SIDE)
        } else {
            DEFAULT_GRID_CELL_SIDE
        };
        self
    }

    /// Length of one physics substep.
    pub fn substep_dt(&self) -> f64 {
        self.dt / self.physics_steps.max(1) as f64
    }

    fn launch_spec(&self, guidance: Option<GuidanceKind>, kind: Option<MissileKind>) -> LaunchSpec {
        LaunchSpec {
            kind: kind.unwrap_or(self.missile_kind),
            guidance: guidance.unwrap_or(self.guidance),
            control_surfaces: self.use_control_surfaces,
            thrust_vectoring: self.use_thrust_vectoring,
        }
    }
}

/// Cannon burst in progress: volleys left and frames until the next one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BurstSchedule {
    volleys_left: u32,
    countdown: u32,
}

impl BurstSchedule {
    fn start(&mut self) {
        self.volleys_left = BURST_VOLLEYS;
        self.countdown = 0;
    }

    /// Advance one frame. Returns true when a volley should fire.
    fn due(&mut self) -> bool {
        if self.volleys_left == 0 {
            return false;
        }
        if self.countdown > 0 {
            self.countdown -= 1;
            return false;
        }
        self.volleys_left -= 1;
        self.countdown = BURST_FRAMES.saturating_sub(1);
        true
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,

    settings: SimConfig,
    grid: SpatialGrid,
    environment: Environment,
    platform: Entity,
    burst: BurstSchedule,
    paused: bool,
    step_requested: bool,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let settings = config.sanitized();
        let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
        let environment =
            Environment::new(&mut rng, settings.enable_wind, settings.enable_turbulence);
        let mut world = World::new();
        let platform = world_setup::spawn_platform(&mut world, settings.world_size.center());
        let grid = SpatialGrid::new(settings.world_size.as_vec(), settings.grid_cell_side);

        Self {
            world,
            time: SimTime::default(),
            rng,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            settings,
            grid,
            environment,
            platform,
            burst: BurstSchedule::default(),
            paused: false,
            step_requested: false,
        }
    }

    /// Queue a command for processing at the next frame boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one frame and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        self.process_commands();

        let step = std::mem::take(&mut self.step_requested);
        if !self.paused || step {
            self.run_frame();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            SnapshotContext {
                time: self.time,
                paused: self.paused,
                settings: &self.settings,
                environment: self.environment.view(),
                grid: self.grid.view(),
            },
            events,
        )
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// The active settings, including every toggle changed by commands.
    pub fn settings(&self) -> &SimConfig {
        &self.settings
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn platform(&self) -> Entity {
        self.platform
    }

    /// Mutable world access for tests that need to stage exact situations.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single command.
    fn handle_command(&mut self, command: PlayerCommand) {
        log::debug!("command: {command:?}");
        match command {
            PlayerCommand::SpawnTarget { position, profile } => {
                let position = position.unwrap_or_else(|| {
                    world_setup::random_target_position(&mut self.rng, self.settings.world_size)
                });
                self.spawn_target(position, profile.unwrap_or(self.settings.target_profile));
            }
            PlayerCommand::SpawnTargets { count } => {
                for _ in 0..count {
                    let position =
                        world_setup::random_target_position(&mut self.rng, self.settings.world_size);
                    self.spawn_target(position, self.settings.target_profile);
                }
            }
            PlayerCommand::FireMissile {
                target_id,
                guidance,
                kind,
            } => {
                let targets = match target_id {
                    Some(id) => match self.resolve_target(id) {
                        Some(target) => vec![target],
                        None => {
                            log::warn!("fire missile: no live target with id {id}");
                            Vec::new()
                        }
                    },
                    None => self.live_targets().into_iter().map(|(e, _)| e).collect(),
                };
                let spec = self.settings.launch_spec(guidance, kind);
                for target in targets {
                    self.launch_missile(target, spec);
                }
            }
            PlayerCommand::FireBurst => {
                self.burst.start();
            }
            PlayerCommand::Clear => self.clear(),
            PlayerCommand::MovePlatform { position } => {
                if let Ok(mut body) = self.world.get::<&mut RigidBody>(self.platform) {
                    body.position = position;
                    body.velocity = Vec2::ZERO;
                }
            }
            PlayerCommand::RotatePlatform { delta } => {
                if let Ok(mut body) = self.world.get::<&mut RigidBody>(self.platform) {
                    let rotation = body.rotation + delta;
                    body.set_rotation(rotation);
                }
            }
            PlayerCommand::SetPlatformThrust { on } => {
                if let Ok(mut platform) = self.world.get::<&mut Platform>(self.platform) {
                    platform.thrust_on = on;
                }
            }
            PlayerCommand::SetGuidance { guidance } => {
                self.settings.guidance = guidance;
            }
            PlayerCommand::CycleGuidance => {
                self.settings.guidance = self.settings.guidance.next();
                log::info!("guidance: {:?}", self.settings.guidance);
            }
            PlayerCommand::SetMissileKind { kind } => {
                self.settings.missile_kind = kind;
            }
            PlayerCommand::SetTargetProfile { profile } => {
                self.settings.target_profile = profile;
            }
            PlayerCommand::SetWind { enabled } => {
                self.settings.enable_wind = enabled;
                self.environment.wind_enabled = enabled;
            }
            PlayerCommand::SetTurbulence { enabled } => {
                self.settings.enable_turbulence = enabled;
                self.environment.turbulence_enabled = enabled;
            }
            PlayerCommand::SetControlSurfaces { enabled } => {
                self.settings.use_control_surfaces = enabled;
            }
            PlayerCommand::SetThrustVectoring { enabled } => {
                self.settings.use_thrust_vectoring = enabled;
            }
            PlayerCommand::SetExpireOnMiss { enabled } => {
                self.settings.expire_missiles_on_miss = enabled;
            }
            PlayerCommand::Pause => {
                self.paused = true;
            }
            PlayerCommand::Resume => {
                self.paused = false;
            }
            PlayerCommand::Step => {
                if self.paused {
                    self.step_requested = true;
                }
            }
        }
    }

    /// One outer frame: the physics substeps, then per-frame updates.
    fn run_frame(&mut self) {
        let dt = self.settings.substep_dt();
        for _ in 0..self.settings.physics_steps {
            self.run_substep(dt);
        }

        // Platform and cannon run at frame rate.
        systems::movement::run_platform(
            &mut self.world,
            self.settings.world_size,
            self.settings.dt,
        );
        if self.burst.due() {
            self.fire_volley();
        }

        self.time.advance(self.settings.dt);
    }

    /// Run all systems in order.
    fn run_substep(&mut self, dt: f64) {
        // 1. Environment sample
        let air = self.environment.update(dt, &mut self.rng);
        // 2. Missile guidance and flight dynamics
        let flight = FlightContext {
            world: self.settings.world_size,
            expire_on_miss: self.settings.expire_missiles_on_miss,
        };
        systems::missiles::run(&mut self.world, &air, &flight, dt, &mut self.events);
        // 3. Target kinematics
        systems::movement::run_targets(
            &mut self.world,
            &mut self.rng,
            self.settings.world_size,
            dt,
        );
        // 4. Bullets
        systems::movement::run_bullets(&mut self.world, self.settings.world_size, dt);
        // 5. Explosion growth
        systems::movement::run_explosions(&mut self.world, dt);
        // 6. Grid rebuild + collision resolution
        systems::collision::run(&mut self.world, &mut self.grid, dt, &mut self.events);
        // 7. Cleanup (everything flagged expired)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    fn spawn_target(&mut self, position: Vec2, profile: TargetProfile) {
        let entity = world_setup::spawn_target(&mut self.world, &mut self.rng, position, profile);
        self.grid.insert(entity, position);
        self.events.push(SimEvent::TargetSpawned {
            id: entity.to_bits().get(),
        });
    }

    fn launch_missile(&mut self, target: Entity, spec: LaunchSpec) {
        let launcher = self.platform_body();
        let entity = world_setup::spawn_missile(&mut self.world, target, &launcher, spec);
        self.grid.insert(entity, launcher.position);
        self.events.push(SimEvent::MissileLaunched {
            id: entity.to_bits().get(),
            target_id: target.to_bits().get(),
        });
    }

    /// One bullet at every live target.
    fn fire_volley(&mut self) {
        let origin = self.platform_body().position;
        for (target, body) in self.live_targets() {
            let bullet = world_setup::spawn_bullet(&mut self.world, target, &body, origin);
            self.grid.insert(bullet, origin);
        }
    }

    /// Remove every body except the platform.
    fn clear(&mut self) {
        let platform = self.platform;
        self.despawn_buffer.clear();
        self.despawn_buffer.extend(
            self.world
                .iter()
                .map(|entity_ref| entity_ref.entity())
                .filter(|&entity| entity != platform),
        );
        log::info!("clearing {} bodies", self.despawn_buffer.len());
        for entity in self.despawn_buffer.drain(..) {
            let _ = self.world.despawn(entity);
        }
        self.grid.clear();
        self.burst = BurstSchedule::default();
    }

    /// Look up a live target by its snapshot id.
    fn resolve_target(&self, id: u64) -> Option<Entity> {
        let entity = Entity::from_bits(id)?;
        let body = self.world.get::<&RigidBody>(entity).ok()?;
        let is_target = self.world.get::<&Target>(entity).is_ok();
        (is_target && !body.expired).then_some(entity)
    }

    fn live_targets(&self) -> Vec<(Entity, RigidBody)> {
        self.world
            .query::<(&Target, &RigidBody)>()
            .iter()
            .filter(|(_, (_, body))| !body.expired)
            .map(|(entity, (_, body))| (entity, body.clone()))
            .collect()
    }

    fn platform_body(&self) -> RigidBody {
        match self.world.get::<&RigidBody>(self.platform) {
            Ok(body) => (*body).clone(),
            Err(_) => RigidBody::new(self.settings.world_size.center(), Vec2::ZERO, 0.0),
        }
    }
}
