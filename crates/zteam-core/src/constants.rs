//! Simulation constants and tuning parameters.

/// Default simulation tick rate (Hz).
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Height of the ground plane that robots walk on and drops land on.
pub const GROUND_Y: f32 = -0.92;

// --- Robots (attackers) ---

/// Health a robot spawns with.
pub const ROBOT_MAX_HEALTH: u16 = 3;

/// Seconds between periodic searches for a nearby tower.
pub const ROBOT_SEARCH_INTERVAL_SECS: f32 = 0.5;

/// Radius of the tower search sphere.
pub const ROBOT_SEARCH_RADIUS: f32 = 20.0;

/// Broad-phase capacity for a robot's tower search.
pub const ROBOT_SEARCH_CAPACITY: usize = 20;

/// Time that must pass in `Moving` before another attack can start.
pub const ROBOT_ATTACK_COOLDOWN_SECS: f32 = 2.0;

/// Squared distance to the target at which an attack can start (10 units).
pub const ROBOT_ATTACK_RANGE_SQ: f32 = 100.0;

/// Wind-up before the lunge.
pub const ROBOT_CHARGE_SECS: f32 = 0.5;

/// Lunge duration; the hit volume is live for this long.
pub const ROBOT_PERFORM_SECS: f32 = 0.5;

/// Cool-down after the lunge before moving again.
pub const ROBOT_RECOVERY_SECS: f32 = 0.5;

/// Slerp factor per second while turning toward the target during a charge.
pub const ROBOT_CHARGE_ROTATION_SPEED: f32 = 100.0;

/// Forward speed of the lunge (units/s).
pub const ROBOT_LUNGE_SPEED: f32 = 10.0;

/// Walking speed of the navigation agent (units/s).
pub const ROBOT_MOVE_SPEED: f32 = 3.5;

/// Navigation agents stop this far short of their destination.
pub const ROBOT_STOPPING_DISTANCE: f32 = 1.0;

/// Damage a robot's hit volume applies on contact.
pub const ROBOT_ATTACK_DAMAGE: u16 = 1;

/// Radius of the robot's hit volume.
pub const HITBOX_RADIUS: f32 = 1.5;

/// Distance of the hit volume's centre in front of the robot.
pub const HITBOX_OFFSET: f32 = 1.0;

/// Currency drops spawned when a robot dies.
pub const ROBOT_DROP_COUNT: u16 = 2;

/// Value of each drop spawned on a robot kill.
pub const ROBOT_DROP_VALUE: u32 = 1;

// --- Towers (defenders) ---

/// Health a tower is built with.
pub const TOWER_MAX_HEALTH: i32 = 5;

/// Radius of the robot search sphere and the engagement range.
pub const TOWER_SEARCH_RADIUS: f32 = 25.0;

/// Squared engagement range; targets beyond this are dropped.
pub const TOWER_SEARCH_RADIUS_SQ: f32 = TOWER_SEARCH_RADIUS * TOWER_SEARCH_RADIUS;

/// Seconds between opportunistic retarget searches.
pub const TOWER_RETARGET_INTERVAL_SECS: f32 = 10.0;

/// Minimum time between shots.
pub const TOWER_SHOOT_COOLDOWN_SECS: f32 = 1.5;

/// How long the muzzle flash stays visible after a shot.
pub const TOWER_MUZZLE_FLASH_SECS: f32 = 0.25;

/// Damage of a single tower shot.
pub const TOWER_SHOT_DAMAGE: u16 = 1;

/// Scale of the build-mode radius display.
pub const TOWER_RADIUS_DISPLAY_SCALE: f32 = 5.0;

// --- Spawning ---

/// Default population cap for live robots.
pub const DEFAULT_MAX_ROBOTS: usize = 50;

/// Default seconds between timed robot spawns.
pub const DEFAULT_SPAWN_INTERVAL_SECS: f32 = 2.0;

// --- Player ---

/// Health the player starts each session with.
pub const PLAYER_MAX_HEALTH: u16 = 10;

// --- Currency drops (ZBucks) ---

/// Horizontal distance from the kill position to a drop's landing point.
pub const ZBUCK_SCATTER_DISTANCE: f32 = 1.36;

/// Horizontal launch speed of a drop (units/s).
pub const ZBUCK_LAUNCH_SPEED: f32 = 3.0;

/// Initial upward speed of a drop (units/s).
pub const ZBUCK_POP_SPEED: f32 = 2.0;

/// Downward acceleration applied to drops in flight.
pub const ZBUCK_GRAVITY: f32 = 9.81;

/// Distance at which the player collects a drop.
pub const ZBUCK_PICKUP_RADIUS: f32 = 1.5;

/// Broad-phase capacity for one pickup query.
pub const ZBUCK_PICKUP_CAPACITY: usize = 32;

// --- World ---

/// Default half-width of the playable area along x.
pub const DEFAULT_BOUNDS_X: f32 = 40.0;

/// Default half-depth of the playable area along z.
pub const DEFAULT_BOUNDS_Z: f32 = 40.0;

/// Broad-phase capacity for one hit-volume query.
pub const HITBOX_CONTACT_CAPACITY: usize = 16;

/// Cell size of the broad-phase spatial hash.
pub const SPATIAL_CELL_SIZE: f32 = 8.0;
