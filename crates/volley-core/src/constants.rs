//! Simulation constants and tuning parameters.

/// Maximum seconds a single `step` may advance (large frame-time spikes
/// from a paused caller are clamped instead of teleporting the battle).
pub const MAX_STEP_SECS: f64 = 0.1;

// --- Spatial grid ---

/// Side length of one spatial-grid cell.
pub const GRID_CELL_SIZE: f64 = 25.0;

// --- Formations & movement ---

/// Default distance between adjacent formation slots.
pub const UNIT_SPACING: f64 = 12.0;

/// Turn rate multiplier while moving (radians per second per dt unit).
pub const TURN_SPEED_MULT: f64 = 6.0;

/// Slower turn rate used when rotating to face a combat target.
pub const COMBAT_TURN_SPEED: f64 = 3.0;

/// Distance from a MOVE destination at which a unit starts slowing down.
pub const SLOWDOWN_DISTANCE: f64 = 20.0;

/// Floor on movement speed so heavily modified units still crawl.
pub const MIN_SPEED: f64 = 2.0;

/// Arrival radius: within this distance of a slot the unit snaps in.
pub const ARRIVE_RADIUS: f64 = 3.0;

/// Distance from an assigned slot at which facing starts blending from the
/// travel bearing toward the commanded formation facing.
pub const FORMATION_ROTATION_DISTANCE: f64 = 50.0;

/// Floor on the alignment factor so misaligned units creep instead of stall.
pub const ALIGNMENT_FLOOR: f64 = 0.3;

// --- Separation ---

/// Pairwise push strength between overlapping neighbors.
pub const SEPARATION_FORCE: f64 = 10.0;

/// Combined hitbox widths are divided by this to get the minimum gap.
pub const MIN_SEPARATION_DIVISOR: f64 = 1.5;

/// Push multiplier applied when shoving against a unit standing in formation.
pub const FORMED_SEPARATION_WEIGHT: f64 = 2.0;

// --- Commands ---

/// Drags shorter than this are treated as clicks for selection.
pub const CLICK_THRESHOLD: f64 = 5.0;

/// Drags shorter than this issue attack/translate orders instead of a
/// full formation move.
pub const FORMATION_DRAG_THRESHOLD: f64 = 20.0;

/// Radius for same-type proximity selection.
pub const NEARBY_SELECT_RADIUS: f64 = 150.0;

// --- Combat ---

/// Distance within which any unit fights hand-to-hand.
pub const MELEE_RANGE: f64 = 40.0;

/// Seconds between melee blows (before fatigue scaling).
pub const MELEE_COOLDOWN: f64 = 1.0;

/// Cavalry close to this distance instead of firing.
pub const CAVALRY_ENGAGE_RANGE: f64 = 5.0;

/// Other kinds engage at this fraction of their listed range.
pub const ENGAGE_RANGE_RATIO: f64 = 0.8;

/// Maximum facing error (radians) permitted for a ranged shot.
pub const RANGED_FACING_TOLERANCE: f64 = 0.5;

/// Uniform jitter added to reload time on each shot (seconds).
pub const RELOAD_JITTER_SECS: f64 = 0.5;

/// Seconds the hit-flash fact stays set after taking damage.
pub const HIT_FLASH_SECS: f64 = 0.2;

/// Fraction of applied damage also subtracted from morale.
pub const MORALE_DAMAGE_RATIO: f64 = 0.8;

/// Shot spread distance at zero accuracy.
pub const MAX_SPREAD_DISTANCE: f64 = 50.0;

// --- Projectiles ---

pub const BULLET_SPEED: f64 = 400.0;
pub const CANNONBALL_SPEED: f64 = 180.0;

/// Launch-angle spread in radians (uniform, centered).
pub const BULLET_ANGLE_SPREAD: f64 = 0.2;
pub const CANNONBALL_ANGLE_SPREAD: f64 = 0.1;

/// Radius of a cannonball's terminal burst.
pub const BLAST_RADIUS: f64 = 40.0;

/// Fraction of the payload dealt to each unit caught in a burst.
pub const BLAST_DAMAGE_RATIO: f64 = 0.8;

// --- Morale & routing ---

/// Radius within which a rout frightens same-side allies.
pub const CASCADE_RADIUS: f64 = 100.0;

/// Morale lost by each ally caught in a cascade.
pub const CASCADE_MORALE_LOSS: f64 = 15.0;

/// Recursion bound on cascade propagation.
pub const CASCADE_MAX_DEPTH: u32 = 3;

/// Routing units move at this multiple of their listed speed.
pub const ROUTING_SPEED_MULT: f64 = 1.2;

/// Per-tick random wobble (radians, centered) applied to a router's facing.
pub const ROUTING_WOBBLE: f64 = 0.2;

/// A router this far outside the field is permanently removed.
pub const ROUTING_OFFSCREEN_MARGIN: f64 = 50.0;

/// Units clamp to the field inset by this margin.
pub const FIELD_MARGIN: f64 = 20.0;

/// No morale recovery while an enemy is within this distance.
pub const COMBAT_PROXIMITY: f64 = 150.0;

/// Allies within this radius count toward morale recovery.
pub const RALLY_RADIUS: f64 = 80.0;

/// Minimum nearby allies for morale recovery to begin.
pub const RALLY_MIN_ALLIES: u32 = 2;

/// Base morale recovery rate (per second); each ally adds 1, capped at +5.
pub const RALLY_BASE_RATE: f64 = 3.0;
pub const RALLY_MAX_BONUS: f64 = 5.0;

// --- Fatigue (rates per second) ---

pub const FATIGUE_IDLE_RATE: f64 = -2.0;
pub const FATIGUE_MARCH_RATE: f64 = 1.0;
pub const FATIGUE_CHARGE_RATE: f64 = 4.0;
pub const FATIGUE_FIGHT_RATE: f64 = 6.0;

/// Enemies within melee range plus this slack count as "fighting".
pub const FIGHTING_PROXIMITY_SLACK: f64 = 20.0;

// --- AI ---

/// Seconds between AI decision passes.
pub const AI_THINK_INTERVAL: f64 = 0.5;

/// Seconds spent in the DEPLOY phase before advancing.
pub const AI_DEPLOY_TIME: f64 = 2.0;

/// Infantry-line-to-enemy-centroid distance that ends the advance.
pub const AI_ENGAGE_RANGE: f64 = 220.0;

/// Distance the infantry line steps forward per advance order.
pub const AI_ADVANCE_STEP: f64 = 40.0;

/// Artillery falls back when an enemy closes within this radius.
pub const AI_ARTILLERY_DANGER_RADIUS: f64 = 120.0;

/// Neighborhood radius used for enemy cluster density scoring.
pub const AI_CLUSTER_RADIUS: f64 = 60.0;

/// Minimum cluster size worth a cannonball during the advance.
pub const AI_MIN_CLUSTER_SIZE: u32 = 2;

/// Priority-target reach multipliers (see targeting rules).
pub const AI_ARTILLERY_HUNT_RANGE_MULT: f64 = 1.5;
pub const AI_WOUNDED_HP_FRACTION: f64 = 0.5;

// --- Terrain ---

/// Side length of one terrain cell.
pub const TERRAIN_CELL_SIZE: f64 = 50.0;

/// Damage bonus per level of elevation advantage.
pub const ELEVATION_DAMAGE_STEP: f64 = 0.1;
