// --- Game Constants ---
pub const SHIP_ROTATION_SPEED: f64 = 5.0; // Radians per second while steering
pub const SHIP_THRUST_POWER: f64 = 20.0; // Units per second squared
pub const BULLET_SPEED: f64 = 50.0;

pub const ASTEROID_SPIN: f64 = 0.5; // Radians per second
pub const ASTEROID_SPEED: f64 = 10.0;
pub const ASTEROID_INITIAL_SIZE: i32 = 16;
pub const ASTEROID_MIN_SPLIT_SIZE: i32 = 4; // Asteroids at or below this size don't split
pub const ASTEROID_MODEL_VERTICES: usize = 20;
pub const ASTEROID_JAGGEDNESS_MIN: f64 = 0.8;
pub const ASTEROID_JAGGEDNESS_MAX: f64 = 1.2;

pub const SPAWN_OFFSET_MIN: f64 = 31.0;
pub const SPAWN_OFFSET_MAX: f64 = 40.0;
pub const INITIAL_WAVE_SIZE: usize = 2;

pub const SCORE_ASTEROID_HIT: u32 = 100;
pub const SCORE_WAVE_CLEARED: u32 = 1000;
pub const SCORE_TIER_MEDIUM: u32 = 5000; // Waves of 3 above this
pub const SCORE_TIER_HARD: u32 = 10000; // Waves of 4 from here on

pub const SCORE_TEXT_X: i32 = 2;
pub const SCORE_TEXT_Y: i32 = 2;

pub const PIXEL_SOLID: char = '\u{2588}';

// --- Host Constants ---
pub const FRAME_INTERVAL_MS: u64 = 16; // ~60 FPS
pub const MAX_FRAME_DT: f64 = 0.1; // Seconds; keeps a stalled frame from skipping more than one wrap
pub const KEY_HOLD_TIMEOUT: f64 = 0.25; // Seconds a key stays held without repeat events

pub const DEBUG_FIELD_WIDTH: u16 = 200;
pub const DEBUG_FIELD_HEIGHT: u16 = 120;
pub const DEBUG_MAX_FRAMES: u64 = 600;
pub const DEBUG_TIMESTEP: f64 = 1.0 / 60.0;
pub const DEBUG_LOG_INTERVAL_FRAMES: u64 = 60; // Screen dumps to the log in headless mode
