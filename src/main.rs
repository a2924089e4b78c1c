use std::io::{self, Write};
use std::env;
use crossterm::{
    cursor::{Hide, Show},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal::{disable_raw_mode, enable_raw_mode, size, supports_keyboard_enhancement},
};
use log::{error, info};

mod collision;
mod constants;
mod entities;
mod game;
mod geometry;
mod input;
mod rendering;
mod session;

use constants::*;
use game::Game;
use input::SimulatedInput;
use rendering::{OutputTarget, ScreenBuffer};

#[derive(Debug, PartialEq)]
struct LaunchOptions {
    debug_mode_active: bool,
    debug_width: u16,
    debug_height: u16,
    max_frames: Option<u64>,
}

impl LaunchOptions {
    /// `[MAX_FRAMES]` or `--debug [WIDTH HEIGHT [MAX_FRAMES]]`.
    fn from_args(args: &[String]) -> Self {
        let debug_mode_active = args.len() > 1 && args[1] == "--debug";
        if debug_mode_active {
            let mut debug_width = DEBUG_FIELD_WIDTH;
            let mut debug_height = DEBUG_FIELD_HEIGHT;
            if args.len() >= 4 {
                debug_width = args[2].parse::<u16>().unwrap_or(DEBUG_FIELD_WIDTH);
                debug_height = args[3].parse::<u16>().unwrap_or(DEBUG_FIELD_HEIGHT);
            }
            let max_frames = args.get(4).and_then(|arg| arg.parse::<u64>().ok()).unwrap_or(DEBUG_MAX_FRAMES);
            LaunchOptions { debug_mode_active, debug_width, debug_height, max_frames: Some(max_frames) }
        } else {
            LaunchOptions {
                debug_mode_active,
                debug_width: DEBUG_FIELD_WIDTH,
                debug_height: DEBUG_FIELD_HEIGHT,
                max_frames: args.get(1).and_then(|arg| arg.parse::<u64>().ok()),
            }
        }
    }
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let options = LaunchOptions::from_args(&args);

    let level = if options.debug_mode_active { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    simple_logging::log_to_file("console-asteroids.log", level)?;
    info!("Starting console-asteroids with {:?}", options);

    if options.debug_mode_active {
        info!("Debug resolution set to {}x{}", options.debug_width, options.debug_height);
        let mut game = Game::new(
            options.debug_width,
            options.debug_height,
            OutputTarget::ScreenBuffer(ScreenBuffer::new(options.debug_width, options.debug_height)),
            Some(SimulatedInput::demo()),
            options.max_frames,
            true,
            rand::thread_rng(),
        );
        return game.run();
    }

    info!("Attempting to enable raw mode.");
    enable_raw_mode().map_err(|e| { error!("Failed to enable raw mode: {}", e); e })?;
    let mut stdout_target = OutputTarget::Stdout(io::stdout());
    let reports_key_releases = supports_keyboard_enhancement().unwrap_or(false);
    if reports_key_releases {
        stdout_target.execute_other_command(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))?;
    }
    info!("Keyboard release events {}", if reports_key_releases { "enabled" } else { "unavailable, using hold timeout" });

    let result = play(stdout_target, options.max_frames, reports_key_releases);

    // Restore the terminal even when the game failed.
    let mut stdout_target = OutputTarget::Stdout(io::stdout());
    if reports_key_releases {
        stdout_target.execute_other_command(PopKeyboardEnhancementFlags)?;
    }
    stdout_target.execute_other_command(Show).map_err(|e| { error!("Failed to show cursor on exit: {}", e); e })?;
    disable_raw_mode().map_err(|e| { error!("Failed to disable raw mode on exit: {}", e); e })?;
    info!("Exiting application.");
    result
}

fn play(mut stdout_target: OutputTarget, max_frames: Option<u64>, reports_key_releases: bool) -> io::Result<()> {
    let (terminal_width, terminal_height) = size().map_err(|e| { error!("Failed to get terminal size: {}", e); e })?;
    info!("Terminal size: {}x{}", terminal_width, terminal_height);

    stdout_target.blank_screen().map_err(|e| { error!("Failed to clear screen: {}", e); e })?;
    stdout_target.execute_other_command(Hide).map_err(|e| { error!("Failed to hide cursor: {}", e); e })?;
    stdout_target.flush()?;

    let mut game = Game::new(
        terminal_width,
        terminal_height,
        stdout_target,
        None,
        max_frames,
        reports_key_releases,
        rand::thread_rng(),
    );
    game.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_no_arguments_runs_until_quit() {
        let options = LaunchOptions::from_args(&args(&["console-asteroids"]));
        assert!(!options.debug_mode_active);
        assert_eq!(options.max_frames, None);
    }

    #[test]
    fn test_frame_limit_argument() {
        let options = LaunchOptions::from_args(&args(&["console-asteroids", "500"]));
        assert_eq!(options.max_frames, Some(500));
        let options = LaunchOptions::from_args(&args(&["console-asteroids", "lots"]));
        assert_eq!(options.max_frames, None);
    }

    #[test]
    fn test_debug_defaults_to_200_by_120() {
        let options = LaunchOptions::from_args(&args(&["console-asteroids", "--debug"]));
        assert_eq!(
            options,
            LaunchOptions { debug_mode_active: true, debug_width: 200, debug_height: 120, max_frames: Some(600) }
        );
    }

    #[test]
    fn test_debug_with_size_and_frames() {
        let options = LaunchOptions::from_args(&args(&["console-asteroids", "--debug", "80", "x", "42"]));
        assert_eq!(options.debug_width, 80);
        assert_eq!(options.debug_height, DEBUG_FIELD_HEIGHT);
        assert_eq!(options.max_frames, Some(42));
    }
}
