use std::io::{self, Write};
use std::time::{Duration, Instant};
use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyEventKind},
};
use rand::Rng;
use log::{error, info};

use crate::constants::*;
use crate::geometry::Field;
use crate::input::{KeyTracker, SimulatedInput};
use crate::rendering::{GameGrid, OutputTarget};
use crate::session::Session;

/// Terminal host: owns the output, feeds keyboard state and elapsed time to the session once per frame.
pub struct Game<R: Rng> {
    pub terminal_width: u16,
    pub terminal_height: u16,
    pub stdout_target: OutputTarget,
    simulated_input: Option<SimulatedInput>,
    debug_mode_active: bool,
    max_frames: Option<u64>,
    session: Session<R>,
    game_grid: GameGrid,
    key_tracker: KeyTracker,
    frame_count: u64,
}

impl<R: Rng> Game<R> {
    pub fn new(
        terminal_width: u16,
        terminal_height: u16,
        stdout_target: OutputTarget,
        simulated_input: Option<SimulatedInput>,
        max_frames: Option<u64>,
        reports_key_releases: bool,
        rng: R,
    ) -> Self {
        let debug_mode_active = simulated_input.is_some();
        Game {
            terminal_width,
            terminal_height,
            stdout_target,
            simulated_input,
            debug_mode_active,
            max_frames,
            session: Session::new(Field::new(terminal_width, terminal_height), rng),
            game_grid: GameGrid::new(terminal_width, terminal_height),
            key_tracker: KeyTracker::new(reports_key_releases || debug_mode_active),
            frame_count: 0,
        }
    }

    #[cfg(test)]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    pub fn run(&mut self) -> io::Result<()> {
        if !self.debug_mode_active {
            self.show_title_screen()?;
        }

        let mut last_frame = Instant::now();
        while self.max_frames.is_none_or(|max| self.frame_count < max) {
            let dt = if self.debug_mode_active {
                DEBUG_TIMESTEP
            } else {
                let now = Instant::now();
                let elapsed = now.duration_since(last_frame).as_secs_f64();
                last_frame = now;
                elapsed.min(MAX_FRAME_DT)
            };
            if !self.frame(dt)? {
                break;
            }
        }

        info!("Game loop ended after {} frames. Best score {}.", self.frame_count, self.session.best_score);
        self.show_game_over_screen(self.session.best_score)
    }

    /// One tick of the host loop. Returns `Ok(false)` once the player asked to quit.
    pub fn frame(&mut self, dt: f64) -> io::Result<bool> {
        self.handle_input()?;
        if self.key_tracker.quit_requested() {
            info!("Quit requested at frame {}", self.frame_count);
            return Ok(false);
        }

        let input = self.key_tracker.snapshot(dt);
        self.session.update(dt, &input, &mut self.game_grid);
        self.render()?;

        self.frame_count += 1;
        Ok(true)
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if self.debug_mode_active {
            if let Some(sim_input) = &mut self.simulated_input {
                for event in sim_input.read(self.frame_count) {
                    self.key_tracker.handle_event(&event);
                }
            }
            return Ok(());
        }

        // Waiting out the frame interval here paces the loop.
        let deadline = Instant::now() + Duration::from_millis(FRAME_INTERVAL_MS);
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout).map_err(|e| { error!("Failed to poll event: {}", e); e })? {
                break;
            }
            let event = event::read().map_err(|e| { error!("Failed to read event: {}", e); e })?;
            if let Event::Resize(new_width, new_height) = event {
                info!("Terminal resized to {}x{}; field stays {}x{}", new_width, new_height, self.terminal_width, self.terminal_height);
            }
            self.key_tracker.handle_event(&event);
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        if !self.debug_mode_active {
            self.game_grid.render(&mut self.stdout_target).map_err(|e| { error!("Failed to render game grid: {}", e); e })?;
        } else if let OutputTarget::ScreenBuffer(ref mut sb) = self.stdout_target {
            if self.frame_count % DEBUG_LOG_INTERVAL_FRAMES == 0 {
                self.game_grid.copy_to(sb);
                info!("Frame {}: score {}, {} asteroids, {} bullets", self.frame_count, self.session.score, self.session.asteroids.len(), self.session.bullets.len());
                sb.log_frame(self.frame_count);
            }
        }
        Ok(())
    }

    fn write_centered(&mut self, y: u16, text: &str) -> io::Result<()> {
        let x = (self.terminal_width / 2).saturating_sub(text.len() as u16 / 2);
        self.stdout_target.execute_move_to(MoveTo(x, y))?;
        write!(self.stdout_target, "{}", text)
    }

    fn wait_for_key(&mut self) -> io::Result<()> {
        if self.debug_mode_active {
            return Ok(());
        }
        loop {
            if let Event::Key(key_event) = event::read().map_err(|e| { error!("Failed to read event: {}", e); e })? {
                if key_event.kind == KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    }

    fn show_title_screen(&mut self) -> io::Result<()> {
        let title_art = [
            r"    _        _                 _     _     ",
            r"   / \   ___| |_ ___ _ __ ___ (_) __| |___ ",
            r"  / _ \ / __| __/ _ \ '__/ _ \| |/ _` / __|",
            r" / ___ \\__ \ ||  __/ | | (_) | | (_| \__ \",
            r"/_/   \_\___/\__\___|_|  \___/|_|\__,_|___/",
        ];

        let title_start_y = (self.terminal_height / 2).saturating_sub(title_art.len() as u16 / 2);
        for (i, line) in title_art.iter().enumerate() {
            self.write_centered(title_start_y + i as u16, line)?;
        }
        let controls_y = self.terminal_height.saturating_sub(7);
        self.write_centered(controls_y, "Arrows: steer and thrust   Space: fire   Q: quit")?;
        self.write_centered(self.terminal_height.saturating_sub(5), "Press any key to start...")?;
        self.stdout_target.flush()?;
        info!("Title screen displayed. Waiting for key press.");

        self.wait_for_key()?;

        self.stdout_target.blank_screen()?;
        Ok(())
    }

    fn show_game_over_screen(&mut self, best_score: u32) -> io::Result<()> {
        self.stdout_target.blank_screen()?;

        let middle = self.terminal_height / 2;
        self.write_centered(middle.saturating_sub(2), "GAME OVER!")?;
        self.write_centered(middle, &format!("Best Score: {}", best_score))?;
        self.write_centered(middle + 2, "Press any key to exit...")?;
        self.stdout_target.flush()?;

        self.wait_for_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::ScreenBuffer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn headless(width: u16, height: u16, script: SimulatedInput, max_frames: u64) -> Game<StdRng> {
        Game::new(
            width,
            height,
            OutputTarget::ScreenBuffer(ScreenBuffer::new(width, height)),
            Some(script),
            Some(max_frames),
            false,
            StdRng::seed_from_u64(99),
        )
    }

    #[test]
    fn test_headless_run_stops_at_frame_limit() {
        let mut game = headless(200, 120, SimulatedInput::demo(), 30);
        game.run().unwrap();
        assert_eq!(game.frame_count(), 30);
        assert!(game.session().player.velocity.y < 0.0);
        match &game.stdout_target {
            OutputTarget::ScreenBuffer(sb) => {
                assert!(sb.row(60).contains("Best Score: "));
            }
            OutputTarget::Stdout(_) => panic!("expected screen buffer"),
        }
    }

    #[test]
    fn test_scripted_fire_spawns_bullet() {
        let mut script = SimulatedInput::new(Default::default());
        script.hold(crossterm::event::KeyCode::Char(' '), 0, 1);
        let mut game = headless(200, 120, script, 10);
        assert!(game.frame(DEBUG_TIMESTEP).unwrap());
        assert!(game.session().bullets.is_empty());
        assert!(game.frame(DEBUG_TIMESTEP).unwrap());
        assert_eq!(game.session().bullets.len(), 1);
    }

    #[test]
    fn test_quit_key_stops_the_loop() {
        let mut script = SimulatedInput::new(Default::default());
        script.push(2, Event::Key(crossterm::event::KeyCode::Char('q').into()));
        let mut game = headless(80, 24, script, 100);
        game.run().unwrap();
        assert_eq!(game.frame_count(), 2);
    }
}
