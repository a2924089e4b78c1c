use std::collections::HashMap;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::constants::KEY_HOLD_TIMEOUT;

/// What the player is doing this frame, as seen by the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
    pub fire_released: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
    Thrust,
    Fire,
}

impl Control {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left => Some(Control::Left),
            KeyCode::Right => Some(Control::Right),
            KeyCode::Up => Some(Control::Thrust),
            KeyCode::Char(' ') => Some(Control::Fire),
            _ => None,
        }
    }
}

/// Turns terminal key events into held state and a fire release edge.
///
/// Terminals that report key releases drive the state directly. Everywhere
/// else a key counts as held until `KEY_HOLD_TIMEOUT` passes without another
/// press or auto-repeat, and that expiry stands in for the release.
pub struct KeyTracker {
    reports_releases: bool,
    held: HashMap<Control, f64>, // Seconds since the last press or repeat
    fire_released: bool,
    quit_requested: bool,
}

impl KeyTracker {
    pub fn new(reports_releases: bool) -> Self {
        KeyTracker {
            reports_releases,
            held: HashMap::new(),
            fire_released: false,
            quit_requested: false,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn handle_event(&mut self, event: &Event) {
        let Event::Key(key_event) = event else {
            return;
        };
        if key_event.kind != KeyEventKind::Release && is_quit_key(key_event) {
            self.quit_requested = true;
            return;
        }
        let Some(control) = Control::from_key(key_event.code) else {
            return;
        };
        match key_event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.held.insert(control, 0.0);
            }
            KeyEventKind::Release => self.release(control),
        }
    }

    /// State for the frame that just elapsed `dt` seconds. Consumes the fire edge.
    pub fn snapshot(&mut self, dt: f64) -> InputState {
        if !self.reports_releases {
            let expired: Vec<Control> = self
                .held
                .iter_mut()
                .filter_map(|(control, age)| {
                    *age += dt;
                    (*age > KEY_HOLD_TIMEOUT).then_some(*control)
                })
                .collect();
            for control in expired {
                self.release(control);
            }
        }

        let state = InputState {
            left: self.held.contains_key(&Control::Left),
            right: self.held.contains_key(&Control::Right),
            thrust: self.held.contains_key(&Control::Thrust),
            fire_released: self.fire_released,
        };
        self.fire_released = false;
        state
    }

    fn release(&mut self, control: Control) {
        if self.held.remove(&control).is_some() && control == Control::Fire {
            self.fire_released = true;
        }
    }
}

fn is_quit_key(key_event: &KeyEvent) -> bool {
    match key_event.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key_event.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

// --- SimulatedInput for debugging ---
pub struct SimulatedInput {
    events: HashMap<u64, Vec<Event>>,
}

impl SimulatedInput {
    pub fn new(events: HashMap<u64, Vec<Event>>) -> Self {
        SimulatedInput { events }
    }

    /// Fly forward, turn, and fire a few volleys.
    pub fn demo() -> Self {
        let mut script = SimulatedInput::new(HashMap::new());
        script.hold(KeyCode::Up, 1, 40);
        script.hold(KeyCode::Right, 41, 55);
        script.hold(KeyCode::Char(' '), 60, 62);
        script.hold(KeyCode::Char(' '), 90, 91);
        script.hold(KeyCode::Left, 100, 130);
        script.hold(KeyCode::Char(' '), 140, 141);
        script
    }

    pub fn hold(&mut self, code: KeyCode, press_frame: u64, release_frame: u64) {
        self.push(press_frame, Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)));
        self.push(release_frame, Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)));
    }

    pub fn push(&mut self, frame: u64, event: Event) {
        self.events.entry(frame).or_default().push(event);
    }

    pub fn read(&mut self, frame_count: u64) -> Vec<Event> {
        self.events.remove(&frame_count).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    #[test]
    fn test_release_reporting_terminal_fires_once_per_cycle() {
        let mut tracker = KeyTracker::new(true);
        tracker.handle_event(&key(KeyCode::Char(' '), KeyEventKind::Press));
        assert!(!tracker.snapshot(0.016).fire_released);
        tracker.handle_event(&key(KeyCode::Char(' '), KeyEventKind::Repeat));
        assert!(!tracker.snapshot(1.0).fire_released);
        tracker.handle_event(&key(KeyCode::Char(' '), KeyEventKind::Release));
        assert!(tracker.snapshot(0.016).fire_released);
        assert!(!tracker.snapshot(0.016).fire_released);
    }

    #[test]
    fn test_held_keys_stay_held_until_released() {
        let mut tracker = KeyTracker::new(true);
        tracker.handle_event(&key(KeyCode::Left, KeyEventKind::Press));
        tracker.handle_event(&key(KeyCode::Up, KeyEventKind::Press));
        let state = tracker.snapshot(5.0);
        assert!(state.left && state.thrust && !state.right);
        tracker.handle_event(&key(KeyCode::Left, KeyEventKind::Release));
        let state = tracker.snapshot(0.016);
        assert!(!state.left && state.thrust);
    }

    #[test]
    fn test_legacy_terminal_expires_holds() {
        let mut tracker = KeyTracker::new(false);
        tracker.handle_event(&key(KeyCode::Right, KeyEventKind::Press));
        tracker.handle_event(&key(KeyCode::Char(' '), KeyEventKind::Press));
        let state = tracker.snapshot(0.1);
        assert!(state.right && !state.fire_released);

        tracker.handle_event(&key(KeyCode::Right, KeyEventKind::Press));
        let state = tracker.snapshot(0.2);
        assert!(state.right);
        assert!(state.fire_released);

        let state = tracker.snapshot(0.2);
        assert!(!state.right && !state.fire_released);
    }

    #[test]
    fn test_quit_keys() {
        let mut tracker = KeyTracker::new(false);
        tracker.handle_event(&key(KeyCode::Char('x'), KeyEventKind::Press));
        assert!(!tracker.quit_requested());
        tracker.handle_event(&Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(tracker.quit_requested());
    }

    #[test]
    fn test_simulated_input_replays_by_frame() {
        let mut script = SimulatedInput::new(HashMap::new());
        script.hold(KeyCode::Char(' '), 3, 4);
        assert!(script.read(2).is_empty());
        let mut tracker = KeyTracker::new(true);
        for frame in 3..=4 {
            for event in script.read(frame) {
                tracker.handle_event(&event);
            }
        }
        assert!(tracker.snapshot(0.016).fire_released);
        assert!(script.read(3).is_empty());
    }
}
