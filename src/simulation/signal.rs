//! Traffic signal phase controller
//!
//! Four phases in round robin, one green road per phase. Phases change on
//! time alone.

use log::{debug, warn};

use super::config::DEFAULT_PHASE_DURATION;
use super::types::{LightState, Road};

/// A phase transition reported by [`SignalController::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    /// Road that just went red, `None` on the first transition of an idle start
    pub from: Option<Road>,
    /// Road that just went green
    pub to: Road,
}

/// The four signals of the intersection and the phase timer
#[derive(Debug, Clone)]
pub struct SignalController {
    lights: [LightState; 4],
    green: Option<Road>,
    /// Seconds since the last transition
    timer: f32,
    phase_duration: f32,
}

impl SignalController {
    /// Start with `initial_green` green and the rest red
    ///
    /// A `phase_duration` that is not a positive finite number would switch
    /// phase every tick; [`DEFAULT_PHASE_DURATION`] is used instead.
    pub fn new(phase_duration: f32, initial_green: Option<Road>) -> Self {
        let phase_duration = if phase_duration.is_finite() && phase_duration > 0.0 {
            phase_duration
        } else {
            warn!(
                "Invalid phase duration {}, using {}s",
                phase_duration, DEFAULT_PHASE_DURATION
            );
            DEFAULT_PHASE_DURATION
        };

        let mut lights = [LightState::Red; 4];
        if let Some(road) = initial_green {
            lights[road.index()] = LightState::Green;
        }
        Self {
            lights,
            green: initial_green,
            timer: 0.0,
            phase_duration,
        }
    }

    /// Advance the phase timer, switching phase once it reaches the duration
    pub fn update(&mut self, delta_secs: f32) -> Option<PhaseChange> {
        self.timer += delta_secs;
        if self.timer < self.phase_duration {
            return None;
        }
        Some(self.switch_phase())
    }

    fn switch_phase(&mut self) -> PhaseChange {
        let from = self.green;
        let to = from.map_or(Road::A, Road::next);

        if let Some(road) = from {
            self.lights[road.index()] = LightState::Red;
        }
        self.lights[to.index()] = LightState::Green;
        self.green = Some(to);
        self.timer = 0.0;

        debug!("Signal phase: {:?} -> {}", from, to);
        PhaseChange { from, to }
    }

    pub fn state(&self, road: Road) -> LightState {
        self.lights[road.index()]
    }

    pub fn is_green(&self, road: Road) -> bool {
        self.state(road) == LightState::Green
    }

    pub fn green_road(&self) -> Option<Road> {
        self.green
    }

    pub fn green_count(&self) -> usize {
        self.lights
            .iter()
            .filter(|light| **light == LightState::Green)
            .count()
    }

    /// Seconds since the last transition
    pub fn elapsed(&self) -> f32 {
        self.timer
    }

    pub fn phase_duration(&self) -> f32 {
        self.phase_duration
    }
}
