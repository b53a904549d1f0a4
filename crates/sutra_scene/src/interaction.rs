//! Interaction: input events, the measurement state machine, and
//! parameter bindings.

use crate::descriptor::InteractionKind;
use sutra_core::param::{self, ParamSet};
use sutra_core::policy::{MotionPolicy, Simulator};

/// Engine-agnostic input. The page shell translates its own events
/// (pointer, keyboard, sliders) into these.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary pointer press in the viewport.
    Pointer,
    /// Discrete keyboard toggle.
    Toggle,
    /// Continuous control bound to a named parameter.
    Slider { name: String, value: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementState {
    Superposed,
    Collapsed,
}

/// Applies input to one visualization's simulator and parameters.
///
/// Transitions fire only on actual state change, so rapid repeated
/// toggles cannot corrupt the pool: collapsing twice is one collapse,
/// and every release re-randomizes velocities.
pub struct InteractionController {
    kind: InteractionKind,
    state: MeasurementState,
    prior: Option<MotionPolicy>,
}

impl InteractionController {
    pub fn new(kind: InteractionKind) -> Self {
        Self {
            kind,
            state: MeasurementState::Superposed,
            prior: None,
        }
    }

    pub fn state(&self) -> MeasurementState {
        self.state
    }

    pub fn kind(&self) -> &InteractionKind {
        &self.kind
    }

    pub fn apply(&mut self, event: &InputEvent, simulator: &mut Simulator, params: &mut ParamSet) {
        match event {
            InputEvent::Pointer | InputEvent::Toggle => {
                self.toggle_measurement(simulator, params);
            }
            InputEvent::Slider { name, value } => {
                let value = match self.kind {
                    InteractionKind::SpeedSlider { min, max } if name == param::SPEED => {
                        value.clamp(min, max)
                    }
                    _ => *value,
                };
                params.set_scalar(name, value);
            }
        }
    }

    fn toggle_measurement(&mut self, simulator: &mut Simulator, params: &mut ParamSet) {
        let InteractionKind::Measurement {
            target,
            blend,
            scatter_speed,
        } = self.kind
        else {
            tracing::trace!("toggle ignored: scene has no measurement interaction");
            return;
        };

        match self.state {
            MeasurementState::Superposed => {
                let collapse = MotionPolicy::SeekAttractor { target, blend };
                self.prior = Some(simulator.swap_policy(collapse));
                self.state = MeasurementState::Collapsed;
                params.set_flag(param::COLLAPSED, true);
                tracing::debug!("measurement: collapsed");
            }
            MeasurementState::Collapsed => {
                if let Some(prior) = self.prior.take() {
                    simulator.swap_policy(prior);
                }
                // Convergence pins velocities; never leave them that way.
                simulator.scatter(scatter_speed);
                self.state = MeasurementState::Superposed;
                params.set_flag(param::COLLAPSED, false);
                tracing::debug!("measurement: released");
            }
        }
    }
}
