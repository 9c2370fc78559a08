//! ScreenSequencer: drives navigation through the onboarding screens.
//!
//! Forward moves push onto a back stack and `Back` pops it. Reaching Home
//! from the topics step clears the stack so no onboarding screen is
//! reachable from Home afterwards.

use tracing::{debug, info};

use crate::error::OnboardingError;
use crate::preferences::PreferenceManager;

use super::controller::{CompletionHandle, OnboardingController};
use super::state::{NavEvent, Screen, initial_screen};

/// Outcome of handling one navigation event.
#[derive(Debug)]
pub enum Navigation {
    /// The sequencer moved between two screens.
    Moved { from: Screen, to: Screen },
    /// The topics step was left for Home and the completion write was
    /// dispatched. The write may still be pending.
    Completed { completion: CompletionHandle },
    /// Continue was pressed while the step's gate was closed. No-op.
    Blocked { at: Screen },
    /// The event has no transition from this screen. No-op.
    Ignored { at: Screen, event: NavEvent },
}

impl Navigation {
    pub fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. } | Self::Completed { .. })
    }
}

/// Finite-state machine over the app's screens.
#[derive(Debug, Clone)]
pub struct ScreenSequencer {
    current: Screen,
    back_stack: Vec<Screen>,
}

impl ScreenSequencer {
    pub fn new(initial: Screen) -> Self {
        Self {
            current: initial,
            back_stack: Vec::new(),
        }
    }

    /// Start where the committed onboarding flag says the app should open.
    pub fn for_launch(prefs: &PreferenceManager) -> Self {
        let initial = initial_screen(prefs.is_onboarding_completed());
        info!(screen = %initial, "Initial screen");
        Self::new(initial)
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    /// Screens `Back` would walk through, oldest first.
    pub fn history(&self) -> &[Screen] {
        &self.back_stack
    }

    /// Handle a navigation event against the controller's gates.
    ///
    /// Starting the flow clears any previous selection. Only the terminal
    /// continue can fail, when a completion write is already pending; the
    /// sequencer then stays on the topics step.
    pub fn handle(
        &mut self,
        event: NavEvent,
        controller: &OnboardingController,
    ) -> Result<Navigation, OnboardingError> {
        let from = self.current;
        let Some(to) = from.target(event) else {
            debug!(screen = %from, %event, "Event ignored");
            return Ok(Navigation::Ignored { at: from, event });
        };
        debug_assert!(from.can_transition_to(to), "{from} --{event}--> {to}");

        match event {
            NavEvent::Start => {
                controller.reset();
                self.push(to);
            }
            NavEvent::Continue => {
                if !controller.can_continue_from(from) {
                    debug!(screen = %from, "Continue blocked by gate");
                    return Ok(Navigation::Blocked { at: from });
                }
                if from.is_terminal_event(event) {
                    let completion = controller.complete_onboarding()?;
                    self.back_stack.clear();
                    self.current = to;
                    info!(from = %from, to = %to, "Onboarding flow finished");
                    return Ok(Navigation::Completed { completion });
                }
                self.push(to);
            }
            NavEvent::Back => {
                let popped = self.back_stack.pop();
                debug_assert!(popped.is_none() || popped == Some(to));
                self.current = to;
            }
        }

        info!(from = %from, to = %to, %event, "Screen transition");
        Ok(Navigation::Moved { from, to })
    }

    pub fn start(&mut self, controller: &OnboardingController) -> Result<Navigation, OnboardingError> {
        self.handle(NavEvent::Start, controller)
    }

    pub fn next(&mut self, controller: &OnboardingController) -> Result<Navigation, OnboardingError> {
        self.handle(NavEvent::Continue, controller)
    }

    pub fn back(&mut self, controller: &OnboardingController) -> Result<Navigation, OnboardingError> {
        self.handle(NavEvent::Back, controller)
    }

    /// Leave the flow without completing it, discarding the selection.
    ///
    /// Returns false if already on Home.
    pub fn abandon(&mut self, controller: &OnboardingController) -> bool {
        if !self.current.is_onboarding() {
            return false;
        }
        info!(from = %self.current, "Onboarding abandoned");
        controller.reset();
        self.back_stack.clear();
        self.current = Screen::Home;
        true
    }

    fn push(&mut self, to: Screen) {
        self.back_stack.push(self.current);
        self.current = to;
    }
}
