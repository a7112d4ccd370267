//! Fade sequencing and the transition phase machine.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::page::TransitionTarget;

/// Where a navigation is in its fade-swap-fade sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    /// No navigation in flight.
    Idle,
    /// Fading the old content out.
    FadingOut,
    /// Fetching and installing the new content.
    Swapping,
    /// Fading the new content in.
    FadingIn,
}

/// Drives the fades on a [`TransitionTarget`] and publishes the current
/// [`TransitionPhase`].
///
/// Fades are timed with a deterministic `tokio::time::sleep`, never with
/// animation-end events.
#[derive(Debug)]
pub struct TransitionController {
    duration: Duration,
    phase: watch::Sender<TransitionPhase>,
}

impl TransitionController {
    /// A controller whose fades last `duration` each.
    pub fn new(duration: Duration) -> Self {
        let (phase, _) = watch::channel(TransitionPhase::Idle);
        Self { duration, phase }
    }

    /// Current phase.
    pub fn phase(&self) -> TransitionPhase {
        *self.phase.borrow()
    }

    /// A receiver that observes every phase change.
    pub fn watch(&self) -> watch::Receiver<TransitionPhase> {
        self.phase.subscribe()
    }

    /// Value written to the target's `transition` property while fading.
    pub fn transition_style(&self) -> String {
        format!("opacity {}ms ease-out", self.duration.as_millis())
    }

    pub(crate) fn enter(&self, phase: TransitionPhase) {
        tracing::trace!(?phase, "transition phase");
        self.phase.send_replace(phase);
    }

    /// Fades the target out and waits for the fade to finish.
    pub async fn fade_out<T: TransitionTarget>(&self, target: &Mutex<T>) {
        self.enter(TransitionPhase::FadingOut);
        {
            let mut target = target.lock();
            target.set_transition(Some(&self.transition_style()));
            target.set_opacity(0.0);
        }
        tokio::time::sleep(self.duration).await;
    }

    /// Fades the target back in on the next frame, clears the transition
    /// style once the fade is over, and returns to [`TransitionPhase::Idle`].
    pub async fn fade_in<T: TransitionTarget>(&self, target: &Mutex<T>) {
        self.enter(TransitionPhase::FadingIn);
        tokio::task::yield_now().await;
        target.lock().set_opacity(1.0);
        tokio::time::sleep(self.duration).await;
        target.lock().set_transition(None);
        self.enter(TransitionPhase::Idle);
    }
}

/// Scoped ownership of the transition style.
///
/// While armed, dropping the guard restores full opacity, removes the
/// transition style and publishes [`TransitionPhase::Idle`], so every early
/// exit (the hard-navigation fallback, or the navigation future being
/// dropped mid-fade) leaves the target and the phase at rest.
pub struct TransitionGuard<'a, T: TransitionTarget> {
    controller: &'a TransitionController,
    target: &'a Mutex<T>,
    armed: bool,
}

impl<'a, T: TransitionTarget> TransitionGuard<'a, T> {
    /// Takes responsibility for `target`'s transition style and for
    /// `controller`'s phase.
    pub fn acquire(controller: &'a TransitionController, target: &'a Mutex<T>) -> Self {
        Self {
            controller,
            target,
            armed: true,
        }
    }

    /// Releases the target without touching it; call after a completed
    /// fade-in.
    pub fn release(mut self) {
        self.armed = false;
    }
}

impl<T: TransitionTarget> Drop for TransitionGuard<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            {
                let mut target = self.target.lock();
                target.set_transition(None);
                target.set_opacity(1.0);
            }
            if self.controller.phase() != TransitionPhase::Idle {
                self.controller.enter(TransitionPhase::Idle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Body {
        transition: Option<String>,
        opacity: f32,
    }

    fn visible_body() -> Mutex<Body> {
        Mutex::new(Body {
            transition: None,
            opacity: 1.0,
        })
    }

    impl TransitionTarget for Body {
        fn set_transition(&mut self, transition: Option<&str>) {
            self.transition = transition.map(str::to_string);
        }

        fn set_opacity(&mut self, opacity: f32) {
            self.opacity = opacity;
        }

        fn opacity(&self) -> f32 {
            self.opacity
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_guard_restores_target_and_phase() {
        let controller = TransitionController::new(Duration::from_millis(300));
        let body = visible_body();

        let guard = TransitionGuard::acquire(&controller, &body);
        controller.fade_out(&body).await;
        controller.enter(TransitionPhase::Swapping);
        drop(guard);

        assert_eq!(controller.phase(), TransitionPhase::Idle);
        let body = body.lock();
        assert_eq!(body.opacity, 1.0);
        assert_eq!(body.transition, None);
    }

    #[tokio::test(start_paused = true)]
    async fn released_guard_leaves_the_target_alone() {
        let controller = TransitionController::new(Duration::from_millis(10));
        let body = visible_body();

        let guard = TransitionGuard::acquire(&controller, &body);
        controller.fade_out(&body).await;
        guard.release();

        assert_eq!(controller.phase(), TransitionPhase::FadingOut);
        assert_eq!(body.lock().opacity, 0.0);
    }
}
