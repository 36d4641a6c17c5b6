//! Expand/collapse state machine and eased interpolation for spread clusters.
//!
//! Each cluster owns a [`ClusterMotion`]: current member positions, the phase,
//! an optional in-flight transition and an optional collapse deadline. The
//! [`AnimationController`] mutates motions in response to hover and advances
//! them when the host calls [`AnimationController::tick`] once per frame.
//! Nothing is scheduled behind the caller's back, so dropping a motion cancels
//! everything it had pending.

use std::time::{Duration, Instant};

use super::geo::GeoPoint;
use crate::settings::{AnimationSettings, SettingsError};

/// Where a cluster is in its expand/collapse cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionPhase {
    Collapsed,
    Expanding,
    Expanded,
    Collapsing,
}

#[derive(Clone, Debug)]
struct Transition {
    from: Vec<GeoPoint>,
    started: Instant,
    settles_to: MotionPhase,
}

/// Per-cluster animation state.
#[derive(Clone, Debug)]
pub struct ClusterMotion {
    center: GeoPoint,
    spread: Vec<GeoPoint>,
    positions: Vec<GeoPoint>,
    phase: MotionPhase,
    transition: Option<Transition>,
    collapse_due: Option<Instant>,
}

impl ClusterMotion {
    /// A collapsed motion with every member on `center`.
    pub fn new(center: GeoPoint, spread: Vec<GeoPoint>) -> Self {
        Self {
            center,
            positions: vec![center; spread.len()],
            spread,
            phase: MotionPhase::Collapsed,
            transition: None,
            collapse_due: None,
        }
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    pub fn positions(&self) -> &[GeoPoint] {
        &self.positions
    }

    pub fn member_count(&self) -> usize {
        self.spread.len()
    }

    /// True while expanding or expanded.
    pub fn is_expanded(&self) -> bool {
        matches!(self.phase, MotionPhase::Expanding | MotionPhase::Expanded)
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn collapse_pending(&self) -> bool {
        self.collapse_due.is_some()
    }

    /// Whether the host still needs to call `tick` for this motion.
    pub fn needs_tick(&self) -> bool {
        self.is_animating() || self.collapse_pending()
    }

    fn target(&self, settles_to: MotionPhase, index: usize) -> GeoPoint {
        match settles_to {
            MotionPhase::Expanded => self.spread[index],
            _ => self.center,
        }
    }

    fn begin(&mut self, moving: MotionPhase, settles_to: MotionPhase, now: Instant) {
        self.transition = Some(Transition {
            from: self.positions.clone(),
            started: now,
            settles_to,
        });
        self.phase = moving;
    }
}

/// Result of advancing one motion by a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Member positions changed and markers should be moved.
    pub moved: bool,
    /// A collapse completed; guide lines can go.
    pub collapse_finished: bool,
}

/// Ease-out cubic: fast start, gentle landing.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Drives [`ClusterMotion`]s with a fixed duration and collapse delay.
#[derive(Clone, Debug)]
pub struct AnimationController {
    duration: Duration,
    collapse_delay: Duration,
}

impl AnimationController {
    pub fn new(settings: AnimationSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            duration: settings.duration(),
            collapse_delay: settings.collapse_delay(),
        })
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn collapse_delay(&self) -> Duration {
        self.collapse_delay
    }

    /// Start spreading members out from wherever they are now.
    ///
    /// Returns `false` without touching the motion when it is already
    /// expanded or has a single member.
    pub fn expand(&self, motion: &mut ClusterMotion, now: Instant) -> bool {
        if motion.is_expanded() || motion.member_count() <= 1 {
            return false;
        }
        motion.begin(MotionPhase::Expanding, MotionPhase::Expanded, now);
        tracing::trace!("Expanding cluster of {}", motion.member_count());
        true
    }

    /// Start pulling members back to the centroid unless collapsed or pinned.
    pub fn collapse(&self, motion: &mut ClusterMotion, pinned: bool, now: Instant) -> bool {
        motion.collapse_due = None;
        if !motion.is_expanded() || pinned {
            return false;
        }
        motion.begin(MotionPhase::Collapsing, MotionPhase::Collapsed, now);
        tracing::trace!("Collapsing cluster of {}", motion.member_count());
        true
    }

    /// Jump straight to the expanded layout, cancelling any transition or deadline.
    pub fn instant_expand(&self, motion: &mut ClusterMotion) -> bool {
        if motion.member_count() <= 1 {
            return false;
        }
        motion.transition = None;
        motion.collapse_due = None;
        motion.positions.clone_from(&motion.spread);
        motion.phase = MotionPhase::Expanded;
        true
    }

    /// Pointer entered one of the cluster's markers.
    pub fn pointer_entered(&self, motion: &mut ClusterMotion, now: Instant) -> bool {
        motion.collapse_due = None;
        self.expand(motion, now)
    }

    /// Pointer left one of the cluster's markers; collapse after the delay.
    pub fn pointer_left(&self, motion: &mut ClusterMotion, now: Instant) {
        if motion.member_count() <= 1 {
            return;
        }
        motion.collapse_due = Some(now + self.collapse_delay);
    }

    /// Fire a due collapse deadline and advance the running transition to `now`.
    pub fn tick(&self, motion: &mut ClusterMotion, pinned: bool, now: Instant) -> TickOutcome {
        if motion.collapse_due.is_some_and(|due| now >= due) {
            self.collapse(motion, pinned, now);
        }
        let mut outcome = TickOutcome::default();
        let Some(transition) = motion.transition.take() else {
            return outcome;
        };
        let elapsed = now.saturating_duration_since(transition.started);
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        outcome.moved = true;
        if progress >= 1.0 {
            for index in 0..motion.positions.len() {
                motion.positions[index] = motion.target(transition.settles_to, index);
            }
            motion.phase = transition.settles_to;
            outcome.collapse_finished = transition.settles_to == MotionPhase::Collapsed;
            return outcome;
        }
        let eased = ease_out_cubic(progress);
        for (index, from) in transition.from.iter().enumerate() {
            let target = motion.target(transition.settles_to, index);
            motion.positions[index] = from.lerp(target, eased);
        }
        motion.transition = Some(transition);
        outcome
    }
}
