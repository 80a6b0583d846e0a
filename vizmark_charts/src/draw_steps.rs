// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation phases handed to an external driver.

use core::time::Duration;

use smallvec::{SmallVec, smallvec};

/// Identifies which animator a phase runs under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Animator {
    /// Places marks instantly at their starting geometry.
    Reset,
    /// Interpolates marks to their final geometry.
    Main,
}

impl Animator {
    /// Returns the animator's name as seen by drivers.
    pub fn name(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Main => "main",
        }
    }
}

/// One phase: the attributes to apply and the animator to apply them with.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawStep<P> {
    /// Attribute mapping for this phase.
    pub attrs: P,
    /// Animator for this phase.
    pub animator: Animator,
}

/// One or two phases, reset first.
pub type DrawSteps<P> = SmallVec<[DrawStep<P>; 2]>;

/// Builds the ordered phase list.
///
/// A reset phase (built lazily from `reset`) precedes the main phase only when the data
/// changed and animation is enabled.
pub fn build_draw_steps<P>(
    data_changed: bool,
    animate: bool,
    current: P,
    reset: impl FnOnce() -> P,
) -> DrawSteps<P> {
    let main = DrawStep {
        attrs: current,
        animator: Animator::Main,
    };
    if data_changed && animate {
        tracing::trace!("scheduling reset phase before main");
        smallvec![
            DrawStep {
                attrs: reset(),
                animator: Animator::Reset,
            },
            main
        ]
    } else {
        tracing::trace!(data_changed, animate, "scheduling main phase only");
        smallvec![main]
    }
}

/// Animation settings of a plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationConfig {
    /// Emit a reset phase when data changes.
    pub enabled: bool,
    /// Target duration handed to the driver.
    pub duration: Duration,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            duration: Duration::from_millis(300),
        }
    }
}

impl AnimationConfig {
    /// Enabled animation with the given duration.
    pub fn animated(duration: Duration) -> Self {
        Self {
            enabled: true,
            duration,
        }
    }
}

/// Applies phases to a rendered scene, interpolating over `duration`.
pub trait AnimationDriver<P> {
    /// Runs `steps` in order.
    fn run(&mut self, steps: &[DrawStep<P>], duration: Duration);
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn reset_precedes_main_when_animating_changed_data() {
        let steps = build_draw_steps(true, true, 2, || 1);
        let order: std::vec::Vec<_> = steps.iter().map(|s| (s.animator, s.attrs)).collect();
        assert_eq!(order, [(Animator::Reset, 1), (Animator::Main, 2)]);
        assert_eq!(steps[0].animator.name(), "reset");
    }

    #[test]
    fn main_only_otherwise() {
        for (changed, animate) in [(false, true), (true, false), (false, false)] {
            let steps = build_draw_steps(changed, animate, 2, || panic!("reset not needed"));
            assert_eq!(steps.len(), 1);
            assert_eq!(steps[0].animator, Animator::Main);
        }
    }
}
