//! Animation primitives and the reward modal's staged timeline.
//!
//! The timeline is deliberately explicit: every stage is a named state, every
//! advance happens in [`RewardTimeline::tick`], and hiding the modal resets
//! all tracked values to zero. That makes the ordering contract (entrance,
//! then count-up, then staggered star reveals) and the replay contract
//! testable without any engine in the loop.

/// Entrance spring, matching a gentle pop-in.
const ENTRANCE_TENSION: f32 = 50.0;
const ENTRANCE_FRICTION: f32 = 7.0;
/// Entrance fade duration in seconds.
const FADE_SECS: f32 = 0.3;
/// Count-up duration in seconds.
const COUNT_SECS: f32 = 1.0;
/// Star reveal springs, snappier than the entrance.
const STAR_TENSION: f32 = 100.0;
const STAR_FRICTION: f32 = 5.0;
/// Delay between consecutive star reveals in seconds.
const STAR_STAGGER_SECS: f32 = 0.1;

pub const STAR_COUNT: usize = 3;

/// Damped spring toward a target value.
///
/// Integrated with semi-implicit Euler in fixed substeps, so a long frame
/// cannot blow the simulation up and the trajectory is independent of tick
/// granularity.
#[derive(Debug, Clone)]
pub struct Spring {
    tension: f32,
    friction: f32,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    const MAX_STEP: f32 = 1.0 / 120.0;
    const REST_DELTA: f32 = 0.001;
    const REST_SPEED: f32 = 0.001;

    pub fn new(tension: f32, friction: f32) -> Self {
        Self {
            tension,
            friction,
            value: 0.0,
            velocity: 0.0,
            target: 0.0,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn tick(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let steps = (dt / Self::MAX_STEP).ceil().max(1.0);
        let step = dt / steps;
        for _ in 0..steps as u32 {
            let accel = self.tension * (self.target - self.value) - self.friction * self.velocity;
            self.velocity += accel * step;
            self.value += self.velocity * step;
        }
    }

    pub fn is_settled(&self) -> bool {
        (self.target - self.value).abs() < Self::REST_DELTA
            && self.velocity.abs() < Self::REST_SPEED
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
        self.velocity = 0.0;
        self.target = 0.0;
    }
}

/// Linear count from zero up to a target over a fixed duration.
#[derive(Debug, Clone)]
pub struct CountUp {
    target: u32,
    duration: f32,
    elapsed: f32,
}

impl CountUp {
    pub fn new(duration: f32) -> Self {
        Self {
            target: 0,
            duration,
            elapsed: 0.0,
        }
    }

    pub fn set_target(&mut self, target: u32) {
        self.target = target;
    }

    pub fn tick(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    pub fn value(&self) -> u32 {
        if self.duration <= 0.0 {
            return self.target;
        }
        let ratio = (self.elapsed / self.duration).clamp(0.0, 1.0);
        (self.target as f32 * ratio).round() as u32
    }

    pub fn done(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn reset(&mut self) {
        self.target = 0;
        self.elapsed = 0.0;
    }
}

/// Stages of the reward celebration, in play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardStage {
    Hidden,
    /// Parallel scale spring and opacity fade.
    Entrance,
    /// Points counting up.
    CountUp,
    /// Staggered star reveals.
    Stars,
    /// Everything at terminal values.
    Settled,
}

/// The reward modal's animation state.
///
/// Stages advance strictly in order; no stage starts before its predecessor
/// completes. All tracked values are zero while hidden and return to zero on
/// [`RewardTimeline::reset`], so a later replay starts clean.
#[derive(Debug)]
pub struct RewardTimeline {
    stage: RewardStage,
    scale: Spring,
    fade_elapsed: f32,
    count: CountUp,
    stars: [Spring; STAR_COUNT],
    stars_elapsed: f32,
}

impl Default for RewardTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl RewardTimeline {
    pub fn new() -> Self {
        Self {
            stage: RewardStage::Hidden,
            scale: Spring::new(ENTRANCE_TENSION, ENTRANCE_FRICTION),
            fade_elapsed: 0.0,
            count: CountUp::new(COUNT_SECS),
            stars: [
                Spring::new(STAR_TENSION, STAR_FRICTION),
                Spring::new(STAR_TENSION, STAR_FRICTION),
                Spring::new(STAR_TENSION, STAR_FRICTION),
            ],
            stars_elapsed: 0.0,
        }
    }

    /// Starts the sequence for a fresh celebration.
    pub fn begin(&mut self, points: u32) {
        self.reset();
        self.stage = RewardStage::Entrance;
        self.scale.set_target(1.0);
        self.count.set_target(points);
    }

    /// Returns every tracked value to zero and hides the timeline.
    pub fn reset(&mut self) {
        self.stage = RewardStage::Hidden;
        self.scale.reset();
        self.fade_elapsed = 0.0;
        self.count.reset();
        for star in &mut self.stars {
            star.reset();
        }
        self.stars_elapsed = 0.0;
    }

    pub fn tick(&mut self, dt: f32) {
        match self.stage {
            RewardStage::Hidden | RewardStage::Settled => {}
            RewardStage::Entrance => {
                self.fade_elapsed = (self.fade_elapsed + dt).min(FADE_SECS);
                self.scale.tick(dt);
                if self.fade_elapsed >= FADE_SECS && self.scale.is_settled() {
                    self.stage = RewardStage::CountUp;
                }
            }
            RewardStage::CountUp => {
                self.count.tick(dt);
                if self.count.done() {
                    self.stage = RewardStage::Stars;
                    self.stars_elapsed = 0.0;
                    for star in &mut self.stars {
                        star.set_target(1.0);
                    }
                }
            }
            RewardStage::Stars => {
                let before = self.stars_elapsed;
                let after = before + dt;
                for (i, star) in self.stars.iter_mut().enumerate() {
                    let start = i as f32 * STAR_STAGGER_SECS;
                    let local_dt = after - start.max(before);
                    if local_dt > 0.0 {
                        star.tick(local_dt);
                    }
                }
                self.stars_elapsed = after;
                if self.stars.iter().all(Spring::is_settled) {
                    self.stage = RewardStage::Settled;
                }
            }
        }
    }

    pub fn stage(&self) -> RewardStage {
        self.stage
    }

    pub fn is_visible(&self) -> bool {
        self.stage != RewardStage::Hidden
    }

    pub fn is_settled(&self) -> bool {
        self.stage == RewardStage::Settled
    }

    /// Card scale, 0 while hidden, springing to 1 during the entrance.
    pub fn scale(&self) -> f32 {
        self.scale.value().max(0.0)
    }

    /// Overlay opacity, 0 while hidden, 1 once the fade completes.
    pub fn opacity(&self) -> f32 {
        (self.fade_elapsed / FADE_SECS).clamp(0.0, 1.0)
    }

    /// The number currently shown by the points counter.
    pub fn points_shown(&self) -> u32 {
        self.count.value()
    }

    /// Reveal progress of one star, 0 before its turn, springing to 1.
    pub fn star_progress(&self, index: usize) -> f32 {
        self.stars
            .get(index)
            .map(|s| s.value().max(0.0))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;
    /// Generous upper bound on ticks before an assertion gives up.
    const MAX_TICKS: usize = 2_000;

    fn tick_until(timeline: &mut RewardTimeline, stage: RewardStage) -> usize {
        for n in 0..MAX_TICKS {
            if timeline.stage() == stage {
                return n;
            }
            timeline.tick(DT);
        }
        panic!("never reached {stage:?}, stuck in {:?}", timeline.stage());
    }

    #[test]
    fn spring_converges_and_settles() {
        let mut spring = Spring::new(ENTRANCE_TENSION, ENTRANCE_FRICTION);
        spring.set_target(1.0);

        for _ in 0..MAX_TICKS {
            if spring.is_settled() {
                break;
            }
            spring.tick(DT);
        }

        assert!(spring.is_settled());
        assert!((spring.value() - 1.0).abs() < 0.01);
    }

    #[test]
    fn spring_survives_a_long_frame() {
        let mut spring = Spring::new(STAR_TENSION, STAR_FRICTION);
        spring.set_target(1.0);

        // One five-second frame must not explode the integration.
        spring.tick(5.0);

        assert!(spring.value().is_finite());
        assert!((spring.value() - 1.0).abs() < 0.01);
    }

    #[test]
    fn count_up_is_linear_and_clamped() {
        let mut count = CountUp::new(1.0);
        count.set_target(20);

        assert_eq!(count.value(), 0);
        count.tick(0.5);
        assert_eq!(count.value(), 10);
        count.tick(10.0);
        assert_eq!(count.value(), 20);
        assert!(count.done());
    }

    #[test]
    fn hidden_timeline_tracks_all_zeros() {
        let mut timeline = RewardTimeline::new();

        assert_eq!(timeline.stage(), RewardStage::Hidden);
        assert_eq!(timeline.scale(), 0.0);
        assert_eq!(timeline.opacity(), 0.0);
        assert_eq!(timeline.points_shown(), 0);
        for i in 0..STAR_COUNT {
            assert_eq!(timeline.star_progress(i), 0.0);
        }

        // Ticking while hidden changes nothing.
        timeline.tick(1.0);
        assert_eq!(timeline.stage(), RewardStage::Hidden);
        assert_eq!(timeline.scale(), 0.0);
    }

    #[test]
    fn stages_run_strictly_in_order() {
        let mut timeline = RewardTimeline::new();
        timeline.begin(20);

        // During the entrance neither the counter nor the stars move.
        while timeline.stage() == RewardStage::Entrance {
            assert_eq!(timeline.points_shown(), 0);
            assert_eq!(timeline.star_progress(0), 0.0);
            timeline.tick(DT);
        }
        assert_eq!(timeline.stage(), RewardStage::CountUp);
        assert_eq!(timeline.opacity(), 1.0);
        assert!((timeline.scale() - 1.0).abs() < 0.01);

        // During the count-up the stars still wait.
        while timeline.stage() == RewardStage::CountUp {
            assert_eq!(timeline.star_progress(0), 0.0);
            timeline.tick(DT);
        }
        assert_eq!(timeline.stage(), RewardStage::Stars);
        assert_eq!(timeline.points_shown(), 20);
    }

    #[test]
    fn stars_reveal_staggered() {
        let mut timeline = RewardTimeline::new();
        timeline.begin(15);
        tick_until(&mut timeline, RewardStage::Stars);

        // 150 ms into the stage: the first star moved, the second barely
        // started, the third has not.
        let mut elapsed = 0.0;
        while elapsed < 0.15 {
            timeline.tick(DT);
            elapsed += DT;
        }
        assert!(timeline.star_progress(0) > timeline.star_progress(1));
        assert!(timeline.star_progress(1) > timeline.star_progress(2));
        assert_eq!(timeline.star_progress(2), 0.0);

        tick_until(&mut timeline, RewardStage::Settled);
        for i in 0..STAR_COUNT {
            assert!((timeline.star_progress(i) - 1.0).abs() < 0.01);
        }
    }

    #[test]
    fn terminal_values_after_full_run() {
        let mut timeline = RewardTimeline::new();
        timeline.begin(15);
        tick_until(&mut timeline, RewardStage::Settled);

        assert!(timeline.is_settled());
        assert_eq!(timeline.opacity(), 1.0);
        assert!((timeline.scale() - 1.0).abs() < 0.01);
        assert_eq!(timeline.points_shown(), 15);

        // Settled is terminal.
        timeline.tick(10.0);
        assert_eq!(timeline.stage(), RewardStage::Settled);
    }

    #[test]
    fn reset_returns_every_value_to_zero() {
        let mut timeline = RewardTimeline::new();
        timeline.begin(20);
        tick_until(&mut timeline, RewardStage::Settled);

        timeline.reset();

        assert_eq!(timeline.stage(), RewardStage::Hidden);
        assert_eq!(timeline.scale(), 0.0);
        assert_eq!(timeline.opacity(), 0.0);
        assert_eq!(timeline.points_shown(), 0);
        for i in 0..STAR_COUNT {
            assert_eq!(timeline.star_progress(i), 0.0);
        }

        // Replay starts clean.
        timeline.begin(5);
        assert_eq!(timeline.stage(), RewardStage::Entrance);
        assert_eq!(timeline.points_shown(), 0);
        tick_until(&mut timeline, RewardStage::Settled);
        assert_eq!(timeline.points_shown(), 5);
    }
}
