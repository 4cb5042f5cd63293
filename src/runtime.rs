//! Timer scheduling that drives the simulation from wall-clock time
//!
//! Two fixed-interval tasks feed one serializing queue: the movement
//! tick, whose interval depends on speed-relevant state, and the faster
//! animation tick that prunes popups and expires combos. External
//! intents (input, purchases) enter the same queue stamped with their
//! arrival time, and everything is applied to the simulation in
//! timestamp order, so a multi-threaded host could drive this without
//! interleaved writes.
//!
//! The movement timer is retuned after every applied event. Deadlines
//! carry the timer's generation, so a deadline computed under an old
//! interval is simply stale and can never double-step the simulation.

use std::collections::VecDeque;

use crate::consts::ANIM_TICK_MS;
use crate::sim::{Event, GameState, Simulation, effective_tick_ms};

/// Events applied per `advance` call before the timers snap forward.
/// Guards against unbounded catch-up after the host clock jumps.
const MAX_EVENTS_PER_ADVANCE: usize = 256;

/// A repeating deadline with generation-based invalidation.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimer {
    interval_ms: u64,
    next_fire_ms: u64,
    generation: u32,
}

impl FixedTimer {
    pub fn new(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            interval_ms,
            next_fire_ms: now_ms + interval_ms,
            generation: 0,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Deadline of the next fire under the current generation.
    pub fn next_fire_ms(&self) -> u64 {
        self.next_fire_ms
    }

    pub fn due(&self, now_ms: u64) -> bool {
        self.next_fire_ms <= now_ms
    }

    /// Consume the pending deadline and schedule the next one.
    /// Returns the timestamp the fire belongs to.
    pub fn fire(&mut self) -> u64 {
        let at = self.next_fire_ms;
        self.next_fire_ms += self.interval_ms;
        at
    }

    /// Adopt a new interval. The old deadline becomes stale (a new
    /// generation starts counting from `now_ms`), so an interval change
    /// never double-steps. No-op when the interval is unchanged.
    pub fn reschedule(&mut self, interval_ms: u64, now_ms: u64) {
        if interval_ms == self.interval_ms {
            return;
        }
        self.interval_ms = interval_ms;
        self.next_fire_ms = now_ms + interval_ms;
        self.generation += 1;
        log::debug!(
            "timer rescheduled to {} ms (generation {})",
            interval_ms,
            self.generation
        );
    }

    /// Drop any backlog and count from `now_ms`.
    pub fn snap_to(&mut self, now_ms: u64) {
        self.next_fire_ms = now_ms + self.interval_ms;
    }
}

/// Drives a `Simulation` from a caller-supplied millisecond clock.
#[derive(Debug, Clone)]
pub struct GameLoop {
    sim: Simulation,
    sim_timer: FixedTimer,
    anim_timer: FixedTimer,
    queue: VecDeque<(u64, Event)>,
}

impl GameLoop {
    pub fn new(seed: u64, now_ms: u64) -> Self {
        Self::with_simulation(Simulation::new(seed, now_ms), now_ms)
    }

    pub fn with_simulation(sim: Simulation, now_ms: u64) -> Self {
        let interval = effective_tick_ms(sim.state());
        Self {
            sim,
            sim_timer: FixedTimer::new(interval, now_ms),
            anim_timer: FixedTimer::new(ANIM_TICK_MS, now_ms),
            queue: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        self.sim.state()
    }

    #[cfg(test)]
    pub(crate) fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    /// Queue an external intent, stamped with its arrival time.
    pub fn push(&mut self, event: Event, now_ms: u64) {
        self.queue.push_back((now_ms, event));
    }

    /// Apply everything due up to `now_ms` in timestamp order and
    /// return the resulting snapshot.
    pub fn advance(&mut self, now_ms: u64) -> &GameState {
        for applied in 0.. {
            if applied >= MAX_EVENTS_PER_ADVANCE {
                log::warn!("clock jump: dropping tick backlog");
                self.sim_timer.snap_to(now_ms);
                self.anim_timer.snap_to(now_ms);
                break;
            }

            let external = self
                .queue
                .front()
                .map(|(ts, _)| *ts)
                .filter(|ts| *ts <= now_ms);
            let sim_due = self.sim_timer.due(now_ms).then(|| self.sim_timer.next_fire_ms());
            let anim_due = self
                .anim_timer
                .due(now_ms)
                .then(|| self.anim_timer.next_fire_ms());

            // Earliest timestamp wins; an input that arrived before a
            // tick deadline must be buffered before that tick consumes
            // the buffer
            let next = [external, anim_due, sim_due]
                .into_iter()
                .flatten()
                .min();
            let Some(next_ts) = next else { break };

            if external == Some(next_ts) {
                let (ts, event) = self.queue.pop_front().unwrap_or((next_ts, Event::AnimTick));
                self.sim.apply(event, ts);
            } else if anim_due == Some(next_ts) {
                let ts = self.anim_timer.fire();
                self.sim.apply(Event::AnimTick, ts);
            } else {
                let ts = self.sim_timer.fire();
                self.sim.apply(Event::Tick, ts);
            }
            self.retune(next_ts);
        }
        self.sim.state()
    }

    /// Re-derive the movement interval from the snapshot. Invalidates
    /// the pending deadline when a speed-relevant change landed.
    fn retune(&mut self, now_ms: u64) {
        let interval = effective_tick_ms(self.sim.state());
        self.sim_timer.reschedule(interval, now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Direction, GamePhase, PowerUpKind, SnakeId};
    use glam::IVec2;

    #[test]
    fn test_timer_fires_on_interval() {
        let mut timer = FixedTimer::new(200, 0);
        assert!(!timer.due(199));
        assert!(timer.due(200));
        assert_eq!(timer.fire(), 200);
        assert_eq!(timer.next_fire_ms(), 400);
    }

    #[test]
    fn test_reschedule_invalidates_stale_deadline() {
        let mut timer = FixedTimer::new(200, 0);
        timer.fire(); // next deadline 400
        timer.reschedule(300, 250);
        assert_eq!(timer.generation(), 1);
        // The old 400 ms deadline is gone; nothing fires before 550
        assert!(!timer.due(400));
        assert!(!timer.due(549));
        assert!(timer.due(550));
    }

    #[test]
    fn test_reschedule_same_interval_is_noop() {
        let mut timer = FixedTimer::new(200, 0);
        timer.reschedule(200, 150);
        assert_eq!(timer.generation(), 0);
        assert!(timer.due(200));
    }

    #[test]
    fn test_loop_runs_ticks_at_base_cadence() {
        let mut game = GameLoop::new(7, 0);
        game.push(Event::Start, 0);
        game.advance(1000);
        // 200 ms ticks over one second
        assert_eq!(game.state().ticks, 5);
        assert_eq!(game.state().phase, GamePhase::Running);
    }

    #[test]
    fn test_input_applies_before_later_tick() {
        let mut game = GameLoop::new(7, 0);
        game.push(Event::Start, 0);
        game.advance(250);
        assert_eq!(game.state().snakes[0].head(), IVec2::new(11, 10));
        // Arrives at 250, between the 200 ms and 400 ms deadlines
        game.push(
            Event::SetDirection {
                snake: SnakeId::One,
                direction: Direction::Up,
            },
            250,
        );
        game.advance(400);
        assert_eq!(game.state().snakes[0].head(), IVec2::new(11, 9));
    }

    #[test]
    fn test_speed_change_retunes_without_double_step() {
        let mut game = GameLoop::new(7, 0);
        game.push(Event::Start, 0);
        game.advance(400);
        assert_eq!(game.state().ticks, 2);
        // A SpeedBoost lands mid-window; the next anim tick retunes the
        // movement timer to 100 ms counted from that moment
        game.simulation_mut()
            .state_mut()
            .snakes[0]
            .refresh_effect(PowerUpKind::SpeedBoost, 1000);
        game.advance(500); // anim tick at 500 triggers the retune
        let ticks_before = game.state().ticks;
        game.advance(1000);
        // 100 ms cadence from 500 ms: deadlines at 600..=1000
        assert_eq!(game.state().ticks, ticks_before + 5);
    }

    #[test]
    fn test_clock_jump_drops_backlog() {
        let mut game = GameLoop::new(7, 0);
        game.push(Event::Start, 0);
        // Far more deadlines than the per-advance cap
        game.advance(10_000_000);
        let ticks = game.state().ticks;
        assert!(ticks <= MAX_EVENTS_PER_ADVANCE as u64);
        // The backlog is gone: a short further advance adds little
        game.advance(10_000_000 + 1000);
        assert!(game.state().ticks <= ticks + 6);
    }

    #[test]
    fn test_anim_tick_prunes_between_sim_ticks() {
        let mut game = GameLoop::new(7, 0);
        game.simulation_mut()
            .state_mut()
            .push_xp_popup(IVec2::new(1, 1), 10, false);
        game.advance(crate::consts::POPUP_TTL_MS + ANIM_TICK_MS);
        assert!(game.state().xp_popups.is_empty());
    }

    #[test]
    fn test_loop_is_deterministic() {
        let mut a = GameLoop::new(99, 0);
        let mut b = GameLoop::new(99, 0);
        for game in [&mut a, &mut b] {
            game.push(Event::Start, 0);
            game.push(
                Event::SetDirection {
                    snake: SnakeId::One,
                    direction: Direction::Down,
                },
                450,
            );
            game.advance(2000);
        }
        assert_eq!(a.state().score, b.state().score);
        assert_eq!(a.state().snakes[0].segments, b.state().snakes[0].segments);
        assert_eq!(a.state().food, b.state().food);
    }
}
