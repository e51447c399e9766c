//! Fixed-cadence game clock using an accumulator pattern.
//!
//! `draw_web()` calls at ~60fps with variable delta. [`GameClock`] turns the
//! wall clock into two fixed cadences: accumulation ticks (100ms) and spell
//! expiry sweeps (1000ms). Game logic only ever sees discrete pulses, which
//! keeps it deterministic and fully testable.

/// Longest frame delta honoured. Anything larger (tab was backgrounded) is
/// clamped so the game does not replay minutes of ticks in one frame.
const MAX_FRAME_DELTA_MS: f64 = 2_000.0;

/// One fixed-period accumulator.
#[derive(Debug, Clone)]
struct Interval {
    period_ms: f64,
    accumulator: f64,
}

impl Interval {
    fn new(period_ms: u32) -> Self {
        Self {
            period_ms: f64::from(period_ms.max(1)),
            accumulator: 0.0,
        }
    }

    fn feed(&mut self, delta_ms: f64) -> u32 {
        self.accumulator += delta_ms;
        let pulses = (self.accumulator / self.period_ms) as u32;
        self.accumulator -= f64::from(pulses) * self.period_ms;
        pulses
    }
}

/// Pulses produced by one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pulses {
    /// Accumulation ticks to run.
    pub ticks: u32,
    /// Expiry sweeps to run.
    pub sweeps: u32,
}

pub struct GameClock {
    tick: Interval,
    sweep: Interval,
    /// Total accumulation ticks since creation.
    pub total_ticks: u64,
    last_timestamp: Option<f64>,
}

impl GameClock {
    pub fn new(tick_ms: u32, sweep_ms: u32) -> Self {
        Self {
            tick: Interval::new(tick_ms),
            sweep: Interval::new(sweep_ms),
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed the wall-clock timestamp of the current frame.
    pub fn update(&mut self, now_ms: f64) -> Pulses {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        let pulses = Pulses {
            ticks: self.tick.feed(delta),
            sweeps: self.sweep.feed(delta),
        };
        self.total_ticks += u64::from(pulses.ticks);
        pulses
    }
}

/// Wall-clock milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Wall-clock milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Hour of the day (0..24) on the player's clock.
#[cfg(target_arch = "wasm32")]
pub fn local_hour() -> u32 {
    js_sys::Date::new_0().get_hours()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn local_hour() -> u32 {
    use chrono::Timelike;
    chrono::Local::now().hour()
}

/// Convert epoch milliseconds into a UTC timestamp for stored records.
pub fn to_datetime(ms: f64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::from_timestamp_millis(ms as i64).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_returns_no_pulses() {
        let mut c = GameClock::new(100, 1000);
        assert_eq!(c.update(0.0), Pulses::default());
    }

    #[test]
    fn one_tick_at_100ms() {
        let mut c = GameClock::new(100, 1000);
        c.update(0.0);
        assert_eq!(c.update(100.0), Pulses { ticks: 1, sweeps: 0 });
        assert_eq!(c.total_ticks, 1);
    }

    #[test]
    fn sweep_every_second() {
        let mut c = GameClock::new(100, 1000);
        c.update(0.0);
        let mut sweeps = 0;
        let mut ticks = 0;
        for i in 1..=25 {
            let p = c.update(i as f64 * 100.0);
            ticks += p.ticks;
            sweeps += p.sweeps;
        }
        assert_eq!(ticks, 25);
        assert_eq!(sweeps, 2);
    }

    #[test]
    fn remainder_carried_over() {
        let mut c = GameClock::new(100, 1000);
        c.update(0.0);
        assert_eq!(c.update(150.0).ticks, 1);
        assert_eq!(c.update(200.0).ticks, 1); // 50ms leftover + 50ms
        assert_eq!(c.total_ticks, 2);
    }

    #[test]
    fn clamp_large_delta() {
        let mut c = GameClock::new(100, 1000);
        c.update(0.0);
        // 60 second gap → clamped to 2 seconds
        assert_eq!(c.update(60_000.0), Pulses { ticks: 20, sweeps: 2 });
    }

    #[test]
    fn backwards_clock_is_ignored() {
        let mut c = GameClock::new(100, 1000);
        c.update(1_000.0);
        assert_eq!(c.update(500.0), Pulses::default());
        assert_eq!(c.update(600.0).ticks, 1);
    }

    #[test]
    fn steady_60fps() {
        let mut c = GameClock::new(100, 1000);
        c.update(0.0);
        let mut total = 0u32;
        for i in 1..=60 {
            total += c.update(i as f64 * 16.667).ticks;
        }
        assert!((9..=11).contains(&total), "expected ~10 ticks, got {}", total);
    }

    #[test]
    fn to_datetime_epoch() {
        assert_eq!(to_datetime(0.0).timestamp(), 0);
        assert_eq!(to_datetime(1_500.0).timestamp_millis(), 1_500);
    }
}
