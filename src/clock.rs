use instant::{Duration, Instant};

/// Timing snapshot taken once per frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameTime {
    /// Time since the clock was started.
    pub elapsed: Duration,
    /// Time since the previous tick.
    pub dt: Duration,
    pub now: Instant,
    pub frame_index: u64,
}

/// Monotonic clock for the render loop.
///
/// Delta time is capped so a stalled tab or a debugger pause does not hand a
/// multi-second step to scene updates.
#[derive(Clone, Debug)]
pub struct Clock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_max: Duration,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_max: Duration::from_millis(250),
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now.duration_since(self.last).min(self.dt_max);
        self.last = now;
        let frame = FrameTime {
            elapsed: now.duration_since(self.start),
            dt,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index += 1;
        frame
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
