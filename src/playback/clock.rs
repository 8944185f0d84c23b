/// Advances a playback cursor through track time.
///
/// Wall-clock deltas are accumulated and converted into whole ticks of
/// `tick_len_ms`, each scaled by `speed`, so playback progresses in fixed
/// quanta regardless of how often the host calls `advance`.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    start: i64,
    end: i64,
    cursor: i64,
    tick_len_ms: u64,
    speed: f64,
    accumulator: f64,
}

impl PlaybackClock {
    pub fn new(start: i64, end: i64, tick_len_ms: u64, speed: f64) -> Self {
        let end = end.max(start);
        Self {
            start,
            end,
            cursor: start,
            tick_len_ms: tick_len_ms.max(1),
            speed: if speed > 0.0 { speed } else { 1.0 },
            accumulator: 0.0,
        }
    }

    /// Clock over an empty time range; never advances.
    pub fn empty() -> Self {
        Self::new(0, 0, 250, 1.0)
    }

    /// Feeds `delta_ms` of wall-clock time into the clock, moving the
    /// cursor forward by whole ticks. The cursor saturates at the end of
    /// the range.
    pub fn advance(&mut self, delta_ms: f64) {
        if delta_ms <= 0.0 || self.at_end() {
            return;
        }

        self.accumulator += delta_ms;
        let tick = self.tick_len_ms as f64;
        while self.accumulator >= tick {
            self.accumulator -= tick;
            let step = (tick * self.speed) as i64;
            self.cursor = (self.cursor + step).min(self.end);
            if self.at_end() {
                self.accumulator = 0.0;
                break;
            }
        }
    }

    pub fn set_speed(&mut self, speed: f64) {
        if speed > 0.0 {
            self.speed = speed;
        }
    }

    pub fn set_tick_len(&mut self, tick_len_ms: u64) {
        self.tick_len_ms = tick_len_ms.max(1);
    }

    /// Moves the cursor to `t`, clamped into the clock's range.
    pub fn seek(&mut self, t: i64) {
        self.cursor = t.clamp(self.start, self.end);
        self.accumulator = 0.0;
    }

    pub fn rewind(&mut self) {
        self.seek(self.start);
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn at_end(&self) -> bool {
        self.cursor >= self.end
    }

    /// Fraction of the range already played, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let span = self.end - self.start;
        if span <= 0 {
            return 1.0;
        }
        (self.cursor - self.start) as f64 / span as f64
    }
}
