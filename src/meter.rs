use std::time::Duration;

/// How often a new figure is produced.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    pub fps: f64,
    pub msamples_per_sec: f64,
}

/// Frames-per-second and fragment throughput, recomputed once per interval.
///
/// Sample counts assume one fragment per pixel, i.e. no multisampling.
#[derive(Debug, Default)]
pub struct ThroughputMeter {
    window_start: Option<Duration>,
    frames: u32,
    last: Option<Throughput>,
}

impl ThroughputMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one frame at `elapsed`. Returns a fresh figure when the interval closes.
    pub fn tick(&mut self, elapsed: Duration, pixels: u64) -> Option<Throughput> {
        let start = match self.window_start {
            Some(start) => start,
            None => {
                self.window_start = Some(elapsed);
                self.frames = 1;
                return None;
            }
        };

        let interval = elapsed.saturating_sub(start);
        if interval <= REPORT_INTERVAL {
            self.frames += 1;
            return None;
        }

        let fps = f64::from(self.frames) / interval.as_secs_f64();
        let report = Throughput {
            fps,
            msamples_per_sec: 1e-6 * fps * pixels as f64,
        };
        self.last = Some(report);
        self.window_start = Some(elapsed);
        self.frames = 1;
        Some(report)
    }

    pub fn last(&self) -> Option<Throughput> {
        self.last
    }

    /// Latest Msamples/s, zero until the first interval closed.
    pub fn current(&self) -> f64 {
        self.last.map_or(0.0, |t| t.msamples_per_sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn first_frame_only_starts_the_window() {
        let mut meter = ThroughputMeter::new();
        assert_eq!(meter.tick(ms(0), 100), None);
        assert_eq!(meter.current(), 0.0);
        assert_eq!(meter.last(), None);
    }

    #[test]
    fn reports_after_more_than_a_second() {
        let mut meter = ThroughputMeter::new();
        // 100 frames 10ms apart, then one more past the one-second mark.
        for i in 0..=100 {
            assert_eq!(meter.tick(ms(i * 10), 1920 * 1080), None);
        }
        let report = meter.tick(ms(1250), 1920 * 1080).unwrap();
        assert!((report.fps - 101.0 / 1.25).abs() < 1e-9);
        let expected = 1e-6 * report.fps * (1920.0 * 1080.0);
        assert!((report.msamples_per_sec - expected).abs() < 1e-9);
        assert_eq!(meter.current(), report.msamples_per_sec);
    }

    #[test]
    fn exactly_one_second_is_not_enough() {
        let mut meter = ThroughputMeter::new();
        meter.tick(ms(0), 1);
        assert_eq!(meter.tick(ms(1000), 1), None);
        assert!(meter.tick(ms(1001), 1).is_some());
    }

    #[test]
    fn closing_frame_opens_the_next_window() {
        let mut meter = ThroughputMeter::new();
        meter.tick(ms(0), 10);
        let first = meter.tick(ms(2000), 10).unwrap();
        assert!((first.fps - 0.5).abs() < 1e-9);

        meter.tick(ms(2500), 10);
        meter.tick(ms(3000), 10);
        let second = meter.tick(ms(4000), 10).unwrap();
        // frames at 2000, 2500 and 3000 over two seconds
        assert!((second.fps - 1.5).abs() < 1e-9);
    }

    #[test]
    fn keeps_the_last_figure_between_reports() {
        let mut meter = ThroughputMeter::new();
        meter.tick(ms(0), 1_000_000);
        let report = meter.tick(ms(1100), 1_000_000).unwrap();
        meter.tick(ms(1200), 1_000_000);
        assert_eq!(meter.last(), Some(report));
        assert_eq!(meter.current(), report.msamples_per_sec);
    }
}
