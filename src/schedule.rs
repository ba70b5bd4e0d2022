use std::fmt;
use std::time::Duration;

pub const VERTEX_SHADER_FILE: &str = "simplex.vert";

/// One benchmark stage: simplex noise of a given dimensionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub dimensions: u8,
}

impl Stage {
    pub const fn new(dimensions: u8) -> Self {
        Self { dimensions }
    }

    pub fn fragment_file(&self) -> String {
        format!("simplex{}d.frag", self.dimensions)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D simplex noise", self.dimensions)
    }
}

pub const DEFAULT_STAGES: [Stage; 3] = [Stage::new(2), Stage::new(3), Stage::new(4)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Stay,
    Advance { finished: Stage, next: Stage },
    Finish { finished: Stage },
}

/// Runs each stage for a fixed duration, back to back.
#[derive(Debug, Clone)]
pub struct Schedule {
    stages: Vec<Stage>,
    stage_duration: Duration,
    current: usize,
    done: bool,
}

impl Schedule {
    pub fn new(stages: impl IntoIterator<Item = Stage>, stage_duration: Duration) -> Self {
        let stages: Vec<Stage> = stages.into_iter().collect();
        Self {
            done: stages.is_empty(),
            stages,
            stage_duration,
            current: 0,
        }
    }

    pub fn current(&self) -> Option<Stage> {
        if self.done {
            None
        } else {
            self.stages.get(self.current).copied()
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Checks `elapsed` (time since the benchmark started) against the end of the
    /// running stage. Moves at most one stage forward per call.
    pub fn poll(&mut self, elapsed: Duration) -> Step {
        if self.done {
            return Step::Stay;
        }
        // A stage end past what Duration can hold is never reached.
        let Some(stage_end) = u32::try_from(self.current + 1)
            .ok()
            .and_then(|n| self.stage_duration.checked_mul(n))
        else {
            return Step::Stay;
        };
        if elapsed <= stage_end {
            return Step::Stay;
        }

        let finished = self.stages[self.current];
        self.current += 1;
        match self.stages.get(self.current) {
            Some(&next) => Step::Advance { finished, next },
            None => {
                self.done = true;
                Step::Finish { finished }
            }
        }
    }
}
