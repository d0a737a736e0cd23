//! Per-frame pathfinding metrics for the coordinator.

use std::collections::VecDeque;
use std::time::Instant;

const WINDOW: usize = 120;

/// Tracks how long the coordinator's frame body takes and how many actors
/// were pursuing a goal.
#[derive(Debug)]
pub struct FrameMetrics {
    frame_start: Option<Instant>,
    frame_times_ms: VecDeque<f64>,
    last_pathfinding_time_ms: f64,
    active_pathfinding_count: usize,
    frames: u64,
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self {
            frame_start: None,
            frame_times_ms: VecDeque::with_capacity(WINDOW),
            last_pathfinding_time_ms: 0.0,
            active_pathfinding_count: 0,
            frames: 0,
        }
    }

    /// Call at the start of each frame. Resets the active counter.
    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
        self.active_pathfinding_count = 0;
    }

    /// Count one actor that still has a goal after its update.
    pub fn record_active_path(&mut self) {
        self.active_pathfinding_count += 1;
    }

    /// Call at the end of each frame.
    pub fn end_frame(&mut self) {
        let Some(start) = self.frame_start.take() else {
            return;
        };
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.last_pathfinding_time_ms = elapsed_ms;
        self.frame_times_ms.push_back(elapsed_ms);
        if self.frame_times_ms.len() > WINDOW {
            self.frame_times_ms.pop_front();
        }
        self.frames += 1;
    }

    pub fn last_pathfinding_time_ms(&self) -> f64 {
        self.last_pathfinding_time_ms
    }

    pub fn active_pathfinding_count(&self) -> usize {
        self.active_pathfinding_count
    }

    /// Frames completed since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Average frame time in milliseconds (over the last 120 frames).
    pub fn avg_pathfinding_time_ms(&self) -> f64 {
        if self.frame_times_ms.is_empty() {
            return 0.0;
        }
        self.frame_times_ms.iter().sum::<f64>() / self.frame_times_ms.len() as f64
    }

    /// Worst frame time in the window.
    pub fn max_pathfinding_time_ms(&self) -> f64 {
        self.frame_times_ms.iter().copied().fold(0.0, f64::max)
    }
}
