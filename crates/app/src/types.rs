use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Idle,
    Recording,
    Transcribing,
    Answering,
}

#[derive(Debug, Clone, Copy)]
pub enum ScrollDirection {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

pub struct RecordingState {
    pub is_active: bool,
    pub started_at: Option<Instant>,
    pub blink_state: bool,
    pub last_blink: Instant,
}

impl RecordingState {
    pub fn new() -> Self {
        Self {
            is_active: false,
            started_at: None,
            blink_state: false,
            last_blink: Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.is_active = true;
        self.started_at = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        self.is_active = false;
        self.started_at = None;
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.started_at
            .map(|start| start.elapsed().as_secs())
            .unwrap_or(0)
    }
}

impl Default for RecordingState {
    fn default() -> Self {
        Self::new()
    }
}
