pub const MAX_OUTPUT_LINES: usize = 1000;
pub const BLINK_INTERVAL_MS: u64 = 500;
pub const POLL_INTERVAL_MS: u64 = 50;

pub mod prefixes {
    pub const YOU: &str = "YOU>";
    pub const BOT: &str = "BOT>";
    pub const SYS: &str = "SYS>";
    pub const ASR: &str = "ASR>";
    pub const WARN: &str = "WARN>";
}

pub mod messages {
    pub const NO_AUDIO: &str = "no audio captured";
    pub const RECORDING_CANCELLED: &str = "recording cancelled";
    pub const NEW_CHAT: &str = "new chat started";
}
