use std::time::Duration;

use tokio::sync::mpsc;

use crate::backend;
use crate::constants::{self, messages, prefixes};
use crate::events::AppEvent;
use crate::logger;
use crate::session::Session;
use crate::types::{Mode, RecordingState, ScrollDirection};

pub struct App {
    pub output: Vec<String>,
    pub input: String,
    pub mode: Mode,
    pub recording: RecordingState,
    pub session: Session,
    /// Lines scrolled up from the bottom of the transcript.
    pub scroll_offset: usize,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            output: Vec::new(),
            input: String::new(),
            mode: Mode::Idle,
            recording: RecordingState::new(),
            session: Session::new(),
            scroll_offset: 0,
            events_tx,
            events_rx,
        }
    }

    pub fn append_output(&mut self, line: String) {
        self.output.push(line);
        self.trim_output();
        self.scroll_offset = 0;
    }

    fn trim_output(&mut self) {
        if self.output.len() > constants::MAX_OUTPUT_LINES {
            self.output.remove(0);
        }
    }

    /// Surface a failure to the user without touching any other state.
    pub fn notify(&mut self, message: String) {
        logger::log_error("notify", &message);
        self.append_output(format!("{} {}", prefixes::WARN, message));
    }

    /// Ask the QA service to (re)load the email corpus. Failure is a
    /// notification, never fatal; the session stays usable.
    pub async fn load_corpus(&mut self) {
        match backend::load_corpus().await {
            Ok(info) => {
                logger::log_event("corpus", &format!("loaded {} emails", info.emails));
                self.append_output(format!(
                    "{} {} emails loaded. You can start chatting!",
                    prefixes::SYS,
                    info.emails
                ));
            }
            Err(e) => self.notify(format!("Failed to load emails: {}", e)),
        }
    }

    pub fn start_recording(&mut self) {
        if let Err(e) = backend::record_voice(true) {
            self.notify(format!("Could not open microphone: {}", e));
            return;
        }
        self.mode = Mode::Recording;
        self.recording.start();
        self.append_output(format!("{} Recording started...", prefixes::ASR));
    }

    /// Stop capturing and hand transcription to a background task. The
    /// result comes back through the event channel; nothing here waits.
    pub fn stop_recording(&mut self) {
        self.recording.stop();

        let audio = match backend::take_recorded_audio() {
            Ok(audio) => audio,
            Err(e) => {
                self.notify(format!("Recording failed: {}", e));
                self.mode = Mode::Idle;
                return;
            }
        };

        if audio.is_empty() {
            self.append_output(format!("{} {}", prefixes::ASR, messages::NO_AUDIO));
            self.mode = Mode::Idle;
            return;
        }

        self.mode = Mode::Transcribing;
        self.append_output(format!("{} Processing audio...", prefixes::ASR));

        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = match backend::voice_to_text(audio).await {
                Ok(text) => AppEvent::Transcript(text),
                Err(e) => AppEvent::TranscriptFailed(e),
            };
            let _ = tx.send(event);
        });
    }

    pub fn cancel_recording(&mut self) {
        if self.mode != Mode::Recording {
            return;
        }
        let _ = backend::record_voice(false);
        let _ = backend::take_recorded_audio();
        self.recording.stop();
        self.mode = Mode::Idle;
        self.append_output(format!("{} {}", prefixes::ASR, messages::RECORDING_CANCELLED));
    }

    /// Drain background-task results. Called once per loop tick.
    pub async fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event).await;
        }
    }

    async fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Transcript(text) => {
                self.append_output(format!("{} Transcribed: {}", prefixes::ASR, text));
                self.mode = Mode::Idle;
                self.input = text;
                self.submit_input().await;
            }
            AppEvent::TranscriptFailed(e) => {
                self.notify(format!("Transcription failed: {}", e));
                self.mode = Mode::Idle;
            }
            AppEvent::SpeechFailed(e) => {
                self.notify(format!("Speech playback failed: {}", e));
            }
        }
    }

    /// Send whatever is in the input buffer as a question.
    pub async fn submit_input(&mut self) {
        let query = self.input.trim().to_string();
        if query.is_empty() {
            return;
        }
        self.append_output(format!("{} {}", prefixes::YOU, query));
        self.input.clear();
        self.ask(&query).await;
    }

    /// One question-answer round. History is forwarded only when the
    /// session is continuing, and updated only on success.
    async fn ask(&mut self, query: &str) {
        self.mode = Mode::Answering;

        let history = self.session.outgoing_history().cloned();
        match backend::answer_question(query, history).await {
            Ok((new_history, answer)) => {
                self.session.record_round(new_history);
                self.append_output(format!("{} {}", prefixes::BOT, answer));
                self.speak(answer);
            }
            Err(e) => self.notify(format!("Failed to process query: {}", e)),
        }

        self.mode = Mode::Idle;
    }

    /// Fire-and-forget speech. Blocking synthesis and playback stay off
    /// the async runtime.
    fn speak(&mut self, text: String) {
        if !backend::speech_enabled() {
            return;
        }
        let tx = self.events_tx.clone();
        std::thread::spawn(move || {
            if let Err(e) = backend::speak_text(&text) {
                let _ = tx.send(AppEvent::SpeechFailed(e.to_string()));
            }
        });
    }

    /// Start over: clear the transcript, drop conversational context, and
    /// reload the corpus.
    pub async fn new_chat(&mut self) {
        self.session.reset();
        self.output.clear();
        self.scroll_offset = 0;
        self.append_output(format!("{} {}", prefixes::SYS, messages::NEW_CHAT));
        self.load_corpus().await;
    }

    pub fn handle_scroll(&mut self, direction: ScrollDirection, amount: usize) {
        let max = self.output.len().saturating_sub(1);
        self.scroll_offset = match direction {
            ScrollDirection::Up => (self.scroll_offset + amount).min(max),
            ScrollDirection::Down => self.scroll_offset.saturating_sub(amount),
            ScrollDirection::PageUp => (self.scroll_offset + amount).min(max),
            ScrollDirection::PageDown => self.scroll_offset.saturating_sub(amount),
            ScrollDirection::Home => max,
            ScrollDirection::End => 0,
        };
    }

    pub fn update_blink(&mut self) {
        if self.recording.last_blink.elapsed()
            > Duration::from_millis(constants::BLINK_INTERVAL_MS)
        {
            self.recording.blink_state = !self.recording.blink_state;
            self.recording.last_blink = std::time::Instant::now();
        }
    }

    pub fn get_recording_time(&self) -> String {
        let elapsed = self.recording.elapsed_seconds();
        format!("{:02}:{:02}", elapsed / 60, elapsed % 60)
    }

    pub fn can_edit_input(&self) -> bool {
        self.mode == Mode::Idle
    }

    pub fn can_start_recording(&self) -> bool {
        self.mode == Mode::Idle && !self.recording.is_active
    }

    pub fn can_stop_recording(&self) -> bool {
        self.mode == Mode::Recording && self.recording.is_active
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
