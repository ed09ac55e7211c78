use std::path::PathBuf;
use std::sync::mpsc::TrySendError;
use std::time::Duration;

use engine::{Command, Event, SessionSnapshot};
use iced::widget::canvas;
use iced::widget::{button, column, container, row, text, text_input};
use iced::{Element, Length, Subscription, Task, time};

use crate::bridge::{BridgeEvent, EngineCommandSender, engine_subscription};
use crate::widgets::preview::PreviewImage;
use crate::widgets::{marks, preview};

/// UI messages handled by the iced app update loop.
#[derive(Debug, Clone)]
pub enum Message {
    TimestampInputChanged(String),
    AddMarkPressed,
    OpenPressed,
    OpenFileChosen(Option<PathBuf>),
    SavePressed,
    SaveFileChosen(Option<PathBuf>),
    PreviewTick,
    Bridge(BridgeEvent),
}

/// Root UI state.
pub struct AppState {
    engine_tx: Option<EngineCommandSender>,
    snapshot: Option<SessionSnapshot>,
    preview: Option<PreviewImage>,
    preview_ticks: i64,
    timestamp_input: String,
    tick_in_flight: bool,
    marks_cache: canvas::Cache,
    status: String,
}

impl AppState {
    /// Boots the app and initializes the engine bridge.
    pub fn boot() -> (Self, Task<Message>) {
        (
            Self {
                engine_tx: None,
                snapshot: None,
                preview: None,
                preview_ticks: 0,
                timestamp_input: String::new(),
                tick_in_flight: false,
                marks_cache: canvas::Cache::new(),
                status: String::from("starting engine bridge"),
            },
            Task::none(),
        )
    }

    /// Handles one UI message.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TimestampInputChanged(text) => {
                self.timestamp_input = text;
            }
            Message::AddMarkPressed => {
                let text = self.timestamp_input.trim().to_owned();
                if text.is_empty() {
                    self.status = String::from("enter a timestamp as HH:MM:SS:mmm");
                } else if self.send_command(Command::AddMark { text }) {
                    self.status = String::from("mark sent");
                }
            }
            Message::OpenPressed => {
                return pick_video_file();
            }
            Message::OpenFileChosen(Some(path)) => {
                if self.send_command(Command::Open { path: path.clone() }) {
                    self.status = format!("opening {}", path.display());
                }
            }
            Message::OpenFileChosen(None) => {}
            Message::SavePressed => {
                if self.snapshot.is_none() {
                    self.status = String::from("open a video before saving");
                } else {
                    // The preview stops as soon as saving starts, even when
                    // the dialog is later dismissed.
                    let _ = self.send_command(Command::StopPreview);
                    return pick_save_file();
                }
            }
            Message::SaveFileChosen(Some(path)) => {
                if self.send_command(Command::Export { path: path.clone() }) {
                    self.status = format!("exporting {}", path.display());
                }
            }
            Message::SaveFileChosen(None) => {}
            Message::PreviewTick => {
                self.request_preview_tick();
            }
            Message::Bridge(BridgeEvent::Ready(sender)) => {
                self.engine_tx = Some(sender);
                self.status = String::from("engine ready");
            }
            Message::Bridge(BridgeEvent::Event(event)) => {
                self.apply_engine_event(event);
            }
            Message::Bridge(BridgeEvent::Disconnected) => {
                self.status = String::from("engine event channel closed");
                self.engine_tx = None;
                self.tick_in_flight = false;
            }
        }

        Task::none()
    }

    fn send_command(&mut self, command: Command) -> bool {
        if let Some(sender) = &self.engine_tx {
            match sender.try_send(command) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    self.status = String::from("engine command queue is full");
                    false
                }
                Err(TrySendError::Disconnected(_)) => {
                    self.status = String::from("engine command channel closed");
                    self.engine_tx = None;
                    self.tick_in_flight = false;
                    false
                }
            }
        } else {
            self.status = String::from("engine is not ready");
            false
        }
    }

    fn request_preview_tick(&mut self) {
        // Timer firings that land while a decode is pending are dropped.
        if self.tick_in_flight {
            return;
        }
        if self.send_command(Command::PreviewTick) {
            self.tick_in_flight = true;
        }
    }

    fn apply_engine_event(&mut self, event: Event) {
        match event {
            Event::SourceLoaded(snapshot) => {
                self.status = format!("loaded {}", snapshot.path.display());
                self.snapshot = Some(snapshot);
                self.preview = None;
                self.preview_ticks = 0;
                self.tick_in_flight = false;
                self.marks_cache.clear();
            }
            Event::MarksChanged(snapshot) => {
                self.status = match snapshot.pending_mark_ticks {
                    Some(ticks) => {
                        format!("range start {} pending", format_timestamp(ticks))
                    }
                    None => format!("{} removal range(s) marked", snapshot.ranges.len()),
                };
                self.snapshot = Some(snapshot);
                self.timestamp_input.clear();
                self.marks_cache.clear();
            }
            Event::PreviewFrameReady { t_ticks, frame, .. } => {
                if let Some(image) = PreviewImage::from_frame(&frame) {
                    self.preview = Some(image);
                }
                self.preview_ticks = t_ticks;
                self.tick_in_flight = false;
            }
            Event::PreviewStopped => {
                if let Some(snapshot) = self.snapshot.as_mut() {
                    snapshot.playing = false;
                }
                self.tick_in_flight = false;
            }
            Event::ExportFinished { path } => {
                self.status = format!("export finished: {}", path.display());
            }
            Event::Error(error) => {
                self.status = format!("error: {}", error.message);
                self.tick_in_flight = false;
            }
        }
    }

    /// Renders the UI tree.
    pub fn view(&self) -> Element<'_, Message> {
        let input_row = row![
            text_input("HH:MM:SS:mmm", &self.timestamp_input)
                .on_input(Message::TimestampInputChanged)
                .on_submit(Message::AddMarkPressed),
            button("Add").on_press(Message::AddMarkPressed),
        ]
        .spacing(12);

        let file_row = row![
            button("Open").on_press(Message::OpenPressed),
            button("Save").on_press(Message::SavePressed),
        ]
        .spacing(12);

        column![
            container(preview::view(self.preview.as_ref()))
                .width(Length::Fill)
                .height(Length::Fill),
            marks::view(self.snapshot.as_ref(), self.preview_ticks, &self.marks_cache),
            input_row,
            file_row,
            text(format!("Status: {}", self.status)),
        ]
        .spacing(12)
        .padding(16)
        .into()
    }

    /// Subscribes to bridge events and, while the preview is running, to the
    /// frame timer derived from the source frame rate.
    pub fn subscription(&self) -> Subscription<Message> {
        let bridge = engine_subscription().map(Message::Bridge);

        match self.snapshot.as_ref().filter(|snapshot| snapshot.playing) {
            Some(snapshot) => Subscription::batch([
                bridge,
                time::every(Duration::from_millis(snapshot.tick_interval_ms))
                    .map(|_| Message::PreviewTick),
            ]),
            None => bridge,
        }
    }

    #[cfg(test)]
    fn from_sender_for_test(engine_tx: EngineCommandSender) -> Self {
        Self {
            engine_tx: Some(engine_tx),
            snapshot: None,
            preview: None,
            preview_ticks: 0,
            timestamp_input: String::new(),
            tick_in_flight: false,
            marks_cache: canvas::Cache::new(),
            status: String::from("idle"),
        }
    }
}

fn pick_video_file() -> Task<Message> {
    Task::perform(
        async {
            rfd::AsyncFileDialog::new()
                .set_title("Open Video")
                .add_filter("Video Files", &["mp4", "avi", "mov"])
                .pick_file()
                .await
                .map(|handle| handle.path().to_path_buf())
        },
        Message::OpenFileChosen,
    )
}

fn pick_save_file() -> Task<Message> {
    Task::perform(
        async {
            rfd::AsyncFileDialog::new()
                .set_title("Save Video")
                .add_filter("Video Files", &["mp4"])
                .save_file()
                .await
                .map(|handle| handle.path().to_path_buf())
        },
        Message::SaveFileChosen,
    )
}

/// Formats ticks as the same `HH:MM:SS:mmm` shape the input field takes.
fn format_timestamp(ticks: i64) -> String {
    if ticks < 0 {
        return format!("-{}", format_timestamp(ticks.saturating_abs()));
    }

    let total_millis = ticks / 1_000;
    let millis = total_millis % 1_000;
    let total_seconds = total_millis / 1_000;
    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = total_seconds / 3_600;
    format!("{hours:02}:{minutes:02}:{seconds:02}:{millis:03}")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::sync::mpsc::TryRecvError;

    use engine::{Command, Event, PreviewFrame, Rational, SessionSnapshot};

    use crate::bridge::BridgeEvent;

    use super::{AppState, Message, format_timestamp};

    fn sample_snapshot(playing: bool) -> SessionSnapshot {
        SessionSnapshot {
            path: PathBuf::from("demo.mp4"),
            duration_ticks: 10_000_000,
            frame_rate: Rational::new(30, 1).expect("valid frame rate"),
            width: 160,
            height: 90,
            total_frames: 300,
            tick_interval_ms: 33,
            ranges: Vec::new(),
            pending_mark_ticks: None,
            playing,
        }
    }

    fn sample_frame_event() -> Event {
        Event::PreviewFrameReady {
            frame_index: 0,
            t_ticks: 0,
            frame: PreviewFrame {
                width: 1,
                height: 1,
                bytes: Arc::from(vec![0_u8; 4]),
            },
        }
    }

    #[test]
    fn add_button_dispatches_add_mark_command() {
        let (command_tx, command_rx) = mpsc::sync_channel(8);
        let mut app = AppState::from_sender_for_test(command_tx);

        let _ = app.update(Message::TimestampInputChanged("00:00:02:000".to_owned()));
        let _ = app.update(Message::AddMarkPressed);

        let command = command_rx.recv().expect("add mark command");
        assert_eq!(
            command,
            Command::AddMark {
                text: String::from("00:00:02:000")
            }
        );
    }

    #[test]
    fn empty_timestamp_input_is_not_dispatched() {
        let (command_tx, command_rx) = mpsc::sync_channel(8);
        let mut app = AppState::from_sender_for_test(command_tx);

        let _ = app.update(Message::AddMarkPressed);

        assert!(matches!(command_rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn chosen_open_path_dispatches_open_command() {
        let (command_tx, command_rx) = mpsc::sync_channel(8);
        let mut app = AppState::from_sender_for_test(command_tx);

        let _ = app.update(Message::OpenFileChosen(Some(PathBuf::from("demo.mp4"))));

        let command = command_rx.recv().expect("open command");
        assert_eq!(
            command,
            Command::Open {
                path: PathBuf::from("demo.mp4")
            }
        );
    }

    #[test]
    fn cancelled_open_dialog_sends_nothing() {
        let (command_tx, command_rx) = mpsc::sync_channel(8);
        let mut app = AppState::from_sender_for_test(command_tx);

        let _ = app.update(Message::OpenFileChosen(None));

        assert!(matches!(command_rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn save_without_a_loaded_video_sends_nothing() {
        let (command_tx, command_rx) = mpsc::sync_channel(8);
        let mut app = AppState::from_sender_for_test(command_tx);

        let _ = app.update(Message::SavePressed);

        assert!(matches!(command_rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn cancelled_save_dialog_sends_nothing() {
        let (command_tx, command_rx) = mpsc::sync_channel(8);
        let mut app = AppState::from_sender_for_test(command_tx);
        let _ = app.update(Message::Bridge(BridgeEvent::Event(Event::SourceLoaded(
            sample_snapshot(true),
        ))));

        let _ = app.update(Message::SaveFileChosen(None));

        assert!(matches!(command_rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn save_button_stops_the_preview_before_the_dialog() {
        let (command_tx, command_rx) = mpsc::sync_channel(8);
        let mut app = AppState::from_sender_for_test(command_tx);
        let _ = app.update(Message::Bridge(BridgeEvent::Event(Event::SourceLoaded(
            sample_snapshot(true),
        ))));

        let _ = app.update(Message::SavePressed);

        let command = command_rx.recv().expect("stop preview command");
        assert_eq!(command, Command::StopPreview);
    }

    #[test]
    fn chosen_save_path_dispatches_export_command() {
        let (command_tx, command_rx) = mpsc::sync_channel(8);
        let mut app = AppState::from_sender_for_test(command_tx);
        let _ = app.update(Message::Bridge(BridgeEvent::Event(Event::SourceLoaded(
            sample_snapshot(true),
        ))));

        let _ = app.update(Message::SaveFileChosen(Some(PathBuf::from("out.mp4"))));

        let command = command_rx.recv().expect("export command");
        assert_eq!(
            command,
            Command::Export {
                path: PathBuf::from("out.mp4")
            }
        );
    }

    #[test]
    fn marks_changed_event_clears_the_timestamp_input() {
        let (command_tx, _command_rx) = mpsc::sync_channel(8);
        let mut app = AppState::from_sender_for_test(command_tx);
        let _ = app.update(Message::TimestampInputChanged("00:00:02:000".to_owned()));

        let _ = app.update(Message::Bridge(BridgeEvent::Event(Event::MarksChanged(
            sample_snapshot(true),
        ))));

        assert!(app.timestamp_input.is_empty());
    }

    #[test]
    fn error_event_preserves_the_timestamp_input() {
        let (command_tx, _command_rx) = mpsc::sync_channel(8);
        let mut app = AppState::from_sender_for_test(command_tx);
        let _ = app.update(Message::TimestampInputChanged("1:2:3".to_owned()));

        let _ = app.update(Message::Bridge(BridgeEvent::Event(Event::Error(
            engine::EngineErrorEvent {
                kind: engine::EngineErrorKind::InvalidTimestamp,
                message: String::from("timestamp is not HH:MM:SS:mmm"),
            },
        ))));

        assert_eq!(app.timestamp_input, "1:2:3");
    }

    #[test]
    fn preview_ticks_coalesce_until_a_frame_arrives() {
        let (command_tx, command_rx) = mpsc::sync_channel(8);
        let mut app = AppState::from_sender_for_test(command_tx);
        let _ = app.update(Message::Bridge(BridgeEvent::Event(Event::SourceLoaded(
            sample_snapshot(true),
        ))));

        let _ = app.update(Message::PreviewTick);
        let _ = app.update(Message::PreviewTick);

        let first = command_rx.recv().expect("first tick command");
        assert_eq!(first, Command::PreviewTick);
        assert!(matches!(command_rx.try_recv(), Err(TryRecvError::Empty)));

        let _ = app.update(Message::Bridge(BridgeEvent::Event(sample_frame_event())));
        let _ = app.update(Message::PreviewTick);

        let second = command_rx.recv().expect("second tick command");
        assert_eq!(second, Command::PreviewTick);
    }

    #[test]
    fn preview_stopped_event_clears_the_playing_flag() {
        let (command_tx, _command_rx) = mpsc::sync_channel(8);
        let mut app = AppState::from_sender_for_test(command_tx);
        let _ = app.update(Message::Bridge(BridgeEvent::Event(Event::SourceLoaded(
            sample_snapshot(true),
        ))));

        let _ = app.update(Message::Bridge(BridgeEvent::Event(Event::PreviewStopped)));

        let snapshot = app.snapshot.as_ref().expect("snapshot exists");
        assert!(!snapshot.playing);
    }

    #[test]
    fn format_timestamp_round_trips_the_input_shape() {
        assert_eq!(format_timestamp(0), "00:00:00:000");
        assert_eq!(format_timestamp(2_500_000), "00:00:02:500");
        assert_eq!(format_timestamp(3_723_004_000), "01:02:03:004");
    }
}
