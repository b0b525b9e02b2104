use std::collections::VecDeque;

use chat_types::{is_upload_marker, ConnectionStatus, Sender, UploadState};
use dioxus::prelude::{Signal, WritableExt};

#[derive(Debug, Clone, PartialEq)]
pub enum EntryBody {
    /// Raw message text; rendered through `markup`.
    Text(String),
    Image {
        preview_url: String,
        upload: UploadState,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatEntry {
    pub id: u64,
    pub sender: Sender,
    pub body: EntryBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendPhase {
    #[default]
    Idle,
    Sending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelState {
    pub open: bool,
    pub expanded: bool,
    /// Set once the visitor touches open/close/expand themselves.
    pub interacted: bool,
    pub opened_once: bool,
}

/// Ticket a status writer takes before issuing its request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StatusTicket(u64);

/// Connection status with last-started-wins writes.
///
/// Health checks and exchanges both report reachability. A result only lands
/// if no writer that started later has already landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusTracker {
    current: ConnectionStatus,
    issued: u64,
    landed: u64,
}

impl StatusTracker {
    pub fn current(&self) -> ConnectionStatus {
        self.current
    }

    pub fn begin(&mut self) -> StatusTicket {
        self.issued += 1;
        StatusTicket(self.issued)
    }

    pub fn resolve(&mut self, ticket: StatusTicket, status: ConnectionStatus) -> bool {
        if ticket.0 < self.landed {
            return false;
        }
        self.landed = ticket.0;
        self.current = status;
        true
    }
}

/// How a single exchange ended, as far as the transcript cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Replied(String),
    Failed { fallback: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendInFlight;

/// Everything the panel renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatState {
    pub entries: Vec<ChatEntry>,
    pub draft: String,
    pub typing: bool,
    pub input_enabled: bool,
    pub phase: SendPhase,
    pub status: StatusTracker,
    pub panel: PanelState,
    /// Bumped whenever the input should regain focus.
    pub focus_requests: u64,
    /// Back-end notices (upload markers) waiting for the current exchange.
    queued_notices: VecDeque<String>,
    send_armed: bool,
    next_id: u64,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            draft: String::new(),
            typing: false,
            input_enabled: true,
            phase: SendPhase::Idle,
            status: StatusTracker::default(),
            panel: PanelState::default(),
            focus_requests: 0,
            queued_notices: VecDeque::new(),
            send_armed: false,
            next_id: 1,
        }
    }
}

impl ChatState {
    pub fn push_text(&mut self, sender: Sender, text: impl Into<String>) -> u64 {
        self.push(sender, EntryBody::Text(text.into()))
    }

    /// Optimistic image bubble, shown before the upload is confirmed.
    pub fn push_image(&mut self, preview_url: impl Into<String>) -> u64 {
        self.push(
            Sender::User,
            EntryBody::Image {
                preview_url: preview_url.into(),
                upload: UploadState::Pending,
            },
        )
    }

    fn push(&mut self, sender: Sender, body: EntryBody) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(ChatEntry { id, sender, body });
        id
    }

    pub fn set_upload_state(&mut self, entry_id: u64, state: UploadState) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == entry_id) else {
            return false;
        };
        match &mut entry.body {
            EntryBody::Image { upload, .. } => {
                *upload = state;
                true
            }
            EntryBody::Text(_) => false,
        }
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.status.current()
    }

    pub fn set_draft(&mut self, value: String) {
        self.send_armed = !value.trim().is_empty();
        self.draft = value;
    }

    pub fn can_send(&self) -> bool {
        self.input_enabled
            && self.phase == SendPhase::Idle
            && self.send_armed
            && !self.draft.trim().is_empty()
    }

    /// Trimmed draft, cleared from the input. `None` when there is nothing to send.
    pub fn take_draft(&mut self) -> Option<String> {
        if self.phase == SendPhase::Sending {
            return None;
        }
        let text = self.draft.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.draft.clear();
        self.send_armed = false;
        Some(text)
    }

    /// `Idle -> Sending`. Renders the user bubble (unless it is an upload
    /// marker) and the typing indicator.
    pub fn begin_send(&mut self, text: &str) -> Result<StatusTicket, SendInFlight> {
        if self.phase == SendPhase::Sending {
            return Err(SendInFlight);
        }
        self.phase = SendPhase::Sending;
        self.input_enabled = false;
        if !is_upload_marker(text) {
            self.push_text(Sender::User, text);
        }
        self.typing = true;
        Ok(self.status.begin())
    }

    /// `Sending -> Idle`, on success or failure alike.
    pub fn finish_send(&mut self, ticket: StatusTicket, outcome: ExchangeOutcome) {
        self.typing = false;
        let status = match outcome {
            ExchangeOutcome::Replied(reply) => {
                self.push_text(Sender::Bot, reply);
                ConnectionStatus::Online
            }
            ExchangeOutcome::Failed { fallback } => {
                self.push_text(Sender::Bot, fallback);
                ConnectionStatus::Offline
            }
        };
        self.status.resolve(ticket, status);
        self.phase = SendPhase::Idle;
        self.input_enabled = true;
        self.send_armed = false;
        self.focus_requests += 1;
    }

    /// Hold `notice` back if an exchange is in flight. Returns `true` when queued.
    pub fn defer_notice(&mut self, notice: &str) -> bool {
        if self.phase != SendPhase::Sending {
            return false;
        }
        self.queued_notices.push_back(notice.to_string());
        true
    }

    /// Start the next queued notice, if any and if nothing is in flight.
    pub fn begin_queued_notice(&mut self) -> Option<(String, StatusTicket)> {
        if self.phase == SendPhase::Sending {
            return None;
        }
        let notice = self.queued_notices.pop_front()?;
        let ticket = self.begin_send(&notice).ok()?;
        Some((notice, ticket))
    }

    pub fn queued_notices(&self) -> usize {
        self.queued_notices.len()
    }

    /// Returns `true` when this is the first time the panel opens.
    pub fn open_panel(&mut self) -> bool {
        self.panel.interacted = true;
        self.show_panel()
    }

    pub fn close_panel(&mut self) {
        self.panel.interacted = true;
        self.panel.open = false;
    }

    /// Returns `true` when this toggle opened the panel for the first time.
    pub fn toggle_panel(&mut self) -> bool {
        if self.panel.open {
            self.close_panel();
            false
        } else {
            self.open_panel()
        }
    }

    pub fn toggle_expand(&mut self) {
        self.panel.interacted = true;
        self.panel.expanded = !self.panel.expanded;
    }

    /// Timed auto-open; a no-op once the visitor has interacted.
    pub fn auto_open(&mut self) -> bool {
        if self.panel.interacted || self.panel.open {
            return false;
        }
        self.show_panel()
    }

    fn show_panel(&mut self) -> bool {
        if self.panel.open {
            return false;
        }
        self.panel.open = true;
        self.focus_requests += 1;
        let first = !self.panel.opened_once;
        self.panel.opened_once = true;
        first
    }
}

/// Somewhere a `ChatState` lives: a Dioxus signal in the browser, a plain
/// value in tests.
pub trait StateHandle {
    fn update<R>(&mut self, f: impl FnOnce(&mut ChatState) -> R) -> R;
}

impl StateHandle for Signal<ChatState> {
    fn update<R>(&mut self, f: impl FnOnce(&mut ChatState) -> R) -> R {
        let mut state = self.write();
        f(&mut state)
    }
}

impl StateHandle for &mut ChatState {
    fn update<R>(&mut self, f: impl FnOnce(&mut ChatState) -> R) -> R {
        f(&mut **self)
    }
}

// Lets tests drive two exchanges against one state at once.
#[cfg(test)]
impl StateHandle for &std::cell::RefCell<ChatState> {
    fn update<R>(&mut self, f: impl FnOnce(&mut ChatState) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(state: &ChatState) -> Vec<(Sender, String)> {
        state
            .entries
            .iter()
            .filter_map(|entry| match &entry.body {
                EntryBody::Text(text) => Some((entry.sender, text.clone())),
                EntryBody::Image { .. } => None,
            })
            .collect()
    }

    #[test]
    fn send_lifecycle_success() {
        let mut state = ChatState::default();
        state.set_draft("  hello ".to_string());
        assert!(state.can_send());

        let text = state.take_draft().unwrap();
        assert_eq!(text, "hello");
        assert!(state.draft.is_empty());

        let ticket = state.begin_send(&text).unwrap();
        assert_eq!(state.phase, SendPhase::Sending);
        assert!(!state.input_enabled);
        assert!(state.typing);
        assert!(!state.can_send());

        state.finish_send(ticket, ExchangeOutcome::Replied("hi there".to_string()));
        assert_eq!(
            texts(&state),
            vec![
                (Sender::User, "hello".to_string()),
                (Sender::Bot, "hi there".to_string()),
            ]
        );
        assert_eq!(state.connection_status(), ConnectionStatus::Online);
        assert_eq!(state.phase, SendPhase::Idle);
        assert!(state.input_enabled);
        assert!(!state.typing);
        assert_eq!(state.focus_requests, 1);
    }

    #[test]
    fn send_stays_disabled_until_user_types_again() {
        let mut state = ChatState::default();
        state.set_draft("queued".to_string());

        // A direct sendText leaves the typed draft in place.
        let ticket = state.begin_send("from host page").unwrap();
        state.finish_send(ticket, ExchangeOutcome::Replied("ok".to_string()));
        assert!(!state.can_send());

        state.set_draft("   ".to_string());
        assert!(!state.can_send());
        state.set_draft("next".to_string());
        assert!(state.can_send());
    }

    #[test]
    fn failure_marks_offline() {
        let mut state = ChatState::default();
        let ticket = state.begin_send("hello").unwrap();
        state.finish_send(
            ticket,
            ExchangeOutcome::Failed {
                fallback: "WhatsApp / Email".to_string(),
            },
        );
        assert_eq!(state.connection_status(), ConnectionStatus::Offline);
        assert_eq!(texts(&state).len(), 2);
        assert!(state.input_enabled);
    }

    #[test]
    fn concurrent_send_is_rejected() {
        let mut state = ChatState::default();
        state.begin_send("first").unwrap();
        assert_eq!(state.begin_send("second"), Err(SendInFlight));
        assert_eq!(texts(&state), vec![(Sender::User, "first".to_string())]);

        state.set_draft("third".to_string());
        assert_eq!(state.take_draft(), None);
        assert_eq!(state.draft, "third");
    }

    #[test]
    fn upload_marker_renders_no_user_bubble() {
        let mut state = ChatState::default();
        let ticket = state.begin_send("[IMAGE_UPLOADED:f1]").unwrap();
        assert!(state.entries.is_empty());
        assert!(state.typing);
        state.finish_send(ticket, ExchangeOutcome::Replied("Got it".to_string()));
        assert_eq!(texts(&state), vec![(Sender::Bot, "Got it".to_string())]);
    }

    #[test]
    fn notices_wait_for_the_exchange_in_flight() {
        let mut state = ChatState::default();
        assert!(!state.defer_notice("[IMAGE_UPLOADED:f1]"));

        let ticket = state.begin_send("question").unwrap();
        assert!(state.defer_notice("[IMAGE_UPLOADED:f2]"));
        assert_eq!(state.begin_queued_notice(), None);
        assert_eq!(state.queued_notices(), 1);

        state.finish_send(ticket, ExchangeOutcome::Replied("answer".to_string()));
        let (notice, _) = state.begin_queued_notice().unwrap();
        assert_eq!(notice, "[IMAGE_UPLOADED:f2]");
        assert_eq!(state.phase, SendPhase::Sending);
        assert_eq!(state.queued_notices(), 0);
        assert_eq!(texts(&state).len(), 2);
    }

    #[test]
    fn empty_draft_is_not_sent() {
        let mut state = ChatState::default();
        state.set_draft(" \n ".to_string());
        assert_eq!(state.take_draft(), None);
    }

    #[test]
    fn stale_status_results_are_dropped() {
        let mut tracker = StatusTracker::default();
        let check = tracker.begin();
        let exchange = tracker.begin();

        assert!(tracker.resolve(exchange, ConnectionStatus::Online));
        assert!(!tracker.resolve(check, ConnectionStatus::Offline));
        assert_eq!(tracker.current(), ConnectionStatus::Online);

        let later = tracker.begin();
        assert!(tracker.resolve(later, ConnectionStatus::Offline));
        assert_eq!(tracker.current(), ConnectionStatus::Offline);
    }

    #[test]
    fn upload_states_transition_on_image_entries_only() {
        let mut state = ChatState::default();
        let text_id = state.push_text(Sender::User, "hi");
        let image_id = state.push_image("blob:preview");

        assert!(!state.set_upload_state(text_id, UploadState::Pending));
        assert!(state.set_upload_state(
            image_id,
            UploadState::Confirmed {
                file_id: "f1".to_string()
            }
        ));
        assert!(!state.set_upload_state(999, UploadState::Pending));

        match &state.entries[1].body {
            EntryBody::Image { upload, .. } => assert_eq!(
                upload,
                &UploadState::Confirmed {
                    file_id: "f1".to_string()
                }
            ),
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn first_open_is_reported_once() {
        let mut state = ChatState::default();
        assert!(state.toggle_panel());
        assert!(state.panel.open);
        assert!(!state.toggle_panel());
        assert!(!state.panel.open);
        assert!(!state.open_panel());
        assert!(state.panel.open);
    }

    #[test]
    fn auto_open_respects_interaction() {
        let mut state = ChatState::default();
        assert!(state.auto_open());
        assert!(state.panel.open);
        assert!(!state.panel.interacted);

        let mut touched = ChatState::default();
        touched.toggle_expand();
        assert!(touched.panel.expanded);
        assert!(!touched.auto_open());
        assert!(!touched.panel.open);

        let mut closed = ChatState::default();
        closed.open_panel();
        closed.close_panel();
        assert!(!closed.auto_open());
    }
}
