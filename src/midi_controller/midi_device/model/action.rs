use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::binding::{BoundValue, MatchTester};
use crate::midi_controller::midi_message::{MessageType, MidiEvent};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("midi output channel closed")]
    MidiOutputClosed,
}

/// What a binding does once its trigger matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SendMidi(SendMidiAction),
    Log(LogAction),
}

impl Action {
    pub fn perform(&mut self, binding: &str, tester: &MatchTester, midi: &UnboundedSender<MidiEvent>) -> Result<(), ActionError> {
        match self {
            Action::SendMidi(action) => {
                let event = action.resolve(tester);
                debug!(binding, ?event, "sending midi");
                midi.send(event).map_err(|_| ActionError::MidiOutputClosed)
            }
            Action::Log(action) => {
                let message = action.resolve(tester);
                info!(binding, "{message}");
                Ok(())
            }
        }
    }
}

/// Sends a MIDI event assembled from its resolved fields. A field that does
/// not resolve keeps the value it had in the previously sent event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMidiAction {
    #[serde(default)]
    pub channel: BoundValue<u8>,
    #[serde(default)]
    pub message_type: BoundValue<MessageType>,
    #[serde(default)]
    pub note: BoundValue<u8>,
    #[serde(default)]
    pub value: BoundValue<u8>,
    #[serde(skip)]
    last: MidiEvent,
}

impl SendMidiAction {
    pub fn new(
        channel: BoundValue<u8>,
        message_type: BoundValue<MessageType>,
        note: BoundValue<u8>,
        value: BoundValue<u8>,
    ) -> Self {
        Self {
            channel,
            message_type,
            note,
            value,
            last: MidiEvent::default(),
        }
    }

    pub fn resolve(&mut self, tester: &MatchTester) -> MidiEvent {
        tester.resolve(&mut self.channel, &mut self.last.channel);
        tester.resolve(&mut self.message_type, &mut self.last.message_type);
        tester.resolve(&mut self.note, &mut self.last.note);
        tester.resolve(&mut self.value, &mut self.last.value);
        self.last
    }
}

/// Logs a resolved text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogAction {
    pub message: BoundValue<String>,
    #[serde(skip)]
    last: String,
}

impl LogAction {
    pub fn new(message: BoundValue<String>) -> Self {
        Self {
            message,
            last: String::new(),
        }
    }

    pub fn resolve(&mut self, tester: &MatchTester) -> &str {
        tester.resolve(&mut self.message, &mut self.last);
        &self.last
    }
}

/// Performs `action` for every tester the binding publishes, one at a time.
pub async fn run_action(
    binding: String,
    mut action: Action,
    mut fulfilled: UnboundedReceiver<MatchTester>,
    midi: UnboundedSender<MidiEvent>,
) {
    while let Some(tester) = fulfilled.recv().await {
        if let Err(e) = action.perform(&binding, &tester, &midi) {
            warn!(binding = %binding, "stopping action: {e}");
            return;
        }
    }
    debug!(binding = %binding, "binding dropped, action finished");
}
