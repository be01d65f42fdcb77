use tokio::sync::mpsc::UnboundedSender;
use crate::midi_controller::midi_message::MidiEvent;

/// Where the components of a device model send their output.
#[derive(Clone, Debug)]
pub struct ModelFeedbackHandle {
    pub midi: UnboundedSender<MidiEvent>,
}

impl ModelFeedbackHandle {
    pub fn new(midi: UnboundedSender<MidiEvent>) -> Self {
        Self {
            midi,
        }
    }
}
