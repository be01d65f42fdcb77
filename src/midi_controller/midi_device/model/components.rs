pub mod binding;

use crate::midi_controller::midi_device::feedback_handle::ModelFeedbackHandle;
use crate::midi_controller::midi_message::MidiEvent;

pub trait MidiDeviceComponent: MidiEventReceiver {
    type Config;
    fn new(config: Self::Config, feedback_handle: ModelFeedbackHandle) -> Self
        where Self: Sized;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceivingState {
    Consumed,
    Pass,
}

pub trait MidiEventReceiver {
    fn receive_midi_event(&mut self, event: &MidiEvent) -> ReceivingState;
}
