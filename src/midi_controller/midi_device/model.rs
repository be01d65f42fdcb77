use crate::config::BindingConfig;
use crate::midi_controller::midi_device::feedback_handle::ModelFeedbackHandle;
use crate::midi_controller::midi_device::model::components::binding::Binding;
use crate::midi_controller::midi_device::model::components::{MidiDeviceComponent, MidiEventReceiver, ReceivingState};
use crate::midi_controller::midi_message::MidiEvent;

pub mod action;
pub mod components;
pub mod trigger;

pub struct DeviceModel {
    bindings: Vec<Binding>,
}

impl DeviceModel {
    pub fn new(configs: Vec<BindingConfig>, feedback_handle: ModelFeedbackHandle) -> Self {
        let mut bindings = Vec::with_capacity(configs.len());
        for binding_config in configs {
            bindings.push(Binding::new(binding_config, feedback_handle.clone()));
        }
        DeviceModel {
            bindings,
        }
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

impl MidiEventReceiver for DeviceModel {
    /// Every binding sees every event, so one pad can drive several actions.
    fn receive_midi_event(&mut self, event: &MidiEvent) -> ReceivingState {
        let mut state = ReceivingState::Pass;
        for binding in &mut self.bindings {
            if binding.receive_midi_event(event) == ReceivingState::Consumed {
                state = ReceivingState::Consumed;
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BoundValue;
    use crate::midi_controller::midi_device::model::action::{Action, LogAction, SendMidiAction};
    use crate::midi_controller::midi_device::model::trigger::{MidiTrigger, TriggerSlot};
    use crate::midi_controller::midi_message::MessageType;
    use tokio::sync::mpsc::unbounded_channel;

    fn pad_to_led() -> BindingConfig {
        BindingConfig {
            name: "pad leds".to_string(),
            trigger: MidiTrigger {
                channel: BoundValue::fixed(9),
                message_type: BoundValue::fixed(MessageType::NoteOn),
                note: BoundValue::discrete(vec![36, 37, 38, 39], 0),
                value: BoundValue::ignore(),
                pressed: BoundValue::ignore(),
            },
            action: Action::SendMidi(SendMidiAction::new(
                BoundValue::fixed(0),
                BoundValue::fixed(MessageType::ControlChange),
                BoundValue::discrete(vec![100, 101, 102, 103], TriggerSlot::Note.index()),
                BoundValue::toggle(vec![127, 0]),
            )),
        }
    }

    fn pad_names() -> BindingConfig {
        BindingConfig {
            name: "pad names".to_string(),
            trigger: MidiTrigger {
                channel: BoundValue::ignore(),
                message_type: BoundValue::ignore(),
                note: BoundValue::discrete(vec![36, 37], 0),
                value: BoundValue::ignore(),
                pressed: BoundValue::fixed(true),
            },
            action: Action::Log(LogAction::new(BoundValue::discrete(
                vec!["kick".to_string(), "snare".to_string()],
                TriggerSlot::Note.index(),
            ))),
        }
    }

    #[tokio::test]
    async fn fulfilled_bindings_drive_their_actions() {
        let (midi, mut sent) = unbounded_channel();
        let mut model = DeviceModel::new(vec![pad_to_led(), pad_names()], ModelFeedbackHandle::new(midi));
        assert_eq!(model.bindings().len(), 2);

        assert_eq!(model.receive_midi_event(&MidiEvent::new(9, MessageType::NoteOn, 38, 90)), ReceivingState::Consumed);
        assert_eq!(sent.recv().await, Some(MidiEvent::new(0, MessageType::ControlChange, 102, 127)));

        assert_eq!(model.receive_midi_event(&MidiEvent::new(9, MessageType::NoteOn, 36, 90)), ReceivingState::Consumed);
        assert_eq!(sent.recv().await, Some(MidiEvent::new(0, MessageType::ControlChange, 100, 0)));

        assert_eq!(model.receive_midi_event(&MidiEvent::new(9, MessageType::NoteOff, 40, 0)), ReceivingState::Pass);
        assert_eq!(model.receive_midi_event(&MidiEvent::new(2, MessageType::NoteOn, 37, 64)), ReceivingState::Consumed);
        assert!(sent.try_recv().is_err());
    }
}
