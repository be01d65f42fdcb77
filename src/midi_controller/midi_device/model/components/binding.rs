use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::binding::{Fulfillment, FulfillmentObservers, MatchTester};
use crate::config::BindingConfig;
use crate::midi_controller::midi_device::feedback_handle::ModelFeedbackHandle;
use crate::midi_controller::midi_device::model::action::run_action;
use crate::midi_controller::midi_device::model::components::{MidiDeviceComponent, MidiEventReceiver, ReceivingState};
use crate::midi_controller::midi_device::model::trigger::MidiTrigger;
use crate::midi_controller::midi_message::MidiEvent;

/// A trigger and the action it drives. The action runs in its own task and
/// receives every tester the trigger fulfills.
pub struct Binding {
    name: String,
    trigger: MidiTrigger,
    observers: FulfillmentObservers,
    action_task: Option<JoinHandle<()>>,
}

impl Binding {
    pub fn with_trigger(name: String, trigger: MidiTrigger) -> Self {
        Self {
            name,
            trigger,
            observers: FulfillmentObservers::new(),
            action_task: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<MatchTester> {
        self.observers.subscribe()
    }
}

impl MidiDeviceComponent for Binding {
    type Config = BindingConfig;

    fn new(config: Self::Config, feedback_handle: ModelFeedbackHandle) -> Self {
        let mut binding = Binding::with_trigger(config.name, config.trigger);
        let fulfilled = binding.subscribe();
        binding.action_task = Some(tokio::spawn(run_action(
            binding.name.clone(),
            config.action,
            fulfilled,
            feedback_handle.midi,
        )));
        binding
    }
}

impl MidiEventReceiver for Binding {
    fn receive_midi_event(&mut self, event: &MidiEvent) -> ReceivingState {
        let mut fulfillment = Fulfillment::new(&self.observers);
        if !self.trigger.test(&mut fulfillment, event) {
            return ReceivingState::Pass;
        }
        debug!(binding = %self.name, slots = ?fulfillment.indices(), "trigger fulfilled");
        ReceivingState::Consumed
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        if let Some(task) = &self.action_task {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BoundValue;
    use crate::midi_controller::midi_device::model::action::{Action, SendMidiAction};
    use crate::midi_controller::midi_message::MessageType;

    fn knob_trigger() -> MidiTrigger {
        MidiTrigger {
            channel: BoundValue::fixed(0),
            message_type: BoundValue::fixed(MessageType::ControlChange),
            note: BoundValue::fixed(16),
            value: BoundValue::range(0, 127, 0),
            pressed: BoundValue::ignore(),
        }
    }

    fn knob() -> Binding {
        Binding::with_trigger("knob".to_string(), knob_trigger())
    }

    #[test]
    fn publishes_only_fulfilled_testers() {
        let mut binding = knob();
        let mut fulfilled = binding.subscribe();

        let state = binding.receive_midi_event(&MidiEvent::new(0, MessageType::ControlChange, 17, 5));
        assert_eq!(state, ReceivingState::Pass);
        assert!(fulfilled.try_recv().is_err());

        let state = binding.receive_midi_event(&MidiEvent::new(0, MessageType::ControlChange, 16, 127));
        assert_eq!(state, ReceivingState::Consumed);
        let tester = fulfilled.try_recv().unwrap();
        assert_eq!(tester.indices(), &[-1, -1, -1, 1 << 32, -1]);
        assert!(fulfilled.try_recv().is_err());
    }

    fn build<C: MidiDeviceComponent>(config: C::Config, feedback_handle: ModelFeedbackHandle) -> C {
        C::new(config, feedback_handle)
    }

    #[tokio::test]
    async fn built_component_receives_events() {
        let (midi, mut sent) = tokio::sync::mpsc::unbounded_channel();
        let config = BindingConfig {
            name: "knob".to_string(),
            trigger: knob_trigger(),
            action: Action::SendMidi(SendMidiAction::new(
                BoundValue::fixed(1),
                BoundValue::fixed(MessageType::ControlChange),
                BoundValue::fixed(16),
                BoundValue::range(0, 127, 3),
            )),
        };
        let mut component: Binding = build(config, ModelFeedbackHandle::new(midi));

        let state = component.receive_midi_event(&MidiEvent::new(0, MessageType::ControlChange, 16, 127));
        assert_eq!(state, ReceivingState::Consumed);
        assert_eq!(sent.recv().await, Some(MidiEvent::new(1, MessageType::ControlChange, 16, 127)));
    }
}
