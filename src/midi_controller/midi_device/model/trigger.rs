use serde::{Deserialize, Serialize};

use crate::binding::{BoundValue, MatchTester};
use crate::midi_controller::midi_message::{MessageType, MidiEvent};

const PRESSED_LITERAL: &str = "note_on";
const RELEASED_LITERAL: &str = "note_off";

/// Tester slot of every trigger field. Output fields point their reference
/// index at one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum TriggerSlot {
    Channel = 0,
    MessageType = 1,
    Note = 2,
    Value = 3,
    Pressed = 4,
}

impl TriggerSlot {
    pub const COUNT: usize = 5;

    pub const fn index(self) -> i32 {
        self as i32
    }
}

/// The incoming event a binding reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidiTrigger {
    #[serde(default)]
    pub channel: BoundValue<u8>,
    #[serde(default)]
    pub message_type: BoundValue<MessageType>,
    #[serde(default)]
    pub note: BoundValue<u8>,
    #[serde(default = "BoundValue::ignore")]
    pub value: BoundValue<u8>,
    /// Only consulted for note messages, where it sees `true` for note-on and
    /// `false` for note-off.
    #[serde(default = "BoundValue::ignore")]
    pub pressed: BoundValue<bool>,
}

impl Default for MidiTrigger {
    fn default() -> Self {
        Self {
            channel: BoundValue::default(),
            message_type: BoundValue::default(),
            note: BoundValue::default(),
            value: BoundValue::ignore(),
            pressed: BoundValue::ignore(),
        }
    }
}

impl MidiTrigger {
    /// Tests every field of `event` in [`TriggerSlot`] order and returns
    /// whether the trigger still matches.
    pub fn test(&mut self, tester: &mut MatchTester, event: &MidiEvent) -> bool {
        let first_slot = tester.indices().len();

        tester.test_against(&mut self.channel, &event.channel);
        tester.test_against(&mut self.message_type, &event.message_type);
        tester.test_against(&mut self.note, &event.note);
        tester.test_against(&mut self.value, &event.value);
        if event.message_type.is_note() {
            tester.test_literal(&mut self.pressed, event.message_type.as_str(), PRESSED_LITERAL, RELEASED_LITERAL);
        } else {
            tester.test_empty();
        }

        debug_assert_eq!(tester.indices().len() - first_slot, TriggerSlot::COUNT);
        tester.valid()
    }
}
