use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::binding::BindableValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    NoteOff,
    #[default]
    NoteOn,
    PolyPressure,
    ControlChange,
    ProgramChange,
    ChannelPressure,
    PitchBend,
}

impl MessageType {
    fn from_status(status: u8) -> Option<Self> {
        match status & 0xF0 {
            0x80 => Some(MessageType::NoteOff),
            0x90 => Some(MessageType::NoteOn),
            0xA0 => Some(MessageType::PolyPressure),
            0xB0 => Some(MessageType::ControlChange),
            0xC0 => Some(MessageType::ProgramChange),
            0xD0 => Some(MessageType::ChannelPressure),
            0xE0 => Some(MessageType::PitchBend),
            _ => None,
        }
    }

    fn status(self) -> u8 {
        match self {
            MessageType::NoteOff => 0x80,
            MessageType::NoteOn => 0x90,
            MessageType::PolyPressure => 0xA0,
            MessageType::ControlChange => 0xB0,
            MessageType::ProgramChange => 0xC0,
            MessageType::ChannelPressure => 0xD0,
            MessageType::PitchBend => 0xE0,
        }
    }

    /// Program change and channel pressure carry a single data byte.
    pub fn data_len(self) -> usize {
        match self {
            MessageType::ProgramChange | MessageType::ChannelPressure => 1,
            _ => 2,
        }
    }

    pub fn is_note(self) -> bool {
        matches!(self, MessageType::NoteOn | MessageType::NoteOff)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::NoteOff => "note_off",
            MessageType::NoteOn => "note_on",
            MessageType::PolyPressure => "poly_pressure",
            MessageType::ControlChange => "control_change",
            MessageType::ProgramChange => "program_change",
            MessageType::ChannelPressure => "channel_pressure",
            MessageType::PitchBend => "pitch_bend",
        }
    }
}

impl Display for MessageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BindableValue for MessageType {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MidiMessageError {
    #[error("empty midi message")]
    Empty,
    #[error("unsupported status byte {0:#04x}")]
    UnsupportedStatus(u8),
    #[error("{message_type} needs {expected} data bytes, got {actual}")]
    Truncated {
        message_type: MessageType,
        expected: usize,
        actual: usize,
    },
}

/// A channel voice message split into the fields a trigger can bind.
///
/// `note` is the first data byte (key, controller or program number),
/// `value` the second one (velocity, controller value). For messages with a
/// single data byte, `value` carries that byte as well, so a channel pressure
/// amount can be bound through either field. Pitch bend keeps its two 7 bit
/// halves as `note` (LSB) and `value` (MSB).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MidiEvent {
    pub channel: u8,
    pub message_type: MessageType,
    pub note: u8,
    pub value: u8,
}

impl MidiEvent {
    pub fn new(channel: u8, message_type: MessageType, note: u8, value: u8) -> Self {
        Self {
            channel,
            message_type,
            note,
            value,
        }
    }

    /// Parses a channel voice message. A note-on with velocity 0 is read as
    /// note-off.
    pub fn from_slice(slice: &[u8]) -> Result<MidiEvent, MidiMessageError> {
        let (&status, data) = slice.split_first().ok_or(MidiMessageError::Empty)?;
        let message_type = MessageType::from_status(status).ok_or(MidiMessageError::UnsupportedStatus(status))?;
        if data.len() < message_type.data_len() {
            return Err(MidiMessageError::Truncated {
                message_type,
                expected: message_type.data_len(),
                actual: data.len(),
            });
        }
        let note = data[0] & 0x7F;
        let value = if message_type.data_len() == 1 { note } else { data[1] & 0x7F };
        let message_type = if message_type == MessageType::NoteOn && value == 0 {
            MessageType::NoteOff
        } else {
            message_type
        };
        Ok(MidiEvent {
            channel: status & 0x0F,
            message_type,
            note,
            value,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let status = self.message_type.status() | (self.channel & 0x0F);
        match self.message_type.data_len() {
            1 => vec![status, self.value & 0x7F],
            _ => vec![status, self.note & 0x7F, self.value & 0x7F],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_note_on() {
        let event = MidiEvent::from_slice(&[0x93, 60, 100]).unwrap();
        assert_eq!(event, MidiEvent::new(3, MessageType::NoteOn, 60, 100));
        assert_eq!(event.to_bytes(), vec![0x93, 60, 100]);
    }

    #[test]
    fn zero_velocity_note_on_is_note_off() {
        let event = MidiEvent::from_slice(&[0x90, 60, 0]).unwrap();
        assert_eq!(event.message_type, MessageType::NoteOff);
    }

    #[test]
    fn parses_two_byte_messages() {
        let event = MidiEvent::from_slice(&[0xC5, 12]).unwrap();
        assert_eq!(event, MidiEvent::new(5, MessageType::ProgramChange, 12, 12));
        assert_eq!(event.to_bytes(), vec![0xC5, 12]);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(MidiEvent::from_slice(&[]), Err(MidiMessageError::Empty));
        assert_eq!(MidiEvent::from_slice(&[0xF8]), Err(MidiMessageError::UnsupportedStatus(0xF8)));
        assert_eq!(
            MidiEvent::from_slice(&[0xB0, 7]),
            Err(MidiMessageError::Truncated {
                message_type: MessageType::ControlChange,
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn message_type_names_match_serde() {
        let name = serde_json::to_value(MessageType::ControlChange).unwrap();
        assert_eq!(name, serde_json::json!(MessageType::ControlChange.as_str()));
    }
}
