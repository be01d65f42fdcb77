pub mod binding;
pub mod config;
pub mod midi_controller;
