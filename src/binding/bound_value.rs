use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::binding::index::NormalizedIndex;
use crate::binding::mode::BindingMode;
use crate::binding::strategy::{
    BindingStrategy, ContinuousRangeStrategy, DiscreteMapStrategy, FixedStrategy, IncrementStrategy, Strategy,
    ToggleStrategy,
};
use crate::binding::value::BindableValue;

/// A configurable field holding exactly one active [`BindingStrategy`].
///
/// Mode misuse (reference operations on a mode without a reference, numeric
/// modes on a non-numeric type) panics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BindingStrategy<T>",
    into = "BindingStrategy<T>",
    bound(
        serialize = "T: BindableValue + Serialize",
        deserialize = "T: BindableValue + Deserialize<'de>"
    )
)]
pub struct BoundValue<T: BindableValue> {
    strategy: BindingStrategy<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidStrategyError {
    #[error("binding mode `{mode}` is not supported for {type_name}")]
    UnsupportedMode {
        mode: BindingMode,
        type_name: &'static str,
    },
    #[error("toggle cursor {cursor} is outside its table of {len} entries")]
    CursorOutOfRange { cursor: usize, len: usize },
}

impl<T: BindableValue> BoundValue<T> {
    pub fn new(strategy: BindingStrategy<T>) -> Self {
        if let Err(e) = Self::check(&strategy) {
            panic!("{e}");
        }
        Self { strategy }
    }

    pub fn fixed(value: T) -> Self {
        Self::new(BindingStrategy::Fixed(FixedStrategy { value }))
    }

    pub fn discrete(table: Vec<T>, reference_index: i32) -> Self {
        Self::new(BindingStrategy::DiscreteMap(DiscreteMapStrategy { table, reference_index }))
    }

    pub fn range(min: T, max: T, reference_index: i32) -> Self {
        Self::new(BindingStrategy::ContinuousRange(ContinuousRangeStrategy { min, max, reference_index }))
    }

    pub fn toggle(table: Vec<T>) -> Self {
        Self::new(BindingStrategy::Toggle(ToggleStrategy { table, cursor: 0 }))
    }

    pub fn increment(delta: f64) -> Self {
        Self::new(BindingStrategy::Increment(IncrementStrategy { delta }))
    }

    pub fn ignore() -> Self {
        Self::new(BindingStrategy::Ignore)
    }

    pub fn mode(&self) -> BindingMode {
        self.strategy.mode()
    }

    /// Replaces the active strategy with a fresh default one; the previous
    /// configuration is lost, even when `mode` is the current mode.
    pub fn switch_to(&mut self, mode: BindingMode) {
        self.set_strategy(BindingStrategy::default_for(mode));
    }

    pub fn uses_reference(&self) -> bool {
        self.strategy.reference_handler().is_some()
    }

    pub fn reference_index(&self) -> i32 {
        match self.strategy.reference_handler() {
            Some(handler) => handler.reference_index(),
            None => panic!("binding mode `{}` has no reference index", self.mode()),
        }
    }

    pub fn set_reference_index(&mut self, index: i32) {
        let mode = self.mode();
        match self.strategy.reference_handler_mut() {
            Some(handler) => handler.set_reference_index(index),
            None => panic!("binding mode `{mode}` has no reference index"),
        }
    }

    pub fn strategy(&self) -> &BindingStrategy<T> {
        &self.strategy
    }

    /// Replaces the strategy and its parameters, panicking on a strategy
    /// this type cannot carry.
    pub fn set_strategy(&mut self, strategy: BindingStrategy<T>) {
        *self = Self::new(strategy);
    }

    pub(crate) fn match_candidate(&mut self, candidate: &T) -> Option<NormalizedIndex> {
        self.strategy.match_candidate(candidate)
    }

    pub(crate) fn resolve(&mut self, index: NormalizedIndex, output: &mut T) -> bool {
        self.strategy.resolve(index, output)
    }

    fn check(strategy: &BindingStrategy<T>) -> Result<(), InvalidStrategyError> {
        let mode = strategy.mode();
        if !T::supports(mode) {
            return Err(InvalidStrategyError::UnsupportedMode {
                mode,
                type_name: std::any::type_name::<T>(),
            });
        }
        if let BindingStrategy::Toggle(toggle) = strategy {
            let len = toggle.table.len();
            if toggle.cursor >= len.max(1) {
                return Err(InvalidStrategyError::CursorOutOfRange { cursor: toggle.cursor, len });
            }
        }
        Ok(())
    }
}

impl<T: BindableValue> Default for BoundValue<T> {
    fn default() -> Self {
        Self::fixed(T::default())
    }
}

impl<T: BindableValue> TryFrom<BindingStrategy<T>> for BoundValue<T> {
    type Error = InvalidStrategyError;

    fn try_from(strategy: BindingStrategy<T>) -> Result<Self, Self::Error> {
        Self::check(&strategy)?;
        Ok(Self { strategy })
    }
}

impl<T: BindableValue> From<BoundValue<T>> for BindingStrategy<T> {
    fn from(value: BoundValue<T>) -> Self {
        value.strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::index::NO_INDEX;
    use serde_json::json;

    #[test]
    fn defaults_to_fixed() {
        let value = BoundValue::<u8>::default();
        assert_eq!(value.mode(), BindingMode::Fixed);
        assert!(!value.uses_reference());
    }

    #[test]
    fn switching_discards_previous_state() {
        let mut value = BoundValue::discrete(vec![1u8, 2, 3], 2);
        assert_eq!(value.reference_index(), 2);

        value.switch_to(BindingMode::ContinuousRange);
        assert_eq!(value.mode(), BindingMode::ContinuousRange);
        assert_eq!(value.reference_index(), 0);

        value.switch_to(BindingMode::DiscreteMap);
        assert_eq!(value.strategy(), &BindingStrategy::DiscreteMap(DiscreteMapStrategy {
            table: vec![],
            reference_index: 0,
        }));
    }

    #[test]
    fn reference_index_is_settable_on_reference_modes() {
        let mut value = BoundValue::range(0i32, 10, 0);
        value.set_reference_index(3);
        assert!(value.uses_reference());
        assert_eq!(value.reference_index(), 3);
    }

    #[test]
    #[should_panic(expected = "has no reference index")]
    fn reference_index_on_toggle_panics() {
        BoundValue::toggle(vec![true, false]).reference_index();
    }

    #[test]
    #[should_panic(expected = "has no reference index")]
    fn set_reference_index_on_fixed_panics() {
        BoundValue::fixed(1u8).set_reference_index(1);
    }

    #[test]
    #[should_panic(expected = "not supported")]
    fn range_on_string_panics() {
        BoundValue::<String>::default().switch_to(BindingMode::ContinuousRange);
    }

    #[test]
    fn persists_as_tagged_object() {
        let value = BoundValue::discrete(vec!["a".to_string(), "b".to_string()], 1);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"mode": "discrete_map", "table": ["a", "b"], "reference_index": 1})
        );
        assert_eq!(
            serde_json::to_value(BoundValue::<u8>::ignore()).unwrap(),
            json!({"mode": "ignore"})
        );
    }

    #[test]
    fn restored_toggle_resumes_from_cursor() {
        let mut value = BoundValue::toggle(vec![1u8, 2, 3]);
        let mut out = 0;
        assert!(value.resolve(NO_INDEX, &mut out));
        assert_eq!(out, 1);

        let stored = serde_json::to_string(&value).unwrap();
        let mut restored: BoundValue<u8> = serde_json::from_str(&stored).unwrap();
        assert_eq!(restored, value);
        assert!(restored.resolve(NO_INDEX, &mut out));
        assert_eq!(out, 2);
    }

    #[test]
    fn loading_toggle_with_cursor_past_table_fails() {
        let stored = json!({"mode": "toggle", "table": [127, 0], "cursor": 5});
        let error = serde_json::from_value::<BoundValue<u8>>(stored).unwrap_err();
        assert!(error.to_string().contains("toggle cursor 5"));

        let stored = json!({"mode": "toggle", "table": [], "cursor": 1});
        assert!(serde_json::from_value::<BoundValue<u8>>(stored).is_err());

        let stored = json!({"mode": "toggle", "table": [127, 0], "cursor": 1});
        let mut restored: BoundValue<u8> = serde_json::from_value(stored).unwrap();
        let mut out = 127;
        assert!(restored.resolve(NO_INDEX, &mut out));
        assert_eq!(out, 0);
    }

    #[test]
    #[should_panic(expected = "outside its table")]
    fn toggle_cursor_past_table_panics() {
        BoundValue::new(BindingStrategy::Toggle(ToggleStrategy { table: vec![1u8, 2], cursor: 2 }));
    }

    #[test]
    #[should_panic(expected = "not supported")]
    fn replacing_strategy_checks_the_type() {
        let mut text = BoundValue::fixed(String::from("x"));
        text.set_strategy(BindingStrategy::Increment(IncrementStrategy { delta: 1.0 }));
    }

    #[test]
    fn set_strategy_keeps_parameters() {
        let mut value = BoundValue::<u8>::default();
        value.set_strategy(BindingStrategy::Toggle(ToggleStrategy { table: vec![1, 2], cursor: 1 }));
        assert_eq!(value.mode(), BindingMode::Toggle);
        let mut out = 0;
        assert!(value.resolve(NO_INDEX, &mut out));
        assert_eq!(out, 2);
    }

    #[test]
    fn every_mode_round_trips() {
        let values = [
            BoundValue::fixed(3.5f64),
            BoundValue::discrete(vec![0.0, 0.5, 1.0], 4),
            BoundValue::range(1.0, -1.0, 2),
            BoundValue::toggle(vec![0.0, 1.0]),
            BoundValue::increment(-0.25),
            BoundValue::ignore(),
        ];
        for value in values {
            let stored = serde_json::to_string(&value).unwrap();
            assert_eq!(serde_json::from_str::<BoundValue<f64>>(&stored).unwrap(), value);
        }
    }

    #[test]
    fn loading_numeric_mode_for_string_fails() {
        let stored = json!({"mode": "increment", "delta": 1.0});
        let error = serde_json::from_value::<BoundValue<String>>(stored).unwrap_err();
        assert!(error.to_string().contains("increment"));
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let value: BoundValue<u8> = serde_json::from_value(json!({"mode": "toggle", "table": [0, 127]})).unwrap();
        assert_eq!(value.strategy(), &BindingStrategy::Toggle(ToggleStrategy { table: vec![0, 127], cursor: 0 }));
    }
}
