//! The six ways a bound field can react to a candidate value and produce an
//! output value.

use serde::{Deserialize, Serialize};

use crate::binding::index::{denormalize, normalize, NormalizedIndex, NO_INDEX};
use crate::binding::mode::BindingMode;
use crate::binding::value::BindableValue;

/// Common contract of every strategy.
///
/// `match_candidate` runs while testing a trigger: `None` means the candidate
/// was declined, `Some(NO_INDEX)` accepted without an index to share.
/// `resolve` runs while producing outputs and writes into `output`, returning
/// whether a value was produced.
pub trait Strategy<T> {
    fn match_candidate(&mut self, candidate: &T) -> Option<NormalizedIndex>;
    fn resolve(&mut self, index: NormalizedIndex, output: &mut T) -> bool;
}

/// Strategies that can hand out an index while matching and borrow one while
/// resolving.
pub trait ReferenceHandler {
    fn reference_index(&self) -> i32;
    fn set_reference_index(&mut self, index: i32);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedStrategy<T> {
    pub value: T,
}

impl<T: BindableValue> Strategy<T> for FixedStrategy<T> {
    fn match_candidate(&mut self, candidate: &T) -> Option<NormalizedIndex> {
        (*candidate == self.value).then_some(NO_INDEX)
    }

    fn resolve(&mut self, _index: NormalizedIndex, output: &mut T) -> bool {
        *output = self.value.clone();
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteMapStrategy<T> {
    pub table: Vec<T>,
    #[serde(default)]
    pub reference_index: i32,
}

impl<T> DiscreteMapStrategy<T> {
    fn span(&self) -> f64 {
        self.table.len().saturating_sub(1) as f64
    }
}

impl<T: BindableValue> Strategy<T> for DiscreteMapStrategy<T> {
    fn match_candidate(&mut self, candidate: &T) -> Option<NormalizedIndex> {
        let position = self.table.iter().position(|entry| entry == candidate)?;
        Some(normalize(position as f64, self.span()))
    }

    fn resolve(&mut self, index: NormalizedIndex, output: &mut T) -> bool {
        if index < 0 {
            return false;
        }
        let position = denormalize(index, self.span()).round() as usize;
        match self.table.get(position) {
            Some(value) => {
                *output = value.clone();
                true
            }
            None => false,
        }
    }
}

impl<T> ReferenceHandler for DiscreteMapStrategy<T> {
    fn reference_index(&self) -> i32 {
        self.reference_index
    }

    fn set_reference_index(&mut self, index: i32) {
        self.reference_index = index;
    }
}

/// `max` may be below `min` for a descending range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousRangeStrategy<T> {
    pub min: T,
    pub max: T,
    #[serde(default)]
    pub reference_index: i32,
}

fn scalar<T: BindableValue>(value: &T) -> f64 {
    match value.to_scalar() {
        Some(scalar) => scalar,
        None => panic!("{value:?} is not numeric, it cannot be used in a continuous range"),
    }
}

impl<T: BindableValue> ContinuousRangeStrategy<T> {
    pub fn contains(&self, candidate: &T) -> bool {
        let (min, max, candidate) = (scalar(&self.min), scalar(&self.max), scalar(candidate));
        if min <= max {
            (min..=max).contains(&candidate)
        } else {
            (max..=min).contains(&candidate)
        }
    }
}

impl<T: BindableValue> Strategy<T> for ContinuousRangeStrategy<T> {
    fn match_candidate(&mut self, candidate: &T) -> Option<NormalizedIndex> {
        if !self.contains(candidate) {
            return None;
        }
        let min = scalar(&self.min);
        Some(normalize(scalar(candidate) - min, scalar(&self.max) - min))
    }

    fn resolve(&mut self, index: NormalizedIndex, output: &mut T) -> bool {
        if index < 0 {
            return false;
        }
        let min = scalar(&self.min);
        match T::from_scalar(min + denormalize(index, scalar(&self.max) - min)) {
            Some(value) => {
                *output = value;
                true
            }
            None => false,
        }
    }
}

impl<T> ReferenceHandler for ContinuousRangeStrategy<T> {
    fn reference_index(&self) -> i32 {
        self.reference_index
    }

    fn set_reference_index(&mut self, index: i32) {
        self.reference_index = index;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleStrategy<T> {
    pub table: Vec<T>,
    #[serde(default)]
    pub cursor: usize,
}

impl<T: BindableValue> ToggleStrategy<T> {
    pub fn current(&self) -> Option<&T> {
        self.table.get(self.cursor)
    }

    fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor >= self.table.len() {
            self.cursor = 0;
        }
    }
}

impl<T: BindableValue> Strategy<T> for ToggleStrategy<T> {
    fn match_candidate(&mut self, candidate: &T) -> Option<NormalizedIndex> {
        if self.current()? != candidate {
            return None;
        }
        self.advance();
        Some(NO_INDEX)
    }

    fn resolve(&mut self, _index: NormalizedIndex, output: &mut T) -> bool {
        let Some(value) = self.current().cloned() else {
            return false;
        };
        *output = value;
        self.advance();
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncrementStrategy {
    pub delta: f64,
}

impl<T: BindableValue> Strategy<T> for IncrementStrategy {
    fn match_candidate(&mut self, _candidate: &T) -> Option<NormalizedIndex> {
        Some(NO_INDEX)
    }

    fn resolve(&mut self, _index: NormalizedIndex, output: &mut T) -> bool {
        match output.offset(self.delta) {
            Some(value) => {
                *output = value;
                true
            }
            None => panic!("{output:?} is not numeric, it cannot be incremented"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BindingStrategy<T> {
    Fixed(FixedStrategy<T>),
    DiscreteMap(DiscreteMapStrategy<T>),
    ContinuousRange(ContinuousRangeStrategy<T>),
    Toggle(ToggleStrategy<T>),
    Increment(IncrementStrategy),
    Ignore,
}

impl<T: BindableValue> BindingStrategy<T> {
    /// A freshly configured strategy for `mode`.
    pub fn default_for(mode: BindingMode) -> Self {
        match mode {
            BindingMode::Fixed => BindingStrategy::Fixed(FixedStrategy { value: T::default() }),
            BindingMode::DiscreteMap => BindingStrategy::DiscreteMap(DiscreteMapStrategy {
                table: Vec::new(),
                reference_index: 0,
            }),
            // full 7 bit MIDI data range
            BindingMode::ContinuousRange => BindingStrategy::ContinuousRange(ContinuousRangeStrategy {
                min: T::from_scalar(0.0).unwrap_or_default(),
                max: T::from_scalar(127.0).unwrap_or_default(),
                reference_index: 0,
            }),
            BindingMode::Toggle => BindingStrategy::Toggle(ToggleStrategy {
                table: Vec::new(),
                cursor: 0,
            }),
            BindingMode::Increment => BindingStrategy::Increment(IncrementStrategy { delta: 1.0 }),
            BindingMode::Ignore => BindingStrategy::Ignore,
        }
    }

    pub fn mode(&self) -> BindingMode {
        match self {
            BindingStrategy::Fixed(_) => BindingMode::Fixed,
            BindingStrategy::DiscreteMap(_) => BindingMode::DiscreteMap,
            BindingStrategy::ContinuousRange(_) => BindingMode::ContinuousRange,
            BindingStrategy::Toggle(_) => BindingMode::Toggle,
            BindingStrategy::Increment(_) => BindingMode::Increment,
            BindingStrategy::Ignore => BindingMode::Ignore,
        }
    }

    pub fn reference_handler(&self) -> Option<&dyn ReferenceHandler> {
        match self {
            BindingStrategy::DiscreteMap(s) => Some(s),
            BindingStrategy::ContinuousRange(s) => Some(s),
            _ => None,
        }
    }

    pub fn reference_handler_mut(&mut self) -> Option<&mut dyn ReferenceHandler> {
        match self {
            BindingStrategy::DiscreteMap(s) => Some(s),
            BindingStrategy::ContinuousRange(s) => Some(s),
            _ => None,
        }
    }
}

impl<T: BindableValue> Strategy<T> for BindingStrategy<T> {
    fn match_candidate(&mut self, candidate: &T) -> Option<NormalizedIndex> {
        match self {
            BindingStrategy::Fixed(s) => s.match_candidate(candidate),
            BindingStrategy::DiscreteMap(s) => s.match_candidate(candidate),
            BindingStrategy::ContinuousRange(s) => s.match_candidate(candidate),
            BindingStrategy::Toggle(s) => s.match_candidate(candidate),
            BindingStrategy::Increment(s) => Strategy::<T>::match_candidate(s, candidate),
            BindingStrategy::Ignore => Some(NO_INDEX),
        }
    }

    fn resolve(&mut self, index: NormalizedIndex, output: &mut T) -> bool {
        match self {
            BindingStrategy::Fixed(s) => s.resolve(index, output),
            BindingStrategy::DiscreteMap(s) => s.resolve(index, output),
            BindingStrategy::ContinuousRange(s) => s.resolve(index, output),
            BindingStrategy::Toggle(s) => s.resolve(index, output),
            BindingStrategy::Increment(s) => Strategy::<T>::resolve(s, index, output),
            BindingStrategy::Ignore => true,
        }
    }
}
