use std::ops::{Deref, DerefMut};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::binding::tester::MatchTester;

/// Everyone interested in the fulfilled testers of one trigger.
#[derive(Debug, Default)]
pub struct FulfillmentObservers {
    observers: Vec<UnboundedSender<MatchTester>>,
}

impl FulfillmentObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<MatchTester> {
        self.observers.retain(|observer| !observer.is_closed());
        let (sender, receiver) = unbounded_channel();
        self.observers.push(sender);
        receiver
    }

    /// Sends `tester` to every live observer and returns how many received it.
    pub fn publish(&self, tester: MatchTester) -> usize {
        let mut delivered = 0;
        for observer in &self.observers {
            if observer.send(tester.clone()).is_ok() {
                delivered += 1;
            } else {
                debug!("fulfillment observer went away");
            }
        }
        delivered
    }
}

/// Scope guard around a fresh [`MatchTester`].
///
/// Populate it through `Deref`; when the guard goes out of scope, on whatever
/// path, the tester is published if it is still valid and dropped otherwise.
/// A guard whose test sequence was cut short before any rejection therefore
/// still publishes, so test every trigger field before leaving the scope.
pub struct Fulfillment<'a> {
    observers: &'a FulfillmentObservers,
    tester: MatchTester,
}

impl<'a> Fulfillment<'a> {
    pub fn new(observers: &'a FulfillmentObservers) -> Self {
        Self {
            observers,
            tester: MatchTester::new(),
        }
    }
}

impl Deref for Fulfillment<'_> {
    type Target = MatchTester;

    fn deref(&self) -> &Self::Target {
        &self.tester
    }
}

impl DerefMut for Fulfillment<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tester
    }
}

impl Drop for Fulfillment<'_> {
    fn drop(&mut self) {
        if self.tester.valid() {
            self.observers.publish(std::mem::take(&mut self.tester));
        }
    }
}
