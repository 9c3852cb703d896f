use std::collections::BTreeMap;
use std::sync::mpsc::{Receiver, TryRecvError};

use crate::backend::RenderBackend;
use crate::error::{Result, TomoError};
use crate::pipeline::{ParameterPipeline, UpdateOutcome};

// ---------------------------------------------------------------------------
// Parameter-change events
// ---------------------------------------------------------------------------

/// A parameter-change event delivered by the UI/transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamEvent {
    pub name: String,
    pub value: f64,
}

impl ParamEvent {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Anything that can react to a change of its bound parameter.
pub trait ParamSubscriber {
    fn on_change(&mut self, value: f64) -> Result<UpdateOutcome>;
}

impl<B: RenderBackend> ParamSubscriber for ParameterPipeline<B> {
    fn on_change(&mut self, value: f64) -> Result<UpdateOutcome> {
        self.submit(value)
    }
}

// ---------------------------------------------------------------------------
// Dispatcher – explicit subscription registry + synchronous event loop
// ---------------------------------------------------------------------------

/// Maps parameter names to their subscribers and dispatches change events
/// synchronously, one at a time.
///
/// The dispatcher is the single writer for everything it owns: each handler
/// invocation runs to completion before the next event is looked at. When
/// several events are already queued, they are coalesced per parameter name to
/// the last value before any handler runs, so rapid slider drags do not spend
/// recomputation on superseded intermediate values.
#[derive(Default)]
pub struct Dispatcher {
    subscribers: BTreeMap<String, Box<dyn ParamSubscriber>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the subscriber for a parameter name, one per parameter.
    /// A later registration under the same name replaces the earlier one.
    pub fn subscribe(&mut self, name: impl Into<String>, subscriber: Box<dyn ParamSubscriber>) {
        self.subscribers.insert(name.into(), subscriber);
    }

    /// Dispatch a single event to its subscriber.
    pub fn dispatch(&mut self, event: &ParamEvent) -> Result<UpdateOutcome> {
        match self.subscribers.get_mut(&event.name) {
            Some(subscriber) => subscriber.on_change(event.value),
            None => Err(TomoError::UnknownParameter(event.name.clone())),
        }
    }

    /// Drain every queued event without blocking, coalescing to the last value
    /// per parameter, then dispatch. Returns the number of dispatched events.
    ///
    /// A rejected update is logged and does not stop the rest of the batch:
    /// a shape mismatch on one parameter must not swallow a queued change to
    /// another.
    pub fn drain(&mut self, rx: &Receiver<ParamEvent>) -> usize {
        let mut batch: BTreeMap<String, f64> = BTreeMap::new();
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    batch.insert(event.name, event.value);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.dispatch_batch(batch)
    }

    /// Run the event loop until the channel disconnects.
    ///
    /// Blocks for the next event, then opportunistically folds in everything
    /// else already queued (last-value-wins per parameter) before dispatching.
    /// Rejected updates are logged and the loop keeps serving; the previously
    /// rendered frame stays up.
    pub fn run(&mut self, rx: Receiver<ParamEvent>) -> Result<()> {
        while let Ok(first) = rx.recv() {
            let mut batch: BTreeMap<String, f64> = BTreeMap::new();
            batch.insert(first.name, first.value);
            while let Ok(event) = rx.try_recv() {
                batch.insert(event.name, event.value);
            }
            self.dispatch_batch(batch);
        }
        Ok(())
    }

    /// Dispatch a coalesced batch, one handler at a time. Errors are logged,
    /// never propagated, so every entry gets its turn.
    fn dispatch_batch(&mut self, batch: BTreeMap<String, f64>) -> usize {
        let dispatched = batch.len();
        for (name, value) in batch {
            match self.dispatch(&ParamEvent {
                name: name.clone(),
                value,
            }) {
                Ok(outcome) => log::debug!("'{name}' <- {value}: {outcome:?}"),
                Err(err) => log::error!("'{name}' <- {value}: update rejected: {err}"),
            }
        }
        dispatched
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    /// Records every value it is asked to apply; pretends nothing is a no-op.
    struct Recorder {
        seen: std::rc::Rc<std::cell::RefCell<Vec<f64>>>,
    }

    impl ParamSubscriber for Recorder {
        fn on_change(&mut self, value: f64) -> Result<UpdateOutcome> {
            self.seen.borrow_mut().push(value);
            Ok(UpdateOutcome::Applied)
        }
    }

    fn recorder() -> (Box<Recorder>, std::rc::Rc<std::cell::RefCell<Vec<f64>>>) {
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        (
            Box::new(Recorder { seen: seen.clone() }),
            seen,
        )
    }

    #[test]
    fn routes_by_parameter_name() {
        let mut dispatcher = Dispatcher::new();
        let (contour, contour_seen) = recorder();
        let (sigma, sigma_seen) = recorder();
        dispatcher.subscribe("contour_value", contour);
        dispatcher.subscribe("sigma", sigma);

        dispatcher
            .dispatch(&ParamEvent::new("contour_value", 42.0))
            .unwrap();
        dispatcher.dispatch(&ParamEvent::new("sigma", 1.5)).unwrap();

        assert_eq!(*contour_seen.borrow(), vec![42.0]);
        assert_eq!(*sigma_seen.borrow(), vec![1.5]);
    }

    #[test]
    fn unknown_parameter_is_rejected_loudly() {
        let mut dispatcher = Dispatcher::new();
        let err = dispatcher
            .dispatch(&ParamEvent::new("no_such_param", 1.0))
            .unwrap_err();
        assert!(matches!(err, TomoError::UnknownParameter(_)));
    }

    #[test]
    fn rapid_fire_events_coalesce_to_the_last_value() {
        let mut dispatcher = Dispatcher::new();
        let (contour, seen) = recorder();
        dispatcher.subscribe("contour_value", contour);

        let (tx, rx) = mpsc::channel();
        for v in [20.0, 30.0, 40.0] {
            tx.send(ParamEvent::new("contour_value", v)).unwrap();
        }

        let dispatched = dispatcher.drain(&rx);
        assert_eq!(dispatched, 1);
        assert_eq!(*seen.borrow(), vec![40.0]);
    }

    #[test]
    fn coalescing_is_per_parameter() {
        let mut dispatcher = Dispatcher::new();
        let (contour, contour_seen) = recorder();
        let (sigma, sigma_seen) = recorder();
        dispatcher.subscribe("contour_value", contour);
        dispatcher.subscribe("sigma", sigma);

        let (tx, rx) = mpsc::channel();
        tx.send(ParamEvent::new("contour_value", 20.0)).unwrap();
        tx.send(ParamEvent::new("sigma", 1.0)).unwrap();
        tx.send(ParamEvent::new("contour_value", 35.0)).unwrap();

        assert_eq!(dispatcher.drain(&rx), 2);
        assert_eq!(*contour_seen.borrow(), vec![35.0]);
        assert_eq!(*sigma_seen.borrow(), vec![1.0]);
    }

    #[test]
    fn rejected_update_does_not_starve_the_rest_of_the_batch() {
        struct Rejecting;

        impl ParamSubscriber for Rejecting {
            fn on_change(&mut self, _value: f64) -> Result<UpdateOutcome> {
                Err(TomoError::ShapeMismatch {
                    expected: [4, 3, 2],
                    actual: [2, 3, 4],
                })
            }
        }

        let mut dispatcher = Dispatcher::new();
        let (sigma, sigma_seen) = recorder();
        // BTreeMap order dispatches "contour_value" first, so the rejection
        // happens before the sigma entry gets its turn.
        dispatcher.subscribe("contour_value", Box::new(Rejecting));
        dispatcher.subscribe("sigma", sigma);

        let (tx, rx) = mpsc::channel();
        tx.send(ParamEvent::new("contour_value", 20.0)).unwrap();
        tx.send(ParamEvent::new("sigma", 1.5)).unwrap();

        assert_eq!(dispatcher.drain(&rx), 2);
        assert_eq!(*sigma_seen.borrow(), vec![1.5]);
    }

    #[test]
    fn run_ends_when_the_event_source_disconnects() {
        let mut dispatcher = Dispatcher::new();
        let (contour, seen) = recorder();
        dispatcher.subscribe("contour_value", contour);

        let (tx, rx) = mpsc::channel();
        tx.send(ParamEvent::new("contour_value", 12.0)).unwrap();
        tx.send(ParamEvent::new("unknown", 1.0)).unwrap();
        drop(tx);

        // The unknown parameter is logged, not fatal.
        dispatcher.run(rx).unwrap();
        assert_eq!(*seen.borrow(), vec![12.0]);
    }
}
