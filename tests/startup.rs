//! End-to-end wiring: dataset defaults through the pipeline and dispatcher,
//! the way the demo binaries assemble them.

use std::sync::mpsc;

use tomoview::backend::TraceBackend;
use tomoview::data::fetch::{DatasetRegistry, SCALAR_MAX, SCALAR_MIN};
use tomoview::dispatch::{Dispatcher, ParamEvent};
use tomoview::{ControlParameter, ParameterPipeline, UpdateOutcome};

fn contour_pipeline(dataset: &str) -> ParameterPipeline<TraceBackend> {
    let registry = DatasetRegistry::builtin();
    let spec = registry.get(dataset).expect("builtin dataset");
    let param = ControlParameter::new(
        "contour_value",
        spec.threshold_default,
        spec.threshold_min,
        SCALAR_MAX,
        1.0,
    )
    .expect("valid parameter");
    ParameterPipeline::threshold(param, TraceBackend::new(dataset)).expect("startup render")
}

#[test]
fn star_nanoparticle_starts_at_isovalue_10() {
    let pipeline = contour_pipeline("star_nanoparticle");
    assert_eq!(pipeline.backend().threshold(), Some(10.0));
    assert!(pipeline.param().value() >= 1.0 && pipeline.param().value() <= 255.0);
    assert_eq!(pipeline.backend().redraws(), 1);
}

#[test]
fn nanotube_starts_at_isovalue_127_with_fixed_scalar_range() {
    let pipeline = contour_pipeline("nanotube");
    assert_eq!(pipeline.backend().threshold(), Some(127.0));
    assert_eq!((SCALAR_MIN, SCALAR_MAX), (0.0, 255.0));
    assert_eq!(pipeline.param().max(), SCALAR_MAX);
}

#[test]
fn queued_slider_drag_renders_the_final_value_only() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.subscribe("contour_value", Box::new(contour_pipeline("star_nanoparticle")));

    let (tx, rx) = mpsc::channel();
    for v in [11.0, 57.0, 123.0, 42.0] {
        tx.send(ParamEvent::new("contour_value", v)).expect("queue event");
    }
    drop(tx);

    // One drain cycle sees the whole queued drag: only 42 is applied.
    let dispatched = dispatcher.drain(&rx);
    assert_eq!(dispatched, 1);

    // Re-submitting the final value is a no-op, so 42 is what is on screen.
    let outcome = dispatcher
        .dispatch(&ParamEvent::new("contour_value", 42.0))
        .expect("dispatch");
    assert_eq!(outcome, UpdateOutcome::NoChange);
}
