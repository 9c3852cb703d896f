use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;

use tomoview::backend::{TraceBackend, TraceFilter};
use tomoview::data::fetch::{self, DatasetRegistry};
use tomoview::data::loader;
use tomoview::dispatch::{Dispatcher, ParamEvent};
use tomoview::{ControlParameter, ParameterPipeline};

const PARAM: &str = "sigma";

/// Volume-rendering demo: one slider (the Gaussian-smoothing sigma) bound to
/// one pipeline. Reads slider values from stdin, one per line; EOF quits.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let dataset_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "star_nanoparticle".to_string());

    let data_dir = fetch::data_dir();
    let registry = DatasetRegistry::discover(&data_dir)?;
    let spec = registry
        .get(&dataset_id)
        .with_context(|| format!("known datasets: {:?}", registry.ids()))?;

    let path = fetch::fetch_dataset(spec, &data_dir).context("fetching dataset")?;
    let volume = loader::load_volume(&path).context("loading volume")?;
    log::info!(
        "dataset '{dataset_id}': dims {:?}, scalar range {:?}, color map '{}', opacity {:?}",
        volume.dims(),
        volume.scalar_range(),
        spec.transfer.color_map,
        spec.transfer.opacity
    );

    // TraceFilter stands in for the native Gaussian; a real run would hand
    // the smoothing over to the visualization library here.
    let param = ControlParameter::new(PARAM, 0.0, 0.0, 10.0, 0.05)?;
    let pipeline = ParameterPipeline::smoothing(
        param,
        TraceBackend::new("volume"),
        volume,
        Box::new(TraceFilter),
    )?;

    let (tx, rx) = mpsc::channel();
    let reader = thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match trimmed.parse::<f64>() {
                Ok(value) => {
                    if tx.send(ParamEvent::new(PARAM, value)).is_err() {
                        break;
                    }
                }
                Err(_) => log::warn!("ignoring non-numeric input '{trimmed}'"),
            }
        }
    });

    let mut dispatcher = Dispatcher::new();
    dispatcher.subscribe(PARAM, Box::new(pipeline));

    log::info!("enter sigma values (one per line), Ctrl-D to quit");
    dispatcher.run(rx)?;
    let _ = reader.join();
    Ok(())
}
