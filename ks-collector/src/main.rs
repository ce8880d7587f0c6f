mod output;

use std::io::{
    self,
    BufWriter,
    Write,
};
use std::time::Duration;

use clap::Parser;
use kube::Client;
use ks_core::constants::*;
use ks_core::errors::*;
use ks_core::k8s::ResourceKind;
use ks_core::logging;
use ks_core::metrics::MemoryRecorder;
use ks_snapshot::Collector;
use ks_store::{
    CacheManager,
    CollectorConfig,
};
use tokio::time::{
    self,
    MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;
use tracing::*;

use crate::output::RecordWriter;

#[derive(Parser, Debug)]
#[command(about = "Periodically snapshot cluster objects as flat JSON records")]
struct Options {
    #[arg(short, long)]
    config_file: Option<String>,

    #[arg(short, long, default_value = "info")]
    verbosity: String,

    #[arg(long)]
    once: bool,
}

fn load_config(args: &Options) -> anyhow::Result<CollectorConfig> {
    match &args.config_file {
        Some(filename) => CollectorConfig::load(filename),
        None => CollectorConfig::default().validated(),
    }
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("received ctrl-c, shutting down");
            cancel.cancel();
        },
        Err(err) => error!("could not listen for ctrl-c: {err}"),
    }
}

// A failed pass is logged and retried on the next tick; in one-shot mode there is no next tick,
// so the error is returned instead.
async fn collect_loop<W: Write>(
    collector: &Collector,
    writer: &mut RecordWriter<W>,
    interval: Duration,
    once: bool,
    cancel: &CancellationToken,
) -> EmptyResult {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            _ = ticker.tick() => (),
        }

        match collector.collect_pass(cancel) {
            Ok(snapshot) => writer.write_snapshot(&snapshot)?,
            Err(_) if cancel.is_cancelled() => return Ok(()),
            Err(err) => {
                kserr!(err, "collection pass failed");
                if once {
                    return Err(err);
                }
            },
        }

        if once {
            return Ok(());
        }
    }
}

fn counter_summary(recorder: &MemoryRecorder, kind: ResourceKind) -> String {
    format!(
        "{kind}: {} records emitted, {} objects skipped, {} quantity fallbacks",
        recorder.counter_for_kind(RECORDS_EMITTED_METRIC, kind),
        recorder.counter_for_kind(SKIPPED_OBJECTS_METRIC, kind),
        recorder.counter_for_kind(QUANTITY_FALLBACKS_METRIC, kind),
    )
}

#[instrument(ret, err)]
async fn run(args: Options) -> EmptyResult {
    let config = load_config(&args)?;
    let recorder = MemoryRecorder::new().install_global()?;
    let client = Client::try_default().await?;
    let mut manager = CacheManager::start(client, &config);

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    tokio::select! {
        _ = manager.wait_ready() => (),
        _ = cancel.cancelled() => {
            manager.shutdown().await;
            return Ok(());
        },
    }

    let collector = Collector::new(&config, manager.caches());
    let mut writer = RecordWriter::new(BufWriter::new(io::stdout()));
    let res = collect_loop(&collector, &mut writer, config.interval(), args.once, &cancel).await;
    info!("wrote {} records", writer.written());
    for kind in collector.kinds() {
        info!("{}", counter_summary(&recorder, kind));
    }

    manager.shutdown().await;
    res
}

#[tokio::main]
async fn main() -> EmptyResult {
    let args = Options::parse();
    logging::setup(&args.verbosity);
    run(args).await
}

#[cfg(test)]
mod tests;
