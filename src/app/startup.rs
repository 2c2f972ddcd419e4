//! Application startup and the publishing run

use super::cli::args::Args;
use super::cli::config::load_settings;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::shutdown::ShutdownCoordinator;
use crate::producer::{
    create_producer, MemoryWriter, ProduceResult, Producer, ProducerConfig, ProducerSettings,
};
use clap::Parser;
use futures::stream::{self, StreamExt};
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

/// Exit code when configuration prevents the producer from starting
pub const EXIT_CONFIG_ERROR: i32 = 1;

/// Exit code when at least one record could not be published
pub const EXIT_RECORD_FAILURES: i32 = 2;

/// Outcome counts of a publishing run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub published: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, result: ProduceResult<()>) {
        match result {
            Ok(()) => self.published += 1,
            Err(e) => {
                self.failed += 1;
                log::warn!("error publishing record: {}", e);
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            EXIT_RECORD_FAILURES
        } else {
            0
        }
    }
}

/// Parse arguments, run the producer and return the process exit code
pub fn startup() -> i32 {
    let args = Args::parse();
    let use_color = args.use_color(std::io::stdout().is_terminal());
    let log_file = args
        .log_file
        .as_ref()
        .map(|p| p.to_string_lossy().to_string());

    if let Err(e) = init_logging(
        args.log_level.as_deref(),
        args.log_format.as_deref(),
        log_file.as_deref(),
        use_color,
    ) {
        eprintln!("Error initialising logging: {}", e);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error starting async runtime: {}", e);
            return EXIT_CONFIG_ERROR;
        }
    };

    runtime.block_on(run(args))
}

async fn run(args: Args) -> i32 {
    let settings = match load_settings(&args).await {
        Ok(settings) => settings,
        Err(e) => {
            log_error_with_context(&e, "Loading configuration");
            return EXIT_CONFIG_ERROR;
        }
    };

    let stream = settings.stream.trim().to_string();
    let writer = Arc::new(MemoryWriter::new().with_stream(&stream, args.shards));
    let producer = match create_producer(ProducerConfig::new(settings.clone(), writer.clone())) {
        Ok(producer) => producer,
        Err(e) => {
            log_error_with_context(&e, "Creating producer");
            return EXIT_CONFIG_ERROR;
        }
    };

    let shutdown = ShutdownCoordinator::new();
    shutdown.install_signal_handlers();

    log::info!("starting producer for stream {} ({} records)", stream, args.count);
    producer.start().await;
    let summary = publish(producer.clone(), &settings, &args, &shutdown).await;
    producer.stop().await;

    println!(
        "published {}/{} records to stream '{}' ({} failed, {} stored)",
        summary.published,
        args.count,
        stream,
        summary.failed,
        writer.record_count(&stream)
    );
    summary.exit_code()
}

/// Submit `args.count` records, keeping enough calls open to fill the backlog
///
/// A shutdown request ends submission at once, even in the middle of the
/// pause between records.
pub async fn publish(
    producer: Arc<dyn Producer>,
    settings: &ProducerSettings,
    args: &Args,
    shutdown: &ShutdownCoordinator,
) -> RunSummary {
    let interval = Duration::from_millis(args.interval_ms);
    let open_calls = match settings.clone().with_defaults() {
        Ok(resolved) => resolved.concurrency + resolved.backlog,
        Err(_) => 1,
    };

    stream::iter(0..args.count)
        .then(|index| async move {
            if !interval.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = shutdown.wait() => {}
                }
            }
            index
        })
        .take_while(|_| futures::future::ready(!shutdown.is_shutdown_requested()))
        .map(|index| {
            let producer = producer.clone();
            let key = format!("{}-{}", args.key_prefix, index);
            let payload = format!("hello there - {}", index);
            async move { producer.produce(&key, payload.as_bytes()).await }
        })
        .buffer_unordered(open_calls)
        .fold(RunSummary::default(), |mut summary, result| async move {
            summary.record(result);
            summary
        })
        .await
}
