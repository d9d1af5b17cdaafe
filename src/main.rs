// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context};
use std::env;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use vcon_pipeline::api::PipelineService;
use vcon_pipeline::backends::local::{LocalProcessorFactory, LOCAL_MODULE};
use vcon_pipeline::config::{load_pipeline_seeds, seed_pipelines, Settings};
use vcon_pipeline::pipeline::{PipelineJobHandler, PipelineRunner, PipelineStore};
use vcon_pipeline::processor::{InitOptions, ProcessorRegistry};
use vcon_pipeline::queue::open_job_queue;
use vcon_pipeline::scheduler::{BackgroundScheduler, SchedulerOptions};
use vcon_pipeline::storage::{open_key_value_store, open_vcon_storage};

const USAGE: &str = "\
Usage: vcon-pipeline [--config <settings.toml>] [command]

Commands:
  serve                       run the background scheduler until Ctrl-C (default)
  run <pipeline> <vcon.json>  run one pipeline over a vCon file and print the result
  docs                        print the processor catalogue as markdown";

enum Command {
    Serve,
    Run { pipeline: String, vcon_path: String },
    Docs,
}

struct Args {
    config: Option<String>,
    command: Command,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut config = None;
    let mut rest = Vec::new();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                config = Some(iter.next().context("--config needs a path")?.clone());
            }
            "--help" | "-h" => bail!("{}", USAGE),
            _ => rest.push(arg.clone()),
        }
    }

    let command = match rest.as_slice() {
        [] => Command::Serve,
        [cmd] if cmd == "serve" => Command::Serve,
        [cmd] if cmd == "docs" => Command::Docs,
        [cmd, pipeline, vcon_path] if cmd == "run" => Command::Run {
            pipeline: pipeline.clone(),
            vcon_path: vcon_path.clone(),
        },
        _ => bail!("{}", USAGE),
    };
    Ok(Args { config, command })
}

/// Registry from configured processors, or every built-in under its class name.
fn build_registry(settings: &Settings) -> ProcessorRegistry {
    let mut registry = ProcessorRegistry::new();
    registry.add_module(LocalProcessorFactory::module());

    if settings.processors.is_empty() {
        for class_name in LocalProcessorFactory::list_available_implementations() {
            registry.register(
                InitOptions::new(),
                class_name,
                LOCAL_MODULE,
                class_name,
                None,
                None,
            );
        }
    } else {
        settings.register_processors(&mut registry);
    }

    let failed = registry.len() - registry.processor_names(true).len();
    if failed > 0 {
        tracing::warn!(failed, "some processors could not be instantiated");
    }
    registry
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let args = parse_args(&args)?;

    let settings = match &args.config {
        Some(path) => Settings::load(path).with_context(|| format!("loading {}", path))?,
        None => Settings::from_env()?,
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let storage = open_vcon_storage(&settings.vcon_storage_url)?;
    let queue = open_job_queue(&settings.queue_db_url)?;
    let key_value = open_key_value_store(&settings.pipeline_db_url).await?;

    let registry = Arc::new(build_registry(&settings));
    let pipelines = PipelineStore::new(key_value, registry.clone());
    if let Some(seed_file) = &settings.pipeline_seed_file {
        let seeds = load_pipeline_seeds(seed_file)
            .with_context(|| format!("loading {}", seed_file.display()))?;
        let count = seed_pipelines(&pipelines, &seeds).await?;
        tracing::info!(count, "seeded pipelines");
    }

    let runner = PipelineRunner::new(registry.clone());
    let service = PipelineService::new(
        pipelines.clone(),
        runner.clone(),
        storage.clone(),
        queue.clone(),
    );

    match args.command {
        Command::Docs => {
            println!("{}", registry.processor_docs());
        }
        Command::Run {
            pipeline,
            vcon_path,
        } => {
            let text = tokio::fs::read_to_string(&vcon_path)
                .await
                .with_context(|| format!("reading {}", vcon_path))?;
            let body = serde_json::from_str::<serde_json::Value>(&text)
                .with_context(|| format!("parsing {}", vcon_path))?;

            let response = service.run_pipeline_inline(&pipeline, body, None, true).await;
            println!("status: {}", response.status);
            if let Some(body) = &response.body {
                println!("{}", serde_json::to_string_pretty(body)?);
            }
            if !response.is_success() {
                bail!("pipeline '{}' did not complete", pipeline);
            }
        }
        Command::Serve => {
            let scheduler = if settings.scheduler.run_background_jobs
                && !settings.job_queues.is_empty()
            {
                let handler = PipelineJobHandler::new(queue, pipelines, runner, storage);
                let options = SchedulerOptions::new(settings.job_queues.clone())
                    .with_startup_delay(settings.scheduler.startup_delay())
                    .with_poll_interval(settings.scheduler.poll_interval());
                Some(BackgroundScheduler::start(handler, options, None))
            } else {
                tracing::info!("background jobs disabled or no job queues configured");
                None
            };

            tokio::signal::ctrl_c()
                .await
                .context("waiting for Ctrl-C")?;
            tracing::info!("shutting down");
            if let Some(scheduler) = scheduler {
                scheduler.shutdown().await;
            }
        }
    }

    Ok(())
}
