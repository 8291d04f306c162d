use anyhow::Context;
use clap::Parser;
use mailsweep::core::source;
use mailsweep::utils::{logger, validation::Validate};
use mailsweep::{transport, CliConfig, DeliveryReport, Dispatcher, IntervalPacer};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting mailsweep");

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    match run(&config).await {
        Ok(report) => {
            println!(
                "✅ Dispatch complete: {} sent, {} failed, {} total",
                report.sent,
                report.failed,
                report.total()
            );
        }
        Err(e) => {
            // Fatal configuration/source errors only; per-recipient delivery
            // failures are recorded in the report and do not land here.
            tracing::error!("Run failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(config: &CliConfig) -> anyhow::Result<DeliveryReport> {
    let recipients = source::load(&config.recipient_spec()?)?;
    tracing::info!(recipients = recipients.len(), "recipient list loaded");
    if recipients.is_empty() {
        tracing::warn!("recipient list is empty, nothing to send");
    }

    let base_message = config.base_message()?;
    let message = config.composer().compose(
        &base_message,
        config.link().as_ref(),
        config.attachment.as_deref(),
    );

    let transport = transport::from_config(&config.delivery())?;
    let dispatcher = Dispatcher::new(transport);

    // Ctrl-C requests cooperative cancellation; the in-flight attempt still
    // runs to completion.
    let cancel = dispatcher.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling after current attempt");
            cancel.cancel();
        }
    });

    let mut pacer = IntervalPacer::new(config.throttle());
    let report = dispatcher.dispatch(&recipients, &message, &mut pacer).await;

    if let Some(path) = &config.report_json {
        std::fs::write(path, serde_json::to_vec_pretty(&report)?)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "delivery report written");
    }

    Ok(report)
}
