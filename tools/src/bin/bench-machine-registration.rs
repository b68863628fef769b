use anyhow::Context;
use clap::Parser;
use load_tools::{
    IterationOutcome, LoadConfig, Lifecycle, MachineRegistrationApi,
    with_default_profile,
};
use rlt::{
    IterReport, {BenchSuite, IterInfo},
    cli::BenchCli,
};
use tokio::time::Instant;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Parser, Clone)]
pub struct Opts {
    /// Number of threads to use for the benchmark.
    #[clap(short, long)]
    pub threads: Option<usize>,
    /// Embed BenchCli into this Opts.
    #[command(flatten)]
    pub bench_opts: BenchCli,
}

#[derive(Clone)]
struct RegistrationBench {
    lifecycle: Lifecycle,
}

fn report(
    outcome: &IterationOutcome,
    duration: std::time::Duration,
) -> IterReport {
    let status = if outcome.success() {
        rlt::Status::success(200)
    } else if outcome
        .failed_checks()
        .any(|c| c.status.is_none_or(|s| s >= 500))
    {
        rlt::Status::server_error(500)
    } else {
        rlt::Status::client_error(400)
    };
    IterReport {
        duration,
        status,
        bytes: outcome.bytes,
        items: outcome.requests.max(1),
    }
}

#[async_trait::async_trait]
impl BenchSuite for RegistrationBench {
    type WorkerState = ();

    async fn state(&self, _: u32) -> anyhow::Result<Self::WorkerState> {
        Ok(())
    }

    async fn bench(
        &mut self,
        _: &mut Self::WorkerState,
        _: &IterInfo,
    ) -> anyhow::Result<IterReport> {
        let t = Instant::now();
        let outcome = self.lifecycle.iterate().await;
        Ok(report(&outcome, t.elapsed()))
    }
}

fn init_log() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse_from(with_default_profile(std::env::args()));
    init_log();
    let config = LoadConfig::from_env().context("invalid load configuration")?;
    tracing::debug!(?config, "load configuration");
    let api = MachineRegistrationApi::from_config(&config)
        .context("cannot build API client")?;
    let rt = load_tools::setup_runtime(opts.threads)?;
    rt.block_on(async {
        let bench = RegistrationBench {
            lifecycle: Lifecycle::new(api),
        };
        rlt::cli::run(opts.bench_opts, bench).await
    })
}
