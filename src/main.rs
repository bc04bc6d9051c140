//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `stream_status` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use chrono::TimeZone;
use clap::Parser;
use log::warn;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

use stream_status::config::{
    CONNECT_TIMEOUT_SECS, DB_PATH, DEFAULT_USER_AGENT, MAX_REDIRECT_HOPS, TOTAL_TIMEOUT_SECS,
};
use stream_status::initialization::init_logger_with;
use stream_status::{
    delete_run_record, init_db_pool_with_path, parse_target_list, query_run_history, render_report,
    run_batch, save_run_record, LogFormat, LogLevel, ProxyConfig, RunConfig,
};

#[derive(Parser, Debug)]
#[command(
    name = "stream_status",
    version,
    about = "Batch-tests M3U8 live stream sources, optionally through a SOCKS5 proxy."
)]
struct Cli {
    /// Channel list file ("name,url" lines, "group,#genre#" markers, or bare
    /// URLs); "-" reads from stdin
    file: Option<PathBuf>,

    /// SOCKS5 proxy as host:port; omit for direct connection
    #[arg(long)]
    proxy: Option<String>,

    /// SOCKS5 username
    #[arg(long, env = "STREAM_STATUS_PROXY_USER")]
    proxy_username: Option<String>,

    /// SOCKS5 password
    #[arg(long, env = "STREAM_STATUS_PROXY_PASS", hide_env_values = true)]
    proxy_password: Option<String>,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Resolve and connect over IPv4 only
    #[arg(long)]
    force_ipv4: bool,

    /// Verify SOCKS5 connectivity once before the batch; a failed handshake
    /// aborts the run
    #[arg(long)]
    test_proxy_first: bool,

    /// Stop the batch when a failure's error text looks proxy-level
    #[arg(long)]
    stop_on_first_failure: bool,

    /// Skip targets whose URL does not contain ".m3u8"
    #[arg(long)]
    only_m3u8: bool,

    /// Override the stop-on-first-failure error text pattern (regex)
    #[arg(long)]
    abort_pattern: Option<String>,

    /// Maximum redirect hops per fetch
    #[arg(long, default_value_t = MAX_REDIRECT_HOPS)]
    max_redirects: usize,

    /// TCP connect timeout per fetch, in seconds
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS)]
    connect_timeout: u64,

    /// End-to-end fetch timeout, in seconds
    #[arg(long, default_value_t = TOTAL_TIMEOUT_SECS)]
    timeout: u64,

    /// Write the grouped valid/timed-out/invalid report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// History database path (SQLite file)
    #[arg(long, default_value = DB_PATH)]
    db_path: PathBuf,

    /// Do not record this run in history
    #[arg(long)]
    no_history: bool,

    /// List stored runs and exit
    #[arg(long)]
    show_history: bool,

    /// Delete one stored run by id and exit
    #[arg(long, value_name = "ID")]
    delete_record: Option<i64>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Allows keeping proxy credentials in .env instead of shell history
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    if cli.show_history || cli.delete_record.is_some() {
        let pool = init_db_pool_with_path(&cli.db_path)
            .await
            .context("Failed to open history database")?;
        if let Some(id) = cli.delete_record {
            if delete_run_record(&pool, id).await? {
                println!("Deleted run {id}");
            } else {
                println!("No stored run with id {id}");
            }
        } else {
            print_history(&pool).await?;
        }
        return Ok(());
    }

    let Some(file) = cli.file.clone() else {
        bail!("no channel list file given (see --help, or --show-history for past runs)");
    };
    let text = if file.as_os_str() == "-" {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("Failed to read channel list from stdin")?;
        buffer
    } else {
        tokio::fs::read_to_string(&file)
            .await
            .with_context(|| format!("Failed to read channel list {}", file.display()))?
    };
    let targets = parse_target_list(&text);

    let proxy = build_proxy(&cli)?;
    let proxy_label = proxy.as_ref().map(|p| p.label());
    let config = RunConfig {
        proxy,
        user_agent: cli.user_agent.clone(),
        force_ipv4: cli.force_ipv4,
        probe_proxy_first: cli.test_proxy_first,
        stop_on_first_failure: cli.stop_on_first_failure,
        only_playlist_urls: cli.only_m3u8,
        max_redirects: cli.max_redirects,
        connect_timeout_secs: cli.connect_timeout,
        total_timeout_secs: cli.timeout,
        abort_pattern: cli.abort_pattern.clone(),
    };

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; finishing the current target, then stopping");
            interrupt.cancel();
        }
    });

    match run_batch(targets, &config, cancel, None).await {
        Ok(summary) => {
            println!(
                "✅ Probed {} target{} ({} succeeded, {} failed, {} skipped) - success rate {:.2}%, valid playlists {:.2}%",
                summary.total_count,
                if summary.total_count == 1 { "" } else { "s" },
                summary.success_count,
                summary.failed_count,
                summary.skipped_count,
                summary.success_rate(),
                summary.valid_playlist_rate()
            );

            if let Some(path) = &cli.report {
                let report = render_report(&summary, proxy_label.as_deref());
                tokio::fs::write(path, report)
                    .await
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                println!("Report written to {}", path.display());
            }

            if !cli.no_history {
                match init_db_pool_with_path(&cli.db_path).await {
                    Ok(pool) => match save_run_record(&pool, &summary, proxy_label.as_deref()).await
                    {
                        Ok(id) => println!("Run recorded in history (id {id})"),
                        Err(e) => warn!("Failed to record run in history: {e}"),
                    },
                    Err(e) => warn!("Failed to open history database: {e}"),
                }
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("stream_status error: {e:#}");
            process::exit(1);
        }
    }
}

/// Builds the proxy configuration from `--proxy host:port` plus credentials.
fn build_proxy(cli: &Cli) -> Result<Option<ProxyConfig>> {
    let Some(raw) = cli.proxy.as_deref() else {
        return Ok(None);
    };
    let (host, port) = raw
        .rsplit_once(':')
        .with_context(|| format!("proxy {raw:?} must be host:port"))?;
    if host.is_empty() {
        bail!("proxy host must not be empty");
    }
    let port: u16 = port
        .parse()
        .with_context(|| format!("invalid proxy port {port:?}"))?;
    Ok(Some(ProxyConfig {
        host: host.to_string(),
        port,
        username: cli.proxy_username.clone(),
        password: cli.proxy_password.clone(),
    }))
}

async fn print_history(pool: &sqlx::SqlitePool) -> Result<()> {
    let records = query_run_history(pool)
        .await
        .context("Failed to query run history")?;
    if records.is_empty() {
        println!("No stored runs.");
        return Ok(());
    }
    for record in records {
        let when = chrono::Local
            .timestamp_millis_opt(record.created_at_ms)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| record.created_at_ms.to_string());
        println!(
            "#{:<4} {}  proxy={}  total={} success={} failed={} valid={}",
            record.id,
            when,
            record.proxy.as_deref().unwrap_or("direct"),
            record.total_count,
            record.success_count,
            record.failed_count,
            record.valid_playlist_count
        );
    }
    Ok(())
}
