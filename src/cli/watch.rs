//! Watch command - the poll-and-render loop
//!
//! One interval timer drives polls. Each poll runs as its own task and hands
//! its result to the single writer that owns the output stream. When the
//! settings file changes the timer is re-armed with an immediate poll; a poll
//! already in flight is left to finish and its result is still shown.

use chrono::Utc;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

use super::{resolve_settings, widget_style};
use crate::core::{FetchContext, OutputFormat, UsageSource, WidgetState, WidgetStyle};
use crate::settings::{modified_at, Settings, SettingsOverrides};

/// How often the settings file is checked for changes
pub const RELOAD_CHECK_INTERVAL: Duration = Duration::from_secs(2);

/// Run a single poll. Unconfigured settings never reach the source.
pub async fn poll_once(source: &dyn UsageSource, settings: &Settings) -> WidgetState {
    let ctx = match FetchContext::from_settings(settings) {
        Ok(ctx) => ctx,
        Err(e) => return WidgetState::from_result(Err(e)),
    };

    let result = source.fetch_usage(&ctx).await;
    if let Err(ref e) = result {
        tracing::warn!(source = source.name(), "Usage fetch failed: {}", e);
    }
    WidgetState::from_result(result)
}

/// Writes widget updates, one line each, to an output stream
pub struct WidgetWriter<W: Write> {
    out: W,
    format: OutputFormat,
    style: WidgetStyle,
    use_color: bool,
}

impl<W: Write> WidgetWriter<W> {
    pub fn new(out: W, format: OutputFormat, style: WidgetStyle, use_color: bool) -> Self {
        Self {
            out,
            format,
            style,
            use_color,
        }
    }

    /// Pick up label/format changes after a settings reload
    pub fn restyle(&mut self, format: OutputFormat, style: WidgetStyle) {
        self.format = format;
        self.style = style;
    }

    pub fn write_state(&mut self, state: &WidgetState) -> std::io::Result<()> {
        let line = state
            .render(&self.style, Utc::now())
            .to_line(self.format, self.use_color);
        writeln!(self.out, "{}", line)?;
        // Status bars read line by line; never leave an update buffered
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Poll loop state
pub struct Watcher {
    source: Arc<dyn UsageSource>,
    settings_path: Option<PathBuf>,
    overrides: SettingsOverrides,
    use_color: bool,
}

impl Watcher {
    pub fn new(
        source: Arc<dyn UsageSource>,
        settings_path: Option<PathBuf>,
        overrides: SettingsOverrides,
        use_color: bool,
    ) -> Self {
        Self {
            source,
            settings_path,
            overrides,
            use_color,
        }
    }

    fn load_settings(&self) -> Settings {
        resolve_settings(self.settings_path.as_deref(), &self.overrides)
    }

    fn settings_mtime(&self) -> Option<SystemTime> {
        self.settings_path.as_deref().and_then(modified_at)
    }

    fn spawn_poll(&self, settings: &Settings, tx: mpsc::Sender<WidgetState>) {
        let source = Arc::clone(&self.source);
        let settings = settings.clone();
        tokio::spawn(async move {
            let state = poll_once(source.as_ref(), &settings).await;
            // Receiver gone means the loop has shut down
            let _ = tx.send(state).await;
        });
    }

    /// Run until `shutdown` resolves, writing updates to `out`
    pub async fn run_until<W, F>(&self, out: W, shutdown: F) -> anyhow::Result<W>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        let mut settings = self.load_settings();
        let mut writer = WidgetWriter::new(
            out,
            settings.output_format,
            widget_style(&settings, self.settings_path.as_deref()),
            self.use_color,
        );
        writer.write_state(&WidgetState::Loading)?;

        tracing::info!(
            interval_secs = settings.poll_interval().as_secs(),
            configured = settings.is_configured(),
            "Starting usage polling"
        );

        let (tx, mut rx) = mpsc::channel::<WidgetState>(8);
        let mut ticker = poll_interval(settings.poll_interval());
        let mut reload = tokio::time::interval(RELOAD_CHECK_INTERVAL);
        reload.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_mtime = self.settings_mtime();

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Stopping usage polling");
                    break;
                }
                _ = ticker.tick() => {
                    self.spawn_poll(&settings, tx.clone());
                }
                _ = reload.tick() => {
                    let mtime = self.settings_mtime();
                    if mtime != last_mtime {
                        last_mtime = mtime;
                        settings = self.load_settings();
                        writer.restyle(
                            settings.output_format,
                            widget_style(&settings, self.settings_path.as_deref()),
                        );
                        tracing::info!(
                            interval_secs = settings.poll_interval().as_secs(),
                            configured = settings.is_configured(),
                            "Settings changed, restarting polling"
                        );
                        // The new interval's first tick fires immediately
                        ticker = poll_interval(settings.poll_interval());
                    }
                }
                Some(state) = rx.recv() => {
                    writer.write_state(&state)?;
                }
            }
        }

        Ok(writer.into_inner())
    }
}

fn poll_interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Run the watch command until Ctrl-C
pub async fn run(
    source: Arc<dyn UsageSource>,
    settings_path: Option<PathBuf>,
    overrides: SettingsOverrides,
    use_color: bool,
) -> anyhow::Result<()> {
    let watcher = Watcher::new(source, settings_path, overrides, use_color);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    watcher.run_until(std::io::stdout(), shutdown).await?;
    Ok(())
}
