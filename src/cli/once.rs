//! Once command - a single poll, useful for interval-driven bars (i3blocks, tmux)

use std::path::Path;
use std::sync::Arc;

use super::watch::{poll_once, WidgetWriter};
use super::{exit_codes, resolve_settings, widget_style};
use crate::core::{UsageSource, WidgetState};
use crate::settings::SettingsOverrides;

/// Exit code for a rendered state
pub fn exit_code_for(state: &WidgetState) -> i32 {
    match state {
        WidgetState::Ok(_) => exit_codes::SUCCESS,
        WidgetState::Unconfigured => exit_codes::NOT_CONFIGURED,
        WidgetState::Offline(_) => exit_codes::UNEXPECTED_FAILURE,
        // A finished poll is never still loading
        WidgetState::Loading => exit_codes::UNEXPECTED_FAILURE,
    }
}

/// Run one poll, print it, and return the exit code
pub async fn run(
    source: Arc<dyn UsageSource>,
    settings_path: Option<&Path>,
    overrides: &SettingsOverrides,
    use_color: bool,
) -> anyhow::Result<i32> {
    let settings = resolve_settings(settings_path, overrides);
    let state = poll_once(source.as_ref(), &settings).await;

    let mut writer = WidgetWriter::new(
        std::io::stdout(),
        settings.output_format,
        widget_style(&settings, settings_path),
        use_color,
    );
    writer.write_state(&state)?;

    Ok(exit_code_for(&state))
}
