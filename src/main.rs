use anyhow::{bail, ensure};
use kiosk_player::driver::PlaybackDriver;
use kiosk_player::logging;
use kiosk_player::settings::Settings;
use kiosk_player::transition::manager_from_settings;
use kiosk_player::window::host_control;

const USAGE: &str = "usage: kiosk_player <layout|to-ui|to-video|ensure-ui|play FILE>";

fn main() -> anyhow::Result<()> {
    let settings_path =
        std::env::var("KIOSK_SETTINGS").unwrap_or_else(|_| "settings.json".to_string());
    let settings = Settings::load(&settings_path)?;
    let _log_guard = logging::init(settings.debug_logging, settings.log_file.clone());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("layout");

    let mut control = host_control(&settings);
    let mut manager = manager_from_settings(&settings);

    match command {
        "layout" => {
            let layout = settings.layout();
            println!(
                "mode={:?} target={}x{} content={}x{}+{}+{}",
                layout.mode,
                layout.target.width,
                layout.target.height,
                layout.content_region.width,
                layout.content_region.height,
                layout.content_region.x,
                layout.content_region.y,
            );
        }
        "to-ui" => {
            let outcome = manager.to_ui(control.as_mut());
            ensure!(outcome.succeeded(), "transition failed: {outcome:?}");
        }
        "to-video" => {
            let outcome = manager.to_video(control.as_mut());
            ensure!(outcome.succeeded(), "transition failed: {outcome:?}");
        }
        "ensure-ui" => {
            ensure!(
                manager.ensure_ui_visible(control.as_mut()),
                "ui window could not be shown"
            );
        }
        "play" => {
            let Some(file) = args.get(1) else {
                bail!(USAGE);
            };
            play(&settings, file)?;
            let mut driver = PlaybackDriver::new(manager);
            driver.playback_started();
            ensure!(
                driver.switch_to_video(control.as_mut()),
                "player window could not be shown"
            );
        }
        other => bail!("unknown command {other:?}\n{USAGE}"),
    }
    Ok(())
}

#[cfg(unix)]
fn play(settings: &Settings, file: &str) -> anyhow::Result<()> {
    use kiosk_player::player::PlayerClient;
    let mut player = PlayerClient::connect(&settings.player_socket, settings.tool_timeout())?;
    player.load_file(std::path::Path::new(file))?;
    player.set_paused(false)?;
    tracing::info!(%file, "playback requested");
    Ok(())
}

#[cfg(not(unix))]
fn play(_settings: &Settings, _file: &str) -> anyhow::Result<()> {
    bail!("player control is only available on unix hosts")
}
