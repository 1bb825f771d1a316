//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run the poller.
//! No business logic here.

use dotenv::dotenv;
use med_reminder::adapters::desktop::{CommandSoundPlayer, DesktopNotifier};
use med_reminder::adapters::http::{AssetCache, HttpReminderClient, cache_file_name};
use med_reminder::adapters::memory::{LogNotifier, LogSound};
use med_reminder::adapters::persistence::PermissionJson;
use med_reminder::adapters::ui::PromptPermission;
use med_reminder::ports::{
    Notifier, PermissionProvider, ReminderSource, SessionPort, SoundPlayer,
};
use med_reminder::shared::config::AppConfig;
use med_reminder::usecases::{
    NotificationTrigger, PermissionBootstrap, ReminderPoller, SessionService,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const APP_NAME: &str = "med-reminder";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load()?;
    cfg.validate()?;

    let data_path = PathBuf::from(cfg.data_dir_or_default());
    tokio::fs::create_dir_all(&data_path)
        .await
        .map_err(|e| anyhow::anyhow!("create data dir {}: {}", data_path.display(), e))?;

    let server_url = cfg.server_url_or_default();
    info!(server = %server_url, "reminder server");

    // --- HTTP client (shared by polling, login and asset downloads) ---
    let http = Arc::new(HttpReminderClient::new(
        server_url,
        cfg.reminder_path_or_default(),
        cfg.request_timeout(),
    )?);
    let source: Arc<dyn ReminderSource> = Arc::clone(&http) as Arc<dyn ReminderSource>;

    // --- Session ---
    let session: Arc<dyn SessionPort> = Arc::clone(&http) as Arc<dyn SessionPort>;
    SessionService::new(session, cfg.credentials())
        .ensure_session()
        .await?;

    // --- Capabilities ---
    let permission_store = Arc::new(PermissionJson::new(data_path.join("permission.json")));
    permission_store.load().await?;
    let permission: Arc<dyn PermissionProvider> =
        Arc::new(PromptPermission::new(permission_store));

    let (notifier, sound): (Arc<dyn Notifier>, Arc<dyn SoundPlayer>) = if cfg.is_dry_run() {
        info!("dry run: notifications and sounds are logged only");
        (Arc::new(LogNotifier), Arc::new(LogSound))
    } else {
        let icon = cfg.icon_or_default();
        let icon_cache = AssetCache::new(
            Arc::clone(&http),
            icon.as_str(),
            data_path.join(cache_file_name("icon", &icon)),
        );
        let player_command = cfg.player_command_or_default();
        let player = match &cfg.alarm_file {
            Some(file) => {
                info!(path = %file, "using local alarm clip");
                CommandSoundPlayer::new(&player_command, file)?
            }
            None => {
                let alarm = cfg.alarm_path_or_default();
                let alarm_cache = AssetCache::new(
                    Arc::clone(&http),
                    alarm.as_str(),
                    data_path.join(cache_file_name("alarm", &alarm)),
                );
                CommandSoundPlayer::remote(&player_command, alarm_cache)?
            }
        };
        (
            Arc::new(DesktopNotifier::new(APP_NAME).with_icon_cache(icon_cache)),
            Arc::new(player),
        )
    };

    // --- Permission bootstrap (outcome is not acted upon) ---
    PermissionBootstrap::new(Arc::clone(&permission)).run().await;

    // --- Poller ---
    let trigger = Arc::new(NotificationTrigger::new(
        permission,
        notifier,
        sound,
        cfg.icon_or_default(),
    ));
    let poller = ReminderPoller::new(source, trigger, cfg.poll_interval())
        .with_acknowledge(cfg.acknowledge_or_default());
    info!(
        period_secs = poller.period().as_secs(),
        acknowledge = cfg.acknowledge_or_default(),
        "polling for due reminders"
    );
    let handle = poller.start();

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("listen for ctrl-c: {}", e))?;
    info!(ticks = handle.ticks(), "shutting down");
    handle.stop().await;

    Ok(())
}
