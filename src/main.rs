use anyhow::{Context, Result};
use floorwatch::assets::{AssetCatalog, AssetResolver};
use floorwatch::config::{load_config_or_default, EnvOverrides, FloorwatchConfig};
use floorwatch::entity::{Family, MachineSnapshot, RobotSnapshot, SnapshotEntity, ZoneSnapshot};
use floorwatch::poller::{FamilyPoller, HttpSnapshotSource};
use floorwatch::reconcile::Reconciler;
use floorwatch::scene::{SceneGraph, ViewFramer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

/// How often the view is refitted to the scene
const FRAMING_INTERVAL: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "floorwatch=info".into()),
        )
        .init();

    info!("Floorwatch starting...");

    let config_path = PathBuf::from(
        std::env::var("FLOORWATCH_CONFIG").unwrap_or_else(|_| "floorwatch.toml".to_string()),
    );
    let mut config = load_config_or_default(&config_path)?;
    EnvOverrides::from_env().apply(&mut config);

    info!(
        config = %config_path.display(),
        backend = %config.backend.base_url,
        asset_root = %config.assets.root,
        "Configuration loaded"
    );

    let catalog = AssetCatalog::scan_or_empty(Path::new(&config.assets.root));
    info!(assets = catalog.len(), "Sprite catalog loaded");
    let assets: Arc<dyn AssetResolver> = Arc::new(catalog);

    let scene = Arc::new(Mutex::new(SceneGraph::new()));

    let handles = vec![
        start_poller::<MachineSnapshot>(&config, &assets, &scene)?,
        start_poller::<RobotSnapshot>(&config, &assets, &scene)?,
        start_poller::<ZoneSnapshot>(&config, &assets, &scene)?,
        start_framing(&config, Arc::clone(&scene)),
    ];
    info!(tasks = handles.len(), "Pollers started");

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c signal")?;
    info!("Shutdown signal received");

    for handle in &handles {
        handle.abort();
    }
    info!("Floorwatch stopped");

    Ok(())
}

fn start_poller<E>(
    config: &FloorwatchConfig,
    assets: &Arc<dyn AssetResolver>,
    scene: &Arc<Mutex<SceneGraph>>,
) -> Result<JoinHandle<()>>
where
    E: SnapshotEntity + Send + 'static,
{
    let family: Family = E::FAMILY;
    let family_config = config.family(family);

    let source = HttpSnapshotSource::with_timeout(
        config.endpoint(family),
        family_config.request_timeout_ms.map(Duration::from_millis),
    )
    .with_context(|| format!("Failed to create {} snapshot source", family))?;

    let reconciler = Reconciler::new(
        family_config.sprite_folder(family),
        config.assets.products_folder.clone(),
    );

    let poller: FamilyPoller<E, SceneGraph> = FamilyPoller::new(
        Arc::new(source),
        reconciler,
        Arc::clone(assets),
        Arc::clone(scene),
        Duration::from_millis(family_config.poll_interval_ms),
    );

    Ok(poller.start())
}

fn start_framing(config: &FloorwatchConfig, scene: Arc<Mutex<SceneGraph>>) -> JoinHandle<()> {
    let mut framer = ViewFramer::new(config.view.aspect_ratio, config.view.padding);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(FRAMING_INTERVAL);
        loop {
            ticker.tick().await;

            let (bounds, roots, children) = {
                let scene = scene.lock().await;
                (scene.bounds(), scene.len(), scene.child_count())
            };

            let previous = framer.current();
            if let Some(fit) = framer.refit(bounds) {
                if previous != Some(fit) {
                    info!(
                        center_x = fit.center_x,
                        center_y = fit.center_y,
                        ortho_size = fit.ortho_size,
                        roots = roots,
                        children = children,
                        "View refitted"
                    );
                }
            }
        }
    })
}
