use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use crossbeam_channel::Receiver;
use quakemap::{
    core::geo::Point,
    prelude::{FeedLoader, LoadedFeeds, MapBuilder, MapWidget, MapWidgetExt, QuakeMapConfig},
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quakemap-app", version, about = "USGS earthquakes of the past week on a map")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    feeds: FeedArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive map viewer (default)
    View,
    /// Load the feeds and write the assembled map as JSON
    Export {
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args)]
struct FeedArgs {
    /// Earthquake GeoJSON feed (URL or local file)
    #[arg(long, global = true)]
    feed_url: Option<String>,

    /// Plate boundaries GeoJSON (URL or local file)
    #[arg(long, global = true, conflicts_with = "no_plates")]
    plates: Option<String>,

    /// Skip the tectonic plates overlay
    #[arg(long, global = true)]
    no_plates: bool,
}

impl FeedArgs {
    fn config(&self) -> QuakeMapConfig {
        let mut config = QuakeMapConfig::default();
        if let Some(url) = &self.feed_url {
            config.feed.earthquakes_url = url.clone();
        }
        if let Some(plates) = &self.plates {
            config.feed.plates_source = Some(plates.clone());
        }
        if self.no_plates {
            config = config.without_plates();
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.feeds.config();
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    match cli.command.unwrap_or(Command::View) {
        Command::View => view(runtime, config),
        Command::Export { out } => export(runtime, config, out),
    }
}

fn export(runtime: tokio::runtime::Runtime, config: QuakeMapConfig, out: Option<PathBuf>) -> anyhow::Result<()> {
    let loader = FeedLoader::new(config.feed.clone())?;
    let feeds = runtime.block_on(loader.load_all());
    if feeds.earthquakes.is_none() {
        log::warn!("exporting without earthquakes");
    }

    let map = MapBuilder::new(config).build(&feeds)?;
    let json = map.snapshot().to_json_pretty()?;

    match out {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote map snapshot to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn view(runtime: tokio::runtime::Runtime, config: QuakeMapConfig) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Earthquakes of the past week"),
        ..Default::default()
    };

    // base layers only until the feeds arrive
    let map = MapBuilder::new(config.clone())
        .with_size(Point::new(1200.0, 800.0))
        .build(&LoadedFeeds::default())?;

    eframe::run_native(
        "quakemap-app",
        options,
        Box::new(move |cc| Box::new(QuakeMapApp::new(cc, runtime, config, map))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {}", e))
}

struct QuakeMapApp {
    map_widget: MapWidget,
    config: QuakeMapConfig,
    feeds_rx: Receiver<LoadedFeeds>,
    status: String,
    // keeps the loader task alive
    _runtime: tokio::runtime::Runtime,
}

impl QuakeMapApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Runtime,
        config: QuakeMapConfig,
        map: quakemap::Map,
    ) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let ctx = cc.egui_ctx.clone();

        let status = match FeedLoader::new(config.feed.clone()) {
            Ok(loader) => {
                runtime.spawn(async move {
                    let feeds = loader.load_all().await;
                    let _ = tx.send(feeds);
                    ctx.request_repaint();
                });
                "Loading earthquake feed…".to_string()
            }
            Err(e) => {
                log::error!("cannot create feed loader: {}", e);
                format!("Feeds unavailable: {}", e)
            }
        };

        Self {
            map_widget: MapWidget::new(map, config.tiles.clone()),
            config,
            feeds_rx: rx,
            status,
            _runtime: runtime,
        }
    }

    fn receive_feeds(&mut self) {
        let Ok(feeds) = self.feeds_rx.try_recv() else {
            return;
        };

        self.status = match &feeds.earthquakes {
            Some(feed) => format!("{} earthquakes in the past week", feed.len()),
            None => "Earthquake feed unavailable".to_string(),
        };
        if self.config.feed.plates_source.is_some() && feeds.plates.is_none() {
            self.status.push_str(" · plate boundaries unavailable");
        }

        // keep the user's view and layer choices across the rebuild
        let viewport = self.map_widget.map().viewport().clone();
        let control = self.map_widget.map().control().clone();
        match MapBuilder::new(self.config.clone()).with_size(viewport.size).build(&feeds) {
            Ok(mut map) => {
                map.set_view(viewport.center, viewport.zoom);
                map.restore_selection(&control);
                self.map_widget.replace_map(map);
            }
            Err(e) => {
                log::error!("map assembly failed: {}", e);
                self.status = format!("Map assembly failed: {}", e);
            }
        }
    }
}

impl eframe::App for QuakeMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive_feeds();

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let viewport = self.map_widget.map().viewport();
                    ui.label(format!(
                        "Center: {:.4}, {:.4} | Zoom: {:.2}",
                        viewport.center.lat, viewport.center.lng, viewport.zoom
                    ));
                });
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.map_widget(&mut self.map_widget);
            });
    }
}
