use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use inkcard::api;
use inkcard::assets::AssetLoader;
use inkcard::models::{AppConfig, FilterState, SceneDocument};
use inkcard::rendering::SvgRenderer;
use inkcard::server;
use inkcard::services::{templates, ExportService, SceneEditor};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Parser)]
#[command(name = "inkcard")]
#[command(about = "Inkcard - poster and card composer with grayscale and dithered JPEG export")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Render a scene document directly to a JPEG file
    Render {
        /// Scene document (JSON); image paths are relative to it
        #[arg(short, long)]
        scene: PathBuf,

        /// Output JPEG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Convert to grayscale
        #[arg(short, long)]
        grayscale: bool,

        /// Floyd-Steinberg dither (requires grayscale)
        #[arg(short, long)]
        dither: bool,

        /// Gray levels used when dithering (2-256)
        #[arg(short, long)]
        levels: Option<u16>,
    },
    /// List layout templates
    Templates,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inkcard API",
        description = "Poster and card composer with grayscale and dithered JPEG export",
        version = "0.3.0",
        license(name = "MIT")
    ),
    paths(
        api::create_scene,
        api::get_scene,
        api::delete_scene,
        api::clear_scene,
        api::apply_template,
        api::list_templates,
        api::set_filters,
        api::move_layer,
        api::undo,
        api::redo,
        api::add_image,
        api::add_text,
        api::update_object,
        api::rotate,
        api::reset_transform,
        api::set_visibility,
        api::set_direction,
        api::fill_placeholder,
        api::delete_object,
        api::list_fonts,
        api::export_jpeg,
    ),
    components(schemas(
        api::CreateSceneResponse,
        api::SceneSummary,
        api::TemplateRequest,
        api::ObjectsCreated,
        api::FiltersRequest,
        api::MoveLayerRequest,
        api::HistoryResponse,
        api::ObjectView,
        api::AddTextRequest,
        api::RotateRequest,
        api::VisibilityRequest,
        api::DirectionRequest,
        api::FontInfo,
        inkcard::models::ObjectPatch,
        inkcard::models::FilterState,
        inkcard::models::LayerInfo,
        inkcard::models::Transform,
        inkcard::models::TextDirection,
        inkcard::models::TextAlign,
        inkcard::services::TemplateInfo,
    )),
    tags(
        (name = "Scenes", description = "Scene lifecycle, layers, templates, filters and history"),
        (name = "Objects", description = "Images, text boxes, placeholders and fonts"),
        (name = "Export", description = "JPEG export")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            scene,
            output,
            grayscale,
            dither,
            levels,
        }) => run_render_command(&scene, &output, grayscale, dither, levels),
        Some(Commands::Templates) => {
            run_templates_command();
            Ok(())
        }
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn asset_loader_from_env() -> AssetLoader {
    let fonts_dir = std::env::var("FONTS_DIR").ok().map(PathBuf::from);
    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    AssetLoader::new(fonts_dir, config_file)
}

/// Render a scene document to a JPEG file (no server needed)
fn run_render_command(
    scene_path: &Path,
    output: &Path,
    grayscale: bool,
    dither: bool,
    levels: Option<u16>,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkcard=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let asset_loader = asset_loader_from_env();
    let config = AppConfig::load_from_assets(&asset_loader);

    let content = std::fs::read_to_string(scene_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", scene_path.display()))?;
    let document = SceneDocument::from_json(&content)
        .map_err(|e| anyhow::anyhow!("Invalid scene document: {e}"))?;
    let base_dir = scene_path.parent().unwrap_or_else(|| Path::new("."));

    let mut editor = SceneEditor::from_config(&config)?;
    editor
        .apply_document(&document, base_dir)
        .map_err(|e| anyhow::anyhow!("Scene error: {e}"))?;

    // Flags add to the document's filters
    let FilterState {
        grayscale: doc_grayscale,
        dither: doc_dither,
    } = editor.filters();
    let filters = editor.set_filters(grayscale || doc_grayscale, dither || doc_dither);
    if dither && !filters.dither {
        eprintln!("warning: --dither has no effect without --grayscale");
    }

    let mut export_config = config.export.clone();
    if let Some(levels) = levels {
        export_config.dither_levels = levels;
    }
    let renderer = Arc::new(SvgRenderer::with_fonts(asset_loader.get_fonts()));
    let exporter = ExportService::new(renderer, &export_config);
    let image = exporter
        .export_scene(editor.scene())
        .map_err(|e| anyhow::anyhow!("Render error: {e}"))?;

    std::fs::write(output, &image.bytes)?;
    println!(
        "Rendered {} ({}x{}, {} bytes, grayscale={}, dither={})",
        output.display(),
        image.width,
        image.height,
        image.bytes.len(),
        filters.grayscale,
        filters.dither
    );

    Ok(())
}

fn run_templates_command() {
    for template in templates::TEMPLATES {
        let info = template.info();
        println!(
            "{:<24} {} ({} image, {} text)",
            info.name, info.description, info.placeholders, info.texts
        );
    }
}

/// Print version, environment and effective settings
fn run_status_command() {
    let loader = asset_loader_from_env();
    let config = AppConfig::load_from_assets(&loader);
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    println!("Inkcard v{}", env!("CARGO_PKG_VERSION"));
    println!("{}\n", env!("CARGO_PKG_DESCRIPTION"));

    println!("Server:");
    println!("  BIND_ADDR   {bind_addr}");

    println!("\nAssets:");
    println!("  CONFIG_FILE {}", loader.config_source());
    match loader.fonts_dir() {
        Some(dir) => println!(
            "  FONTS_DIR   {} ({} fonts) + system fonts",
            dir.display(),
            loader.get_fonts().len()
        ),
        None => println!("  FONTS_DIR   (not set), system fonts only"),
    }

    println!("\nCanvas:");
    println!(
        "  {}x{}, background {}",
        config.canvas.width, config.canvas.height, config.canvas.background
    );
    println!(
        "  JPEG quality {}, dither levels {}, history {} snapshots",
        config.export.jpeg_quality, config.export.dither_levels, config.history.max_snapshots
    );

    println!("\nCommands:");
    println!("  inkcard serve       Start the HTTP server");
    println!("  inkcard render      Render a scene document to JPEG");
    println!("  inkcard templates   List layout templates");
    println!("\nRun 'inkcard --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkcard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let asset_loader = Arc::new(asset_loader_from_env());

    tracing::info!(
        config = %asset_loader.config_source(),
        fonts = ?asset_loader.fonts_dir().map(|p| p.display().to_string()),
        "Asset sources configured"
    );

    // Create missing configured paths
    match asset_loader.seed_if_configured() {
        Ok(report) if !report.is_empty() => {
            tracing::info!(
                config = report.config_seeded,
                fonts_dir = report.fonts_dir_created,
                "Seeded missing asset paths"
            );
        }
        Err(e) => {
            tracing::warn!(%e, "Failed to seed assets");
        }
        _ => {}
    }

    // Create application state using shared server module
    let state = server::create_app_state(asset_loader)?;

    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Inkcard server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
