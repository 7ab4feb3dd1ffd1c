use canvas::consts::{BACKGROUND_BEIGE, BACKGROUND_WHITE};
use canvas::render::{DisplayContent, DisplayItem};
use canvas::{LayoutDocument, LayoutError, SceneError};
use clap::{Parser, Subcommand};
use moodboard::session::CanvasSession;
use moodboard::store::http::HttpBoardStore;
use moodboard::{BoardId, Config, ConfigError, SessionError, StoreError};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("element {0} is not on the canvas")]
    ElementNotFound(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "moodboard", about = "Inspect and edit moodboard canvas layouts")]
struct Cli {
    /// Board storage API root. Overrides MOODBOARD_API_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Bearer token for the storage API.
    #[arg(long, env = "MOODBOARD_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a board's saved canvas.
    Show {
        board_id: BoardId,
        /// Print the stored layout document as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the board items that can be placed on the canvas.
    Items { board_id: BoardId },
    /// Place a board item on the canvas.
    AddItem { board_id: BoardId, item_id: BoardId },
    /// Add a text label.
    AddText {
        board_id: BoardId,
        #[arg(long)]
        content: Option<String>,
    },
    /// Move an element by a delta in canvas pixels.
    Move {
        board_id: BoardId,
        element_id: String,
        #[arg(allow_negative_numbers = true)]
        dx: f64,
        #[arg(allow_negative_numbers = true)]
        dy: f64,
    },
    /// Remove an element.
    Delete { board_id: BoardId, element_id: String },
    /// Set the background: `white`, `beige` or a hex color.
    Background { board_id: BoardId, color: String },
    /// Set the zoom factor (clamped to 0.5..=2.0).
    Zoom { board_id: BoardId, factor: f64 },
    /// Remove every element, keeping background and zoom.
    Clear { board_id: BoardId },
}

impl Command {
    fn board_id(&self) -> &BoardId {
        match self {
            Self::Show { board_id, .. }
            | Self::Items { board_id }
            | Self::AddItem { board_id, .. }
            | Self::AddText { board_id, .. }
            | Self::Move { board_id, .. }
            | Self::Delete { board_id, .. }
            | Self::Background { board_id, .. }
            | Self::Zoom { board_id, .. }
            | Self::Clear { board_id } => board_id,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "ignoring unreadable .env"),
    }

    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.base_url, cli.token)?;

    let store = HttpBoardStore::new(&config)?;
    let mut session = CanvasSession::load(&store, cli.command.board_id()).await?;

    match cli.command {
        Command::Show { json, .. } => return show(&session, &config, json),
        Command::Items { .. } => {
            print_items(&session);
            return Ok(());
        }
        Command::AddItem { item_id, .. } => {
            session.add_item(&item_id)?;
        }
        Command::AddText { content, .. } => {
            let engine = session.engine_mut();
            engine.add_text();
            if let (Some(content), Some(id)) = (content, engine.selection().map(str::to_owned)) {
                engine.commit_text_edit(&id, &content);
            }
        }
        Command::Move { element_id, dx, dy, .. } => {
            let engine = session.engine_mut();
            select_existing(engine, &element_id)?;
            engine.drag_selected(dx, dy);
        }
        Command::Delete { element_id, .. } => {
            let engine = session.engine_mut();
            select_existing(engine, &element_id)?;
            engine.delete_selected();
        }
        Command::Background { color, .. } => {
            let color = match color.as_str() {
                "white" => BACKGROUND_WHITE,
                "beige" => BACKGROUND_BEIGE,
                other => other,
            };
            session.engine_mut().set_background(color)?;
        }
        Command::Zoom { factor, .. } => {
            session.engine_mut().set_zoom(factor);
        }
        Command::Clear { .. } => {
            let engine = session.engine_mut();
            let ids: Vec<String> = engine.scene.elements().iter().map(|e| e.id.clone()).collect();
            for id in ids {
                engine.scene.delete_element(&id);
            }
        }
    }

    if !session.is_dirty() {
        println!("no changes");
        return Ok(());
    }
    session.save(&store).await?;
    print_summary(&session, &config);
    Ok(())
}

fn select_existing(engine: &mut canvas::Engine, element_id: &str) -> Result<(), CliError> {
    if engine.element(element_id).is_none() {
        return Err(CliError::ElementNotFound(element_id.to_owned()));
    }
    engine.select(Some(element_id));
    Ok(())
}

fn show(session: &CanvasSession, config: &Config, json: bool) -> Result<(), CliError> {
    if json {
        let doc = LayoutDocument::decode_stored(session.board().canvas_layout.as_ref())?.unwrap_or_default();
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }
    print_summary(session, config);
    Ok(())
}

fn print_items(session: &CanvasSession) {
    for item in &session.board().items {
        let name = item.product.as_ref().and_then(|p| p.name.as_deref()).unwrap_or("-");
        println!("{}\tproduct {}\tx{}\t{name}", item.id, item.product_id, item.quantity);
    }
}

fn print_summary(session: &CanvasSession, config: &Config) {
    let list = session.display_list(&config.asset_base_url);
    println!(
        "{}: {} elements, background {}, zoom {:.0}%",
        session.board().display_name(),
        list.items.len(),
        list.background,
        list.zoom * 100.0
    );
    for item in &list.items {
        println!("  {}", describe(item));
    }
}

fn describe(item: &DisplayItem) -> String {
    let geometry = format!(
        "({:.0}, {:.0}) {:.0}x{:.0} rot {:.0}",
        item.x, item.y, item.width, item.height, item.rotation
    );
    match &item.content {
        DisplayContent::Image { src, alt } => format!(
            "{} image {geometry} {} {}",
            item.id,
            alt.as_deref().unwrap_or("-"),
            src.as_deref().unwrap_or("(no image)")
        ),
        DisplayContent::Text { content, .. } => format!("{} text {geometry} {content:?}", item.id),
    }
}
