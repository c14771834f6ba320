// SPDX-License-Identifier: MIT OR Apache-2.0
//! `assetgraph` - headless front end for asset graph files.
//!
//! Opens (or creates) the graph file named by the settings and either
//! prints it, follows it as other writers change it, or edits it by
//! replaying the same gestures a canvas would send.

use assetgraph_editor_app::{EditorSession, EditorSettings, GraphFileEvent, GraphFileWatcher, SettingsError};
use assetgraph_editor_graph::{
    DocumentError, EngineOutcome, LookupError, Node, NodeError, NodeId, NodeKind, PersistError,
    ReloadOutcome, DEFAULT_INPUT_LABEL,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "assetgraph", version)]
#[command(about = "Inspect and edit an asset graph file")]
struct Args {
    /// Settings file
    #[arg(long, short, default_value = assetgraph_editor_app::settings::SETTINGS_FILE_NAME)]
    settings: PathBuf,

    /// Graph file. Defaults to the one named in the settings.
    #[arg(long, short)]
    graph: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print nodes and connections
    Show,
    /// Print the graph again whenever another writer changes it
    Watch,
    /// Add a node
    AddNode {
        /// Source, Filter, Prefabricator, Bundlizer or Destination
        #[arg(long)]
        kind: NodeKind,
        /// Display name
        #[arg(long)]
        name: String,
        /// Script path, required for scripted kinds
        #[arg(long)]
        script: Option<String>,
        /// Output label; repeat for several
        #[arg(long = "output")]
        outputs: Vec<String>,
        #[arg(long, default_value_t = 0.0)]
        x: f32,
        #[arg(long, default_value_t = 0.0)]
        y: f32,
    },
    /// Remove a node and its connections
    RemoveNode {
        /// Node to remove
        id: NodeId,
    },
    /// Drag from one point and drop on another
    Connect {
        /// Node to drag from
        from: NodeId,
        /// Point to drag from
        from_label: String,
        /// Node to drop on
        to: NodeId,
        /// Point to drop on
        #[arg(default_value = DEFAULT_INPUT_LABEL)]
        to_label: String,
    },
    /// Tap a point to list its connections, optionally deleting one
    Disconnect {
        /// Node owning the point
        node: NodeId,
        /// Point to tap
        label: String,
        /// Menu entry to delete
        #[arg(long)]
        choose: Option<usize>,
    },
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Node(#[from] NodeError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("Failed to watch graph file: {0}")]
    Watch(#[from] notify::Error),
    #[error("No node with id {0}")]
    UnknownNode(NodeId),
    #[error("No menu entry {0}")]
    NoSuchEntry(usize),
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("assetgraph_editor_app=debug,assetgraph_editor_graph=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let settings = EditorSettings::load_or_default(&args.settings)?;
    let mut session = match args.graph {
        Some(path) => EditorSession::open_at(&settings, path)?,
        None => EditorSession::open(&settings)?,
    };

    match args.command.unwrap_or(Command::Show) {
        Command::Show => print_graph(&session),
        Command::Watch => watch(&mut session, &settings)?,
        Command::AddNode { kind, name, script, outputs, x, y } => {
            let mut builder = Node::builder(kind, name).outputs(outputs).position(x, y);
            if let Some(script) = script {
                builder = builder.script_path(script);
            }
            let id = session.document_mut().add_node(builder.build()?)?;
            session.save()?;
            println!("{id}");
        }
        Command::RemoveNode { id } => {
            session
                .document_mut()
                .remove_node(id)
                .ok_or(AppError::UnknownNode(id))?;
            session.save()?;
        }
        Command::Connect { from, from_label, to, to_label } => {
            match session.replay_drag(from, &from_label, to, &to_label)? {
                EngineOutcome::Connected(_) => session.save()?,
                _ => tracing::warn!("Drop made no new connection"),
            }
        }
        Command::Disconnect { node, label, choose } => {
            for (index, action) in session.tap(node, &label)?.iter().enumerate() {
                println!("[{index}] {}", action.title());
            }
            if let Some(index) = choose {
                session.choose(index).ok_or(AppError::NoSuchEntry(index))?;
                session.save()?;
            }
        }
    }

    Ok(())
}

fn print_graph(session: &EditorSession) {
    let document = session.document();
    println!("# {:?} (last modified {})", session.store().path(), document.last_modified);

    for node in document.nodes() {
        let outputs: Vec<_> = node.output_labels().collect();
        print!("{}  {:<13} {:?} at ({}, {})", node.id, node.kind, node.name, node.position[0], node.position[1]);
        if let Some(script) = &node.script_path {
            print!(" script={script}");
        }
        println!(" outputs={outputs:?}");
    }

    for connection in document.connections() {
        println!(
            "{}: {} -> {}",
            connection.label,
            document.describe_point(connection.start),
            document.describe_point(connection.end)
        );
    }
}

fn watch(session: &mut EditorSession, settings: &EditorSettings) -> Result<(), AppError> {
    let watcher = GraphFileWatcher::new(session.store().path(), settings.watch_debounce())?;
    print_graph(session);

    while let Some(event) = watcher.wait_event() {
        match event {
            GraphFileEvent::Changed => match session.reload() {
                Ok(ReloadOutcome::Reloaded) => print_graph(session),
                Ok(ReloadOutcome::Unchanged) => {}
                Err(e) => tracing::warn!("Keeping previous graph: {e}"),
            },
            GraphFileEvent::Removed => {
                tracing::warn!("Graph file removed; the next change recreates it");
            }
            GraphFileEvent::Error(message) => tracing::warn!("Watcher error: {message}"),
        }
    }

    Ok(())
}
