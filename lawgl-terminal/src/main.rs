//! LAWGL Terminal Demo - Transform sliders
//!
//! Renders the basic, flat (2D) or spatial (3D) demo scene in the terminal.
//! Controls:
//!   - Up/Down (or Tab): Select a slider
//!   - Left/Right: Adjust the selected slider, PgUp/PgDn for bigger steps
//!   - Space: Toggle perspective
//!   - Q/ESC: Quit

use clap::{Parser, ValueEnum};
use lawgl_core::{parse_assignments, SceneKind};
use lawgl_terminal::{dump, TerminalApp};
use log::info;
use std::io;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SceneArg {
    Basic,
    Flat,
    Spatial,
}

impl From<SceneArg> for SceneKind {
    fn from(arg: SceneArg) -> Self {
        match arg {
            SceneArg::Basic => SceneKind::Basic,
            SceneArg::Flat => SceneKind::Flat,
            SceneArg::Spatial => SceneKind::Spatial,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "lawgl-terminal", version, about = "Homogeneous transform demos in the terminal")]
struct Cli {
    /// Demo scene to show
    #[arg(long, value_enum, default_value_t = SceneArg::Spatial)]
    scene: SceneArg,

    /// Initial parameter values, e.g. "tx=0.2 rz=0.25 perspective=on"
    #[arg(long = "set", value_name = "ASSIGNMENTS")]
    set: Vec<String>,

    /// Print the control values and matrices, then exit
    #[arg(long)]
    dump: bool,

    /// Frame tick rate used to coalesce input
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

fn main() {
    env_logger::init();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> io::Result<()> {
    let mut scene = SceneKind::from(cli.scene).build();
    for assignments in &cli.set {
        let parsed = parse_assignments(assignments)
            .and_then(|parsed| scene.apply_all(&parsed).map(|()| parsed.len()))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        info!("applied {parsed} assignment(s) from `{assignments}`");
    }

    if cli.dump {
        return dump(scene.as_ref(), &mut io::stdout().lock());
    }

    let mut app = TerminalApp::new(scene, cli.fps)?;
    app.run()
}
