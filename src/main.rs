//! Headless editor host speaking the editor bridge protocol over stdio.

mod logging;

use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use exthost_editors::kernel::services::adapters::{
    ensure_settings_file, load_settings, serve, write_lines, JsonLineProxy,
};
use exthost_editors::kernel::services::ports::Settings;
use exthost_editors::kernel::services::EditorServiceHost;

const USAGE: &str = "usage: exthost-editors [--settings PATH] [FILE...]";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    settings: Option<PathBuf>,
    files: Vec<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => {
                let path = args.next().ok_or("--settings needs a path")?;
                parsed.settings = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(String::new()),
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            file => parsed.files.push(PathBuf::from(file)),
        }
    }
    Ok(parsed)
}

fn main() -> io::Result<()> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("{msg}");
            }
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    let settings = match args.settings.as_deref() {
        Some(path) => load_settings(Some(path)),
        None => {
            if let Err(e) = ensure_settings_file() {
                eprintln!("cannot create settings file: {e}");
            }
            load_settings(None)
        }
    };
    let _logging = logging::init(&settings);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, run(settings, args.files))
}

async fn run(settings: Settings, files: Vec<PathBuf>) -> io::Result<()> {
    let (proxy, rx) = JsonLineProxy::channel();
    let tx = proxy.sender();
    let writer = tokio::task::spawn_local(write_lines(rx, tokio::io::stdout()));

    let host = EditorServiceHost::new(settings, Rc::new(proxy));
    for path in &files {
        if let Err(e) = host.open_path(path).await {
            tracing::warn!(path = %path.display(), error = %e, "failed to open file");
        }
    }
    host.start();

    let served = serve(
        Rc::clone(host.mirror()),
        tokio::io::BufReader::new(tokio::io::stdin()),
        tx,
    )
    .await;
    host.shutdown();
    drop(host);

    let written = match writer.await {
        Ok(result) => result,
        Err(e) => Err(io::Error::other(e)),
    };
    served.and(written)
}
