use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::Value as JsonValue;

use stagehand_api_core::ViewOp;
use stagehand_runtime::{
    Actor, AssetLibrary, RecordingView, RunConfig, Runtime, StartReport, StreamPhase,
};
use stagehand_script_core::{Diagnostic, Program};

#[derive(Parser, Debug)]
#[command(about = "Run a stagehand program headlessly and print the resulting state", version)]
struct Args {
    /// Program JSON (`{ meta, sprites, code }`)
    program: PathBuf,

    /// Register an asset as NAME=SOURCE; repeatable
    #[arg(long = "asset", value_name = "NAME=SOURCE", value_parser = parse_asset)]
    assets: Vec<(String, String)>,

    /// Register every asset the program's manifest names, using the name as source
    #[arg(long)]
    stub_assets: bool,

    /// Run configuration JSON; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many seconds of virtual time
    #[arg(long, default_value_t = 30.0)]
    limit: f64,

    /// Only decode the program and report skipped instructions
    #[arg(long)]
    check: bool,

    /// Include the recorded view operations in the output
    #[arg(long)]
    ops: bool,
}

fn parse_asset(raw: &str) -> Result<(String, String), String> {
    let (name, source) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=SOURCE, got `{raw}`"))?;
    if name.is_empty() {
        return Err("asset name must not be empty".into());
    }
    Ok((name.to_string(), source.to_string()))
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    actors: Vec<&'a str>,
    diagnostics: Vec<Diagnostic>,
}

#[derive(Serialize)]
struct RunOutput<'a> {
    start: StartReport,
    idle: bool,
    now_seconds: f64,
    epoch: u64,
    actors: Vec<&'a Actor>,
    variables: serde_json::Map<String, JsonValue>,
    streams: Vec<(String, StreamPhase)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ops: Option<&'a [ViewOp]>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::init();

    ensure!(
        args.limit >= 0.0,
        "--limit must be a non-negative number of seconds (got {})",
        args.limit
    );
    let limit = Duration::try_from_secs_f64(args.limit).context("--limit is out of range")?;

    let program = load_program(&args.program)
        .with_context(|| format!("loading program {}", args.program.display()))?;

    if args.check {
        let output = CheckOutput {
            actors: program.code.keys().map(String::as_str).collect(),
            diagnostics: program.diagnostics(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading run config {}", path.display()))?,
        None => RunConfig::default(),
    };

    let mut assets = AssetLibrary::new();
    if args.stub_assets {
        for asset in program.sprites.values() {
            assets.register(asset, asset.clone());
        }
    }
    for (name, source) in &args.assets {
        assets.register(name, source.clone());
    }
    log::debug!("{} assets registered", assets.len());

    let mut rt = Runtime::new(RecordingView::new(), assets, config);
    let start = rt.start(&program);
    let idle = rt.run_until_idle(limit);
    if !idle {
        log::info!("still running after {}s of virtual time", args.limit);
    }

    let variables = rt
        .variables()
        .snapshot()
        .into_iter()
        .map(|(name, value)| (name, value.to_json()))
        .collect();
    let output = RunOutput {
        start,
        idle,
        now_seconds: rt.now().as_secs_f64(),
        epoch: rt.epoch(),
        actors: rt.actors().iter().collect(),
        variables,
        streams: rt.stream_states(),
        ops: args.ops.then(|| rt.view().ops().0.as_slice()),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_program(path: &Path) -> Result<Program> {
    let text = fs::read_to_string(path)?;
    Ok(Program::from_json_str(&text)?)
}

fn load_config(path: &Path) -> Result<RunConfig> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_arguments_split_on_first_equals() {
        assert_eq!(
            parse_asset("cat_img=data:image/png;base64,a=="),
            Ok(("cat_img".to_string(), "data:image/png;base64,a==".to_string()))
        );
        assert!(parse_asset("no-separator").is_err());
        assert!(parse_asset("=x").is_err());
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from([
            "stagehand",
            "prog.json",
            "--asset",
            "cat_img=cat.png",
            "--limit",
            "5",
            "--ops",
        ])
        .expect("valid arguments");
        assert_eq!(args.assets, [("cat_img".to_string(), "cat.png".to_string())]);
        assert_eq!(args.limit, 5.0);
        assert!(args.ops && !args.check);
    }
}
