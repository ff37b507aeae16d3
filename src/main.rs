// Command-line front end for inspecting and repairing exported
// configuration documents. Logging is controlled through RUST_LOG.
use std::process::ExitCode;

use ferrite_architect::{ConfigurationDocument, LayerField, LayerKind, Result};

const USAGE: &str = "\
usage:
  ferrite-architect validate  <config.json>
  ferrite-architect summary   <config.json>
  ferrite-architect reconcile <config.json> [out.json]
  ferrite-architect template  [out.json]";

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["validate", path] => validate(path),
        ["summary", path] => summary(path),
        ["reconcile", path] => reconcile(path, path),
        ["reconcile", path, out] => reconcile(path, out),
        ["template"] => template(None),
        ["template", out] => template(Some(*out)),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn validate(path: &str) -> Result<()> {
    let doc = ConfigurationDocument::load_json(path)?;
    doc.validate()?;
    let issues = doc.layers().shape_issues();
    if issues.is_empty() {
        println!("{path}: ok ({} layers)", doc.layers().len());
    } else {
        println!("{path}: ok with {} stale shape(s), run `reconcile` to fix", issues.len());
    }
    Ok(())
}

fn summary(path: &str) -> Result<()> {
    let doc = ConfigurationDocument::load_json(path)?;
    println!("{}", doc.summary());
    for issue in doc.layers().shape_issues() {
        println!("warning: {issue}");
    }
    Ok(())
}

fn reconcile(path: &str, out: &str) -> Result<()> {
    let mut doc = ConfigurationDocument::load_json(path)?;
    let changed = doc.layers_mut().reconcile();
    doc.save_json(out)?;
    println!("{out}: {changed} derived field(s) updated");
    Ok(())
}

/// A small MNIST CNN assembled through the same append/edit calls a UI
/// would issue.
fn template(out: Option<&str>) -> Result<()> {
    let mut doc = ConfigurationDocument::new();
    let layers = doc.layers_mut();
    layers.append(LayerKind::Conv2d);
    layers.update_field(0, LayerField::OutChannels, "16")?;
    layers.append(LayerKind::Activation);
    layers.append(LayerKind::MaxPool);
    layers.append(LayerKind::Conv2d);
    layers.update_field(3, LayerField::OutChannels, "32")?;
    layers.append(LayerKind::Activation);
    layers.append(LayerKind::MaxPool);
    layers.append(LayerKind::Linear);
    layers.append(LayerKind::Activation);
    layers.append_terminal();

    match out {
        Some(path) => {
            doc.save_json(path)?;
            println!("wrote {path}");
        }
        None => println!("{}", doc.export_json()?),
    }
    Ok(())
}
