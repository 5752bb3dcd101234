// ============================================================================
// SnapEdit CLI — headless edit pipeline via command-line arguments
// ============================================================================
//
// Usage examples:
//   snapedit --input photo.png --op crop=0,400,0,400 --op rotate=30 --output out.png
//   snapedit -i shots/*.jpg --op channel=red --output-dir processed/
//   snapedit -i photo.jpg --op draw=10,120,10,200 --preview -o boxed.png
//
// No window is opened in CLI mode. Ops run in the order they appear on the
// command line, through the same record-and-replay engine the GUI uses.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::editor::Editor;
use crate::error::Error;
use crate::io::{load_image, save_image};
use crate::record::{ChannelFilter, EditAction, Region};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// SnapEdit headless photo editor.
///
/// Apply an ordered list of edits to image files — no GUI required.
#[derive(Parser, Debug)]
#[command(
    name = "snapedit",
    about = "SnapEdit headless batch photo editor",
    long_about = "Apply an ordered list of edits (crop, rotate, draw, channel) to PNG/JPEG\n\
                  files without opening the GUI. Ops run in the order given, replayed from\n\
                  the original exactly as in the interactive editor.\n\n\
                  Example:\n  \
                  snapedit -i photo.png --op crop=0,400,0,400 --op rotate=30 -o out.png\n  \
                  snapedit -i shots/*.jpg --op channel=red --output-dir processed/"
)]
pub struct CliArgs {
    /// Input file(s). Glob patterns accepted (e.g. "*.png", "shots/*.jpg").
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Edit operation, repeatable, applied in the order given:
    /// crop=Y1,Y2,X1,X2 (half-open pixel box) · rotate=DEGREES (positive =
    /// counter-clockwise) · draw=Y1,Y2,X1,X2 (2 px blue outline) ·
    /// channel=none|red|green|blue
    #[arg(long = "op", value_name = "OP")]
    pub ops: Vec<String>,

    /// Output file path. Only valid for single-file input.
    /// For batch input use --output-dir instead.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output directory for batch processing.
    /// Files are written here with the original stem and a png extension.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write the letterboxed 1000×500 preview instead of the full-size image.
    #[arg(long)]
    pub preview: bool,

    /// Print per-file timing information.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Returns `true` when any CLI-mode flag is present in the real process
    /// arguments. Used by `main()` to route before creating a window.
    pub fn is_cli_mode() -> bool {
        std::env::args().any(|a| a == "--input" || a == "-i")
    }
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run all CLI processing and return an OS exit code.
/// `SUCCESS` = all files succeeded, `FAILURE` = one or more files failed.
pub fn run(args: CliArgs) -> ExitCode {
    let inputs = resolve_inputs(&args.input);
    if inputs.is_empty() {
        eprintln!("error: no input files matched the given pattern(s).");
        return ExitCode::FAILURE;
    }

    if inputs.len() > 1 && args.output.is_some() && args.output_dir.is_none() {
        eprintln!(
            "error: {} input files given but --output only accepts a single file path.\n\
             Use --output-dir to specify a destination directory for batch processing.",
            inputs.len()
        );
        return ExitCode::FAILURE;
    }

    let ops = match parse_ops(&args.ops) {
        Ok(ops) => ops,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(dir) = &args.output_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!(
                "error: could not create output directory '{}': {}",
                dir.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    }

    let total = inputs.len();
    let multi = total > 1;
    let mut any_failure = false;

    for (idx, input_path) in inputs.iter().enumerate() {
        if multi || args.verbose {
            println!("[{}/{}] {}", idx + 1, total, input_path.display());
        }

        let file_start = Instant::now();

        let output_path = match build_output_path(
            input_path,
            args.output.as_deref(),
            args.output_dir.as_deref(),
        ) {
            Some(p) => p,
            None => {
                eprintln!(
                    "  error: cannot determine output path for '{}'.",
                    input_path.display()
                );
                any_failure = true;
                continue;
            }
        };

        match run_one(input_path, &output_path, &ops, args.preview) {
            Ok(()) => {
                if args.verbose || multi {
                    println!(
                        "  → {} ({:.0}ms)",
                        output_path.display(),
                        file_start.elapsed().as_secs_f64() * 1000.0
                    );
                }
            }
            Err(e) => {
                eprintln!("  error: {}", e);
                any_failure = true;
            }
        }
    }

    if any_failure {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

// ============================================================================
// Per-file processing pipeline
// ============================================================================

fn run_one(
    input: &Path,
    output: &Path,
    ops: &[EditAction],
    preview: bool,
) -> Result<(), String> {
    let pixels = load_image(input).map_err(|e| format!("load failed: {}", e))?;
    let mut editor = Editor::load(pixels).map_err(|e| e.to_string())?;

    for op in ops {
        apply_op(&mut editor, op).map_err(|e| e.to_string())?;
    }

    let result = if preview {
        editor.current_preview().buffer
    } else {
        editor.displayed()
    };
    save_image(&result, output).map_err(|e| format!("save failed: {}", e))?;
    Ok(())
}

/// Route one parsed op through the editor's recording interface so the
/// CLI gets exactly the validation the GUI gets.
fn apply_op(editor: &mut Editor, op: &EditAction) -> Result<(), Error> {
    match op {
        EditAction::Crop(region) => editor.record_crop(*region),
        EditAction::Rotate(degrees) => {
            editor.record_rotate(*degrees);
            Ok(())
        }
        EditAction::Draw(region) => {
            editor.record_draw(*region);
            Ok(())
        }
        EditAction::SetChannel(filter) => {
            editor.set_channel(*filter);
            Ok(())
        }
    }
}

// ============================================================================
// Op parsing
// ============================================================================

fn parse_ops(entries: &[String]) -> Result<Vec<EditAction>, String> {
    entries.iter().map(|e| parse_op(e)).collect()
}

fn parse_op(entry: &str) -> Result<EditAction, String> {
    let (name, value) = entry
        .split_once('=')
        .ok_or_else(|| format!("malformed op '{}', expected NAME=VALUE", entry))?;

    match name {
        "crop" => Ok(EditAction::Crop(parse_region(value)?)),
        "rotate" => value
            .trim()
            .parse::<i32>()
            .map(EditAction::Rotate)
            .map_err(|_| format!("invalid rotation '{}', expected whole degrees", value)),
        "draw" => Ok(EditAction::Draw(parse_region(value)?)),
        "channel" => parse_channel(value).map(EditAction::SetChannel),
        other => Err(format!(
            "unknown op '{}' (expected crop, rotate, draw, or channel)",
            other
        )),
    }
}

fn parse_region(value: &str) -> Result<Region, String> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != 4 {
        return Err(format!("expected Y1,Y2,X1,X2, got '{}'", value));
    }
    let mut coords = [0u32; 4];
    for (slot, part) in coords.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|_| format!("invalid coordinate '{}'", part.trim()))?;
    }
    Ok(Region::new(coords[0], coords[1], coords[2], coords[3]))
}

fn parse_channel(value: &str) -> Result<ChannelFilter, String> {
    match value.trim().to_lowercase().as_str() {
        "none" => Ok(ChannelFilter::None),
        "red" => Ok(ChannelFilter::Red),
        "green" => Ok(ChannelFilter::Green),
        "blue" => Ok(ChannelFilter::Blue),
        other => Err(format!(
            "unknown channel '{}' (expected none, red, green, or blue)",
            other
        )),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Expand glob patterns and literal paths into a deduplicated, ordered list.
fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let as_path = Path::new(pattern);

        if as_path.exists() {
            // Literal path — use directly
            if !result.iter().any(|p| p.as_path() == as_path) {
                result.push(as_path.to_path_buf());
            }
            continue;
        }

        // Treat as glob pattern
        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matched = false;
                for entry in entries.flatten() {
                    if !result.contains(&entry) {
                        result.push(entry);
                    }
                    matched = true;
                }
                if !matched {
                    eprintln!("warning: pattern '{}' matched no files.", pattern);
                }
            }
            Err(e) => {
                eprintln!("warning: invalid glob '{}': {}", pattern, e);
            }
        }
    }

    result
}

/// Compute the output path for a single input file.
///
/// Priority:
/// 1. `--output` (explicit path, used for single-file input)
/// 2. `--output-dir` (batch directory, derives filename from input stem)
/// 3. Fallback: same directory as input, same stem, `.png` extension
///    (appends `_out` to the stem if it would collide with the input path)
fn build_output_path(
    input: &Path,
    output: Option<&Path>,
    output_dir: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(out) = output {
        return Some(out.to_path_buf());
    }

    let stem = input.file_stem()?.to_string_lossy().into_owned();

    if let Some(dir) = output_dir {
        return Some(dir.join(format!("{}.png", stem)));
    }

    // Write next to the input file
    let parent = input.parent().unwrap_or(Path::new("."));
    let candidate = parent.join(format!("{}.png", stem));

    // Avoid silent overwrite of the input
    if candidate == input {
        Some(parent.join(format!("{}_out.png", stem)))
    } else {
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops_parse_in_command_line_order() {
        let entries = [
            "crop=0,100,0,200".to_string(),
            "rotate=-45".to_string(),
            "draw=5,50,5,50".to_string(),
            "channel=blue".to_string(),
        ];
        let ops = parse_ops(&entries).unwrap();
        assert_eq!(
            ops,
            vec![
                EditAction::Crop(Region::new(0, 100, 0, 200)),
                EditAction::Rotate(-45),
                EditAction::Draw(Region::new(5, 50, 5, 50)),
                EditAction::SetChannel(ChannelFilter::Blue),
            ]
        );
    }

    #[test]
    fn malformed_ops_are_rejected_with_context() {
        assert!(parse_op("crop").unwrap_err().contains("NAME=VALUE"));
        assert!(parse_op("crop=1,2,3").unwrap_err().contains("Y1,Y2,X1,X2"));
        assert!(parse_op("rotate=fast").unwrap_err().contains("rotation"));
        assert!(parse_op("channel=sepia").unwrap_err().contains("channel"));
        assert!(parse_op("sharpen=3").unwrap_err().contains("unknown op"));
    }

    #[test]
    fn channel_names_are_case_insensitive() {
        assert_eq!(parse_channel("Red"), Ok(ChannelFilter::Red));
        assert_eq!(parse_channel(" NONE "), Ok(ChannelFilter::None));
    }

    #[test]
    fn output_path_avoids_clobbering_the_input() {
        let out = build_output_path(Path::new("dir/photo.png"), None, None).unwrap();
        assert_eq!(out, Path::new("dir/photo_out.png"));

        let out = build_output_path(Path::new("dir/photo.jpg"), None, None).unwrap();
        assert_eq!(out, Path::new("dir/photo.png"));
    }

    #[test]
    fn output_dir_takes_the_input_stem() {
        let out =
            build_output_path(Path::new("shots/a.jpg"), None, Some(Path::new("done"))).unwrap();
        assert_eq!(out, Path::new("done/a.png"));
    }
}
