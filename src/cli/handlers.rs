// FILE: src/cli/handlers.rs
use crate::{
    analyze_snapshot, cli::AnalysisFormat, compute_stats, diagnostics, export, export_all,
    load_snapshot, write_bundle, ExportError, ExportFormat, ExportOptions, ExportStats, Result,
};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Instant;

/// Where one export run writes its text
#[derive(Debug, Clone, PartialEq)]
enum ExportTarget {
    Stdout,
    File(PathBuf),
    Directory(PathBuf),
}

#[derive(Debug, Clone)]
struct ExportJob {
    input_path: String,
    formats: Vec<ExportFormat>,
    target: ExportTarget,
    options: ExportOptions,
}

impl ExportJob {
    fn run(&self) -> Result<ExportStats> {
        let start_time = Instant::now();
        let snapshot = load_snapshot(&self.input_path)?;
        let mut stats = compute_stats(&snapshot);

        match &self.target {
            ExportTarget::Stdout => {
                for format in &self.formats {
                    let output = export(&snapshot, *format, &self.options);
                    stats.output_size += output.len() as u64;
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(output.as_bytes())?;
                    if !output.ends_with('\n') {
                        stdout.write_all(b"\n")?;
                    }
                }
            }
            ExportTarget::File(path) => {
                let format = self.formats.first().copied().unwrap_or(ExportFormat::Css);
                let output = export(&snapshot, format, &self.options);
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                std::fs::write(path, &output)?;
                stats.output_size = output.len() as u64;
            }
            ExportTarget::Directory(directory) => {
                let files: Vec<_> = export_all(&snapshot, &self.options)
                    .into_iter()
                    .zip(ExportFormat::ALL)
                    .filter(|(_, format)| self.formats.contains(format))
                    .map(|(file, _)| file)
                    .collect();
                stats.output_size = files.iter().map(|file| file.content.len() as u64).sum();
                write_bundle(directory, &files)?;
            }
        }

        stats.export_time_ms = start_time.elapsed().as_millis() as u64;
        Ok(stats)
    }

    fn describe_target(&self) -> String {
        match &self.target {
            ExportTarget::Stdout => "stdout".to_string(),
            ExportTarget::File(path) | ExportTarget::Directory(path) => path.display().to_string(),
        }
    }
}

fn export_target(formats: &[ExportFormat], output: Option<&String>, config_directory: Option<&str>) -> ExportTarget {
    match (formats, output, config_directory) {
        ([_], Some(path), _) => ExportTarget::File(PathBuf::from(path)),
        ([format], None, Some(directory)) => {
            ExportTarget::File(Path::new(directory).join(format.default_file_name()))
        }
        ([_], None, None) => ExportTarget::Stdout,
        (_, Some(path), _) => ExportTarget::Directory(PathBuf::from(path)),
        (_, None, Some(directory)) => ExportTarget::Directory(PathBuf::from(directory)),
        (_, None, None) => ExportTarget::Directory(PathBuf::from(".")),
    }
}

// --- EXPORT ---
pub fn handle_export_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let input_path = matches
        .get_one::<String>("input")
        .ok_or_else(|| ExportError::invalid_format("Missing input file"))?;
    let formats = cli.export_formats(matches)?;
    let target = export_target(&formats, matches.get_one::<String>("output"), cli.output_directory());

    let job = ExportJob {
        input_path: input_path.clone(),
        formats,
        target,
        options: cli.build_export_options(matches),
    };

    if matches.get_flag("watch") {
        if job.target == ExportTarget::Stdout {
            return Err(ExportError::config("--watch needs an output path (-o)"));
        }
        watch_and_export(&job)
    } else {
        export_once(&job, matches.get_flag("stats"))
    }
}

fn export_once(job: &ExportJob, show_stats: bool) -> Result<()> {
    let to_stdout = job.target == ExportTarget::Stdout;
    if !to_stdout {
        println!("🔨 Exporting {} -> {}", job.input_path, job.describe_target());
    }

    let stats = job.run()?;

    if !to_stdout {
        println!("✅ Export successful!");
        println!("   Output: {} bytes", stats.output_size);
        println!("   Time: {}ms", stats.export_time_ms);
    }
    if stats.circular_count + stats.unresolved_count > 0 {
        eprintln!(
            "⚠️  {} circular and {} unresolved alias value(s) were exported as markers",
            stats.circular_count, stats.unresolved_count
        );
    }

    if show_stats {
        print_detailed_stats(&stats);
    }

    Ok(())
}

fn watch_and_export(job: &ExportJob) -> Result<()> {
    println!("👀 Watching {} for changes...", job.input_path);

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                if let Err(e) = tx.send(event) {
                    eprintln!("Watch error: {}", e);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| {
        ExportError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to create file watcher: {}", e),
        ))
    })?;

    watcher
        .watch(Path::new(&job.input_path), RecursiveMode::NonRecursive)
        .map_err(|e| {
            ExportError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to watch file: {}", e),
            ))
        })?;

    match job.run() {
        Ok(_) => println!("✅ Initial export successful"),
        Err(e) => eprintln!("❌ Initial export failed: {}", e),
    }

    loop {
        match rx.recv() {
            Ok(event) => {
                if matches!(event.kind, EventKind::Access(_)) {
                    continue;
                }
                println!("🔄 File changed, re-exporting...");
                match job.run() {
                    Ok(stats) => println!(
                        "✅ Re-exported successfully ({} bytes, {}ms)",
                        stats.output_size, stats.export_time_ms
                    ),
                    Err(e) => eprintln!("❌ Export failed: {}", e),
                }
            }
            Err(e) => {
                eprintln!("Watch error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

fn print_detailed_stats(stats: &ExportStats) {
    println!("\n📊 Export Statistics:");
    println!("   Collections: {}", stats.collection_count);
    println!("   Modes: {}", stats.mode_count);
    println!("   Variables: {}", stats.variable_count);
    println!("   Alias values: {}", stats.alias_count);
    println!("   Circular aliases: {}", stats.circular_count);
    println!("   Unresolved aliases: {}", stats.unresolved_count);
    println!("   Output size: {} bytes", stats.output_size);
    println!("   Export time: {}ms", stats.export_time_ms);
}

// --- CHECK ---
pub fn handle_check_command(matches: &clap::ArgMatches) -> Result<()> {
    let input_path = matches
        .get_one::<String>("input")
        .ok_or_else(|| ExportError::invalid_format("Missing input path"))?;
    let recursive = matches.get_flag("recursive");

    if recursive && Path::new(input_path).is_dir() {
        check_directory_recursive(input_path)
    } else {
        check_single_file(Path::new(input_path))
    }
}

fn check_single_file(input_path: &Path) -> Result<()> {
    println!("🔍 Checking {}", input_path.display());
    let snapshot = load_snapshot(&input_path.to_string_lossy())?;
    let found = diagnostics::validate(&snapshot);
    let errors = diagnostics::error_count(&found);

    for diagnostic in &found {
        println!("   {}", diagnostic);
    }

    if errors > 0 {
        println!("❌ {} - {} error(s)", input_path.display(), errors);
        Err(ExportError::Validation {
            count: errors,
            message: format!("{} has errors", input_path.display()),
        })
    } else {
        println!(
            "✅ {} - No errors found ({} warning(s))",
            input_path.display(),
            found.len()
        );
        Ok(())
    }
}

fn check_directory_recursive(dir_path: &str) -> Result<()> {
    let mut total_files = 0;
    let mut error_files = 0;

    for entry in walkdir::WalkDir::new(dir_path) {
        let entry = entry.map_err(|e| {
            ExportError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Directory traversal error: {}", e),
            ))
        })?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "json") {
            total_files += 1;
            if let Err(e) = check_single_file(entry.path()) {
                if !matches!(e, ExportError::Validation { .. }) {
                    println!("❌ {} - {}", entry.path().display(), e);
                }
                error_files += 1;
            }
        }
    }

    println!("\n📊 Check Summary:");
    println!("   Total files: {}", total_files);
    println!("   Files with errors: {}", error_files);
    if total_files > 0 {
        println!(
            "   Success rate: {:.1}%",
            (total_files - error_files) as f64 / total_files as f64 * 100.0
        );
    }

    if error_files > 0 {
        Err(ExportError::Validation {
            count: error_files,
            message: format!("{} files have errors", error_files),
        })
    } else {
        Ok(())
    }
}

// --- ANALYZE ---
pub fn handle_analyze_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let input_path = matches
        .get_one::<String>("input")
        .ok_or_else(|| ExportError::invalid_format("Missing input file"))?;
    let output_path = matches.get_one::<String>("output");
    let format = matches
        .get_one::<AnalysisFormat>("format")
        .copied()
        .unwrap_or(AnalysisFormat::Debug);

    println!("🔬 Analyzing {}", input_path);

    let options = cli.config_export_options();
    let stats = analyze_snapshot(input_path, &options)?;
    let analysis = match format {
        AnalysisFormat::Json => serde_json::to_string_pretty(&stats).map_err(|e| {
            ExportError::invalid_format(format!("JSON serialization error: {}", e))
        })?,
        AnalysisFormat::Debug => format!("Snapshot Analysis: {}\n\n{:#?}", input_path, stats),
    };

    if let Some(output_file) = output_path {
        std::fs::write(output_file, analysis)?;
        println!("✅ Analysis saved to {}", output_file);
    } else {
        println!("{}", analysis);
    }
    Ok(())
}
