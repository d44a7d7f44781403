// CLI command implementations
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

use oxiflac::field_mapping::to_vorbis_key;
use oxiflac::{BlockData, FlacFile, Metadata, MetadataBlock};

use crate::cli::config::{Commands, Config};
use crate::cli::output::{OutputFormatter, ProgressBar};

/// Run the selected subcommand, returning how many files failed
pub fn run(config: &Config) -> Result<usize> {
    let formatter = OutputFormatter::new(config.format, config.quiet);

    match &config.command {
        Commands::Read { files, output } => command_read(files, output.as_deref(), &formatter),
        Commands::Info { files, detailed } => command_info(files, *detailed, &formatter),
        Commands::Blocks { file, payload } => command_blocks(file, *payload, &formatter).map(|_| 0),
        Commands::Get { file, field } => command_get(file, field, &formatter).map(|_| 0),
        Commands::Set { file, field, value } => {
            edit_tags(file, &formatter, |file| {
                file.chain_mut().vorbis_comment_mut().set(to_vorbis_key(field), value.as_str());
                format!("Set {} on {}", field, file.path().display())
            })
            .map(|_| 0)
        }
        Commands::Add { file, field, value } => {
            edit_tags(file, &formatter, |file| {
                file.chain_mut().vorbis_comment_mut().add(to_vorbis_key(field), value.as_str());
                format!("Added {} to {}", field, file.path().display())
            })
            .map(|_| 0)
        }
        Commands::Remove { file, field } => {
            edit_tags(file, &formatter, |file| {
                let removed = match file.vorbis_comment() {
                    Some(_) => file.chain_mut().vorbis_comment_mut().remove(&to_vorbis_key(field)),
                    None => 0,
                };
                format!("Removed {} value(s) of {} from {}", removed, field, file.path().display())
            })
            .map(|_| 0)
        }
        Commands::ExportCover { file, output, index } => {
            command_export_cover(file, output, *index, &formatter).map(|_| 0)
        }
        Commands::Batch { directory, pattern } => command_batch(directory, pattern, &formatter),
    }
}

fn summary(path: &str) -> Result<serde_json::Value> {
    let file = FlacFile::open(path).with_context(|| format!("Failed to read {}", path))?;
    let mut value = serde_json::to_value(Metadata::from_chain(file.chain()))?;
    value["file"] = json!(path);
    Ok(value)
}

/// Read metadata from files
fn command_read(files: &[String], output: Option<&str>, formatter: &OutputFormatter) -> Result<usize> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {}", path))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout()),
    };

    let mut failures = 0;
    for file_path in files {
        match summary(file_path) {
            Ok(value) => formatter.output(&value, &mut writer)?,
            Err(e) => {
                formatter.print_error(&format!("{:#}", e));
                failures += 1;
            }
        }
    }
    writer.flush()?;

    Ok(failures)
}

/// Show detailed file information
fn command_info(files: &[String], detailed: bool, formatter: &OutputFormatter) -> Result<usize> {
    let mut failures = 0;
    for file_path in files {
        match file_info(file_path, detailed) {
            Ok(value) => formatter.output(&value, &mut io::stdout())?,
            Err(e) => {
                formatter.print_error(&format!("{:#}", e));
                failures += 1;
            }
        }
    }
    Ok(failures)
}

fn file_info(path: &str, detailed: bool) -> Result<serde_json::Value> {
    let file_metadata = std::fs::metadata(path).with_context(|| format!("File not found: {}", path))?;
    let file = FlacFile::open(path).with_context(|| format!("Failed to read {}", path))?;

    let modified = file_metadata
        .modified()
        .ok()
        .map(|time| chrono::DateTime::<chrono::Utc>::from(time).format("%Y-%m-%d %H:%M:%S UTC").to_string());

    let mut value = json!({
        "file": path,
        "size": file_metadata.len(),
        "modified": modified,
        "metadata_bytes": file.audio_offset(),
        "audio_bytes": file_metadata.len().saturating_sub(file.audio_offset()),
        "duration": file.duration(),
        "stream_info": file.stream_info(),
        "blocks": file.chain().len(),
    });

    if detailed {
        value["block_list"] = file
            .chain()
            .blocks()
            .iter()
            .map(|block| block_json(block, false))
            .collect::<Result<Vec<_>>>()?
            .into();
    }

    Ok(value)
}

fn block_json(block: &MetadataBlock, payload: bool) -> Result<serde_json::Value> {
    let encoded = block.encode_payload()?;
    let mut value = json!({
        "type": block.block_type(),
        "name": block.kind().to_string(),
        "length": encoded.len(),
    });

    match &block.data {
        BlockData::StreamInfo(info) => value["stream_info"] = serde_json::to_value(info)?,
        BlockData::VorbisComment(comment) => {
            value["vendor"] = json!(comment.vendor());
            value["comments"] = comment
                .entries()
                .iter()
                .map(|entry| json!(entry.to_raw()))
                .collect::<Vec<_>>()
                .into();
        }
        BlockData::Opaque(opaque) => {
            if let Some(id) = opaque.application_id() {
                value["application_id"] = json!(format!("{:08X}", id));
            }
            if payload {
                value["payload"] = json!(BASE64.encode(&opaque.data));
            }
        }
    }

    Ok(value)
}

/// List metadata blocks
fn command_blocks(file: &str, payload: bool, formatter: &OutputFormatter) -> Result<()> {
    let flac = FlacFile::open(file).with_context(|| format!("Failed to read {}", file))?;
    let mut stdout = io::stdout();
    for (index, block) in flac.chain().blocks().iter().enumerate() {
        let mut value = block_json(block, payload)?;
        value["index"] = json!(index);
        formatter.output(&value, &mut stdout)?;
    }
    Ok(())
}

/// Print tag values, one per line
fn command_get(file: &str, field: &str, formatter: &OutputFormatter) -> Result<()> {
    let flac = FlacFile::open(file).with_context(|| format!("Failed to read {}", file))?;
    let key = to_vorbis_key(field);
    let values = flac
        .vorbis_comment()
        .map(|comment| comment.get(&key))
        .unwrap_or_default();

    if values.is_empty() {
        formatter.print_info(&format!("{} has no {} tag", file, key));
    }
    for value in values.iter() {
        println!("{}", value);
    }
    Ok(())
}

/// Apply `edit` to the file's chain and save it in place
fn edit_tags(file: &str, formatter: &OutputFormatter, edit: impl FnOnce(&mut FlacFile) -> String) -> Result<()> {
    let mut flac = FlacFile::open(file).with_context(|| format!("Failed to read {}", file))?;
    let message = edit(&mut flac);
    flac.save().with_context(|| format!("Failed to write {}", file))?;
    formatter.print_success(&message);
    Ok(())
}

/// Export cover art
fn command_export_cover(file: &str, output_dir: &str, index: Option<usize>, formatter: &OutputFormatter) -> Result<()> {
    let flac = FlacFile::open(file).with_context(|| format!("Failed to read {}", file))?;
    let pictures = flac.chain().pictures();
    if pictures.is_empty() {
        bail!("{} has no embedded pictures", file);
    }

    let selected: Vec<(usize, _)> = match index {
        Some(i) => match pictures.get(i) {
            Some(picture) => vec![(i, picture)],
            None => bail!("Picture index {} out of range ({} available)", i, pictures.len()),
        },
        None => pictures.iter().enumerate().collect(),
    };

    std::fs::create_dir_all(output_dir).with_context(|| format!("Failed to create {}", output_dir))?;
    let stem = Path::new(file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cover".to_string());

    for (i, picture) in selected {
        let target: PathBuf = Path::new(output_dir).join(format!("{}_{}.{}", stem, i, picture.extension()));
        std::fs::write(&target, &picture.data).with_context(|| format!("Failed to write {}", target.display()))?;
        formatter.print_success(&format!(
            "Exported {} ({}, {} bytes) to {}",
            picture.kind().map(|k| k.description()).unwrap_or("Unknown"),
            picture.mime_type,
            picture.data.len(),
            target.display()
        ));
    }

    Ok(())
}

/// Batch process directory
fn command_batch(directory: &str, pattern: &str, formatter: &OutputFormatter) -> Result<usize> {
    // Build glob pattern
    let glob_pattern = if pattern.contains('*') || pattern.contains('?') {
        format!("{}/{}", directory, pattern)
    } else {
        format!("{}/**/{}", directory, pattern)
    };

    let mut files: Vec<String> = Vec::new();
    for entry in glob::glob(&glob_pattern).with_context(|| format!("Invalid glob pattern: {}", glob_pattern))? {
        match entry {
            Ok(path) if path.is_file() => files.push(path.to_string_lossy().into_owned()),
            Ok(_) => {}
            Err(e) => formatter.print_error(&format!("Error reading path: {}", e)),
        }
    }

    if files.is_empty() {
        formatter.print_info("No files found matching pattern");
        return Ok(0);
    }

    let mut progress = ProgressBar::new(files.len(), !formatter.quiet);
    let mut results = Vec::with_capacity(files.len());
    let mut failures = 0;
    for file_path in &files {
        match summary(file_path) {
            Ok(value) => results.push(value),
            Err(e) => {
                formatter.print_error(&format!("{:#}", e));
                failures += 1;
            }
        }
        progress.increment(file_path);
    }

    formatter.output(&serde_json::Value::Array(results), &mut io::stdout())?;
    formatter.print_info(&format!(
        "Completed: {} successful, {} errors",
        files.len() - failures,
        failures
    ));

    Ok(failures)
}
