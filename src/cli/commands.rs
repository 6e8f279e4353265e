use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{
    DEFAULT_MAPPING_FILE, DEFAULT_MAX_WORKSPACES, DEFAULT_OUTPUT_FILE, ExtractorConfig,
};
use crate::export::{load_chats, load_mapping, save_chats, save_mapping};
use crate::extractor::{extract_chats, extract_path_mapping};
use crate::mapping::apply_mapping;
use crate::mapping::regroup::regroup_chats;
use crate::models::{ChatRecord, Role};
use crate::utils::format_path_with_tilde;

/// Projects listed individually by `stats`; the rest are folded into one line
const TOP_PROJECTS: usize = 15;

#[derive(Parser)]
#[command(name = "cursor-chat-extractor")]
#[command(version = "0.1.0")]
#[command(about = "Extract Cursor chat history into project-labelled JSON", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract conversations from Cursor's database and write them as JSON
    Extract {
        /// Cursor data directory (defaults to CURSOR_DATA_DIR or the platform location)
        #[arg(long)]
        cursor_dir: Option<PathBuf>,
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,
        /// Conversation -> project mapping applied when the file exists
        #[arg(short, long, default_value = DEFAULT_MAPPING_FILE)]
        mapping: PathBuf,
        /// Maximum number of workspace databases to read for known projects
        #[arg(long, default_value_t = DEFAULT_MAX_WORKSPACES)]
        max_workspaces: usize,
    },
    /// Build a conversation -> project mapping from file attachments
    MapPaths {
        #[arg(long)]
        cursor_dir: Option<PathBuf>,
        #[arg(short, long, default_value = DEFAULT_MAPPING_FILE)]
        output: PathBuf,
    },
    /// Rewrite the projects of an exported chat file using a mapping
    ApplyMapping {
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
        chats: PathBuf,
        #[arg(short, long, default_value = DEFAULT_MAPPING_FILE)]
        mapping: PathBuf,
    },
    /// Regroup the chats of an exported file by their real project roots
    Regroup {
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
        chats: PathBuf,
    },
    /// Show statistics about an exported chat file
    Stats {
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
        input: PathBuf,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Extract { cursor_dir, output, mapping, max_workspaces }) => {
            let config = ExtractorConfig::resolve(cursor_dir)?
                .with_output(output)
                .with_mapping(mapping)
                .with_max_workspaces(max_workspaces);
            extract(&config)?;
        }
        Some(Commands::MapPaths { cursor_dir, output }) => {
            let config = ExtractorConfig::resolve(cursor_dir)?.with_mapping(output);
            map_paths(&config)?;
        }
        Some(Commands::ApplyMapping { chats, mapping }) => {
            remap(&chats, &mapping)?;
        }
        Some(Commands::Regroup { chats }) => {
            regroup(&chats)?;
        }
        Some(Commands::Stats { input }) => {
            show_stats(&input)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn extract(config: &ExtractorConfig) -> Result<()> {
    let (chats, report) = extract_chats(config);
    save_chats(&config.output_path, &chats)?;

    println!("Cursor Chat Extraction");
    println!("======================");
    println!("Cursor directory: {}", format_path_with_tilde(&config.cursor_dir));
    println!("Bubbles read: {}", report.records_read);
    println!("  Parsed: {}", report.parse.parsed);
    println!("  Undecodable: {}", report.parse.decode_errors);
    println!("Sessions: {}", report.sessions);
    println!("Known projects: {}", report.known_projects);
    for (source, count) in &report.sources {
        println!("  Classified by {}: {}", source, count);
    }
    println!();
    println!("Wrote {} chats to {}", chats.len(), config.output_path.display());
    Ok(())
}

fn map_paths(config: &ExtractorConfig) -> Result<()> {
    let mapping = extract_path_mapping(config);
    save_mapping(&config.mapping_path, &mapping)?;

    let projects = count_by(mapping.values().map(|p| p.root_path.as_str()));
    println!("Mapped {} conversations to {} roots", mapping.len(), projects.len());
    for (root, count) in projects.iter().take(TOP_PROJECTS) {
        println!("  {}: {}", root, count);
    }
    println!("Wrote mapping to {}", config.mapping_path.display());
    Ok(())
}

fn remap(chats_path: &Path, mapping_path: &Path) -> Result<()> {
    let mut chats = load_chats(chats_path)?;
    let mapping = load_mapping(mapping_path)?;
    let applied = apply_mapping(&mut chats, &mapping);
    save_chats(chats_path, &chats)?;

    println!("Updated {} of {} chats in {}", applied, chats.len(), chats_path.display());
    Ok(())
}

fn regroup(chats_path: &Path) -> Result<()> {
    let mut chats = load_chats(chats_path)?;
    let changed = regroup_chats(&mut chats);
    save_chats(chats_path, &chats)?;

    println!("Regrouped {} of {} chats in {}", changed, chats.len(), chats_path.display());
    let projects = count_by(chats.iter().map(|c| c.project.name.as_str()));
    for (name, count) in projects.iter().take(TOP_PROJECTS) {
        println!("  {}: {}", name, count);
    }
    Ok(())
}

fn show_stats(input: &Path) -> Result<()> {
    let chats = load_chats(input)
        .with_context(|| format!("Run `extract` first to create {}", input.display()))?;

    let (user, assistant) = role_counts(&chats);
    let messages: usize = chats.iter().map(|c| c.messages.len()).sum();

    println!("Cursor Chat Statistics");
    println!("======================");
    println!("Total chats: {}", chats.len());
    println!("Total messages: {}", messages);
    println!("  User messages: {}", user);
    println!("  Assistant messages: {}", assistant);

    // Exported chats are newest first, undated ones last
    let dated: Vec<_> = chats.iter().filter_map(|c| c.timestamp).collect();
    if let Some(newest) = dated.first() {
        println!("Newest chat: {}", newest.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(oldest) = dated.last() {
        println!("Oldest chat: {}", oldest.format("%Y-%m-%d %H:%M:%S"));
    }

    let projects = count_by(chats.iter().map(|c| c.project.name.as_str()));
    println!();
    println!("Projects: {}", projects.len());
    for (name, count) in projects.iter().take(TOP_PROJECTS) {
        println!("  {}: {}", name, count);
    }
    let others: usize = projects.iter().skip(TOP_PROJECTS).map(|(_, count)| count).sum();
    if others > 0 {
        println!("  Others: {}", others);
    }

    Ok(())
}

fn role_counts(chats: &[ChatRecord]) -> (usize, usize) {
    chats.iter().flat_map(|c| &c.messages).fold((0, 0), |(user, assistant), m| match m.role {
        Role::User => (user + 1, assistant),
        Role::Assistant => (user, assistant + 1),
        Role::Unknown => (user, assistant),
    })
}

/// Occurrences per label, most frequent first, ties alphabetical
fn count_by<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    counts
}
