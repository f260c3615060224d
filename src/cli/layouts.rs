//! Saved layout CLI commands.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::common::{
    load_config, open_repository, print_grid, print_json, read_layout_file, CliError, CliResult,
};
use crate::models::saved_layout::validate_name;
use crate::models::{KeyboardLayout, Language, LayoutId, LayoutSource, Position, SavedLayout};
use crate::services::{LayoutCatalog, LayoutEditor, LayoutRepository};

/// Manage saved keyboard layouts
#[derive(Args, Debug)]
pub struct LayoutsArgs {
    #[command(subcommand)]
    command: LayoutsCommand,
}

#[derive(Subcommand, Debug)]
enum LayoutsCommand {
    /// List saved layouts of a language, most recently updated first
    List(ListArgs),
    /// Print a saved layout
    Show(ShowArgs),
    /// Save a new layout
    Save(SaveArgs),
    /// Rename a saved layout
    Rename(RenameArgs),
    /// Delete a saved layout
    Delete(DeleteArgs),
    /// Make a saved layout the default of its language
    SetDefault(SetDefaultArgs),
    /// Print the default layout of a language
    Default(DefaultArgs),
    /// Rearrange keys of a layout and save the result as a new layout
    Edit(EditArgs),
}

/// List saved layouts
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Layout language (en, ar)
    #[arg(long, short, default_value = "en")]
    language: Language,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Print a saved layout
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Layout id
    id: LayoutId,

    /// Output the stored rows as JSON
    #[arg(long)]
    json: bool,
}

/// Save a new layout
#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Name of the new layout
    name: String,

    /// Layout language (en, ar); ignored with --from, which keeps the source language
    #[arg(long, short, default_value = "en")]
    language: Language,

    /// Copy the rows and language of an existing layout
    #[arg(long, value_name = "ID", conflicts_with = "file")]
    from: Option<LayoutId>,

    /// Read rows from a JSON file in the saved-layout format
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,
}

/// Rename a layout
#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Layout id
    id: LayoutId,
    /// New name
    name: String,
}

/// Delete a layout
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Layout id
    id: LayoutId,
}

/// Make a layout the default
#[derive(Args, Debug)]
pub struct SetDefaultArgs {
    /// Layout id
    id: LayoutId,
}

/// Print the default layout
#[derive(Args, Debug)]
pub struct DefaultArgs {
    /// Layout language (en, ar)
    #[arg(long, short, default_value = "en")]
    language: Language,

    /// Output the rows as JSON
    #[arg(long)]
    json: bool,
}

/// Rearrange keys
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Layout to start from (defaults to the built-in layout of the language)
    #[arg(long, value_name = "ID")]
    from: Option<LayoutId>,

    /// Language of the built-in layout to start from (en, ar)
    #[arg(long, short, default_value = "en")]
    language: Language,

    /// Swap two keys, given as ROW,COL:ROW,COL (repeatable)
    #[arg(long = "swap", value_name = "FROM:TO", value_parser = parse_swap, required = true)]
    swaps: Vec<(Position, Position)>,

    /// Name of the layout to save
    #[arg(long)]
    save_as: String,

    /// Also make the saved layout the default of its language
    #[arg(long)]
    set_default: bool,
}

/// One row of `layouts list --json`
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct LayoutSummary {
    id: LayoutId,
    name: String,
    language: Language,
    is_default: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SavedLayout> for LayoutSummary {
    fn from(layout: SavedLayout) -> Self {
        Self {
            id: layout.id,
            name: layout.name,
            language: layout.language,
            is_default: layout.is_default,
            created_at: layout.created_at,
            updated_at: layout.updated_at,
        }
    }
}

impl LayoutsArgs {
    /// Execute layouts subcommand
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let catalog = LayoutCatalog::new();
        let repository = open_repository(&config, &catalog)?;

        match &self.command {
            LayoutsCommand::List(args) => args.execute(&repository),
            LayoutsCommand::Show(args) => args.execute(&repository),
            LayoutsCommand::Save(args) => args.execute(&repository, &catalog),
            LayoutsCommand::Rename(args) => args.execute(&repository),
            LayoutsCommand::Delete(args) => args.execute(&repository),
            LayoutsCommand::SetDefault(args) => args.execute(&repository),
            LayoutsCommand::Default(args) => args.execute(&repository),
            LayoutsCommand::Edit(args) => args.execute(&repository, catalog),
        }
    }
}

impl ListArgs {
    fn execute(&self, repository: &LayoutRepository) -> CliResult<()> {
        let layouts = repository
            .layouts_by_language(self.language)
            .map_err(|e| CliError::io(format!("Failed to list layouts: {e:#}")))?;

        if self.json {
            let summaries: Vec<LayoutSummary> = layouts.into_iter().map(Into::into).collect();
            return print_json(&summaries);
        }

        if layouts.is_empty() {
            println!("No saved {} layouts.", self.language.display_name());
            return Ok(());
        }

        for layout in layouts {
            let marker = if layout.is_default { "*" } else { " " };
            println!(
                "{marker} {:>4}  {:<32} {}",
                layout.id.0,
                layout.name,
                layout.updated_at.format("%Y-%m-%d %H:%M")
            );
        }
        Ok(())
    }
}

impl ShowArgs {
    fn execute(&self, repository: &LayoutRepository) -> CliResult<()> {
        let record = find_record(repository, self.id)?;
        let rows = repository
            .load_layout(self.id)
            .map_err(|e| CliError::io(format!("Failed to load layout: {e:#}")))?
            .ok_or_else(|| CliError::validation(format!("Layout {} is corrupt", self.id)))?;

        if self.json {
            return print_json(&rows);
        }

        let default = if record.is_default { " (default)" } else { "" };
        let direction = if record.language.is_rtl() { ", right-to-left" } else { "" };
        println!("{} [{}{}]{}", record.name, record.language, direction, default);
        print_grid(&KeyboardLayout::from_positions(&rows));
        Ok(())
    }
}

impl SaveArgs {
    fn execute(&self, repository: &LayoutRepository, catalog: &LayoutCatalog) -> CliResult<()> {
        let (rows, language) = if let Some(source) = self.from {
            let record = find_record(repository, source)?;
            let rows = repository
                .load_layout(source)
                .map_err(|e| CliError::io(format!("Failed to load layout: {e:#}")))?
                .ok_or_else(|| CliError::validation(format!("Layout {source} is corrupt")))?;
            (rows, record.language)
        } else if let Some(path) = &self.file {
            (read_layout_file(path)?.to_positions(), self.language)
        } else {
            (catalog.default_layout(self.language).to_positions(), self.language)
        };

        check_name(&self.name)?;
        let id = repository
            .save_layout(&self.name, &rows, language)
            .map_err(|e| CliError::io(format!("Failed to save layout: {e:#}")))?;
        println!("{id}");
        Ok(())
    }
}

impl RenameArgs {
    fn execute(&self, repository: &LayoutRepository) -> CliResult<()> {
        check_name(&self.name)?;
        let renamed = repository
            .rename_layout(self.id, &self.name)
            .map_err(|e| CliError::io(format!("Failed to rename layout: {e:#}")))?;
        if !renamed {
            return Err(CliError::validation(format!("Layout {} not found", self.id)));
        }
        println!("Renamed layout {} to '{}'.", self.id, self.name);
        Ok(())
    }
}

impl DeleteArgs {
    fn execute(&self, repository: &LayoutRepository) -> CliResult<()> {
        let deleted = repository
            .delete_layout(self.id)
            .map_err(|e| CliError::io(format!("Failed to delete layout: {e:#}")))?;
        if !deleted {
            return Err(CliError::validation(format!("Layout {} not found", self.id)));
        }
        println!("Deleted layout {}.", self.id);
        Ok(())
    }
}

impl SetDefaultArgs {
    fn execute(&self, repository: &LayoutRepository) -> CliResult<()> {
        let record = find_record(repository, self.id)?;
        repository
            .set_default_layout(self.id, record.language)
            .map_err(|e| CliError::io(format!("Failed to set default layout: {e:#}")))?;
        println!(
            "Layout {} is now the default {} layout.",
            self.id,
            record.language.display_name()
        );
        Ok(())
    }
}

impl DefaultArgs {
    fn execute(&self, repository: &LayoutRepository) -> CliResult<()> {
        let record = repository
            .default_record(self.language)
            .map_err(|e| CliError::io(format!("Failed to read default layout: {e:#}")))?
            .ok_or_else(|| {
                CliError::validation(format!(
                    "No default {} layout is set",
                    self.language.display_name()
                ))
            })?;
        let rows = repository
            .get_default_layout(self.language)
            .map_err(|e| CliError::io(format!("Failed to read default layout: {e:#}")))?
            .ok_or_else(|| CliError::validation(format!("Layout {} is corrupt", record.id)))?;

        if self.json {
            return print_json(&rows);
        }

        println!("{} ({})", record.name, record.id);
        print_grid(&KeyboardLayout::from_positions(&rows));
        Ok(())
    }
}

impl EditArgs {
    fn execute(&self, repository: &LayoutRepository, catalog: LayoutCatalog) -> CliResult<()> {
        check_name(&self.save_as)?;
        let mut editor = LayoutEditor::new(catalog, self.language);

        if let Some(id) = self.from {
            let record = find_record(repository, id)?;
            let layout = repository
                .load_keyboard_layout(id)
                .map_err(|e| CliError::io(format!("Failed to load layout: {e:#}")))?
                .ok_or_else(|| CliError::validation(format!("Layout {id} is corrupt")))?;
            editor.load(LayoutSource::Saved(id), record.language, layout);
        }

        editor.enter_edit_mode();
        for (from, to) in &self.swaps {
            editor.set_dragged_key(Some(*from));
            if !editor.drop_dragged_key(*to) {
                return Err(CliError::validation(format!(
                    "Cannot swap {},{} with {},{}: position outside the layout",
                    from.row, from.col, to.row, to.col
                )));
            }
        }
        editor.exit_edit_mode();

        let language = editor.language();
        let id = repository
            .save_layout(&self.save_as, &editor.current_positions(), language)
            .map_err(|e| CliError::io(format!("Failed to save layout: {e:#}")))?;

        if self.set_default {
            repository
                .set_default_layout(id, language)
                .map_err(|e| CliError::io(format!("Failed to set default layout: {e:#}")))?;
        }

        println!("{id}");
        Ok(())
    }
}

fn find_record(repository: &LayoutRepository, id: LayoutId) -> CliResult<SavedLayout> {
    repository
        .get_layout(id)
        .map_err(|e| CliError::io(format!("Failed to read layout: {e:#}")))?
        .ok_or_else(|| CliError::validation(format!("Layout {id} not found")))
}

fn check_name(name: &str) -> CliResult<()> {
    validate_name(name).map_err(|e| CliError::validation(e.to_string()))
}

fn parse_position(s: &str) -> Result<Position, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL but got '{s}'"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("invalid row '{row}'"))?;
    let col = col
        .trim()
        .parse()
        .map_err(|_| format!("invalid column '{col}'"))?;
    Ok(Position::new(row, col))
}

fn parse_swap(s: &str) -> Result<(Position, Position), String> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ROW,COL:ROW,COL but got '{s}'"))?;
    Ok((parse_position(from)?, parse_position(to)?))
}
