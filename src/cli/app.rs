//! CLI module for the diarynotes application
//!
//! This module handles the command-line interface for interacting with the
//! note store.
use std::{
    io::{stdin, stdout, Write},
    path::PathBuf,
};

use console::{style, Color};
use log::{debug, info};

use crate::{
    content_preview, export_document, Action, AppState, Category, CategoryFilter, Commands,
    Config, DiaryError, DisplayMode, KeyValueStore, Note, NoteStore, PdfRenderer, Result,
};

/// CLI Application handler - processes CLI commands and interfaces with NoteStore
pub struct App<S: KeyValueStore> {
    /// The note store backend
    store: NoteStore<S>,

    /// Display state driving every mutation
    state: AppState,

    /// Application configuration
    config: Config,

    /// Where `config --reset` writes
    config_path: PathBuf,

    /// Whether to display verbose output
    verbose: bool,
}

impl<S: KeyValueStore> App<S> {
    /// Create a new CLI application with the given store and config
    pub fn new(store: NoteStore<S>, config: Config, config_path: PathBuf, verbose: bool) -> Result<Self> {
        let state = AppState::load(&store)?;
        Ok(Self {
            store,
            state,
            config,
            config_path,
            verbose,
        })
    }

    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Add { text, category } => self.handle_add(text, category)?,

            Commands::Edit { id, text, category } => self.handle_edit(id, text, category)?,

            Commands::Delete { id, force } => self.handle_delete(id, force)?,

            Commands::List {
                search,
                filter,
                json,
            } => self.handle_list(search, filter, json)?,

            Commands::Export { output } => self.handle_export(output)?,

            Commands::Theme {
                toggle,
                dark,
                light,
            } => self.handle_theme(toggle, dark, light)?,

            Commands::Config { show, reset } => self.handle_config(show, reset)?,
        }

        Ok(())
    }

    /// Validation failures are silent unless strict validation is configured
    fn soften(&self, result: Result<()>) -> Result<bool> {
        match result {
            Ok(()) => Ok(true),
            Err(e) if e.is_validation() && !self.config.strict_validation => {
                debug!("Ignored: {}", e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn apply(&mut self, action: Action) -> Result<()> {
        self.state.apply(action, &mut self.store)
    }

    fn handle_add(&mut self, text: String, category: String) -> Result<()> {
        let category: Category = category.parse()?;
        self.apply(Action::SelectCategory(category))?;
        self.apply(Action::SetInput(text))?;

        let result = self.apply(Action::Submit);
        if self.soften(result)? {
            if let Some(note) = self.store.notes().first() {
                println!("Note created with ID: {}", note.id);
            }
        }
        Ok(())
    }

    fn handle_edit(&mut self, id: i64, text: String, category: Option<String>) -> Result<()> {
        let category = category.map(|c| c.parse::<Category>()).transpose()?;

        let result = self.apply(Action::StartEdit(id));
        if !self.soften(result)? {
            return Ok(());
        }

        self.apply(Action::SetInput(text))?;
        if let Some(category) = category {
            self.apply(Action::SelectCategory(category))?;
        }

        let result = self.apply(Action::Submit);
        if self.soften(result)? {
            println!("Note {} updated successfully", id);
        } else {
            self.apply(Action::CancelEdit)?;
        }
        Ok(())
    }

    fn handle_delete(&mut self, id: i64, force: bool) -> Result<()> {
        if !force {
            if let Some(note) = self.store.get(id) {
                println!("You are about to delete the following note:");
                println!("ID:       {}", note.id);
                println!("Category: {}", note.category);
                println!("Created:  {}", note.date);
                println!("\n{}", content_preview(&note.text, 100));

                print!("\nAre you sure you want to delete this note? [y/N]: ");
                stdout().flush()?;

                let mut input = String::new();
                stdin().read_line(&mut input)?;

                let input = input.trim().to_lowercase();
                if input != "y" && input != "yes" {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }
        }

        let result = self.apply(Action::Delete(id));
        if self.soften(result)? {
            println!("Note {} has been permanently deleted.", id);
        }
        Ok(())
    }

    /// List notes matching the search term and category filter
    fn handle_list(&mut self, search: String, filter: String, json: bool) -> Result<()> {
        let filter: CategoryFilter = filter.parse()?;
        self.apply(Action::SetSearch(search))?;
        self.apply(Action::SetFilter(filter))?;

        let notes = self.state.visible_notes(&self.store);
        if json {
            println!("{}", serde_json::to_string_pretty(&notes)?);
            return Ok(());
        }

        if notes.is_empty() {
            println!("{}", style("No notes found.").dim());
            return Ok(());
        }

        self.display_notes_text(&notes);
        println!(
            "\n{} of {} note{}",
            notes.len(),
            self.store.len(),
            if self.store.len() == 1 { "" } else { "s" }
        );
        Ok(())
    }

    /// Display notes in text format
    fn display_notes_text(&self, notes: &[&Note]) {
        // Use terminal width for formatting if available
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);
        let dark = self.state.display_mode.is_dark();

        for (i, note) in notes.iter().enumerate() {
            if i > 0 {
                println!("{}", style("-".repeat(term_width.min(50))).dim());
            }

            let tag = style(format!("[{}]", note.category))
                .fg(category_color(note.category, dark))
                .bold();
            println!("{} {}", tag, note.text);

            let footer = format!("#{}  {}", note.id, note.date);
            if self.verbose || dark {
                println!("{}", style(footer).dim());
            } else {
                println!("{}", style(footer).black().bright());
            }
        }
    }

    fn handle_export(&mut self, output: Option<PathBuf>) -> Result<()> {
        let path = output.unwrap_or_else(|| self.config.export_file.clone());

        match export_document(self.store.notes(), &PdfRenderer::default(), &path) {
            Ok(path) => {
                println!("Exported {} notes to {}", self.store.len(), path.display());
                Ok(())
            }
            Err(DiaryError::NothingToExport) => {
                println!(
                    "{} {}",
                    style("Warning:").yellow().bold(),
                    DiaryError::NothingToExport
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn handle_theme(&mut self, toggle: bool, dark: bool, light: bool) -> Result<()> {
        let wanted = match (toggle, dark, light) {
            (true, _, _) => Some(self.state.display_mode.toggled()),
            (_, true, _) => Some(DisplayMode::Dark),
            (_, _, true) => Some(DisplayMode::Light),
            _ => None,
        };

        if let Some(mode) = wanted {
            if mode != self.state.display_mode {
                self.apply(Action::ToggleDisplayMode)?;
                info!("Display mode set to {}", mode);
            }
        }

        println!("Display mode: {}", self.state.display_mode);
        Ok(())
    }

    fn handle_config(&mut self, show: bool, reset: bool) -> Result<()> {
        if reset {
            self.config = Config::default();
            self.config.save(&self.config_path)?;
            println!("Configuration reset: {}", self.config_path.display());
        }

        if show || !reset {
            println!("Config file:       {}", self.config_path.display());
            println!("Data directory:    {}", self.config.data_dir.display());
            println!("Export file:       {}", self.config.export_file.display());
            println!("Date format:       {}", self.config.date_format);
            println!("Strict validation: {}", self.config.strict_validation);
        }
        Ok(())
    }
}

fn category_color(category: Category, dark: bool) -> Color {
    match (category, dark) {
        (Category::General, false) => Color::Blue,
        (Category::General, true) => Color::Cyan,
        (Category::Work, _) => Color::Yellow,
        (Category::Health, _) => Color::Green,
        (Category::Love, _) => Color::Magenta,
    }
}
