//! Shared types for the diarynotes application.
//!
//! This module contains the fixed category set, the display mode flag and the
//! CLI subcommands.
use std::{fmt, path::PathBuf, str::FromStr};

use clap::Subcommand;
use serde::{Deserialize, Serialize};

use crate::DiaryError;

/// A specialized Result type for diarynotes operations.
pub type Result<T> = std::result::Result<T, DiaryError>;

/// The fixed set of note categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    General,
    Work,
    Health,
    Love,
}

impl Category {
    /// All categories, in selector order
    pub const ALL: [Category; 4] = [
        Category::General,
        Category::Work,
        Category::Health,
        Category::Love,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Work => "Work",
            Category::Health => "Health",
            Category::Love => "Love",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DiaryError;

    /// Accepts category names case-insensitively ("work", "Work", "WORK")
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DiaryError::InvalidCategory {
                name: s.to_string(),
            })
    }
}

/// Light or dark display mode, persisted as a boolean "dark" flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Light,
    Dark,
}

impl DisplayMode {
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark {
            DisplayMode::Dark
        } else {
            DisplayMode::Light
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, DisplayMode::Dark)
    }

    pub fn toggled(&self) -> Self {
        match self {
            DisplayMode::Light => DisplayMode::Dark,
            DisplayMode::Dark => DisplayMode::Light,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Light => f.write_str("light"),
            DisplayMode::Dark => f.write_str("dark"),
        }
    }
}

/// Available subcommands for the diarynotes application
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new note
    Add {
        /// Text of the note
        text: String,

        /// Category: General, Work, Health or Love
        #[clap(short, long, default_value = "General")]
        category: String,
    },

    /// Replace the text and category of an existing note
    Edit {
        /// ID of the note to edit
        id: i64,

        /// New text for the note
        text: String,

        /// New category (keeps the current one when omitted)
        #[clap(short, long)]
        category: Option<String>,
    },

    /// Delete a note by ID
    Delete {
        /// ID of the note to delete
        id: i64,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// List notes, optionally filtered by text and category
    List {
        /// Case-insensitive text to search for
        #[clap(short, long, default_value = "")]
        search: String,

        /// Category filter: All, General, Work, Health or Love
        #[clap(short, long, default_value = "All")]
        filter: String,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Export every note to a PDF table
    Export {
        /// Output file (defaults to the configured export file)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or change the display mode
    Theme {
        /// Switch between light and dark
        #[clap(short, long, conflicts_with_all = ["dark", "light"])]
        toggle: bool,

        /// Use dark mode
        #[clap(long, conflicts_with = "light")]
        dark: bool,

        /// Use light mode
        #[clap(long)]
        light: bool,
    },

    /// Configuration management
    Config {
        /// Show current configuration
        #[clap(short = 'S', long)]
        show: bool,

        /// Reset configuration to defaults
        #[clap(short, long)]
        reset: bool,
    },
}
