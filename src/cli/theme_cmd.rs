//! Theme commands

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use super::app::Session;
use super::output::Output;
use crate::domain::{Palette, Theme};

#[derive(Subcommand)]
pub enum ThemeCommands {
    /// Show the active theme and its palette
    Show {
        /// Print the palette as CSS custom properties
        #[arg(long)]
        css: bool,
    },

    /// Switch theme (any of light, dark, forest, galaxy, vintage)
    Set {
        /// Theme name
        theme: Theme,
    },

    /// List themes enabled by the site
    List,
}

pub fn run(cmd: ThemeCommands, session: &Session, output: &Output) -> Result<()> {
    match cmd {
        ThemeCommands::Show { css } => {
            let library = session.load_library()?;
            let state = session.theme_state(&library.config().available_themes());
            let palette = state.palette();

            if output.is_json() {
                output.data(&json!({
                    "theme": state.current(),
                    "palette": palette_json(palette),
                }));
            } else if css {
                println!(":root {{");
                for line in palette.css_variables().lines() {
                    println!("  {}", line);
                }
                println!("}}");
            } else {
                println!("Theme: {}", state.current());
                println!();
                for (token, color) in palette.entries() {
                    println!("  {:<16} {}", token.name(), color);
                }
            }
        }

        ThemeCommands::Set { theme } => {
            // Accepted whether or not the site enables it
            let mut state = session.theme_state(&Theme::ALL);
            state.set_theme(theme);

            if output.is_json() {
                output.data(&json!({
                    "theme": state.current(),
                    "palette": palette_json(state.palette()),
                }));
            } else {
                output.success(&format!("Theme set to {}", state.current()));
            }
        }

        ThemeCommands::List => {
            let library = session.load_library()?;
            let available = library.config().available_themes();
            let state = session.theme_state(&available);

            if output.is_json() {
                output.data(&json!({
                    "current": state.current(),
                    "available": available,
                }));
            } else if available.is_empty() {
                println!("The site enables no themes; using {}.", state.current());
            } else {
                for theme in &available {
                    let marker = if *theme == state.current() { "*" } else { " " };
                    println!("{} {}", marker, theme);
                }
            }
        }
    }

    Ok(())
}

fn palette_json(palette: &Palette) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = palette
        .entries()
        .into_iter()
        .map(|(token, color)| (token.name().to_string(), json!(color)))
        .collect();
    serde_json::Value::Object(map)
}
