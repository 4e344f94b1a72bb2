//! Library commands (stories, poems, search, genres, check)

use anyhow::Result;
use serde_json::{json, Value};
use tracing::debug;

use super::app::Session;
use super::output::Output;
use crate::domain::{filter_works, select, Poetry, Story};

/// List stories
pub fn stories(
    session: &Session,
    output: &Output,
    genre: Option<&str>,
    search: Option<&str>,
) -> Result<()> {
    let library = session.load_library()?;
    let query = search.unwrap_or("");
    let found = filter_works(library.stories(), genre, query);
    debug!(genre = ?genre, query, count = found.len(), "Filtered stories");

    if output.is_json() {
        let items: Vec<Value> = found.iter().map(|s| story_json(s)).collect();
        output.data(&items);
        return Ok(());
    }

    print_search_banner(query);
    print_stories(&found);
    Ok(())
}

/// List poems
pub fn poems(
    session: &Session,
    output: &Output,
    genre: Option<&str>,
    search: Option<&str>,
) -> Result<()> {
    let library = session.load_library()?;
    let query = search.unwrap_or("");
    let found = filter_works(library.poetries(), genre, query);
    debug!(genre = ?genre, query, count = found.len(), "Filtered poems");

    if output.is_json() {
        let items: Vec<Value> = found.iter().map(|p| poem_json(p)).collect();
        output.data(&items);
        return Ok(());
    }

    print_search_banner(query);
    print_poems(&found);
    Ok(())
}

/// Search both collections
pub fn search(session: &Session, output: &Output, query: &str, genre: Option<&str>) -> Result<()> {
    let library = session.load_library()?;
    let selection = select(library.stories(), library.poetries(), genre, query);
    debug!(
        query,
        stories = selection.stories.len(),
        poetries = selection.poetries.len(),
        "Search finished"
    );

    if output.is_json() {
        output.data(&json!({
            "query": query,
            "genre": genre,
            "stories": selection.stories.iter().map(|s| story_json(s)).collect::<Vec<_>>(),
            "poetries": selection.poetries.iter().map(|p| poem_json(p)).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    print_search_banner(query);
    print_stories(&selection.stories);
    println!();
    print_poems(&selection.poetries);
    Ok(())
}

/// Show configured genres with how many works carry each
pub fn genres(session: &Session, output: &Output) -> Result<()> {
    let library = session.load_library()?;

    let rows: Vec<(&str, usize, usize)> = library
        .genres()
        .iter()
        .map(|genre| {
            let stories = library.stories().iter().filter(|s| &s.genre == genre).count();
            let poems = library.poetries().iter().filter(|p| &p.genre == genre).count();
            (genre.as_str(), stories, poems)
        })
        .collect();

    if output.is_json() {
        let items: Vec<Value> = rows
            .iter()
            .map(|(genre, stories, poems)| {
                json!({ "genre": genre, "stories": stories, "poetries": poems })
            })
            .collect();
        output.data(&items);
    } else if rows.is_empty() {
        println!("No genres configured.");
    } else {
        println!("{:<24} {:>8} {:>8}", "GENRE", "STORIES", "POEMS");
        println!("{}", "-".repeat(42));
        for (genre, stories, poems) in rows {
            println!("{:<24} {:>8} {:>8}", genre, stories, poems);
        }
    }

    Ok(())
}

/// Report non-fatal problems in the site document
pub fn check(session: &Session, output: &Output) -> Result<()> {
    let library = session.load_library()?;
    let findings = library.diagnostics();

    if output.is_json() {
        let items: Vec<String> = findings.iter().map(|d| d.to_string()).collect();
        output.data(&json!({
            "stories": library.stories().len(),
            "poetries": library.poetries().len(),
            "warnings": items,
        }));
    } else {
        println!(
            "{} stories, {} poems, {} genres",
            library.stories().len(),
            library.poetries().len(),
            library.genres().len()
        );
        if findings.is_empty() {
            println!("No issues found.");
        } else {
            println!();
            for finding in &findings {
                println!("warning: {}", finding);
            }
            println!();
            println!("{} warning(s)", findings.len());
        }
    }

    Ok(())
}

fn story_json(story: &Story) -> Value {
    json!({
        "id": story.id,
        "title": story.title,
        "author": story.author,
        "genre": story.genre,
        "publishDate": story.publish_date,
        "excerpt": story.excerpt,
        "pages": story.pages.len(),
    })
}

fn poem_json(poem: &Poetry) -> Value {
    json!({
        "id": poem.id,
        "title": poem.title,
        "author": poem.author,
        "genre": poem.genre,
        "publishDate": poem.publish_date,
        "lines": poem.lines.len(),
    })
}

fn print_search_banner(query: &str) {
    if !query.is_empty() {
        println!("Search results for: \"{}\"", query);
        println!();
    }
}

fn print_stories(stories: &[&Story]) {
    if stories.is_empty() {
        println!("No stories found for the selected filters.");
        return;
    }

    println!("Stories ({}):", stories.len());
    println!("{:<12} {:<30} {:<20} {:<14} PUBLISHED", "ID", "TITLE", "AUTHOR", "GENRE");
    println!("{}", "-".repeat(92));
    for story in stories {
        println!(
            "{:<12} {:<30} {:<20} {:<14} {}",
            story.id,
            story.title,
            story.author,
            story.genre,
            story.date_label()
        );
    }
}

fn print_poems(poems: &[&Poetry]) {
    if poems.is_empty() {
        println!("No poetries found for the selected filters.");
        return;
    }

    println!("Poetry ({}):", poems.len());
    println!("{:<12} {:<30} {:<20} {:<14} PUBLISHED", "ID", "TITLE", "AUTHOR", "GENRE");
    println!("{}", "-".repeat(92));
    for poem in poems {
        println!(
            "{:<12} {:<30} {:<20} {:<14} {}",
            poem.id,
            poem.title,
            poem.author,
            poem.genre,
            poem.date_label()
        );
    }
}
