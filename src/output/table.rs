//
//  bitbucket-pullrequests
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Table rendering for list commands.

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use console::style;

use crate::api::cloud::PullRequestState;

/// Incrementally builds a table with optional colored headers.
///
/// # Example
///
/// ```rust
/// use bitbucket_pullrequests::output::TableBuilder;
///
/// let rendered = TableBuilder::new()
///     .color(false)
///     .headers(["ID", "TITLE"])
///     .row(["1", "Fix login"])
///     .render();
///
/// assert!(rendered.contains("Fix login"));
/// ```
pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl TableBuilder {
    pub fn new() -> Self {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        Self {
            table,
            color: console::colors_enabled(),
        }
    }

    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        if self.color {
            self.table
                .set_header(headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)));
        } else {
            self.table.set_header(headers);
        }
        self
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        self.table.add_row(row);
        self
    }

    pub fn render(&self) -> String {
        self.table.to_string()
    }

    pub fn print(self) {
        println!("{}", self.table);
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Colors a pull request state: green open, blue merged, red declined.
pub fn format_state(state: PullRequestState, color: bool) -> String {
    if !color {
        return state.to_string();
    }

    match state {
        PullRequestState::Open => style(state).green().to_string(),
        PullRequestState::Merged => style(state).blue().to_string(),
        PullRequestState::Declined => style(state).red().to_string(),
        PullRequestState::Superseded => style(state).yellow().to_string(),
        PullRequestState::Unknown => state.to_string(),
    }
}
