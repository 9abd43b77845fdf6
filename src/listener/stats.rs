//! Statistics listeners
//!
//! Small aggregations over the changeset stream. State is per instance, so
//! several runs (or tests) can use their own listeners side by side.

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use super::ChangesetListener;
use crate::changeset::Changeset;

#[derive(Debug, Default)]
struct EditorTally {
    changesets: u64,
    edits: i64,
    users_today: HashSet<String>,
    /// Sum over days of that day's unique users
    user_days: u64,
}

/// One line of the editor usage report
#[derive(Debug, Clone, PartialEq)]
pub struct EditorRow {
    pub editor: String,
    pub changesets: u64,
    pub edits: i64,
    /// Unique users per day, averaged over every day in the stream
    pub daily_users: f64,
    /// Edits per unique user-day
    pub edits_per_user: f64,
}

/// Changesets, edits and unique daily users per editor family
#[derive(Debug, Default)]
pub struct EditorUsage {
    editors: HashMap<String, EditorTally>,
    current_date: String,
    days: u64,
}

impl EditorUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct dates seen
    pub fn days(&self) -> u64 {
        self.days
    }

    fn close_day(&mut self) {
        for tally in self.editors.values_mut() {
            tally.user_days += tally.users_today.len() as u64;
            tally.users_today.clear();
        }
    }

    /// Rows sorted by daily users, busiest first
    pub fn rows(&self) -> Vec<EditorRow> {
        let days = self.days.max(1) as f64;
        let mut rows: Vec<EditorRow> = self
            .editors
            .iter()
            .map(|(editor, tally)| EditorRow {
                editor: editor.clone(),
                changesets: tally.changesets,
                edits: tally.edits,
                daily_users: tally.user_days as f64 / days,
                edits_per_user: if tally.user_days == 0 {
                    0.0
                } else {
                    tally.edits as f64 / tally.user_days as f64
                },
            })
            .collect();
        rows.sort_by(|a, b| {
            b.daily_users
                .total_cmp(&a.daily_users)
                .then_with(|| a.editor.cmp(&b.editor))
        });
        rows
    }

    /// Print editors averaging more than `min_daily_users`
    pub fn write_report<W: Write>(&self, mut out: W, min_daily_users: f64) -> io::Result<()> {
        writeln!(out, "Average daily users and edits/user:")?;
        for row in self.rows().iter().filter(|r| r.daily_users > min_daily_users) {
            writeln!(
                out,
                "{:6.1} {:12.1}  {}",
                row.daily_users,
                row.edits_per_user,
                display_name(&row.editor)
            )?;
        }
        Ok(())
    }
}

impl ChangesetListener for EditorUsage {
    fn initialize(&mut self) {
        *self = Self::default();
    }

    fn process(&mut self, changeset: &Changeset) {
        if changeset.date != self.current_date {
            self.close_day();
            self.current_date.clone_from(&changeset.date);
            self.days += 1;
        }
        let tally = self
            .editors
            .entry(changeset.application.clone())
            .or_default();
        tally.changesets += 1;
        tally.edits += changeset.edit_count;
        if !tally.users_today.contains(&changeset.user) {
            tally.users_today.insert(changeset.user.clone());
        }
    }

    fn finalize(&mut self) {
        self.close_day();
    }
}

/// Most frequent changeset comments
#[derive(Debug, Default)]
pub struct CommentRanking {
    counts: HashMap<String, u64>,
    total: u64,
}

impl CommentRanking {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `limit` most common comments with their counts
    ///
    /// Ties are broken alphabetically so the ranking is stable.
    pub fn top(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .counts
            .iter()
            .map(|(comment, count)| (comment.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// Changesets that carried a comment
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn write_report<W: Write>(&self, mut out: W, limit: usize) -> io::Result<()> {
        writeln!(out, "Top {limit} changeset comments:")?;
        for (comment, count) in self.top(limit) {
            let percent = 100.0 * count as f64 / self.total.max(1) as f64;
            writeln!(out, "{count:9} ({percent:.6}%) \"{comment}\"")?;
        }
        Ok(())
    }
}

impl ChangesetListener for CommentRanking {
    fn initialize(&mut self) {
        self.counts.clear();
        self.total = 0;
    }

    fn process(&mut self, changeset: &Changeset) {
        if changeset.comment.is_empty() {
            return;
        }
        self.total += 1;
        match self.counts.get_mut(changeset.comment.as_str()) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(changeset.comment.clone(), 1);
            }
        }
    }
}

fn display_name(editor: &str) -> &str {
    if editor.is_empty() {
        "<none>"
    } else {
        editor
    }
}
