use anyhow::bail;

use crate::models::{Section, SECTIONS};

/// One row of the feedback form. Entries carry a stable id so edits and
/// removals stay unambiguous as the list changes shape.
#[derive(Debug, Clone)]
pub struct FeedbackEntry {
    pub id: u64,
    pub section: Option<Section>,
    pub comment: String,
}

/// Body of a `POST /feedback` call, minus the report id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackPayload {
    pub user_comment: String,
    pub flagged_section: String,
}

/// Form state for one report: a list of (section, comment) entries where
/// each section may be used at most once. The list never becomes empty.
#[derive(Debug, Clone)]
pub struct FeedbackForm {
    entries: Vec<FeedbackEntry>,
    next_id: u64,
}

impl FeedbackForm {
    pub fn new() -> Self {
        let mut form = FeedbackForm {
            entries: Vec::new(),
            next_id: 0,
        };
        form.push_empty();
        form
    }

    pub fn entries(&self) -> &[FeedbackEntry] {
        &self.entries
    }

    fn push_empty(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(FeedbackEntry {
            id,
            section: None,
            comment: String::new(),
        });
        id
    }

    fn used_sections(&self, excluding: Option<u64>) -> Vec<Section> {
        self.entries
            .iter()
            .filter(|e| Some(e.id) != excluding)
            .filter_map(|e| e.section)
            .collect()
    }

    /// Sections not claimed by any entry yet.
    pub fn unused_sections(&self) -> Vec<Section> {
        let used = self.used_sections(None);
        SECTIONS
            .iter()
            .copied()
            .filter(|s| !used.contains(s))
            .collect()
    }

    /// Sections the entry may select: everything unused elsewhere, plus its
    /// own current selection.
    pub fn selectable_sections(&self, id: u64) -> Vec<Section> {
        let used = self.used_sections(Some(id));
        SECTIONS
            .iter()
            .copied()
            .filter(|s| !used.contains(s))
            .collect()
    }

    pub fn can_add(&self) -> bool {
        !self.unused_sections().is_empty()
    }

    pub fn add_entry(&mut self) -> anyhow::Result<u64> {
        if !self.can_add() {
            bail!("every section already has a feedback entry");
        }
        Ok(self.push_empty())
    }

    fn entry_mut(&mut self, id: u64) -> anyhow::Result<&mut FeedbackEntry> {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => Ok(entry),
            None => bail!("no feedback entry with id {id}"),
        }
    }

    /// Sets the entry's section. A section already claimed by another entry
    /// is rejected, so the selected sections always form a set.
    pub fn set_section(&mut self, id: u64, section: Option<Section>) -> anyhow::Result<()> {
        if let Some(section) = section {
            if self.used_sections(Some(id)).contains(&section) {
                bail!(
                    "section '{}' already has a feedback entry",
                    section.as_str()
                );
            }
        }
        self.entry_mut(id)?.section = section;
        Ok(())
    }

    pub fn set_comment(&mut self, id: u64, comment: &str) -> anyhow::Result<()> {
        self.entry_mut(id)?.comment = comment.to_string();
        Ok(())
    }

    /// Removes the entry; keeping the last remaining entry is a no-op.
    /// Returns whether anything was removed.
    pub fn remove_entry(&mut self, id: u64) -> bool {
        if self.entries.len() <= 1 {
            return false;
        }
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() < before
    }

    /// Builds the submission body from entries that have both a section and
    /// a non-blank comment, in their current order. Form state is untouched;
    /// callers reset after the request succeeds.
    pub fn payload(&self) -> anyhow::Result<FeedbackPayload> {
        let valid: Vec<(&Section, &str)> = self
            .entries
            .iter()
            .filter_map(|e| {
                let section = e.section.as_ref()?;
                let comment = e.comment.trim();
                if comment.is_empty() {
                    None
                } else {
                    Some((section, comment))
                }
            })
            .collect();

        if valid.is_empty() {
            bail!("add at least one section with a comment before submitting");
        }

        let user_comment = valid
            .iter()
            .map(|(section, comment)| format!("{}: {}", section.as_str(), comment))
            .collect::<Vec<_>>()
            .join(" | ");
        let flagged_section = valid
            .iter()
            .map(|(section, _)| section.as_str())
            .collect::<Vec<_>>()
            .join(",");

        Ok(FeedbackPayload {
            user_comment,
            flagged_section,
        })
    }

    /// Back to a single empty entry, as after a successful submission.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.push_empty();
    }
}
