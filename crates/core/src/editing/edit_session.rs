use std::path::Path;

use super::domain::cut_range::CutRange;
use super::domain::cut_range_sync::{CutRangeSync, GroupToggle};
use super::domain::edit_history::{EditHistory, HistoryEntry};
use super::domain::project::Project;
use super::domain::word_unit::{UnitId, UnitKind};
use crate::export::domain::command_synthesizer::{CommandSynthesizer, ExportCommand};
use crate::export::domain::cut_list::{CutListReducer, KeptInterval};

/// The open project plus its undo history.
///
/// Every mutating call snapshots the state first and records that snapshot
/// only when the call actually did something, so no-op edits never show up
/// in undo.
#[derive(Debug)]
pub struct EditSession {
    project: Project,
    history: EditHistory,
}

impl EditSession {
    pub fn new(project: Project) -> Self {
        Self::with_history(project, EditHistory::default())
    }

    pub fn with_history(project: Project, history: EditHistory) -> Self {
        Self { project, history }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn into_project(self) -> Project {
        self.project
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Installs a freshly loaded project; old history does not apply to it.
    pub fn replace_project(&mut self, project: Project) {
        self.project = project;
        self.history.clear();
    }

    pub fn toggle_word(&mut self, id: &UnitId) -> Option<bool> {
        let before = self.project.snapshot();
        let p = &mut self.project;
        let result = CutRangeSync::toggle_word(&mut p.segments, &mut p.cut_ranges, id);
        if result.is_some() {
            self.history.record(before);
        }
        result
    }

    pub fn toggle_words(&mut self, ids: &[UnitId]) -> Option<GroupToggle> {
        let before = self.project.snapshot();
        let p = &mut self.project;
        let result = CutRangeSync::toggle_words(&mut p.segments, &mut p.cut_ranges, ids);
        if result.is_some() {
            self.history.record(before);
        }
        result
    }

    pub fn update_cut_ranges(&mut self, ranges: Vec<CutRange>) {
        let before = self.project.snapshot();
        let p = &mut self.project;
        CutRangeSync::update_cut_ranges(&mut p.segments, &mut p.cut_ranges, ranges);
        self.record_if_changed(before);
    }

    /// Deletes kept silences at least as long as the project's threshold.
    /// Returns how many were deleted.
    pub fn delete_silences(&mut self) -> usize {
        let threshold = self.project.settings.silence_threshold;
        let ids = self
            .project
            .segments
            .ids_where(|u| u.kind == UnitKind::Silence && u.is_kept() && u.duration() >= threshold);
        self.delete_each(&ids)
    }

    /// Deletes every kept filler word. Returns how many were deleted.
    pub fn delete_fillers(&mut self) -> usize {
        let ids = self
            .project
            .segments
            .ids_where(|u| u.kind == UnitKind::Filler && u.is_kept());
        self.delete_each(&ids)
    }

    /// Keeps everything again. Returns false if nothing was deleted.
    pub fn restore_all(&mut self) -> bool {
        let before = self.project.snapshot();
        let p = &mut self.project;
        CutRangeSync::restore_all(&mut p.segments, &mut p.cut_ranges);
        self.record_if_changed(before)
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.project.snapshot()) {
            Some(entry) => {
                self.project.restore(entry);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.project.snapshot()) {
            Some(entry) => {
                self.project.restore(entry);
                true
            }
            None => false,
        }
    }

    pub fn kept_intervals(&self) -> Vec<KeptInterval> {
        CutListReducer::reduce(
            self.project.segments.units(),
            self.project.settings.padding(),
            self.project.duration,
        )
    }

    /// `None` when every unit is deleted.
    pub fn export_command(
        &self,
        output: &Path,
        synthesizer: &CommandSynthesizer,
    ) -> Option<ExportCommand> {
        synthesizer.synthesize_streams(
            &self.kept_intervals(),
            self.project.settings.crossfade_duration,
            &self.project.source_path,
            output,
            self.project.has_video,
        )
    }

    fn delete_each(&mut self, ids: &[UnitId]) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let before = self.project.snapshot();
        let p = &mut self.project;
        let count = CutRangeSync::delete_each(&mut p.segments, &mut p.cut_ranges, ids);
        if count > 0 {
            self.history.record(before);
        }
        count
    }

    fn record_if_changed(&mut self, before: HistoryEntry) -> bool {
        let changed = before != self.project.snapshot();
        if changed {
            self.history.record(before);
        }
        changed
    }
}
