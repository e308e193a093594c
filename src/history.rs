use crate::parser::types::Primitive;

/// Append-only primitive log plus the single-branch redo buffer.
///
/// While `replaying` is set, appends do not clear the redo buffer, so undo and redo can feed
/// primitives back through the normal execution path.
#[derive(Debug, Default)]
pub struct CommandLog {
    entries: Vec<Primitive>,
    redo: Vec<Primitive>,
    replaying: bool,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.entries.push(primitive);
        if !self.replaying {
            self.redo.clear();
        }
    }

    pub fn entries(&self) -> &[Primitive] {
        &self.entries
    }

    pub fn redo_entries(&self) -> &[Primitive] {
        &self.redo
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Move the newest entry to the redo buffer and hand back the rest for replay. The log
    /// is left empty; replay rebuilds it. Returns `None` when there is nothing to undo.
    pub fn begin_undo(&mut self) -> Option<Vec<Primitive>> {
        let undone = self.entries.pop()?;
        self.redo.push(undone);
        self.replaying = true;
        Some(std::mem::take(&mut self.entries))
    }

    /// Pop the most recently undone primitive and enter replay mode.
    pub fn begin_redo(&mut self) -> Option<Primitive> {
        let primitive = self.redo.pop()?;
        self.replaying = true;
        Some(primitive)
    }

    pub fn end_replay(&mut self) {
        self.replaying = false;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.redo.clear();
        self.replaying = false;
    }
}
