/// Linear undo/redo history of serialized scene snapshots.
///
/// `cursor` points at the snapshot matching the current scene. Saving after
/// an undo discards the redo tail; once `max` snapshots are kept the oldest
/// one is dropped.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<String>,
    cursor: usize,
    max: usize,
}

impl History {
    /// Start a history whose first entry is `initial`.
    pub fn new(initial: String, max: usize) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            max: max.max(1),
        }
    }

    pub fn save(&mut self, snapshot: String) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        if self.snapshots.len() > self.max {
            let excess = self.snapshots.len() - self.max;
            self.snapshots.drain(..excess);
        }
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back and return the snapshot to restore.
    pub fn undo(&mut self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward and return the snapshot to restore.
    pub fn redo(&mut self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Every retained snapshot, oldest first.
    pub fn snapshots(&self) -> impl Iterator<Item = &str> {
        self.snapshots.iter().map(String::as_str)
    }
}
