//! Linear undo/redo log over whole snapshots.

/// `past` holds older snapshots (oldest first), `future` holds undone ones
/// (next redo first). Recording a new snapshot discards `future`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct History<T> {
	past: Vec<T>,
	present: T,
	future: Vec<T>,
}

/// Command bound to a keyboard shortcut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryCommand {
	/// Step back.
	Undo,
	/// Step forward.
	Redo,
}

impl<T: Clone> History<T> {
	/// Starts a log whose only state is `present`.
	pub fn new(present: T) -> Self {
		Self {
			past: Vec::new(),
			present,
			future: Vec::new(),
		}
	}

	/// Current snapshot.
	pub fn present(&self) -> &T {
		&self.present
	}

	/// Pushes the current snapshot onto `past` and makes `snapshot` current.
	pub fn record(&mut self, snapshot: T) {
		let previous = std::mem::replace(&mut self.present, snapshot);
		self.past.push(previous);
		self.future.clear();
	}

	/// Replaces the whole log with a fresh start, e.g. after reloading a story.
	pub fn reset(&mut self, present: T) {
		*self = Self::new(present);
	}

	/// Returns false when there is nothing to undo.
	pub fn undo(&mut self) -> bool {
		let Some(previous) = self.past.pop() else {
			return false;
		};
		let current = std::mem::replace(&mut self.present, previous);
		self.future.insert(0, current);
		true
	}

	/// Returns false when there is nothing to redo.
	pub fn redo(&mut self) -> bool {
		if self.future.is_empty() {
			return false;
		}
		let next = self.future.remove(0);
		let current = std::mem::replace(&mut self.present, next);
		self.past.push(current);
		true
	}

	/// Applies `command`, returning whether the present changed.
	pub fn apply(&mut self, command: HistoryCommand) -> bool {
		match command {
			HistoryCommand::Undo => self.undo(),
			HistoryCommand::Redo => self.redo(),
		}
	}

	/// Whether `undo` would do anything.
	pub fn can_undo(&self) -> bool {
		!self.past.is_empty()
	}

	/// Whether `redo` would do anything.
	pub fn can_redo(&self) -> bool {
		!self.future.is_empty()
	}
}

/// Maps a keydown to a history command: ctrl/cmd+Z undoes, with shift it redoes.
pub fn shortcut_for(key: &str, ctrl: bool, meta: bool, shift: bool) -> Option<HistoryCommand> {
	if !(ctrl || meta) || !key.eq_ignore_ascii_case("z") {
		return None;
	}
	Some(if shift {
		HistoryCommand::Redo
	} else {
		HistoryCommand::Undo
	})
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[test]
	fn n_records_then_n_undos_restore_the_start() {
		let mut history = History::new(vec![0]);
		for i in 1..=5 {
			let mut next = history.present().clone();
			next.push(i);
			history.record(next);
		}
		for _ in 0..5 {
			assert!(history.undo());
		}
		assert_eq!(history.present(), &vec![0]);
		assert!(!history.can_undo());
	}

	#[test]
	fn undo_then_redo_is_identity() {
		let mut history = History::new("a");
		history.record("b");
		history.record("c");
		assert!(history.undo());
		assert_eq!(*history.present(), "b");
		assert!(history.redo());
		assert_eq!(*history.present(), "c");
	}

	#[test]
	fn recording_clears_redo_branch() {
		let mut history = History::new(1);
		history.record(2);
		history.undo();
		assert!(history.can_redo());
		history.record(3);
		assert!(!history.can_redo());
		assert!(!history.redo());
		assert_eq!(*history.present(), 3);
	}

	#[test]
	fn empty_stacks_are_no_ops() {
		let mut history = History::new(7);
		assert!(!history.undo());
		assert!(!history.redo());
		assert_eq!(*history.present(), 7);
	}

	#[test]
	fn multiple_undos_redo_in_order() {
		let mut history = History::new(0);
		history.record(1);
		history.record(2);
		history.undo();
		history.undo();
		assert!(history.redo());
		assert_eq!(*history.present(), 1);
		assert!(history.redo());
		assert_eq!(*history.present(), 2);
	}

	#[rstest]
	#[case("z", true, false, false, Some(HistoryCommand::Undo))]
	#[case("Z", false, true, true, Some(HistoryCommand::Redo))]
	#[case("z", false, false, false, None)]
	#[case("y", true, false, false, None)]
	fn shortcut_mapping(
		#[case] key: &str,
		#[case] ctrl: bool,
		#[case] meta: bool,
		#[case] shift: bool,
		#[case] expected: Option<HistoryCommand>,
	) {
		assert_eq!(shortcut_for(key, ctrl, meta, shift), expected);
	}
}
