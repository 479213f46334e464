//! Linear upload/generation flow: idle, uploading, processing, then done.

use log::{debug, warn};

/// Where a submission currently is.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Phase {
	/// Nothing submitted yet.
	#[default]
	Idle,
	/// Request body is being sent.
	Uploading,
	/// Backend is working; `progress` is a percentage.
	Processing {
		/// Percentage in `0..=100`.
		progress: f64,
		/// Latest status line.
		message: Option<String>,
	},
	/// Finished; `redirect` is where to go next.
	Complete {
		/// Next page, if the backend named one.
		redirect: Option<String>,
	},
	/// Failed with a user-facing message.
	Error(String),
}

impl Phase {
	/// Whether a request is outstanding.
	pub fn is_busy(&self) -> bool {
		matches!(self, Phase::Uploading | Phase::Processing { .. })
	}

	/// Whether the flow reached an end state.
	pub fn is_terminal(&self) -> bool {
		matches!(self, Phase::Complete { .. } | Phase::Error(_))
	}

	/// Progress shown in the bar.
	pub fn percent(&self) -> f64 {
		match self {
			Phase::Idle | Phase::Error(_) => 0.0,
			Phase::Uploading => 5.0,
			Phase::Processing { progress, .. } => progress.clamp(0.0, 100.0),
			Phase::Complete { .. } => 100.0,
		}
	}

	/// `Idle -> Uploading`.
	pub fn start(&mut self) -> bool {
		self.step(Phase::Uploading)
	}

	/// `Uploading | Processing -> Processing`.
	pub fn progress(&mut self, progress: f64, message: Option<String>) -> bool {
		self.step(Phase::Processing { progress, message })
	}

	/// `Uploading | Processing -> Complete`.
	pub fn complete(&mut self, redirect: Option<String>) -> bool {
		self.step(Phase::Complete { redirect })
	}

	/// Any non-terminal phase `-> Error`.
	pub fn fail(&mut self, message: impl Into<String>) -> bool {
		self.step(Phase::Error(message.into()))
	}

	/// Back to `Idle`, for a user-initiated retry.
	pub fn reset(&mut self) {
		*self = Phase::Idle;
	}

	fn step(&mut self, next: Phase) -> bool {
		let allowed = match (&*self, &next) {
			(Phase::Idle, Phase::Uploading) => true,
			(Phase::Uploading | Phase::Processing { .. }, Phase::Processing { .. }) => true,
			(Phase::Uploading | Phase::Processing { .. }, Phase::Complete { .. }) => true,
			(current, Phase::Error(_)) => !current.is_terminal(),
			_ => false,
		};
		if allowed {
			debug!("pipeline {:?} -> {:?}", self, next);
			*self = next;
		} else {
			warn!("ignoring pipeline transition {:?} -> {:?}", self, next);
		}
		allowed
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn happy_path_runs_forward() {
		let mut phase = Phase::default();
		assert!(phase.start());
		assert!(phase.progress(30.0, Some("Writing".into())));
		assert!(phase.progress(80.0, None));
		assert!(phase.complete(Some("/story/edit".into())));
		assert_eq!(phase.percent(), 100.0);
		assert!(phase.is_terminal());
	}

	#[test]
	fn backwards_and_skipping_transitions_are_rejected() {
		let mut phase = Phase::default();
		assert!(!phase.complete(None));
		assert!(!phase.progress(10.0, None));
		phase.start();
		phase.complete(None);
		assert!(!phase.start());
		assert!(!phase.fail("late"));
		assert_eq!(phase, Phase::Complete { redirect: None });
	}

	#[test]
	fn errors_end_the_flow_until_reset() {
		let mut phase = Phase::default();
		phase.start();
		assert!(phase.fail("upload rejected"));
		assert!(!phase.is_busy());
		assert!(!phase.progress(50.0, None));
		phase.reset();
		assert!(phase.start());
	}
}
