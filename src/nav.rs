//! Full page loads for server-rendered routes.

use log::{error, info};

/// Story editing page rendered by the backend.
pub const EDIT_PAGE: &str = "/story/edit";

/// Leaves the SPA for `path`.
pub fn leave_for(path: &str) {
	info!("navigating to {}", path);
	let Some(window) = web_sys::window() else {
		error!("no window to navigate with");
		return;
	};
	if let Err(err) = window.location().set_href(path) {
		error!("navigation to {} failed: {:?}", path, err);
	}
}

/// Reloads the current page.
pub fn reload() {
	if let Some(window) = web_sys::window() {
		if let Err(err) = window.location().reload() {
			error!("reload failed: {:?}", err);
		}
	}
}
