//! Navigation side effect of a forced logout.

/// The host application's view router.
pub trait Navigator: Send + Sync {
    /// Path of the view currently shown.
    fn current_path(&self) -> String;

    /// Switch to `target`.
    fn redirect(&self, target: &str);
}

/// For headless use: there is no view to leave.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn current_path(&self) -> String {
        String::new()
    }

    fn redirect(&self, target: &str) {
        tracing::debug!(redirect_to = target, "Login redirect requested (no navigator installed)");
    }
}

/// Redirect target after a 401, unless already on the login view.
pub fn login_redirect(current: &str, login_path: &str) -> Option<String> {
    let current_path = current.split('?').next().unwrap_or_default();
    if current_path == login_path {
        None
    } else {
        Some(format!("{login_path}?redirected=true"))
    }
}
