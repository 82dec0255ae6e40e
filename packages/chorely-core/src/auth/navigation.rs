/// Hook fired when the session can no longer be recovered and the user has to
/// sign in again. Fire-and-forget: the pipeline does not wait on it.
pub trait NavigationSignal: Send + Sync {
    fn go_to_login(&self);
}

impl<F> NavigationSignal for F
where
    F: Fn() + Send + Sync,
{
    fn go_to_login(&self) {
        self()
    }
}

/// Navigation signal that does nothing. Callers rely on
/// [`ApiOutcome::SessionExpired`](crate::api::ApiOutcome) instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNavigation;

impl NavigationSignal for NoNavigation {
    fn go_to_login(&self) {}
}
