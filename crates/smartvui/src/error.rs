use thiserror::Error;

/// Errors surfaced by composable operations. Most environment gaps degrade
/// silently; only hard boundary violations become errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Programmatic mounting needs a live environment driver and there is
    /// none, which is the server-rendering path.
    #[error("`render` can only be used in an interactive environment")]
    RenderUnavailable,
}
