//! Post-boot hook.

use async_trait::async_trait;

/// Work to do once the server has announced it is up.
///
/// A failing hook is logged; it does not stop the server.
#[async_trait]
pub trait PostBootHook: Send {
    async fn after_boot(&mut self) -> anyhow::Result<()>;
}
