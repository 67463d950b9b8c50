/// Requests from the foreground into the supervisor loop.
///
/// Commands are handled by the loop task itself, between ticks, so they are
/// serialized with automatic restarts.
#[derive(Debug)]
pub enum SupervisorCommand {
    /// Operator-triggered restart
    Restart,
}
