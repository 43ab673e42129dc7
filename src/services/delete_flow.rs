/// Client-side gating for the irreversible "delete all artworks"
/// operation. Two distinct confirmations are required before a token
/// can be issued; cancelling at any point returns to Idle with no
/// backend effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteAllFlow {
    #[default]
    Idle,
    FirstConfirm,
    FinalConfirm,
}

/// Proof that both confirmations happened. The only way to obtain one
/// is [`DeleteAllFlow::arm`], so `delete_all` cannot be reached by
/// accident.
#[derive(Debug)]
pub struct DeleteAllToken(pub(crate) ());

impl DeleteAllFlow {
    pub fn new() -> Self {
        DeleteAllFlow::Idle
    }

    /// Advance one confirmation step.
    pub fn confirm(self) -> Self {
        match self {
            DeleteAllFlow::Idle => DeleteAllFlow::FirstConfirm,
            DeleteAllFlow::FirstConfirm | DeleteAllFlow::FinalConfirm => {
                DeleteAllFlow::FinalConfirm
            }
        }
    }

    /// Abandon the flow. Always safe; no backend call has happened yet.
    pub fn cancel(self) -> Self {
        DeleteAllFlow::Idle
    }

    /// Issue the deletion token, only once fully confirmed.
    pub fn arm(&self) -> Option<DeleteAllToken> {
        match self {
            DeleteAllFlow::FinalConfirm => Some(DeleteAllToken(())),
            _ => None,
        }
    }
}
