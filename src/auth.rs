use uuid::Uuid;

/// Identity of the authenticated admin performing writes.
///
/// Constructed once at the entry point after the platform login and
/// passed to the services that need ownership scoping. Services never
/// accept a user id from request data; the session is the only source
/// of ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: Uuid,
}

impl AuthSession {
    pub fn new(user_id: Uuid) -> Self {
        AuthSession { user_id }
    }
}
