/// What is kept of an account while it is logged in
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SessionUser {
    pub name: String,
    pub avatar: String,
}

/// An entry of the account directory, keyed by `name`
///
/// The password is stored and compared as plain text. This is a local toy
/// session, not an authentication system.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RegisteredAccount {
    pub name: String,
    pub avatar: String,
    pub password: String,
}

impl RegisteredAccount {
    pub fn session(&self) -> SessionUser {
        SessionUser {
            name: self.name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}
