use crate::{
    api::{Error, RegisteredAccount, SessionUser},
    store::keys,
    Store, StoreExt,
};

/// The account directory and the currently logged-in user
#[derive(Clone, Debug, Default)]
pub struct Session {
    accounts: Vec<RegisteredAccount>,
    current: Option<SessionUser>,
}

impl Session {
    /// Rehydrates the directory and the active session, dropping malformed entries
    pub fn load<S: Store + ?Sized>(store: &mut S) -> Session {
        let accounts = store.take_valid(keys::ACCOUNTS).unwrap_or_default();
        let current: Option<SessionUser> = store.take_valid(keys::SESSION);
        if let Some(user) = &current {
            tracing::debug!(user = %user.name, "restored session");
        }
        Session { accounts, current }
    }

    pub fn current(&self) -> Option<&SessionUser> {
        self.current.as_ref()
    }

    pub fn accounts(&self) -> &[RegisteredAccount] {
        &self.accounts
    }

    /// Adds the account to the directory and logs it in
    pub fn register<S: Store + ?Sized>(
        &mut self,
        store: &mut S,
        account: RegisteredAccount,
    ) -> Result<&SessionUser, Error> {
        if self.accounts.iter().any(|a| a.name == account.name) {
            return Err(Error::DuplicateUser(account.name));
        }
        if account.password.is_empty() {
            return Err(Error::MissingPassword);
        }
        tracing::info!(user = %account.name, "registering new account");
        let user = account.session();
        self.accounts.push(account);
        store.set(keys::ACCOUNTS, &self.accounts);
        Ok(self.start(store, user))
    }

    pub fn login<S: Store + ?Sized>(
        &mut self,
        store: &mut S,
        name: &str,
        password: &str,
    ) -> Result<&SessionUser, Error> {
        let user = self
            .accounts
            .iter()
            .find(|a| a.name == name && a.password == password)
            .map(|a| a.session())
            .ok_or(Error::InvalidCredentials)?;
        Ok(self.start(store, user))
    }

    pub fn logout<S: Store + ?Sized>(&mut self, store: &mut S) {
        if let Some(user) = self.current.take() {
            tracing::info!(user = %user.name, "logging out");
        }
        store.remove(keys::SESSION);
    }

    fn start<S: Store + ?Sized>(&mut self, store: &mut S, user: SessionUser) -> &SessionUser {
        store.set(keys::SESSION, &user);
        self.current.insert(user)
    }
}
