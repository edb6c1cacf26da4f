//! Balance queries.

use storage::CredentialStore;
use transport::Gateway;

use crate::{WalletClient, WalletError};

impl<G, C> WalletClient<G, C>
where
    G: Gateway,
    C: CredentialStore + 'static,
{
    /// The current balance, straight from the service.
    ///
    /// Never cached: a submission's success does not move any displayed
    /// balance until the caller refetches.
    pub async fn balance(&self) -> Result<f64, WalletError> {
        self.check_cancelled()?;
        self.inner.gateway.balance().await.map_err(WalletError::from)
    }
}
