// Site and turbine endpoints

use tracing::debug;

use crate::client::AlarmClient;
use crate::error::Error;
use crate::models::{Listing, WireSite, WireTurbine};

impl AlarmClient {
    /// List every site known to the backend.
    ///
    /// `GET {base}/sites`
    pub async fn list_sites(&self) -> Result<Vec<WireSite>, Error> {
        let url = self.endpoint_url("sites")?;
        debug!("listing sites");
        let listing: Listing<WireSite> = self.get(url).await?;
        Ok(listing.into_vec())
    }

    /// List the turbines that belong to one site.
    ///
    /// `GET {base}/turbines?siteId={site_id}`
    pub async fn list_turbines(&self, site_id: &str) -> Result<Vec<WireTurbine>, Error> {
        let mut url = self.endpoint_url("turbines")?;
        url.query_pairs_mut().append_pair("siteId", site_id);
        debug!(site_id, "listing turbines");
        let listing: Listing<WireTurbine> = self.get(url).await?;
        Ok(listing.into_vec())
    }
}
