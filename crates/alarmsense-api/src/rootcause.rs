// Root-cause search endpoint

use tracing::debug;

use crate::client::AlarmClient;
use crate::error::Error;
use crate::models::{Listing, RootCauseQuery, WireRootCause};

impl AlarmClient {
    /// Find root-cause candidates for a site, turbine and analysis window.
    ///
    /// `POST {base}/rootcause` with the query as JSON body.
    pub async fn find_root_cause(
        &self,
        query: &RootCauseQuery,
    ) -> Result<Vec<WireRootCause>, Error> {
        let url = self.endpoint_url("rootcause")?;
        debug!(
            site_id = %query.site_id,
            turbine_id = %query.turbine_id,
            "searching root causes"
        );
        let listing: Listing<WireRootCause> = self.post(url, query).await?;
        Ok(listing.into_vec())
    }
}
