use log::info;
use web_sys::Location;

use crate::error::Result;
use crate::model::DeletionRequest;

/// Hands a deletion off to the server. The server answers with the next page.
pub trait DeletionTransport {
    fn send(&self, request: &DeletionRequest) -> Result<()>;
}

/// Navigates the page to the request target, exactly as following the
/// item's own delete link would. Query parameters are kept as they are.
pub struct PageNavigation {
    location: Location,
}

impl PageNavigation {
    pub fn new(location: Location) -> Self {
        Self { location }
    }
}

impl DeletionTransport for PageNavigation {
    fn send(&self, request: &DeletionRequest) -> Result<()> {
        info!("{} {}", request.method.as_str(), request.target);
        self.location.assign(&request.target)?;
        Ok(())
    }
}
